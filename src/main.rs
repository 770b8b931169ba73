use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use u_survey::check::{self, CheckError};
use u_survey::config::{AnalysisConfig, ConfigError};
use u_survey::group::pairwise_length_differences;
use u_survey::hist::Hist;
use u_survey::load::{self, LoadError};
use u_survey::record::{split_live_births, total_weights};
use u_survey::{report, stats, Pmf, StatsError};

/// Summarize pregnancy lengths and check the PMF moments
#[derive(Parser)]
#[command(name = "thinkstats", version)]
struct Args {
    /// Pregnancy table (.csv or .csv.gz)
    #[arg(value_name = "PREG_FILE")]
    preg: PathBuf,

    /// Respondent table (.csv or .csv.gz); enables the respondent checks
    #[arg(long = "resp", value_name = "RESP_FILE")]
    resp: Option<PathBuf>,

    /// Analysis options (TOML)
    #[arg(short = 'c', long = "config", value_name = "CONFIG")]
    config: Option<PathBuf>,
}

/// Errors that abort a run
#[derive(Error, Debug)]
enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    #[error("Check failed: {0}")]
    Check(#[from] CheckError),
}

type Result<T> = core::result::Result<T, AppError>;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let script = std::env::args().next().unwrap_or_else(|| "thinkstats".to_string());
    let args = Args::parse();

    let result = run(&args);
    if let Err(e) = &result {
        error!("{e}");
    }
    println!("{}", status_line(&script, &result));
    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn status_line(script: &str, result: &Result<()>) -> String {
    match result {
        Ok(()) => format!("{script}: All tests passed."),
        Err(_) => "Tests not passed".to_string(),
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };

    let pregnancies = load::load_pregnancies(&args.preg)?;
    let births = split_live_births(&pregnancies);
    info!(
        "{} live births: {} first babies, {} others",
        births.live.len(),
        births.firsts.len(),
        births.others.len()
    );

    for (label, group) in [("first babies", &births.firsts), ("others", &births.others)] {
        let weights = total_weights(group);
        if !weights.is_empty() {
            println!(
                "mean birth weight, {label}: {:.3} lb ({} known)",
                stats::mean(&weights)?,
                weights.len()
            );
        }
    }

    let pairwise = pairwise_length_differences(&births.live, &config)?;
    println!("{}", report::format_summary(&pairwise));
    println!(
        "{}",
        report::pmf_table(&pairwise.summary.pmf, Some("Difference in weeks"))
    );

    let prglngth: Vec<f64> = births.live.iter().map(|r| r.prglngth).collect();
    let pmf = Pmf::from_observations(&prglngth)?;
    check::verify_pmf_moments(&prglngth, &pmf, config.tolerance)?;
    println!("mean/var preg length {} {}", pmf.mean(), pmf.variance());

    if let Some(path) = &args.resp {
        let respondents = load::load_respondents(path)?;
        let pregnum: Vec<f64> = respondents.iter().map(|r| f64::from(r.pregnum)).collect();
        println!(
            "{}",
            report::hist_table(&Hist::from_values(&pregnum)?, Some("pregnum"))
        );
        if let Some(expected) = &config.expected {
            check::verify_respondents(&respondents, expected)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "caseid,prglngth,outcome,birthord,agepreg,birthwgt_lb,birthwgt_oz\n";

    fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn pregnancies(rows: &str) -> NamedTempFile {
        write_temp(".csv", &format!("{HEADER}{rows}"))
    }

    fn args(preg: &NamedTempFile, resp: Option<&NamedTempFile>, config: Option<&NamedTempFile>) -> Args {
        Args {
            preg: preg.path().to_path_buf(),
            resp: resp.map(|f| f.path().to_path_buf()),
            config: config.map(|f| f.path().to_path_buf()),
        }
    }

    const PAIRED_ROWS: &str = "\
1,39,1,1,3316,8,13
1,40,1,2,3925,7,14
2,38,1,1,1858,,
2,9,4,,1433,,
";

    const RESPONDENTS: &str = "caseid,pregnum\n1,2\n2,2\n3,0\n";

    #[test]
    fn test_run_passes() {
        let preg = pregnancies(PAIRED_ROWS);
        let resp = write_temp(".csv", RESPONDENTS);
        let config = write_temp(
            ".toml",
            "tolerance = 1e-9\n[expected]\nrecords = 3\nvalue_counts = [{ value = 2.0, count = 2 }]\n",
        );
        let result = run(&args(&preg, Some(&resp), Some(&config)));
        assert!(result.is_ok(), "{result:?}");
        assert_eq!(status_line("thinkstats", &result), "thinkstats: All tests passed.");
    }

    #[test]
    fn test_run_without_optional_inputs() {
        let preg = pregnancies(PAIRED_ROWS);
        assert!(run(&args(&preg, None, None)).is_ok());
    }

    #[test]
    fn test_run_fails_on_wrong_respondent_count() {
        let preg = pregnancies(PAIRED_ROWS);
        let resp = write_temp(".csv", RESPONDENTS);
        let config = write_temp(".toml", "[expected]\nrecords = 7643\n");
        let result = run(&args(&preg, Some(&resp), Some(&config)));
        assert!(matches!(
            result,
            Err(AppError::Check(CheckError::CountMismatch { expected: 7643, actual: 3, .. }))
        ));
        assert_eq!(status_line("thinkstats", &result), "Tests not passed");
    }

    #[test]
    fn test_run_fails_without_qualifying_group() {
        let preg = pregnancies("1,39,1,1,,,\n2,40,1,1,,,\n3,38,1,1,,,\n");
        let result = run(&args(&preg, None, None));
        assert!(matches!(
            result,
            Err(AppError::Stats(StatsError::EmptyInput(_)))
        ));
    }

    #[test]
    fn test_run_rejects_bad_config() {
        let preg = pregnancies(PAIRED_ROWS);
        let config = write_temp(".toml", "min_group_size = \"two\"\n");
        let result = run(&args(&preg, None, Some(&config)));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_run_reports_missing_table() {
        let missing = Args {
            preg: PathBuf::from("/nonexistent/preg.csv"),
            resp: None,
            config: None,
        };
        assert!(matches!(run(&missing), Err(AppError::Load(_))));
    }
}
