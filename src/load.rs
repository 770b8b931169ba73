//! Table loading.
//!
//! Tables are CSV with a header row naming the record fields. Paths ending
//! in `.gz` are decompressed on the fly. Every path is supplied by the
//! caller; nothing here knows where the survey files live.

use crate::record::{PregnancyRecord, RespondentRecord};
use flate2::read::GzDecoder;
use log::info;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a table
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

type Result<T> = core::result::Result<T, LoadError>;

/// Opens `path` for reading, gunzipping it when the name ends in `.gz`.
pub fn open_table(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let reader = BufReader::new(file);
    let gzipped = path.extension().is_some_and(|ext| ext == "gz");
    if gzipped {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Deserializes every row of a headed CSV stream.
pub fn read_table<R, T>(reader: R) -> Result<Vec<T>>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    rdr.deserialize().map(|row| row.map_err(LoadError::from)).collect()
}

/// Loads and cleans the pregnancy table.
pub fn load_pregnancies(path: &Path) -> Result<Vec<PregnancyRecord>> {
    let mut records: Vec<PregnancyRecord> = read_table(open_table(path)?)?;
    records.iter_mut().for_each(PregnancyRecord::clean);
    info!("loaded {} pregnancies from {}", records.len(), path.display());
    Ok(records)
}

/// Loads the respondent table.
pub fn load_respondents(path: &Path) -> Result<Vec<RespondentRecord>> {
    let records: Vec<RespondentRecord> = read_table(open_table(path)?)?;
    info!("loaded {} respondents from {}", records.len(), path.display());
    Ok(records)
}
