//! Typed survey records.
//!
//! Each row of the pregnancy and respondent tables is deserialized into a
//! fixed-shape struct; column names in the input must match the field
//! names.

use serde::Deserialize;

/// Outcome code for a live birth.
pub const LIVE_BIRTH: u8 = 1;

/// Birth weight codes meaning "not ascertained", "refused" and "don't know".
const WEIGHT_NA_CODES: [f64; 3] = [97.0, 98.0, 99.0];

/// One pregnancy reported by a respondent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PregnancyRecord {
    /// Respondent identifier; a respondent may report several pregnancies.
    pub caseid: u64,
    /// Pregnancy length in weeks.
    pub prglngth: f64,
    pub outcome: u8,
    /// Birth order among live births, missing for other outcomes.
    #[serde(default)]
    pub birthord: Option<u8>,
    /// Age at end of pregnancy. Raw files store hundredths of a year;
    /// [`clean`](Self::clean) converts it to years.
    #[serde(default)]
    pub agepreg: Option<f64>,
    #[serde(default)]
    pub birthwgt_lb: Option<f64>,
    #[serde(default)]
    pub birthwgt_oz: Option<f64>,
}

impl PregnancyRecord {
    /// Normalizes raw survey codes in place.
    ///
    /// - `agepreg` is divided by 100.
    /// - Birth weight codes 97, 98 and 99 become missing.
    pub fn clean(&mut self) {
        self.agepreg = self.agepreg.map(|age| age / 100.0);
        for weight in [&mut self.birthwgt_lb, &mut self.birthwgt_oz] {
            if weight.is_some_and(|w| WEIGHT_NA_CODES.contains(&w)) {
                *weight = None;
            }
        }
    }

    /// Total birth weight in pounds. Missing if either component is.
    pub fn totalwgt_lb(&self) -> Option<f64> {
        match (self.birthwgt_lb, self.birthwgt_oz) {
            (Some(lb), Some(oz)) => Some(lb + oz / 16.0),
            _ => None,
        }
    }

    pub fn is_live_birth(&self) -> bool {
        self.outcome == LIVE_BIRTH
    }

    pub fn is_first_birth(&self) -> bool {
        self.birthord == Some(1)
    }
}

/// One survey respondent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RespondentRecord {
    pub caseid: u64,
    /// Number of pregnancies the respondent reported.
    pub pregnum: u32,
}

/// Live births split by birth order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveBirths {
    pub live: Vec<PregnancyRecord>,
    pub firsts: Vec<PregnancyRecord>,
    pub others: Vec<PregnancyRecord>,
}

/// Keeps live births and partitions them into first babies and others.
pub fn split_live_births(records: &[PregnancyRecord]) -> LiveBirths {
    let live: Vec<PregnancyRecord> = records
        .iter()
        .filter(|r| r.is_live_birth())
        .cloned()
        .collect();
    let (firsts, others): (Vec<_>, Vec<_>) = live.iter().cloned().partition(|r| r.is_first_birth());
    LiveBirths {
        live,
        firsts,
        others,
    }
}

/// Known total birth weights, in record order. Records with a missing
/// component are skipped.
pub fn total_weights(records: &[PregnancyRecord]) -> Vec<f64> {
    records.iter().filter_map(PregnancyRecord::totalwgt_lb).collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::preg;
    use super::*;

    #[test]
    fn test_clean_converts_age_and_weight_codes() {
        let mut r = preg(1, 39.0, LIVE_BIRTH, Some(1));
        r.agepreg = Some(3316.0);
        r.birthwgt_lb = Some(8.0);
        r.birthwgt_oz = Some(99.0);
        r.clean();
        assert_eq!(r.agepreg, Some(33.16));
        assert_eq!(r.birthwgt_lb, Some(8.0));
        assert_eq!(r.birthwgt_oz, None);
        assert_eq!(r.totalwgt_lb(), None);
    }

    #[test]
    fn test_totalwgt_missing_ounces_is_missing() {
        let mut r = preg(1, 39.0, LIVE_BIRTH, Some(1));
        r.birthwgt_lb = Some(8.0);
        assert_eq!(r.totalwgt_lb(), None);
        r.birthwgt_oz = Some(0.0);
        assert_eq!(r.totalwgt_lb(), Some(8.0));
    }

    #[test]
    fn test_total_weights_skips_missing() {
        let weighed = |caseid, lb, oz| PregnancyRecord {
            birthwgt_lb: lb,
            birthwgt_oz: oz,
            ..preg(caseid, 39.0, LIVE_BIRTH, Some(1))
        };
        let records = vec![
            weighed(1, Some(7.0), Some(8.0)),
            weighed(2, Some(6.0), None),
            weighed(3, None, Some(4.0)),
            weighed(4, Some(9.0), Some(4.0)),
        ];
        assert_eq!(total_weights(&records), vec![7.5, 9.25]);
        assert!(total_weights(&[]).is_empty());
    }

    #[test]
    fn test_totalwgt() {
        let mut r = preg(1, 39.0, LIVE_BIRTH, Some(1));
        r.birthwgt_lb = Some(7.0);
        r.birthwgt_oz = Some(8.0);
        assert_eq!(r.totalwgt_lb(), Some(7.5));

        r.birthwgt_lb = Some(98.0);
        r.clean();
        assert_eq!(r.totalwgt_lb(), None);
    }

    #[test]
    fn test_split_live_births() {
        let records = vec![
            preg(1, 39.0, LIVE_BIRTH, Some(1)),
            preg(1, 40.0, LIVE_BIRTH, Some(2)),
            preg(2, 12.0, 4, None),
            preg(3, 38.0, LIVE_BIRTH, Some(1)),
        ];
        let births = split_live_births(&records);
        assert_eq!(births.live.len(), 3);
        assert_eq!(
            births.firsts.iter().map(|r| r.caseid).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(births.others.len(), 1);
        assert_eq!(births.others[0].prglngth, 40.0);
    }
}
