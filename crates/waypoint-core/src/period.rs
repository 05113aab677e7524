//! Half-month reporting period labels (`202509A`, `202509B`).
//!
//! The business reports twice a month: `A` is the first half, `B` the second.
//! Lookups match labels by suffix, so they stay plain strings in the manifest;
//! this type is for callers that build or validate them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Half {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodLabel {
    year: u16,
    month: u8,
    half: Half,
}

impl PeriodLabel {
    pub fn new(year: u16, month: u8, half: Half) -> Result<Self, Error> {
        if !(1..=12).contains(&month) || !(1000..=9999).contains(&year) {
            return Err(Error::InvalidPeriodLabel(format!(
                "{year:04}{month:02}{half:?}"
            )));
        }
        Ok(Self { year, month, half })
    }

    /// Build from the `target_yyyymm` / `target_period` pair steps record in
    /// their metadata (e.g. `"202509"`, `"A"`).
    pub fn from_parts(yyyymm: &str, half: &str) -> Result<Self, Error> {
        format!("{}{}", yyyymm.trim(), half.trim()).parse()
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn half(&self) -> Half {
        self.half
    }

    /// `YYYYMM` without the half flag.
    pub fn yyyymm(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }

    /// The other half of the same month.
    pub fn sibling(&self) -> Self {
        let half = match self.half {
            Half::A => Half::B,
            Half::B => Half::A,
        };
        Self { half, ..*self }
    }

    /// Period-qualified form of a generic output key (`key_202509A`).
    pub fn qualify(&self, key: &str) -> String {
        format!("{key}_{self}")
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let half = match self.half {
            Half::A => 'A',
            Half::B => 'B',
        };
        write!(f, "{:04}{:02}{}", self.year, self.month, half)
    }
}

impl FromStr for PeriodLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || Error::InvalidPeriodLabel(s.to_string());
        if s.len() != 7 || !s.is_ascii() {
            return Err(bad());
        }
        let (digits, flag) = s.split_at(6);
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let year: u16 = digits[..4].parse().map_err(|_| bad())?;
        let month: u8 = digits[4..].parse().map_err(|_| bad())?;
        let half = match flag {
            "A" => Half::A,
            "B" => Half::B,
            _ => return Err(bad()),
        };
        Self::new(year, month, half).map_err(|_| bad())
    }
}

impl TryFrom<String> for PeriodLabel {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PeriodLabel> for String {
    fn from(p: PeriodLabel) -> Self {
        p.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_labels() {
        let p: PeriodLabel = "202509A".parse().unwrap();
        assert_eq!(p.year(), 2025);
        assert_eq!(p.month(), 9);
        assert_eq!(p.half(), Half::A);
        assert_eq!(p.to_string(), "202509A");
        assert_eq!(p.yyyymm(), "202509");
    }

    #[test]
    fn rejects_bad_labels() {
        for bad in ["202513A", "202500B", "202509C", "202509", "2025-09A", "202509a", "2025091A"] {
            assert!(bad.parse::<PeriodLabel>().is_err(), "{bad}");
        }
    }

    #[test]
    fn from_metadata_parts() {
        let p = PeriodLabel::from_parts("202510", "B").unwrap();
        assert_eq!(p.to_string(), "202510B");
        assert!(PeriodLabel::from_parts("202510", "").is_err());
    }

    #[test]
    fn qualify_and_sibling() {
        let p: PeriodLabel = "202509B".parse().unwrap();
        assert_eq!(p.qualify("detailed_spu_breakdown"), "detailed_spu_breakdown_202509B");
        assert_eq!(p.sibling().to_string(), "202509A");
    }

    #[test]
    fn ordering_is_chronological() {
        let a: PeriodLabel = "202509A".parse().unwrap();
        let b: PeriodLabel = "202509B".parse().unwrap();
        let c: PeriodLabel = "202510A".parse().unwrap();
        assert!(a < b && b < c);
    }
}
