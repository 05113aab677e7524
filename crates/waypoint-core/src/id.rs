//! Strongly-typed pipeline step identifiers.
//!
//! The manifest itself keys steps by free-form strings; `StepId` is the typed
//! view used by the dependency table and anything that reasons about stage
//! order. It renders as `stepN` and parses back from the same form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd)]
#[serde(try_from = "String", into = "String")]
pub struct StepId(u16);

impl StepId {
    pub const fn new(v: u16) -> Self {
        Self(v)
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step{}", self.0)
    }
}

impl FromStr for StepId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("step")
            .ok_or_else(|| Error::InvalidStepName(s.to_string()))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidStepName(s.to_string()));
        }
        // `step018` is not `step18`: names must round-trip through Display
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(Error::InvalidStepName(s.to_string()));
        }
        digits
            .parse::<u16>()
            .map(StepId)
            .map_err(|_| Error::InvalidStepName(s.to_string()))
    }
}

impl TryFrom<String> for StepId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<StepId> for String {
    fn from(id: StepId) -> Self {
        id.to_string()
    }
}
