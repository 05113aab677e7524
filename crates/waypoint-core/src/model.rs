//! Manifest records as persisted on disk.
//!
//! Layout:
//! ```json
//! { "created": "...", "last_updated": "...", "current_session": "20250910_123456",
//!   "steps": { "step17": { "outputs": { "augmented_recommendations": {
//!       "file_path": "...", "created": "...", "exists": true, "size_mb": 1.23,
//!       "metadata": {} } } } } }
//! ```
//!
//! Maps are ordered so an unchanged manifest re-serializes identically. Fields
//! this crate doesn't know about are carried through untouched. Decoding is
//! tolerant: any document that parses as a JSON object loads, with mistyped
//! fields defaulted and non-object steps/outputs kept raw.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::clock;
use crate::lenient::{self, Merged};

/// Free-form caller metadata attached to an output.
pub type Metadata = serde_json::Map<String, Value>;

/// Metadata key inspected by period-aware lookups.
pub const PERIOD_LABEL_KEY: &str = "period_label";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawManifest")]
pub struct Manifest {
    pub created: String,
    pub last_updated: String,
    pub current_session: String,
    pub steps: BTreeMap<String, StepRecord>,
    /// Step values that aren't objects, written back as read.
    pub unrecognized_steps: Metadata,
    pub extra: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawStepRecord")]
pub struct StepRecord {
    pub outputs: BTreeMap<String, OutputEntry>,
    /// Output values that aren't objects, written back as read.
    pub unrecognized: Metadata,
    pub extra: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEntry {
    /// Empty when the writer left it out; such entries never resolve.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub file_path: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub created: String,
    /// Snapshot taken at registration; may be stale.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub exists: bool,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub size_mb: f64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub metadata: Metadata,
    #[serde(flatten)]
    pub extra: Metadata,
}

#[derive(Deserialize)]
struct RawManifest {
    #[serde(default, deserialize_with = "lenient::or_default")]
    created: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    last_updated: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    current_session: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    steps: Metadata,
    #[serde(flatten)]
    extra: Metadata,
}

impl From<RawManifest> for Manifest {
    fn from(raw: RawManifest) -> Self {
        let (steps, unrecognized_steps) = lenient::split_typed(raw.steps);
        Self {
            created: raw.created,
            last_updated: raw.last_updated,
            current_session: raw.current_session,
            steps,
            unrecognized_steps,
            extra: raw.extra,
        }
    }
}

#[derive(Deserialize)]
struct RawStepRecord {
    #[serde(default, deserialize_with = "lenient::or_default")]
    outputs: Metadata,
    #[serde(flatten)]
    extra: Metadata,
}

impl From<RawStepRecord> for StepRecord {
    fn from(raw: RawStepRecord) -> Self {
        let (outputs, unrecognized) = lenient::split_typed(raw.outputs);
        Self {
            outputs,
            unrecognized,
            extra: raw.extra,
        }
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("created", &self.created)?;
        map.serialize_entry("last_updated", &self.last_updated)?;
        map.serialize_entry("current_session", &self.current_session)?;
        map.serialize_entry(
            "steps",
            &Merged {
                typed: &self.steps,
                raw: &self.unrecognized_steps,
            },
        )?;
        for (k, v) in &self.extra {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Serialize for StepRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(
            "outputs",
            &Merged {
                typed: &self.outputs,
                raw: &self.unrecognized,
            },
        )?;
        for (k, v) in &self.extra {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Manifest {
    /// Empty manifest stamped with the current time and a fresh session id.
    pub fn new() -> Self {
        let now = clock::now_iso();
        Self {
            created: now.clone(),
            last_updated: now,
            current_session: clock::session_id(),
            steps: BTreeMap::new(),
            unrecognized_steps: Metadata::new(),
            extra: Metadata::new(),
        }
    }

    pub fn touch(&mut self) {
        self.last_updated = clock::now_iso();
    }

    pub fn step(&self, name: &str) -> Option<&StepRecord> {
        self.steps.get(name)
    }

    pub fn output(&self, step: &str, key: &str) -> Option<&OutputEntry> {
        self.steps.get(step).and_then(|s| s.outputs.get(key))
    }

    /// Insert or replace an output, creating the step record if needed.
    /// Returns the entry previously stored under the key.
    pub fn insert_output(
        &mut self,
        step: &str,
        key: &str,
        entry: OutputEntry,
    ) -> Option<OutputEntry> {
        self.unrecognized_steps.remove(step);
        let record = self.steps.entry(step.to_string()).or_default();
        record.unrecognized.remove(key);
        record.outputs.insert(key.to_string(), entry)
    }

    pub fn total_outputs(&self) -> usize {
        self.steps.values().map(|s| s.outputs.len()).sum()
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputEntry {
    /// New entry stamped now. `size_bytes` is `None` when the file is absent.
    pub fn new(file_path: impl Into<String>, size_bytes: Option<u64>, metadata: Metadata) -> Self {
        Self {
            file_path: file_path.into(),
            created: clock::now_iso(),
            exists: size_bytes.is_some(),
            size_mb: size_bytes.map(bytes_to_mb).unwrap_or(0.0),
            metadata,
            extra: Metadata::new(),
        }
    }

    /// `metadata.period_label`, when present and a string.
    pub fn period_label(&self) -> Option<&str> {
        self.metadata.get(PERIOD_LABEL_KEY).and_then(Value::as_str)
    }

    /// Key ends with `period`, or the recorded period label does.
    pub fn matches_period(&self, key: &str, period: &str) -> bool {
        key.ends_with(period)
            || self
                .period_label()
                .map(|label| label.ends_with(period))
                .unwrap_or(false)
    }
}

/// Megabytes rounded to two decimals.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    (mb * 100.0).round() / 100.0
}
