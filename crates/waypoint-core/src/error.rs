use thiserror::Error;

/// Canonical result for the manifest crates.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no dependency declared for {step}.{input}")]
    DependencyNotDeclared { step: String, input: String },

    #[error("source step '{producer}' not found in manifest (needed by {step}.{input})")]
    SourceStepMissing {
        step: String,
        input: String,
        producer: String,
    },

    #[error("source step '{producer}' has no registered outputs")]
    SourceStepHasNoOutputs { producer: String },

    #[error("output '{output}' not registered by step '{producer}'")]
    SourceOutputMissing { producer: String, output: String },

    #[error("file does not exist: {path}")]
    FileDeleted { path: String },

    #[error("forbidden combined file: {path}")]
    ForbiddenPath { path: String },

    #[error("invalid period label '{0}' (expected YYYYMM followed by A or B)")]
    InvalidPeriodLabel(String),

    #[error("invalid step name '{0}' (expected stepN)")]
    InvalidStepName(String),

    #[error("invalid dependency reference '{0}' (expected stepN:output_key)")]
    InvalidDependency(String),

    // The core crate does not do I/O, but the storage layer maps its
    // filesystem errors into this variant.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// True for the "declared input has not been produced (or was removed)"
    /// family, as opposed to configuration or lineage errors.
    pub fn is_missing_data(&self) -> bool {
        matches!(
            self,
            Error::SourceStepMissing { .. }
                | Error::SourceStepHasNoOutputs { .. }
                | Error::SourceOutputMissing { .. }
                | Error::FileDeleted { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
