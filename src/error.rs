use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the library and the `noblefit` binary.
#[derive(Debug, Error)]
pub enum NobleError {
    /// No excess-air model is registered under this name.
    #[error("unknown excess-air model `{0}`")]
    UnknownModel(String),

    /// No equilibrium-concentration method is registered under this name.
    #[error("unknown equilibrium method `{0}`")]
    UnknownMethod(String),

    /// The parameter name is not registered in the parameter set.
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    /// A caller broke a size or value contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An index does not address an element of the collection.
    #[error("index {index} out of range for {what} of length {len}")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("duplicate sample name `{0}`")]
    DuplicateSample(String),

    /// Input data is unusable (schema problems, nothing left to fit).
    #[error("{0}")]
    Data(String),

    /// The fit could not be carried out.
    #[error("fit failed: {0}")]
    Fit(String),

    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NobleError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NobleError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for the binary.
    ///
    /// - 2: bad input or configuration
    /// - 3: no usable data
    /// - 4: computation failure
    pub fn exit_code(&self) -> u8 {
        match self {
            NobleError::UnknownModel(_)
            | NobleError::UnknownMethod(_)
            | NobleError::UnknownParameter(_)
            | NobleError::InvalidArgument(_)
            | NobleError::DuplicateSample(_)
            | NobleError::Io { .. }
            | NobleError::Csv(_)
            | NobleError::Json(_) => 2,
            NobleError::Data(_) => 3,
            NobleError::OutOfRange { .. } | NobleError::Fit(_) => 4,
        }
    }
}

pub type Result<T, E = NobleError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_map_to_input_exit_code() {
        assert_eq!(NobleError::UnknownModel("XX".into()).exit_code(), 2);
        assert_eq!(NobleError::Data("empty".into()).exit_code(), 3);
        assert_eq!(NobleError::Fit("singular".into()).exit_code(), 4);
    }

    #[test]
    fn out_of_range_message_names_the_collection() {
        let err = NobleError::OutOfRange {
            what: "samples",
            index: 7,
            len: 3,
        };
        assert_eq!(err.to_string(), "index 7 out of range for samples of length 3");
    }
}
