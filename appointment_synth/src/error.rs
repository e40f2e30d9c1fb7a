use std::path::PathBuf;

use datafusion::arrow::error::ArrowError;
use datafusion::error::DataFusionError;
use rand::distributions::WeightedError;

/// Errors raised while building, writing or summarising the dataset.
///
/// Random draws themselves cannot fail; everything here is either a bad
/// parameter caught before sampling starts, or a failure at the output
/// boundary.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("query error: {0}")]
    DataFusion(#[from] DataFusionError),

    #[error("could not parse generator config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("invalid {name} weights: {source}")]
    Weights {
        name: &'static str,
        #[source]
        source: WeightedError,
    },

    #[error("invalid generator config: {0}")]
    Config(String),
}

impl SynthError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
