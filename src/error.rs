use thiserror::Error;

/// Result alias for `semgroup`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the clustering engine and its algorithms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Fewer points than the requested cluster count needs.
    #[error("dataset has {available} points but {required} are required")]
    EmptyDataset {
        /// Points required (usually the requested cluster count).
        required: usize,
        /// Points available.
        available: usize,
    },

    /// Points of unequal length within one dataset.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Points and labels are not index-aligned.
    #[error("{points} points but {labels} labels")]
    LabelCountMismatch {
        /// Number of points.
        points: usize,
        /// Number of labels.
        labels: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Unrecognized algorithm selector.
    #[error("unknown algorithm '{0}' (expected kmeans, hac, dbscan or gmm)")]
    UnknownAlgorithm(String),

    /// Records or groups could not be (de)serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Mixture-model fit produced no usable density for any point.
    #[error("mixture model degenerated: {degenerate_points} points have zero density")]
    NumericInstability {
        /// Points whose density vanished in the final E-step.
        degenerate_points: usize,
    },
}

impl Error {
    pub(crate) fn invalid(name: &'static str, message: &'static str) -> Self {
        Error::InvalidParameter { name, message }
    }
}
