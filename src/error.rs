use thiserror::Error;

/// Error types for the lmest-rs library.
#[derive(Error, Debug)]
pub enum LmEstError {
    /// An observation's point length disagrees with the function's point dimension.
    #[error("Data point dimension {actual} does not match function dimension {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The initial guess has the wrong number of coefficients.
    #[error("Number of coefficients {actual} does not match function {expected}")]
    CoefficientCountMismatch { expected: usize, actual: usize },

    /// Fewer observations than coefficients were supplied.
    #[error("There are fewer data points ({observations}) than coefficients ({coefficients})")]
    InsufficientData {
        observations: usize,
        coefficients: usize,
    },

    /// Error indicating a singular matrix was encountered.
    #[error("Singular matrix encountered: {0}")]
    SingularMatrix(String),

    /// An observation carries a non-finite value or a non-positive weight.
    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    /// Estimator configuration out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid input to a numerical routine.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error during function evaluation.
    #[error("Function evaluation error: {0}")]
    FunctionEvaluation(String),

    /// The covariance was requested before a successful estimate.
    #[error("Covariance is not available until estimate() has completed successfully")]
    CovarianceUnavailable,

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for lmest-rs operations.
pub type Result<T> = std::result::Result<T, LmEstError>;
