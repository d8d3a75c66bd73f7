/// Crate-wide result alias for differentiation operations.
pub type NumDiffResult<T> = Result<T, NumDiffError>;

#[derive(Debug, Clone, PartialEq)]
pub enum NumDiffError {
    // ---- Algorithm selection ----
    /// Invalid difference algorithm name.
    InvalidAlgorithm {
        name: String,
        reason: &'static str,
    },

    // ---- Options ----
    /// Relative perturbation needs to be positive and finite.
    InvalidEps {
        eps: f64,
        reason: &'static str,
    },

    /// Iteration count needs to be at least 1.
    InvalidIterations {
        iterations: usize,
        reason: &'static str,
    },

    /// Worker count needs to be at least 1.
    InvalidWorkers {
        workers: usize,
        reason: &'static str,
    },
}

impl std::error::Error for NumDiffError {}

impl std::fmt::Display for NumDiffError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Algorithm selection ----
            NumDiffError::InvalidAlgorithm { name, reason } => {
                write!(f, "Invalid difference algorithm '{name}': {reason}")
            }

            // ---- Options ----
            NumDiffError::InvalidEps { eps, reason } => {
                write!(f, "Invalid relative perturbation {eps}: {reason}")
            }
            NumDiffError::InvalidIterations { iterations, reason } => {
                write!(f, "Invalid iteration count {iterations}: {reason}")
            }
            NumDiffError::InvalidWorkers { workers, reason } => {
                write!(f, "Invalid worker count {workers}: {reason}")
            }
        }
    }
}
