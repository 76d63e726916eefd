//! Error types for stitching.

use seam_compile::{CompileError, LayoutError};
use thiserror::Error;

/// Errors that can occur while composing compiled fragments.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StitchError {
    /// Permutation or layout arithmetic failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Operand widths are incompatible.
    #[error("{operation}: needs {required} qubits but only {available} are available")]
    DimensionMismatch {
        operation: &'static str,
        required: u32,
        available: u32,
    },

    /// An instruction that has no inverse was met while reversing.
    #[error("Instruction '{name}' at index {index} has no inverse")]
    NonInvertibleOperation { name: String, index: usize },

    /// The device compiler could not compile a fragment.
    #[error("Compilation infeasible: {0}")]
    CompilationInfeasible(#[source] CompileError),

    /// A chain needs at least one fragment.
    #[error("Cannot stitch an empty chain")]
    EmptyChain,
}

/// Result type for stitching.
pub type StitchResult<T> = Result<T, StitchError>;
