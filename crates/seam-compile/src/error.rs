//! Error types for layouts and compilation.

use thiserror::Error;

/// Errors from permutation and layout arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LayoutError {
    /// Input is not a bijection over a contiguous `0..D` domain.
    #[error("Malformed permutation: {0}")]
    MalformedPermutation(String),

    /// Placement is not injective, or placement and routing domains disagree.
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors a device compiler can report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] seam_ir::IrError),

    /// Layout arithmetic failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Fragment needs more qubits than the device offers.
    #[error("Fragment requires {required} qubits but target only has {available}")]
    CircuitTooLarge { required: u32, available: u32 },

    /// The placement hint cannot be honoured on this target.
    #[error("Invalid placement hint: {0}")]
    InvalidHint(String),

    /// No path between two physical qubits.
    #[error("Routing failed: qubits {qubit1} and {qubit2} not connected")]
    RoutingFailed { qubit1: u32, qubit2: u32 },

    /// A multi-qubit gate whose operands cannot be made adjacent.
    #[error("Gate '{gate}' on {num_qubits} qubits cannot be routed on this topology")]
    UnroutableGate { gate: String, num_qubits: usize },

    /// Coupling map description is inconsistent.
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// Routing needed more SWAPs than the configured budget.
    #[error("Routing exceeded the swap budget of {budget}")]
    SwapBudgetExceeded { budget: usize },
}

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;
