//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors raised while building or transforming fragments.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit operand outside the fragment.
    #[error("Qubit {qubit} out of range for fragment with {num_qubits} qubits (operation: {op})")]
    QubitOutOfRange {
        /// Offending operand.
        qubit: QubitId,
        /// Fragment width.
        num_qubits: u32,
        /// Operation name.
        op: String,
    },

    /// Classical operand outside the fragment.
    #[error("Classical bit {clbit} out of range for fragment with {num_clbits} bits (operation: {op})")]
    ClbitOutOfRange {
        /// Offending operand.
        clbit: ClbitId,
        /// Classical width.
        num_clbits: u32,
        /// Operation name.
        op: String,
    },

    /// The same qubit appears twice in one operation.
    #[error("Duplicate qubit {qubit} in operation {op}")]
    DuplicateQubit {
        /// The repeated qubit.
        qubit: QubitId,
        /// Operation name.
        op: String,
    },

    /// Gate applied to the wrong number of qubits.
    #[error("Gate '{gate}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Gate name.
        gate: String,
        /// Arity of the gate.
        expected: u32,
        /// Operands supplied.
        got: u32,
    },

    /// Measurement with mismatched qubit and classical operand counts.
    #[error("Measurement over {qubits} qubits into {clbits} classical bits")]
    ClbitCountMismatch {
        /// Qubit operands.
        qubits: usize,
        /// Classical operands.
        clbits: usize,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
