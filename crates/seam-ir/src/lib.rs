//! Seam circuit fragment representation
//!
//! This crate holds the data that the stitching engine moves around: circuit
//! fragments, their instructions, and the closed gate set those instructions
//! draw from.
//!
//! # Core Components
//!
//! - [`QubitId`], [`ClbitId`]: operand indices
//! - [`ParameterExpression`]: concrete or symbolic gate angles
//! - [`StandardGate`]: the gate set, each gate with an explicit inverse
//! - [`Instruction`]: an operation applied to operands
//! - [`Fragment`]: an ordered instruction list with a fixed width
//!
//! # Example
//!
//! ```rust
//! use seam_ir::{Fragment, QubitId};
//!
//! let mut fragment = Fragment::with_size("ansatz", 2, 0);
//! fragment
//!     .rz("theta", QubitId(0))
//!     .unwrap()
//!     .cx(QubitId(0), QubitId(1))
//!     .unwrap();
//!
//! assert!(fragment.is_parameterized());
//! let bound = fragment.bind("theta", 0.5);
//! assert!(!bound.is_parameterized());
//! ```

pub mod error;
pub mod fragment;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;

pub use error::{IrError, IrResult};
pub use fragment::Fragment;
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use parameter::ParameterExpression;
pub use qubit::{ClbitId, QubitId};
