//! Seam layout-aware circuit stitching
//!
//! Compiling a long circuit for a device is expensive, and most of it rarely
//! changes. This crate compiles fragments independently and joins the results
//! without recompiling what was already compiled, keeping track of where each
//! virtual qubit physically sits at every seam.
//!
//! # Operations
//!
//! - [`stitch_right`]: append a fragment, compiled to start where the central
//!   fragment ends
//! - [`stitch_left`]: prepend a fragment, compiled (via its inverse) to end
//!   where the central fragment starts
//! - [`stitch_chain`]: compile a sequence left to right
//! - [`split`] / [`ParametricFragment`]: recompile only the parameterized
//!   window of a fragment for each new set of angles
//!
//! # Example
//!
//! ```rust
//! use seam_compile::{CouplingMap, RoutingCompiler};
//! use seam_ir::{Fragment, QubitId};
//! use seam_stitch::stitch_chain;
//!
//! let mut a = Fragment::with_size("a", 3, 0);
//! a.cx(QubitId(0), QubitId(2)).unwrap();
//! let mut b = Fragment::with_size("b", 2, 0);
//! b.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let compiler = RoutingCompiler::new(CouplingMap::linear(3));
//! let composite = stitch_chain(&[a, b], &compiler).unwrap();
//!
//! // `b` was compiled to start where `a` left virtual qubits 0 and 1.
//! assert_eq!(composite.full_map(), vec![1, 0, 2]);
//! ```

pub mod error;
pub mod recompile;
pub mod reverse;
pub mod split;
pub mod stitch;

pub use error::{StitchError, StitchResult};
pub use recompile::ParametricFragment;
pub use reverse::{reverse, reverse_compiled};
pub use split::{SplitFragment, split};
pub use stitch::{stitch_chain, stitch_left, stitch_right};
