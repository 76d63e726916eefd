//! Seam layouts and device compilation
//!
//! This crate describes where a compiled fragment lives on a device and how
//! fragments get there.
//!
//! # Overview
//!
//! A device compiler takes a [`Fragment`](seam_ir::Fragment) over virtual
//! qubits and returns a [`CompiledFragment`]: the circuit on physical qubits
//! together with a [`Layout`]. The layout pairs an entry placement with the
//! routing permutation the compiler introduced while making gates act on
//! coupled qubits. Their composition, the full map, tells the next fragment
//! where every virtual qubit's state ended up.
//!
//! ```text
//!   virtual v ──place──▶ physical p ──route──▶ physical full_map[v]
//! ```
//!
//! # Example
//!
//! ```rust
//! use seam_compile::{CouplingMap, DeviceCompiler, RoutingCompiler};
//! use seam_ir::{Fragment, QubitId};
//!
//! let mut fragment = Fragment::with_size("far", 3, 0);
//! fragment.cx(QubitId(0), QubitId(2)).unwrap();
//!
//! let compiler = RoutingCompiler::new(CouplingMap::linear(3));
//! let compiled = compiler.compile(&fragment, None).unwrap();
//!
//! // One SWAP moved virtual qubit 0 next to qubit 2.
//! assert_eq!(compiled.full_map(), vec![1, 0, 2]);
//! ```
//!
//! # Components
//!
//! - [`permutation`]: bijection arithmetic on image arrays
//! - [`Layout`]: placement, routing and the derived full map
//! - [`CouplingMap`]: device connectivity with precomputed shortest paths
//! - [`DeviceCompiler`]: the contract the stitching engine compiles through
//! - [`VirtualCompiler`], [`RoutingCompiler`]: reference implementations
//! - [`CompilerConfig`]: YAML / environment driven compiler selection

pub mod compiler;
pub mod compilers;
pub mod config;
pub mod coupling;
pub mod error;
pub mod layout;
pub mod permutation;

pub use compiler::{CompiledFragment, DeviceCompiler};
pub use compilers::{RoutingCompiler, RoutingOptions, VirtualCompiler};
pub use config::{CompilerConfig, ConfigError, DeviceConfig, RoutingConfig, Topology};
pub use coupling::CouplingMap;
pub use error::{CompileError, CompileResult, LayoutError, LayoutResult};
pub use layout::{Layout, compute_full_map};
pub use permutation::{Permutation, compose, invert};
