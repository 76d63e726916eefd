//! The device compiler contract.

use seam_ir::Fragment;
use serde::{Deserialize, Serialize};

use crate::error::{CompileResult, LayoutError, LayoutResult};
use crate::layout::Layout;
use crate::permutation;

/// A fragment together with the layout its compiler chose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledFragment {
    /// Compiled instructions, on physical qubit indices when a layout exists.
    pub circuit: Fragment,
    /// Absent when no device was involved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
}

impl CompiledFragment {
    pub fn new(circuit: Fragment, layout: Option<Layout>) -> Self {
        Self { circuit, layout }
    }

    /// A fragment that went through no device targeting.
    pub fn unplaced(circuit: Fragment) -> Self {
        Self {
            circuit,
            layout: None,
        }
    }

    /// Number of virtual qubits the layout accounts for.
    pub fn num_virtual(&self) -> u32 {
        self.layout
            .as_ref()
            .map_or(self.circuit.num_qubits(), Layout::num_virtual)
    }

    /// Number of wires the compiled circuit occupies.
    pub fn num_physical(&self) -> u32 {
        self.layout.as_ref().map_or(self.circuit.num_qubits(), |l| {
            l.num_physical().max(self.circuit.num_qubits())
        })
    }

    /// Entry placement; the identity when there is no layout.
    pub fn place(&self) -> Vec<u32> {
        match &self.layout {
            Some(layout) => layout.place().to_vec(),
            None => permutation::identity(self.num_virtual() as usize),
        }
    }

    /// Where the first `n` virtual qubits end up, as a placement hint for
    /// the fragment that runs next.
    pub fn placement_hint(&self, n: u32) -> LayoutResult<Vec<u32>> {
        match &self.layout {
            Some(layout) => Ok(layout.placement_hint(n)?.to_vec()),
            None if n <= self.num_virtual() => Ok(permutation::identity(n as usize)),
            None => Err(LayoutError::InvalidLayout(format!(
                "hint for {n} qubits requested from a fragment with {} qubits",
                self.num_virtual()
            ))),
        }
    }

    /// Exit position of every virtual qubit; the identity when there is no
    /// layout.
    pub fn full_map(&self) -> Vec<u32> {
        match &self.layout {
            Some(layout) => layout.full_map().to_vec(),
            None => permutation::identity(self.num_virtual() as usize),
        }
    }
}

/// Compiles a fragment for some target, honouring an optional placement hint.
///
/// When `hint` is given, the returned layout must place virtual qubit `v` on
/// physical qubit `hint[v]` for every `v` the hint covers. Implementations
/// without a device may return no layout at all.
pub trait DeviceCompiler: Send + Sync {
    /// Name of this compiler, for logs.
    fn name(&self) -> &str;

    /// Compile `fragment`.
    fn compile(&self, fragment: &Fragment, hint: Option<&[u32]>) -> CompileResult<CompiledFragment>;
}

impl<T: DeviceCompiler + ?Sized> DeviceCompiler for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn compile(&self, fragment: &Fragment, hint: Option<&[u32]>) -> CompileResult<CompiledFragment> {
        (**self).compile(fragment, hint)
    }
}
