//! Compiler for fragments that never see a device.

use seam_ir::Fragment;
use tracing::debug;

use crate::compiler::{CompiledFragment, DeviceCompiler};
use crate::compilers::initial_placement;
use crate::error::CompileResult;
use crate::layout::Layout;

/// Leaves fragments untouched unless given a hint, in which case it only
/// relabels qubits so that virtual qubit `v` lands on `hint[v]`.
///
/// No routing ever happens, so every layout it returns has an absent route.
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualCompiler;

impl VirtualCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceCompiler for VirtualCompiler {
    fn name(&self) -> &str {
        "virtual"
    }

    fn compile(&self, fragment: &Fragment, hint: Option<&[u32]>) -> CompileResult<CompiledFragment> {
        let Some(hint) = hint else {
            return Ok(CompiledFragment::unplaced(fragment.clone()));
        };

        let place = initial_placement(fragment.num_qubits(), Some(hint), None)?;
        let width = place
            .iter()
            .map(|&p| p + 1)
            .max()
            .unwrap_or(0)
            .max(fragment.num_qubits());
        debug!(fragment = fragment.name(), ?place, width, "relabelling onto hint");

        let circuit = fragment.remap(&place, width)?;
        let layout = Layout::new(place, None, width)?;
        Ok(CompiledFragment::new(circuit, Some(layout)))
    }
}
