//! Partial recompilation of parameterized fragments.
//!
//! Variational workloads run the same fragment many times with different
//! angles. [`ParametricFragment`] splits it once, then for every binding
//! compiles only the parameterized window from scratch and stitches the
//! static prefix and suffix around it.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use seam_compile::{CompiledFragment, DeviceCompiler};
use seam_ir::Fragment;
use tracing::{debug, instrument, warn};

use crate::error::{StitchError, StitchResult};
use crate::split::{SplitFragment, split};
use crate::stitch::{stitch_left, stitch_right};

/// A fragment prepared for repeated bind-and-compile.
#[derive(Debug, Clone)]
pub struct ParametricFragment {
    parts: SplitFragment,
    symbols: BTreeSet<String>,
}

impl ParametricFragment {
    pub fn new(fragment: &Fragment) -> Self {
        Self {
            parts: split(fragment),
            symbols: fragment.symbols(),
        }
    }

    /// The split computed at construction.
    pub fn parts(&self) -> &SplitFragment {
        &self.parts
    }

    /// Free symbols of the fragment.
    pub fn symbols(&self) -> &BTreeSet<String> {
        &self.symbols
    }

    /// Bind `bindings` into the parameterized window, compile it without a
    /// hint, and stitch the static parts on either side.
    ///
    /// Symbols missing from `bindings` stay symbolic. The static prefix is
    /// attached with [`stitch_left`], so a prefix holding a measurement or
    /// reset fails with [`StitchError::NonInvertibleOperation`].
    #[instrument(skip(self, bindings, compiler), fields(window = ?self.parts.window, compiler = compiler.name()))]
    pub fn bind_and_compile(
        &self,
        bindings: &FxHashMap<String, f64>,
        compiler: &dyn DeviceCompiler,
    ) -> StitchResult<CompiledFragment> {
        let unbound: Vec<&String> = self
            .symbols
            .iter()
            .filter(|s| !bindings.contains_key(*s))
            .collect();
        if !unbound.is_empty() {
            warn!(?unbound, "compiling with unbound symbols");
        }

        let SplitFragment {
            left,
            middle,
            right,
            ..
        } = &self.parts;

        if middle.is_empty() {
            debug!("no parameterized window, compiling whole fragment");
            return compiler
                .compile(left, None)
                .map_err(StitchError::CompilationInfeasible);
        }

        let bound = middle.bind_all(bindings);
        let mut composite = compiler
            .compile(&bound, None)
            .map_err(StitchError::CompilationInfeasible)?;
        if !left.is_empty() {
            composite = stitch_left(&composite, left, compiler)?;
        }
        if !right.is_empty() {
            composite = stitch_right(&composite, right, compiler)?;
        }
        Ok(composite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seam_compile::{CouplingMap, RoutingCompiler, VirtualCompiler};
    use seam_ir::QubitId;

    fn ansatz() -> Fragment {
        let mut f = Fragment::with_size("ansatz", 3, 0);
        f.h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(2))
            .unwrap()
            .rz("theta", QubitId(2))
            .unwrap()
            .cx(QubitId(0), QubitId(2))
            .unwrap()
            .h(QubitId(1))
            .unwrap();
        f
    }

    fn bindings(theta: f64) -> FxHashMap<String, f64> {
        let mut map = FxHashMap::default();
        map.insert("theta".to_string(), theta);
        map
    }

    #[test]
    fn test_bind_and_compile_binds_every_symbol() {
        let parametric = ParametricFragment::new(&ansatz());
        assert_eq!(parametric.parts().window, 2..3);
        let compiled = parametric
            .bind_and_compile(&bindings(0.7), &VirtualCompiler)
            .unwrap();
        assert!(!compiled.circuit.is_parameterized());
        assert_eq!(compiled.circuit.len(), 5);
        assert_eq!(compiled.full_map(), vec![0, 1, 2]);
    }

    #[test]
    fn test_bind_and_compile_on_device_keeps_composition_law() {
        let compiler = RoutingCompiler::new(CouplingMap::linear(3));
        let parametric = ParametricFragment::new(&ansatz());
        let compiled = parametric.bind_and_compile(&bindings(0.1), &compiler).unwrap();
        let layout = compiled.layout.as_ref().unwrap();
        let routing = layout.routing();
        for (v, &p) in layout.place().iter().enumerate() {
            assert_eq!(layout.full_map()[v], routing.apply(p));
        }
        assert!(!compiled.circuit.is_parameterized());
    }

    #[test]
    fn test_reset_in_prefix_is_rejected() {
        let mut f = Fragment::with_size("reset_first", 2, 0);
        f.reset(QubitId(0))
            .unwrap()
            .rz("theta", QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();
        let parametric = ParametricFragment::new(&f);
        match parametric.bind_and_compile(&bindings(0.3), &VirtualCompiler) {
            Err(StitchError::NonInvertibleOperation { name, index }) => {
                assert_eq!(name, "reset");
                assert_eq!(index, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_static_fragment_compiles_whole() {
        let mut f = Fragment::with_size("static", 2, 0);
        f.cx(QubitId(0), QubitId(1)).unwrap();
        let parametric = ParametricFragment::new(&f);
        assert!(parametric.symbols().is_empty());
        let compiled = parametric
            .bind_and_compile(&FxHashMap::default(), &VirtualCompiler)
            .unwrap();
        assert_eq!(compiled.circuit, f);
    }
}
