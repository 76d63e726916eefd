//! Composition of compiled fragments.
//!
//! Every function here takes an already compiled *central* fragment and an
//! uncompiled neighbour, compiles the neighbour so that it meets the central
//! fragment at the right physical qubits, and returns the composite. Neither
//! operand is modified.
//!
//! For a composite `C = X ++ Y`:
//!
//! ```text
//!   place(C)    = entry placement of whichever part runs first
//!   route(C)    = route(Y) ∘ route(X)          (both widened to |C|)
//!   full_map(C) = route(C) ∘ place(C)
//! ```

use seam_compile::{CompiledFragment, DeviceCompiler, Layout, Permutation};
use seam_ir::Fragment;
use tracing::{debug, info, instrument, warn};

use crate::error::{StitchError, StitchResult};
use crate::reverse::{reverse, reverse_compiled};

/// Placement and routing of a compiled fragment, with an absent layout read
/// as the identity.
fn routing_of(compiled: &CompiledFragment, width: u32) -> Permutation {
    compiled
        .layout
        .as_ref()
        .map_or_else(|| Permutation::identity(width as usize), Layout::routing)
        .extended(width as usize)
}

fn composite_width(first: &CompiledFragment, second: &CompiledFragment, ops: &Fragment) -> u32 {
    ops.num_qubits()
        .max(first.num_physical())
        .max(second.num_physical())
}

/// Build the composite layout, storing an identity route as absent.
fn composite_layout(place: Vec<u32>, route: Permutation, width: u32) -> StitchResult<Layout> {
    let route = (!route.is_identity()).then_some(route);
    Ok(Layout::new(place, route, width)?)
}

fn check_width(operation: &'static str, fragment: &Fragment, central: &CompiledFragment) -> StitchResult<()> {
    if fragment.num_qubits() > central.num_virtual() {
        return Err(StitchError::DimensionMismatch {
            operation,
            required: fragment.num_qubits(),
            available: central.num_virtual(),
        });
    }
    Ok(())
}

fn compile_with_hint(
    operation: &'static str,
    compiler: &dyn DeviceCompiler,
    fragment: &Fragment,
    hint: &[u32],
) -> StitchResult<CompiledFragment> {
    let compiled = compiler
        .compile(fragment, Some(hint))
        .map_err(StitchError::CompilationInfeasible)?;

    let place = compiled.place();
    if place.len() < hint.len() {
        return Err(StitchError::DimensionMismatch {
            operation,
            required: hint.len() as u32,
            available: place.len() as u32,
        });
    }
    if place[..hint.len()] != *hint {
        warn!(
            compiler = compiler.name(),
            ?hint,
            placed = ?&place[..hint.len()],
            "compiler did not honour the placement hint"
        );
    }
    Ok(compiled)
}

/// Append `right` after `central`.
///
/// `right` is compiled with the central fragment's full map as its placement
/// hint, so every virtual qubit it shares with `central` starts where
/// `central` left it. The composite keeps `central`'s placement.
#[instrument(
    skip(central, right, compiler),
    fields(central = central.circuit.name(), right = right.name(), compiler = compiler.name())
)]
pub fn stitch_right(
    central: &CompiledFragment,
    right: &Fragment,
    compiler: &dyn DeviceCompiler,
) -> StitchResult<CompiledFragment> {
    check_width("stitch_right", right, central)?;

    let hint = central.placement_hint(right.num_qubits())?;
    debug!(?hint, "compiling right fragment");
    let right_compiled = compile_with_hint("stitch_right", compiler, right, &hint)?;

    let circuit = central.circuit.concat(&right_compiled.circuit);
    if central.layout.is_none() && right_compiled.layout.is_none() {
        return Ok(CompiledFragment::unplaced(circuit));
    }

    let width = composite_width(central, &right_compiled, &circuit);
    let route = routing_of(&right_compiled, width).compose(&routing_of(central, width));
    debug!(route = ?route.as_slice(), "composite route");
    let layout = composite_layout(central.place(), route, width)?;

    info!(ops = circuit.len(), width, "stitched right");
    Ok(CompiledFragment::new(circuit, Some(layout)))
}

/// Prepend `left` before `central`.
///
/// `left` must end where `central` starts, so it is reversed, compiled with
/// `central`'s placement as the hint, and reversed back. Fails if `left`
/// contains an instruction without an inverse. The composite's full map is
/// `central`'s.
#[instrument(
    skip(central, left, compiler),
    fields(central = central.circuit.name(), left = left.name(), compiler = compiler.name())
)]
pub fn stitch_left(
    central: &CompiledFragment,
    left: &Fragment,
    compiler: &dyn DeviceCompiler,
) -> StitchResult<CompiledFragment> {
    check_width("stitch_left", left, central)?;

    let central_place = central.place();
    let target = &central_place[..left.num_qubits() as usize];
    let reversed = reverse(left)?;
    debug!(?target, "compiling reversed left fragment");
    let reversed_compiled = compile_with_hint("stitch_left", compiler, &reversed, target)?;
    let left_compiled = reverse_compiled(&reversed_compiled)?;

    let circuit = left_compiled
        .circuit
        .concat(&central.circuit)
        .renamed(central.circuit.name());
    if central.layout.is_none() && left_compiled.layout.is_none() {
        return Ok(CompiledFragment::unplaced(circuit));
    }

    let width = composite_width(&left_compiled, central, &circuit);
    let left_route = routing_of(&left_compiled, width);
    let unroute = left_route.inverse();
    let place: Vec<u32> = central_place.iter().map(|&p| unroute.apply(p)).collect();
    let route = routing_of(central, width).compose(&left_route);
    debug!(?place, route = ?route.as_slice(), "composite layout");
    let layout = composite_layout(place, route, width)?;

    info!(ops = circuit.len(), width, "stitched left");
    Ok(CompiledFragment::new(circuit, Some(layout)))
}

/// Compile `fragments[0]` on its own and append the rest in order.
///
/// Only the running full map is fed forward; the composite keeps the first
/// fragment's placement throughout.
#[instrument(skip(fragments, compiler), fields(len = fragments.len(), compiler = compiler.name()))]
pub fn stitch_chain(fragments: &[Fragment], compiler: &dyn DeviceCompiler) -> StitchResult<CompiledFragment> {
    let (first, rest) = fragments.split_first().ok_or(StitchError::EmptyChain)?;
    let mut composite = compiler
        .compile(first, None)
        .map_err(StitchError::CompilationInfeasible)?;
    for fragment in rest {
        composite = stitch_right(&composite, fragment, compiler)?;
    }
    info!(
        fragments = fragments.len(),
        ops = composite.circuit.len(),
        "chain stitched"
    );
    Ok(composite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seam_compile::{CompileResult, CouplingMap, RoutingCompiler, VirtualCompiler};
    use seam_ir::{ClbitId, QubitId};

    /// Ignores the hint: places on the identity, or on a single qubit only.
    struct HintIgnoring {
        truncate: bool,
    }

    impl DeviceCompiler for HintIgnoring {
        fn name(&self) -> &str {
            "hint-ignoring"
        }

        fn compile(&self, fragment: &Fragment, _hint: Option<&[u32]>) -> CompileResult<CompiledFragment> {
            let n = fragment.num_qubits();
            let layout = if self.truncate {
                Layout::new(vec![0], None, n)?
            } else {
                Layout::trivial(n, n)?
            };
            Ok(CompiledFragment::new(fragment.clone(), Some(layout)))
        }
    }

    fn swapped_central() -> CompiledFragment {
        let route = Permutation::new(vec![1, 0, 2, 3]).unwrap();
        let layout = Layout::new(vec![0, 1, 2, 3], Some(route), 4).unwrap();
        CompiledFragment::new(Fragment::with_size("a", 4, 0), Some(layout))
    }

    fn assert_composition_law(compiled: &CompiledFragment) {
        if let Some(layout) = &compiled.layout {
            let routing = layout.routing();
            for (v, &p) in layout.place().iter().enumerate() {
                assert_eq!(layout.full_map()[v], routing.apply(p));
            }
        }
    }

    fn cx(n: u32, a: u32, b: u32) -> Fragment {
        let mut f = Fragment::with_size("cx", n, 0);
        f.cx(QubitId(a), QubitId(b)).unwrap();
        f
    }

    #[test]
    fn test_right_stitch_continuity() {
        // Central fragment on 4 qubits whose routing exchanged wires 0 and 1.
        let central = swapped_central();

        let compiler = RoutingCompiler::new(CouplingMap::linear(4));
        let composite = stitch_right(&central, &cx(2, 0, 1), &compiler).unwrap();

        let layout = composite.layout.as_ref().unwrap();
        assert_eq!(layout.place(), &[0, 1, 2, 3]);
        assert_eq!(layout.route().unwrap().as_slice(), &[1, 0, 2, 3]);
        assert_eq!(layout.full_map(), &[1, 0, 2, 3]);
        assert_eq!(
            composite.circuit.ops()[0].qubits,
            vec![QubitId(1), QubitId(0)]
        );
        assert_composition_law(&composite);
    }

    #[test]
    fn test_right_stitch_composes_routes() {
        let compiler = RoutingCompiler::new(CouplingMap::linear(3));
        let central = compiler.compile(&cx(3, 0, 2), None).unwrap();
        assert_eq!(central.full_map(), vec![1, 0, 2]);

        let composite = stitch_right(&central, &cx(3, 0, 2), &compiler).unwrap();
        // Virtual 0 now sits on wire 1, adjacent to wire 2: no further swap.
        assert_eq!(composite.circuit.len(), 3);
        assert_eq!(composite.full_map(), vec![1, 0, 2]);
        assert_composition_law(&composite);
    }

    #[test]
    fn test_virtual_compiler_keeps_layout_absent() {
        let central = VirtualCompiler.compile(&cx(2, 0, 1), None).unwrap();
        let composite = stitch_right(&central, &cx(2, 1, 0), &VirtualCompiler).unwrap();
        assert_eq!(composite.full_map(), vec![0, 1]);
        assert_eq!(composite.circuit.len(), 2);
        assert_composition_law(&composite);
    }

    #[test]
    fn test_dimension_mismatch() {
        let central = VirtualCompiler.compile(&cx(2, 0, 1), None).unwrap();
        assert!(matches!(
            stitch_right(&central, &cx(3, 0, 2), &VirtualCompiler),
            Err(StitchError::DimensionMismatch { required: 3, available: 2, .. })
        ));
        assert!(matches!(
            stitch_left(&central, &cx(3, 0, 2), &VirtualCompiler),
            Err(StitchError::DimensionMismatch { required: 3, available: 2, .. })
        ));
    }

    #[test]
    fn test_left_stitch_preserves_full_map() {
        let compiler = RoutingCompiler::new(CouplingMap::linear(4));
        let central = compiler.compile(&cx(4, 0, 3), None).unwrap();
        let composite = stitch_left(&central, &cx(3, 0, 2), &compiler).unwrap();

        assert_eq!(composite.full_map(), central.full_map());
        assert_eq!(composite.circuit.name(), "cx");
        assert!(composite.circuit.len() > central.circuit.len());
        assert_composition_law(&composite);
    }

    #[test]
    fn test_left_stitch_rejects_measurement() {
        let central = VirtualCompiler.compile(&cx(2, 0, 1), None).unwrap();
        let mut left = Fragment::with_size("m", 1, 1);
        left.measure(QubitId(0), ClbitId(0)).unwrap();
        assert!(matches!(
            stitch_left(&central, &left, &VirtualCompiler),
            Err(StitchError::NonInvertibleOperation { index: 0, .. })
        ));
    }

    #[test]
    fn test_compiler_failure_is_wrapped() {
        let compiler = RoutingCompiler::new(CouplingMap::linear(2));
        let central = CompiledFragment::unplaced(Fragment::with_size("wide", 3, 0));
        assert!(matches!(
            stitch_right(&central, &cx(3, 0, 2), &compiler),
            Err(StitchError::CompilationInfeasible(_))
        ));
    }

    #[test]
    fn test_short_placement_is_dimension_mismatch() {
        let compiler = HintIgnoring { truncate: true };
        assert!(matches!(
            stitch_right(&swapped_central(), &cx(2, 0, 1), &compiler),
            Err(StitchError::DimensionMismatch {
                operation: "stitch_right",
                required: 2,
                available: 1,
            })
        ));
    }

    #[test]
    fn test_unhonoured_hint_still_stitches() {
        // The hint is [1, 0]; the compiler places on [0, 1] anyway.
        let compiler = HintIgnoring { truncate: false };
        let composite = stitch_right(&swapped_central(), &cx(2, 0, 1), &compiler).unwrap();

        assert_eq!(composite.circuit.len(), 1);
        assert_eq!(composite.place(), vec![0, 1, 2, 3]);
        assert_eq!(composite.full_map(), vec![1, 0, 2, 3]);
        assert_composition_law(&composite);
    }

    #[test]
    fn test_empty_chain() {
        assert!(matches!(
            stitch_chain(&[], &VirtualCompiler),
            Err(StitchError::EmptyChain)
        ));
    }
}
