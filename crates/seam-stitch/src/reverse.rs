//! Fragment reversal.
//!
//! Reversing a fragment runs its inverse: instruction order flips and every
//! instruction is replaced by its inverse. A compiled fragment reversed this
//! way also swaps the meaning of its layout: the old exit positions become the
//! new entry positions.

use seam_compile::{CompiledFragment, Layout, Permutation};
use seam_ir::Fragment;

use crate::error::{StitchError, StitchResult};

/// The inverse of `fragment`.
///
/// Fails on the first (in original order) instruction without an inverse,
/// such as a measurement or reset.
pub fn reverse(fragment: &Fragment) -> StitchResult<Fragment> {
    let mut inverted = Vec::with_capacity(fragment.len());
    for (index, op) in fragment.ops().iter().enumerate() {
        let inverse = op.inverse().ok_or_else(|| StitchError::NonInvertibleOperation {
            name: op.name().to_string(),
            index,
        })?;
        inverted.push(inverse);
    }
    inverted.reverse();
    Ok(fragment.with_ops(inverted))
}

/// Reverse a compiled fragment and its layout.
///
/// The result enters where the original exited and routes with the inverse
/// permutation, so its full map is the original placement.
pub fn reverse_compiled(compiled: &CompiledFragment) -> StitchResult<CompiledFragment> {
    let circuit = reverse(&compiled.circuit)?;
    let layout = match &compiled.layout {
        None => None,
        Some(layout) => Some(Layout::new(
            layout.full_map().to_vec(),
            layout.route().map(Permutation::inverse),
            layout.num_physical(),
        )?),
    };
    Ok(CompiledFragment::new(circuit, layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use seam_ir::{ClbitId, Instruction, QubitId, StandardGate};

    #[test]
    fn test_reverse_inverts_each_instruction() {
        let mut f = Fragment::with_size("f", 2, 0);
        f.s(QubitId(0))
            .unwrap()
            .rz(0.5, QubitId(1))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();
        let r = reverse(&f).unwrap();
        let names: Vec<&str> = r.ops().iter().map(|op| op.name()).collect();
        assert_eq!(names, vec!["cx", "rz", "sdg"]);
        match r.ops()[1].as_gate() {
            Some(StandardGate::Rz(theta)) => assert_eq!(theta.as_f64(), Some(-0.5)),
            other => panic!("expected rz, got {other:?}"),
        }
        assert_eq!(reverse(&r).unwrap(), f);
    }

    #[test]
    fn test_reverse_reports_first_non_invertible() {
        let mut f = Fragment::with_size("f", 1, 1);
        f.h(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .reset(QubitId(0))
            .unwrap();
        match reverse(&f) {
            Err(StitchError::NonInvertibleOperation { name, index }) => {
                assert_eq!(name, "measure");
                assert_eq!(index, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_barriers_and_delays_survive_reversal() {
        let mut f = Fragment::with_size("f", 2, 0);
        f.x(QubitId(0))
            .unwrap()
            .push(Instruction::delay(QubitId(1), 40))
            .unwrap()
            .barrier_all("cut")
            .unwrap();
        let r = reverse(&f).unwrap();
        let names: Vec<&str> = r.ops().iter().map(|op| op.name()).collect();
        assert_eq!(names, vec!["barrier", "delay", "x"]);
        assert_eq!(r.ops()[0].label.as_deref(), Some("cut"));
        assert_eq!(r.ops()[1], Instruction::delay(QubitId(1), 40));
    }

    #[test]
    fn test_reverse_compiled_swaps_layout_roles() {
        let route = Permutation::new(vec![0, 2, 1]).unwrap();
        let layout = Layout::new(vec![1, 0, 2], Some(route), 3).unwrap();
        let compiled = CompiledFragment::new(Fragment::with_size("f", 3, 0), Some(layout));

        let reversed = reverse_compiled(&compiled).unwrap();
        let rl = reversed.layout.as_ref().unwrap();
        assert_eq!(rl.place(), &[2, 0, 1]);
        assert_eq!(rl.route().unwrap().as_slice(), &[0, 2, 1]);
        assert_eq!(rl.full_map(), &[1, 0, 2]);

        let unplaced = CompiledFragment::unplaced(Fragment::with_size("g", 2, 0));
        assert!(reverse_compiled(&unplaced).unwrap().layout.is_none());
    }
}
