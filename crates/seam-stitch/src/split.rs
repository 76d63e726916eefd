//! Splitting a fragment around its parameterized region.

use std::ops::Range;

use seam_ir::{Fragment, Instruction};
use serde::{Deserialize, Serialize};

/// A fragment cut into three contiguous runs.
///
/// `middle` spans the first through the last parameterized instruction;
/// `left` and `right` are the static prefix and suffix. All three keep the
/// width of the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitFragment {
    pub left: Fragment,
    pub middle: Fragment,
    pub right: Fragment,
    /// Instruction indices of `middle` in the original fragment.
    pub window: Range<usize>,
}

impl SplitFragment {
    /// True if the original fragment had no free parameters.
    pub fn is_static(&self) -> bool {
        self.middle.is_empty()
    }

    /// Glue the three parts back together.
    pub fn rejoin(&self) -> Fragment {
        self.left.concat(&self.middle).concat(&self.right)
    }
}

/// Split `fragment` so that only `middle` carries free parameters.
///
/// Without any parameterized instruction, `left` is the whole fragment and
/// the window is empty at the end.
pub fn split(fragment: &Fragment) -> SplitFragment {
    let ops = fragment.ops();
    let first = ops.iter().position(Instruction::is_parameterized);
    let last = ops.iter().rposition(Instruction::is_parameterized);
    let window = match (first, last) {
        (Some(first), Some(last)) => first..last + 1,
        _ => ops.len()..ops.len(),
    };

    SplitFragment {
        left: fragment.slice(0..window.start),
        middle: fragment.slice(window.clone()),
        right: fragment.slice(window.end..ops.len()),
        window,
    }
}
