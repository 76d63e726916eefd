//! Reference device compilers.
//!
//! - [`VirtualCompiler`]: no device, only relabels qubits onto a hint
//! - [`RoutingCompiler`]: places onto a coupling map and inserts SWAPs

mod routing;
mod unbound;

pub use routing::{RoutingCompiler, RoutingOptions};
pub use unbound::VirtualCompiler;

use crate::error::{CompileError, CompileResult};

/// Placement for `num_virtual` qubits: `hint[v]` where the hint covers `v`,
/// the lowest unused physical index otherwise.
///
/// `capacity` bounds physical indices when the target has a fixed size.
pub(crate) fn initial_placement(
    num_virtual: u32,
    hint: Option<&[u32]>,
    capacity: Option<u32>,
) -> CompileResult<Vec<u32>> {
    let hint = hint.unwrap_or(&[]);
    if hint.len() > num_virtual as usize {
        return Err(CompileError::InvalidHint(format!(
            "hint covers {} qubits but the fragment has {num_virtual}",
            hint.len()
        )));
    }

    let mut place = Vec::with_capacity(num_virtual as usize);
    let mut used = rustc_hash::FxHashSet::default();
    for &p in hint {
        if let Some(cap) = capacity {
            if p >= cap {
                return Err(CompileError::InvalidHint(format!(
                    "physical qubit {p} is outside the target (0..{cap})"
                )));
            }
        }
        if !used.insert(p) {
            return Err(CompileError::InvalidHint(format!(
                "physical qubit {p} is hinted more than once"
            )));
        }
        place.push(p);
    }

    let mut next = 0_u32;
    while place.len() < num_virtual as usize {
        while used.contains(&next) {
            next += 1;
        }
        if let Some(cap) = capacity {
            if next >= cap {
                return Err(CompileError::CircuitTooLarge {
                    required: num_virtual,
                    available: cap,
                });
            }
        }
        used.insert(next);
        place.push(next);
    }
    Ok(place)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unhinted_qubits_take_lowest_free() {
        assert_eq!(initial_placement(3, None, Some(5)).unwrap(), vec![0, 1, 2]);
        assert_eq!(
            initial_placement(4, Some(&[2, 0]), Some(5)).unwrap(),
            vec![2, 0, 1, 3]
        );
        assert_eq!(initial_placement(2, Some(&[7]), None).unwrap(), vec![7, 0]);
    }

    #[test]
    fn test_bad_hints() {
        assert!(matches!(
            initial_placement(2, Some(&[1, 1]), None),
            Err(CompileError::InvalidHint(_))
        ));
        assert!(matches!(
            initial_placement(1, Some(&[0, 1]), None),
            Err(CompileError::InvalidHint(_))
        ));
        assert!(matches!(
            initial_placement(2, Some(&[4]), Some(3)),
            Err(CompileError::InvalidHint(_))
        ));
    }
}
