//! Qubit layouts of compiled fragments.
//!
//! A [`Layout`] records where a compiled fragment expects each virtual qubit
//! on entry (`place`) and how the device compiler reshuffled wire contents
//! while routing (`route`). The composition of the two, the *full map*, says
//! where each virtual qubit's state sits once the fragment has run; it is the
//! placement hint for whatever runs next.
//!
//! ```
//! use seam_compile::{Layout, Permutation};
//!
//! let route = Permutation::new(vec![0, 2, 1]).unwrap();
//! let layout = Layout::new(vec![1, 0, 2], Some(route), 3).unwrap();
//! assert_eq!(layout.full_map(), &[2, 0, 1]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};
use crate::permutation::{self, Permutation};

/// `[route[place[v]] for v in 0..N]`.
///
/// `place` must be injective. When `route` is given it must be a bijection
/// whose domain covers every placed physical qubit; an absent route is the
/// identity.
pub fn compute_full_map(place: &[u32], route: Option<&[u32]>) -> LayoutResult<Vec<u32>> {
    check_injective(place)?;
    let Some(route) = route else {
        return Ok(place.to_vec());
    };
    permutation::validate(route)?;
    place
        .iter()
        .map(|&p| {
            route.get(p as usize).copied().ok_or_else(|| {
                LayoutError::InvalidLayout(format!(
                    "physical qubit {p} is outside the routing domain 0..{}",
                    route.len()
                ))
            })
        })
        .collect()
}

fn check_injective(place: &[u32]) -> LayoutResult<()> {
    let mut sorted = place.to_vec();
    sorted.sort_unstable();
    if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(LayoutError::InvalidLayout(format!(
            "physical qubit {} is assigned to more than one virtual qubit",
            pair[0]
        )));
    }
    Ok(())
}

/// Placement and routing of one compiled fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LayoutParts", into = "LayoutParts")]
pub struct Layout {
    place: Vec<u32>,
    route: Option<Permutation>,
    full_map: Vec<u32>,
    num_physical: u32,
}

impl Layout {
    /// Validate and build a layout over a device of `num_physical` qubits.
    ///
    /// An identity `route` is kept as given; callers that want the compact
    /// form pass `None`.
    pub fn new(place: Vec<u32>, route: Option<Permutation>, num_physical: u32) -> LayoutResult<Self> {
        if place.len() > num_physical as usize {
            return Err(LayoutError::InvalidLayout(format!(
                "{} virtual qubits do not fit on {num_physical} physical qubits",
                place.len()
            )));
        }
        if let Some(&p) = place.iter().find(|&&p| p >= num_physical) {
            return Err(LayoutError::InvalidLayout(format!(
                "physical qubit {p} is outside the device (0..{num_physical})"
            )));
        }
        if let Some(route) = &route {
            if route.len() != num_physical as usize {
                return Err(LayoutError::InvalidLayout(format!(
                    "routing covers {} positions, device has {num_physical}",
                    route.len()
                )));
            }
        }
        let full_map = compute_full_map(&place, route.as_ref().map(Permutation::as_slice))?;
        Ok(Self {
            place,
            route,
            full_map,
            num_physical,
        })
    }

    /// Virtual qubit `v` on physical qubit `v`, no routing.
    pub fn trivial(num_virtual: u32, num_physical: u32) -> LayoutResult<Self> {
        Self::new(permutation::identity(num_virtual as usize), None, num_physical)
    }

    /// Entry placement, indexed by virtual qubit.
    pub fn place(&self) -> &[u32] {
        &self.place
    }

    /// Routing permutation, `None` when the compiler did not reorder wires.
    pub fn route(&self) -> Option<&Permutation> {
        self.route.as_ref()
    }

    /// Routing permutation materialised over the whole device.
    pub fn routing(&self) -> Permutation {
        self.route
            .clone()
            .unwrap_or_else(|| Permutation::identity(self.num_physical as usize))
    }

    /// Exit position of every virtual qubit.
    pub fn full_map(&self) -> &[u32] {
        &self.full_map
    }

    /// Number of virtual qubits.
    pub fn num_virtual(&self) -> u32 {
        self.place.len() as u32
    }

    /// Number of physical qubits.
    pub fn num_physical(&self) -> u32 {
        self.num_physical
    }

    /// First `n` entries of the full map, as a placement hint for a
    /// fragment of `n` qubits.
    pub fn placement_hint(&self, n: u32) -> LayoutResult<&[u32]> {
        self.full_map.get(..n as usize).ok_or_else(|| {
            LayoutError::InvalidLayout(format!(
                "hint for {n} qubits requested from a layout with {} virtual qubits",
                self.place.len()
            ))
        })
    }
}

/// Serialized form of a [`Layout`]; the full map is recomputed on load.
#[derive(Serialize, Deserialize)]
struct LayoutParts {
    place: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    route: Option<Permutation>,
    num_physical: u32,
}

impl TryFrom<LayoutParts> for Layout {
    type Error = LayoutError;

    fn try_from(parts: LayoutParts) -> LayoutResult<Self> {
        Layout::new(parts.place, parts.route, parts.num_physical)
    }
}

impl From<Layout> for LayoutParts {
    fn from(layout: Layout) -> Self {
        LayoutParts {
            place: layout.place,
            route: layout.route,
            num_physical: layout.num_physical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_full_map_scenario() {
        let full = compute_full_map(&[1, 0, 2], Some(&[0, 2, 1])).unwrap();
        assert_eq!(full, vec![2, 0, 1]);
    }

    #[test]
    fn test_full_map_without_route_is_place() {
        assert_eq!(compute_full_map(&[3, 1], None).unwrap(), vec![3, 1]);
    }

    #[test]
    fn test_trivial_layout_identity_law() {
        let layout = Layout::trivial(3, 5).unwrap();
        assert_eq!(layout.full_map(), &[0, 1, 2]);
        assert!(layout.route().is_none());
        assert_eq!(layout.routing().as_slice(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_rejects_non_injective_place() {
        assert!(matches!(
            compute_full_map(&[1, 1], None),
            Err(LayoutError::InvalidLayout(_))
        ));
        assert!(matches!(
            Layout::new(vec![0, 2, 0], None, 3),
            Err(LayoutError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_rejects_domain_mismatch() {
        assert!(matches!(
            compute_full_map(&[0, 3], Some(&[1, 0])),
            Err(LayoutError::InvalidLayout(_))
        ));
        assert!(matches!(
            compute_full_map(&[0, 1], Some(&[1, 1])),
            Err(LayoutError::MalformedPermutation(_))
        ));
        let route = Permutation::new(vec![1, 0]).unwrap();
        assert!(Layout::new(vec![0], Some(route), 3).is_err());
        assert!(Layout::new(vec![4], None, 3).is_err());
        assert!(Layout::new(vec![0, 1, 2], None, 2).is_err());
    }

    #[test]
    fn test_placement_hint() {
        let route = Permutation::new(vec![1, 0, 2, 3]).unwrap();
        let layout = Layout::new(vec![0, 1, 2], Some(route), 4).unwrap();
        assert_eq!(layout.placement_hint(2).unwrap(), &[1, 0]);
        assert!(layout.placement_hint(4).is_err());
    }

    #[test]
    fn test_serde_recomputes_full_map() {
        let route = Permutation::new(vec![0, 2, 1]).unwrap();
        let layout = Layout::new(vec![1, 0, 2], Some(route), 3).unwrap();
        let json = serde_json::to_string(&layout).unwrap();
        assert!(!json.contains("full_map"));
        let back: Layout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);

        let bad = r#"{"place":[0,0],"num_physical":2}"#;
        assert!(serde_json::from_str::<Layout>(bad).is_err());
    }

    fn arb_layout() -> impl Strategy<Value = (Vec<u32>, Vec<u32>)> {
        (1_u32..=8).prop_flat_map(|d| {
            let wires: Vec<u32> = (0..d).collect();
            (1..=d).prop_flat_map(move |n| {
                (
                    Just(wires.clone())
                        .prop_shuffle()
                        .prop_map(move |w| w[..n as usize].to_vec()),
                    Just(wires.clone()).prop_shuffle(),
                )
            })
        })
    }

    proptest! {
        #[test]
        fn full_map_composition_law((place, route) in arb_layout()) {
            let d = route.len() as u32;
            let layout = Layout::new(place.clone(), Some(Permutation::new(route.clone()).unwrap()), d).unwrap();
            for (v, &p) in place.iter().enumerate() {
                prop_assert_eq!(layout.full_map()[v], route[p as usize]);
            }
        }
    }
}
