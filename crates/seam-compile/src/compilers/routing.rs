//! Placement and greedy SWAP routing onto a coupling map.

use seam_ir::{Fragment, Instruction, InstructionKind, QubitId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::compiler::{CompiledFragment, DeviceCompiler};
use crate::compilers::initial_placement;
use crate::coupling::CouplingMap;
use crate::error::{CompileError, CompileResult};
use crate::layout::Layout;
use crate::permutation::{self, Permutation};

/// Knobs for [`RoutingCompiler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingOptions {
    /// Give up once a single compile needs more SWAPs than this.
    pub max_swaps: Option<usize>,
    /// Report an identity routing as an absent route.
    pub elide_identity_route: bool,
}

impl Default for RoutingOptions {
    fn default() -> Self {
        Self {
            max_swaps: None,
            elide_identity_route: true,
        }
    }
}

/// Places a fragment on a device and makes every multi-qubit gate act on
/// coupled qubits.
///
/// Before each two-qubit gate whose operands are not adjacent, the first
/// operand is walked along the shortest path towards the second with SWAPs,
/// stopping one edge short. Three-qubit gates are never routed; their
/// operands must already be pairwise coupled.
#[derive(Debug, Clone)]
pub struct RoutingCompiler {
    coupling_map: CouplingMap,
    options: RoutingOptions,
}

impl RoutingCompiler {
    pub fn new(coupling_map: CouplingMap) -> Self {
        Self::with_options(coupling_map, RoutingOptions::default())
    }

    pub fn with_options(coupling_map: CouplingMap, options: RoutingOptions) -> Self {
        Self {
            coupling_map,
            options,
        }
    }

    pub fn coupling_map(&self) -> &CouplingMap {
        &self.coupling_map
    }

    pub fn options(&self) -> &RoutingOptions {
        &self.options
    }
}

/// Where the content that started on each wire currently is.
struct WireTracker {
    /// `location[start] = current wire`.
    location: Vec<u32>,
    /// `occupant[wire] = start wire of its content`.
    occupant: Vec<u32>,
}

impl WireTracker {
    fn new(num_wires: u32) -> Self {
        Self {
            location: permutation::identity(num_wires as usize),
            occupant: permutation::identity(num_wires as usize),
        }
    }

    fn swap(&mut self, a: u32, b: u32) {
        let (sa, sb) = (self.occupant[a as usize], self.occupant[b as usize]);
        self.occupant.swap(a as usize, b as usize);
        self.location[sa as usize] = b;
        self.location[sb as usize] = a;
    }

    fn wire_of(&self, start: u32) -> u32 {
        self.location[start as usize]
    }
}

/// Operations whose operands need coupled qubits.
fn is_interaction(inst: &Instruction) -> bool {
    matches!(
        inst.kind,
        InstructionKind::Gate(_) | InstructionKind::Opaque { .. }
    ) && inst.qubits.len() >= 2
}

impl DeviceCompiler for RoutingCompiler {
    fn name(&self) -> &str {
        "routing"
    }

    #[instrument(skip(self, fragment, hint), fields(fragment = fragment.name(), num_qubits = fragment.num_qubits()))]
    fn compile(&self, fragment: &Fragment, hint: Option<&[u32]>) -> CompileResult<CompiledFragment> {
        let num_wires = self.coupling_map.num_qubits();
        if fragment.num_qubits() > num_wires {
            return Err(CompileError::CircuitTooLarge {
                required: fragment.num_qubits(),
                available: num_wires,
            });
        }

        let place = initial_placement(fragment.num_qubits(), hint, Some(num_wires))?;
        debug!(?place, "initial placement");

        let mut tracker = WireTracker::new(num_wires);
        let mut out = Fragment::with_size(fragment.name(), num_wires, fragment.num_clbits());
        let mut swaps = 0_usize;

        for inst in fragment.ops() {
            if is_interaction(inst) {
                let wires: Vec<u32> = inst
                    .qubits
                    .iter()
                    .map(|q| tracker.wire_of(place[q.index()]))
                    .collect();
                match wires.as_slice() {
                    &[a, b] if !self.coupling_map.is_connected(a, b) => {
                        let path = self
                            .coupling_map
                            .shortest_path(a, b)
                            .ok_or(CompileError::RoutingFailed { qubit1: a, qubit2: b })?;
                        for hop in path.windows(2).take(path.len().saturating_sub(2)) {
                            out.swap(QubitId(hop[0]), QubitId(hop[1]))?;
                            tracker.swap(hop[0], hop[1]);
                            swaps += 1;
                            if let Some(budget) = self.options.max_swaps {
                                if swaps > budget {
                                    return Err(CompileError::SwapBudgetExceeded { budget });
                                }
                            }
                        }
                        debug!(from = a, to = b, hops = path.len() - 1, "inserted swaps");
                    }
                    &[_, _] => {}
                    &[a, b, c] => {
                        let coupled = self.coupling_map.is_connected(a, b)
                            && self.coupling_map.is_connected(b, c)
                            && self.coupling_map.is_connected(a, c);
                        if !coupled {
                            return Err(CompileError::UnroutableGate {
                                gate: inst.name().to_string(),
                                num_qubits: 3,
                            });
                        }
                    }
                    _ => {
                        return Err(CompileError::UnroutableGate {
                            gate: inst.name().to_string(),
                            num_qubits: wires.len(),
                        });
                    }
                }
            }

            let current: Vec<u32> = place.iter().map(|&p| tracker.wire_of(p)).collect();
            out.push(inst.remap_qubits(&current))?;
        }

        let route = Permutation::new(tracker.location)?;
        let route = if self.options.elide_identity_route && route.is_identity() {
            None
        } else {
            Some(route)
        };
        debug!(swaps, routed = route.is_some(), "routing complete");

        let layout = Layout::new(place, route, num_wires)?;
        Ok(CompiledFragment::new(out, Some(layout)))
    }
}
