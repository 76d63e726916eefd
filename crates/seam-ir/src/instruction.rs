//! Instructions: an operation together with its operands.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::gate::StandardGate;
use crate::parameter::ParameterExpression;
use crate::qubit::{ClbitId, QubitId};

/// The operation performed by an instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A unitary gate from the standard set.
    Gate(StandardGate),
    /// An opaque operation known only by name, e.g. a pulse-level macro.
    /// Opaque operations have no inverse.
    Opaque {
        /// Operation name.
        name: String,
        /// Parameters, possibly symbolic.
        params: Vec<ParameterExpression>,
    },
    /// Measurement into classical bits.
    Measure,
    /// Reset to |0⟩.
    Reset,
    /// Scheduling barrier.
    Barrier,
    /// Idle for a device-specific duration.
    Delay {
        /// Duration in device units.
        duration: u64,
    },
}

/// An operation applied to concrete qubits and classical bits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The operation.
    pub kind: InstructionKind,
    /// Qubit operands, in gate order.
    pub qubits: Vec<QubitId>,
    /// Classical operands.
    pub clbits: Vec<ClbitId>,
    /// Optional user label (barrier labels, gate tags).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
}

impl Instruction {
    /// A gate on the given qubits.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
            label: None,
        }
    }

    /// An opaque, non-invertible operation.
    pub fn opaque(
        name: impl Into<String>,
        params: Vec<ParameterExpression>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> Self {
        Self {
            kind: InstructionKind::Opaque {
                name: name.into(),
                params,
            },
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
            label: None,
        }
    }

    /// Measure `qubit` into `clbit`.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
            label: None,
        }
    }

    /// Reset `qubit`.
    pub fn reset(qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: vec![qubit],
            clbits: vec![],
            label: None,
        }
    }

    /// Barrier across `qubits`.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
            label: None,
        }
    }

    /// Delay on a single qubit.
    pub fn delay(qubit: QubitId, duration: u64) -> Self {
        Self {
            kind: InstructionKind::Delay { duration },
            qubits: vec![qubit],
            clbits: vec![],
            label: None,
        }
    }

    /// Attach a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Operation mnemonic.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Opaque { name, .. } => name,
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
            InstructionKind::Delay { .. } => "delay",
        }
    }

    /// The gate, if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&StandardGate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// True for measurements.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// True if any parameter of the operation contains a free symbol.
    pub fn is_parameterized(&self) -> bool {
        match &self.kind {
            InstructionKind::Gate(g) => g.is_parameterized(),
            InstructionKind::Opaque { params, .. } => params.iter().any(|p| p.is_symbolic()),
            _ => false,
        }
    }

    /// The inverse instruction on the same operands, or `None` when the
    /// operation is not unitary (measure, reset, opaque).
    ///
    /// Barriers and delays invert to themselves.
    pub fn inverse(&self) -> Option<Instruction> {
        let kind = match &self.kind {
            InstructionKind::Gate(g) => InstructionKind::Gate(g.inverse()?),
            InstructionKind::Barrier | InstructionKind::Delay { .. } => self.kind.clone(),
            InstructionKind::Opaque { .. } | InstructionKind::Measure | InstructionKind::Reset => {
                return None;
            }
        };
        Some(Instruction {
            kind,
            qubits: self.qubits.clone(),
            clbits: self.clbits.clone(),
            label: self.label.clone(),
        })
    }

    /// Substitute symbol values in every parameter.
    pub fn bind_all(&self, values: &FxHashMap<String, f64>) -> Instruction {
        let kind = match &self.kind {
            InstructionKind::Gate(g) => InstructionKind::Gate(g.map_parameters(|p| p.bind_all(values))),
            InstructionKind::Opaque { name, params } => InstructionKind::Opaque {
                name: name.clone(),
                params: params.iter().map(|p| p.bind_all(values)).collect(),
            },
            other => other.clone(),
        };
        Instruction {
            kind,
            qubits: self.qubits.clone(),
            clbits: self.clbits.clone(),
            label: self.label.clone(),
        }
    }

    /// Relabel qubit operands through `map` (`new = map[old]`).
    ///
    /// The caller guarantees every operand indexes into `map`.
    pub fn remap_qubits(&self, map: &[u32]) -> Instruction {
        Instruction {
            kind: self.kind.clone(),
            qubits: self.qubits.iter().map(|q| QubitId(map[q.index()])).collect(),
            clbits: self.clbits.clone(),
            label: self.label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_and_reset_have_no_inverse() {
        assert!(Instruction::measure(QubitId(0), ClbitId(0)).inverse().is_none());
        assert!(Instruction::reset(QubitId(0)).inverse().is_none());
        assert!(
            Instruction::opaque("pulse", vec![], [QubitId(0)])
                .inverse()
                .is_none()
        );
    }

    #[test]
    fn test_barrier_inverts_to_itself() {
        let barrier = Instruction::barrier([QubitId(0), QubitId(1)]).with_label("block");
        assert_eq!(barrier.inverse(), Some(barrier));
    }

    #[test]
    fn test_gate_inverse_keeps_operands() {
        let inst = Instruction::gate(StandardGate::S, [QubitId(2)]);
        let inv = inst.inverse().unwrap();
        assert_eq!(inv.as_gate(), Some(&StandardGate::Sdg));
        assert_eq!(inv.qubits, vec![QubitId(2)]);
    }

    #[test]
    fn test_parameterized_and_bind() {
        let inst = Instruction::gate(
            StandardGate::Rz(ParameterExpression::symbol("theta")),
            [QubitId(0)],
        );
        assert!(inst.is_parameterized());

        let mut values = FxHashMap::default();
        values.insert("theta".to_string(), 0.5);
        let bound = inst.bind_all(&values);
        assert!(!bound.is_parameterized());
        assert_eq!(
            bound.as_gate(),
            Some(&StandardGate::Rz(ParameterExpression::Constant(0.5)))
        );
    }

    #[test]
    fn test_remap_qubits() {
        let inst = Instruction::gate(StandardGate::CX, [QubitId(0), QubitId(1)]);
        let remapped = inst.remap_qubits(&[3, 1]);
        assert_eq!(remapped.qubits, vec![QubitId(3), QubitId(1)]);
    }
}
