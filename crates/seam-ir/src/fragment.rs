//! Circuit fragments.
//!
//! A [`Fragment`] is an ordered list of instructions over a fixed number of
//! qubits and classical bits. Builder methods validate operands as they are
//! appended; every other transform returns a new fragment and leaves the
//! receiver untouched.

use std::collections::BTreeSet;
use std::ops::Range;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::ParameterExpression;
use crate::qubit::{ClbitId, QubitId};

/// An ordered sequence of quantum operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    ops: Vec<Instruction>,
}

impl Fragment {
    /// An empty fragment.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            ops: vec![],
        }
    }

    /// Build a fragment from existing instructions, validating every operand.
    pub fn from_instructions(
        name: impl Into<String>,
        num_qubits: u32,
        num_clbits: u32,
        ops: impl IntoIterator<Item = Instruction>,
    ) -> IrResult<Self> {
        let mut fragment = Self::with_size(name, num_qubits, num_clbits);
        for op in ops {
            fragment.push(op)?;
        }
        Ok(fragment)
    }

    /// Fragment name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits (virtual before compilation, physical after).
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of classical bits.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// The instructions, in execution order.
    pub fn ops(&self) -> &[Instruction] {
        &self.ops
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if the fragment has no instructions.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Append a validated instruction.
    pub fn push(&mut self, inst: Instruction) -> IrResult<&mut Self> {
        self.validate(&inst)?;
        self.ops.push(inst);
        Ok(self)
    }

    fn validate(&self, inst: &Instruction) -> IrResult<()> {
        if let InstructionKind::Gate(gate) = &inst.kind {
            let got = inst.qubits.len() as u32;
            if got != gate.num_qubits() {
                return Err(IrError::QubitCountMismatch {
                    gate: gate.name().to_string(),
                    expected: gate.num_qubits(),
                    got,
                });
            }
        }
        if inst.is_measure() && inst.qubits.len() != inst.clbits.len() {
            return Err(IrError::ClbitCountMismatch {
                qubits: inst.qubits.len(),
                clbits: inst.clbits.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for &qubit in &inst.qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit,
                    num_qubits: self.num_qubits,
                    op: inst.name().to_string(),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    op: inst.name().to_string(),
                });
            }
        }
        for &clbit in &inst.clbits {
            if clbit.0 >= self.num_clbits {
                return Err(IrError::ClbitOutOfRange {
                    clbit,
                    num_clbits: self.num_clbits,
                    op: inst.name().to_string(),
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Builder helpers
    // =========================================================================

    fn gate(&mut self, gate: StandardGate, qubits: &[QubitId]) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits.iter().copied()))
    }

    /// Hadamard.
    pub fn h(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::H, &[q])
    }

    /// Pauli-X.
    pub fn x(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::X, &[q])
    }

    /// Pauli-Y.
    pub fn y(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Y, &[q])
    }

    /// Pauli-Z.
    pub fn z(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Z, &[q])
    }

    /// S gate.
    pub fn s(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::S, &[q])
    }

    /// T gate.
    pub fn t(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::T, &[q])
    }

    /// sqrt(X).
    pub fn sx(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::SX, &[q])
    }

    /// RX rotation.
    pub fn rx(&mut self, theta: impl Into<ParameterExpression>, q: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rx(theta.into()), &[q])
    }

    /// RY rotation.
    pub fn ry(&mut self, theta: impl Into<ParameterExpression>, q: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Ry(theta.into()), &[q])
    }

    /// RZ rotation.
    pub fn rz(&mut self, theta: impl Into<ParameterExpression>, q: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rz(theta.into()), &[q])
    }

    /// U(θ, φ, λ).
    pub fn u(
        &mut self,
        theta: impl Into<ParameterExpression>,
        phi: impl Into<ParameterExpression>,
        lambda: impl Into<ParameterExpression>,
        q: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(StandardGate::U(theta.into(), phi.into(), lambda.into()), &[q])
    }

    /// CNOT.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CX, &[control, target])
    }

    /// Controlled-Z.
    pub fn cz(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CZ, &[a, b])
    }

    /// SWAP.
    pub fn swap(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Swap, &[a, b])
    }

    /// Controlled phase.
    pub fn cp(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(StandardGate::CP(theta.into()), &[control, target])
    }

    /// ZZ interaction.
    pub fn rzz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        a: QubitId,
        b: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(StandardGate::RZZ(theta.into()), &[a, b])
    }

    /// Toffoli.
    pub fn ccx(&mut self, c0: QubitId, c1: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CCX, &[c0, c1, target])
    }

    /// Measure one qubit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))
    }

    /// Measure qubit `i` into clbit `i` for every qubit, growing the classical
    /// register if needed.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        self.num_clbits = self.num_clbits.max(self.num_qubits);
        for i in 0..self.num_qubits {
            self.push(Instruction::measure(QubitId(i), ClbitId(i)))?;
        }
        Ok(self)
    }

    /// Reset one qubit.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::reset(qubit))
    }

    /// Barrier across the given qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.push(Instruction::barrier(qubits))
    }

    /// Labelled barrier across every qubit.
    pub fn barrier_all(&mut self, label: impl Into<String>) -> IrResult<&mut Self> {
        let qubits = (0..self.num_qubits).map(QubitId);
        self.push(Instruction::barrier(qubits).with_label(label))
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// True if any instruction carries a free symbol.
    pub fn is_parameterized(&self) -> bool {
        self.ops.iter().any(Instruction::is_parameterized)
    }

    /// All free symbol names, sorted.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for op in &self.ops {
            match &op.kind {
                InstructionKind::Gate(g) => {
                    for p in g.parameters() {
                        out.extend(p.symbols());
                    }
                }
                InstructionKind::Opaque { params, .. } => {
                    for p in params {
                        out.extend(p.symbols());
                    }
                }
                _ => {}
            }
        }
        out
    }

    /// Bind one symbol.
    pub fn bind(&self, name: &str, value: f64) -> Fragment {
        let mut values = FxHashMap::default();
        values.insert(name.to_string(), value);
        self.bind_all(&values)
    }

    /// Bind every symbol present in `values`.
    pub fn bind_all(&self, values: &FxHashMap<String, f64>) -> Fragment {
        self.with_ops(self.ops.iter().map(|op| op.bind_all(values)).collect())
    }

    // =========================================================================
    // Structural transforms
    // =========================================================================

    /// Same name and width with a new instruction list.
    ///
    /// The instructions must already be valid for this width.
    pub fn with_ops(&self, ops: Vec<Instruction>) -> Fragment {
        Fragment {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            ops,
        }
    }

    /// Rename.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Fragment {
        self.name = name.into();
        self
    }

    /// Instructions in `range`, keeping width.
    pub fn slice(&self, range: Range<usize>) -> Fragment {
        self.with_ops(self.ops[range].to_vec())
    }

    /// This fragment followed by `next`. The result is as wide as the wider
    /// operand in both qubits and classical bits.
    pub fn concat(&self, next: &Fragment) -> Fragment {
        let mut ops = Vec::with_capacity(self.ops.len() + next.ops.len());
        ops.extend_from_slice(&self.ops);
        ops.extend_from_slice(&next.ops);
        Fragment {
            name: self.name.clone(),
            num_qubits: self.num_qubits.max(next.num_qubits),
            num_clbits: self.num_clbits.max(next.num_clbits),
            ops,
        }
    }

    /// Relabel qubits through `map` onto a fragment `width` qubits wide.
    ///
    /// `map` must cover every qubit of this fragment; the relabelled
    /// instructions are validated against the new width.
    pub fn remap(&self, map: &[u32], width: u32) -> IrResult<Fragment> {
        if (map.len() as u32) < self.num_qubits {
            return Err(IrError::QubitOutOfRange {
                qubit: QubitId(map.len() as u32),
                num_qubits: map.len() as u32,
                op: "remap".to_string(),
            });
        }
        Fragment::from_instructions(
            self.name.clone(),
            width,
            self.num_clbits,
            self.ops.iter().map(|op| op.remap_qubits(map)),
        )
    }
}
