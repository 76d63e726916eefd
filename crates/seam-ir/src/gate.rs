//! Standard gate set.
//!
//! The set is closed: every variant knows its arity, whether it carries a free
//! parameter, and its algebraic inverse.

use serde::{Deserialize, Serialize};

use crate::parameter::ParameterExpression;

/// Gates with known unitary semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Paulis and Cliffords
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// Hadamard.
    H,
    /// sqrt(Z).
    S,
    /// S-dagger.
    Sdg,
    /// Fourth root of Z.
    T,
    /// T-dagger.
    Tdg,
    /// sqrt(X).
    SX,
    /// sqrt(X)-dagger.
    SXdg,

    // Single-qubit rotations
    /// Rotation about X.
    Rx(ParameterExpression),
    /// Rotation about Y.
    Ry(ParameterExpression),
    /// Rotation about Z.
    Rz(ParameterExpression),
    /// Phase gate.
    P(ParameterExpression),
    /// U(θ, φ, λ).
    U(
        ParameterExpression,
        ParameterExpression,
        ParameterExpression,
    ),
    /// Phased RX: PRX(θ, φ) = RZ(φ) · RX(θ) · RZ(-φ).
    PRX(ParameterExpression, ParameterExpression),

    // Two-qubit gates
    /// CNOT.
    CX,
    /// Controlled-Y.
    CY,
    /// Controlled-Z.
    CZ,
    /// Controlled-Hadamard.
    CH,
    /// SWAP.
    Swap,
    /// Controlled RX.
    CRx(ParameterExpression),
    /// Controlled RY.
    CRy(ParameterExpression),
    /// Controlled RZ.
    CRz(ParameterExpression),
    /// Controlled phase.
    CP(ParameterExpression),
    /// XX interaction.
    RXX(ParameterExpression),
    /// YY interaction.
    RYY(ParameterExpression),
    /// ZZ interaction.
    RZZ(ParameterExpression),

    // Three-qubit gates
    /// Toffoli.
    CCX,
    /// Fredkin.
    CSwap,
}

impl StandardGate {
    /// Lowercase gate mnemonic.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(..) => "u",
            StandardGate::PRX(..) => "prx",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::CRx(_) => "crx",
            StandardGate::CRy(_) => "cry",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
            StandardGate::RXX(_) => "rxx",
            StandardGate::RYY(_) => "ryy",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Number of qubit operands.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CRx(_)
            | StandardGate::CRy(_)
            | StandardGate::CRz(_)
            | StandardGate::CP(_)
            | StandardGate::RXX(_)
            | StandardGate::RYY(_)
            | StandardGate::RZZ(_) => 2,
            StandardGate::CCX | StandardGate::CSwap => 3,
            _ => 1,
        }
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CRx(p)
            | StandardGate::CRy(p)
            | StandardGate::CRz(p)
            | StandardGate::CP(p)
            | StandardGate::RXX(p)
            | StandardGate::RYY(p)
            | StandardGate::RZZ(p) => vec![p],
            StandardGate::U(theta, phi, lambda) => vec![theta, phi, lambda],
            StandardGate::PRX(theta, phi) => vec![theta, phi],
            _ => vec![],
        }
    }

    /// True if any parameter still contains a free symbol.
    pub fn is_parameterized(&self) -> bool {
        self.parameters().iter().any(|p| p.is_symbolic())
    }

    /// The algebraic inverse U†.
    ///
    /// Every standard gate is unitary, so this is always `Some`; the `Option`
    /// keeps the signature uniform with instructions that have no inverse.
    pub fn inverse(&self) -> Option<StandardGate> {
        let inv = match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CCX
            | StandardGate::CSwap => self.clone(),

            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::SX => StandardGate::SXdg,
            StandardGate::SXdg => StandardGate::SX,

            StandardGate::Rx(t) => StandardGate::Rx(-t.clone()),
            StandardGate::Ry(t) => StandardGate::Ry(-t.clone()),
            StandardGate::Rz(t) => StandardGate::Rz(-t.clone()),
            StandardGate::P(t) => StandardGate::P(-t.clone()),
            StandardGate::CRx(t) => StandardGate::CRx(-t.clone()),
            StandardGate::CRy(t) => StandardGate::CRy(-t.clone()),
            StandardGate::CRz(t) => StandardGate::CRz(-t.clone()),
            StandardGate::CP(t) => StandardGate::CP(-t.clone()),
            StandardGate::RXX(t) => StandardGate::RXX(-t.clone()),
            StandardGate::RYY(t) => StandardGate::RYY(-t.clone()),
            StandardGate::RZZ(t) => StandardGate::RZZ(-t.clone()),

            // U(θ, φ, λ)† = U(-θ, -λ, -φ)
            StandardGate::U(theta, phi, lambda) => {
                StandardGate::U(-theta.clone(), -lambda.clone(), -phi.clone())
            }
            // PRX(θ, φ)† = PRX(-θ, φ)
            StandardGate::PRX(theta, phi) => StandardGate::PRX(-theta.clone(), phi.clone()),
        };
        Some(inv)
    }

    /// Rewrite every parameter with `f`.
    pub fn map_parameters(&self, f: impl Fn(&ParameterExpression) -> ParameterExpression) -> Self {
        match self {
            StandardGate::Rx(p) => StandardGate::Rx(f(p)),
            StandardGate::Ry(p) => StandardGate::Ry(f(p)),
            StandardGate::Rz(p) => StandardGate::Rz(f(p)),
            StandardGate::P(p) => StandardGate::P(f(p)),
            StandardGate::CRx(p) => StandardGate::CRx(f(p)),
            StandardGate::CRy(p) => StandardGate::CRy(f(p)),
            StandardGate::CRz(p) => StandardGate::CRz(f(p)),
            StandardGate::CP(p) => StandardGate::CP(f(p)),
            StandardGate::RXX(p) => StandardGate::RXX(f(p)),
            StandardGate::RYY(p) => StandardGate::RYY(f(p)),
            StandardGate::RZZ(p) => StandardGate::RZZ(f(p)),
            StandardGate::U(a, b, c) => StandardGate::U(f(a), f(b), f(c)),
            StandardGate::PRX(a, b) => StandardGate::PRX(f(a), f(b)),
            other => other.clone(),
        }
    }
}
