//! Finite index permutations.
//!
//! Permutations are stored as image arrays: `p[i]` is where `i` goes. The free
//! functions work on raw slices and validate their input; [`Permutation`] is
//! the validated owned form used inside layouts.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};

/// Check that `p` is a bijection over `0..p.len()`.
pub fn validate(p: &[u32]) -> LayoutResult<()> {
    let mut seen = vec![false; p.len()];
    for (i, &image) in p.iter().enumerate() {
        let slot = seen.get_mut(image as usize).ok_or_else(|| {
            LayoutError::MalformedPermutation(format!(
                "entry {i} maps to {image}, outside 0..{}",
                p.len()
            ))
        })?;
        if *slot {
            return Err(LayoutError::MalformedPermutation(format!(
                "image {image} appears more than once"
            )));
        }
        *slot = true;
    }
    Ok(())
}

/// The identity permutation on `0..n`.
pub fn identity(n: usize) -> Vec<u32> {
    (0..n as u32).collect()
}

/// True if `p[i] == i` everywhere.
pub fn is_identity(p: &[u32]) -> bool {
    p.iter().enumerate().all(|(i, &image)| image as usize == i)
}

/// `p[i] = outer[inner[i]]`: apply `inner` first, then `outer`.
pub fn compose(outer: &[u32], inner: &[u32]) -> LayoutResult<Vec<u32>> {
    validate(outer)?;
    validate(inner)?;
    if outer.len() != inner.len() {
        return Err(LayoutError::MalformedPermutation(format!(
            "cannot compose permutations of sizes {} and {}",
            outer.len(),
            inner.len()
        )));
    }
    Ok(inner.iter().map(|&i| outer[i as usize]).collect())
}

/// `q[p[i]] = i`.
pub fn invert(p: &[u32]) -> LayoutResult<Vec<u32>> {
    validate(p)?;
    let mut q = vec![0; p.len()];
    for (i, &image) in p.iter().enumerate() {
        q[image as usize] = i as u32;
    }
    Ok(q)
}

/// A validated permutation of `0..len`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct Permutation(Vec<u32>);

impl Permutation {
    /// Wrap an image array, rejecting anything that is not a bijection.
    pub fn new(images: Vec<u32>) -> LayoutResult<Self> {
        validate(&images)?;
        Ok(Self(images))
    }

    /// Identity on `0..n`.
    pub fn identity(n: usize) -> Self {
        Self(identity(n))
    }

    /// Domain size.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty permutation.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Image of `i`. Indices outside the domain are fixed points.
    #[inline]
    pub fn apply(&self, i: u32) -> u32 {
        self.0.get(i as usize).copied().unwrap_or(i)
    }

    /// The image array.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// True if every point is fixed.
    pub fn is_identity(&self) -> bool {
        is_identity(&self.0)
    }

    /// The inverse permutation.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let mut q = vec![0; self.0.len()];
        for (i, &image) in self.0.iter().enumerate() {
            q[image as usize] = i as u32;
        }
        Self(q)
    }

    /// `self ∘ inner`: apply `inner` first. Both are identity-extended to the
    /// larger of the two domains.
    #[must_use]
    pub fn compose(&self, inner: &Permutation) -> Self {
        let width = self.len().max(inner.len());
        Self(
            (0..width as u32)
                .map(|i| self.apply(inner.apply(i)))
                .collect(),
        )
    }

    /// The same permutation on `0..width`, fixing the added points.
    ///
    /// Widths smaller than the domain are ignored.
    #[must_use]
    pub fn extended(&self, width: usize) -> Self {
        let mut images = self.0.clone();
        images.extend(self.0.len() as u32..width as u32);
        Self(images)
    }
}

impl TryFrom<Vec<u32>> for Permutation {
    type Error = LayoutError;

    fn try_from(images: Vec<u32>) -> LayoutResult<Self> {
        Self::new(images)
    }
}

impl From<Permutation> for Vec<u32> {
    fn from(p: Permutation) -> Self {
        p.0
    }
}
