//! Component signatures
//!
//! A [`Signature`] is a 64-bit set with one bit per registered component
//! type. An entity's signature has bit *i* set exactly when the entity owns a
//! component of type *i*.

use std::fmt;
use std::ops::{BitAnd, BitOr};

/// Maximum number of distinct component types
pub const MAX_COMPONENTS: usize = 64;

/// Index of a registered component type within a [`Signature`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentType(u8);

impl ComponentType {
    /// Build a component type from its bit index
    ///
    /// Indices at or above [`MAX_COMPONENTS`] wrap into range.
    pub const fn from_index(index: usize) -> Self {
        Self((index % MAX_COMPONENTS) as u8)
    }

    /// Bit index of this component type
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    const fn mask(self) -> u64 {
        1 << self.0
    }
}

/// Bitset of component types
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signature(u64);

impl Signature {
    /// Signature with no bits set
    pub const EMPTY: Self = Self(0);

    /// Build a signature from raw bits
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bits
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Return a copy with `component` set
    #[must_use]
    pub const fn with(self, component: ComponentType) -> Self {
        Self(self.0 | component.mask())
    }

    /// Set the bit for `component`
    pub fn set(&mut self, component: ComponentType) {
        self.0 |= component.mask();
    }

    /// Clear the bit for `component`
    pub fn clear(&mut self, component: ComponentType) {
        self.0 &= !component.mask();
    }

    /// Check whether `component` is set
    pub const fn contains(self, component: ComponentType) -> bool {
        self.0 & component.mask() != 0
    }

    /// Check whether every bit of `required` is also set here
    pub const fn matches(self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }

    /// True when no bits are set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of set bits
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate over the set component types in ascending order
    pub fn iter(self) -> impl Iterator<Item = ComponentType> {
        (0..MAX_COMPONENTS)
            .map(ComponentType::from_index)
            .filter(move |component| self.contains(*component))
    }
}

impl BitOr for Signature {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for Signature {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl FromIterator<ComponentType> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#066b})", self.0)
    }
}
