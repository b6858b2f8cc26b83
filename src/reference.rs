use std::fmt::{Display, Formatter};

/// A reference to a ZDD node.
///
/// A `ZddId` is a `u32` index into the store's node array. Because the
/// store hash-conses every node, handle equality is semantic equality:
/// two families are equal iff their `ZddId`s are equal. All operation
/// caches key on these handles.
///
/// # Terminal Values
///
/// - `ZddId::ZERO` (⊥) — Empty family: no sets
/// - `ZddId::ONE` (⊤) — Family containing only the empty set: {∅}
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ZddId(u32);

impl ZddId {
    /// Empty family (⊥): contains no sets.
    pub const ZERO: ZddId = ZddId(0);

    /// Family containing only the empty set (⊤): {∅}.
    pub const ONE: ZddId = ZddId(1);

    /// Sentinel for invalid references.
    pub const INVALID: ZddId = ZddId(0xFFFF_FFFF);

    /// Creates a ZddId from a raw index.
    pub const fn new(index: u32) -> Self {
        ZddId(index)
    }

    /// Returns the raw index value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the index for array access.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns true if this is a terminal (ZERO or ONE).
    pub const fn is_terminal(self) -> bool {
        self.0 <= 1
    }

    /// Returns true if this is the empty family.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if this is the {∅} family.
    pub const fn is_one(self) -> bool {
        self.0 == 1
    }
}

impl Default for ZddId {
    fn default() -> Self {
        ZddId::INVALID
    }
}

impl Display for ZddId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            0 => write!(f, "⊥"),
            1 => write!(f, "⊤"),
            _ => write!(f, "#{}", self.0),
        }
    }
}

impl From<u32> for ZddId {
    fn from(index: u32) -> Self {
        ZddId::new(index)
    }
}
