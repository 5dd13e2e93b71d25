//! # Stable Entity Identifiers
//!
//! Identity in VOIDRIFT must survive chunk eviction: a chunk is dropped
//! when the player walks away and regenerated from the seed on return, so
//! anything that refers to an entity across that boundary (the kill ledger,
//! portal links, network messages) needs an id that is a pure function of
//! where the entity was generated - never an allocation counter.

use serde::{Deserialize, Serialize};

/// Identifies one enemy spawn slot within one chunk.
///
/// The same `(chunk, slot)` pair always denotes the same enemy, no matter
/// how many times the chunk has been evicted and regenerated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyId {
    /// X coordinate of the generating chunk.
    pub chunk_x: i32,
    /// Y coordinate of the generating chunk.
    pub chunk_y: i32,
    /// Spawn slot index within the chunk (generation order).
    pub slot: u16,
}

impl EnemyId {
    /// Creates an enemy id.
    #[inline]
    #[must_use]
    pub const fn new(chunk_x: i32, chunk_y: i32, slot: u16) -> Self {
        Self { chunk_x, chunk_y, slot }
    }
}

impl std::fmt::Display for EnemyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "enemy({},{})#{}", self.chunk_x, self.chunk_y, self.slot)
    }
}

/// Identifies the portal generated by one chunk.
///
/// Each chunk spawns at most one portal, so the chunk coordinate alone is
/// a collision-free portal identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortalId {
    /// X coordinate of the generating chunk.
    pub chunk_x: i32,
    /// Y coordinate of the generating chunk.
    pub chunk_y: i32,
}

impl PortalId {
    /// Creates a portal id.
    #[inline]
    #[must_use]
    pub const fn new(chunk_x: i32, chunk_y: i32) -> Self {
        Self { chunk_x, chunk_y }
    }
}

impl std::fmt::Display for PortalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "portal({},{})", self.chunk_x, self.chunk_y)
    }
}
