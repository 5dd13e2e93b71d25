//! # VOIDRIFT Procedural World Generation
//!
//! Deterministic, seed-driven generation of an infinite chunked world:
//! biome assignment with spatial cohesion, per-biome features, obstacles,
//! enemies, resources, chests, extraction points and a globally matched
//! portal network, plus chunk streaming and full-state snapshots.
//!
//! ## Architecture
//!
//! ```text
//! WorldSeed ─> SeededHash ─┬─> BiomePropagator (biome per chunk)
//!                          ├─> FeatureGenerator (per-biome features)
//!                          └─> ChunkGenerator  (all chunk content)
//!                                    │
//!                       WorldGenerator (cache + ledger + snapshots)
//! ```
//!
//! ## Determinism
//!
//! Every piece of content is a pure function of `(seed, chunk_x, chunk_y,
//! salt)`. There is no global RNG stream to advance: generating chunks in
//! any order, unloading them, or regenerating them years later yields
//! bit-identical results. The only mutable facts are the world ledger
//! (kills, portal links) and the write-once biome map, and both ride
//! along in snapshots.
//!
//! ## Example
//!
//! ```rust,ignore
//! use voidrift_procedural::{WorldGenerator, WorldSeed};
//!
//! let mut world = WorldGenerator::with_seed(WorldSeed::new(42));
//! let chunks = world.active_chunks(0.0, 0.0, 2);
//! assert_eq!(chunks.len(), 25);
//! ```

pub mod biome;
pub mod chunk;
pub mod config;
pub mod entity;
pub mod error;
pub mod feature;
pub mod hash;
pub mod ledger;
pub mod snapshot;
pub mod world;

pub use biome::{Biome, BiomePalette, BiomePropagator};
pub use chunk::{Chunk, ChunkCoord, ChunkGenerator};
pub use config::GenerationConfig;
pub use entity::{
    Chest, ChestKind, Enemy, EnemyArchetype, ExtractionPoint, Obstacle, ObstacleShape,
    OrbitParams, Portal, PortalSpawn, ResourceKind, ResourceNode,
};
pub use error::{WorldError, WorldResult};
pub use feature::{BiomeFeature, FeatureGenerator, FeatureKind};
pub use hash::{SeededHash, WorldSeed};
pub use ledger::WorldLedger;
pub use snapshot::{BiomeAssignment, WorldSnapshot};
pub use world::{BiomeTransitionWatcher, WorldGenerator, WorldStats};
