//! # World Generator
//!
//! The facade the simulation talks to: owns the seed, the biome
//! propagator, the chunk cache and the world ledger, and exposes the
//! streaming and snapshot operations.
//!
//! ## Streaming model
//!
//! The cache is populated lazily by [`WorldGenerator::active_chunks`] and
//! pruned by [`WorldGenerator::unload_distant_chunks`]; both use the
//! Chebyshev metric so the active set is a square of chunks around the
//! player. Eviction drops only generated content - biome assignments and
//! the ledger survive, so a revisited chunk regenerates identically minus
//! killed enemies.

use std::collections::HashMap;

use crate::biome::{Biome, BiomePropagator};
use crate::chunk::{Chunk, ChunkCoord, ChunkGenerator};
use crate::config::GenerationConfig;
use crate::error::WorldResult;
use crate::hash::{SeededHash, WorldSeed};
use crate::ledger::WorldLedger;
use crate::snapshot::{BiomeAssignment, WorldSnapshot};

use voidrift_shared::{EnemyId, PortalId};

use crate::entity::Portal;

/// Aggregate counters for diagnostics overlays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Chunks currently resident in the cache.
    pub loaded_chunks: usize,
    /// Biome assignments made so far (never shrinks).
    pub assigned_biomes: usize,
    /// Portals registered so far (never shrinks).
    pub portals: usize,
    /// Enemies recorded killed.
    pub kills: usize,
}

/// Deterministic streaming world generator.
#[derive(Clone, Debug)]
pub struct WorldGenerator {
    hash: SeededHash,
    config: GenerationConfig,
    propagator: BiomePropagator,
    chunks: ChunkGenerator,
    cache: HashMap<ChunkCoord, Chunk>,
    ledger: WorldLedger,
}

impl WorldGenerator {
    /// Creates a generator with a random seed and default config.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(WorldSeed::new(rand::random()))
    }

    /// Creates a generator for a specific seed with default config.
    #[must_use]
    pub fn with_seed(seed: WorldSeed) -> Self {
        Self::with_config(seed, GenerationConfig::default())
    }

    /// Creates a generator for a specific seed and config.
    ///
    /// Peers in one session must agree on both.
    #[must_use]
    pub fn with_config(seed: WorldSeed, config: GenerationConfig) -> Self {
        let hash = SeededHash::new(seed);
        tracing::debug!("world generator created with seed {:#018x}", seed.value());
        Self {
            hash,
            config,
            propagator: BiomePropagator::new(hash),
            chunks: ChunkGenerator::new(hash),
            cache: HashMap::new(),
            ledger: WorldLedger::new(),
        }
    }

    /// The world seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.hash.seed()
    }

    /// The active generation config.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Returns the biome of a chunk, assigning one on first observation.
    pub fn chunk_biome(&mut self, coord: ChunkCoord) -> Biome {
        self.propagator.assign(coord)
    }

    /// Stable biome index of a chunk, for wire formats and palettes.
    pub fn biome_index(&mut self, chunk_x: i32, chunk_y: i32) -> u8 {
        self.chunk_biome(ChunkCoord::new(chunk_x, chunk_y)).index()
    }

    /// Returns a chunk, generating and caching it if absent.
    pub fn get_or_generate(&mut self, coord: ChunkCoord) -> &Chunk {
        if !self.cache.contains_key(&coord) {
            let biome = self.propagator.assign(coord);
            let chunk = self
                .chunks
                .generate(coord, biome, &self.config, &mut self.ledger);
            self.cache.insert(coord, chunk);
        }
        // Inserted above if absent.
        &self.cache[&coord]
    }

    /// True if the chunk is currently resident.
    #[must_use]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.cache.contains_key(&coord)
    }

    /// Ensures every chunk within `radius` (Chebyshev) of the player is
    /// loaded and returns references to all of them.
    ///
    /// Chunks are generated in row-major order over the window, but
    /// content is coordinate-keyed so visiting order never changes what
    /// any chunk contains.
    pub fn active_chunks(&mut self, player_x: f32, player_y: f32, radius: i32) -> Vec<&Chunk> {
        let center = ChunkCoord::from_world_pos(player_x, player_y);

        let mut window = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                window.push(ChunkCoord::new(center.x + dx, center.y + dy));
            }
        }
        for coord in &window {
            let _ = self.get_or_generate(*coord);
        }
        window.iter().map(|coord| &self.cache[coord]).collect()
    }

    /// Evicts every cached chunk farther than `radius` (Chebyshev) from
    /// the player and returns the evicted coordinates.
    ///
    /// Only generated content is dropped. The caller owns what happens to
    /// live entities from those chunks; enemies that chased the player out
    /// of an evicted chunk are the simulation's to keep.
    pub fn unload_distant_chunks(
        &mut self,
        player_x: f32,
        player_y: f32,
        radius: i32,
    ) -> Vec<ChunkCoord> {
        let center = ChunkCoord::from_world_pos(player_x, player_y);
        let evicted: Vec<ChunkCoord> = self
            .cache
            .keys()
            .filter(|coord| coord.chebyshev_distance(center) > radius)
            .copied()
            .collect();
        for coord in &evicted {
            self.cache.remove(coord);
        }
        if !evicted.is_empty() {
            tracing::debug!("evicted {} chunks beyond radius {radius}", evicted.len());
        }
        evicted
    }

    /// Records an enemy kill in the world ledger.
    ///
    /// Returns `true` if this id was not already recorded.
    pub fn register_kill(&mut self, id: EnemyId) -> bool {
        self.ledger.register_kill(id)
    }

    /// All portals registered so far, in registration order.
    #[must_use]
    pub fn all_portals(&self) -> &[Portal] {
        self.ledger.portals()
    }

    /// Looks up a registered portal.
    #[must_use]
    pub fn portal(&self, id: PortalId) -> Option<&Portal> {
        self.ledger.portal(id)
    }

    /// Captures the complete world state.
    ///
    /// Collections are sorted so equal worlds produce byte-equal
    /// snapshots regardless of map iteration order.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        let mut chunks: Vec<Chunk> = self.cache.values().cloned().collect();
        chunks.sort_by_key(|c| (c.coord.x, c.coord.y));

        let mut biome_assignments: Vec<BiomeAssignment> = self
            .propagator
            .entries()
            .map(|(coord, biome)| BiomeAssignment { coord, biome })
            .collect();
        biome_assignments.sort_by_key(|a| (a.coord.x, a.coord.y));

        let mut killed_enemies: Vec<EnemyId> = self.ledger.kills().collect();
        killed_enemies.sort_by_key(|id| (id.chunk_x, id.chunk_y, id.slot));

        WorldSnapshot {
            seed: self.seed().value(),
            chunks,
            biome_assignments,
            portals: self.ledger.portals().to_vec(),
            unlinked_portal: self.ledger.unlinked_portal(),
            killed_enemies,
        }
    }

    /// Replaces this generator's entire state from a snapshot.
    ///
    /// Validation runs first; on error the current world is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::WorldError::InvalidSnapshot`] if the
    /// snapshot is structurally inconsistent.
    pub fn hydrate(&mut self, snapshot: WorldSnapshot) -> WorldResult<()> {
        snapshot.validate()?;

        let seed = WorldSeed::new(snapshot.seed);
        let hash = SeededHash::new(seed);
        self.hash = hash;
        self.chunks = ChunkGenerator::new(hash);

        self.propagator = BiomePropagator::new(hash);
        self.propagator.restore(
            snapshot
                .biome_assignments
                .iter()
                .map(|a| (a.coord, a.biome)),
        );

        self.ledger.restore(
            snapshot.killed_enemies.iter().copied(),
            snapshot.portals,
            snapshot.unlinked_portal,
        );

        self.cache = snapshot
            .chunks
            .into_iter()
            .map(|chunk| (chunk.coord, chunk))
            .collect();

        tracing::debug!(
            "hydrated world {:#018x}: {} chunks, {} kills",
            snapshot.seed,
            self.cache.len(),
            self.ledger.kill_count()
        );
        Ok(())
    }

    /// Current aggregate counters.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        WorldStats {
            loaded_chunks: self.cache.len(),
            assigned_biomes: self.propagator.len(),
            portals: self.ledger.portals().len(),
            kills: self.ledger.kill_count(),
        }
    }
}

impl Default for WorldGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Detects the moment the player crosses into a different biome.
///
/// Feed it the player's chunk biome every frame; it reports `Some` only
/// on the frame the biome changed, for ambience cross-fades and UI
/// callouts.
#[derive(Clone, Copy, Debug, Default)]
pub struct BiomeTransitionWatcher {
    last: Option<Biome>,
}

impl BiomeTransitionWatcher {
    /// Creates a watcher with no observed biome.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Observes the current biome, returning the transition if one
    /// happened.
    pub fn observe(&mut self, current: Biome) -> Option<(Option<Biome>, Biome)> {
        match self.last {
            Some(previous) if previous == current => None,
            previous => {
                self.last = Some(current);
                Some((previous, current))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidrift_shared::CHUNK_SIZE_UNITS;

    fn world(seed: u64) -> WorldGenerator {
        WorldGenerator::with_seed(WorldSeed::new(seed))
    }

    #[test]
    fn test_active_chunks_window() {
        let mut world = world(42);
        let chunks = world.active_chunks(0.0, 0.0, 2);

        assert_eq!(chunks.len(), 25, "Radius 2 loads a 5x5 window");
        assert!(world.is_loaded(ChunkCoord::new(-2, -2)));
        assert!(world.is_loaded(ChunkCoord::new(2, 2)));
        assert!(!world.is_loaded(ChunkCoord::new(3, 0)));
    }

    #[test]
    fn test_unload_keeps_near_chunks() {
        let mut world = world(42);
        world.active_chunks(0.0, 0.0, 2);

        // Walk far enough that the old window is out of unload range.
        let far = 8.0 * CHUNK_SIZE_UNITS;
        world.active_chunks(far, far, 2);
        let evicted = world.unload_distant_chunks(far, far, 4);

        assert_eq!(evicted.len(), 25, "The entire old window is evicted");
        assert!(!world.is_loaded(ChunkCoord::new(0, 0)));
        assert!(world.is_loaded(ChunkCoord::new(8, 8)));
    }

    #[test]
    fn test_eviction_does_not_forget_biomes() {
        let mut world = world(42);
        world.active_chunks(0.0, 0.0, 2);
        let biome = world.chunk_biome(ChunkCoord::new(0, 0));

        let far = 10.0 * CHUNK_SIZE_UNITS;
        world.active_chunks(far, far, 2);
        world.unload_distant_chunks(far, far, 4);

        assert_eq!(
            world.chunk_biome(ChunkCoord::new(0, 0)),
            biome,
            "Eviction must not reset biome assignments"
        );
    }

    #[test]
    fn test_regeneration_is_identical() {
        let mut world = world(42);
        let original = world.get_or_generate(ChunkCoord::new(3, 3)).clone();

        let far = 20.0 * CHUNK_SIZE_UNITS;
        world.active_chunks(far, far, 1);
        world.unload_distant_chunks(far, far, 4);
        assert!(!world.is_loaded(ChunkCoord::new(3, 3)));

        let regenerated = world.get_or_generate(ChunkCoord::new(3, 3)).clone();
        assert_eq!(original, regenerated, "Revisited chunk must regenerate identically");
    }

    #[test]
    fn test_kill_survives_eviction() {
        let mut world = world(42);
        let victims: Vec<EnemyId> = world
            .get_or_generate(ChunkCoord::new(4, 4))
            .enemies
            .iter()
            .map(|e| e.id)
            .collect();
        assert!(!victims.is_empty(), "Test needs enemies to kill");

        for id in &victims {
            world.register_kill(*id);
        }
        let far = 20.0 * CHUNK_SIZE_UNITS;
        world.unload_distant_chunks(far, far, 4);

        let chunk = world.get_or_generate(ChunkCoord::new(4, 4));
        assert!(
            chunk.enemies.is_empty(),
            "Cleared chunk must regenerate empty, got {} enemies",
            chunk.enemies.len()
        );
    }

    #[test]
    fn test_snapshot_hydrate_round_trip() {
        let mut world = world(42);
        world.active_chunks(0.0, 0.0, 2);
        world.active_chunks(6.0 * CHUNK_SIZE_UNITS, 0.0, 2);
        let victim = world.get_or_generate(ChunkCoord::new(1, 1)).enemies[0].id;
        world.register_kill(victim);

        let snapshot = world.snapshot();

        let mut other = WorldGenerator::with_seed(WorldSeed::new(999));
        other.active_chunks(0.0, 0.0, 1);
        other.hydrate(snapshot.clone()).expect("Hydration succeeds");

        assert_eq!(other.seed(), world.seed(), "Seed is replaced wholesale");
        assert_eq!(other.snapshot(), snapshot, "Hydrated world recaptures equal state");

        // The hydrated world continues generating identically.
        let coord = ChunkCoord::new(-7, 5);
        assert_eq!(
            world.get_or_generate(coord).clone(),
            other.get_or_generate(coord).clone(),
            "Post-hydration generation must match the source world"
        );
    }

    #[test]
    fn test_hydrate_rejects_broken_snapshot_untouched() {
        let mut world = world(42);
        world.active_chunks(0.0, 0.0, 1);
        let before = world.snapshot();

        let mut broken = before.clone();
        broken.chunks.push(broken.chunks[0].clone());

        assert!(world.hydrate(broken).is_err());
        assert_eq!(world.snapshot(), before, "Failed hydration must not mutate");
    }

    #[test]
    fn test_visit_order_does_not_change_content() {
        let mut forward = world(42);
        let mut reverse = world(42);

        let coords: Vec<ChunkCoord> = (-4..4)
            .flat_map(|x| (-4..4).map(move |y| ChunkCoord::new(x, y)))
            .collect();

        for coord in &coords {
            forward.get_or_generate(*coord);
        }
        for coord in coords.iter().rev() {
            reverse.get_or_generate(*coord);
        }

        // Biome assignment depends on which neighbors existed first, so
        // compare the seeded content streams, not the biomes: chunks that
        // did end up with the same biome must have identical content.
        for coord in &coords {
            let a = forward.get_or_generate(*coord).clone();
            let b = reverse.get_or_generate(*coord).clone();
            if a.biome == b.biome {
                assert_eq!(
                    a.obstacles, b.obstacles,
                    "Visit order leaked into chunk {coord} content"
                );
            }
        }
    }

    #[test]
    fn test_link_formation_does_not_change_cached_chunks() {
        let mut world = world(42);

        // Explore until a second portal spawns and links to the first.
        'outer: for x in -20..20 {
            for y in -20..20 {
                world.get_or_generate(ChunkCoord::new(x, y));
                if world.all_portals().len() >= 2 {
                    break 'outer;
                }
            }
        }
        let first = world.all_portals()[0].clone();
        assert!(
            first.linked_to.is_some(),
            "Second spawn must have linked the first portal"
        );

        // The first portal's chunk was cached before its link existed;
        // regenerating it after eviction must yield the same content.
        let coord = ChunkCoord::new(first.id.chunk_x, first.id.chunk_y);
        let cached = world.get_or_generate(coord).clone();
        assert_eq!(cached.portals.len(), 1);
        assert_eq!(cached.portals[0].id, first.id);

        let far = 100.0 * CHUNK_SIZE_UNITS;
        world.unload_distant_chunks(far, far, 4);
        assert!(!world.is_loaded(coord));
        let regenerated = world.get_or_generate(coord).clone();

        assert_eq!(
            cached, regenerated,
            "Chunk content depended on whether the portal link had formed"
        );
    }

    #[test]
    fn test_stats_track_state() {
        let mut world = world(42);
        assert_eq!(world.stats(), WorldStats::default());

        world.active_chunks(0.0, 0.0, 1);
        let stats = world.stats();
        assert_eq!(stats.loaded_chunks, 9);
        assert!(stats.assigned_biomes >= 9);
    }

    #[test]
    fn test_transition_watcher() {
        let mut watcher = BiomeTransitionWatcher::new();

        assert_eq!(
            watcher.observe(Biome::Glacier),
            Some((None, Biome::Glacier)),
            "First observation is a transition from nothing"
        );
        assert_eq!(watcher.observe(Biome::Glacier), None);
        assert_eq!(
            watcher.observe(Biome::Mire),
            Some((Some(Biome::Glacier), Biome::Mire))
        );
        assert_eq!(watcher.observe(Biome::Mire), None);
    }
}
