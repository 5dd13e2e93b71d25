//! # Chunk System
//!
//! The world is an infinite grid of fixed-size square chunks. A chunk is
//! the unit of generation and streaming: produced lazily on first request,
//! dropped when the player walks away, regenerated bit-identically on
//! return.
//!
//! ## Composition pipeline
//!
//! `ChunkGenerator::generate` runs a fixed sequence of passes - biome
//! features, obstacles, enemies, resources, chests, extraction point,
//! portal - and every pass draws from its own salt block. Adding or
//! removing a content category therefore never perturbs another
//! category's rolls, which is what keeps old seeds stable across patches.

use serde::{Deserialize, Serialize};
use voidrift_shared::{EnemyId, PortalId, Vec2, CHUNK_SIZE_UNITS};

use crate::biome::Biome;
use crate::config::GenerationConfig;
use crate::entity::{
    Chest, ChestKind, Enemy, EnemyArchetype, ExtractionPoint, Obstacle, ObstacleShape,
    OrbitParams, PortalSpawn, ResourceNode,
};
use crate::feature::{BiomeFeature, FeatureGenerator, FeatureKind};
use crate::hash::SeededHash;
use crate::ledger::WorldLedger;

// Salt blocks per content category. Features own 1000..2000 (see the
// feature module); biome assignment owns single-digit salts.
const SALT_OBSTACLE_COUNT: u32 = 2000;
const SALT_OBSTACLE_BASE: u32 = 2001;
const OBSTACLE_SALT_STRIDE: u32 = 8;

const SALT_ENEMY_COUNT: u32 = 3000;
const SALT_ENEMY_BASE: u32 = 3010;
const ENEMY_SALT_STRIDE: u32 = 64;
const ENEMY_ATTEMPT_STRIDE: u32 = 4;

/// Enemy slots the salt layout can hold before slot blocks would run
/// into the resource block. Config validation enforces this.
pub(crate) const ENEMY_SLOT_LIMIT: i32 =
    ((SALT_RESOURCE_COUNT - SALT_ENEMY_BASE) / ENEMY_SALT_STRIDE) as i32;
/// Spacing attempts per slot before attempt salts would spill into the
/// next slot's block. Config validation enforces this.
pub(crate) const SPACING_RETRY_LIMIT: u32 = ENEMY_SALT_STRIDE / ENEMY_ATTEMPT_STRIDE;

const SALT_RESOURCE_COUNT: u32 = 4000;
const SALT_RESOURCE_BASE: u32 = 4001;
const RESOURCE_SALT_STRIDE: u32 = 8;

const SALT_CHEST_REGULAR: u32 = 5000;
const SALT_CHEST_TIMED: u32 = 5010;
const SALT_CHEST_LOCKED: u32 = 5020;

const SALT_EXTRACTION: u32 = 6000;

const SALT_PORTAL: u32 = 7000;

/// Obstacles this close to a gravity anomaly (exclusive band, world
/// units) are captured into orbit.
const ORBIT_CAPTURE_MIN: f32 = 120.0;
/// Outer edge of the orbit capture band.
const ORBIT_CAPTURE_MAX: f32 = 300.0;

/// Activation radius of extraction points.
const EXTRACTION_RADIUS: f32 = 90.0;

/// Jitter half-extent when snapping a resource to its anchor feature.
const ANCHOR_JITTER: f64 = 90.0;

const OBSTACLE_SHAPES: [ObstacleShape; 4] = [
    ObstacleShape::Boulder,
    ObstacleShape::Wreck,
    ObstacleShape::Pillar,
    ObstacleShape::Crag,
];

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not world units).
    pub x: i32,
    /// Y coordinate (in chunks, not world units).
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts a world position to the containing chunk's coordinate.
    #[inline]
    #[must_use]
    pub fn from_world_pos(px: f32, py: f32) -> Self {
        Self {
            x: (px / CHUNK_SIZE_UNITS).floor() as i32,
            y: (py / CHUNK_SIZE_UNITS).floor() as i32,
        }
    }

    /// World position of this chunk's origin (minimum corner).
    #[inline]
    #[must_use]
    pub fn origin(self) -> Vec2 {
        Vec2::new(
            self.x as f32 * CHUNK_SIZE_UNITS,
            self.y as f32 * CHUNK_SIZE_UNITS,
        )
    }

    /// Chebyshev distance to another chunk, the streaming metric.
    #[inline]
    #[must_use]
    pub const fn chebyshev_distance(self, other: Self) -> i32 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        if dx > dy {
            dx
        } else {
            dy
        }
    }

    /// Euclidean distance from the world origin in chunk units, the
    /// difficulty metric.
    #[inline]
    #[must_use]
    pub fn distance_from_origin(self) -> f64 {
        f64::from(self.x).hypot(f64::from(self.y))
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One generated chunk of world content.
///
/// Immutable after creation. Enemies are handed to the simulation when
/// the chunk loads; resources and chests are consumed in place; the
/// generator itself never mutates a chunk it has produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Grid coordinate.
    pub coord: ChunkCoord,
    /// Assigned biome.
    pub biome: Biome,
    /// Terrain obstacles (world positions).
    pub obstacles: Vec<Obstacle>,
    /// Hostiles, already kill-filtered (world positions).
    pub enemies: Vec<Enemy>,
    /// Harvestable deposits (world positions).
    pub resource_nodes: Vec<ResourceNode>,
    /// Portal spawns in this chunk (zero or one). Link state lives in
    /// the world ledger, never here.
    pub portals: Vec<PortalSpawn>,
    /// Loot chests (world positions).
    pub chests: Vec<Chest>,
    /// Extraction point, if this chunk rolled one.
    pub extraction_point: Option<ExtractionPoint>,
    /// Large decorative/hazard features (chunk-local anchors).
    pub features: Vec<BiomeFeature>,
}

/// Deterministic chunk content composer.
#[derive(Clone, Copy, Debug)]
pub struct ChunkGenerator {
    hash: SeededHash,
    features: FeatureGenerator,
}

impl ChunkGenerator {
    /// Creates a generator bound to a seeded hash.
    #[must_use]
    pub const fn new(hash: SeededHash) -> Self {
        Self {
            hash,
            features: FeatureGenerator::new(hash),
        }
    }

    /// Generates the chunk at `coord`.
    ///
    /// Pure except for the ledger: kill filtering reads it, portal
    /// registration may extend it. Two calls with the same coordinate and
    /// the same ledger portal state produce identical chunks modulo
    /// kill-filtering.
    #[must_use]
    pub fn generate(
        &self,
        coord: ChunkCoord,
        biome: Biome,
        config: &GenerationConfig,
        ledger: &mut WorldLedger,
    ) -> Chunk {
        let origin = coord.origin();
        let distance = coord.distance_from_origin();

        let features = self.features.generate(coord, biome);
        let obstacles = self.place_obstacles(coord, origin, config, &features);
        let enemies = self.place_enemies(coord, origin, distance, biome, config, ledger);
        let resource_nodes = self.place_resources(coord, origin, biome, config, &features);
        let chests = self.place_chests(coord, origin, distance, config);
        let extraction_point = self.place_extraction(coord, origin, distance, config);
        let portals = self.place_portal(coord, origin, distance, config, ledger);

        tracing::debug!(
            "generated chunk {coord}: biome={}, {} enemies, {} obstacles",
            biome.name(),
            enemies.len(),
            obstacles.len()
        );

        Chunk {
            coord,
            biome,
            obstacles,
            enemies,
            resource_nodes,
            portals,
            chests,
            extraction_point,
            features,
        }
    }

    /// Uniform position within the chunk from two consecutive salts.
    fn chunk_pos(&self, coord: ChunkCoord, origin: Vec2, salt: u32) -> Vec2 {
        let span = f64::from(CHUNK_SIZE_UNITS);
        origin
            + Vec2::new(
                self.hash.range(coord.x, coord.y, salt, 0.0, span) as f32,
                self.hash.range(coord.x, coord.y, salt + 1, 0.0, span) as f32,
            )
    }

    /// World-space anchors of all features of one kind in this chunk.
    fn feature_anchors(origin: Vec2, features: &[BiomeFeature], kind: FeatureKind) -> Vec<Vec2> {
        features
            .iter()
            .filter(|f| f.kind() == kind)
            .map(|f| origin + f.anchor())
            .collect()
    }

    fn place_obstacles(
        &self,
        coord: ChunkCoord,
        origin: Vec2,
        config: &GenerationConfig,
        features: &[BiomeFeature],
    ) -> Vec<Obstacle> {
        let count = self.hash.int_range(
            coord.x,
            coord.y,
            SALT_OBSTACLE_COUNT,
            config.obstacle_min,
            config.obstacle_max,
        );
        let anomalies = Self::feature_anchors(origin, features, FeatureKind::GravityAnomaly);

        let mut obstacles = Vec::with_capacity(count as usize);
        for i in 0..count as u32 {
            let s = SALT_OBSTACLE_BASE + i * OBSTACLE_SALT_STRIDE;
            let position = self.chunk_pos(coord, origin, s);
            let size = self.hash.range(coord.x, coord.y, s + 2, 18.0, 70.0) as f32;
            let shape = *self.hash.pick(coord.x, coord.y, s + 3, &OBSTACLE_SHAPES);

            // Capture by the nearest anomaly within the orbit band. The
            // parameters are emitted once here; the simulation animates.
            let orbit = anomalies
                .iter()
                .map(|center| (*center, center.distance(position)))
                .filter(|(_, d)| *d > ORBIT_CAPTURE_MIN && *d < ORBIT_CAPTURE_MAX)
                .min_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(center, radius)| OrbitParams {
                    center,
                    radius,
                    angular_speed: self.hash.range(coord.x, coord.y, s + 4, 0.2, 0.8) as f32,
                    clockwise: self.hash.roll(coord.x, coord.y, s + 5, 0.5),
                });

            obstacles.push(Obstacle {
                position,
                size,
                shape,
                orbit,
            });
        }
        obstacles
    }

    fn place_enemies(
        &self,
        coord: ChunkCoord,
        origin: Vec2,
        distance: f64,
        biome: Biome,
        config: &GenerationConfig,
        ledger: &WorldLedger,
    ) -> Vec<Enemy> {
        let scaled = config.enemy_base_count + (distance * config.enemy_distance_scale) as i32;
        let jitter = self.hash.int_range(coord.x, coord.y, SALT_ENEMY_COUNT, 0, 1);
        let count = (scaled + jitter).min(config.enemy_max_count);

        // Far from the origin the native roster is extended, not replaced.
        let mut roster: Vec<EnemyArchetype> = biome.enemy_roster().to_vec();
        if distance > config.remote_roster_distance {
            roster.extend_from_slice(&EnemyArchetype::REMOTE_ROSTER);
        }

        let mut enemies: Vec<Enemy> = Vec::with_capacity(count as usize);
        for slot in 0..count as u32 {
            let slot_salt = SALT_ENEMY_BASE + slot * ENEMY_SALT_STRIDE;

            // Bounded seeded rejection sampling for spacing. On
            // exhaustion the last candidate is accepted as-is: cramped
            // placement beats a missing spawn, and staying on the seeded
            // stream is what keeps this deterministic.
            let mut position = self.chunk_pos(coord, origin, slot_salt);
            for attempt in 1..config.spacing_retries {
                let spaced = enemies
                    .iter()
                    .all(|e| e.position.distance(position) >= config.enemy_min_spacing);
                if spaced {
                    break;
                }
                position =
                    self.chunk_pos(coord, origin, slot_salt + attempt * ENEMY_ATTEMPT_STRIDE);
            }

            let archetype = *self.hash.pick(coord.x, coord.y, slot_salt + 2, &roster);
            let modifier_eligible = distance > config.modifier_distance
                && self
                    .hash
                    .roll(coord.x, coord.y, slot_salt + 3, config.modifier_chance);

            enemies.push(Enemy {
                id: EnemyId::new(coord.x, coord.y, slot as u16),
                archetype,
                position,
                max_health: archetype.base_health(),
                modifier_eligible,
            });
        }

        // Kill filtering happens after all rolls so the ledger never
        // perturbs surviving enemies' randomness.
        enemies.retain(|e| !ledger.is_killed(e.id));
        enemies
    }

    fn place_resources(
        &self,
        coord: ChunkCoord,
        origin: Vec2,
        biome: Biome,
        config: &GenerationConfig,
        features: &[BiomeFeature],
    ) -> Vec<ResourceNode> {
        let count = self.hash.int_range(
            coord.x,
            coord.y,
            SALT_RESOURCE_COUNT,
            config.resource_min,
            config.resource_max,
        );

        let mut nodes = Vec::with_capacity(count as usize);
        for i in 0..count as u32 {
            let s = SALT_RESOURCE_BASE + i * RESOURCE_SALT_STRIDE;
            let kind = *self
                .hash
                .pick(coord.x, coord.y, s, biome.resource_roster());

            // Anchored kinds snap to a matching feature when the chunk
            // has one; otherwise (or on the fallback roll) they land
            // uniformly like everything else.
            let anchor = kind.anchor_feature().and_then(|feature_kind| {
                let anchors = Self::feature_anchors(origin, features, feature_kind);
                if anchors.is_empty()
                    || !self
                        .hash
                        .roll(coord.x, coord.y, s + 1, config.resource_anchor_chance)
                {
                    None
                } else {
                    Some(anchors[0])
                }
            });

            let position = match anchor {
                Some(anchor) => {
                    anchor
                        + Vec2::new(
                            self.hash
                                .range(coord.x, coord.y, s + 2, -ANCHOR_JITTER, ANCHOR_JITTER)
                                as f32,
                            self.hash
                                .range(coord.x, coord.y, s + 3, -ANCHOR_JITTER, ANCHOR_JITTER)
                                as f32,
                        )
                }
                None => self.chunk_pos(coord, origin, s + 4),
            };

            let (min_yield, max_yield) = kind.yield_range();
            let amount = self
                .hash
                .int_range(coord.x, coord.y, s + 6, min_yield, max_yield);

            nodes.push(ResourceNode {
                position,
                kind,
                amount: amount as u32,
            });
        }
        nodes
    }

    fn place_chests(
        &self,
        coord: ChunkCoord,
        origin: Vec2,
        distance: f64,
        config: &GenerationConfig,
    ) -> Vec<Chest> {
        let mut chests = Vec::new();

        if self
            .hash
            .roll(coord.x, coord.y, SALT_CHEST_REGULAR, config.chest_chance)
        {
            chests.push(Chest {
                position: self.chunk_pos(coord, origin, SALT_CHEST_REGULAR + 1),
                kind: ChestKind::Regular,
            });
        }
        if distance > config.timed_chest_min_distance
            && self
                .hash
                .roll(coord.x, coord.y, SALT_CHEST_TIMED, config.timed_chest_chance)
        {
            chests.push(Chest {
                position: self.chunk_pos(coord, origin, SALT_CHEST_TIMED + 1),
                kind: ChestKind::Timed,
            });
        }
        if distance > config.locked_chest_min_distance
            && self.hash.roll(
                coord.x,
                coord.y,
                SALT_CHEST_LOCKED,
                config.locked_chest_chance,
            )
        {
            chests.push(Chest {
                position: self.chunk_pos(coord, origin, SALT_CHEST_LOCKED + 1),
                kind: ChestKind::Locked,
            });
        }
        chests
    }

    fn place_extraction(
        &self,
        coord: ChunkCoord,
        origin: Vec2,
        distance: f64,
        config: &GenerationConfig,
    ) -> Option<ExtractionPoint> {
        if distance < config.extraction_min_distance {
            return None;
        }
        if !self
            .hash
            .roll(coord.x, coord.y, SALT_EXTRACTION, config.extraction_chance)
        {
            return None;
        }
        Some(ExtractionPoint {
            position: self.chunk_pos(coord, origin, SALT_EXTRACTION + 1),
            radius: EXTRACTION_RADIUS,
        })
    }

    fn place_portal(
        &self,
        coord: ChunkCoord,
        origin: Vec2,
        distance: f64,
        config: &GenerationConfig,
        ledger: &mut WorldLedger,
    ) -> Vec<PortalSpawn> {
        if distance < config.portal_min_distance {
            return Vec::new();
        }
        if !self
            .hash
            .roll(coord.x, coord.y, SALT_PORTAL, config.portal_chance)
        {
            return Vec::new();
        }

        let position = self.chunk_pos(coord, origin, SALT_PORTAL + 1);
        let portal =
            ledger.get_or_register_portal(PortalId::new(coord.x, coord.y), position);
        // Only id and position go into the chunk; the portal's link may
        // form after this chunk is cached.
        vec![PortalSpawn {
            id: portal.id,
            position: portal.position,
        }]
    }
}
