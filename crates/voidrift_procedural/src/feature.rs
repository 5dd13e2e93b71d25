//! # Biome Features
//!
//! Large structured decorations and hazards placed within a chunk: crystal
//! formations, lava pillars, gravity anomalies and friends.
//!
//! ## Coordinate discipline
//!
//! Feature anchors are **chunk-local** offsets from the chunk origin, and
//! every sub-structure coordinate is a **feature-local** offset from its
//! anchor, so a whole feature can be translated as a unit. Only the
//! consumer ever adds the chunk origin in.
//!
//! ## Salt discipline
//!
//! Every top-level feature owns a salt block derived from its index, and
//! every sub-element inside it draws from a monotonically increasing salt
//! offset. No two elements' randomness can collide, and adding a field to
//! one variant never perturbs another.
//!
//! Timer-like fields (eruption periods, pulse phases) are emitted fixed;
//! advancing them at runtime is the simulation collaborator's job.

use serde::{Deserialize, Serialize};
use voidrift_shared::Vec2;

use crate::biome::Biome;
use crate::chunk::ChunkCoord;
use crate::hash::SeededHash;

/// Salt for the per-chunk top-level feature count.
const SALT_FEATURE_COUNT: u32 = 1000;
/// Base salt of the first top-level feature's block.
const SALT_FEATURE_BASE: u32 = 1010;
/// Salt stride between top-level features.
const FEATURE_SALT_STRIDE: u32 = 120;
/// Offset of the first sub-element salt within a feature block.
const SUB_ELEMENT_OFFSET: u32 = 10;
/// Salt stride between sub-elements of one feature.
const SUB_ELEMENT_STRIDE: u32 = 6;

/// Margin (world units) keeping feature anchors off the chunk edge.
const ANCHOR_MARGIN: f64 = 120.0;

/// Discriminant of a [`BiomeFeature`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Raised island platform.
    Island,
    /// Impassable tear in the floor.
    VoidGap,
    /// Shimmering rip in reality.
    RealityTear,
    /// Towering ice spire.
    GlacialSpire,
    /// Erupting lava column.
    LavaPillar,
    /// Pulsing pool of toxin.
    ToxicPool,
    /// Cluster of crystal shards.
    CrystalFormation,
    /// Branching coral growth.
    CoralReef,
    /// Giant flowering tree.
    BloomTree,
    /// Orbit-capturing gravity well.
    GravityAnomaly,
}

/// A rock decorating an island's shoreline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShoreRock {
    /// Feature-local offset from the island anchor.
    pub offset: Vec2,
    /// Rock radius.
    pub size: f32,
}

/// Raised island platform (void fringe).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Island {
    /// Chunk-local anchor.
    pub anchor: Vec2,
    /// Platform radius.
    pub radius: f32,
    /// Shoreline decoration.
    pub shore_rocks: Vec<ShoreRock>,
}

/// Rectangular tear in the world floor (void fringe).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoidGap {
    /// Chunk-local anchor (gap center).
    pub anchor: Vec2,
    /// Half extent along X.
    pub half_width: f32,
    /// Half extent along Y.
    pub half_height: f32,
    /// Starting phase for the edge-shimmer animation.
    pub drift_phase: f32,
}

/// A mote drifting along a reality tear.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TearWisp {
    /// Feature-local offset from the tear anchor.
    pub offset: Vec2,
    /// Drift speed in world units per second.
    pub drift_speed: f32,
    /// Starting animation phase.
    pub phase: f32,
}

/// Shimmering rip in reality (void fringe).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealityTear {
    /// Chunk-local anchor (tear midpoint).
    pub anchor: Vec2,
    /// Tear length.
    pub length: f32,
    /// Orientation in radians.
    pub angle: f32,
    /// Drifting motes along the tear.
    pub wisps: Vec<TearWisp>,
}

/// A ridge of ice radiating from a spire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IceRidge {
    /// Feature-local offset of the ridge base.
    pub offset: Vec2,
    /// Ridge length.
    pub length: f32,
    /// Orientation in radians.
    pub angle: f32,
}

/// Towering ice spire (glacier).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlacialSpire {
    /// Chunk-local anchor.
    pub anchor: Vec2,
    /// Spire height, for the renderer's projection.
    pub height: f32,
    /// Radiating ground ridges.
    pub ridges: Vec<IceRidge>,
}

/// A vent on a lava pillar's flank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LavaVent {
    /// Feature-local offset from the pillar anchor.
    pub offset: Vec2,
    /// Seconds between eruptions.
    pub eruption_period: f32,
    /// Starting timer phase, so vents do not erupt in lockstep.
    pub eruption_phase: f32,
}

/// Erupting lava column (ashlands).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LavaPillar {
    /// Chunk-local anchor.
    pub anchor: Vec2,
    /// Pillar base radius.
    pub radius: f32,
    /// Pillar height.
    pub height: f32,
    /// Flank vents.
    pub vents: Vec<LavaVent>,
}

/// A bubbler inside a toxic pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToxicBubbler {
    /// Feature-local offset from the pool anchor.
    pub offset: Vec2,
    /// Bubbler radius.
    pub radius: f32,
    /// Seconds per pulse.
    pub pulse_period: f32,
    /// Starting pulse phase.
    pub pulse_phase: f32,
}

/// Pulsing pool of toxin (mire).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToxicPool {
    /// Chunk-local anchor (pool center).
    pub anchor: Vec2,
    /// Pool radius.
    pub radius: f32,
    /// Gas bubblers within the pool.
    pub bubblers: Vec<ToxicBubbler>,
}

/// One shard of a crystal formation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrystalShard {
    /// Feature-local offset from the formation anchor.
    pub offset: Vec2,
    /// Shard height.
    pub height: f32,
    /// Hue rotation applied to the biome palette, in degrees.
    pub hue_shift: f32,
}

/// Cluster of crystal shards (crystalfields).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrystalFormation {
    /// Chunk-local anchor.
    pub anchor: Vec2,
    /// Individual shards.
    pub shards: Vec<CrystalShard>,
}

/// One branch of a coral reef.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoralBranch {
    /// Feature-local offset of the branch base.
    pub offset: Vec2,
    /// Branch length.
    pub length: f32,
    /// Orientation in radians.
    pub angle: f32,
    /// Tint index into the biome palette.
    pub tint: u8,
}

/// Branching coral growth (coral shallows).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoralReef {
    /// Chunk-local anchor.
    pub anchor: Vec2,
    /// Branches of the colony.
    pub branches: Vec<CoralBranch>,
}

/// A blossom in a bloom tree's canopy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Blossom {
    /// Feature-local offset within the canopy.
    pub offset: Vec2,
    /// Blossom size.
    pub size: f32,
    /// Starting sway phase.
    pub sway_phase: f32,
}

/// Giant flowering tree (verdance).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BloomTree {
    /// Chunk-local anchor (trunk).
    pub anchor: Vec2,
    /// Canopy radius.
    pub canopy_radius: f32,
    /// Blossoms scattered through the canopy.
    pub blossoms: Vec<Blossom>,
}

/// A visual ring orbiting a gravity anomaly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRing {
    /// Ring radius around the anchor.
    pub radius: f32,
    /// Angular speed in radians per second.
    pub angular_speed: f32,
    /// Rotation direction.
    pub clockwise: bool,
}

/// Orbit-capturing gravity well (anomaly wastes).
///
/// Obstacles generated within the capture band around the anchor are
/// tagged with orbit parameters; see the chunk generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GravityAnomaly {
    /// Chunk-local anchor (well center).
    pub anchor: Vec2,
    /// Visual radius of the well.
    pub radius: f32,
    /// Pull strength hint for the simulation.
    pub pull_strength: f32,
    /// Decorative orbiting rings.
    pub rings: Vec<AnomalyRing>,
}

/// A large structured feature placed within one chunk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BiomeFeature {
    /// Raised island platform.
    Island(Island),
    /// Impassable floor tear.
    VoidGap(VoidGap),
    /// Shimmering reality rip.
    RealityTear(RealityTear),
    /// Towering ice spire.
    GlacialSpire(GlacialSpire),
    /// Erupting lava column.
    LavaPillar(LavaPillar),
    /// Pulsing toxin pool.
    ToxicPool(ToxicPool),
    /// Crystal shard cluster.
    CrystalFormation(CrystalFormation),
    /// Branching coral growth.
    CoralReef(CoralReef),
    /// Giant flowering tree.
    BloomTree(BloomTree),
    /// Orbit-capturing gravity well.
    GravityAnomaly(GravityAnomaly),
}

impl BiomeFeature {
    /// Returns the variant discriminant.
    #[must_use]
    pub const fn kind(&self) -> FeatureKind {
        match self {
            Self::Island(_) => FeatureKind::Island,
            Self::VoidGap(_) => FeatureKind::VoidGap,
            Self::RealityTear(_) => FeatureKind::RealityTear,
            Self::GlacialSpire(_) => FeatureKind::GlacialSpire,
            Self::LavaPillar(_) => FeatureKind::LavaPillar,
            Self::ToxicPool(_) => FeatureKind::ToxicPool,
            Self::CrystalFormation(_) => FeatureKind::CrystalFormation,
            Self::CoralReef(_) => FeatureKind::CoralReef,
            Self::BloomTree(_) => FeatureKind::BloomTree,
            Self::GravityAnomaly(_) => FeatureKind::GravityAnomaly,
        }
    }

    /// Returns the chunk-local anchor.
    #[must_use]
    pub const fn anchor(&self) -> Vec2 {
        match self {
            Self::Island(f) => f.anchor,
            Self::VoidGap(f) => f.anchor,
            Self::RealityTear(f) => f.anchor,
            Self::GlacialSpire(f) => f.anchor,
            Self::LavaPillar(f) => f.anchor,
            Self::ToxicPool(f) => f.anchor,
            Self::CrystalFormation(f) => f.anchor,
            Self::CoralReef(f) => f.anchor,
            Self::BloomTree(f) => f.anchor,
            Self::GravityAnomaly(f) => f.anchor,
        }
    }
}

/// Per-biome feature builder.
///
/// Dispatches on the biome to exactly one builder; each rolls a small
/// hash-derived count of top-level features, then their sub-structures.
/// Pure: two calls with the same inputs build identical features.
#[derive(Clone, Copy, Debug)]
pub struct FeatureGenerator {
    hash: SeededHash,
}

/// Rolls inside one top-level feature's salt block.
///
/// Wraps the chunk-level hash so builders address fields by small local
/// offsets instead of juggling absolute salts.
#[derive(Clone, Copy)]
struct FeatureRoll {
    hash: SeededHash,
    coord: ChunkCoord,
    base: u32,
}

impl FeatureRoll {
    fn sample(&self, offset: u32) -> f64 {
        self.hash.sample(self.coord.x, self.coord.y, self.base + offset)
    }

    fn range(&self, offset: u32, min: f64, max: f64) -> f32 {
        self.hash
            .range(self.coord.x, self.coord.y, self.base + offset, min, max) as f32
    }

    fn int_range(&self, offset: u32, min: i32, max: i32) -> i32 {
        self.hash
            .int_range(self.coord.x, self.coord.y, self.base + offset, min, max)
    }

    /// Chunk-local anchor, kept away from the chunk edge.
    fn anchor(&self, offset: u32) -> Vec2 {
        let span = f64::from(voidrift_shared::CHUNK_SIZE_UNITS);
        Vec2::new(
            self.range(offset, ANCHOR_MARGIN, span - ANCHOR_MARGIN),
            self.range(offset + 1, ANCHOR_MARGIN, span - ANCHOR_MARGIN),
        )
    }

    /// Feature-local offset within a square of the given half extent.
    fn local_offset(&self, offset: u32, half_extent: f64) -> Vec2 {
        Vec2::new(
            self.range(offset, -half_extent, half_extent),
            self.range(offset + 1, -half_extent, half_extent),
        )
    }

    /// Salt offset of sub-element `index`.
    const fn sub(index: u32) -> u32 {
        SUB_ELEMENT_OFFSET + index * SUB_ELEMENT_STRIDE
    }
}

impl FeatureGenerator {
    /// Creates a feature generator bound to a seeded hash.
    #[must_use]
    pub const fn new(hash: SeededHash) -> Self {
        Self { hash }
    }

    /// Builds all features for one chunk.
    ///
    /// Anchors are chunk-local; the caller translates by the chunk origin
    /// when it needs world positions.
    #[must_use]
    pub fn generate(&self, coord: ChunkCoord, biome: Biome) -> Vec<BiomeFeature> {
        let count = self
            .hash
            .int_range(coord.x, coord.y, SALT_FEATURE_COUNT, 1, 2);

        let mut features = Vec::with_capacity(count as usize);
        for index in 0..count {
            let roll = FeatureRoll {
                hash: self.hash,
                coord,
                base: SALT_FEATURE_BASE + index as u32 * FEATURE_SALT_STRIDE,
            };
            features.push(self.build_one(biome, &roll));
        }
        features
    }

    fn build_one(&self, biome: Biome, roll: &FeatureRoll) -> BiomeFeature {
        match biome {
            Biome::Verdance => Self::bloom_tree(roll),
            Biome::Ashlands => Self::lava_pillar(roll),
            Biome::Glacier => Self::glacial_spire(roll),
            Biome::Mire => Self::toxic_pool(roll),
            Biome::Crystalfields => Self::crystal_formation(roll),
            Biome::CoralShallows => Self::coral_reef(roll),
            Biome::VoidFringe => Self::void_fringe_feature(roll),
            Biome::AnomalyWastes => Self::gravity_anomaly(roll),
        }
    }

    fn bloom_tree(roll: &FeatureRoll) -> BiomeFeature {
        let canopy_radius = roll.range(2, 60.0, 140.0);
        let blossom_count = roll.int_range(3, 4, 9);

        let mut blossoms = Vec::with_capacity(blossom_count as usize);
        for j in 0..blossom_count as u32 {
            let s = FeatureRoll::sub(j);
            blossoms.push(Blossom {
                offset: roll.local_offset(s, f64::from(canopy_radius)),
                size: roll.range(s + 2, 6.0, 18.0),
                sway_phase: roll.range(s + 3, 0.0, std::f64::consts::TAU),
            });
        }

        BiomeFeature::BloomTree(BloomTree {
            anchor: roll.anchor(0),
            canopy_radius,
            blossoms,
        })
    }

    fn lava_pillar(roll: &FeatureRoll) -> BiomeFeature {
        let radius = roll.range(2, 40.0, 90.0);
        let vent_count = roll.int_range(3, 2, 5);

        let mut vents = Vec::with_capacity(vent_count as usize);
        for j in 0..vent_count as u32 {
            let s = FeatureRoll::sub(j);
            vents.push(LavaVent {
                offset: roll.local_offset(s, f64::from(radius)),
                eruption_period: roll.range(s + 2, 4.0, 11.0),
                eruption_phase: roll.range(s + 3, 0.0, 4.0),
            });
        }

        BiomeFeature::LavaPillar(LavaPillar {
            anchor: roll.anchor(0),
            radius,
            height: roll.range(4, 120.0, 260.0),
            vents,
        })
    }

    fn glacial_spire(roll: &FeatureRoll) -> BiomeFeature {
        let ridge_count = roll.int_range(2, 3, 6);

        let mut ridges = Vec::with_capacity(ridge_count as usize);
        for j in 0..ridge_count as u32 {
            let s = FeatureRoll::sub(j);
            ridges.push(IceRidge {
                offset: roll.local_offset(s, 70.0),
                length: roll.range(s + 2, 40.0, 120.0),
                angle: roll.range(s + 3, 0.0, std::f64::consts::TAU),
            });
        }

        BiomeFeature::GlacialSpire(GlacialSpire {
            anchor: roll.anchor(0),
            height: roll.range(3, 180.0, 340.0),
            ridges,
        })
    }

    fn toxic_pool(roll: &FeatureRoll) -> BiomeFeature {
        let radius = roll.range(2, 80.0, 170.0);
        let bubbler_count = roll.int_range(3, 2, 6);

        let mut bubblers = Vec::with_capacity(bubbler_count as usize);
        for j in 0..bubbler_count as u32 {
            let s = FeatureRoll::sub(j);
            bubblers.push(ToxicBubbler {
                // Keep bubblers inside the pool body.
                offset: roll.local_offset(s, f64::from(radius) * 0.7),
                radius: roll.range(s + 2, 8.0, 24.0),
                pulse_period: roll.range(s + 3, 2.0, 6.0),
                pulse_phase: roll.range(s + 4, 0.0, 2.0),
            });
        }

        BiomeFeature::ToxicPool(ToxicPool {
            anchor: roll.anchor(0),
            radius,
            bubblers,
        })
    }

    fn crystal_formation(roll: &FeatureRoll) -> BiomeFeature {
        let shard_count = roll.int_range(2, 5, 12);

        let mut shards = Vec::with_capacity(shard_count as usize);
        for j in 0..shard_count as u32 {
            let s = FeatureRoll::sub(j);
            shards.push(CrystalShard {
                offset: roll.local_offset(s, 90.0),
                height: roll.range(s + 2, 20.0, 80.0),
                hue_shift: roll.range(s + 3, -30.0, 30.0),
            });
        }

        BiomeFeature::CrystalFormation(CrystalFormation {
            anchor: roll.anchor(0),
            shards,
        })
    }

    fn coral_reef(roll: &FeatureRoll) -> BiomeFeature {
        let branch_count = roll.int_range(2, 4, 10);

        let mut branches = Vec::with_capacity(branch_count as usize);
        for j in 0..branch_count as u32 {
            let s = FeatureRoll::sub(j);
            branches.push(CoralBranch {
                offset: roll.local_offset(s, 80.0),
                length: roll.range(s + 2, 25.0, 75.0),
                angle: roll.range(s + 3, 0.0, std::f64::consts::TAU),
                tint: roll.int_range(s + 4, 0, 2) as u8,
            });
        }

        BiomeFeature::CoralReef(CoralReef {
            anchor: roll.anchor(0),
            branches,
        })
    }

    /// The void fringe mixes three variants; one extra draw picks which.
    fn void_fringe_feature(roll: &FeatureRoll) -> BiomeFeature {
        match roll.int_range(9, 0, 2) {
            0 => Self::island(roll),
            1 => Self::void_gap(roll),
            _ => Self::reality_tear(roll),
        }
    }

    fn island(roll: &FeatureRoll) -> BiomeFeature {
        let radius = roll.range(2, 90.0, 180.0);
        let rock_count = roll.int_range(3, 3, 7);

        let mut shore_rocks = Vec::with_capacity(rock_count as usize);
        for j in 0..rock_count as u32 {
            let s = FeatureRoll::sub(j);
            shore_rocks.push(ShoreRock {
                offset: roll.local_offset(s, f64::from(radius)),
                size: roll.range(s + 2, 8.0, 26.0),
            });
        }

        BiomeFeature::Island(Island {
            anchor: roll.anchor(0),
            radius,
            shore_rocks,
        })
    }

    fn void_gap(roll: &FeatureRoll) -> BiomeFeature {
        BiomeFeature::VoidGap(VoidGap {
            anchor: roll.anchor(0),
            half_width: roll.range(2, 60.0, 200.0),
            half_height: roll.range(3, 60.0, 200.0),
            drift_phase: roll.range(4, 0.0, std::f64::consts::TAU),
        })
    }

    fn reality_tear(roll: &FeatureRoll) -> BiomeFeature {
        let wisp_count = roll.int_range(3, 2, 5);

        let mut wisps = Vec::with_capacity(wisp_count as usize);
        for j in 0..wisp_count as u32 {
            let s = FeatureRoll::sub(j);
            wisps.push(TearWisp {
                offset: roll.local_offset(s, 50.0),
                drift_speed: roll.range(s + 2, 10.0, 35.0),
                phase: roll.range(s + 3, 0.0, std::f64::consts::TAU),
            });
        }

        BiomeFeature::RealityTear(RealityTear {
            anchor: roll.anchor(0),
            length: roll.range(2, 100.0, 240.0),
            angle: roll.range(4, 0.0, std::f64::consts::TAU),
            wisps,
        })
    }

    fn gravity_anomaly(roll: &FeatureRoll) -> BiomeFeature {
        let ring_count = roll.int_range(2, 1, 3);

        let mut rings = Vec::with_capacity(ring_count as usize);
        for j in 0..ring_count as u32 {
            let s = FeatureRoll::sub(j);
            rings.push(AnomalyRing {
                radius: roll.range(s, 50.0, 160.0),
                angular_speed: roll.range(s + 1, 0.3, 1.2),
                clockwise: roll.sample(s + 2) < 0.5,
            });
        }

        BiomeFeature::GravityAnomaly(GravityAnomaly {
            anchor: roll.anchor(0),
            radius: roll.range(3, 70.0, 140.0),
            pull_strength: roll.range(4, 30.0, 90.0),
            rings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::WorldSeed;

    fn generator(seed: u64) -> FeatureGenerator {
        FeatureGenerator::new(SeededHash::new(WorldSeed::new(seed)))
    }

    #[test]
    fn test_feature_determinism() {
        let gen1 = generator(42);
        let gen2 = generator(42);

        for biome in Biome::ALL {
            let coord = ChunkCoord::new(3, -7);
            assert_eq!(
                gen1.generate(coord, biome),
                gen2.generate(coord, biome),
                "Features must be identical for biome {biome:?}"
            );
        }
    }

    #[test]
    fn test_feature_count_in_range() {
        let gen = generator(42);

        for x in -10..10 {
            for y in -10..10 {
                let features = gen.generate(ChunkCoord::new(x, y), Biome::Ashlands);
                assert!(
                    (1..=2).contains(&features.len()),
                    "Chunk ({x}, {y}) rolled {} features",
                    features.len()
                );
            }
        }
    }

    #[test]
    fn test_biome_produces_matching_kind() {
        let gen = generator(7);

        for (biome, kind) in [
            (Biome::Verdance, FeatureKind::BloomTree),
            (Biome::Ashlands, FeatureKind::LavaPillar),
            (Biome::Glacier, FeatureKind::GlacialSpire),
            (Biome::Mire, FeatureKind::ToxicPool),
            (Biome::Crystalfields, FeatureKind::CrystalFormation),
            (Biome::CoralShallows, FeatureKind::CoralReef),
            (Biome::AnomalyWastes, FeatureKind::GravityAnomaly),
        ] {
            for feature in gen.generate(ChunkCoord::new(0, 0), biome) {
                assert_eq!(feature.kind(), kind, "Wrong feature for {biome:?}");
            }
        }
    }

    #[test]
    fn test_void_fringe_mixes_variants() {
        let gen = generator(99);
        let mut kinds = std::collections::HashSet::new();

        for x in -20..20 {
            for y in -20..20 {
                for feature in gen.generate(ChunkCoord::new(x, y), Biome::VoidFringe) {
                    kinds.insert(feature.kind());
                }
            }
        }

        assert!(kinds.contains(&FeatureKind::Island), "No islands rolled");
        assert!(kinds.contains(&FeatureKind::VoidGap), "No void gaps rolled");
        assert!(kinds.contains(&FeatureKind::RealityTear), "No tears rolled");
    }

    #[test]
    fn test_anchors_stay_off_chunk_edge() {
        let gen = generator(13);
        let span = voidrift_shared::CHUNK_SIZE_UNITS;

        for x in -5..5 {
            for y in -5..5 {
                for biome in Biome::ALL {
                    for feature in gen.generate(ChunkCoord::new(x, y), biome) {
                        let anchor = feature.anchor();
                        assert!(
                            anchor.x >= 100.0 && anchor.x <= span - 100.0,
                            "Anchor x {} too close to the edge",
                            anchor.x
                        );
                        assert!(
                            anchor.y >= 100.0 && anchor.y <= span - 100.0,
                            "Anchor y {} too close to the edge",
                            anchor.y
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_sub_elements_do_not_collide() {
        // Two shards of the same formation must not share randomness: if
        // per-index salts collided they would come out identical.
        let gen = generator(42);

        for x in 0..20 {
            let features = gen.generate(ChunkCoord::new(x, 0), Biome::Crystalfields);
            for feature in features {
                let BiomeFeature::CrystalFormation(formation) = feature else {
                    panic!("Crystalfields produced a non-crystal feature");
                };
                for pair in formation.shards.windows(2) {
                    assert_ne!(
                        pair[0], pair[1],
                        "Adjacent shards rolled identical sub-structure"
                    );
                }
            }
        }
    }
}
