//! # Biomes
//!
//! Biomes are reference data, never generated: a fixed table of
//! descriptors (palette, enemy roster, resource roster, feature rule)
//! indexed by a small enum.
//!
//! Assignment of biomes to chunks is the propagator's job. Instead of
//! sampling a global noise field - which would have to stay coherent for
//! arbitrarily distant coordinates - the propagator "infects" each new
//! chunk from its already-assigned neighbors with probability 0.9, which
//! yields large contiguous regions at O(1) cost per chunk. Assignments
//! are memoized permanently: a chunk's biome must never change once
//! observed, so the map is write-once and unbounded.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::chunk::ChunkCoord;
use crate::entity::{EnemyArchetype, ResourceKind};
use crate::feature::FeatureKind;
use crate::hash::SeededHash;

/// Salt for the cohesion roll (copy a neighbor vs. fresh draw).
const SALT_COHESION: u32 = 1;
/// Salt for picking among assigned neighbors.
const SALT_NEIGHBOR_PICK: u32 = 2;
/// Salt for the uniform fallback draw over all biomes.
const SALT_UNIFORM_PICK: u32 = 3;

/// Probability that a new chunk copies an assigned neighbor's biome.
const COHESION: f64 = 0.9;

/// RGB palette of a biome, for the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BiomePalette {
    /// Ground fill color.
    pub ground: [u8; 3],
    /// Accent color for features and props.
    pub accent: [u8; 3],
    /// Atmospheric haze tint.
    pub haze: [u8; 3],
}

/// Biome types in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Biome {
    /// Flowering grassland dotted with bloom trees.
    Verdance = 0,
    /// Scorched volcanic plain with lava pillars.
    Ashlands = 1,
    /// Frozen expanse of glacial spires.
    Glacier = 2,
    /// Toxic wetland of pulsing pools.
    Mire = 3,
    /// Plains of crystal formations.
    Crystalfields = 4,
    /// Drained seabed overgrown with coral.
    CoralShallows = 5,
    /// Broken edge of reality: islands, gaps, tears.
    VoidFringe = 6,
    /// Wastes warped by gravity anomalies.
    AnomalyWastes = 7,
}

impl Biome {
    /// Every biome, in index order.
    pub const ALL: [Self; 8] = [
        Self::Verdance,
        Self::Ashlands,
        Self::Glacier,
        Self::Mire,
        Self::Crystalfields,
        Self::CoralShallows,
        Self::VoidFringe,
        Self::AnomalyWastes,
    ];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Verdance => "Verdance",
            Self::Ashlands => "Ashlands",
            Self::Glacier => "Glacier",
            Self::Mire => "Mire",
            Self::Crystalfields => "Crystalfields",
            Self::CoralShallows => "Coral Shallows",
            Self::VoidFringe => "Void Fringe",
            Self::AnomalyWastes => "Anomaly Wastes",
        }
    }

    /// Stable index of this biome (`BiomeIndex` in the world format).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Converts from u8, saturating onto the last biome.
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Verdance,
            1 => Self::Ashlands,
            2 => Self::Glacier,
            3 => Self::Mire,
            4 => Self::Crystalfields,
            5 => Self::CoralShallows,
            6 => Self::VoidFringe,
            _ => Self::AnomalyWastes,
        }
    }

    /// Render palette.
    #[must_use]
    pub const fn palette(self) -> BiomePalette {
        match self {
            Self::Verdance => BiomePalette {
                ground: [58, 112, 52],
                accent: [226, 132, 182],
                haze: [180, 220, 170],
            },
            Self::Ashlands => BiomePalette {
                ground: [66, 48, 44],
                accent: [240, 96, 32],
                haze: [120, 90, 80],
            },
            Self::Glacier => BiomePalette {
                ground: [190, 214, 230],
                accent: [120, 180, 240],
                haze: [210, 230, 245],
            },
            Self::Mire => BiomePalette {
                ground: [52, 64, 40],
                accent: [140, 200, 60],
                haze: [100, 120, 70],
            },
            Self::Crystalfields => BiomePalette {
                ground: [80, 70, 110],
                accent: [170, 120, 255],
                haze: [140, 120, 190],
            },
            Self::CoralShallows => BiomePalette {
                ground: [40, 90, 110],
                accent: [255, 130, 100],
                haze: [90, 160, 180],
            },
            Self::VoidFringe => BiomePalette {
                ground: [30, 26, 44],
                accent: [180, 60, 220],
                haze: [60, 50, 90],
            },
            Self::AnomalyWastes => BiomePalette {
                ground: [88, 84, 78],
                accent: [90, 220, 210],
                haze: [130, 140, 150],
            },
        }
    }

    /// Enemy archetypes native to this biome.
    #[must_use]
    pub const fn enemy_roster(self) -> &'static [EnemyArchetype] {
        match self {
            Self::Verdance => &[
                EnemyArchetype::SporeFly,
                EnemyArchetype::Stalker,
                EnemyArchetype::Charger,
            ],
            Self::Ashlands => &[
                EnemyArchetype::EmberWisp,
                EnemyArchetype::Charger,
                EnemyArchetype::Spitter,
            ],
            Self::Glacier => &[EnemyArchetype::FrostMaw, EnemyArchetype::Stalker],
            Self::Mire => &[
                EnemyArchetype::MireLurker,
                EnemyArchetype::Spitter,
                EnemyArchetype::SporeFly,
            ],
            Self::Crystalfields => &[
                EnemyArchetype::Shardling,
                EnemyArchetype::Stalker,
                EnemyArchetype::Spitter,
            ],
            Self::CoralShallows => &[EnemyArchetype::TideCrawler, EnemyArchetype::Spitter],
            Self::VoidFringe => &[
                EnemyArchetype::NullShade,
                EnemyArchetype::Stalker,
                EnemyArchetype::Shardling,
            ],
            Self::AnomalyWastes => &[
                EnemyArchetype::NullShade,
                EnemyArchetype::Charger,
                EnemyArchetype::EmberWisp,
            ],
        }
    }

    /// Resource kinds that may spawn in this biome.
    #[must_use]
    pub const fn resource_roster(self) -> &'static [ResourceKind] {
        match self {
            Self::Verdance => &[ResourceKind::Bloomwood, ResourceKind::Scrap],
            Self::Ashlands => &[ResourceKind::Ember, ResourceKind::Scrap],
            Self::Glacier => &[ResourceKind::Ice, ResourceKind::Scrap],
            Self::Mire => &[ResourceKind::Toxin, ResourceKind::Scrap],
            Self::Crystalfields => &[ResourceKind::Crystal, ResourceKind::Scrap],
            Self::CoralShallows => &[ResourceKind::Coral, ResourceKind::Scrap],
            Self::VoidFringe => &[
                ResourceKind::Flux,
                ResourceKind::Crystal,
                ResourceKind::Scrap,
            ],
            Self::AnomalyWastes => &[ResourceKind::Flux, ResourceKind::Scrap],
        }
    }

    /// Feature kinds this biome's generator produces.
    #[must_use]
    pub const fn feature_kinds(self) -> &'static [FeatureKind] {
        match self {
            Self::Verdance => &[FeatureKind::BloomTree],
            Self::Ashlands => &[FeatureKind::LavaPillar],
            Self::Glacier => &[FeatureKind::GlacialSpire],
            Self::Mire => &[FeatureKind::ToxicPool],
            Self::Crystalfields => &[FeatureKind::CrystalFormation],
            Self::CoralShallows => &[FeatureKind::CoralReef],
            Self::VoidFringe => &[
                FeatureKind::Island,
                FeatureKind::VoidGap,
                FeatureKind::RealityTear,
            ],
            Self::AnomalyWastes => &[FeatureKind::GravityAnomaly],
        }
    }
}

/// Assigns biomes to chunk coordinates with spatial cohesion.
///
/// The assignment map is write-once and never pruned; it is part of the
/// world's identity and rides along in snapshots.
#[derive(Clone, Debug)]
pub struct BiomePropagator {
    hash: SeededHash,
    assignments: HashMap<ChunkCoord, Biome>,
}

impl BiomePropagator {
    /// Creates an empty propagator bound to a seeded hash.
    #[must_use]
    pub fn new(hash: SeededHash) -> Self {
        Self {
            hash,
            assignments: HashMap::new(),
        }
    }

    /// Returns the biome already assigned to `coord`, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, coord: ChunkCoord) -> Option<Biome> {
        self.assignments.get(&coord).copied()
    }

    /// Returns the biome for `coord`, assigning one if needed.
    ///
    /// With probability 0.9 a new chunk copies a uniformly-picked
    /// already-assigned axis neighbor; otherwise (or when no neighbor is
    /// assigned yet - notably the very first chunk of a world) it draws
    /// uniformly over all biomes.
    pub fn assign(&mut self, coord: ChunkCoord) -> Biome {
        if let Some(existing) = self.assignments.get(&coord) {
            return *existing;
        }

        let neighbors: Vec<Biome> = [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .iter()
            .filter_map(|(dx, dy)| {
                self.assignments
                    .get(&ChunkCoord::new(coord.x + dx, coord.y + dy))
                    .copied()
            })
            .collect();

        let biome = if !neighbors.is_empty()
            && self.hash.roll(coord.x, coord.y, SALT_COHESION, COHESION)
        {
            *self
                .hash
                .pick(coord.x, coord.y, SALT_NEIGHBOR_PICK, &neighbors)
        } else {
            *self
                .hash
                .pick(coord.x, coord.y, SALT_UNIFORM_PICK, &Biome::ALL)
        };

        self.assignments.insert(coord, biome);
        biome
    }

    /// Number of assigned chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// True when nothing has been assigned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Iterates over all assignments, for snapshotting.
    pub fn entries(&self) -> impl Iterator<Item = (ChunkCoord, Biome)> + '_ {
        self.assignments.iter().map(|(c, b)| (*c, *b))
    }

    /// Replaces all assignments from a snapshot.
    pub fn restore(&mut self, entries: impl IntoIterator<Item = (ChunkCoord, Biome)>) {
        self.assignments = entries.into_iter().collect();
    }
}
