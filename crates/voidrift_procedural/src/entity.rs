//! # Spawned Entity Records
//!
//! Everything a chunk places into the world besides terrain features:
//! obstacles, enemies, resource nodes, chests, extraction points, portals.
//!
//! These are generation-time records, not live simulation entities. The
//! simulation consumes them when a chunk loads and owns them from then on;
//! the generator never mutates them after a chunk is assembled.

use serde::{Deserialize, Serialize};
use voidrift_shared::{EnemyId, PortalId, Vec2};

use crate::feature::FeatureKind;

/// Enemy archetypes that can spawn in the world.
///
/// Each biome allows a subset; see the biome rosters. The remote roster
/// extends every biome's table far from the world origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EnemyArchetype {
    /// Fast melee pursuer.
    Stalker = 0,
    /// Ranged acid attacker.
    Spitter = 1,
    /// Slow, heavily armored rusher.
    Charger = 2,
    /// Erratic flying swarmer.
    SporeFly = 3,
    /// Burning wisp that ignites on contact.
    EmberWisp = 4,
    /// Lumbering cold-biome bruiser.
    FrostMaw = 5,
    /// Amphibious reef skitterer.
    TideCrawler = 6,
    /// Phasing shade of the void fringe.
    NullShade = 7,
    /// Crystalline splinter that shatters on death.
    Shardling = 8,
    /// Ambusher buried in toxic mud.
    MireLurker = 9,
    /// Remote-zone revenant, far stronger than biome natives.
    Revenant = 10,
    /// Remote-zone apex threat.
    VoidTyrant = 11,
}

impl EnemyArchetype {
    /// Archetypes added to every biome roster past the remote-distance
    /// threshold.
    pub const REMOTE_ROSTER: [Self; 2] = [Self::Revenant, Self::VoidTyrant];

    /// Base maximum health for this archetype.
    #[must_use]
    pub const fn base_health(self) -> f32 {
        match self {
            Self::SporeFly => 20.0,
            Self::Stalker | Self::Shardling => 35.0,
            Self::Spitter | Self::TideCrawler => 40.0,
            Self::EmberWisp => 30.0,
            Self::MireLurker | Self::NullShade => 55.0,
            Self::Charger => 80.0,
            Self::FrostMaw => 110.0,
            Self::Revenant => 160.0,
            Self::VoidTyrant => 260.0,
        }
    }

    /// Base movement speed in world units per second.
    #[must_use]
    pub const fn base_speed(self) -> f32 {
        match self {
            Self::FrostMaw => 60.0,
            Self::Charger | Self::VoidTyrant => 80.0,
            Self::Spitter | Self::MireLurker => 90.0,
            Self::TideCrawler | Self::Shardling | Self::Revenant => 110.0,
            Self::EmberWisp | Self::NullShade => 130.0,
            Self::Stalker => 150.0,
            Self::SporeFly => 170.0,
        }
    }
}

/// A hostile entity placed by the generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Stable identity; survives chunk eviction.
    pub id: EnemyId,
    /// Archetype drawn from the biome (or remote) roster.
    pub archetype: EnemyArchetype,
    /// World-space spawn position.
    pub position: Vec2,
    /// Health the simulation initializes this enemy with.
    pub max_health: f32,
    /// Whether the modifier system may attach gameplay modifiers.
    ///
    /// The generator only flags eligibility; the modifier collaborator
    /// decides what, if anything, to apply.
    pub modifier_eligible: bool,
}

/// Shape class of a terrain obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleShape {
    /// Rounded rock mass.
    Boulder,
    /// Collapsed structural wreckage.
    Wreck,
    /// Tall narrow column.
    Pillar,
    /// Jagged low outcrop.
    Crag,
}

/// Fixed orbital motion parameters for an obstacle caught by a gravity
/// anomaly.
///
/// Emitted once at generation time; the simulation integrates the angle
/// each frame. Never recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitParams {
    /// World-space orbit center (the anomaly anchor).
    pub center: Vec2,
    /// Orbit radius in world units.
    pub radius: f32,
    /// Angular speed in radians per second.
    pub angular_speed: f32,
    /// Orbit direction.
    pub clockwise: bool,
}

/// A static (or orbiting) terrain obstacle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// World-space position.
    pub position: Vec2,
    /// Collision radius in world units.
    pub size: f32,
    /// Shape class, for the renderer.
    pub shape: ObstacleShape,
    /// Present when the obstacle orbits a gravity anomaly.
    pub orbit: Option<OrbitParams>,
}

/// Harvestable resource types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Generic salvage; spawns anywhere.
    Scrap,
    /// Timber from bloom trees.
    Bloomwood,
    /// Molten ore near lava pillars.
    Ember,
    /// Glacial ice near spires.
    Ice,
    /// Concentrated toxin near pools.
    Toxin,
    /// Raw crystal near formations.
    Crystal,
    /// Living coral near reefs.
    Coral,
    /// Exotic flux near anomalies.
    Flux,
}

impl ResourceKind {
    /// The feature kind this resource anchors to, if any.
    ///
    /// Anchored kinds try to spawn next to a matching feature in the same
    /// chunk and fall back to a uniform position when the chunk has none.
    #[must_use]
    pub const fn anchor_feature(self) -> Option<FeatureKind> {
        match self {
            Self::Scrap => None,
            Self::Bloomwood => Some(FeatureKind::BloomTree),
            Self::Ember => Some(FeatureKind::LavaPillar),
            Self::Ice => Some(FeatureKind::GlacialSpire),
            Self::Toxin => Some(FeatureKind::ToxicPool),
            Self::Crystal => Some(FeatureKind::CrystalFormation),
            Self::Coral => Some(FeatureKind::CoralReef),
            Self::Flux => Some(FeatureKind::GravityAnomaly),
        }
    }

    /// Inclusive yield range rolled at generation time.
    #[must_use]
    pub const fn yield_range(self) -> (i32, i32) {
        match self {
            Self::Scrap => (2, 6),
            Self::Bloomwood | Self::Coral => (3, 8),
            Self::Ember | Self::Ice | Self::Toxin => (2, 5),
            Self::Crystal => (1, 4),
            Self::Flux => (1, 3),
        }
    }
}

/// A harvestable deposit placed by the generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// World-space position.
    pub position: Vec2,
    /// What the node yields.
    pub kind: ResourceKind,
    /// Units remaining when freshly generated.
    pub amount: u32,
}

/// Chest access class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestKind {
    /// Opens immediately.
    Regular,
    /// Opens after a hold timer.
    Timed,
    /// Requires a key item.
    Locked,
}

/// An interactive loot chest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chest {
    /// World-space position.
    pub position: Vec2,
    /// Access class.
    pub kind: ChestKind,
}

/// An extraction point where a run can be ended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtractionPoint {
    /// World-space position.
    pub position: Vec2,
    /// Activation radius in world units.
    pub radius: f32,
}

/// A teleport portal.
///
/// Portals are generated unlinked; the world ledger links each new portal
/// to the currently dangling one, so the global portal graph is always a
/// perfect matching except for at most one pending node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    /// Stable identity (one portal per chunk).
    pub id: PortalId,
    /// World-space position.
    pub position: Vec2,
    /// Mutual link; `None` while this portal is the dangling one.
    pub linked_to: Option<PortalId>,
}

/// A portal spawn as recorded in chunk content.
///
/// Carries no link state on purpose: the partner may spawn long after
/// this chunk was generated, and chunk content must not change when it
/// does. Consumers resolve the current link through the world ledger.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortalSpawn {
    /// Stable identity (one portal per chunk).
    pub id: PortalId,
    /// World-space position.
    pub position: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_stats_positive() {
        for archetype in [
            EnemyArchetype::Stalker,
            EnemyArchetype::Spitter,
            EnemyArchetype::Charger,
            EnemyArchetype::SporeFly,
            EnemyArchetype::EmberWisp,
            EnemyArchetype::FrostMaw,
            EnemyArchetype::TideCrawler,
            EnemyArchetype::NullShade,
            EnemyArchetype::Shardling,
            EnemyArchetype::MireLurker,
            EnemyArchetype::Revenant,
            EnemyArchetype::VoidTyrant,
        ] {
            assert!(archetype.base_health() > 0.0, "{archetype:?} has no health");
            assert!(archetype.base_speed() > 0.0, "{archetype:?} cannot move");
        }
    }

    #[test]
    fn test_remote_roster_outclasses_natives() {
        for remote in EnemyArchetype::REMOTE_ROSTER {
            assert!(
                remote.base_health() > EnemyArchetype::FrostMaw.base_health(),
                "Remote archetype {remote:?} should outclass the toughest native"
            );
        }
    }

    #[test]
    fn test_yield_ranges_are_ordered() {
        for kind in [
            ResourceKind::Scrap,
            ResourceKind::Bloomwood,
            ResourceKind::Ember,
            ResourceKind::Ice,
            ResourceKind::Toxin,
            ResourceKind::Crystal,
            ResourceKind::Coral,
            ResourceKind::Flux,
        ] {
            let (min, max) = kind.yield_range();
            assert!(min >= 1 && min <= max, "Bad yield range for {kind:?}");
        }
    }

    #[test]
    fn test_scrap_is_unanchored() {
        assert_eq!(ResourceKind::Scrap.anchor_feature(), None);
        assert_eq!(
            ResourceKind::Crystal.anchor_feature(),
            Some(FeatureKind::CrystalFormation)
        );
    }
}
