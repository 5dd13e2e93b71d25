//! # Generation Config
//!
//! Tunables for the world generator, loaded once at startup from TOML (or
//! taken as defaults). Everything here shapes *how much* of each content
//! category spawns; the seed decides *where*.
//!
//! Changing any value changes world content, so peers in one session must
//! share a config as well as a seed.

use serde::{Deserialize, Serialize};
use voidrift_shared::{DEFAULT_LOAD_RADIUS, DEFAULT_UNLOAD_RADIUS};

use crate::chunk::{ENEMY_SLOT_LIMIT, SPACING_RETRY_LIMIT};
use crate::error::{WorldError, WorldResult};

/// World generation tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Chebyshev radius (chunks) loaded around the player.
    pub load_radius: i32,
    /// Chebyshev radius (chunks) beyond which chunks are evicted.
    pub unload_radius: i32,

    /// Minimum obstacles per chunk.
    pub obstacle_min: i32,
    /// Maximum obstacles per chunk.
    pub obstacle_max: i32,

    /// Enemy count at the world origin.
    pub enemy_base_count: i32,
    /// Extra enemies per chunk of distance from the origin.
    pub enemy_distance_scale: f64,
    /// Hard cap on enemies per chunk.
    pub enemy_max_count: i32,
    /// Minimum spacing between enemies in one chunk (world units).
    pub enemy_min_spacing: f32,
    /// Rejection-sampling attempts before accepting a cramped position.
    pub spacing_retries: u32,
    /// Chunk distance past which the remote enemy roster joins the table.
    pub remote_roster_distance: f64,
    /// Chunk distance past which enemies may be flagged modifier-eligible.
    pub modifier_distance: f64,
    /// Chance an eligible enemy actually gets flagged.
    pub modifier_chance: f64,

    /// Minimum resource nodes per chunk.
    pub resource_min: i32,
    /// Maximum resource nodes per chunk.
    pub resource_max: i32,
    /// Chance an anchored resource snaps to its matching feature.
    pub resource_anchor_chance: f64,

    /// Chance of a regular chest per chunk.
    pub chest_chance: f64,
    /// Chance of a timed chest (distance-gated).
    pub timed_chest_chance: f64,
    /// Minimum chunk distance for timed chests.
    pub timed_chest_min_distance: f64,
    /// Chance of a locked chest (distance-gated).
    pub locked_chest_chance: f64,
    /// Minimum chunk distance for locked chests.
    pub locked_chest_min_distance: f64,

    /// Chance of an extraction point (distance-gated).
    pub extraction_chance: f64,
    /// Minimum chunk distance for extraction points.
    pub extraction_min_distance: f64,

    /// Chance of a portal per chunk (distance-gated).
    pub portal_chance: f64,
    /// Minimum chunk distance for portals.
    pub portal_min_distance: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            load_radius: DEFAULT_LOAD_RADIUS,
            unload_radius: DEFAULT_UNLOAD_RADIUS,

            obstacle_min: 3,
            obstacle_max: 10,

            enemy_base_count: 2,
            enemy_distance_scale: 0.75,
            enemy_max_count: 12,
            enemy_min_spacing: 80.0,
            spacing_retries: 8,
            remote_roster_distance: 8.0,
            modifier_distance: 15.0,
            modifier_chance: 0.35,

            resource_min: 2,
            resource_max: 6,
            resource_anchor_chance: 0.8,

            chest_chance: 0.25,
            timed_chest_chance: 0.12,
            timed_chest_min_distance: 5.0,
            locked_chest_chance: 0.10,
            locked_chest_min_distance: 10.0,

            extraction_chance: 0.15,
            extraction_min_distance: 3.0,

            portal_chance: 0.08,
            portal_min_distance: 2.0,
        }
    }
}

impl GenerationConfig {
    /// Parses a config from a TOML document and validates it.
    ///
    /// Missing fields fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] when the document does not
    /// parse or the values are inconsistent.
    pub fn from_toml_str(toml_str: &str) -> WorldResult<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| WorldError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] describing the first
    /// inconsistency found.
    pub fn validate(&self) -> WorldResult<()> {
        if self.load_radius < 0 || self.unload_radius <= self.load_radius {
            return Err(WorldError::InvalidConfig(format!(
                "unload_radius ({}) must exceed load_radius ({}) or streaming will thrash",
                self.unload_radius, self.load_radius
            )));
        }
        if self.obstacle_min < 0 || self.obstacle_max < self.obstacle_min {
            return Err(WorldError::InvalidConfig(format!(
                "obstacle range [{}, {}] is inverted",
                self.obstacle_min, self.obstacle_max
            )));
        }
        if self.enemy_base_count < 0 || self.enemy_max_count < self.enemy_base_count {
            return Err(WorldError::InvalidConfig(format!(
                "enemy counts [{}, {}] are inverted",
                self.enemy_base_count, self.enemy_max_count
            )));
        }
        // The salt layout reserves a fixed block per enemy slot; counts
        // beyond it would draw from the resource category's salts.
        if self.enemy_max_count > ENEMY_SLOT_LIMIT {
            return Err(WorldError::InvalidConfig(format!(
                "enemy_max_count ({}) exceeds the {ENEMY_SLOT_LIMIT} slots the salt layout holds",
                self.enemy_max_count
            )));
        }
        if self.resource_min < 0 || self.resource_max < self.resource_min {
            return Err(WorldError::InvalidConfig(format!(
                "resource range [{}, {}] is inverted",
                self.resource_min, self.resource_max
            )));
        }
        if self.spacing_retries == 0 {
            return Err(WorldError::InvalidConfig(
                "spacing_retries must be at least 1".to_string(),
            ));
        }
        if self.spacing_retries > SPACING_RETRY_LIMIT {
            return Err(WorldError::InvalidConfig(format!(
                "spacing_retries ({}) exceeds the {SPACING_RETRY_LIMIT} attempts one enemy slot holds",
                self.spacing_retries
            )));
        }
        for (name, chance) in [
            ("modifier_chance", self.modifier_chance),
            ("resource_anchor_chance", self.resource_anchor_chance),
            ("chest_chance", self.chest_chance),
            ("timed_chest_chance", self.timed_chest_chance),
            ("locked_chest_chance", self.locked_chest_chance),
            ("extraction_chance", self.extraction_chance),
            ("portal_chance", self.portal_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(WorldError::InvalidConfig(format!(
                    "{name} = {chance} is not a probability"
                )));
            }
        }
        Ok(())
    }
}
