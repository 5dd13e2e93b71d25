//! # World Snapshots
//!
//! Full-replacement world state capture: seed, loaded chunks, biome
//! assignments, the portal registry and the kill ledger, serialized as
//! JSON. Hydration replaces the receiving generator's state entirely -
//! there is no merging, which is what makes late-join in a session simple
//! and makes a snapshot a complete save file.
//!
//! Validation runs before any state is touched: a structurally broken
//! snapshot (duplicate chunks, one-way portal links, a phantom dangling
//! portal) is rejected whole and the generator keeps its current world.

use serde::{Deserialize, Serialize};
use voidrift_shared::{EnemyId, PortalId};

use crate::biome::Biome;
use crate::chunk::{Chunk, ChunkCoord};
use crate::entity::Portal;
use crate::error::{WorldError, WorldResult};

/// One biome assignment, in snapshot form.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeAssignment {
    /// Assigned chunk.
    pub coord: ChunkCoord,
    /// Its permanent biome.
    pub biome: Biome,
}

/// Complete serializable world state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// The seed every peer must share.
    pub seed: u64,
    /// Chunks loaded at capture time. Evicted chunks are absent by
    /// design; receivers regenerate them from the seed.
    pub chunks: Vec<Chunk>,
    /// Every biome assignment ever made, loaded or not.
    pub biome_assignments: Vec<BiomeAssignment>,
    /// The global portal registry.
    pub portals: Vec<Portal>,
    /// The portal awaiting a partner, if any.
    pub unlinked_portal: Option<PortalId>,
    /// Kill ledger contents.
    pub killed_enemies: Vec<EnemyId>,
}

impl WorldSnapshot {
    /// Serializes to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::SnapshotDecode`] if serialization fails,
    /// which for this type means an internal serde bug rather than bad
    /// data.
    pub fn to_json(&self) -> WorldResult<String> {
        serde_json::to_string(self).map_err(|e| WorldError::SnapshotDecode(e.to_string()))
    }

    /// Parses and validates a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::SnapshotDecode`] for malformed JSON and
    /// [`WorldError::InvalidSnapshot`] for well-formed JSON describing an
    /// inconsistent world.
    pub fn from_json(json: &str) -> WorldResult<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| WorldError::SnapshotDecode(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Checks structural consistency.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidSnapshot`] naming the first
    /// inconsistency found.
    pub fn validate(&self) -> WorldResult<()> {
        let mut chunk_coords = std::collections::HashSet::new();
        for chunk in &self.chunks {
            if !chunk_coords.insert(chunk.coord) {
                return Err(WorldError::invalid_snapshot(format!(
                    "duplicate chunk {}",
                    chunk.coord
                )));
            }
        }

        let mut assigned = std::collections::HashMap::new();
        for entry in &self.biome_assignments {
            if assigned.insert(entry.coord, entry.biome).is_some() {
                return Err(WorldError::invalid_snapshot(format!(
                    "duplicate biome assignment for {}",
                    entry.coord
                )));
            }
        }
        for chunk in &self.chunks {
            match assigned.get(&chunk.coord) {
                Some(biome) if *biome == chunk.biome => {}
                Some(biome) => {
                    return Err(WorldError::invalid_snapshot(format!(
                        "chunk {} is {:?} but assigned {:?}",
                        chunk.coord, chunk.biome, biome
                    )));
                }
                None => {
                    return Err(WorldError::invalid_snapshot(format!(
                        "chunk {} has no biome assignment",
                        chunk.coord
                    )));
                }
            }
        }

        self.validate_portals()
    }

    fn validate_portals(&self) -> WorldResult<()> {
        let mut by_id = std::collections::HashMap::new();
        for portal in &self.portals {
            if by_id.insert(portal.id, portal).is_some() {
                return Err(WorldError::invalid_snapshot(format!(
                    "duplicate portal {}",
                    portal.id
                )));
            }
        }

        // Chunk content records spawns only; every spawn must have a
        // registry entry, and the registry owns the link state.
        for chunk in &self.chunks {
            for spawn in &chunk.portals {
                let Some(portal) = by_id.get(&spawn.id) else {
                    return Err(WorldError::invalid_snapshot(format!(
                        "chunk {} spawns unregistered portal {}",
                        chunk.coord, spawn.id
                    )));
                };
                if portal.position != spawn.position {
                    return Err(WorldError::invalid_snapshot(format!(
                        "portal {} position disagrees between chunk and registry",
                        spawn.id
                    )));
                }
            }
        }

        let mut dangling = Vec::new();
        for portal in &self.portals {
            match portal.linked_to {
                Some(partner_id) => {
                    let partner = by_id.get(&partner_id).ok_or_else(|| {
                        WorldError::invalid_snapshot(format!(
                            "portal {} links to unknown portal {partner_id}",
                            portal.id
                        ))
                    })?;
                    if partner.linked_to != Some(portal.id) {
                        return Err(WorldError::invalid_snapshot(format!(
                            "portal link {} -> {partner_id} is not mutual",
                            portal.id
                        )));
                    }
                }
                None => dangling.push(portal.id),
            }
        }

        if dangling.len() > 1 {
            return Err(WorldError::invalid_snapshot(format!(
                "{} dangling portals, at most one allowed",
                dangling.len()
            )));
        }
        match (self.unlinked_portal, dangling.first()) {
            (Some(claimed), Some(actual)) if claimed == *actual => Ok(()),
            (None, None) => Ok(()),
            (claimed, actual) => Err(WorldError::invalid_snapshot(format!(
                "unlinked_portal field says {claimed:?} but portal list says {actual:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidrift_shared::Vec2;

    fn empty_snapshot() -> WorldSnapshot {
        WorldSnapshot {
            seed: 42,
            chunks: Vec::new(),
            biome_assignments: Vec::new(),
            portals: Vec::new(),
            unlinked_portal: None,
            killed_enemies: Vec::new(),
        }
    }

    fn portal(x: i32, linked_to: Option<PortalId>) -> Portal {
        Portal {
            id: PortalId::new(x, 0),
            position: Vec2::new(x as f32 * 100.0, 0.0),
            linked_to,
        }
    }

    #[test]
    fn test_empty_snapshot_valid_and_round_trips() {
        let snapshot = empty_snapshot();
        snapshot.validate().expect("Empty snapshot is valid");

        let json = snapshot.to_json().expect("Serialization succeeds");
        let parsed = WorldSnapshot::from_json(&json).expect("Round trip succeeds");
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = WorldSnapshot::from_json("{not json");
        assert!(matches!(result, Err(WorldError::SnapshotDecode(_))));
    }

    #[test]
    fn test_one_way_portal_link_rejected() {
        let mut snapshot = empty_snapshot();
        snapshot.portals = vec![
            portal(0, Some(PortalId::new(1, 0))),
            portal(1, None),
        ];
        snapshot.unlinked_portal = Some(PortalId::new(1, 0));

        let result = snapshot.validate();
        assert!(
            matches!(result, Err(WorldError::InvalidSnapshot { .. })),
            "One-way link must be rejected, got {result:?}"
        );
    }

    #[test]
    fn test_two_dangling_portals_rejected() {
        let mut snapshot = empty_snapshot();
        snapshot.portals = vec![portal(0, None), portal(1, None)];
        snapshot.unlinked_portal = Some(PortalId::new(0, 0));

        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_phantom_unlinked_field_rejected() {
        let mut snapshot = empty_snapshot();
        snapshot.portals = vec![
            portal(0, Some(PortalId::new(1, 0))),
            portal(1, Some(PortalId::new(0, 0))),
        ];
        snapshot.unlinked_portal = Some(PortalId::new(7, 7));

        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_matched_pair_valid() {
        let mut snapshot = empty_snapshot();
        snapshot.portals = vec![
            portal(0, Some(PortalId::new(1, 0))),
            portal(1, Some(PortalId::new(0, 0))),
        ];

        snapshot.validate().expect("Mutual pair is valid");
    }

    #[test]
    fn test_chunk_spawn_must_match_registry() {
        use crate::config::GenerationConfig;
        use crate::entity::PortalSpawn;
        use crate::hash::{SeededHash, WorldSeed};
        use crate::ledger::WorldLedger;

        let gen = crate::chunk::ChunkGenerator::new(SeededHash::new(WorldSeed::new(42)));
        let mut ledger = WorldLedger::new();
        let mut chunk = gen.generate(
            ChunkCoord::new(0, 0),
            Biome::Verdance,
            &GenerationConfig::default(),
            &mut ledger,
        );
        let spawn = PortalSpawn {
            id: PortalId::new(0, 0),
            position: Vec2::new(50.0, 50.0),
        };
        chunk.portals.push(spawn);

        let mut snapshot = empty_snapshot();
        snapshot.biome_assignments = vec![BiomeAssignment {
            coord: ChunkCoord::new(0, 0),
            biome: Biome::Verdance,
        }];
        snapshot.chunks = vec![chunk];

        assert!(
            snapshot.validate().is_err(),
            "A spawn without a registry entry must be rejected"
        );

        snapshot.portals = vec![Portal {
            id: spawn.id,
            position: Vec2::ZERO,
            linked_to: None,
        }];
        snapshot.unlinked_portal = Some(spawn.id);
        assert!(
            snapshot.validate().is_err(),
            "A spawn whose position disagrees with the registry must be rejected"
        );

        snapshot.portals[0].position = spawn.position;
        snapshot.validate().expect("Consistent spawn is valid");
    }

    #[test]
    fn test_chunk_without_assignment_rejected() {
        use crate::config::GenerationConfig;
        use crate::hash::{SeededHash, WorldSeed};
        use crate::ledger::WorldLedger;

        let gen = crate::chunk::ChunkGenerator::new(SeededHash::new(WorldSeed::new(42)));
        let mut ledger = WorldLedger::new();
        let chunk = gen.generate(
            ChunkCoord::new(0, 0),
            Biome::Verdance,
            &GenerationConfig::default(),
            &mut ledger,
        );

        let mut snapshot = empty_snapshot();
        snapshot.chunks = vec![chunk];
        assert!(snapshot.validate().is_err());

        snapshot.biome_assignments = vec![BiomeAssignment {
            coord: ChunkCoord::new(0, 0),
            biome: Biome::Ashlands,
        }];
        assert!(snapshot.validate().is_err(), "Mismatched biome must fail");

        snapshot.biome_assignments[0].biome = Biome::Verdance;
        snapshot.validate().expect("Matching assignment is valid");
    }
}
