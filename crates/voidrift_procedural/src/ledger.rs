//! # World Ledger
//!
//! Cross-chunk facts that must survive chunk eviction: which enemies were
//! killed, and how portals are wired together.
//!
//! The source of these facts is global in spirit - a kill anywhere must
//! suppress that enemy forever, and portal pairing spans the whole world -
//! but the state itself lives on one generator instance, so independent
//! worlds never share a ledger.
//!
//! ## Portal pairing
//!
//! Portals spawn unlinked. The first portal ever created becomes the
//! *dangling* portal; each subsequent spawn either links mutually to the
//! current dangling portal (clearing the slot) or, if none is dangling,
//! becomes the new dangling portal. The portal graph is therefore always
//! a perfect matching except for at most one pending node.

use std::collections::HashSet;

use voidrift_shared::{EnemyId, PortalId, Vec2};

use crate::entity::Portal;

/// Persistent cross-chunk generation facts.
#[derive(Clone, Debug, Default)]
pub struct WorldLedger {
    killed: HashSet<EnemyId>,
    portals: Vec<Portal>,
    unlinked: Option<PortalId>,
}

impl WorldLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an enemy kill so no future regeneration spawns it.
    ///
    /// Returns `true` if this id was not already recorded.
    pub fn register_kill(&mut self, id: EnemyId) -> bool {
        self.killed.insert(id)
    }

    /// True if this enemy has been killed.
    #[inline]
    #[must_use]
    pub fn is_killed(&self, id: EnemyId) -> bool {
        self.killed.contains(&id)
    }

    /// Number of recorded kills.
    #[must_use]
    pub fn kill_count(&self) -> usize {
        self.killed.len()
    }

    /// Iterates over all recorded kills, for snapshotting.
    pub fn kills(&self) -> impl Iterator<Item = EnemyId> + '_ {
        self.killed.iter().copied()
    }

    /// All portals ever registered, in registration order.
    #[must_use]
    pub fn portals(&self) -> &[Portal] {
        &self.portals
    }

    /// Looks up a registered portal.
    #[must_use]
    pub fn portal(&self, id: PortalId) -> Option<&Portal> {
        self.portals.iter().find(|p| p.id == id)
    }

    /// The portal currently awaiting a partner, if any.
    #[inline]
    #[must_use]
    pub fn unlinked_portal(&self) -> Option<PortalId> {
        self.unlinked
    }

    /// Returns the portal for `id`, registering it on first sight.
    ///
    /// Chunk regeneration calls this with the same id every time the
    /// chunk's portal roll succeeds; only the first call registers and
    /// pairs, later calls hand back the registered portal with its
    /// current link state. Link state is ledger state, not chunk content.
    pub fn get_or_register_portal(&mut self, id: PortalId, position: Vec2) -> Portal {
        if let Some(existing) = self.portal(id) {
            return existing.clone();
        }

        let mut portal = Portal {
            id,
            position,
            linked_to: None,
        };

        if let Some(dangling_id) = self.unlinked.take() {
            portal.linked_to = Some(dangling_id);
            if let Some(dangling) = self.portals.iter_mut().find(|p| p.id == dangling_id) {
                dangling.linked_to = Some(id);
            }
            tracing::debug!("portal {id} linked to {dangling_id}");
        } else {
            self.unlinked = Some(id);
            tracing::debug!("portal {id} is now dangling");
        }

        self.portals.push(portal.clone());
        portal
    }

    /// Replaces the entire ledger from snapshot parts.
    ///
    /// Callers validate consistency first; see the snapshot module.
    pub fn restore(
        &mut self,
        killed: impl IntoIterator<Item = EnemyId>,
        portals: Vec<Portal>,
        unlinked: Option<PortalId>,
    ) {
        self.killed = killed.into_iter().collect();
        self.portals = portals;
        self.unlinked = unlinked;
    }
}
