//! Working set of collectibles that are still lying around.

use std::collections::BTreeMap;

use iso_room_core::{CellCoord, CollectibleDefinition, CollectibleId, CollectibleSnapshot};

/// Collectible stored inside the room.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CollectibleState {
    pub(crate) anchor: CellCoord,
    pub(crate) value: u32,
}

/// Registry of live collectibles. Entries are only ever removed.
#[derive(Debug, Default)]
pub(crate) struct CollectibleRegistry {
    entries: BTreeMap<CollectibleId, CollectibleState>,
}

impl CollectibleRegistry {
    /// Seeds the registry from the room definition.
    pub(crate) fn seeded(definitions: &[CollectibleDefinition]) -> Self {
        let entries = definitions
            .iter()
            .map(|definition| {
                (
                    definition.id,
                    CollectibleState {
                        anchor: definition.anchor,
                        value: definition.value,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Removes the collectible, returning its state when it was still present.
    pub(crate) fn take(&mut self, id: CollectibleId) -> Option<CollectibleState> {
        self.entries.remove(&id)
    }

    pub(crate) fn snapshots(&self) -> Vec<CollectibleSnapshot> {
        self.entries
            .iter()
            .map(|(id, state)| CollectibleSnapshot {
                id: *id,
                anchor: state.anchor,
                value: state.value,
            })
            .collect()
    }
}
