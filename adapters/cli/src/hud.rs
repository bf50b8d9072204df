//! Host-side listener that turns room notifications into HUD state.

use iso_room_core::{HotspotId, HotspotKind, RoomListener};
use tracing::{debug, info};

/// Score counter and hotspot prompt shown on top of the room.
#[derive(Debug, Default)]
pub(crate) struct Hud {
    score: u32,
    active: Option<(HotspotKind, String)>,
}

impl Hud {
    /// Sum of every collected value.
    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    /// Prompt inviting the player to open the active hotspot.
    pub(crate) fn prompt(&self) -> Option<String> {
        self.active
            .as_ref()
            .map(|(_, label)| format!("Press E to view {label}"))
    }
}

impl RoomListener for Hud {
    fn on_hotspot_enter(&mut self, kind: HotspotKind, label: &str) {
        info!(?kind, label, "entered hotspot");
        self.active = Some((kind, label.to_owned()));
    }

    fn on_hotspot_leave(&mut self) {
        if let Some((kind, _)) = self.active.take() {
            info!(?kind, "left hotspot");
        }
    }

    fn on_collect(&mut self, value: u32) {
        self.score = self.score.saturating_add(value);
        info!(value, score = self.score, "collected coin");
    }

    fn on_interact(&mut self, active: Option<HotspotId>) {
        match (&self.active, active) {
            (Some((kind, label)), Some(hotspot)) => {
                info!(
                    hotspot = hotspot.get(),
                    section = ?kind,
                    label = label.as_str(),
                    "opening content section"
                );
            }
            _ => debug!("interact pressed outside every hotspot"),
        }
    }
}
