#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Proximity detector that tracks the active hotspot and picks up collectibles.

use iso_room_core::{
    CollectibleId, CollectibleView, Command, Event, GridPosition, HotspotId, HotspotView,
};
use tracing::trace;

/// Pure system that compares the actor position against hotspots and collectibles.
#[derive(Debug, Default)]
pub struct Interaction;

impl Interaction {
    /// Emits proximity commands once per batch that advanced time.
    ///
    /// [`Command::SetActiveHotspot`] is only emitted when the nearest
    /// qualifying hotspot differs from `active`, and [`Command::CollectItem`]
    /// is emitted for every collectible within `pickup_radius`.
    pub fn handle(
        &mut self,
        events: &[Event],
        position: GridPosition,
        hotspots: &HotspotView,
        collectibles: &CollectibleView,
        active: Option<HotspotId>,
        pickup_radius: f32,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let nearest = nearest_hotspot(position, hotspots);
        if nearest != active {
            trace!(?nearest, ?active, "active hotspot changed");
            out.push(Command::SetActiveHotspot { hotspot: nearest });
        }

        out.extend(
            collectibles_in_reach(position, collectibles, pickup_radius)
                .map(|collectible| Command::CollectItem { collectible }),
        );
    }
}

/// Hotspot whose anchor is closest to `position` among those strictly inside
/// their own radius. Exact ties keep the earlier declaration.
#[must_use]
pub fn nearest_hotspot(position: GridPosition, hotspots: &HotspotView) -> Option<HotspotId> {
    let mut best: Option<(HotspotId, f32)> = None;
    for hotspot in hotspots.iter() {
        let distance = position.distance_to_cell(hotspot.anchor);
        if distance >= hotspot.radius {
            continue;
        }
        if best.map_or(true, |(_, closest)| distance < closest) {
            best = Some((hotspot.id, distance));
        }
    }
    best.map(|(id, _)| id)
}

/// Collectibles whose anchor lies strictly within `pickup_radius` of `position`.
pub fn collectibles_in_reach<'a>(
    position: GridPosition,
    collectibles: &'a CollectibleView,
    pickup_radius: f32,
) -> impl Iterator<Item = CollectibleId> + 'a {
    collectibles
        .iter()
        .filter(move |collectible| position.distance_to_cell(collectible.anchor) < pickup_radius)
        .map(|collectible| collectible.id)
}
