//! Outbound notifications consumed by the host page.

use crate::{Event, HotspotId, HotspotKind};

/// Receiver of the fire-and-forget notifications a room emits.
pub trait RoomListener {
    /// A different hotspot became the active one.
    fn on_hotspot_enter(&mut self, kind: HotspotKind, label: &str);

    /// The actor left every hotspot.
    fn on_hotspot_leave(&mut self);

    /// A collectible worth `value` points was picked up.
    fn on_collect(&mut self, value: u32);

    /// The interact action was pressed while `active` was the active hotspot.
    fn on_interact(&mut self, active: Option<HotspotId>) {
        let _ = active;
    }
}

/// Forwards the outbound subset of `events` to `listener` in order.
pub fn dispatch<L>(events: &[Event], listener: &mut L)
where
    L: RoomListener + ?Sized,
{
    for event in events {
        match event {
            Event::HotspotEntered { kind, label, .. } => listener.on_hotspot_enter(*kind, label),
            Event::HotspotLeft { .. } => listener.on_hotspot_leave(),
            Event::ItemCollected { value, .. } => listener.on_collect(*value),
            Event::InteractRequested { active } => listener.on_interact(*active),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CollectibleId;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl RoomListener for Recorder {
        fn on_hotspot_enter(&mut self, kind: HotspotKind, label: &str) {
            self.calls.push(format!("enter {kind:?} {label}"));
        }

        fn on_hotspot_leave(&mut self) {
            self.calls.push("leave".to_owned());
        }

        fn on_collect(&mut self, value: u32) {
            self.calls.push(format!("collect {value}"));
        }
    }

    #[test]
    fn dispatch_forwards_only_outbound_events() {
        let events = vec![
            Event::TimeAdvanced {
                dt: std::time::Duration::from_millis(16),
            },
            Event::HotspotEntered {
                hotspot: HotspotId::new(3),
                kind: HotspotKind::Skills,
                label: "Skills".to_owned(),
            },
            Event::ItemCollected {
                collectible: CollectibleId::new(1),
                value: 10,
            },
            Event::InteractRequested { active: None },
            Event::HotspotLeft {
                hotspot: HotspotId::new(3),
            },
        ];

        let mut recorder = Recorder::default();
        dispatch(&events, &mut recorder);

        assert_eq!(
            recorder.calls,
            vec!["enter Skills Skills", "collect 10", "leave"]
        );
    }
}
