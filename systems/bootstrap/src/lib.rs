#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the room experience.

mod presets;

use iso_room_world::{query, Room};

pub use presets::{cafe, lobby, rooftop, studio, RoomPreset};

/// Produces data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'room>(&self, room: &'room Room) -> &'room str {
        query::welcome_banner(room)
    }

    /// Title shown by adapters, combining the room name with the player name.
    #[must_use]
    pub fn window_title(&self, room: &Room) -> String {
        format!("{} - {}", query::name(room), query::avatar(room).name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iso_room_core::WELCOME_BANNER;

    #[test]
    fn greets_with_canonical_banner() {
        let room = Room::new(&lobby()).expect("lobby preset mounts");
        let bootstrap = Bootstrap;

        assert_eq!(bootstrap.welcome_banner(&room), WELCOME_BANNER);
        assert_eq!(bootstrap.window_title(&room), "Lobby - Guest");
    }
}
