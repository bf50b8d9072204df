//! Immediate-mode painting of a scene's draw list.

use glam::Vec2;
use iso_room_core::{CellCoord, Facing, FurnitureKind};
use iso_room_rendering::{
    AvatarPresentation, CollectiblePresentation, Color, DrawCommand, FurniturePresentation,
    HotspotIndicator, HudPresentation, IsoProjection, Scene, WallSide,
};
use macroquad::{
    math::Vec2 as MacroquadVec2,
    shapes::{draw_circle, draw_circle_lines, draw_line, draw_rectangle, draw_triangle},
    text::{draw_text, measure_text},
    window::clear_background,
};

use crate::to_macroquad_color;

const FLOOR: Color = Color::from_rgb_u8(0xd9, 0xc7, 0xa7);
const FLOOR_ALTERNATE: Color = Color::from_rgb_u8(0xcf, 0xbb, 0x98);
const FLOOR_EDGE: Color = Color::new(0.0, 0.0, 0.0, 0.08);
const WALL: Color = Color::from_rgb_u8(0x9f, 0xb4, 0xc7);
const COIN: Color = Color::from_rgb_u8(0xf5, 0xc5, 0x18);
const SKIN: Color = Color::from_rgb_u8(0xf1, 0xc2, 0x7d);
const INK: Color = Color::from_rgb_u8(0x1f, 0x1f, 0x1f);
const PANEL: Color = Color::new(0.0, 0.0, 0.0, 0.55);
const WHITE: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
const ACCENT: Color = Color::from_rgb_u8(0x3b, 0x82, 0xf6);

const TEXT_SIZE: f32 = 18.0;

/// Screen mapping shared by every paint call of a frame.
pub(crate) struct Painter<'a> {
    projection: &'a IsoProjection,
    background: Color,
    /// Physical pixels per logical point.
    scale: f32,
    zoom: f32,
    wall_height: f32,
    time: f32,
    screen: Vec2,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(
        projection: &'a IsoProjection,
        scene: &Scene,
        scale: f32,
        screen: Vec2,
        background: Color,
    ) -> Self {
        Self {
            projection,
            background,
            scale,
            zoom: scene.room.zoom(),
            wall_height: scene.room.wall_height(),
            time: scene.animation_time,
            screen,
        }
    }

    pub(crate) fn paint(&self, scene: &Scene) {
        for command in scene.draw_list() {
            match command {
                DrawCommand::Background => clear_background(to_macroquad_color(self.background)),
                DrawCommand::FloorTile { cell, alternate } => self.floor_tile(cell, alternate),
                DrawCommand::WallFace { cell, side } => self.wall_face(cell, side),
                DrawCommand::Furniture(piece) => self.furniture(piece),
                DrawCommand::Collectible(coin) => self.coin(coin),
                DrawCommand::Indicator(indicator) => self.indicator(indicator),
                DrawCommand::Avatar(avatar) => self.avatar(avatar),
                DrawCommand::Nameplate(avatar) => self.nameplate(avatar),
                DrawCommand::Hud(hud) => self.hud(hud),
            }
        }
    }

    fn point(&self, logical: Vec2) -> MacroquadVec2 {
        MacroquadVec2::new(logical.x * self.scale, logical.y * self.scale)
    }

    fn top(&self, cell: CellCoord) -> Vec2 {
        self.projection
            .to_screen(cell.column() as f32, cell.row() as f32)
    }

    fn half_tile(&self) -> Vec2 {
        Vec2::new(
            self.projection.tile_width() / 2.0,
            self.projection.tile_height() / 2.0,
        )
    }

    fn center(&self, cell: CellCoord) -> Vec2 {
        self.top(cell) + Vec2::new(0.0, self.half_tile().y)
    }

    fn triangle(&self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        draw_triangle(
            self.point(a),
            self.point(b),
            self.point(c),
            to_macroquad_color(color),
        );
    }

    fn quad(&self, corners: [Vec2; 4], color: Color) {
        self.triangle(corners[0], corners[1], corners[2], color);
        self.triangle(corners[0], corners[2], corners[3], color);
    }

    fn line(&self, from: Vec2, to: Vec2, color: Color) {
        let from = self.point(from);
        let to = self.point(to);
        draw_line(
            from.x,
            from.y,
            to.x,
            to.y,
            self.scale,
            to_macroquad_color(color),
        );
    }

    fn circle(&self, center: Vec2, radius: f32, color: Color) {
        let center = self.point(center);
        draw_circle(
            center.x,
            center.y,
            radius * self.scale,
            to_macroquad_color(color),
        );
    }

    fn rectangle(&self, origin: Vec2, size: Vec2, color: Color) {
        let origin = self.point(origin);
        draw_rectangle(
            origin.x,
            origin.y,
            size.x * self.scale,
            size.y * self.scale,
            to_macroquad_color(color),
        );
    }

    fn text(&self, text: &str, origin: Vec2, size: f32, color: Color) {
        let origin = self.point(origin);
        let _ = draw_text(
            text,
            origin.x,
            origin.y,
            size * self.scale,
            to_macroquad_color(color),
        );
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        measure_text(text, None, (size * self.scale) as u16, 1.0).width / self.scale
    }

    fn bob(&self, cell: CellCoord, amplitude: f32) -> f32 {
        let phase = (cell.column() + cell.row()) as f32 * 0.7;
        (self.time * 3.0 + phase).sin() * amplitude * self.zoom
    }

    fn floor_tile(&self, cell: CellCoord, alternate: bool) {
        let top = self.top(cell);
        let half = self.half_tile();
        let right = top + Vec2::new(half.x, half.y);
        let bottom = top + Vec2::new(0.0, half.y * 2.0);
        let left = top + Vec2::new(-half.x, half.y);

        let fill = if alternate { FLOOR_ALTERNATE } else { FLOOR };
        self.quad([top, right, bottom, left], fill);
        self.line(top, right, FLOOR_EDGE);
        self.line(top, left, FLOOR_EDGE);
    }

    fn wall_face(&self, cell: CellCoord, side: WallSide) {
        let top = self.top(cell);
        let half = self.half_tile();
        let (end, shade) = match side {
            WallSide::Back => (top + Vec2::new(half.x, half.y), WALL.darken(0.12)),
            WallSide::Left => (top + Vec2::new(-half.x, half.y), WALL),
        };
        let lift = Vec2::new(0.0, -self.wall_height);

        self.quad([top, end, end + lift, top + lift], shade);
        self.line(top + lift, end + lift, WALL.lighten(0.4));
    }

    fn iso_box(&self, cell: CellCoord, footprint: f32, height: f32, color: Color) {
        let center = self.center(cell);
        let half = self.half_tile() * footprint;
        let lift = Vec2::new(0.0, -height * self.zoom);

        let north = center + Vec2::new(0.0, -half.y);
        let east = center + Vec2::new(half.x, 0.0);
        let south = center + Vec2::new(0.0, half.y);
        let west = center + Vec2::new(-half.x, 0.0);

        self.quad([west, south, south + lift, west + lift], color.darken(0.1));
        self.quad([south, east, east + lift, south + lift], color.darken(0.25));
        self.quad(
            [north + lift, east + lift, south + lift, west + lift],
            color.lighten(0.15),
        );
    }

    fn furniture(&self, piece: &FurniturePresentation) {
        let cell = piece.cell;
        match piece.kind {
            FurnitureKind::Desk => {
                self.iso_box(cell, 0.9, 22.0, Color::from_rgb_u8(0x8b, 0x5a, 0x2b));
                let screen = self.center(cell) + Vec2::new(-6.0, -38.0) * self.zoom;
                self.rectangle(screen, Vec2::new(12.0, 9.0) * self.zoom, INK);
            }
            FurnitureKind::Bookshelf => {
                self.iso_box(cell, 0.8, 48.0, Color::from_rgb_u8(0x6d, 0x44, 0x1f));
                for shelf in 1..4 {
                    let y = -12.0 * shelf as f32;
                    let base = self.center(cell) + Vec2::new(0.0, y) * self.zoom;
                    self.line(
                        base + Vec2::new(-10.0, 0.0) * self.zoom,
                        base + Vec2::new(10.0, 5.0) * self.zoom,
                        Color::from_rgb_u8(0xc0, 0x39, 0x2b),
                    );
                }
            }
            FurnitureKind::Sofa => {
                self.iso_box(cell, 0.95, 14.0, Color::from_rgb_u8(0x2e, 0x86, 0x8c));
                self.iso_box(cell, 0.5, 26.0, Color::from_rgb_u8(0x25, 0x6d, 0x72));
            }
            FurnitureKind::NoticeBoard => {
                self.iso_box(cell, 0.4, 16.0, Color::from_rgb_u8(0x5c, 0x40, 0x33));
                let board = self.center(cell) + Vec2::new(-14.0, -44.0) * self.zoom;
                self.rectangle(
                    board,
                    Vec2::new(28.0, 20.0) * self.zoom,
                    Color::from_rgb_u8(0xc8, 0x9f, 0x6b),
                );
                let pin = board + Vec2::new(7.0, 6.0) * self.zoom;
                self.circle(pin, 2.0 * self.zoom, ACCENT);
            }
            FurnitureKind::Mailbox => {
                self.iso_box(cell, 0.25, 20.0, Color::from_rgb_u8(0x55, 0x55, 0x55));
                self.iso_box(cell, 0.55, 12.0, Color::from_rgb_u8(0xc0, 0x39, 0x2b));
            }
        }
    }

    fn coin(&self, coin: &CollectiblePresentation) {
        let lift = 14.0 * self.zoom + self.bob(coin.cell, 3.0);
        let center = self.center(coin.cell) - Vec2::new(0.0, lift);
        let radius = (if coin.value >= 10 { 7.0 } else { 5.5 }) * self.zoom;

        self.circle(center, radius, COIN.darken(0.2));
        self.circle(center, radius * 0.7, COIN);
    }

    fn indicator(&self, indicator: &HotspotIndicator) {
        let anchor = self.center(indicator.anchor)
            + Vec2::new(0.0, -56.0 * self.zoom - self.bob(indicator.anchor, 4.0));

        if indicator.near {
            let width = self.text_width(&indicator.label, TEXT_SIZE) + 16.0;
            let height = 24.0;
            let origin = anchor - Vec2::new(width / 2.0, height / 2.0);
            self.rectangle(
                origin + Vec2::new(height / 2.0, 0.0),
                Vec2::new(width - height, height),
                ACCENT,
            );
            self.circle(origin + Vec2::new(height / 2.0, height / 2.0), height / 2.0, ACCENT);
            self.circle(
                origin + Vec2::new(width - height / 2.0, height / 2.0),
                height / 2.0,
                ACCENT,
            );
            self.text(
                &indicator.label,
                origin + Vec2::new(8.0, height * 0.7),
                TEXT_SIZE,
                WHITE,
            );
        } else {
            self.circle(anchor, 5.0 * self.zoom, ACCENT.with_alpha(0.8));
            let center = self.point(anchor);
            draw_circle_lines(
                center.x,
                center.y,
                5.0 * self.zoom * self.scale,
                self.scale,
                to_macroquad_color(WHITE),
            );
        }
    }

    fn feet(&self, avatar: &AvatarPresentation) -> Vec2 {
        self.projection.position_to_screen(avatar.position) + Vec2::new(0.0, self.half_tile().y)
    }

    fn avatar(&self, avatar: &AvatarPresentation) {
        let zoom = self.zoom;
        let feet = self.feet(avatar);
        let swing = if avatar.moving {
            (self.time * 12.0).sin() * 3.0 * zoom
        } else {
            0.0
        };
        let outfit = avatar.outfit;

        self.circle(feet, 9.0 * zoom, Color::new(0.0, 0.0, 0.0, 0.18));

        let leg = Vec2::new(5.0, 12.0) * zoom;
        self.rectangle(feet + Vec2::new(-6.0 * zoom, -leg.y + swing), leg, outfit.pants);
        self.rectangle(feet + Vec2::new(1.0 * zoom, -leg.y - swing), leg, outfit.pants);

        let torso_top = feet + Vec2::new(-8.0, -28.0) * zoom;
        self.rectangle(torso_top, Vec2::new(16.0, 17.0) * zoom, outfit.shirt);

        let head = feet + Vec2::new(0.0, -36.0) * zoom;
        let head_radius = 8.0 * zoom;
        self.circle(head, head_radius, SKIN);
        self.rectangle(
            head + Vec2::new(-head_radius, -head_radius),
            Vec2::new(head_radius * 2.0, head_radius * 0.8),
            outfit.hair,
        );

        let eye = 2.0 * zoom;
        let eye_y = head.y + 1.0 * zoom;
        match avatar.facing {
            Facing::South => {
                self.circle(Vec2::new(head.x - 3.0 * zoom, eye_y), eye * 0.6, INK);
                self.circle(Vec2::new(head.x + 3.0 * zoom, eye_y), eye * 0.6, INK);
            }
            Facing::East => self.circle(Vec2::new(head.x + 4.0 * zoom, eye_y), eye * 0.6, INK),
            Facing::West => self.circle(Vec2::new(head.x - 4.0 * zoom, eye_y), eye * 0.6, INK),
            Facing::North => {
                self.circle(head, head_radius * 0.85, outfit.hair);
            }
        }
    }

    fn nameplate(&self, avatar: &AvatarPresentation) {
        let feet = self.feet(avatar);
        let size = TEXT_SIZE * 0.8;
        let width = self.text_width(&avatar.name, size) + 10.0;
        let origin = feet + Vec2::new(-width / 2.0, -60.0 * self.zoom);

        self.rectangle(origin, Vec2::new(width, size + 4.0), PANEL);
        self.text(&avatar.name, origin + Vec2::new(5.0, size), size, WHITE);
    }

    fn hud(&self, hud: &HudPresentation) {
        let badge = format!("Playing as {}", hud.player_name);
        let score = format!("Score: {}", hud.score);
        let badge_width = self
            .text_width(&badge, TEXT_SIZE)
            .max(self.text_width(&score, TEXT_SIZE));
        self.rectangle(Vec2::new(12.0, 12.0), Vec2::new(badge_width + 20.0, 52.0), PANEL);
        self.text(&badge, Vec2::new(22.0, 34.0), TEXT_SIZE, WHITE);
        self.text(&score, Vec2::new(22.0, 56.0), TEXT_SIZE, COIN);

        let hints = ["WASD / Arrows - Move", "Click - Walk to point", "E - Interact"];
        let hint_size = TEXT_SIZE * 0.8;
        for (index, hint) in hints.iter().enumerate() {
            let y = self.screen.y - 16.0 - (hints.len() - 1 - index) as f32 * (hint_size + 4.0);
            self.text(hint, Vec2::new(16.0, y), hint_size, WHITE.with_alpha(0.85));
        }

        if let Some(prompt) = &hud.prompt {
            let width = self.text_width(prompt, TEXT_SIZE) + 24.0;
            let origin = Vec2::new((self.screen.x - width) / 2.0, self.screen.y - 64.0);
            self.rectangle(origin, Vec2::new(width, 30.0), PANEL);
            self.text(prompt, origin + Vec2::new(12.0, 21.0), TEXT_SIZE, WHITE);
        }
    }
}
