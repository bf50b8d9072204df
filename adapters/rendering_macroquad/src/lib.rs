#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the isometric room.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Each loop iteration awaits `next_frame`, so the room advances at most once
//! per displayed frame. Painting happens in logical points scaled by the
//! configured pixel ratio; the local `paint` module owns every draw call,
//! including the clear to the presentation's background color.

mod paint;

use anyhow::Result;
use glam::Vec2;
use iso_room_core::Facing;
use iso_room_rendering::{
    FrameInput, IsoProjection, Presentation, ProjectionCache, RenderingBackend, Scene, Viewport,
};
use macroquad::input::{
    is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};
use tracing::{debug, info};

use self::paint::Painter;

const DIRECTION_KEYS: [(Facing, [KeyCode; 2]); 4] = [
    (Facing::North, [KeyCode::W, KeyCode::Up]),
    (Facing::East, [KeyCode::D, KeyCode::Right]),
    (Facing::South, [KeyCode::S, KeyCode::Down]),
    (Facing::West, [KeyCode::A, KeyCode::Left]),
];

/// Tracks which direction keys are held, most recent press last.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct DirectionalKeyState {
    pressed: Vec<Facing>,
}

impl DirectionalKeyState {
    /// Records a press, moving `facing` to the top if it was already held.
    pub fn press(&mut self, facing: Facing) {
        self.pressed.retain(|held| *held != facing);
        self.pressed.push(facing);
    }

    /// Records that no key for `facing` is down any more.
    pub fn release(&mut self, facing: Facing) {
        self.pressed.retain(|held| *held != facing);
    }

    /// Direction that currently drives the actor.
    #[must_use]
    pub fn held(&self) -> Option<Facing> {
        self.pressed.last().copied()
    }

    fn poll(&mut self) {
        for (facing, keys) in DIRECTION_KEYS {
            if keys.iter().any(|key| is_key_pressed(*key)) {
                self.press(facing);
            } else if !keys.iter().any(|key| is_key_down(*key)) {
                self.release(facing);
            }
        }
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the loop.
    quit_requested: bool,
    /// `E` interacts with the active hotspot.
    interact: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            interact: is_key_pressed(KeyCode::E),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    dpi_scale: f32,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            dpi_scale: 1.0,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Sets how many physical pixels make up one logical point.
    #[must_use]
    pub fn with_dpi_scale(mut self, dpi_scale: f32) -> Self {
        self.dpi_scale = dpi_scale;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            match self.frame_times.pop_front() {
                Some(removed) => {
                    self.window_duration = self.window_duration.saturating_sub(removed);
                }
                None => break,
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames.max(1);
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            dpi_scale,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 1280,
            window_height: 720,
            high_dpi: dpi_scale > 1.0,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut projections = ProjectionCache::default();
            let mut directions = DirectionalKeyState::default();
            let mut fps_counter = FpsCounter::default();
            let mut last_viewport: Option<Viewport> = None;

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }
                directions.poll();

                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let viewport = Viewport::new(screen.x / dpi_scale, screen.y / dpi_scale, dpi_scale);
                if last_viewport != Some(viewport) {
                    debug!(?viewport, backing = ?viewport.backing_size(), "viewport resized");
                    last_viewport = Some(viewport);
                }
                let projection = scene.room.projection(&mut projections, viewport);
                if projection.is_none() {
                    debug!(?viewport, "viewport is empty; skipping frame input and painting");
                }

                let (cursor_x, cursor_y) = mouse_position();
                let frame_input = gather_frame_input_from_observations(
                    projection.as_ref(),
                    Vec2::new(cursor_x, cursor_y) / dpi_scale,
                    is_mouse_button_pressed(MouseButton::Left),
                    directions.held(),
                    keyboard.interact,
                );

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let simulation_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let simulation = simulation_start.elapsed();

                let render_start = Instant::now();
                match projection {
                    Some(projection) => {
                        let logical_screen = screen / dpi_scale;
                        Painter::new(&projection, &scene, dpi_scale, logical_screen, clear_color)
                            .paint(&scene);
                    }
                    None => macroquad::window::clear_background(to_macroquad_color(clear_color)),
                }
                let render = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation,
                    render,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_simulation,
                        avg_render,
                    }) = fps_metrics
                    {
                        info!(
                            fps = per_second,
                            trailing_10s_fps = trailing_ten_seconds,
                            simulation_ms = avg_simulation.as_secs_f64() * 1_000.0,
                            render_ms = avg_render.as_secs_f64() * 1_000.0,
                            "frame timing"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Builds the frame input from raw observations; the cursor is in logical points.
fn gather_frame_input_from_observations(
    projection: Option<&IsoProjection>,
    cursor: Vec2,
    click: bool,
    held_direction: Option<Facing>,
    interact: bool,
) -> FrameInput {
    let click_cell = match projection {
        Some(projection) if click => Some(projection.to_grid(cursor)),
        _ => None,
    };

    FrameInput {
        held_direction,
        click_cell,
        interact,
    }
}

pub(crate) fn to_macroquad_color(color: iso_room_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
