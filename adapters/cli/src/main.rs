#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that opens an isometric room in a window.

mod config;
mod hud;
mod simulation;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use iso_room_rendering::{Color, Presentation, RenderingBackend};
use iso_room_rendering_macroquad::MacroquadBackend;
use iso_room_system_bootstrap::Bootstrap;
use iso_room_world::Room;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{config::CliArgs, simulation::Simulation};

const CLEAR_COLOR: Color = Color::from_rgb_u8(0x1e, 0x29, 0x3b);

/// Entry point for the isometric room command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_filter())?;
    ensure!(
        args.dpi_scale() > 0.0,
        "--dpi-scale must be positive (received {})",
        args.dpi_scale()
    );

    let definition = args.room_definition()?;
    let room = Room::new(&definition)
        .with_context(|| format!("room {:?} is invalid", definition.name))?;

    let bootstrap = Bootstrap;
    info!("{}", bootstrap.welcome_banner(&room));
    let title = bootstrap.window_title(&room);
    info!(
        room = definition.name.as_str(),
        player = definition.avatar.name.as_str(),
        hotspots = definition.hotspots.len(),
        collectibles = definition.collectibles.len(),
        "room mounted"
    );

    let mut simulation = Simulation::new(room);
    let scene = simulation
        .scene(args.zoom())
        .context("failed to build the room scene")?;

    MacroquadBackend::new()
        .with_vsync(args.vsync())
        .with_show_fps(args.show_fps())
        .with_dpi_scale(args.dpi_scale())
        .run(
            Presentation::new(title, CLEAR_COLOR, scene),
            move |dt, input, scene| simulation.frame(dt, input, scene),
        )
}

fn init_tracing(directives: Option<&str>) -> Result<()> {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter {directives:?}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}
