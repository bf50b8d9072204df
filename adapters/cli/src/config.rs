//! Command-line arguments and room definition loading.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use iso_room_core::{Rgb, RoomDefinition};
use iso_room_system_bootstrap::RoomPreset;

/// Command-line arguments accepted by the `iso-room` binary.
#[derive(Debug, Parser)]
#[command(name = "iso-room")]
#[command(about = "Walk an isometric room and explore its hotspots")]
pub(crate) struct CliArgs {
    /// TOML room definition to load instead of a built-in preset.
    #[arg(long, value_name = "PATH")]
    room: Option<PathBuf>,

    /// Built-in room used when no room file is given.
    #[arg(long, value_enum, default_value_t = PresetArg::Lobby)]
    preset: PresetArg,

    /// Name shown on the nameplate and in the HUD badge.
    #[arg(long)]
    name: Option<String>,

    /// Shirt color in #rrggbb notation.
    #[arg(long, value_parser = parse_color)]
    shirt: Option<Rgb>,

    /// Trousers color in #rrggbb notation.
    #[arg(long, value_parser = parse_color)]
    pants: Option<Rgb>,

    /// Hair color in #rrggbb notation.
    #[arg(long, value_parser = parse_color)]
    hair: Option<Rgb>,

    /// Scale applied to wall heights and props.
    #[arg(long, default_value_t = 1.0)]
    zoom: f32,

    /// Synchronise presentation with the display refresh rate (default).
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,

    /// Render as fast as possible.
    #[arg(long = "no-vsync", overrides_with = "vsync")]
    no_vsync: bool,

    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,

    /// Tracing filter directives, overriding `RUST_LOG`.
    #[arg(long, value_name = "FILTER")]
    log_filter: Option<String>,

    /// Physical pixels per logical point.
    #[arg(long, default_value_t = 1.0)]
    dpi_scale: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PresetArg {
    Lobby,
    Studio,
    Rooftop,
    Cafe,
}

impl From<PresetArg> for RoomPreset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Lobby => Self::Lobby,
            PresetArg::Studio => Self::Studio,
            PresetArg::Rooftop => Self::Rooftop,
            PresetArg::Cafe => Self::Cafe,
        }
    }
}

fn parse_color(value: &str) -> Result<Rgb, String> {
    Rgb::from_hex(value).map_err(|error| error.to_string())
}

impl CliArgs {
    /// Loads the selected room and applies the avatar overrides on top of it.
    pub(crate) fn room_definition(&self) -> Result<RoomDefinition> {
        let mut definition = match &self.room {
            Some(path) => load_room_definition(path)?,
            None => RoomPreset::from(self.preset).definition(),
        };

        if let Some(name) = &self.name {
            definition.avatar.name = name.clone();
        }
        if let Some(shirt) = self.shirt {
            definition.avatar.shirt = shirt;
        }
        if let Some(pants) = self.pants {
            definition.avatar.pants = pants;
        }
        if let Some(hair) = self.hair {
            definition.avatar.hair = hair;
        }

        Ok(definition)
    }

    pub(crate) fn zoom(&self) -> f32 {
        self.zoom
    }

    pub(crate) fn vsync(&self) -> bool {
        self.vsync || !self.no_vsync
    }

    pub(crate) fn show_fps(&self) -> bool {
        self.show_fps
    }

    pub(crate) fn log_filter(&self) -> Option<&str> {
        self.log_filter.as_deref()
    }

    pub(crate) fn dpi_scale(&self) -> f32 {
        self.dpi_scale
    }
}

/// Reads and parses a TOML room definition.
pub(crate) fn load_room_definition(path: &Path) -> Result<RoomDefinition> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read room file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse room file {}", path.display()))
}
