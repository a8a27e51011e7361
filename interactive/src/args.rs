use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use glquad_common::config::Settings;
use glquad_common::presets::Preset;

#[derive(Debug, Parser)]
pub struct ArgsInteractive {
    /// Path to a JSON5 settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Which iteration of the demo to draw
    #[arg(short, long, value_enum)]
    pub preset: Option<PresetArg>,
    /// Combined shader file to use instead of the built-in one
    #[arg(short, long)]
    pub shader: Option<PathBuf>,
    /// Window width
    #[arg(long)]
    pub width: Option<u32>,
    /// Window height
    #[arg(long)]
    pub height: Option<u32>,
    /// Window title
    #[arg(long)]
    pub title: Option<String>,
    /// Present frames without waiting for vertical sync
    #[arg(long)]
    pub no_vsync: bool,
    /// Log filter, overrides RUST_LOG (e.g. "debug", "gl_wrapper=trace")
    #[arg(long)]
    pub log: Option<String>,
}

impl ArgsInteractive {
    /// Applies command line overrides on top of file or default settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(preset) = self.preset {
            settings.preset = preset.into();
        }
        if let Some(shader) = &self.shader {
            settings.shader = Some(shader.clone());
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(title) = &self.title {
            settings.title = title.clone();
        }
        if self.no_vsync {
            settings.vsync = false;
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum PresetArg {
    Triangle,
    Quad,
    Pulse,
}

impl From<PresetArg> for Preset {
    fn from(p: PresetArg) -> Self {
        match p {
            PresetArg::Triangle => Self::Triangle,
            PresetArg::Quad => Self::Quad,
            PresetArg::Pulse => Self::Pulse,
        }
    }
}
