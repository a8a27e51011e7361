use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::presets::Preset;
use crate::pulse::ColorPulse;

/// Oldest context version the built-in shaders compile against.
pub const MIN_GL_VERSION: (u8, u8) = (3, 3);

/// Demo settings. Every key is optional in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub preset: Preset,
    /// Combined shader file, replacing the preset's built-in source.
    pub shader: Option<PathBuf>,
    pub vsync: bool,
    pub clear_color: [f32; 4],
    pub color: [f32; 4],
    pub pulse_step: f32,
    pub gl_version: (u8, u8),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: "OpenGL Window".into(),
            preset: Preset::default(),
            shader: None,
            vsync: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            color: ColorPulse::DEFAULT_COLOR,
            pulse_step: ColorPulse::DEFAULT_STEP,
            gl_version: MIN_GL_VERSION,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.width == 0 || self.height == 0 {
            return Err(LoaderError::Invalid(format!(
                "window size {}x{} must be non-zero",
                self.width, self.height
            )));
        }

        if !(self.pulse_step > 0.0 && self.pulse_step.is_finite()) {
            return Err(LoaderError::Invalid(format!(
                "pulse_step {} must be positive",
                self.pulse_step
            )));
        }

        if self.gl_version < MIN_GL_VERSION {
            let (major, minor) = self.gl_version;
            return Err(LoaderError::Invalid(format!(
                "OpenGL {major}.{minor} is too old, at least {}.{} is required",
                MIN_GL_VERSION.0, MIN_GL_VERSION.1
            )));
        }

        Ok(())
    }

    pub fn pulse(&self) -> ColorPulse {
        ColorPulse::new(self.color, self.pulse_step)
    }
}

pub struct SettingsLoader {}

impl SettingsLoader {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Settings, LoaderError> {
        let settings_str = std::fs::read_to_string(path).map_err(LoaderError::InputError)?;

        Self::load_from_str(&settings_str)
    }

    pub fn load_from_str(settings_str: &str) -> Result<Settings, LoaderError> {
        let settings: Settings = json5::from_str(settings_str).map_err(LoaderError::FormatError)?;

        settings.validate()?;

        Ok(settings)
    }
}

#[derive(Debug)]
pub enum LoaderError {
    InputError(std::io::Error),
    FormatError(json5::Error),
    Invalid(String),
}

impl Display for LoaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputError(e) => f.write_fmt(format_args!("{e}")),
            Self::FormatError(e) => f.write_fmt(format_args!("{e}")),
            Self::Invalid(e) => f.write_fmt(format_args!("invalid settings: {e}")),
        }
    }
}

impl Error for LoaderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InputError(e) => Some(e),
            Self::FormatError(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = SettingsLoader::load_from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.width, 640);
        assert_eq!(settings.height, 480);
        assert_eq!(settings.title, "OpenGL Window");
        assert_eq!(settings.preset, Preset::Pulse);
    }

    #[test]
    fn reads_json5() {
        let settings = SettingsLoader::load_from_str(
            r#"{
                // comments and trailing commas are fine
                width: 800,
                title: 'Quad',
                preset: 'quad',
                shader: 'res/shaders/Basic.glsl',
                vsync: false,
                clear_color: [0.1, 0.1, 0.1, 1.0],
                gl_version: [4, 5],
            }"#,
        )
        .unwrap();

        assert_eq!(settings.width, 800);
        assert_eq!(settings.height, 480);
        assert_eq!(settings.title, "Quad");
        assert_eq!(settings.preset, Preset::Quad);
        assert_eq!(settings.shader, Some(PathBuf::from("res/shaders/Basic.glsl")));
        assert!(!settings.vsync);
        assert_eq!(settings.gl_version, (4, 5));
    }

    #[test]
    fn rejects_unknown_keys() {
        let res = SettingsLoader::load_from_str("{ widht: 10 }");
        assert!(matches!(res, Err(LoaderError::FormatError(_))));
    }

    #[test]
    fn rejects_unknown_preset() {
        let res = SettingsLoader::load_from_str("{ preset: 'cube' }");
        assert!(matches!(res, Err(LoaderError::FormatError(_))));
    }

    #[test]
    fn validates_values() {
        let res = SettingsLoader::load_from_str("{ width: 0 }");
        assert!(matches!(res, Err(LoaderError::Invalid(_))));

        let res = SettingsLoader::load_from_str("{ height: 0 }");
        assert!(matches!(res, Err(LoaderError::Invalid(_))));

        let res = SettingsLoader::load_from_str("{ pulse_step: -0.1 }");
        assert!(matches!(res, Err(LoaderError::Invalid(_))));

        let res = SettingsLoader::load_from_str("{ gl_version: [3, 2] }");
        assert!(matches!(res, Err(LoaderError::Invalid(_))));

        let res = SettingsLoader::load_from_str("{ gl_version: [4, 0] }");
        assert!(res.is_ok());
    }

    #[test]
    fn missing_file() {
        let res = SettingsLoader::load_from_path("does/not/exist.json5");
        assert!(matches!(res, Err(LoaderError::InputError(_))));
    }
}
