use clap::Parser;

use glquad_common::config::{LoaderError, Settings, SettingsLoader};

mod app;
mod args;
mod demo;
mod logging;

use app::App;
use args::ArgsInteractive;

fn main() {
    // clion needs help in trait annotation
    let args = <ArgsInteractive as Parser>::parse();

    logging::init_logging(args.log.as_deref());

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Could not read settings: {e}");
            std::process::exit(-1);
        }
    };

    let app = match App::new(settings) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Could not start: {e}");
            std::process::exit(-1);
        }
    };

    app.run();
}

fn load_settings(args: &ArgsInteractive) -> Result<Settings, LoaderError> {
    let mut settings = match &args.config {
        Some(path) => {
            log::info!("Reading settings from {path:?}");
            SettingsLoader::load_from_path(path)?
        }
        None => Settings::default(),
    };

    args.apply(&mut settings);
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use glquad_common::presets::Preset;

    use super::*;

    fn write_settings(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("glquad-{}-{name}.json5", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn command_line_beats_file_beats_defaults() {
        let path = write_settings("precedence", "{ width: 800, height: 600, preset: 'quad' }");

        let config = path.to_string_lossy().into_owned();
        let args = ArgsInteractive::try_parse_from([
            "glquad",
            "--config",
            config.as_str(),
            "--width",
            "1024",
        ])
        .unwrap();

        let settings = load_settings(&args);
        std::fs::remove_file(&path).unwrap();
        let settings = settings.unwrap();

        assert_eq!(settings.width, 1024);
        assert_eq!(settings.height, 600);
        assert_eq!(settings.preset, Preset::Quad);
        assert_eq!(settings.title, Settings::default().title);
    }

    #[test]
    fn command_line_values_are_validated() {
        let args = ArgsInteractive::try_parse_from(["glquad", "--height", "0"]).unwrap();

        let res = load_settings(&args);
        assert!(matches!(res, Err(LoaderError::Invalid(_))));
    }
}
