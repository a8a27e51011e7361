//! Splitting of combined shader files.
//!
//! A combined file holds both stages of a program, each introduced by a directive
//! line:
//!
//! ```text
//! #shader vertex
//! ...
//! #shader fragment
//! ...
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::presets::Preset;

const DIRECTIVE: &str = "#shader";

const BASIC: &str = include_str!("../res/shaders/Basic.glsl");
const TRIANGLE: &str = include_str!("../res/shaders/Triangle.glsl");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Vertex,
    Fragment,
}

impl ShaderSource {
    pub fn parse(text: &str) -> Result<Self, ShaderSourceError> {
        let mut vertex = String::new();
        let mut fragment = String::new();
        let mut section = Section::None;

        for line in text.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);

            if line.contains(DIRECTIVE) {
                if line.contains("vertex") {
                    section = Section::Vertex;
                } else if line.contains("fragment") {
                    section = Section::Fragment;
                }
                continue;
            }

            let target = match section {
                Section::Vertex => &mut vertex,
                Section::Fragment => &mut fragment,
                Section::None => continue,
            };

            target.push_str(line);
            target.push('\n');
        }

        if vertex.trim().is_empty() {
            return Err(ShaderSourceError::MissingSection("vertex"));
        }
        if fragment.trim().is_empty() {
            return Err(ShaderSourceError::MissingSection("fragment"));
        }

        Ok(Self { vertex, fragment })
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ShaderSourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ShaderSourceError::Io {
            path: path.to_owned(),
            source,
        })?;

        Self::parse(&text)
    }

    /// Source compiled into the binary for the given preset.
    pub fn builtin(preset: Preset) -> Result<Self, ShaderSourceError> {
        match preset {
            Preset::Triangle => Self::parse(TRIANGLE),
            Preset::Quad | Preset::Pulse => Self::parse(BASIC),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShaderSourceError {
    #[error("could not read shader file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("shader source has no {0} section")]
    MissingSection(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_sections() {
        let src = "#shader vertex\nvoid main() { v(); }\n#shader fragment\nvoid main() { f(); }\n";
        let parsed = ShaderSource::parse(src).unwrap();

        assert_eq!(parsed.vertex, "void main() { v(); }\n");
        assert_eq!(parsed.fragment, "void main() { f(); }\n");
    }

    #[test]
    fn directive_lines_are_dropped() {
        let parsed = ShaderSource::parse("#shader fragment\nb\n#shader vertex\na\n").unwrap();

        assert!(!parsed.vertex.contains("#shader"));
        assert!(!parsed.fragment.contains("#shader"));
        assert_eq!(parsed.vertex, "a\n");
        assert_eq!(parsed.fragment, "b\n");
    }

    #[test]
    fn lines_before_first_directive_are_ignored() {
        let parsed =
            ShaderSource::parse("// header\n\n#shader vertex\na\n#shader fragment\nb").unwrap();

        assert_eq!(parsed.vertex, "a\n");
        assert_eq!(parsed.fragment, "b\n");
    }

    #[test]
    fn unknown_directive_keeps_current_section() {
        let parsed =
            ShaderSource::parse("#shader vertex\na\n#shader geometry\nb\n#shader fragment\nc\n")
                .unwrap();

        assert_eq!(parsed.vertex, "a\nb\n");
        assert_eq!(parsed.fragment, "c\n");
    }

    #[test]
    fn repeated_sections_concatenate() {
        let parsed = ShaderSource::parse(
            "#shader vertex\na\n#shader fragment\nb\n#shader vertex\nc\n",
        )
        .unwrap();

        assert_eq!(parsed.vertex, "a\nc\n");
        assert_eq!(parsed.fragment, "b\n");
    }

    #[test]
    fn crlf_line_endings() {
        let parsed =
            ShaderSource::parse("#shader vertex\r\na\r\n#shader fragment\r\nb\r\n").unwrap();

        assert_eq!(parsed.vertex, "a\n");
        assert_eq!(parsed.fragment, "b\n");
    }

    #[test]
    fn missing_section_is_an_error() {
        let res = ShaderSource::parse("#shader vertex\na\n");
        assert!(matches!(res, Err(ShaderSourceError::MissingSection("fragment"))));

        let res = ShaderSource::parse("#shader vertex\n\n  \n#shader fragment\nb\n");
        assert!(matches!(res, Err(ShaderSourceError::MissingSection("vertex"))));

        let res = ShaderSource::parse("");
        assert!(matches!(res, Err(ShaderSourceError::MissingSection("vertex"))));
    }

    #[test]
    fn builtin_sources_parse() {
        let basic = ShaderSource::builtin(Preset::Pulse).unwrap();
        assert!(basic.vertex.starts_with("#version 330 core"));
        assert!(basic.fragment.contains("uniform vec4 u_Color;"));

        let triangle = ShaderSource::builtin(Preset::Triangle).unwrap();
        assert!(!triangle.fragment.contains("u_Color"));
    }

    #[test]
    fn missing_file() {
        let res = ShaderSource::load_from_path("does/not/exist.glsl");
        assert!(matches!(res, Err(ShaderSourceError::Io { .. })));
    }
}
