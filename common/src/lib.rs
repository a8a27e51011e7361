pub mod config;
pub mod presets;
pub mod pulse;
pub mod shader_source;
