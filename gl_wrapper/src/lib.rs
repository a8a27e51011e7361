pub mod debug;
pub mod geometry;
pub mod info;
pub mod program;
pub mod renderer;

pub use debug::GlError;
