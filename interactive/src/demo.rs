use gl_wrapper::geometry::{GBError, Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{Program, ProgramBuilder, UniformLocation};
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::GlError;

use glquad_common::config::Settings;
use glquad_common::presets::{Preset, COLOR_UNIFORM, POSITION_COMPONENTS};
use glquad_common::pulse::ColorPulse;
use glquad_common::shader_source::ShaderSource;

use crate::app::AppError;

/// GPU objects of the demo plus the per-frame animation state.
///
/// Needs a current context for its whole lifetime, dropping it releases the
/// program and the buffers.
pub struct Demo {
    program: Program,
    geometry: Geometry,
    renderer: GlRenderer,
    color: Option<UniformLocation>,
    pulse: Option<ColorPulse>,
    clear_color: [f32; 4],
}

impl Demo {
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let preset = settings.preset;

        let source = match &settings.shader {
            Some(path) => {
                log::info!("Loading shader from {path:?}");
                ShaderSource::load_from_path(path)?
            }
            None => ShaderSource::builtin(preset)?,
        };

        let program = ProgramBuilder::new(&source.vertex, &source.fragment)?.build()?;

        let geometry = geometry_builder(preset)?.build()?;

        let pulse = settings.pulse();

        let color = if preset.uses_color_uniform() {
            let location = program.uniform_location(COLOR_UNIFORM)?;
            program.set_uniform_4f(location, pulse.base())?;
            Some(location)
        } else {
            None
        };

        log::info!("Drawing {preset:?} preset");

        Ok(Self {
            program,
            geometry,
            renderer: GlRenderer::new(),
            color,
            pulse: preset.animated().then_some(pulse),
            clear_color: settings.clear_color,
        })
    }

    pub fn frame(&mut self) -> Result<(), GlError> {
        let [r, g, b, a] = self.clear_color;
        self.renderer.clear_color(r, g, b, a)?;

        if let (Some(location), Some(pulse)) = (self.color, &self.pulse) {
            self.program.set_uniform_4f(location, pulse.color())?;
        }

        self.renderer.draw(&self.geometry, &self.program)?;

        if let Some(pulse) = &mut self.pulse {
            pulse.advance();
        }

        Ok(())
    }

    pub fn resize(&self, width: u32, height: u32) -> Result<(), GlError> {
        self.renderer.resize(width, height)
    }
}

/// Vertex layout of a preset, laid out from its component count.
fn geometry_builder(preset: Preset) -> Result<GeometryBuilder<'static>, GBError> {
    let position =
        VertexAttribute::from_size(POSITION_COMPONENTS).ok_or(GBError::InvalidDataLength)?;

    let mut builder = GeometryBuilder::new(preset.positions()).with_attribute(position);
    if let Some(indices) = preset.indices() {
        builder = builder.with_indices(indices);
    }

    Ok(builder)
}
