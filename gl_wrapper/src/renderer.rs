use crate::debug::GlError;
use crate::geometry::Geometry;
use crate::gl_call;
use crate::program::Program;

pub struct GlRenderer {}

impl GlRenderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Draws with `program`, which only issues a bind when it is not already current.
    pub fn draw(&mut self, geometry: &Geometry, program: &Program) -> Result<(), GlError> {
        program.bind()?;

        unsafe {
            gl_call!(gl::BindVertexArray(geometry.vao()))?;

            match geometry.indices() {
                Some(count) => gl_call!(gl::DrawElements(
                    gl::TRIANGLES,
                    count as i32,
                    gl::UNSIGNED_INT,
                    std::ptr::null(),
                ))?,
                None => gl_call!(gl::DrawArrays(
                    gl::TRIANGLES,
                    0,
                    geometry.vertices() as i32
                ))?,
            }
        }

        Ok(())
    }

    pub fn resize(&self, width: u32, height: u32) -> Result<(), GlError> {
        unsafe { gl_call!(gl::Viewport(0, 0, width as i32, height as i32)) }
    }

    pub fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) -> Result<(), GlError> {
        unsafe {
            gl_call!(gl::ClearColor(r, g, b, a))?;
            gl_call!(gl::Clear(gl::COLOR_BUFFER_BIT))
        }
    }
}

impl Default for GlRenderer {
    fn default() -> Self {
        Self::new()
    }
}
