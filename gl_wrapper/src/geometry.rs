use std::ffi::c_void;

use thiserror::Error;

use crate::debug::GlError;
use crate::gl_call;

pub struct GeometryBuilder<'a> {
    attributes: Vec<VertexAttribute>,
    data: &'a [f32],
    indices: Option<&'a [u32]>,
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
            indices: None,
        }
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Draw through an element buffer instead of consecutive vertices.
    pub fn with_indices(mut self, indices: &'a [u32]) -> Self {
        self.indices = Some(indices);
        self
    }

    /// Checks the layout without touching GL. Returns the vertex count.
    pub fn validate(&self) -> Result<usize, GBError> {
        let total_len: usize = self.attributes.iter().map(|a| a.size()).sum();

        if total_len == 0 {
            return Err(GBError::NoAttributes);
        }

        if self.data.is_empty() || self.data.len() % total_len != 0 {
            return Err(GBError::InvalidDataLength);
        }

        let vertices = self.data.len() / total_len;

        if let Some(indices) = self.indices {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices) {
                return Err(GBError::IndexOutOfRange { index, vertices });
            }
        }

        Ok(vertices)
    }

    pub fn build(self) -> Result<Geometry, GBError> {
        let vertices = self.validate()?;
        let total_len: usize = self.attributes.iter().map(|a| a.size()).sum();

        let mut geometry = Geometry {
            vao: 0,
            vbo: 0,
            ebo: None,
            vertices,
            indices: self.indices.map(|i| i.len()),
        };

        unsafe {
            gl_call!(gl::GenVertexArrays(1, &mut geometry.vao))?;
            gl_call!(gl::GenBuffers(1, &mut geometry.vbo))?;

            gl_call!(gl::BindVertexArray(geometry.vao))?;
            gl_call!(gl::BindBuffer(gl::ARRAY_BUFFER, geometry.vbo))?;

            gl_call!(gl::BufferData(
                gl::ARRAY_BUFFER,
                std::mem::size_of_val(self.data) as isize,
                self.data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            ))?;

            let mut offset = 0;

            for (i, attr) in self.attributes.iter().enumerate() {
                gl_call!(gl::VertexAttribPointer(
                    i as u32,
                    attr.size() as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    (total_len * std::mem::size_of::<f32>()) as i32,
                    (offset * std::mem::size_of::<f32>()) as *const c_void,
                ))?;
                offset += attr.size();
                gl_call!(gl::EnableVertexAttribArray(i as u32))?;
            }

            if let Some(indices) = self.indices {
                let mut ebo = 0;
                gl_call!(gl::GenBuffers(1, &mut ebo))?;
                geometry.ebo = Some(ebo);

                // element buffer binding is part of the VAO state
                gl_call!(gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo))?;
                gl_call!(gl::BufferData(
                    gl::ELEMENT_ARRAY_BUFFER,
                    std::mem::size_of_val(indices) as isize,
                    indices.as_ptr() as *const c_void,
                    gl::STATIC_DRAW,
                ))?;
            }

            gl_call!(gl::BindVertexArray(0))?;
            gl_call!(gl::BindBuffer(gl::ARRAY_BUFFER, 0))?;
        }

        log::debug!(
            "Uploaded geometry: {} vertices, {} indices",
            geometry.vertices,
            geometry.indices.unwrap_or(0)
        );

        Ok(geometry)
    }
}

#[derive(Debug, Error)]
pub enum GBError {
    #[error("Geometry needs at least one vertex attribute")]
    NoAttributes,
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
    #[error("Index {index} out of range for {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },
    #[error(transparent)]
    Gl(#[from] GlError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexAttribute {
    Float,
    Vec2,
    Vec3,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
        }
    }

    /// Attribute made of `size` floats.
    pub fn from_size(size: usize) -> Option<Self> {
        match size {
            1 => Some(VertexAttribute::Float),
            2 => Some(VertexAttribute::Vec2),
            3 => Some(VertexAttribute::Vec3),
            _ => None,
        }
    }
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    ebo: Option<u32>,
    vertices: usize,
    indices: Option<usize>,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    /// Index count, when drawn through an element buffer.
    pub fn indices(&self) -> Option<usize> {
        self.indices
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        unsafe {
            if let Some(ebo) = self.ebo {
                gl::DeleteBuffers(1, &ebo);
            }
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}
