use std::cell::Cell;
use std::ffi::{c_char, CString};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

use gl::types::{GLenum, GLint, GLuint};
use thiserror::Error;

use crate::debug::GlError;
use crate::gl_call;

pub struct ProgramBuilder {
    vert: CString,
    frag: CString,
}

impl ProgramBuilder {
    pub fn new(vert_src: &str, frag_src: &str) -> Result<Self, ProgramError> {
        Ok(Self {
            vert: CString::new(vert_src)
                .map_err(|_| ProgramError::InvalidSource(ShaderStage::Vertex))?,
            frag: CString::new(frag_src)
                .map_err(|_| ProgramError::InvalidSource(ShaderStage::Fragment))?,
        })
    }

    pub fn build(self) -> Result<Program, ProgramError> {
        let vert = compile_shader(ShaderStage::Vertex, &self.vert)?;
        let frag = compile_shader(ShaderStage::Fragment, &self.frag)?;

        let program = unsafe { link_program(&vert, &frag)? };
        program.validate();

        Ok(program)
    }
}

/// Owns a freshly created GL object, deleting it on drop until released.
struct ObjectGuard {
    id: GLuint,
    delete: unsafe fn(GLuint),
}

impl ObjectGuard {
    fn new(id: GLuint, delete: unsafe fn(GLuint)) -> Self {
        Self { id, delete }
    }

    fn id(&self) -> GLuint {
        self.id
    }

    fn release(self) -> GLuint {
        let id = self.id;
        std::mem::forget(self);
        id
    }
}

impl Drop for ObjectGuard {
    fn drop(&mut self) {
        unsafe { (self.delete)(self.id) }
    }
}

fn compile_shader(stage: ShaderStage, src: &CString) -> Result<ObjectGuard, ProgramError> {
    unsafe {
        let shader = ObjectGuard::new(
            gl_call!(gl::CreateShader(stage.gl_kind()))?,
            gl::DeleteShader,
        );
        let id = shader.id();

        gl_call!(gl::ShaderSource(
            id,
            1,
            (&src.as_ptr()) as *const *const c_char,
            std::ptr::null(),
        ))?;
        gl_call!(gl::CompileShader(id))?;

        let mut success: GLint = 0;
        gl_call!(gl::GetShaderiv(id, gl::COMPILE_STATUS, &mut success))?;

        if success != gl::TRUE as GLint {
            let log = info_log(id, gl::GetShaderiv, gl::GetShaderInfoLog);

            log::error!("Failed to compile {stage} shader:\n{log}");

            return Err(ProgramError::Compilation { stage, log });
        }

        Ok(shader)
    }
}

unsafe fn link_program(vert: &ObjectGuard, frag: &ObjectGuard) -> Result<Program, ProgramError> {
    let program = ObjectGuard::new(gl_call!(gl::CreateProgram())?, gl::DeleteProgram);
    let id = program.id();

    gl_call!(gl::AttachShader(id, vert.id()))?;
    gl_call!(gl::AttachShader(id, frag.id()))?;
    gl_call!(gl::LinkProgram(id))?;

    let mut success: GLint = 0;
    gl_call!(gl::GetProgramiv(id, gl::LINK_STATUS, &mut success))?;

    if success != gl::TRUE as GLint {
        let log = info_log(id, gl::GetProgramiv, gl::GetProgramInfoLog);

        log::error!("Failed to link program:\n{log}");

        return Err(ProgramError::Linking(log));
    }

    gl::DetachShader(id, vert.id());
    gl::DetachShader(id, frag.id());

    Ok(Program::new(program.release()))
}

type GetIv = unsafe fn(GLuint, GLenum, *mut GLint);
type GetInfoLog = unsafe fn(GLuint, GLint, *mut GLint, *mut c_char);

/// Reads the info log of a shader or program object.
unsafe fn info_log(id: GLuint, get_iv: GetIv, get_log: GetInfoLog) -> String {
    let mut length: GLint = 0;
    get_iv(id, gl::INFO_LOG_LENGTH, &mut length);

    if length <= 0 {
        return String::new();
    }

    let mut buf = vec![0_u8; length as usize];
    let mut written: GLint = 0;
    get_log(id, length, &mut written, buf.as_mut_ptr() as *mut c_char);

    buf.truncate(written.max(0) as usize);

    String::from_utf8_lossy(&buf).trim_end().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_kind(&self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl Display for ShaderStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("{0} shader source contains a NUL byte")]
    InvalidSource(ShaderStage),
    #[error("failed to compile {stage} shader: {log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("failed to link program: {0}")]
    Linking(String),
    #[error("uniform '{0}' not found in program")]
    MissingUniform(String),
    #[error(transparent)]
    Gl(#[from] GlError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLocation(GLint);

// GL names are reused after deletion, so the bound program is tracked by a
// serial that is never handed out twice.
static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static BOUND_PROGRAM: Cell<Option<u64>> = Cell::new(None);
}

/// Records `serial` as bound. Returns false when it already was.
fn mark_bound(serial: u64) -> bool {
    BOUND_PROGRAM.with(|bound| bound.replace(Some(serial)) != Some(serial))
}

fn forget_bound(serial: u64) {
    BOUND_PROGRAM.with(|bound| {
        if bound.get() == Some(serial) {
            bound.set(None);
        }
    });
}

pub struct Program {
    id: GLuint,
    serial: u64,
}

impl Program {
    fn new(id: GLuint) -> Self {
        Self {
            id,
            serial: NEXT_SERIAL.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn get_id(&self) -> GLuint {
        self.id
    }

    /// Makes the program current, skipping the call when it already is.
    pub fn bind(&self) -> Result<(), GlError> {
        if !mark_bound(self.serial) {
            return Ok(());
        }

        let res = unsafe { gl_call!(gl::UseProgram(self.id)) };
        if res.is_err() {
            forget_bound(self.serial);
        }
        res
    }

    pub fn uniform_location(&self, name: &str) -> Result<UniformLocation, ProgramError> {
        let c_name =
            CString::new(name).map_err(|_| ProgramError::MissingUniform(name.to_string()))?;

        let location = unsafe { gl_call!(gl::GetUniformLocation(self.id, c_name.as_ptr()))? };

        if location == -1 {
            return Err(ProgramError::MissingUniform(name.to_string()));
        }

        Ok(UniformLocation(location))
    }

    /// Binds the program and uploads a `vec4` uniform.
    pub fn set_uniform_4f(&self, location: UniformLocation, value: [f32; 4]) -> Result<(), GlError> {
        self.bind()?;

        let [x, y, z, w] = value;
        unsafe { gl_call!(gl::Uniform4f(location.0, x, y, z, w)) }
    }

    // Validation depends on the bound state at call time, so a failure here is
    // only reported.
    fn validate(&self) {
        let mut status: GLint = 0;

        unsafe {
            gl::ValidateProgram(self.id);
            gl::GetProgramiv(self.id, gl::VALIDATE_STATUS, &mut status);
        }

        if status != gl::TRUE as GLint {
            let log = unsafe { info_log(self.id, gl::GetProgramiv, gl::GetProgramInfoLog) };
            log::warn!("Program {} failed validation: {log}", self.id);
        }
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        forget_bound(self.serial);
        unsafe { gl::DeleteProgram(self.id) }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    thread_local! {
        static DELETED: RefCell<Vec<GLuint>> = RefCell::new(Vec::new());
    }

    unsafe fn record_delete(id: GLuint) {
        DELETED.with(|d| d.borrow_mut().push(id));
    }

    fn deleted() -> Vec<GLuint> {
        DELETED.with(|d| d.borrow_mut().drain(..).collect())
    }

    #[test]
    fn guard_deletes_on_early_return() {
        fn create(id: GLuint, fail: bool) -> Result<GLuint, ()> {
            let guard = ObjectGuard::new(id, record_delete);
            if fail {
                return Err(());
            }
            Ok(guard.release())
        }

        assert!(create(7, true).is_err());
        assert_eq!(deleted(), vec![7]);

        assert_eq!(create(8, false), Ok(8));
        assert!(deleted().is_empty());
    }

    #[test]
    fn released_guard_keeps_object() {
        let guard = ObjectGuard::new(3, record_delete);
        assert_eq!(guard.release(), 3);
        assert!(deleted().is_empty());
    }

    #[test]
    fn bind_is_skipped_only_for_the_current_program() {
        let first = NEXT_SERIAL.fetch_add(1, Ordering::Relaxed);
        let second = NEXT_SERIAL.fetch_add(1, Ordering::Relaxed);
        assert_ne!(first, second);

        assert!(mark_bound(first));
        assert!(!mark_bound(first));
        assert!(mark_bound(second));
        assert!(mark_bound(first));

        // a deleted program must not leave a stale binding behind
        forget_bound(first);
        assert!(mark_bound(first));

        forget_bound(second);
        assert!(!mark_bound(first));
    }

    #[test]
    fn nul_in_source_is_rejected() {
        let res = ProgramBuilder::new("void main() {}\0", "void main() {}");
        assert!(matches!(
            res,
            Err(ProgramError::InvalidSource(ShaderStage::Vertex))
        ));

        let res = ProgramBuilder::new("void main() {}", "\0");
        assert!(matches!(
            res,
            Err(ProgramError::InvalidSource(ShaderStage::Fragment))
        ));
    }

    #[test]
    fn compilation_error_names_stage() {
        let err = ProgramError::Compilation {
            stage: ShaderStage::Fragment,
            log: "0:3(1): error: syntax error".into(),
        };

        assert_eq!(
            err.to_string(),
            "failed to compile fragment shader: 0:3(1): error: syntax error"
        );
    }
}
