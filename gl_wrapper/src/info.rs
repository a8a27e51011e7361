use std::ffi::CStr;
use std::fmt::{Display, Formatter};

use gl::types::GLenum;

/// Driver identification strings of the current context.
#[derive(Debug, Clone)]
pub struct ContextInfo {
    pub version: String,
    pub vendor: String,
    pub renderer: String,
    pub shading_language: String,
}

impl ContextInfo {
    /// Queries the current context. GL symbols must be loaded.
    pub fn query() -> Self {
        Self {
            version: get_string(gl::VERSION),
            vendor: get_string(gl::VENDOR),
            renderer: get_string(gl::RENDERER),
            shading_language: get_string(gl::SHADING_LANGUAGE_VERSION),
        }
    }
}

impl Display for ContextInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "OpenGL {} ({} {}), GLSL {}",
            self.version, self.vendor, self.renderer, self.shading_language
        )
    }
}

fn get_string(name: GLenum) -> String {
    unsafe {
        let ptr = gl::GetString(name);
        if ptr.is_null() {
            return String::from("unknown");
        }

        CStr::from_ptr(ptr as *const _).to_string_lossy().into_owned()
    }
}
