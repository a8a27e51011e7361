use gl::types::GLenum;
use thiserror::Error;

/// Wraps a GL call with error checking.
///
/// Pending errors are drained before the call, so anything reported afterwards
/// belongs to `$call`. Evaluates to `Result<T, GlError>` where `T` is the type of
/// the wrapped expression. Must be used inside an `unsafe` block when the wrapped
/// call is unsafe.
#[macro_export]
macro_rules! gl_call {
    ($call:expr) => {{
        $crate::debug::clear_errors();
        let result = $call;
        $crate::debug::check_errors(stringify!($call), file!(), line!()).map(|_| result)
    }};
}

pub fn clear_errors() {
    unsafe { while gl::GetError() != gl::NO_ERROR {} }
}

/// Drains the GL error queue, logging every entry and returning the first one.
pub fn check_errors(call: &'static str, file: &'static str, line: u32) -> Result<(), GlError> {
    let mut first = None;

    loop {
        let code = unsafe { gl::GetError() };
        if code == gl::NO_ERROR {
            break;
        }

        log::error!(
            "[OpenGL Error] {code:#06x} ({}): {call} {file}:{line}",
            error_name(code)
        );

        if first.is_none() {
            first = Some(code);
        }
    }

    match first {
        Some(code) => Err(GlError::Call {
            code,
            name: error_name(code),
            call,
            location: format!("{file}:{line}"),
        }),
        None => Ok(()),
    }
}

pub fn error_name(code: GLenum) -> &'static str {
    match code {
        gl::NO_ERROR => "GL_NO_ERROR",
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        _ => "unknown error",
    }
}

#[derive(Debug, Error)]
pub enum GlError {
    #[error("{name} ({code:#06x}) in `{call}` at {location}")]
    Call {
        code: GLenum,
        name: &'static str,
        call: &'static str,
        location: String,
    },
}
