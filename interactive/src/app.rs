use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

use gl_wrapper::geometry::GBError;
use gl_wrapper::info::ContextInfo;
use gl_wrapper::program::ProgramError;
use gl_wrapper::GlError;

use glquad_common::config::Settings;
use glquad_common::shader_source::ShaderSourceError;

use crate::demo::Demo;

pub struct App {
    event_loop: EventLoop<()>,
    demo: Demo,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
}

impl App {
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(
                settings.width,
                settings.height,
            )))
            .with_title(&settings.title);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new();

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |mut configs| {
                // glutin fails `find_configs` with `BadConfig` before calling the
                // picker when nothing matches, so the set is never empty here
                configs.next().expect("display offers no GL configs")
            })
            .map_err(|e| AppError::Window(e.to_string()))?;

        let window = window.ok_or_else(|| AppError::Window("no window was created".into()))?;

        let handle = Some(window.raw_window_handle());
        let gl_display = gl_config.display();

        let (major, minor) = settings.gl_version;
        let context_attr = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(handle);

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
            .make_current(&gl_window.surface)?;

        if settings.vsync {
            let interval = NonZeroU32::new(1)
                .map(SwapInterval::Wait)
                .unwrap_or(SwapInterval::DontWait);

            if let Err(e) = gl_window.surface.set_swap_interval(&gl_context, interval) {
                log::warn!("Could not enable vsync: {e}");
            }
        }

        gl::load_with(|s| match CString::new(s) {
            Ok(name) => gl_display.get_proc_address(name.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        log::info!("{}", ContextInfo::query());

        let demo = Demo::new(&settings)?;

        Ok(Self {
            event_loop,
            demo,
            gl_context,
            gl_window,
        })
    }

    pub fn run(self) -> ! {
        let Self {
            event_loop,
            demo,
            gl_context,
            gl_window,
        } = self;

        let mut demo = Some(demo);
        let mut frames: u64 = 0;

        event_loop.run(move |event, _window_target, control_flow| {
            control_flow.set_poll();

            match event {
                Event::MainEventsCleared => gl_window.window.request_redraw(),
                Event::RedrawRequested(_) => {
                    let Some(demo) = &mut demo else {
                        return;
                    };

                    if let Err(e) = demo.frame() {
                        log::error!("Frame {frames} failed: {e}");
                        control_flow.set_exit_with_code(1);
                        return;
                    }

                    if let Err(e) = gl_window.surface.swap_buffers(&gl_context) {
                        log::error!("Could not present frame {frames}: {e}");
                        control_flow.set_exit_with_code(1);
                        return;
                    }

                    frames += 1;
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::Resized(size) => {
                        if let (Some(width), Some(height)) =
                            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                        {
                            gl_window.surface.resize(&gl_context, width, height);

                            if let Some(demo) = &demo {
                                if let Err(e) = demo.resize(size.width, size.height) {
                                    log::warn!("Could not resize viewport: {e}");
                                }
                            }
                        }
                    }
                    WindowEvent::CloseRequested => {
                        log::debug!("Close requested");
                        control_flow.set_exit();
                    }
                    _ => (),
                },
                Event::LoopDestroyed => {
                    // GL objects go while the context is still current
                    drop(demo.take());
                    log::info!("Rendered {frames} frames, shutting down");
                }
                _ => (),
            }
        })
    }
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let (width, height) = match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(w), Some(h)) => (w, h),
            _ => return Err(AppError::Window(format!("window size {width}x{height}"))),
        };

        let raw_window_handle = window.raw_window_handle();
        let attrs =
            SurfaceAttributesBuilder::<WindowSurface>::new().build(raw_window_handle, width, height);

        let surface = unsafe {
            config
                .display()
                .create_window_surface(config, &attrs)?
        };

        Ok(Self { window, surface })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not create window: {0}")]
    Window(String),
    #[error(transparent)]
    Context(#[from] glutin::error::Error),
    #[error(transparent)]
    ShaderSource(#[from] ShaderSourceError),
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error(transparent)]
    Geometry(#[from] GBError),
    #[error(transparent)]
    Gl(#[from] GlError),
}
