use std::{sync::Arc, time::Instant};

use anyhow::Context;
use glam::UVec2;
use imgui::{FontConfig, FontSource};
use imgui_winit_support::WinitPlatform;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, Event, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    config::AppConfig,
    controls::{HostControls, KeyOutcome},
    hud,
    rendering::renderer::Renderer,
    scene::{layout::build_frame, AnimationPlayer, TransformParameters},
    toolbar::{Field, Toolbar},
};

struct ImguiState {
    context: imgui::Context,
    platform: WinitPlatform,
}

struct App {
    config: AppConfig,
    renderer: Option<Renderer>,
    imgui: Option<ImguiState>,
    player: AnimationPlayer,
    controls: HostControls,
    toolbar: Toolbar,
    last_frame: Instant,
    startup_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let params = TransformParameters::default();

        Self {
            renderer: None,
            imgui: None,
            player: AnimationPlayer::new(params, config.tick_interval()),
            controls: HostControls::new(config.animation_length()),
            toolbar: Toolbar::from_params(&params),
            last_frame: Instant::now(),
            startup_error: None,
            config,
        }
    }

    fn setup_imgui(&mut self, window: &Window) -> &mut ImguiState {
        let mut context = imgui::Context::create();
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(
            context.io_mut(),
            window,
            imgui_winit_support::HiDpiMode::Default,
        );

        let font_size = 14.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        // Disable INI support because it's broken in the published version of imgui
        context.set_ini_filename(None);

        self.imgui.insert(ImguiState { context, platform })
    }

    fn create_renderer(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Truck & loading ramp")
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("Failed to create window")?,
        );

        let size = window.inner_size();
        let scale_factor = window.scale_factor() as f32;
        self.player.update_params(|params| {
            params.viewport = UVec2::new(size.width, size.height);
            params.scale_factor = scale_factor;
        });

        let config = self.config.clone();
        let imgui = self.setup_imgui(&window);
        let renderer = pollster::block_on(Renderer::new(
            window.clone(),
            &config,
            &mut imgui.context,
        ))
        .context("Failed to set up the scene")?;

        window.request_redraw();
        self.renderer = Some(renderer);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(renderer), Some(imgui)) = (self.renderer.as_mut(), self.imgui.as_mut()) else {
            return;
        };

        let now = Instant::now();
        imgui
            .context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(err) = imgui
            .platform
            .prepare_frame(imgui.context.io_mut(), &renderer.window)
        {
            log::warn!("Failed to prepare Imgui frame: {}", err);
        }

        let frame = build_frame(&self.player.snapshot());
        let animating = self.controls.animation_active();

        let ui = imgui.context.new_frame();
        if !animating {
            self.toolbar.draw(ui, &self.player);
        }
        hud::draw(ui, &frame.overlay, animating);
        imgui.platform.prepare_render(ui, &renderer.window);

        match renderer.render(&frame, &mut imgui.context) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.resize(renderer.size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory");
                event_loop.exit();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timeout");
            }
            Err(other) => {
                log::error!("Unexpected error: {:?}", other);
            }
        }

        renderer.window.request_redraw();
    }

    /// Stops the animation once its session has run out. Runs on every event
    /// loop iteration so it does not depend on redraws arriving.
    fn end_session_if_due(&mut self, event_loop: &ActiveEventLoop) {
        if self.controls.update(&mut self.player, Instant::now()) {
            log::info!("Animation session over, controls unlocked");
        }

        match self.controls.session_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn key_pressed(&mut self, event_loop: &ActiveEventLoop, key: &winit::keyboard::Key) {
        let was_animating = self.controls.animation_active();

        match self
            .controls
            .handle_key(key, &mut self.player, Instant::now())
        {
            Ok(KeyOutcome::Quit) => event_loop.exit(),
            Ok(KeyOutcome::Handled) if !was_animating && self.controls.animation_active() => {
                self.toolbar.set_text(Field::TruckScale, "1", &self.player);
            }
            Ok(_) => {}
            Err(err) => log::error!("{:#}", err),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        if let Err(err) = self.create_renderer(event_loop) {
            log::error!("{:#}", err);
            self.startup_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(*new_size);
                }
                let size = *new_size;
                self.player
                    .update_params(|params| params.viewport = UVec2::new(size.width, size.height));
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let scale_factor = *scale_factor as f32;
                self.player
                    .update_params(|params| params.scale_factor = scale_factor);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } if key_event.state == ElementState::Pressed => {
                let typing = self
                    .imgui
                    .as_ref()
                    .is_some_and(|imgui| imgui.context.io().want_text_input);
                if !typing {
                    self.key_pressed(event_loop, &key_event.logical_key);
                }
            }
            _ => (),
        }

        if let (Some(renderer), Some(imgui)) = (self.renderer.as_ref(), self.imgui.as_mut()) {
            imgui.platform.handle_event::<()>(
                imgui.context.io_mut(),
                &renderer.window,
                &Event::WindowEvent { window_id, event },
            );
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.end_session_if_due(event_loop);
    }
}

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
