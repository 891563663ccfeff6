use std::sync::Arc;

use anyhow::Context;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    config::AppConfig,
    rendering::{
        imgui_renderer::ImguiRendererState,
        mesh::{Mesh, RenderMesh},
        scene_pass::{ScenePass, ScenePassTextureViews},
        texture::{DepthTexture, Texture},
    },
    scene::{Frame, MeshKind, TextureKind},
};

/// GPU side of the scene. Everything the scene needs (truck model,
/// procedural meshes, textures) is uploaded in [`Renderer::new`] and freed
/// when the renderer is dropped.
pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,

    depth_texture: DepthTexture,
    scene_pass: ScenePass,
    imgui_renderer: ImguiRendererState,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        config: &AppConfig,
        imgui_context: &mut imgui::Context,
    ) -> anyhow::Result<Renderer> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable graphics adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no formats")?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let textures = load_textures(&device, &queue, config)?;
        let mut scene_pass = ScenePass::create(&device, &queue, surface_format, textures);

        let truck_path = config.truck_model_path();
        let truck = Mesh::from_gltf(&truck_path)?;
        log::info!(
            "Loaded {} ({} vertices, {} triangles)",
            truck_path.display(),
            truck.vertices.len(),
            truck.indices.len() / 3
        );
        scene_pass.add_mesh(MeshKind::Truck, RenderMesh::from_mesh(&device, &truck));

        for kind in MeshKind::PROCEDURAL {
            if let Some(mesh) = Mesh::procedural(kind) {
                scene_pass.add_mesh(kind, RenderMesh::from_mesh(&device, &mesh));
            }
        }

        let depth_texture = DepthTexture::new(&device, size);
        let imgui_renderer =
            ImguiRendererState::new(&device, &queue, surface_format, imgui_context);

        Ok(Self {
            window,
            size,
            surface,
            device,
            queue,
            surface_config,
            depth_texture,
            scene_pass,
            imgui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.device, &self.surface_config);
            self.depth_texture = DepthTexture::new(&self.device, new_size);
        }
    }

    pub fn render(
        &mut self,
        frame: &Frame,
        imgui_context: &mut imgui::Context,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.scene_pass.render(
            &self.device,
            &self.queue,
            frame,
            &ScenePassTextureViews {
                color: &view,
                depth: self.depth_texture.view(),
            },
            &mut encoder,
        );

        if let Err(err) = self.imgui_renderer.render(
            &view,
            imgui_context,
            &self.device,
            &self.queue,
            &mut encoder,
        ) {
            log::error!("{:#}", err);
        }

        self.queue.submit([encoder.finish()]);
        output.present();

        Ok(())
    }
}

fn load_textures(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    config: &AppConfig,
) -> anyhow::Result<[Texture; TextureKind::COUNT]> {
    let [asphalt, brick, grass] = TextureKind::ALL.map(|kind| config.texture_path(kind));

    let textures = [
        Texture::load(device, queue, &asphalt)?,
        Texture::load(device, queue, &brick)?,
        Texture::load(device, queue, &grass)?,
    ];
    log::info!("Loaded {} textures", textures.len());

    Ok(textures)
}
