use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use wgpu::{
    vertex_attr_array, BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingType, Buffer, BufferBindingType, BufferUsages, ColorTargetState,
    ColorWrites, CommandEncoderDescriptor, CompositeAlphaMode, DeviceDescriptor, FragmentState,
    Instance, LoadOp, MultisampleState, Operations, PipelineLayoutDescriptor, PresentMode,
    PrimitiveState, RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline,
    RenderPipelineDescriptor, RequestAdapterOptions, ShaderModuleDescriptor, ShaderSource,
    SurfaceConfiguration, TextureFormat, TextureUsages, TextureView, TextureViewDescriptor,
    VertexState,
};
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    math::{letterbox, screen_projection, Color, Rect},
    render::{
        debug_font,
        error::RenderError,
        surface::{CommandList, DrawCommand, Surface},
    },
};

/// How many times a lost or outdated surface is reconfigured before the frame is skipped.
const SURFACE_RETRIES: u32 = 3;

/// What to do after failing to acquire a surface texture.
#[derive(Debug)]
enum AcquireAction {
    Reconfigure,
    Skip,
    Fail(RenderError),
}

fn classify_surface_error(err: wgpu::SurfaceError) -> AcquireAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => AcquireAction::Reconfigure,
        wgpu::SurfaceError::Timeout => AcquireAction::Skip,
        wgpu::SurfaceError::OutOfMemory => AcquireAction::Fail(RenderError::OutOfMemory),
        other => AcquireAction::Fail(RenderError::Surface(other)),
    }
}

/// Wrapper around wgpu surface/device setup and simple frame management.
pub struct Renderer<'window> {
    backend: WgpuBackend<'window>,
}

impl<'window> Renderer<'window> {
    pub fn new(window: &'window Window, vsync: bool) -> Result<Self> {
        let backend = WgpuBackend::new(window, vsync)?;
        Ok(Self { backend })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.backend.resize(new_size);
    }

    /// Acquire the next surface texture. `None` means the frame should be skipped.
    pub fn begin_frame(&mut self) -> Result<Option<Frame>> {
        Ok(self.backend.begin_frame()?)
    }

    /// Draw everything recorded on `frame` into a letterboxed canvas of `logical_size`
    /// and present it.
    pub fn end_frame(&mut self, frame: Frame, logical_size: (u32, u32)) -> Result<()> {
        Ok(self.backend.end_frame(frame, logical_size)?)
    }

    /// Current surface size in physical pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        self.backend.surface_size()
    }
}

/// A frame in flight. Draw calls are recorded and replayed by [`Renderer::end_frame`].
///
/// The surface texture is presented when the frame is dropped.
pub struct Frame {
    surface_texture: Option<wgpu::SurfaceTexture>,
    view: TextureView,
    commands: CommandList,
}

impl Surface for Frame {
    fn fill(&mut self, color: Color) {
        self.commands.fill(color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.fill_rect(rect, color);
    }

    fn debug_print(&mut self, text: &str) {
        self.commands.debug_print(text);
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        if let Some(surface_texture) = self.surface_texture.take() {
            surface_texture.present();
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
struct QuadVertex {
    position: [f32; 2],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Globals {
    projection: [[f32; 4]; 4],
}

struct QuadPipeline {
    pipeline: RenderPipeline,
    uniform_buffer: Buffer,
    bind_group: BindGroup,
}

struct WgpuBackend<'window> {
    surface: wgpu::Surface<'window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: SurfaceConfiguration,
    present_mode: PresentMode,
    /// Set while the window has a zero-sized client area.
    minimized: bool,
    quad_pipeline: QuadPipeline,
}

impl<'window> WgpuBackend<'window> {
    fn new(window: &'window Window, vsync: bool) -> Result<Self, RenderError> {
        let instance = Instance::default();
        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))?;
        log::debug!("using adapter {:?}", adapter.get_info());

        let (device, queue) = pollster::block_on(adapter.request_device(&DeviceDescriptor {
            label: Some("arcade2d-device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: Default::default(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
        }))?;

        let size = window.inner_size();
        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .unwrap_or(capabilities.formats[0]);

        let present_mode = choose_present_mode(&capabilities.present_modes, vsync);
        let alpha_mode = choose_alpha_mode(&capabilities.alpha_modes);
        log::debug!("surface format {format:?}, present mode {present_mode:?}");

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let quad_pipeline = create_quad_pipeline(&device, format);

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            present_mode,
            minimized: false,
            quad_pipeline,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.minimized = new_size.width == 0 || new_size.height == 0;
        if self.minimized {
            return;
        }

        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface_config.present_mode = self.present_mode;
        self.surface.configure(&self.device, &self.surface_config);
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    fn begin_frame(&mut self) -> Result<Option<Frame>, RenderError> {
        if self.minimized {
            return Ok(None);
        }

        for _ in 0..SURFACE_RETRIES {
            let err = match self.surface.get_current_texture() {
                Ok(surface_texture) => {
                    let view = surface_texture
                        .texture
                        .create_view(&TextureViewDescriptor::default());
                    return Ok(Some(Frame {
                        surface_texture: Some(surface_texture),
                        view,
                        commands: CommandList::new(),
                    }));
                }
                Err(err) => err,
            };

            match classify_surface_error(err) {
                AcquireAction::Reconfigure => {
                    self.surface.configure(&self.device, &self.surface_config);
                }
                AcquireAction::Skip => {
                    log::warn!("timed out acquiring surface texture, skipping frame");
                    return Ok(None);
                }
                AcquireAction::Fail(err) => return Err(err),
            }
        }

        log::warn!("surface still unusable after {SURFACE_RETRIES} reconfigures, skipping frame");
        Ok(None)
    }

    fn end_frame(&mut self, frame: Frame, logical_size: (u32, u32)) -> Result<(), RenderError> {
        let (fill, visible) = frame.commands.visible();
        let vertices = build_vertices(fill, visible, logical_size);

        let globals = Globals {
            projection: screen_projection(logical_size.0, logical_size.1).to_cols_array_2d(),
        };
        self.queue.write_buffer(
            &self.quad_pipeline.uniform_buffer,
            0,
            bytemuck::bytes_of(&globals),
        );

        let vertex_buffer = (!vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("quad-vertices"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: BufferUsages::VERTEX,
                })
        });

        let viewport = letterbox(self.surface_size(), logical_size);
        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("quad-pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: Operations {
                        // Letterbox bars stay black; fills only cover the canvas.
                        load: LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                multiview_mask: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(buffer) = &vertex_buffer {
                pass.set_viewport(
                    viewport.x,
                    viewport.y,
                    viewport.width,
                    viewport.height,
                    0.0,
                    1.0,
                );
                pass.set_pipeline(&self.quad_pipeline.pipeline);
                pass.set_bind_group(0, &self.quad_pipeline.bind_group, &[]);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..vertices.len() as u32, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        drop(frame);
        Ok(())
    }
}

/// Expand draw commands into a triangle list, six vertices per rectangle.
///
/// A background `fill` becomes a quad over the whole logical canvas.
fn build_vertices(
    fill: Option<Color>,
    commands: &[DrawCommand],
    logical_size: (u32, u32),
) -> Vec<QuadVertex> {
    let mut vertices = Vec::new();
    if let Some(color) = fill {
        let canvas = Rect::new(0.0, 0.0, logical_size.0 as f32, logical_size.1 as f32);
        push_rect(&mut vertices, &canvas, color);
    }
    for command in commands {
        match command {
            DrawCommand::Rect { rect, color } => push_rect(&mut vertices, rect, *color),
            DrawCommand::Text { text, origin } => {
                for rect in debug_font::text_rects(text, *origin) {
                    push_rect(&mut vertices, &rect, Color::WHITE);
                }
            }
            // Only the last fill survives CommandList::visible.
            DrawCommand::Fill(_) => {}
        }
    }
    vertices
}

fn push_rect(vertices: &mut Vec<QuadVertex>, rect: &Rect, color: Color) {
    let color = color.to_array();
    let (l, r, t, b) = (rect.left(), rect.right(), rect.top(), rect.bottom());
    let corner = |x: f32, y: f32| QuadVertex {
        position: [x, y],
        color,
    };
    vertices.extend_from_slice(&[
        corner(l, t),
        corner(r, t),
        corner(r, b),
        corner(l, t),
        corner(r, b),
        corner(l, b),
    ]);
}

fn choose_present_mode(modes: &[PresentMode], vsync: bool) -> PresentMode {
    if vsync {
        modes
            .iter()
            .copied()
            .find(|mode| matches!(mode, PresentMode::Fifo | PresentMode::FifoRelaxed))
            .unwrap_or(PresentMode::Fifo)
    } else {
        modes
            .iter()
            .copied()
            .find(|mode| matches!(mode, PresentMode::Immediate | PresentMode::Mailbox))
            .unwrap_or(PresentMode::Fifo)
    }
}

fn choose_alpha_mode(modes: &[CompositeAlphaMode]) -> CompositeAlphaMode {
    modes
        .iter()
        .copied()
        .find(|mode| matches!(mode, CompositeAlphaMode::Auto))
        .unwrap_or_else(|| modes.first().copied().unwrap_or(CompositeAlphaMode::Opaque))
}

fn create_quad_pipeline(device: &wgpu::Device, surface_format: TextureFormat) -> QuadPipeline {
    let shader = device.create_shader_module(ShaderModuleDescriptor {
        label: Some("quad-shader"),
        source: ShaderSource::Wgsl(include_str!("quad.wgsl").into()),
    });

    let globals_size = std::mem::size_of::<Globals>() as u64;

    let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("quad-bind-group-layout"),
        entries: &[BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: std::num::NonZeroU64::new(globals_size),
            },
            count: None,
        }],
    });

    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("quad-uniform-buffer"),
        size: globals_size,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&BindGroupDescriptor {
        label: Some("quad-bind-group"),
        layout: &bind_group_layout,
        entries: &[BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });

    let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some("quad-pipeline-layout"),
        bind_group_layouts: &[&bind_group_layout],
        immediate_size: 0,
    });

    let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some("quad-pipeline"),
        layout: Some(&pipeline_layout),
        vertex: VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &vertex_attr_array![0 => Float32x2, 1 => Float32x4],
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None,
        multisample: MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    QuadPipeline {
        pipeline,
        uniform_buffer,
        bind_group,
    }
}
