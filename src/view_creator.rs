use crate::{
    AttachmentDimension, ConstantBufferViewDesc, CpuDescriptorHandle, DepthStencilViewDesc,
    DescriptorDevice, Format, RenderTargetViewDesc, Resource, ResourceDimension, ResourceKind,
    Result, ShaderResourceViewDesc, SrvDimension, UavDimension, UnorderedAccessViewDesc, View,
    ViewHeapError,
};

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader.
    Vertex,
    /// Hull shader.
    Hull,
    /// Domain shader.
    Domain,
    /// Geometry shader.
    Geometry,
    /// Pixel shader.
    Pixel,
    /// Compute shader.
    Compute,
}

/// The resource type a shader declares for a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingDimension {
    /// A typed buffer.
    Buffer,
    /// A structured buffer.
    StructuredBuffer,
    /// A 1D texture.
    Texture1D,
    /// A 2D texture.
    Texture2D,
    /// An array of 2D textures.
    Texture2DArray,
    /// A multisampled 2D texture.
    Texture2DMs,
    /// A 3D texture.
    Texture3D,
    /// A cube texture.
    TextureCube,
}

/// A binding as reported by shader reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectedBinding {
    /// The register the binding occupies.
    pub slot: u32,
    /// The declared resource type.
    pub dimension: BindingDimension,
}

/// Looks up bindings by name in compiled shaders.
pub trait ShaderReflection {
    /// The binding called `name` in the shader of `stage`.
    fn find_binding(&self, stage: ShaderStage, name: &str) -> Option<ReflectedBinding>;
}

/// Writes concrete view descriptors into allocated views.
///
/// Formats and dimensions come from the resource description, refined by
/// shader reflection for shader resource and unordered access views.
/// Creating a view again at the same handle overwrites the descriptor.
///
/// Descriptors are written into the view's CPU-only slot and then copied into
/// its shader-visible slot, if it has one.
pub struct ViewCreator<'a, D: DescriptorDevice> {
    device: D,
    reflection: &'a dyn ShaderReflection,
}

impl<'a, D: DescriptorDevice> ViewCreator<'a, D> {
    /// Create a view creator that resolves binding names through `reflection`.
    pub fn new(device: D, reflection: &'a dyn ShaderReflection) -> Self {
        ViewCreator { device, reflection }
    }

    /// Write a `kind` view of `resource` into the first slot of `handle` and
    /// publish it to the shader-visible heap.
    ///
    /// ## Panics
    /// Panics if `handle` was not allocated for `kind`, or if `resource` was
    /// not created with the capability `kind` requires.
    pub fn create_view(
        &self,
        stage: ShaderStage,
        name: &str,
        kind: ResourceKind,
        slot: u32,
        resource: &Resource<D>,
        handle: &View,
    ) -> Result<()> {
        assert_eq!(
            handle.heap_type(),
            kind.heap_type(),
            "a {kind:?} view cannot be written into a {:?} heap",
            handle.heap_type()
        );
        if let Some(flag) = kind.bind_flag() {
            resource.require(flag);
        }

        let dst = handle.cpu_handle(0);
        tracing::trace!(?stage, name, ?kind, slot, resource = resource.name(), "creating view");

        let written = match kind {
            ResourceKind::Srv => self.create_srv(stage, name, slot, resource, dst),
            ResourceKind::Uav => self.create_uav(stage, name, slot, resource, dst),
            ResourceKind::Cbv => {
                self.create_cbv(resource, dst);
                Ok(())
            }
            ResourceKind::Sampler => {
                self.create_sampler(resource, dst);
                Ok(())
            }
            ResourceKind::Rtv => {
                self.create_rtv(resource, dst);
                Ok(())
            }
            ResourceKind::Dsv => {
                self.create_dsv(resource, dst);
                Ok(())
            }
        };
        written?;

        self.publish_range(handle, 0, 1);
        Ok(())
    }

    /// Copy every slot of `view` from its CPU-only heap into its shader-visible
    /// heap. Does nothing for views of heaps that are not shader-visible.
    ///
    /// Needed only for descriptors written directly through the device at
    /// [`View::cpu_handle`]; [`ViewCreator::create_view`] publishes its own.
    pub fn publish(&self, view: &View) {
        self.publish_range(view, 0, view.len());
    }

    fn publish_range(&self, view: &View, first: usize, count: usize) {
        let Some(visible) = view.visible_cpu_handle(first) else {
            return;
        };
        // SAFETY: both ranges lie within the view, whose heaps share its type,
        // and the source is the CPU-only staging heap.
        unsafe {
            self.device
                .copy_descriptors_simple(count, visible, view.cpu_handle(first), view.heap_type())
        };
    }

    fn reflect(&self, stage: ShaderStage, name: &str, slot: u32) -> Result<ReflectedBinding> {
        let binding = self
            .reflection
            .find_binding(stage, name)
            .ok_or_else(|| ViewHeapError::BindingNotFound {
                stage,
                name: name.to_owned(),
            })?;

        if binding.slot != slot {
            tracing::warn!(?stage, name, slot, reflected = binding.slot, "binding slot mismatch");
        }
        Ok(binding)
    }

    fn create_srv(
        &self,
        stage: ShaderStage,
        name: &str,
        slot: u32,
        resource: &Resource<D>,
        dst: CpuDescriptorHandle,
    ) -> Result<()> {
        let binding = self.reflect(stage, name, slot)?;
        let res_desc = resource.desc();
        let mip_levels = u32::from(res_desc.mip_levels);

        let desc = match binding.dimension {
            BindingDimension::Buffer | BindingDimension::StructuredBuffer => {
                let (format, first_element, num_elements, structure_byte_stride) =
                    buffer_elements(binding.dimension, resource);
                ShaderResourceViewDesc {
                    format,
                    dimension: SrvDimension::Buffer {
                        first_element,
                        num_elements,
                        structure_byte_stride,
                    },
                }
            }
            dimension => ShaderResourceViewDesc {
                format: res_desc.format.srv_format(),
                dimension: if res_desc.sample_count > 1 {
                    SrvDimension::Texture2DMs
                } else {
                    match dimension {
                        BindingDimension::Texture1D => SrvDimension::Texture1D { mip_levels },
                        BindingDimension::Texture2DArray => SrvDimension::Texture2DArray {
                            mip_levels,
                            array_size: res_desc.array_size(),
                        },
                        BindingDimension::Texture2DMs => SrvDimension::Texture2DMs,
                        BindingDimension::Texture3D => SrvDimension::Texture3D { mip_levels },
                        BindingDimension::TextureCube => SrvDimension::TextureCube { mip_levels },
                        _ => SrvDimension::Texture2D { mip_levels },
                    }
                },
            },
        };

        // SAFETY: `dst` comes from a view allocated in a resource heap.
        unsafe {
            self.device
                .create_shader_resource_view(resource.raw(), &desc, dst)
        };
        Ok(())
    }

    fn create_uav(
        &self,
        stage: ShaderStage,
        name: &str,
        slot: u32,
        resource: &Resource<D>,
        dst: CpuDescriptorHandle,
    ) -> Result<()> {
        let binding = self.reflect(stage, name, slot)?;
        let res_desc = resource.desc();

        let dimension = match binding.dimension {
            BindingDimension::Buffer | BindingDimension::StructuredBuffer => {
                let (format, first_element, num_elements, structure_byte_stride) =
                    buffer_elements(binding.dimension, resource);
                let desc = UnorderedAccessViewDesc {
                    format,
                    dimension: UavDimension::Buffer {
                        first_element,
                        num_elements,
                        structure_byte_stride,
                    },
                };
                // SAFETY: `dst` comes from a view allocated in a resource heap.
                unsafe {
                    self.device
                        .create_unordered_access_view(resource.raw(), &desc, dst)
                };
                return Ok(());
            }
            BindingDimension::Texture1D => UavDimension::Texture1D { mip_slice: 0 },
            BindingDimension::Texture2D => UavDimension::Texture2D { mip_slice: 0 },
            BindingDimension::Texture2DArray | BindingDimension::TextureCube => {
                UavDimension::Texture2DArray {
                    mip_slice: 0,
                    array_size: res_desc.array_size(),
                }
            }
            BindingDimension::Texture3D => UavDimension::Texture3D {
                mip_slice: 0,
                w_size: u32::from(res_desc.depth_or_array_size),
            },
            BindingDimension::Texture2DMs => {
                panic!("`{name}` is multisampled and cannot be bound for unordered access")
            }
        };

        let desc = UnorderedAccessViewDesc {
            format: res_desc.format.srv_format(),
            dimension,
        };
        // SAFETY: `dst` comes from a view allocated in a resource heap.
        unsafe {
            self.device
                .create_unordered_access_view(resource.raw(), &desc, dst)
        };
        Ok(())
    }

    fn create_cbv(&self, resource: &Resource<D>, dst: CpuDescriptorHandle) {
        let location = self.device.gpu_virtual_address(raw(resource));
        let size = u32::try_from(resource.buffer_size())
            .ok()
            .filter(|size| *size <= ConstantBufferViewDesc::MAX_SIZE)
            .unwrap_or_else(|| {
                panic!(
                    "constant buffer `{}` of {} bytes exceeds the {}-byte view limit",
                    resource.name(),
                    resource.buffer_size(),
                    ConstantBufferViewDesc::MAX_SIZE
                )
            });
        let desc = ConstantBufferViewDesc::new(location, size);

        // SAFETY: `dst` comes from a view allocated in a resource heap.
        unsafe { self.device.create_constant_buffer_view(&desc, dst) };
    }

    fn create_sampler(&self, resource: &Resource<D>, dst: CpuDescriptorHandle) {
        let Some(desc) = resource.sampler_desc() else {
            panic!("resource `{}` is not a sampler", resource.name())
        };

        // SAFETY: `dst` comes from a view allocated in a sampler heap.
        unsafe { self.device.create_sampler(desc, dst) };
    }

    fn create_rtv(&self, resource: &Resource<D>, dst: CpuDescriptorHandle) {
        let desc = RenderTargetViewDesc {
            format: resource.desc().format.srv_format(),
            dimension: attachment_dimension(resource),
        };

        // SAFETY: `dst` comes from a view allocated in a render target heap.
        unsafe {
            self.device
                .create_render_target_view(raw(resource), &desc, dst)
        };
    }

    fn create_dsv(&self, resource: &Resource<D>, dst: CpuDescriptorHandle) {
        let desc = DepthStencilViewDesc {
            format: resource.desc().format.dsv_format(),
            dimension: attachment_dimension(resource),
        };

        // SAFETY: `dst` comes from a view allocated in a depth stencil heap.
        unsafe {
            self.device
                .create_depth_stencil_view(raw(resource), &desc, dst)
        };
    }
}

fn raw<D: DescriptorDevice>(resource: &Resource<D>) -> &D::Resource {
    let Some(raw) = resource.raw() else {
        panic!("resource `{}` has no GPU memory", resource.name())
    };
    raw
}

/// Format, first element, element count and stride of a buffer view.
fn buffer_elements<D: DescriptorDevice>(
    dimension: BindingDimension,
    resource: &Resource<D>,
) -> (Format, u64, u32, u32) {
    let size = resource.buffer_size();
    if dimension == BindingDimension::StructuredBuffer {
        let stride = resource.stride();
        assert!(
            stride > 0,
            "structured buffer `{}` was created without a stride",
            resource.name()
        );
        (Format::Unknown, 0, (size / u64::from(stride)) as u32, stride)
    } else {
        let format = match resource.desc().format {
            Format::Unknown => Format::R32Uint,
            format => format,
        };
        let count = size / u64::from(format.bytes_per_texel());
        (format, 0, count as u32, 0)
    }
}

fn attachment_dimension<D: DescriptorDevice>(resource: &Resource<D>) -> AttachmentDimension {
    let desc = resource.desc();
    if desc.sample_count > 1 {
        AttachmentDimension::Texture2DMs
    } else if desc.dimension != ResourceDimension::Texture3D && desc.array_size() > 1 {
        AttachmentDimension::Texture2DArray {
            mip_slice: 0,
            array_size: desc.array_size(),
        }
    } else {
        AttachmentDimension::Texture2D { mip_slice: 0 }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::headless::{HeadlessDescriptor, HeadlessDevice};
    use crate::{
        BindFlag, BindFlags, DeletionQueue, ResourceDesc, SamplerDesc, ViewPool, ViewPoolConfig,
    };

    #[derive(Default)]
    struct Reflection(HashMap<(ShaderStage, String), ReflectedBinding>);

    impl Reflection {
        fn with(mut self, name: &'static str, slot: u32, dimension: BindingDimension) -> Self {
            self.0
                .insert((ShaderStage::Pixel, name.to_owned()), ReflectedBinding { slot, dimension });
            self
        }
    }

    impl ShaderReflection for Reflection {
        fn find_binding(&self, stage: ShaderStage, name: &str) -> Option<ReflectedBinding> {
            self.0.get(&(stage, name.to_owned())).copied()
        }
    }

    struct Fixture {
        device: HeadlessDevice,
        pool: ViewPool<HeadlessDevice>,
        reflection: Reflection,
    }

    fn fixture() -> Fixture {
        let device = HeadlessDevice::new();
        let pool = ViewPool::new(
            &device,
            Arc::new(DeletionQueue::new()),
            &ViewPoolConfig::default(),
        )
        .unwrap();
        let reflection = Reflection::default()
            .with("albedo", 0, BindingDimension::Texture2D)
            .with("shadow_map", 1, BindingDimension::Texture2D)
            .with("lights", 2, BindingDimension::StructuredBuffer)
            .with("output", 0, BindingDimension::Texture2D);
        Fixture {
            device,
            pool,
            reflection,
        }
    }

    fn flags(flags: &[BindFlag]) -> BindFlags {
        flags.iter().copied().collect()
    }

    #[test]
    fn texture_srv_uses_resource_format_and_mips() {
        let mut f = fixture();
        let creator = ViewCreator::new(f.device.clone(), &f.reflection);
        let raw = f.device.create_resource("albedo", 0);
        let albedo = Resource::texture(
            "albedo",
            raw.clone(),
            ResourceDesc::texture_2d(256, 256, Format::Rgba8UnormSrgb).with_mip_levels(9),
            flags(&[BindFlag::ShaderResource]),
        );

        let view = f.pool.allocate_descriptor(ResourceKind::Srv).unwrap();
        creator
            .create_view(ShaderStage::Pixel, "albedo", ResourceKind::Srv, 0, &albedo, &view)
            .unwrap();

        assert_eq!(
            f.device.read_descriptor(view.cpu_handle(0)),
            Some(HeadlessDescriptor::Srv {
                resource: Some(raw.id()),
                desc: ShaderResourceViewDesc {
                    format: Format::Rgba8UnormSrgb,
                    dimension: SrvDimension::Texture2D { mip_levels: 9 },
                },
            })
        );
    }

    #[test]
    fn depth_buffer_views_remap_typeless_formats() {
        let mut f = fixture();
        let creator = ViewCreator::new(f.device.clone(), &f.reflection);
        let depth = Resource::texture(
            "depth",
            f.device.create_resource("depth", 0),
            ResourceDesc::texture_2d(1024, 1024, Format::R32Typeless),
            flags(&[BindFlag::ShaderResource, BindFlag::DepthStencil]),
        );

        let dsv = f.pool.allocate_descriptor(ResourceKind::Dsv).unwrap();
        let srv = f.pool.allocate_descriptor(ResourceKind::Srv).unwrap();
        creator
            .create_view(ShaderStage::Pixel, "", ResourceKind::Dsv, 0, &depth, &dsv)
            .unwrap();
        creator
            .create_view(ShaderStage::Pixel, "shadow_map", ResourceKind::Srv, 1, &depth, &srv)
            .unwrap();

        match f.device.read_descriptor(dsv.cpu_handle(0)) {
            Some(HeadlessDescriptor::Dsv { desc, .. }) => {
                assert_eq!(desc.format, Format::D32Float);
                assert_eq!(desc.dimension, AttachmentDimension::Texture2D { mip_slice: 0 });
            }
            other => panic!("unexpected descriptor {other:?}"),
        }
        match f.device.read_descriptor(srv.cpu_handle(0)) {
            Some(HeadlessDescriptor::Srv { desc, .. }) => assert_eq!(desc.format, Format::R32Float),
            other => panic!("unexpected descriptor {other:?}"),
        }
    }

    #[test]
    fn structured_buffer_srv_counts_elements() {
        let mut f = fixture();
        let creator = ViewCreator::new(f.device.clone(), &f.reflection);
        let lights = Resource::buffer(
            "lights",
            f.device.create_resource("lights", 1024),
            1024,
            32,
            flags(&[BindFlag::ShaderResource]),
        );

        let view = f.pool.allocate_descriptor(ResourceKind::Srv).unwrap();
        creator
            .create_view(ShaderStage::Pixel, "lights", ResourceKind::Srv, 2, &lights, &view)
            .unwrap();

        match f.device.read_descriptor(view.cpu_handle(0)) {
            Some(HeadlessDescriptor::Srv { desc, .. }) => assert_eq!(
                desc,
                ShaderResourceViewDesc {
                    format: Format::Unknown,
                    dimension: SrvDimension::Buffer {
                        first_element: 0,
                        num_elements: 32,
                        structure_byte_stride: 32,
                    },
                }
            ),
            other => panic!("unexpected descriptor {other:?}"),
        }
    }

    #[test]
    fn constant_buffer_view_is_aligned() {
        let mut f = fixture();
        let creator = ViewCreator::new(f.device.clone(), &f.reflection);
        let raw = f.device.create_resource("constants", 100);
        let constants = Resource::buffer(
            "constants",
            raw.clone(),
            100,
            0,
            flags(&[BindFlag::ConstantBuffer]),
        );

        let view = f.pool.allocate_descriptor(ResourceKind::Cbv).unwrap();
        creator
            .create_view(ShaderStage::Vertex, "", ResourceKind::Cbv, 0, &constants, &view)
            .unwrap();

        assert_eq!(
            f.device.read_descriptor(view.cpu_handle(0)),
            Some(HeadlessDescriptor::Cbv(ConstantBufferViewDesc {
                buffer_location: f.device.gpu_virtual_address(&raw),
                size_in_bytes: 256,
            }))
        );
    }

    #[test]
    #[should_panic(expected = "exceeds the 65536-byte view limit")]
    fn oversized_constant_buffers_are_rejected() {
        let mut f = fixture();
        let creator = ViewCreator::new(f.device.clone(), &f.reflection);
        let size = u64::from(u32::MAX) - 10;
        let constants = Resource::buffer(
            "huge",
            f.device.create_resource("huge", size),
            size,
            0,
            flags(&[BindFlag::ConstantBuffer]),
        );

        let view = f.pool.allocate_descriptor(ResourceKind::Cbv).unwrap();
        let _ = creator.create_view(ShaderStage::Vertex, "", ResourceKind::Cbv, 0, &constants, &view);
    }

    #[test]
    fn samplers_and_render_targets() {
        let mut f = fixture();
        let creator = ViewCreator::new(f.device.clone(), &f.reflection);
        let sampler_desc = SamplerDesc {
            max_anisotropy: 8,
            ..SamplerDesc::default()
        };
        let sampler = Resource::sampler("aniso", sampler_desc);
        let target = Resource::texture(
            "hdr",
            f.device.create_resource("hdr", 0),
            ResourceDesc::texture_2d(800, 600, Format::Rgba16Float).with_sample_count(4),
            flags(&[BindFlag::RenderTarget]),
        );

        let s = f.pool.allocate_descriptor(ResourceKind::Sampler).unwrap();
        let rtv = f.pool.allocate_descriptor(ResourceKind::Rtv).unwrap();
        creator
            .create_view(ShaderStage::Pixel, "", ResourceKind::Sampler, 0, &sampler, &s)
            .unwrap();
        creator
            .create_view(ShaderStage::Pixel, "", ResourceKind::Rtv, 0, &target, &rtv)
            .unwrap();

        assert_eq!(
            f.device.read_descriptor(s.cpu_handle(0)),
            Some(HeadlessDescriptor::Sampler(sampler_desc))
        );
        match f.device.read_descriptor(rtv.cpu_handle(0)) {
            Some(HeadlessDescriptor::Rtv { desc, .. }) => assert_eq!(
                desc,
                RenderTargetViewDesc {
                    format: Format::Rgba16Float,
                    dimension: AttachmentDimension::Texture2DMs,
                }
            ),
            other => panic!("unexpected descriptor {other:?}"),
        }
    }

    #[test]
    fn recreating_a_view_overwrites_it() {
        let mut f = fixture();
        let creator = ViewCreator::new(f.device.clone(), &f.reflection);
        let output = Resource::texture(
            "output",
            f.device.create_resource("output", 0),
            ResourceDesc::texture_2d(64, 64, Format::Rgba32Float),
            flags(&[BindFlag::UnorderedAccess]),
        );

        let view = f.pool.allocate_descriptor(ResourceKind::Uav).unwrap();
        for _ in 0..2 {
            creator
                .create_view(ShaderStage::Pixel, "output", ResourceKind::Uav, 0, &output, &view)
                .unwrap();
        }

        match f.device.read_descriptor(view.cpu_handle(0)) {
            Some(HeadlessDescriptor::Uav { desc, .. }) => {
                assert_eq!(desc.dimension, UavDimension::Texture2D { mip_slice: 0 })
            }
            other => panic!("unexpected descriptor {other:?}"),
        }
        assert_eq!(f.pool.allocator(ResourceKind::Uav).allocated(), 1);
    }

    #[test]
    fn created_views_are_published_to_the_shader_visible_heap() {
        let mut f = fixture();
        let creator = ViewCreator::new(f.device.clone(), &f.reflection);
        let albedo = Resource::texture(
            "albedo",
            f.device.create_resource("albedo", 0),
            ResourceDesc::texture_2d(16, 16, Format::Rgba8Unorm),
            flags(&[BindFlag::ShaderResource]),
        );

        let view = f.pool.allocate(ResourceKind::Srv, 2).unwrap();
        creator
            .create_view(ShaderStage::Pixel, "albedo", ResourceKind::Srv, 0, &albedo, &view)
            .unwrap();

        let visible = view.visible_cpu_handle(0).unwrap();
        assert!(f.device.read_descriptor(visible).is_some());
        assert_eq!(
            f.device.read_descriptor(visible),
            f.device.read_descriptor(view.cpu_handle(0))
        );
        assert_eq!(f.device.read_descriptor(view.visible_cpu_handle(1).unwrap()), None);

        let constants = ConstantBufferViewDesc::new(0x1_0000, 16);
        unsafe { f.device.create_constant_buffer_view(&constants, view.cpu_handle(1)) };
        creator.publish(&view);
        assert_eq!(
            f.device.read_descriptor(view.visible_cpu_handle(1).unwrap()),
            Some(HeadlessDescriptor::Cbv(constants))
        );
    }

    #[test]
    fn unknown_binding_is_reported() {
        let mut f = fixture();
        let creator = ViewCreator::new(f.device.clone(), &f.reflection);
        let texture = Resource::texture(
            "normal",
            f.device.create_resource("normal", 0),
            ResourceDesc::texture_2d(4, 4, Format::Rgba8Unorm),
            flags(&[BindFlag::ShaderResource]),
        );

        let view = f.pool.allocate_descriptor(ResourceKind::Srv).unwrap();
        let err = creator
            .create_view(ShaderStage::Pixel, "normal", ResourceKind::Srv, 3, &texture, &view)
            .unwrap_err();
        assert!(matches!(
            err,
            ViewHeapError::BindingNotFound {
                stage: ShaderStage::Pixel,
                ..
            }
        ));
    }

    #[test]
    #[should_panic(expected = "cannot be bound as RenderTarget")]
    fn render_target_binding_requires_the_capability() {
        let mut f = fixture();
        let creator = ViewCreator::new(f.device.clone(), &f.reflection);
        let texture = Resource::texture(
            "albedo",
            f.device.create_resource("albedo", 0),
            ResourceDesc::texture_2d(4, 4, Format::Rgba8Unorm),
            flags(&[BindFlag::ShaderResource]),
        );

        let view = f.pool.allocate_descriptor(ResourceKind::Rtv).unwrap();
        let _ = creator.create_view(ShaderStage::Pixel, "", ResourceKind::Rtv, 0, &texture, &view);
    }

    #[test]
    #[should_panic(expected = "cannot be written into a Rtv heap")]
    fn handle_must_match_the_view_kind() {
        let mut f = fixture();
        let creator = ViewCreator::new(f.device.clone(), &f.reflection);
        let texture = Resource::texture(
            "albedo",
            f.device.create_resource("albedo", 0),
            ResourceDesc::texture_2d(4, 4, Format::Rgba8Unorm),
            flags(&[BindFlag::ShaderResource]),
        );

        let view = f.pool.allocate_descriptor(ResourceKind::Rtv).unwrap();
        let _ = creator.create_view(ShaderStage::Pixel, "albedo", ResourceKind::Srv, 0, &texture, &view);
    }
}
