use std::marker::PhantomData;
use std::mem::ManuallyDrop;

use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;

use crate::desc::{
    AddressMode, AttachmentDimension, ComparisonFunc, ConstantBufferViewDesc,
    DepthStencilViewDesc, Filter, Format, RenderTargetViewDesc, SamplerDesc,
    ShaderResourceViewDesc, SrvDimension, UavDimension, UnorderedAccessViewDesc,
};
use crate::{
    CpuDescriptorHandle, DescriptorDevice, GpuDescriptorHandle, HeapDesc, HeapType,
    RawDescriptorHeap, ResourceState, Result, Transition, ViewHeapError,
};

/// A native descriptor heap with its start handles.
pub struct D3D12Heap {
    heap: ID3D12DescriptorHeap,
    cpu_start: D3D12_CPU_DESCRIPTOR_HANDLE,
    gpu_start: Option<D3D12_GPU_DESCRIPTOR_HANDLE>,
}

impl D3D12Heap {
    /// The COM pointer to the heap, for `SetDescriptorHeaps`.
    pub fn handle(&self) -> &ID3D12DescriptorHeap {
        &self.heap
    }
}

impl RawDescriptorHeap for D3D12Heap {
    fn cpu_start(&self) -> CpuDescriptorHandle {
        CpuDescriptorHandle(self.cpu_start.ptr)
    }

    fn gpu_start(&self) -> Option<GpuDescriptorHandle> {
        self.gpu_start.map(|start| GpuDescriptorHandle(start.ptr))
    }
}

/// A Direct3D 12 device.
#[derive(Clone)]
pub struct D3D12Device(ID3D12Device);

impl D3D12Device {
    /// Wrap a device created by the caller.
    pub fn new(device: &ID3D12Device) -> Self {
        D3D12Device(device.clone())
    }

    /// The wrapped device.
    pub fn device(&self) -> &ID3D12Device {
        &self.0
    }

    /// Build the transition barrier for a state change of `resource`.
    pub fn transition_barrier(
        resource: &ID3D12Resource,
        transition: Transition,
    ) -> TransitionBarrier<'_> {
        TransitionBarrier::new(resource, transition)
    }
}

/// A native transition barrier that borrows its resource.
///
/// The barrier holds no reference count on the resource, so dropping it
/// releases nothing and the resource cannot be dropped while it exists.
#[repr(transparent)]
pub struct TransitionBarrier<'a> {
    raw: D3D12_RESOURCE_BARRIER,
    _resource: PhantomData<&'a ID3D12Resource>,
}

impl<'a> TransitionBarrier<'a> {
    /// Build a barrier transitioning all subresources of `resource`.
    pub fn new(resource: &'a ID3D12Resource, transition: Transition) -> Self {
        TransitionBarrier {
            raw: D3D12_RESOURCE_BARRIER {
                Type: D3D12_RESOURCE_BARRIER_TYPE_TRANSITION,
                Flags: D3D12_RESOURCE_BARRIER_FLAG_NONE,
                Anonymous: D3D12_RESOURCE_BARRIER_0 {
                    Transition: ManuallyDrop::new(D3D12_RESOURCE_TRANSITION_BARRIER {
                        // SAFETY: an interface and `ManuallyDrop<Option<_>>` of it share the
                        // non-null pointer layout. The copy is never released and is bound
                        // to `'a`.
                        pResource: unsafe { std::mem::transmute_copy(resource) },
                        Subresource: D3D12_RESOURCE_BARRIER_ALL_SUBRESOURCES,
                        StateBefore: resource_state(transition.before),
                        StateAfter: resource_state(transition.after),
                    }),
                },
            },
            _resource: PhantomData,
        }
    }

    /// The native barrier, for `ResourceBarrier`.
    pub fn as_raw(&self) -> &D3D12_RESOURCE_BARRIER {
        &self.raw
    }

    /// View a batch of barriers as the native array `ResourceBarrier` takes.
    pub fn as_raw_slice<'s>(barriers: &'s [TransitionBarrier<'a>]) -> &'s [D3D12_RESOURCE_BARRIER] {
        // SAFETY: `TransitionBarrier` is a transparent wrapper around the native barrier.
        unsafe { std::slice::from_raw_parts(barriers.as_ptr().cast(), barriers.len()) }
    }
}

impl DescriptorDevice for D3D12Device {
    type Heap = D3D12Heap;
    type Resource = ID3D12Resource;

    fn create_descriptor_heap(&self, desc: &HeapDesc) -> Result<D3D12Heap> {
        let capacity = u32::try_from(desc.capacity).map_err(|_| ViewHeapError::HeapCreation {
            heap_type: desc.heap_type,
            capacity: desc.capacity,
            reason: "capacity does not fit in a descriptor heap".to_owned(),
        })?;
        let heap_desc = D3D12_DESCRIPTOR_HEAP_DESC {
            Type: heap_type(desc.heap_type),
            NumDescriptors: capacity,
            Flags: if desc.shader_visible {
                D3D12_DESCRIPTOR_HEAP_FLAG_SHADER_VISIBLE
            } else {
                D3D12_DESCRIPTOR_HEAP_FLAG_NONE
            },
            NodeMask: 0,
        };

        unsafe {
            let heap: ID3D12DescriptorHeap = self.0.CreateDescriptorHeap(&heap_desc).map_err(|e| {
                ViewHeapError::HeapCreation {
                    heap_type: desc.heap_type,
                    capacity: desc.capacity,
                    reason: e.to_string(),
                }
            })?;

            let cpu_start = heap.GetCPUDescriptorHandleForHeapStart();
            let gpu_start = desc
                .shader_visible
                .then(|| heap.GetGPUDescriptorHandleForHeapStart());

            Ok(D3D12Heap {
                heap,
                cpu_start,
                gpu_start,
            })
        }
    }

    fn descriptor_increment_size(&self, heap_type_: HeapType) -> u32 {
        unsafe { self.0.GetDescriptorHandleIncrementSize(heap_type(heap_type_)) }
    }

    unsafe fn copy_descriptors_simple(
        &self,
        count: usize,
        dst: CpuDescriptorHandle,
        src: CpuDescriptorHandle,
        heap_type_: HeapType,
    ) {
        // Ranges lie inside heaps whose capacity was accepted as a `u32`.
        let Ok(count) = u32::try_from(count) else {
            unreachable!("{count} descriptors exceed any descriptor heap")
        };
        unsafe {
            self.0
                .CopyDescriptorsSimple(count, cpu(dst), cpu(src), heap_type(heap_type_))
        }
    }

    fn create_upload_buffer(&self, name: &str, size: u64) -> Result<ID3D12Resource> {
        let heap_properties = D3D12_HEAP_PROPERTIES {
            Type: D3D12_HEAP_TYPE_UPLOAD,
            CPUPageProperty: D3D12_CPU_PAGE_PROPERTY_UNKNOWN,
            MemoryPoolPreference: D3D12_MEMORY_POOL_UNKNOWN,
            CreationNodeMask: 1,
            VisibleNodeMask: 1,
        };
        let desc = D3D12_RESOURCE_DESC {
            Dimension: D3D12_RESOURCE_DIMENSION_BUFFER,
            Alignment: 0,
            Width: size,
            Height: 1,
            DepthOrArraySize: 1,
            MipLevels: 1,
            Format: DXGI_FORMAT_UNKNOWN,
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            Layout: D3D12_TEXTURE_LAYOUT_ROW_MAJOR,
            Flags: D3D12_RESOURCE_FLAG_NONE,
        };

        let mut resource: Option<ID3D12Resource> = None;
        unsafe {
            self.0.CreateCommittedResource(
                &heap_properties,
                D3D12_HEAP_FLAG_NONE,
                &desc,
                D3D12_RESOURCE_STATE_GENERIC_READ,
                None,
                &mut resource,
            )
        }
        .map_err(|e| ViewHeapError::ResourceCreation {
            name: name.to_owned(),
            reason: e.to_string(),
        })?;

        resource.ok_or_else(|| ViewHeapError::ResourceCreation {
            name: name.to_owned(),
            reason: "device returned no resource".to_owned(),
        })
    }

    fn gpu_virtual_address(&self, resource: &ID3D12Resource) -> u64 {
        unsafe { resource.GetGPUVirtualAddress() }
    }

    unsafe fn create_shader_resource_view(
        &self,
        resource: Option<&ID3D12Resource>,
        desc: &ShaderResourceViewDesc,
        dst: CpuDescriptorHandle,
    ) {
        let mut native = D3D12_SHADER_RESOURCE_VIEW_DESC {
            Format: dxgi_format(desc.format),
            Shader4ComponentMapping: D3D12_DEFAULT_SHADER_4_COMPONENT_MAPPING,
            ..Default::default()
        };

        match desc.dimension {
            SrvDimension::Buffer {
                first_element,
                num_elements,
                structure_byte_stride,
            } => {
                native.ViewDimension = D3D12_SRV_DIMENSION_BUFFER;
                native.Anonymous.Buffer = D3D12_BUFFER_SRV {
                    FirstElement: first_element,
                    NumElements: num_elements,
                    StructureByteStride: structure_byte_stride,
                    Flags: D3D12_BUFFER_SRV_FLAG_NONE,
                };
            }
            SrvDimension::Texture1D { mip_levels } => {
                native.ViewDimension = D3D12_SRV_DIMENSION_TEXTURE1D;
                native.Anonymous.Texture1D = D3D12_TEX1D_SRV {
                    MipLevels: mip_levels,
                    ..Default::default()
                };
            }
            SrvDimension::Texture2D { mip_levels } => {
                native.ViewDimension = D3D12_SRV_DIMENSION_TEXTURE2D;
                native.Anonymous.Texture2D = D3D12_TEX2D_SRV {
                    MipLevels: mip_levels,
                    ..Default::default()
                };
            }
            SrvDimension::Texture2DArray {
                mip_levels,
                array_size,
            } => {
                native.ViewDimension = D3D12_SRV_DIMENSION_TEXTURE2DARRAY;
                native.Anonymous.Texture2DArray = D3D12_TEX2D_ARRAY_SRV {
                    MipLevels: mip_levels,
                    ArraySize: array_size,
                    ..Default::default()
                };
            }
            SrvDimension::Texture2DMs => {
                native.ViewDimension = D3D12_SRV_DIMENSION_TEXTURE2DMS;
            }
            SrvDimension::Texture3D { mip_levels } => {
                native.ViewDimension = D3D12_SRV_DIMENSION_TEXTURE3D;
                native.Anonymous.Texture3D = D3D12_TEX3D_SRV {
                    MipLevels: mip_levels,
                    ..Default::default()
                };
            }
            SrvDimension::TextureCube { mip_levels } => {
                native.ViewDimension = D3D12_SRV_DIMENSION_TEXTURECUBE;
                native.Anonymous.TextureCube = D3D12_TEXCUBE_SRV {
                    MipLevels: mip_levels,
                    ..Default::default()
                };
            }
        }

        unsafe {
            self.0
                .CreateShaderResourceView(resource, Some(&native as *const _), cpu(dst))
        }
    }

    unsafe fn create_unordered_access_view(
        &self,
        resource: Option<&ID3D12Resource>,
        desc: &UnorderedAccessViewDesc,
        dst: CpuDescriptorHandle,
    ) {
        let mut native = D3D12_UNORDERED_ACCESS_VIEW_DESC {
            Format: dxgi_format(desc.format),
            ..Default::default()
        };

        match desc.dimension {
            UavDimension::Buffer {
                first_element,
                num_elements,
                structure_byte_stride,
            } => {
                native.ViewDimension = D3D12_UAV_DIMENSION_BUFFER;
                native.Anonymous.Buffer = D3D12_BUFFER_UAV {
                    FirstElement: first_element,
                    NumElements: num_elements,
                    StructureByteStride: structure_byte_stride,
                    CounterOffsetInBytes: 0,
                    Flags: D3D12_BUFFER_UAV_FLAG_NONE,
                };
            }
            UavDimension::Texture1D { mip_slice } => {
                native.ViewDimension = D3D12_UAV_DIMENSION_TEXTURE1D;
                native.Anonymous.Texture1D = D3D12_TEX1D_UAV { MipSlice: mip_slice };
            }
            UavDimension::Texture2D { mip_slice } => {
                native.ViewDimension = D3D12_UAV_DIMENSION_TEXTURE2D;
                native.Anonymous.Texture2D = D3D12_TEX2D_UAV {
                    MipSlice: mip_slice,
                    PlaneSlice: 0,
                };
            }
            UavDimension::Texture2DArray {
                mip_slice,
                array_size,
            } => {
                native.ViewDimension = D3D12_UAV_DIMENSION_TEXTURE2DARRAY;
                native.Anonymous.Texture2DArray = D3D12_TEX2D_ARRAY_UAV {
                    MipSlice: mip_slice,
                    FirstArraySlice: 0,
                    ArraySize: array_size,
                    PlaneSlice: 0,
                };
            }
            UavDimension::Texture3D { mip_slice, w_size } => {
                native.ViewDimension = D3D12_UAV_DIMENSION_TEXTURE3D;
                native.Anonymous.Texture3D = D3D12_TEX3D_UAV {
                    MipSlice: mip_slice,
                    FirstWSlice: 0,
                    WSize: w_size,
                };
            }
        }

        unsafe {
            self.0
                .CreateUnorderedAccessView(
                    resource,
                    None::<&ID3D12Resource>,
                    Some(&native as *const _),
                    cpu(dst),
                )
        }
    }

    unsafe fn create_constant_buffer_view(
        &self,
        desc: &ConstantBufferViewDesc,
        dst: CpuDescriptorHandle,
    ) {
        let native = D3D12_CONSTANT_BUFFER_VIEW_DESC {
            BufferLocation: desc.buffer_location,
            SizeInBytes: desc.size_in_bytes,
        };
        unsafe { self.0.CreateConstantBufferView(Some(&native as *const _), cpu(dst)) }
    }

    unsafe fn create_sampler(&self, desc: &SamplerDesc, dst: CpuDescriptorHandle) {
        let native = D3D12_SAMPLER_DESC {
            Filter: filter(desc.filter),
            AddressU: address_mode(desc.address_u),
            AddressV: address_mode(desc.address_v),
            AddressW: address_mode(desc.address_w),
            MipLODBias: desc.mip_lod_bias,
            MaxAnisotropy: desc.max_anisotropy,
            ComparisonFunc: comparison_func(desc.comparison_func),
            BorderColor: desc.border_color,
            MinLOD: desc.min_lod,
            MaxLOD: desc.max_lod,
        };
        unsafe { self.0.CreateSampler(&native, cpu(dst)) }
    }

    unsafe fn create_render_target_view(
        &self,
        resource: &ID3D12Resource,
        desc: &RenderTargetViewDesc,
        dst: CpuDescriptorHandle,
    ) {
        let mut native = D3D12_RENDER_TARGET_VIEW_DESC {
            Format: dxgi_format(desc.format),
            ..Default::default()
        };

        match desc.dimension {
            AttachmentDimension::Texture2D { mip_slice } => {
                native.ViewDimension = D3D12_RTV_DIMENSION_TEXTURE2D;
                native.Anonymous.Texture2D = D3D12_TEX2D_RTV {
                    MipSlice: mip_slice,
                    PlaneSlice: 0,
                };
            }
            AttachmentDimension::Texture2DMs => {
                native.ViewDimension = D3D12_RTV_DIMENSION_TEXTURE2DMS;
            }
            AttachmentDimension::Texture2DArray {
                mip_slice,
                array_size,
            } => {
                native.ViewDimension = D3D12_RTV_DIMENSION_TEXTURE2DARRAY;
                native.Anonymous.Texture2DArray = D3D12_TEX2D_ARRAY_RTV {
                    MipSlice: mip_slice,
                    FirstArraySlice: 0,
                    ArraySize: array_size,
                    PlaneSlice: 0,
                };
            }
        }

        unsafe {
            self.0
                .CreateRenderTargetView(resource, Some(&native as *const _), cpu(dst))
        }
    }

    unsafe fn create_depth_stencil_view(
        &self,
        resource: &ID3D12Resource,
        desc: &DepthStencilViewDesc,
        dst: CpuDescriptorHandle,
    ) {
        let mut native = D3D12_DEPTH_STENCIL_VIEW_DESC {
            Format: dxgi_format(desc.format),
            Flags: D3D12_DSV_FLAG_NONE,
            ..Default::default()
        };

        match desc.dimension {
            AttachmentDimension::Texture2D { mip_slice } => {
                native.ViewDimension = D3D12_DSV_DIMENSION_TEXTURE2D;
                native.Anonymous.Texture2D = D3D12_TEX2D_DSV { MipSlice: mip_slice };
            }
            AttachmentDimension::Texture2DMs => {
                native.ViewDimension = D3D12_DSV_DIMENSION_TEXTURE2DMS;
            }
            AttachmentDimension::Texture2DArray {
                mip_slice,
                array_size,
            } => {
                native.ViewDimension = D3D12_DSV_DIMENSION_TEXTURE2DARRAY;
                native.Anonymous.Texture2DArray = D3D12_TEX2D_ARRAY_DSV {
                    MipSlice: mip_slice,
                    FirstArraySlice: 0,
                    ArraySize: array_size,
                };
            }
        }

        unsafe {
            self.0
                .CreateDepthStencilView(resource, Some(&native as *const _), cpu(dst))
        }
    }
}

fn cpu(handle: CpuDescriptorHandle) -> D3D12_CPU_DESCRIPTOR_HANDLE {
    D3D12_CPU_DESCRIPTOR_HANDLE { ptr: handle.0 }
}

fn heap_type(heap_type: HeapType) -> D3D12_DESCRIPTOR_HEAP_TYPE {
    match heap_type {
        HeapType::CbvSrvUav => D3D12_DESCRIPTOR_HEAP_TYPE_CBV_SRV_UAV,
        HeapType::Sampler => D3D12_DESCRIPTOR_HEAP_TYPE_SAMPLER,
        HeapType::Rtv => D3D12_DESCRIPTOR_HEAP_TYPE_RTV,
        HeapType::Dsv => D3D12_DESCRIPTOR_HEAP_TYPE_DSV,
    }
}

fn resource_state(state: ResourceState) -> D3D12_RESOURCE_STATES {
    match state {
        ResourceState::Common => D3D12_RESOURCE_STATE_COMMON,
        ResourceState::VertexAndConstantBuffer => D3D12_RESOURCE_STATE_VERTEX_AND_CONSTANT_BUFFER,
        ResourceState::IndexBuffer => D3D12_RESOURCE_STATE_INDEX_BUFFER,
        ResourceState::RenderTarget => D3D12_RESOURCE_STATE_RENDER_TARGET,
        ResourceState::UnorderedAccess => D3D12_RESOURCE_STATE_UNORDERED_ACCESS,
        ResourceState::DepthWrite => D3D12_RESOURCE_STATE_DEPTH_WRITE,
        ResourceState::DepthRead => D3D12_RESOURCE_STATE_DEPTH_READ,
        ResourceState::ShaderResource => D3D12_RESOURCE_STATES(
            D3D12_RESOURCE_STATE_PIXEL_SHADER_RESOURCE.0
                | D3D12_RESOURCE_STATE_NON_PIXEL_SHADER_RESOURCE.0,
        ),
        ResourceState::CopyDest => D3D12_RESOURCE_STATE_COPY_DEST,
        ResourceState::CopySource => D3D12_RESOURCE_STATE_COPY_SOURCE,
        ResourceState::GenericRead => D3D12_RESOURCE_STATE_GENERIC_READ,
    }
}

fn dxgi_format(format: Format) -> DXGI_FORMAT {
    match format {
        Format::Unknown => DXGI_FORMAT_UNKNOWN,
        Format::Rgba8Unorm => DXGI_FORMAT_R8G8B8A8_UNORM,
        Format::Rgba8UnormSrgb => DXGI_FORMAT_R8G8B8A8_UNORM_SRGB,
        Format::Bgra8Unorm => DXGI_FORMAT_B8G8R8A8_UNORM,
        Format::Rgba16Float => DXGI_FORMAT_R16G16B16A16_FLOAT,
        Format::Rgba32Float => DXGI_FORMAT_R32G32B32A32_FLOAT,
        Format::Rgb32Float => DXGI_FORMAT_R32G32B32_FLOAT,
        Format::Rg32Float => DXGI_FORMAT_R32G32_FLOAT,
        Format::R32Float => DXGI_FORMAT_R32_FLOAT,
        Format::R32Uint => DXGI_FORMAT_R32_UINT,
        Format::R16Uint => DXGI_FORMAT_R16_UINT,
        Format::R16Unorm => DXGI_FORMAT_R16_UNORM,
        Format::R32Typeless => DXGI_FORMAT_R32_TYPELESS,
        Format::D32Float => DXGI_FORMAT_D32_FLOAT,
        Format::R24G8Typeless => DXGI_FORMAT_R24G8_TYPELESS,
        Format::D24UnormS8Uint => DXGI_FORMAT_D24_UNORM_S8_UINT,
        Format::R24UnormX8Typeless => DXGI_FORMAT_R24_UNORM_X8_TYPELESS,
        Format::R16Typeless => DXGI_FORMAT_R16_TYPELESS,
        Format::D16Unorm => DXGI_FORMAT_D16_UNORM,
    }
}

fn filter(filter: Filter) -> D3D12_FILTER {
    match filter {
        Filter::Point => D3D12_FILTER_MIN_MAG_MIP_POINT,
        Filter::Linear => D3D12_FILTER_MIN_MAG_MIP_LINEAR,
        Filter::Anisotropic => D3D12_FILTER_ANISOTROPIC,
        Filter::ComparisonPoint => D3D12_FILTER_COMPARISON_MIN_MAG_MIP_POINT,
        Filter::ComparisonLinear => D3D12_FILTER_COMPARISON_MIN_MAG_MIP_LINEAR,
        Filter::ComparisonAnisotropic => D3D12_FILTER_COMPARISON_ANISOTROPIC,
    }
}

fn address_mode(mode: AddressMode) -> D3D12_TEXTURE_ADDRESS_MODE {
    match mode {
        AddressMode::Wrap => D3D12_TEXTURE_ADDRESS_MODE_WRAP,
        AddressMode::Mirror => D3D12_TEXTURE_ADDRESS_MODE_MIRROR,
        AddressMode::Clamp => D3D12_TEXTURE_ADDRESS_MODE_CLAMP,
        AddressMode::Border => D3D12_TEXTURE_ADDRESS_MODE_BORDER,
    }
}

fn comparison_func(func: ComparisonFunc) -> D3D12_COMPARISON_FUNC {
    match func {
        ComparisonFunc::Never => D3D12_COMPARISON_FUNC_NEVER,
        ComparisonFunc::Less => D3D12_COMPARISON_FUNC_LESS,
        ComparisonFunc::Equal => D3D12_COMPARISON_FUNC_EQUAL,
        ComparisonFunc::LessEqual => D3D12_COMPARISON_FUNC_LESS_EQUAL,
        ComparisonFunc::Greater => D3D12_COMPARISON_FUNC_GREATER,
        ComparisonFunc::NotEqual => D3D12_COMPARISON_FUNC_NOT_EQUAL,
        ComparisonFunc::GreaterEqual => D3D12_COMPARISON_FUNC_GREATER_EQUAL,
        ComparisonFunc::Always => D3D12_COMPARISON_FUNC_ALWAYS,
    }
}

#[cfg(test)]
mod tests {
    use windows::core::{IUnknown, Interface};
    use windows::Win32::Graphics::Direct3D::D3D_FEATURE_LEVEL_11_0;

    use super::*;

    fn device() -> Option<D3D12Device> {
        let mut device: Option<ID3D12Device> = None;
        unsafe { D3D12CreateDevice(None, D3D_FEATURE_LEVEL_11_0, &mut device) }.ok()?;
        device.map(|device| D3D12Device::new(&device))
    }

    fn ref_count(resource: &ID3D12Resource) -> u32 {
        let unknown: IUnknown = resource.cast().unwrap();
        unsafe {
            let raw = unknown.as_raw();
            (unknown.vtable().AddRef)(raw);
            (unknown.vtable().Release)(raw)
        }
    }

    #[test]
    fn transition_barriers_do_not_retain_the_resource() {
        // Machines without a Direct3D 12 adapter have nothing to check.
        let Some(device) = device() else {
            return;
        };
        let resource = device.create_upload_buffer("constants", 256).unwrap();
        let before = ref_count(&resource);

        let transition = Transition {
            before: ResourceState::GenericRead,
            after: ResourceState::CopySource,
        };
        let barriers = [
            D3D12Device::transition_barrier(&resource, transition),
            TransitionBarrier::new(&resource, transition),
        ];
        assert_eq!(ref_count(&resource), before);
        assert_eq!(TransitionBarrier::as_raw_slice(&barriers).len(), 2);

        drop(barriers);
        assert_eq!(ref_count(&resource), before);
    }

    #[test]
    fn oversized_heaps_are_rejected() {
        let Some(device) = device() else {
            return;
        };
        let err = device
            .create_descriptor_heap(&HeapDesc {
                heap_type: HeapType::Rtv,
                capacity: u32::MAX as usize + 1,
                shader_visible: false,
            })
            .err()
            .unwrap();
        assert!(matches!(err, ViewHeapError::HeapCreation { heap_type: HeapType::Rtv, .. }));
    }
}
