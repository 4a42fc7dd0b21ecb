use crate::desc::{
    ConstantBufferViewDesc, DepthStencilViewDesc, RenderTargetViewDesc, SamplerDesc,
    ShaderResourceViewDesc, UnorderedAccessViewDesc,
};
use crate::Result;

/// The four physically separate kinds of descriptor heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapType {
    /// Shader resource, unordered access and constant buffer views.
    CbvSrvUav,
    /// Samplers.
    Sampler,
    /// Render target views.
    Rtv,
    /// Depth stencil views.
    Dsv,
}

impl HeapType {
    /// All heap types, in the order a [`ViewPool`](crate::ViewPool) stores its allocators.
    pub const ALL: [HeapType; 4] = [
        HeapType::CbvSrvUav,
        HeapType::Sampler,
        HeapType::Rtv,
        HeapType::Dsv,
    ];

    /// Index of this heap type within [`HeapType::ALL`].
    pub fn index(self) -> usize {
        match self {
            HeapType::CbvSrvUav => 0,
            HeapType::Sampler => 1,
            HeapType::Rtv => 2,
            HeapType::Dsv => 3,
        }
    }

    /// Whether heaps of this type may be made visible to shaders at all.
    pub fn supports_shader_visibility(self) -> bool {
        matches!(self, HeapType::CbvSrvUav | HeapType::Sampler)
    }
}

/// Parameters for creating a descriptor heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapDesc {
    /// The type of descriptors the heap holds.
    pub heap_type: HeapType,
    /// The number of descriptor slots.
    pub capacity: usize,
    /// Whether the heap is bound to command lists and read by shaders.
    pub shader_visible: bool,
}

/// A CPU address of a descriptor slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct CpuDescriptorHandle(pub usize);

impl CpuDescriptorHandle {
    /// Offset this handle by `index` slots of `increment` bytes.
    pub fn offset(self, index: usize, increment: u32) -> Self {
        CpuDescriptorHandle(self.0 + index * increment as usize)
    }
}

/// A GPU address of a descriptor slot in a shader-visible heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct GpuDescriptorHandle(pub u64);

impl GpuDescriptorHandle {
    /// Offset this handle by `index` slots of `increment` bytes.
    pub fn offset(self, index: usize, increment: u32) -> Self {
        GpuDescriptorHandle(self.0 + index as u64 * increment as u64)
    }
}

/// A native descriptor heap object created by a [`DescriptorDevice`].
pub trait RawDescriptorHeap {
    /// The CPU address of the first slot.
    fn cpu_start(&self) -> CpuDescriptorHandle;

    /// The GPU address of the first slot, if the heap is shader-visible.
    fn gpu_start(&self) -> Option<GpuDescriptorHandle>;
}

/// The device capabilities the view heaps depend on.
///
/// A backend supplies the native graphics API calls. Handles are cheap to
/// clone and refer to the same underlying device.
///
/// Methods writing descriptors are unsafe because they write through raw
/// CPU addresses.
pub trait DescriptorDevice: Clone {
    /// The native descriptor heap type.
    ///
    /// Retired heaps are handed to a deletion queue, hence `Send + 'static`.
    type Heap: RawDescriptorHeap + Send + 'static;

    /// The native GPU memory object type.
    type Resource: Clone;

    /// Create a descriptor heap. Failure indicates device loss or exhaustion.
    fn create_descriptor_heap(&self, desc: &HeapDesc) -> Result<Self::Heap>;

    /// The size in bytes of one descriptor slot of the given heap type.
    fn descriptor_increment_size(&self, heap_type: HeapType) -> u32;

    /// Copy `count` descriptors from `src` to `dst`.
    ///
    /// ## Safety
    /// Both ranges must lie inside live heaps of `heap_type`, and `src` must
    /// lie in a heap that is not shader-visible.
    unsafe fn copy_descriptors_simple(
        &self,
        count: usize,
        dst: CpuDescriptorHandle,
        src: CpuDescriptorHandle,
        heap_type: HeapType,
    );

    /// Create an upload (CPU-writable staging) buffer of `size` bytes.
    fn create_upload_buffer(&self, name: &str, size: u64) -> Result<Self::Resource>;

    /// The GPU virtual address of a buffer resource.
    fn gpu_virtual_address(&self, resource: &Self::Resource) -> u64;

    /// Write a shader resource view.
    ///
    /// ## Safety
    /// `dst` must point at a slot of a live [`HeapType::CbvSrvUav`] heap.
    unsafe fn create_shader_resource_view(
        &self,
        resource: Option<&Self::Resource>,
        desc: &ShaderResourceViewDesc,
        dst: CpuDescriptorHandle,
    );

    /// Write an unordered access view.
    ///
    /// ## Safety
    /// `dst` must point at a slot of a live [`HeapType::CbvSrvUav`] heap.
    unsafe fn create_unordered_access_view(
        &self,
        resource: Option<&Self::Resource>,
        desc: &UnorderedAccessViewDesc,
        dst: CpuDescriptorHandle,
    );

    /// Write a constant buffer view.
    ///
    /// ## Safety
    /// `dst` must point at a slot of a live [`HeapType::CbvSrvUav`] heap.
    unsafe fn create_constant_buffer_view(
        &self,
        desc: &ConstantBufferViewDesc,
        dst: CpuDescriptorHandle,
    );

    /// Write a sampler.
    ///
    /// ## Safety
    /// `dst` must point at a slot of a live [`HeapType::Sampler`] heap.
    unsafe fn create_sampler(&self, desc: &SamplerDesc, dst: CpuDescriptorHandle);

    /// Write a render target view.
    ///
    /// ## Safety
    /// `dst` must point at a slot of a live [`HeapType::Rtv`] heap.
    unsafe fn create_render_target_view(
        &self,
        resource: &Self::Resource,
        desc: &RenderTargetViewDesc,
        dst: CpuDescriptorHandle,
    );

    /// Write a depth stencil view.
    ///
    /// ## Safety
    /// `dst` must point at a slot of a live [`HeapType::Dsv`] heap.
    unsafe fn create_depth_stencil_view(
        &self,
        resource: &Self::Resource,
        desc: &DepthStencilViewDesc,
        dst: CpuDescriptorHandle,
    );
}
