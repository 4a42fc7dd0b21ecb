use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::desc::{
    ConstantBufferViewDesc, DepthStencilViewDesc, RenderTargetViewDesc, SamplerDesc,
    ShaderResourceViewDesc, UnorderedAccessViewDesc,
};
use crate::{
    CpuDescriptorHandle, DescriptorDevice, GpuDescriptorHandle, HeapDesc, HeapType,
    RawDescriptorHeap, Result, ViewHeapError,
};

const CPU_BASE: usize = 0x0001_0000;
const GPU_BASE: u64 = 0x0001_0000_0000;
const PAGE: usize = 0x1000;

/// A descriptor as recorded by the [`HeadlessDevice`].
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessDescriptor {
    /// A shader resource view.
    Srv {
        /// Id of the viewed resource, if any.
        resource: Option<u64>,
        /// The view description.
        desc: ShaderResourceViewDesc,
    },
    /// An unordered access view.
    Uav {
        /// Id of the viewed resource, if any.
        resource: Option<u64>,
        /// The view description.
        desc: UnorderedAccessViewDesc,
    },
    /// A constant buffer view.
    Cbv(ConstantBufferViewDesc),
    /// A sampler.
    Sampler(SamplerDesc),
    /// A render target view.
    Rtv {
        /// Id of the viewed resource.
        resource: u64,
        /// The view description.
        desc: RenderTargetViewDesc,
    },
    /// A depth stencil view.
    Dsv {
        /// Id of the viewed resource.
        resource: u64,
        /// The view description.
        desc: DepthStencilViewDesc,
    },
}

/// A GPU memory object of the [`HeadlessDevice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessResource {
    id: u64,
    name: String,
    size: u64,
    gpu_address: u64,
}

impl HeadlessResource {
    /// Unique id of the resource, as recorded in descriptors.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Debug name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }
}

struct HeapStorage {
    heap_type: HeapType,
    cpu_start: usize,
    gpu_start: Option<u64>,
    increment: u32,
    slots: Mutex<Vec<Option<HeadlessDescriptor>>>,
}

impl HeapStorage {
    fn slot_of(&self, address: usize) -> Option<usize> {
        let end = self.cpu_start + self.increment as usize * self.slots().len();
        (self.cpu_start..end)
            .contains(&address)
            .then(|| (address - self.cpu_start) / self.increment as usize)
    }

    fn slots(&self) -> MutexGuard<'_, Vec<Option<HeadlessDescriptor>>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A descriptor heap of the [`HeadlessDevice`]. Its slots are freed on drop.
pub struct HeadlessHeap(Arc<HeapStorage>);

impl RawDescriptorHeap for HeadlessHeap {
    fn cpu_start(&self) -> CpuDescriptorHandle {
        CpuDescriptorHandle(self.0.cpu_start)
    }

    fn gpu_start(&self) -> Option<GpuDescriptorHandle> {
        self.0.gpu_start.map(GpuDescriptorHandle)
    }
}

struct HeadlessState {
    next_cpu: usize,
    next_gpu: u64,
    next_resource: u64,
    heaps: Vec<Weak<HeapStorage>>,
    heaps_created: usize,
    fail_next_heap: bool,
}

/// A CPU-only device that records descriptor contents instead of talking to a GPU.
///
/// Heaps are laid out at distinct fake addresses so that descriptors can be
/// read back by CPU handle. Writing through an address that does not belong
/// to a live heap panics, which makes use-after-release visible. Copying out
/// of a shader-visible heap panics as well, as D3D12 forbids it.
#[derive(Clone)]
pub struct HeadlessDevice(Arc<Mutex<HeadlessState>>);

impl HeadlessDevice {
    /// Create a device with no heaps.
    pub fn new() -> Self {
        HeadlessDevice(Arc::new(Mutex::new(HeadlessState {
            next_cpu: CPU_BASE,
            next_gpu: GPU_BASE,
            next_resource: 1,
            heaps: Vec::new(),
            heaps_created: 0,
            fail_next_heap: false,
        })))
    }

    /// Make the next descriptor heap creation fail, as on device loss.
    pub fn fail_next_heap_creation(&self) {
        self.state().fail_next_heap = true;
    }

    /// Create a resource of `size` bytes.
    pub fn create_resource(&self, name: &str, size: u64) -> HeadlessResource {
        let mut state = self.state();
        let id = state.next_resource;
        state.next_resource += 1;
        let gpu_address = state.next_gpu;
        state.next_gpu += size.max(1).next_multiple_of(PAGE as u64);
        HeadlessResource {
            id,
            name: name.to_owned(),
            size,
            gpu_address,
        }
    }

    /// Number of descriptor heaps created so far.
    pub fn heaps_created(&self) -> usize {
        self.state().heaps_created
    }

    /// Number of descriptor heaps that have not been dropped.
    pub fn live_heaps(&self) -> usize {
        let mut state = self.state();
        state.heaps.retain(|heap| heap.strong_count() > 0);
        state.heaps.len()
    }

    /// Read the descriptor stored at `handle`.
    ///
    /// Returns `None` for empty slots and for addresses outside every live heap.
    pub fn read_descriptor(&self, handle: CpuDescriptorHandle) -> Option<HeadlessDescriptor> {
        let (heap, slot) = self.find(handle)?;
        let slots = heap.slots();
        slots[slot].clone()
    }

    fn state(&self) -> MutexGuard<'_, HeadlessState> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn find(&self, handle: CpuDescriptorHandle) -> Option<(Arc<HeapStorage>, usize)> {
        self.state()
            .heaps
            .iter()
            .filter_map(Weak::upgrade)
            .find_map(|heap| heap.slot_of(handle.0).map(|slot| (heap, slot)))
    }

    fn resolve(&self, handle: CpuDescriptorHandle, heap_type: HeapType) -> (Arc<HeapStorage>, usize) {
        let Some((heap, slot)) = self.find(handle) else {
            panic!("descriptor address {:#x} does not belong to a live heap", handle.0)
        };
        assert_eq!(
            heap.heap_type, heap_type,
            "descriptor address {:#x} belongs to a {:?} heap",
            handle.0, heap.heap_type
        );
        (heap, slot)
    }

    fn write(&self, handle: CpuDescriptorHandle, heap_type: HeapType, descriptor: HeadlessDescriptor) {
        let (heap, slot) = self.resolve(handle, heap_type);
        heap.slots()[slot] = Some(descriptor);
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorDevice for HeadlessDevice {
    type Heap = HeadlessHeap;
    type Resource = HeadlessResource;

    fn create_descriptor_heap(&self, desc: &HeapDesc) -> Result<HeadlessHeap> {
        let increment = self.descriptor_increment_size(desc.heap_type);
        let mut state = self.state();
        if std::mem::take(&mut state.fail_next_heap) {
            return Err(ViewHeapError::HeapCreation {
                heap_type: desc.heap_type,
                capacity: desc.capacity,
                reason: "device removed".to_owned(),
            });
        }

        let bytes = (desc.capacity * increment as usize).next_multiple_of(PAGE) + PAGE;
        let cpu_start = state.next_cpu;
        state.next_cpu += bytes;

        let gpu_start = desc.shader_visible.then(|| {
            let start = state.next_gpu;
            state.next_gpu += bytes as u64;
            start
        });

        let storage = Arc::new(HeapStorage {
            heap_type: desc.heap_type,
            cpu_start,
            gpu_start,
            increment,
            slots: Mutex::new(vec![None; desc.capacity]),
        });
        state.heaps.push(Arc::downgrade(&storage));
        state.heaps_created += 1;

        Ok(HeadlessHeap(storage))
    }

    fn descriptor_increment_size(&self, heap_type: HeapType) -> u32 {
        match heap_type {
            HeapType::CbvSrvUav | HeapType::Sampler | HeapType::Rtv => 32,
            HeapType::Dsv => 8,
        }
    }

    unsafe fn copy_descriptors_simple(
        &self,
        count: usize,
        dst: CpuDescriptorHandle,
        src: CpuDescriptorHandle,
        heap_type: HeapType,
    ) {
        let increment = self.descriptor_increment_size(heap_type);
        let copied: Vec<Option<HeadlessDescriptor>> = (0..count)
            .map(|i| {
                let (heap, slot) = self.resolve(src.offset(i, increment), heap_type);
                assert!(
                    heap.gpu_start.is_none(),
                    "descriptor address {:#x} belongs to a shader-visible heap and cannot be copied from",
                    src.0
                );
                let value = heap.slots()[slot].clone();
                value
            })
            .collect();

        for (i, value) in copied.into_iter().enumerate() {
            let (heap, slot) = self.resolve(dst.offset(i, increment), heap_type);
            heap.slots()[slot] = value;
        }
    }

    fn create_upload_buffer(&self, name: &str, size: u64) -> Result<HeadlessResource> {
        Ok(self.create_resource(name, size))
    }

    fn gpu_virtual_address(&self, resource: &HeadlessResource) -> u64 {
        resource.gpu_address
    }

    unsafe fn create_shader_resource_view(
        &self,
        resource: Option<&HeadlessResource>,
        desc: &ShaderResourceViewDesc,
        dst: CpuDescriptorHandle,
    ) {
        let resource = resource.map(HeadlessResource::id);
        self.write(dst, HeapType::CbvSrvUav, HeadlessDescriptor::Srv { resource, desc: *desc });
    }

    unsafe fn create_unordered_access_view(
        &self,
        resource: Option<&HeadlessResource>,
        desc: &UnorderedAccessViewDesc,
        dst: CpuDescriptorHandle,
    ) {
        let resource = resource.map(HeadlessResource::id);
        self.write(dst, HeapType::CbvSrvUav, HeadlessDescriptor::Uav { resource, desc: *desc });
    }

    unsafe fn create_constant_buffer_view(&self, desc: &ConstantBufferViewDesc, dst: CpuDescriptorHandle) {
        self.write(dst, HeapType::CbvSrvUav, HeadlessDescriptor::Cbv(*desc));
    }

    unsafe fn create_sampler(&self, desc: &SamplerDesc, dst: CpuDescriptorHandle) {
        self.write(dst, HeapType::Sampler, HeadlessDescriptor::Sampler(*desc));
    }

    unsafe fn create_render_target_view(
        &self,
        resource: &HeadlessResource,
        desc: &RenderTargetViewDesc,
        dst: CpuDescriptorHandle,
    ) {
        let resource = resource.id();
        self.write(dst, HeapType::Rtv, HeadlessDescriptor::Rtv { resource, desc: *desc });
    }

    unsafe fn create_depth_stencil_view(
        &self,
        resource: &HeadlessResource,
        desc: &DepthStencilViewDesc,
        dst: CpuDescriptorHandle,
    ) {
        let resource = resource.id();
        self.write(dst, HeapType::Dsv, HeadlessDescriptor::Dsv { resource, desc: *desc });
    }
}
