use std::sync::Arc;

use crate::deferred::DeferredRelease;
use crate::{
    BindFlag, DescriptorDevice, HeapType, ResourceState, Result, ViewAllocator, ViewHandle,
    ViewHeapError, ViewPoolConfig,
};

/// The kind of view a binding site requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Shader resource view.
    Srv,
    /// Unordered access view.
    Uav,
    /// Constant buffer view.
    Cbv,
    /// Sampler.
    Sampler,
    /// Render target view.
    Rtv,
    /// Depth stencil view.
    Dsv,
}

impl ResourceKind {
    /// The heap views of this kind live in.
    ///
    /// Shader resource, unordered access and constant buffer views share one heap.
    pub fn heap_type(self) -> HeapType {
        match self {
            ResourceKind::Srv | ResourceKind::Uav | ResourceKind::Cbv => HeapType::CbvSrvUav,
            ResourceKind::Sampler => HeapType::Sampler,
            ResourceKind::Rtv => HeapType::Rtv,
            ResourceKind::Dsv => HeapType::Dsv,
        }
    }

    /// The capability a resource needs to be viewed as this kind.
    pub fn bind_flag(self) -> Option<BindFlag> {
        match self {
            ResourceKind::Srv => Some(BindFlag::ShaderResource),
            ResourceKind::Uav => Some(BindFlag::UnorderedAccess),
            ResourceKind::Cbv => Some(BindFlag::ConstantBuffer),
            ResourceKind::Rtv => Some(BindFlag::RenderTarget),
            ResourceKind::Dsv => Some(BindFlag::DepthStencil),
            ResourceKind::Sampler => None,
        }
    }

    /// The state a resource must be in before it is used through this kind of view.
    pub fn required_state(self) -> Option<ResourceState> {
        match self {
            ResourceKind::Srv => Some(ResourceState::ShaderResource),
            ResourceKind::Uav => Some(ResourceState::UnorderedAccess),
            ResourceKind::Cbv => Some(ResourceState::VertexAndConstantBuffer),
            ResourceKind::Rtv => Some(ResourceState::RenderTarget),
            ResourceKind::Dsv => Some(ResourceState::DepthWrite),
            ResourceKind::Sampler => None,
        }
    }
}

impl TryFrom<u32> for ResourceKind {
    type Error = ViewHeapError;

    fn try_from(value: u32) -> Result<Self> {
        Ok(match value {
            0 => ResourceKind::Srv,
            1 => ResourceKind::Uav,
            2 => ResourceKind::Cbv,
            3 => ResourceKind::Sampler,
            4 => ResourceKind::Rtv,
            5 => ResourceKind::Dsv,
            unknown => return Err(ViewHeapError::UnknownResourceKind(unknown)),
        })
    }
}

/// Routes view allocations to one allocator per heap type.
pub struct ViewPool<D: DescriptorDevice> {
    allocators: [ViewAllocator<D>; 4],
}

impl<D: DescriptorDevice> ViewPool<D> {
    /// Create the four allocators. Heaps with a non-zero initial capacity are
    /// created immediately, the rest on first use.
    pub fn new(
        device: &D,
        deleter: Arc<dyn DeferredRelease>,
        config: &ViewPoolConfig,
    ) -> Result<Self> {
        let allocators = array_init::try_array_init(|i| {
            let heap_type = HeapType::ALL[i];
            let mut allocator = ViewAllocator::new(
                device.clone(),
                Arc::clone(&deleter),
                heap_type,
                config.shader_visible(heap_type),
            );
            allocator.reserve(config.heap(heap_type).initial_capacity)?;
            Ok::<_, ViewHeapError>(allocator)
        })?;

        tracing::debug!(?config, "created view pool");
        Ok(ViewPool { allocators })
    }

    /// Allocate one descriptor slot for a view of `kind`.
    pub fn allocate_descriptor(&mut self, kind: ResourceKind) -> Result<ViewHandle> {
        self.allocate(kind, 1)
    }

    /// Allocate `count` contiguous descriptor slots for views of `kind`.
    pub fn allocate(&mut self, kind: ResourceKind, count: usize) -> Result<ViewHandle> {
        self.select_heap(kind).allocate(count)
    }

    /// Allocate one descriptor slot for a kind given as a raw value.
    ///
    /// Unknown values are rejected rather than routed to a default heap.
    pub fn allocate_descriptor_raw(&mut self, kind: u32) -> Result<ViewHandle> {
        self.allocate_descriptor(ResourceKind::try_from(kind)?)
    }

    /// The allocator that serves views of `kind`.
    pub fn allocator(&self, kind: ResourceKind) -> &ViewAllocator<D> {
        &self.allocators[kind.heap_type().index()]
    }

    /// The shader-visible native heaps to bind on a command list.
    pub fn shader_visible_heaps(&self) -> impl Iterator<Item = &D::Heap> + '_ {
        self.allocators
            .iter()
            .filter(|allocator| allocator.is_shader_visible())
            .filter_map(ViewAllocator::raw_heap)
    }

    fn select_heap(&mut self, kind: ResourceKind) -> &mut ViewAllocator<D> {
        &mut self.allocators[kind.heap_type().index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessDevice;
    use crate::{DeletionQueue, HeapConfig};

    fn pool(device: &HeadlessDevice, config: &ViewPoolConfig) -> ViewPool<HeadlessDevice> {
        ViewPool::new(device, Arc::new(DeletionQueue::new()), config).unwrap()
    }

    #[test]
    fn resource_views_share_one_heap() {
        let device = HeadlessDevice::new();
        let mut pool = pool(&device, &ViewPoolConfig::default());

        let srv = pool.allocate_descriptor(ResourceKind::Srv).unwrap();
        let uav = pool.allocate_descriptor(ResourceKind::Uav).unwrap();
        let cbv = pool.allocate_descriptor(ResourceKind::Cbv).unwrap();

        assert_eq!([srv.offset(), uav.offset(), cbv.offset()], [0, 1, 2]);
        assert!([&srv, &uav, &cbv]
            .iter()
            .all(|view| view.heap_type() == HeapType::CbvSrvUav));
        assert!(std::ptr::eq(
            pool.allocator(ResourceKind::Srv),
            pool.allocator(ResourceKind::Cbv)
        ));
        assert_eq!(pool.allocator(ResourceKind::Uav).allocated(), 3);
    }

    #[test]
    fn other_kinds_get_dedicated_heaps() {
        let device = HeadlessDevice::new();
        let mut pool = pool(&device, &ViewPoolConfig::default());

        pool.allocate_descriptor(ResourceKind::Srv).unwrap();
        for (kind, heap_type) in [
            (ResourceKind::Sampler, HeapType::Sampler),
            (ResourceKind::Rtv, HeapType::Rtv),
            (ResourceKind::Dsv, HeapType::Dsv),
        ] {
            let view = pool.allocate_descriptor(kind).unwrap();
            assert_eq!(view.offset(), 0);
            assert_eq!(view.heap_type(), heap_type);
            assert_eq!(pool.allocator(kind).allocated(), 1);
            assert!(!std::ptr::eq(
                pool.allocator(kind),
                pool.allocator(ResourceKind::Srv)
            ));
        }
        // The shader-visible resource heap comes with a CPU-only staging twin.
        assert_eq!(device.heaps_created(), 5);
    }

    #[test]
    fn unknown_raw_kinds_are_rejected() {
        let device = HeadlessDevice::new();
        let mut pool = pool(&device, &ViewPoolConfig::default());

        assert_eq!(pool.allocate_descriptor_raw(4).unwrap().heap_type(), HeapType::Rtv);
        assert!(matches!(
            pool.allocate_descriptor_raw(42),
            Err(ViewHeapError::UnknownResourceKind(42))
        ));
        assert_eq!(device.heaps_created(), 1);
    }

    #[test]
    fn initial_capacity_creates_heaps_up_front() {
        let device = HeadlessDevice::new();
        let config = ViewPoolConfig {
            resource: HeapConfig {
                initial_capacity: 64,
                shader_visible: None,
            },
            ..ViewPoolConfig::default()
        };
        let mut pool = pool(&device, &config);
        assert_eq!(device.heaps_created(), 2);
        assert_eq!(pool.allocator(ResourceKind::Srv).capacity(), 64);
        assert_eq!(pool.shader_visible_heaps().count(), 1);

        pool.allocate(ResourceKind::Srv, 8).unwrap();
        assert_eq!(pool.allocator(ResourceKind::Srv).generation(), 1);
    }

    #[test]
    fn only_shader_visible_heaps_are_listed() {
        let device = HeadlessDevice::new();
        let mut pool = pool(&device, &ViewPoolConfig::default());
        assert_eq!(pool.shader_visible_heaps().count(), 0);

        pool.allocate_descriptor(ResourceKind::Rtv).unwrap();
        assert_eq!(pool.shader_visible_heaps().count(), 0);

        let srv = pool.allocate_descriptor(ResourceKind::Srv).unwrap();
        assert_eq!(pool.shader_visible_heaps().count(), 1);
        assert!(srv.gpu_handle(0).is_some());
    }
}
