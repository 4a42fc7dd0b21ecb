use std::sync::Arc as SharedArc;

use crate::deferred::DeferredRelease;
use crate::view::{HeapBases, View, ViewHandle};
use crate::{
    CpuDescriptorHandle, DescriptorDevice, GpuDescriptorHandle, HeapDesc, HeapType,
    RawDescriptorHeap, Result,
};

#[cfg(feature = "triomphe")]
use triomphe::Arc;

#[cfg(not(feature = "triomphe"))]
use std::sync::Arc;

struct LiveHeap<H> {
    /// The heap bound to command lists.
    raw: H,
    /// CPU-only twin of a shader-visible `raw`, holding the authoritative descriptors.
    staging: Option<H>,
    bases: HeapBases,
}

/// A growable descriptor heap of one heap type.
///
/// Slots are handed out from a monotonically advancing offset and never
/// reused. When a request does not fit, a larger heap is created, the
/// occupied prefix is copied into it, and the old heap is handed to the
/// deferred release queue. Views issued before the growth keep addressing
/// the old heap.
///
/// Shader-visible allocators pair each heap with a CPU-only staging heap.
/// Descriptors are written into the staging heap and copied forward into the
/// visible one, so no copy ever reads from shader-visible memory.
///
/// The allocator performs no locking; callers serialize access.
pub struct ViewAllocator<D: DescriptorDevice> {
    device: D,
    deleter: SharedArc<dyn DeferredRelease>,
    heap_type: HeapType,
    shader_visible: bool,
    increment_size: u32,
    heap: Option<LiveHeap<D::Heap>>,
    capacity: usize,
    next_free: usize,
    generation: u64,
}

impl<D: DescriptorDevice> ViewAllocator<D> {
    /// Create an empty allocator. No heap exists until the first allocation.
    pub fn new(
        device: D,
        deleter: SharedArc<dyn DeferredRelease>,
        heap_type: HeapType,
        shader_visible: bool,
    ) -> Self {
        let increment_size = device.descriptor_increment_size(heap_type);
        ViewAllocator {
            device,
            deleter,
            heap_type,
            shader_visible,
            increment_size,
            heap: None,
            capacity: 0,
            next_free: 0,
            generation: 0,
        }
    }

    /// Allocate `count` contiguous, never-before-issued slots.
    ///
    /// Grows the heap to `max(next_free + count, 2 * (capacity + 1))` slots
    /// when the request does not fit.
    ///
    /// ## Panics
    /// Panics if `count` is zero.
    pub fn allocate(&mut self, count: usize) -> Result<ViewHandle> {
        assert!(count > 0, "cannot allocate an empty {:?} view", self.heap_type);

        let required = self.next_free + count;
        if required > self.capacity {
            self.grow(required.max(2 * (self.capacity + 1)))?;
        }

        let Some(heap) = self.heap.as_ref() else {
            unreachable!("a heap with non-zero capacity must exist after growing")
        };

        let offset = self.next_free;
        self.next_free = required;

        tracing::trace!(
            heap_type = ?self.heap_type,
            offset,
            count,
            generation = self.generation,
            "allocated descriptor range"
        );

        Ok(Arc::new(View::new(
            self.heap_type,
            self.generation,
            heap.bases,
            offset,
            count,
            self.increment_size,
        )))
    }

    /// Grow the heap to at least `capacity` slots. Never shrinks.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity > self.capacity {
            self.grow(capacity)?;
        }
        Ok(())
    }

    fn create_heap(&self, capacity: usize) -> Result<LiveHeap<D::Heap>> {
        let raw = self.device.create_descriptor_heap(&HeapDesc {
            heap_type: self.heap_type,
            capacity,
            shader_visible: self.shader_visible,
        })?;
        let staging = if self.shader_visible {
            Some(self.device.create_descriptor_heap(&HeapDesc {
                heap_type: self.heap_type,
                capacity,
                shader_visible: false,
            })?)
        } else {
            None
        };

        let bases = match &staging {
            Some(staging) => HeapBases {
                cpu: staging.cpu_start(),
                visible_cpu: Some(raw.cpu_start()),
                gpu: raw.gpu_start(),
            },
            None => HeapBases {
                cpu: raw.cpu_start(),
                visible_cpu: None,
                gpu: raw.gpu_start(),
            },
        };
        Ok(LiveHeap { raw, staging, bases })
    }

    fn grow(&mut self, capacity: usize) -> Result<()> {
        let heap = self.create_heap(capacity)?;

        if let Some(old) = self.heap.take() {
            if self.next_free > 0 {
                // SAFETY: all heaps involved are alive and of this allocator's
                // type, `[0, next_free)` lies within the old capacity, which is
                // smaller than the new one, and both sources are CPU-only heaps.
                unsafe {
                    self.device.copy_descriptors_simple(
                        self.next_free,
                        heap.bases.cpu,
                        old.bases.cpu,
                        self.heap_type,
                    );
                    if let Some(visible) = heap.bases.visible_cpu {
                        self.device.copy_descriptors_simple(
                            self.next_free,
                            visible,
                            heap.bases.cpu,
                            self.heap_type,
                        );
                    }
                }
            }

            // Command lists in flight may still reference the old heap.
            self.deleter.query_on_delete(Box::new((old.raw, old.staging)));
        }

        tracing::debug!(
            heap_type = ?self.heap_type,
            old_capacity = self.capacity,
            new_capacity = capacity,
            copied = self.next_free,
            generation = self.generation + 1,
            "grew descriptor heap"
        );

        self.heap = Some(heap);
        self.capacity = capacity;
        self.generation += 1;
        Ok(())
    }

    /// The heap type this allocator serves.
    pub fn heap_type(&self) -> HeapType {
        self.heap_type
    }

    /// Whether the heap is shader-visible.
    pub fn is_shader_visible(&self) -> bool {
        self.shader_visible
    }

    /// Number of slots in the current heap.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots issued so far.
    pub fn allocated(&self) -> usize {
        self.next_free
    }

    /// The generation of the current heap. Zero before the first heap exists.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `view` was cut from the current heap rather than a retired one.
    pub fn is_current(&self, view: &View) -> bool {
        view.heap_type() == self.heap_type && view.generation() == self.generation
    }

    /// The CPU address of the current heap's first slot, where descriptors are written.
    pub fn heap_start(&self) -> Option<CpuDescriptorHandle> {
        self.heap.as_ref().map(|heap| heap.bases.cpu)
    }

    /// The CPU address of the current shader-visible heap's first slot.
    pub fn visible_heap_start(&self) -> Option<CpuDescriptorHandle> {
        self.heap.as_ref().and_then(|heap| heap.bases.visible_cpu)
    }

    /// The GPU address of the current shader-visible heap's first slot.
    pub fn gpu_heap_start(&self) -> Option<GpuDescriptorHandle> {
        self.heap.as_ref().and_then(|heap| heap.bases.gpu)
    }

    /// The current native heap, if one has been created.
    pub fn raw_heap(&self) -> Option<&D::Heap> {
        self.heap.as_ref().map(|heap| &heap.raw)
    }
}
