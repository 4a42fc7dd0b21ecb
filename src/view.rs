use crate::{CpuDescriptorHandle, GpuDescriptorHandle, HeapType};

#[cfg(feature = "triomphe")]
use triomphe::Arc;

#[cfg(not(feature = "triomphe"))]
use std::sync::Arc;

/// A shared reference to an allocated [`View`].
///
/// The view stays allocated for as long as any holder keeps a clone.
pub type ViewHandle = Arc<View>;

/// Base addresses of one heap generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HeapBases {
    /// Where descriptors are written. Always CPU-only.
    pub(crate) cpu: CpuDescriptorHandle,
    /// CPU address of the shader-visible copy, if the heap has one.
    pub(crate) visible_cpu: Option<CpuDescriptorHandle>,
    /// GPU address of the shader-visible copy.
    pub(crate) gpu: Option<GpuDescriptorHandle>,
}

/// A contiguous range of descriptor slots cut from one heap generation.
///
/// The heap's base addresses are captured when the view is issued. Growing
/// the allocator afterwards does not move the view: it keeps addressing the
/// heap it was cut from, which stays alive until its deferred release fires.
///
/// Descriptors are written at [`View::cpu_handle`], which always lies in a
/// CPU-only heap. Shader-visible views also have a [`View::visible_cpu_handle`]
/// that the written descriptors must be copied to before the GPU can use them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    heap_type: HeapType,
    generation: u64,
    bases: HeapBases,
    offset: usize,
    len: usize,
    increment_size: u32,
}

impl View {
    pub(crate) fn new(
        heap_type: HeapType,
        generation: u64,
        bases: HeapBases,
        offset: usize,
        len: usize,
        increment_size: u32,
    ) -> Self {
        View {
            heap_type,
            generation,
            bases,
            offset,
            len,
            increment_size,
        }
    }

    /// The CPU address of slot `sub_offset` within this range.
    ///
    /// ## Panics
    /// Panics if `sub_offset` is not less than [`View::len`].
    pub fn cpu_handle(&self, sub_offset: usize) -> CpuDescriptorHandle {
        self.check_bounds(sub_offset);
        self.bases
            .cpu
            .offset(self.offset + sub_offset, self.increment_size)
    }

    /// The CPU address of slot `sub_offset` in the shader-visible heap, if any.
    ///
    /// This is a copy destination only; it must never be read from.
    ///
    /// ## Panics
    /// Panics if `sub_offset` is not less than [`View::len`].
    pub fn visible_cpu_handle(&self, sub_offset: usize) -> Option<CpuDescriptorHandle> {
        self.check_bounds(sub_offset);
        self.bases
            .visible_cpu
            .map(|base| base.offset(self.offset + sub_offset, self.increment_size))
    }

    /// The GPU address of slot `sub_offset`, if the heap is shader-visible.
    ///
    /// ## Panics
    /// Panics if `sub_offset` is not less than [`View::len`].
    pub fn gpu_handle(&self, sub_offset: usize) -> Option<GpuDescriptorHandle> {
        self.check_bounds(sub_offset);
        self.bases
            .gpu
            .map(|base| base.offset(self.offset + sub_offset, self.increment_size))
    }

    /// The type of heap this view was allocated from.
    pub fn heap_type(&self) -> HeapType {
        self.heap_type
    }

    /// The generation of the heap this view was cut from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Index of the first slot within the heap.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of slots in the range.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the range is empty. Allocators never issue empty views.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The size in bytes of one slot.
    pub fn increment_size(&self) -> u32 {
        self.increment_size
    }

    fn check_bounds(&self, sub_offset: usize) {
        assert!(
            sub_offset < self.len,
            "descriptor index {sub_offset} is out of range for a {:?} view of {} slots",
            self.heap_type,
            self.len
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> View {
        View::new(
            HeapType::CbvSrvUav,
            3,
            HeapBases {
                cpu: CpuDescriptorHandle(0x1000),
                visible_cpu: Some(CpuDescriptorHandle(0x4000)),
                gpu: Some(GpuDescriptorHandle(0x8000_0000)),
            },
            4,
            2,
            32,
        )
    }

    #[test]
    fn cpu_handle_applies_range_offset_and_stride() {
        let view = view();
        assert_eq!(view.cpu_handle(0), CpuDescriptorHandle(0x1000 + 4 * 32));
        assert_eq!(view.cpu_handle(1), CpuDescriptorHandle(0x1000 + 5 * 32));
        assert_eq!(
            view.visible_cpu_handle(1),
            Some(CpuDescriptorHandle(0x4000 + 5 * 32))
        );
        assert_eq!(
            view.gpu_handle(1),
            Some(GpuDescriptorHandle(0x8000_0000 + 5 * 32))
        );
    }

    #[test]
    fn cpu_only_view_has_no_gpu_handle() {
        let bases = HeapBases {
            cpu: CpuDescriptorHandle(64),
            visible_cpu: None,
            gpu: None,
        };
        let view = View::new(HeapType::Rtv, 1, bases, 0, 1, 32);
        assert_eq!(view.gpu_handle(0), None);
        assert_eq!(view.visible_cpu_handle(0), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn indexing_past_the_range_panics() {
        view().cpu_handle(2);
    }
}
