#![forbid(missing_docs)]

//! Growable descriptor view heaps for Direct3D 12 style backends.
//!
//! A [`ViewPool`] owns one [`ViewAllocator`] per descriptor heap type and
//! hands out reference-counted [`View`] ranges. Allocators never run out of
//! space: a full heap is replaced by a larger one, its occupied prefix is
//! copied over, and the old heap is retired through a [`DeletionQueue`] so
//! in-flight command lists can keep using views cut from it.
//!
//! [`ViewCreator`] writes concrete descriptors into allocated views, and
//! [`Resource`] tracks the binding capabilities and synchronization state of
//! the GPU memory those descriptors point at.
//!
//! Device access goes through the [`DescriptorDevice`] trait. The
//! [`HeadlessDevice`] backend records descriptors in memory; on Windows,
//! `D3D12Device` drives a native Direct3D 12 device.
mod allocator;
mod config;
mod deferred;
mod desc;
mod device;
mod error;
mod headless;
mod pool;
mod resource;
mod view;
mod view_creator;

#[cfg(windows)]
mod d3d12;

pub use allocator::*;
pub use config::*;
pub use deferred::*;
pub use desc::*;
pub use device::*;
pub use error::*;
pub use headless::*;
pub use pool::*;
pub use resource::*;
pub use view::*;
pub use view_creator::*;

#[cfg(windows)]
pub use d3d12::*;
