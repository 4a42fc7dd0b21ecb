use serde::{Deserialize, Serialize};

use crate::{HeapType, Result};

/// Configuration of one view heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeapConfig {
    /// Number of slots to create the heap with. Zero defers creation to the
    /// first allocation.
    #[serde(default)]
    pub initial_capacity: usize,

    /// Whether the heap is shader-visible. When unset, only the resource heap
    /// is. Render target and depth stencil heaps are never shader-visible.
    #[serde(default)]
    pub shader_visible: Option<bool>,
}

/// Configuration of the four heaps of a [`ViewPool`](crate::ViewPool).
///
/// ```toml
/// [resource]
/// initial_capacity = 1024
///
/// [render_target]
/// initial_capacity = 16
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewPoolConfig {
    /// The shared shader resource, unordered access and constant buffer heap.
    #[serde(default)]
    pub resource: HeapConfig,

    /// The sampler heap.
    #[serde(default)]
    pub sampler: HeapConfig,

    /// The render target heap.
    #[serde(default)]
    pub render_target: HeapConfig,

    /// The depth stencil heap.
    #[serde(default)]
    pub depth_stencil: HeapConfig,
}

impl ViewPoolConfig {
    /// Parse a configuration from TOML. Missing tables and keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// The configuration of the heap of `heap_type`.
    pub fn heap(&self, heap_type: HeapType) -> HeapConfig {
        match heap_type {
            HeapType::CbvSrvUav => self.resource,
            HeapType::Sampler => self.sampler,
            HeapType::Rtv => self.render_target,
            HeapType::Dsv => self.depth_stencil,
        }
    }

    /// Whether the heap of `heap_type` is created shader-visible.
    pub fn shader_visible(&self, heap_type: HeapType) -> bool {
        let requested = self
            .heap(heap_type)
            .shader_visible
            .unwrap_or(heap_type == HeapType::CbvSrvUav);

        if requested && !heap_type.supports_shader_visibility() {
            tracing::warn!(?heap_type, "heap type cannot be shader-visible, ignoring");
            return false;
        }
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_make_only_the_resource_heap_shader_visible() {
        let config = ViewPoolConfig::default();
        assert!(config.shader_visible(HeapType::CbvSrvUav));
        assert!(!config.shader_visible(HeapType::Sampler));
        assert!(!config.shader_visible(HeapType::Rtv));
        assert!(!config.shader_visible(HeapType::Dsv));
        assert!(HeapType::ALL
            .iter()
            .all(|ty| config.heap(*ty).initial_capacity == 0));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ViewPoolConfig::from_toml_str(
            r#"
            [resource]
            initial_capacity = 64

            [render_target]
            initial_capacity = 16

            [sampler]
            shader_visible = true
            "#,
        )
        .unwrap();

        assert_eq!(config.resource.initial_capacity, 64);
        assert!(config.shader_visible(HeapType::CbvSrvUav));
        assert_eq!(config.render_target.initial_capacity, 16);
        assert!(!config.shader_visible(HeapType::Rtv));
        assert!(config.shader_visible(HeapType::Sampler));
        assert_eq!(config.depth_stencil, HeapConfig::default());
    }

    #[test]
    fn render_target_heaps_are_never_shader_visible() {
        let config = ViewPoolConfig::from_toml_str("[render_target]\nshader_visible = true").unwrap();
        assert!(!config.shader_visible(HeapType::Rtv));
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let err = ViewPoolConfig::from_toml_str("[resource]\ninitial_capacity = \"lots\"");
        assert!(matches!(err, Err(crate::ViewHeapError::Config(_))));
    }
}
