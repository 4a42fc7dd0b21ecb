use crate::{HeapType, ShaderStage};

/// Error type for fatal device failures and rejected external input.
///
/// Contract violations by the caller (binding a capability a resource lacks,
/// indexing past the end of a view) are not represented here; they panic.
#[derive(Debug, thiserror::Error)]
pub enum ViewHeapError {
    /// The device failed to create a descriptor heap.
    #[error("Failed to create a {heap_type:?} descriptor heap with {capacity} descriptors: {reason}")]
    HeapCreation {
        /// The type of heap that was requested.
        heap_type: HeapType,
        /// The requested number of descriptors.
        capacity: usize,
        /// The backend's description of the failure.
        reason: String,
    },
    /// The device failed to create a resource, such as an upload buffer.
    #[error("Failed to create resource `{name}`: {reason}")]
    ResourceCreation {
        /// The debug name of the resource.
        name: String,
        /// The backend's description of the failure.
        reason: String,
    },
    /// A raw resource kind value did not name any known view kind.
    #[error("Unknown resource view kind {0}")]
    UnknownResourceKind(u32),
    /// Shader reflection has no binding with the requested name.
    #[error("Binding `{name}` was not found in the {stage:?} shader")]
    BindingNotFound {
        /// The shader stage that was queried.
        stage: ShaderStage,
        /// The binding name that was queried.
        name: String,
    },
    /// A view pool configuration could not be parsed.
    #[error("Invalid view pool configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ViewHeapError>;
