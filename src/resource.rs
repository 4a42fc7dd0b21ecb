use std::fmt;
use std::sync::{Mutex, MutexGuard};

use bitvec::array::BitArray;
use bitvec::order::Lsb0;

use crate::{DescriptorDevice, Format, Result, SamplerDesc};

/// Row pitch alignment of texture upload buffers.
const TEXTURE_DATA_PITCH_ALIGNMENT: u64 = 256;

/// A role a resource can be bound in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindFlag {
    /// Vertex buffer input.
    VertexBuffer,
    /// Index buffer input.
    IndexBuffer,
    /// Shader resource view.
    ShaderResource,
    /// Unordered access view.
    UnorderedAccess,
    /// Render target view.
    RenderTarget,
    /// Depth stencil view.
    DepthStencil,
    /// Constant buffer view.
    ConstantBuffer,
}

impl BindFlag {
    /// Every bind flag, in bit order.
    pub const ALL: [BindFlag; 7] = [
        BindFlag::VertexBuffer,
        BindFlag::IndexBuffer,
        BindFlag::ShaderResource,
        BindFlag::UnorderedAccess,
        BindFlag::RenderTarget,
        BindFlag::DepthStencil,
        BindFlag::ConstantBuffer,
    ];

    fn bit(self) -> usize {
        self as usize
    }
}

/// The set of roles a resource was created to support.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BindFlags(BitArray<[u16; 1], Lsb0>);

impl BindFlags {
    /// A set with no roles.
    pub fn empty() -> Self {
        BindFlags(BitArray::new([0]))
    }

    /// Add `flag` to the set.
    pub fn insert(&mut self, flag: BindFlag) {
        self.0.set(flag.bit(), true);
    }

    /// Return the set with `flag` added.
    pub fn with(mut self, flag: BindFlag) -> Self {
        self.insert(flag);
        self
    }

    /// Whether `flag` is in the set.
    pub fn contains(&self, flag: BindFlag) -> bool {
        self.0[flag.bit()]
    }

    /// Whether the set has no roles.
    pub fn is_empty(&self) -> bool {
        self.0.not_any()
    }

    /// Iterate the roles in the set.
    pub fn iter(&self) -> impl Iterator<Item = BindFlag> + '_ {
        self.0.iter_ones().map(|bit| BindFlag::ALL[bit])
    }
}

impl Default for BindFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<BindFlag> for BindFlags {
    fn from_iter<I: IntoIterator<Item = BindFlag>>(iter: I) -> Self {
        iter.into_iter().fold(BindFlags::empty(), BindFlags::with)
    }
}

impl fmt::Debug for BindFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// The synchronization state a resource is configured for.
///
/// States are mutually exclusive; moving between them requires a barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResourceState {
    /// Default state, also used for presentation.
    #[default]
    Common,
    /// Read as a vertex or constant buffer.
    VertexAndConstantBuffer,
    /// Read as an index buffer.
    IndexBuffer,
    /// Written as a render target.
    RenderTarget,
    /// Read and written through an unordered access view.
    UnorderedAccess,
    /// Written as a depth buffer.
    DepthWrite,
    /// Read as a depth buffer.
    DepthRead,
    /// Read by any shader stage.
    ShaderResource,
    /// Destination of a copy.
    CopyDest,
    /// Source of a copy.
    CopySource,
    /// Upload heap state; readable by every read role.
    GenericRead,
}

/// A state change that must be recorded as a barrier before the next use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The state the resource was in.
    pub before: ResourceState,
    /// The state the next use requires.
    pub after: ResourceState,
}

/// The shape of a resource's memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceDimension {
    /// A linear buffer.
    Buffer,
    /// A 1D texture.
    Texture1D,
    /// A 2D texture.
    Texture2D,
    /// A 3D texture.
    Texture3D,
}

/// Description of a resource's memory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDesc {
    /// The shape of the resource.
    pub dimension: ResourceDimension,
    /// Width in texels, or size in bytes for buffers.
    pub width: u64,
    /// Height in texels.
    pub height: u32,
    /// Depth of a 3D texture, otherwise the number of array slices.
    pub depth_or_array_size: u16,
    /// Number of mip levels.
    pub mip_levels: u16,
    /// Texel format.
    pub format: Format,
    /// Samples per texel.
    pub sample_count: u32,
}

impl ResourceDesc {
    /// A buffer of `size` bytes.
    pub fn buffer(size: u64) -> Self {
        ResourceDesc {
            dimension: ResourceDimension::Buffer,
            width: size,
            height: 1,
            depth_or_array_size: 1,
            mip_levels: 1,
            format: Format::Unknown,
            sample_count: 1,
        }
    }

    /// A single-mip 2D texture.
    pub fn texture_2d(width: u64, height: u32, format: Format) -> Self {
        ResourceDesc {
            dimension: ResourceDimension::Texture2D,
            width,
            height,
            depth_or_array_size: 1,
            mip_levels: 1,
            format,
            sample_count: 1,
        }
    }

    /// Set the number of mip levels.
    pub fn with_mip_levels(mut self, mip_levels: u16) -> Self {
        self.mip_levels = mip_levels;
        self
    }

    /// Set the number of array slices, or the depth of a 3D texture.
    pub fn with_depth_or_array_size(mut self, depth_or_array_size: u16) -> Self {
        self.depth_or_array_size = depth_or_array_size;
        self
    }

    /// Set the sample count.
    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Number of array slices; always 1 for buffers and 3D textures.
    pub fn array_size(&self) -> u32 {
        match self.dimension {
            ResourceDimension::Buffer | ResourceDimension::Texture3D => 1,
            _ => u32::from(self.depth_or_array_size),
        }
    }

    /// Number of independently addressable subresources.
    pub fn subresource_count(&self) -> usize {
        match self.dimension {
            ResourceDimension::Buffer => 1,
            _ => usize::from(self.mip_levels) * self.array_size() as usize,
        }
    }

    /// Size in bytes of an upload buffer holding `subresource`.
    pub fn upload_size(&self, subresource: usize) -> u64 {
        if self.dimension == ResourceDimension::Buffer {
            return self.width;
        }

        let mip = (subresource % usize::from(self.mip_levels.max(1))) as u32;
        let width = (self.width >> mip).max(1);
        let height = u64::from((self.height >> mip).max(1));
        let depth = match self.dimension {
            ResourceDimension::Texture3D => u64::from((self.depth_or_array_size >> mip).max(1)),
            _ => 1,
        };

        let row_pitch = (width * u64::from(self.format.bytes_per_texel()))
            .next_multiple_of(TEXTURE_DATA_PITCH_ALIGNMENT);
        row_pitch * height * depth
    }
}

/// A GPU memory object with its capabilities and synchronization state.
///
/// Shared between the passes that use it; the state lives behind a lock so
/// every holder sees the latest transition.
pub struct Resource<D: DescriptorDevice> {
    name: String,
    raw: Option<D::Resource>,
    desc: ResourceDesc,
    bind_flags: BindFlags,
    stride: u32,
    sampler: Option<SamplerDesc>,
    state: Mutex<ResourceState>,
    upload: Mutex<Vec<Option<D::Resource>>>,
}

impl<D: DescriptorDevice> Resource<D> {
    /// Wrap a buffer. `stride` is the element size of structured buffers, or 0.
    pub fn buffer(name: &str, raw: D::Resource, size: u64, stride: u32, bind_flags: BindFlags) -> Self {
        Self::new(name, Some(raw), ResourceDesc::buffer(size), bind_flags, stride, None)
    }

    /// Wrap a texture.
    pub fn texture(name: &str, raw: D::Resource, desc: ResourceDesc, bind_flags: BindFlags) -> Self {
        Self::new(name, Some(raw), desc, bind_flags, 0, None)
    }

    /// A sampler. Samplers have no GPU memory and no state.
    pub fn sampler(name: &str, desc: SamplerDesc) -> Self {
        Self::new(name, None, ResourceDesc::buffer(0), BindFlags::empty(), 0, Some(desc))
    }

    fn new(
        name: &str,
        raw: Option<D::Resource>,
        desc: ResourceDesc,
        bind_flags: BindFlags,
        stride: u32,
        sampler: Option<SamplerDesc>,
    ) -> Self {
        Resource {
            name: name.to_owned(),
            raw,
            desc,
            bind_flags,
            stride,
            sampler,
            state: Mutex::new(ResourceState::Common),
            upload: Mutex::new(Vec::new()),
        }
    }

    /// Record the state the resource was created in.
    pub fn with_initial_state(self, state: ResourceState) -> Self {
        *self.lock_state() = state;
        self
    }

    /// Debug name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The native object, or `None` for samplers.
    pub fn raw(&self) -> Option<&D::Resource> {
        self.raw.as_ref()
    }

    /// Memory layout.
    pub fn desc(&self) -> &ResourceDesc {
        &self.desc
    }

    /// Allowed binding roles.
    pub fn bind_flags(&self) -> BindFlags {
        self.bind_flags
    }

    /// Size in bytes of a buffer.
    pub fn buffer_size(&self) -> u64 {
        self.desc.width
    }

    /// Element stride of a structured buffer, or 0.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// The sampler description of a sampler resource.
    pub fn sampler_desc(&self) -> Option<&SamplerDesc> {
        self.sampler.as_ref()
    }

    /// Assert that the resource may be bound as `flag`.
    ///
    /// ## Panics
    /// Panics if the resource was not created with `flag`.
    pub fn require(&self, flag: BindFlag) {
        assert!(
            self.bind_flags.contains(flag),
            "resource `{}` cannot be bound as {flag:?}, it only allows {:?}",
            self.name,
            self.bind_flags
        );
    }

    /// The current synchronization state.
    pub fn state(&self) -> ResourceState {
        *self.lock_state()
    }

    /// Move the tracked state to `required`.
    ///
    /// Returns the transition the caller must record as a barrier, or `None`
    /// if the resource is already in `required`.
    pub fn transition(&self, required: ResourceState) -> Option<Transition> {
        let mut state = self.lock_state();
        if *state == required {
            return None;
        }

        let transition = Transition {
            before: *state,
            after: required,
        };
        *state = required;
        tracing::trace!(resource = %self.name, ?transition, "resource state transition");
        Some(transition)
    }

    /// The upload buffer for `subresource`, created on first use.
    ///
    /// ## Panics
    /// Panics if `subresource` is out of range for this resource.
    pub fn upload_buffer(&self, device: &D, subresource: usize) -> Result<D::Resource> {
        let count = self.desc.subresource_count();
        assert!(
            subresource < count,
            "subresource {subresource} is out of range for `{}` with {count} subresources",
            self.name
        );

        let mut upload = self.upload.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if upload.len() < count {
            upload.resize(count, None);
        }

        if let Some(buffer) = &upload[subresource] {
            return Ok(buffer.clone());
        }

        let name = format!("{} upload {subresource}", self.name);
        let buffer = device.create_upload_buffer(&name, self.desc.upload_size(subresource))?;
        upload[subresource] = Some(buffer.clone());
        Ok(buffer)
    }

    fn lock_state(&self) -> MutexGuard<'_, ResourceState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<D: DescriptorDevice> fmt::Debug for Resource<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("desc", &self.desc)
            .field("bind_flags", &self.bind_flags)
            .field("state", &self.state())
            .finish()
    }
}
