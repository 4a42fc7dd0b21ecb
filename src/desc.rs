//! Backend-neutral view descriptions.

/// Texel and element formats understood by the view creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// No format; used for structured and raw buffers.
    #[default]
    Unknown,
    /// 8-bit RGBA, normalized.
    Rgba8Unorm,
    /// 8-bit RGBA, normalized, sRGB encoded.
    Rgba8UnormSrgb,
    /// 8-bit BGRA, normalized.
    Bgra8Unorm,
    /// 16-bit float RGBA.
    Rgba16Float,
    /// 32-bit float RGBA.
    Rgba32Float,
    /// 32-bit float RGB.
    Rgb32Float,
    /// 32-bit float RG.
    Rg32Float,
    /// 32-bit float R.
    R32Float,
    /// 32-bit unsigned R.
    R32Uint,
    /// 16-bit unsigned R.
    R16Uint,
    /// 16-bit normalized R.
    R16Unorm,
    /// 32-bit typeless R, the usual backing of a 32-bit depth buffer.
    R32Typeless,
    /// 32-bit float depth.
    D32Float,
    /// 24/8-bit typeless, the usual backing of a depth-stencil buffer.
    R24G8Typeless,
    /// 24-bit depth and 8-bit stencil.
    D24UnormS8Uint,
    /// 24-bit depth readable as a shader resource.
    R24UnormX8Typeless,
    /// 16-bit typeless R.
    R16Typeless,
    /// 16-bit depth.
    D16Unorm,
}

impl Format {
    /// The format to use when a resource of this format is read by a shader.
    ///
    /// Typeless and depth formats are remapped to their readable counterparts.
    pub fn srv_format(self) -> Format {
        match self {
            Format::R32Typeless | Format::D32Float => Format::R32Float,
            Format::R24G8Typeless | Format::D24UnormS8Uint => Format::R24UnormX8Typeless,
            Format::R16Typeless | Format::D16Unorm => Format::R16Unorm,
            other => other,
        }
    }

    /// Size in bytes of one texel. Unknown formats count as bytes.
    pub fn bytes_per_texel(self) -> u32 {
        match self {
            Format::Unknown => 1,
            Format::R16Uint | Format::R16Unorm | Format::R16Typeless | Format::D16Unorm => 2,
            Format::Rgba16Float | Format::Rg32Float => 8,
            Format::Rgb32Float => 12,
            Format::Rgba32Float => 16,
            _ => 4,
        }
    }

    /// The format to use when a resource of this format is bound as depth-stencil.
    pub fn dsv_format(self) -> Format {
        match self {
            Format::R32Typeless => Format::D32Float,
            Format::R24G8Typeless => Format::D24UnormS8Uint,
            Format::R16Typeless => Format::D16Unorm,
            other => other,
        }
    }
}

/// Dimension of a shader resource view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SrvDimension {
    /// A typed, structured or raw buffer.
    Buffer {
        /// Index of the first element.
        first_element: u64,
        /// Number of elements in the view.
        num_elements: u32,
        /// Stride of a structured buffer, or 0 for typed buffers.
        structure_byte_stride: u32,
    },
    /// A 1D texture.
    Texture1D {
        /// Number of mip levels visible to the shader.
        mip_levels: u32,
    },
    /// A 2D texture.
    Texture2D {
        /// Number of mip levels visible to the shader.
        mip_levels: u32,
    },
    /// An array of 2D textures.
    Texture2DArray {
        /// Number of mip levels visible to the shader.
        mip_levels: u32,
        /// Number of array slices.
        array_size: u32,
    },
    /// A multisampled 2D texture.
    Texture2DMs,
    /// A 3D texture.
    Texture3D {
        /// Number of mip levels visible to the shader.
        mip_levels: u32,
    },
    /// A cube texture.
    TextureCube {
        /// Number of mip levels visible to the shader.
        mip_levels: u32,
    },
}

/// A shader resource view description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderResourceViewDesc {
    /// The view format.
    pub format: Format,
    /// The view dimension.
    pub dimension: SrvDimension,
}

/// Dimension of an unordered access view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UavDimension {
    /// A typed, structured or raw buffer.
    Buffer {
        /// Index of the first element.
        first_element: u64,
        /// Number of elements in the view.
        num_elements: u32,
        /// Stride of a structured buffer, or 0 for typed buffers.
        structure_byte_stride: u32,
    },
    /// A 1D texture.
    Texture1D {
        /// The mip level to write.
        mip_slice: u32,
    },
    /// A 2D texture.
    Texture2D {
        /// The mip level to write.
        mip_slice: u32,
    },
    /// An array of 2D textures.
    Texture2DArray {
        /// The mip level to write.
        mip_slice: u32,
        /// Number of array slices.
        array_size: u32,
    },
    /// A 3D texture.
    Texture3D {
        /// The mip level to write.
        mip_slice: u32,
        /// Number of depth slices.
        w_size: u32,
    },
}

/// An unordered access view description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnorderedAccessViewDesc {
    /// The view format.
    pub format: Format,
    /// The view dimension.
    pub dimension: UavDimension,
}

/// A constant buffer view description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantBufferViewDesc {
    /// GPU virtual address of the buffer.
    pub buffer_location: u64,
    /// Size of the view, aligned to 256 bytes.
    pub size_in_bytes: u32,
}

impl ConstantBufferViewDesc {
    /// Required alignment of constant buffer views.
    pub const ALIGNMENT: u32 = 256;

    /// Largest size a constant buffer view may cover.
    pub const MAX_SIZE: u32 = 65536;

    /// Describe a constant buffer view, rounding `size` up to the required alignment.
    ///
    /// ## Panics
    /// Panics if `size` exceeds [`ConstantBufferViewDesc::MAX_SIZE`].
    pub fn new(buffer_location: u64, size: u32) -> Self {
        assert!(
            size <= Self::MAX_SIZE,
            "a constant buffer view of {size} bytes exceeds the {}-byte limit",
            Self::MAX_SIZE
        );
        ConstantBufferViewDesc {
            buffer_location,
            size_in_bytes: size.next_multiple_of(Self::ALIGNMENT),
        }
    }
}

/// Texture filtering mode of a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Point sampling for minification, magnification and mips.
    Point,
    /// Linear sampling for minification, magnification and mips.
    Linear,
    /// Anisotropic sampling.
    #[default]
    Anisotropic,
    /// Point sampling with comparison.
    ComparisonPoint,
    /// Linear sampling with comparison.
    ComparisonLinear,
    /// Anisotropic sampling with comparison.
    ComparisonAnisotropic,
}

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    /// Tile the texture.
    #[default]
    Wrap,
    /// Tile the texture, mirroring every other tile.
    Mirror,
    /// Clamp to the edge texel.
    Clamp,
    /// Use the border color.
    Border,
}

/// Comparison used by comparison samplers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparisonFunc {
    /// Never pass.
    #[default]
    Never,
    /// Pass if source is less than destination.
    Less,
    /// Pass if equal.
    Equal,
    /// Pass if less or equal.
    LessEqual,
    /// Pass if greater.
    Greater,
    /// Pass if not equal.
    NotEqual,
    /// Pass if greater or equal.
    GreaterEqual,
    /// Always pass.
    Always,
}

/// A sampler description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerDesc {
    /// Filtering mode.
    pub filter: Filter,
    /// Addressing along U.
    pub address_u: AddressMode,
    /// Addressing along V.
    pub address_v: AddressMode,
    /// Addressing along W.
    pub address_w: AddressMode,
    /// Bias added to the computed mip level.
    pub mip_lod_bias: f32,
    /// Anisotropy clamp, used with anisotropic filters.
    pub max_anisotropy: u32,
    /// Comparison used by comparison filters.
    pub comparison_func: ComparisonFunc,
    /// Border color used with [`AddressMode::Border`].
    pub border_color: [f32; 4],
    /// Lowest mip level to sample.
    pub min_lod: f32,
    /// Highest mip level to sample.
    pub max_lod: f32,
}

impl Default for SamplerDesc {
    fn default() -> Self {
        SamplerDesc {
            filter: Filter::Anisotropic,
            address_u: AddressMode::Wrap,
            address_v: AddressMode::Wrap,
            address_w: AddressMode::Wrap,
            mip_lod_bias: 0.0,
            max_anisotropy: 16,
            comparison_func: ComparisonFunc::Never,
            border_color: [0.0; 4],
            min_lod: 0.0,
            max_lod: f32::MAX,
        }
    }
}

/// Dimension of a render target or depth stencil view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentDimension {
    /// A 2D texture.
    Texture2D {
        /// The mip level to render into.
        mip_slice: u32,
    },
    /// A multisampled 2D texture.
    Texture2DMs,
    /// An array of 2D textures.
    Texture2DArray {
        /// The mip level to render into.
        mip_slice: u32,
        /// Number of array slices.
        array_size: u32,
    },
}

/// A render target view description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetViewDesc {
    /// The view format.
    pub format: Format,
    /// The view dimension.
    pub dimension: AttachmentDimension,
}

/// A depth stencil view description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilViewDesc {
    /// The view format, always a depth format.
    pub format: Format,
    /// The view dimension.
    pub dimension: AttachmentDimension,
}
