//! Texture images and the trait for turning them into host textures.

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering::SeqCst};

use crate::MeshError;

/// Color data of one texel, as `[R, G, B, A]`.
pub type Texel = [u8; 4];

/// Layout of the bytes of a [`TextureImage`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[expect(clippy::exhaustive_enums)]
pub enum PixelEncoding {
    /// Three bytes per pixel: red, green, blue.
    Rgb8,
    /// Four bytes per pixel: red, green, blue, alpha.
    Rgba8,
    /// An encoding this crate does not understand. The pixels are kept as they are and the
    /// texture allocator decides what to do with them.
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl PixelEncoding {
    /// Parses an encoding name such as `"rgb8"` or `"rgba8"`.
    ///
    /// Unrecognized names are not an error; they produce [`PixelEncoding::Unknown`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "rgb8" => Self::Rgb8,
            "rgba8" => Self::Rgba8,
            _ => {
                log::warn!("unknown texture encoding {name:?}");
                Self::Unknown
            }
        }
    }

    /// Number of bytes making up one pixel, if known.
    pub const fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            Self::Rgb8 => Some(3),
            Self::Rgba8 => Some(4),
            Self::Unknown => None,
        }
    }
}

/// A decoded texture image as delivered by a texture update.
///
/// Rows are stored top to bottom, each `row_stride` bytes apart.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawImage"))]
pub struct TextureImage {
    width: u32,
    height: u32,
    row_stride: usize,
    encoding: PixelEncoding,
    pixels: Vec<u8>,
}

impl TextureImage {
    /// Wraps pixel data, checking that it is large enough for the stated dimensions.
    ///
    /// Fails with [`MeshError::CardinalityMismatch`] if a row is too short for `width` pixels
    /// or `pixels` is shorter than `height * row_stride`. Rows of an
    /// [`Unknown`](PixelEncoding::Unknown) encoding are assumed to be the right length.
    pub fn new(
        width: u32,
        height: u32,
        row_stride: usize,
        encoding: PixelEncoding,
        pixels: Vec<u8>,
    ) -> Result<Self, MeshError> {
        if let Some(bpp) = encoding.bytes_per_pixel() {
            let row_len = (width as usize).saturating_mul(bpp);
            if row_stride < row_len {
                return Err(MeshError::CardinalityMismatch {
                    what: "bytes per image row",
                    expected: row_len,
                    actual: row_stride,
                });
            }
        }
        // An unrepresentable size can never be satisfied by the pixels provided.
        let required = (height as usize)
            .checked_mul(row_stride)
            .unwrap_or(usize::MAX);
        if pixels.len() < required {
            return Err(MeshError::CardinalityMismatch {
                what: "image bytes",
                expected: required,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            row_stride,
            encoding,
            pixels,
        })
    }

    /// Creates an image with tightly packed rows.
    pub fn packed(
        width: u32,
        height: u32,
        encoding: PixelEncoding,
        pixels: Vec<u8>,
    ) -> Result<Self, MeshError> {
        let bpp = encoding.bytes_per_pixel().unwrap_or(1);
        Self::new(width, height, width as usize * bpp, encoding, pixels)
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Distance in bytes between the starts of consecutive rows.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Layout of the pixel bytes.
    #[inline]
    pub fn encoding(&self) -> PixelEncoding {
        self.encoding
    }

    /// All pixel bytes, including any row padding.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the bytes of row `y`, without padding if the encoding is known.
    ///
    /// Panics if `y` is out of bounds.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let start = y as usize * self.row_stride;
        let len = match self.encoding.bytes_per_pixel() {
            Some(bpp) => self.width as usize * bpp,
            None => self.row_stride,
        };
        &self.pixels[start..start + len]
    }

    /// Converts the image to tightly packed RGBA texels, top row first.
    ///
    /// Returns [`None`] if the encoding is [`PixelEncoding::Unknown`].
    pub fn to_rgba8(&self) -> Option<Vec<Texel>> {
        let bpp = self.encoding.bytes_per_pixel()?;
        let mut texels = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            texels.extend(
                self.row(y)
                    .chunks_exact(bpp)
                    .map(|p| [p[0], p[1], p[2], p.get(3).copied().unwrap_or(u8::MAX)]),
            );
        }
        Some(texels)
    }
}

impl fmt::Debug for TextureImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Don't print the pixels.
        f.debug_struct("TextureImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_stride", &self.row_stride)
            .field("encoding", &self.encoding)
            .field("pixels", &format_args!("[{} bytes]", self.pixels.len()))
            .finish()
    }
}

/// Unvalidated form of [`TextureImage`] used for deserialization.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawImage {
    width: u32,
    height: u32,
    row_stride: usize,
    encoding: PixelEncoding,
    pixels: Vec<u8>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawImage> for TextureImage {
    type Error = MeshError;
    fn try_from(raw: RawImage) -> Result<Self, Self::Error> {
        Self::new(
            raw.width,
            raw.height,
            raw.row_stride,
            raw.encoding,
            raw.pixels,
        )
    }
}

/// Creator of host textures from [`TextureImage`]s.
/// Implement this trait using the target graphics API's 2D texture type.
///
/// Textures are released by dropping every clone of the returned handle.
pub trait Allocator {
    /// Texture handles produced by this allocator.
    type Texture: Clone;

    /// Creates a texture holding `image`, for use by the material groups of texture slot
    /// `slot`.
    ///
    /// Returns [`None`] if no more textures can be created. The mesh then gives up on its
    /// current contents; see [`MeshError::ResourceExhausted`].
    fn allocate(&self, slot: usize, image: &TextureImage) -> Option<Self::Texture>;
}

impl<T: Allocator> Allocator for &T {
    type Texture = T::Texture;
    #[mutants::skip] // trivial
    fn allocate(&self, slot: usize, image: &TextureImage) -> Option<Self::Texture> {
        <T as Allocator>::allocate(self, slot, image)
    }
}
impl<T: Allocator> Allocator for Arc<T> {
    type Texture = T::Texture;
    #[mutants::skip] // trivial
    fn allocate(&self, slot: usize, image: &TextureImage) -> Option<Self::Texture> {
        <T as Allocator>::allocate(self, slot, image)
    }
}
impl<T: Allocator> Allocator for std::rc::Rc<T> {
    type Texture = T::Texture;
    #[mutants::skip] // trivial
    fn allocate(&self, slot: usize, image: &TextureImage) -> Option<Self::Texture> {
        <T as Allocator>::allocate(self, slot, image)
    }
}

/// [`Allocator`] which keeps no pixels, only counting allocations; for testing.
///
/// This type is public so that it may be used in benchmarks and such, but not intended to be used
/// outside of this crate.
#[doc(hidden)]
#[derive(Debug)]
pub struct TestAllocator {
    capacity: usize,
    count_allocated: AtomicUsize,
    live: Arc<AtomicUsize>,
}

impl TestAllocator {
    pub fn new() -> Self {
        Self {
            capacity: usize::MAX,
            count_allocated: AtomicUsize::new(0),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail after allocating this many textures. (Does not count deallocations.)
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Number of textures allocated. Does not decrement for deallocations.
    pub fn count_allocated(&self) -> usize {
        self.count_allocated.load(SeqCst)
    }

    /// Number of textures allocated whose handles have not all been dropped.
    pub fn count_live(&self) -> usize {
        self.live.load(SeqCst)
    }
}

impl Default for TestAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocator for TestAllocator {
    type Texture = TestTexture;

    fn allocate(&self, slot: usize, image: &TextureImage) -> Option<Self::Texture> {
        self.count_allocated
            .fetch_update(SeqCst, SeqCst, |count| {
                if count < self.capacity {
                    Some(count + 1)
                } else {
                    None
                }
            })
            .ok()?;
        self.live.fetch_add(1, SeqCst);
        Some(TestTexture {
            slot,
            size: [image.width(), image.height()],
            live: Arc::new(LiveToken(self.live.clone())),
        })
    }
}

/// Texture type for [`TestAllocator`].
///
/// Clones are the same texture and compare equal; separately allocated textures do not.
#[derive(Clone, Debug)]
#[doc(hidden)]
pub struct TestTexture {
    pub slot: usize,
    pub size: [u32; 2],
    live: Arc<LiveToken>,
}

impl PartialEq for TestTexture {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.live, &other.live)
    }
}

impl Eq for TestTexture {}

/// Decrements the live count of a [`TestAllocator`] when the last [`TestTexture`] clone
/// is dropped.
#[derive(Debug)]
struct LiveToken(Arc<AtomicUsize>);

impl Drop for LiveToken {
    fn drop(&mut self) {
        self.0.fetch_sub(1, SeqCst);
    }
}
