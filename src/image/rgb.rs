//! Owned 3-channel 8-bit image used for camera frames and render canvases.
//!
//! Pixels are stored as `[u8; 3]` in RGB order, row-major, stride == width.

pub type Rgb = [u8; 3];

#[derive(Clone, Debug, PartialEq)]
pub struct RgbImageU8 {
    width: usize,
    height: usize,
    data: Vec<Rgb>,
}

impl RgbImageU8 {
    /// Black image of size `width × height`.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, [0, 0, 0])
    }

    pub fn filled(width: usize, height: usize, value: Rgb) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Build from interleaved `RGBRGB...` bytes; `None` when the length does not match.
    pub fn from_interleaved(width: usize, height: usize, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != width * height * 3 {
            return None;
        }
        let data = bytes.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn to_interleaved(&self) -> Vec<u8> {
        self.data.iter().flatten().copied().collect()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: Rgb) {
        self.data[y * self.width + x] = v;
    }

    /// Blank image with the same dimensions.
    pub fn blank_like(&self) -> Self {
        Self::new(self.width, self.height)
    }
}

impl crate::image::traits::ImageView for RgbImageU8 {
    type Pixel = Rgb;

    #[inline]
    fn width(&self) -> usize {
        self.width
    }
    #[inline]
    fn height(&self) -> usize {
        self.height
    }
    #[inline]
    fn stride(&self) -> usize {
        self.width
    }
    #[inline]
    fn row(&self, y: usize) -> &[Rgb] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[Rgb]> {
        Some(&self.data)
    }
}

impl crate::image::traits::ImageViewMut for RgbImageU8 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [Rgb] {
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }
}
