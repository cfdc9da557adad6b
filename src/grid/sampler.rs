use image::RgbaImage;

use crate::foundation::{core::GridDims, error::VoxgridResult};

/// Low-resolution brightness rasterization of a mask image. Immutable after
/// creation.
///
/// Row 0 is the image's *bottom* row: the vertical flip aligns lattice rows
/// with world-space y (up), and downstream placement and UV mapping rely on
/// it. This is a fixed contract, not an artifact of the resampler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrightnessGrid {
    /// Lattice dimensions derived from the mask's aspect ratio.
    pub dims: GridDims,
    samples: Vec<u8>, // row-major, dims.width * dims.height
}

impl BrightnessGrid {
    /// Resample a decoded mask down to its derived lattice dimensions.
    /// Per-cell brightness is the unweighted mean of R, G and B (0-255);
    /// alpha is ignored.
    pub fn from_image(img: &RgbaImage, grid_size: u32) -> VoxgridResult<Self> {
        let dims = GridDims::derive(grid_size, img.width(), img.height())?;
        let small = image::imageops::resize(
            img,
            dims.width,
            dims.height,
            image::imageops::FilterType::Nearest,
        );

        let mut samples = vec![0u8; dims.cell_count()];
        for row in 0..dims.height {
            let src_row = dims.height - 1 - row;
            for col in 0..dims.width {
                let px = small.get_pixel(col, src_row);
                let sum = u16::from(px[0]) + u16::from(px[1]) + u16::from(px[2]);
                samples[(row * dims.width + col) as usize] = (sum / 3) as u8;
            }
        }

        Ok(Self { dims, samples })
    }

    /// Brightness at a lattice position; row 0 is the image bottom.
    pub fn sample(&self, col: u32, row: u32) -> u8 {
        debug_assert!(col < self.dims.width && row < self.dims.height);
        self.samples[(row * self.dims.width + col) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(width: u32, height: u32, gray: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba([gray, gray, gray, 255]))
    }

    #[test]
    fn wide_mask_keeps_grid_size_on_width() {
        let grid = BrightnessGrid::from_image(&solid_image(4, 2, 0), 4).unwrap();
        assert_eq!(grid.dims, GridDims { width: 4, height: 2 });
    }

    #[test]
    fn brightness_is_channel_mean() {
        let img = RgbaImage::from_pixel(1, 1, image::Rgba([30, 60, 90, 255]));
        let grid = BrightnessGrid::from_image(&img, 1).unwrap();
        assert_eq!(grid.sample(0, 0), 60);
    }

    #[test]
    fn row_zero_is_the_image_bottom_row() {
        // 1x2 image: top pixel black, bottom pixel white
        let mut img = solid_image(1, 2, 0);
        img.put_pixel(0, 1, image::Rgba([255, 255, 255, 255]));

        let grid = BrightnessGrid::from_image(&img, 2).unwrap();
        assert_eq!(grid.dims, GridDims { width: 1, height: 2 });
        assert_eq!(grid.sample(0, 0), 255); // bottom of the image
        assert_eq!(grid.sample(0, 1), 0); // top of the image
    }

    #[test]
    fn resampling_is_deterministic() {
        let mut img = solid_image(64, 32, 255);
        for x in 0..32 {
            for y in 0..32 {
                img.put_pixel(x, y, image::Rgba([0, 0, 0, 255]));
            }
        }

        let a = BrightnessGrid::from_image(&img, 8).unwrap();
        let b = BrightnessGrid::from_image(&img, 8).unwrap();
        assert_eq!(a, b);
    }
}
