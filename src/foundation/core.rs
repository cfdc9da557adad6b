use crate::foundation::error::{VoxgridError, VoxgridResult};

pub use kurbo::{Point, Rect, Vec2};

/// 3-component vector for world-space positions and scales.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    /// x component.
    pub x: f64,
    /// y component.
    pub y: f64,
    /// z component.
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Construct from components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// All three components set to `v`.
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v, z: v }
    }
}

/// Per-node transform: translation plus non-uniform scale.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform3D {
    /// World-space translation.
    pub translate: Vec3,
    /// Per-axis scale; defaults to (1, 1, 1).
    pub scale: Vec3,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            translate: Vec3::ZERO,
            scale: Vec3::splat(1.0),
        }
    }
}

/// Lattice dimensions derived from a mask's aspect ratio: the dominant axis
/// equals the configured grid size, the other is rounded to match the ratio
/// with a floor of 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridDims {
    /// Lattice columns.
    pub width: u32,
    /// Lattice rows.
    pub height: u32,
}

impl GridDims {
    /// Derive dimensions from the mask's pixel aspect ratio. Rejects a zero
    /// grid size and degenerate images.
    pub fn derive(grid_size: u32, img_width: u32, img_height: u32) -> VoxgridResult<Self> {
        if grid_size == 0 {
            return Err(VoxgridError::validation("grid_size must be > 0"));
        }
        if img_width == 0 || img_height == 0 {
            return Err(VoxgridError::validation(
                "mask image must have non-zero dimensions",
            ));
        }

        let aspect = f64::from(img_width) / f64::from(img_height);
        let (width, height) = if aspect > 1.0 {
            let minor = (f64::from(grid_size) / aspect).round() as u32;
            (grid_size, minor.max(1))
        } else {
            let minor = (f64::from(grid_size) * aspect).round() as u32;
            (minor.max(1), grid_size)
        };

        Ok(Self { width, height })
    }

    /// Total lattice positions.
    pub fn cell_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

/// Straight (non-premultiplied) 8-bit RGB color, serialized as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Construct from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex string; the leading `#` is optional.
    pub fn from_hex(s: &str) -> VoxgridResult<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(VoxgridError::validation(format!(
                "color '{s}' is not of the form #rrggbb"
            )));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| {
                VoxgridError::validation(format!("color '{s}' has a non-hex channel"))
            })
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Per-channel linear interpolation, rounded to the nearest value.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
        }
    }
}

impl std::fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = VoxgridError;

    fn try_from(s: String) -> VoxgridResult<Self> {
        Self::from_hex(&s)
    }
}

impl From<Rgb8> for String {
    fn from(c: Rgb8) -> Self {
        c.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_dims_dominant_axis_matches_grid_size() {
        for (w, h) in [(2, 1), (1, 2), (640, 480), (480, 640), (100, 100), (7, 3)] {
            let dims = GridDims::derive(24, w, h).unwrap();
            assert_eq!(dims.width.max(dims.height), 24, "for {w}x{h}");
            assert!(dims.width >= 1 && dims.height >= 1);
        }
    }

    #[test]
    fn grid_dims_wide_mask() {
        let dims = GridDims::derive(4, 2, 1).unwrap();
        assert_eq!(dims, GridDims { width: 4, height: 2 });
    }

    #[test]
    fn grid_dims_square_mask_is_full_on_both_axes() {
        let dims = GridDims::derive(24, 512, 512).unwrap();
        assert_eq!(
            dims,
            GridDims {
                width: 24,
                height: 24
            }
        );
    }

    #[test]
    fn grid_dims_extreme_ratio_floors_minor_axis_at_one() {
        let dims = GridDims::derive(8, 1000, 1).unwrap();
        assert_eq!(dims, GridDims { width: 8, height: 1 });

        let dims = GridDims::derive(8, 1, 1000).unwrap();
        assert_eq!(dims, GridDims { width: 1, height: 8 });
    }

    #[test]
    fn grid_dims_rejects_degenerate_input() {
        assert!(GridDims::derive(0, 2, 2).is_err());
        assert!(GridDims::derive(4, 0, 2).is_err());
        assert!(GridDims::derive(4, 2, 0).is_err());
    }

    #[test]
    fn rgb8_hex_roundtrip() {
        let c = Rgb8::from_hex("#e19800").unwrap();
        assert_eq!(c, Rgb8::new(0xe1, 0x98, 0x00));
        assert_eq!(c.to_string(), "#e19800");
    }

    #[test]
    fn rgb8_rejects_malformed_hex() {
        assert!(Rgb8::from_hex("e198").is_err());
        assert!(Rgb8::from_hex("#gggggg").is_err());
        assert!(Rgb8::from_hex("#e1980000").is_err());
    }

    #[test]
    fn rgb8_lerp_endpoints_are_exact() {
        let a = Rgb8::new(0, 0, 0);
        let b = Rgb8::new(255, 128, 64);
        assert_eq!(Rgb8::lerp(a, b, 0.0), a);
        assert_eq!(Rgb8::lerp(a, b, 1.0), b);
    }
}
