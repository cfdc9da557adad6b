use crate::foundation::error::{VoxgridError, VoxgridResult};

/// Decode encoded image bytes into straight RGBA8. Brightness sampling reads
/// plain channel values, so no premultiplication happens here.
pub fn decode_image(bytes: &[u8]) -> VoxgridResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| VoxgridError::asset_load(format!("decode mask image: {e}")))?;
    Ok(dyn_img.to_rgba8())
}
