use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
};

use crate::{
    assets::decode,
    foundation::error::{VoxgridError, VoxgridResult},
};

/// Opaque reference to a continuously-updating video texture. Actual decoding
/// and playback belong to the renderer; the core only threads the handle
/// through to the grid that shares it across all of its cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoHandle {
    /// Normalized source reference, as resolved by the [`AssetSource`].
    pub source: String,
}

/// Asset decode capability. Implementations resolve a source reference to
/// decoded mask pixels or a video handle, failing with
/// [`VoxgridError::AssetLoad`] so one bad asset never takes down the others.
pub trait AssetSource {
    /// Resolve and decode a mask image.
    fn load_image(&self, source: &str) -> VoxgridResult<image::RgbaImage>;
    /// Resolve a video reference into an opaque handle.
    fn open_video(&self, source: &str) -> VoxgridResult<VideoHandle>;
}

/// Normalize a relative asset path: backslashes become slashes, absolute
/// paths and `..` components are rejected so a config cannot escape the
/// asset root.
pub fn normalize_rel_path(path: &str) -> VoxgridResult<String> {
    let norm = path.replace('\\', "/");
    if norm.is_empty() {
        return Err(VoxgridError::validation("asset path must be non-empty"));
    }
    if norm.starts_with('/') {
        return Err(VoxgridError::validation(format!(
            "asset path '{path}' must be relative"
        )));
    }
    if norm.split('/').any(|part| part == "..") {
        return Err(VoxgridError::validation(format!(
            "asset path '{path}' must not traverse upward"
        )));
    }
    Ok(norm)
}

/// Filesystem-backed asset source rooted at a directory (typically the
/// directory containing the scene config).
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    /// Source resolving all references relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, source: &str) -> VoxgridResult<PathBuf> {
        let rel = normalize_rel_path(source)?;
        Ok(self.root.join(rel))
    }
}

impl AssetSource for FsAssetSource {
    fn load_image(&self, source: &str) -> VoxgridResult<image::RgbaImage> {
        let path = self.resolve(source)?;
        let bytes = std::fs::read(&path)
            .map_err(|e| VoxgridError::asset_load(format!("read '{}': {e}", path.display())))?;
        decode::decode_image(&bytes)
    }

    fn open_video(&self, source: &str) -> VoxgridResult<VideoHandle> {
        let path = self.resolve(source)?;
        if !path.is_file() {
            return Err(VoxgridError::asset_load(format!(
                "video '{}' not found",
                path.display()
            )));
        }
        Ok(VideoHandle {
            source: normalize_rel_path(source)?,
        })
    }
}

/// In-memory asset source for tests and headless examples.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    images: HashMap<String, Vec<u8>>,
    videos: HashSet<String>,
}

impl MemoryAssetSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an encoded image under `name`.
    pub fn insert_image(&mut self, name: impl Into<String>, encoded: Vec<u8>) {
        self.images.insert(name.into(), encoded);
    }

    /// Register a video reference under `name`.
    pub fn insert_video(&mut self, name: impl Into<String>) {
        self.videos.insert(name.into());
    }
}

impl AssetSource for MemoryAssetSource {
    fn load_image(&self, source: &str) -> VoxgridResult<image::RgbaImage> {
        let bytes = self
            .images
            .get(source)
            .ok_or_else(|| VoxgridError::asset_load(format!("image '{source}' not found")))?;
        decode::decode_image(bytes)
    }

    fn open_video(&self, source: &str) -> VoxgridResult<VideoHandle> {
        if !self.videos.contains(source) {
            return Err(VoxgridError::asset_load(format!(
                "video '{source}' not found"
            )));
        }
        Ok(VideoHandle {
            source: source.to_string(),
        })
    }
}
