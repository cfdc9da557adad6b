//! Voxgrid turns raster mask images into voxelized "grids" — sparse lattices of
//! cells, each viewing a distinct sub-rectangle of a shared video texture — and
//! drives staggered reveal/hide transitions between them.
//!
//! # Pipeline overview
//!
//! 1. **Sample**: mask image + target lattice size -> [`BrightnessGrid`]
//!    (aspect-preserving dimensions, per-cell brightness, bottom-row-first)
//! 2. **Build**: [`BrightnessGrid`] -> [`GridProto`] (one cell per dark lattice
//!    position, with world placement and UV sub-rectangle); configs build
//!    independently and in parallel via [`build_grids`]
//! 3. **Instantiate**: [`GridProto`] -> [`Grid`] (scene nodes spawned through
//!    the [`SceneGraph`] seam)
//! 4. **Transition**: [`TransitionController`] owns visibility switching with
//!    reject-if-busy semantics, scheduling per-cell tweens through an injected
//!    [`TweenScheduler`]
//!
//! Rendering, video decoding, and the host frame clock stay outside this crate:
//! renderers implement [`SceneGraph`], video textures are opaque
//! [`VideoHandle`]s, and [`FrameScheduler`] is a deterministic reference
//! scheduler for headless simulation and tests.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod config;
mod foundation;
mod grid;
mod scene;
mod transition;

pub use animation::ease::Ease;
pub use animation::tween::{
    FrameScheduler, TweenId, TweenScheduler, TweenSpec, TweenTarget, TweenValue,
};
pub use assets::decode::decode_image;
pub use assets::source::{
    AssetSource, FsAssetSource, MemoryAssetSource, VideoHandle, normalize_rel_path,
};
pub use config::{GridParams, MaskConfig, SceneConfig, TransitionParams};
pub use foundation::core::{GridDims, Point, Rect, Rgb8, Transform3D, Vec2, Vec3};
pub use foundation::error::{VoxgridError, VoxgridResult};
pub use grid::builder::{Cell, CellProto, Grid, GridProto, build_grid};
pub use grid::sampler::BrightnessGrid;
pub use grid::set::{BuildReport, GridFailure, build_grids};
pub use scene::graph::{MemoryScene, NodeId, SceneGraph};
pub use transition::controller::{Phase, SelectOutcome, TransitionController};
