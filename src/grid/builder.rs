use kurbo::Rect;

use crate::{
    assets::source::{AssetSource, VideoHandle},
    config::{GridParams, MaskConfig},
    foundation::core::{GridDims, Transform3D, Vec3},
    foundation::error::VoxgridResult,
    grid::sampler::BrightnessGrid,
    scene::graph::{NodeId, SceneGraph},
};

/// A populated lattice position before any scene node exists: world placement
/// plus the UV sub-rectangle of the shared video texture this cell views.
#[derive(Clone, Debug, PartialEq)]
pub struct CellProto {
    /// Lattice column.
    pub col: u32,
    /// Lattice row; row 0 sits at the bottom.
    pub row: u32,
    /// World-space center, lattice centered on the origin.
    pub position: Vec3,
    /// UV sub-rectangle of the shared video texture.
    pub uv_rect: Rect,
}

/// Pure build output for one mask config. Prototypes are scene-independent so
/// configs can build in parallel; instantiation into a scene happens serially
/// via [`GridProto::instantiate`].
#[derive(Clone, Debug, PartialEq)]
pub struct GridProto {
    /// Grid id, taken from the mask config.
    pub id: String,
    /// Lattice dimensions.
    pub dims: GridDims,
    /// Populated cells, in column-major order.
    pub cells: Vec<CellProto>,
    /// Video texture shared by every cell.
    pub video: VideoHandle,
}

/// A cell bound to its scene node.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// Lattice column.
    pub col: u32,
    /// Lattice row; row 0 sits at the bottom.
    pub row: u32,
    /// UV sub-rectangle of the shared video texture.
    pub uv_rect: Rect,
    /// Scene node carrying this cell's transform.
    pub node: NodeId,
}

/// One renderable grid: created once, retained for the program's lifetime.
/// Only node transforms mutate after instantiation.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    /// Grid id, taken from the mask config.
    pub id: String,
    /// Lattice dimensions.
    pub dims: GridDims,
    /// Populated cells, in column-major order.
    pub cells: Vec<Cell>,
    /// Video texture shared by every cell.
    pub video: VideoHandle,
}

/// Build one grid prototype: decode the mask, rasterize it to a brightness
/// lattice, open the shared video handle, and emit a cell for every lattice
/// position darker than the threshold.
#[tracing::instrument(skip_all, fields(id = %config.id))]
pub fn build_grid(
    config: &MaskConfig,
    params: &GridParams,
    source: &(dyn AssetSource + Sync),
) -> VoxgridResult<GridProto> {
    let img = source.load_image(&config.mask)?;
    let brightness = BrightnessGrid::from_image(&img, params.grid_size)?;
    let video = source.open_video(&config.video)?;
    let cells = populate_cells(&brightness, params);

    tracing::debug!(
        width = brightness.dims.width,
        height = brightness.dims.height,
        cells = cells.len(),
        "grid built"
    );

    Ok(GridProto {
        id: config.id.clone(),
        dims: brightness.dims,
        cells,
        video,
    })
}

fn populate_cells(grid: &BrightnessGrid, params: &GridParams) -> Vec<CellProto> {
    let GridDims { width, height } = grid.dims;
    let (w, h) = (f64::from(width), f64::from(height));

    let mut cells = Vec::new();
    // column-major walk; per-cell stagger indexing downstream keys off this
    // insertion order
    for col in 0..width {
        for row in 0..height {
            if grid.sample(col, row) >= params.threshold {
                continue;
            }

            let position = Vec3::new(
                (f64::from(col) - (w - 1.0) / 2.0) * params.spacing,
                (f64::from(row) - (h - 1.0) / 2.0) * params.spacing,
                0.0,
            );
            let uv_rect = Rect::new(
                f64::from(col) / w,
                f64::from(row) / h,
                f64::from(col + 1) / w,
                f64::from(row + 1) / h,
            );

            cells.push(CellProto {
                col,
                row,
                position,
                uv_rect,
            });
        }
    }
    cells
}

impl GridProto {
    /// Spawn one scene node per cell at its world position, full scale.
    pub fn instantiate(self, scene: &mut dyn SceneGraph) -> Grid {
        let cells = self
            .cells
            .into_iter()
            .map(|proto| {
                let node = scene.spawn(Transform3D {
                    translate: proto.position,
                    scale: Vec3::splat(1.0),
                });
                Cell {
                    col: proto.col,
                    row: proto.row,
                    uv_rect: proto.uv_rect,
                    node,
                }
            })
            .collect();

        Grid {
            id: self.id,
            dims: self.dims,
            cells,
            video: self.video,
        }
    }
}
