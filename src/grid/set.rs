use rayon::prelude::*;

use crate::{
    assets::source::AssetSource,
    config::{GridParams, MaskConfig},
    foundation::error::{VoxgridError, VoxgridResult},
    grid::builder::{GridProto, build_grid},
};

/// One grid that failed to build; the rest of the set is unaffected.
#[derive(Debug)]
pub struct GridFailure {
    /// Grid id from the mask config.
    pub id: String,
    /// What went wrong for this grid.
    pub error: VoxgridError,
}

/// Aggregated outcome of building every configured grid. Successful grids are
/// usable regardless of failures, but readiness — the gate that allows
/// transition wiring and interaction — requires the full set.
#[derive(Debug)]
pub struct BuildReport {
    /// Successfully built prototypes, in config order.
    pub grids: Vec<GridProto>,
    /// Per-grid failures, in config order.
    pub failures: Vec<GridFailure>,
    configured: usize,
}

impl BuildReport {
    /// True when every configured grid built successfully.
    pub fn is_ready(&self) -> bool {
        self.failures.is_empty() && self.grids.len() == self.configured
    }

    /// Number of grids the config asked for.
    pub fn configured(&self) -> usize {
        self.configured
    }
}

/// Build all configured grids independently and in parallel. Results keep
/// config order, so readiness and downstream wiring never depend on which
/// build finished first.
#[tracing::instrument(skip_all, fields(configs = configs.len()))]
pub fn build_grids(
    configs: &[MaskConfig],
    params: &GridParams,
    source: &(dyn AssetSource + Sync),
) -> BuildReport {
    let results: Vec<(String, VoxgridResult<GridProto>)> = configs
        .par_iter()
        .map(|config| (config.id.clone(), build_grid(config, params, source)))
        .collect();

    let mut grids = Vec::with_capacity(configs.len());
    let mut failures = Vec::new();
    for (id, result) in results {
        match result {
            Ok(grid) => grids.push(grid),
            Err(error) => {
                tracing::warn!(%id, %error, "grid build failed");
                failures.push(GridFailure { id, error });
            }
        }
    }

    BuildReport {
        grids,
        failures,
        configured: configs.len(),
    }
}
