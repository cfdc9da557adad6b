use std::collections::BTreeMap;

use crate::foundation::{
    core::Rgb8,
    error::{VoxgridError, VoxgridResult},
};

/// One mask/video pair. Immutable, defined at startup.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MaskConfig {
    /// Stable identifier used for selection and color lookup.
    pub id: String,
    /// Mask image path, relative to the assets root.
    pub mask: String,
    /// Video path, relative to the assets root.
    pub video: String,
}

/// Lattice construction parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridParams {
    /// Max lattice dimension; the other axis follows the mask's aspect ratio.
    pub grid_size: u32,
    /// World-space distance between neighboring cell centers.
    pub spacing: f64,
    /// Brightness cutoff: lattice positions strictly below it are populated
    /// (dark pixels are "on").
    pub threshold: u8,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            grid_size: 24,
            spacing: 0.75,
            threshold: 128,
        }
    }
}

/// Transition timing and parking geometry. Fractions are relative to
/// `duration`; offsets are z positions in world space.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransitionParams {
    /// Per-cell tween length, seconds.
    pub duration: f64,
    /// Per-cell-index delay producing the wave effect, seconds.
    pub stagger: f64,
    /// Reveal phase starts this fraction of `duration` after the trigger.
    pub reveal_delay_frac: f64,
    /// Background color tween length as a fraction of `duration`.
    pub background_frac: f64,
    /// Resting z for parked (hidden) cells.
    pub park_offset: f64,
    /// z the hide phase animates toward before snapping to `park_offset`.
    pub exit_offset: f64,
    /// Grid id -> background color.
    pub colors: BTreeMap<String, Rgb8>,
    /// Background for grid ids without a mapped color.
    pub fallback_color: Rgb8,
}

impl Default for TransitionParams {
    fn default() -> Self {
        let mut colors = BTreeMap::new();
        colors.insert("heart".to_string(), Rgb8::new(0xe1, 0x98, 0x00));
        colors.insert("codrops".to_string(), Rgb8::new(0x00, 0xa0, 0x0b));
        colors.insert("smile".to_string(), Rgb8::new(0xb9, 0x00, 0x00));

        Self {
            duration: 1.0,
            stagger: 0.001,
            reveal_delay_frac: 0.25,
            background_frac: 0.8,
            park_offset: -6.0,
            exit_offset: 6.0,
            colors,
            fallback_color: Rgb8::new(0x1a, 0x1a, 0x1a),
        }
    }
}

impl TransitionParams {
    /// Check timing and geometry bounds. [`TransitionController::new`] calls
    /// this so hand-built params fail up front rather than mid-selection.
    ///
    /// [`TransitionController::new`]: crate::TransitionController::new
    pub fn validate(&self) -> VoxgridResult<()> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(VoxgridError::validation("transition duration must be > 0"));
        }
        if !(self.stagger.is_finite() && self.stagger >= 0.0) {
            return Err(VoxgridError::validation("stagger must be >= 0"));
        }
        if !(self.reveal_delay_frac.is_finite() && self.reveal_delay_frac >= 0.0) {
            return Err(VoxgridError::validation("reveal_delay_frac must be >= 0"));
        }
        if !(self.background_frac.is_finite() && self.background_frac > 0.0) {
            return Err(VoxgridError::validation("background_frac must be > 0"));
        }
        if !(self.park_offset.is_finite() && self.exit_offset.is_finite()) {
            return Err(VoxgridError::validation("park/exit offsets must be finite"));
        }
        Ok(())
    }
}

/// Full static scene configuration, loaded once at startup.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneConfig {
    /// Mask/video pairs, one grid each. Order fixes the default initial grid.
    pub masks: Vec<MaskConfig>,
    /// Lattice construction parameters.
    #[serde(default)]
    pub grid: GridParams,
    /// Transition timing, parking geometry, and background colors.
    #[serde(default)]
    pub transition: TransitionParams,
}

impl SceneConfig {
    /// Parse and validate a scene config from a JSON document.
    pub fn from_json(json: &str) -> VoxgridResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| VoxgridError::validation(format!("invalid scene config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs that cannot produce a runnable scene.
    pub fn validate(&self) -> VoxgridResult<()> {
        if self.masks.is_empty() {
            return Err(VoxgridError::validation(
                "scene config must declare at least one mask",
            ));
        }

        let mut seen = std::collections::BTreeSet::new();
        for mask in &self.masks {
            if mask.id.trim().is_empty() {
                return Err(VoxgridError::validation("mask id must be non-empty"));
            }
            if mask.mask.trim().is_empty() || mask.video.trim().is_empty() {
                return Err(VoxgridError::validation(format!(
                    "mask '{}' must reference both a mask image and a video",
                    mask.id
                )));
            }
            if !seen.insert(mask.id.as_str()) {
                return Err(VoxgridError::validation(format!(
                    "duplicate mask id '{}'",
                    mask.id
                )));
            }
        }

        if self.grid.grid_size == 0 {
            return Err(VoxgridError::validation("grid_size must be > 0"));
        }
        if !(self.grid.spacing.is_finite() && self.grid.spacing > 0.0) {
            return Err(VoxgridError::validation("spacing must be > 0"));
        }

        self.transition.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_config() -> SceneConfig {
        SceneConfig {
            masks: vec![
                MaskConfig {
                    id: "heart".to_string(),
                    mask: "heart.jpg".to_string(),
                    video: "fruits.mp4".to_string(),
                },
                MaskConfig {
                    id: "smile".to_string(),
                    mask: "smile.jpg".to_string(),
                    video: "grid.mp4".to_string(),
                },
            ],
            grid: GridParams::default(),
            transition: TransitionParams::default(),
        }
    }

    #[test]
    fn defaults_match_the_demo_scene() {
        let grid = GridParams::default();
        assert_eq!(grid.grid_size, 24);
        assert_eq!(grid.spacing, 0.75);
        assert_eq!(grid.threshold, 128);

        let t = TransitionParams::default();
        assert_eq!(t.duration, 1.0);
        assert_eq!(t.colors["heart"], Rgb8::new(0xe1, 0x98, 0x00));
        assert_eq!(t.fallback_color, Rgb8::new(0x1a, 0x1a, 0x1a));
    }

    #[test]
    fn json_roundtrip() {
        let config = basic_config();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let de = SceneConfig::from_json(&json).unwrap();
        assert_eq!(de, config);
    }

    #[test]
    fn minimal_json_fills_in_defaults() {
        let json = r##"{"masks":[{"id":"a","mask":"a.png","video":"a.mp4"}]}"##;
        let config = SceneConfig::from_json(json).unwrap();
        assert_eq!(config.grid, GridParams::default());
        assert_eq!(config.transition.park_offset, -6.0);
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut config = basic_config();
        config.masks[1].id = "heart".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_masks() {
        let config = SceneConfig {
            masks: vec![],
            grid: GridParams::default(),
            transition: TransitionParams::default(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_timing() {
        let mut config = basic_config();
        config.transition.duration = 0.0;
        assert!(config.validate().is_err());

        let mut config = basic_config();
        config.transition.stagger = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn transition_params_validate_standalone() {
        assert!(TransitionParams::default().validate().is_ok());

        let zero_duration = TransitionParams {
            duration: 0.0,
            ..TransitionParams::default()
        };
        assert!(zero_duration.validate().is_err());

        let nan_offset = TransitionParams {
            park_offset: f64::NAN,
            ..TransitionParams::default()
        };
        assert!(nan_offset.validate().is_err());
    }
}
