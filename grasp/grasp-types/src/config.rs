//! Sampler configuration.
//!
//! Keys follow the grasp database configuration files, so a config block can
//! be deserialized directly:
//!
//! ```
//! use grasp_types::SamplerConfig;
//!
//! let config = SamplerConfig::from_json_str(r#"{
//!     "sampling_friction_coef": 0.5,
//!     "num_cone_faces": 8,
//!     "grasp_samples_per_surface_point": 2,
//!     "target_num_grasps": 100,
//!     "target_num_grasps_per_size": 50,
//!     "openning_ratios": [0.5, 1.0],
//!     "min_contact_dist": 0.0025,
//!     "num_grasp_rots": 16
//! }"#).unwrap();
//!
//! assert_eq!(config.max_num_surface_points, 100);
//! assert_eq!(config.grasp_dist_thresh, 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Weights and budgets for diversity-based down-selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiversityParams {
    /// Weight on the grasp center.
    pub gamma_center: f64,
    /// Weight on the grasp axis.
    pub gamma_axis: f64,
    /// Weight on the local-surface PCA variance ratios.
    pub gamma_variances: f64,
    /// Weight on the opening width.
    pub gamma_width: f64,
    /// Number of grasps to select.
    pub num_samples: usize,
    /// Maximum number of threshold-halving rounds.
    pub max_iter: usize,
}

impl Default for DiversityParams {
    fn default() -> Self {
        Self {
            gamma_center: 1.0,
            gamma_axis: 0.05,
            gamma_variances: 0.2,
            gamma_width: 0.2,
            num_samples: 50,
            max_iter: 20,
        }
    }
}

impl DiversityParams {
    /// Set the number of grasps to select.
    #[must_use]
    pub const fn with_num_samples(mut self, num_samples: usize) -> Self {
        self.num_samples = num_samples;
        self
    }

    /// Set the round budget.
    #[must_use]
    pub const fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set all four feature weights.
    #[must_use]
    pub const fn with_weights(
        mut self,
        center: f64,
        axis: f64,
        variances: f64,
        width: f64,
    ) -> Self {
        self.gamma_center = center;
        self.gamma_axis = axis;
        self.gamma_variances = variances;
        self.gamma_width = width;
        self
    }
}

/// Configuration shared by all grasp samplers.
///
/// Construct with [`SamplerConfig::from_json_str`] /
/// [`SamplerConfig::from_json_value`] (which resolve defaults and validate),
/// or build the struct directly and call [`SamplerConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSamplerConfig")]
pub struct SamplerConfig {
    /// Friction coefficient used for cone sampling and force closure.
    #[serde(rename = "sampling_friction_coef")]
    pub friction_coef: f64,
    /// Number of support directions per friction cone.
    pub num_cone_faces: usize,
    /// Antipodal trials per retained surface point.
    #[serde(rename = "grasp_samples_per_surface_point")]
    pub num_samples: usize,
    /// Overall grasp target.
    pub target_num_grasps: usize,
    /// Grasp target for each opening ratio.
    pub target_num_grasps_per_size: usize,
    /// Opening widths as fractions of the gripper maximum, ascending.
    #[serde(rename = "openning_ratios")]
    pub opening_ratios: Vec<f64>,
    /// Minimum separation between the two contacts of a grasp.
    pub min_contact_dist: f64,
    /// Number of roll angles scanned when aligning to a stable pose.
    pub num_grasp_rots: usize,
    /// Cap on surface points considered per antipodal call.
    pub max_num_surface_points: usize,
    /// Diversity threshold floor, as a fraction of the largest feature distance.
    pub grasp_dist_thresh: f64,
    /// Attempt cap for the uniform sampler.
    pub max_num_samples: usize,
    /// Number of standard deviations spanned by the object half-extent
    /// in the Gaussian sampler.
    pub sigma_scale: f64,
    /// Diversity down-selection applied per opening ratio, if present.
    pub diversity: Option<DiversityParams>,
}

impl SamplerConfig {
    /// Default cap on surface points per antipodal call.
    pub const DEFAULT_MAX_NUM_SURFACE_POINTS: usize = 100;
    /// Default uniform-sampler attempt cap.
    pub const DEFAULT_MAX_NUM_SAMPLES: usize = 1000;
    /// Default Gaussian sigma scale.
    pub const DEFAULT_SIGMA_SCALE: f64 = 2.5;

    /// Parse and validate a JSON configuration block.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, missing required keys, or out-of-range values.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let raw: RawSamplerConfig = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Build and validate a configuration from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Fails on missing required keys or out-of-range values.
    pub fn from_json_value(value: serde_json::Value) -> ConfigResult<Self> {
        let raw: RawSamplerConfig = serde_json::from_value(value)?;
        Self::try_from(raw)
    }

    /// Set the opening ratios.
    #[must_use]
    pub fn with_opening_ratios(mut self, ratios: Vec<f64>) -> Self {
        self.opening_ratios = ratios;
        self
    }

    /// Set the per-ratio grasp target.
    #[must_use]
    pub fn with_target_per_size(mut self, target: usize) -> Self {
        self.target_num_grasps_per_size = target;
        self
    }

    /// Enable diversity down-selection.
    #[must_use]
    pub fn with_diversity(mut self, params: DiversityParams) -> Self {
        self.diversity = Some(params);
        self
    }

    /// Validate value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.friction_coef.is_finite() || self.friction_coef < 0.0 {
            return Err(ConfigError::invalid(
                "sampling_friction_coef",
                format!("must be finite and non-negative, got {}", self.friction_coef),
            ));
        }
        if self.num_cone_faces < 3 {
            return Err(ConfigError::invalid(
                "num_cone_faces",
                format!("need at least 3 faces, got {}", self.num_cone_faces),
            ));
        }
        if self.opening_ratios.is_empty() {
            return Err(ConfigError::invalid("openning_ratios", "must not be empty"));
        }
        if let Some(bad) = self
            .opening_ratios
            .iter()
            .find(|r| !(r.is_finite() && **r > 0.0 && **r <= 1.0))
        {
            return Err(ConfigError::invalid(
                "openning_ratios",
                format!("ratios must lie in (0, 1], got {bad}"),
            ));
        }
        if !self.min_contact_dist.is_finite() || self.min_contact_dist < 0.0 {
            return Err(ConfigError::invalid(
                "min_contact_dist",
                format!("must be finite and non-negative, got {}", self.min_contact_dist),
            ));
        }
        if self.num_grasp_rots == 0 {
            return Err(ConfigError::invalid("num_grasp_rots", "must be at least 1"));
        }
        if !self.grasp_dist_thresh.is_finite() || self.grasp_dist_thresh < 0.0 {
            return Err(ConfigError::invalid(
                "grasp_dist_thresh",
                format!("must be finite and non-negative, got {}", self.grasp_dist_thresh),
            ));
        }
        if !self.sigma_scale.is_finite() || self.sigma_scale <= 0.0 {
            return Err(ConfigError::invalid(
                "sigma_scale",
                format!("must be positive, got {}", self.sigma_scale),
            ));
        }
        Ok(())
    }
}

/// Wire form of [`SamplerConfig`] before defaults are resolved.
#[derive(Debug, Deserialize)]
struct RawSamplerConfig {
    sampling_friction_coef: f64,
    num_cone_faces: usize,
    grasp_samples_per_surface_point: usize,
    #[serde(default)]
    target_num_grasps: Option<usize>,
    #[serde(default)]
    min_num_grasps: Option<usize>,
    target_num_grasps_per_size: usize,
    #[serde(alias = "opening_ratios")]
    openning_ratios: Vec<f64>,
    min_contact_dist: f64,
    num_grasp_rots: usize,
    #[serde(default)]
    max_num_surface_points: Option<usize>,
    #[serde(default)]
    grasp_dist_thresh: Option<f64>,
    #[serde(default)]
    max_num_samples: Option<usize>,
    #[serde(default)]
    sigma_scale: Option<f64>,
    #[serde(default)]
    diversity: Option<DiversityParams>,
}

impl TryFrom<RawSamplerConfig> for SamplerConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSamplerConfig) -> ConfigResult<Self> {
        let target_num_grasps = raw
            .target_num_grasps
            .or(raw.min_num_grasps)
            .ok_or(ConfigError::MissingKey("target_num_grasps"))?;

        let config = Self {
            friction_coef: raw.sampling_friction_coef,
            num_cone_faces: raw.num_cone_faces,
            num_samples: raw.grasp_samples_per_surface_point,
            target_num_grasps,
            target_num_grasps_per_size: raw.target_num_grasps_per_size,
            opening_ratios: raw.openning_ratios,
            min_contact_dist: raw.min_contact_dist,
            num_grasp_rots: raw.num_grasp_rots,
            max_num_surface_points: raw
                .max_num_surface_points
                .unwrap_or(Self::DEFAULT_MAX_NUM_SURFACE_POINTS),
            grasp_dist_thresh: raw.grasp_dist_thresh.unwrap_or(0.0),
            max_num_samples: raw
                .max_num_samples
                .unwrap_or(Self::DEFAULT_MAX_NUM_SAMPLES),
            sigma_scale: raw.sigma_scale.unwrap_or(Self::DEFAULT_SIGMA_SCALE),
            diversity: raw.diversity,
        };
        config.validate()?;
        Ok(config)
    }
}
