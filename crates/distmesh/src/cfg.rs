//! Numeric tunables of the relaxation engine.
//!
//! Policy
//! - The `DEFAULT_*` constants are the process-wide defaults; `MeshCfg`
//!   overrides them per call. The values are tuning defaults, not load-bearing
//!   constants: historical revisions of the algorithm used slightly different
//!   ones.
//! - All tolerances are relative to the characteristic edge length `h0`.

use serde::{Deserialize, Serialize};

use crate::error::MeshError;

/// Relative displacement (÷ h0) since the last triangulation that triggers a new one.
pub const DEFAULT_RETRIANGULATION_TOLERANCE: f64 = 1e-1;
/// Relative per-step displacement (÷ h0) below which the run has converged.
pub const DEFAULT_POINT_MOVEMENT_TOLERANCE: f64 = 1e-3;
/// Relative tolerance (× h0) for seeding, centroid rejection and fixed-point checks.
pub const DEFAULT_GEOMETRY_TOLERANCE: f64 = 1e-3;
/// Explicit Euler time step.
pub const DEFAULT_DELTA_T: f64 = 1e-1;
/// Iteration cap.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Per-run configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshCfg {
    pub retriangulation_tolerance: f64,
    pub point_movement_tolerance: f64,
    pub geometry_tolerance: f64,
    pub delta_t: f64,
    pub max_steps: usize,
    /// Seed for the rejection sampler. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for MeshCfg {
    fn default() -> Self {
        Self {
            retriangulation_tolerance: DEFAULT_RETRIANGULATION_TOLERANCE,
            point_movement_tolerance: DEFAULT_POINT_MOVEMENT_TOLERANCE,
            geometry_tolerance: DEFAULT_GEOMETRY_TOLERANCE,
            delta_t: DEFAULT_DELTA_T,
            max_steps: DEFAULT_MAX_STEPS,
            seed: None,
        }
    }
}

impl MeshCfg {
    /// Same configuration with a fixed sampler seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        let positive = [
            ("retriangulation_tolerance", self.retriangulation_tolerance),
            ("point_movement_tolerance", self.point_movement_tolerance),
            ("geometry_tolerance", self.geometry_tolerance),
            ("delta_t", self.delta_t),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(MeshError::InvalidConfig {
                    reason: format!("{name} must be finite and > 0, got {value}"),
                });
            }
        }
        if self.max_steps == 0 {
            return Err(MeshError::InvalidConfig {
                reason: "max_steps must be >= 1".into(),
            });
        }
        Ok(())
    }
}

/// Scale factor applied to desired edge lengths so that springs stay slightly
/// compressed: `1 + 0.4 / 2^(D-1)` (1.2 in 2D, 1.1 in 3D).
#[inline]
pub fn length_bias(dim: usize) -> f64 {
    1.0 + 0.4 / 2f64.powi(dim as i32 - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(MeshCfg::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_tolerances() {
        let cfg = MeshCfg {
            delta_t: 0.0,
            ..MeshCfg::default()
        };
        assert!(matches!(cfg.validate(), Err(MeshError::InvalidConfig { .. })));
        let cfg = MeshCfg {
            geometry_tolerance: f64::NAN,
            ..MeshCfg::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = MeshCfg {
            max_steps: 0,
            ..MeshCfg::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn length_bias_per_dimension() {
        assert!((length_bias(2) - 1.2).abs() < 1e-12);
        assert!((length_bias(3) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn partial_overrides_keep_defaults() {
        let json = r#"{ "max_steps": 50, "seed": 9 }"#;
        let cfg: MeshCfg = serde_json::from_str(json).expect("parse overrides");
        assert_eq!(cfg.max_steps, 50);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.delta_t, DEFAULT_DELTA_T);
    }
}
