// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Window configuration.
//!
//! One flat struct covers both window styles; every field has a default, so
//! a partial JSON object is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WindowError};
use crate::materials::MaterialOverrides;

/// Glazing fill of the framed opening.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    #[default]
    Pane,
    Bar,
}

/// What to do with the rest of a batch when one face fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Log the failure, record it and continue with the next face.
    #[default]
    SkipFailed,
    /// Stop at the first failure and return its error.
    AbortBatch,
}

/// Parameters of a window pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Width and height of the split rectangle, as ratios of the face size.
    pub split_size: [f64; 2],
    /// Offset of the split rectangle from the face center (projected onto
    /// the face plane).
    pub split_offset: [f64; 3],
    pub has_split: bool,

    pub frame_thickness: f64,
    pub frame_depth: f64,

    /// Interior cuts across the vertical edges (rows) or, for bars, the
    /// number of horizontal bars.
    pub pane_count_x: usize,
    /// Interior cuts across the horizontal edges (columns) or, for bars, the
    /// number of vertical bars.
    pub pane_count_y: usize,
    pub pane_thickness: f64,
    pub pane_depth: f64,
    pub fill_mode: FillMode,

    /// Bar thickness; unset uses `pane_thickness`.
    pub bar_thickness: Option<f64>,
    /// Bar standoff from the glazing; unset uses `frame_depth`.
    pub bar_depth: Option<f64>,

    /// Number of pieces the arch's top edge is cut into; 0 disables the arch.
    pub arch_segments: usize,
    pub arch_offset: f64,
    pub arch_height: f64,

    pub arch_detail_enabled: bool,
    pub arch_detail_thickness: f64,
    pub arch_detail_depth: f64,

    pub material_overrides: MaterialOverrides,
    pub batch_policy: BatchPolicy,
    /// Distance under which vertices are welded before framing.
    pub merge_tolerance: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            split_size: [0.7, 0.7],
            split_offset: [0.0; 3],
            has_split: true,
            frame_thickness: 0.05,
            frame_depth: 0.05,
            pane_count_x: 1,
            pane_count_y: 1,
            pane_thickness: 0.05,
            pane_depth: 0.05,
            fill_mode: FillMode::Pane,
            bar_thickness: None,
            bar_depth: None,
            arch_segments: 4,
            arch_offset: 0.5,
            arch_height: 0.4,
            arch_detail_enabled: true,
            arch_detail_thickness: 0.03,
            arch_detail_depth: 0.01,
            material_overrides: MaterialOverrides::default(),
            batch_policy: BatchPolicy::SkipFailed,
            merge_tolerance: 1e-4,
        }
    }
}

impl WindowConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| WindowError::InvalidConfiguration(e.to_string()))
    }

    /// Thickness of fill bars.
    pub fn bar_thickness(&self) -> f64 {
        self.bar_thickness.unwrap_or(self.pane_thickness)
    }

    /// Distance bars stand in front of the glazing.
    pub fn bar_standoff(&self) -> f64 {
        self.bar_depth.unwrap_or(self.frame_depth)
    }

    /// Rejects values no window can be built from.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("split_size.w", self.split_size[0]),
            ("split_size.h", self.split_size[1]),
            ("split_offset.x", self.split_offset[0]),
            ("split_offset.y", self.split_offset[1]),
            ("split_offset.z", self.split_offset[2]),
            ("arch_offset", self.arch_offset),
            ("arch_height", self.arch_height),
        ];
        let non_negative = [
            ("frame_thickness", self.frame_thickness),
            ("frame_depth", self.frame_depth),
            ("pane_thickness", self.pane_thickness),
            ("pane_depth", self.pane_depth),
            ("bar_thickness", self.bar_thickness()),
            ("bar_depth", self.bar_standoff()),
            ("arch_detail_thickness", self.arch_detail_thickness),
            ("arch_detail_depth", self.arch_detail_depth),
            ("merge_tolerance", self.merge_tolerance),
        ];

        for (name, value) in finite.iter().chain(non_negative.iter()) {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite, got {value}")));
            }
        }
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(invalid(format!("{name} must not be negative, got {value}")));
            }
        }
        if self.has_split {
            for (name, value) in [("split_size.w", self.split_size[0]), ("split_size.h", self.split_size[1])] {
                if value <= 0.0 || value > 1.0 {
                    return Err(invalid(format!("{name} must be in (0, 1], got {value}")));
                }
            }
        }
        if self.fill_mode == FillMode::Bar && self.bar_thickness() <= 0.0 {
            return Err(invalid("bar_thickness must be positive for bar fills"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> WindowError {
    WindowError::InvalidConfiguration(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        WindowConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = WindowConfig::from_json(r#"{ "fill_mode": "bar", "pane_count_y": 3 }"#).unwrap();
        assert_eq!(config.fill_mode, FillMode::Bar);
        assert_eq!(config.pane_count_y, 3);
        assert_eq!(config.pane_count_x, 1);
        assert_eq!(config.arch_segments, 4);
        assert_eq!(config.batch_policy, BatchPolicy::SkipFailed);
    }

    #[test]
    fn rejects_bad_values() {
        let negative = WindowConfig {
            frame_depth: -0.1,
            ..Default::default()
        };
        assert!(matches!(negative.validate(), Err(WindowError::InvalidConfiguration(_))));

        let nan = WindowConfig {
            arch_height: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());

        let oversized = WindowConfig {
            split_size: [1.5, 0.5],
            ..Default::default()
        };
        assert!(oversized.validate().is_err());

        let unsplit = WindowConfig {
            split_size: [1.5, 0.5],
            has_split: false,
            ..Default::default()
        };
        assert!(unsplit.validate().is_ok());
    }

    #[test]
    fn bars_follow_pane_thickness_and_frame_depth() {
        let config = WindowConfig::from_json(r#"{ "pane_thickness": 0.2, "frame_depth": 0.3 }"#).unwrap();
        assert_eq!(config.bar_thickness(), 0.2);
        assert_eq!(config.bar_standoff(), 0.3);

        let explicit =
            WindowConfig::from_json(r#"{ "pane_thickness": 0.2, "bar_thickness": 0.08, "bar_depth": 0.0 }"#)
                .unwrap();
        assert_eq!(explicit.bar_thickness(), 0.08);
        assert_eq!(explicit.bar_standoff(), 0.0);

        let flat_bars = WindowConfig {
            fill_mode: FillMode::Bar,
            pane_thickness: 0.0,
            ..Default::default()
        };
        assert!(flat_bars.validate().is_err());
    }

    #[test]
    fn unknown_fill_mode_is_invalid_configuration() {
        let err = WindowConfig::from_json(r#"{ "fill_mode": "shutter" }"#).unwrap_err();
        assert!(matches!(err, WindowError::InvalidConfiguration(_)));
    }
}
