// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use fenestra_window::WindowStyle;

/// Settings that apply to every run.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Window style used when the command line does not name one.
    pub style: WindowStyle,
    /// Overrides the vertex welding tolerance of the window configuration.
    pub merge_tolerance: Option<f64>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`. Unparsable values fall back to
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            style: lookup("FENESTRA_STYLE")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            merge_tolerance: lookup("FENESTRA_MERGE_TOLERANCE")
                .and_then(|s| s.parse().ok())
                .filter(|t: &f64| t.is_finite() && *t >= 0.0),
        }
    }
}
