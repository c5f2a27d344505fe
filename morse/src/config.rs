//! Tuning knobs, loadable from defaults, a TOML file, or built programmatically.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MorseError, Result};

/// Maximum capacity of a ring window (marks or gaps) and of the unit history.
pub const MAX_WIN: usize = 36;

/// `MorseConfig` holds every tuning knob named in the external-interfaces section.
///
/// `#[serde(default = ...)]` on each field means a partial TOML file only needs to
/// specify the knobs it wants to override; everything else keeps its default.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorseConfig {
    /// Minimum run length before clustering is attempted on a window.
    pub min_len: usize,
    /// Maximum capacity of a ring window.
    pub max_len: usize,
    /// Lower multiple-of-unit bound on accepted inter-centroid spread.
    pub mean_min_diff: f64,
    /// Upper multiple-of-unit bound on accepted inter-centroid spread.
    pub mean_max_diff: f64,
    /// Fallback unit length (ms) used before any clustering has been accepted.
    pub unit: f64,
    /// Durations shorter than `noise_ratio * unit` are folded into the
    /// neighbouring signal rather than treated as their own symbol.
    pub noise_ratio: f64,
    /// Retry budget for the stable k-means loop.
    pub cluster_iter: usize,
    /// Whether a detected long pause should trigger session renewal.
    pub enable_renewal: bool,
}

impl Default for MorseConfig {
    fn default() -> Self {
        MorseConfig {
            min_len: 12,
            max_len: MAX_WIN,
            mean_min_diff: 1.1,
            mean_max_diff: 11.9,
            unit: 300.0,
            noise_ratio: 0.1,
            cluster_iter: 10,
            enable_renewal: false,
        }
    }
}

impl MorseConfig {
    /// Load a config from a TOML file, falling back to defaults for any key it omits.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| MorseError::process(format!("cannot read config: {e}")))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| MorseError::process(format!("invalid config: {e}")))
    }

    /// Apply `MORSE_*` environment overrides on top of whatever was loaded
    /// from defaults or a file, so a deployment can tweak a single knob
    /// without shipping a config file of its own. Unset or unparseable
    /// variables are left alone; a present-but-malformed value is an error
    /// rather than a silent no-op.
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        if let Some(v) = env_f64("MORSE_UNIT")? {
            self.unit = v;
        }
        if let Some(v) = env_usize("MORSE_MIN_LEN")? {
            self.min_len = v;
        }
        if let Some(v) = env_usize("MORSE_MAX_LEN")? {
            self.max_len = v;
        }
        if let Some(v) = env_f64("MORSE_MEAN_MIN_DIFF")? {
            self.mean_min_diff = v;
        }
        if let Some(v) = env_f64("MORSE_MEAN_MAX_DIFF")? {
            self.mean_max_diff = v;
        }
        if let Some(v) = env_bool("MORSE_ENABLE_RENEWAL")? {
            self.enable_renewal = v;
        }
        Ok(self)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn env_f64(name: &str) -> Result<Option<f64>> {
    match env_var(name) {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| MorseError::process(format!("invalid {name}: {s:?}"))),
    }
}

fn env_usize(name: &str) -> Result<Option<usize>> {
    match env_var(name) {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| MorseError::process(format!("invalid {name}: {s:?}"))),
    }
}

fn env_bool(name: &str) -> Result<Option<bool>> {
    match env_var(name) {
        None => Ok(None),
        Some(s) => match s.as_str() {
            "1" | "true" | "TRUE" | "True" => Ok(Some(true)),
            "0" | "false" | "FALSE" | "False" => Ok(Some(false)),
            _ => Err(MorseError::process(format!("invalid {name}: {s:?}"))),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let cfg = MorseConfig::default();
        assert_eq!(cfg.min_len, 12);
        assert_eq!(cfg.max_len, 36);
        assert_eq!(cfg.mean_min_diff, 1.1);
        assert_eq!(cfg.mean_max_diff, 11.9);
        assert_eq!(cfg.unit, 300.0);
        assert_eq!(cfg.cluster_iter, 10);
        assert!(!cfg.enable_renewal);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = MorseConfig::from_toml_str("enable_renewal = true\n").unwrap();
        assert!(cfg.enable_renewal);
        assert_eq!(cfg.unit, 300.0);
    }

    #[test]
    fn env_override_replaces_a_single_knob() {
        std::env::set_var("MORSE_UNIT", "120.0");
        let cfg = MorseConfig::default().apply_env_overrides().unwrap();
        assert_eq!(cfg.unit, 120.0);
        assert_eq!(cfg.min_len, 12);
        std::env::remove_var("MORSE_UNIT");
    }

    #[test]
    fn malformed_env_override_errors() {
        std::env::set_var("MORSE_MIN_LEN", "not-a-number");
        let err = MorseConfig::default().apply_env_overrides().unwrap_err();
        assert_eq!(err.code(), MorseError::CODE_PROCESS);
        std::env::remove_var("MORSE_MIN_LEN");
    }
}
