use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub simulation: SimulationConfig,
    pub viewport: ViewportConfig,
    pub interaction: InteractionConfig,
}

/// Force and cooling parameters for [`crate::physics::Simulation`].
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub link_distance: f32,
    pub link_stiffness: f32,
    /// Negative values repel.
    pub charge_strength: f32,
    pub center_strength: f32,
    pub distance_min: f32,
    pub theta: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    pub drag_alpha_target: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            link_distance: 100.0,
            link_stiffness: 1.0,
            charge_strength: -400.0,
            center_strength: 1.0,
            distance_min: 1.0,
            theta: 0.9,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
        }
    }
}

impl SimulationConfig {
    /// Upper bound on ticks from alpha 1 to settled with a zero alpha target.
    pub fn max_ticks(&self) -> usize {
        if self.alpha_decay >= 1.0 {
            return 1;
        }
        let per_tick = (1.0 - self.alpha_decay as f64).ln();
        let ticks = (self.alpha_min as f64).ln() / per_tick;
        ticks.ceil().max(1.0) as usize
    }

    fn validate(&self) -> Result<()> {
        if !(self.alpha_decay > 0.0 && self.alpha_decay <= 1.0) {
            bail!("simulation.alpha_decay must be in (0, 1], got {}", self.alpha_decay);
        }
        if !(self.alpha_min > 0.0 && self.alpha_min < 1.0) {
            bail!("simulation.alpha_min must be in (0, 1), got {}", self.alpha_min);
        }
        if !(0.0..=1.0).contains(&self.velocity_decay) {
            bail!(
                "simulation.velocity_decay must be in [0, 1], got {}",
                self.velocity_decay
            );
        }
        if !(0.0..=1.0).contains(&self.drag_alpha_target) {
            bail!(
                "simulation.drag_alpha_target must be in [0, 1], got {}",
                self.drag_alpha_target
            );
        }
        if self.distance_min <= 0.0 || self.link_distance < 0.0 {
            bail!("simulation distances must be positive");
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    pub focus_scale: f32,
    pub focus_duration_ms: u64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 4.0,
            focus_scale: 2.0,
            focus_duration_ms: 750,
        }
    }
}

impl ViewportConfig {
    pub fn focus_duration(&self) -> Duration {
        Duration::from_millis(self.focus_duration_ms)
    }

    fn validate(&self) -> Result<()> {
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            bail!(
                "viewport scale extent [{}, {}] is empty or non-positive",
                self.min_scale,
                self.max_scale
            );
        }
        if !(self.min_scale..=self.max_scale).contains(&self.focus_scale) {
            bail!(
                "viewport focus_scale {} is outside the scale extent [{}, {}]",
                self.focus_scale,
                self.min_scale,
                self.max_scale
            );
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub min_query_len: usize,
    /// Zero keeps every match.
    pub max_results: usize,
    pub click_tolerance: f32,
    pub wheel_sensitivity: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            max_results: 5,
            click_tolerance: 4.0,
            wheel_sensitivity: 0.002,
        }
    }
}

impl NetworkConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("invalid config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, link_distance: Option<f32>, charge_strength: Option<f32>) {
        if let Some(distance) = link_distance {
            self.simulation.link_distance = distance.max(0.0);
        }
        if let Some(strength) = charge_strength {
            self.simulation.charge_strength = strength;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.viewport.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_max_ticks_matches_decay_schedule() {
        let config = SimulationConfig::default();
        let ticks = config.max_ticks();
        assert!((300..=301).contains(&ticks), "got {ticks}");
    }

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let config =
            NetworkConfig::parse(r#"{ "simulation": { "link_distance": 60 } }"#).unwrap();
        assert_eq!(config.simulation.link_distance, 60.0);
        assert_eq!(config.simulation.charge_strength, -400.0);
        assert_eq!(config.viewport, ViewportConfig::default());
    }

    #[test]
    fn test_parse_rejects_inverted_scale_extent() {
        let result = NetworkConfig::parse(r#"{ "viewport": { "min_scale": 5, "max_scale": 1 } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_focus_scale_outside_extent() {
        let error = NetworkConfig::parse(r#"{ "viewport": { "focus_scale": 10 } }"#).unwrap_err();
        assert!(format!("{error:#}").contains("focus_scale"));

        let config = NetworkConfig::parse(r#"{ "viewport": { "focus_scale": 4 } }"#).unwrap();
        assert_eq!(config.viewport.focus_scale, 4.0);
    }

    #[test]
    fn test_overrides_replace_forces() {
        let mut config = NetworkConfig::default();
        config.apply_overrides(Some(80.0), Some(-150.0));
        assert_eq!(config.simulation.link_distance, 80.0);
        assert_eq!(config.simulation.charge_strength, -150.0);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = NetworkConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(error.to_string().contains("failed to read config file"));
    }
}
