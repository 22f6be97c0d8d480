use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::interaction::InteractionConfig;
use crate::physics::SimulationConfig;
use crate::scale::ScaleConfig;

/// Layout tuning, usually read from a `layout.toml`. Every table and key is optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub scale: ScaleConfig,
    pub simulation: SimulationConfig,
    pub interaction: InteractionConfig,
}

impl LayoutConfig {
    /// Applies each section's own sanitizing so no value can panic or stall the layout.
    pub fn sanitized(self) -> Self {
        Self {
            scale: self.scale,
            simulation: self.simulation.sanitized(),
            interaction: self.interaction.sanitized(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<LayoutConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout config {}", path.display()))?;
    let config = toml::from_str::<LayoutConfig>(&contents)
        .with_context(|| format!("failed to parse layout config {}", path.display()))?;
    let sanitized = config.sanitized();
    if sanitized != config {
        tracing::warn!(path = %path.display(), "layout config had out-of-range values, repaired");
    }
    let config = sanitized;

    tracing::info!(path = %path.display(), "layout config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let minimal = r#"
[simulation]
charge_strength = -60.0

[interaction]
max_scale = 4.0
"#;
        let parsed: LayoutConfig = toml::from_str(minimal).unwrap();
        assert_eq!(parsed.simulation.charge_strength, -60.0);
        assert_eq!(parsed.simulation.velocity_decay, 0.4);
        assert_eq!(parsed.interaction.max_scale, 4.0);
        assert_eq!(parsed.interaction.min_scale, 0.1);
        assert_eq!(parsed.scale, ScaleConfig::default());
    }

    #[test]
    fn toml_roundtrip() {
        let config = LayoutConfig {
            scale: ScaleConfig {
                focal_radius: 72.0,
                ..ScaleConfig::default()
            },
            simulation: SimulationConfig {
                link_strength: Some(0.5),
                pin_focal: false,
                ..SimulationConfig::default()
            },
            ..LayoutConfig::default()
        };
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: LayoutConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scale]\nmax_radius = 40.0").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.scale.max_radius, 40.0);
        assert_eq!(config.scale.min_radius, 4.0);
    }

    #[test]
    fn load_config_reports_bad_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scale\nmax_radius = ").unwrap();
        let error = load_config(file.path()).unwrap_err();
        assert!(error.to_string().contains("failed to parse layout config"));

        let missing = load_config(Path::new("/nonexistent/layout.toml")).unwrap_err();
        assert!(missing.to_string().contains("failed to read layout config"));
    }

    #[test]
    fn load_config_repairs_values_that_would_panic_or_stall() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[interaction]\nmin_scale = 5.0\nmax_scale = 2.0\n\n[simulation]\nenergy_decay = 0.0"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.interaction.min_scale, 2.0);
        assert_eq!(config.interaction.max_scale, 5.0);
        assert_eq!(
            config.simulation.energy_decay,
            SimulationConfig::default().energy_decay
        );
    }

    #[test]
    fn sanitizing_leaves_valid_config_alone() {
        let config = LayoutConfig::default();
        assert_eq!(config.sanitized(), config);

        let nan_bounds = InteractionConfig {
            min_scale: f32::NAN,
            max_scale: -1.0,
            ..InteractionConfig::default()
        };
        assert_eq!(nan_bounds.sanitized(), InteractionConfig::default());
    }
}
