// src/config.rs
//! Scoring configuration loader.
//!
//! Dimension weights and extra indication aliases come from a TOML or JSON
//! file. Resolution order: $SCORING_CONFIG_PATH, then config/scoring.toml,
//! then config/scoring.json, then built-in defaults. File aliases are merged
//! over the seeded table; weights are validated where they are consumed
//! (`CompositeScorer::new`).

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregate::IndicationAliases;
use crate::score::DimensionWeights;

pub const ENV_SCORING_CONFIG_PATH: &str = "SCORING_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: DimensionWeightsCfg,
    /// Extra alias -> canonical entries, merged over the built-in seed.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: DimensionWeightsCfg::default(),
            aliases: HashMap::new(),
        }
    }
}

/// Serde-friendly mirror of [`DimensionWeights`] with per-field defaults so a
/// config file can override a single weight set consistently.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DimensionWeightsCfg {
    #[serde(default = "d_scientific")]
    pub scientific: f64,
    #[serde(default = "d_market")]
    pub market: f64,
    #[serde(default = "d_competitive")]
    pub competitive: f64,
    #[serde(default = "d_feasibility")]
    pub feasibility: f64,
}

fn d_scientific() -> f64 {
    0.40
}
fn d_market() -> f64 {
    0.25
}
fn d_competitive() -> f64 {
    0.20
}
fn d_feasibility() -> f64 {
    0.15
}

impl Default for DimensionWeightsCfg {
    fn default() -> Self {
        Self {
            scientific: d_scientific(),
            market: d_market(),
            competitive: d_competitive(),
            feasibility: d_feasibility(),
        }
    }
}

impl ScoringConfig {
    pub fn weights(&self) -> DimensionWeights {
        DimensionWeights {
            scientific: self.weights.scientific,
            market: self.weights.market,
            competitive: self.weights.competitive,
            feasibility: self.weights.feasibility,
        }
    }

    /// Seeded alias table with file entries merged on top.
    pub fn indication_aliases(&self) -> IndicationAliases {
        let mut table = IndicationAliases::default_seed();
        for (alias, canonical) in &self.aliases {
            table.aliases.insert(
                crate::aggregate::normalize_indication(alias),
                crate::aggregate::normalize_indication(canonical),
            );
        }
        table
    }

    /// Load from an explicit path. TOML or JSON, decided by extension hint
    /// with a cross-format fallback.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading scoring config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self::parse(&content, &ext)
    }

    /// Load using the env var and fallback paths; defaults when nothing exists.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_SCORING_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("SCORING_CONFIG_PATH points to non-existent path"));
        }
        for candidate in ["config/scoring.toml", "config/scoring.json"] {
            let pb = PathBuf::from(candidate);
            if pb.exists() {
                return Self::load_from(&pb);
            }
        }
        Ok(Self::default())
    }

    fn parse(s: &str, hint_ext: &str) -> Result<Self> {
        if hint_ext == "json" {
            if let Ok(v) = serde_json::from_str(s) {
                return Ok(v);
            }
        }
        if let Ok(v) = toml::from_str(s) {
            return Ok(v);
        }
        if let Ok(v) = serde_json::from_str(s) {
            return Ok(v);
        }
        Err(anyhow!("unsupported scoring config format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_weights() {
        let cfg = ScoringConfig::default();
        let w = cfg.weights();
        assert_eq!(w.scientific, 0.40);
        assert_eq!(w.market, 0.25);
        assert_eq!(w.competitive, 0.20);
        assert_eq!(w.feasibility, 0.15);
        assert!((w.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn toml_overrides_and_alias_merge() {
        let toml = r#"
            [weights]
            scientific = 0.5
            market = 0.2
            competitive = 0.2
            feasibility = 0.1

            [aliases]
            "PAH" = "pulmonary arterial hypertension"
        "#;
        let cfg = ScoringConfig::parse(toml, "toml").unwrap();
        assert_eq!(cfg.weights().scientific, 0.5);
        let aliases = cfg.indication_aliases();
        assert_eq!(
            aliases.canonical_key("pah").unwrap(),
            "pulmonary arterial hypertension"
        );
        // seed entries survive the merge
        assert_eq!(aliases.canonical_key("NSCLC").unwrap(), "non small cell lung cancer");
    }

    #[test]
    fn json_format_is_accepted() {
        let json = r#"{"weights":{"scientific":0.4,"market":0.25,"competitive":0.2,"feasibility":0.15},"aliases":{}}"#;
        let cfg = ScoringConfig::parse(json, "json").unwrap();
        assert!((cfg.weights().sum() - 1.0).abs() < 1e-12);
    }

    #[serial_test::serial]
    #[test]
    fn env_path_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoring.json");
        let mut f = fs::File::create(&path).unwrap();
        write!(
            f,
            r#"{{"weights":{{"scientific":0.7,"market":0.1,"competitive":0.1,"feasibility":0.1}}}}"#
        )
        .unwrap();

        std::env::set_var(ENV_SCORING_CONFIG_PATH, path.display().to_string());
        let cfg = ScoringConfig::load_default().unwrap();
        std::env::remove_var(ENV_SCORING_CONFIG_PATH);

        assert_eq!(cfg.weights().scientific, 0.7);
    }
}
