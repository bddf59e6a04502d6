//! Study configuration file handling.
//!
//! An optional JSON file that fixes the results path, delay profile, offer
//! bounds, and (for piloting) a pinned condition. CLI flags override
//! individual fields after loading.

use crate::condition::{BatnaStrength, ReplyTempo};
use crate::results::DEFAULT_RESULTS_PATH;
use crate::script::DelayProfile;
use crate::session::{DEFAULT_OFFER_EUR, MAX_OFFER_EUR, MIN_OFFER_EUR, OFFER_STEP_EUR};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strum::{Display, EnumIter, EnumString};

/// Which delay profile the scripted counterpart uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum DelayProfileKind {
    /// The study timings
    #[default]
    #[strum(serialize = "standard")]
    Standard,
    /// Standard timings divided by ten, for piloting
    #[strum(serialize = "accelerated")]
    Accelerated,
}

impl DelayProfileKind {
    pub fn profile(self) -> DelayProfile {
        match self {
            Self::Standard => DelayProfile::standard(),
            Self::Accelerated => DelayProfile::accelerated(),
        }
    }
}

/// Study configuration that can be saved/loaded as JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Where result rows are appended
    pub results_path: PathBuf,

    /// Delay profile for the scripted counterpart
    pub delays: DelayProfileKind,

    // Offer entry on the scenario screen
    pub default_offer_eur: u32,
    pub min_offer_eur: u32,
    pub max_offer_eur: u32,
    pub offer_step_eur: u32,

    /// Pin the reply tempo instead of drawing it (piloting only)
    pub tempo: Option<ReplyTempo>,
    /// Pin the BATNA strength instead of drawing it (piloting only)
    pub batna: Option<BatnaStrength>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            results_path: PathBuf::from(DEFAULT_RESULTS_PATH),
            delays: DelayProfileKind::Standard,
            default_offer_eur: DEFAULT_OFFER_EUR,
            min_offer_eur: MIN_OFFER_EUR,
            max_offer_eur: MAX_OFFER_EUR,
            offer_step_eur: OFFER_STEP_EUR,
            tempo: None,
            batna: None,
        }
    }
}

impl StudyConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize study config to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write study config to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read study config from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse study config JSON")?;

        Ok(config)
    }

    /// Validate internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.results_path.as_os_str().is_empty() {
            anyhow::bail!("Results path must not be empty");
        }
        if self.min_offer_eur >= self.max_offer_eur {
            anyhow::bail!(
                "Offer bounds are inverted: min {} >= max {}",
                self.min_offer_eur,
                self.max_offer_eur
            );
        }
        if self.default_offer_eur < self.min_offer_eur
            || self.default_offer_eur > self.max_offer_eur
        {
            anyhow::bail!(
                "Default offer {} is outside [{}, {}]",
                self.default_offer_eur,
                self.min_offer_eur,
                self.max_offer_eur
            );
        }
        if self.offer_step_eur == 0 {
            anyhow::bail!("Offer step must be positive");
        }
        Ok(())
    }
}
