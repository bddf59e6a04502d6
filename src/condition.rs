//! Type-safe experimental conditions for ParleyLab
//!
//! This module replaces stringly-typed condition labels with proper Rust enums
//! that provide compile-time validation and exhaustive matching.

use rand::RngExt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// How quickly the simulated client reacts to the participant's offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReplyTempo {
    /// Client accepts the offer after one second
    #[default]
    #[strum(serialize = "immediate")]
    Immediate,
    /// Client stalls, then accepts after two long pauses
    #[strum(serialize = "deliberate")]
    Deliberate,
    /// Client counters below the offer before yielding
    #[strum(serialize = "counteroffer")]
    CounterOffer,
}

/// Strength of the participant's fallback option (BATNA)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BatnaStrength {
    /// Another project at 440 EUR is in prospect
    #[default]
    #[strum(serialize = "strong")]
    Strong,
    /// No other concrete offer on the table
    #[strum(serialize = "weak")]
    Weak,
}

/// Self-reported negotiation experience (questionnaire field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Experience {
    #[default]
    #[strum(serialize = "low")]
    Low,
    #[strum(serialize = "medium")]
    Medium,
    #[strum(serialize = "high")]
    High,
}

impl Experience {
    /// Cycle to the next experience level (wraps around), used by the survey form
    pub fn next(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }

    /// Cycle to the previous experience level (wraps around)
    pub fn previous(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::Medium => Self::Low,
            Self::High => Self::Medium,
        }
    }
}

/// The condition assigned to one session: reply tempo crossed with BATNA strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Condition {
    pub tempo: ReplyTempo,
    pub batna: BatnaStrength,
}

impl Condition {
    /// Draw a condition uniformly at random.
    ///
    /// With `seed` the draw is deterministic, which is what `--seed` uses for
    /// reproducible pilot runs. `pin_tempo`/`pin_batna` override the drawn
    /// value on that axis while leaving the other axis random.
    pub fn draw(
        seed: Option<u64>,
        pin_tempo: Option<ReplyTempo>,
        pin_batna: Option<BatnaStrength>,
    ) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let tempos: Vec<ReplyTempo> = ReplyTempo::iter().collect();
        let batnas: Vec<BatnaStrength> = BatnaStrength::iter().collect();

        Self {
            tempo: pin_tempo.unwrap_or_else(|| tempos[rng.random_range(0..tempos.len())]),
            batna: pin_batna.unwrap_or_else(|| batnas[rng.random_range(0..batnas.len())]),
        }
    }

    /// All tempo x batna combinations, in a stable order (used by `summary`)
    pub fn all_combinations() -> Vec<Self> {
        let mut out = Vec::new();
        for tempo in ReplyTempo::iter() {
            for batna in BatnaStrength::iter() {
                out.push(Self { tempo, batna });
            }
        }
        out
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.tempo, self.batna)
    }
}
