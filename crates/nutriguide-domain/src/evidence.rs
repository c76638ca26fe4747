//! Evidence scoring
//!
//! Every interaction carries an integer evidence score in `[0, 5]`. The same
//! number is shown to clients as "severity"; it ranks claims but is never
//! recomputed at runtime.

use std::fmt;

/// Highest evidence score (clinical guideline)
pub const MAX_EVIDENCE_SCORE: u8 = 5;

/// Evidence score in `[0, 5]`, 5 being guideline-level evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EvidenceScore(u8);

impl EvidenceScore {
    /// Create a score, rejecting values above 5
    pub fn new(value: u8) -> Result<Self, String> {
        if value > MAX_EVIDENCE_SCORE {
            return Err(format!(
                "Evidence score must be in [0, {}], got {}",
                MAX_EVIDENCE_SCORE, value
            ));
        }
        Ok(Self(value))
    }

    /// Create a score from a storage integer
    pub fn from_i64(value: i64) -> Result<Self, String> {
        u8::try_from(value)
            .map_err(|_| format!("Evidence score out of range: {}", value))
            .and_then(Self::new)
    }

    /// Raw score
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Fixed label for this score
    pub fn level(&self) -> EvidenceLevel {
        EvidenceLevel::for_score(*self)
    }
}

impl fmt::Display for EvidenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed lookup from score to label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceLevel {
    /// 0 - no source backs the claim
    NoSource,
    /// 1 - anecdotal or traditional use
    Anecdotal,
    /// 2 - preliminary or in-vitro research
    Preliminary,
    /// 3 - observational studies
    Observational,
    /// 4 - controlled clinical trials
    ClinicalTrial,
    /// 5 - published clinical guideline
    Guideline,
}

impl EvidenceLevel {
    /// All levels in ascending score order
    pub const ALL: [EvidenceLevel; 6] = [
        EvidenceLevel::NoSource,
        EvidenceLevel::Anecdotal,
        EvidenceLevel::Preliminary,
        EvidenceLevel::Observational,
        EvidenceLevel::ClinicalTrial,
        EvidenceLevel::Guideline,
    ];

    /// Level for a score
    pub fn for_score(score: EvidenceScore) -> Self {
        Self::ALL[usize::from(score.value())]
    }

    /// Score this level stands for
    pub fn score(&self) -> EvidenceScore {
        let value = match self {
            EvidenceLevel::NoSource => 0,
            EvidenceLevel::Anecdotal => 1,
            EvidenceLevel::Preliminary => 2,
            EvidenceLevel::Observational => 3,
            EvidenceLevel::ClinicalTrial => 4,
            EvidenceLevel::Guideline => 5,
        };
        EvidenceScore(value)
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            EvidenceLevel::NoSource => "No source",
            EvidenceLevel::Anecdotal => "Anecdotal",
            EvidenceLevel::Preliminary => "Preliminary",
            EvidenceLevel::Observational => "Observational",
            EvidenceLevel::ClinicalTrial => "Clinical trial",
            EvidenceLevel::Guideline => "Clinical guideline",
        }
    }
}
