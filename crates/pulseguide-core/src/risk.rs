//! Risk tiers and per-text risk assessments.
//!
//! A [`RiskAssessment`] is produced fresh for every classified text and never
//! mutated afterwards. The escalation flag is derived from the tier at
//! construction, so `escalate == (tier == High)` holds for every value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered risk tier. `High` is strictly more severe than `Medium`, which is
/// strictly more severe than `Low`.
///
/// Serialized as its numeric level (1, 2, 3) to match the audit log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RiskTier {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Numeric level: LOW=1, MEDIUM=2, HIGH=3.
    pub fn level(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RiskTier> for u8 {
    fn from(tier: RiskTier) -> Self {
        tier.level()
    }
}

impl TryFrom<u8> for RiskTier {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            other => Err(format!("invalid risk level {other}, expected 1..=3")),
        }
    }
}

/// Risk classification of a single block of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    tier: RiskTier,
    triggers: Vec<String>,
    escalate: bool,
}

impl RiskAssessment {
    /// Build an assessment; duplicate triggers are dropped, keeping first-seen order.
    pub fn new<I, S>(tier: RiskTier, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for t in triggers {
            let t = t.into();
            if !out.contains(&t) {
                out.push(t);
            }
        }
        Self {
            tier,
            triggers: out,
            escalate: tier == RiskTier::High,
        }
    }

    /// LOW tier with no triggers.
    pub fn low() -> Self {
        Self::new(RiskTier::Low, Vec::<String>::new())
    }

    pub fn tier(&self) -> RiskTier {
        self.tier
    }

    /// Matched terms, in first-seen order.
    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    pub fn escalate(&self) -> bool {
        self.escalate
    }

    /// Merge two assessments: the more severe tier wins and triggers are unioned.
    pub fn combine(&self, other: &RiskAssessment) -> RiskAssessment {
        let tier = self.tier.max(other.tier);
        let merged = RiskAssessment::new(
            tier,
            self.triggers.iter().chain(other.triggers.iter()).cloned(),
        );
        debug_assert_eq!(merged.escalate, self.escalate || other.escalate);
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_totally_ordered() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::High);
        assert_eq!(RiskTier::Low.max(RiskTier::High), RiskTier::High);
    }

    #[test]
    fn tier_levels() {
        assert_eq!(RiskTier::Low.level(), 1);
        assert_eq!(RiskTier::Medium.level(), 2);
        assert_eq!(RiskTier::High.level(), 3);
    }

    #[test]
    fn tier_serializes_as_number() {
        assert_eq!(serde_json::to_string(&RiskTier::High).unwrap(), "3");
        let parsed: RiskTier = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, RiskTier::Medium);
        assert!(serde_json::from_str::<RiskTier>("7").is_err());
    }

    #[test]
    fn escalate_follows_tier() {
        for tier in RiskTier::ALL {
            let a = RiskAssessment::new(tier, ["x"]);
            assert_eq!(a.escalate(), tier == RiskTier::High);
        }
    }

    #[test]
    fn duplicate_triggers_dropped() {
        let a = RiskAssessment::new(RiskTier::Medium, ["plan", "copay", "plan"]);
        assert_eq!(a.triggers(), &["plan".to_string(), "copay".to_string()]);
    }

    #[test]
    fn combine_takes_max_and_unions() {
        let q = RiskAssessment::new(RiskTier::Medium, ["deductible", "plan"]);
        let r = RiskAssessment::new(RiskTier::High, ["FMLA", "plan"]);
        let c = q.combine(&r);
        assert_eq!(c.tier(), RiskTier::High);
        assert!(c.escalate());
        assert_eq!(c.triggers().len(), 3);
        for t in ["deductible", "plan", "FMLA"] {
            assert!(c.triggers().iter().any(|x| x == t), "missing {t}");
        }
    }

    #[test]
    fn combine_low_with_low() {
        let c = RiskAssessment::low().combine(&RiskAssessment::low());
        assert_eq!(c.tier(), RiskTier::Low);
        assert!(c.triggers().is_empty());
        assert!(!c.escalate());
    }
}
