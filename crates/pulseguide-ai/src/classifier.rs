//! Keyword risk classifier for HR and benefits conversations.
//!
//! Two fixed, ordered rule sets are scanned case-insensitively. Any HIGH rule
//! hit decides the tier on its own and MEDIUM rules are not evaluated, so a
//! HIGH assessment never carries MEDIUM triggers. Triggers are the matched
//! text as it appears in the input, one per matching rule, in rule order.

use std::fmt;
use std::str::FromStr;

use pulseguide_core::{RiskAssessment, RiskTier};
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// HR/legal-sensitive vocabulary. Any hit escalates.
pub const HIGH_RISK_PATTERNS: &[&str] = &[
    r"FMLA",
    r"disability",
    r"ADA",
    r"COBRA",
    r"termination",
    r"lawsuit",
    r"legal\s+advice",
    r"discrimination",
    r"harass(ment|ing|ed)?",
    r"uncomfortable",
    r"hostile",
    r"bully(ing)?",
    r"threat(s|ening)?",
    r"union",
    r"grievance",
    r"appeal",
    r"accommodat(e|ion)",
];

/// Benefits-operational vocabulary.
pub const MEDIUM_RISK_PATTERNS: &[&str] = &[
    r"eligibility",
    r"recommend",
    r"compare",
    r"claim",
    r"denial",
    r"coverage",
    r"out.of.network",
    r"dispute",
    r"deadline",
    r"deductible",
    r"copay",
    r"coinsurance",
    r"premium",
    r"prescription",
    r"specialist",
    r"referral",
    r"doctor",
    r"hospital",
    r"emergency",
    r"surgery",
    r"preventive",
    r"medical",
    r"healthcare",
    r"insurance",
    r"plan",
    r"hmo",
    r"ppo",
    r"hdhp",
];

/// How rule patterns are anchored against the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Plain substring search: "planning" matches `plan`.
    #[default]
    Substring,
    /// Patterns must start and end on word boundaries.
    WordBoundary,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::WordBoundary => "word-boundary",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "word-boundary" | "word_boundary" | "word" => Ok(Self::WordBoundary),
            other => Err(format!(
                "unknown match mode '{other}' (expected substring or word-boundary)"
            )),
        }
    }
}

/// Deterministic keyword classifier. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    high: Vec<Regex>,
    medium: Vec<Regex>,
    mode: MatchMode,
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new(MatchMode::default())
    }
}

impl RiskClassifier {
    pub fn new(mode: MatchMode) -> Self {
        Self {
            high: compile_rules(HIGH_RISK_PATTERNS, mode),
            medium: compile_rules(MEDIUM_RISK_PATTERNS, mode),
            mode,
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Classify arbitrary text. Total: every input yields an assessment.
    pub fn classify(&self, text: &str) -> RiskAssessment {
        let high = collect_matches(&self.high, text);
        let assessment = if !high.is_empty() {
            RiskAssessment::new(RiskTier::High, high)
        } else {
            let medium = collect_matches(&self.medium, text);
            if medium.is_empty() {
                RiskAssessment::low()
            } else {
                RiskAssessment::new(RiskTier::Medium, medium)
            }
        };

        debug!(
            tier = %assessment.tier(),
            triggers = ?assessment.triggers(),
            chars = text.len(),
            "classified text"
        );
        assessment
    }
}

fn compile_rules(patterns: &[&str], mode: MatchMode) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| {
            let anchored = match mode {
                MatchMode::Substring => (*p).to_string(),
                MatchMode::WordBoundary => format!(r"\b(?:{p})\b"),
            };
            RegexBuilder::new(&anchored)
                .case_insensitive(true)
                .build()
                .unwrap_or_else(|e| panic!("built-in risk pattern {p:?} is invalid: {e}"))
        })
        .collect()
}

/// First match of each rule, in rule order.
fn collect_matches<'t>(rules: &[Regex], text: &'t str) -> Vec<&'t str> {
    rules
        .iter()
        .filter_map(|re| re.find(text).map(|m| m.as_str()))
        .collect()
}
