//! Policy documents and the closed plan/category vocabularies used to filter them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Health plan an employee is enrolled in, or `All` for plan-agnostic content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthPlan {
    #[serde(rename = "HDHP")]
    Hdhp,
    #[serde(rename = "PPO")]
    Ppo,
    #[serde(rename = "HMO")]
    Hmo,
    All,
}

impl HealthPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hdhp => "HDHP",
            Self::Ppo => "PPO",
            Self::Hmo => "HMO",
            Self::All => "All",
        }
    }

    /// Id of the plan's detail document in the seeded corpus. `None` for `All`.
    pub fn detail_document_id(&self) -> Option<&'static str> {
        match self {
            Self::Hdhp => Some("high-deductible-plan"),
            Self::Ppo => Some("ppo-plan"),
            Self::Hmo => Some("hmo-plan"),
            Self::All => None,
        }
    }
}

impl fmt::Display for HealthPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hdhp" => Ok(Self::Hdhp),
            "ppo" => Ok(Self::Ppo),
            "hmo" => Ok(Self::Hmo),
            "all" => Ok(Self::All),
            other => Err(format!("unknown health plan '{other}' (expected HDHP, PPO, HMO or All)")),
        }
    }
}

/// Benefit area a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BenefitCategory {
    Health,
    Dental,
    Vision,
    Retirement,
    TimeOff,
    Compliance,
    All,
}

impl BenefitCategory {
    /// Human-readable label; also the text searched by keyword retrieval.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Health => "Health Insurance",
            Self::Dental => "Dental",
            Self::Vision => "Vision",
            Self::Retirement => "Retirement",
            Self::TimeOff => "Leave",
            Self::Compliance => "Compliance",
            Self::All => "All",
        }
    }

    /// Whether a document in this category passes a category filter.
    pub fn passes(&self, filter: BenefitCategory) -> bool {
        match filter {
            Self::All => true,
            wanted => *self == wanted || *self == Self::All,
        }
    }
}

impl fmt::Display for BenefitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BenefitCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "health" => Ok(Self::Health),
            "dental" => Ok(Self::Dental),
            "vision" => Ok(Self::Vision),
            "retirement" => Ok(Self::Retirement),
            "timeoff" | "time-off" | "leave" => Ok(Self::TimeOff),
            "compliance" => Ok(Self::Compliance),
            "all" => Ok(Self::All),
            other => Err(format!("unknown benefit category '{other}'")),
        }
    }
}

/// A static policy document. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub id: String,
    pub title: String,
    pub body: String,
    pub category: BenefitCategory,
    pub url: Option<String>,
    /// Plans this document applies to. `HealthPlan::All` covers every plan.
    pub plans: Vec<HealthPlan>,
}

impl PolicyDocument {
    /// Whether the document is relevant to an employee on `plan`.
    ///
    /// `HealthPlan::All` as the argument disables filtering.
    pub fn applies_to(&self, plan: HealthPlan) -> bool {
        match plan {
            HealthPlan::All => true,
            specific => self
                .plans
                .iter()
                .any(|p| *p == specific || *p == HealthPlan::All),
        }
    }

    /// Case-insensitive containment of an already-lowercased needle in the
    /// title, body, or category label.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.body.to_lowercase().contains(needle)
            || self.category.label().to_lowercase().contains(needle)
    }
}
