//! The seeded policy corpus loaded at process start.
//!
//! Bump [`CORPUS_GENERATION`] whenever document content changes so indexes
//! built from an older corpus can be told apart in logs.

use crate::document::{BenefitCategory, HealthPlan, PolicyDocument};

pub const CORPUS_GENERATION: u32 = 4;

struct Seed {
    id: &'static str,
    title: &'static str,
    category: BenefitCategory,
    url: Option<&'static str>,
    plans: &'static [HealthPlan],
    body: &'static str,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "health-benefits-overview",
        title: "Health Benefits Overview",
        category: BenefitCategory::Health,
        url: Some("/Docs/Plan Docs/health-benefits-2024.md"),
        plans: &[HealthPlan::All],
        body: "PulseTel offers three health plans: High-Deductible Health Plan (HDHP), \
               Preferred Provider Organization (PPO), and Health Maintenance Organization (HMO). \
               Each plan has different premium costs, deductibles, and out-of-pocket maximums. \
               The HDHP plan is eligible for a Health Savings Account (HSA).",
    },
    Seed {
        id: "fmla-policy",
        title: "Family and Medical Leave Act (FMLA) Policy",
        category: BenefitCategory::TimeOff,
        url: Some("/Docs/Plan Docs/family-medical-leave.md"),
        plans: &[HealthPlan::All],
        body: "Eligible employees may take up to 12 weeks of unpaid, job-protected leave under the FMLA. \
               Eligibility requires 12 months of employment and 1,250 hours worked in the past 12 months. \
               FMLA leave may be taken for birth/adoption of a child, serious health condition of \
               employee or family member, or qualifying exigencies related to military service.",
    },
    Seed {
        id: "ada-accommodations",
        title: "Americans with Disabilities Act (ADA) Accommodations",
        category: BenefitCategory::Compliance,
        url: Some("/Docs/Plan Docs/ada-accommodations.md"),
        plans: &[HealthPlan::All],
        body: "PulseTel provides reasonable accommodations to qualified individuals with disabilities. \
               Accommodation requests should be directed to HR. Medical documentation may be required. \
               Each request is evaluated on a case-by-case basis. Accommodations may include modified \
               equipment, schedule adjustments, or other workplace changes.",
    },
    Seed {
        id: "401k-plan",
        title: "401(k) Retirement Plan",
        category: BenefitCategory::Retirement,
        url: None,
        plans: &[HealthPlan::All],
        body: "PulseTel offers a 401(k) retirement plan with company matching. Employees are eligible \
               after 90 days of employment. The company matches 100% of the first 3% contributed and \
               50% of the next 2%. Employees may contribute up to the IRS annual limit. Vesting of \
               employer contributions occurs over a 4-year period.",
    },
    Seed {
        id: "cobra-coverage",
        title: "COBRA Continuation Coverage",
        category: BenefitCategory::Health,
        url: None,
        plans: &[HealthPlan::All],
        body: "Under COBRA, employees who lose health coverage due to qualifying events may continue \
               their coverage for a limited time. Qualifying events include termination (except for \
               gross misconduct), reduction in hours, death, divorce, or loss of dependent status. \
               COBRA coverage typically lasts 18 months but may extend to 36 months in certain \
               circumstances. Participants pay the full premium plus a 2% administrative fee.",
    },
    Seed {
        id: "high-deductible-plan",
        title: "High Deductible Health Plan (HDHP) Details",
        category: BenefitCategory::Health,
        url: Some("/api/test-pdf?file=high-deductible-plan-formatted.pdf"),
        plans: &[HealthPlan::Hdhp],
        body: "The HDHP offers comprehensive coverage after meeting the annual deductible and \
               qualifies for a Health Savings Account (HSA). Annual deductible: $1,500 individual, \
               $3,000 family. Out-of-pocket maximum: $3,500 individual, $7,000 family. Coinsurance: \
               10% after deductible. Preventive care is covered 100% with no deductible. The company \
               contributes $500 (individual) or $1,000 (family) to the HSA annually.",
    },
    Seed {
        id: "ppo-plan",
        title: "Preferred Provider Organization (PPO) Plan Details",
        category: BenefitCategory::Health,
        url: Some("/api/test-pdf?file=ppo-plan-formatted.pdf"),
        plans: &[HealthPlan::Ppo],
        body: "The PPO plan covers both in-network and out-of-network providers, with better coverage \
               in network. No referrals are required to see specialists. Annual deductible: $500 \
               individual, $1,000 family. Copays: $25 primary care, $50 specialist. Coinsurance: 20% \
               after deductible. Emergency room: $200 copay, waived if admitted.",
    },
    Seed {
        id: "hmo-plan",
        title: "Health Maintenance Organization (HMO) Plan Details",
        category: BenefitCategory::Health,
        url: Some("/api/test-pdf?file=hmo-plan-formatted.pdf"),
        plans: &[HealthPlan::Hmo],
        body: "The HMO plan provides coverage through a network of providers coordinated by your \
               Primary Care Physician (PCP). There is no annual deductible. Copays: $20 primary care, \
               $40 specialist. Referrals are required for specialist visits. Out-of-network care is \
               not covered except in emergencies.",
    },
];

/// The static corpus in declaration order.
pub fn seeded_documents() -> Vec<PolicyDocument> {
    SEEDS
        .iter()
        .map(|s| PolicyDocument {
            id: s.id.to_string(),
            title: s.title.to_string(),
            body: s.body.to_string(),
            category: s.category,
            url: s.url.map(str::to_string),
            plans: s.plans.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let docs = seeded_documents();
        let ids: HashSet<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), docs.len());
    }

    #[test]
    fn every_specific_plan_has_a_detail_document() {
        let docs = seeded_documents();
        for plan in [HealthPlan::Hdhp, HealthPlan::Ppo, HealthPlan::Hmo] {
            let id = plan.detail_document_id().unwrap();
            let d = docs.iter().find(|d| d.id == id).expect("detail doc");
            assert_eq!(d.plans, vec![plan]);
        }
    }

    #[test]
    fn bodies_have_no_line_continuation_gaps() {
        for d in seeded_documents() {
            assert!(!d.body.contains("  "), "{} has doubled spaces", d.id);
        }
    }

    #[test]
    fn only_linked_documents_carry_urls() {
        let unlinked: Vec<String> = seeded_documents()
            .into_iter()
            .filter(|d| d.url.is_none())
            .map(|d| d.id)
            .collect();
        assert_eq!(unlinked, vec!["401k-plan", "cobra-coverage"]);
    }
}
