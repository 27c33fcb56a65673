//! Per-turn response enhancement.
//!
//! Classifies both sides of an exchange, attaches citations for the query,
//! picks the disclaimer, and writes one audit entry. This is the only place
//! escalation decisions are finalized.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use pulseguide_core::{
    AuditLogEntry, AuditSink, BenefitCategory, HealthPlan, PolicyDocument, RiskAssessment,
    RiskTier,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::classifier::RiskClassifier;
use crate::index::Retriever;

/// Risk, citations, and disclaimer attached to one assistant reply.
#[derive(Debug, Clone, Serialize)]
pub struct EnhancedResult {
    pub reply_text: String,
    pub risk: RiskAssessment,
    /// Unique by id, in first-seen order.
    pub cited_documents: Vec<PolicyDocument>,
    pub disclaimer_text: String,
    pub needs_human_escalation: bool,
}

/// Fixed disclaimer wording per tier.
pub fn disclaimer_for(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::High => {
            "This is general information only, not legal or benefits advice. For personalized guidance on this sensitive topic, please contact HR directly."
        }
        RiskTier::Medium => {
            "This is general information, not personalized advice. For specific questions about your situation, please contact HR."
        }
        RiskTier::Low => {
            "For more information, please refer to your benefits documentation or contact HR."
        }
    }
}

/// Combines classification, retrieval, and auditing for each completed turn.
pub struct ResponseEnhancer {
    classifier: RiskClassifier,
    retriever: Arc<dyn Retriever>,
    audit: Arc<dyn AuditSink>,
}

impl ResponseEnhancer {
    pub fn new(
        classifier: RiskClassifier,
        retriever: Arc<dyn Retriever>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            classifier,
            retriever,
            audit,
        }
    }

    pub fn classifier(&self) -> &RiskClassifier {
        &self.classifier
    }

    /// Enhance a completed reply with no plan filter on citations.
    pub fn enhance(&self, query: &str, reply: &str) -> EnhancedResult {
        self.enhance_for_plan(query, reply, HealthPlan::All)
    }

    /// Enhance a completed reply, narrowing citations to `plan`.
    ///
    /// Never fails: retrieval outages drop citations and audit write failures
    /// are logged, but the result is always returned.
    pub fn enhance_for_plan(&self, query: &str, reply: &str, plan: HealthPlan) -> EnhancedResult {
        self.enhance_filtered(query, reply, plan, BenefitCategory::All)
    }

    /// Like [`enhance_for_plan`](Self::enhance_for_plan), citing only
    /// documents in `category`. Risk and audit are unaffected by the filter.
    pub fn enhance_filtered(
        &self,
        query: &str,
        reply: &str,
        plan: HealthPlan,
        category: BenefitCategory,
    ) -> EnhancedResult {
        let query_risk = self.classifier.classify(query);
        let reply_risk = self.classifier.classify(reply);
        let risk = query_risk.combine(&reply_risk);

        let cited_documents = match self.retriever.search_in(query, plan, category) {
            Ok(docs) => dedup_by_id(docs),
            Err(e) => {
                warn!(error = %e, "citation lookup failed; continuing without sources");
                Vec::new()
            }
        };

        let needs_human_escalation = risk.tier() == RiskTier::High;
        if needs_human_escalation {
            info!(triggers = ?risk.triggers(), "exchange flagged for HR escalation");
        }

        let cited_ids: Vec<&str> = cited_documents.iter().map(|d| d.id.as_str()).collect();
        let entry = AuditLogEntry::new(Utc::now(), query, reply, &risk, &cited_ids);
        if let Err(e) = self.audit.append(&entry) {
            warn!(error = %e, tier = %risk.tier(), "audit append failed; result returned unlogged");
        }

        EnhancedResult {
            reply_text: reply.to_string(),
            disclaimer_text: disclaimer_for(risk.tier()).to_string(),
            risk,
            cited_documents,
            needs_human_escalation,
        }
    }
}

fn dedup_by_id(docs: Vec<PolicyDocument>) -> Vec<PolicyDocument> {
    let mut seen = HashSet::new();
    docs.into_iter()
        .filter(|d| seen.insert(d.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{DocumentIndex, RetrievalError};
    use pulseguide_core::AuditError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        entries: Mutex<Vec<AuditLogEntry>>,
    }

    impl RecordingSink {
        fn entries(&self) -> Vec<AuditLogEntry> {
            self.entries.lock().unwrap().clone()
        }
    }

    impl AuditSink for RecordingSink {
        fn append(&self, entry: &AuditLogEntry) -> Result<(), AuditError> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    struct FailingSink;

    impl AuditSink for FailingSink {
        fn append(&self, _entry: &AuditLogEntry) -> Result<(), AuditError> {
            Err(AuditError::Storage("quota exceeded".into()))
        }
    }

    /// Returns the same document twice, then another one.
    struct DuplicatingRetriever;

    impl Retriever for DuplicatingRetriever {
        fn search(&self, _q: &str, _p: HealthPlan) -> Result<Vec<PolicyDocument>, RetrievalError> {
            Ok(vec![doc("a"), doc("b"), doc("a")])
        }
    }

    struct DownRetriever;

    impl Retriever for DownRetriever {
        fn search(&self, _q: &str, _p: HealthPlan) -> Result<Vec<PolicyDocument>, RetrievalError> {
            Err(RetrievalError::Unavailable("connection refused".into()))
        }
    }

    fn doc(id: &str) -> PolicyDocument {
        PolicyDocument {
            id: id.into(),
            title: format!("Doc {id}"),
            body: String::new(),
            category: BenefitCategory::Health,
            url: None,
            plans: vec![HealthPlan::All],
        }
    }

    fn enhancer_with(sink: Arc<dyn AuditSink>) -> ResponseEnhancer {
        ResponseEnhancer::new(
            RiskClassifier::default(),
            Arc::new(DocumentIndex::seeded().unwrap()),
            sink,
        )
    }

    #[test]
    fn combined_tier_is_max_of_both_sides() {
        let sink = Arc::new(RecordingSink::default());
        let e = enhancer_with(sink);
        let c = RiskClassifier::default();
        let cases = [
            ("hello", "hi there"),
            ("what is my copay", "thanks"),
            ("thanks", "Your COBRA rights apply"),
            ("FMLA?", "Check your deductible"),
            ("", ""),
        ];
        for (q, r) in cases {
            let expected = c.classify(q).tier().max(c.classify(r).tier());
            assert_eq!(e.enhance(q, r).risk.tier(), expected, "({q:?}, {r:?})");
        }
    }

    #[test]
    fn escalation_from_either_side() {
        let e = enhancer_with(Arc::new(RecordingSink::default()));
        assert!(e.enhance("Can I sue for discrimination?", "Please contact HR.").needs_human_escalation);
        assert!(e.enhance("What happens next?", "After termination you may elect COBRA.").needs_human_escalation);
        assert!(!e.enhance("What is my copay?", "It is $25.").needs_human_escalation);
        assert!(!e.enhance("hi", "hello").needs_human_escalation);
    }

    #[test]
    fn triggers_union_both_sides() {
        let e = enhancer_with(Arc::new(RecordingSink::default()));
        let result = e.enhance("What is my copay?", "Your copay depends on the plan.");
        assert_eq!(result.risk.tier(), RiskTier::Medium);
        let triggers: HashSet<&str> = result.risk.triggers().iter().map(String::as_str).collect();
        assert_eq!(triggers, HashSet::from(["copay", "plan"]));
    }

    #[test]
    fn every_call_appends_one_audit_entry() {
        let sink = Arc::new(RecordingSink::default());
        let e = enhancer_with(sink.clone());
        let turns = [
            ("thanks", "you're welcome"),
            ("FMLA", "Eligibility requires 12 months."),
            ("premium", "Premiums vary by plan."),
        ];
        let results: Vec<EnhancedResult> = turns.iter().map(|(q, r)| e.enhance(q, r)).collect();

        let entries = sink.entries();
        assert_eq!(entries.len(), turns.len());
        for (entry, result) in entries.iter().zip(&results) {
            assert_eq!(entry.escalated, result.needs_human_escalation);
            assert_eq!(entry.tier, result.risk.tier());
        }
        assert!(entries[0].source.is_none());
        assert_eq!(entries[1].source.as_deref(), Some("fmla-policy"));
        assert_eq!(
            entries[2].source.as_deref(),
            Some("health-benefits-overview, cobra-coverage")
        );
    }

    #[test]
    fn audit_entry_truncates_reply() {
        let sink = Arc::new(RecordingSink::default());
        let e = enhancer_with(sink.clone());
        let reply = "x".repeat(250);
        e.enhance("hi", &reply);
        let entry = &sink.entries()[0];
        assert_eq!(entry.reply_preview, format!("{}...", "x".repeat(100)));
        assert_eq!(entry.query_text, "hi");
    }

    #[test]
    fn audit_failure_does_not_propagate() {
        let e = enhancer_with(Arc::new(FailingSink));
        let result = e.enhance("FMLA", "Contact HR about leave.");
        assert_eq!(result.risk.tier(), RiskTier::High);
        assert!(result.needs_human_escalation);
        assert_eq!(result.cited_documents[0].id, "fmla-policy");
    }

    #[test]
    fn duplicate_citations_collapsed_in_first_seen_order() {
        let e = ResponseEnhancer::new(
            RiskClassifier::default(),
            Arc::new(DuplicatingRetriever),
            Arc::new(RecordingSink::default()),
        );
        let result = e.enhance("anything", "reply");
        let ids: Vec<&str> = result.cited_documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn retrieval_outage_degrades_to_no_citations() {
        let sink = Arc::new(RecordingSink::default());
        let e = ResponseEnhancer::new(RiskClassifier::default(), Arc::new(DownRetriever), sink.clone());
        let result = e.enhance("What is my deductible?", "It depends.");
        assert!(result.cited_documents.is_empty());
        assert_eq!(result.risk.tier(), RiskTier::Medium);
        assert_eq!(sink.entries().len(), 1);
        assert!(sink.entries()[0].source.is_none());
    }

    #[test]
    fn disclaimer_depends_only_on_tier() {
        let e = enhancer_with(Arc::new(RecordingSink::default()));
        let a = e.enhance("Tell me about COBRA", "ok");
        let b = e.enhance("hi", "Speak to a lawyer about the lawsuit");
        assert_eq!(a.risk.tier(), RiskTier::High);
        assert_eq!(b.risk.tier(), RiskTier::High);
        assert_eq!(a.disclaimer_text, b.disclaimer_text);

        let c = e.enhance("hello", "bye");
        assert_eq!(c.disclaimer_text, disclaimer_for(RiskTier::Low));
    }

    #[test]
    fn disclaimers_are_distinct_per_tier() {
        let texts: HashSet<&str> = RiskTier::ALL.iter().map(|t| disclaimer_for(*t)).collect();
        assert_eq!(texts.len(), 3);
        assert!(disclaimer_for(RiskTier::High).contains("not legal or benefits advice"));
    }

    #[test]
    fn plan_filter_reaches_retriever() {
        let e = enhancer_with(Arc::new(RecordingSink::default()));
        let result = e.enhance_for_plan("specialist", "See your plan.", HealthPlan::Ppo);
        let ids: Vec<&str> = result.cited_documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["ppo-plan"]);
    }

    #[test]
    fn category_filter_reaches_retriever() {
        let sink = Arc::new(RecordingSink::default());
        let e = enhancer_with(sink.clone());

        let health = e.enhance_filtered("premium", "ok", HealthPlan::All, BenefitCategory::Health);
        let ids: Vec<&str> = health.cited_documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["health-benefits-overview", "cobra-coverage"]);

        let leave = e.enhance_filtered("premium", "COBRA applies.", HealthPlan::All, BenefitCategory::TimeOff);
        assert!(leave.cited_documents.is_empty());
        assert_eq!(leave.risk.tier(), RiskTier::High);

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].source, None);
        assert!(entries[1].escalated);
    }

    #[test]
    fn result_serializes_for_display() {
        let e = enhancer_with(Arc::new(RecordingSink::default()));
        let json = serde_json::to_value(e.enhance("FMLA", "ok")).unwrap();
        assert_eq!(json["risk"]["tier"], 3);
        assert_eq!(json["risk"]["escalate"], true);
        assert_eq!(json["needs_human_escalation"], true);
        assert_eq!(json["cited_documents"][0]["id"], "fmla-policy");
    }

    #[test]
    fn reply_text_returned_verbatim() {
        let e = enhancer_with(Arc::new(RecordingSink::default()));
        let reply = "Line one.\n\nLine two.";
        assert_eq!(e.enhance("q", reply).reply_text, reply);
    }
}
