//! Policy document lookup for citations.
//!
//! [`DocumentIndex`] is a keyword stand-in for an external semantic search
//! service. It is built once from a fixed corpus and never mutated, so it can
//! be shared freely across threads. The [`Retriever`] trait is the seam where
//! a remote search collaborator plugs in instead.

use std::collections::HashSet;

use pulseguide_core::{
    BenefitCategory, CORPUS_GENERATION, HealthPlan, PolicyDocument, seeded_documents,
};
use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::info;

/// Queries mentioning any of these are treated as health-plan questions.
const HEALTH_QUERY_PATTERN: &str = r"health|medical|doctor|coverage|hospital|copay|deductible|prescription|visit|specialist|benefits|plan";

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("duplicate document id: {0}")]
    DuplicateId(String),
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("document search unavailable: {0}")]
    Unavailable(String),
}

/// Source of citation documents for a query.
///
/// `plan` narrows results to documents that apply to that plan;
/// [`HealthPlan::All`] disables the filter. Returned documents must carry
/// stable ids; callers deduplicate on them.
pub trait Retriever: Send + Sync {
    fn search(&self, query: &str, plan: HealthPlan) -> Result<Vec<PolicyDocument>, RetrievalError>;

    /// [`search`](Self::search) narrowed to one benefit category.
    /// [`BenefitCategory::All`] disables the filter; documents tagged `All`
    /// pass every filter.
    fn search_in(
        &self,
        query: &str,
        plan: HealthPlan,
        category: BenefitCategory,
    ) -> Result<Vec<PolicyDocument>, RetrievalError> {
        let docs = self.search(query, plan)?;
        Ok(docs
            .into_iter()
            .filter(|d| d.category.passes(category))
            .collect())
    }
}

/// Immutable keyword index over a fixed document corpus.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    documents: Vec<PolicyDocument>,
    generation: u32,
    health_query: Regex,
}

impl DocumentIndex {
    /// Build an index over `documents`, tagged with a corpus `generation`.
    pub fn new(documents: Vec<PolicyDocument>, generation: u32) -> Result<Self, IndexError> {
        let mut seen = HashSet::new();
        for doc in &documents {
            if !seen.insert(doc.id.as_str()) {
                return Err(IndexError::DuplicateId(doc.id.clone()));
            }
        }

        let health_query = RegexBuilder::new(HEALTH_QUERY_PATTERN)
            .case_insensitive(true)
            .build()
            .unwrap_or_else(|e| panic!("built-in health query pattern is invalid: {e}"));

        info!(
            documents = documents.len(),
            generation, "built policy document index"
        );
        Ok(Self {
            documents,
            generation,
            health_query,
        })
    }

    /// Index over the built-in corpus at [`CORPUS_GENERATION`].
    pub fn seeded() -> Result<Self, IndexError> {
        Self::new(seeded_documents(), CORPUS_GENERATION)
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn documents(&self) -> &[PolicyDocument] {
        &self.documents
    }

    pub fn get(&self, id: &str) -> Option<&PolicyDocument> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Documents whose title, body, or category label contains `query`,
    /// case-insensitively, in corpus order.
    ///
    /// A blank query matches nothing.
    pub fn retrieve(&self, query: &str) -> Vec<PolicyDocument> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.documents
            .iter()
            .filter(|d| d.contains_lowercase(&needle))
            .cloned()
            .collect()
    }

    /// [`retrieve`](Self::retrieve) narrowed to documents that apply to `plan`.
    ///
    /// For health-related queries on a specific plan, that plan's detail
    /// document is appended when the keyword match did not already find it.
    pub fn retrieve_for_plan(&self, query: &str, plan: HealthPlan) -> Vec<PolicyDocument> {
        let mut docs: Vec<PolicyDocument> = self
            .retrieve(query)
            .into_iter()
            .filter(|d| d.applies_to(plan))
            .collect();

        if let Some(detail_id) = plan.detail_document_id()
            && self.is_health_query(query)
            && !docs.iter().any(|d| d.id == detail_id)
            && let Some(detail) = self.get(detail_id)
        {
            docs.push(detail.clone());
        }
        docs
    }

    /// [`retrieve_for_plan`](Self::retrieve_for_plan) narrowed to `category`.
    pub fn retrieve_filtered(
        &self,
        query: &str,
        plan: HealthPlan,
        category: BenefitCategory,
    ) -> Vec<PolicyDocument> {
        let mut docs = self.retrieve_for_plan(query, plan);
        docs.retain(|d| d.category.passes(category));
        docs
    }

    pub fn is_health_query(&self, query: &str) -> bool {
        self.health_query.is_match(query)
    }
}

impl Retriever for DocumentIndex {
    fn search(&self, query: &str, plan: HealthPlan) -> Result<Vec<PolicyDocument>, RetrievalError> {
        Ok(self.retrieve_for_plan(query, plan))
    }

    fn search_in(
        &self,
        query: &str,
        plan: HealthPlan,
        category: BenefitCategory,
    ) -> Result<Vec<PolicyDocument>, RetrievalError> {
        Ok(self.retrieve_filtered(query, plan, category))
    }
}
