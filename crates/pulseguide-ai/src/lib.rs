//! Risk scoring and response enhancement: keyword classification, policy
//! citation lookup, and the composition rule applied to every assistant turn.

pub mod classifier;
pub mod enhancer;
pub mod index;
pub mod render;

pub use classifier::{MatchMode, RiskClassifier};
pub use enhancer::{EnhancedResult, ResponseEnhancer, disclaimer_for};
pub use index::{DocumentIndex, IndexError, RetrievalError, Retriever};
pub use render::{format_citation, format_citations};
