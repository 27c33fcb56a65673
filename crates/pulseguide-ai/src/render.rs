//! Plain-text rendering of citations and enhanced replies.

use pulseguide_core::PolicyDocument;

use crate::enhancer::EnhancedResult;

/// `Source: {title} ({category})`, plus a pointer when the full document is linked.
pub fn format_citation(doc: &PolicyDocument) -> String {
    let link = if doc.url.is_some() {
        " - See full document"
    } else {
        ""
    };
    format!("Source: {} ({}){link}", doc.title, doc.category.label())
}

/// One citation per line; empty when there are no documents.
pub fn format_citations(docs: &[PolicyDocument]) -> String {
    docs.iter()
        .map(format_citation)
        .collect::<Vec<_>>()
        .join("\n")
}

impl EnhancedResult {
    /// Reply followed by its citations and disclaimer, separated by blank lines.
    pub fn render(&self) -> String {
        let mut out = self.reply_text.clone();
        let citations = format_citations(&self.cited_documents);
        if !citations.is_empty() {
            out.push_str("\n\n");
            out.push_str(&citations);
        }
        if !self.disclaimer_text.is_empty() {
            out.push_str("\n\n");
            out.push_str(&self.disclaimer_text);
        }
        out
    }
}
