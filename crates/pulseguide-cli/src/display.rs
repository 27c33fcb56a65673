//! Vertical card display for assessments, enhanced replies and audit entries.

use std::fmt::Write;

use pulseguide_ai::{EnhancedResult, format_citation};
use pulseguide_core::{AuditLogEntry, PolicyDocument, RiskAssessment};

const LABEL_WIDTH: usize = 12;

// ── Public API ──

pub fn print_assessment(risk: &RiskAssessment) {
    print!("{}", assessment_card(risk));
}

pub fn print_documents(docs: &[PolicyDocument]) {
    if docs.is_empty() {
        println!("No matching documents.");
        return;
    }
    for doc in docs {
        println!("  {:<24} {}", doc.id, format_citation(doc));
    }
}

/// Print the card followed by the message exactly as the employee sees it.
pub fn print_enhanced(result: &EnhancedResult) {
    print!("{}", enhanced_card(result));
    println!("--- message ---");
    println!("{}", result.render());
}

pub fn print_audit_log(entries: &[AuditLogEntry]) {
    if entries.is_empty() {
        println!("Audit log is empty.");
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        print!("{}", audit_card(i + 1, entry));
    }
    let escalated = entries.iter().filter(|e| e.escalated).count();
    println!("{} entries, {} escalated", entries.len(), escalated);
}

// ── Card rendering ──

fn assessment_card(risk: &RiskAssessment) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Risk: {} ===", risk.tier());
    field(&mut out, "escalate", yes_no(risk.escalate()));
    field(&mut out, "triggers", &join_or_dash(risk.triggers()));
    out.push('\n');
    out
}

fn enhanced_card(result: &EnhancedResult) -> String {
    let mut out = assessment_card(&result.risk);
    if !result.cited_documents.is_empty() {
        out.push_str("Sources\n");
        for doc in &result.cited_documents {
            field(&mut out, &doc.id, &doc.title);
        }
        out.push('\n');
    }
    out
}

fn audit_card(n: usize, entry: &AuditLogEntry) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "#{n} {} [{}]{}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.tier,
        if entry.escalated { " ESCALATED" } else { "" }
    );
    field(&mut out, "query", &entry.query_text);
    field(&mut out, "response", &entry.reply_preview);
    field(&mut out, "triggers", &join_or_dash(&entry.triggers));
    if let Some(source) = &entry.source {
        field(&mut out, "source", source);
    }
    out.push('\n');
    out
}

fn field(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {label:<LABEL_WIDTH$} {value}");
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
