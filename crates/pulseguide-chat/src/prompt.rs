//! System prompt assembly.

use pulseguide_core::PolicyDocument;

use crate::message::EmployeeProfile;

const BASE_PROMPT: &str = "You are PulseGuide, an HR and benefits assistant for PulseTel employees.

Help employees understand their benefits, which vary with their health plan (HDHP, PPO, or HMO) and other eligibility factors. Be helpful, accurate, and personal, and tailor answers to the employee's plan when you can.

If you don't know the answer, say so and suggest contacting HR about their individual benefits.";

/// Base instructions, then the employee context, then retrieved policy text.
pub fn system_prompt(profile: Option<&EmployeeProfile>, context: &[PolicyDocument]) -> String {
    let mut prompt = BASE_PROMPT.to_string();

    if let Some(p) = profile
        && !p.name.trim().is_empty()
    {
        prompt.push_str(&format!(
            "\n\nYou are currently speaking with {} who has the {} plan.",
            p.name, p.plan
        ));
    }

    if !context.is_empty() {
        let bodies: Vec<String> = context
            .iter()
            .map(|d| format!("## {}\n{}", d.title, d.body))
            .collect();
        prompt.push_str("\n\nRelevant benefits documentation:\n\n");
        prompt.push_str(&bodies.join("\n\n"));
        prompt.push_str(
            "\n\nUse this information to answer. If it doesn't fully cover the question, \
             say what the documentation does and does not address.",
        );
    }

    prompt
}
