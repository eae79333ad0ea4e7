//! Prompt text sent to the gateway.

use symlog_types::models::Symptom;

pub const SYSTEM_PROMPT: &str = "You are a careful, conservative medical assistant. Provide general observations, \
possible causes, red flags, and suggested next steps for a symptom log; do not give diagnosis. \
If an emergency is suspected, advise immediate medical attention. Keep the advice short and structured.";

const ANALYSIS_INSTRUCTIONS: &str = "Here is a user's recent symptom log. Provide a short structured summary:\n\
1) Brief overall impression (2-3 lines)\n\
2) Top possible causes (bullet list)\n\
3) Red flags / warning signs that require urgent care (bullet list)\n\
4) Practical next steps and self-care suggestions (bullet list)\n\n\
Symptom log:\n";

/// `- {date}: {name} (severity {n}/10) — {notes}`, the notes part only when present.
pub fn symptom_line(symptom: &Symptom) -> String {
    let mut line = format!(
        "- {}: {} (severity {}/10)",
        symptom.date_added, symptom.name, symptom.severity
    );
    if let Some(notes) = symptom.notes.as_deref().filter(|n| !n.is_empty()) {
        line.push_str(" — ");
        line.push_str(notes);
    }
    line
}

/// Build the analysis prompt from entries already in chronological order.
pub fn analysis_prompt(entries: &[Symptom]) -> String {
    let log = entries
        .iter()
        .map(symptom_line)
        .collect::<Vec<_>>()
        .join("\n");
    format!("{ANALYSIS_INSTRUCTIONS}{log}")
}

/// Names and notes of the entries joined into one blob for the emergency filter.
pub fn emergency_haystack(entries: &[Symptom]) -> String {
    entries
        .iter()
        .map(|s| format!("{} {}", s.name, s.notes.as_deref().unwrap_or_default()))
        .collect::<Vec<_>>()
        .join(" ")
}
