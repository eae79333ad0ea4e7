/// Phrases that short-circuit any call to the gateway.
pub const EMERGENCY_KEYWORDS: [&str; 5] = [
    "severe bleeding",
    "unconscious",
    "suicide",
    "self-harm",
    "chest pain",
];

pub const QUERY_EMERGENCY_REPLY: &str =
    "⚠️ This may be an emergency. Please call your local emergency number immediately.";

pub const ANALYSIS_EMERGENCY_REPLY: &str =
    "⚠️ Emergency-sounding entries found. Advise immediate medical attention.";

/// Case-insensitive substring match against [`EMERGENCY_KEYWORDS`].
pub fn is_emergency(text: &str) -> bool {
    let lower = text.to_lowercase();
    EMERGENCY_KEYWORDS.iter().any(|k| lower.contains(k))
}
