//! System prompt assembly with team rules appended.

pub const RULES_HEADER: &str = "--- TEAM RULES ---";

/// Append team rules to an agent's system prompt.
///
/// The base prompt is left untouched when there are no rules.
pub fn inject_rules(system: &str, rules: &str) -> String {
    match (system.is_empty(), rules.is_empty()) {
        (_, true) => system.to_string(),
        (true, false) => format!("{RULES_HEADER}\n{rules}"),
        (false, false) => format!("{system}\n\n{RULES_HEADER}\n{rules}"),
    }
}
