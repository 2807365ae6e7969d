//! Caller-facing model aliases.
//!
//! Callers pick a tier by alias; the concrete upstream identifier stays
//! a server-side decision so model upgrades never break clients.

/// Alias used when the caller does not specify a model.
pub const DEFAULT_MODEL_ALIAS: &str = "deepseek";

/// Map a caller-facing alias to the upstream model identifier.
///
/// Unknown aliases fall back to the cost-efficient default tier rather
/// than failing the request.
pub fn resolve_model(alias: &str) -> &'static str {
    match alias.to_ascii_lowercase().as_str() {
        "deepseek" => "gpt-4o-mini",
        "gpt4" => "gpt-4o",
        "gpt35" => "gpt-3.5-turbo",
        _ => "gpt-4o-mini",
    }
}
