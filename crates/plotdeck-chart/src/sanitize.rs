//! Markdown-fence sanitization of raw model output.

/// Strip a leading code fence (optionally carrying a language tag) and a
/// trailing fence. Inner content is left untouched; fenceless input
/// passes through trimmed.
pub fn strip_code_fences(raw: &str) -> String {
    let mut code = raw.trim();

    if let Some(rest) = code.strip_prefix("```") {
        code = match rest.find('\n') {
            // Drop the remainder of the fence line when it is a bare
            // language tag (```python, ```js, or just ```).
            Some(idx) if rest[..idx].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
                &rest[idx + 1..]
            }
            _ => rest,
        };
    }

    if let Some(rest) = code.strip_suffix("```") {
        code = rest;
    }

    code.trim().to_owned()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
