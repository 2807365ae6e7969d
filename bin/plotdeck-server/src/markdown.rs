//! Flattens markdown chat replies to plain text.
//!
//! The chat endpoint returns both the raw markdown and a plain rendering
//! for clients that display unformatted text. This is a small line-based
//! stripper for the constructs chat models actually emit, not a full
//! markdown parser.

/// Strip markdown formatting: headings, emphasis, inline code, links and
/// list markers. Fenced code blocks keep their content without the fence
/// lines.
pub fn markdown_to_plain(markdown: &str) -> String {
    let mut out = Vec::new();
    let mut in_fence = false;

    for line in markdown.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            out.push(line.to_owned());
            continue;
        }

        let line = strip_heading(trimmed);
        let line = strip_list_marker(line);
        out.push(strip_inline(line));
    }

    out.join("\n").trim().to_owned()
}

fn strip_heading(line: &str) -> &str {
    let stripped = line.trim_start_matches('#');
    if stripped.len() < line.len() {
        stripped.trim_start()
    } else {
        line
    }
}

fn strip_list_marker(line: &str) -> &str {
    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest;
        }
    }
    line
}

/// Remove emphasis and inline-code markers, unwrap `[text](url)` links.
fn strip_inline(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' | '_' | '`' => {}
            '[' => {
                // Collect the link text; on a following "(url)" drop the
                // target, otherwise keep the brackets verbatim.
                let mut text = String::new();
                let mut closed = false;
                for t in chars.by_ref() {
                    if t == ']' {
                        closed = true;
                        break;
                    }
                    text.push(t);
                }
                if closed && chars.peek() == Some(&'(') {
                    for t in chars.by_ref() {
                        if t == ')' {
                            break;
                        }
                    }
                    out.push_str(&text);
                } else {
                    out.push('[');
                    out.push_str(&text);
                    if closed {
                        out.push(']');
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_headings_and_emphasis() {
        let md = "## Results\n\nThe **mean** is *higher* than `median`.";
        assert_eq!(
            markdown_to_plain(md),
            "Results\n\nThe mean is higher than median."
        );
    }

    #[test]
    fn unwraps_links() {
        assert_eq!(
            markdown_to_plain("See [the docs](https://example.com) for more."),
            "See the docs for more."
        );
    }

    #[test]
    fn keeps_bracketed_text_without_target() {
        assert_eq!(markdown_to_plain("array[0] is first"), "array[0] is first");
    }

    #[test]
    fn list_markers_are_dropped() {
        assert_eq!(markdown_to_plain("- one\n- two"), "one\ntwo");
    }

    #[test]
    fn fences_are_removed_but_code_kept() {
        let md = "before\n```python\nx = 1\n```\nafter";
        assert_eq!(markdown_to_plain(md), "before\nx = 1\nafter");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(markdown_to_plain("nothing fancy here"), "nothing fancy here");
    }
}
