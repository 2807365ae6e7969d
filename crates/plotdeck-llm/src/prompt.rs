//! Prompt composition.
//!
//! Chart requests wrap the user's intent in a fixed instruction template
//! targeting the server's scoped plotting evaluator: the table is
//! pre-bound as `df`, the recording plot handle as `plt`, and save/show
//! calls are injected by the engine, so the model must emit plotting
//! statements only.

/// Instruction template for chart-code generation.
pub fn chart_prompt(user_prompt: &str) -> String {
    format!(
        "Given a dataset bound to the variable 'df' (one array per column, \
         plus df.columns with the ordered column names), write JavaScript \
         statements using the plotting handle 'plt' to: {user_prompt}\n\
         \n\
         Requirements:\n\
         - Use only the provided 'plt' handle: scatter(x, y), plot(y) or plot(x, y), \
         bar(labels, values), hist(values, bins), xlabel(s), ylabel(s), title(s)\n\
         - The dataset 'df' is already loaded; access a column as df[\"name\"]\n\
         - Do not declare imports or helper libraries\n\
         - Do not call plt.show() or plt.savefig() - saving is handled automatically\n\
         - Make the plot clear and readable with proper labels\n\
         \n\
         Generate only the plotting statements:"
    )
}

/// System message for chart-code generation.
pub fn chart_system_message() -> &'static str {
    "You are a helpful data visualization assistant. Generate clean, working plotting code."
}

/// Language-conditioned system message for text chat, optionally
/// grounded in a dataset summary. `load_error` carries the dataset name
/// and failure detail when loading failed: the chat degrades instead of
/// failing.
pub fn chat_system_message(
    lang: &str,
    dataset_summary: Option<&str>,
    load_error: Option<(&str, &str)>,
) -> String {
    let mut message = if lang.eq_ignore_ascii_case("ar") {
        "You are a helpful AI assistant. Respond in Arabic only. \
         Use clear, natural Arabic phrasing."
            .to_owned()
    } else {
        "You are a helpful AI assistant. Provide clear, concise, and helpful responses."
            .to_owned()
    };

    if let Some(summary) = dataset_summary {
        message.push_str(
            "\n\nYou have access to a dataset with the following information:\n",
        );
        message.push_str(summary);
        message.push_str(
            "\n\nWhen answering questions about the data, refer to this dataset \
             information. Provide insights and analysis based on the summary provided.",
        );
    }

    if let Some((dataset, err)) = load_error {
        message.push_str(&format!("\n\nNote: Could not load dataset '{dataset}': {err}"));
    }

    message
}

/// User message, prefixed with a bracketed context marker when a dataset
/// is in scope.
pub fn chat_user_message(prompt: &str, dataset: Option<&str>) -> String {
    match dataset {
        Some(name) => format!("[Context: Analyzing dataset '{name}']\n\n{prompt}"),
        None => prompt.to_owned(),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn chart_prompt_embeds_user_intent() {
        let p = chart_prompt("plot revenue by month");
        assert!(p.contains("plot revenue by month"));
        assert!(p.contains("plt.show()"));
        assert!(p.contains("already loaded"));
    }

    #[test]
    fn arabic_language_gates_system_message() {
        let m = chat_system_message("ar", None, None);
        assert!(m.contains("Arabic only"));
        let m = chat_system_message("en", None, None);
        assert!(!m.contains("Arabic"));
    }

    #[test]
    fn summary_and_directive_are_appended() {
        let m = chat_system_message("en", Some("- Shape: 3 rows"), None);
        assert!(m.contains("- Shape: 3 rows"));
        assert!(m.contains("refer to this dataset information"));
    }

    #[test]
    fn load_failure_degrades_with_a_note() {
        let m = chat_system_message("en", None, Some(("sales", "dataset not found")));
        assert!(m.contains("Could not load dataset 'sales'"));
        assert!(m.contains("dataset not found"));
    }

    #[test]
    fn user_message_carries_context_marker() {
        assert_eq!(
            chat_user_message("what is the trend?", Some("sales")),
            "[Context: Analyzing dataset 'sales']\n\nwhat is the trend?"
        );
        assert_eq!(chat_user_message("hi", None), "hi");
    }
}
