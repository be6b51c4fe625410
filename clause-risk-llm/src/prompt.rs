use clause_risk::ExplainRequest;

pub const SYSTEM_PROMPT: &str = "You are an Indian SME contract assistant. Analyze the clause below and respond in STRICT JSON.\n\
Keep it concise and practical for a business owner (<=120 words explanation). \
Use Indian legal context; do not give legal advice disclaimers.\n\n\
JSON schema:\n\
{\n  \"explanation\": str,\n  \"issue\": str|null,\n  \"alt_clause\": str|null,\n  \"risk_0_10\": int\n}\n";

/// Characters of the document summary included in the prompt.
pub const SUMMARY_PROMPT_CHARS: usize = 600;

/// Characters of the clause body included in the prompt.
pub const CLAUSE_PROMPT_CHARS: usize = 4000;

const UNTITLED: &str = "Clause";

pub fn user_prompt(request: &ExplainRequest<'_>) -> String {
    let title = if request.title.is_empty() {
        UNTITLED
    } else {
        request.title
    };
    format!(
        "Language: {}\nContract summary (short): {}\nClause title: {}\nClause text:\n{}\n\n\
         Return ONLY the JSON. No prose outside JSON.",
        request.lang,
        prefix(request.summary, SUMMARY_PROMPT_CHARS),
        title,
        prefix(request.clause_text, CLAUSE_PROMPT_CHARS),
    )
}

fn prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request<'a>(title: &'a str, clause_text: &'a str, summary: &'a str) -> ExplainRequest<'a> {
        ExplainRequest {
            clause_text,
            title,
            lang: "Hindi",
            summary,
            timeout: Duration::from_secs(6),
        }
    }

    #[test]
    fn renders_user_prompt() {
        insta::assert_snapshot!(user_prompt(&request("", "Net 60 days.", "Payment Net 60 days.")), @r###"
        Language: Hindi
        Contract summary (short): Payment Net 60 days.
        Clause title: Clause
        Clause text:
        Net 60 days.

        Return ONLY the JSON. No prose outside JSON.
        "###);
    }

    #[test]
    fn inputs_are_truncated() {
        let summary = "s".repeat(700);
        let clause = "क".repeat(4100);
        let prompt = user_prompt(&request("Payment", &clause, &summary));
        assert!(prompt.contains(&format!("(short): {}\n", "s".repeat(600))));
        assert!(prompt.contains(&format!("text:\n{}\n\n", "क".repeat(4000))));
    }

    #[test]
    fn system_prompt_carries_schema() {
        assert!(SYSTEM_PROMPT.starts_with("You are an Indian SME contract assistant."));
        assert!(SYSTEM_PROMPT.contains("\"risk_0_10\": int\n}"));
    }
}
