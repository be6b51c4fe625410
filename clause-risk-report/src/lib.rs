//! Markdown and PDF rendering of [`AnalysisResult`]s.
//!
//! [`build_markdown`] produces the short export (scores and top risks);
//! [`build_detailed_markdown`] adds summary tables and one section per clause
//! with rule hits, entities and any LLM explanation. [`build_pdf`] lays the
//! detailed report out on A4 pages.

mod pdf;
mod table;

use std::fmt;

use clause_risk::{AnalysisResult, ClauseReport};

pub use pdf::{build_pdf, PdfError};

use table::MarkdownTable;

/// Characters of a clause body shown in the detailed report.
pub const BODY_PREVIEW_CHARS: usize = 2000;

/// Characters of a suggested alternative clause shown in the detailed report.
pub const ALT_CLAUSE_PREVIEW_CHARS: usize = 1000;

pub(crate) const UNTITLED: &str = "Clause";

/// Short report: title, overall score, bucket, duration and the top risks.
pub fn build_markdown(result: &AnalysisResult) -> String {
    let mut md = vec![
        "# Contract Analysis Report\n".to_string(),
        format!("**Overall score:** {}/10  \n", result.overall_score),
        format!("**Bucket:** {}  \n", result.bucket),
        format!("**Duration:** {} ms\n", result.duration_ms),
    ];

    if !result.top_risks.is_empty() {
        md.push("\n## Top Risks\n".to_string());
        for risk in &result.top_risks {
            let mut line = format!("- **{}** — {}/10", risk.title, risk.score);
            if !risk.reason.is_empty() {
                line.push_str("\n  ");
                line.push_str(&risk.reason);
            }
            md.push(line);
        }
    }

    md.join("\n")
}

/// Full report with summary and top-risk tables and a section per clause.
pub fn build_detailed_markdown(result: &AnalysisResult) -> String {
    DetailedReport(result).to_string()
}

/// Clause label used in detailed headings: `0` is Safe, then the
/// [`RiskBucket`](clause_risk::RiskBucket) thresholds.
pub fn risk_label(risk: u8) -> &'static str {
    match risk {
        0 => "Safe",
        1..=3 => "Low",
        4..=6 => "Medium",
        _ => "High",
    }
}

struct DetailedReport<'a>(&'a AnalysisResult);

impl fmt::Display for DetailedReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(f, "# Contract Analysis Report\n")?;
        writeln!(f, "## Summary\n")?;
        let summary = MarkdownTable::new(["Field", "Value"])
            .row(["Overall Score".to_string(), format!("{} / 10", result.overall_score)])
            .row(["Risk Bucket".to_string(), result.bucket.to_string()])
            .row(["Duration".to_string(), format!("{} ms", result.duration_ms)]);
        write!(f, "{}", summary)?;

        if !result.top_risks.is_empty() {
            writeln!(f, "\n## Top Risks\n")?;
            let risks = result
                .top_risks
                .iter()
                .fold(MarkdownTable::new(["Clause Title", "Score", "Reason"]), |table, risk| {
                    table.row([risk.title.clone(), risk.score.to_string(), risk.reason.clone()])
                });
            write!(f, "{}", risks)?;
        }

        if !result.clauses.is_empty() {
            writeln!(f, "\n## Clauses")?;
            for report in &result.clauses {
                write!(f, "{}", ClauseSection(report))?;
            }
        }
        Ok(())
    }
}

struct ClauseSection<'a>(&'a ClauseReport);

impl fmt::Display for ClauseSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let clause = &report.clause;
        let title = if clause.title.is_empty() {
            UNTITLED
        } else {
            clause.title.as_str()
        };
        writeln!(
            f,
            "\n### {} — {} ({}/10)\n",
            title,
            risk_label(clause.risk),
            clause.risk
        )?;

        let body = prefix(&clause.text, BODY_PREVIEW_CHARS);
        writeln!(f, "{}", if body.is_empty() { "-" } else { body })?;

        if let Some(hits) = clause.joined_hits() {
            writeln!(f, "\n**Rule hits:** {}", hits)?;
        }
        if !report.entities.is_empty() {
            writeln!(f, "\n**Entities:** {}", report.entities.join(", "))?;
        }

        let note = match &report.llm {
            Some(note) => note,
            None => return Ok(()),
        };
        if !note.explanation.is_empty() {
            writeln!(f, "\n**Explanation:**\n\n{}", note.explanation)?;
        }
        if let Some(issue) = non_empty(&note.issue) {
            writeln!(f, "\n**Issue:**\n\n{}", issue)?;
        }
        if let Some(alt) = non_empty(&note.alt_clause) {
            writeln!(
                f,
                "\n**Suggested Alternative:**\n\n```text\n{}\n```",
                prefix(alt, ALT_CLAUSE_PREVIEW_CHARS)
            )?;
        }
        Ok(())
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

pub(crate) fn prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalysisResult {
        serde_json::from_str(
            r#"{
                "overall_score": 7,
                "bucket": "High",
                "duration_ms": 42,
                "top_risks": [
                    {"title": "Liability", "score": 10, "reason": "liability_disclaimed, liability_cap_missing"}
                ],
                "clauses": [
                    {
                        "id": "c1",
                        "title": "Liability",
                        "text": "The Vendor shall have no liability for any loss.",
                        "risk": 10,
                        "rule_hits": ["liability_disclaimed", "liability_cap_missing"],
                        "entities": ["Vendor Pvt Ltd (ORG)"],
                        "llm": {
                            "explanation": "The vendor escapes all responsibility.",
                            "issue": "No remedy for losses",
                            "alt_clause": "Liability is capped at fees paid.",
                            "risk_0_10": 9
                        }
                    },
                    {"id": "c2", "title": "Confidentiality", "text": "", "risk": 0}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn short_report() {
        assert_eq!(
            build_markdown(&sample()),
            "# Contract Analysis Report\n\n\
             **Overall score:** 7/10  \n\n\
             **Bucket:** High  \n\n\
             **Duration:** 42 ms\n\n\
             \n## Top Risks\n\n\
             - **Liability** — 10/10\n  liability_disclaimed, liability_cap_missing"
        );
    }

    #[test]
    fn short_report_without_risks() {
        let result = AnalysisResult::empty(3);
        assert_eq!(
            build_markdown(&result),
            "# Contract Analysis Report\n\n\
             **Overall score:** 0/10  \n\n\
             **Bucket:** Low  \n\n\
             **Duration:** 3 ms\n"
        );
    }

    #[test]
    fn detailed_report() {
        insta::assert_snapshot!(build_detailed_markdown(&sample()), @r###"
        # Contract Analysis Report

        ## Summary

        | Field         | Value  |
        | ------------- | ------ |
        | Overall Score | 7 / 10 |
        | Risk Bucket   | High   |
        | Duration      | 42 ms  |

        ## Top Risks

        | Clause Title | Score | Reason                                      |
        | ------------ | ----- | ------------------------------------------- |
        | Liability    | 10    | liability_disclaimed, liability_cap_missing |

        ## Clauses

        ### Liability — High (10/10)

        The Vendor shall have no liability for any loss.

        **Rule hits:** liability_disclaimed, liability_cap_missing

        **Entities:** Vendor Pvt Ltd (ORG)

        **Explanation:**

        The vendor escapes all responsibility.

        **Issue:**

        No remedy for losses

        **Suggested Alternative:**

        ```text
        Liability is capped at fees paid.
        ```

        ### Confidentiality — Safe (0/10)

        -
        "###);
    }

    #[test]
    fn detailed_report_of_empty_result() {
        insta::assert_snapshot!(build_detailed_markdown(&AnalysisResult::empty(0)), @r###"
        # Contract Analysis Report

        ## Summary

        | Field         | Value  |
        | ------------- | ------ |
        | Overall Score | 0 / 10 |
        | Risk Bucket   | Low    |
        | Duration      | 0 ms   |
        "###);
    }

    #[test]
    fn long_text_is_truncated() {
        let mut result = sample();
        result.clauses[0].clause.text = "x".repeat(BODY_PREVIEW_CHARS + 500);
        if let Some(note) = result.clauses[0].llm.as_mut() {
            note.alt_clause = Some("y".repeat(ALT_CLAUSE_PREVIEW_CHARS + 1));
        }
        let md = build_detailed_markdown(&result);
        assert!(md.contains(&format!("\n{}\n", "x".repeat(BODY_PREVIEW_CHARS))));
        assert!(!md.contains(&"x".repeat(BODY_PREVIEW_CHARS + 1)));
        assert!(md.contains(&format!("```text\n{}\n```", "y".repeat(ALT_CLAUSE_PREVIEW_CHARS))));
    }

    #[test]
    fn labels() {
        assert_eq!(risk_label(0), "Safe");
        assert_eq!(risk_label(3), "Low");
        assert_eq!(risk_label(6), "Medium");
        assert_eq!(risk_label(7), "High");
    }
}
