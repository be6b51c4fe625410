use std::collections::HashSet;

use proptest::prelude::*;

use crate::{
    AnalysisOptions, Analyzer, NoEntities, RiskBucket, RuleEngine, Segmenter, EN_HEADINGS,
    HI_HEADINGS,
};

/// Documents assembled from real headings and filler text, so that every
/// segmentation tier gets exercised.
fn contract_like() -> impl Strategy<Value = String> {
    let heading = prop::sample::select(
        EN_HEADINGS
            .iter()
            .chain(HI_HEADINGS)
            .copied()
            .collect::<Vec<&str>>(),
    );
    let body = prop::sample::select(vec![
        "The Vendor shall have no liability.",
        "Net 60 days.",
        "Either party may terminate on notice of 7 days.",
        "Governed by the laws of Singapore.",
        "Each party shall indemnify the other without limit.",
        "",
        "   ",
        "Confidential information is protected in perpetuity.",
    ]);
    let separator = prop::sample::select(vec!["\n", "\n\n", " ", ". ", "\r\n"]);
    prop::collection::vec((heading, separator.clone(), body, separator), 0..8).prop_map(
        |parts| {
            parts
                .into_iter()
                .map(|(heading, sep_a, body, sep_b)| format!("{}{}{}{}", heading, sep_a, body, sep_b))
                .collect()
        },
    )
}

fn any_text() -> impl Strategy<Value = String> {
    prop_oneof![contract_like(), ".{0,300}", "[a-z .\n]{0,200}"]
}

proptest! {
    #[test]
    fn segmentation_is_total(text in any_text()) {
        let clauses = Segmenter::new().segment(&text);
        prop_assert!(!clauses.is_empty());

        let ids: HashSet<&str> = clauses.iter().map(|clause| clause.id.as_str()).collect();
        prop_assert_eq!(ids.len(), clauses.len());
    }

    #[test]
    fn scores_stay_in_range(text in any_text()) {
        let engine = RuleEngine::default();
        for clause in Segmenter::new().segment(&text) {
            let first = engine.score(&clause);
            prop_assert!(first.score <= 10);
            prop_assert_eq!(engine.score(&clause), first);
        }
    }

    #[test]
    fn analysis_invariants(text in any_text()) {
        let analyzer = Analyzer::new(RuleEngine::default()).with_entity_extractor(NoEntities);
        let result = analyzer.analyze(&text, &AnalysisOptions::default());

        prop_assert!(result.overall_score <= 10);
        prop_assert_eq!(result.bucket, RiskBucket::from_score(result.overall_score));
        prop_assert!(result.clauses.iter().all(|report| report.clause.risk <= 10));

        prop_assert!(result.top_risks.len() <= 5);
        prop_assert!(result.top_risks.iter().all(|risk| risk.score >= 5));
        prop_assert!(result
            .top_risks
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score));

        if text.trim().is_empty() {
            prop_assert!(result.clauses.is_empty());
        } else {
            prop_assert!(!result.clauses.is_empty());
        }
    }
}
