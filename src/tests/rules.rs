use crate::{Clause, RiskAssessment, RuleEngine, RuleId, RuleWeights, SOFT_CAP};

fn assess(text: &str) -> RiskAssessment {
    RuleEngine::default().score_text(text)
}

fn hits(text: &str) -> Vec<&'static str> {
    assess(text).hits.into_iter().map(RuleId::as_str).collect()
}

// ============ Payment ============

#[test]
fn long_payment_terms_without_late_fee() {
    let result = assess("Payment terms: Net 60 days. No late fee.");
    assert_eq!(
        result.hits,
        vec![RuleId::PaymentTermsGt45d, RuleId::NoLateFee]
    );
    assert_eq!(result.score, 3);
}

#[test]
fn late_fee_or_interest_clears_the_finding() {
    assert_eq!(
        hits("Invoices are payable within 30 days, with a late fee of 2% thereafter."),
        Vec::<&str>::new()
    );
    assert_eq!(
        hits("Fees unpaid after 90 days accrue interest at 18%."),
        vec!["payment_terms_gt_45d"]
    );
}

#[test]
fn payment_days_use_first_match() {
    assert_eq!(
        hits("Payment within 30 days; disputes resolved within 120 days. Interest applies."),
        Vec::<&str>::new()
    );
}

// ============ Liability and indemnity ============

#[test]
fn disclaimer_lifts_the_soft_cap() {
    let result = assess("The Vendor shall have no liability for any loss.");
    assert_eq!(
        result.hits,
        vec![RuleId::LiabilityDisclaimed, RuleId::LiabilityCapMissing]
    );
    assert_eq!(result.score, 10);
}

#[test]
fn unlimited_liability_counts_twice() {
    let flat = RuleId::ALL
        .iter()
        .fold(RuleWeights::default(), |weights, id| weights.with_weight(*id, 1));
    let engine = RuleEngine::new(flat);

    let result = engine
        .score_text("The Supplier shall indemnify the Client without limit and bears unlimited liability.");
    assert_eq!(
        result.hits,
        vec![
            RuleId::UnilateralIndemnity,
            RuleId::UnlimitedLiability,
            RuleId::UnlimitedLiability,
            RuleId::LiabilityCapMissing,
        ]
    );
    assert_eq!(result.score, 4);
}

#[test]
fn mutual_indemnity_is_not_flagged() {
    let result = assess("Each party shall indemnify the other.");
    assert!(result.hits.is_empty());
    assert_eq!(result.score, 0);
}

#[test]
fn reasonable_dampens_severe_findings() {
    let result =
        assess("Liability for losses under this agreement is unlimited, subject to reasonable mitigation.");
    assert_eq!(
        result.hits,
        vec![RuleId::UnlimitedLiability, RuleId::LiabilityCapMissing]
    );
    assert_eq!(result.score, 7);
}

#[test]
fn cap_language_suppresses_missing_cap() {
    assert_eq!(
        hits("Liability is capped at the amount paid in the preceding twelve months."),
        Vec::<&str>::new()
    );
}

// ============ Termination, law, confidentiality ============

#[test]
fn soft_cap_without_severe_hits() {
    let result = assess(
        "Payment of fees within 90 days. Termination: the Supplier may terminate for convenience \
         on notice of 7 days. Governing law: Delaware.",
    );
    assert_eq!(
        result.hits,
        vec![
            RuleId::PaymentTermsGt45d,
            RuleId::NoLateFee,
            RuleId::UnilateralTermination,
            RuleId::ShortNotice,
            RuleId::NonIndianLaw,
            RuleId::ForeignForum,
        ]
    );
    assert_eq!(i64::from(result.score), SOFT_CAP);
}

#[test]
fn reciprocal_termination() {
    let result = assess("Either party may terminate this agreement. Termination requires notice of 30 days.");
    assert!(result.hits.is_empty());
    assert_eq!(result.score, 0);
}

#[test]
fn indian_jurisdiction() {
    assert_eq!(
        hits("Courts at Mumbai, India shall have exclusive jurisdiction."),
        Vec::<&str>::new()
    );
    assert_eq!(
        hits("Courts in Singapore shall have exclusive jurisdiction."),
        vec!["non_indian_law", "foreign_forum"]
    );
}

#[test]
fn hindi_clauses() {
    assert_eq!(
        hits("गोपनीयता की अवधि हमेशा रहेगी।"),
        vec!["confidentiality_perpetual"]
    );
    assert_eq!(hits("भुगतान 60 दिनों में होगा।"), vec!["no_late_fee"]);
    assert_eq!(
        hits("इस अनुबंध का अधिकार क्षेत्र भारत में होगा।"),
        Vec::<&str>::new()
    );
}

#[test]
fn perpetual_confidentiality() {
    let result = assess("Confidential Information shall be protected in perpetuity and the obligation is perpetual.");
    assert_eq!(result.hits, vec![RuleId::ConfidentialityPerpetual]);
    assert_eq!(result.score, 2);
}

// ============ Engine ============

#[test]
fn weights_are_injected() {
    let engine = RuleEngine::new(RuleWeights::default().with_weight(RuleId::NoLateFee, 5));
    assert_eq!(engine.score_text("Payment terms: Net 60 days. No late fee.").score, 6);

    let engine = RuleEngine::new(RuleWeights::default().with_weight(RuleId::NoLateFee, 0));
    assert_eq!(engine.score_text("Payment terms: Net 60 days. No late fee.").score, 2);
}

#[test]
fn extreme_weights_saturate() {
    let text = "The Supplier shall indemnify without limit and bears unlimited liability.";

    let engine = RuleEngine::new(RuleWeights::default().merge([("unlimited_liability", i64::MAX)]));
    let result = engine.score_text(text);
    assert_eq!(
        result.hits.iter().filter(|hit| **hit == RuleId::UnlimitedLiability).count(),
        2
    );
    assert_eq!(result.score, 10);

    let engine = RuleEngine::new(
        RuleWeights::default()
            .merge([("unlimited_liability", i64::MIN), ("unilateral_indemnity", i64::MIN)]),
    );
    assert_eq!(engine.score_text(text).score, 0);
}

#[test]
fn apply_stores_assessment_on_the_clause() {
    let engine = RuleEngine::default();
    let mut clause = Clause::new("c1", "Liability", "The Vendor shall have no liability for any loss.");
    let before = engine.score(&clause);
    engine.apply(&mut clause);

    assert_eq!(clause.risk, before.score);
    assert_eq!(clause.rule_hits, before.hits);
    // scoring is pure and ignores the title
    assert_eq!(engine.score(&clause), before);
}

#[test]
fn matching_ignores_case() {
    assert_eq!(
        assess("THE VENDOR SHALL HAVE NO LIABILITY."),
        assess("the vendor shall have no liability.")
    );
}
