//! Built-in example report for first-run onboarding.
//!
//! Shaped exactly like a real backend response so every downstream view
//! (summary, claims table, evidence panel) can be exercised offline.

use std::collections::HashMap;

use serde_json::json;

use crate::model::{Claim, ClaimTableRow, Evidence, Report, Verdict, VerdictLabel};

pub fn report() -> Report {
    let claims = vec![
        Claim {
            id: "c1".into(),
            text: "The enterprise plan includes 24/7 phone support.".into(),
            speaker: Some("Agent".into()),
            start: Some(42.0),
            end: Some(47.5),
            confidence: Some(0.93),
        },
        Claim {
            id: "c2".into(),
            text: "The outage last Tuesday lasted under ten minutes.".into(),
            speaker: Some("Agent".into()),
            start: Some(133.0),
            end: Some(139.0),
            confidence: Some(0.88),
        },
        Claim {
            id: "c3".into(),
            text: "Data export is available on every pricing tier.".into(),
            speaker: Some("Customer".into()),
            start: Some(201.0),
            end: Some(205.0),
            confidence: Some(0.71),
        },
    ];

    let evidence = vec![
        Evidence {
            doc_id: "kb-sla-2".into(),
            source: Some("support-sla.md".into()),
            snippet: "Enterprise customers receive 24/7 phone and chat support with a \
                      15-minute response target."
                .into(),
            score: Some(0.91),
            metadata: Some(json!({ "section": "Support tiers" })),
        },
        Evidence {
            doc_id: "status-0812".into(),
            source: Some("status-page".into()),
            snippet: "Incident INC-4312: degraded API performance for 38 minutes on Tuesday."
                .into(),
            score: Some(0.84),
            metadata: None,
        },
        Evidence {
            doc_id: "kb-pricing-1".into(),
            source: Some("pricing.md".into()),
            snippet: "CSV and JSON export are included in the Pro and Enterprise tiers.".into(),
            score: Some(0.77),
            metadata: None,
        },
        Evidence {
            doc_id: "kb-pricing-4".into(),
            source: Some("pricing.md".into()),
            snippet: "The Starter tier covers dashboards only; exports require an upgrade."
                .into(),
            score: Some(0.69),
            metadata: None,
        },
    ];

    let verdicts = vec![
        Verdict {
            claim_id: "c1".into(),
            label: VerdictLabel::Supported,
            confidence: Some(0.95),
            best_evidence_id: Some("kb-sla-2".into()),
            rationale: Some(
                "The SLA document explicitly lists 24/7 phone support for the \
                 enterprise plan."
                    .into(),
            ),
            citation_ids: Some(vec!["kb-sla-2".into()]),
        },
        Verdict {
            claim_id: "c2".into(),
            label: VerdictLabel::Refuted,
            confidence: Some(0.89),
            best_evidence_id: Some("status-0812".into()),
            rationale: Some(
                "The status page records a 38-minute incident on Tuesday, well over \
                 ten minutes."
                    .into(),
            ),
            citation_ids: Some(vec!["status-0812".into()]),
        },
        Verdict {
            claim_id: "c3".into(),
            label: VerdictLabel::Insufficient,
            confidence: Some(0.54),
            best_evidence_id: Some("kb-pricing-1".into()),
            rationale: Some(
                "Pricing docs confirm export on Pro and Enterprise but are silent on \
                 the Starter tier behaviour after the latest revision."
                    .into(),
            ),
            citation_ids: None,
        },
    ];

    let mut evidence_by_claim = HashMap::new();
    evidence_by_claim.insert(
        "c3".to_string(),
        vec![evidence[2].clone(), evidence[3].clone()],
    );

    Report {
        call_summary: "Support call covering the enterprise upgrade: the agent pitched \
                       24/7 support, downplayed last Tuesday's outage, and the customer \
                       asked whether data export is universal."
            .into(),
        action_items: vec![
            "Send the enterprise SLA document to the customer.".into(),
            "Follow up with a correction on the outage duration.".into(),
            "Clarify export availability on the Starter tier.".into(),
        ],
        claim_table: vec![
            ClaimTableRow {
                claim: "The enterprise plan includes 24/7 phone support.".into(),
                status: "supported".into(),
                evidence_source: Some("support-sla.md".into()),
            },
            ClaimTableRow {
                claim: "The outage last Tuesday lasted under ten minutes.".into(),
                status: "refuted".into(),
                evidence_source: Some("status-page".into()),
            },
            ClaimTableRow {
                claim: "Data export is available on every pricing tier.".into(),
                status: "insufficient".into(),
                evidence_source: Some("pricing.md".into()),
            },
        ],
        claims,
        evidence,
        verdicts,
        evidence_by_claim: Some(evidence_by_claim),
    }
}
