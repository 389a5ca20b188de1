//! Claim/verdict join for the claims table.
//!
//! One row per claim, keyed by claim id. A claim without a verdict keeps an
//! absent verdict half; a verdict without a matching claim has nothing to
//! render and is dropped. Each row also carries the verdict's best evidence
//! item for the compact table display (the full evidence panel uses the
//! resolver instead).

use crate::model::{Claim, ClaimFilter, Evidence, Report, Verdict};

#[derive(Debug)]
pub struct ClaimRow<'a> {
    pub claim: &'a Claim,
    pub verdict: Option<&'a Verdict>,
    pub best_evidence: Option<&'a Evidence>,
}

impl ClaimRow<'_> {
    pub fn confidence(&self) -> f64 {
        self.verdict.and_then(|v| v.confidence).unwrap_or(0.0)
    }
}

pub fn join_and_filter<'a>(
    report: &'a Report,
    filter: ClaimFilter,
    sort_ascending: bool,
) -> Vec<ClaimRow<'a>> {
    let mut rows: Vec<ClaimRow<'a>> = report
        .claims
        .iter()
        .map(|claim| {
            let verdict = report.verdicts.iter().find(|v| v.claim_id == claim.id);
            let best_evidence = verdict
                .and_then(|v| v.best_evidence_id.as_deref())
                .and_then(|id| report.evidence.iter().find(|e| e.doc_id == id));
            ClaimRow {
                claim,
                verdict,
                best_evidence,
            }
        })
        .collect();

    rows.retain(|row| filter.matches(row.verdict));

    // Stable sort: equal-confidence rows keep join order in both directions.
    rows.sort_by(|a, b| {
        if sort_ascending {
            a.confidence().total_cmp(&b.confidence())
        } else {
            b.confidence().total_cmp(&a.confidence())
        }
    });
    rows
}
