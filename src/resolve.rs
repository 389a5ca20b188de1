//! Evidence selection for the evidence panel.
//!
//! Three-tier fallback, first non-empty tier wins:
//! 1. evidence cited by the claim's verdict, in report order;
//! 2. the backend's per-claim retrieved evidence, verbatim;
//! 3. the top-scored evidence across the whole report.
//!
//! An empty result is a valid outcome and renders as "no evidence".

use crate::model::{Evidence, Report};

/// How many global evidence items the final fallback tier returns.
pub const GLOBAL_TOP_LIMIT: usize = 5;

pub fn resolve_evidence<'a>(report: &'a Report, claim_id: &str) -> Vec<&'a Evidence> {
    // Tier 1: citations on the claim's verdict, preserving the report's
    // evidence order rather than the citation list's.
    if let Some(verdict) = report.verdicts.iter().find(|v| v.claim_id == claim_id) {
        if let Some(ids) = verdict.citation_ids.as_ref().filter(|ids| !ids.is_empty()) {
            let cited: Vec<&Evidence> = report
                .evidence
                .iter()
                .filter(|e| ids.iter().any(|id| *id == e.doc_id))
                .collect();
            if !cited.is_empty() {
                return cited;
            }
        }
    }

    // Tier 2: per-claim retrieved evidence.
    if let Some(by_claim) = report
        .evidence_by_claim
        .as_ref()
        .and_then(|m| m.get(claim_id))
    {
        if !by_claim.is_empty() {
            return by_claim.iter().collect();
        }
    }

    // Tier 3: highest-scoring evidence overall. Stable sort keeps report
    // order for equal scores; a missing score counts as zero.
    let mut ranked: Vec<&Evidence> = report.evidence.iter().collect();
    ranked.sort_by(|a, b| b.score.unwrap_or(0.0).total_cmp(&a.score.unwrap_or(0.0)));
    ranked.truncate(GLOBAL_TOP_LIMIT);
    ranked
}
