//! Text renderers for CLI output.
//!
//! Each builder returns pre-formatted lines; the CLI layer decides where they
//! go. Payload output (reports, tables) is meant for stdout, progress and
//! status lines for stderr.

use crate::join::ClaimRow;
use crate::model::{
    Claim, Evidence, Health, PipelineStatus, RunRecord, Stage, StageStatus, Verdict,
};

/// Pre-formatted lines for text output.
pub struct TextSummary {
    pub lines: Vec<String>,
}

/// Single-line rendering of the five-stage pipeline, e.g.
/// `[+] ASR  [~] Claims  [ ] Retrieval  [ ] Verification  [ ] Summary`.
pub fn pipeline_line(status: PipelineStatus) -> String {
    Stage::ALL
        .iter()
        .map(|stage| {
            let mark = match status.stage(*stage) {
                StageStatus::Idle => ' ',
                StageStatus::Running => '~',
                StageStatus::Done => '+',
                StageStatus::Error => 'x',
            };
            format!("[{mark}] {}", stage.label())
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// View-tab titles, mirroring the tab order of the selection state.
pub fn tab_title(tab: u8) -> &'static str {
    match tab {
        0 => "Summary",
        1 => "Claims",
        _ => "Transcript",
    }
}

/// Clamp an optional confidence into a 0..=100 percentage.
pub fn confidence_percent(confidence: Option<f64>) -> u8 {
    let v = confidence.unwrap_or(0.0).clamp(0.0, 1.0);
    (v * 100.0).round() as u8
}

/// Summary tab: call summary, action items, and report counts.
pub fn report_summary(record: &RunRecord) -> TextSummary {
    let mut lines = Vec::new();
    lines.push(format!(
        "Run {} ({}) started {}",
        record.id,
        record.input_kind.as_str(),
        record.started_at
    ));
    let Some(report) = record.report.as_ref() else {
        match record.error.as_deref() {
            Some(error) => lines.push(format!("Run failed: {error}")),
            None => lines.push("Run has not settled yet".into()),
        }
        return TextSummary { lines };
    };

    lines.push(String::new());
    lines.push(report.call_summary.clone());
    if !report.action_items.is_empty() {
        lines.push(String::new());
        lines.push("Action items:".into());
        for item in &report.action_items {
            lines.push(format!("  - {item}"));
        }
    }
    lines.push(String::new());
    lines.push(format!(
        "{} claims, {} verdicts, {} evidence snippets",
        report.claims.len(),
        report.verdicts.len(),
        report.evidence.len()
    ));
    TextSummary { lines }
}

/// Claims tab: one row per joined claim with verdict, confidence, and the
/// best-evidence source label.
pub fn claims_table(rows: &[ClaimRow<'_>]) -> TextSummary {
    let mut lines = Vec::new();
    if rows.is_empty() {
        lines.push("No claims match the current filter".into());
        return TextSummary { lines };
    }
    lines.push(format!(
        "{:<4} {:<14} {:>5}  {:<20} {}",
        "#", "Verdict", "Conf", "Evidence", "Claim"
    ));
    for (idx, row) in rows.iter().enumerate() {
        let verdict = row
            .verdict
            .map(|v| v.label.display())
            .unwrap_or("(no verdict)");
        let confidence = row
            .verdict
            .map(|v| format!("{:>4}%", confidence_percent(v.confidence)))
            .unwrap_or_else(|| "   - ".into());
        let source = row
            .best_evidence
            .map(evidence_label)
            .unwrap_or_else(|| "-".into());
        lines.push(format!(
            "{:<4} {:<14} {confidence}  {:<20} {}",
            idx + 1,
            verdict,
            source,
            row.claim.text
        ));
    }
    TextSummary { lines }
}

/// Evidence panel: claim text, resolved evidence snippets, and the verdict
/// rationale when present.
pub fn evidence_panel(
    claim: Option<&Claim>,
    verdict: Option<&Verdict>,
    evidence: &[&Evidence],
) -> TextSummary {
    let mut lines = Vec::new();
    if let Some(claim) = claim {
        lines.push(format!("Claim: {}", claim.text));
        lines.push(String::new());
    }
    if evidence.is_empty() {
        lines.push("No evidence".into());
    } else {
        lines.push("Top evidence:".into());
        for e in evidence {
            lines.push(format!(
                "  {} (score {:.2})",
                evidence_label(e),
                e.score.unwrap_or(0.0)
            ));
            for snippet_line in e.snippet.lines() {
                lines.push(format!("    {snippet_line}"));
            }
            if let Some(metadata) = e.metadata.as_ref() {
                lines.push(format!("    metadata: {metadata}"));
            }
        }
    }
    if let Some(rationale) = verdict.and_then(|v| v.rationale.as_deref()) {
        lines.push(String::new());
        lines.push(format!("Rationale: {rationale}"));
    }
    TextSummary { lines }
}

/// Run history list, newest first, with the current run marked.
pub fn history_list(runs: &[RunRecord], current_id: Option<&str>) -> TextSummary {
    let mut lines = Vec::new();
    if runs.is_empty() {
        lines.push("No runs yet".into());
        return TextSummary { lines };
    }
    for run in runs {
        let marker = if current_id == Some(run.id.as_str()) {
            "*"
        } else {
            " "
        };
        let outcome = if let Some(error) = run.error.as_deref() {
            format!("failed: {error}")
        } else if run.report.is_some() {
            "ok".into()
        } else {
            "pending".into()
        };
        lines.push(format!(
            "{marker} {}  {}  {:<10} {outcome}",
            run.id,
            run.started_at,
            run.input_kind.as_str()
        ));
    }
    TextSummary { lines }
}

pub fn health_summary(health: &Health) -> TextSummary {
    let mut lines = Vec::new();
    lines.push(format!(
        "Status: {}",
        if health.ok { "OK" } else { "Degraded" }
    ));
    lines.push(format!(
        "watsonx: {}",
        if health.watsonx { "Yes" } else { "No" }
    ));
    lines.push(format!("stt: {}", if health.stt { "Yes" } else { "No" }));
    if let Some(models) = health.models.as_ref() {
        lines.push(format!("models: {models:#}"));
    }
    TextSummary { lines }
}

fn evidence_label(e: &Evidence) -> String {
    e.source.clone().unwrap_or_else(|| e.doc_id.clone())
}
