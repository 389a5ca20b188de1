use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One atomic factual statement extracted from the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// A retrieved snippet supporting or refuting a claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub doc_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictLabel {
    Supported,
    Refuted,
    Insufficient,
}

impl VerdictLabel {
    pub fn display(self) -> &'static str {
        match self {
            VerdictLabel::Supported => "Supported",
            VerdictLabel::Refuted => "Refuted",
            VerdictLabel::Insufficient => "Insufficient",
        }
    }
}

/// Fact-check outcome for a single claim. `claim_id` is a foreign key into
/// the report's claim list; the join layer tolerates dangling references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub claim_id: String,
    pub label: VerdictLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_evidence_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_ids: Option<Vec<String>>,
}

/// Precomputed display row the backend ships alongside the structured lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimTableRow {
    pub claim: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_source: Option<String>,
}

/// Structured analysis result for one call, as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub call_summary: String,
    #[serde(default)]
    pub action_items: Vec<String>,
    #[serde(default)]
    pub claim_table: Vec<ClaimTableRow>,
    pub claims: Vec<Claim>,
    pub evidence: Vec<Evidence>,
    pub verdicts: Vec<Verdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_by_claim: Option<HashMap<String, Vec<Evidence>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Audio,
    Transcript,
    Sample,
}

impl InputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InputKind::Audio => "audio",
            InputKind::Transcript => "transcript",
            InputKind::Sample => "sample",
        }
    }
}

/// One submitted analysis request and its eventual outcome.
///
/// `report` and `error` are write-once: exactly one of them is set when the
/// run settles, and neither is revised afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub id: String,
    pub started_at: String,
    pub input_kind: InputKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Idle,
    Running,
    Done,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Asr,
    Claims,
    Retrieval,
    Verification,
    Summary,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Asr,
        Stage::Claims,
        Stage::Retrieval,
        Stage::Verification,
        Stage::Summary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Asr => "ASR",
            Stage::Claims => "Claims",
            Stage::Retrieval => "Retrieval",
            Stage::Verification => "Verification",
            Stage::Summary => "Summary",
        }
    }
}

/// Five-stage progress indicator for the currently executing run.
///
/// A best-effort projection computed purely from the input kind and the
/// outcome; the backend exposes no incremental progress, so the display is
/// not synchronized with its actual internal stage. Session-local, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStatus {
    pub asr: StageStatus,
    pub claims: StageStatus,
    pub retrieval: StageStatus,
    pub verification: StageStatus,
    pub summary: StageStatus,
}

impl Default for PipelineStatus {
    fn default() -> Self {
        Self::idle()
    }
}

impl PipelineStatus {
    pub fn idle() -> Self {
        Self {
            asr: StageStatus::Idle,
            claims: StageStatus::Idle,
            retrieval: StageStatus::Idle,
            verification: StageStatus::Idle,
            summary: StageStatus::Idle,
        }
    }

    /// Optimistic projection the instant a run is submitted: transcript and
    /// sample input skip ASR, so it is marked done immediately.
    pub fn submitted(kind: InputKind) -> Self {
        Self {
            asr: if kind == InputKind::Audio {
                StageStatus::Running
            } else {
                StageStatus::Done
            },
            ..Self::idle()
        }
    }

    pub fn completed() -> Self {
        Self {
            asr: StageStatus::Done,
            claims: StageStatus::Done,
            retrieval: StageStatus::Done,
            verification: StageStatus::Done,
            summary: StageStatus::Done,
        }
    }

    /// Error projection: ASR stays done for non-audio input, stages beyond
    /// Claims never started.
    pub fn failed(kind: InputKind) -> Self {
        Self {
            asr: if kind == InputKind::Audio {
                StageStatus::Error
            } else {
                StageStatus::Done
            },
            claims: StageStatus::Error,
            ..Self::idle()
        }
    }

    pub fn stage(&self, stage: Stage) -> StageStatus {
        match stage {
            Stage::Asr => self.asr,
            Stage::Claims => self.claims,
            Stage::Retrieval => self.retrieval,
            Stage::Verification => self.verification,
            Stage::Summary => self.summary,
        }
    }
}

/// Row filter for the claims table: everything, or one verdict label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ClaimFilter {
    #[default]
    All,
    Supported,
    Refuted,
    Insufficient,
}

impl ClaimFilter {
    pub fn matches(self, verdict: Option<&Verdict>) -> bool {
        let wanted = match self {
            ClaimFilter::All => return true,
            ClaimFilter::Supported => VerdictLabel::Supported,
            ClaimFilter::Refuted => VerdictLabel::Refuted,
            ClaimFilter::Insufficient => VerdictLabel::Insufficient,
        };
        verdict.map(|v| v.label == wanted).unwrap_or(false)
    }
}

/// Transient view-selection state owned by the run store. Session-local.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub tab: u8,
    pub filter: ClaimFilter,
    pub evidence_open: bool,
    pub selected_claim_id: Option<String>,
}

/// Events emitted while a run is in flight, consumed by the output layer.
#[derive(Debug, Clone)]
pub enum RunEvent {
    Pipeline(PipelineStatus),
    Info(String),
}

/// Backend health probe response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub ok: bool,
    #[serde(default)]
    pub watsonx: bool,
    #[serde(default)]
    pub stt: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<serde_json::Value>,
}

/// Acknowledgement body for fire-and-forget administrative calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}
