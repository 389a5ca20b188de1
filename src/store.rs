//! Run lifecycle store.
//!
//! Owns the run history, the current-run pointer, the five-stage pipeline
//! status, and the view-selection state. History and the current-run pointer
//! are persisted through a pluggable snapshot collaborator after every
//! mutation; pipeline status and view selection are session-local.

use std::path::PathBuf;

use tokio::sync::mpsc::UnboundedSender;

use crate::api::ApiClient;
use crate::error::{AppError, AppResult};
use crate::ident;
use crate::model::{
    ClaimFilter, InputKind, PipelineStatus, Report, RunEvent, RunRecord, UiState,
};
use crate::sample;
use crate::storage::{Snapshot, StatePersist};

/// History keeps the five most recent runs; the oldest is evicted first.
pub const HISTORY_CAP: usize = 5;

/// A validated-by-construction submission payload. The kind/payload mismatch
/// the wire API allows cannot be expressed here; what remains to check is
/// that the payload itself is usable.
#[derive(Debug, Clone)]
pub enum RunInput {
    Audio(PathBuf),
    Transcript(String),
}

impl RunInput {
    pub fn kind(&self) -> InputKind {
        match self {
            RunInput::Audio(_) => InputKind::Audio,
            RunInput::Transcript(_) => InputKind::Transcript,
        }
    }
}

pub struct RunStore {
    runs: Vec<RunRecord>,
    current_run_id: Option<String>,
    pipeline: PipelineStatus,
    ui: UiState,
    persist: Box<dyn StatePersist>,
}

impl RunStore {
    pub fn new(persist: Box<dyn StatePersist>) -> Self {
        Self {
            runs: Vec::new(),
            current_run_id: None,
            pipeline: PipelineStatus::idle(),
            ui: UiState::default(),
            persist,
        }
    }

    /// Restore history and the current-run pointer from the snapshot store.
    /// A malformed snapshot is treated as absent; only real I/O failures
    /// propagate.
    pub fn hydrate(&mut self) -> AppResult<()> {
        match self.persist.load() {
            Ok(Some(snapshot)) => {
                self.runs = snapshot.runs;
                self.runs.truncate(HISTORY_CAP);
                self.current_run_id = snapshot
                    .current_run_id
                    .filter(|id| self.runs.iter().any(|r| r.id == *id));
            }
            Ok(None) | Err(AppError::MalformedState(_)) => {}
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Create the run record and flip the pipeline to its optimistic initial
    /// projection. Fails with `InvalidInput` before any state mutation if the
    /// payload is unusable.
    pub fn begin_run(&mut self, input: &RunInput) -> AppResult<String> {
        match input {
            RunInput::Audio(path) if !path.is_file() => {
                return Err(AppError::InvalidInput(format!(
                    "audio file not found: {}",
                    path.display()
                )))
            }
            RunInput::Transcript(text) if text.trim().is_empty() => {
                return Err(AppError::InvalidInput("transcript text is empty".into()))
            }
            _ => {}
        }

        let id = ident::run_id()?;
        self.insert_run(RunRecord {
            id: id.clone(),
            started_at: now_rfc3339(),
            input_kind: input.kind(),
            report: None,
            error: None,
        });
        self.pipeline = PipelineStatus::submitted(input.kind());
        self.save()?;
        Ok(id)
    }

    /// Reconcile a settled run. The pipeline projection is overwritten by
    /// whichever task resolves last, but the record update is keyed by id, so
    /// overlapping runs still attach their own report or error correctly. A
    /// record evicted from history in the meantime is simply gone.
    pub fn finish_run(
        &mut self,
        id: &str,
        kind: InputKind,
        outcome: Result<Report, String>,
    ) -> AppResult<()> {
        self.pipeline = match &outcome {
            Ok(_) => PipelineStatus::completed(),
            Err(_) => PipelineStatus::failed(kind),
        };
        if let Some(run) = self.runs.iter_mut().find(|r| r.id == id) {
            // Write-once: a settled record is never revised.
            if run.report.is_none() && run.error.is_none() {
                match outcome {
                    Ok(report) => run.report = Some(report),
                    Err(message) => run.error = Some(message),
                }
            }
        }
        self.save()
    }

    /// Drive one run end to end: validate, create the record, issue the one
    /// analyze call, and fold the outcome back into state. Transport failures
    /// settle the run record instead of propagating.
    pub async fn submit_run(
        &mut self,
        client: &ApiClient,
        input: RunInput,
        event_tx: &UnboundedSender<RunEvent>,
    ) -> AppResult<String> {
        let id = self.begin_run(&input)?;
        let _ = event_tx.send(RunEvent::Pipeline(self.pipeline));
        let _ = event_tx.send(RunEvent::Info(format!(
            "analyzing {} input (run {id})",
            input.kind().as_str()
        )));

        let outcome = match &input {
            RunInput::Audio(path) => client.analyze_audio(path).await,
            RunInput::Transcript(text) => client.analyze_transcript(text).await,
        };
        let outcome = outcome.map_err(|e| match e {
            // The detail message was already extracted from the failure body.
            AppError::Transport(message) => message,
            other => other.to_string(),
        });

        self.finish_run(&id, input.kind(), outcome)?;
        let _ = event_tx.send(RunEvent::Pipeline(self.pipeline));
        Ok(id)
    }

    /// Synthesize a successful run from the built-in example report. No
    /// network involved; used as the first-run onboarding path.
    pub fn load_sample(&mut self) -> AppResult<String> {
        let id = ident::run_id()?;
        self.insert_run(RunRecord {
            id: id.clone(),
            started_at: now_rfc3339(),
            input_kind: InputKind::Sample,
            report: Some(sample::report()),
            error: None,
        });
        self.pipeline = PipelineStatus::completed();
        self.save()?;
        Ok(id)
    }

    /// Point the view at an earlier run. Unknown ids are a no-op.
    pub fn select_run(&mut self, id: &str) -> AppResult<bool> {
        if !self.runs.iter().any(|r| r.id == id) {
            return Ok(false);
        }
        self.current_run_id = Some(id.to_string());
        self.save()?;
        Ok(true)
    }

    pub fn set_tab(&mut self, tab: u8) {
        self.ui.tab = tab;
    }

    pub fn set_filter(&mut self, filter: ClaimFilter) {
        self.ui.filter = filter;
    }

    pub fn open_evidence(&mut self, claim_id: &str) {
        self.ui.evidence_open = true;
        self.ui.selected_claim_id = Some(claim_id.to_string());
    }

    pub fn close_evidence(&mut self) {
        self.ui.evidence_open = false;
        self.ui.selected_claim_id = None;
    }

    pub fn runs(&self) -> &[RunRecord] {
        &self.runs
    }

    pub fn current_run_id(&self) -> Option<&str> {
        self.current_run_id.as_deref()
    }

    pub fn current_run(&self) -> Option<&RunRecord> {
        let id = self.current_run_id.as_deref()?;
        self.runs.iter().find(|r| r.id == id)
    }

    pub fn run(&self, id: &str) -> Option<&RunRecord> {
        self.runs.iter().find(|r| r.id == id)
    }

    pub fn pipeline(&self) -> PipelineStatus {
        self.pipeline
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    fn insert_run(&mut self, record: RunRecord) {
        self.current_run_id = Some(record.id.clone());
        self.runs.insert(0, record);
        self.runs.truncate(HISTORY_CAP);
    }

    fn save(&self) -> AppResult<()> {
        self.persist.save(&Snapshot {
            runs: self.runs.clone(),
            current_run_id: self.current_run_id.clone(),
        })
    }
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "now".into())
}

#[cfg(test)]
mod tests {
    use super::{RunInput, RunStore, HISTORY_CAP};
    use crate::error::{AppError, AppResult};
    use crate::model::{InputKind, PipelineStatus, Report, StageStatus};
    use crate::storage::{Snapshot, StatePersist};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// In-memory snapshot store; can be seeded and can simulate corruption.
    #[derive(Default)]
    struct MemPersist {
        snapshot: Rc<RefCell<Option<Snapshot>>>,
        malformed: bool,
    }

    impl StatePersist for MemPersist {
        fn load(&self) -> AppResult<Option<Snapshot>> {
            if self.malformed {
                return Err(AppError::MalformedState("seeded corruption".into()));
            }
            Ok(self.snapshot.borrow().clone())
        }

        fn save(&self, snapshot: &Snapshot) -> AppResult<()> {
            *self.snapshot.borrow_mut() = Some(snapshot.clone());
            Ok(())
        }
    }

    fn store() -> (RunStore, Rc<RefCell<Option<Snapshot>>>) {
        let persist = MemPersist::default();
        let shared = persist.snapshot.clone();
        (RunStore::new(Box::new(persist)), shared)
    }

    fn transcript(text: &str) -> RunInput {
        RunInput::Transcript(text.into())
    }

    fn empty_report() -> Report {
        Report {
            call_summary: "summary".into(),
            action_items: vec![],
            claim_table: vec![],
            claims: vec![],
            evidence: vec![],
            verdicts: vec![],
            evidence_by_claim: None,
        }
    }

    #[test]
    fn begin_run_prepends_record_and_sets_optimistic_pipeline() {
        let (mut s, _) = store();
        let id = s.begin_run(&transcript("hello")).expect("begin");

        assert_eq!(s.runs().len(), 1);
        assert_eq!(s.current_run_id(), Some(id.as_str()));
        assert!(s.runs()[0].report.is_none());
        assert!(s.runs()[0].error.is_none());
        assert_eq!(s.pipeline(), PipelineStatus::submitted(InputKind::Transcript));
        assert_eq!(s.pipeline().asr, StageStatus::Done);
    }

    #[test]
    fn invalid_input_is_rejected_before_any_mutation() {
        let (mut s, snapshot) = store();

        match s.begin_run(&transcript("   ")) {
            Err(AppError::InvalidInput(_)) => {}
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        match s.begin_run(&RunInput::Audio("/no/such/file.wav".into())) {
            Err(AppError::InvalidInput(_)) => {}
            other => panic!("expected InvalidInput, got {other:?}"),
        }

        assert!(s.runs().is_empty());
        assert!(s.current_run_id().is_none());
        assert!(snapshot.borrow().is_none(), "nothing should be persisted");
    }

    #[test]
    fn history_is_capped_at_five_with_oldest_evicted_first() {
        let (mut s, _) = store();
        let mut ids = Vec::new();
        for i in 0..7 {
            ids.push(s.begin_run(&transcript(&format!("t{i}"))).expect("begin"));
        }
        assert_eq!(s.runs().len(), HISTORY_CAP);
        // Newest first; the two oldest are gone.
        assert_eq!(s.runs()[0].id, ids[6]);
        assert!(!s.runs().iter().any(|r| r.id == ids[0]));
        assert!(!s.runs().iter().any(|r| r.id == ids[1]));
    }

    #[test]
    fn finish_run_attaches_exactly_one_of_report_or_error() {
        let (mut s, _) = store();
        let ok_id = s.begin_run(&transcript("ok")).expect("begin");
        s.finish_run(&ok_id, InputKind::Transcript, Ok(empty_report()))
            .expect("finish");
        let run = s.run(&ok_id).expect("run");
        assert!(run.report.is_some());
        assert!(run.error.is_none());
        assert_eq!(s.pipeline(), PipelineStatus::completed());

        let err_id = s.begin_run(&transcript("bad")).expect("begin");
        s.finish_run(&err_id, InputKind::Transcript, Err("backend down".into()))
            .expect("finish");
        let run = s.run(&err_id).expect("run");
        assert!(run.report.is_none());
        assert_eq!(run.error.as_deref(), Some("backend down"));
        assert_eq!(s.pipeline(), PipelineStatus::failed(InputKind::Transcript));
    }

    #[test]
    fn settled_records_are_never_revised() {
        let (mut s, _) = store();
        let id = s.begin_run(&transcript("once")).expect("begin");
        s.finish_run(&id, InputKind::Transcript, Err("first".into()))
            .expect("finish");
        s.finish_run(&id, InputKind::Transcript, Ok(empty_report()))
            .expect("finish again");

        let run = s.run(&id).expect("run");
        assert_eq!(run.error.as_deref(), Some("first"));
        assert!(run.report.is_none());
    }

    #[test]
    fn finish_run_on_an_evicted_id_still_updates_the_pipeline_only() {
        let (mut s, _) = store();
        let old = s.begin_run(&transcript("old")).expect("begin");
        for i in 0..HISTORY_CAP {
            s.begin_run(&transcript(&format!("new{i}"))).expect("begin");
        }
        assert!(s.run(&old).is_none(), "oldest run should be evicted");

        s.finish_run(&old, InputKind::Transcript, Ok(empty_report()))
            .expect("finish");
        assert_eq!(s.pipeline(), PipelineStatus::completed());
        assert_eq!(s.runs().len(), HISTORY_CAP);
        assert!(s.runs().iter().all(|r| r.report.is_none()));
    }

    #[test]
    fn select_run_ignores_unknown_ids() {
        let (mut s, _) = store();
        let a = s.begin_run(&transcript("a")).expect("begin");
        let b = s.begin_run(&transcript("b")).expect("begin");
        assert_eq!(s.current_run_id(), Some(b.as_str()));

        assert!(s.select_run(&a).expect("select"));
        assert_eq!(s.current_run_id(), Some(a.as_str()));

        assert!(!s.select_run("missing").expect("select"));
        assert_eq!(s.current_run_id(), Some(a.as_str()));
    }

    #[test]
    fn load_sample_behaves_like_a_completed_run() {
        let (mut s, _) = store();
        let id = s.load_sample().expect("sample");
        let run = s.run(&id).expect("run");
        assert_eq!(run.input_kind, InputKind::Sample);
        assert!(run.report.is_some());
        assert!(run.error.is_none());
        assert_eq!(s.pipeline(), PipelineStatus::completed());
        assert_eq!(s.current_run_id(), Some(id.as_str()));
    }

    #[test]
    fn hydrate_restores_runs_and_validates_the_current_pointer() {
        let seeded = {
            let (mut s, shared) = store();
            s.begin_run(&transcript("persisted")).expect("begin");
            let snapshot = shared.borrow().clone();
            snapshot.expect("snapshot")
        };

        let persist = MemPersist {
            snapshot: Rc::new(RefCell::new(Some(seeded.clone()))),
            malformed: false,
        };
        let mut s = RunStore::new(Box::new(persist));
        s.hydrate().expect("hydrate");
        assert_eq!(s.runs().len(), 1);
        assert_eq!(s.current_run_id(), seeded.current_run_id.as_deref());

        // A dangling current pointer is cleared rather than kept.
        let mut dangling = seeded;
        dangling.current_run_id = Some("gone".into());
        let persist = MemPersist {
            snapshot: Rc::new(RefCell::new(Some(dangling))),
            malformed: false,
        };
        let mut s = RunStore::new(Box::new(persist));
        s.hydrate().expect("hydrate");
        assert!(s.current_run_id().is_none());
    }

    #[test]
    fn hydrate_treats_malformed_snapshots_as_absent() {
        let persist = MemPersist {
            snapshot: Rc::new(RefCell::new(None)),
            malformed: true,
        };
        let mut s = RunStore::new(Box::new(persist));
        s.hydrate().expect("hydrate");
        assert!(s.runs().is_empty());
        assert!(s.current_run_id().is_none());
    }

    #[test]
    fn view_selection_mutators_update_only_ui_state() {
        let (mut s, snapshot) = store();
        s.set_tab(1);
        s.set_filter(crate::model::ClaimFilter::Refuted);
        assert_eq!(s.ui().tab, 1);
        assert_eq!(s.ui().filter, crate::model::ClaimFilter::Refuted);
        assert!(snapshot.borrow().is_none(), "selection is session-local");
    }

    #[test]
    fn evidence_panel_selection_round_trips() {
        let (mut s, _) = store();
        assert!(!s.ui().evidence_open);

        s.open_evidence("c42");
        assert!(s.ui().evidence_open);
        assert_eq!(s.ui().selected_claim_id.as_deref(), Some("c42"));

        s.close_evidence();
        assert!(!s.ui().evidence_open);
        assert!(s.ui().selected_claim_id.is_none());
    }
}
