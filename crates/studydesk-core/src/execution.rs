#![forbid(unsafe_code)]

//! Python execution panel.
//!
//! The panel owns the engine lifecycle but never talks to the engine
//! directly. It emits [`Effect::LoadEngine`] / [`Effect::Execute`] and the host
//! reports completion through [`ExecutionPanel::engine_loaded`],
//! [`ExecutionPanel::engine_failed`], [`ExecutionPanel::loader_missing`] and
//! [`ExecutionPanel::run_finished`].
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──run / preload──▶ Loading ──loaded──▶ Ready
//!        ▲                           │  ▲               │
//!        │                   failed  │  └─────reset─────┘
//!        │                           ▼
//!        └──────────────────────── Error ──run / reset──▶ Loading
//! ```
//!
//! # Invariants
//!
//! - At most one load is in flight. Run requests made while loading are
//!   parked and submitted once the in-flight load resolves.
//! - Every load carries a generation; completions for an older generation are
//!   discarded, so a handle from before a reset can never be reinstated.
//! - Output is never cleared by a reset, only by [`ExecutionPanel::clear`].

use crate::output::{LogStream, split_lines};
use crate::ui::{Effect, Target};

pub const STATUS_LOADING: &str = "Loading Pyodide...";
pub const STATUS_READY: &str = "Pyodide: ready";
pub const STATUS_FAILED: &str = "Pyodide failed to load";
pub const STATUS_MISSING: &str = "Pyodide script missing";
pub const STATUS_RESETTING: &str = "Resetting...";

pub const RUN_LABEL_BUSY: &str = "<span class=\"loading\"></span> Running...";
pub const RUN_LABEL_IDLE: &str = "<i class=\"fas fa-play\"></i> Run";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineStatus {
    Uninitialized,
    Loading,
    Ready,
    Error,
}

/// Visual tone of the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Ready,
    Error,
}

impl StatusTone {
    #[must_use]
    pub const fn background(self) -> &'static str {
        match self {
            Self::Info => "#eef2ff",
            Self::Ready => "#dcfce7",
            Self::Error => "#fee2e2",
        }
    }

    #[must_use]
    pub const fn border(self) -> &'static str {
        match self {
            Self::Info => "#c7d2fe",
            Self::Ready => "#bbf7d0",
            Self::Error => "#fecaca",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingRun {
    run_id: u64,
    source: String,
}

/// Engine lifecycle and run bookkeeping.
///
/// `E` is the host's engine handle; the panel only stores and hands it back.
#[derive(Debug, Clone)]
pub struct ExecutionPanel<E> {
    status: EngineStatus,
    engine: Option<E>,
    index_url: String,
    generation: u64,
    load_attempts: u64,
    next_run_id: u64,
    pending: Vec<PendingRun>,
    executing: Vec<u64>,
}

impl<E> ExecutionPanel<E> {
    #[must_use]
    pub fn new(index_url: impl Into<String>) -> Self {
        Self {
            status: EngineStatus::Uninitialized,
            engine: None,
            index_url: index_url.into(),
            generation: 0,
            load_attempts: 0,
            next_run_id: 0,
            pending: Vec::new(),
            executing: Vec::new(),
        }
    }

    #[must_use]
    pub fn status(&self) -> EngineStatus {
        self.status
    }

    /// The cached engine handle, present only while ready.
    #[must_use]
    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Number of loads started since construction.
    #[must_use]
    pub fn load_attempts(&self) -> u64 {
        self.load_attempts
    }

    /// Generation of the most recent load.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Runs waiting for the engine plus runs submitted and not yet finished.
    #[must_use]
    pub fn runs_in_flight(&self) -> usize {
        self.pending.len() + self.executing.len()
    }

    /// Background load requested by the post-setup timer.
    pub fn preload(&mut self, out: &mut Vec<Effect>) {
        if self.status == EngineStatus::Uninitialized {
            self.begin_load(out);
        } else {
            tracing::debug!(status = ?self.status, "preload skipped");
        }
    }

    /// Run control clicked with the editor's current text.
    pub fn request_run(&mut self, source: String, out: &mut Vec<Effect>) -> u64 {
        let run_id = self.next_run_id;
        self.next_run_id += 1;

        out.push(Effect::SetDisabled {
            target: Target::RunButton,
            disabled: true,
        });
        out.push(Effect::SetHtml {
            target: Target::RunButton,
            html: RUN_LABEL_BUSY.to_string(),
        });

        match self.status {
            EngineStatus::Ready => self.submit(run_id, source, out),
            EngineStatus::Loading => {
                tracing::debug!(run_id, "run parked until engine is ready");
                self.pending.push(PendingRun { run_id, source });
            }
            EngineStatus::Uninitialized | EngineStatus::Error => {
                self.pending.push(PendingRun { run_id, source });
                self.begin_load(out);
            }
        }
        run_id
    }

    /// Discard the cached engine and initialize a fresh one.
    ///
    /// A reset during an in-flight load joins that load instead of starting
    /// another one.
    pub fn reset(&mut self, out: &mut Vec<Effect>) {
        self.engine = None;
        self.set_status(STATUS_RESETTING, StatusTone::Info, out);
        if self.status == EngineStatus::Loading {
            tracing::debug!(generation = self.generation, "reset joins in-flight load");
            return;
        }
        self.begin_load(out);
    }

    /// Empty the output log. Engine state is untouched.
    pub fn clear(&self, out: &mut Vec<Effect>) {
        out.push(Effect::ClearLog);
    }

    /// Route a chunk of engine output into the log.
    pub fn output(&self, stream: LogStream, chunk: &str, out: &mut Vec<Effect>) {
        for line in split_lines(chunk) {
            out.push(Effect::AppendLog {
                stream,
                text: line.to_string(),
            });
        }
    }

    pub fn engine_loaded(&mut self, generation: u64, engine: E, out: &mut Vec<Effect>) {
        if !self.is_current_load(generation) {
            tracing::debug!(generation, current = self.generation, "stale engine discarded");
            return;
        }
        self.engine = Some(engine);
        self.status = EngineStatus::Ready;
        self.set_status(STATUS_READY, StatusTone::Ready, out);
        tracing::info!(generation, "engine ready");

        for PendingRun { run_id, source } in std::mem::take(&mut self.pending) {
            self.submit(run_id, source, out);
        }
    }

    /// The loader rejected.
    pub fn engine_failed(&mut self, generation: u64, error: &str, out: &mut Vec<Effect>) {
        if !self.is_current_load(generation) {
            return;
        }
        tracing::warn!(generation, error, "engine failed to load");
        self.fail(STATUS_FAILED, out);
        out.push(Effect::AppendLog {
            stream: LogStream::Stderr,
            text: error.to_string(),
        });
        self.abandon_pending(out);
    }

    /// The loader entry point is absent from the host environment.
    pub fn loader_missing(&mut self, generation: u64, out: &mut Vec<Effect>) {
        if !self.is_current_load(generation) {
            return;
        }
        tracing::warn!(generation, "engine loader not found");
        self.fail(STATUS_MISSING, out);
        self.abandon_pending(out);
    }

    /// A submitted run settled. Failures are logged; status is unaffected.
    pub fn run_finished(&mut self, run_id: u64, result: Result<(), String>, out: &mut Vec<Effect>) {
        let Some(pos) = self.executing.iter().position(|id| *id == run_id) else {
            tracing::warn!(run_id, "completion for unknown run ignored");
            return;
        };
        self.executing.remove(pos);
        if let Err(error) = result {
            tracing::debug!(run_id, "run raised");
            out.push(Effect::AppendLog {
                stream: LogStream::Stderr,
                text: error,
            });
        }
        restore_run_button(out);
    }

    fn submit(&mut self, run_id: u64, source: String, out: &mut Vec<Effect>) {
        self.executing.push(run_id);
        out.push(Effect::Execute { run_id, source });
    }

    fn begin_load(&mut self, out: &mut Vec<Effect>) {
        self.generation += 1;
        self.load_attempts += 1;
        self.status = EngineStatus::Loading;
        self.set_status(STATUS_LOADING, StatusTone::Info, out);
        out.push(Effect::LoadEngine {
            generation: self.generation,
            index_url: self.index_url.clone(),
        });
        tracing::info!(generation = self.generation, "engine load started");
    }

    fn is_current_load(&self, generation: u64) -> bool {
        generation == self.generation && self.status == EngineStatus::Loading
    }

    fn fail(&mut self, text: &str, out: &mut Vec<Effect>) {
        self.engine = None;
        self.status = EngineStatus::Error;
        self.set_status(text, StatusTone::Error, out);
    }

    /// Parked runs end without executing; each restores the run control.
    fn abandon_pending(&mut self, out: &mut Vec<Effect>) {
        for _ in self.pending.drain(..) {
            restore_run_button(out);
        }
    }

    fn set_status(&self, text: &str, tone: StatusTone, out: &mut Vec<Effect>) {
        out.push(Effect::SetText {
            target: Target::PyStatus,
            text: text.to_string(),
        });
        out.push(Effect::style(Target::PyStatus, "background", tone.background()));
        out.push(Effect::style(Target::PyStatus, "border-color", tone.border()));
    }
}

fn restore_run_button(out: &mut Vec<Effect>) {
    out.push(Effect::SetDisabled {
        target: Target::RunButton,
        disabled: false,
    });
    out.push(Effect::SetHtml {
        target: Target::RunButton,
        html: RUN_LABEL_IDLE.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const URL: &str = "https://cdn.example/pyodide/";

    fn loads(out: &[Effect]) -> Vec<u64> {
        out.iter()
            .filter_map(|e| match e {
                Effect::LoadEngine { generation, .. } => Some(*generation),
                _ => None,
            })
            .collect()
    }

    fn executes(out: &[Effect]) -> Vec<(u64, String)> {
        out.iter()
            .filter_map(|e| match e {
                Effect::Execute { run_id, source } => Some((*run_id, source.clone())),
                _ => None,
            })
            .collect()
    }

    fn status_texts(out: &[Effect]) -> Vec<String> {
        out.iter()
            .filter_map(|e| match e {
                Effect::SetText {
                    target: Target::PyStatus,
                    text,
                } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn starts_without_engine() {
        let panel: ExecutionPanel<u32> = ExecutionPanel::new(URL);
        assert_eq!(panel.status(), EngineStatus::Uninitialized);
        assert!(panel.engine().is_none());
        assert_eq!(panel.load_attempts(), 0);
    }

    #[test]
    fn preload_starts_a_single_load() {
        let mut panel: ExecutionPanel<u32> = ExecutionPanel::new(URL);
        let mut out = Vec::new();
        panel.preload(&mut out);
        panel.preload(&mut out);
        assert_eq!(loads(&out), vec![1]);
        assert_eq!(status_texts(&out), vec![STATUS_LOADING]);
        assert!(out.contains(&Effect::LoadEngine {
            generation: 1,
            index_url: URL.into()
        }));
    }

    #[test]
    fn two_quick_runs_share_one_load() {
        let mut panel = ExecutionPanel::new(URL);
        let mut out = Vec::new();
        let a = panel.request_run("print(1)".into(), &mut out);
        let b = panel.request_run("print(2)".into(), &mut out);
        assert_eq!(loads(&out), vec![1]);
        assert!(executes(&out).is_empty());
        assert_eq!(panel.runs_in_flight(), 2);

        out.clear();
        panel.engine_loaded(1, 7u32, &mut out);
        assert_eq!(panel.status(), EngineStatus::Ready);
        assert_eq!(panel.engine(), Some(&7));
        assert_eq!(
            executes(&out),
            vec![(a, "print(1)".to_string()), (b, "print(2)".to_string())]
        );
        assert_eq!(panel.load_attempts(), 1);
    }

    #[test]
    fn run_when_ready_executes_immediately() {
        let mut panel = ExecutionPanel::new(URL);
        let mut out = Vec::new();
        panel.preload(&mut out);
        panel.engine_loaded(1, 1u8, &mut out);
        out.clear();

        let id = panel.request_run("x = 1".into(), &mut out);
        assert_eq!(
            out,
            vec![
                Effect::SetDisabled {
                    target: Target::RunButton,
                    disabled: true
                },
                Effect::SetHtml {
                    target: Target::RunButton,
                    html: RUN_LABEL_BUSY.into()
                },
                Effect::Execute {
                    run_id: id,
                    source: "x = 1".into()
                },
            ]
        );
    }

    #[test]
    fn run_failure_is_logged_and_status_unchanged() {
        let mut panel = ExecutionPanel::new(URL);
        let mut out = Vec::new();
        panel.preload(&mut out);
        panel.engine_loaded(1, (), &mut out);
        let id = panel.request_run("1/0".into(), &mut out);
        out.clear();

        panel.run_finished(id, Err("ZeroDivisionError: division by zero".into()), &mut out);
        assert_eq!(panel.status(), EngineStatus::Ready);
        assert_eq!(
            out[0],
            Effect::AppendLog {
                stream: LogStream::Stderr,
                text: "ZeroDivisionError: division by zero".into()
            }
        );
        assert!(out.contains(&Effect::SetDisabled {
            target: Target::RunButton,
            disabled: false
        }));
        assert_eq!(panel.runs_in_flight(), 0);
    }

    #[test]
    fn load_failure_reports_and_releases_parked_runs() {
        let mut panel: ExecutionPanel<()> = ExecutionPanel::new(URL);
        let mut out = Vec::new();
        panel.request_run("print()".into(), &mut out);
        out.clear();

        panel.engine_failed(1, "NetworkError", &mut out);
        assert_eq!(panel.status(), EngineStatus::Error);
        assert_eq!(status_texts(&out), vec![STATUS_FAILED]);
        assert!(out.contains(&Effect::AppendLog {
            stream: LogStream::Stderr,
            text: "NetworkError".into()
        }));
        assert!(out.contains(&Effect::SetHtml {
            target: Target::RunButton,
            html: RUN_LABEL_IDLE.into()
        }));
        assert!(executes(&out).is_empty());
        assert_eq!(panel.runs_in_flight(), 0);
    }

    #[test]
    fn missing_loader_sets_error_without_log_line() {
        let mut panel: ExecutionPanel<()> = ExecutionPanel::new(URL);
        let mut out = Vec::new();
        panel.preload(&mut out);
        out.clear();
        panel.loader_missing(1, &mut out);
        assert_eq!(panel.status(), EngineStatus::Error);
        assert_eq!(status_texts(&out), vec![STATUS_MISSING]);
        assert!(!out.iter().any(|e| matches!(e, Effect::AppendLog { .. })));
    }

    #[test]
    fn run_after_error_retries_load() {
        let mut panel: ExecutionPanel<()> = ExecutionPanel::new(URL);
        let mut out = Vec::new();
        panel.preload(&mut out);
        panel.loader_missing(1, &mut out);
        out.clear();
        panel.request_run("1".into(), &mut out);
        assert_eq!(loads(&out), vec![2]);
    }

    #[test]
    fn reset_discards_handle_and_reloads_once() {
        let mut panel = ExecutionPanel::new(URL);
        let mut out = Vec::new();
        panel.preload(&mut out);
        panel.engine_loaded(1, "old", &mut out);
        out.clear();

        panel.reset(&mut out);
        assert!(panel.engine().is_none());
        assert_eq!(status_texts(&out), vec![STATUS_RESETTING, STATUS_LOADING]);
        assert_eq!(loads(&out), vec![2]);
        assert!(!out.contains(&Effect::ClearLog));

        out.clear();
        panel.request_run("again".into(), &mut out);
        assert!(loads(&out).is_empty());

        panel.engine_loaded(2, "new", &mut out);
        assert_eq!(panel.engine(), Some(&"new"));
        assert_eq!(panel.load_attempts(), 2);
    }

    #[test]
    fn reset_while_loading_joins_in_flight_load() {
        let mut panel = ExecutionPanel::new(URL);
        let mut out = Vec::new();
        panel.preload(&mut out);
        out.clear();
        panel.reset(&mut out);
        assert!(loads(&out).is_empty());
        assert_eq!(status_texts(&out), vec![STATUS_RESETTING]);

        panel.engine_loaded(1, 3u8, &mut out);
        assert_eq!(panel.status(), EngineStatus::Ready);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut panel = ExecutionPanel::new(URL);
        let mut out = Vec::new();
        panel.preload(&mut out);
        panel.loader_missing(1, &mut out);
        panel.reset(&mut out);
        out.clear();

        panel.engine_loaded(1, 99u32, &mut out);
        assert!(out.is_empty());
        assert!(panel.engine().is_none());
        assert_eq!(panel.status(), EngineStatus::Loading);
    }

    #[test]
    fn output_is_split_per_line() {
        let panel: ExecutionPanel<()> = ExecutionPanel::new(URL);
        let mut out = Vec::new();
        panel.output(LogStream::Stdout, "a\nb\n", &mut out);
        assert_eq!(
            out,
            vec![
                Effect::AppendLog {
                    stream: LogStream::Stdout,
                    text: "a".into()
                },
                Effect::AppendLog {
                    stream: LogStream::Stdout,
                    text: "b".into()
                },
            ]
        );
    }

    #[test]
    fn clear_only_empties_log() {
        let panel: ExecutionPanel<()> = ExecutionPanel::new(URL);
        let mut out = Vec::new();
        panel.clear(&mut out);
        assert_eq!(out, vec![Effect::ClearLog]);
        assert_eq!(panel.status(), EngineStatus::Uninitialized);
    }

    #[test]
    fn unknown_run_completion_is_ignored() {
        let mut panel: ExecutionPanel<()> = ExecutionPanel::new(URL);
        let mut out = Vec::new();
        panel.run_finished(42, Ok(()), &mut out);
        assert!(out.is_empty());
    }
}
