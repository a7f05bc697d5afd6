//! The compression controller: a state machine over user events.
//!
//! The controller owns the session (source, quality, latest result, run
//! sequence) and is the only thing that mutates it. It never runs the pipeline
//! itself. `dispatch` hands back a [`RunTicket`] for the host to execute, when
//! and however it likes, and the outcome comes back through `complete`.
//! Completions from superseded runs are dropped there.
//!
//! ```text
//! Idle ──file──▶ FileAccepted ──done──▶ Previewing ──quality──▶ Recompressing
//!                      ▲                      ▲                        │
//!                      └──────new file────────┴──────────done──────────┘
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::config::CompressorConfig;
use crate::encode::EncodedResult;
use crate::format::format_file_size;
use crate::history::{CompressionRecord, SessionLog};
use crate::pipeline::{
    execute, PipelineOptions, RunOutcome, RunRequest, RunSequence, RunTicket,
};
use crate::presenter::Presenter;
use crate::validate::accept;
use crate::{Quality, SourceFile};

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ControllerState {
    /// No source held.
    Idle,
    /// Source held, no result yet (first run in flight, or it failed).
    FileAccepted,
    /// A result is on screen and nothing is in flight.
    Previewing,
    /// A result is on screen and a newer run is in flight.
    Recompressing,
}

/// Input from the host.
#[derive(Debug, Clone)]
pub enum Event {
    /// Click-to-browse selection. `None` when the picker closed empty.
    FileSelected(Option<SourceFile>),
    /// Drag-and-drop or programmatic intake. Only the first file is used.
    FilesDropped(Vec<SourceFile>),
    /// Slider moved, as a percentage.
    QualityChanged(u8),
    /// Save the current result.
    Export,
    /// The host is going away; release everything.
    Teardown,
}

/// Mutable session state. Only the controller writes to it.
#[derive(Debug)]
pub struct Session {
    source: Option<Arc<SourceFile>>,
    quality: Quality,
    result: Option<EncodedResult>,
    sequence: RunSequence,
    state: ControllerState,
    log: SessionLog,
}

impl Session {
    fn new(config: &CompressorConfig) -> Self {
        Self {
            source: None,
            quality: Quality::from_percent(config.default_quality),
            result: None,
            sequence: RunSequence::new(),
            state: ControllerState::Idle,
            log: SessionLog::with_capacity(config.history_capacity),
        }
    }
}

pub struct Controller<P> {
    session: Session,
    presenter: P,
    config: CompressorConfig,
    options: PipelineOptions,
}

impl<P: Presenter> Controller<P> {
    pub fn new(presenter: P) -> Self {
        Self::with_config(presenter, CompressorConfig::default())
    }

    pub fn with_config(presenter: P, config: CompressorConfig) -> Self {
        let config = config.normalized();
        Self {
            session: Session::new(&config),
            options: PipelineOptions::from(&config),
            presenter,
            config,
        }
    }

    /// Apply an event. Returns a ticket when a pipeline run should start.
    pub fn dispatch(&mut self, event: Event) -> Option<RunTicket> {
        match event {
            Event::FileSelected(file) => self.accept_file(file),
            Event::FilesDropped(files) => self.accept_file(files.into_iter().next()),
            Event::QualityChanged(percent) => self.change_quality(percent),
            Event::Export => {
                self.export();
                None
            }
            Event::Teardown => {
                self.teardown();
                None
            }
        }
    }

    /// Apply an event and run any resulting pipeline to completion in place.
    ///
    /// For hosts without an event loop. Returns whether a result was shown.
    pub fn dispatch_blocking(&mut self, event: Event) -> bool {
        match self.dispatch(event) {
            Some(ticket) => {
                let outcome = execute(&ticket, &self.options);
                self.complete(outcome)
            }
            None => false,
        }
    }

    /// Feed back the outcome of a run.
    ///
    /// Returns `true` if it was the latest run and a new result is now shown.
    pub fn complete(&mut self, outcome: RunOutcome) -> bool {
        let run = outcome.run();
        if !self.session.sequence.is_latest(run) {
            tracing::debug!(%run, "dropping stale completion");
            return false;
        }

        match outcome {
            RunOutcome::Completed { result, .. } => {
                self.show_result(result);
                true
            }
            RunOutcome::Failed { error, .. } => {
                tracing::warn!(%run, %error, "run failed");
                self.presenter.show_error(&error);
                self.session.state = self.settled_state();
                false
            }
            RunOutcome::Superseded(_) => false,
        }
    }

    fn accept_file(&mut self, candidate: Option<SourceFile>) -> Option<RunTicket> {
        let media_type = accept(candidate.as_ref(), &mut self.presenter)?;
        let file = candidate?;

        self.release_result();
        self.session.sequence.invalidate();

        let source = Arc::new(file);
        tracing::info!(name = source.name(), %media_type, bytes = source.len(), "file accepted");
        self.presenter
            .show_original(&source, &format_file_size(source.len()));
        self.session.source = Some(source);
        self.session.state = ControllerState::FileAccepted;

        self.issue_run()
    }

    fn change_quality(&mut self, percent: u8) -> Option<RunTicket> {
        self.session.quality = Quality::from_percent(percent);
        tracing::debug!(quality = self.session.quality.percent(), "quality changed");

        if self.session.source.is_none() {
            return None;
        }
        if self.session.state == ControllerState::Previewing {
            self.session.state = ControllerState::Recompressing;
        }
        self.issue_run()
    }

    fn issue_run(&mut self) -> Option<RunTicket> {
        let source = self.session.source.clone()?;
        let media_type = source.media_type()?;
        let run = self.session.sequence.next();

        tracing::debug!(%run, quality = self.session.quality.percent(), "issuing run");

        Some(RunTicket::new(
            RunRequest {
                run,
                source,
                media_type,
                quality: self.session.quality,
            },
            self.session.sequence.clone(),
        ))
    }

    fn show_result(&mut self, result: EncodedResult) {
        self.release_result();

        if let Some(source) = &self.session.source {
            self.session.log.push(CompressionRecord {
                file_name: source.name().to_string(),
                original_size: source.len(),
                compressed_size: result.len(),
                quality_percent: result.quality().percent(),
            });
        }

        self.presenter
            .show_result(&result, &format_file_size(result.len()));
        self.presenter.set_export_enabled(true);
        self.session.result = Some(result);
        self.session.state = ControllerState::Previewing;
    }

    fn export(&mut self) {
        match (&self.session.source, &self.session.result) {
            (Some(source), Some(result)) => {
                let name = self.config.export_name(source.name());
                tracing::info!(file_name = %name, bytes = result.len(), "exporting result");
                self.presenter.save(&name, result);
            }
            _ => tracing::debug!("export requested with no result"),
        }
    }

    fn teardown(&mut self) {
        self.session.sequence.invalidate();
        self.release_result();
        if self.session.source.take().is_some() {
            self.presenter.release_original();
        }
        self.session.state = ControllerState::Idle;
    }

    fn release_result(&mut self) {
        if self.session.result.take().is_some() {
            self.presenter.release_result();
            self.presenter.set_export_enabled(false);
        }
    }

    fn settled_state(&self) -> ControllerState {
        match (&self.session.source, &self.session.result) {
            (None, _) => ControllerState::Idle,
            (Some(_), None) => ControllerState::FileAccepted,
            (Some(_), Some(_)) => ControllerState::Previewing,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.session.state
    }

    pub fn quality(&self) -> Quality {
        self.session.quality
    }

    pub fn source(&self) -> Option<&SourceFile> {
        self.session.source.as_deref()
    }

    pub fn result(&self) -> Option<&EncodedResult> {
        self.session.result.as_ref()
    }

    /// Whether the export action should be enabled.
    pub fn can_export(&self) -> bool {
        self.session.result.is_some()
    }

    pub fn history(&self) -> &SessionLog {
        &self.session.log
    }

    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}
