//! One decode → resize → encode run, tagged with a sequence number.
//!
//! Every run the controller starts gets a [`RunId`] from a shared
//! [`RunSequence`]. Issuing a newer id supersedes all older runs: a run checks
//! its ticket between stages and stops early, and the controller drops any
//! completion whose id is not the latest. Either check alone prevents a slow
//! early run from overwriting a later result.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::config::CompressorConfig;
use crate::decode::{self, Bitmap, DecodeError, FilterType, MAX_DIMENSION};
use crate::encode::{self, EncodeError, EncodedResult};
use crate::{MediaType, Quality, SourceFile};

/// Identifier of one run. Later runs have larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// Issues run ids and remembers the latest one.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct RunSequence {
    latest: Arc<AtomicU64>,
}

impl RunSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new id, superseding every earlier one.
    pub fn next(&self) -> RunId {
        RunId(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Most recently issued id, or `None` before the first run.
    pub fn latest(&self) -> Option<RunId> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            id => Some(RunId(id)),
        }
    }

    pub fn is_latest(&self, run: RunId) -> bool {
        self.latest.load(Ordering::SeqCst) == run.0
    }

    /// Supersede every issued run without starting a new one.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

/// Failure of a single run. Terminal for that run only.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Resize failed: {0}")]
    Resize(#[source] DecodeError),

    #[error("Encode failed: {0}")]
    Encode(#[from] EncodeError),
}

/// Stage settings that stay fixed for a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    pub max_dimension: u32,
    pub filter: FilterType,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_dimension: MAX_DIMENSION,
            filter: FilterType::default(),
        }
    }
}

impl From<&CompressorConfig> for PipelineOptions {
    fn from(config: &CompressorConfig) -> Self {
        Self {
            max_dimension: config.max_dimension,
            filter: config.filter,
        }
    }
}

/// Everything a run needs, captured when it is issued.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub run: RunId,
    pub source: Arc<SourceFile>,
    pub media_type: MediaType,
    pub quality: Quality,
}

/// A run request plus the sequence it was issued from.
#[derive(Debug, Clone)]
pub struct RunTicket {
    request: RunRequest,
    sequence: RunSequence,
}

impl RunTicket {
    pub(crate) fn new(request: RunRequest, sequence: RunSequence) -> Self {
        Self { request, sequence }
    }

    pub fn run(&self) -> RunId {
        self.request.run
    }

    pub fn request(&self) -> &RunRequest {
        &self.request
    }

    /// True once a newer run has been issued (or the session was reset).
    pub fn is_superseded(&self) -> bool {
        !self.sequence.is_latest(self.request.run)
    }

    /// Decode the source bytes. Re-decodes on every run; bitmaps are never cached.
    pub fn decode(&self) -> Result<Bitmap, PipelineError> {
        let bitmap = decode::decode(self.request.source.bytes(), self.request.media_type)?;
        tracing::debug!(
            run = %self.request.run,
            width = bitmap.width,
            height = bitmap.height,
            "decoded source"
        );
        Ok(bitmap)
    }

    /// Downscale to the configured maximum.
    pub fn resize(
        &self,
        bitmap: &Bitmap,
        options: &PipelineOptions,
    ) -> Result<Bitmap, PipelineError> {
        decode::resize(bitmap, options.max_dimension, options.filter)
            .map_err(PipelineError::Resize)
    }

    /// Encode at the requested quality, in the source's format.
    pub fn encode(&self, bitmap: &Bitmap) -> Result<EncodedResult, PipelineError> {
        let result = encode::encode(bitmap, self.request.media_type, self.request.quality)?;
        tracing::debug!(
            run = %self.request.run,
            bytes = result.len(),
            quality = self.request.quality.percent(),
            "encoded result"
        );
        Ok(result)
    }

    pub fn completed(&self, result: EncodedResult) -> RunOutcome {
        RunOutcome::Completed {
            run: self.request.run,
            result,
        }
    }

    pub fn failed(&self, error: PipelineError) -> RunOutcome {
        RunOutcome::Failed {
            run: self.request.run,
            error,
        }
    }

    pub fn superseded(&self) -> RunOutcome {
        RunOutcome::Superseded(self.request.run)
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    Completed { run: RunId, result: EncodedResult },
    Failed { run: RunId, error: PipelineError },
    /// A newer run was issued before this one finished.
    Superseded(RunId),
}

impl RunOutcome {
    pub fn run(&self) -> RunId {
        match self {
            RunOutcome::Completed { run, .. } | RunOutcome::Failed { run, .. } => *run,
            RunOutcome::Superseded(run) => *run,
        }
    }
}

/// Run all stages synchronously, bailing out between stages if superseded.
///
/// Each stage is attempted once; there are no retries.
pub fn execute(ticket: &RunTicket, options: &PipelineOptions) -> RunOutcome {
    if ticket.is_superseded() {
        return ticket.superseded();
    }

    let bitmap = match ticket.decode() {
        Ok(bitmap) => bitmap,
        Err(err) => return ticket.failed(err),
    };
    if ticket.is_superseded() {
        return ticket.superseded();
    }

    let fitted = match ticket.resize(&bitmap, options) {
        Ok(fitted) => fitted,
        Err(err) => return ticket.failed(err),
    };
    drop(bitmap);

    match ticket.encode(&fitted) {
        Ok(result) => ticket.completed(result),
        Err(err) => ticket.failed(err),
    }
}
