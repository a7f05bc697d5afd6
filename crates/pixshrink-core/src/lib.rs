//! pixshrink Core - Image re-compression library
//!
//! This crate provides the core of pixshrink: validating a picked JPEG/PNG,
//! decoding it, capping its size, re-encoding it at a chosen quality, and the
//! controller state machine that sequences those runs for a UI.

pub mod config;
pub mod controller;
pub mod decode;
pub mod encode;
pub mod format;
pub mod history;
pub mod media;
pub mod pipeline;
pub mod presenter;
pub mod quality;
pub mod validate;

pub use config::CompressorConfig;
pub use controller::{Controller, ControllerState, Event};
pub use decode::{Bitmap, DecodeError, FilterType, MAX_DIMENSION};
pub use encode::{EncodeError, EncodedResult};
pub use format::{compression_ratio, format_file_size};
pub use history::{CompressionRecord, SessionLog};
pub use media::{MediaType, SourceFile};
pub use pipeline::{execute, PipelineError, PipelineOptions, RunId, RunOutcome, RunTicket};
pub use presenter::Presenter;
pub use quality::Quality;
pub use validate::{validate, ValidationError, ACCEPT_LIST, INVALID_FILE_MESSAGE};
