//! The seam between the controller and whatever renders it.

use crate::encode::EncodedResult;
use crate::pipeline::PipelineError;
use crate::SourceFile;

/// Output side of the compressor.
///
/// The controller is the only caller and never holds a presenter borrow across
/// a pipeline run, so implementations are free to touch UI state directly.
pub trait Presenter {
    /// Blocking, user-facing message (invalid file type).
    fn alert(&mut self, message: &str);

    /// Display the accepted source and its formatted size.
    fn show_original(&mut self, source: &SourceFile, formatted_size: &str);

    /// Drop any handle referencing the displayed source. Called on teardown.
    fn release_original(&mut self);

    /// Display a freshly encoded result and its formatted size.
    ///
    /// Any handle created for a previous result must already have been
    /// released through [`Presenter::release_result`].
    fn show_result(&mut self, result: &EncodedResult, formatted_size: &str);

    /// Drop any handle (object URL, texture, ...) referencing the current result.
    fn release_result(&mut self);

    fn set_export_enabled(&mut self, enabled: bool);

    /// Hand the result to the host for a save-as.
    fn save(&mut self, file_name: &str, result: &EncodedResult);

    /// Non-blocking notice that the latest run failed.
    fn show_error(&mut self, error: &PipelineError);
}
