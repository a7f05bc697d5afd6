//! A presenter that queues UI work instead of doing it.
//!
//! JS callbacks may call back into the `Compressor` (a slider handler that
//! sets quality, say). Running them while the controller is mutably borrowed
//! would panic, so the controller talks to a [`QueuedPresenter`] and the
//! queue is flushed after the borrow ends.

use std::sync::Arc;

use pixshrink_core::{compression_ratio, EncodedResult, PipelineError, Presenter, SourceFile};

/// One deferred presenter call.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    Alert(String),
    ShowOriginal {
        bytes: Arc<[u8]>,
        mime: String,
        size: String,
    },
    ReleaseOriginal,
    ShowResult {
        bytes: Arc<[u8]>,
        mime: &'static str,
        size: String,
        /// Percent saved relative to the original.
        ratio: f64,
    },
    ReleaseResult,
    ExportEnabled(bool),
    Save {
        file_name: String,
        bytes: Arc<[u8]>,
        mime: &'static str,
    },
    Error(String),
}

#[derive(Debug, Default)]
pub struct QueuedPresenter {
    queue: Vec<UiCommand>,
    original_size: u64,
}

impl QueuedPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued command, oldest first.
    pub fn drain(&mut self) -> Vec<UiCommand> {
        std::mem::take(&mut self.queue)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Presenter for QueuedPresenter {
    fn alert(&mut self, message: &str) {
        self.queue.push(UiCommand::Alert(message.to_string()));
    }

    fn show_original(&mut self, source: &SourceFile, formatted_size: &str) {
        self.original_size = source.len();
        self.queue.push(UiCommand::ShowOriginal {
            bytes: Arc::clone(source.bytes_arc()),
            mime: source.declared_type().to_string(),
            size: formatted_size.to_string(),
        });
    }

    fn release_original(&mut self) {
        self.original_size = 0;
        self.queue.push(UiCommand::ReleaseOriginal);
    }

    fn show_result(&mut self, result: &EncodedResult, formatted_size: &str) {
        self.queue.push(UiCommand::ShowResult {
            bytes: Arc::clone(result.bytes_arc()),
            mime: result.media_type().mime(),
            size: formatted_size.to_string(),
            ratio: compression_ratio(self.original_size, result.len()),
        });
    }

    fn release_result(&mut self) {
        self.queue.push(UiCommand::ReleaseResult);
    }

    fn set_export_enabled(&mut self, enabled: bool) {
        self.queue.push(UiCommand::ExportEnabled(enabled));
    }

    fn save(&mut self, file_name: &str, result: &EncodedResult) {
        self.queue.push(UiCommand::Save {
            file_name: file_name.to_string(),
            bytes: Arc::clone(result.bytes_arc()),
            mime: result.media_type().mime(),
        });
    }

    fn show_error(&mut self, error: &PipelineError) {
        self.queue.push(UiCommand::Error(error.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixshrink_core::{encode, Bitmap, Controller, Event, MediaType, Quality, INVALID_FILE_MESSAGE};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let bitmap = Bitmap::filled(width, height, [10, 200, 30, 255]);
        encode::encode(&bitmap, MediaType::Png, Quality::default())
            .unwrap()
            .bytes()
            .to_vec()
    }

    fn controller() -> Controller<QueuedPresenter> {
        Controller::new(QueuedPresenter::new())
    }

    #[test]
    fn test_invalid_file_queues_alert_only() {
        let mut ctrl = controller();
        let ticket = ctrl.dispatch(Event::FileSelected(Some(SourceFile::new(
            "anim.gif",
            "image/gif",
            vec![1u8, 2, 3],
        ))));

        assert!(ticket.is_none());
        assert_eq!(
            ctrl.presenter_mut().drain(),
            vec![UiCommand::Alert(INVALID_FILE_MESSAGE.to_string())]
        );
    }

    #[test]
    fn test_accepted_file_queues_original_then_result() {
        let bytes = png(32, 32);
        let original_len = bytes.len();
        let mut ctrl = controller();

        ctrl.dispatch_blocking(Event::FileSelected(Some(SourceFile::new(
            "dot.png",
            "image/png",
            bytes,
        ))));
        let commands = ctrl.presenter_mut().drain();

        assert_eq!(commands.len(), 3);
        match &commands[0] {
            UiCommand::ShowOriginal { bytes, mime, .. } => {
                assert_eq!(bytes.len(), original_len);
                assert_eq!(mime, "image/png");
            }
            other => panic!("expected ShowOriginal, got {other:?}"),
        }
        match &commands[1] {
            UiCommand::ShowResult { mime, size, .. } => {
                assert_eq!(*mime, "image/png");
                assert!(size.ends_with("Bytes") || size.ends_with("KB"));
            }
            other => panic!("expected ShowResult, got {other:?}"),
        }
        assert_eq!(commands[2], UiCommand::ExportEnabled(true));
        assert!(ctrl.presenter().is_empty());
    }

    #[test]
    fn test_second_result_releases_first() {
        let mut ctrl = controller();
        ctrl.dispatch_blocking(Event::FileSelected(Some(SourceFile::new(
            "dot.png",
            "image/png",
            png(16, 16),
        ))));
        ctrl.presenter_mut().drain();

        ctrl.dispatch_blocking(Event::QualityChanged(20));
        let commands = ctrl.presenter_mut().drain();

        let release = commands
            .iter()
            .position(|c| *c == UiCommand::ReleaseResult)
            .unwrap();
        let show = commands
            .iter()
            .position(|c| matches!(c, UiCommand::ShowResult { .. }))
            .unwrap();
        assert!(release < show);
    }

    #[test]
    fn test_export_queues_prefixed_save() {
        let mut ctrl = controller();
        ctrl.dispatch_blocking(Event::FileSelected(Some(SourceFile::new(
            "dot.png",
            "image/png",
            png(8, 8),
        ))));
        ctrl.presenter_mut().drain();

        ctrl.dispatch(Event::Export);
        match ctrl.presenter_mut().drain().as_slice() {
            [UiCommand::Save {
                file_name, mime, ..
            }] => {
                assert_eq!(file_name, "compressed_dot.png");
                assert_eq!(*mime, "image/png");
            }
            other => panic!("expected a single Save, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_failure_queues_error() {
        let mut ctrl = controller();
        ctrl.dispatch_blocking(Event::FileSelected(Some(SourceFile::new(
            "broken.jpg",
            "image/jpeg",
            vec![0xFFu8, 0xD8, 0x00],
        ))));

        let commands = ctrl.presenter_mut().drain();
        assert!(matches!(commands.last(), Some(UiCommand::Error(_))));
    }

    #[test]
    fn test_teardown_releases_original_and_result() {
        let mut ctrl = controller();
        ctrl.dispatch_blocking(Event::FileSelected(Some(SourceFile::new(
            "dot.png",
            "image/png",
            png(8, 8),
        ))));
        ctrl.presenter_mut().drain();

        ctrl.dispatch(Event::Teardown);
        assert_eq!(
            ctrl.presenter_mut().drain(),
            vec![
                UiCommand::ReleaseResult,
                UiCommand::ExportEnabled(false),
                UiCommand::ReleaseOriginal,
            ]
        );
        assert_eq!(ctrl.presenter().original_size, 0);
    }
}
