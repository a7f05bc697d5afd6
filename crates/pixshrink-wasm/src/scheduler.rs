//! Running pipeline tickets on the browser event loop.
//!
//! A run yields back to the event loop between stages, so a slider drag can
//! issue a newer run while an older one is still decoding. The older ticket
//! notices at its next checkpoint and stops.

use js_sys::{Function, Promise, Reflect};
use pixshrink_core::{PipelineOptions, RunOutcome, RunTicket};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Execute `ticket` stage by stage, yielding before each one.
pub(crate) async fn run(ticket: RunTicket, options: PipelineOptions) -> RunOutcome {
    next_tick().await;
    if ticket.is_superseded() {
        return ticket.superseded();
    }

    let bitmap = match ticket.decode() {
        Ok(bitmap) => bitmap,
        Err(err) => return ticket.failed(err),
    };

    next_tick().await;
    if ticket.is_superseded() {
        return ticket.superseded();
    }

    let fitted = match ticket.resize(&bitmap, &options) {
        Ok(fitted) => fitted,
        Err(err) => return ticket.failed(err),
    };
    drop(bitmap);

    next_tick().await;
    if ticket.is_superseded() {
        return ticket.superseded();
    }

    match ticket.encode(&fitted) {
        Ok(result) => ticket.completed(result),
        Err(err) => ticket.failed(err),
    }
}

/// Resolve on a fresh macrotask via `setTimeout(0)`.
///
/// Works in both window and worker scopes. Falls back to a microtask when no
/// `setTimeout` is reachable.
async fn next_tick() {
    let promise = Promise::new(&mut |resolve, _reject| {
        let global = js_sys::global();
        let set_timeout = Reflect::get(&global, &JsValue::from_str("setTimeout"))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok());
        let scheduled = match set_timeout {
            Some(set_timeout) => set_timeout.call2(&global, &resolve, &JsValue::from(0)),
            None => resolve.call0(&JsValue::UNDEFINED),
        };
        if let Err(err) = scheduled {
            tracing::debug!(error = ?err, "failed to schedule next tick");
        }
    });
    // The promise never rejects.
    let _ = JsFuture::from(promise).await;
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use pixshrink_core::{Controller, Event, SourceFile};
    use wasm_bindgen_test::*;

    use crate::presenter::QueuedPresenter;

    wasm_bindgen_test_configure!(run_in_browser);

    fn png() -> Vec<u8> {
        let bitmap = pixshrink_core::Bitmap::filled(12, 12, [0, 0, 255, 255]);
        pixshrink_core::encode::encode(
            &bitmap,
            pixshrink_core::MediaType::Png,
            pixshrink_core::Quality::default(),
        )
        .unwrap()
        .bytes()
        .to_vec()
    }

    #[wasm_bindgen_test]
    async fn test_run_completes() {
        let mut ctrl = Controller::new(QueuedPresenter::new());
        let ticket = ctrl
            .dispatch(Event::FileSelected(Some(SourceFile::new(
                "a.png",
                "image/png",
                png(),
            ))))
            .unwrap();

        let outcome = run(ticket, *ctrl.options()).await;
        assert!(matches!(outcome, RunOutcome::Completed { .. }));
        assert!(ctrl.complete(outcome));
    }

    #[wasm_bindgen_test]
    async fn test_superseded_run_stops_early() {
        let mut ctrl = Controller::new(QueuedPresenter::new());
        let first = ctrl
            .dispatch(Event::FileSelected(Some(SourceFile::new(
                "a.png",
                "image/png",
                png(),
            ))))
            .unwrap();
        let _second = ctrl.dispatch(Event::QualityChanged(30)).unwrap();

        let outcome = run(first, *ctrl.options()).await;
        assert!(matches!(outcome, RunOutcome::Superseded(_)));
        assert!(!ctrl.complete(outcome));
    }
}
