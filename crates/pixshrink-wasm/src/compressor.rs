//! The `Compressor` class: the controller wired to a page.
//!
//! # Example
//!
//! ```typescript
//! import init, { Compressor, accept_list } from '@pixshrink/wasm';
//!
//! await init();
//! input.accept = accept_list();
//!
//! const compressor = new Compressor({
//!   alert: (msg) => window.alert(msg),
//!   showOriginal: (url, size) => { originalImg.src = url; originalSize.textContent = size; },
//!   clearOriginal: () => { originalImg.removeAttribute('src'); originalSize.textContent = ''; },
//!   showResult: (url, size, ratio) => { resultImg.src = url; resultSize.textContent = size; },
//!   clearResult: () => { resultImg.removeAttribute('src'); },
//!   exportEnabled: (on) => { exportButton.disabled = !on; },
//!   save: (url, fileName) => { const a = document.createElement('a'); a.href = url; a.download = fileName; a.click(); },
//! }, { defaultQuality: 80 });
//!
//! input.onchange = async () => {
//!   const file = input.files[0];
//!   compressor.selectFile(file && { name: file.name, type: file.type, bytes: new Uint8Array(await file.arrayBuffer()) });
//! };
//! slider.oninput = () => compressor.setQuality(Number(slider.value));
//! exportButton.onclick = () => compressor.export();
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use js_sys::{Array, Object, Reflect, Uint8Array};
use pixshrink_core::{
    CompressionRecord, CompressorConfig, Controller, Event, Quality, RunTicket, SourceFile,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::callbacks::JsCallbacks;
use crate::presenter::{QueuedPresenter, UiCommand};
use crate::scheduler;

/// State shared between the JS handle and in-flight runs.
struct Shared {
    controller: RefCell<Controller<QueuedPresenter>>,
    callbacks: RefCell<JsCallbacks>,
    pending: RefCell<VecDeque<UiCommand>>,
}

impl Shared {
    /// Apply an event, deliver its UI work, and start any run it issued.
    fn dispatch(self: &Rc<Self>, event: Event) {
        let ticket = self.controller.borrow_mut().dispatch(event);
        self.flush();
        if let Some(ticket) = ticket {
            self.spawn(ticket);
        }
    }

    fn spawn(self: &Rc<Self>, ticket: RunTicket) {
        let shared: Weak<Self> = Rc::downgrade(self);
        let options = *self.controller.borrow().options();
        tracing::debug!(run = %ticket.run(), "scheduling run");

        spawn_local(async move {
            let outcome = scheduler::run(ticket, options).await;
            let Some(shared) = shared.upgrade() else {
                return;
            };
            shared.controller.borrow_mut().complete(outcome);
            shared.flush();
        });
    }

    /// Move queued presenter calls out to the page.
    ///
    /// Callbacks may re-enter the compressor. A nested flush only enqueues;
    /// the outermost one drains everything.
    fn flush(&self) {
        let commands = self.controller.borrow_mut().presenter_mut().drain();
        self.pending.borrow_mut().extend(commands);

        let Ok(mut callbacks) = self.callbacks.try_borrow_mut() else {
            return;
        };
        loop {
            let next = self.pending.borrow_mut().pop_front();
            match next {
                Some(command) => callbacks.deliver(command),
                None => break,
            }
        }
    }
}

/// Client-side image re-compressor bound to a set of page callbacks.
#[wasm_bindgen]
pub struct Compressor {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl Compressor {
    /// Create a compressor.
    ///
    /// `config` may be `undefined` or a partial `CompressorConfig`
    /// (`maxDimension`, `defaultQuality`, `historyCapacity`, `filter`,
    /// `exportPrefix`). Missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(callbacks: Object, config: JsValue) -> Result<Compressor, JsValue> {
        let config: CompressorConfig = if config.is_undefined() || config.is_null() {
            CompressorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        tracing::debug!(?config, "creating compressor");

        Ok(Compressor {
            shared: Rc::new(Shared {
                controller: RefCell::new(Controller::with_config(QueuedPresenter::new(), config)),
                callbacks: RefCell::new(JsCallbacks::new(callbacks)),
                pending: RefCell::new(VecDeque::new()),
            }),
        })
    }

    /// Offer a file from the picker. Pass `null`/`undefined` when the picker
    /// closed without a selection.
    ///
    /// The file is a plain `{ name, type, bytes }` object where `bytes` is a
    /// `Uint8Array` or `ArrayBuffer`.
    #[wasm_bindgen(js_name = selectFile)]
    pub fn select_file(&self, file: JsValue) -> Result<(), JsValue> {
        let file = if file.is_undefined() || file.is_null() {
            None
        } else {
            Some(source_file(&file)?)
        };
        self.shared.dispatch(Event::FileSelected(file));
        Ok(())
    }

    /// Offer dropped files. Only the first one is considered.
    #[wasm_bindgen(js_name = dropFiles)]
    pub fn drop_files(&self, files: Array) -> Result<(), JsValue> {
        let files = files
            .iter()
            .take(1)
            .map(|file| source_file(&file))
            .collect::<Result<Vec<_>, _>>()?;
        self.shared.dispatch(Event::FilesDropped(files));
        Ok(())
    }

    /// Set quality as a percentage. Values are rounded and clamped to 0..=100.
    #[wasm_bindgen(js_name = setQuality)]
    pub fn set_quality(&self, percent: f64) {
        self.shared
            .dispatch(Event::QualityChanged(percent_from_js(percent)));
    }

    /// Save the current result through the `save` callback.
    pub fn export(&self) {
        self.shared.dispatch(Event::Export);
    }

    /// Release the source and the result, revoking both preview URLs.
    pub fn teardown(&self) {
        self.shared.dispatch(Event::Teardown);
    }

    /// Current quality as a percentage.
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.shared.controller.borrow().quality().percent()
    }

    /// One of `"idle"`, `"fileAccepted"`, `"previewing"`, `"recompressing"`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.shared.controller.borrow().state())?)
    }

    #[wasm_bindgen(getter, js_name = canExport)]
    pub fn can_export(&self) -> bool {
        self.shared.controller.borrow().can_export()
    }

    /// Recent results, oldest first, as
    /// `{ fileName, originalSize, compressedSize, qualityPercent }` objects.
    pub fn history(&self) -> Result<JsValue, JsValue> {
        let controller = self.shared.controller.borrow();
        let records: Vec<&CompressionRecord> = controller.history().records().collect();
        Ok(serde_wasm_bindgen::to_value(&records)?)
    }
}

impl Drop for Compressor {
    fn drop(&mut self) {
        let mut controller = self.shared.controller.borrow_mut();
        controller.dispatch(Event::Teardown);
        // The page is dropping us; don't call back into it.
        controller.presenter_mut().drain();
    }
}

/// Read a `{ name, type, bytes }` object.
fn source_file(value: &JsValue) -> Result<SourceFile, JsValue> {
    let name = Reflect::get(value, &JsValue::from_str("name"))?
        .as_string()
        .unwrap_or_default();
    let declared_type = Reflect::get(value, &JsValue::from_str("type"))?
        .as_string()
        .unwrap_or_default();
    let bytes = Reflect::get(value, &JsValue::from_str("bytes"))?;
    if bytes.is_undefined() || bytes.is_null() {
        return Err(JsValue::from_str("file object has no `bytes`"));
    }
    let bytes = Uint8Array::new(&bytes).to_vec();
    Ok(SourceFile::new(name, declared_type, bytes))
}

fn percent_from_js(percent: f64) -> u8 {
    if percent.is_nan() {
        Quality::DEFAULT_PERCENT
    } else {
        percent.round().clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_from_js() {
        assert_eq!(percent_from_js(42.4), 42);
        assert_eq!(percent_from_js(42.5), 43);
        assert_eq!(percent_from_js(-3.0), 0);
        assert_eq!(percent_from_js(250.0), 100);
        assert_eq!(percent_from_js(f64::INFINITY), 100);
        assert_eq!(percent_from_js(f64::NAN), Quality::DEFAULT_PERCENT);
    }
}
