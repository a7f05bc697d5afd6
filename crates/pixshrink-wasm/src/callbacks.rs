//! Delivery of queued UI commands to the host page.
//!
//! The host passes a plain object of optional functions:
//!
//! ```typescript
//! interface CompressorCallbacks {
//!   alert?(message: string): void;
//!   showOriginal?(url: string, size: string): void;
//!   clearOriginal?(): void;
//!   showResult?(url: string, size: string, ratio: number): void;
//!   clearResult?(): void;
//!   exportEnabled?(enabled: boolean): void;
//!   save?(url: string, fileName: string): void;
//!   error?(message: string): void;
//! }
//! ```
//!
//! Object URLs handed to `showOriginal`/`showResult` stay valid until they are
//! replaced or cleared, or the compressor is dropped. The URL passed to `save`
//! is revoked as soon as the callback returns, so the host must start the
//! download synchronously.

use js_sys::{Array, Function, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, Url};

use crate::presenter::UiCommand;

pub(crate) struct JsCallbacks {
    target: Object,
    original_url: Option<String>,
    result_url: Option<String>,
}

impl JsCallbacks {
    pub(crate) fn new(target: Object) -> Self {
        Self {
            target,
            original_url: None,
            result_url: None,
        }
    }

    /// Apply one command. A failing callback is logged and skipped.
    pub(crate) fn deliver(&mut self, command: UiCommand) {
        if let Err(err) = self.apply(command) {
            tracing::warn!(error = ?err, "ui callback failed");
        }
    }

    fn apply(&mut self, command: UiCommand) -> Result<(), JsValue> {
        match command {
            UiCommand::Alert(message) => self.call("alert", &[message.into()]),
            UiCommand::ShowOriginal { bytes, mime, size } => {
                revoke(self.original_url.take());
                let url = object_url(&bytes, &mime)?;
                self.original_url = Some(url.clone());
                self.call("showOriginal", &[url.into(), size.into()])
            }
            UiCommand::ReleaseOriginal => {
                revoke(self.original_url.take());
                self.call("clearOriginal", &[])
            }
            UiCommand::ShowResult {
                bytes,
                mime,
                size,
                ratio,
            } => {
                revoke(self.result_url.take());
                let url = object_url(&bytes, mime)?;
                self.result_url = Some(url.clone());
                self.call("showResult", &[url.into(), size.into(), ratio.into()])
            }
            UiCommand::ReleaseResult => {
                revoke(self.result_url.take());
                self.call("clearResult", &[])
            }
            UiCommand::ExportEnabled(enabled) => self.call("exportEnabled", &[enabled.into()]),
            UiCommand::Save {
                file_name,
                bytes,
                mime,
            } => {
                let url = object_url(&bytes, mime)?;
                let outcome = self.call("save", &[url.clone().into(), file_name.into()]);
                revoke(Some(url));
                outcome
            }
            UiCommand::Error(message) => self.call("error", &[message.into()]),
        }
    }

    fn call(&self, name: &str, args: &[JsValue]) -> Result<(), JsValue> {
        let value = Reflect::get(&self.target, &JsValue::from_str(name))?;
        let Some(function) = value.dyn_ref::<Function>() else {
            tracing::trace!(callback = name, "no callback registered");
            return Ok(());
        };
        let args: Array = args.iter().collect();
        function.apply(&self.target, &args)?;
        Ok(())
    }
}

impl Drop for JsCallbacks {
    fn drop(&mut self) {
        revoke(self.original_url.take());
        revoke(self.result_url.take());
    }
}

fn object_url(bytes: &[u8], mime: &str) -> Result<String, JsValue> {
    let parts = Array::of1(&Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    Url::create_object_url_with_blob(&blob)
}

fn revoke(url: Option<String>) {
    if let Some(url) = url {
        if let Err(err) = Url::revoke_object_url(&url) {
            tracing::debug!(error = ?err, "failed to revoke object url");
        }
    }
}
