use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use parish_client::{Clipboard, Notifier, Opener, Timer, Toast};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use yew::Callback;

#[wasm_bindgen(inline_js = "
    export function write_clipboard(text) {
        return navigator.clipboard.writeText(text);
    }
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn write_clipboard(text: &str) -> Result<js_sys::Promise, JsValue>;
}

pub struct BrowserClipboard;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Clipboard for BrowserClipboard {
    async fn write_text(&self, text: &str) -> anyhow::Result<()> {
        let promise = write_clipboard(text).map_err(|e| anyhow!("calling clipboard: {e:?}"))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| anyhow!("writing to clipboard: {e:?}"))?;
        Ok(())
    }
}

pub struct BrowserTimer;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Timer for BrowserTimer {
    async fn sleep(&self, d: Duration) {
        if let Err(err) = wasm_timer::Delay::new(d).await {
            tracing::warn!(?err, "browser timer failed, firing early");
        }
    }
}

/// Opens share links in a new tab, detached from this page
pub struct BrowserOpener;

impl Opener for BrowserOpener {
    fn open(&self, url: &str) {
        let Some(window) = web_sys::window() else {
            tracing::warn!("no window to open share link in");
            return;
        };
        if let Err(err) =
            window.open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer")
        {
            tracing::warn!(?err, %url, "failed opening share link");
        }
    }
}

/// Forwards toasts to the component displaying them
#[derive(Clone)]
pub struct ToastSink(pub Callback<Toast>);

impl Notifier for ToastSink {
    fn notify(&self, toast: Toast) {
        self.0.emit(toast)
    }
}
