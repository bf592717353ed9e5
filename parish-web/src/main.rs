use std::rc::Rc;

use anyhow::{anyhow, Context};
use gloo_storage::{LocalStorage, Storage};
use parish_client::{
    api::{PostSlug, Session},
    canonical_url, HttpBackend,
};

mod browser;
mod ui;

const KEY_SESSION: &str = "session";

/// What the panel needs to know about the page it is mounted on
#[derive(Clone, Debug, PartialEq)]
pub struct PageInfo {
    pub host: String,
    pub post: PostSlug,
    pub share_url: String,
    pub title: String,
}

fn js(what: &'static str) -> impl Fn(wasm_bindgen::JsValue) -> anyhow::Error {
    move |e| anyhow!("reading {what}: {e:?}")
}

fn page_info() -> anyhow::Result<PageInfo> {
    let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
    let document = window.document().ok_or_else(|| anyhow!("no document"))?;
    let location = window.location();

    let host = location.origin().map_err(js("page origin"))?;
    let href = location.href().map_err(js("page url"))?;
    let path = location.pathname().map_err(js("page path"))?;
    let post = path
        .split('/')
        .filter(|s| !s.is_empty())
        .last()
        .ok_or_else(|| anyhow!("no post slug in path {path:?}"))?;
    let canonical = document
        .query_selector("link[rel=canonical]")
        .map_err(js("canonical link"))?
        .and_then(|link| link.get_attribute("href"));

    Ok(PageInfo {
        host,
        post: PostSlug::new(post),
        share_url: canonical_url(canonical.as_deref(), &href),
        title: document.title(),
    })
}

fn start() -> anyhow::Result<()> {
    let page = page_info().context("inspecting the page")?;
    let backend = HttpBackend::new(&page.host)?;
    // a missing or unreadable session means nobody is logged in
    let session: Session = LocalStorage::get(KEY_SESSION).unwrap_or_default();
    tracing::debug!(post = %page.post, guest = session.is_guest(), "mounting engagement panel");
    yew::Renderer::<ui::App>::with_props(ui::AppProps {
        backend: ui::Shared(Rc::new(backend)),
        page,
        session,
    })
    .render();
    Ok(())
}

fn main() {
    tracing_wasm::set_as_global_default();
    if let Err(err) = start() {
        tracing::error!(?err, "failed starting engagement panel");
    }
}
