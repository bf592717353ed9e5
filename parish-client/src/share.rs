use std::time::Duration;

use parking_lot::Mutex;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::{Clipboard, Notifier, Opener, Timer};

/// How long the "copied" confirmation stays up after copying the link
pub const COPIED_RESET: Duration = Duration::from_millis(2000);

// Same set as javascript's encodeURIComponent leaves alone
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// The url to share: the explicitly configured one, or else the page's own
pub fn canonical_url(explicit: Option<&str>, current_location: &str) -> String {
    match explicit {
        Some(url) if !url.trim().is_empty() => String::from(url),
        _ => String::from(current_location),
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SharePlatform {
    Facebook,
    Twitter,
    Email,
}

impl SharePlatform {
    pub const ALL: [SharePlatform; 3] = [
        SharePlatform::Facebook,
        SharePlatform::Twitter,
        SharePlatform::Email,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SharePlatform::Facebook => "Facebook",
            SharePlatform::Twitter => "Twitter",
            SharePlatform::Email => "Email",
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ShareLinks {
    url: String,
    title: String,
}

impl ShareLinks {
    pub fn new(url: String, title: String) -> ShareLinks {
        ShareLinks { url, title }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn link_for(&self, platform: SharePlatform) -> String {
        match platform {
            SharePlatform::Facebook => format!(
                "https://www.facebook.com/sharer/sharer.php?u={}",
                encode(&self.url)
            ),
            SharePlatform::Twitter => format!(
                "https://twitter.com/intent/tweet?url={}&text={}",
                encode(&self.url),
                encode(&self.title)
            ),
            SharePlatform::Email => format!(
                "mailto:?subject={}&body={}",
                encode(&self.title),
                encode(&format!("{} {}", self.title, self.url))
            ),
        }
    }
}

#[derive(Debug, Default)]
struct MenuState {
    open: bool,
    copied: bool,
    // bumped on each copy, so that only the latest copy's timer resets `copied`
    copies: u64,
}

#[derive(Debug)]
pub struct ShareMenu {
    links: ShareLinks,
    state: Mutex<MenuState>,
}

impl ShareMenu {
    pub fn new(links: ShareLinks) -> ShareMenu {
        ShareMenu {
            links,
            state: Mutex::new(MenuState::default()),
        }
    }

    pub fn links(&self) -> &ShareLinks {
        &self.links
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().open
    }

    pub fn is_copied(&self) -> bool {
        self.state.lock().copied
    }

    /// The share button was clicked
    pub fn toggle(&self) {
        let mut state = self.state.lock();
        state.open = !state.open;
    }

    /// A click landed outside of the open menu
    pub fn click_outside(&self) {
        self.close();
    }

    fn close(&self) {
        self.state.lock().open = false;
    }

    pub fn share<O: ?Sized + Opener>(&self, platform: SharePlatform, opener: &O) {
        self.close();
        let link = self.links.link_for(platform);
        tracing::debug!(?platform, %link, "sharing post");
        opener.open(&link);
    }

    /// Copy the url, flagging it as copied for `COPIED_RESET`. Returns once
    /// the flag got reset.
    pub async fn copy_link<C, N, T>(&self, clipboard: &C, notifier: &N, timer: &T) -> bool
    where
        C: ?Sized + Clipboard,
        N: ?Sized + Notifier,
        T: ?Sized + Timer,
    {
        self.close();
        if let Err(err) = clipboard.write_text(self.links.url()).await {
            tracing::error!(?err, "failed copying link to clipboard");
            notifier.error("Failed to copy link");
            return false;
        }
        let copy = {
            let mut state = self.state.lock();
            state.copied = true;
            state.copies += 1;
            state.copies
        };
        notifier.success("Link copied to clipboard");
        timer.sleep(COPIED_RESET).await;
        let mut state = self.state.lock();
        if state.copies == copy {
            state.copied = false;
        }
        true
    }
}
