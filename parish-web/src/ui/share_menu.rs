use parish_client::SharePlatform;
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct ShareMenuProps {
    pub open: bool,
    pub copied: bool,
    pub on_toggle: Callback<()>,
    pub on_close: Callback<()>,
    pub on_share: Callback<SharePlatform>,
    pub on_copy: Callback<()>,
}

#[function_component(ShareMenu)]
pub fn share_menu(p: &ShareMenuProps) -> Html {
    // covers the page while the menu is open, so that clicking anywhere
    // else closes it
    let backdrop = p.open.then(|| {
        html! {
            <div class="share-backdrop" onclick={ p.on_close.reform(|_| ()) }></div>
        }
    });
    let platforms = SharePlatform::ALL.iter().map(|&platform| {
        html! {
            <li>
                <button
                    type="button"
                    class="dropdown-item"
                    onclick={ p.on_share.reform(move |_| platform) }
                >
                    { platform.label() }
                </button>
            </li>
        }
    });

    html! {
        <div class="share-menu">
            { for backdrop }
            <button
                type="button"
                class="btn btn-light bi-share"
                aria-expanded={ if p.open { "true" } else { "false" } }
                onclick={ p.on_toggle.reform(|_| ()) }
            >
                { " Share" }
            </button>
            <ul class={ classes!("dropdown-menu", p.open.then(|| "show")) }>
                { for platforms }
                <li>
                    <button
                        type="button"
                        class="dropdown-item"
                        onclick={ p.on_copy.reform(|_| ()) }
                    >
                        { if p.copied { "Copied!" } else { "Copy link" } }
                    </button>
                </li>
            </ul>
        </div>
    }
}
