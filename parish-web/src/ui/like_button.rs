use parish_client::api::LikeStatus;
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct LikeButtonProps {
    pub status: LikeStatus,
    pub loading: bool,
    pub on_toggle: Callback<()>,
    #[prop_or_default]
    pub small: bool,
}

#[function_component(LikeButton)]
pub fn like_button(p: &LikeButtonProps) -> Html {
    let icon = match p.status.has_liked {
        true => "bi-heart-fill",
        false => "bi-heart",
    };
    html! {
        <button
            type="button"
            class={ classes!(
                "like-button", "btn", "btn-light", icon,
                p.status.has_liked.then(|| "liked"),
                p.small.then(|| "btn-sm"),
            ) }
            title={ if p.status.has_liked { "Unlike" } else { "Like" } }
            aria-pressed={ if p.status.has_liked { "true" } else { "false" } }
            disabled={ p.loading }
            onclick={ p.on_toggle.reform(|_| ()) }
        >
            { " " }{ p.status.like_count }
        </button>
    }
}
