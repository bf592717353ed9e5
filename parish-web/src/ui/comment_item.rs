use parish_client::{
    api::{Comment, CommentId, LikeStatus, Time},
    format_relative, ReplyTarget,
};
use yew::prelude::*;

use crate::ui::LikeButton;

#[derive(Clone, PartialEq, Properties)]
pub struct CommentItemProps {
    pub comment: Comment,
    pub depth: usize,
    pub show_reply: bool,
    pub like: LikeStatus,
    pub like_loading: bool,
    pub now: Time,
    pub on_like: Callback<CommentId>,
    pub on_reply: Callback<(ReplyTarget, usize)>,
}

#[function_component(CommentItem)]
pub fn comment_item(p: &CommentItemProps) -> Html {
    let on_like = {
        let id = p.comment.id.clone();
        p.on_like.reform(move |()| id.clone())
    };
    let reply_button = p.show_reply.then(|| {
        let target = ReplyTarget {
            id: p.comment.id.clone(),
            author_name: p.comment.author_name.clone(),
        };
        let depth = p.depth;
        html! {
            <button
                type="button"
                class="btn btn-link btn-sm reply-button"
                onclick={ p.on_reply.reform(move |_| (target.clone(), depth)) }
            >
                { "Reply" }
            </button>
        }
    });

    html! {
        <li class={ classes!("comment", format!("comment-depth-{}", p.depth)) }>
            <div class="comment-header">
                <span class="comment-author">{ &p.comment.author_name }</span>
                <time
                    class="comment-date text-muted"
                    datetime={ p.comment.created_at.to_rfc3339() }
                >
                    { format_relative(p.comment.created_at, p.now) }
                </time>
            </div>
            <p class="comment-content">{ &p.comment.content }</p>
            <div class="comment-actions">
                <LikeButton
                    status={ p.like }
                    loading={ p.like_loading }
                    on_toggle={ on_like }
                    small={ true }
                />
                { for reply_button }
            </div>
        </li>
    }
}
