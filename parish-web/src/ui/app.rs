use std::{future::Future, rc::Rc, time::Duration};

use parish_client::{
    api::{CommentId, Session},
    flatten_thread, EngagementPanel, HttpBackend, ReplyTarget, ShareLinks, SharePlatform, Timer,
    Toast, MAX_DEPTH,
};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::{html::Scope, prelude::*};

use crate::{
    browser::{BrowserClipboard, BrowserOpener, BrowserTimer, ToastSink},
    ui, PageInfo,
};

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Clone, PartialEq, Properties)]
pub struct AppProps {
    pub backend: ui::Shared<HttpBackend>,
    pub page: PageInfo,
    pub session: Session,
}

pub enum AppMsg {
    Refresh,
    Toast(Toast),
    DismissToast(u64),

    ToggleExpanded,
    TogglePostLike,
    ToggleCommentLike(CommentId),

    SetContent(String),
    SetGuestName(String),
    SetGuestEmail(String),
    ReplyTo(ReplyTarget, usize),
    CancelReply,
    Submit,

    ToggleShare,
    CloseShare,
    Share(SharePlatform),
    CopyLink,
}

pub struct App {
    panel: Rc<EngagementPanel>,
    toasts: Vec<(u64, Toast)>,
    next_toast: u64,
    comment_box: NodeRef,
}

/// Run `op` in the background, re-rendering once it raised its loading flags
/// and again once it completed
fn spawn(link: &Scope<App>, op: impl Future<Output = ()> + 'static) {
    let started = link.clone();
    link.send_future(async move {
        futures::join!(op, async move { started.send_message(AppMsg::Refresh) });
        AppMsg::Refresh
    });
}

impl App {
    fn notifier(ctx: &Context<Self>) -> ToastSink {
        ToastSink(ctx.link().callback(AppMsg::Toast))
    }

    fn backend(ctx: &Context<Self>) -> Rc<HttpBackend> {
        ctx.props().backend.0.clone()
    }

    fn view_comments(&self, ctx: &Context<Self>) -> Html {
        let thread = self.panel.thread();
        if thread.is_comments_loading() {
            return html! {
                <div class="d-flex align-items-center p-2">
                    <div class="spinner-border spinner-border-sm me-2" role="status"></div>
                    <div>{ "Loading comments..." }</div>
                </div>
            };
        }
        let tree = thread.tree();
        if tree.is_empty() {
            return html! {
                <p class="text-muted">{ "No comments yet. Be the first to share your thoughts!" }</p>
            };
        }
        let now = chrono::Utc::now();
        let on_like = ctx.link().callback(AppMsg::ToggleCommentLike);
        let on_reply = ctx
            .link()
            .callback(|(target, depth)| AppMsg::ReplyTo(target, depth));
        html! {
            <ul class="comment-list list-unstyled">
                { for flatten_thread(&tree, MAX_DEPTH).into_iter().map(|entry| {
                    let like = self.panel.comment_like(entry.comment);
                    html! {
                        <ui::CommentItem
                            key={ entry.comment.id.as_str() }
                            comment={ entry.comment.clone() }
                            depth={ entry.depth }
                            show_reply={ entry.show_reply }
                            like={ like.status() }
                            like_loading={ like.is_like_loading() }
                            now={ now }
                            on_like={ on_like.clone() }
                            on_reply={ on_reply.clone() }
                        />
                    }
                }) }
            </ul>
        }
    }

    fn view_form(&self, ctx: &Context<Self>) -> Html {
        let composer = self.panel.composer();
        let submitting = composer.is_submitting();
        let replying = composer.replying_to().map(|target| {
            html! {
                <div class="replying-to d-flex align-items-center mb-2">
                    <span>{ format!("Replying to {}", target.author_name) }</span>
                    <button
                        type="button"
                        class="btn btn-link btn-sm"
                        onclick={ ctx.link().callback(|_| AppMsg::CancelReply) }
                    >
                        { "Cancel" }
                    </button>
                </div>
            }
        });
        let guest_fields = ctx.props().session.is_guest().then(|| {
            html! {
                <div class="guest-fields d-flex gap-2 mb-2">
                    <input
                        type="text"
                        class="form-control"
                        placeholder="Your name"
                        aria-label="Your name"
                        value={ composer.guest_name() }
                        oninput={ ctx.link().callback(|e: InputEvent| {
                            AppMsg::SetGuestName(e.target_unchecked_into::<HtmlInputElement>().value())
                        }) }
                    />
                    <input
                        type="email"
                        class="form-control"
                        placeholder="Your email"
                        aria-label="Your email"
                        value={ composer.guest_email() }
                        oninput={ ctx.link().callback(|e: InputEvent| {
                            AppMsg::SetGuestEmail(e.target_unchecked_into::<HtmlInputElement>().value())
                        }) }
                    />
                </div>
            }
        });

        html! {
            <form
                class="comment-form mt-3"
                onsubmit={ ctx.link().callback(|e: SubmitEvent| {
                    e.prevent_default();
                    AppMsg::Submit
                }) }
            >
                { for replying }
                { for guest_fields }
                <textarea
                    ref={ self.comment_box.clone() }
                    class="form-control mb-2"
                    rows="3"
                    placeholder="Write a comment..."
                    aria-label="Comment"
                    value={ composer.content() }
                    oninput={ ctx.link().callback(|e: InputEvent| {
                        AppMsg::SetContent(e.target_unchecked_into::<HtmlTextAreaElement>().value())
                    }) }
                />
                <button type="submit" class="btn btn-primary" disabled={ submitting }>
                    { if submitting { "Posting..." } else { "Post comment" } }
                </button>
            </form>
        }
    }
}

impl Component for App {
    type Message = AppMsg;
    type Properties = AppProps;

    fn create(ctx: &Context<Self>) -> Self {
        let page = &ctx.props().page;
        let panel = Rc::new(EngagementPanel::new(
            page.post.clone(),
            ShareLinks::new(page.share_url.clone(), page.title.clone()),
        ));
        {
            let panel = panel.clone();
            let backend = App::backend(ctx);
            spawn(ctx.link(), async move { panel.mount(&*backend).await });
        }
        App {
            panel,
            toasts: Vec::new(),
            next_toast: 0,
            comment_box: NodeRef::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let panel = self.panel.clone();
        let backend = App::backend(ctx);
        let notifier = App::notifier(ctx);
        match msg {
            AppMsg::Refresh => (),
            AppMsg::Toast(toast) => {
                let id = self.next_toast;
                self.next_toast += 1;
                self.toasts.push((id, toast));
                ctx.link().send_future(async move {
                    BrowserTimer.sleep(TOAST_DURATION).await;
                    AppMsg::DismissToast(id)
                });
            }
            AppMsg::DismissToast(id) => self.toasts.retain(|(t, _)| *t != id),

            AppMsg::ToggleExpanded => spawn(ctx.link(), async move {
                if panel.toggle_expanded(&*backend, &notifier).await {
                    panel.mount_comment_likes(&*backend).await;
                }
            }),
            AppMsg::TogglePostLike => spawn(ctx.link(), async move {
                panel.toggle_post_like(&*backend, &notifier).await;
            }),
            AppMsg::ToggleCommentLike(id) => match panel.thread().find(&id) {
                None => tracing::warn!(%id, "like toggled on a comment no longer listed"),
                Some(comment) => {
                    let like = panel.comment_like(&comment);
                    spawn(ctx.link(), async move {
                        like.toggle(&*backend, &notifier).await;
                    })
                }
            },

            AppMsg::SetContent(content) => panel.composer().set_content(content),
            AppMsg::SetGuestName(name) => panel.composer().set_guest_name(name),
            AppMsg::SetGuestEmail(email) => panel.composer().set_guest_email(email),
            AppMsg::ReplyTo(target, depth) => {
                if panel.composer().reply_to(target, depth) {
                    if let Some(textarea) = self.comment_box.cast::<HtmlTextAreaElement>() {
                        if let Err(err) = textarea.focus() {
                            tracing::debug!(?err, "failed focusing comment box");
                        }
                    }
                }
            }
            AppMsg::CancelReply => panel.composer().cancel_reply(),
            AppMsg::Submit => {
                let session = ctx.props().session.clone();
                spawn(ctx.link(), async move {
                    panel.submit_comment(&*backend, &session, &notifier).await;
                })
            }

            AppMsg::ToggleShare => panel.share().toggle(),
            AppMsg::CloseShare => panel.share().click_outside(),
            AppMsg::Share(platform) => panel.share().share(platform, &BrowserOpener),
            AppMsg::CopyLink => spawn(ctx.link(), async move {
                panel
                    .share()
                    .copy_link(&BrowserClipboard, &notifier, &BrowserTimer)
                    .await;
            }),
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let post_like = self.panel.post_like();
        let share = self.panel.share();
        let expanded = self.panel.is_expanded();
        let comments = expanded.then(|| {
            html! {
                <div class="comment-section mt-3">
                    { self.view_comments(ctx) }
                    { self.view_form(ctx) }
                </div>
            }
        });

        html! {
            <section class="engagement-panel">
                <div class="engagement-actions d-flex align-items-center gap-2">
                    <ui::LikeButton
                        status={ post_like.status() }
                        loading={ post_like.is_like_loading() }
                        on_toggle={ ctx.link().callback(|()| AppMsg::TogglePostLike) }
                    />
                    <button
                        type="button"
                        class={ classes!("btn", "btn-light", "bi-chat", expanded.then(|| "active")) }
                        aria-expanded={ if expanded { "true" } else { "false" } }
                        onclick={ ctx.link().callback(|_| AppMsg::ToggleExpanded) }
                    >
                        { match expanded {
                            true => format!(" {} comments", self.panel.thread().comment_count()),
                            false => String::from(" Comments"),
                        } }
                    </button>
                    <ui::ShareMenu
                        open={ share.is_open() }
                        copied={ share.is_copied() }
                        on_toggle={ ctx.link().callback(|()| AppMsg::ToggleShare) }
                        on_close={ ctx.link().callback(|()| AppMsg::CloseShare) }
                        on_share={ ctx.link().callback(AppMsg::Share) }
                        on_copy={ ctx.link().callback(|()| AppMsg::CopyLink) }
                    />
                </div>
                { for comments }
                <ui::Toasts
                    toasts={ self.toasts.clone() }
                    on_dismiss={ ctx.link().callback(AppMsg::DismissToast) }
                />
            </section>
        }
    }
}
