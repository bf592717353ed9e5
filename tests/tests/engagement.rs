use std::{sync::Arc, time::Duration};

use parish_client::{
    api::{self, CommentId, CommentStatus, LikeStatus, Session},
    count_nodes, flatten_thread, ReplyTarget, SubmitOutcome, ToastLevel, ToggleOutcome,
    ValidationError, GENERIC_FAILURE, MAX_DEPTH,
};
use parish_mock_server::Viewer;
use tests::*;

fn jane() -> Session {
    Session::member("Jane", "jane@example.org")
}

#[tokio::test]
async fn approved_comment_is_appended() {
    let backend = setup(Viewer::member("jane"));
    backend
        .server()
        .lock()
        .queue_comment_id(CommentId::new("c1"));
    let panel = panel();
    let notifier = RecordingNotifier::new();
    assert!(panel.toggle_expanded(&backend, &notifier).await);
    assert_eq!(panel.thread().comment_count(), 0);

    panel
        .composer()
        .set_content(String::from("Great message"));
    let outcome = panel.submit_comment(&backend, &jane(), &notifier).await;

    assert_eq!(outcome, SubmitOutcome::Posted(Some(CommentStatus::Approved)));
    let comments = panel.thread().comments();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].id, CommentId::new("c1"));
    assert_eq!(comments[0].author_name, "Jane");
    assert_eq!(comments[0].content, "Great message");
    assert_eq!(panel.thread().comment_count(), 1);
    assert_eq!(
        notifier.messages(ToastLevel::Success),
        vec![String::from("Comment posted successfully")]
    );
    assert_eq!(panel.composer().content(), "");
}

#[tokio::test]
async fn pending_comment_is_not_shown() {
    let backend = setup(Viewer::guest("visitor"));
    let panel = panel();
    let notifier = RecordingNotifier::new();
    panel.toggle_expanded(&backend, &notifier).await;

    let composer = panel.composer();
    composer.set_content(String::from("Great message"));
    composer.set_guest_name(String::from("Ruth"));
    composer.set_guest_email(String::from("ruth@example.org"));
    let outcome = panel
        .submit_comment(&backend, &Session::guest(), &notifier)
        .await;

    assert_eq!(outcome, SubmitOutcome::Posted(Some(CommentStatus::Pending)));
    assert!(panel.thread().comments().is_empty());
    assert_eq!(panel.thread().comment_count(), 0);
    assert_eq!(
        notifier.toasts().len(),
        1,
        "only the moderation notice is shown"
    );
    assert_eq!(
        notifier.messages(ToastLevel::Success),
        vec![String::from("Comment submitted and awaiting moderation")]
    );
    // guests have their identity cleared along with the draft
    assert_eq!(composer.content(), "");
    assert_eq!(composer.guest_name(), "");
    assert_eq!(composer.guest_email(), "");
    assert_eq!(backend.server().lock().test_num_comments(&slug()), 1);
}

#[tokio::test]
async fn members_keep_guest_fields() {
    let backend = setup(Viewer::member("jane"));
    let panel = panel();
    let notifier = RecordingNotifier::new();
    let composer = panel.composer();
    composer.set_content(String::from("Blessings"));
    composer.set_guest_name(String::from("typed before logging in"));

    panel.submit_comment(&backend, &jane(), &notifier).await;

    assert_eq!(composer.content(), "");
    assert_eq!(composer.guest_name(), "typed before logging in");
}

#[tokio::test]
async fn invalid_drafts_are_never_sent() {
    let backend = setup(Viewer::guest("visitor"));
    let panel = panel();
    let notifier = RecordingNotifier::new();
    let composer = panel.composer();

    composer.set_content(String::from("   "));
    assert_eq!(
        panel.submit_comment(&backend, &jane(), &notifier).await,
        SubmitOutcome::Invalid(ValidationError::EmptyContent)
    );

    composer.set_content(String::from("Hello"));
    composer.set_guest_email(String::from("ruth@example.org"));
    assert_eq!(
        panel
            .submit_comment(&backend, &Session::guest(), &notifier)
            .await,
        SubmitOutcome::Invalid(ValidationError::MissingGuestName)
    );

    composer.set_guest_name(String::from("Ruth"));
    composer.set_guest_email(String::new());
    assert_eq!(
        panel
            .submit_comment(&backend, &Session::guest(), &notifier)
            .await,
        SubmitOutcome::Invalid(ValidationError::MissingGuestEmail)
    );

    assert_eq!(backend.calls().total(), 0);
    assert_eq!(
        notifier.messages(ToastLevel::Error),
        vec![
            String::from("Please write a comment"),
            String::from("Please enter your name"),
            String::from("Please enter your email"),
        ]
    );
    assert_eq!(composer.content(), "Hello");
}

#[tokio::test]
async fn failed_submission_keeps_the_draft() {
    let backend = setup(Viewer::member("jane"));
    seed(&backend, vec![comment("root", None, 0)]);
    let panel = panel();
    let notifier = RecordingNotifier::new();
    panel.toggle_expanded(&backend, &notifier).await;

    let composer = panel.composer();
    composer.set_content(String::from("Me too"));
    assert!(composer.reply_to(
        ReplyTarget {
            id: CommentId::new("root"),
            author_name: String::from("Deacon Paul"),
        },
        0
    ));

    backend.set_offline(true);
    assert_eq!(
        panel.submit_comment(&backend, &jane(), &notifier).await,
        SubmitOutcome::Failed
    );
    assert_eq!(
        notifier.messages(ToastLevel::Error),
        vec![String::from(GENERIC_FAILURE)]
    );

    backend.set_offline(false);
    backend
        .server()
        .lock()
        .fail_next(api::Error::InvalidRequest(String::from("Comment is too long")));
    assert_eq!(
        panel.submit_comment(&backend, &jane(), &notifier).await,
        SubmitOutcome::Failed
    );
    assert_eq!(
        notifier.messages(ToastLevel::Error).last().map(String::as_str),
        Some("Comment is too long")
    );

    assert_eq!(composer.content(), "Me too");
    assert_eq!(
        composer.replying_to().map(|r| r.id),
        Some(CommentId::new("root"))
    );

    // retrying goes through and lands as a reply
    assert_eq!(
        panel.submit_comment(&backend, &jane(), &notifier).await,
        SubmitOutcome::Posted(Some(CommentStatus::Approved))
    );
    assert_eq!(composer.replying_to(), None);
    let tree = panel.thread().tree();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].replies.len(), 1);
    assert_eq!(tree[0].replies[0].comment.content, "Me too");
}

#[tokio::test]
async fn second_submission_while_in_flight_is_skipped() {
    let backend = setup(Viewer::member("jane"));
    let panel = panel();
    let notifier = RecordingNotifier::new();
    panel.composer().set_content(String::from("Hallelujah"));

    backend.pause();
    let jane = jane();
    let (first, second) = tokio::join!(
        panel.submit_comment(&backend, &jane, &notifier),
        async {
            while backend.calls().submit_comment == 0 {
                tokio::task::yield_now().await;
            }
            assert!(panel.composer().is_submitting());
            let second = panel.submit_comment(&backend, &jane, &notifier).await;
            backend.resume();
            second
        }
    );

    assert_eq!(first, SubmitOutcome::Posted(Some(CommentStatus::Approved)));
    assert_eq!(second, SubmitOutcome::Skipped);
    assert_eq!(backend.calls().submit_comment, 1);
    assert!(!panel.composer().is_submitting());
}

#[tokio::test]
async fn double_toggle_returns_to_start() {
    let backend = setup(Viewer::member("jane"));
    let target = api::LikeTarget::Post(slug());
    backend
        .server()
        .lock()
        .set_liked(&Viewer::member("john"), &target, true)
        .unwrap();
    let panel = panel();
    let notifier = RecordingNotifier::new();

    panel.mount(&backend).await;
    let start = panel.post_like().status();
    assert_eq!(
        start,
        LikeStatus {
            like_count: 1,
            has_liked: false
        }
    );

    assert_eq!(
        panel.toggle_post_like(&backend, &notifier).await,
        ToggleOutcome::Updated(LikeStatus {
            like_count: 2,
            has_liked: true
        })
    );
    assert_eq!(
        panel.toggle_post_like(&backend, &notifier).await,
        ToggleOutcome::Updated(start)
    );
    assert_eq!(panel.post_like().status(), start);
}

#[tokio::test]
async fn toggle_while_in_flight_sends_one_request() {
    let backend = setup(Viewer::member("jane"));
    let panel = panel();
    let notifier = RecordingNotifier::new();

    backend.pause();
    let (first, second) = tokio::join!(
        panel.toggle_post_like(&backend, &notifier),
        async {
            while backend.calls().set_liked == 0 {
                tokio::task::yield_now().await;
            }
            assert!(panel.post_like().is_like_loading());
            let second = panel.toggle_post_like(&backend, &notifier).await;
            backend.resume();
            second
        }
    );

    assert_eq!(second, ToggleOutcome::Skipped);
    assert_eq!(
        first,
        ToggleOutcome::Updated(LikeStatus {
            like_count: 1,
            has_liked: true
        })
    );
    assert_eq!(backend.calls().set_liked, 1);
    assert!(!panel.post_like().is_like_loading());
}

#[tokio::test]
async fn post_like_thanks_only_once() {
    let backend = setup(Viewer::member("jane"));
    let panel = panel();
    let notifier = RecordingNotifier::new();

    for _ in 0..3 {
        panel.toggle_post_like(&backend, &notifier).await;
    }
    assert!(panel.post_like().status().has_liked);
    assert_eq!(notifier.messages(ToastLevel::Success).len(), 1);
    assert!(notifier.messages(ToastLevel::Error).is_empty());
}

#[tokio::test]
async fn comment_likes_do_not_thank() {
    let backend = setup(Viewer::member("jane"));
    seed(&backend, vec![comment("c1", None, 0)]);
    let panel = panel();
    let notifier = RecordingNotifier::new();
    panel.toggle_expanded(&backend, &notifier).await;

    let c1 = panel.thread().find(&CommentId::new("c1")).unwrap();
    let like = panel.comment_like(&c1);
    assert_eq!(
        like.toggle(&backend, &notifier).await,
        ToggleOutcome::Updated(LikeStatus {
            like_count: 1,
            has_liked: true
        })
    );
    assert!(notifier.toasts().is_empty());
    // the same toggle is handed out again for the same comment
    assert_eq!(panel.comment_like(&c1).status().like_count, 1);
}

#[tokio::test]
async fn failed_toggle_keeps_state() {
    let backend = setup(Viewer::member("jane"));
    let panel = panel();
    let notifier = RecordingNotifier::new();

    backend
        .server()
        .lock()
        .fail_next(api::Error::Unknown(String::from("Likes are disabled")));
    assert_eq!(
        panel.toggle_post_like(&backend, &notifier).await,
        ToggleOutcome::Failed
    );
    assert_eq!(panel.post_like().status(), LikeStatus::default());

    backend.server().lock().fail_next(api::Error::NotFound);
    panel.toggle_post_like(&backend, &notifier).await;

    assert_eq!(
        notifier.messages(ToastLevel::Error),
        vec![
            String::from("Likes are disabled"),
            String::from("Failed to update like"),
        ]
    );
}

#[tokio::test]
async fn like_status_fetch_fails_silently() {
    let backend = setup(Viewer::member("jane"));
    let panel = panel();
    backend.set_offline(true);
    panel.mount(&backend).await;
    assert_eq!(panel.post_like().status(), LikeStatus::default());
    assert_eq!(backend.calls().fetch_likes, 1);
}

#[tokio::test]
async fn every_comment_fetches_its_own_likes() {
    let backend = setup(Viewer::member("jane"));
    seed(
        &backend,
        vec![
            comment("a", None, 0),
            comment("b", Some("a"), 1),
            comment("c", None, 2),
        ],
    );
    backend
        .server()
        .lock()
        .set_liked(
            &Viewer::member("john"),
            &api::LikeTarget::Comment(slug(), CommentId::new("b")),
            true,
        )
        .unwrap();
    let panel = panel();
    let notifier = RecordingNotifier::new();

    panel.mount(&backend).await;
    panel.toggle_expanded(&backend, &notifier).await;
    panel.mount_comment_likes(&backend).await;

    assert_eq!(backend.calls().fetch_likes, 4);
    assert_eq!(backend.calls().fetch_comments, 1);
    let b = panel.thread().find(&CommentId::new("b")).unwrap();
    assert_eq!(panel.comment_like(&b).status().like_count, 1);
}

#[tokio::test]
async fn reloading_refreshes_comment_likes() {
    let backend = setup(Viewer::member("jane"));
    seed(&backend, vec![comment("a", None, 0), comment("b", None, 1)]);
    let panel = panel();
    let notifier = RecordingNotifier::new();
    panel.toggle_expanded(&backend, &notifier).await;

    let a = panel.thread().find(&CommentId::new("a")).unwrap();
    let b = panel.thread().find(&CommentId::new("b")).unwrap();
    let like_a = panel.comment_like(&a);
    let like_b = panel.comment_like(&b);
    assert_eq!(like_a.status(), LikeStatus::default());

    {
        let mut server = backend.server().lock();
        server
            .set_liked(
                &Viewer::member("john"),
                &api::LikeTarget::Comment(slug(), CommentId::new("a")),
                true,
            )
            .unwrap();
        server
            .set_status(&slug(), &CommentId::new("b"), CommentStatus::Rejected)
            .unwrap();
    }
    assert!(!panel.toggle_expanded(&backend, &notifier).await);
    assert!(panel.toggle_expanded(&backend, &notifier).await);

    // the kept toggle took the reloaded counters without a like fetch
    let a = panel.thread().find(&CommentId::new("a")).unwrap();
    assert!(Arc::ptr_eq(&panel.comment_like(&a), &like_a));
    assert_eq!(
        like_a.status(),
        LikeStatus {
            like_count: 1,
            has_liked: false
        }
    );
    assert_eq!(backend.calls().fetch_likes, 0);

    // the rejected comment's toggle was dropped
    assert!(panel.thread().find(&CommentId::new("b")).is_none());
    assert!(!Arc::ptr_eq(&panel.comment_like(&b), &like_b));
}

#[tokio::test]
async fn expanding_loads_a_sorted_tree() {
    let backend = setup(Viewer::member("jane"));
    seed(
        &backend,
        vec![
            comment("root", None, 0),
            comment("late", Some("root"), 30),
            comment("early", Some("root"), 10),
            comment("nested", Some("early"), 20),
            comment("deepest", Some("nested"), 25),
            comment("orphan", Some("deleted"), 5),
        ],
    );
    let panel = panel();
    let notifier = RecordingNotifier::new();

    assert!(!panel.is_expanded());
    assert!(panel.toggle_expanded(&backend, &notifier).await);
    assert!(!panel.thread().is_comments_loading());
    assert_eq!(panel.thread().comment_count(), 6);

    let tree = panel.thread().tree();
    assert_eq!(count_nodes(&tree), 6);
    let shape = flatten_thread(&tree, MAX_DEPTH)
        .into_iter()
        .map(|e| (e.comment.id.as_str().to_string(), e.depth, e.show_reply))
        .collect::<Vec<_>>();
    let expected = [
        ("root", 0, true),
        ("early", 1, true),
        ("nested", 2, true),
        ("deepest", 3, false),
        ("late", 1, true),
        ("orphan", 0, true),
    ];
    assert_eq!(
        shape,
        expected
            .iter()
            .map(|(id, d, r)| (String::from(*id), *d, *r))
            .collect::<Vec<_>>()
    );

    // collapsing does not refetch, expanding again does
    assert!(!panel.toggle_expanded(&backend, &notifier).await);
    assert!(panel.toggle_expanded(&backend, &notifier).await);
    assert_eq!(backend.calls().fetch_comments, 2);
}

#[tokio::test]
async fn comment_fetch_failure_is_reported() {
    let backend = setup(Viewer::member("jane"));
    let panel = panel();
    let notifier = RecordingNotifier::new();
    backend.set_offline(true);
    panel.toggle_expanded(&backend, &notifier).await;
    assert!(panel.thread().comments().is_empty());
    assert_eq!(
        notifier.messages(ToastLevel::Error),
        vec![String::from(GENERIC_FAILURE)]
    );
}

#[tokio::test]
async fn panels_do_not_share_state() {
    let backend = setup(Viewer::member("jane"));
    let notifier = RecordingNotifier::new();
    let first = panel();
    let second = panel();

    first.composer().set_content(String::from("draft"));
    first.share().toggle();
    first.toggle_post_like(&backend, &notifier).await;

    assert_eq!(second.composer().content(), "");
    assert!(!second.share().is_open());
    assert_eq!(second.post_like().status(), LikeStatus::default());
}

#[tokio::test(start_paused = true)]
async fn copied_flag_resets_after_two_seconds() {
    let panel = panel();
    let notifier = RecordingNotifier::new();
    let clipboard = RecordingClipboard::default();
    let menu = panel.share();
    menu.toggle();

    let (copied, ()) = tokio::join!(menu.copy_link(&clipboard, &notifier, &TokioTimer), async {
        tokio::task::yield_now().await;
        assert!(menu.is_copied());
        assert!(!menu.is_open());
        tokio::time::advance(Duration::from_millis(1999)).await;
        assert!(menu.is_copied());
        tokio::time::advance(Duration::from_millis(1)).await;
    });

    assert!(copied);
    assert!(!menu.is_copied());
    assert_eq!(clipboard.contents.lock().as_deref(), Some(POST_URL));
    assert_eq!(
        notifier.messages(ToastLevel::Success),
        vec![String::from("Link copied to clipboard")]
    );
}

#[tokio::test(start_paused = true)]
async fn only_the_latest_copy_clears_the_flag() {
    let panel = panel();
    let notifier = RecordingNotifier::new();
    let clipboard = RecordingClipboard::default();
    let menu = panel.share();
    let sleep = |ms| tokio::time::sleep(Duration::from_millis(ms));

    let (first, second, ()) = tokio::join!(
        menu.copy_link(&clipboard, &notifier, &TokioTimer),
        async {
            sleep(1000).await;
            menu.copy_link(&clipboard, &notifier, &TokioTimer).await
        },
        async {
            // the first copy's timer ran out at 2s, the second one's runs until 3s
            sleep(2500).await;
            assert!(menu.is_copied());
            sleep(1000).await;
            assert!(!menu.is_copied());
        }
    );

    assert!(first && second);
    assert_eq!(notifier.messages(ToastLevel::Success).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn clipboard_failure_does_not_flag_copied() {
    let panel = panel();
    let notifier = RecordingNotifier::new();
    let clipboard = RecordingClipboard {
        broken: true,
        ..RecordingClipboard::default()
    };

    assert!(
        !panel
            .share()
            .copy_link(&clipboard, &notifier, &TokioTimer)
            .await
    );
    assert!(!panel.share().is_copied());
    assert_eq!(
        notifier.messages(ToastLevel::Error),
        vec![String::from("Failed to copy link")]
    );
}
