use std::path::PathBuf;

use anyhow::{anyhow, Context};
use parish_client::{
    api::{CommentId, CommentList, LikeTarget, PostSlug, Session},
    build_comment_tree, canonical_url, flatten_thread, format_relative, EngagementPanel,
    HttpBackend, LikeToggle, Notifier, ReplyTarget, ShareLinks, SharePlatform, SubmitOutcome,
    Toast, ToastLevel, ToggleOutcome, MAX_DEPTH,
};

#[derive(structopt::StructOpt)]
struct Opt {
    /// Base url of the blog, eg. https://church.example.org
    #[structopt(short, long, env = "PARISH_HOST")]
    host: String,

    /// Bearer token identifying the member liking or commenting
    #[structopt(long, env = "PARISH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Name of the logged-in member
    #[structopt(long, env = "PARISH_SESSION_NAME")]
    session_name: Option<String>,

    /// Email of the logged-in member
    #[structopt(long, env = "PARISH_SESSION_EMAIL")]
    session_email: Option<String>,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Print the comments of a post
    Thread {
        slug: String,

        /// Render a comment list saved as json instead of fetching it
        #[structopt(long)]
        from_file: Option<PathBuf>,
    },

    /// Like a post, or one of its comments
    Like {
        slug: String,

        #[structopt(long)]
        comment: Option<String>,
    },

    /// Remove a like from a post, or one of its comments
    Unlike {
        slug: String,

        #[structopt(long)]
        comment: Option<String>,
    },

    /// Comment on a post
    Comment {
        slug: String,

        content: String,

        /// Id of the comment to answer
        #[structopt(long)]
        reply_to: Option<String>,

        /// Name to sign with when not logged in
        #[structopt(long)]
        name: Option<String>,

        /// Email to sign with when not logged in
        #[structopt(long)]
        email: Option<String>,
    },

    /// Print the links sharing a post
    Share {
        slug: String,

        /// Canonical url, if not the post's page on the host
        #[structopt(long)]
        url: Option<String>,

        #[structopt(long, default_value = "")]
        title: String,
    },
}

/// Prints toasts to stderr, remembering whether any was an error
#[derive(Default)]
struct StderrNotifier {
    failed: std::sync::atomic::AtomicBool,
}

impl Notifier for StderrNotifier {
    fn notify(&self, toast: Toast) {
        let prefix = match toast.level {
            ToastLevel::Success => "ok",
            ToastLevel::Info => "info",
            ToastLevel::Error => {
                self.failed
                    .store(true, std::sync::atomic::Ordering::Relaxed);
                "error"
            }
        };
        eprintln!("{prefix}: {}", toast.message);
    }
}

impl StderrNotifier {
    fn check(&self) -> anyhow::Result<()> {
        match self.failed.load(std::sync::atomic::Ordering::Relaxed) {
            true => Err(anyhow!("the server did not accept the request")),
            false => Ok(()),
        }
    }
}

fn session(opt: &Opt) -> Session {
    match (&opt.session_name, &opt.session_email) {
        (Some(name), Some(email)) => Session::member(name.clone(), email.clone()),
        _ => Session::guest(),
    }
}

fn print_thread(list: CommentList) {
    let now = chrono::Utc::now();
    println!("{} comments", list.comment_count);
    let tree = build_comment_tree(list.comments);
    for entry in flatten_thread(&tree, MAX_DEPTH) {
        let indent = "    ".repeat(entry.depth);
        let c = entry.comment;
        println!(
            "{indent}[{}] {} ({}, {} likes{})",
            c.id,
            c.author_name,
            format_relative(c.created_at, now),
            c.like_count,
            if c.has_liked { ", liked" } else { "" },
        );
        for line in c.content.lines() {
            println!("{indent}  {line}");
        }
    }
}

async fn set_liked(
    backend: &HttpBackend,
    slug: String,
    comment: Option<String>,
    liked: bool,
    notifier: &StderrNotifier,
) -> anyhow::Result<()> {
    let post = PostSlug(slug);
    let target = match comment {
        Some(id) => LikeTarget::Comment(post, CommentId(id)),
        None => LikeTarget::Post(post),
    };
    let like = LikeToggle::new(target);
    like.load(backend).await;
    let status = match like.status().has_liked == liked {
        true => like.status(),
        false => match like.toggle(backend, notifier).await {
            ToggleOutcome::Updated(status) => status,
            _ => return notifier.check(),
        },
    };
    println!(
        "{} likes{}",
        status.like_count,
        if status.has_liked { ", including yours" } else { "" }
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let session = session(&opt);
    let mut backend = HttpBackend::new(&opt.host)?;
    if let Some(token) = &opt.token {
        backend = backend.with_token(token.clone());
    }
    let notifier = StderrNotifier::default();

    match opt.cmd {
        Command::Thread {
            slug,
            from_file: Some(path),
        } => {
            tracing::debug!(%slug, ?path, "rendering thread from file");
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading comment list from {path:?}"))?;
            let list = serde_json::from_str(&json)
                .with_context(|| format!("parsing comment list from {path:?}"))?;
            print_thread(list);
        }
        Command::Thread {
            slug,
            from_file: None,
        } => {
            let panel = EngagementPanel::new(PostSlug(slug), ShareLinks::default());
            panel.toggle_expanded(&backend, &notifier).await;
            notifier.check()?;
            print_thread(CommentList {
                comments: panel.thread().comments(),
                comment_count: panel.thread().comment_count(),
            });
        }
        Command::Like { slug, comment } => {
            set_liked(&backend, slug, comment, true, &notifier).await?
        }
        Command::Unlike { slug, comment } => {
            set_liked(&backend, slug, comment, false, &notifier).await?
        }
        Command::Comment {
            slug,
            content,
            reply_to,
            name,
            email,
        } => {
            let panel = EngagementPanel::new(PostSlug(slug), ShareLinks::default());
            let composer = panel.composer();
            composer.set_content(content);
            composer.set_guest_name(name.unwrap_or_default());
            composer.set_guest_email(email.unwrap_or_default());
            if let Some(id) = reply_to {
                panel.toggle_expanded(&backend, &notifier).await;
                notifier.check()?;
                let id = CommentId(id);
                let tree = panel.thread().tree();
                let entry = flatten_thread(&tree, MAX_DEPTH)
                    .into_iter()
                    .find(|e| e.comment.id == id)
                    .ok_or_else(|| anyhow!("no comment {id} on this post"))?;
                let target = ReplyTarget {
                    id: id.clone(),
                    author_name: entry.comment.author_name.clone(),
                };
                if !composer.reply_to(target, entry.depth) {
                    return Err(anyhow!("comment {id} is nested too deep to be replied to"));
                }
            }
            match panel.submit_comment(&backend, &session, &notifier).await {
                SubmitOutcome::Posted(status) => {
                    tracing::debug!(?status, "comment posted");
                }
                SubmitOutcome::Invalid(err) => return Err(err.into()),
                SubmitOutcome::Skipped | SubmitOutcome::Failed => notifier.check()?,
            }
        }
        Command::Share { slug, url, title } => {
            let page = format!("{}/blog/{slug}", opt.host.trim_end_matches('/'));
            let links = ShareLinks::new(canonical_url(url.as_deref(), &page), title);
            println!("link: {}", links.url());
            for platform in SharePlatform::ALL {
                println!("{}: {}", platform.label(), links.link_for(platform));
            }
        }
    }

    Ok(())
}
