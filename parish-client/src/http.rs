use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};

use crate::{
    api::{self, CommentCreated, CommentList, LikeStatus, LikeTarget, NewComment, PostSlug},
    Backend, Error,
};

/// `Backend` talking to the blog's REST api
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    host: Url,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(host: &str) -> anyhow::Result<HttpBackend> {
        let host = Url::parse(host).with_context(|| format!("parsing api host {host:?}"))?;
        if host.cannot_be_a_base() {
            return Err(anyhow!("api host {host} cannot be used as a base url"));
        }
        Ok(HttpBackend {
            client: reqwest::Client::new(),
            host,
            token: None,
        })
    }

    /// Authenticate requests, so that the server knows who is liking
    pub fn with_token(mut self, token: String) -> HttpBackend {
        self.token = Some(token);
        self
    }

    /// Send requests through a preconfigured client (timeouts, proxies...)
    pub fn with_client(mut self, client: reqwest::Client) -> HttpBackend {
        self.client = client;
        self
    }

    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.host.clone();
        url.path_segments_mut()
            .expect("checked the host can be a base at construction")
            .pop_if_empty()
            .push("api")
            .extend(segments);
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let req = self.client.request(method, self.url(segments));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<R>(&self, req: RequestBuilder) -> Result<R, Error>
    where
        R: for<'de> serde::Deserialize<'de>,
    {
        let resp = req.send().await.context("sending request to api")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.bytes().await.context("reading api error body")?;
            let err = api::Error::parse(&body).unwrap_or_else(|err| {
                tracing::debug!(?err, %status, "api error body is not an error description");
                api::Error::from_status(status)
            });
            return Err(Error::Api(err));
        }
        Ok(resp.json().await.context("parsing api response")?)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Backend for HttpBackend {
    async fn fetch_likes(&self, target: &LikeTarget) -> Result<LikeStatus, Error> {
        self.send(self.request(Method::GET, &target.path_segments()))
            .await
    }

    async fn set_liked(&self, target: &LikeTarget, liked: bool) -> Result<LikeStatus, Error> {
        let method = match liked {
            true => Method::POST,
            false => Method::DELETE,
        };
        self.send(self.request(method, &target.path_segments()))
            .await
    }

    async fn fetch_comments(&self, post: &PostSlug) -> Result<CommentList, Error> {
        self.send(self.request(Method::GET, &["blog", post.as_str(), "comments"]))
            .await
    }

    async fn submit_comment(
        &self,
        post: &PostSlug,
        comment: &NewComment,
    ) -> Result<CommentCreated, Error> {
        self.send(
            self.request(Method::POST, &["blog", post.as_str(), "comments"])
                .json(comment),
        )
        .await
    }
}
