use crate::api::Error as ApiError;

pub const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server answered, but not with a success
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Network failure, unparseable answer, or anything else unexpected
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Text to show the user: the server's message if it sent one, `fallback`
    /// for other server failures, and a generic text for unexpected failures
    pub fn toast_message(&self, fallback: &str) -> String {
        match self {
            Error::Api(err) => String::from(err.message().unwrap_or(fallback)),
            Error::Anyhow(_) => String::from(GENERIC_FAILURE),
        }
    }

    /// Log the error at a level matching its kind
    pub fn log(&self, doing: &str) {
        match self {
            Error::Api(err) => tracing::info!(?err, "server refused {doing}"),
            Error::Anyhow(err) => tracing::error!(?err, "unexpected failure {doing}"),
        }
    }
}
