use std::future::Future;
use std::io;
use std::path::PathBuf;

use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::{Request, StatusCode, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use thiserror::Error;
use url::Url;

use crate::archive::NewsletterRecord;

/// Where the archive index is served from.
pub const NEWSLETTER_INDEX_PATH: &str = "/newsletters.json";

#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl FetchResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid URL for {path:?}: {reason}")]
    InvalidUrl { path: String, reason: String },

    #[error("malformed newsletter index: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Retrieves a resource by path. Each call is a single request with no
/// retries.
pub trait Fetch {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<FetchResponse, FetchError>>;
}

/// Fetches the archive index and parses it into records, in index order.
pub async fn fetch_newsletters(
    fetcher: &impl Fetch,
) -> Result<Vec<NewsletterRecord>, FetchError> {
    let response = fetcher.fetch(NEWSLETTER_INDEX_PATH).await?;
    if !response.status.is_success() {
        return Err(FetchError::Status(response.status));
    }

    Ok(serde_json::from_slice(&response.body)?)
}

/// Fetches resources over plain HTTP relative to a base URL.
pub struct HttpFetcher {
    base_url: Url,
    client: Client<HttpConnector, Empty<Bytes>>,
}

impl HttpFetcher {
    pub fn new(base_url: Url) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();

        Self { base_url, client }
    }

    pub fn resolve(&self, path: &str) -> Result<Uri, FetchError> {
        let invalid = |reason: String| FetchError::InvalidUrl {
            path: path.to_string(),
            reason,
        };

        let url = self
            .base_url
            .join(path)
            .map_err(|err| invalid(err.to_string()))?;

        url.as_str()
            .parse::<Uri>()
            .map_err(|err| invalid(err.to_string()))
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchResponse, FetchError> {
        let uri = self.resolve(path)?;

        let request = Request::get(uri)
            .body(Empty::<Bytes>::new())
            .map_err(|err| FetchError::Network(err.to_string()))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?
            .to_bytes();

        Ok(FetchResponse { status, body })
    }
}

/// Serves resources out of a built site directory, answering `404` for
/// files that do not exist.
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Fetch for DirectoryFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchResponse, FetchError> {
        let file = self.root.join(path.trim_start_matches('/'));

        match tokio::fs::read(&file).await {
            Ok(body) => Ok(FetchResponse::new(StatusCode::OK, body)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Ok(FetchResponse::new(StatusCode::NOT_FOUND, Bytes::new()))
            }
            Err(err) => Err(FetchError::Network(err.to_string())),
        }
    }
}

/// A fetcher that answers every request with the same canned result.
#[cfg(test)]
pub(crate) struct StubFetcher {
    pub status: StatusCode,
    pub body: &'static str,
    pub network_error: bool,
}

#[cfg(test)]
impl StubFetcher {
    pub fn ok(body: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            network_error: false,
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: "",
            network_error: false,
        }
    }

    pub fn offline() -> Self {
        Self {
            status: StatusCode::OK,
            body: "",
            network_error: true,
        }
    }
}

#[cfg(test)]
impl Fetch for StubFetcher {
    async fn fetch(&self, _path: &str) -> Result<FetchResponse, FetchError> {
        if self.network_error {
            return Err(FetchError::Network("connection refused".to_string()));
        }

        Ok(FetchResponse::new(self.status, self.body))
    }
}
