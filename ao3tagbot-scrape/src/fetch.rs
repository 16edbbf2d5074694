use std::time::Duration;

use ao3tagbot_common::{models::StoryId, utils, Conf, Uri};
use isahc::{AsyncReadResponseExt as _, HttpClient, Request};

use crate::FetchError;

/// Gets the raw page of a work.
#[async_trait::async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, id: StoryId) -> Result<String, FetchError>;
}

/// Fetches work pages from the archive over HTTP, one request per call.
#[derive(Clone)]
pub struct Fetcher {
    client: HttpClient,
    archive: String,
    view_adult: bool,
}

impl Fetcher {
    pub fn new(archive: &str, timeout: Duration, view_adult: bool) -> Result<Self, FetchError> {
        let archive = archive.trim_end_matches('/').to_string();

        let uri = archive
            .parse::<Uri>()
            .map_err(|_| FetchError::Url(archive.clone()))?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(FetchError::Url(archive));
        }

        let client = utils::http_client(timeout).map_err(FetchError::Client)?;

        Ok(Self {
            client,
            archive,
            view_adult,
        })
    }

    pub fn from_conf(conf: &Conf) -> Result<Self, FetchError> {
        Self::new(
            &conf.archive,
            Duration::from_secs(conf.timeout),
            conf.view_adult,
        )
    }

    pub fn work_url(&self, id: StoryId) -> Result<Uri, FetchError> {
        let url = if self.view_adult {
            format!("{}/works/{}?view_adult=true", self.archive, id)
        } else {
            format!("{}/works/{}", self.archive, id)
        };

        url.parse::<Uri>().map_err(|_| FetchError::Url(url))
    }
}

#[async_trait::async_trait]
impl Fetch for Fetcher {
    #[tracing::instrument(skip(self), fields(story_id = %id), err)]
    async fn fetch(&self, id: StoryId) -> Result<String, FetchError> {
        let url = self.work_url(id)?;

        tracing::info!(url = %url, "fetching");

        let mut req = Request::get(url);
        if self.view_adult {
            req = req.header("Cookie", "view_adult=true");
        }
        let req = req.body(())?;

        let mut res = self
            .client
            .send_async(req)
            .await
            .map_err(FetchError::from_isahc)?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let html = res.text().await.map_err(FetchError::from_body)?;

        tracing::debug!(bytes = html.len(), "fetched");

        Ok(html)
    }
}
