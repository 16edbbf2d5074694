pub mod detect;
pub mod extract;
pub mod fetch;
pub mod format;
pub mod query;

mod error;

use std::sync::Arc;

use ao3tagbot_common::{models::StoryId, Conf};
use futures::stream::{self, Stream, StreamExt as _};

pub use crate::{
    detect::Detector,
    error::{Error, FetchError, ParseError},
    extract::extract,
    fetch::{Fetch, Fetcher},
    format::{format, format_error},
};

/// Turns message text into one reply per linked work.
///
/// Each work goes through fetch, extract and format on its own, at most
/// `concurrency` at a time, so one failing or slow work never holds back the
/// others.
#[derive(Clone)]
pub struct Pipeline {
    detector: Detector,
    fetcher: Arc<dyn Fetch>,
    concurrency: usize,
}

impl Pipeline {
    pub fn new(detector: Detector, fetcher: Arc<dyn Fetch>, concurrency: usize) -> Self {
        Self {
            detector,
            fetcher,
            concurrency: concurrency.max(1),
        }
    }

    pub fn from_conf(conf: &Conf) -> Result<Self, FetchError> {
        Ok(Self::new(
            Detector::for_archive(&conf.archive),
            Arc::new(Fetcher::from_conf(conf)?),
            conf.concurrency,
        ))
    }

    pub fn detect(&self, text: &str) -> Vec<StoryId> {
        self.detector.detect(text)
    }

    #[tracing::instrument(skip(self), fields(story_id = %id))]
    pub async fn summarize(&self, id: StoryId) -> Result<String, Error> {
        let html = self.fetcher.fetch(id).await?;

        let record = extract(&html)?;

        tracing::info!(title = %record.title, "extracted work");

        Ok(format(&record))
    }

    /// Results come back in completion order, not in `ids` order.
    pub fn summarize_all(
        &self,
        ids: Vec<StoryId>,
    ) -> impl Stream<Item = (StoryId, Result<String, Error>)> + '_ {
        stream::iter(ids)
            .map(move |id| async move { (id, self.summarize(id).await) })
            .buffer_unordered(self.concurrency)
    }

    /// Every link in `text`, summarized or explained.
    pub fn replies<'p>(&'p self, text: &str) -> impl Stream<Item = (StoryId, String)> + 'p {
        let ids = self.detect(text);

        self.summarize_all(ids).map(|(id, result)| {
            let reply = match result {
                Ok(summary) => summary,
                Err(err) => {
                    tracing::warn!(story_id = %id, error = ?err, "unable to summarize work");

                    format_error(id, &err)
                }
            };

            (id, reply)
        })
    }
}
