//! Fetching the feed and reporting failures.

use crate::config::{DescriptionSource, Endpoints, WidgetConfig};
use crate::error::{ErrorReport, FeedError};
use crate::feed::{EventCatalog, Feed, UpdateItem};
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::{debug, error, warn};

/// Status and body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP seam between the widget and whatever actually talks to the server.
pub trait Transport {
    fn get(&self, url: &str) -> impl Future<Output = Result<Response, FeedError>>;

    fn post_json(&self, url: &str, body: String) -> impl Future<Output = Result<Response, FeedError>>;
}

async fn fetch_json<T, R>(transport: &T, url: &str) -> Result<R, FeedError>
where
    T: Transport,
    R: DeserializeOwned,
{
    let response = transport.get(url).await?;
    if !response.ok() {
        return Err(FeedError::Status {
            url: url.to_string(),
            status: response.status,
        });
    }
    serde_json::from_str(&response.body).map_err(|source| FeedError::Parse {
        url: url.to_string(),
        source,
    })
}

async fn fetch_catalog<T: Transport>(
    transport: &T,
    endpoints: &Endpoints,
    source: &DescriptionSource,
) -> Result<EventCatalog, FeedError> {
    match source {
        DescriptionSource::Remote => fetch_json(transport, &endpoints.event_types).await,
        DescriptionSource::Inline(table) => Ok(EventCatalog::new(table.clone())),
    }
}

/// Fetches the feed and the event catalog concurrently, then waits for
/// `intro` before handing the data over. Nothing is returned unless both
/// requests succeed; the first failure wins.
pub async fn load_feed<T, G>(transport: &T, config: &WidgetConfig, intro: G) -> Result<Feed, FeedError>
where
    T: Transport,
    G: Future<Output = ()>,
{
    let updates = fetch_json::<T, Vec<UpdateItem>>(transport, &config.endpoints.updates);
    let catalog = fetch_catalog(transport, &config.endpoints, &config.descriptions);
    let (items, catalog) = futures::try_join!(updates, catalog)?;
    debug!(items = items.len(), event_types = catalog.len(), "feed loaded");

    intro.await;
    Ok(Feed { items, catalog })
}

/// Logs `err` locally and makes one best-effort attempt to deliver it to the
/// error-logging endpoint. Delivery failures are only logged.
pub async fn report_failure<T: Transport>(transport: &T, endpoints: &Endpoints, err: &FeedError) {
    error!(error = %err, "failed to load updates");

    let report = ErrorReport::from(err);
    let body = match report.to_json() {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Failed to log error: could not encode report");
            return;
        }
    };

    match transport.post_json(&endpoints.log_error, body).await {
        Ok(response) if response.ok() => {}
        Ok(response) => warn!(status = response.status, "Failed to log error"),
        Err(e) => warn!(error = %e, "Failed to log error"),
    }
}
