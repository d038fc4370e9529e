use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;

use super::error::{FetchError, FetchResult};

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8085/trustchain";
const NEIGHBOR_LEVEL: &str = "1";

#[derive(Clone, Debug)]
pub struct DataFetcher {
    client: Client,
    display_url: Url,
}

impl DataFetcher {
    /// Fails with [`FetchError::UnsupportedEnvironment`] when the client or endpoint
    /// cannot be built; no request is attempted in that case.
    pub fn new(service_base_url: &str, timeout: Duration) -> FetchResult<Self> {
        let display_url = display_url(service_base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| FetchError::UnsupportedEnvironment(error.to_string()))?;

        Ok(Self {
            client,
            display_url,
        })
    }

    pub fn endpoint(&self, public_key: &str) -> Url {
        let mut url = self.display_url.clone();
        url.query_pairs_mut()
            .append_pair("focus_node", public_key)
            .append_pair("neighbor_level", NEIGHBOR_LEVEL);
        url
    }

    pub fn fetch_neighborhood(&self, public_key: &str) -> FetchResult<String> {
        let url = self.endpoint(public_key);
        tracing::debug!(%url, "requesting neighborhood");

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|error| FetchError::network(public_key, error))?;

        tracing::info!(focus_node = public_key, bytes = body.len(), "neighborhood received");
        Ok(body)
    }

    pub fn spawn_fetch(&self, public_key: &str) -> PendingFetch {
        let (tx, rx) = mpsc::channel();
        let fetcher = self.clone();
        let focus_node = public_key.to_owned();

        let worker_focus = focus_node.clone();
        thread::spawn(move || {
            let result = fetcher.fetch_neighborhood(&worker_focus);
            let _ = tx.send(result);
        });

        PendingFetch { focus_node, rx }
    }
}

/// Handle to an in-flight request. Dropping it discards the eventual result.
#[derive(Debug)]
pub struct PendingFetch {
    focus_node: String,
    rx: Receiver<FetchResult<String>>,
}

impl PendingFetch {
    pub fn focus_node(&self) -> &str {
        &self.focus_node
    }

    pub fn try_take(&self) -> Option<FetchResult<String>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(self.worker_lost())),
        }
    }

    pub fn wait(self) -> FetchResult<String> {
        self.rx.recv().unwrap_or_else(|_| Err(self.worker_lost()))
    }

    fn worker_lost(&self) -> FetchError {
        FetchError::network(&self.focus_node, "background fetch worker disconnected")
    }
}

fn display_url(service_base_url: &str) -> FetchResult<Url> {
    let mut url = Url::parse(service_base_url).map_err(|error| {
        FetchError::UnsupportedEnvironment(format!("invalid service URL {service_base_url:?}: {error}"))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::UnsupportedEnvironment(format!(
            "unsupported scheme {:?} in {service_base_url:?}",
            url.scheme()
        )));
    }

    url.path_segments_mut()
        .map_err(|()| {
            FetchError::UnsupportedEnvironment(format!(
                "service URL {service_base_url:?} cannot carry a path"
            ))
        })?
        .pop_if_empty()
        .push("display");
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(base: &str) -> DataFetcher {
        DataFetcher::new(base, Duration::from_secs(1)).expect("fetcher")
    }

    #[test]
    fn endpoint_carries_focus_and_level() {
        let url = fetcher(DEFAULT_SERVICE_URL).endpoint("abc123");

        assert_eq!(
            url.as_str(),
            "http://localhost:8085/trustchain/display?focus_node=abc123&neighbor_level=1"
        );
    }

    #[test]
    fn trailing_slash_is_not_doubled() {
        let url = fetcher("http://127.0.0.1:9000/api/").endpoint("k");

        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/api/display?focus_node=k&neighbor_level=1"
        );
    }

    #[test]
    fn focus_key_is_query_encoded() {
        let url = fetcher("http://localhost:1").endpoint("a+b/c");

        assert_eq!(url.query(), Some("focus_node=a%2Bb%2Fc&neighbor_level=1"));
    }

    #[test]
    fn malformed_base_is_unsupported() {
        let err = DataFetcher::new("not a url", Duration::from_secs(1)).unwrap_err();

        assert!(matches!(err, FetchError::UnsupportedEnvironment(_)));
    }

    #[test]
    fn non_http_scheme_is_unsupported() {
        let err = DataFetcher::new("mailto:peer@example.org", Duration::from_secs(1)).unwrap_err();

        assert!(matches!(err, FetchError::UnsupportedEnvironment(_)));
    }
}
