//! HTTP access to the status backend: latest snapshots and history series.

use std::future::Future;
use std::time::Duration;

use kunlun_engine::{
    decode_batch, decode_history, EngineError, Granularity, HistoryPoint, RawSnapshot,
};
use thiserror::Error;
use tracing::warn;
use url::Url;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend answered {0}")]
    Status(reqwest::StatusCode),
    #[error(transparent)]
    Decode(#[from] EngineError),
}

/// Where snapshots come from. A failed fetch returns an error and must leave
/// the engine untouched.
pub trait SnapshotSource {
    fn fetch_latest(&self) -> impl Future<Output = Result<Vec<RawSnapshot>, SourceError>> + Send;

    fn fetch_history(
        &self,
        client_id: u64,
        level: Granularity,
    ) -> impl Future<Output = Result<Vec<HistoryPoint>, SourceError>> + Send;
}

pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, SourceError> {
        let mut base = Url::parse(base)?;
        // join() replaces the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub fn latest_url(&self) -> Result<Url, SourceError> {
        Ok(self.base.join("status/latest")?)
    }

    pub fn history_url(&self, client_id: u64, level: Granularity) -> Result<Url, SourceError> {
        let mut url = self.base.join(&format!("status/{}", level.as_str()))?;
        url.query_pairs_mut()
            .append_pair("client_id", &client_id.to_string());
        Ok(url)
    }

    async fn get_text(&self, url: Url) -> Result<String, SourceError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status(status));
        }
        Ok(resp.text().await?)
    }
}

impl SnapshotSource for HttpSource {
    async fn fetch_latest(&self) -> Result<Vec<RawSnapshot>, SourceError> {
        let body = self.get_text(self.latest_url()?).await?;
        let mut out = Vec::new();
        for (index, rec) in decode_batch(&body)?.into_iter().enumerate() {
            match rec {
                Ok(s) => out.push(s),
                Err(e) => warn!(index, "dropping malformed snapshot: {e}"),
            }
        }
        Ok(out)
    }

    async fn fetch_history(
        &self,
        client_id: u64,
        level: Granularity,
    ) -> Result<Vec<HistoryPoint>, SourceError> {
        let body = self.get_text(self.history_url(client_id, level)?).await?;
        Ok(decode_history(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_keep_base_path() {
        let s = HttpSource::new("http://mon.example:8080/api", Duration::from_secs(1)).unwrap();
        assert_eq!(
            s.latest_url().unwrap().as_str(),
            "http://mon.example:8080/api/status/latest"
        );
        assert_eq!(
            s.history_url(12, Granularity::Minutes).unwrap().as_str(),
            "http://mon.example:8080/api/status/minutes?client_id=12"
        );
    }

    #[test]
    fn rejects_garbage_url() {
        assert!(matches!(
            HttpSource::new("not a url", Duration::from_secs(1)),
            Err(SourceError::Url(_))
        ));
    }
}
