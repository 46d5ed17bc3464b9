use std::path::Path;

use firewatch_core::{
    fetch_with_fallback, Boundary, Classifier, FetchError, FetchOutcome, Snapshot, SourceStrategy,
};
use log::{debug, warn};

use crate::config::{AppConfig, FallbackSource};

/// HTTP and file access for the two snapshot sources.
#[derive(Debug, Clone)]
pub struct FireClient {
    http: reqwest::Client,
    primary_url: String,
    fallback: FallbackSource,
    strategy: SourceStrategy,
    classifier: Classifier,
}

impl FireClient {
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| FetchError::Network(error.to_string()))?;

        Ok(Self {
            http,
            primary_url: config.primary_url(),
            fallback: config.fallback.clone(),
            strategy: config.strategy,
            classifier: Classifier::new(),
        })
    }

    pub const fn strategy(&self) -> SourceStrategy {
        self.strategy
    }

    /// One refresh: the API, then the fallback when the API fails.
    pub async fn fetch(&self) -> FetchOutcome {
        fetch_with_fallback(
            self.strategy,
            || self.fetch_primary(),
            || self.fetch_fallback(),
        )
        .await
    }

    pub async fn fetch_primary(&self) -> Result<Snapshot, FetchError> {
        self.get(&self.primary_url).await
    }

    pub async fn fetch_fallback(&self) -> Result<Snapshot, FetchError> {
        match &self.fallback {
            FallbackSource::File(path) => {
                let body = tokio::fs::read(path).await.map_err(|error| FetchError::Io {
                    path: path.display().to_string(),
                    reason: error.to_string(),
                })?;
                debug!("read {} bytes from {}", body.len(), path.display());
                Ok(self.classifier.parse(&body)?)
            }
            FallbackSource::Url(url) => self.get(url).await,
        }
    }

    async fn get(&self, url: &str) -> Result<Snapshot, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|error| FetchError::Network(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| FetchError::Network(error.to_string()))?;
        debug!("fetched {} bytes from {url}", body.len());
        Ok(self.classifier.parse(&body)?)
    }
}

/// Reads the region outline. A missing or malformed file leaves the map
/// without an overlay.
pub fn load_boundary(path: &Path) -> Option<Boundary> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) => {
            warn!("boundary {} not loaded: {error}", path.display());
            return None;
        }
    };

    match Boundary::from_geojson_str(&text) {
        Ok(boundary) => {
            debug!("boundary loaded with {} rings", boundary.rings().len());
            Some(boundary)
        }
        Err(error) => {
            warn!("boundary {} ignored: {error}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firewatch_core::{Severity, SourceKind};
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    const SNAPSHOT: &str = r#"{
        "total": 2,
        "fires": [
            {"id": "a", "latitude": 30.2, "longitude": 79.1, "brightness": 352.0,
             "frp": 21.0, "acq_date": "2025-04-12", "acq_time": "0834",
             "confidence": "h", "severity": "HIGH"},
            {"id": "b", "latitude": 29.9, "longitude": 78.6, "brightness": 305.0,
             "frp": 2.5, "acq_date": "2025-04-12", "acq_time": "0840",
             "confidence": "l", "severity": "LOW"}
        ],
        "high": [],
        "medium": [],
        "low": [],
        "api_key_set": true
    }"#;

    fn config(fallback: FallbackSource, strategy: SourceStrategy) -> AppConfig {
        AppConfig {
            // Nothing listens on port 9 locally, so the request is refused.
            api_url: "http://127.0.0.1:9".to_string(),
            fallback,
            boundary: "missing.geojson".into(),
            refresh_interval: Duration::from_secs(60),
            strategy,
            days: 10,
            timeout: Duration::from_secs(2),
            log_file: "firewatch.log".into(),
            debug: false,
        }
    }

    fn snapshot_file(body: &str) -> std::io::Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(body.as_bytes())?;
        Ok(file)
    }

    #[tokio::test]
    async fn fallback_file_is_parsed() -> color_eyre::Result<()> {
        let file = snapshot_file(SNAPSHOT)?;
        let client = FireClient::new(&config(
            FallbackSource::File(file.path().to_path_buf()),
            SourceStrategy::FallbackOnly,
        ))?;

        let snapshot = client.fetch_fallback().await?;
        assert_eq!(snapshot.total(), 2);
        assert_eq!(snapshot.count(Severity::High), 1);
        Ok(())
    }

    #[tokio::test]
    async fn refused_api_falls_back_to_file() -> color_eyre::Result<()> {
        let file = snapshot_file(SNAPSHOT)?;
        let client = FireClient::new(&config(
            FallbackSource::File(file.path().to_path_buf()),
            SourceStrategy::PrimaryWithFallback,
        ))?;

        let outcome = client.fetch().await;
        assert!(matches!(
            outcome,
            FetchOutcome::Fetched { source: SourceKind::Fallback, .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn missing_fallback_reports_io_error() -> color_eyre::Result<()> {
        let client = FireClient::new(&config(
            FallbackSource::File("does/not/exist.json".into()),
            SourceStrategy::FallbackOnly,
        ))?;

        let outcome = client.fetch().await;
        assert!(matches!(
            outcome,
            FetchOutcome::Failed { primary: None, fallback: FetchError::Io { .. } }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn inconsistent_fallback_is_malformed() -> color_eyre::Result<()> {
        let file = snapshot_file(&SNAPSHOT.replace("\"total\": 2", "\"total\": 5"))?;
        let client = FireClient::new(&config(
            FallbackSource::File(file.path().to_path_buf()),
            SourceStrategy::FallbackOnly,
        ))?;

        assert!(matches!(
            client.fetch_fallback().await,
            Err(FetchError::Malformed(_))
        ));
        Ok(())
    }

    #[test]
    fn malformed_boundary_is_skipped() -> std::io::Result<()> {
        let file = snapshot_file("{\"type\": \"Nope\"}")?;
        assert!(load_boundary(file.path()).is_none());
        assert!(load_boundary(Path::new("does/not/exist.geojson")).is_none());
        Ok(())
    }
}
