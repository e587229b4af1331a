use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::{header, Client};
use std::fmt;
use std::path::PathBuf;

use super::types::ScheduleDocument;

/// Where the startup document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` sources are fetched, anything else is a path.
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Fetch and validate the startup document. Callers fall back to the
/// built-in week on error.
pub async fn load_schedule(source: &DataSource) -> Result<ScheduleDocument> {
    info!("loading schedule from {}", source);

    let text = match source {
        DataSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        DataSource::Url(url) => fetch_text(url).await?,
    };
    debug!("schedule source returned {} bytes", text.len());

    let document = ScheduleDocument::from_json(&text)
        .with_context(|| format!("Failed to parse schedule from {}", source))?;

    info!(
        "schedule loaded: {} days, {} slots, {} activities",
        document.week_days.len(),
        document.time_slots.len(),
        document.activities.len()
    );
    Ok(document)
}

async fn fetch_text(url: &str) -> Result<String> {
    let client = Client::builder().build()?;

    let response = client
        .get(url)
        .header(header::ACCEPT, "application/json")
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("HTTP error! status: {}", response.status());
    }

    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn urls_and_paths_are_told_apart() {
        assert_eq!(
            DataSource::parse("https://example.com/schedule.json"),
            DataSource::Url("https://example.com/schedule.json".to_string())
        );
        assert_eq!(
            DataSource::parse(" schedule.json "),
            DataSource::File(PathBuf::from("schedule.json"))
        );
    }

    #[tokio::test]
    async fn loads_a_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = ScheduleDocument::default().to_pretty_json().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let source = DataSource::File(file.path().to_path_buf());
        let document = load_schedule(&source).await.unwrap();
        assert_eq!(document, ScheduleDocument::default());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::File(dir.path().join("absent.json"));
        let err = load_schedule(&source).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[tokio::test]
    async fn structurally_incomplete_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"weekDays": [], "activities": []}"#).unwrap();

        let source = DataSource::File(file.path().to_path_buf());
        assert!(load_schedule(&source).await.is_err());
    }
}
