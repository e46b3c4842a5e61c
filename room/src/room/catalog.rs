use std::path::PathBuf;

use protocol::{normalize_topics, Topic};
use reqwest::header::CACHE_CONTROL;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(reqwest::StatusCode),
    #[error("cannot read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog is not an array")]
    NotArray,
    #[error("catalog contains no valid topics")]
    Empty,
    #[error("no catalog source configured")]
    NoSource,
}

/// Where the topics come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// A lexicon service (or any static host), fetched with a no-cache GET.
    Server(String),
    File(PathBuf),
    None,
}

impl CatalogSource {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            CatalogSource::None
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            CatalogSource::Server(raw.to_string())
        } else {
            CatalogSource::File(PathBuf::from(raw))
        }
    }

    pub(crate) async fn fetch(&self) -> Result<Vec<Topic>, CatalogError> {
        let raw: serde_json::Value = match self {
            CatalogSource::Server(url) => {
                let resp = reqwest::Client::new()
                    .get(url)
                    .header(CACHE_CONTROL, "no-cache")
                    .send()
                    .await?;
                if !resp.status().is_success() {
                    return Err(CatalogError::Status(resp.status()));
                }
                resp.json().await?
            }
            CatalogSource::File(path) => {
                let bytes = tokio::fs::read(path).await?;
                serde_json::from_slice(&bytes)?
            }
            CatalogSource::None => return Err(CatalogError::NoSource),
        };
        let topics = normalize_topics(&raw).ok_or(CatalogError::NotArray)?;
        if topics.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(topics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn catalog_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    /// Answers a single request with `status` and `body`, handing back the
    /// raw request text.
    async fn one_shot_server(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let reply = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status, body.len(), body
            );
            stream.write_all(reply.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap_or_default();
            String::from_utf8_lossy(&request).to_string()
        });
        (format!("http://{}/topics.json", addr), handle)
    }

    #[test]
    fn parse_picks_the_source_kind() {
        assert_eq!(
            CatalogSource::parse("http://127.0.0.1:3030/topics.json"),
            CatalogSource::Server("http://127.0.0.1:3030/topics.json".to_string())
        );
        assert_eq!(CatalogSource::parse("topics.json"), CatalogSource::File(PathBuf::from("topics.json")));
        assert_eq!(CatalogSource::parse("  "), CatalogSource::None);
    }

    #[tokio::test]
    async fn file_catalog_is_normalized() {
        let file = catalog_file(r#"[{"topic":"Beach","hints":["Sand","Waves"]},{"bogus":true},{"name":"Zoo"}]"#);
        let topics = CatalogSource::File(file.path().to_path_buf()).fetch().await.unwrap();
        assert_eq!(topics, vec![Topic::new("Beach", &["Sand", "Waves"]), Topic::new("Zoo", &[])]);
    }

    #[tokio::test]
    async fn unusable_catalogs_are_errors() {
        let file = catalog_file(r#"{"topic":"Beach"}"#);
        let err = CatalogSource::File(file.path().to_path_buf()).fetch().await.unwrap_err();
        assert!(matches!(err, CatalogError::NotArray));

        let file = catalog_file(r#"[{"hints":["x"]}]"#);
        let err = CatalogSource::File(file.path().to_path_buf()).fetch().await.unwrap_err();
        assert!(matches!(err, CatalogError::Empty));

        let file = catalog_file("[{");
        let err = CatalogSource::File(file.path().to_path_buf()).fetch().await.unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));

        let err = CatalogSource::File(PathBuf::from("/definitely/not/here.json")).fetch().await.unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));

        assert!(matches!(CatalogSource::None.fetch().await, Err(CatalogError::NoSource)));
    }

    #[tokio::test]
    async fn server_catalog_is_fetched_without_cache() {
        let (url, server) = one_shot_server("200 OK", r#"[{"topic":"Beach","hints":["Sand"]}]"#).await;
        let topics = CatalogSource::Server(url).fetch().await.unwrap();
        assert_eq!(topics, vec![Topic::new("Beach", &["Sand"])]);

        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /topics.json"));
        assert!(request.contains("cache-control: no-cache"));
    }

    #[tokio::test]
    async fn server_failure_status_is_an_error() {
        let (url, server) = one_shot_server("404 Not Found", "[]").await;
        let err = CatalogSource::Server(url).fetch().await.unwrap_err();
        assert!(matches!(err, CatalogError::Status(status) if status == reqwest::StatusCode::NOT_FOUND));
        server.await.unwrap();
    }
}
