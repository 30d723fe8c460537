use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::constants::PARTIAL_DOWNLOAD_SUFFIX;
use crate::dataset::{DatasetDownloader, DatasetError};
use crate::errors::Result;

/// Downloads the dataset over HTTP.
///
/// The body is streamed into `<dest>.part` which is renamed over `dest` only
/// once the whole response was written and synced.
pub struct HttpDatasetDownloader {
    client: reqwest::Client,
}

impl HttpDatasetDownloader {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_into(&self, url: &str, part_path: &Path) -> Result<u64> {
        let download_error = |message: String| DatasetError::Download {
            url: url.to_string(),
            message,
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_error(format!("HTTP {}", status)).into());
        }

        let mut file = fs::File::create(part_path).await?;
        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| download_error(e.to_string()))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        file.sync_all().await?;
        Ok(written)
    }
}

impl Default for HttpDatasetDownloader {
    fn default() -> Self {
        Self::new()
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(PARTIAL_DOWNLOAD_SUFFIX);
    PathBuf::from(name)
}

#[async_trait]
impl DatasetDownloader for HttpDatasetDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let part_path = partial_path(dest);

        match self.fetch_into(url, &part_path).await {
            Ok(written) => {
                fs::rename(&part_path, dest).await?;
                log::debug!("Downloaded {} bytes from {}", written, url);
                Ok(written)
            }
            Err(e) => {
                if fs::try_exists(&part_path).await.unwrap_or(false) {
                    if let Err(remove_err) = fs::remove_file(&part_path).await {
                        log::warn!(
                            "Failed to remove partial download {}: {}",
                            part_path.display(),
                            remove_err
                        );
                    }
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// Serves a single canned HTTP response and returns its URL.
    async fn serve_once(status_line: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let head = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status_line,
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{}/data.xls", addr)
    }

    #[tokio::test]
    async fn test_download_replaces_destination() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("ds.xls");
        std::fs::write(&dest, b"old").unwrap();
        let url = serve_once("200 OK", b"new dataset bytes").await;

        let written = HttpDatasetDownloader::new()
            .download(&url, &dest)
            .await
            .unwrap();

        assert_eq!(written, 17);
        assert_eq!(std::fs::read(&dest).unwrap(), b"new dataset bytes");
        assert!(!partial_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_http_error_leaves_destination_untouched() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("ds.xls");
        std::fs::write(&dest, b"old").unwrap();
        let url = serve_once("404 Not Found", b"missing").await;

        let err = HttpDatasetDownloader::new()
            .download(&url, &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Dataset(DatasetError::Download { .. })));
        assert_eq!(std::fs::read(&dest).unwrap(), b"old");
        assert!(!partial_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_download_error() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("ds.xls");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/data.xls", listener.local_addr().unwrap());
        drop(listener);

        let err = HttpDatasetDownloader::new()
            .download(&url, &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Dataset(DatasetError::Download { .. })));
        assert!(!dest.exists());
    }

    #[test]
    fn test_partial_path_appends_suffix() {
        assert_eq!(
            partial_path(Path::new("/tmp/cache/ds.xls")),
            PathBuf::from("/tmp/cache/ds.xls.part")
        );
    }
}
