use ureq::{http::Response, Body, ResponseExt};

use crate::{
    compression::{decompress, Compression},
    error::{DownloadError, Result},
    http_client::SHARED_AGENT,
};

/// Upper bound for in-memory response bodies. Uncompressed `Packages`
/// listings for large distributions run into the tens of megabytes.
const BODY_LIMIT: u64 = 1024 * 1024 * 1024;

pub struct Http;

impl Http {
    pub fn get(url: &str) -> Result<Response<Body>> {
        SHARED_AGENT.get(url).call().map_err(|err| match err {
            ureq::Error::StatusCode(status) => DownloadError::HttpStatus {
                status,
                url: url.to_string(),
            },
            other => DownloadError::from(other),
        })
    }

    /// Reads a response body to completion, returning the final resolved
    /// URL (after redirect-following) alongside the raw bytes.
    pub fn read_body(resp: Response<Body>) -> Result<(String, Vec<u8>)> {
        let final_url = resp.get_uri().to_string();
        let bytes = resp
            .into_body()
            .into_with_config()
            .limit(BODY_LIMIT)
            .read_to_vec()
            .map_err(DownloadError::from)?;
        Ok((final_url, bytes))
    }
}

/// Probes the three URL variants of a repository metadata file —
/// uncompressed, `.xz`, `.gz` — stopping at the first success.
///
/// Returns the final resolved URL and the decoded content, the codec
/// being selected from the final URL's suffix rather than the requested
/// one (a mirror may redirect one encoding to another). `Ok(None)` means
/// the component does not exist at any suffix, which callers treat as
/// "no such component" rather than a failure; transport errors other
/// than an HTTP status are propagated.
pub fn probe_package_index(base_url: &str) -> Result<Option<(String, Vec<u8>)>> {
    for suffix in ["", ".xz", ".gz"] {
        let url = format!("{base_url}{suffix}");

        let resp = match Http::get(&url) {
            Ok(resp) => resp,
            Err(DownloadError::HttpStatus { .. }) => continue,
            Err(err) => return Err(err),
        };

        let (final_url, raw) = Http::read_body(resp)?;
        let content = decompress(raw, Compression::from_url(&final_url), &final_url)?;
        return Ok(Some((final_url, content)));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    async fn probe(base_url: String) -> Result<Option<(String, Vec<u8>)>> {
        tokio::task::spawn_blocking(move || probe_package_index(&base_url))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_probe_prefers_uncompressed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Packages"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"Package: widget\n".to_vec()))
            .mount(&server)
            .await;

        let result = probe(format!("{}/Packages", server.uri())).await.unwrap();
        let (final_url, content) = result.unwrap();
        assert!(final_url.ends_with("/Packages"));
        assert_eq!(content, b"Package: widget\n");
    }

    #[tokio::test]
    async fn test_probe_falls_back_to_xz() {
        let server = MockServer::start().await;
        let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
        encoder.write_all(b"Package: widget\n").unwrap();
        let compressed = encoder.finish().unwrap();

        Mock::given(method("GET"))
            .and(path("/Packages.xz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(compressed))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = probe(format!("{}/Packages", server.uri())).await.unwrap();
        let (final_url, content) = result.unwrap();
        assert!(final_url.ends_with("/Packages.xz"));
        assert_eq!(content, b"Package: widget\n");
    }

    #[tokio::test]
    async fn test_probe_exhausted_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = probe(format!("{}/Packages", server.uri())).await.unwrap();
        assert!(result.is_none());
    }
}
