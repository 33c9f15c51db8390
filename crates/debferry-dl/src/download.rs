use std::{fs, path::PathBuf};

use debferry_utils::fs::ensure_dir_exists;
use url::Url;

use crate::{
    error::{DownloadError, Result},
    http::Http,
};

/// Compression level used when persisting downloads compressed.
const ZSTD_LEVEL: i32 = 19;

/// Fetches a single resource into a directory, named after the final
/// resolved URL. With `compress`, the persisted bytes are zstd-encoded
/// and the file name gains a `.zst` suffix; this is how index leaves
/// stay compact without a bespoke database format.
pub struct Download {
    url: String,
    output_dir: PathBuf,
    compress: bool,
}

impl Download {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            output_dir: PathBuf::from("."),
            compress: false,
        }
    }

    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn execute(self) -> Result<PathBuf> {
        let resp = Http::get(&self.url)?;
        let (final_url, bytes) = Http::read_body(resp)?;

        let filename = filename_from_url(&final_url)?;
        ensure_dir_exists(&self.output_dir)?;

        if self.compress {
            let path = self.output_dir.join(format!("{filename}.zst"));
            let compressed = zstd::encode_all(bytes.as_slice(), ZSTD_LEVEL)?;
            fs::write(&path, compressed)?;
            Ok(path)
        } else {
            let path = self.output_dir.join(filename);
            fs::write(&path, bytes)?;
            Ok(path)
        }
    }
}

/// Extracts the last path segment of a URL.
pub fn filename_from_url(url: &str) -> Result<String> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|segment| !segment.is_empty())
                .map(String::from)
        })
        .ok_or_else(|| DownloadError::NoFilename {
            url: url.to_string(),
        })
}
