use std::io::Read;

use crate::error::{DownloadError, Result};

/// Wire encoding of a fetched resource, selected from the suffix of the
/// final resolved URL. Redirects may swap one suffix for another, so the
/// requested suffix is never authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Xz,
    Zstd,
}

impl Compression {
    pub fn from_url(url: &str) -> Self {
        if url.ends_with(".gz") {
            Self::Gzip
        } else if url.ends_with(".xz") {
            Self::Xz
        } else if url.ends_with(".zst") {
            Self::Zstd
        } else {
            Self::None
        }
    }
}

/// Decodes `bytes` according to `compression`. `url` only labels errors.
pub fn decompress(bytes: Vec<u8>, compression: Compression, url: &str) -> Result<Vec<u8>> {
    match compression {
        Compression::None => Ok(bytes),
        Compression::Gzip => {
            let mut decoded = Vec::new();
            flate2::read::GzDecoder::new(bytes.as_slice())
                .read_to_end(&mut decoded)
                .map_err(|err| decode_error("gzip", url, err))?;
            Ok(decoded)
        }
        Compression::Xz => {
            let mut decoded = Vec::new();
            xz2::read::XzDecoder::new(bytes.as_slice())
                .read_to_end(&mut decoded)
                .map_err(|err| decode_error("xz", url, err))?;
            Ok(decoded)
        }
        Compression::Zstd => {
            zstd::decode_all(bytes.as_slice()).map_err(|err| decode_error("zstd", url, err))
        }
    }
}

fn decode_error(codec: &'static str, url: &str, source: std::io::Error) -> DownloadError {
    DownloadError::Decompress {
        codec,
        url: url.to_string(),
        source,
    }
}
