use std::{fs, path::Path};

use sha2::{Digest, Sha256};

use crate::error::{HashError, HashResult};

/// Calculates the SHA-256 checksum of a file, hex-encoded.
pub fn calculate_checksum<P: AsRef<Path>>(file_path: P) -> HashResult<String> {
    let file_path = file_path.as_ref();
    let contents = fs::read(file_path).map_err(|err| HashError::ReadFailed {
        path: file_path.to_path_buf(),
        source: err,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    Ok(hex_encode(&hasher.finalize()))
}

/// Verifies the checksum of a file against an expected value,
/// comparing case-insensitively.
pub fn verify_checksum<P: AsRef<Path>>(file_path: P, expected: &str) -> HashResult<bool> {
    let actual = calculate_checksum(file_path)?;
    Ok(actual.eq_ignore_ascii_case(expected))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
