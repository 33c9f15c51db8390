//! Parser for Debian control-file package listings.

use crate::package::PackageRecord;

/// Converts an upstream `Packages` listing into package records.
///
/// Stanzas are separated by a blank line; within a stanza only the
/// `Package`, `Version`, `Filename` and `SHA256` keys are consumed, with
/// `Filename` joined onto `url_prefix`. Unrecognized keys are ignored so
/// new upstream fields never break parsing. A stanza without `Package`
/// still yields a record with an empty name; the parser performs no
/// validation and cannot fail.
pub fn parse_control_file(content: &str, url_prefix: &str) -> Vec<PackageRecord> {
    let mut records = Vec::new();

    for stanza in content.split("\n\n") {
        if stanza.is_empty() {
            continue;
        }

        let mut record = PackageRecord::default();

        for line in stanza.lines() {
            if let Some(value) = line.strip_prefix("Package: ") {
                record.name = value.to_string();
            } else if let Some(value) = line.strip_prefix("Version: ") {
                record.version = value.to_string();
            } else if let Some(value) = line.strip_prefix("Filename: ") {
                record.url = format!("{url_prefix}/{value}");
            } else if let Some(value) = line.strip_prefix("SHA256: ") {
                record.sha256 = value.to_string();
            }
        }

        records.push(record);
    }

    records
}
