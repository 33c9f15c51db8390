//! Debian version parsing and ordering.
//!
//! Implements the `[epoch:]upstream-version[-debian-revision]` comparison
//! rules: epochs compare numerically, the remaining parts alternate
//! between non-digit and digit runs, digit runs compare numerically, and
//! `~` sorts before everything including the empty string (so `1.0~rc1`
//! precedes `1.0`).

use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebVersion {
    epoch: u64,
    upstream: String,
    revision: String,
}

impl DebVersion {
    /// Parses a Debian version string.
    ///
    /// Returns `None` for malformed input: an empty string, a
    /// non-numeric epoch, an upstream version that does not start with a
    /// digit, or characters outside the allowed set. Callers treat a
    /// malformed version as ranking below every well-formed one.
    pub fn parse(version: &str) -> Option<Self> {
        let version = version.trim();
        if version.is_empty() {
            return None;
        }

        let (epoch, rest) = match version.split_once(':') {
            Some((epoch, rest)) => (epoch.parse::<u64>().ok()?, rest),
            None => (0, version),
        };

        if rest.ends_with('-') {
            return None;
        }

        let (upstream, revision) = match rest.rsplit_once('-') {
            Some((upstream, revision)) => (upstream, revision),
            None => (rest, ""),
        };

        if !upstream.chars().next()?.is_ascii_digit() {
            return None;
        }

        let upstream_ok = upstream
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '~' | '-'));
        let revision_ok = revision
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '~'));

        if !upstream_ok || !revision_ok {
            return None;
        }

        Some(Self {
            epoch,
            upstream: upstream.to_string(),
            revision: revision.to_string(),
        })
    }
}

impl Ord for DebVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| verrevcmp(&self.upstream, &other.upstream))
            .then_with(|| verrevcmp(&self.revision, &other.revision))
    }
}

impl PartialOrd for DebVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Character weight within a non-digit run: `~` sorts before the end of
/// the string, letters before every other character.
fn char_order(c: Option<u8>) -> i32 {
    match c {
        None => 0,
        Some(b'~') => -1,
        Some(c) if c.is_ascii_digit() => 0,
        Some(c) if c.is_ascii_alphabetic() => i32::from(c),
        Some(c) => i32::from(c) + 256,
    }
}

/// The Debian `verrevcmp` algorithm over one version part.
fn verrevcmp(a: &str, b: &str) -> Ordering {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let (mut i, mut j) = (0, 0);

    while i < a.len() || j < b.len() {
        // non-digit runs compare by character weight
        while (i < a.len() && !a[i].is_ascii_digit()) || (j < b.len() && !b[j].is_ascii_digit()) {
            let oa = char_order(a.get(i).filter(|c| !c.is_ascii_digit()).copied());
            let ob = char_order(b.get(j).filter(|c| !c.is_ascii_digit()).copied());

            if oa != ob {
                return oa.cmp(&ob);
            }

            i += 1;
            j += 1;
        }

        // digit runs compare numerically: skip leading zeros, then the
        // longer run wins, then lexicographic order decides
        while a.get(i) == Some(&b'0') {
            i += 1;
        }
        while b.get(j) == Some(&b'0') {
            j += 1;
        }

        let run_a = digit_run(a, i);
        let run_b = digit_run(b, j);

        match run_a.len().cmp(&run_b.len()).then_with(|| run_a.cmp(run_b)) {
            Ordering::Equal => {}
            other => return other,
        }

        i += run_a.len();
        j += run_b.len();
    }

    Ordering::Equal
}

fn digit_run(bytes: &[u8], start: usize) -> &[u8] {
    let end = bytes[start.min(bytes.len())..]
        .iter()
        .position(|c| !c.is_ascii_digit())
        .map(|offset| start + offset)
        .unwrap_or(bytes.len());
    &bytes[start.min(bytes.len())..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_greater(a: &str, b: &str) {
        let va = DebVersion::parse(a).unwrap();
        let vb = DebVersion::parse(b).unwrap();
        assert!(va > vb, "expected {a} > {b}");
        assert!(vb < va, "expected {b} < {a}");
    }

    #[test]
    fn test_numeric_runs_compare_numerically() {
        assert_greater("1.10.0", "1.2.0");
        assert_greater("1.2.0", "0.9.5");
        assert_greater("10", "9");
        assert_greater("1.05", "1.4");
    }

    #[test]
    fn test_revision_ordering() {
        assert_greater("2.0-2", "2.0-1");
        assert_greater("2.0-1.1", "2.0-1");
        let a = DebVersion::parse("2.0-1").unwrap();
        let b = DebVersion::parse("2.0-1").unwrap();
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn test_epoch_dominates() {
        assert_greater("1:0.9", "2.0");
        assert_greater("2:1.0", "1:9.9");
    }

    #[test]
    fn test_tilde_sorts_before_release() {
        assert_greater("1.0", "1.0~rc1");
        assert_greater("1.0~rc2", "1.0~rc1");
        assert_greater("1.0~rc1+b1", "1.0~rc1");
    }

    #[test]
    fn test_letters_sort_before_other_symbols() {
        assert_greater("1.0+b1", "1.0a");
        assert_greater("1.0b", "1.0a");
    }

    #[test]
    fn test_hyphen_in_upstream_belongs_to_upstream() {
        // last hyphen separates the revision
        let v = DebVersion::parse("1.0-rc-3").unwrap();
        assert_eq!(v.upstream, "1.0-rc");
        assert_eq!(v.revision, "3");
    }

    #[test]
    fn test_malformed_versions() {
        assert!(DebVersion::parse("").is_none());
        assert!(DebVersion::parse("beta").is_none());
        assert!(DebVersion::parse("x:1.0").is_none());
        assert!(DebVersion::parse("1.0 final").is_none());
        assert!(DebVersion::parse("1.0-").is_none());
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert!(DebVersion::parse(" 2.0-1 ").is_some());
    }
}
