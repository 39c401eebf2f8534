use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

pub const RUNTIME_KEY_PREFIX: &str = "com.apple.CoreSimulator.SimRuntime.";

/// A simulated operating system: type (`iOS`, `watchOS`, `tvOS`) plus version.
///
/// Equality is on the `(os_type, version)` pair. Ordering compares versions
/// numerically segment by segment, so `iOS 9.2 < iOS 9.10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OsId {
    #[serde(rename = "type")]
    pub os_type: String,
    pub version: String,
}

impl OsId {
    pub fn new(os_type: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            os_type: os_type.into(),
            version: version.into(),
        }
    }

    /// Parses a descriptor key such as `com.apple.CoreSimulator.SimRuntime.iOS-9-2`.
    ///
    /// Returns `None` when the prefix is missing. Nothing past the prefix is
    /// validated: the first hyphen-separated segment is the type and the rest
    /// are joined with `.` into the version.
    pub fn parse_prefixed(key: &str) -> Option<Self> {
        let rest = key.strip_prefix(RUNTIME_KEY_PREFIX)?;
        let mut segments = rest.split('-');
        let os_type = segments.next().unwrap_or_default();
        let version = segments.collect::<Vec<_>>().join(".");
        Some(Self::new(os_type, version))
    }

    /// Parses free text in `iOS 9.2` form. Tokens after the first are joined
    /// with `.`, so malformed input still yields an `OsId` that simply won't
    /// match anything.
    pub fn parse_free(text: &str) -> Self {
        let mut tokens = text.split_whitespace();
        let os_type = tokens.next().unwrap_or_default();
        let version = tokens.collect::<Vec<_>>().join(".");
        Self::new(os_type, version)
    }

    /// Canonical descriptor key, the inverse of [`OsId::parse_prefixed`].
    pub fn key(&self) -> String {
        format!(
            "{}{}-{}",
            RUNTIME_KEY_PREFIX,
            self.os_type,
            self.version.replace('.', "-")
        )
    }
}

impl fmt::Display for OsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.os_type, self.version)
    }
}

impl Ord for OsId {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_versions(&self.version, &other.version)
            .then_with(|| self.os_type.cmp(&other.os_type))
            .then_with(|| self.version.cmp(&other.version))
    }
}

impl PartialOrd for OsId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Segment<'a> {
    Numeric(u64),
    Text(&'a str),
}

fn segment(raw: &str) -> Segment<'_> {
    if raw.is_empty() {
        return Segment::Numeric(0);
    }
    raw.parse::<u64>()
        .map(Segment::Numeric)
        .unwrap_or(Segment::Text(raw))
}

/// Compares dotted version strings segment by segment as integers, padding the
/// shorter one with zeros. Non-numeric segments sort after numeric ones.
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    let left: Vec<Segment<'_>> = left.split('.').map(segment).collect();
    let right: Vec<Segment<'_>> = right.split('.').map(segment).collect();
    let len = left.len().max(right.len());
    for idx in 0..len {
        let l = left.get(idx).unwrap_or(&Segment::Numeric(0));
        let r = right.get(idx).unwrap_or(&Segment::Numeric(0));
        match l.cmp(r) {
            Ordering::Equal => continue,
            ordering => return ordering,
        }
    }
    Ordering::Equal
}
