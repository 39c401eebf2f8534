use crate::{DEVICE_APP_BUNDLES_RELATIVE_PATH, DEVICE_APP_DATA_RELATIVE_PATH};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

pub const DEVICE_TYPE_KEY_PREFIX: &str = "com.apple.CoreSimulator.SimDeviceType.";

/// One simulator device: a display name plus the directory GUID that holds its data.
///
/// Identity is the name alone. Two devices with the same name under one OS
/// collapse into a single entry, the later one winning.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceId {
    pub name: String,
    pub guid: String,
    #[serde(skip)]
    root: PathBuf,
}

impl DeviceId {
    pub fn new(name: impl Into<String>, guid: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            guid: guid.into(),
            root: root.into(),
        }
    }

    /// Parses a descriptor key such as `com.apple.CoreSimulator.SimDeviceType.iPhone-5s`.
    /// Hyphens in the suffix become spaces in the name.
    pub fn parse_prefixed(key: &str, guid: &str, root: &Path) -> Option<Self> {
        let rest = key.strip_prefix(DEVICE_TYPE_KEY_PREFIX)?;
        Some(Self::new(rest.replace('-', " "), guid, root))
    }

    /// Canonical descriptor key, the inverse of [`DeviceId::parse_prefixed`].
    pub fn key(&self) -> String {
        format!("{}{}", DEVICE_TYPE_KEY_PREFIX, self.name.replace(' ', "-"))
    }

    pub fn app_bundles_path(&self) -> PathBuf {
        self.root.join(&self.guid).join(DEVICE_APP_BUNDLES_RELATIVE_PATH)
    }

    pub fn app_data_path(&self) -> PathBuf {
        self.root.join(&self.guid).join(DEVICE_APP_DATA_RELATIVE_PATH)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq for DeviceId {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for DeviceId {}

impl Hash for DeviceId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Ord for DeviceId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl PartialOrd for DeviceId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
