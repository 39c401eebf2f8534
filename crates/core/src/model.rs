use crate::{DeviceId, OsId};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Devices provisioned for one OS runtime, keyed by display name.
#[derive(Debug, Clone, Serialize)]
pub struct OsDevices {
    pub id: OsId,
    pub devices: BTreeMap<String, DeviceId>,
}

impl OsDevices {
    /// Later devices overwrite earlier ones with the same name.
    pub fn new(id: OsId, devices: impl IntoIterator<Item = DeviceId>) -> Self {
        let devices = devices
            .into_iter()
            .map(|device| (device.name.clone(), device))
            .collect();
        Self { id, devices }
    }

    pub fn device(&self, name: &str) -> Option<&DeviceId> {
        self.devices.get(name)
    }

    pub fn device_names(&self) -> impl Iterator<Item = &str> {
        self.devices.keys().map(String::as_str)
    }
}

impl fmt::Display for OsDevices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} devices)", self.id, self.devices.len())
    }
}

impl PartialEq for OsDevices {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for OsDevices {}

impl Ord for OsDevices {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl PartialOrd for OsDevices {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An installed application as found on disk during one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleInfo {
    pub bundle_id: String,
    pub bundle_path: PathBuf,
    /// `None` until the app has created its data container.
    pub data_path: Option<PathBuf>,
}

impl BundleInfo {
    pub fn new(bundle_id: impl Into<String>, bundle_path: PathBuf, data_path: Option<PathBuf>) -> Self {
        Self {
            bundle_id: bundle_id.into(),
            bundle_path,
            data_path,
        }
    }
}

impl fmt::Display for BundleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bundle_id)
    }
}

/// One matched device together with the bundles installed on it.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceListItem {
    pub os: OsId,
    pub device: DeviceId,
    pub bundles: Vec<BundleInfo>,
}

impl DeviceListItem {
    pub fn new(os: OsId, device: DeviceId, bundles: Vec<BundleInfo>) -> Self {
        Self {
            os,
            device,
            bundles,
        }
    }

    /// `iPhone 5s (iOS 9.2)`
    pub fn full_name(&self) -> String {
        format!("{} ({})", self.device.name, self.os)
    }

    pub fn short_name(&self) -> &str {
        &self.device.name
    }
}

impl fmt::Display for DeviceListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}
