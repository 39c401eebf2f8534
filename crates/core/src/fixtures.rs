//! Builds throwaway simulator trees on disk for tests.

use crate::{
    DeviceId, OsId, BUNDLE_METADATA_PLIST, DEVICE_APP_BUNDLES_RELATIVE_PATH,
    DEVICE_APP_DATA_RELATIVE_PATH, DEVICE_SET_PLIST, METADATA_ID,
};
use plist::{Dictionary, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub fn runtime_key(os_type: &str, version: &str) -> String {
    OsId::new(os_type, version).key()
}

pub fn device_type_key(name: &str) -> String {
    DeviceId::new(name, "", "").key()
}

/// A simulators root directory laid out the way CoreSimulator does.
#[derive(Debug, Clone)]
pub struct SimulatorTree {
    root: PathBuf,
}

impl SimulatorTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `device_set.plist` with raw descriptor keys:
    /// `[(runtime_key, [(device_type_key, guid)])]`.
    pub fn write_device_set(&self, runtimes: &[(String, Vec<(String, String)>)]) -> io::Result<()> {
        let mut default_devices = Dictionary::new();
        for (runtime, devices) in runtimes {
            let mut entry = Dictionary::new();
            for (device, guid) in devices {
                entry.insert(device.clone(), Value::String(guid.clone()));
            }
            default_devices.insert(runtime.clone(), Value::Dictionary(entry));
        }
        let mut root = Dictionary::new();
        root.insert("DefaultDevices".to_string(), Value::Dictionary(default_devices));
        self.write_plist(&self.root.join(DEVICE_SET_PLIST), Value::Dictionary(root))
    }

    /// Creates an empty bundles directory so the device counts as provisioned.
    pub fn provision(&self, guid: &str) -> io::Result<PathBuf> {
        let path = self.root.join(guid).join(DEVICE_APP_BUNDLES_RELATIVE_PATH);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    pub fn install_bundle(&self, guid: &str, container: &str, bundle_id: &str) -> io::Result<PathBuf> {
        let dir = self
            .root
            .join(guid)
            .join(DEVICE_APP_BUNDLES_RELATIVE_PATH)
            .join(container);
        self.write_container(&dir, Some(bundle_id))?;
        Ok(dir)
    }

    pub fn add_data_container(&self, guid: &str, container: &str, bundle_id: &str) -> io::Result<PathBuf> {
        let dir = self
            .root
            .join(guid)
            .join(DEVICE_APP_DATA_RELATIVE_PATH)
            .join(container);
        self.write_container(&dir, Some(bundle_id))?;
        Ok(dir)
    }

    /// A container whose metadata has no identifier field.
    pub fn add_anonymous_bundle(&self, guid: &str, container: &str) -> io::Result<PathBuf> {
        let dir = self
            .root
            .join(guid)
            .join(DEVICE_APP_BUNDLES_RELATIVE_PATH)
            .join(container);
        self.write_container(&dir, None)?;
        Ok(dir)
    }

    fn write_container(&self, dir: &Path, bundle_id: Option<&str>) -> io::Result<()> {
        fs::create_dir_all(dir)?;
        let container = dir
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let mut metadata = Dictionary::new();
        if let Some(bundle_id) = bundle_id {
            metadata.insert(METADATA_ID.to_string(), Value::String(bundle_id.to_string()));
        }
        metadata.insert(
            "MCMMetadataUUID".to_string(),
            Value::String(container),
        );
        self.write_plist(&dir.join(BUNDLE_METADATA_PLIST), Value::Dictionary(metadata))
    }

    fn write_plist(&self, path: &Path, value: Value) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        value.to_file_xml(path).map_err(io::Error::other)
    }
}
