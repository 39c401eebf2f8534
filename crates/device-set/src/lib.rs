use plist::{Dictionary, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};
use xcsim_core::{DeviceId, OsDevices, OsId, Result, SimulatorConfig, XcsimError};

pub use xcsim_core::DEFAULT_DEVICE_NAME;

/// Top-level descriptor entry mapping runtime keys to device-key/GUID dictionaries.
pub const DEFAULT_DEVICES_KEY: &str = "DefaultDevices";

/// Provisioned runtimes and devices, parsed once from `device_set.plist`.
///
/// Only devices whose bundles directory existed at build time are kept, and a
/// runtime with no such device is left out entirely. The set never changes
/// after [`DeviceSet::build`]; rebuild it to see newly created simulators.
#[derive(Debug, Clone)]
pub struct DeviceSet {
    oses: BTreeMap<OsId, OsDevices>,
    default_device: String,
}

impl DeviceSet {
    pub fn build(root: impl AsRef<Path>) -> Result<Self> {
        Self::from_config(&SimulatorConfig::new(root.as_ref()))
    }

    pub fn from_config(config: &SimulatorConfig) -> Result<Self> {
        let path = config.descriptor_path();
        if !path.is_file() {
            return Err(XcsimError::ConfigNotFound {
                path,
                reason: "file does not exist".to_string(),
            });
        }
        let descriptor = Value::from_file(&path).map_err(|err| XcsimError::ConfigNotFound {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        let default_devices = descriptor
            .as_dictionary()
            .and_then(|root| root.get(DEFAULT_DEVICES_KEY))
            .and_then(Value::as_dictionary)
            .ok_or_else(|| XcsimError::ConfigNotFound {
                path: path.clone(),
                reason: format!("missing {DEFAULT_DEVICES_KEY} dictionary"),
            })?;

        let oses = parse_default_devices(&config.root, default_devices);
        let set = Self::from_parts(oses.into_values(), &config.default_device);
        info!(
            descriptor = %path.display(),
            oses = set.len(),
            devices = set.device_count(),
            "loaded simulator device set"
        );
        Ok(set)
    }

    /// Assembles a set from already-parsed runtimes without touching the disk.
    pub fn from_parts(
        oses: impl IntoIterator<Item = OsDevices>,
        default_device: impl Into<String>,
    ) -> Self {
        let oses = oses
            .into_iter()
            .filter(|os| !os.devices.is_empty())
            .map(|os| (os.id.clone(), os))
            .collect();
        Self {
            oses,
            default_device: default_device.into(),
        }
    }

    pub fn get(&self, id: &OsId) -> Option<&OsDevices> {
        self.oses.get(id)
    }

    /// Runtimes from oldest to newest.
    pub fn oses(&self) -> impl Iterator<Item = &OsDevices> {
        self.oses.values()
    }

    pub fn len(&self) -> usize {
        self.oses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oses.is_empty()
    }

    pub fn device_count(&self) -> usize {
        self.oses.values().map(|os| os.devices.len()).sum()
    }

    /// The runtime with the highest version.
    pub fn default_os(&self) -> Option<&OsDevices> {
        self.oses.values().next_back()
    }

    pub fn default_os_name(&self) -> Option<String> {
        self.default_os().map(|os| os.id.to_string())
    }

    pub fn default_device_name(&self) -> &str {
        &self.default_device
    }

    /// Strict lookup by free-text name such as `iOS 9.2`; no partial matching.
    pub fn find_os(&self, name: &str) -> Result<&OsDevices> {
        self.get(&OsId::parse_free(name))
            .ok_or_else(|| XcsimError::OsNotFound {
                name: name.to_string(),
            })
    }
}

fn parse_default_devices(root: &Path, default_devices: &Dictionary) -> BTreeMap<OsId, OsDevices> {
    let mut oses = BTreeMap::new();
    for (os_key, devices) in default_devices.iter() {
        let Some(id) = OsId::parse_prefixed(os_key) else {
            debug!(key = %os_key, "skipping unrecognized runtime key");
            continue;
        };
        let Some(devices) = devices.as_dictionary() else {
            debug!(key = %os_key, "skipping runtime entry that is not a dictionary");
            continue;
        };

        let provisioned: Vec<DeviceId> = devices
            .iter()
            .filter_map(|(device_key, guid)| parse_device(root, device_key, guid))
            .filter(|device| {
                let present = device.app_bundles_path().is_dir();
                if !present {
                    debug!(
                        os = %id,
                        device = %device.name,
                        guid = %device.guid,
                        "skipping device without bundles directory"
                    );
                }
                present
            })
            .collect();

        if provisioned.is_empty() {
            debug!(os = %id, "dropping runtime without provisioned devices");
            continue;
        }
        oses.insert(id.clone(), OsDevices::new(id, provisioned));
    }
    oses
}

fn parse_device(root: &Path, key: &str, guid: &Value) -> Option<DeviceId> {
    let Some(guid) = guid.as_string() else {
        debug!(key = %key, "skipping device entry without a GUID string");
        return None;
    };
    let device = DeviceId::parse_prefixed(key, guid, root);
    if device.is_none() {
        debug!(key = %key, "skipping unrecognized device key");
    }
    device
}
