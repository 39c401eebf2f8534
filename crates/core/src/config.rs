use crate::{DEFAULT_DEVICE_NAME, DEVICE_SET_PLIST};
use std::path::PathBuf;

const SIMULATORS_RELATIVE_TO_HOME: &str = "Library/Developer/CoreSimulator/Devices";

/// Where simulator data lives and which device bundle lookups fall back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    pub root: PathBuf,
    pub default_device: String,
}

impl SimulatorConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            default_device: DEFAULT_DEVICE_NAME.to_string(),
        }
    }

    pub fn with_default_device(mut self, name: impl Into<String>) -> Self {
        self.default_device = name.into();
        self
    }

    /// `~/Library/Developer/CoreSimulator/Devices`
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(SIMULATORS_RELATIVE_TO_HOME))
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.root.join(DEVICE_SET_PLIST)
    }
}
