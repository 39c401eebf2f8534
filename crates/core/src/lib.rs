//! Shared model for simulator introspection: runtime and device identifiers,
//! per-OS device collections, installed bundle descriptions and the error type
//! every other crate in the workspace returns.

mod config;
mod device_id;
mod error;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
mod model;
mod os_id;

pub use config::SimulatorConfig;
pub use device_id::{DeviceId, DEVICE_TYPE_KEY_PREFIX};
pub use error::{Result, XcsimError};
pub use model::{BundleInfo, DeviceListItem, OsDevices};
pub use os_id::{compare_versions, OsId, RUNTIME_KEY_PREFIX};

/// Descriptor enumerating runtimes and devices, relative to the simulators root.
pub const DEVICE_SET_PLIST: &str = "device_set.plist";

pub const DEVICE_APP_BUNDLES_RELATIVE_PATH: &str = "data/Containers/Bundle/Application";
pub const DEVICE_APP_DATA_RELATIVE_PATH: &str = "data/Containers/Data/Application";

/// Metadata file present in every bundle and data container directory.
pub const BUNDLE_METADATA_PLIST: &str = ".com.apple.mobile_container_manager.metadata.plist";

/// Key of the bundle identifier inside [`BUNDLE_METADATA_PLIST`].
pub const METADATA_ID: &str = "MCMMetadataIdentifier";

pub const DEFAULT_DEVICE_NAME: &str = "iPhone 5s";
