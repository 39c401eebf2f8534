use plist::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use xcsim_core::{BundleInfo, DeviceId, Result, XcsimError, BUNDLE_METADATA_PLIST, METADATA_ID};

/// A container directory together with the bundle identifier its metadata declares.
#[derive(Debug, Clone)]
struct Container {
    dir: PathBuf,
    bundle_id: String,
}

/// Lists the apps installed on `device`, keyed by bundle identifier, with each
/// bundle's data container resolved.
///
/// Reads the disk on every call. Fails with [`XcsimError::AmbiguousBundleData`]
/// when two bundle containers, or two data containers, claim the same identifier.
pub fn scan_installed_bundles(device: &DeviceId) -> Result<BTreeMap<String, BundleInfo>> {
    let bundles = read_containers(&device.app_bundles_path())?;
    let data = read_containers(&device.app_data_path())?;

    let mut infos = BTreeMap::new();
    for container in &bundles {
        if infos.contains_key(&container.bundle_id) {
            continue;
        }
        unique_container(device, &container.bundle_id, &bundles)?;
        let data_path = unique_container(device, &container.bundle_id, &data)?;
        debug!(
            device = %device.name,
            bundle_id = %container.bundle_id,
            has_data = data_path.is_some(),
            "found installed bundle"
        );
        infos.insert(
            container.bundle_id.clone(),
            BundleInfo::new(container.bundle_id.clone(), container.dir.clone(), data_path),
        );
    }
    Ok(infos)
}

/// Finds the data container of `bundle_id` on `device`. `None` means the app
/// has not created one yet.
pub fn locate_data_directory(device: &DeviceId, bundle_id: &str) -> Result<Option<PathBuf>> {
    let data = read_containers(&device.app_data_path())?;
    unique_container(device, bundle_id, &data)
}

fn unique_container(
    device: &DeviceId,
    bundle_id: &str,
    containers: &[Container],
) -> Result<Option<PathBuf>> {
    let mut matches: Vec<PathBuf> = containers
        .iter()
        .filter(|container| container.bundle_id == bundle_id)
        .map(|container| container.dir.clone())
        .collect();
    if matches.len() > 1 {
        return Err(XcsimError::AmbiguousBundleData {
            device: device.name.clone(),
            bundle_id: bundle_id.to_string(),
            directories: matches,
        });
    }
    Ok(matches.pop())
}

/// Immediate subdirectories of `path` that carry a metadata file with an
/// identifier. A missing `path` reads as empty.
fn read_containers(path: &Path) -> Result<Vec<Container>> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "container directory does not exist");
            return Ok(Vec::new());
        }
        Err(err) => return Err(XcsimError::io(path, err)),
    };

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| XcsimError::io(path, err))?;
        let dir = entry.path();
        if dir.is_dir() {
            dirs.push(dir);
        }
    }
    dirs.sort();

    let mut containers = Vec::new();
    for dir in dirs {
        let metadata_path = dir.join(BUNDLE_METADATA_PLIST);
        if !metadata_path.is_file() {
            continue;
        }
        let metadata = Value::from_file(&metadata_path).map_err(|source| XcsimError::Metadata {
            path: metadata_path.clone(),
            source,
        })?;
        let bundle_id = metadata
            .as_dictionary()
            .and_then(|dict| dict.get(METADATA_ID))
            .and_then(Value::as_string);
        match bundle_id {
            Some(bundle_id) => containers.push(Container {
                bundle_id: bundle_id.to_string(),
                dir,
            }),
            None => warn!(
                metadata = %metadata_path.display(),
                "metadata has no {} field",
                METADATA_ID
            ),
        }
    }
    Ok(containers)
}
