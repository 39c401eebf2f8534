//! Matching engine over a [`DeviceSet`]: pattern-based device listing and
//! strict bundle lookup by identifier suffix.

mod pattern;

pub use pattern::DevicePattern;

use serde::Serialize;
use tracing::debug;
use xcsim_bundles::scan_installed_bundles;
use xcsim_core::{BundleInfo, DeviceId, DeviceListItem, OsDevices, Result, XcsimError};
use xcsim_device_set::DeviceSet;

/// Options for a bundle lookup. `os` and `device` fall back to the newest OS and
/// the configured default device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleQuery {
    pub bundle_id: Option<String>,
    pub os: Option<String>,
    pub device: Option<String>,
}

impl BundleQuery {
    pub fn new(bundle_id: impl Into<String>) -> Self {
        Self {
            bundle_id: Some(bundle_id.into()),
            ..Self::default()
        }
    }

    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = Some(os.into());
        self
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List { pattern: String },
    Bundle(BundleQuery),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", content = "result", rename_all = "snake_case")]
pub enum Response {
    Devices(Vec<DeviceListItem>),
    Bundle(BundleInfo),
}

pub struct QueryEngine<'a> {
    set: &'a DeviceSet,
}

impl<'a> QueryEngine<'a> {
    pub fn new(set: &'a DeviceSet) -> Self {
        Self { set }
    }

    pub fn execute(&self, request: &Request) -> Result<Response> {
        match request {
            Request::List { pattern } => self.query_by_pattern(pattern).map(Response::Devices),
            Request::Bundle(query) => self.query_by_bundle_id(query).map(Response::Bundle),
        }
    }

    /// Every device of every OS, each with a fresh bundle scan.
    pub fn all_devices(&self) -> Result<Vec<DeviceListItem>> {
        self.set
            .oses()
            .flat_map(|os| os.devices.values().map(move |device| (os, device)))
            .map(|(os, device)| list_item(os, device))
            .collect()
    }

    /// List mode. `pattern` is `"<os>, <device>"`, or a single component that
    /// is tried as an OS filter first and as a device filter when no OS
    /// matches. An empty pattern lists everything.
    pub fn query_by_pattern(&self, pattern: &str) -> Result<Vec<DeviceListItem>> {
        if pattern.is_empty() {
            return self.all_devices();
        }
        let parsed = self.parse_pattern(pattern)?;
        let pairs: Vec<(&OsDevices, &DeviceId)> = self
            .matching_oses(parsed.os.as_deref())
            .into_iter()
            .flat_map(|os| os.devices.values().map(move |device| (os, device)))
            .collect();
        let selected = pattern::select_devices(&pairs, parsed.device.as_deref());
        debug!(
            pattern,
            os = ?parsed.os,
            device = ?parsed.device,
            candidates = pairs.len(),
            matched = selected.len(),
            "matched list pattern"
        );
        selected
            .into_iter()
            .map(|(os, device)| list_item(os, device))
            .collect()
    }

    /// Resolves how a list-mode pattern will be interpreted against this set.
    pub fn parse_pattern(&self, pattern: &str) -> Result<DevicePattern> {
        let parts = pattern::components(pattern);
        pattern::check_arity(pattern, &parts)?;
        match parts.as_slice() {
            [os, device] => Ok(DevicePattern {
                os: Some(os.to_string()),
                device: Some(device.to_string()),
            }),
            [single] if self.matching_oses(Some(*single)).is_empty() => Ok(DevicePattern {
                os: None,
                device: Some(single.to_string()),
            }),
            [single] => Ok(DevicePattern {
                os: Some(single.to_string()),
                device: None,
            }),
            _ => Err(pattern::invalid(pattern)),
        }
    }

    /// Bundle mode. OS and device must match exactly; the bundle identifier
    /// matches any installed bundle it is a suffix of, and must hit exactly one.
    pub fn query_by_bundle_id(&self, query: &BundleQuery) -> Result<BundleInfo> {
        let bundle_id = query
            .bundle_id
            .as_deref()
            .filter(|bundle_id| !bundle_id.is_empty())
            .ok_or_else(|| XcsimError::InvalidArgument {
                message: "a bundle ID is required".to_string(),
            })?;

        let os = match query.os.as_deref() {
            Some(name) => self.set.find_os(name)?,
            None => self.set.default_os().ok_or_else(|| XcsimError::OsNotFound {
                name: String::new(),
            })?,
        };

        let device_name = query
            .device
            .as_deref()
            .unwrap_or_else(|| self.set.default_device_name());
        let device = os
            .device(device_name)
            .ok_or_else(|| XcsimError::DeviceNotFound {
                os: os.id.clone(),
                name: device_name.to_string(),
            })?;

        let mut matches: Vec<BundleInfo> = scan_installed_bundles(device)?
            .into_values()
            .filter(|bundle| bundle.bundle_id.ends_with(bundle_id))
            .collect();
        debug!(
            os = %os.id,
            device = %device.name,
            bundle_id,
            matched = matches.len(),
            "matched bundle suffix"
        );

        match matches.len() {
            0 => Err(XcsimError::BundleNotFound {
                os: os.id.clone(),
                device: device.name.clone(),
                bundle_id: bundle_id.to_string(),
            }),
            1 => Ok(matches.remove(0)),
            _ => Err(XcsimError::AmbiguousBundleId {
                device: device.name.clone(),
                bundle_id: bundle_id.to_string(),
                matches: matches.into_iter().map(|bundle| bundle.bundle_id).collect(),
            }),
        }
    }

    fn matching_oses(&self, pattern: Option<&str>) -> Vec<&'a OsDevices> {
        self.set
            .oses()
            .filter(|os| pattern::os_matches(os, pattern))
            .collect()
    }
}

fn list_item(os: &OsDevices, device: &DeviceId) -> Result<DeviceListItem> {
    let bundles = scan_installed_bundles(device)?.into_values().collect();
    Ok(DeviceListItem::new(os.id.clone(), device.clone(), bundles))
}
