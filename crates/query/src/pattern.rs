use xcsim_core::{DeviceId, OsDevices, Result, XcsimError};

/// A list-mode pattern after splitting. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevicePattern {
    pub os: Option<String>,
    pub device: Option<String>,
}

/// Splits `pattern` on commas into trimmed components. Trailing empty
/// components are dropped before trimming, so `"iOS,"` is one component and
/// `","` is none.
pub(crate) fn components(pattern: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = pattern.split(',').collect();
    while parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    parts.into_iter().map(str::trim).collect()
}

pub(crate) fn invalid(pattern: &str) -> XcsimError {
    XcsimError::InvalidPattern {
        pattern: pattern.to_string(),
    }
}

/// Case-sensitive substring test against `"<type> <version>"`.
pub(crate) fn os_matches(os: &OsDevices, pattern: Option<&str>) -> bool {
    pattern.map_or(true, |pattern| os.id.to_string().contains(pattern))
}

/// Exact name matches when there are any, substring matches otherwise, so
/// `iPad Air` does not also pick up `iPad Air 2`.
pub(crate) fn select_devices<'a>(
    pairs: &[(&'a OsDevices, &'a DeviceId)],
    pattern: Option<&str>,
) -> Vec<(&'a OsDevices, &'a DeviceId)> {
    let strict: Vec<_> = pairs
        .iter()
        .copied()
        .filter(|(_, device)| pattern == Some(device.name.as_str()))
        .collect();
    if !strict.is_empty() {
        return strict;
    }
    let pattern = pattern.unwrap_or_default();
    pairs
        .iter()
        .copied()
        .filter(|(_, device)| device.name.contains(pattern))
        .collect()
}

pub(crate) fn check_arity(pattern: &str, parts: &[&str]) -> Result<()> {
    if parts.is_empty() || parts.len() > 2 {
        return Err(invalid(pattern));
    }
    Ok(())
}
