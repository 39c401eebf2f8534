use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use time::format_description::well_known::Rfc3339;
use xcsim_core::{BundleInfo, DeviceListItem, OsId, Result, XcsimError};

pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// The most useful view of a list-mode result.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "entries", rename_all = "snake_case")]
pub enum Report {
    /// One device on one OS: its installed bundles.
    Bundles(Vec<BundleInfo>),
    /// Several devices on one OS: their names.
    Devices(Vec<String>),
    /// `"<OS> (<n> devices)"` per OS.
    OsSummaries(Vec<String>),
    /// Mixed result, left for the caller to format.
    Items(Vec<DeviceListItem>),
}

/// Collapses `items` by counting distinct OSes and device names.
///
/// The checks run in a fixed order: one OS and one device, then one OS, then
/// several OSes none of which matched exactly one device, then the raw items.
pub fn summarize(items: Vec<DeviceListItem>) -> Result<Report> {
    if items.is_empty() {
        return Err(XcsimError::InvalidArgument {
            message: "cannot summarize an empty device list".to_string(),
        });
    }

    let (os_count, device_count, any_single, summaries) = {
        let mut count_by_os: BTreeMap<&OsId, usize> = BTreeMap::new();
        let mut device_names: BTreeSet<&str> = BTreeSet::new();
        for item in &items {
            *count_by_os.entry(&item.os).or_default() += 1;
            device_names.insert(&item.device.name);
        }
        let summaries: Vec<String> = count_by_os
            .iter()
            .map(|(os, count)| format!("{os} ({count} devices)"))
            .collect();
        let any_single = count_by_os.values().any(|count| *count == 1);
        (count_by_os.len(), device_names.len(), any_single, summaries)
    };

    let report = if os_count == 1 && device_count == 1 {
        let bundles = items
            .into_iter()
            .next()
            .map(|item| item.bundles)
            .unwrap_or_default();
        Report::Bundles(bundles)
    } else if os_count == 1 {
        Report::Devices(items.into_iter().map(|item| item.device.name).collect())
    } else if !any_single {
        Report::OsSummaries(summaries)
    } else {
        Report::Items(items)
    };
    Ok(report)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Bundles(bundles) => {
                for bundle in bundles {
                    writeln!(f, "{bundle}")?;
                }
            }
            Report::Devices(lines) | Report::OsSummaries(lines) => {
                for line in lines {
                    writeln!(f, "{line}")?;
                }
            }
            Report::Items(items) => {
                for item in items {
                    writeln!(f, "{item}")?;
                    for bundle in &item.bundles {
                        writeln!(f, "  {bundle}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ListOutput<'a> {
    schema_version: &'static str,
    generated_at_utc: String,
    pattern: &'a str,
    report: &'a Report,
}

/// Wraps a report in the versioned JSON envelope printed by `xcsim list --json`.
pub fn list_output_json(pattern: &str, report: &Report, pretty: bool) -> serde_json::Result<String> {
    let output = ListOutput {
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at_utc: now_utc_rfc3339(),
        pattern,
        report,
    };
    if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
}

pub fn now_utc_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use xcsim_core::DeviceId;

    fn item(os: &str, version: &str, device: &str) -> DeviceListItem {
        DeviceListItem::new(
            OsId::new(os, version),
            DeviceId::new(device, format!("{version}-{device}"), "/sims"),
            vec![BundleInfo::new(
                format!("com.acme.{}", device.replace(' ', "")),
                PathBuf::from("/sims/bundle"),
                None,
            )],
        )
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            summarize(Vec::new()),
            Err(XcsimError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn single_device_yields_its_bundles() {
        let report = summarize(vec![item("iOS", "9.2", "iPhone 5s")]).unwrap();
        match report {
            Report::Bundles(bundles) => {
                assert_eq!(bundles.len(), 1);
                assert_eq!(bundles[0].bundle_id, "com.acme.iPhone5s");
            }
            other => panic!("expected bundles, got {other:?}"),
        }
    }

    #[test]
    fn one_os_many_devices_yields_names() {
        let report = summarize(vec![
            item("iOS", "9.2", "iPhone 5s"),
            item("iOS", "9.2", "iPhone 6"),
            item("iOS", "9.2", "iPad Air"),
        ])
        .unwrap();
        match report {
            Report::Devices(names) => assert_eq!(names, vec!["iPhone 5s", "iPhone 6", "iPad Air"]),
            other => panic!("expected device names, got {other:?}"),
        }
    }

    #[test]
    fn many_oses_with_many_devices_yield_summaries() {
        let mut items = Vec::new();
        for version in ["8.4", "9.0", "9.2"] {
            items.push(item("iOS", version, "iPhone 5s"));
            items.push(item("iOS", version, "iPad 2"));
        }
        items.push(item("iOS", "9.2", "iPad Air"));

        match summarize(items).unwrap() {
            Report::OsSummaries(lines) => assert_eq!(
                lines,
                vec![
                    "iOS 8.4 (2 devices)",
                    "iOS 9.0 (2 devices)",
                    "iOS 9.2 (3 devices)"
                ]
            ),
            other => panic!("expected summaries, got {other:?}"),
        }
    }

    #[test]
    fn mixed_counts_yield_raw_items() {
        let items = vec![
            item("watchOS", "2.1", "Apple Watch 38mm"),
            item("iOS", "9.2", "iPhone 5s"),
            item("iOS", "9.2", "iPhone 6"),
            item("iOS", "9.2", "iPad Air"),
        ];
        match summarize(items).unwrap() {
            Report::Items(items) => assert_eq!(items.len(), 4),
            other => panic!("expected raw items, got {other:?}"),
        }
    }

    #[test]
    fn same_device_across_oses_counts_as_one_name() {
        let items = vec![item("iOS", "9.2", "iPhone 5s"), item("iOS", "8.4", "iPhone 5s")];
        match summarize(items).unwrap() {
            Report::Items(items) => assert_eq!(items.len(), 2),
            other => panic!("expected raw items, got {other:?}"),
        }
    }

    #[test]
    fn renders_items_with_indented_bundles() {
        let report = Report::Items(vec![item("iOS", "9.2", "iPhone 5s")]);
        assert_eq!(report.to_string(), "iPhone 5s (iOS 9.2)\n  com.acme.iPhone5s\n");
    }

    #[test]
    fn json_envelope_carries_schema_and_kind() {
        let report = Report::Devices(vec!["iPhone 5s".to_string()]);
        let json = list_output_json("iOS 9.2", &report, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["schema_version"], REPORT_SCHEMA_VERSION);
        assert_eq!(value["pattern"], "iOS 9.2");
        assert_eq!(value["report"]["kind"], "devices");
        assert_eq!(value["report"]["entries"][0], "iPhone 5s");
    }
}
