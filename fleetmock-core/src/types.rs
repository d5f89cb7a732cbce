//! Resource records stored in the tree and echoed over the wire.
//!
//! Client-supplied payloads (`gcp`, `build_source`, displays) are kept as raw
//! [`serde_json::Value`]s so the fake echoes back whatever shape the caller
//! sent instead of enforcing a schema the real service owns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A virtual device host in a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub name: String,
    pub gcp: Value,
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// Host as reported by the host listing: name and GCP shape only, no groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostView {
    pub name: String,
    pub gcp: Value,
}

impl From<&Host> for HostView {
    fn from(host: &Host) -> Self {
        HostView {
            name: host.name.clone(),
            gcp: host.gcp.clone(),
        }
    }
}

/// A device group on a host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub cvds: Vec<Cvd>,
}

/// A single virtual device inside a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cvd {
    pub name: String,
    #[serde(default)]
    pub build_source: Value,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub displays: Vec<Value>,
    #[serde(default)]
    pub group_name: String,
}

/// Handle returned by every mutating call. The fake never completes
/// operations, so `done` stays false and there is no way to poll one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    pub done: bool,
}

impl Operation {
    pub fn pending(name: String) -> Self {
        Operation { name, done: false }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn host_view_drops_groups() {
        let host = Host {
            name: "us-host1".to_string(),
            gcp: json!({"machine_type": "n1-standard-4", "min_cpu_platform": ""}),
            groups: vec![Group {
                name: "group-1".to_string(),
                cvds: vec![],
            }],
        };

        let view = HostView::from(&host);
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(
            value,
            json!({"name": "us-host1", "gcp": {"machine_type": "n1-standard-4", "min_cpu_platform": ""}})
        );
    }

    #[test]
    fn group_without_cvds_deserializes_empty() {
        let group: Group = serde_json::from_value(json!({"name": "group-9"})).unwrap();
        assert_eq!(group.name, "group-9");
        assert!(group.cvds.is_empty());
    }

    #[test]
    fn cvd_round_trips_client_payload() {
        let payload = json!({
            "name": "cvd-1",
            "build_source": {"android_ci_build_source": {"main_build": {"branch": "aosp-main"}}},
            "status": "running",
            "displays": [{"width": 720, "height": 1280}],
            "group_name": "group-1"
        });

        let cvd: Cvd = serde_json::from_value(payload.clone()).unwrap();
        assert_eq!(serde_json::to_value(&cvd).unwrap(), payload);
    }

    #[test]
    fn operation_serializes_pending() {
        let op = Operation::pending("abc123".to_string());
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"name": "abc123", "done": false})
        );
    }
}
