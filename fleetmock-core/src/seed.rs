//! Canned dataset the tree starts from and returns to on reset.

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::types::{Cvd, Group, Host};

/// Build a fresh copy of the seed dataset. Every call allocates new records
/// so resets cannot alias live state.
pub(crate) fn zones() -> IndexMap<String, Vec<Host>> {
    let mut zones = IndexMap::new();
    zones.insert(
        "us-central1-a".to_string(),
        vec![
            seeded_host("us-host1", vec![seeded_group("group-1")]),
            seeded_host("us-host2", vec![]),
        ],
    );
    zones.insert(
        "ap-northeast2-c".to_string(),
        vec![
            seeded_host("ap-host1", vec![]),
            seeded_host(
                "ap-host2",
                vec![
                    seeded_group("group-1"),
                    seeded_group("group-2"),
                    seeded_group("group-3"),
                ],
            ),
        ],
    );
    zones
}

fn default_build_source() -> Value {
    json!({
        "android_ci_build_source": {
            "main_build": {
                "branch": "aosp-main",
                "build_id": "default",
                "target": "default",
            }
        }
    })
}

fn seeded_host(name: &str, groups: Vec<Group>) -> Host {
    Host {
        name: name.to_string(),
        gcp: json!({"machine_type": "", "min_cpu_platform": ""}),
        groups,
    }
}

fn seeded_group(name: &str) -> Group {
    Group {
        name: name.to_string(),
        cvds: vec![seeded_cvd("cvd-1", name), seeded_cvd("cvd-2", name)],
    }
}

fn seeded_cvd(name: &str, group_name: &str) -> Cvd {
    Cvd {
        name: name.to_string(),
        build_source: default_build_source(),
        status: "done".to_string(),
        displays: vec![],
        group_name: group_name.to_string(),
    }
}
