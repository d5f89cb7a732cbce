//! In-memory resource tree: zones own hosts, hosts own groups, groups own
//! devices.
//!
//! Zones are fixed by the seed dataset; hosts and groups come and go. Lookups
//! are linear first-match scans and removals keep the remaining records in
//! insertion order, so listings stay stable as the tree mutates.

use indexmap::IndexMap;

use crate::seed;
use crate::types::{Group, Host, HostView};

#[derive(Debug, Clone)]
pub struct ResourceTree {
    zones: IndexMap<String, Vec<Host>>,
}

impl ResourceTree {
    /// Tree loaded with the canned dataset.
    pub fn seeded() -> Self {
        ResourceTree {
            zones: seed::zones(),
        }
    }

    /// Zone names in seed order.
    pub fn zone_names(&self) -> Vec<String> {
        self.zones.keys().cloned().collect()
    }

    pub fn contains_zone(&self, zone: &str) -> bool {
        self.zones.contains_key(zone)
    }

    pub fn hosts(&self, zone: &str) -> Option<&[Host]> {
        self.zones.get(zone).map(Vec::as_slice)
    }

    /// Hosts of a zone reduced to their listing shape.
    pub fn host_views(&self, zone: &str) -> Option<Vec<HostView>> {
        self.zones
            .get(zone)
            .map(|hosts| hosts.iter().map(HostView::from).collect())
    }

    /// First host with the given name, if any.
    pub fn find_host(&self, zone: &str, host: &str) -> Option<&Host> {
        self.zones
            .get(zone)?
            .iter()
            .find(|candidate| candidate.name == host)
    }

    /// First group with the given name on the named host, if any.
    pub fn find_group(&self, zone: &str, host: &str, group: &str) -> Option<&Group> {
        self.find_host(zone, host)?
            .groups
            .iter()
            .find(|candidate| candidate.name == group)
    }

    /// Append a host to a zone. Returns false when the zone does not exist.
    pub fn add_host(&mut self, zone: &str, host: Host) -> bool {
        match self.zones.get_mut(zone) {
            Some(hosts) => {
                hosts.push(host);
                true
            }
            None => false,
        }
    }

    /// Remove the first host with the given name, returning it.
    pub fn remove_host(&mut self, zone: &str, host: &str) -> Option<Host> {
        let hosts = self.zones.get_mut(zone)?;
        let idx = hosts.iter().position(|candidate| candidate.name == host)?;
        Some(hosts.remove(idx))
    }

    /// Append a group to the named host. Returns false when the host is gone.
    pub fn add_group(&mut self, zone: &str, host: &str, group: Group) -> bool {
        match self.find_host_mut(zone, host) {
            Some(host) => {
                host.groups.push(group);
                true
            }
            None => false,
        }
    }

    /// Remove the first group with the given name from the named host.
    pub fn remove_group(&mut self, zone: &str, host: &str, group: &str) -> Option<Group> {
        let host = self.find_host_mut(zone, host)?;
        let idx = host
            .groups
            .iter()
            .position(|candidate| candidate.name == group)?;
        Some(host.groups.remove(idx))
    }

    /// Throw away all mutations and reload the seed dataset.
    pub fn reset(&mut self) {
        self.zones = seed::zones();
    }

    fn find_host_mut(&mut self, zone: &str, host: &str) -> Option<&mut Host> {
        self.zones
            .get_mut(zone)?
            .iter_mut()
            .find(|candidate| candidate.name == host)
    }
}
