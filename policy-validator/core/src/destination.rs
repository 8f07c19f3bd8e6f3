//! Destinations that an authorization policy's hosts may refer to.
//!
//! These are plain snapshots of cluster resources; see [`crate::Inventory`] for how they are
//! indexed for a single consuming namespace.

use crate::ClusterInfo;
use std::collections::{btree_map::Entry, BTreeMap, BTreeSet};

/// A Kubernetes service.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Service {
    pub name: String,
    pub namespace: String,
}

/// Whether a service entry's endpoints are part of the mesh.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Location {
    #[default]
    MeshExternal,
    MeshInternal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceEntry {
    pub namespace: String,
    pub hosts: Vec<String>,

    /// Namespaces the entry is exported to. Empty means all namespaces.
    pub export_to: Vec<String>,

    pub location: Location,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VirtualService {
    pub namespace: String,
    pub hosts: Vec<String>,
}

/// A service known to the mesh's registry, possibly imported from a federated mesh.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegistryService {
    pub hostname: String,
}

/// The namespaces from which a service entry hostname is visible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportTo {
    All,
    Namespaces(BTreeSet<String>),
}

/// Service entry hostnames, flattened across all service entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceEntryHostnames(BTreeMap<String, ExportTo>);

/// The destinations known to the cluster. Unset sources contribute no matches.
#[derive(Copy, Clone, Debug, Default)]
pub struct Destinations<'a> {
    pub services: &'a [Service],
    pub service_entries: Option<&'a ServiceEntryHostnames>,
    pub virtual_services: &'a [VirtualService],
    pub registry: &'a [RegistryService],
}

// === impl ExportTo ===

impl ExportTo {
    const ALL: &'static str = "*";
    const SAME_NAMESPACE: &'static str = ".";
    const PRIVATE: &'static str = "~";

    /// Resolves a service entry's `exportTo` list. The owning namespace can always see the entry.
    pub fn resolve<S: AsRef<str>>(owner: &str, export_to: &[S]) -> Self {
        if export_to.is_empty() || export_to.iter().any(|ns| ns.as_ref() == Self::ALL) {
            return Self::All;
        }

        let mut namespaces = BTreeSet::new();
        namespaces.insert(owner.to_string());
        for ns in export_to {
            match ns.as_ref() {
                Self::SAME_NAMESPACE | Self::PRIVATE => {}
                ns => {
                    namespaces.insert(ns.to_string());
                }
            }
        }
        Self::Namespaces(namespaces)
    }

    pub fn includes(&self, namespace: &str) -> bool {
        match self {
            Self::All => true,
            Self::Namespaces(namespaces) => namespaces.contains(namespace),
        }
    }

    fn merge(&mut self, other: Self) {
        match (&mut *self, other) {
            (Self::All, _) => {}
            (this, Self::All) => *this = Self::All,
            (Self::Namespaces(namespaces), Self::Namespaces(other)) => namespaces.extend(other),
        }
    }
}

// === impl ServiceEntryHostnames ===

impl ServiceEntryHostnames {
    /// Flattens the hosts of all service entries.
    ///
    /// Mesh-internal entries must use names within the cluster's DNS domain; other hosts on those
    /// entries are dropped.
    pub fn new<'e>(
        entries: impl IntoIterator<Item = &'e ServiceEntry>,
        cluster: &ClusterInfo,
    ) -> Self {
        let mut hostnames = Self::default();
        for entry in entries {
            let export_to = ExportTo::resolve(&entry.namespace, &entry.export_to);
            for host in &entry.hosts {
                if entry.location == Location::MeshInternal && !cluster.is_cluster_local(host) {
                    tracing::debug!(
                        namespace = %entry.namespace,
                        %host,
                        "Ignoring mesh-internal service entry host that is not fully qualified"
                    );
                    continue;
                }
                hostnames.insert(host.clone(), export_to.clone());
            }
        }
        hostnames
    }

    pub fn insert(&mut self, host: String, export_to: ExportTo) {
        match self.0.entry(host) {
            Entry::Vacant(entry) => {
                entry.insert(export_to);
            }
            Entry::Occupied(mut entry) => entry.get_mut().merge(export_to),
        }
    }

    /// Iterates over the hostnames visible from `namespace`.
    pub fn visible_from<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(_, export_to)| export_to.includes(namespace))
            .map(|(host, _)| host.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
