#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Validates that the hosts named by mesh authorization policies refer to known destinations.
//!
//! A policy's `to[].operation.hosts` entries are resolved, in order, against:
//!
//! 1. Services in the policy's namespace (including `*` wildcards for that namespace);
//! 2. Service entry hostnames exported to the policy's namespace;
//! 3. Virtual service hostnames;
//! 4. Hostnames in the mesh registry, e.g. services imported from a federated mesh.
//!
//! A host that matches none of these produces an error [`Finding`].

mod checker;
mod cluster_info;
pub mod destination;
mod finding;
mod host;
pub mod host_match;
mod inventory;
mod policy;

pub use self::{
    checker::{check, walk_rules, Validation},
    cluster_info::ClusterInfo,
    destination::{
        Destinations, ExportTo, Location, RegistryService, Service, ServiceEntry,
        ServiceEntryHostnames, VirtualService,
    },
    finding::{Finding, HostPath, Severity, NO_MATCHING_DESTINATION},
    host::Host,
    host_match::HostMatch,
    inventory::{DestinationSource, HostRef, Inventory},
    policy::{Operation, Policy, Rule},
};

/// The names of namespaces that exist in the cluster.
pub type Namespaces = ahash::AHashSet<String>;
