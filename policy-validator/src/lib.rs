#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Validates Istio authorization policies against a snapshot of cluster resources.
//!
//! Every host named in a policy's `rules[].to[].operation.hosts` must match a service in the
//! policy's namespace, an exported service entry, a virtual service, or a service in the mesh
//! registry. Hosts that match nothing are reported as errors.

mod cli;
pub mod index;
pub mod snapshot;

pub use self::{cli::Args, index::Index, snapshot::Snapshot};
pub use mesh_policy_validator_k8s_api as k8s;
