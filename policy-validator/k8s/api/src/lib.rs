#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Kubernetes and Istio resources that describe mesh destinations and authorization policies.

pub mod networking;
pub mod registry;
pub mod security;

pub use self::registry::RegistryService;
pub use k8s_openapi::api::{
    self,
    core::v1::{Namespace, Service},
};
pub use kube::{
    core::{DynamicObject, ObjectMeta},
    ResourceExt,
};

/// Selects workloads by label.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSelector {
    #[serde(default, skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    pub match_labels: std::collections::BTreeMap<String, String>,
}
