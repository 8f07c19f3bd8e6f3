use crate::WorkloadSelector;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Adds hosts to the mesh's service registry, e.g. for services outside of the cluster.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, CustomResource, Deserialize, Serialize, JsonSchema,
)]
#[kube(
    group = "networking.istio.io",
    version = "v1",
    kind = "ServiceEntry",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntrySpec {
    /// Hostnames associated with the entry; may be prefixed with a wildcard.
    #[serde(default)]
    pub hosts: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ServicePort>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,

    /// Namespaces to which the entry is exported. Unset exports to all namespaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub export_to: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload_selector: Option<WorkloadSelector>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<u32>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum Location {
    #[default]
    #[serde(rename = "MESH_EXTERNAL")]
    MeshExternal,
    #[serde(rename = "MESH_INTERNAL")]
    MeshInternal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resolution {
    None,
    Static,
    Dns,
    DnsRoundRobin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_spec() {
        let spec = serde_yaml::from_str::<ServiceEntrySpec>(
            r#"
hosts: ["details.bookinfo2.svc.cluster.local"]
location: MESH_INTERNAL
resolution: DNS_ROUND_ROBIN
exportTo: ["."]
ports:
- number: 9080
  name: http
  protocol: HTTP
"#,
        )
        .expect("spec must parse");
        assert_eq!(spec.location, Some(Location::MeshInternal));
        assert_eq!(spec.resolution, Some(Resolution::DnsRoundRobin));
        assert_eq!(spec.export_to, vec!["."]);
        assert_eq!(spec.ports[0].number, 9080);

        let spec = serde_yaml::from_str::<ServiceEntrySpec>("hosts: [wikipedia.org]")
            .expect("spec must parse");
        assert_eq!(spec.location, None);
        assert!(spec.export_to.is_empty());
    }
}
