use serde::{Deserialize, Serialize};

/// A service as reported by the control plane's registry debug endpoint (`/debug/registryz`).
///
/// In multi-cluster and federated meshes the registry includes services imported from peers that
/// have no local Kubernetes resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegistryService {
    pub hostname: String,

    #[serde(default, rename = "Attributes", alias = "attributes")]
    pub attributes: RegistryAttributes,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegistryAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_registry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}
