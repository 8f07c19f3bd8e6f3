//! Reads cluster resources from manifest files.

use crate::k8s::{
    self,
    networking::{ServiceEntry, VirtualService},
    security::AuthorizationPolicy,
    DynamicObject, ObjectMeta, RegistryService, ResourceExt,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Resources that may be referenced by authorization policies, along with the policies
/// themselves.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub namespaces: Vec<k8s::Namespace>,
    pub services: Vec<k8s::Service>,
    pub service_entries: Vec<ServiceEntry>,
    pub virtual_services: Vec<VirtualService>,
    pub authorization_policies: Vec<AuthorizationPolicy>,
    pub registry: Vec<RegistryService>,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid resource: {0}")]
    Json(#[from] serde_json::Error),
}

// === impl Snapshot ===

impl Snapshot {
    /// Reads a file of (possibly multi-document) YAML manifests.
    pub fn read_manifests(&mut self, path: &Path) -> Result<(), Error> {
        let yaml = read(path)?;
        self.add_manifests(&yaml)
    }

    /// Reads the JSON output of the control plane's registry debug endpoint.
    pub fn read_registry(&mut self, path: &Path) -> Result<(), Error> {
        let json = read(path)?;
        self.add_registry(&json)
    }

    pub fn add_manifests(&mut self, yaml: &str) -> Result<(), Error> {
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            let value = Value::deserialize(doc)?;
            if value.is_null() {
                continue;
            }
            self.add_resource(value)?;
        }
        Ok(())
    }

    pub fn add_registry(&mut self, json: &str) -> Result<(), Error> {
        let services = serde_json::from_str::<Vec<RegistryService>>(json)?;
        tracing::debug!(services = services.len(), "Read registry");
        self.registry.extend(services);
        Ok(())
    }

    fn add_resource(&mut self, mut value: Value) -> Result<(), Error> {
        let (group, kind) = match (
            value.get("apiVersion").and_then(Value::as_str),
            value.get("kind").and_then(Value::as_str),
        ) {
            (Some(api_version), Some(kind)) => {
                (api_group(api_version).to_string(), kind.to_string())
            }
            _ => {
                tracing::warn!("Ignoring document without an apiVersion and kind");
                return Ok(());
            }
        };

        if kind.ends_with("List") {
            if let Some(Value::Array(items)) = value.get_mut("items").map(Value::take) {
                for item in items {
                    self.add_resource(item)?;
                }
            }
            return Ok(());
        }

        match (group.as_str(), kind.as_str()) {
            ("", "Namespace") => self.namespaces.push(serde_json::from_value(value)?),
            ("", "Service") => self.services.push(serde_json::from_value(value)?),
            (k8s::networking::GROUP, "ServiceEntry") => {
                let (name, metadata, spec) = parse_custom(value)?;
                self.service_entries.push(ServiceEntry {
                    metadata,
                    ..ServiceEntry::new(&name, spec)
                });
            }
            (k8s::networking::GROUP, "VirtualService") => {
                let (name, metadata, spec) = parse_custom(value)?;
                self.virtual_services.push(VirtualService {
                    metadata,
                    ..VirtualService::new(&name, spec)
                });
            }
            (k8s::security::GROUP, "AuthorizationPolicy") => {
                let (name, metadata, spec) = parse_custom(value)?;
                self.authorization_policies.push(AuthorizationPolicy {
                    metadata,
                    ..AuthorizationPolicy::new(&name, spec)
                });
            }
            _ => tracing::debug!(%group, %kind, "Skipping unsupported resource"),
        }
        Ok(())
    }
}

fn read(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns the API group of an `apiVersion`; empty for the core group.
fn api_group(api_version: &str) -> &str {
    api_version
        .split_once('/')
        .map(|(group, _)| group)
        .unwrap_or_default()
}

/// Parses a custom resource's name, metadata, and spec, regardless of its API version.
///
/// A resource without a `spec` gets the default spec.
fn parse_custom<S: DeserializeOwned + Default>(
    value: Value,
) -> Result<(String, ObjectMeta, S), Error> {
    let mut obj = serde_json::from_value::<DynamicObject>(value)?;
    let spec = match obj.data.get_mut("spec").map(Value::take) {
        Some(spec) => serde_json::from_value(spec)?,
        None => S::default(),
    };
    Ok((obj.name_any(), obj.metadata, spec))
}
