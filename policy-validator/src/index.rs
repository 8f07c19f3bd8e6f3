//! Converts snapshot resources into the validator's model.

use crate::{
    k8s::{self, ResourceExt},
    Snapshot,
};
use mesh_policy_validator_core::{
    check, ClusterInfo, Destinations, Location, Namespaces, Operation, Policy, RegistryService,
    Rule, Service, ServiceEntry, ServiceEntryHostnames, Validation, VirtualService,
};

/// Destinations and authorization policies, indexed for validation.
#[derive(Debug)]
pub struct Index {
    cluster: ClusterInfo,
    namespaces: Namespaces,
    services: Vec<Service>,
    service_entries: ServiceEntryHostnames,
    virtual_services: Vec<VirtualService>,
    registry: Vec<RegistryService>,

    /// Ordered by namespace and name.
    policies: Vec<Policy>,
}

// === impl Index ===

impl Index {
    pub fn new(snapshot: &Snapshot, cluster: ClusterInfo) -> Self {
        let services = snapshot
            .services
            .iter()
            .filter_map(|svc| {
                Some(Service {
                    namespace: namespace_of("Service", svc)?,
                    name: svc.name_any(),
                })
            })
            .collect::<Vec<_>>();

        let service_entries = snapshot
            .service_entries
            .iter()
            .filter_map(service_entry)
            .collect::<Vec<_>>();

        let virtual_services = snapshot
            .virtual_services
            .iter()
            .filter_map(|vs| {
                Some(VirtualService {
                    namespace: namespace_of("VirtualService", vs)?,
                    hosts: vs.spec.hosts.clone(),
                })
            })
            .collect::<Vec<_>>();

        let mut policies = snapshot
            .authorization_policies
            .iter()
            .filter_map(policy)
            .collect::<Vec<_>>();
        policies.sort_by(|a, b| (&a.namespace, &a.name).cmp(&(&b.namespace, &b.name)));

        // Any namespace that holds a resource exists, even if the snapshot omits the namespace
        // itself.
        let mut namespaces = snapshot
            .namespaces
            .iter()
            .map(|ns| ns.name_any())
            .collect::<Namespaces>();
        namespaces.extend(services.iter().map(|svc| svc.namespace.clone()));
        namespaces.extend(service_entries.iter().map(|se| se.namespace.clone()));
        namespaces.extend(virtual_services.iter().map(|vs| vs.namespace.clone()));
        namespaces.extend(policies.iter().map(|p| p.namespace.clone()));

        let registry = snapshot
            .registry
            .iter()
            .map(|svc| RegistryService {
                hostname: svc.hostname.clone(),
            })
            .collect();

        let service_entries = ServiceEntryHostnames::new(&service_entries, &cluster);

        tracing::debug!(
            namespaces = namespaces.len(),
            services = services.len(),
            service_entry_hosts = service_entries.len(),
            virtual_services = virtual_services.len(),
            policies = policies.len(),
            "Indexed snapshot"
        );

        Self {
            cluster,
            namespaces,
            services,
            service_entries,
            virtual_services,
            registry,
            policies,
        }
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Validates the hosts of a policy against the destinations visible from its namespace.
    pub fn validate(&self, policy: &Policy) -> Validation {
        let destinations = Destinations {
            services: &self.services,
            service_entries: Some(&self.service_entries),
            virtual_services: &self.virtual_services,
            registry: &self.registry,
        };
        check(
            policy,
            &policy.namespace,
            &self.namespaces,
            &destinations,
            &self.cluster,
        )
    }
}

fn namespace_of<T: ResourceExt>(kind: &'static str, resource: &T) -> Option<String> {
    let namespace = resource.namespace();
    if namespace.is_none() {
        tracing::warn!(%kind, name = %resource.name_any(), "Ignoring resource without a namespace");
    }
    namespace
}

fn service_entry(se: &k8s::networking::ServiceEntry) -> Option<ServiceEntry> {
    let location = match se.spec.location.unwrap_or_default() {
        k8s::networking::Location::MeshExternal => Location::MeshExternal,
        k8s::networking::Location::MeshInternal => Location::MeshInternal,
    };
    Some(ServiceEntry {
        namespace: namespace_of("ServiceEntry", se)?,
        hosts: se.spec.hosts.clone(),
        export_to: se.spec.export_to.clone(),
        location,
    })
}

fn policy(ap: &k8s::security::AuthorizationPolicy) -> Option<Policy> {
    let rules = ap
        .spec
        .rules
        .iter()
        .map(|rule| Rule {
            to: rule
                .to
                .iter()
                .map(|to| Operation {
                    hosts: to
                        .operation
                        .as_ref()
                        .map(|op| op.hosts.clone())
                        .unwrap_or_default(),
                })
                .collect(),
        })
        .collect();

    Some(Policy {
        namespace: namespace_of("AuthorizationPolicy", ap)?,
        name: ap.name_any(),
        rules,
    })
}
