use crate::{
    destination::{Destinations, RegistryService, Service, VirtualService},
    host::Host,
    host_match::HostMatch,
    ClusterInfo, Namespaces,
};
use ahash::AHashSet as HashSet;
use std::{borrow::Cow, fmt};

/// A kind of destination that hosts may resolve to.
pub trait DestinationSource: fmt::Debug + Send + Sync {
    fn kind(&self) -> &'static str;

    fn contains_match(&self, target: &HostRef<'_>) -> bool;
}

/// A host as written in a policy, along with its interpretation in the policy's namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostRef<'h> {
    pub raw: &'h str,
    pub host: Host<'h>,
    pub fqdn: Cow<'h, str>,
}

/// Destinations visible from a single namespace, indexed for host resolution.
#[derive(Debug)]
pub struct Inventory<'a> {
    namespace: &'a str,
    namespaces: &'a Namespaces,
    cluster: &'a ClusterInfo,
    sources: Vec<Box<dyn DestinationSource>>,
}

/// Services in the consuming namespace.
#[derive(Debug)]
struct LocalServices {
    namespace: String,
    names: HashSet<String>,
}

/// Declared hostnames, possibly wildcards.
#[derive(Debug)]
struct DeclaredHosts {
    kind: &'static str,
    hosts: Vec<HostMatch>,
}

/// Exact hostnames from the mesh registry.
#[derive(Debug)]
struct RegistryHosts(HashSet<String>);

// === impl HostRef ===

impl<'h> HostRef<'h> {
    pub fn parse(
        raw: &'h str,
        namespace: &'h str,
        namespaces: &Namespaces,
        cluster: &ClusterInfo,
    ) -> Self {
        let host = Host::parse(raw, namespace, namespaces, cluster);
        let fqdn = host.fqdn(cluster);
        Self { raw, host, fqdn }
    }

    /// The distinct names this host may be known by: as written, and fully qualified.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let fqdn = (self.fqdn != self.raw).then_some(self.fqdn.as_ref());
        std::iter::once(self.raw).chain(fqdn)
    }
}

// === impl Inventory ===

impl<'a> Inventory<'a> {
    pub fn build(
        namespace: &'a str,
        namespaces: &'a Namespaces,
        cluster: &'a ClusterInfo,
        destinations: &Destinations<'_>,
    ) -> Self {
        let services = LocalServices::new(namespace, destinations.services);

        let service_entries = DeclaredHosts {
            kind: "ServiceEntry",
            hosts: destinations
                .service_entries
                .into_iter()
                .flat_map(|hostnames| hostnames.visible_from(namespace))
                .map(HostMatch::parse)
                .collect(),
        };

        let virtual_services =
            DeclaredHosts::virtual_services(destinations.virtual_services, namespaces, cluster);

        let registry = RegistryHosts(
            destinations
                .registry
                .iter()
                .map(|RegistryService { hostname }| hostname.clone())
                .collect(),
        );

        tracing::debug!(
            %namespace,
            services = services.names.len(),
            service_entries = service_entries.hosts.len(),
            virtual_services = virtual_services.hosts.len(),
            registry = registry.0.len(),
            "Indexed destinations"
        );

        Self {
            namespace,
            namespaces,
            cluster,
            sources: vec![
                Box::new(services),
                Box::new(service_entries),
                Box::new(virtual_services),
                Box::new(registry),
            ],
        }
    }

    pub fn namespace(&self) -> &str {
        self.namespace
    }

    /// Returns true if `host` matches at least one destination visible from this namespace.
    pub fn resolve(&self, host: &str) -> bool {
        let target = HostRef::parse(host, self.namespace, self.namespaces, self.cluster);
        match self.sources.iter().find(|s| s.contains_match(&target)) {
            Some(source) => {
                tracing::trace!(%host, kind = source.kind(), "Resolved host");
                true
            }
            None => false,
        }
    }
}

// === impl LocalServices ===

impl LocalServices {
    fn new(namespace: &str, services: &[Service]) -> Self {
        let names = services
            .iter()
            .filter(|svc| svc.namespace == namespace)
            .map(|svc| svc.name.clone())
            .collect();
        Self {
            namespace: namespace.to_string(),
            names,
        }
    }
}

impl DestinationSource for LocalServices {
    fn kind(&self) -> &'static str {
        "Service"
    }

    fn contains_match(&self, target: &HostRef<'_>) -> bool {
        match target.host {
            Host::Cluster { service, namespace } if namespace == self.namespace => {
                target.host.is_wildcard_service() || self.names.contains(service)
            }
            _ => false,
        }
    }
}

// === impl DeclaredHosts ===

impl DeclaredHosts {
    /// Virtual service hosts are qualified relative to the virtual service's own namespace.
    fn virtual_services(
        virtual_services: &[VirtualService],
        namespaces: &Namespaces,
        cluster: &ClusterInfo,
    ) -> Self {
        let hosts = virtual_services
            .iter()
            .flat_map(|vs| {
                vs.hosts.iter().map(move |host| {
                    if host == "*" {
                        return HostMatch::Any;
                    }
                    let fqdn = Host::parse(host, &vs.namespace, namespaces, cluster).fqdn(cluster);
                    HostMatch::parse(&fqdn)
                })
            })
            .collect();
        Self {
            kind: "VirtualService",
            hosts,
        }
    }
}

impl DestinationSource for DeclaredHosts {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn contains_match(&self, target: &HostRef<'_>) -> bool {
        target
            .names()
            .any(|name| self.hosts.iter().any(|host| host.matches(name)))
    }
}

// === impl RegistryHosts ===

impl DestinationSource for RegistryHosts {
    fn kind(&self) -> &'static str {
        "RegistryService"
    }

    fn contains_match(&self, target: &HostRef<'_>) -> bool {
        target.names().any(|name| self.0.contains(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::{Location, ServiceEntry, ServiceEntryHostnames};

    fn namespaces() -> Namespaces {
        ["bookinfo", "bookinfo2", "bookinfo3", "foo"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn host_names_are_distinct() {
        let nss = namespaces();
        let info = ClusterInfo::default();

        let short = HostRef::parse("details", "bookinfo", &nss, &info);
        assert_eq!(
            short.names().collect::<Vec<_>>(),
            vec!["details", "details.bookinfo.svc.cluster.local"]
        );

        let fqdn = HostRef::parse("details.bookinfo.svc.cluster.local", "bookinfo", &nss, &info);
        assert_eq!(
            fqdn.names().collect::<Vec<_>>(),
            vec!["details.bookinfo.svc.cluster.local"]
        );

        let external = HostRef::parse("wikipedia.org", "bookinfo", &nss, &info);
        assert_eq!(external.names().collect::<Vec<_>>(), vec!["wikipedia.org"]);
    }

    #[test]
    fn services_resolve_in_their_own_namespace() {
        let nss = namespaces();
        let info = ClusterInfo::default();
        let services = [
            Service {
                name: "details".to_string(),
                namespace: "bookinfo".to_string(),
            },
            Service {
                name: "ratings".to_string(),
                namespace: "bookinfo2".to_string(),
            },
        ];
        let destinations = Destinations {
            services: &services,
            ..Default::default()
        };
        let inventory = Inventory::build("bookinfo", &nss, &info, &destinations);

        assert!(inventory.resolve("details"));
        assert!(inventory.resolve("details.bookinfo"));
        assert!(inventory.resolve("details.bookinfo.svc.cluster.local"));
        assert!(!inventory.resolve("ratings"));
        assert!(!inventory.resolve("ratings.bookinfo2"));
        assert!(!inventory.resolve("ratings.bookinfo2.svc.cluster.local"));
    }

    #[test]
    fn wildcards_resolve_only_in_the_policy_namespace() {
        let nss = namespaces();
        let info = ClusterInfo::default();
        let inventory = Inventory::build("bookinfo", &nss, &info, &Destinations::default());

        assert!(inventory.resolve("*"));
        assert!(inventory.resolve("*.bookinfo"));
        assert!(inventory.resolve("*.bookinfo.svc.cluster.local"));
        assert!(!inventory.resolve("*.bookinfo2"));
        assert!(!inventory.resolve("*.bookinfo2.svc.cluster.local"));
    }

    #[test]
    fn service_entries_respect_export_scope() {
        let nss = namespaces();
        let info = ClusterInfo::default();
        let entry = ServiceEntry {
            namespace: "bookinfo3".to_string(),
            hosts: vec!["www.myhost.com".to_string()],
            export_to: vec!["bookinfo2".to_string()],
            location: Location::MeshExternal,
        };
        let hostnames = ServiceEntryHostnames::new([&entry], &info);
        let destinations = Destinations {
            service_entries: Some(&hostnames),
            ..Default::default()
        };

        for ns in ["bookinfo2", "bookinfo3"] {
            let inventory = Inventory::build(ns, &nss, &info, &destinations);
            assert!(inventory.resolve("www.myhost.com"), "{ns}");
        }
        let inventory = Inventory::build("bookinfo", &nss, &info, &destinations);
        assert!(!inventory.resolve("www.myhost.com"));
    }

    #[test]
    fn virtual_service_hosts_are_qualified_in_their_namespace() {
        let nss = namespaces();
        let info = ClusterInfo::default();
        let virtual_services = [VirtualService {
            namespace: "foo".to_string(),
            hosts: vec!["reviews".to_string(), "*.example.com".to_string()],
        }];
        let destinations = Destinations {
            virtual_services: &virtual_services,
            ..Default::default()
        };
        let inventory = Inventory::build("bookinfo", &nss, &info, &destinations);

        assert!(inventory.resolve("reviews.foo"));
        assert!(inventory.resolve("reviews.foo.svc.cluster.local"));
        assert!(inventory.resolve("foo-dev.example.com"));
        assert!(!inventory.resolve("reviews"));
        assert!(!inventory.resolve("example.com"));
    }

    #[test]
    fn virtual_service_catch_all() {
        let nss = namespaces();
        let info = ClusterInfo::default();
        let virtual_services = [VirtualService {
            namespace: "foo".to_string(),
            hosts: vec!["*".to_string()],
        }];
        let destinations = Destinations {
            virtual_services: &virtual_services,
            ..Default::default()
        };
        let inventory = Inventory::build("bookinfo", &nss, &info, &destinations);
        assert!(inventory.resolve("anything.example.com"));
    }

    #[test]
    fn registry_matches_qualified_names_exactly() {
        let nss = namespaces();
        let info = ClusterInfo::default();
        let registry = [RegistryService {
            hostname: "ratings.bookinfo.svc.cluster.local".to_string(),
        }];
        let destinations = Destinations {
            registry: &registry,
            ..Default::default()
        };

        let inventory = Inventory::build("bookinfo", &nss, &info, &destinations);
        assert!(inventory.resolve("ratings.bookinfo.svc.cluster.local"));
        assert!(inventory.resolve("ratings"));
        assert!(!inventory.resolve("ratings2.bookinfo.svc.cluster.local"));
        assert!(!inventory.resolve("*.bookinfo2.svc.cluster.local"));

        // Registry entries are not scoped to a namespace.
        let inventory = Inventory::build("test", &nss, &info, &destinations);
        assert!(inventory.resolve("ratings.bookinfo.svc.cluster.local"));
    }
}
