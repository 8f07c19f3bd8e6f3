use crate::{ClusterInfo, Namespaces};
use std::borrow::Cow;

/// A host reference, interpreted relative to the namespace that declares it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Host<'h> {
    /// Names a service (or every service, when the service label is `*`) in a cluster namespace.
    ///
    /// Written as `svc`, `svc.ns` (when `ns` is a known namespace) or `svc.ns.svc.<dns-domain>`.
    Cluster { service: &'h str, namespace: &'h str },

    /// Any other hostname, e.g. an external domain or a name imported from another mesh.
    Other(&'h str),
}

// === impl Host ===

impl<'h> Host<'h> {
    pub fn parse(
        host: &'h str,
        namespace: &'h str,
        namespaces: &Namespaces,
        cluster: &ClusterInfo,
    ) -> Self {
        if !host.contains('.') {
            return Self::Cluster {
                service: host,
                namespace,
            };
        }

        if let Some((svc, ns)) = cluster.parse_service_fqdn(host) {
            return Self::Cluster {
                service: svc,
                namespace: ns,
            };
        }

        // `svc.ns` is only a service reference when `ns` actually exists; `wikipedia.org` is not.
        if let Some((svc, ns)) = host.split_once('.') {
            if !svc.is_empty() && !ns.contains('.') && namespaces.contains(ns) {
                return Self::Cluster {
                    service: svc,
                    namespace: ns,
                };
            }
        }

        Self::Other(host)
    }

    /// Returns true if this host selects every service in a namespace.
    pub fn is_wildcard_service(&self) -> bool {
        matches!(self, Self::Cluster { service, .. } if *service == "*")
    }

    /// The canonical name of this host: the service FQDN for cluster hosts, otherwise the host
    /// as written.
    pub fn fqdn(&self, cluster: &ClusterInfo) -> Cow<'h, str> {
        match self {
            Self::Cluster { service, namespace } => {
                Cow::Owned(cluster.service_fqdn(service, namespace))
            }
            Self::Other(host) => Cow::Borrowed(*host),
        }
    }
}
