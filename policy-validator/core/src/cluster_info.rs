/// Holds cluster metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterInfo {
    /// E.g. "cluster.local"
    pub dns_domain: String,
}

impl Default for ClusterInfo {
    fn default() -> Self {
        Self {
            dns_domain: Self::DEFAULT_DNS_DOMAIN.to_string(),
        }
    }
}

impl ClusterInfo {
    pub const DEFAULT_DNS_DOMAIN: &'static str = "cluster.local";

    pub fn service_fqdn(&self, svc: &str, ns: &str) -> String {
        format!("{}.{}.svc.{}", svc, ns, self.dns_domain)
    }

    /// Returns true if `host` is a name within the cluster's DNS domain, e.g.
    /// `details.bookinfo.svc.cluster.local` or `*.svc.cluster.local`.
    pub fn is_cluster_local(&self, host: &str) -> bool {
        host.strip_suffix(self.dns_domain.as_str())
            .and_then(|name| name.strip_suffix('.'))
            .is_some_and(|name| !name.is_empty())
    }

    /// Splits a `<svc>.<ns>.svc.<dns-domain>` name into its service and namespace labels.
    pub fn parse_service_fqdn<'h>(&self, host: &'h str) -> Option<(&'h str, &'h str)> {
        let name = host
            .strip_suffix(self.dns_domain.as_str())?
            .strip_suffix(".svc.")?;
        match name.split_once('.') {
            Some((svc, ns)) if !svc.is_empty() && !ns.is_empty() && !ns.contains('.') => {
                Some((svc, ns))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_local_names() {
        let cluster = ClusterInfo::default();
        for host in [
            "details.bookinfo.svc.cluster.local",
            "*.bookinfo.svc.cluster.local",
            "*.svc.cluster.local",
            "*.cluster.local",
        ] {
            assert!(cluster.is_cluster_local(host), "{host}");
        }
        for host in [
            "details",
            "details.bookinfo",
            "cluster.local",
            ".cluster.local",
            "details.bookinfo.svc.cluster.localhost",
            "mycluster.local",
        ] {
            assert!(!cluster.is_cluster_local(host), "{host}");
        }

        let cluster = ClusterInfo {
            dns_domain: "example.org".to_string(),
        };
        assert!(cluster.is_cluster_local("details.bookinfo.svc.example.org"));
        assert!(!cluster.is_cluster_local("details.bookinfo.svc.cluster.local"));
    }
}
