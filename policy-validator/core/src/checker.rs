use crate::{ClusterInfo, Destinations, Finding, HostPath, Inventory, Namespaces, Policy};


/// The outcome of validating a policy's hosts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Validation {
    pub findings: Vec<Finding>,
    pub valid: bool,
}

/// Checks that every host referenced by `policy` matches a destination visible from `namespace`.
pub fn check(
    policy: &Policy,
    namespace: &str,
    namespaces: &Namespaces,
    destinations: &Destinations<'_>,
    cluster: &ClusterInfo,
) -> Validation {
    let inventory = Inventory::build(namespace, namespaces, cluster, destinations);
    let findings = walk_rules(policy, &inventory);
    let valid = findings.is_empty();
    Validation { findings, valid }
}

/// Resolves each of the policy's hosts, returning a finding for every host that matches nothing.
///
/// Findings are ordered by rule, operation, and host.
pub fn walk_rules(policy: &Policy, inventory: &Inventory<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (rule, r) in policy.rules.iter().enumerate() {
        for (to, op) in r.to.iter().enumerate() {
            for (idx, host) in op.hosts.iter().enumerate() {
                if inventory.resolve(host) {
                    continue;
                }

                let path = HostPath { rule, to, host: idx };
                tracing::debug!(
                    policy = %policy.name,
                    namespace = %inventory.namespace(),
                    %host,
                    %path,
                    "No destination matches host"
                );
                findings.push(Finding::no_matching_destination(path));
            }
        }
    }
    findings
}
