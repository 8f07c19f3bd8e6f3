use crate::{Index, Snapshot};
use anyhow::{Context, Result};
use clap::Parser;
use mesh_policy_validator_core::{ClusterInfo, Finding, Policy};
use std::{io::Write, path::PathBuf, process::ExitCode};

#[derive(Debug, Parser)]
#[clap(
    name = "mesh-policy-validator",
    about = "Checks that authorization policies only name hosts that exist in the mesh"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "mesh_policy_validator=info,warn",
        env = "MESH_POLICY_VALIDATOR_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(long, default_value = ClusterInfo::DEFAULT_DNS_DOMAIN)]
    cluster_domain: String,

    /// The JSON output of the control plane's `/debug/registryz` endpoint, listing services
    /// imported from other clusters.
    #[clap(long)]
    registry: Option<PathBuf>,

    /// Only validates policies in this namespace.
    #[clap(long, short)]
    namespace: Option<String>,

    /// YAML manifests describing the cluster's namespaces, services, service entries, virtual
    /// services, and authorization policies.
    #[clap(required = true)]
    manifests: Vec<PathBuf>,
}

// === impl Args ===

impl Args {
    pub fn parse_and_run() -> Result<ExitCode> {
        Self::parse().run()
    }

    /// Validates every selected policy, writing findings to stdout.
    ///
    /// Fails with a non-zero exit code if any policy has a finding.
    pub fn run(self) -> Result<ExitCode> {
        let Self {
            log_level,
            log_format,
            cluster_domain,
            registry,
            namespace,
            manifests,
        } = self;

        log_format.try_init(log_level)?;

        let mut snapshot = Snapshot::default();
        for path in &manifests {
            snapshot
                .read_manifests(path)
                .with_context(|| format!("loading {}", path.display()))?;
        }
        if let Some(path) = registry {
            snapshot
                .read_registry(&path)
                .with_context(|| format!("loading registry {}", path.display()))?;
        }

        let index = Index::new(
            &snapshot,
            ClusterInfo {
                dns_domain: cluster_domain,
            },
        );

        let mut stdout = std::io::stdout().lock();
        let mut invalid = 0;
        let mut checked = 0;
        for policy in index.policies() {
            if namespace.as_ref().is_some_and(|ns| *ns != policy.namespace) {
                continue;
            }

            checked += 1;
            let validation = index.validate(policy);
            if validation.valid {
                tracing::debug!(ns = %policy.namespace, name = %policy.name, "Policy is valid");
                continue;
            }

            invalid += 1;
            tracing::info!(
                ns = %policy.namespace,
                name = %policy.name,
                findings = validation.findings.len(),
                "Policy has unresolvable hosts"
            );
            write_findings(&mut stdout, policy, &validation.findings)?;
        }

        tracing::info!(checked, invalid, "Validated authorization policies");
        if invalid == 0 {
            Ok(ExitCode::SUCCESS)
        } else {
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Writes one `<severity> <ns>/<name> <path>: <message> [<code>]` line per finding.
fn write_findings(out: &mut impl Write, policy: &Policy, findings: &[Finding]) -> Result<()> {
    for finding in findings {
        writeln!(
            out,
            "{} {}/{} {}",
            finding.severity, policy.namespace, policy.name, finding
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_args() {
        let args = Args::try_parse_from([
            "mesh-policy-validator",
            "--cluster-domain=example.org",
            "--registry",
            "registryz.json",
            "-n",
            "bookinfo",
            "a.yaml",
            "b.yaml",
        ])
        .expect("args must parse");
        assert_eq!(args.cluster_domain, "example.org");
        assert_eq!(args.registry, Some(PathBuf::from("registryz.json")));
        assert_eq!(args.namespace.as_deref(), Some("bookinfo"));
        assert_eq!(
            args.manifests,
            vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]
        );
    }

    #[test]
    fn reports_findings() {
        use mesh_policy_validator_core::HostPath;

        let policy = Policy {
            name: "typos".to_string(),
            namespace: "bookinfo".to_string(),
            rules: vec![],
        };
        let findings = [
            Finding::no_matching_destination(HostPath {
                rule: 0,
                to: 1,
                host: 2,
            }),
            Finding::no_matching_destination(HostPath {
                rule: 1,
                to: 0,
                host: 0,
            }),
        ];

        let mut out = Vec::new();
        write_findings(&mut out, &policy, &findings).expect("write must succeed");
        assert_eq!(
            String::from_utf8(out).expect("output must be UTF-8"),
            "error bookinfo/typos spec/rules[0]/to[1]/operation/hosts[2]: \
             This host has no matching entry in the service registry \
             [authorizationpolicy.nodest.matchingregistry]\n\
             error bookinfo/typos spec/rules[1]/to[0]/operation/hosts[0]: \
             This host has no matching entry in the service registry \
             [authorizationpolicy.nodest.matchingregistry]\n"
        );
    }

    #[test]
    fn requires_manifests() {
        Args::try_parse_from(["mesh-policy-validator"]).expect_err("manifests are required");
    }
}
