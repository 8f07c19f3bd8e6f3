use std::fmt;

/// Reported when a policy names a host that matches no known destination.
pub const NO_MATCHING_DESTINATION: &str = "authorizationpolicy.nodest.matchingregistry";

const NO_MATCHING_DESTINATION_MESSAGE: &str =
    "This host has no matching entry in the service registry";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
}

/// A single validation problem, located within a policy.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Finding {
    pub severity: Severity,
    pub code: &'static str,
    pub message: &'static str,
    pub path: HostPath,
}

/// Locates a host within an authorization policy's rules.
///
/// Formats as `spec/rules[<rule>]/to[<to>]/operation/hosts[<host>]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostPath {
    pub rule: usize,
    pub to: usize,
    pub host: usize,
}

// === impl Severity ===

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => "error".fmt(f),
        }
    }
}

// === impl Finding ===

impl Finding {
    pub fn no_matching_destination(path: HostPath) -> Self {
        Self {
            severity: Severity::Error,
            code: NO_MATCHING_DESTINATION,
            message: NO_MATCHING_DESTINATION_MESSAGE,
            path,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}]",
            self.path, self.message, self.code
        )
    }
}

// === impl HostPath ===

impl fmt::Display for HostPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "spec/rules[{}]/to[{}]/operation/hosts[{}]",
            self.rule, self.to, self.host
        )
    }
}
