/// Matches a hostname against a declared hostname or wildcard domain.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HostMatch {
    /// `*`: matches every host.
    Any,

    /// An exact, case-sensitive match.
    Exact(String),

    /// `*.<suffix>`: matches hosts with at least one label before the suffix.
    ///
    /// Labels are stored in reverse order so that matching walks from the top-level domain.
    Suffix { reverse_labels: Vec<String> },
}

/// Returns true if `candidate` is matched by `pattern`.
///
/// The pattern is the declared side and may carry a wildcard.
pub fn matches(pattern: &str, candidate: &str) -> bool {
    HostMatch::parse(pattern).matches(candidate)
}

// === impl HostMatch ===

impl HostMatch {
    pub fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            return Self::Any;
        }

        match pattern.strip_prefix("*.") {
            Some(suffix) if !suffix.is_empty() => Self::Suffix {
                reverse_labels: suffix.rsplit('.').map(ToOwned::to_owned).collect(),
            },
            _ => Self::Exact(pattern.to_owned()),
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(host) => host == candidate,
            Self::Suffix { reverse_labels } => {
                let mut labels = candidate.rsplit('.');
                for expected in reverse_labels {
                    match labels.next() {
                        Some(label) if label == expected => {}
                        _ => return false,
                    }
                }
                // The suffix alone is not matched; a leading label is required.
                matches!(labels.next(), Some(label) if !label.is_empty())
            }
        }
    }
}
