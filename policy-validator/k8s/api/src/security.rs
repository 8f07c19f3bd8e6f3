pub mod authorization_policy;

pub use self::authorization_policy::{
    Action, AuthorizationPolicy, AuthorizationPolicySpec, Condition, Operation, Rule, RuleFrom,
    RuleTo, Source,
};

pub const GROUP: &str = "security.istio.io";
