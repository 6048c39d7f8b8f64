//! The default rule set.

use std::sync::Arc;

use actor_lint_core::RuleRef;

use crate::{
    ActorPrivateFunctions, ActorPrivateState, BehaviorCallArguments, BehaviorNaming,
    BehaviorParamsDocumented, ProtectedFunctionAccess, ProtectedStateAccess,
    RemoteActorPrivateFunctions,
};

/// Every built-in rule, in registration order.
#[must_use]
pub fn default_rules() -> Vec<RuleRef> {
    vec![
        Arc::new(ActorPrivateFunctions),
        Arc::new(RemoteActorPrivateFunctions),
        Arc::new(ActorPrivateState),
        Arc::new(ProtectedFunctionAccess),
        Arc::new(ProtectedStateAccess),
        Arc::new(BehaviorNaming),
        Arc::new(BehaviorParamsDocumented),
        Arc::new(BehaviorCallArguments),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identifiers_are_unique() {
        let rules = default_rules();
        let ids: HashSet<&str> = rules.iter().map(|r| r.description().identifier).collect();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn every_rule_passes_its_own_examples() {
        let extractor = actor_lint_syntax::SwiftExtractor::new();
        for rule in default_rules() {
            actor_lint_core::harness::verify_examples(&extractor, rule.as_ref())
                .unwrap_or_else(|err| panic!("{err}"));
        }
    }
}
