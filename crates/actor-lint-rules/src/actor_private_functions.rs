//! Rule: instance functions of an actor-derived class must be
//! private.
//!
//! Anything non-private is callable from outside the actor, which
//! bypasses the mailbox and breaks the single-threaded-state
//! guarantee. Constructors are exempt, as are functions using the
//! `safe`/`unsafe` escape prefixes (other rules police those).

use actor_lint_core::conventions::{SAFE_PREFIX, UNSAFE_PREFIX};
use actor_lint_core::{
    Accessibility, Declaration, Diagnostics, NodeKind, Rule, RuleDescription, Snapshot,
};

/// Requires every instance function in an actor to be private.
pub struct ActorPrivateFunctions;

const DESC: RuleDescription = RuleDescription {
    identifier: "actor_private_functions",
    name: "Access Level Violation",
    description: "Non-private functions are not allowed in actors; make the function private \
                  or convert it to a behavior.",
    trigger_kinds: &[NodeKind::Class, NodeKind::Extension],
    non_triggering_examples: &[
        "class SomeClass {}\n",
        "class SomeActor: Actor {}\n",
        "class SomeActor: Actor { private func foo() { } }\n",
        "class SomeActor: Actor { init(_ data: RaceData) { self.data = data } }\n",
        "class SomeActor: Actor { override func safeFlowProcess() { } }\n",
        "class SomeActor: Actor { func unsafeCancel() { } }\n",
        "class SomeClass { public func foo() { } }\n",
    ],
    triggering_examples: &[
        "class SomeActor: Actor { public func foo() { } }\n",
        "class SomeActor: Actor { fileprivate func foo() { } }\n",
        "class SomeActor: Actor { internal func foo() { } }\n",
        "class SomeActor: Actor { func foo() { } }\n",
        "class SomeActor: Actor { override func flowProcess() { } }\n",
    ],
};

impl Rule for ActorPrivateFunctions {
    fn description(&self) -> &RuleDescription {
        &DESC
    }

    fn check(&self, snapshot: &Snapshot, decl: &Declaration, diags: &mut Diagnostics) -> bool {
        if !snapshot.is_actor(decl) {
            return true;
        }

        let mut passed = true;
        for function in decl.children() {
            if function.kind() != NodeKind::FunctionInstance {
                continue;
            }
            let name = function.name().unwrap_or_default();
            if name.starts_with(SAFE_PREFIX) || name.starts_with(UNSAFE_PREFIX) {
                continue;
            }
            if function.accessibility() != Accessibility::Private {
                diags.error(decl.unit(), Some(function.offset()), DESC.message());
                passed = false;
            }
        }
        passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_lint_core::harness::{check_example, verify_examples};
    use actor_lint_syntax::SwiftExtractor;

    #[test]
    fn example_contract() {
        verify_examples(&SwiftExtractor::new(), &ActorPrivateFunctions).unwrap();
    }

    #[test]
    fn reports_exactly_one_error_for_one_public_function() {
        let outcome = check_example(
            &SwiftExtractor::new(),
            &ActorPrivateFunctions,
            "class Foo: Actor { public func bar() {} }\n",
        );
        assert!(!outcome.passed);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(outcome.diagnostics[0].to_string().contains("error"));
    }

    #[test]
    fn resolves_actors_through_inheritance_hops() {
        let outcome = check_example(
            &SwiftExtractor::new(),
            &ActorPrivateFunctions,
            "class Base: Actor {}\nclass Leaf: Base { public func bar() {} }\n",
        );
        assert!(!outcome.passed);
        assert_eq!(outcome.diagnostics.len(), 1);
    }

    #[test]
    fn private_state_is_unrelated() {
        let outcome = check_example(
            &SwiftExtractor::new(),
            &ActorPrivateFunctions,
            "class Foo: Actor { private var x: Int = 0 }\n",
        );
        assert!(outcome.passed);
        assert!(outcome.diagnostics.is_empty());
    }
}
