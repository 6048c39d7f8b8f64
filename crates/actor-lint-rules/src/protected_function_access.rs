//! Rule: `protected_` functions may only be called through `self`.
//!
//! The `protected_` convention marks members an actor exposes to its
//! own subclass hierarchy. A qualified call through any receiver other
//! than `self` is external access.

use actor_lint_core::conventions::PROTECTED_PREFIX;
use actor_lint_core::{Declaration, Diagnostics, NodeKind, Rule, RuleDescription, Snapshot};

/// Flags qualified calls to `protected_` functions from outside the
/// owning object.
pub struct ProtectedFunctionAccess;

const DESC: RuleDescription = RuleDescription {
    identifier: "protected_function_access",
    name: "Protected Access Violation",
    description: "Protected functions may not be called outside of the actor.",
    trigger_kinds: &[NodeKind::CallExpr],
    non_triggering_examples: &[
        "class SomeClass {}\n",
        "class SomeActor: Actor {}\n",
        "class SomeActor: Actor {
    func protected_foo() {
        show()
    }
    override func protected_flowProcess() {
        protected_foo()
        self.protected_foo()
    }
}
",
    ],
    triggering_examples: &[
        "class SomeActor: Actor {
    func protected_foo() {
        show()
    }
}
let a = SomeActor()
a.protected_foo()
",
        "let actor = WhoseCallWasThisAnyway()
actor.printFoo()
actor.protected_printBar()
actor.wait(0)
",
    ],
};

impl Rule for ProtectedFunctionAccess {
    fn description(&self) -> &RuleDescription {
        &DESC
    }

    fn precheck(&self, content: &str) -> bool {
        content.contains(PROTECTED_PREFIX)
    }

    fn check(&self, _snapshot: &Snapshot, decl: &Declaration, diags: &mut Diagnostics) -> bool {
        let Some(callee) = decl.name() else {
            return true;
        };
        if callee.contains(PROTECTED_PREFIX)
            && !callee.starts_with(PROTECTED_PREFIX)
            && !callee.starts_with("self.")
        {
            diags.error(decl.unit(), Some(decl.offset()), DESC.message());
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_lint_core::harness::{check_example, verify_examples};
    use actor_lint_syntax::SwiftExtractor;

    #[test]
    fn example_contract() {
        verify_examples(&SwiftExtractor::new(), &ProtectedFunctionAccess).unwrap();
    }

    #[test]
    fn self_qualified_calls_pass() {
        let outcome = check_example(
            &SwiftExtractor::new(),
            &ProtectedFunctionAccess,
            "class A: Actor { func protected_go() { self.protected_go() } }\n",
        );
        assert!(outcome.passed);
    }

    #[test]
    fn external_call_is_reported_at_the_call_site() {
        let source = "let a = SomeActor()\na.protected_go()\n";
        let outcome = check_example(&SwiftExtractor::new(), &ProtectedFunctionAccess, source);
        assert!(!outcome.passed);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].line, Some(2));
    }
}
