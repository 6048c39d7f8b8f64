//! Rule: access levels and forwarding discipline for remote actors.
//!
//! Remote actors marshal messages across a process boundary, so the
//! conventions are stricter than for local actors: a `be` entry point
//! must contain nothing but a single `unsafeSend` forwarding call, its
//! `_be` implementation must be private, and every other instance
//! function follows the local-actor privacy rule with the same
//! `safe`/`unsafe` escapes.

use actor_lint_core::conventions::{
    BEHAVIOR_IMPL_PREFIX, BEHAVIOR_PREFIX, SAFE_PREFIX, UNSAFE_PREFIX, UNSAFE_SEND,
};
use actor_lint_core::{
    Accessibility, Declaration, Diagnostics, NodeKind, Rule, RuleDescription, Snapshot,
};

/// Access-level and forwarding checks for remote-actor classes.
pub struct RemoteActorPrivateFunctions;

const DESC: RuleDescription = RuleDescription {
    identifier: "remote_actor_private_functions",
    name: "Access Level Violation",
    description: "Non-private functions are not allowed in remote actors; make the function \
                  private or convert it to a behavior.",
    trigger_kinds: &[NodeKind::Class, NodeKind::Extension],
    non_triggering_examples: &[
        "class SomeClass {}\n",
        "class Echo: RemoteActor { private func doWork() { } }\n",
        "class Echo: RemoteActor {
    public func bePing() {
        unsafeSend {
            self._bePing()
        }
    }
    private func _bePing() {
        respond()
    }
}
",
    ],
    triggering_examples: &[
        "class Echo: RemoteActor { public func doWork() { } }\n",
        "class Echo: RemoteActor {
    public func bePing() {
        self._bePing()
    }
    private func _bePing() {
        respond()
    }
}
",
        "class Echo: RemoteActor {
    func _bePing() {
        respond()
    }
}
",
    ],
};

impl Rule for RemoteActorPrivateFunctions {
    fn description(&self) -> &RuleDescription {
        &DESC
    }

    fn check(&self, snapshot: &Snapshot, decl: &Declaration, diags: &mut Diagnostics) -> bool {
        if !snapshot.is_remote_actor(decl) {
            return true;
        }

        let mut passed = true;
        for function in decl.children() {
            if function.kind() != NodeKind::FunctionInstance {
                continue;
            }
            let name = function.name().unwrap_or_default();

            if name.starts_with(BEHAVIOR_IMPL_PREFIX) {
                if function.accessibility() != Accessibility::Private {
                    diags.error(
                        decl.unit(),
                        Some(function.offset()),
                        DESC.message_with("behavior implementations must be private"),
                    );
                    passed = false;
                }
                continue;
            }

            if name.starts_with(BEHAVIOR_PREFIX) {
                // Entry point: the body must be exactly one
                // unsafeSend forwarding call.
                let mut forwards = 0usize;
                let mut other = 0usize;
                for child in function.children() {
                    match child.kind() {
                        NodeKind::VarParameter => {}
                        NodeKind::CallExpr if child.name() == Some(UNSAFE_SEND) => forwards += 1,
                        _ => other += 1,
                    }
                }
                if forwards != 1 || other != 0 {
                    diags.error(
                        decl.unit(),
                        Some(function.offset()),
                        DESC.message_with(
                            "remote behaviors must wrap their contents in a call to unsafeSend()",
                        ),
                    );
                    passed = false;
                }
                continue;
            }

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
        verify_examples(&SwiftExtractor::new(), &RemoteActorPrivateFunctions).unwrap();
    }

    #[test]
    fn local_actors_are_ignored() {
        let outcome = check_example(
            &SwiftExtractor::new(),
            &RemoteActorPrivateFunctions,
            "class Local: Actor { public func foo() { } }\n",
        );
        assert!(outcome.passed);
    }

    #[test]
    fn entry_with_extra_statements_fails() {
        let source = "\
class Echo: RemoteActor {
    public func bePing() {
        log()
        unsafeSend {
            self._bePing()
        }
    }
}
";
        let outcome = check_example(&SwiftExtractor::new(), &RemoteActorPrivateFunctions, source);
        assert!(!outcome.passed);
        assert_eq!(outcome.diagnostics.len(), 1);
    }
}
