//! Rule: behaviors must document their parameters, and indexed access
//! must stay inside the documented range.
//!
//! Behavior invocation is not type-checked by the source language; the
//! argument bundle is untyped at the call boundary. The parameter
//! annotations are the contract, so an entry with no annotation (and
//! no derivable signature) is an error, and so is reading an index the
//! contract does not cover.

use regex::Regex;

use actor_lint_core::{Declaration, Diagnostics, NodeKind, Rule, RuleDescription, Snapshot};

/// Requires a parameter contract on every behavior and bounds-checks
/// `args[x: i]` access against it.
pub struct BehaviorParamsDocumented;

const DESC: RuleDescription = RuleDescription {
    identifier: "behavior_params_documented",
    name: "Behavior Parameter Violation",
    description: "Behaviors must document their parameters: \
                  // actor-lint: parameter <Type> - <Description>",
    trigger_kinds: &[NodeKind::Class, NodeKind::Extension],
    non_triggering_examples: &[
        "class StringBuilder: Actor {
    private var string: String = \"\"
    lazy var beAppend = ChainableBehavior(self) { (args: BehaviorArgs) in
        // actor-lint: parameter String - the string to be appended
        self.append(args[x: 0])
    }
    lazy var beSpace = ChainableBehavior(self) { (_: BehaviorArgs) in
        // actor-lint: parameter None
        self.append(space)
    }
    lazy var beTick = ChainableBehavior(self) { (_: BehaviorArgs) in
        self.tick()
    }
}
",
    ],
    triggering_examples: &[
        "class StringBuilder: Actor {
    lazy var beAppend = ChainableBehavior(self) { (args: BehaviorArgs) in
        // actor-lint: parameter String missing the separating dash
        self.append(args[x: 0])
    }
}
",
        "class StringBuilder: Actor {
    lazy var beAppend = ChainableBehavior(self) { (args: BehaviorArgs) in
        // actor-lint: parameter String - the string to be appended
        self.append(args[x: 0])
        self.append(args[x: 1])
    }
}
",
        "class StringBuilder: Actor {
    lazy var beAppend = ChainableBehavior(self) { (args: BehaviorArgs) in
        // actor-lint: parameter String - the string to be appended
        self.append(args[x: -25])
    }
}
",
        "class StringBuilder: Actor {
    lazy var beAppend = ChainableBehavior(self) { (foo: BehaviorArgs) in
        // actor-lint: parameter String - the string to be appended
        self.append(foo[x: 999])
    }
}
",
    ],
};

impl Rule for BehaviorParamsDocumented {
    fn description(&self) -> &RuleDescription {
        &DESC
    }

    fn precheck(&self, content: &str) -> bool {
        content.contains("Behavior")
    }

    fn check(&self, snapshot: &Snapshot, decl: &Declaration, diags: &mut Diagnostics) -> bool {
        let Some(name) = decl.name() else {
            return true;
        };

        let mut passed = true;
        for behavior in snapshot.behaviors_of(name) {
            if !behavior.declared_in(decl) {
                continue;
            }

            if behavior.params.is_empty() && !behavior.no_params && !behavior.any_params {
                diags.error(
                    decl.unit(),
                    Some(behavior.entry.offset()),
                    DESC.message(),
                );
                passed = false;
                continue;
            }

            if behavior.params.is_empty() {
                continue;
            }

            // Indexed access beyond the documented range.
            let pattern = format!(
                r"({})\s*\[\s*x\s*:\s*(-?\d+)\s*\]",
                regex::escape(&behavior.args_name)
            );
            let Ok(access) = Regex::new(&pattern) else {
                continue;
            };
            let limit = behavior.params.len() as i64;
            behavior.entry.for_each_match(&access, |found| {
                let Ok(index) = found.groups[2].parse::<i64>() else {
                    return;
                };
                if index < 0 || index >= limit {
                    diags.error(
                        decl.unit(),
                        Some(found.offset),
                        DESC.message_with("access to undocumented parameters is not allowed"),
                    );
                    passed = false;
                }
            });
        }
        passed
    }
}
