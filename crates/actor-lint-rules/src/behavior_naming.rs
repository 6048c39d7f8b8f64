//! Rule: behavior entries must carry the `be` prefix.
//!
//! A behavior call reads exactly like a function call at the call
//! site; the naming convention is the only visual cue that the call is
//! asynchronous. `actor.beFoo()` queues a message, `actor.foo()` does
//! not.

use actor_lint_core::conventions::BEHAVIOR_PREFIX;
use actor_lint_core::{Declaration, Diagnostics, NodeKind, Rule, RuleDescription, Snapshot};

/// Requires `be`-prefixed names on behavior entries of actor classes.
pub struct BehaviorNaming;

const DESC: RuleDescription = RuleDescription {
    identifier: "behavior_naming",
    name: "Behavior Name Violation",
    description: "Behavior names must start with 'be', such as 'beHelloWorld'.",
    trigger_kinds: &[NodeKind::Class, NodeKind::Extension],
    non_triggering_examples: &[
        "class StringBuilder: Actor {
    private var string: String = \"\"
    lazy var beAppend = ChainableBehavior(self) { (args: BehaviorArgs) in
        // actor-lint: parameter String - the string to be appended
        self.string.append(args[x: 0])
    }
    lazy var beSpace = ChainableBehavior(self) { (_: BehaviorArgs) in
        self.string.append(space)
    }
}
",
        "class NotAnActor {
    lazy var append = ChainableBehavior(self) { (_: BehaviorArgs) in
        self.tick()
    }
}
",
    ],
    triggering_examples: &[
        "class StringBuilder: Actor {
    private var string: String = \"\"
    lazy var append = ChainableBehavior(self) { (args: BehaviorArgs) in
        // actor-lint: parameter String - the string to be appended
        self.string.append(args[x: 0])
    }
}
",
    ],
};

impl Rule for BehaviorNaming {
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
        if !snapshot.is_actor(decl) {
            return true;
        }

        let mut passed = true;
        for behavior in snapshot.behaviors_of(name) {
            if !behavior.declared_in(decl) {
                continue;
            }
            if !behavior.name().starts_with(BEHAVIOR_PREFIX) {
                diags.error(decl.unit(), Some(behavior.entry.offset()), DESC.message());
                passed = false;
            }
        }
        passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_lint_core::harness::verify_examples;
    use actor_lint_syntax::SwiftExtractor;

    #[test]
    fn example_contract() {
        verify_examples(&SwiftExtractor::new(), &BehaviorNaming).unwrap();
    }
}
