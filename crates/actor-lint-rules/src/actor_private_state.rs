//! Rule: actor state must be private.
//!
//! Non-private variables are reachable from other threads without
//! going through the mailbox. Behavior entries (a member paired with a
//! message-constructor call) are the sanctioned exception, as are
//! members opting into the `protected_` convention, which a separate
//! rule confines to `self` access.

use actor_lint_core::conventions::{self, PROTECTED_PREFIX};
use actor_lint_core::{
    Accessibility, Declaration, Diagnostics, NodeKind, Rule, RuleDescription, Snapshot,
};

/// Requires every member variable in an actor to be private.
pub struct ActorPrivateState;

const DESC: RuleDescription = RuleDescription {
    identifier: "actor_private_state",
    name: "Access Level Violation",
    description: "Non-private variables are not allowed in actors.",
    trigger_kinds: &[NodeKind::Class, NodeKind::Extension],
    non_triggering_examples: &[
        "class SomeClass {}\n",
        "class SomeActor: Actor { private var x: Int = 0 }\n",
        "class SomeActor: Actor { private let x: Int = 0 }\n",
        "class SomeActor: Actor {
    lazy var printFoo = ChainableBehavior(self) { (_: BehaviorArgs) in
        self.show()
    }
}
",
        "class SomeActor: Actor { public lazy var protected_colorable = 5 }\n",
    ],
    triggering_examples: &[
        "class SomeActor: Actor { var x: Int = 0 }\n",
        "class SomeActor: Actor { let x: Int = 0 }\n",
        "class SomeActor: Actor { public lazy var _colorable = 5 }\n",
    ],
};

impl Rule for ActorPrivateState {
    fn description(&self) -> &RuleDescription {
        &DESC
    }

    fn check(&self, snapshot: &Snapshot, decl: &Declaration, diags: &mut Diagnostics) -> bool {
        if !snapshot.is_actor(decl) {
            return true;
        }

        let members: Vec<Declaration> = decl.children().collect();
        let mut passed = true;

        for (idx, variable) in members.iter().enumerate() {
            if !variable.kind().is_member_variable() {
                continue;
            }
            if variable.accessibility() == Accessibility::Private {
                continue;
            }
            // A behavior entry is recognizable by the trailing
            // message-constructor call.
            let is_behavior = members.get(idx + 1).is_some_and(|sibling| {
                sibling.kind() == NodeKind::CallExpr
                    && sibling
                        .name()
                        .is_some_and(conventions::is_message_constructor)
            });
            if is_behavior {
                continue;
            }
            if variable
                .name()
                .is_some_and(|name| name.starts_with(PROTECTED_PREFIX))
            {
                continue;
            }
            diags.error(decl.unit(), Some(variable.offset()), DESC.message());
            passed = false;
        }
        passed
    }
}
