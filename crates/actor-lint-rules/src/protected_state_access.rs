//! Rule: `protected_` state may only be touched through `self`.
//!
//! The structural tree does not expose variable-access expressions, so
//! this is a raw-text scan over the whole file, filtered through the
//! token map so comments and strings cannot misfire. Receiver capture
//! stands in for lookbehind: a match is a violation unless the
//! receiver is `self`. Known precision limit: an access split across
//! lines is missed.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use actor_lint_core::conventions::PROTECTED_PREFIX;
use actor_lint_core::{Declaration, Diagnostics, Rule, RuleDescription, Snapshot, SyntaxUnit};

/// Flags `receiver.protected_*` access where the receiver is not
/// `self`.
pub struct ProtectedStateAccess;

static ACCESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\s*\.\s*protected_")
        .unwrap_or_else(|_| unreachable!("access pattern is valid"))
});

const DESC: RuleDescription = RuleDescription {
    identifier: "protected_state_access",
    name: "Protected Access Violation",
    description: "Protected variables may not be accessed outside of the actor.",
    trigger_kinds: &[],
    non_triggering_examples: &[
        "class SomeActor: Actor {
    var protected_colorable = 5
    func protected_bump() {
        protected_colorable = 15
        self.protected_colorable = 15
    }
}
",
        "class SomeActor: Actor {
    var protected_colorable = 5
}
// print(color.protected_colorable)
",
    ],
    triggering_examples: &[
        "class SomeActor: Actor {
    var protected_colorable = 5
}
let a = SomeActor()
a.protected_colorable = 15
",
        "func render() {
    let color = Color()
    show(color.protected_colorable)
}
",
    ],
};

impl Rule for ProtectedStateAccess {
    fn description(&self) -> &RuleDescription {
        &DESC
    }

    fn precheck(&self, content: &str) -> bool {
        content.contains(PROTECTED_PREFIX)
    }

    fn check_file(
        &self,
        _snapshot: &Snapshot,
        unit: &Arc<SyntaxUnit>,
        diags: &mut Diagnostics,
    ) -> bool {
        let root = Declaration::root(Arc::clone(unit));
        let mut passed = true;
        root.for_each_match(&ACCESS, |found| {
            if found.groups[1] != "self" {
                diags.error(unit, Some(found.offset), DESC.message());
                passed = false;
            }
        });
        passed
    }
}
