//! Rule protocol and the kind-keyed dispatch table.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ast::Snapshot;
use crate::diagnostics::Diagnostics;
use crate::syntax::{Declaration, NodeKind, SyntaxUnit};

/// Static description of a rule: identity, trigger kinds, and the
/// example sets that double as its regression contract.
#[derive(Debug, Clone, Copy)]
pub struct RuleDescription {
    /// Unique identifier, e.g. `actor_private_functions`.
    pub identifier: &'static str,
    /// User-facing name.
    pub name: &'static str,
    /// User-facing description.
    pub description: &'static str,
    /// Declaration kinds that trigger [`Rule::check`].
    pub trigger_kinds: &'static [NodeKind],
    /// Sources the rule must pass.
    pub non_triggering_examples: &'static [&'static str],
    /// Sources the rule must fail.
    pub triggering_examples: &'static [&'static str],
}

impl RuleDescription {
    /// Console message: `Name (identifier): description`.
    #[must_use]
    pub fn message(&self) -> String {
        format!("{} ({}): {}", self.name, self.identifier, self.description)
    }

    /// Console message with `detail` replacing the description.
    #[must_use]
    pub fn message_with(&self, detail: &str) -> String {
        format!("{} ({}): {}", self.name, self.identifier, detail)
    }
}

/// A convention check.
///
/// Rules are stateless and shared across the checker pool. A rule
/// receives the frozen snapshot and one focal declaration (or a whole
/// unit, for file passes) and reports findings through the sink. The
/// boolean return is pass/fail and is independent of what was emitted;
/// a rule may emit warnings and still pass.
pub trait Rule: Send + Sync {
    /// This rule's static description.
    fn description(&self) -> &RuleDescription;

    /// Cheap textual fast-reject over raw file content, evaluated once
    /// per file by the analyzer stage. Returning `false` exempts the
    /// file from this rule entirely.
    fn precheck(&self, _content: &str) -> bool {
        true
    }

    /// Checks one declaration whose kind is in
    /// [`RuleDescription::trigger_kinds`].
    fn check(&self, _snapshot: &Snapshot, _decl: &Declaration, _diags: &mut Diagnostics) -> bool {
        true
    }

    /// Whole-file pass, offered to every rule for every unit. The
    /// default does nothing; rules that scan text across declaration
    /// boundaries implement this instead of declaring trigger kinds so
    /// each finding is reported exactly once.
    fn check_file(
        &self,
        _snapshot: &Snapshot,
        _unit: &Arc<SyntaxUnit>,
        _diags: &mut Diagnostics,
    ) -> bool {
        true
    }
}

/// Shared handle on a rule.
pub type RuleRef = Arc<dyn Rule>;

/// The registered rules plus the kind-to-rules dispatch table,
/// constructed once at startup.
pub struct Ruleset {
    all: Vec<RuleRef>,
    by_kind: HashMap<NodeKind, Vec<RuleRef>>,
}

impl Ruleset {
    /// Builds the dispatch table for `rules`.
    #[must_use]
    pub fn new(rules: Vec<RuleRef>) -> Self {
        let mut by_kind: HashMap<NodeKind, Vec<RuleRef>> = HashMap::new();
        for rule in &rules {
            for &kind in rule.description().trigger_kinds {
                by_kind.entry(kind).or_default().push(Arc::clone(rule));
            }
        }
        Self {
            all: rules,
            by_kind,
        }
    }

    /// Every registered rule.
    #[must_use]
    pub fn rules(&self) -> &[RuleRef] {
        &self.all
    }

    /// Rules triggered by declarations of `kind`.
    #[must_use]
    pub fn triggered_by(&self, kind: NodeKind) -> &[RuleRef] {
        self.by_kind.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// True when no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClassOnly;

    impl Rule for ClassOnly {
        fn description(&self) -> &RuleDescription {
            static DESC: RuleDescription = RuleDescription {
                identifier: "class_only",
                name: "Class Only",
                description: "test rule",
                trigger_kinds: &[NodeKind::Class, NodeKind::Extension],
                non_triggering_examples: &[],
                triggering_examples: &[],
            };
            &DESC
        }
    }

    #[test]
    fn dispatch_table_routes_by_kind() {
        let ruleset = Ruleset::new(vec![Arc::new(ClassOnly)]);
        assert_eq!(ruleset.len(), 1);
        assert_eq!(ruleset.triggered_by(NodeKind::Class).len(), 1);
        assert_eq!(ruleset.triggered_by(NodeKind::Extension).len(), 1);
        assert!(ruleset.triggered_by(NodeKind::CallExpr).is_empty());
    }

    #[test]
    fn description_messages() {
        let rule = ClassOnly;
        assert_eq!(
            rule.description().message(),
            "Class Only (class_only): test rule"
        );
        assert_eq!(
            rule.description().message_with("detail"),
            "Class Only (class_only): detail"
        );
    }
}
