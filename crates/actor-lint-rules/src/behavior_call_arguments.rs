//! Rule: behavior call sites must match the documented parameter
//! contract.
//!
//! A whole-file scan resolves each `.beXxx(...)` site against the
//! behavior index. Argument counts must match the documented list, and
//! literal arguments get a lightweight type check. Resolution is by
//! name across every class; when several same-named behaviors disagree
//! on their signatures the site is flagged as ambiguous — a warning,
//! not an error, since a mismatch cannot be proven against an unknown
//! receiver type.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use actor_lint_core::{
    Behavior, Declaration, Diagnostics, Rule, RuleDescription, SimpleType, Snapshot, SyntaxUnit,
};

/// Checks argument count and literal type compatibility at behavior
/// call sites.
pub struct BehaviorCallArguments;

static CALL_SITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.(be[A-Za-z0-9_]*)\s*\(\s*([^)]*?)\s*\)")
        .unwrap_or_else(|_| unreachable!("call site pattern is valid"))
});

const DESC: RuleDescription = RuleDescription {
    identifier: "behavior_call_arguments",
    name: "Parameter Violation",
    description: "The arguments of this behavior call do not match the documented parameters.",
    trigger_kinds: &[],
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
}
class Foo {
    init() {
        let a = StringBuilder()
        a.beAppend(\"Hello\")
        a.beSpace()
    }
}
",
    ],
    triggering_examples: &[
        "class StringBuilder: Actor {
    private var string: String = \"\"
    lazy var beAppend = ChainableBehavior(self) { (args: BehaviorArgs) in
        // actor-lint: parameter String - the string to be appended
        self.append(args[x: 0])
    }
}
class Foo {
    init() {
        let a = StringBuilder()
        a.beAppend(\"Hello\", \"World\")
    }
}
",
        "class StringBuilder: Actor {
    private var string: String = \"\"
    lazy var beAppend = ChainableBehavior(self) { (args: BehaviorArgs) in
        // actor-lint: parameter String - the string to be appended
        self.append(args[x: 0])
    }
}
class Foo {
    init() {
        let a = StringBuilder()
        a.beAppend()
    }
}
",
        "class StringBuilder: Actor {
    private var string: String = \"\"
    lazy var beAppend = ChainableBehavior(self) { (args: BehaviorArgs) in
        // actor-lint: parameter String - the string to be appended
        self.append(args[x: 0])
    }
}
class Foo {
    init() {
        let a = StringBuilder()
        a.beAppend(42)
    }
}
",
    ],
};

impl Rule for BehaviorCallArguments {
    fn description(&self) -> &RuleDescription {
        &DESC
    }

    fn precheck(&self, content: &str) -> bool {
        content.contains(".be")
    }

    fn check_file(
        &self,
        snapshot: &Snapshot,
        unit: &Arc<SyntaxUnit>,
        diags: &mut Diagnostics,
    ) -> bool {
        let root = Declaration::root(Arc::clone(unit));
        let mut passed = true;

        root.for_each_match(&CALL_SITE, |found| {
            let behavior_name = found.groups[1].as_str();
            let arguments = split_arguments(&found.groups[2]);

            let candidates = snapshot.behaviors_named(behavior_name);
            if candidates.is_empty() {
                diags.warning(
                    unit,
                    Some(found.offset),
                    DESC.message_with(&format!(
                        "unable to find a declaration for behavior `{behavior_name}`"
                    )),
                );
                return;
            }
            if distinct_signatures(&candidates) > 1 {
                diags.warning(
                    unit,
                    Some(found.offset),
                    DESC.message_with(&format!(
                        "ambiguous behavior `{behavior_name}`: multiple declarations with \
                         differing signatures"
                    )),
                );
                return;
            }

            let behavior = candidates[0];
            if behavior.any_params {
                return;
            }
            let expected = if behavior.no_params {
                0
            } else {
                behavior.params.len()
            };
            if arguments.len() > expected {
                diags.error(
                    unit,
                    Some(found.offset),
                    DESC.message_with(&format!(
                        "too many arguments for behavior `{behavior_name}`: expected \
                         {expected}, found {}",
                        arguments.len()
                    )),
                );
                passed = false;
                return;
            }
            if arguments.len() < expected {
                diags.error(
                    unit,
                    Some(found.offset),
                    DESC.message_with(&format!(
                        "missing arguments for behavior `{behavior_name}`: expected \
                         {expected}, found {}",
                        arguments.len()
                    )),
                );
                passed = false;
                return;
            }
            for (position, (argument, param)) in
                arguments.iter().zip(&behavior.params).enumerate()
            {
                let inferred = SimpleType::infer(argument);
                let declared = param.simple_type();
                if !inferred.compatible(declared) {
                    diags.error(
                        unit,
                        Some(found.offset),
                        DESC.message_with(&format!(
                            "argument {} of `{behavior_name}` is documented as {declared} \
                             but looks like {inferred}",
                            position + 1
                        )),
                    );
                    passed = false;
                }
            }
        });
        passed
    }
}

/// How many genuinely different parameter contracts exist among
/// same-named candidates.
fn distinct_signatures(candidates: &[&Behavior]) -> usize {
    let mut distinct: Vec<&Behavior> = Vec::new();
    for &candidate in candidates {
        if !distinct.iter().any(|seen| seen.same_signature(candidate)) {
            distinct.push(candidate);
        }
    }
    distinct.len()
}

/// Splits a call's argument text on top-level commas, respecting
/// string literals and nested brackets.
fn split_arguments(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut level = 0usize;
    let mut in_string = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if in_string => {
                current.push(ch);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                continue;
            }
            '"' => in_string = !in_string,
            '(' | '[' | '{' if !in_string => level += 1,
            ')' | ']' | '}' if !in_string => level = level.saturating_sub(1),
            ',' if !in_string && level == 0 => {
                pieces.push(current.trim().to_owned());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    if !current.trim().is_empty() {
        pieces.push(current.trim().to_owned());
    }
    pieces.retain(|piece| !piece.is_empty());
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_lint_core::harness::{check_example, verify_examples};
    use actor_lint_core::Severity;
    use actor_lint_syntax::SwiftExtractor;

    const STRING_BUILDER: &str = "class StringBuilder: Actor {
    private var string: String = \"\"
    lazy var beAppend = ChainableBehavior(self) { (args: BehaviorArgs) in
        // actor-lint: parameter String - the string to be appended
        self.append(args[x: 0])
    }
    lazy var beSpace = ChainableBehavior(self) { (_: BehaviorArgs) in
        // actor-lint: parameter None
        self.append(space)
    }
}
";

    #[test]
    fn example_contract() {
        verify_examples(&SwiftExtractor::new(), &BehaviorCallArguments).unwrap();
    }

    #[test]
    fn split_arguments_handles_strings_and_nesting() {
        assert_eq!(
            split_arguments("\"a, b\", 42, make(1, 2)"),
            vec!["\"a, b\"", "42", "make(1, 2)"]
        );
        assert!(split_arguments("").is_empty());
    }

    #[test]
    fn too_many_arguments_is_one_error_at_the_call_site() {
        let source = format!(
            "{STRING_BUILDER}class Foo {{\n    init() {{\n        let a = StringBuilder()\n        a.beAppend(\"Hello\", \"World\")\n    }}\n}}\n"
        );
        let outcome = check_example(&SwiftExtractor::new(), &BehaviorCallArguments, &source);
        assert!(!outcome.passed);
        let errors: Vec<_> = outcome
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("too many arguments"));
        assert_eq!(errors[0].line, Some(15));
    }

    #[test]
    fn ambiguous_behaviors_warn_instead_of_erroring() {
        let source = "\
class Left: Actor {
    lazy var beRun = ChainableBehavior(self) { (args: BehaviorArgs) in
        // actor-lint: parameter String - what to run
        self.go(args[x: 0])
    }
}
class Right: Actor {
    lazy var beRun = ChainableBehavior(self) { (_: BehaviorArgs) in
        // actor-lint: parameter None
        self.go()
    }
}
class Caller {
    init() {
        let l = Left()
        l.beRun(\"now\")
    }
}
";
        let outcome = check_example(&SwiftExtractor::new(), &BehaviorCallArguments, source);
        assert!(outcome.passed);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].severity, Severity::Warning);
        assert!(outcome.diagnostics[0].message.contains("ambiguous"));
    }

    #[test]
    fn unknown_behavior_warns() {
        let outcome = check_example(
            &SwiftExtractor::new(),
            &BehaviorCallArguments,
            "class C {\n    init() {\n        helper.beMissing()\n    }\n}\n",
        );
        assert!(outcome.passed);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn literal_type_mismatch_is_flagged() {
        let source = format!(
            "{STRING_BUILDER}class Foo {{\n    init() {{\n        let a = StringBuilder()\n        a.beAppend(42)\n    }}\n}}\n"
        );
        let outcome = check_example(&SwiftExtractor::new(), &BehaviorCallArguments, &source);
        assert!(!outcome.passed);
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| d.message.contains("documented as String")));
    }
}
