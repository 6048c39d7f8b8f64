//! End-to-end runs of the full pipeline with the reference extractor
//! and the default rule set.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use actor_lint_core::{LintReport, Pipeline, Severity};
use actor_lint_rules::default_rules;
use actor_lint_syntax::SwiftExtractor;

fn write_file(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn run(dir: &Path) -> LintReport {
    let pipeline = Pipeline::builder()
        .rules(default_rules())
        .extractor(Arc::new(SwiftExtractor::new()))
        .build()
        .unwrap();
    pipeline.run(&[dir.to_path_buf()])
}

#[test]
fn public_function_in_actor_is_exactly_one_error() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "Foo.swift",
        "class Foo: Actor { public func bar() {} }\n",
    );

    let report = run(dir.path());
    assert_eq!(report.files_checked, 1);
    assert_eq!(report.errors, 1);
    assert_eq!(report.warnings, 0);
    assert!(report.diagnostics[0].message.contains("Non-private functions"));
}

#[test]
fn private_state_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "Foo.swift",
        "class Foo: Actor { private var x: Int = 0 }\n",
    );

    let report = run(dir.path());
    assert_eq!(report.files_checked, 1);
    assert_eq!(report.errors, 0);
    assert_eq!(report.warnings, 0);
}

#[test]
fn inheritance_resolves_across_files() {
    let dir = tempfile::tempdir().unwrap();
    // The subclass file carries no mention of the marker type at all;
    // only the frozen cross-file table can classify it.
    write_file(
        dir.path(),
        "Sub.swift",
        "class Sub: Base { public func poke() {} }\n",
    );
    write_file(dir.path(), "Base.swift", "class Base: Actor {}\n");

    let report = run(dir.path());
    assert_eq!(report.errors, 1);
    assert!(report.diagnostics[0]
        .path
        .to_string_lossy()
        .ends_with("Sub.swift"));
}

#[test]
fn call_with_too_many_arguments_reports_at_the_call_site() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "Builder.swift",
        "class StringBuilder: Actor {
    private var string: String = \"\"
    lazy var beAppend = ChainableBehavior(self) { (args: BehaviorArgs) in
        // actor-lint: parameter String - the string to be appended
        self.append(args[x: 0])
    }
}
",
    );
    write_file(
        dir.path(),
        "Caller.swift",
        "class Caller {
    init() {
        let a = StringBuilder()
        a.beAppend(\"Hello\", \"World\")
    }
}
",
    );

    let report = run(dir.path());
    assert_eq!(report.errors, 1);
    assert_eq!(report.warnings, 0);

    let error = report
        .diagnostics
        .iter()
        .find(|d| d.severity == Severity::Error)
        .unwrap();
    assert!(error.message.contains("too many arguments"));
    assert!(error.path.to_string_lossy().ends_with("Caller.swift"));
    // The call site sits on line 4; the offset resolves through
    // newline counting.
    assert_eq!(error.line, Some(4));
}

#[test]
fn same_named_behaviors_with_differing_signatures_warn_not_error() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "Left.swift",
        "class Left: Actor {
    lazy var beRun = ChainableBehavior(self) { (args: BehaviorArgs) in
        // actor-lint: parameter String - what to run
        self.go(args[x: 0])
    }
}
",
    );
    write_file(
        dir.path(),
        "Right.swift",
        "class Right: Actor {
    lazy var beRun = ChainableBehavior(self) { (_: BehaviorArgs) in
        // actor-lint: parameter None
        self.go()
    }
}
",
    );
    write_file(
        dir.path(),
        "Caller.swift",
        "class Caller {
    init() {
        let l = Left()
        l.beRun(\"now\")
    }
}
",
    );

    let report = run(dir.path());
    assert_eq!(report.errors, 0);
    assert_eq!(report.warnings, 1);
    assert!(report.diagnostics[0].message.contains("ambiguous"));
}

#[test]
fn non_matching_extensions_never_reach_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "Foo.swift",
        "class Foo: Actor { public func bar() {} }\n",
    );
    write_file(
        dir.path(),
        "Foo.notswift",
        "class AlsoBad: Actor { public func bar() {} }\n",
    );

    let report = run(dir.path());
    assert_eq!(report.files_checked, 1);
    assert_eq!(report.errors, 1);
}

#[test]
fn malformed_annotation_is_an_error_but_does_not_stop_indexing() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "Builder.swift",
        "class Builder: Actor {
    lazy var beGo = ChainableBehavior(self) { (args: BehaviorArgs) in
        // actor-lint: parameter String missing the dash
        self.go(args[x: 0])
    }
}
class Other: Actor { public func nope() {} }
",
    );

    let report = run(dir.path());
    // Malformed annotation + undocumented behavior + the unrelated
    // access-level error all surface from the same run.
    assert!(report
        .diagnostics
        .iter()
        .any(|d| d.message.contains("malformed parameter annotation")));
    assert!(report
        .diagnostics
        .iter()
        .any(|d| d.message.contains("Non-private functions")));
    assert_eq!(report.errors, 3);
}

#[test]
fn unparseable_files_are_dropped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "Broken.swift", "class Broken: Actor {\n");
    write_file(
        dir.path(),
        "Good.swift",
        "class Good: Actor { public func bar() {} }\n",
    );

    let report = run(dir.path());
    assert_eq!(report.files_checked, 1);
    assert_eq!(report.errors, 1);
}

#[test]
fn repeated_runs_produce_identical_reports() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "Mixed.swift",
        "class A: Actor { public func one() {} }
class B: A { var leak: Int = 0 }
let b = B()
b.protected_poke()
",
    );

    let render = |report: &LintReport| -> Vec<String> {
        report.diagnostics.iter().map(ToString::to_string).collect()
    };

    let first = run(dir.path());
    let second = run(dir.path());
    assert_eq!(render(&first), render(&second));
    assert!(first.errors >= 3);
}
