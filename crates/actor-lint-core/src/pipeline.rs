//! The concurrent analysis pipeline.
//!
//! ```text
//! Discovery ──> Analyzer pool ──> Resolver ──> Checker pool ──> Sink
//!   (walk)      (extract +        (single      (rule            (count,
//!               precheck)         barrier)     dispatch)        report)
//! ```
//!
//! Stages hand off through bounded channels; a dropped sender is the
//! end-of-stream sentinel, so completion propagates in pipeline order
//! once discovery finishes walking. The resolver is the one
//! synchronization point: it owns the only mutable symbol table and
//! publishes an immutable snapshot only after the unit stream
//! disconnects, because inheritance resolution is not valid against a
//! partial table. The bounded queues upstream keep the resolver from
//! becoming an unbounded buffer while it collects.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Sender};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::ast::{Snapshot, SymbolTable};
use crate::config::Config;
use crate::diagnostics::{Diagnostic, Diagnostics, LintReport};
use crate::extract::SyntaxExtractor;
use crate::rule::{Rule, RuleRef, Ruleset};
use crate::syntax::{Declaration, SyntaxUnit};

/// Queue capacity between discovery and the analyzer pool.
const PATH_QUEUE: usize = 256;
/// Queue capacity between the analyzer pool and the resolver.
const UNIT_QUEUE: usize = 64;
/// Queue capacity between the resolver and the checker pool.
const JOB_QUEUE: usize = 256;
/// Queue capacity between the checker pool and the sink.
const DIAG_QUEUE: usize = 256;

/// Cores reserved for the non-pool stages (discovery, resolver, sink).
const STAGE_HEADROOM: usize = 2;

/// Errors building a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No syntax extractor was supplied.
    #[error("no syntax extractor configured")]
    MissingExtractor,
}

/// One unit of work for the checker pool.
enum CheckJob {
    /// Check a single declaration against the rules its kind triggers.
    Decl {
        snapshot: Arc<Snapshot>,
        decl: Declaration,
    },
    /// Offer a whole unit to every rule's file pass.
    File {
        snapshot: Arc<Snapshot>,
        unit: Arc<SyntaxUnit>,
    },
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    rules: Vec<RuleRef>,
    config: Config,
    extractor: Option<Arc<dyn SyntaxExtractor>>,
}

impl PipelineBuilder {
    /// Creates a builder with default configuration and no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Registers an already-shared rule.
    #[must_use]
    pub fn rule_ref(mut self, rule: RuleRef) -> Self {
        self.rules.push(rule);
        self
    }

    /// Registers many rules at once.
    #[must_use]
    pub fn rules<I: IntoIterator<Item = RuleRef>>(mut self, rules: I) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the run configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the syntax-extraction service.
    #[must_use]
    pub fn extractor(mut self, extractor: Arc<dyn SyntaxExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Builds the pipeline, filtering out rules disabled by
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingExtractor`] when no extractor
    /// was supplied.
    pub fn build(self) -> Result<Pipeline, PipelineError> {
        let extractor = self.extractor.ok_or(PipelineError::MissingExtractor)?;
        let enabled: Vec<RuleRef> = self
            .rules
            .into_iter()
            .filter(|rule| {
                let id = rule.description().identifier;
                let enabled = self.config.is_rule_enabled(id);
                if !enabled {
                    debug!(rule = id, "rule disabled by configuration");
                }
                enabled
            })
            .collect();

        let workers = self
            .config
            .workers
            .unwrap_or_else(default_workers)
            .max(1);

        Ok(Pipeline {
            ruleset: Arc::new(Ruleset::new(enabled)),
            extractor,
            extensions: self.config.extensions,
            workers,
        })
    }
}

/// Pool size leaving headroom for the non-pool stages.
fn default_workers() -> usize {
    num_cpus::get().saturating_sub(STAGE_HEADROOM).max(1)
}

/// The assembled pipeline. One instance runs one batch; runs are
/// independent and produce the same multiset of diagnostics for an
/// unchanged tree.
pub struct Pipeline {
    ruleset: Arc<Ruleset>,
    extractor: Arc<dyn SyntaxExtractor>,
    extensions: Vec<String>,
    workers: usize,
}

impl Pipeline {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Number of registered (enabled) rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.ruleset.len()
    }

    /// Runs the full pipeline over `roots` and blocks until the sink
    /// has drained.
    ///
    /// Failures local to one file (unreadable, unparseable) are logged
    /// and never abort the batch; only rule findings reach the report.
    #[must_use]
    pub fn run(&self, roots: &[PathBuf]) -> LintReport {
        info!(
            roots = roots.len(),
            rules = self.ruleset.len(),
            workers = self.workers,
            "starting lint run"
        );

        let (path_tx, path_rx) = bounded::<PathBuf>(PATH_QUEUE);
        let (unit_tx, unit_rx) = bounded::<Arc<SyntaxUnit>>(UNIT_QUEUE);
        let (job_tx, job_rx) = bounded::<CheckJob>(JOB_QUEUE);
        let (diag_tx, diag_rx) = bounded::<Vec<Diagnostic>>(DIAG_QUEUE);

        let files_checked = AtomicUsize::new(0);
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        thread::scope(|scope| {
            // Discovery.
            {
                let extensions = &self.extensions;
                scope.spawn(move || discover(roots, extensions, &path_tx));
            }

            // Analyzer pool.
            for _ in 0..self.workers {
                let path_rx = path_rx.clone();
                let unit_tx = unit_tx.clone();
                let files_checked = &files_checked;
                scope.spawn(move || {
                    for path in path_rx.iter() {
                        if let Some(unit) = self.analyze(&path) {
                            files_checked.fetch_add(1, Ordering::Relaxed);
                            if unit_tx.send(unit).is_err() {
                                break;
                            }
                        }
                    }
                });
            }
            drop(path_rx);
            drop(unit_tx);

            // Resolver: the single owner of the mutable symbol table.
            {
                let diag_tx = diag_tx.clone();
                scope.spawn(move || {
                    let mut table = SymbolTable::new();
                    for unit in unit_rx.iter() {
                        table.index(&unit);
                    }
                    debug!(
                        units = table.unit_count(),
                        "unit stream complete; freezing symbol table"
                    );
                    let (snapshot, freeze_diags) = table.freeze();
                    let snapshot = Arc::new(snapshot);
                    if !freeze_diags.is_empty() && diag_tx.send(freeze_diags).is_err() {
                        return;
                    }
                    for decl in snapshot.declarations() {
                        let job = CheckJob::Decl {
                            snapshot: Arc::clone(&snapshot),
                            decl: decl.clone(),
                        };
                        if job_tx.send(job).is_err() {
                            return;
                        }
                    }
                    for unit in snapshot.units() {
                        let job = CheckJob::File {
                            snapshot: Arc::clone(&snapshot),
                            unit: Arc::clone(unit),
                        };
                        if job_tx.send(job).is_err() {
                            return;
                        }
                    }
                });
            }

            // Checker pool.
            for _ in 0..self.workers {
                let job_rx = job_rx.clone();
                let diag_tx = diag_tx.clone();
                let ruleset = Arc::clone(&self.ruleset);
                scope.spawn(move || {
                    for job in job_rx.iter() {
                        let batch = check_job(&ruleset, &job);
                        if !batch.is_empty() && diag_tx.send(batch).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(job_rx);
            drop(diag_tx);

            // Sink: drain on this thread until every sender is gone.
            for batch in diag_rx.iter() {
                diagnostics.extend(batch);
            }
        });

        let report = LintReport::new(diagnostics, files_checked.into_inner());
        info!(
            errors = report.errors,
            warnings = report.warnings,
            files = report.files_checked,
            "lint run complete"
        );
        report
    }

    /// Turns one path into a syntax unit, running every rule's
    /// precheck to build the exemption set. Read and parse failures
    /// are logged and drop the file.
    fn analyze(&self, path: &Path) -> Option<Arc<SyntaxUnit>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read file; skipping");
                return None;
            }
        };
        let (tree, tokens) = match self.extractor.extract(&content) {
            Ok(parts) => parts,
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to parse file; skipping");
                return None;
            }
        };

        let mut unit = SyntaxUnit::new(path, content, tree, tokens);
        for rule in self.ruleset.rules() {
            if !rule.precheck(&unit.content) {
                unit.exempt.insert(rule.description().identifier);
            }
        }
        Some(Arc::new(unit))
    }
}

/// Applies the matching rules to one job and returns what they
/// emitted.
fn check_job(ruleset: &Ruleset, job: &CheckJob) -> Vec<Diagnostic> {
    let mut diags = Diagnostics::new();
    match job {
        CheckJob::Decl { snapshot, decl } => {
            for rule in ruleset.triggered_by(decl.kind()) {
                if decl.unit().is_exempt(rule.description().identifier) {
                    continue;
                }
                rule.check(snapshot, decl, &mut diags);
            }
        }
        CheckJob::File { snapshot, unit } => {
            for rule in ruleset.rules() {
                if unit.is_exempt(rule.description().identifier) {
                    continue;
                }
                rule.check_file(snapshot, unit, &mut diags);
            }
        }
    }
    diags.into_items()
}

/// Walks every root, sending matching file paths downstream. Hidden
/// entries are skipped; unreadable subtrees are logged and skipped.
fn discover(roots: &[PathBuf], extensions: &[String], tx: &Sender<PathBuf>) {
    for root in roots {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(%err, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|want| want == ext));
            if matches && tx.send(entry.into_path()).is_err() {
                return;
            }
        }
    }
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractError;
    use crate::rule::RuleDescription;
    use crate::syntax::{NodeKind, SyntaxNode, SyntaxTree, TokenMap};
    use std::io::Write;

    /// Minimal extractor: one class node per `class Name: Ancestors`
    /// line. Enough to exercise the pipeline stages without the real
    /// extraction service.
    struct StubExtractor;

    impl SyntaxExtractor for StubExtractor {
        fn extract(&self, content: &str) -> Result<(SyntaxTree, TokenMap), ExtractError> {
            if content.contains("@@invalid@@") {
                return Err(ExtractError::UnbalancedBraces { offset: 0 });
            }
            let mut tree = SyntaxTree::new(content.len());
            let root = tree.root();
            let mut offset = 0;
            for line in content.lines() {
                if let Some(rest) = line.trim().strip_prefix("class ") {
                    let rest = rest.split('{').next().unwrap_or("");
                    let (name, inherits) = match rest.split_once(':') {
                        Some((name, tail)) => {
                            let inherits = tail
                                .split(',')
                                .map(|s| s.trim().to_owned())
                                .filter(|s| !s.is_empty())
                                .collect();
                            (name.trim(), inherits)
                        }
                        None => (rest.trim(), Vec::new()),
                    };
                    tree.push(
                        root,
                        SyntaxNode::new(NodeKind::Class, offset, line.len())
                            .named(name)
                            .inheriting(inherits),
                    );
                }
                offset += line.len() + 1;
            }
            Ok((tree, TokenMap::default()))
        }
    }

    /// Flags every actor-derived class.
    struct FlagActors;

    impl Rule for FlagActors {
        fn description(&self) -> &RuleDescription {
            static DESC: RuleDescription = RuleDescription {
                identifier: "flag_actors",
                name: "Flag Actors",
                description: "flags every actor",
                trigger_kinds: &[NodeKind::Class],
                non_triggering_examples: &[],
                triggering_examples: &[],
            };
            &DESC
        }

        fn precheck(&self, content: &str) -> bool {
            content.contains("Actor")
        }

        fn check(
            &self,
            snapshot: &Snapshot,
            decl: &Declaration,
            diags: &mut Diagnostics,
        ) -> bool {
            if snapshot.is_actor(decl) {
                diags.error(decl.unit(), Some(decl.offset()), "actor found");
                return false;
            }
            true
        }
    }

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    fn pipeline() -> Pipeline {
        Pipeline::builder()
            .rule(FlagActors)
            .extractor(Arc::new(StubExtractor))
            .build()
            .unwrap()
    }

    #[test]
    fn build_requires_extractor() {
        let err = Pipeline::builder().rule(FlagActors).build();
        assert!(matches!(err, Err(PipelineError::MissingExtractor)));
    }

    #[test]
    fn discovers_only_matching_extensions() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.swift", "class A: Actor {}\n");
        write_file(dir.path(), "b.txt", "class B: Actor {}\n");
        write_file(dir.path(), ".hidden.swift", "class H: Actor {}\n");

        let report = pipeline().run(&[dir.path().to_path_buf()]);
        assert_eq!(report.files_checked, 1);
        assert_eq!(report.errors, 1);
    }

    #[test]
    fn cross_file_inheritance_resolves_after_the_barrier() {
        let dir = tempfile::tempdir().unwrap();
        // The subclass lives in a file that may well be analyzed
        // before its superclass.
        write_file(dir.path(), "sub.swift", "class Sub: Base {}\n");
        write_file(dir.path(), "base.swift", "class Base: Actor {}\n");

        let report = pipeline().run(&[dir.path().to_path_buf()]);
        assert_eq!(report.errors, 2);
    }

    #[test]
    fn parse_failures_drop_the_file_only() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "bad.swift", "@@invalid@@ class X: Actor {}\n");
        write_file(dir.path(), "good.swift", "class G: Actor {}\n");

        let report = pipeline().run(&[dir.path().to_path_buf()]);
        assert_eq!(report.files_checked, 1);
        assert_eq!(report.errors, 1);
    }

    #[test]
    fn precheck_exempts_files() {
        let dir = tempfile::tempdir().unwrap();
        // Precheck looks for "Actor"; this file cannot trigger.
        write_file(dir.path(), "plain.swift", "class P: Thing {}\n");

        let report = pipeline().run(&[dir.path().to_path_buf()]);
        assert_eq!(report.files_checked, 1);
        assert_eq!(report.errors, 0);
    }

    #[test]
    fn repeated_runs_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.swift", "class A: Actor {}\nclass B: A {}\n");
        write_file(dir.path(), "c.swift", "class C: B {}\n");

        let pipeline = pipeline();
        let first = pipeline.run(&[dir.path().to_path_buf()]);
        let second = pipeline.run(&[dir.path().to_path_buf()]);

        let render = |report: &LintReport| {
            report
                .diagnostics
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        };
        assert_eq!(render(&first), render(&second));
        assert_eq!(first.errors, 3);
    }
}
