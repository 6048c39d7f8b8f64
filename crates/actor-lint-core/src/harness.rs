//! Single-file pipeline for rule self-tests.
//!
//! Every rule declares non-triggering and triggering example sources;
//! running them through this harness is the rule's regression
//! contract. The harness mirrors the real pipeline — extract, index,
//! freeze, dispatch by trigger kind, whole-file pass — without the
//! worker pools.

use std::sync::Arc;

use thiserror::Error;

use crate::ast::SymbolTable;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::extract::{ExtractError, SyntaxExtractor};
use crate::rule::Rule;
use crate::syntax::SyntaxUnit;

/// Result of running one source through a rule.
#[derive(Debug)]
pub struct CheckOutcome {
    /// True when every invocation of the rule passed.
    pub passed: bool,
    /// Everything the rule (and the freeze step) emitted.
    pub diagnostics: Vec<Diagnostic>,
}

/// A failed example from [`verify_examples`].
#[derive(Debug, Error)]
pub enum SelfTestFailure {
    /// The example source failed to extract.
    #[error("example failed to parse: {source}\n{example}")]
    Extract {
        /// Underlying extraction failure.
        source: ExtractError,
        /// The offending example.
        example: String,
    },

    /// A non-triggering example produced a failure.
    #[error("rule `{rule}` failed on non-triggering example:\n{example}")]
    FalsePositive {
        /// Rule identifier.
        rule: &'static str,
        /// The offending example.
        example: String,
    },

    /// A triggering example passed.
    #[error("rule `{rule}` passed on triggering example:\n{example}")]
    FalseNegative {
        /// Rule identifier.
        rule: &'static str,
        /// The offending example.
        example: String,
    },
}

/// Runs `source` through a minimal single-file pipeline and applies
/// `rule` to every declaration matching its trigger kinds, plus one
/// whole-file pass.
///
/// The precheck gate is deliberately not consulted: examples exercise
/// the structural check itself.
///
/// # Errors
///
/// Returns the extraction error when `source` cannot be parsed.
pub fn check_source(
    extractor: &dyn SyntaxExtractor,
    rule: &dyn Rule,
    source: &str,
) -> Result<CheckOutcome, ExtractError> {
    let (tree, tokens) = extractor.extract(source)?;
    let unit = Arc::new(SyntaxUnit::new("<self-test>", source, tree, tokens));

    let mut table = SymbolTable::new();
    table.index(&unit);
    let (snapshot, freeze_diags) = table.freeze();

    let mut diags = Diagnostics::new();
    let mut passed = true;

    let triggers = rule.description().trigger_kinds;
    for decl in snapshot.declarations() {
        if triggers.contains(&decl.kind()) {
            passed &= rule.check(&snapshot, decl, &mut diags);
        }
    }
    passed &= rule.check_file(&snapshot, &unit, &mut diags);

    let mut diagnostics = freeze_diags;
    diagnostics.extend(diags.into_items());
    Ok(CheckOutcome {
        passed,
        diagnostics,
    })
}

/// Convenience wrapper used by tests: extracts and checks, panicking
/// on extraction failure.
///
/// # Panics
///
/// Panics when the source cannot be extracted; examples are expected
/// to be well-formed.
#[must_use]
pub fn check_example(extractor: &dyn SyntaxExtractor, rule: &dyn Rule, source: &str) -> CheckOutcome {
    match check_source(extractor, rule, source) {
        Ok(outcome) => outcome,
        Err(err) => panic!("example failed to parse: {err}\n{source}"),
    }
}

/// Verifies the rule's full example contract: all non-triggering
/// examples pass and all triggering examples fail.
///
/// # Errors
///
/// Returns the first failing example.
pub fn verify_examples(
    extractor: &dyn SyntaxExtractor,
    rule: &dyn Rule,
) -> Result<(), SelfTestFailure> {
    let desc = rule.description();
    for example in desc.non_triggering_examples {
        let outcome = check_source(extractor, rule, example).map_err(|source| {
            SelfTestFailure::Extract {
                source,
                example: (*example).to_owned(),
            }
        })?;
        if !outcome.passed {
            return Err(SelfTestFailure::FalsePositive {
                rule: desc.identifier,
                example: (*example).to_owned(),
            });
        }
    }
    for example in desc.triggering_examples {
        let outcome = check_source(extractor, rule, example).map_err(|source| {
            SelfTestFailure::Extract {
                source,
                example: (*example).to_owned(),
            }
        })?;
        if outcome.passed {
            return Err(SelfTestFailure::FalseNegative {
                rule: desc.identifier,
                example: (*example).to_owned(),
            });
        }
    }
    Ok(())
}
