//! # actor-lint-core
//!
//! Core framework for actor-lint: the concurrent analysis pipeline,
//! the cross-file symbol model, and the rule protocol.
//!
//! The pieces fit together like this:
//!
//! - [`Pipeline`] walks the roots, turns each file into a
//!   [`SyntaxUnit`] via the pluggable [`SyntaxExtractor`], indexes
//!   every declaration into a single-owner [`SymbolTable`], freezes it
//!   into an immutable [`Snapshot`] once the stream completes, and
//!   fans declarations out to a pool running every registered
//!   [`Rule`].
//! - Rules report through [`Diagnostics`]; the run ends in a
//!   [`LintReport`] whose error count becomes the process exit code.
//!
//! ## Example
//!
//! ```ignore
//! use actor_lint_core::Pipeline;
//!
//! let pipeline = Pipeline::builder()
//!     .extractor(extractor)
//!     .rules(actor_lint_rules::default_rules())
//!     .build()?;
//! let report = pipeline.run(&[path]);
//! std::process::exit(report.errors as i32);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ast;
mod config;
mod diagnostics;
mod extract;
mod pipeline;
mod rule;
mod syntax;

/// Naming conventions of the linted actor library.
pub mod conventions;

/// Single-file harness backing every rule's example contract.
pub mod harness;

pub use ast::{Behavior, BehaviorParam, SimpleType, Snapshot, SymbolTable};
pub use config::{Config, ConfigError};
pub use diagnostics::{line_and_column, Diagnostic, Diagnostics, LintReport, Severity};
pub use extract::{ExtractError, SyntaxExtractor};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineError};
pub use rule::{Rule, RuleDescription, RuleRef, Ruleset};
pub use syntax::{
    Accessibility, Annotation, Declaration, NodeKind, PatternMatch, SyntaxNode, SyntaxTree,
    SyntaxUnit, TokenKind, TokenMap, TokenSpan,
};
