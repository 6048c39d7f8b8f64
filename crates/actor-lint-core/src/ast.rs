//! The cross-file symbol model: the mutable [`SymbolTable`] owned by
//! the resolver stage, and the frozen [`Snapshot`] shared with the
//! checker pool.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::conventions::{
    self, ACTOR_TYPE, BEHAVIOR_ARGS_TYPE, REMOTE_ACTOR_TYPE,
};
use crate::diagnostics::{Diagnostic, Severity};
use crate::syntax::{Accessibility, Declaration, NodeKind, SyntaxUnit};

/// Lightweight type classification used for call-site compatibility
/// checks. `Unknown` is compatible with everything; the tool only
/// flags mismatches it can prove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleType {
    /// Not inferable.
    Unknown,
    /// String-like.
    Str,
    /// Integer-like.
    Int,
    /// Floating-point.
    Float,
}

impl SimpleType {
    /// Classifies a declared type name.
    #[must_use]
    pub fn from_type_name(name: &str) -> Self {
        match name.trim() {
            "String" | "Substring" | "StaticString" => Self::Str,
            "Int" | "Int8" | "Int16" | "Int32" | "Int64" | "UInt" | "UInt8" | "UInt16"
            | "UInt32" | "UInt64" => Self::Int,
            "Float" | "Double" => Self::Float,
            _ => Self::Unknown,
        }
    }

    /// Infers a classification from argument literal text. Anything
    /// that is not clearly a literal stays `Unknown` so variables
    /// never produce a provable mismatch.
    #[must_use]
    pub fn infer(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::Unknown;
        }
        if trimmed.contains('"') || trimmed.contains('\'') {
            return Self::Str;
        }
        let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
        if !unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return Self::Int;
        }
        if let Some(hex) = unsigned.strip_prefix("0x") {
            if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Self::Int;
            }
        }
        if unsigned.bytes().all(|b| b.is_ascii_digit() || b == b'.')
            && unsigned.bytes().filter(|&b| b == b'.').count() == 1
            && unsigned.bytes().any(|b| b.is_ascii_digit())
        {
            return Self::Float;
        }
        Self::from_type_name(trimmed)
    }

    /// True unless both sides are known and different.
    #[must_use]
    pub fn compatible(self, other: Self) -> bool {
        self == Self::Unknown || other == Self::Unknown || self == other
    }
}

impl fmt::Display for SimpleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Str => write!(f, "String"),
            Self::Int => write!(f, "Int"),
            Self::Float => write!(f, "Float"),
        }
    }
}

/// One documented parameter of a behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorParam {
    /// Declared type name.
    pub type_name: String,
    /// Human description from the annotation, or the parameter name
    /// when derived from a companion signature.
    pub description: String,
}

impl BehaviorParam {
    /// The lightweight classification of this parameter's type.
    #[must_use]
    pub fn simple_type(&self) -> SimpleType {
        SimpleType::from_type_name(&self.type_name)
    }
}

/// A documented message entry point on an actor-like class: the entry
/// declaration, its backing implementation, and its parameter
/// contract.
#[derive(Debug, Clone)]
pub struct Behavior {
    /// Simple name of the owning class or extended type.
    pub class_name: String,
    /// The member variable paired with a message-constructor call.
    pub entry: Declaration,
    /// Companion implementation function (`_<entry name>`), when one
    /// exists in the same scope.
    pub implementation: Option<Declaration>,
    /// Documented parameters, in declaration order.
    pub params: Vec<BehaviorParam>,
    /// The entry documents that it accepts no parameters.
    pub no_params: bool,
    /// The entry documents that it accepts any parameters.
    pub any_params: bool,
    /// Name the behavior closure binds its argument bundle to.
    pub args_name: String,
}

impl Behavior {
    /// Name of the entry declaration.
    #[must_use]
    pub fn name(&self) -> &str {
        self.entry.name().unwrap_or_default()
    }

    /// True when this behavior's entry is a direct member of `decl`.
    ///
    /// The behavior index merges class and extension members under one
    /// class name; rules triggered per declaration use this to report
    /// each entry exactly once.
    #[must_use]
    pub fn declared_in(&self, decl: &Declaration) -> bool {
        Arc::ptr_eq(self.entry.unit(), decl.unit())
            && self.entry.node().parent == Some(decl.index())
    }

    /// True when both behaviors declare the same parameter contract.
    #[must_use]
    pub fn same_signature(&self, other: &Behavior) -> bool {
        self.no_params == other.no_params
            && self.any_params == other.any_params
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.simple_type() == b.simple_type())
    }
}

static ARGS_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\{{\s*\(\s*([A-Za-z_][A-Za-z0-9_]*|_)\s*:\s*{BEHAVIOR_ARGS_TYPE}\s*\)\s+in"
    ))
    .unwrap_or_else(|_| unreachable!("args binding pattern is valid"))
});

/// The mutable, in-progress cross-file index. Built incrementally and
/// exclusively by the resolver stage; nothing else ever sees it.
#[derive(Debug, Default)]
pub struct SymbolTable {
    classes: HashMap<String, Declaration>,
    protocols: HashMap<String, Declaration>,
    extensions: Vec<Declaration>,
    calls: Vec<Declaration>,
    functions: Vec<Declaration>,
    units: Vec<Arc<SyntaxUnit>>,
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of units indexed so far.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Indexes every declaration of `unit` into the table.
    ///
    /// The walk recurses into children whether or not the node itself
    /// was classified, so a class nested inside a function body is
    /// still indexed. Visit order across files does not affect the
    /// final contents, except that duplicate class and protocol names
    /// resolve last-writer-wins.
    pub fn index(&mut self, unit: &Arc<SyntaxUnit>) {
        self.units.push(Arc::clone(unit));
        self.add(Declaration::root(Arc::clone(unit)));
    }

    fn add(&mut self, decl: Declaration) {
        if let Some(name) = decl.name().map(str::to_owned) {
            match decl.kind() {
                NodeKind::Class => {
                    if self.classes.insert(name.clone(), decl.clone()).is_some() {
                        debug!(class = %name, "duplicate class name, keeping last");
                    }
                }
                NodeKind::Protocol => {
                    self.protocols.insert(name, decl.clone());
                }
                NodeKind::Extension => self.extensions.push(decl.clone()),
                NodeKind::CallExpr => self.calls.push(decl.clone()),
                kind if kind.is_function() => self.functions.push(decl.clone()),
                _ => {}
            }
        }

        let children: Vec<Declaration> = decl.children().collect();
        for child in children {
            self.add(child);
        }
    }

    /// Freezes the table into an immutable snapshot, deriving the
    /// behavior index in a single pass over all classes and
    /// extensions. Malformed parameter annotations are reported as
    /// error diagnostics; the affected parameter is omitted and
    /// indexing continues.
    #[must_use]
    pub fn freeze(self) -> (Snapshot, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let mut behaviors: HashMap<String, Vec<Behavior>> = HashMap::new();

        for class in self.classes.values().chain(self.extensions.iter()) {
            let Some(name) = class.name().map(str::to_owned) else {
                continue;
            };
            let found = extract_behaviors(class, &name, &mut diagnostics);
            if !found.is_empty() {
                behaviors.entry(name).or_default().extend(found);
            }
        }

        let snapshot = Snapshot {
            classes: self.classes,
            protocols: self.protocols,
            extensions: self.extensions,
            calls: self.calls,
            functions: self.functions,
            units: self.units,
            behaviors,
        };
        (snapshot, diagnostics)
    }
}

/// Walks the direct members of one class or extension, pairing each
/// non-private member variable with an immediately following
/// message-constructor call.
fn extract_behaviors(
    scope: &Declaration,
    class_name: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Behavior> {
    let members: Vec<Declaration> = scope.children().collect();
    let mut found = Vec::new();

    for (idx, member) in members.iter().enumerate() {
        if !member.kind().is_member_variable() {
            continue;
        }
        if member.accessibility() == Accessibility::Private {
            continue;
        }
        let Some(sibling) = members.get(idx + 1) else {
            continue;
        };
        if sibling.kind() != NodeKind::CallExpr {
            continue;
        }
        if !sibling
            .name()
            .is_some_and(conventions::is_message_constructor)
        {
            continue;
        }

        let mut params = Vec::new();
        let mut no_params = false;
        let mut any_params = false;
        let mut documented = false;

        for note in member.annotations("parameter") {
            documented = true;
            match note.payload.as_str() {
                "None" => no_params = true,
                "Any" => any_params = true,
                payload => match payload.split_once(" - ") {
                    Some((type_name, description)) => params.push(BehaviorParam {
                        type_name: type_name.trim().to_owned(),
                        description: description.trim().to_owned(),
                    }),
                    None => {
                        warn!(
                            class = class_name,
                            entry = member.name().unwrap_or_default(),
                            payload,
                            "malformed parameter annotation"
                        );
                        diagnostics.push(Diagnostic::new(
                            member.unit(),
                            Some(note.offset),
                            Severity::Error,
                            format!(
                                "malformed parameter annotation `{payload}`; \
                                 expected `<Type> - <Description>`, `None`, or `Any`"
                            ),
                        ));
                    }
                },
            }
        }

        let args_name = ARGS_BINDING
            .captures(member.body())
            .and_then(|caps| caps.get(1))
            .map_or_else(|| "args".to_owned(), |m| m.as_str().to_owned());

        // A `_` binding cannot touch the argument bundle at all.
        if args_name == "_" && !documented {
            no_params = true;
        }

        let implementation = member.name().and_then(|entry_name| {
            let impl_name = format!("_{entry_name}");
            members
                .iter()
                .find(|m| m.kind().is_function() && m.name() == Some(impl_name.as_str()))
                .cloned()
        });

        // No annotations: fall back to the companion signature.
        if params.is_empty() && !no_params && !any_params {
            if let Some(companion) = &implementation {
                for param in companion.children() {
                    if param.kind() != NodeKind::VarParameter {
                        continue;
                    }
                    if let Some(type_name) = &param.node().type_name {
                        params.push(BehaviorParam {
                            type_name: type_name.clone(),
                            description: param.name().unwrap_or_default().to_owned(),
                        });
                    }
                }
            }
        }

        found.push(Behavior {
            class_name: class_name.to_owned(),
            entry: member.clone(),
            implementation,
            params,
            no_params,
            any_params,
            args_name,
        });
    }

    found
}

/// The immutable, published view of the symbol table plus the derived
/// behavior index. Shared as `Arc<Snapshot>` across the checker pool;
/// immutability is what makes the post-barrier fan-out safe without
/// locks.
#[derive(Debug)]
pub struct Snapshot {
    classes: HashMap<String, Declaration>,
    protocols: HashMap<String, Declaration>,
    extensions: Vec<Declaration>,
    calls: Vec<Declaration>,
    functions: Vec<Declaration>,
    units: Vec<Arc<SyntaxUnit>>,
    behaviors: HashMap<String, Vec<Behavior>>,
}

impl Snapshot {
    /// Class declaration by simple name.
    #[must_use]
    pub fn class_named(&self, name: &str) -> Option<&Declaration> {
        self.classes.get(name)
    }

    /// Protocol declaration by simple name.
    #[must_use]
    pub fn protocol_named(&self, name: &str) -> Option<&Declaration> {
        self.protocols.get(name)
    }

    /// Class, falling back to protocol, by simple name.
    #[must_use]
    pub fn class_or_protocol(&self, name: &str) -> Option<&Declaration> {
        self.classes.get(name).or_else(|| self.protocols.get(name))
    }

    /// Every indexed extension.
    #[must_use]
    pub fn extensions(&self) -> &[Declaration] {
        &self.extensions
    }

    /// Every indexed call expression.
    #[must_use]
    pub fn calls(&self) -> &[Declaration] {
        &self.calls
    }

    /// Every indexed function.
    #[must_use]
    pub fn functions(&self) -> &[Declaration] {
        &self.functions
    }

    /// Every unit that contributed to this snapshot.
    #[must_use]
    pub fn units(&self) -> &[Arc<SyntaxUnit>] {
        &self.units
    }

    /// Behaviors declared by `class_name` (including through
    /// extensions).
    #[must_use]
    pub fn behaviors_of(&self, class_name: &str) -> &[Behavior] {
        self.behaviors
            .get(class_name)
            .map_or(&[], Vec::as_slice)
    }

    /// Behaviors with entry name `name`, across every class.
    #[must_use]
    pub fn behaviors_named(&self, name: &str) -> Vec<&Behavior> {
        self.behaviors
            .values()
            .flatten()
            .filter(|b| b.entry.name() == Some(name))
            .collect()
    }

    /// Transitive-closure subclass test over the inherited-type edges.
    ///
    /// Unresolvable ancestor names are treated as non-matching leaves,
    /// and a visited set guards against inheritance cycles, so the
    /// walk always terminates.
    #[must_use]
    pub fn is_subclass_of(&self, decl: &Declaration, ancestor: &str) -> bool {
        if !matches!(decl.kind(), NodeKind::Class | NodeKind::Protocol) {
            return false;
        }
        let mut visited: HashSet<String> = HashSet::new();
        let mut pending: Vec<&Declaration> = vec![decl];

        while let Some(current) = pending.pop() {
            for inherited in &current.node().inherited_types {
                if inherited == ancestor {
                    return true;
                }
                if !visited.insert(inherited.clone()) {
                    continue;
                }
                if let Some(next) = self.class_or_protocol(inherited) {
                    pending.push(next);
                }
            }
        }
        false
    }

    /// True if the named declaration is the actor marker type or
    /// transitively inherits from it.
    #[must_use]
    pub fn is_actor(&self, decl: &Declaration) -> bool {
        self.is_marker(decl, ACTOR_TYPE)
    }

    /// True if the named declaration is the remote-actor marker type
    /// or transitively inherits from it.
    #[must_use]
    pub fn is_remote_actor(&self, decl: &Declaration) -> bool {
        self.is_marker(decl, REMOTE_ACTOR_TYPE)
    }

    fn is_marker(&self, decl: &Declaration, marker: &str) -> bool {
        let Some(name) = decl.name() else {
            return false;
        };
        if name == marker {
            return true;
        }
        match self.class_or_protocol(name) {
            Some(resolved) => self.is_subclass_of(resolved, marker),
            None => false,
        }
    }

    /// Every declaration in the snapshot, in partition order: classes,
    /// protocols, extensions, calls, functions. This is the fan-out
    /// sequence the resolver sends to the checker pool.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.classes
            .values()
            .chain(self.protocols.values())
            .chain(self.extensions.iter())
            .chain(self.calls.iter())
            .chain(self.functions.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{SyntaxNode, SyntaxTree, TokenMap};

    fn class_unit(name: &str, inherits: &[&str]) -> Arc<SyntaxUnit> {
        let content = format!("class {name} {{}}");
        let mut tree = SyntaxTree::new(content.len());
        let root = tree.root();
        tree.push(
            root,
            SyntaxNode::new(NodeKind::Class, 0, content.len())
                .named(name)
                .inheriting(inherits.iter().map(|s| (*s).to_owned()).collect()),
        );
        Arc::new(SyntaxUnit::new(
            format!("{name}.swift"),
            content,
            tree,
            TokenMap::default(),
        ))
    }

    fn snapshot_of(units: &[Arc<SyntaxUnit>]) -> Snapshot {
        let mut table = SymbolTable::new();
        for unit in units {
            table.index(unit);
        }
        table.freeze().0
    }

    #[test]
    fn simple_type_inference() {
        assert_eq!(SimpleType::infer("\"hello\""), SimpleType::Str);
        assert_eq!(SimpleType::infer("42"), SimpleType::Int);
        assert_eq!(SimpleType::infer("0x1f"), SimpleType::Int);
        assert_eq!(SimpleType::infer("3.25"), SimpleType::Float);
        assert_eq!(SimpleType::infer("someVariable"), SimpleType::Unknown);
        assert_eq!(SimpleType::infer(""), SimpleType::Unknown);
        assert!(SimpleType::Unknown.compatible(SimpleType::Str));
        assert!(!SimpleType::Str.compatible(SimpleType::Int));
    }

    #[test]
    fn is_actor_resolves_through_intermediate_hops() {
        let units = [
            class_unit("Base", &["Actor"]),
            class_unit("Middle", &["Base"]),
            class_unit("Leaf", &["Middle"]),
            class_unit("Plain", &["NSObject"]),
        ];
        let snapshot = snapshot_of(&units);

        let leaf = snapshot.class_named("Leaf").cloned().unwrap();
        assert!(snapshot.is_actor(&leaf));

        let plain = snapshot.class_named("Plain").cloned().unwrap();
        assert!(!snapshot.is_actor(&plain));
    }

    #[test]
    fn is_actor_terminates_on_unresolved_ancestors() {
        let units = [class_unit("Orphan", &["SomewhereElse"])];
        let snapshot = snapshot_of(&units);
        let orphan = snapshot.class_named("Orphan").cloned().unwrap();
        assert!(!snapshot.is_actor(&orphan));
    }

    #[test]
    fn is_actor_terminates_on_inheritance_cycles() {
        let units = [class_unit("A", &["B"]), class_unit("B", &["A"])];
        let snapshot = snapshot_of(&units);
        let a = snapshot.class_named("A").cloned().unwrap();
        assert!(!snapshot.is_actor(&a));
    }

    #[test]
    fn duplicate_class_names_resolve_last_writer_wins() {
        let first = class_unit("Dup", &["Actor"]);
        let second = class_unit("Dup", &["NSObject"]);
        let mut table = SymbolTable::new();
        table.index(&first);
        table.index(&second);
        let (snapshot, _) = table.freeze();

        let dup = snapshot.class_named("Dup").cloned().unwrap();
        assert!(!snapshot.is_actor(&dup));
    }
}
