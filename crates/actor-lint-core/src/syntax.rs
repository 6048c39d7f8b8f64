//! Per-file syntax data: the structural tree, the token classification
//! map, and [`Declaration`] — the unit of work handed to rules.
//!
//! The tree is an arena of nodes with parent/child indices. A
//! [`Declaration`] is an index into the arena plus a shared handle on
//! the owning [`SyntaxUnit`], so focusing on a substructure never
//! copies file content. Byte offsets are always relative to the
//! original file content, which is what lets diagnostics map back to
//! line/column after any amount of refocusing.

use std::collections::HashSet;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::conventions::ANNOTATION_MARKER;

/// Classification of a source byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Ordinary code.
    Code,
    /// Line or block comment.
    Comment,
    /// Documentation comment.
    DocComment,
    /// String literal, including its quotes.
    Str,
}

impl TokenKind {
    /// True for ranges pattern matching must ignore.
    #[must_use]
    pub fn is_quiet(self) -> bool {
        !matches!(self, Self::Code)
    }
}

/// One classified byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    /// Byte offset of the range start.
    pub offset: usize,
    /// Length of the range in bytes.
    pub length: usize,
    /// Classification.
    pub kind: TokenKind,
}

impl TokenSpan {
    /// Creates a span.
    #[must_use]
    pub fn new(offset: usize, length: usize, kind: TokenKind) -> Self {
        Self {
            offset,
            length,
            kind,
        }
    }

    fn contains(&self, offset: usize) -> bool {
        offset >= self.offset && offset < self.offset + self.length
    }
}

/// Flat, ordered map of the non-code ranges of one file.
///
/// Anything not covered by a span is [`TokenKind::Code`].
#[derive(Debug, Clone, Default)]
pub struct TokenMap {
    spans: Vec<TokenSpan>,
}

impl TokenMap {
    /// Builds a map from spans in any order.
    #[must_use]
    pub fn new(mut spans: Vec<TokenSpan>) -> Self {
        spans.sort_by_key(|s| s.offset);
        Self { spans }
    }

    /// All spans, ordered by offset.
    #[must_use]
    pub fn spans(&self) -> &[TokenSpan] {
        &self.spans
    }

    /// Classification of the byte at `offset`.
    #[must_use]
    pub fn kind_at(&self, offset: usize) -> TokenKind {
        let idx = self.spans.partition_point(|s| s.offset <= offset);
        if idx > 0 && self.spans[idx - 1].contains(offset) {
            return self.spans[idx - 1].kind;
        }
        TokenKind::Code
    }

    /// True if the byte at `offset` is inside a comment, doc comment,
    /// or string literal.
    #[must_use]
    pub fn is_quiet(&self, offset: usize) -> bool {
        self.kind_at(offset).is_quiet()
    }

    /// Comment and doc-comment spans starting within `range`.
    pub fn comments_in(&self, range: Range<usize>) -> impl Iterator<Item = &TokenSpan> {
        self.spans.iter().filter(move |s| {
            range.contains(&s.offset)
                && matches!(s.kind, TokenKind::Comment | TokenKind::DocComment)
        })
    }
}

/// Declaration taxonomy exposed by the syntax-extraction service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The root node of a file.
    File,
    /// `class` declaration.
    Class,
    /// `protocol` declaration.
    Protocol,
    /// `extension` declaration.
    Extension,
    /// Free function at file scope.
    FunctionFree,
    /// Instance method.
    FunctionInstance,
    /// `class func`.
    FunctionClass,
    /// `static func`.
    FunctionStatic,
    /// `init` declaration.
    FunctionConstructor,
    /// File-scope variable.
    VarGlobal,
    /// Instance variable.
    VarInstance,
    /// `class var`.
    VarClass,
    /// Local variable inside a function body.
    VarLocal,
    /// Function parameter.
    VarParameter,
    /// Call expression.
    CallExpr,
}

impl NodeKind {
    /// True for every function-declaration variant.
    #[must_use]
    pub fn is_function(self) -> bool {
        matches!(
            self,
            Self::FunctionFree
                | Self::FunctionInstance
                | Self::FunctionClass
                | Self::FunctionStatic
                | Self::FunctionConstructor
        )
    }

    /// True for member-level variable variants (not locals or
    /// parameters).
    #[must_use]
    pub fn is_member_variable(self) -> bool {
        matches!(self, Self::VarGlobal | Self::VarInstance | Self::VarClass)
    }
}

/// Access control level of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessibility {
    /// `private`.
    Private,
    /// `fileprivate`.
    FilePrivate,
    /// Default visibility.
    Internal,
    /// `public`.
    Public,
    /// `open`.
    Open,
}

/// One node of the structural tree.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    /// Declaration kind.
    pub kind: NodeKind,
    /// Declared name, when the construct has one.
    pub name: Option<String>,
    /// Declared type, for variables and parameters.
    pub type_name: Option<String>,
    /// Byte offset into the original file content.
    pub offset: usize,
    /// Byte length of the declaration, body included.
    pub length: usize,
    /// Access control level.
    pub accessibility: Accessibility,
    /// Names of directly inherited types.
    pub inherited_types: Vec<String>,
    /// Arena index of the enclosing node; `None` only for the root.
    pub parent: Option<usize>,
    /// Arena indices of nested nodes, in source order.
    pub children: Vec<usize>,
}

impl SyntaxNode {
    /// Creates a node with no name, default visibility, and no
    /// relations; the tree fills in parent/children on insertion.
    #[must_use]
    pub fn new(kind: NodeKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            name: None,
            type_name: None,
            offset,
            length,
            accessibility: Accessibility::Internal,
            inherited_types: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Sets the declared name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the declared type.
    #[must_use]
    pub fn typed(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Sets the access level.
    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Sets the inherited-type list.
    #[must_use]
    pub fn inheriting(mut self, types: Vec<String>) -> Self {
        self.inherited_types = types;
        self
    }

    fn byte_range(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }
}

/// Arena-backed structural tree of one file. Node 0 is always the
/// [`NodeKind::File`] root.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Creates a tree containing only the file root covering
    /// `content_len` bytes.
    #[must_use]
    pub fn new(content_len: usize) -> Self {
        Self {
            nodes: vec![SyntaxNode::new(NodeKind::File, 0, content_len)],
        }
    }

    /// Index of the file root.
    #[must_use]
    pub fn root(&self) -> usize {
        0
    }

    /// Node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` was not produced by this tree.
    #[must_use]
    pub fn node(&self, index: usize) -> &SyntaxNode {
        &self.nodes[index]
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Mutable node access, for builders that patch up extents as
    /// scopes close. Trees are immutable once wrapped in a
    /// [`SyntaxUnit`].
    ///
    /// # Panics
    ///
    /// Panics if `index` was not produced by this tree.
    #[must_use]
    pub fn node_mut(&mut self, index: usize) -> &mut SyntaxNode {
        &mut self.nodes[index]
    }

    /// Appends `node` as the last child of `parent` and returns its
    /// index.
    pub fn push(&mut self, parent: usize, mut node: SyntaxNode) -> usize {
        let index = self.nodes.len();
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent].children.push(index);
        index
    }
}

/// The normalized unit threaded through the pipeline: one file's
/// content, structural tree, token map, and rule-exemption set.
///
/// Created once by the analyzer stage and shared as `Arc<SyntaxUnit>`
/// from then on; nothing mutates it afterwards.
#[derive(Debug)]
pub struct SyntaxUnit {
    /// Path the file was read from.
    pub path: PathBuf,
    /// Full file content.
    pub content: String,
    /// Structural tree.
    pub tree: SyntaxTree,
    /// Token classification map.
    pub tokens: TokenMap,
    /// Identifiers of rules whose precheck rejected this file.
    pub exempt: HashSet<&'static str>,
}

impl SyntaxUnit {
    /// Assembles a unit with an empty exemption set.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        content: impl Into<String>,
        tree: SyntaxTree,
        tokens: TokenMap,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            tree,
            tokens,
            exempt: HashSet::new(),
        }
    }

    /// True if `rule_id` was precheck-rejected for this file.
    #[must_use]
    pub fn is_exempt(&self, rule_id: &str) -> bool {
        self.exempt.contains(rule_id)
    }
}

/// A structured annotation harvested from a comment, e.g. the payload
/// of `// actor-lint: parameter String - the value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Byte offset of the comment the annotation lives in.
    pub offset: usize,
    /// Text following the marker and label, trimmed.
    pub payload: String,
}

/// One regex match inside a declaration's byte range.
#[derive(Debug, Clone)]
pub struct PatternMatch {
    /// Absolute byte offset of the whole match.
    pub offset: usize,
    /// Capture groups; index 0 is the whole match, unset groups are
    /// empty strings.
    pub groups: Vec<String>,
}

/// A [`SyntaxUnit`] focused on one node of its tree.
#[derive(Debug, Clone)]
pub struct Declaration {
    unit: Arc<SyntaxUnit>,
    node: usize,
}

impl Declaration {
    /// Focuses `unit` on `node`.
    #[must_use]
    pub fn new(unit: Arc<SyntaxUnit>, node: usize) -> Self {
        Self { unit, node }
    }

    /// Focuses `unit` on its file root.
    #[must_use]
    pub fn root(unit: Arc<SyntaxUnit>) -> Self {
        let node = unit.tree.root();
        Self { unit, node }
    }

    /// The owning unit.
    #[must_use]
    pub fn unit(&self) -> &Arc<SyntaxUnit> {
        &self.unit
    }

    /// The focal node.
    #[must_use]
    pub fn node(&self) -> &SyntaxNode {
        self.unit.tree.node(self.node)
    }

    /// Arena index of the focal node.
    #[must_use]
    pub fn index(&self) -> usize {
        self.node
    }

    /// Path of the owning file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.unit.path
    }

    /// Kind of the focal node.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.node().kind
    }

    /// Name of the focal node.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.node().name.as_deref()
    }

    /// Access level of the focal node.
    #[must_use]
    pub fn accessibility(&self) -> Accessibility {
        self.node().accessibility
    }

    /// Byte offset of the focal node.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.node().offset
    }

    /// Same unit, different focal node.
    #[must_use]
    pub fn focus(&self, node: usize) -> Self {
        Self {
            unit: Arc::clone(&self.unit),
            node,
        }
    }

    /// Child declarations of the focal node, in source order.
    pub fn children(&self) -> impl Iterator<Item = Declaration> + '_ {
        self.node().children.iter().map(|&idx| self.focus(idx))
    }

    /// Dot-joined chain of named enclosing scopes plus the node's own
    /// name. Derivable only from the owning tree; scopes are never
    /// resolved across files.
    #[must_use]
    pub fn qualified_name(&self) -> Option<String> {
        let own = self.node().name.clone()?;
        let mut parts = Vec::new();
        let mut cursor = self.node().parent;
        while let Some(idx) = cursor {
            let node = self.unit.tree.node(idx);
            if let Some(name) = &node.name {
                parts.push(name.clone());
            }
            cursor = node.parent;
        }
        parts.reverse();
        parts.push(own);
        Some(parts.join("."))
    }

    /// Source text of the focal node's byte range, clamped to the
    /// file.
    #[must_use]
    pub fn body(&self) -> &str {
        let range = self.clamped_range();
        &self.unit.content[range]
    }

    fn clamped_range(&self) -> Range<usize> {
        let range = self.node().byte_range();
        let end = range.end.min(self.unit.content.len());
        range.start.min(end)..end
    }

    /// Offset of the first match of `pattern` inside the focal node's
    /// byte range that does not start inside a comment, doc comment,
    /// or string literal.
    ///
    /// The structural tree does not expose variable-access
    /// expressions, so rules fall back to scanning raw source text;
    /// the token map keeps such scans from misfiring on matches inside
    /// comments and strings.
    #[must_use]
    pub fn find_match(&self, pattern: &Regex) -> Option<usize> {
        let range = self.clamped_range();
        let base = range.start;
        pattern
            .find_iter(&self.unit.content[range])
            .map(|m| base + m.start())
            .find(|&offset| !self.unit.tokens.is_quiet(offset))
    }

    /// Invokes `visit` for every match of `pattern` inside the focal
    /// node's byte range, skipping matches that start inside quiet
    /// tokens.
    pub fn for_each_match<F>(&self, pattern: &Regex, mut visit: F)
    where
        F: FnMut(&PatternMatch),
    {
        let range = self.clamped_range();
        let base = range.start;
        for caps in pattern.captures_iter(&self.unit.content[range]) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            let offset = base + whole.start();
            if self.unit.tokens.is_quiet(offset) {
                continue;
            }
            let groups = caps
                .iter()
                .map(|g| g.map_or_else(String::new, |m| m.as_str().to_owned()))
                .collect();
            visit(&PatternMatch { offset, groups });
        }
    }

    /// Harvests `actor-lint: <label>` annotations from comments inside
    /// the focal node's byte range.
    #[must_use]
    pub fn annotations(&self, label: &str) -> Vec<Annotation> {
        let marker = format!("{ANNOTATION_MARKER} {label}");
        let range = self.clamped_range();
        let mut found = Vec::new();
        for span in self.unit.tokens.comments_in(range) {
            let end = (span.offset + span.length).min(self.unit.content.len());
            let text = &self.unit.content[span.offset..end];
            if let Some(pos) = text.find(&marker) {
                let rest = &text[pos + marker.len()..];
                let line = rest.split('\n').next().unwrap_or(rest);
                found.push(Annotation {
                    offset: span.offset,
                    payload: line.trim().to_owned(),
                });
            }
        }
        found
    }
}
