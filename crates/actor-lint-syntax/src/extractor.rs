//! Structural extraction: a brace-depth scanner over the
//! comment/string-masked source, producing the arena tree the
//! resolver indexes.
//!
//! This is deliberately not a full parser. It recognizes the
//! declaration shapes the rules consume — type declarations with
//! inheritance clauses, functions with parameter lists, member
//! variables with call-expression initializers, and statement-level
//! calls with dotted callees — and ignores everything else. Matches
//! inside comments and strings never happen because those bytes are
//! blanked before scanning.

use std::sync::LazyLock;

use regex::Regex;

use actor_lint_core::{
    Accessibility, ExtractError, NodeKind, SyntaxExtractor, SyntaxNode, SyntaxTree, TokenMap,
};

use crate::tokenizer;

/// Reference implementation of the syntax-extraction service for the
/// Swift-like actor language.
#[derive(Debug, Default)]
pub struct SwiftExtractor;

impl SwiftExtractor {
    /// Creates an extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxExtractor for SwiftExtractor {
    fn extract(&self, content: &str) -> Result<(SyntaxTree, TokenMap), ExtractError> {
        let tokens = tokenizer::classify(content)?;
        let masked = tokenizer::mask(content, &tokens);
        let tree = Scanner::new(&masked).scan()?;
        tracing::trace!(
            nodes = tree.len(),
            tokens = tokens.spans().len(),
            "extracted structural tree"
        );
        Ok((tree, tokens))
    }
}

static FUNC_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^((?:(?:public|private|fileprivate|internal|open|final|override|static|class|mutating|required)\s+)*)func\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?:<[^>\n]*>)?\s*\(",
    )
    .unwrap_or_else(|_| unreachable!("func head pattern is valid"))
});

static INIT_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^((?:(?:public|private|fileprivate|internal|open|final|override|required|convenience)\s+)*)init\s*[?!]?\s*\(",
    )
    .unwrap_or_else(|_| unreachable!("init head pattern is valid"))
});

static TYPE_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^((?:(?:public|private|fileprivate|internal|open|final)\s+)*)(class|protocol|extension)\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?::\s*([^{]*?))?\s*\{",
    )
    .unwrap_or_else(|_| unreachable!("type head pattern is valid"))
});

static OTHER_TYPE_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:public|private|fileprivate|internal|open|final|indirect)\s+)*(?:struct|enum)\s+[A-Za-z_][A-Za-z0-9_]*[^{\n]*",
    )
    .unwrap_or_else(|_| unreachable!("struct/enum head pattern is valid"))
});

static VAR_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^((?:(?:public|private|fileprivate|internal|open|final|override|static|class|lazy|weak|unowned)\s+)*)(var|let)\s+([A-Za-z_][A-Za-z0-9_]*)(\s*:\s*([^=\n{]+))?",
    )
    .unwrap_or_else(|_| unreachable!("var head pattern is valid"))
});

static CALL_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([A-Za-z_][A-Za-z0-9_]*(?:\s*\.\s*[A-Za-z_][A-Za-z0-9_]*)*)\s*([({])",
    )
    .unwrap_or_else(|_| unreachable!("call head pattern is valid"))
});

static RETURN_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:throws\s*|rethrows\s*)?(?:->\s*[^{\n]+)?")
        .unwrap_or_else(|_| unreachable!("return clause pattern is valid"))
});

static ASSIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*=\s*").unwrap_or_else(|_| unreachable!("assign pattern is valid"))
});

static OPEN_BRACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\{").unwrap_or_else(|_| unreachable!("brace pattern is valid"))
});

static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*")
        .unwrap_or_else(|_| unreachable!("word pattern is valid"))
});

/// Identifiers that can never begin a call expression.
const KEYWORDS: &[&str] = &[
    "class", "protocol", "extension", "func", "init", "deinit", "var", "let", "if", "else",
    "for", "while", "repeat", "switch", "case", "default", "guard", "return", "in", "import",
    "struct", "enum", "typealias", "where", "do", "catch", "try", "throw", "throws", "super",
    "break", "continue", "true", "false", "nil", "public", "private", "fileprivate", "internal",
    "open", "final", "override", "static", "lazy", "weak", "unowned", "required", "convenience",
    "mutating", "get", "set", "willSet", "didSet",
];

/// One open scope: the node and the depth its brace opened at; the
/// node's extent is patched when depth returns there.
struct Scope {
    node: usize,
    open_depth: usize,
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    tree: SyntaxTree,
    stack: Vec<Scope>,
    depth: usize,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(masked: &'a str) -> Self {
        Self {
            text: masked,
            bytes: masked.as_bytes(),
            tree: SyntaxTree::new(masked.len()),
            stack: Vec::new(),
            depth: 0,
            pos: 0,
        }
    }

    fn scan(mut self) -> Result<SyntaxTree, ExtractError> {
        while self.pos < self.bytes.len() {
            let byte = self.bytes[self.pos];
            if byte.is_ascii_whitespace() || byte == b';' || byte == b',' {
                self.pos += 1;
                continue;
            }
            if byte == b'{' {
                self.depth += 1;
                self.pos += 1;
                continue;
            }
            if byte == b'}' {
                self.close_brace()?;
                continue;
            }
            if self.try_function()
                || self.try_initializer()
                || self.try_type_declaration()
                || self.try_other_type()
                || self.try_variable()
                || self.try_call()
            {
                continue;
            }
            self.skip_token();
        }

        if self.depth != 0 || !self.stack.is_empty() {
            return Err(ExtractError::UnbalancedBraces {
                offset: self.bytes.len(),
            });
        }
        Ok(self.tree)
    }

    fn close_brace(&mut self) -> Result<(), ExtractError> {
        if self.depth == 0 {
            return Err(ExtractError::UnbalancedBraces { offset: self.pos });
        }
        self.depth -= 1;
        while let Some(top) = self.stack.last() {
            if top.open_depth != self.depth {
                break;
            }
            let node = top.node;
            let offset = self.tree.node(node).offset;
            self.tree.node_mut(node).length = self.pos + 1 - offset;
            self.stack.pop();
        }
        self.pos += 1;
        Ok(())
    }

    fn parent(&self) -> usize {
        self.stack.last().map_or(self.tree.root(), |s| s.node)
    }

    fn parent_kind(&self) -> NodeKind {
        self.tree.node(self.parent()).kind
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn skip_token(&mut self) {
        if let Some(word) = WORD.find(self.rest()) {
            self.pos += word.end();
        } else {
            self.pos += 1;
        }
    }

    /// Index of the `)` matching the `(` at `open`, or `None` when the
    /// file ends first.
    fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut level = 1usize;
        let mut idx = open + 1;
        while idx < self.bytes.len() {
            match self.bytes[idx] {
                b'(' => level += 1,
                b')' => {
                    level -= 1;
                    if level == 0 {
                        return Some(idx);
                    }
                }
                _ => {}
            }
            idx += 1;
        }
        None
    }

    fn line_end(&self, from: usize) -> usize {
        self.bytes[from..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.bytes.len(), |rel| from + rel)
    }

    /// Opens a scope for `node` at the brace located at `brace`.
    fn open_scope(&mut self, node: usize, brace: usize) {
        self.stack.push(Scope {
            node,
            open_depth: self.depth,
        });
        self.depth += 1;
        self.pos = brace + 1;
    }

    fn try_type_declaration(&mut self) -> bool {
        let Some(caps) = TYPE_HEAD.captures(self.rest()) else {
            return false;
        };
        let whole = caps.get(0).map_or(0, |m| m.end());
        let kind = match &caps[2] {
            "class" => NodeKind::Class,
            "protocol" => NodeKind::Protocol,
            _ => NodeKind::Extension,
        };
        let inherited: Vec<String> = caps
            .get(4)
            .map(|m| {
                m.as_str()
                    .split(',')
                    .map(|s| s.trim().to_owned())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let node = SyntaxNode::new(kind, self.pos, whole)
            .named(&caps[3])
            .with_accessibility(parse_access(&caps[1]))
            .inheriting(inherited);
        let parent = self.parent();
        let index = self.tree.push(parent, node);

        // The head pattern always ends at the opening brace.
        let brace = self.pos + whole - 1;
        self.open_scope(index, brace);
        true
    }

    /// Consumes a `struct`/`enum` head so its name cannot read as a
    /// trailing-closure call. The taxonomy has no node for these; the
    /// body brace is treated as an anonymous block.
    fn try_other_type(&mut self) -> bool {
        match OTHER_TYPE_HEAD.find(self.rest()) {
            Some(head) => {
                self.pos += head.end();
                true
            }
            None => false,
        }
    }

    fn try_function(&mut self) -> bool {
        let Some(caps) = FUNC_HEAD.captures(self.rest()) else {
            return false;
        };
        let name = caps[2].to_owned();
        let mods = caps[1].to_owned();
        let open = self.pos + caps.get(0).map_or(0, |m| m.end()) - 1;
        self.push_function_like(&name, &mods, open, false)
    }

    fn try_initializer(&mut self) -> bool {
        let Some(caps) = INIT_HEAD.captures(self.rest()) else {
            return false;
        };
        let mods = caps[1].to_owned();
        let open = self.pos + caps.get(0).map_or(0, |m| m.end()) - 1;
        self.push_function_like("init", &mods, open, true)
    }

    fn push_function_like(
        &mut self,
        name: &str,
        mods: &str,
        open_paren: usize,
        constructor: bool,
    ) -> bool {
        let Some(close_paren) = self.matching_paren(open_paren) else {
            // Malformed parameter list; treat the head as opaque text.
            self.pos = open_paren + 1;
            return true;
        };

        let kind = if constructor {
            NodeKind::FunctionConstructor
        } else {
            match self.parent_kind() {
                NodeKind::Class | NodeKind::Protocol | NodeKind::Extension => {
                    if has_modifier(mods, "static") {
                        NodeKind::FunctionStatic
                    } else if has_modifier(mods, "class") {
                        NodeKind::FunctionClass
                    } else {
                        NodeKind::FunctionInstance
                    }
                }
                NodeKind::File => NodeKind::FunctionFree,
                _ => NodeKind::FunctionFree,
            }
        };

        let node = SyntaxNode::new(kind, self.pos, close_paren + 1 - self.pos)
            .named(name)
            .with_accessibility(parse_access(mods));
        let parent = self.parent();
        let index = self.tree.push(parent, node);

        for (param_offset, param) in split_params(&self.text[open_paren + 1..close_paren]) {
            let Some((label, type_name)) = parse_param(param) else {
                continue;
            };
            let abs = open_paren + 1 + param_offset;
            self.tree.push(
                index,
                SyntaxNode::new(NodeKind::VarParameter, abs, param.len())
                    .named(label)
                    .typed(type_name),
            );
        }

        let after = close_paren + 1;
        let clause = RETURN_CLAUSE
            .find(&self.text[after..])
            .map_or(0, |m| m.end());
        let head_end = after + clause;
        if self.bytes.get(head_end) == Some(&b'{') {
            self.open_scope(index, head_end);
        } else {
            self.pos = after;
        }
        true
    }

    fn try_variable(&mut self) -> bool {
        let Some(caps) = VAR_HEAD.captures(self.rest()) else {
            return false;
        };
        let whole = caps.get(0).map_or(0, |m| m.end());
        let kind = match self.parent_kind() {
            NodeKind::File => NodeKind::VarGlobal,
            NodeKind::Class | NodeKind::Protocol | NodeKind::Extension => {
                if has_modifier(&caps[1], "static") || has_modifier(&caps[1], "class") {
                    NodeKind::VarClass
                } else {
                    NodeKind::VarInstance
                }
            }
            _ => NodeKind::VarLocal,
        };

        let mut node = SyntaxNode::new(kind, self.pos, whole)
            .named(&caps[3])
            .with_accessibility(parse_access(&caps[1]));
        if let Some(ty) = caps.get(5) {
            node = node.typed(ty.as_str().trim());
        }
        let parent = self.parent();
        let var_offset = self.pos;
        let index = self.tree.push(parent, node);

        let head_end = self.pos + whole;
        let tail = &self.text[head_end..];

        if let Some(assign) = ASSIGN.find(tail) {
            let expr_start = head_end + assign.end();
            if let Some(call) = CALL_HEAD.captures(&self.text[expr_start..]) {
                let callee = normalize_callee(&call[1]);
                if !is_keyword_path(&callee) && &call[2] == "(" {
                    let open = expr_start + call.get(0).map_or(0, |m| m.end()) - 1;
                    if let Some(close) = self.matching_paren(open) {
                        let call_node = self.tree.push(
                            parent,
                            SyntaxNode::new(NodeKind::CallExpr, expr_start, close + 1 - expr_start)
                                .named(callee),
                        );
                        let after = close + 1;
                        if let Some(brace) = OPEN_BRACE.find(&self.text[after..]) {
                            // Trailing closure: both the variable and
                            // its constructor call extend to the
                            // closing brace.
                            let brace_abs = after + brace.end() - 1;
                            self.stack.push(Scope {
                                node: index,
                                open_depth: self.depth,
                            });
                            self.open_scope(call_node, brace_abs);
                            return true;
                        }
                        let end = self.line_end(var_offset);
                        self.tree.node_mut(index).length = end - var_offset;
                        self.pos = after;
                        return true;
                    }
                }
            }
            let end = self.line_end(var_offset);
            self.tree.node_mut(index).length = end - var_offset;
            self.pos = expr_start;
            return true;
        }

        if let Some(brace) = OPEN_BRACE.find(tail) {
            // Computed property or accessor block.
            let brace_abs = head_end + brace.end() - 1;
            self.open_scope(index, brace_abs);
            return true;
        }

        self.pos = head_end;
        true
    }

    fn try_call(&mut self) -> bool {
        let Some(caps) = CALL_HEAD.captures(self.rest()) else {
            return false;
        };
        let callee = normalize_callee(&caps[1]);
        if is_keyword_path(&callee) {
            return false;
        }

        if &caps[2] == "(" {
            let open = self.pos + caps.get(0).map_or(0, |m| m.end()) - 1;
            let Some(close) = self.matching_paren(open) else {
                return false;
            };
            let node = self.tree.push(
                self.parent(),
                SyntaxNode::new(NodeKind::CallExpr, self.pos, close + 1 - self.pos).named(callee),
            );
            let after = close + 1;
            if let Some(brace) = OPEN_BRACE.find(&self.text[after..]) {
                let brace_abs = after + brace.end() - 1;
                self.open_scope(node, brace_abs);
            } else {
                self.pos = after;
            }
            return true;
        }

        // Trailing-closure-only call. Requiring a dotted or
        // capitalized callee keeps control-flow conditions
        // (`while ready {`) from reading as calls.
        if !callee.contains('.') && !callee.starts_with(|c: char| c.is_ascii_uppercase()) {
            return false;
        }
        let brace = self.pos + caps.get(0).map_or(0, |m| m.end()) - 1;
        let node = self.tree.push(
            self.parent(),
            SyntaxNode::new(NodeKind::CallExpr, self.pos, brace + 1 - self.pos).named(callee),
        );
        self.open_scope(node, brace);
        true
    }
}

fn parse_access(mods: &str) -> Accessibility {
    if has_modifier(mods, "private") {
        Accessibility::Private
    } else if has_modifier(mods, "fileprivate") {
        Accessibility::FilePrivate
    } else if has_modifier(mods, "open") {
        Accessibility::Open
    } else if has_modifier(mods, "public") {
        Accessibility::Public
    } else {
        Accessibility::Internal
    }
}

fn has_modifier(mods: &str, wanted: &str) -> bool {
    mods.split_whitespace().any(|m| m == wanted)
}

fn normalize_callee(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_keyword_path(callee: &str) -> bool {
    let first = callee.split('.').next().unwrap_or(callee);
    KEYWORDS.contains(&first)
}

/// Splits a parameter list on top-level commas, yielding each piece
/// with its offset into the list text.
fn split_params(list: &str) -> Vec<(usize, &str)> {
    let mut pieces = Vec::new();
    let mut level = 0usize;
    let mut start = 0usize;
    for (idx, byte) in list.bytes().enumerate() {
        match byte {
            b'(' | b'[' | b'<' => level += 1,
            b')' | b']' | b'>' => level = level.saturating_sub(1),
            b',' if level == 0 => {
                pieces.push((start, &list[start..idx]));
                start = idx + 1;
            }
            _ => {}
        }
    }
    if start < list.len() {
        pieces.push((start, &list[start..]));
    }
    pieces
        .into_iter()
        .filter(|(_, piece)| !piece.trim().is_empty())
        .collect()
}

/// Parses `label name: Type` (or `name: Type`, `_ name: Type`) into
/// the bound name and its type.
fn parse_param(param: &str) -> Option<(&str, &str)> {
    let without_default = param.split('=').next().unwrap_or(param);
    let (names, type_name) = without_default.split_once(':')?;
    let name = names.split_whitespace().last()?;
    Some((name, type_name.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_lint_core::SyntaxUnit;
    use std::sync::Arc;

    fn extract(content: &str) -> actor_lint_core::Declaration {
        let (tree, tokens) = SwiftExtractor::new().extract(content).unwrap();
        actor_lint_core::Declaration::root(Arc::new(SyntaxUnit::new(
            "test.swift",
            content,
            tree,
            tokens,
        )))
    }

    fn find(
        decl: &actor_lint_core::Declaration,
        kind: NodeKind,
        name: &str,
    ) -> Option<actor_lint_core::Declaration> {
        let mut pending = vec![decl.clone()];
        while let Some(current) = pending.pop() {
            if current.kind() == kind && current.name() == Some(name) {
                return Some(current);
            }
            pending.extend(current.children());
        }
        None
    }

    #[test]
    fn class_with_inheritance() {
        let root = extract("class SomeActor: Actor, Viewable {\n}\n");
        let class = find(&root, NodeKind::Class, "SomeActor").unwrap();
        assert_eq!(class.node().inherited_types, vec!["Actor", "Viewable"]);
        assert_eq!(class.offset(), 0);
    }

    #[test]
    fn single_line_class_with_function() {
        let root = extract("class SomeActor: Actor { public func foo() { } }\n");
        let class = find(&root, NodeKind::Class, "SomeActor").unwrap();
        let func = find(&root, NodeKind::FunctionInstance, "foo").unwrap();
        assert_eq!(func.accessibility(), Accessibility::Public);
        assert_eq!(func.node().parent, Some(class.index()));
        assert_eq!(func.offset(), 25);
    }

    #[test]
    fn private_function_accessibility() {
        let root = extract("class A: Actor { private func hidden() { } }\n");
        let func = find(&root, NodeKind::FunctionInstance, "hidden").unwrap();
        assert_eq!(func.accessibility(), Accessibility::Private);
    }

    #[test]
    fn constructor_is_not_an_instance_function() {
        let root = extract("class A: Actor { init(_ data: Data) { self.data = data } }\n");
        let ctor = find(&root, NodeKind::FunctionConstructor, "init").unwrap();
        let params: Vec<_> = ctor
            .children()
            .filter(|c| c.kind() == NodeKind::VarParameter)
            .collect();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name(), Some("data"));
        assert_eq!(params[0].node().type_name.as_deref(), Some("Data"));
    }

    #[test]
    fn free_function_parameters() {
        let root = extract("func add(_ a: Int, to b: Int) -> Int { }\n");
        let func = find(&root, NodeKind::FunctionFree, "add").unwrap();
        let params: Vec<_> = func
            .children()
            .filter(|c| c.kind() == NodeKind::VarParameter)
            .collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name(), Some("a"));
        assert_eq!(params[1].name(), Some("b"));
    }

    #[test]
    fn member_variable_with_message_constructor_sibling() {
        let source = "\
class StringBuilder: Actor {
    private var string: String = \"\"
    lazy var beAppend = ChainableBehavior(self) { (args: BehaviorArgs) in
        let value: String = args[x: 0]
        self.string.append(value)
    }
}
";
        let root = extract(source);
        let class = find(&root, NodeKind::Class, "StringBuilder").unwrap();
        let members: Vec<_> = class.children().collect();

        let var_pos = members
            .iter()
            .position(|m| m.name() == Some("beAppend"))
            .unwrap();
        assert_eq!(members[var_pos].kind(), NodeKind::VarInstance);
        let sibling = &members[var_pos + 1];
        assert_eq!(sibling.kind(), NodeKind::CallExpr);
        assert_eq!(sibling.name(), Some("ChainableBehavior"));

        // The entry's extent covers the closure body, so annotation
        // and args scans see it.
        assert!(members[var_pos].body().contains("args[x: 0]"));
    }

    #[test]
    fn statement_calls_have_dotted_names() {
        let source = "\
let actor = WhoseCallWasThisAnyway()
actor.printFoo()
actor.protected_printBar()
";
        let root = extract(source);
        assert!(find(&root, NodeKind::CallExpr, "WhoseCallWasThisAnyway").is_some());
        assert!(find(&root, NodeKind::CallExpr, "actor.printFoo").is_some());
        assert!(find(&root, NodeKind::CallExpr, "actor.protected_printBar").is_some());

        let var = find(&root, NodeKind::VarGlobal, "actor").unwrap();
        assert_eq!(var.offset(), 0);
    }

    #[test]
    fn trailing_closure_call() {
        let root = extract("a.beResult { (value: String) in\n    print(value)\n}\n");
        let call = find(&root, NodeKind::CallExpr, "a.beResult").unwrap();
        assert!(call.body().contains("print"));
    }

    #[test]
    fn control_flow_braces_are_not_calls() {
        let source = "func run() {\n    for item in items {\n        use(item)\n    }\n}\n";
        let root = extract(source);
        assert!(find(&root, NodeKind::CallExpr, "items").is_none());
        assert!(find(&root, NodeKind::CallExpr, "use").is_some());
    }

    #[test]
    fn class_nested_in_function_is_reachable() {
        let source = "func outer() {\n    class Hidden: Actor {\n    }\n}\n";
        let root = extract(source);
        let hidden = find(&root, NodeKind::Class, "Hidden").unwrap();
        let outer = find(&root, NodeKind::FunctionFree, "outer").unwrap();
        assert_eq!(hidden.node().parent, Some(outer.index()));
    }

    #[test]
    fn comments_and_strings_hide_declarations() {
        let source = "// class Fake: Actor {}\nlet s = \"class AlsoFake {\"\n";
        let root = extract(source);
        assert!(find(&root, NodeKind::Class, "Fake").is_none());
        assert!(find(&root, NodeKind::Class, "AlsoFake").is_none());
    }

    #[test]
    fn unbalanced_braces_error() {
        let err = SwiftExtractor::new().extract("class A {\n").unwrap_err();
        assert!(matches!(err, ExtractError::UnbalancedBraces { .. }));
        let err = SwiftExtractor::new().extract("}\n").unwrap_err();
        assert!(matches!(err, ExtractError::UnbalancedBraces { offset: 0 }));
    }

    #[test]
    fn protocol_with_bodyless_requirements() {
        let source = "protocol Viewable {\n    func render(_ rect: Rect)\n}\n";
        let root = extract(source);
        let proto = find(&root, NodeKind::Protocol, "Viewable").unwrap();
        let render = find(&root, NodeKind::FunctionInstance, "render").unwrap();
        assert_eq!(render.node().parent, Some(proto.index()));
    }
}
