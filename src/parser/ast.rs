use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use crate::lowering::syntax::{Extent, NodeKind, SyntaxNode, SyntaxToken};

/// Cursor-style syntax node. All nodes of one parse share the token stream
/// and keep the range of tokens they cover.
#[derive(Clone)]
pub struct Node {
    kind: NodeKind,
    spelling: String,
    type_text: String,
    children: Vec<Node>,
    stream: Rc<[SyntaxToken]>,
    range: Range<usize>,
}

impl Node {
    /// Build a standalone node owning `tokens`.
    pub fn new(
        kind: NodeKind,
        spelling: impl Into<String>,
        type_text: impl Into<String>,
        children: Vec<Node>,
        tokens: Vec<SyntaxToken>,
    ) -> Self {
        let range = 0..tokens.len();
        Self::in_stream(kind, spelling, type_text, children, tokens.into(), range)
    }

    pub(crate) fn in_stream(
        kind: NodeKind,
        spelling: impl Into<String>,
        type_text: impl Into<String>,
        children: Vec<Node>,
        stream: Rc<[SyntaxToken]>,
        range: Range<usize>,
    ) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            type_text: type_text.into(),
            children,
            stream,
            range,
        }
    }

    /// Function declarations directly under a translation unit.
    pub fn functions(&self) -> impl Iterator<Item = &Node> {
        self.children
            .iter()
            .filter(|child| child.kind == NodeKind::FunctionDecl)
    }
}

impl SyntaxNode for Node {
    fn kind(&self) -> NodeKind {
        self.kind.clone()
    }

    fn spelling(&self) -> &str {
        &self.spelling
    }

    fn type_text(&self) -> &str {
        &self.type_text
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn tokens(&self) -> &[SyntaxToken] {
        &self.stream[self.range.clone()]
    }

    fn extent(&self) -> Extent {
        match (self.tokens().first(), self.tokens().last()) {
            (Some(first), Some(last)) => Extent::new(first.extent.start, last.extent.end),
            _ => match (self.children.first(), self.children.last()) {
                (Some(first), Some(last)) => {
                    Extent::new(first.extent().start, last.extent().end)
                }
                _ => Extent::default(),
            },
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("spelling", &self.spelling)
            .field("type_text", &self.type_text)
            .field("children", &self.children)
            .finish()
    }
}
