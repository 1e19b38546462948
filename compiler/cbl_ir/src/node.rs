//! The tree handed to semantic analysis and to editor features.
//!
//! Copybook resolution produces one [`Node`] per copy occurrence and per
//! run of ordinary text. A [`CopyNode`] owns the nodes of the copybook it
//! includes, so the tree mirrors the include structure and is acyclic by
//! construction.

use crate::{CopybookName, DialectKind, Locality};

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Node {
    Copy(CopyNode),
    Text(TextNode),
}

/// A run of non-directive text in a program or copybook.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TextNode {
    pub locality: Locality,
}

/// One copy directive occurrence, resolved or not.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CopyNode {
    /// Where the copy statement itself is written.
    pub locality: Locality,
    pub name: CopybookName,
    pub dialect: DialectKind,
    /// Level number written in front of the directive (`01 COPY MAID X.`).
    pub parent_level: Option<u32>,
    /// Start of the copybook document. `None` when the copybook was not found.
    pub definition: Option<Locality>,
    pub children: Vec<Node>,
    /// The other occurrences of the same copybook in this analysis.
    pub usages: Vec<Locality>,
}

impl CopyNode {
    pub fn new(locality: Locality, name: CopybookName) -> Self {
        let dialect = name.dialect();
        CopyNode {
            locality,
            name,
            dialect,
            parent_level: None,
            definition: None,
            children: Vec::new(),
            usages: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_parent_level(mut self, level: Option<u32>) -> Self {
        self.parent_level = level;
        self
    }

    #[must_use]
    pub fn with_definition(mut self, definition: Locality) -> Self {
        self.definition = Some(definition);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.definition.is_some()
    }
}

impl Node {
    pub fn locality(&self) -> &Locality {
        match self {
            Node::Copy(copy) => &copy.locality,
            Node::Text(text) => &text.locality,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Copy(copy) => &copy.children,
            Node::Text(_) => &[],
        }
    }

    pub fn as_copy(&self) -> Option<&CopyNode> {
        match self {
            Node::Copy(copy) => Some(copy),
            Node::Text(_) => None,
        }
    }
}

/// Pre-order iterator over a forest of nodes.
pub struct DepthFirst<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> DepthFirst<'a> {
    /// Walk every node of `roots`, in order.
    pub fn over(roots: &'a [Node]) -> Self {
        DepthFirst {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// Every copy node in `roots`, pre-order.
pub fn copy_nodes(roots: &[Node]) -> impl Iterator<Item = &CopyNode> {
    DepthFirst::over(roots).filter_map(Node::as_copy)
}

/// Mutable pre-order visit of every copy node in `roots`.
pub fn for_each_copy_mut(roots: &mut [Node], f: &mut impl FnMut(&mut CopyNode)) {
    for node in roots {
        if let Node::Copy(copy) = node {
            f(copy);
            for_each_copy_mut(&mut copy.children, f);
        }
    }
}
