//! Arena-backed constraint tree and absolute path resolution.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{ConstraintError, Result};
use crate::kind::{ConstraintKind, NumericRange, ValueSet};

static NEXT_TREE: AtomicU32 = AtomicU32::new(0);

/// Handle to a node of one [`ConstraintTree`].
///
/// Ids carry the tag of the tree that issued them and are rejected by every
/// other tree. A cloned tree keeps the tag, so ids stay valid in the clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    tree: u32,
    index: usize,
}

impl NodeId {
    /// Position of the node in its tree's arena.
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// A single constraint: a location path fragment relative to its parent.
#[derive(Debug, Clone)]
pub struct ConstraintNode {
    context: String,
    kind: ConstraintKind,
    parent: Option<NodeId>,
    children: HashMap<String, NodeId>,
}

impl ConstraintNode {
    /// Location path fragment, relative to the parent node.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// What the node asserts about its context.
    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    /// The enclosing node, if any. Roots have no parent.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// True when no child has been declared.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of reachable children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Look up a direct child by its context.
    pub fn child(&self, context: &str) -> Option<NodeId> {
        self.children.get(context).copied()
    }

    /// Children ordered by ascending context.
    pub fn sorted_children(&self) -> Vec<(&str, NodeId)> {
        let mut children: Vec<(&str, NodeId)> = self
            .children
            .iter()
            .map(|(context, id)| (context.as_str(), *id))
            .collect();
        children.sort_by(|a, b| a.0.cmp(b.0));
        children
    }
}

/// Owns every node of one or more constraint trees.
///
/// Each root is an independent top-level scope. Roots are flattened in the
/// order they were created.
#[derive(Debug, Clone)]
pub struct ConstraintTree {
    tag: u32,
    nodes: Vec<ConstraintNode>,
    roots: Vec<NodeId>,
}

impl Default for ConstraintTree {
    fn default() -> Self {
        Self {
            tag: NEXT_TREE.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }
}

impl ConstraintTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the arena, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root nodes in creation order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// The node behind `id`, or `None` when `id` was issued by another tree.
    pub fn get(&self, id: NodeId) -> Option<&ConstraintNode> {
        if id.tree != self.tag {
            return None;
        }
        self.nodes.get(id.index)
    }

    /// Like [`ConstraintTree::get`], failing with [`ConstraintError::UnknownNode`].
    pub fn node(&self, id: NodeId) -> Result<&ConstraintNode> {
        self.get(id).ok_or(ConstraintError::UnknownNode { id })
    }

    fn node_entry(&mut self, id: NodeId) -> Result<&mut ConstraintNode> {
        if id.tree != self.tag {
            return Err(ConstraintError::UnknownNode { id });
        }
        self.nodes
            .get_mut(id.index)
            .ok_or(ConstraintError::UnknownNode { id })
    }

    /// Create an unparented root of the given kind.
    ///
    /// The root's context is used verbatim as its absolute path.
    pub fn add_root(&mut self, context: impl Into<String>, kind: ConstraintKind) -> Result<NodeId> {
        let id = self.push(context.into(), kind, None)?;
        self.roots.push(id);
        Ok(id)
    }

    /// Create a root [`ConstraintKind::Scope`] and return a handle for nesting.
    pub fn scope(&mut self, context: impl Into<String>) -> Result<NodeMut<'_>> {
        let id = self.add_root(context, ConstraintKind::Scope)?;
        Ok(NodeMut { tree: self, id })
    }

    /// Borrow a node for further nesting.
    pub fn node_mut(&mut self, id: NodeId) -> Result<NodeMut<'_>> {
        self.node(id)?;
        Ok(NodeMut { tree: self, id })
    }

    /// Create a child of `parent`, keyed by its context.
    ///
    /// Reusing a context replaces the earlier child, which stays in the arena
    /// but is no longer reachable from `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        context: impl Into<String>,
        kind: ConstraintKind,
    ) -> Result<NodeId> {
        self.node(parent)?;
        let context = context.into();
        let id = self.push(context.clone(), kind, Some(parent))?;
        let replaced = self.node_entry(parent)?.children.insert(context, id);
        if let Some(previous) = replaced {
            tracing::debug!(parent = %parent, previous = %previous, "replaced constraint child");
        }
        Ok(id)
    }

    /// Declare a [`ConstraintKind::RequiredPresence`] child.
    pub fn add_required(&mut self, parent: NodeId, context: impl Into<String>) -> Result<NodeId> {
        self.add_child(parent, context, ConstraintKind::RequiredPresence)
    }

    /// Declare a [`ConstraintKind::OptionalPresence`] child.
    pub fn add_optional(&mut self, parent: NodeId, context: impl Into<String>) -> Result<NodeId> {
        self.add_child(parent, context, ConstraintKind::OptionalPresence)
    }

    /// Declare a [`ConstraintKind::ForbiddenPresence`] child.
    pub fn add_forbidden(&mut self, parent: NodeId, context: impl Into<String>) -> Result<NodeId> {
        self.add_child(parent, context, ConstraintKind::ForbiddenPresence)
    }

    /// Declare a [`ConstraintKind::SetInclusion`] child.
    pub fn add_included(
        &mut self,
        parent: NodeId,
        context: impl Into<String>,
        allowed: ValueSet,
    ) -> Result<NodeId> {
        self.add_child(parent, context, ConstraintKind::SetInclusion(allowed))
    }

    /// Declare a [`ConstraintKind::SetExclusion`] child.
    pub fn add_excluded(
        &mut self,
        parent: NodeId,
        context: impl Into<String>,
        forbidden: ValueSet,
    ) -> Result<NodeId> {
        self.add_child(parent, context, ConstraintKind::SetExclusion(forbidden))
    }

    /// Declare a [`ConstraintKind::NumericRange`] child.
    pub fn add_numeric(
        &mut self,
        parent: NodeId,
        context: impl Into<String>,
        range: NumericRange,
    ) -> Result<NodeId> {
        self.add_child(parent, context, ConstraintKind::NumericRange(range))
    }

    /// Mutable value set of an inclusion or exclusion node.
    pub fn values_mut(&mut self, id: NodeId) -> Result<Option<&mut ValueSet>> {
        Ok(match &mut self.node_entry(id)?.kind {
            ConstraintKind::SetInclusion(set) | ConstraintKind::SetExclusion(set) => Some(set),
            _ => None,
        })
    }

    /// Mutable comparisons of a numeric node.
    pub fn numeric_range_mut(&mut self, id: NodeId) -> Result<Option<&mut NumericRange>> {
        Ok(match &mut self.node_entry(id)?.kind {
            ConstraintKind::NumericRange(range) => Some(range),
            _ => None,
        })
    }

    /// Resolve the absolute location path of a node.
    ///
    /// The parent's path and the node's context are joined with `/`, unless
    /// the parent's path is exactly `/`. A root resolves to its own context.
    pub fn absolute_path(&self, id: NodeId) -> Result<String> {
        let mut lineage = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current)?;
            lineage.push(node.context.as_str());
            cursor = node.parent;
        }

        let mut contexts = lineage.into_iter().rev();
        let mut path = contexts.next().unwrap_or_default().to_string();
        for context in contexts {
            if path != "/" {
                path.push('/');
            }
            path.push_str(context);
        }
        Ok(path)
    }

    fn push(
        &mut self,
        context: String,
        kind: ConstraintKind,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        if context.is_empty() {
            return Err(ConstraintError::EmptyContext);
        }
        let id = NodeId {
            tree: self.tag,
            index: self.nodes.len(),
        };
        tracing::trace!(id = %id, context = %context, kind = kind.label(), "declared constraint");
        self.nodes.push(ConstraintNode {
            context,
            kind,
            parent,
            children: HashMap::new(),
        });
        Ok(id)
    }
}

/// Mutable handle to one node, used to declare nested constraints.
#[derive(Debug)]
pub struct NodeMut<'a> {
    tree: &'a mut ConstraintTree,
    id: NodeId,
}

impl NodeMut<'_> {
    /// Id of the borrowed node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn entry(&self) -> &ConstraintNode {
        // Handles are only created for ids that exist in the tree.
        &self.tree.nodes[self.id.index]
    }

    /// See [`ConstraintNode::context`].
    pub fn context(&self) -> &str {
        &self.entry().context
    }

    /// See [`ConstraintNode::kind`].
    pub fn kind(&self) -> &ConstraintKind {
        &self.entry().kind
    }

    /// See [`ConstraintTree::absolute_path`].
    pub fn absolute_path(&self) -> Result<String> {
        self.tree.absolute_path(self.id)
    }

    /// Declare a child and borrow it for further nesting.
    pub fn add_child(
        &mut self,
        context: impl Into<String>,
        kind: ConstraintKind,
    ) -> Result<NodeMut<'_>> {
        let id = self.tree.add_child(self.id, context, kind)?;
        Ok(NodeMut {
            tree: &mut *self.tree,
            id,
        })
    }

    pub fn add_required(&mut self, context: impl Into<String>) -> Result<NodeMut<'_>> {
        self.add_child(context, ConstraintKind::RequiredPresence)
    }

    pub fn add_optional(&mut self, context: impl Into<String>) -> Result<NodeMut<'_>> {
        self.add_child(context, ConstraintKind::OptionalPresence)
    }

    pub fn add_forbidden(&mut self, context: impl Into<String>) -> Result<NodeMut<'_>> {
        self.add_child(context, ConstraintKind::ForbiddenPresence)
    }

    pub fn add_included(
        &mut self,
        context: impl Into<String>,
        allowed: ValueSet,
    ) -> Result<NodeMut<'_>> {
        self.add_child(context, ConstraintKind::SetInclusion(allowed))
    }

    pub fn add_excluded(
        &mut self,
        context: impl Into<String>,
        forbidden: ValueSet,
    ) -> Result<NodeMut<'_>> {
        self.add_child(context, ConstraintKind::SetExclusion(forbidden))
    }

    pub fn add_numeric(
        &mut self,
        context: impl Into<String>,
        range: NumericRange,
    ) -> Result<NodeMut<'_>> {
        self.add_child(context, ConstraintKind::NumericRange(range))
    }

    /// See [`ConstraintTree::values_mut`].
    pub fn values_mut(&mut self) -> Option<&mut ValueSet> {
        self.tree.values_mut(self.id).ok().flatten()
    }

    /// See [`ConstraintTree::numeric_range_mut`].
    pub fn numeric_range_mut(&mut self) -> Option<&mut NumericRange> {
        self.tree.numeric_range_mut(self.id).ok().flatten()
    }
}
