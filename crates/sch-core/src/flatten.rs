//! Denesting constraint trees into context-scoped rules.

use crate::assertion::{Assertion, synthesize};
use crate::error::Result;
use crate::tree::{ConstraintTree, NodeId};

/// One flattened rule: an absolute context and its assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRecord {
    /// Absolute location path the rule is scoped to.
    pub path: String,
    /// One assertion per child, ordered by the child's context.
    pub assertions: Vec<Assertion>,
}

/// Flatten every root of `tree`, in creation order.
pub fn flatten(tree: &ConstraintTree) -> Result<Vec<RuleRecord>> {
    let mut rules = Vec::new();
    for &root in tree.roots() {
        flatten_into(tree, root, &mut rules)?;
    }
    Ok(rules)
}

/// Flatten the subtree under `root`.
///
/// Rules are produced in pre-order: a node's rule precedes the rules of its
/// children, and siblings are visited in ascending context order.
pub fn flatten_from(tree: &ConstraintTree, root: NodeId) -> Result<Vec<RuleRecord>> {
    let mut rules = Vec::new();
    flatten_into(tree, root, &mut rules)?;
    Ok(rules)
}

fn flatten_into(tree: &ConstraintTree, id: NodeId, rules: &mut Vec<RuleRecord>) -> Result<()> {
    let node = tree.node(id)?;
    if node.is_leaf() {
        return Ok(());
    }

    let children = node.sorted_children();
    let mut assertions = Vec::with_capacity(children.len());
    for &(context, child) in &children {
        if let Some(assertion) = synthesize(context, tree.node(child)?.kind()) {
            assertions.push(assertion);
        }
    }

    let path = tree.absolute_path(id)?;
    if assertions.is_empty() {
        // Nested scopes assert nothing; a rule needs at least one assertion.
        tracing::debug!(path = %path, "skipped rule without assertions");
    } else {
        tracing::debug!(path = %path, assertions = assertions.len(), "flattened rule");
        rules.push(RuleRecord { path, assertions });
    }

    for (_, child) in children {
        flatten_into(tree, child, rules)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ConstraintKind;

    #[test]
    fn leaf_root_emits_nothing() {
        let mut tree = ConstraintTree::new();
        tree.scope("/").unwrap();
        assert!(flatten(&tree).unwrap().is_empty());
    }

    #[test]
    fn nested_scope_is_skipped_but_descended() {
        let mut tree = ConstraintTree::new();
        let mut root = tree.scope("/").unwrap();
        let mut inner = root.add_child("ex:Inner", ConstraintKind::Scope).unwrap();
        inner.add_required("ex:Leaf").unwrap();

        let rules = flatten(&tree).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].path, "/ex:Inner");
        assert_eq!(rules[0].assertions[0].test, "count(ex:Leaf) >= 1");
    }

    #[test]
    fn roots_flatten_in_creation_order() {
        let mut tree = ConstraintTree::new();
        tree.scope("//Z").unwrap().add_required("a").unwrap();
        tree.scope("//A").unwrap().add_required("b").unwrap();

        let paths: Vec<String> = flatten(&tree)
            .unwrap()
            .into_iter()
            .map(|rule| rule.path)
            .collect();
        assert_eq!(paths, vec!["//Z", "//A"]);
    }

    #[test]
    fn flatten_from_limits_to_subtree() {
        let mut tree = ConstraintTree::new();
        let root = tree.add_root("/", ConstraintKind::Scope).unwrap();
        let a = tree.add_required(root, "A").unwrap();
        tree.add_optional(a, "B").unwrap();
        tree.add_forbidden(root, "C").unwrap();

        let rules = flatten_from(&tree, a).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].path, "/A");
    }

    #[test]
    fn replaced_child_subtree_is_not_flattened() {
        let mut tree = ConstraintTree::new();
        let root = tree.add_root("/", ConstraintKind::Scope).unwrap();
        let first = tree.add_required(root, "A").unwrap();
        tree.add_required(first, "Stale").unwrap();
        tree.add_optional(root, "A").unwrap();

        let rules = flatten(&tree).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].assertions[0].test, "count(A) >= 0");
    }
}
