//! Ordered expression trees joined by connectives.

use rustack_query_model::ExpressionAttributeValues;

use super::predicate::{Connective, Predicate};

/// Anything that renders to a condition string and binds placeholder values.
pub trait Expression {
    /// The rendered condition.
    fn render(&self) -> String;

    /// Insert this expression's placeholder bindings into `values`.
    fn bind_into(&self, values: &mut ExpressionAttributeValues);

    /// Number of placeholders this expression binds.
    fn binding_count(&self) -> usize;

    /// The connective joining this expression to its predecessor.
    fn connective(&self) -> Connective;

    /// This expression's placeholder bindings.
    fn bindings(&self) -> ExpressionAttributeValues {
        let mut values = ExpressionAttributeValues::with_capacity(self.binding_count());
        self.bind_into(&mut values);
        values
    }
}

/// A pre-rendered condition with its bindings, embedded as an opaque leaf.
///
/// This is how a sub-query enters its parent: the child renders once and the
/// parent reuses the string verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    expression: String,
    values: ExpressionAttributeValues,
    connective: Connective,
}

impl Fragment {
    /// Capture `expression`'s current rendering and bindings.
    pub fn capture(expression: &impl Expression, connective: Connective) -> Self {
        Self {
            expression: expression.render(),
            values: expression.bindings(),
            connective,
        }
    }
}

impl Expression for Fragment {
    fn render(&self) -> String {
        self.expression.clone()
    }

    fn bind_into(&self, values: &mut ExpressionAttributeValues) {
        values.extend(
            self.values
                .iter()
                .map(|(token, value)| (token.clone(), value.clone())),
        );
    }

    fn binding_count(&self) -> usize {
        self.values.len()
    }

    fn connective(&self) -> Connective {
        self.connective
    }
}

/// One entry of an [`ExpressionTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    /// A single predicate.
    Predicate(Predicate),
    /// A nested tree, rendered in its own parentheses.
    Tree(ExpressionTree),
    /// A pre-rendered sub-query.
    Fragment(Fragment),
}

impl ExpressionNode {
    /// Replace the connective of the wrapped expression.
    #[must_use]
    pub fn with_connective(self, connective: Connective) -> Self {
        match self {
            Self::Predicate(p) => Self::Predicate(p.with_connective(connective)),
            Self::Tree(mut t) => {
                t.connective = connective;
                Self::Tree(t)
            }
            Self::Fragment(mut f) => {
                f.connective = connective;
                Self::Fragment(f)
            }
        }
    }

    fn as_expression(&self) -> &dyn Expression {
        match self {
            Self::Predicate(p) => p,
            Self::Tree(t) => t,
            Self::Fragment(f) => f,
        }
    }
}

impl From<Predicate> for ExpressionNode {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate)
    }
}

impl From<ExpressionTree> for ExpressionNode {
    fn from(tree: ExpressionTree) -> Self {
        Self::Tree(tree)
    }
}

impl From<Fragment> for ExpressionNode {
    fn from(fragment: Fragment) -> Self {
        Self::Fragment(fragment)
    }
}

/// An ordered sequence of expressions joined by their connectives.
///
/// The first entry's connective is never rendered, and the whole sequence is
/// always wrapped in exactly one pair of parentheses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpressionTree {
    connective: Connective,
    nodes: Vec<ExpressionNode>,
}

impl ExpressionTree {
    /// An empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, keeping the connective it already carries.
    pub fn push(&mut self, node: impl Into<ExpressionNode>) {
        self.nodes.push(node.into());
    }

    /// Append an entry joined by `connective`.
    pub fn add(&mut self, connective: Connective, node: impl Into<ExpressionNode>) {
        self.nodes.push(node.into().with_connective(connective));
    }

    /// Append every entry of `nodes` in order.
    pub fn add_all<N: Into<ExpressionNode>>(&mut self, nodes: impl IntoIterator<Item = N>) {
        self.nodes.extend(nodes.into_iter().map(Into::into));
    }

    /// Set the connective used when this tree is nested in another.
    #[must_use]
    pub fn with_connective(mut self, connective: Connective) -> Self {
        self.connective = connective;
        self
    }

    /// Number of direct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct entries in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &ExpressionNode> {
        self.nodes.iter()
    }
}

impl Expression for ExpressionTree {
    fn render(&self) -> String {
        let mut parts = Vec::with_capacity(self.nodes.len() * 2);
        for (i, node) in self.nodes.iter().map(ExpressionNode::as_expression).enumerate() {
            if i > 0 {
                parts.push(node.connective().to_string());
            }
            parts.push(node.render());
        }
        format!("({})", parts.join(" "))
    }

    fn bind_into(&self, values: &mut ExpressionAttributeValues) {
        for node in &self.nodes {
            node.as_expression().bind_into(values);
        }
    }

    fn binding_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| node.as_expression().binding_count())
            .sum()
    }

    fn connective(&self) -> Connective {
        self.connective
    }
}

#[cfg(test)]
mod tests {
    use rustack_query_model::AttributeValue;

    use super::*;
    use crate::expression::{Operand, PlaceholderGenerator, PredicateKind};

    fn predicate(
        placeholders: &PlaceholderGenerator,
        kind: PredicateKind,
        key: &str,
        operand: Operand,
        connective: Connective,
    ) -> Predicate {
        Predicate::new(kind, key, operand, connective, placeholders).unwrap()
    }

    #[test]
    fn test_should_wrap_single_entry_in_parentheses() {
        let placeholders = PlaceholderGenerator::default();
        let mut tree = ExpressionTree::new();
        tree.push(predicate(
            &placeholders,
            PredicateKind::Eq,
            "id",
            Operand::scalar(1),
            Connective::Or,
        ));
        assert_eq!(tree.render(), "(id = :p1)");
    }

    #[test]
    fn test_should_join_entries_with_their_connectives() {
        let placeholders = PlaceholderGenerator::default();
        let mut tree = ExpressionTree::new();
        tree.add_all([
            predicate(&placeholders, PredicateKind::Eq, "id", Operand::scalar(2), Connective::And),
            predicate(&placeholders, PredicateKind::Eq, "id", Operand::scalar(3), Connective::Or),
            predicate(
                &placeholders,
                PredicateKind::BeginsWith,
                "game",
                Operand::scalar("C"),
                Connective::And,
            ),
        ]);
        assert_eq!(
            tree.render(),
            "(id = :p1 or id = :p2 and begins_with(game, :p3))"
        );
    }

    #[test]
    fn test_should_merge_bindings_as_disjoint_union() {
        let placeholders = PlaceholderGenerator::default();
        let mut tree = ExpressionTree::new();
        tree.push(predicate(
            &placeholders,
            PredicateKind::In,
            "game",
            Operand::collection(["A", "B"]),
            Connective::And,
        ));
        tree.add(
            Connective::Or,
            predicate(&placeholders, PredicateKind::Eq, "game", Operand::scalar("C"), Connective::And),
        );

        let bindings = tree.bindings();
        assert_eq!(tree.binding_count(), 3);
        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings[":p3"], AttributeValue::from("C"));
        assert_eq!(tree.render(), "(game in (:p1,:p2) or game = :p3)");
    }

    #[test]
    fn test_should_nest_subtree_in_its_own_parentheses() {
        let placeholders = PlaceholderGenerator::default();
        let mut inner = ExpressionTree::new();
        inner.push(predicate(&placeholders, PredicateKind::Eq, "a", Operand::scalar(1), Connective::And));
        inner.push(predicate(&placeholders, PredicateKind::Eq, "b", Operand::scalar(2), Connective::Or));

        let mut outer = ExpressionTree::new();
        outer.push(predicate(&placeholders, PredicateKind::Gt, "c", Operand::scalar(3), Connective::And));
        outer.add(Connective::And, inner);

        assert_eq!(outer.render(), "(c > :p3 and (a = :p1 or b = :p2))");
        assert_eq!(outer.bindings().len(), 3);
    }

    #[test]
    fn test_should_embed_fragment_verbatim() {
        let placeholders = PlaceholderGenerator::default();
        let mut child = ExpressionTree::new();
        child.push(predicate(&placeholders, PredicateKind::Eq, "a", Operand::scalar(1), Connective::And));

        let mut parent = ExpressionTree::new();
        parent.push(predicate(&placeholders, PredicateKind::Eq, "b", Operand::scalar(2), Connective::And));
        parent.push(Fragment::capture(&child, Connective::Or));

        assert_eq!(parent.render(), "(b = :p2 or (a = :p1))");
        assert_eq!(parent.bindings()[":p1"], AttributeValue::number(1));
    }

    #[test]
    fn test_should_render_empty_tree_as_empty_group() {
        assert_eq!(ExpressionTree::new().render(), "()");
        assert!(ExpressionTree::new().bindings().is_empty());
    }
}
