use crate::diagnostics::DiagnosticSink;
use crate::error::FilterError;
use crate::filter::{FilterNode, Operand};
use crate::rules::ColumnRules;
use std::fmt;

mod leaf;

use leaf::resolve_direction;

/// A validated API query parameter derived from one equality leaf,
/// e.g. `id=2643743` or `,DE` for a country code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fragment {
    prefix: &'static str,
    value: String,
}

impl Fragment {
    pub fn new(prefix: &'static str, value: impl Into<String>) -> Self {
        Self {
            prefix,
            value: value.into(),
        }
    }

    /// The API parameter prefix, which also identifies the filtered dimension.
    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.value)
    }
}

/// The evaluator's output. Mirrors the conjunction/disjunction nesting of the
/// filter tree; a `Leaf(None)` marks a leaf that could not be translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentTree {
    Leaf(Option<Fragment>),
    /// Translated children of an `And`.
    All(Vec<FragmentTree>),
    /// Translated children of an `Or` or an IN-list.
    Any(Vec<FragmentTree>),
}

impl FragmentTree {
    /// All translated fragments in tree order, skipping dropped leaves.
    pub fn fragments(&self) -> Vec<&Fragment> {
        let mut out = Vec::new();
        self.collect_fragments(&mut out);
        out
    }

    fn collect_fragments<'a>(&'a self, out: &mut Vec<&'a Fragment>) {
        match self {
            FragmentTree::Leaf(Some(fragment)) => out.push(fragment),
            FragmentTree::Leaf(None) => {}
            FragmentTree::All(children) | FragmentTree::Any(children) => {
                for child in children {
                    child.collect_fragments(out);
                }
            }
        }
    }
}

/// Walks a filter tree and translates every equality leaf into an API parameter.
///
/// The result keeps the `And`/`Or` nesting so the bundle builder can tell
/// alternatives from cooperating parameters. Leaves that fail validation are
/// reported on the sink and dropped without affecting their siblings.
pub struct PredicateEvaluator<'a> {
    rules: &'a ColumnRules,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> PredicateEvaluator<'a> {
    /// Creates an evaluator over the standard weather column rules.
    pub fn new(sink: &'a dyn DiagnosticSink) -> Self {
        Self::with_rules(ColumnRules::standard(), sink)
    }

    pub fn with_rules(rules: &'a ColumnRules, sink: &'a dyn DiagnosticSink) -> Self {
        Self { rules, sink }
    }

    pub fn evaluate(&self, node: &FilterNode) -> FragmentTree {
        match node {
            FilterNode::InList { .. } => self.evaluate(&node.clone().desugar()),
            FilterNode::And(children) => FragmentTree::All(self.evaluate_all(children)),
            FilterNode::Or(children) => FragmentTree::Any(self.evaluate_all(children)),
            FilterNode::Equal { left, right } => self.evaluate_leaf(left, right),
            FilterNode::Unsupported { kind } => {
                self.drop_leaf(FilterError::UnsupportedPredicate(kind.clone()))
            }
        }
    }

    /// Translates one equality leaf, independent of which side holds the column.
    pub fn resolve_equal(&self, left: &Operand, right: &Operand) -> Result<Fragment, FilterError> {
        let (column, value) = resolve_direction(left, right)?;
        let rule = self.rules.get(column)?;
        let value = rule.validate(value)?;
        Ok(Fragment::new(rule.api_prefix, value))
    }

    fn evaluate_all(&self, children: &[FilterNode]) -> Vec<FragmentTree> {
        children.iter().map(|child| self.evaluate(child)).collect()
    }

    fn evaluate_leaf(&self, left: &Operand, right: &Operand) -> FragmentTree {
        match self.resolve_equal(left, right) {
            Ok(fragment) => {
                self.sink
                    .info(&format!("Filter {} = {} translated to <{}>", left, right, fragment));
                FragmentTree::Leaf(Some(fragment))
            }
            Err(err) => self.drop_leaf(err),
        }
    }

    fn drop_leaf(&self, err: FilterError) -> FragmentTree {
        self.sink.warn(&err.to_string());
        FragmentTree::Leaf(None)
    }
}
