use crate::evaluator::FragmentTree;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// The serialized parameter set handed from the pushdown to the call site.
///
/// On the wire this is either a single JSON string (one call) or a JSON array
/// whose entries are strings, nulls, or arrays of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterBundle {
    Scalar(String),
    List(Vec<BundleEntry>),
}

/// One element of a [`ParameterBundle::List`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BundleEntry {
    Fragment(Option<String>),
    Group(Vec<Option<String>>),
}

impl ParameterBundle {
    pub fn empty() -> Self {
        ParameterBundle::List(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ParameterBundle::List(entries) if entries.is_empty())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Reads the serialized filters the way the call site receives them.
    /// Text that is not JSON is taken verbatim as a single parameter string.
    pub fn from_wire(text: &str) -> Result<Self, serde_json::Error> {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(serde_json::Value::Null) => Ok(ParameterBundle::empty()),
            Ok(value) => serde_json::from_value(value),
            Err(_) => Ok(ParameterBundle::Scalar(text.to_string())),
        }
    }
}

/// Shapes evaluator output into the bundle representation.
pub struct BundleBuilder;

impl BundleBuilder {
    /// Builds the bundle for one evaluated filter tree.
    ///
    /// A lone fragment stays scalar. Alternatives (`Or`, IN-lists) become one
    /// entry each. A conjunction over different dimensions (lon + lat,
    /// zip + country) cooperates and becomes one group entry; a conjunction
    /// over a single dimension has no single-call form and degrades to one
    /// entry per fragment. Dropped leaves never reach the bundle.
    pub fn build(tree: &FragmentTree) -> ParameterBundle {
        match tree {
            FragmentTree::Leaf(Some(fragment)) => ParameterBundle::Scalar(fragment.to_string()),
            _ => ParameterBundle::List(Self::shape(tree)),
        }
    }

    fn shape(tree: &FragmentTree) -> Vec<BundleEntry> {
        match tree {
            FragmentTree::Leaf(Some(fragment)) => vec![BundleEntry::Fragment(Some(fragment.to_string()))],
            FragmentTree::Leaf(None) => Vec::new(),
            FragmentTree::Any(children) => children.iter().flat_map(Self::shape).collect(),
            FragmentTree::All(_) => {
                let fragments = tree.fragments();
                if fragments.iter().map(|f| f.prefix()).all_equal() {
                    fragments
                        .into_iter()
                        .map(|f| BundleEntry::Fragment(Some(f.to_string())))
                        .collect()
                } else {
                    vec![BundleEntry::Group(
                        fragments.into_iter().map(|f| Some(f.to_string())).collect(),
                    )]
                }
            }
        }
    }
}
