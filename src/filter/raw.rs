use super::node::{FilterNode, Operand};
use serde::Deserialize;

/// A filter node exactly as the query planner serializes it.
///
/// The planner's shape is loosely typed: IN-lists carry `expression` and
/// `arguments`, conjunctions carry `expressions`, equality leaves carry `left`
/// and `right`. [`IntoFilter`] resolves the shape once into a [`FilterNode`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFilter {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub expressions: Option<Vec<RawFilter>>,
    #[serde(default)]
    pub expression: Option<RawOperand>,
    #[serde(default)]
    pub arguments: Option<Vec<RawOperand>>,
    #[serde(default)]
    pub left: Option<RawOperand>,
    #[serde(default)]
    pub right: Option<RawOperand>,
}

/// A column reference or literal as serialized by the planner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOperand {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<RawLiteral>,
}

/// Literal values arrive as strings for exact numerics, but some planners send
/// plain JSON numbers or booleans.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLiteral {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl RawLiteral {
    fn into_text(self) -> String {
        match self {
            RawLiteral::Text(s) => s,
            RawLiteral::Number(n) => n.to_string(),
            RawLiteral::Bool(b) => b.to_string(),
        }
    }
}

/// Conversion of a planner payload into the typed filter tree.
pub trait IntoFilter {
    fn into_filter(self) -> FilterNode;
}

impl IntoFilter for RawFilter {
    fn into_filter(self) -> FilterNode {
        let kind = self.kind.unwrap_or_default();

        if let Some(arguments) = self.arguments.filter(|a| !a.is_empty()) {
            let column = match self.expression.and_then(|e| e.name) {
                Some(name) => name,
                None => return FilterNode::Unsupported { kind },
            };
            let values: Option<Vec<String>> = arguments
                .into_iter()
                .map(|argument| argument.value.map(RawLiteral::into_text))
                .collect();
            return match values {
                Some(values) => FilterNode::InList { column, values },
                None => FilterNode::Unsupported { kind },
            };
        }

        if let Some(expressions) = self.expressions.filter(|e| !e.is_empty()) {
            let children = expressions.into_iter().map(IntoFilter::into_filter).collect();
            return if kind == "predicate_or" {
                FilterNode::Or(children)
            } else {
                FilterNode::And(children)
            };
        }

        match (self.left, self.right) {
            (Some(left), Some(right)) if kind.is_empty() || kind == "predicate_equal" => {
                FilterNode::Equal {
                    left: left.into_operand(),
                    right: right.into_operand(),
                }
            }
            _ => FilterNode::Unsupported {
                kind: if kind.is_empty() {
                    "unknown".to_string()
                } else {
                    kind
                },
            },
        }
    }
}

impl RawOperand {
    fn into_operand(self) -> Operand {
        if let Some(name) = self.name {
            Operand::Column { name }
        } else if let Some(value) = self.value {
            Operand::Literal {
                value: value.into_text(),
            }
        } else {
            Operand::Unsupported {
                kind: self.kind.unwrap_or_else(|| "unknown".to_string()),
            }
        }
    }
}

/// Parses the planner's `filter` JSON into a [`FilterNode`].
pub fn parse_filter(value: serde_json::Value) -> Result<FilterNode, serde_json::Error> {
    let raw: RawFilter = serde_json::from_value(value)?;
    Ok(raw.into_filter())
}
