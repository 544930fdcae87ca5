use std::fmt;

/// One side of an equality predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Column { name: String },
    Literal { value: String },
    /// An operand shape the planner may send but that carries neither a column
    /// name nor a literal value (e.g. `literal_null`).
    Unsupported { kind: String },
}

impl Operand {
    pub fn column(name: impl Into<String>) -> Self {
        Operand::Column { name: name.into() }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Operand::Literal {
            value: value.into(),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Column { name } => write!(f, "{}", name),
            Operand::Literal { value } => write!(f, "'{}'", value),
            Operand::Unsupported { kind } => write!(f, "<{}>", kind),
        }
    }
}

/// A pushed-down filter predicate, resolved once from the planner JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterNode {
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    /// `column IN (values...)`. Sugar for an `Or` of `Equal` leaves.
    InList { column: String, values: Vec<String> },
    /// Equality leaf. Either side may hold the column.
    Equal { left: Operand, right: Operand },
    /// A predicate type outside the announced capabilities.
    Unsupported { kind: String },
}

impl FilterNode {
    pub fn equal(left: Operand, right: Operand) -> Self {
        FilterNode::Equal { left, right }
    }

    /// Rewrites every `InList` in the tree into a disjunction of `Equal`
    /// leaves sharing the list's column. Literal order is preserved.
    pub fn desugar(self) -> FilterNode {
        match self {
            FilterNode::InList { column, values } => FilterNode::Or(
                values
                    .into_iter()
                    .map(|value| FilterNode::equal(Operand::column(column.clone()), Operand::literal(value)))
                    .collect(),
            ),
            FilterNode::And(children) => {
                FilterNode::And(children.into_iter().map(FilterNode::desugar).collect())
            }
            FilterNode::Or(children) => {
                FilterNode::Or(children.into_iter().map(FilterNode::desugar).collect())
            }
            leaf => leaf,
        }
    }

    /// Number of `Equal` leaves in the tree, counting each IN-list value as one.
    pub fn leaf_count(&self) -> usize {
        match self {
            FilterNode::And(children) | FilterNode::Or(children) => {
                children.iter().map(FilterNode::leaf_count).sum()
            }
            FilterNode::InList { values, .. } => values.len(),
            FilterNode::Equal { .. } | FilterNode::Unsupported { .. } => 1,
        }
    }

    /// Higher numbers bind more tightly.
    fn precedence(&self) -> u8 {
        match self {
            FilterNode::Or(_) => 1,
            FilterNode::And(_) => 2,
            FilterNode::InList { .. } | FilterNode::Equal { .. } | FilterNode::Unsupported { .. } => 3,
        }
    }

    fn fmt_with_precedence(&self, f: &mut fmt::Formatter<'_>, parent_precedence: u8) -> fmt::Result {
        let current_precedence = self.precedence();
        let needs_parens = current_precedence < parent_precedence;

        if needs_parens {
            write!(f, "(")?;
        }

        match self {
            FilterNode::And(children) => self.fmt_joined(f, " AND ", children, current_precedence)?,
            FilterNode::Or(children) => self.fmt_joined(f, " OR ", children, current_precedence)?,
            FilterNode::InList { column, values } => {
                write!(f, "{} IN (", column)?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{}'", value)?;
                }
                write!(f, ")")?;
            }
            FilterNode::Equal { left, right } => write!(f, "{} = {}", left, right)?,
            FilterNode::Unsupported { kind } => write!(f, "<{}>", kind)?,
        }

        if needs_parens {
            write!(f, ")")?;
        }
        Ok(())
    }

    fn fmt_joined(
        &self,
        f: &mut fmt::Formatter<'_>,
        op: &str,
        children: &[FilterNode],
        current_precedence: u8,
    ) -> fmt::Result {
        if children.is_empty() {
            return write!(f, "TRUE");
        }
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", op)?;
            }
            child.fmt_with_precedence(f, current_precedence + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_precedence(f, 0)
    }
}
