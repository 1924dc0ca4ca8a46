use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operators of the restricted filter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
}

impl CompareOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

/// Parsed filter expression. Leaves compare a column against a literal;
/// composites join two subtrees with AND/OR. The parser keeps this pure
/// syntax; allow-list checks happen in the query builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterNode {
    Comparison {
        column: String,
        op: CompareOp,
        value: Value,
    },
    Logical {
        op: LogicalOp,
        left: Box<FilterNode>,
        right: Box<FilterNode>,
    },
}

impl FilterNode {
    pub fn comparison(column: impl Into<String>, op: CompareOp, value: Value) -> Self {
        FilterNode::Comparison { column: column.into(), op, value }
    }

    pub fn logical(op: LogicalOp, left: FilterNode, right: FilterNode) -> Self {
        FilterNode::Logical { op, left: Box::new(left), right: Box::new(right) }
    }

    /// Visit every comparison leaf in left-to-right order.
    pub fn for_each_leaf<'a, F: FnMut(&'a str)>(&'a self, f: &mut F) {
        match self {
            FilterNode::Comparison { column, .. } => f(column),
            FilterNode::Logical { left, right, .. } => {
                left.for_each_leaf(f);
                right.for_each_leaf(f);
            }
        }
    }
}
