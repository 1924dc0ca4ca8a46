pub mod entity;

pub use entity::Entity;

use serde_json::Value;
use thiserror::Error;

use crate::filter::{parse, FilterNode, ParseError};
use crate::validation::ValidationError;

pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 200;

/// Failure while assembling query options from client input.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Query text plus its positional parameters, ready for the data-access
/// collaborator. Values never appear inside the text itself.
#[derive(Debug, Clone)]
pub struct SqlQuery {
    pub text: String,
    pub params: Vec<Value>,
}

/// Validated pagination, projection and filter input for one entity.
///
/// All validation happens in [`QueryOptions::build`]; the query-producing
/// methods only assemble text from already-checked parts.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    entity: Entity,
    limit: i64,
    offset: i64,
    fields: Vec<String>,
    filter: Option<FilterNode>,
}

impl QueryOptions {
    pub fn build(
        entity: Entity,
        limit: i64,
        offset: i64,
        fields: Vec<String>,
        filter_expr: Option<&str>,
    ) -> Result<Self, BuildError> {
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
            return Err(ValidationError::LimitOutOfRange(limit).into());
        }
        if offset < 0 {
            return Err(ValidationError::NegativeOffset(offset).into());
        }
        if fields.is_empty() {
            return Err(ValidationError::NoFields.into());
        }
        for field in &fields {
            if !entity.allows(field) {
                return Err(ValidationError::UnknownColumn(field.clone()).into());
            }
        }

        let filter = match filter_expr {
            Some(expr) => {
                let node = parse(expr)?;
                let mut unknown = None;
                node.for_each_leaf(&mut |column| {
                    if unknown.is_none() && !entity.allows(column) {
                        unknown = Some(column.to_string());
                    }
                });
                if let Some(column) = unknown {
                    return Err(ValidationError::UnknownColumn(column).into());
                }
                Some(node)
            }
            None => None,
        };

        Ok(Self { entity, limit, offset, fields, filter })
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn filter(&self) -> Option<&FilterNode> {
        self.filter.as_ref()
    }

    /// Bounded, paginated projection query over the entity's table.
    pub fn to_select_query(&self) -> SqlQuery {
        let columns = self
            .fields
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ");

        let mut params = Vec::new();
        let mut text = format!("SELECT {} FROM \"{}\"", columns, self.entity.table());
        if let Some(filter) = &self.filter {
            text.push_str(" WHERE ");
            text.push_str(&render_condition(filter, &mut params));
        }
        text.push_str(&format!(" LIMIT {} OFFSET {}", self.limit, self.offset));

        SqlQuery { text, params }
    }

    /// Count-only variant: same filter, no pagination.
    pub fn to_count_query(&self) -> SqlQuery {
        let mut params = Vec::new();
        let mut text = format!("SELECT COUNT(*) AS count FROM \"{}\"", self.entity.table());
        if let Some(filter) = &self.filter {
            text.push_str(" WHERE ");
            text.push_str(&render_condition(filter, &mut params));
        }
        SqlQuery { text, params }
    }
}

/// Render a filter subtree, pushing every literal into `params` and
/// emitting a `$n` placeholder in its place.
fn render_condition(node: &FilterNode, params: &mut Vec<Value>) -> String {
    match node {
        FilterNode::Comparison { column, op, value } => {
            params.push(value.clone());
            format!("\"{}\" {} ${}", column, op.as_sql(), params.len())
        }
        FilterNode::Logical { op, left, right } => {
            let left_sql = render_condition(left, params);
            let right_sql = render_condition(right, params);
            format!("({} {} {})", left_sql, op.as_sql(), right_sql)
        }
    }
}
