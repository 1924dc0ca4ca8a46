use serde_json::{Map, Value};
use sqlx::{Column, PgPool, Row};

use super::manager::DatabaseError;
use crate::query::QueryOptions;

/// Run the projection query and return rows as raw JSON maps, so the
/// response shape follows whatever field set the client selected.
pub async fn list(
    pool: &PgPool,
    options: &QueryOptions,
) -> Result<Vec<Map<String, Value>>, DatabaseError> {
    let sql = options.to_select_query();
    let mut query = sqlx::query(&sql.text);
    for param in &sql.params {
        query = bind_param(query, param);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows.iter().map(row_to_json).collect())
}

pub async fn count(pool: &PgPool, options: &QueryOptions) -> Result<i64, DatabaseError> {
    let sql = options.to_count_query();
    let mut query = sqlx::query(&sql.text);
    for param in &sql.params {
        query = bind_param(query, param);
    }
    let row = query.fetch_one(pool).await?;
    Ok(row.try_get("count")?)
}

fn bind_param<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    value: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    match value {
        Value::Null => {
            let none: Option<String> = None;
            query.bind(none)
        }
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(f) = n.as_f64() {
                query.bind(f)
            } else {
                query.bind(n.to_string())
            }
        }
        Value::String(s) => query.bind(s),
        other => query.bind(other.clone()),
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Map<String, Value> {
    let mut map = Map::new();
    for i in 0..row.len() {
        let name = row.column(i).name().to_string();
        map.insert(name, column_value(row, i));
    }
    map
}

fn column_value(row: &sqlx::postgres::PgRow, index: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(index) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return v
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return v.map(Value::Bool).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v.map(Value::String).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index) {
        return v.map(|t| Value::String(t.to_rfc3339())).unwrap_or(Value::Null);
    }
    Value::Null
}
