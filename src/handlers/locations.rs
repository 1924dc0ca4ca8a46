use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{require_permission, Claims, PermissionLevel};
use crate::database::locations;
use crate::error::ApiError;
use crate::filter;
use crate::query::{Entity, QueryOptions, MAX_LIMIT};
use crate::state::AppState;
use crate::validation::ValidationError;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Max records in the response, 1..=200. Defaults to 200.
    pub count: Option<i64>,
    pub offset: Option<i64>,
    /// Comma-separated projection, e.g. `id,name,city`. Required for
    /// listing, ignored when counting.
    pub fields: Option<String>,
    #[serde(rename = "where")]
    pub filter: Option<String>,
}

/// GET /api/locations - bounded, paginated listing with an optional
/// filter expression. All input is validated before any data access.
pub async fn locations_get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&claims, PermissionLevel::RegularUser)?;

    let options = build_options(&params)?;
    let data = locations::list(&state.pool, &options).await?;

    Ok(Json(json!({
        "count": data.len(),
        "offset": options.offset(),
        "data": data,
    })))
}

/// GET /api/locations/count - how many records match the filter,
/// ignoring pagination.
pub async fn locations_count(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&claims, PermissionLevel::RegularUser)?;

    let options = count_options(&params)?;
    let count = locations::count(&state.pool, &options).await?;

    Ok(Json(json!({"count": count})))
}

#[derive(Debug, Deserialize)]
pub struct FilterParams {
    #[serde(rename = "where")]
    pub filter: String,
}

/// GET /api/query/locations - parse a filter expression and return the
/// tree as nested objects. Introspection only, no data access.
pub async fn filter_get(Query(params): Query<FilterParams>) -> Result<Json<Value>, ApiError> {
    let node = filter::parse(&params.filter)?;
    Ok(Json(serde_json::to_value(&node).unwrap_or(Value::Null)))
}

fn parse_fields(params: &ListParams) -> Vec<String> {
    params
        .fields
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn build_options(params: &ListParams) -> Result<QueryOptions, ApiError> {
    let fields = parse_fields(params);
    if fields.is_empty() {
        return Err(ValidationError::NoFields.into());
    }

    let options = QueryOptions::build(
        Entity::Locations,
        params.count.unwrap_or(MAX_LIMIT),
        params.offset.unwrap_or(0),
        fields,
        params.filter.as_deref(),
    )?;
    Ok(options)
}

/// Counting never projects, so an absent fields list falls back to `id`
/// instead of being rejected.
fn count_options(params: &ListParams) -> Result<QueryOptions, ApiError> {
    let mut fields = parse_fields(params);
    if fields.is_empty() {
        fields.push("id".to_string());
    }

    let options = QueryOptions::build(
        Entity::Locations,
        params.count.unwrap_or(MAX_LIMIT),
        params.offset.unwrap_or(0),
        fields,
        params.filter.as_deref(),
    )?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(fields: Option<&str>, filter: Option<&str>) -> ListParams {
        ListParams {
            count: None,
            offset: None,
            fields: fields.map(str::to_string),
            filter: filter.map(str::to_string),
        }
    }

    #[test]
    fn counting_does_not_require_fields() {
        let options = count_options(&params(None, Some("rating >= 4"))).unwrap();
        assert!(options.to_count_query().text.starts_with("SELECT COUNT(*)"));
    }

    #[test]
    fn counting_still_validates_the_filter() {
        assert!(count_options(&params(None, Some("salt = 'x'"))).is_err());
    }

    #[test]
    fn listing_requires_fields() {
        assert!(build_options(&params(None, None)).is_err());
        assert!(build_options(&params(Some("id,name"), None)).is_ok());
    }
}
