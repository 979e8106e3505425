//! Raw query projection and normalization.
//!
//! # Responsibility
//! - Turn caller-supplied key/value input into a validated `FilterSpec`.
//! - Apply pagination defaults and bounds; parse sort directives.
//! - Enforce the deployment's owner scoping policy for unprivileged actors.
//!
//! # Invariants
//! - Unrecognized filter fields are dropped, never forwarded to persistence.
//! - Pagination/sort value errors fail loudly before any access decision.
//! - Identical inputs always normalize to the identical `FilterSpec`.

use crate::model::actor::{Actor, ActorId};
use crate::query::fields::FieldSet;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Raw caller query input, as delivered by the surrounding transport layer.
pub type RawQuery = BTreeMap<String, String>;

/// Default page size applied when `limit` is absent.
pub const DEFAULT_LIMIT: u32 = 10;
/// Upper bound for `limit`; larger values are rejected.
pub const MAX_LIMIT: u32 = 50;

const KEY_LIMIT: &str = "limit";
const KEY_PAGE: &str = "page";
const KEY_SORT_BY: &str = "sort_by";

/// Deployment-wide owner scoping policy for unprivileged list requests.
///
/// Fixed per service instance at construction; uniform across endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopePolicy {
    /// Absent owner filter is injected as the acting identity, turning an
    /// ambiguous request into a well-defined self-scoped one.
    #[default]
    InjectOwner,
    /// Absent owner filter is left absent; the access decision then denies
    /// with a missing-filter reason.
    RequireOwnerFilter,
}

/// Sort direction for one sortable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Validated sort directive over a registry field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: &'static str,
    pub direction: SortDirection,
}

/// Typed filter value, validated against the field registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
}

/// Normalized, field-restricted query passed to persistence unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Equality filters; field names are registry strings.
    pub filters: Vec<(&'static str, FilterValue)>,
    pub limit: u32,
    /// 1-based page number.
    pub page: u32,
    pub sort: Option<SortSpec>,
}

impl FilterSpec {
    /// Row offset implied by `page` and `limit`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Returns the value bound to a filter field, when present.
    pub fn filter_value(&self, field: &str) -> Option<&FilterValue> {
        self.filters
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }
}

/// Query normalization errors; all belong to the validation error class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// `limit` is not a positive integer.
    InvalidLimit(String),
    /// `limit` exceeds the configured maximum.
    LimitTooLarge { given: u32, max: u32 },
    /// `page` is not a positive integer.
    InvalidPage(String),
    /// `sort_by` is not of the form `field:asc|desc`.
    InvalidSort(String),
    /// `sort_by` names a field outside the sortable registry.
    UnsortableField(String),
    /// An identifier filter value is not a valid UUID.
    InvalidIdValue {
        field: &'static str,
        value: String,
    },
    /// An integer filter value does not parse.
    InvalidIntValue {
        field: &'static str,
        value: String,
    },
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLimit(value) => {
                write!(f, "limit must be a positive integer, got `{value}`")
            }
            Self::LimitTooLarge { given, max } => {
                write!(f, "limit {given} exceeds maximum {max}")
            }
            Self::InvalidPage(value) => {
                write!(f, "page must be a positive integer, got `{value}`")
            }
            Self::InvalidSort(value) => {
                write!(f, "sort_by must be `field:asc|desc`, got `{value}`")
            }
            Self::UnsortableField(field) => write!(f, "field is not sortable: {field}"),
            Self::InvalidIdValue { field, value } => {
                write!(f, "{field} must be a valid UUID, got `{value}`")
            }
            Self::InvalidIntValue { field, value } => {
                write!(f, "{field} must be an integer, got `{value}`")
            }
        }
    }
}

impl Error for QueryError {}

/// Normalizes raw caller input into a `FilterSpec` for one list operation.
///
/// Projection rules:
/// - `limit`/`page`/`sort_by` are pagination fields, parsed and bounded.
/// - Fields in the operation's registry are kept with typed values.
/// - Anything else is dropped.
///
/// Owner scoping applies only when the operation has an owner field and the
/// actor is unprivileged: an absent owner filter is injected (`InjectOwner`)
/// or left absent for the decision engine to reject (`RequireOwnerFilter`).
/// A present owner filter is passed through untouched in both policies, so
/// a mismatch is denied rather than silently rewritten.
pub fn normalize(
    raw: &RawQuery,
    fields: &FieldSet,
    actor: &Actor,
    policy: ScopePolicy,
) -> Result<FilterSpec, QueryError> {
    let limit = parse_limit(raw.get(KEY_LIMIT))?;
    let page = parse_page(raw.get(KEY_PAGE))?;
    let sort = match raw.get(KEY_SORT_BY) {
        Some(value) => Some(parse_sort(value, fields)?),
        None => None,
    };

    let mut filters = Vec::new();
    for (key, value) in raw {
        if key == KEY_LIMIT || key == KEY_PAGE || key == KEY_SORT_BY {
            continue;
        }
        let Some(field) = fields.canonical_filter(key) else {
            continue;
        };
        filters.push((field, parse_filter_value(field, value, fields)?));
    }

    if let Some(owner_field) = fields.owner_field {
        let has_owner = filters.iter().any(|(name, _)| *name == owner_field);
        if !actor.is_privileged() && !has_owner && policy == ScopePolicy::InjectOwner {
            filters.push((owner_field, FilterValue::Text(actor.id.to_string())));
        }
    }

    Ok(FilterSpec {
        filters,
        limit,
        page,
        sort,
    })
}

/// Extracts the owner scope from a normalized filter for the access decision.
///
/// Returns `None` when the operation's owner field is absent from the filter
/// (or the operation is unowned).
pub fn owner_scope(
    spec: &FilterSpec,
    fields: &FieldSet,
) -> Result<Option<ActorId>, QueryError> {
    let Some(owner_field) = fields.owner_field else {
        return Ok(None);
    };
    match spec.filter_value(owner_field) {
        Some(FilterValue::Text(value)) => {
            let id = Uuid::parse_str(value).map_err(|_| QueryError::InvalidIdValue {
                field: owner_field,
                value: value.clone(),
            })?;
            Ok(Some(id))
        }
        Some(FilterValue::Integer(value)) => Err(QueryError::InvalidIdValue {
            field: owner_field,
            value: value.to_string(),
        }),
        None => Ok(None),
    }
}

fn parse_limit(value: Option<&String>) -> Result<u32, QueryError> {
    let Some(raw) = value else {
        return Ok(DEFAULT_LIMIT);
    };
    let limit: u32 = raw
        .trim()
        .parse()
        .map_err(|_| QueryError::InvalidLimit(raw.clone()))?;
    if limit == 0 {
        return Err(QueryError::InvalidLimit(raw.clone()));
    }
    if limit > MAX_LIMIT {
        return Err(QueryError::LimitTooLarge {
            given: limit,
            max: MAX_LIMIT,
        });
    }
    Ok(limit)
}

fn parse_page(value: Option<&String>) -> Result<u32, QueryError> {
    let Some(raw) = value else {
        return Ok(1);
    };
    let page: u32 = raw
        .trim()
        .parse()
        .map_err(|_| QueryError::InvalidPage(raw.clone()))?;
    if page == 0 {
        return Err(QueryError::InvalidPage(raw.clone()));
    }
    Ok(page)
}

fn parse_sort(value: &str, fields: &FieldSet) -> Result<SortSpec, QueryError> {
    let Some((field, direction)) = value.split_once(':') else {
        return Err(QueryError::InvalidSort(value.to_string()));
    };
    let field = fields
        .canonical_sort(field.trim())
        .ok_or_else(|| QueryError::UnsortableField(field.trim().to_string()))?;
    let direction = match direction.trim() {
        "asc" => SortDirection::Asc,
        "desc" => SortDirection::Desc,
        _ => return Err(QueryError::InvalidSort(value.to_string())),
    };
    Ok(SortSpec { field, direction })
}

fn parse_filter_value(
    field: &'static str,
    value: &str,
    fields: &FieldSet,
) -> Result<FilterValue, QueryError> {
    if fields.is_id_field(field) {
        let id = Uuid::parse_str(value.trim()).map_err(|_| QueryError::InvalidIdValue {
            field,
            value: value.to_string(),
        })?;
        return Ok(FilterValue::Text(id.to_string()));
    }
    if fields.is_int_field(field) {
        let parsed: i64 = value
            .trim()
            .parse()
            .map_err(|_| QueryError::InvalidIntValue {
                field,
                value: value.to_string(),
            })?;
        return Ok(FilterValue::Integer(parsed));
    }
    Ok(FilterValue::Text(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{
        normalize, owner_scope, FilterValue, QueryError, ScopePolicy, SortDirection, RawQuery,
        DEFAULT_LIMIT, MAX_LIMIT,
    };
    use crate::model::actor::{Actor, Role};
    use crate::query::fields::{PAYMENT_LIST_FIELDS, RECORD_LIST_FIELDS};
    use uuid::Uuid;

    fn raw(pairs: &[(&str, &str)]) -> RawQuery {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn user() -> Actor {
        Actor::new(Uuid::new_v4(), Role::User)
    }

    #[test]
    fn applies_pagination_defaults() {
        let spec = normalize(
            &raw(&[]),
            &RECORD_LIST_FIELDS,
            &user(),
            ScopePolicy::InjectOwner,
        )
        .expect("empty query should normalize");
        assert_eq!(spec.limit, DEFAULT_LIMIT);
        assert_eq!(spec.page, 1);
        assert_eq!(spec.offset(), 0);
        assert!(spec.sort.is_none());
    }

    #[test]
    fn rejects_non_positive_and_oversized_limits() {
        for bad in ["-1", "0", "ten", "1.5"] {
            let err = normalize(
                &raw(&[("limit", bad)]),
                &RECORD_LIST_FIELDS,
                &user(),
                ScopePolicy::InjectOwner,
            )
            .expect_err("bad limit must fail");
            assert!(matches!(err, QueryError::InvalidLimit(_)), "input: {bad}");
        }

        let err = normalize(
            &raw(&[("limit", "51")]),
            &RECORD_LIST_FIELDS,
            &user(),
            ScopePolicy::InjectOwner,
        )
        .expect_err("oversized limit must fail");
        assert_eq!(
            err,
            QueryError::LimitTooLarge {
                given: 51,
                max: MAX_LIMIT
            }
        );
    }

    #[test]
    fn parses_sort_directive_against_registry() {
        let spec = normalize(
            &raw(&[("sort_by", "price_cents:desc")]),
            &RECORD_LIST_FIELDS,
            &user(),
            ScopePolicy::InjectOwner,
        )
        .expect("valid sort should normalize");
        let sort = spec.sort.expect("sort should be present");
        assert_eq!(sort.field, "price_cents");
        assert_eq!(sort.direction, SortDirection::Desc);

        let err = normalize(
            &raw(&[("sort_by", "band_id:asc")]),
            &RECORD_LIST_FIELDS,
            &user(),
            ScopePolicy::InjectOwner,
        )
        .expect_err("unsortable field must fail");
        assert_eq!(err, QueryError::UnsortableField("band_id".to_string()));

        let err = normalize(
            &raw(&[("sort_by", "title")]),
            &RECORD_LIST_FIELDS,
            &user(),
            ScopePolicy::InjectOwner,
        )
        .expect_err("missing direction must fail");
        assert!(matches!(err, QueryError::InvalidSort(_)));
    }

    #[test]
    fn drops_unrecognized_filter_fields() {
        let band_id = Uuid::new_v4();
        let spec = normalize(
            &raw(&[
                ("band_id", &band_id.to_string()),
                ("label", "earache"),
                ("price_max", "1000"),
            ]),
            &RECORD_LIST_FIELDS,
            &user(),
            ScopePolicy::InjectOwner,
        )
        .expect("query should normalize");
        assert_eq!(spec.filters.len(), 1);
        assert_eq!(
            spec.filter_value("band_id"),
            Some(&FilterValue::Text(band_id.to_string()))
        );
    }

    #[test]
    fn validates_typed_filter_values() {
        let err = normalize(
            &raw(&[("band_id", "not-a-uuid")]),
            &RECORD_LIST_FIELDS,
            &user(),
            ScopePolicy::InjectOwner,
        )
        .expect_err("malformed id filter must fail");
        assert!(matches!(
            err,
            QueryError::InvalidIdValue {
                field: "band_id",
                ..
            }
        ));

        let err = normalize(
            &raw(&[("released_year", "nineteen-ninety")]),
            &RECORD_LIST_FIELDS,
            &user(),
            ScopePolicy::InjectOwner,
        )
        .expect_err("malformed int filter must fail");
        assert!(matches!(
            err,
            QueryError::InvalidIntValue {
                field: "released_year",
                ..
            }
        ));
    }

    #[test]
    fn inject_policy_scopes_unprivileged_payment_lists_to_self() {
        let actor = user();
        let spec = normalize(
            &raw(&[]),
            &PAYMENT_LIST_FIELDS,
            &actor,
            ScopePolicy::InjectOwner,
        )
        .expect("query should normalize");
        assert_eq!(
            spec.filter_value("owner_id"),
            Some(&FilterValue::Text(actor.id.to_string()))
        );
        assert_eq!(
            owner_scope(&spec, &PAYMENT_LIST_FIELDS).expect("scope should parse"),
            Some(actor.id)
        );
    }

    #[test]
    fn require_policy_leaves_owner_filter_absent() {
        let actor = user();
        let spec = normalize(
            &raw(&[]),
            &PAYMENT_LIST_FIELDS,
            &actor,
            ScopePolicy::RequireOwnerFilter,
        )
        .expect("query should normalize");
        assert_eq!(spec.filter_value("owner_id"), None);
        assert_eq!(
            owner_scope(&spec, &PAYMENT_LIST_FIELDS).expect("scope lookup"),
            None
        );
    }

    #[test]
    fn present_owner_filter_is_passed_through_not_rewritten() {
        let actor = user();
        let other = Uuid::new_v4();
        let spec = normalize(
            &raw(&[("owner_id", &other.to_string())]),
            &PAYMENT_LIST_FIELDS,
            &actor,
            ScopePolicy::InjectOwner,
        )
        .expect("query should normalize");
        assert_eq!(
            owner_scope(&spec, &PAYMENT_LIST_FIELDS).expect("scope should parse"),
            Some(other)
        );
    }

    #[test]
    fn privileged_actor_lists_are_never_injected() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let spec = normalize(
            &raw(&[]),
            &PAYMENT_LIST_FIELDS,
            &admin,
            ScopePolicy::InjectOwner,
        )
        .expect("query should normalize");
        assert!(spec.filters.is_empty());
    }

    #[test]
    fn normalization_is_idempotent_for_identical_inputs() {
        let actor = user();
        let input = raw(&[("limit", "25"), ("page", "2"), ("sort_by", "created_at:asc")]);
        let first = normalize(&input, &PAYMENT_LIST_FIELDS, &actor, ScopePolicy::InjectOwner)
            .expect("first normalize");
        let second = normalize(&input, &PAYMENT_LIST_FIELDS, &actor, ScopePolicy::InjectOwner)
            .expect("second normalize");
        assert_eq!(first, second);
        assert_eq!(first.offset(), 25);
    }
}
