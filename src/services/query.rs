use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Caller-facing listing options. Every dynamic piece is validated
/// against the injected [`QueryRules`]; nothing here is ever interpolated
/// into SQL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListOptions {
    #[serde(default)]
    pub single_id: Option<i64>,
    #[serde(default)]
    pub include_hidden: bool,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub sort_field: Option<String>,
    #[serde(default)]
    pub sort_direction: SortDirection,
    #[serde(default)]
    pub last_event_from: Option<NaiveDate>,
    #[serde(default)]
    pub last_event_to: Option<NaiveDate>,
    #[serde(default)]
    pub cursor_name: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl ListOptions {
    pub fn for_id(id: i64) -> Self {
        ListOptions {
            single_id: Some(id),
            ..Default::default()
        }
    }
}

/// Owned bind value, so plans can be built and inspected without a
/// database connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

/// Rendered query constraints: a clause suffix appended to the base
/// listing query, plus its positional binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub suffix: String,
    pub binds: Vec<SqlParam>,
}

/// Whitelists the composer validates against. Injected at construction so
/// deployments (and tests) can override them; no process-wide state.
#[derive(Debug, Clone)]
pub struct QueryRules {
    /// sort key -> ORDER BY column
    pub sort_fields: BTreeMap<&'static str, &'static str>,
    /// filter key -> pre-written predicate fragment
    pub filters: BTreeMap<&'static str, &'static str>,
}

pub const DEFAULT_SORT_KEY: &str = "name";
const NAME_COLUMN: &str = "a.name";

impl Default for QueryRules {
    fn default() -> Self {
        let sort_fields = BTreeMap::from([
            ("name", NAME_COLUMN),
            ("last_event", "last_event"),
            ("total_points", "total_points"),
            ("interest_date", "interest_date"),
        ]);

        let filters = BTreeMap::from([
            ("development", "a.activist_level LIKE '%Organizer'"),
            (
                "chapter_member_prospects",
                "a.prospect_chapter_member = 1 \
                 AND a.activist_level <> 'Chapter Member' \
                 AND a.activist_level NOT LIKE '%Organizer'",
            ),
            (
                "organizer_prospects",
                "a.prospect_organizer = 1 AND a.activist_level NOT LIKE '%Organizer'",
            ),
            (
                "senior_organizer_prospects",
                "a.prospect_senior_organizer = 1 AND a.activist_level <> 'Senior Organizer'",
            ),
            (
                "senior_organizer_development",
                "a.activist_level = 'Senior Organizer'",
            ),
            (
                "chapter_member_development",
                "(a.activist_level LIKE '%Organizer' OR a.activist_level = 'Chapter Member')",
            ),
            (
                "community_prospects",
                "(a.source LIKE '%form%' OR a.source LIKE '%fur ban%' OR a.source LIKE 'petition%') \
                 AND a.source <> 'circle interest form' \
                 AND a.source NOT LIKE '%application%' \
                 AND (a.activist_level = 'Supporter' OR a.activist_level = 'Circle Member') \
                 AND a.interest_date >= date('now', '-3 months')",
            ),
            (
                "circle_members",
                "a.id IN (SELECT DISTINCT activist_id FROM circle_members)",
            ),
            (
                "circle_member_prospects",
                "a.circle_interest = 1 \
                 AND a.id NOT IN (SELECT DISTINCT activist_id FROM circle_members)",
            ),
            (
                "leaderboard",
                "a.id IN (SELECT DISTINCT activist_id FROM event_attendance ea \
                 WHERE ea.event_id IN \
                 (SELECT id FROM events e WHERE e.date >= date('now', '-30 days')))",
            ),
        ]);

        QueryRules {
            sort_fields,
            filters,
        }
    }
}

/// Renders validated listing constraints. All SQL text comes from the
/// rules tables or from fixed templates in this file; caller input only
/// ever becomes a bind value or a whitelist lookup key.
#[derive(Debug, Clone, Default)]
pub struct QueryComposer {
    rules: QueryRules,
}

impl QueryComposer {
    pub fn new(rules: QueryRules) -> Self {
        QueryComposer { rules }
    }

    pub fn compose(&self, options: &ListOptions) -> Result<QueryPlan> {
        let sort_key = options.sort_field.as_deref().unwrap_or(DEFAULT_SORT_KEY);
        let sort_column = *self
            .rules
            .sort_fields
            .get(sort_key)
            .ok_or_else(|| Error::validation("sort_field", format!("unknown sort field {sort_key:?}")))?;

        if let Some(id) = options.single_id {
            return self.compose_single(id, options);
        }

        let mut suffix = String::new();
        let mut binds = Vec::new();
        let mut where_clause: Vec<String> = Vec::new();

        if !options.include_hidden {
            where_clause.push("a.hidden = 0".to_string());
        }

        if let Some(filter) = options.filter.as_deref() {
            let fragment = *self
                .rules
                .filters
                .get(filter)
                .ok_or_else(|| Error::validation("filter", format!("unknown filter {filter:?}")))?;
            where_clause.push(fragment.to_string());
        }

        if let Some(cursor) = options.cursor_name.as_deref() {
            // Keyset pagination works off the name ordering; anything else
            // would paginate against a column we are not sorting by.
            if sort_column != NAME_COLUMN {
                return Err(Error::validation(
                    "cursor_name",
                    "cursor pagination requires the name sort",
                ));
            }
            let comparison = match options.sort_direction {
                SortDirection::Asc => "a.name > ?",
                SortDirection::Desc => "a.name < ?",
            };
            where_clause.push(comparison.to_string());
            binds.push(SqlParam::Text(cursor.to_string()));
        }

        if !where_clause.is_empty() {
            suffix.push_str(" WHERE ");
            suffix.push_str(&where_clause.join(" AND "));
        }

        suffix.push_str(" GROUP BY a.id");

        // Date-range constraints apply to the derived last-event date, so
        // they belong after aggregation.
        let mut having_clause: Vec<&str> = Vec::new();
        if let Some(from) = options.last_event_from {
            having_clause.push("last_event >= ?");
            binds.push(SqlParam::Text(from.to_string()));
        }
        if let Some(to) = options.last_event_to {
            having_clause.push("last_event <= ?");
            binds.push(SqlParam::Text(to.to_string()));
        }
        if !having_clause.is_empty() {
            suffix.push_str(" HAVING ");
            suffix.push_str(&having_clause.join(" AND "));
        }

        suffix.push_str(" ORDER BY ");
        suffix.push_str(sort_column);
        match options.sort_direction {
            SortDirection::Asc => suffix.push_str(" ASC"),
            SortDirection::Desc => suffix.push_str(" DESC"),
        }

        if let Some(limit) = options.limit {
            if limit <= 0 {
                return Err(Error::validation("limit", "limit must be positive"));
            }
            suffix.push_str(" LIMIT ?");
            binds.push(SqlParam::Int(limit));
        }

        Ok(QueryPlan { suffix, binds })
    }

    /// Single-row lookup path. Exclusive: no other record-set constraint
    /// may combine with it.
    fn compose_single(&self, id: i64, options: &ListOptions) -> Result<QueryPlan> {
        if id == 0 {
            return Err(Error::validation("single_id", "id cannot be zero"));
        }
        if options.filter.is_some()
            || options.cursor_name.is_some()
            || options.last_event_from.is_some()
            || options.last_event_to.is_some()
        {
            return Err(Error::validation(
                "single_id",
                "id lookup cannot combine with other filters",
            ));
        }

        Ok(QueryPlan {
            suffix: " WHERE a.id = ?".to_string(),
            binds: vec![SqlParam::Int(id)],
        })
    }
}
