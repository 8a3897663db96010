//! List query-string parsing.
//!
//! List endpoints take `page`, `limit`, `search`, `sort`, `order` plus any
//! number of collection-specific filters, so the raw map is read by hand
//! rather than through a fixed struct.

use std::collections::HashMap;

use archsite_db::collection::CollectionSpec;
use archsite_db::list_query::ListQuery;

/// Query-string keys with a fixed meaning on every list endpoint.
const RESERVED: &[&str] = &["page", "limit", "search", "sort", "order"];

/// Who is asking; decides whether unpublished rows can be seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Admin,
    Public,
}

/// Raw list parameters from the query string.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    /// Every other key, in no particular order.
    pub filters: Vec<(String, String)>,
}

impl ListParams {
    /// Split a query-string map. Unparsable `page` / `limit` values fall
    /// back to their defaults.
    pub fn from_map(mut raw: HashMap<String, String>) -> Self {
        let page = raw.remove("page").and_then(|v| v.trim().parse().ok());
        let limit = raw.remove("limit").and_then(|v| v.trim().parse().ok());
        let search = raw.remove("search");
        let sort = raw.remove("sort");
        let order = raw.remove("order");
        let filters = raw
            .into_iter()
            .filter(|(k, _)| !RESERVED.contains(&k.as_str()))
            .collect();
        Self {
            page,
            limit,
            search,
            sort,
            order,
            filters,
        }
    }

    /// Resolve against a collection. Public queries only see published rows.
    pub fn into_query(self, spec: CollectionSpec, audience: Audience) -> ListQuery {
        let query = ListQuery::new(spec)
            .search(self.search.as_deref())
            .filters(self.filters.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .sort(self.sort.as_deref(), self.order.as_deref())
            .page(self.page, self.limit);
        match audience {
            Audience::Admin => query,
            Audience::Public => query.published_only(),
        }
    }
}

#[cfg(test)]
mod tests {
    use archsite_db::collection::Collection;
    use archsite_db::models::project::Project;

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        ListParams::from_map(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn reserved_keys_are_split_out() {
        let p = params(&[("page", "2"), ("limit", "20"), ("search", "villa"), ("status", "completed")]);
        assert_eq!(p.page, Some(2));
        assert_eq!(p.limit, Some(20));
        assert_eq!(p.search.as_deref(), Some("villa"));
        assert_eq!(p.filters, vec![("status".to_string(), "completed".to_string())]);
    }

    #[test]
    fn garbage_page_numbers_fall_back() {
        let p = params(&[("page", "two"), ("limit", "")]);
        assert_eq!(p.page, None);
        assert_eq!(p.limit, None);
        let q = p.into_query(Project::SPEC, Audience::Admin);
        assert_eq!(q.page_request().page, 1);
        assert_eq!(q.page_request().limit, Project::SPEC.default_limit);
    }

    #[test]
    fn public_audience_forces_published_rows() {
        let q = params(&[("is_published", "false")]).into_query(Project::SPEC, Audience::Public);
        let sql = q.build_select().sql().to_string();
        assert!(sql.contains("is_published = TRUE"));
        assert!(!sql.contains("is_published = $"));
    }
}
