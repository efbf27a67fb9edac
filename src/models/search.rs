//! Search filtering and pagination over the full country list.

use serde::Serialize;

use super::country::RawCountry;

/// Page number used when none is given.
pub const DEFAULT_PAGE: usize = 1;
/// Page size used when none is given.
pub const DEFAULT_LIMIT: usize = 10;

// == Search Criteria ==
/// Normalized search filters. `None` means the filter is not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Lower-cased name fragment
    pub name: Option<String>,
    /// Lower-cased capital
    pub capital: Option<String>,
    /// Lower-cased region
    pub region: Option<String>,
    /// UTC offset with spaces turned back into `+`
    pub timezone: Option<String>,
    pub page: usize,
    pub limit: usize,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            name: None,
            capital: None,
            region: None,
            timezone: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl SearchCriteria {
    /// Builds criteria from raw query values. Empty strings are ignored.
    ///
    /// A `+` in a query string decodes to a space, so `UTC+01:00` arrives
    /// as `UTC 01:00`; spaces are turned back into `+` here.
    pub fn new(
        name: Option<&str>,
        capital: Option<&str>,
        region: Option<&str>,
        timezone: Option<&str>,
        page: Option<usize>,
        limit: Option<usize>,
    ) -> Self {
        let lower = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_lowercase);
        Self {
            name: lower(name),
            capital: lower(capital),
            region: lower(region),
            timezone: timezone
                .filter(|s| !s.is_empty())
                .map(|tz| tz.replace(' ', "+")),
            page: page.filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE),
            limit: limit.filter(|l| *l >= 1).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// True when `country` passes every active filter.
    pub fn matches(&self, country: &RawCountry) -> bool {
        let name_ok = self
            .name
            .as_ref()
            .map_or(true, |n| country.name().to_lowercase().contains(n.as_str()));
        let capital_ok = self.capital.as_ref().map_or(true, |c| {
            country
                .first_capital()
                .is_some_and(|cap| cap.to_lowercase() == *c)
        });
        let region_ok = self.region.as_ref().map_or(true, |r| {
            country
                .region
                .as_ref()
                .is_some_and(|reg| reg.to_lowercase() == *r)
        });
        let timezone_ok = self
            .timezone
            .as_ref()
            .map_or(true, |tz| country.timezones().iter().any(|t| t == tz));

        name_ok && capital_ok && region_ok && timezone_ok
    }

    /// Effective parameters, used to build the cache key.
    pub fn key_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        let filters = [
            ("name", &self.name),
            ("capital", &self.capital),
            ("region", &self.region),
            ("timezone", &self.timezone),
        ];
        for (field, value) in filters {
            if let Some(value) = value {
                params.push((field, value.clone()));
            }
        }
        params
    }
}

// == Search Page ==
/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage<T> {
    pub current_page: usize,
    pub total_pages: usize,
    pub results: Vec<T>,
}

/// Cuts `items` into pages of `limit` and returns page `page` (1-based).
///
/// `total_pages` is the ceiling of `items.len() / limit`; a page past the
/// end is empty.
pub fn paginate<T>(items: Vec<T>, page: usize, limit: usize) -> SearchPage<T> {
    let limit = limit.max(1);
    let page = page.max(1);
    let total_pages = items.len().div_ceil(limit);
    let start = (page - 1).saturating_mul(limit);

    let results = items.into_iter().skip(start).take(limit).collect();

    SearchPage {
        current_page: page,
        total_pages,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::country::parse_country_list;
    use proptest::prelude::*;
    use serde_json::json;

    fn countries() -> Vec<RawCountry> {
        parse_country_list(json!([
            {"name": {"common": "Germany"}, "capital": ["Berlin"], "region": "Europe", "timezones": ["UTC+01:00"]},
            {"name": {"common": "France"}, "capital": ["Paris"], "region": "Europe", "timezones": ["UTC-10:00", "UTC+01:00"]},
            {"name": {"common": "Japan"}, "capital": ["Tokyo"], "region": "Asia", "timezones": ["UTC+09:00"]},
            {"name": {"common": "Antarctica"}, "region": "Antarctic", "timezones": ["UTC-03:00"]}
        ]))
        .unwrap()
    }

    fn names(criteria: &SearchCriteria) -> Vec<String> {
        countries()
            .iter()
            .filter(|c| criteria.matches(c))
            .map(|c| c.name().to_string())
            .collect()
    }

    #[test]
    fn test_no_filters_match_everything() {
        assert_eq!(names(&SearchCriteria::default()).len(), 4);
    }

    #[test]
    fn test_filters_are_combined() {
        let criteria = SearchCriteria::new(None, Some("Berlin"), Some("Europe"), None, None, None);
        assert_eq!(names(&criteria), ["Germany"]);
    }

    #[test]
    fn test_name_is_case_insensitive_substring() {
        let criteria = SearchCriteria::new(Some("AN"), None, None, None, None, None);
        assert_eq!(names(&criteria), ["Germany", "France", "Japan", "Antarctica"]);

        let criteria = SearchCriteria::new(Some("fra"), None, None, None, None, None);
        assert_eq!(names(&criteria), ["France"]);
    }

    #[test]
    fn test_capital_and_region_are_exact() {
        let criteria = SearchCriteria::new(None, Some("ber"), None, None, None, None);
        assert!(names(&criteria).is_empty());

        let criteria = SearchCriteria::new(None, None, Some("EUROPE"), None, None, None);
        assert_eq!(names(&criteria), ["Germany", "France"]);
    }

    #[test]
    fn test_missing_capital_never_matches() {
        let criteria = SearchCriteria::new(None, Some("unknown"), None, None, None, None);
        assert!(names(&criteria).is_empty());
    }

    #[test]
    fn test_timezone_restores_plus_sign() {
        let criteria = SearchCriteria::new(None, None, None, Some("UTC 01:00"), None, None);
        assert_eq!(criteria.timezone.as_deref(), Some("UTC+01:00"));
        assert_eq!(names(&criteria), ["Germany", "France"]);

        let criteria = SearchCriteria::new(None, None, None, Some("UTC-03:00"), None, None);
        assert_eq!(names(&criteria), ["Antarctica"]);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let criteria = SearchCriteria::new(Some(""), Some(""), Some(""), Some(""), Some(0), Some(0));
        assert_eq!(criteria, SearchCriteria::default());
    }

    #[test]
    fn test_key_params_include_effective_paging() {
        let criteria = SearchCriteria::new(None, None, Some("Asia"), None, None, Some(5));
        let mut params = criteria.key_params();
        params.sort();
        assert_eq!(
            params,
            vec![
                ("limit", "5".to_string()),
                ("page", "1".to_string()),
                ("region", "asia".to_string()),
            ]
        );
    }

    #[test]
    fn test_paginate_last_partial_page() {
        let items: Vec<u32> = (0..25).collect();
        let page = paginate(items, 3, 10);

        assert_eq!(page.current_page, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.results, vec![20, 21, 22, 23, 24]);
    }

    #[test]
    fn test_paginate_past_the_end_and_empty() {
        let page = paginate((0..5).collect::<Vec<u32>>(), 4, 2);
        assert_eq!(page.total_pages, 3);
        assert!(page.results.is_empty());

        let page = paginate(Vec::<u32>::new(), 1, 10);
        assert_eq!(page.total_pages, 0);
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_search_page_serializes_camel_case() {
        let json = serde_json::to_value(paginate(vec!["a"], 1, 10)).unwrap();
        assert_eq!(json, json!({"currentPage": 1, "totalPages": 1, "results": ["a"]}));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        // Pages partition the input: sizes add up and no page exceeds the limit.
        #[test]
        fn prop_pages_partition_items(len in 0usize..200, limit in 1usize..50) {
            let items: Vec<usize> = (0..len).collect();
            let first = paginate(items.clone(), 1, limit);
            prop_assert_eq!(first.total_pages, (len + limit - 1) / limit);

            let mut seen = Vec::new();
            for page in 1..=first.total_pages + 1 {
                let slice = paginate(items.clone(), page, limit).results;
                prop_assert!(slice.len() <= limit);
                seen.extend(slice);
            }
            prop_assert_eq!(seen, items);
        }
    }
}
