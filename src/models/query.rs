//! Query parameter bags and their normalization.
//!
//! A [`RawParams`] bag is what the command-line layer assembles: every filter
//! it knows about, present or not. [`RawParams::normalize`] turns it into an
//! immutable [`QueryParams`] that only carries values that were actually
//! supplied, plus the resolved `page` / `pageSize` pair.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default 1-based page index
pub const DEFAULT_PAGE: i64 = 1;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page size the service accepts
pub const MAX_PAGE_SIZE: i64 = 100;

pub(crate) const PAGE_KEY: &str = "page";
pub(crate) const PAGE_SIZE_KEY: &str = "pageSize";

/// A single query parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Bool(bool),
    List(Vec<String>),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

/// Un-normalized parameter bag as produced by the command-line layer.
///
/// Keys may map to `None`, meaning the option was not given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParams {
    values: BTreeMap<String, Option<ParamValue>>,
}

impl RawParams {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, keeping `None` as an explicit "not given"
    pub fn param<V: Into<ParamValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.values.insert(key.into(), value.map(Into::into));
        self
    }

    /// Set a parameter that is always present
    pub fn set(self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.param(key, Some(value))
    }

    /// Number of keys, absent ones included
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the bag has no keys at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Produce the normalized bag.
    ///
    /// Drops keys whose value is absent. Zero, `false` and the empty string
    /// are values and survive. `page` and `pageSize` fall back to their
    /// defaults when unset. The receiver is left untouched.
    pub fn normalize(&self) -> QueryParams {
        let mut values: BTreeMap<String, ParamValue> = self
            .values
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.clone(), v.clone())))
            .collect();

        values
            .entry(PAGE_KEY.to_string())
            .or_insert(ParamValue::Int(DEFAULT_PAGE));
        values
            .entry(PAGE_SIZE_KEY.to_string())
            .or_insert(ParamValue::Int(DEFAULT_PAGE_SIZE));

        QueryParams { values }
    }
}

impl From<QueryParams> for RawParams {
    fn from(params: QueryParams) -> Self {
        Self {
            values: params
                .values
                .into_iter()
                .map(|(k, v)| (k, Some(v)))
                .collect(),
        }
    }
}

/// Normalized, immutable query parameters.
///
/// No key maps to an absent value. Always carries `page` and `pageSize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    values: BTreeMap<String, ParamValue>,
}

impl QueryParams {
    /// Look up a parameter
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    /// Check if a parameter is present
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate over present parameters in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of present parameters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a normalized bag, kept for symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Requested 1-based page index.
    ///
    /// A non-integer value reads as 0 so that it is rejected downstream.
    pub fn page(&self) -> i64 {
        self.int_or(PAGE_KEY, DEFAULT_PAGE)
    }

    /// Requested page size
    pub fn page_size(&self) -> i64 {
        self.int_or(PAGE_SIZE_KEY, DEFAULT_PAGE_SIZE)
    }

    fn int_or(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key) {
            Some(ParamValue::Int(n)) => *n,
            Some(ParamValue::Text(s)) => s.trim().parse().unwrap_or(0),
            Some(_) => 0,
            None => default,
        }
    }

    /// Copy of these parameters targeting another page
    pub fn with_page(&self, page: i64) -> Self {
        let mut values = self.values.clone();
        values.insert(PAGE_KEY.to_string(), ParamValue::Int(page));
        Self { values }
    }

    /// Copy of these parameters without the pagination pair
    pub fn without_pagination(&self) -> Self {
        let mut values = self.values.clone();
        values.remove(PAGE_KEY);
        values.remove(PAGE_SIZE_KEY);
        Self { values }
    }

    /// Flatten into URL query pairs; lists are comma-joined
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_empty_yields_default_pagination() {
        let params = RawParams::new().normalize();
        assert_eq!(params.len(), 2);
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 20);
    }

    #[test]
    fn test_normalize_drops_only_absent_values() {
        let raw = RawParams::new()
            .param::<String>("a", None)
            .set("b", 5i64)
            .set("c", "")
            .set("d", false)
            .set("e", 0i64);

        let params = raw.normalize();

        assert!(!params.contains("a"));
        assert_eq!(params.get("b"), Some(&ParamValue::Int(5)));
        assert_eq!(params.get("c"), Some(&ParamValue::Text(String::new())));
        assert_eq!(params.get("d"), Some(&ParamValue::Bool(false)));
        assert_eq!(params.get("e"), Some(&ParamValue::Int(0)));
        assert_eq!(params.page(), DEFAULT_PAGE);
        assert_eq!(params.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_normalize_keeps_explicit_pagination() {
        let params = RawParams::new()
            .set("page", 3i64)
            .set("pageSize", 50i64)
            .normalize();
        assert_eq!(params.page(), 3);
        assert_eq!(params.page_size(), 50);
    }

    #[test]
    fn test_normalize_absent_page_gets_default() {
        let params = RawParams::new()
            .param::<i64>("page", None)
            .param::<i64>("pageSize", None)
            .normalize();
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 20);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = RawParams::new()
            .set("q", "rust")
            .param::<String>("language", None)
            .set("sources", vec!["bbc-news".to_string(), "cnn".to_string()])
            .normalize();

        let twice = RawParams::from(once.clone()).normalize();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_does_not_touch_caller_bag() {
        let raw = RawParams::new().param::<String>("q", None);
        let _ = raw.normalize();
        assert_eq!(raw.len(), 1);
    }

    #[test]
    fn test_with_page_leaves_original() {
        let params = RawParams::new().set("q", "x").normalize();
        let third = params.with_page(3);
        assert_eq!(third.page(), 3);
        assert_eq!(params.page(), 1);
        assert_eq!(third.get("q"), params.get("q"));
    }

    #[test]
    fn test_non_integer_page_reads_as_invalid() {
        let params = RawParams::new().set("page", "abc").normalize();
        assert_eq!(params.page(), 0);
    }

    #[test]
    fn test_query_pairs_join_lists() {
        let params = RawParams::new()
            .set("domains", vec!["bbc.co.uk".to_string(), "techcrunch.com".to_string()])
            .normalize();
        let pairs = params.to_query_pairs();
        assert!(pairs.contains(&("domains".to_string(), "bbc.co.uk,techcrunch.com".to_string())));
        assert!(pairs.contains(&("page".to_string(), "1".to_string())));
    }

    #[test]
    fn test_without_pagination() {
        let params = RawParams::new().set("language", "en").normalize();
        let bare = params.without_pagination();
        assert_eq!(bare.len(), 1);
        assert!(!bare.contains("page"));
    }
}
