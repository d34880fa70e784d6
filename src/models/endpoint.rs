//! Declarative description of the remote service endpoints.
//!
//! Every endpoint differs only in its path, the response key holding the
//! item collection, whether it paginates, and which item fields are shown.
//! The pipeline is generic over this table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Static description of one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    /// Name used on the command line and in logs
    pub name: &'static str,

    /// Path below the service base URL
    pub path: &'static str,

    /// Response key that holds the item list
    pub collection_key: &'static str,

    /// Whether `page` / `pageSize` are meaningful
    pub paginated: bool,

    /// Fields always rendered for each item
    pub base_fields: &'static [&'static str],

    /// Fields additionally rendered in verbose mode
    pub verbose_fields: &'static [&'static str],
}

const SOURCES: EndpointSpec = EndpointSpec {
    name: "sources",
    path: "/sources",
    collection_key: "sources",
    paginated: false,
    base_fields: &["name", "id"],
    verbose_fields: &["description", "country", "category", "url"],
};

const EVERYTHING: EndpointSpec = EndpointSpec {
    name: "everything",
    path: "/everything",
    collection_key: "articles",
    paginated: true,
    base_fields: &["title", "author"],
    verbose_fields: &["url"],
};

const TOP_HEADLINES: EndpointSpec = EndpointSpec {
    name: "topHeadlines",
    path: "/top-headlines",
    collection_key: "articles",
    paginated: true,
    base_fields: &["title", "author"],
    verbose_fields: &["url"],
};

/// Remote service endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Endpoint {
    /// Publisher listing
    Sources,
    /// Full-text article search
    Everything,
    /// Breaking headlines
    TopHeadlines,
}

impl Endpoint {
    /// All endpoints, in declaration order
    pub const ALL: [Endpoint; 3] = [Endpoint::Sources, Endpoint::Everything, Endpoint::TopHeadlines];

    /// The declarative description of this endpoint
    pub fn spec(&self) -> &'static EndpointSpec {
        match self {
            Endpoint::Sources => &SOURCES,
            Endpoint::Everything => &EVERYTHING,
            Endpoint::TopHeadlines => &TOP_HEADLINES,
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    pub fn path(&self) -> &'static str {
        self.spec().path
    }

    pub fn collection_key(&self) -> &'static str {
        self.spec().collection_key
    }

    pub fn is_paginated(&self) -> bool {
        self.spec().paginated
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sources" => Ok(Endpoint::Sources),
            "everything" => Ok(Endpoint::Everything),
            "topHeadlines" | "top-headlines" | "top_headlines" => Ok(Endpoint::TopHeadlines),
            other => Err(format!("unknown endpoint: {}", other)),
        }
    }
}

/// Article ordering accepted by the article search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Relevancy,
    Popularity,
    PublishedAt,
}

impl SortBy {
    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevancy => "relevancy",
            SortBy::Popularity => "popularity",
            SortBy::PublishedAt => "publishedAt",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
