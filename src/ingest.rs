//! Fetch-and-store driver.
//!
//! Walks [`CATEGORIES`] in order. For every page of a category the page is
//! fetched from the catalog and its results are bulk-inserted, unmodified,
//! into the category's collection before the next page is requested.
//! Nothing is deduplicated: running twice stores every record twice.

use catalog_ingest_common::{Error, Result};
use catalog_ingest_store::DocumentStore;
use tracing::{debug, info, warn};

pub use crate::config::FailurePolicy;
use crate::tmdb::CatalogClient;

/// One ingestion target: which endpoint to page through, how far, and
/// where the results go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub pages: u32,
    pub collection: &'static str,
}

/// Categories in the order they are ingested.
pub const CATEGORIES: [Category; 4] = [
    Category {
        name: "popular movies",
        endpoint: "movie/popular",
        pages: 5,
        collection: "movies",
    },
    Category {
        name: "top-rated TV shows",
        endpoint: "tv/top_rated",
        pages: 5,
        collection: "tv_shows",
    },
    Category {
        name: "upcoming premieres",
        endpoint: "movie/upcoming",
        pages: 1,
        collection: "premiere",
    },
    Category {
        name: "top-rated movies",
        endpoint: "movie/top_rated",
        pages: 1,
        collection: "top_rated_movies",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub collection: &'static str,
    pub pages: u32,
    pub documents: usize,
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub completed: Vec<CategorySummary>,
    /// Categories that failed under [`FailurePolicy::Continue`]
    pub failures: Vec<(&'static str, Error)>,
}

impl IngestReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn documents(&self) -> usize {
        self.completed.iter().map(|c| c.documents).sum()
    }
}

pub struct Ingestor<'a> {
    client: &'a CatalogClient,
    store: &'a dyn DocumentStore,
}

impl<'a> Ingestor<'a> {
    pub fn new(client: &'a CatalogClient, store: &'a dyn DocumentStore) -> Self {
        Self { client, store }
    }

    /// Fetch every page of `category` and insert each one as it arrives.
    ///
    /// The first failing page ends the category; pages inserted before it
    /// stay in the store.
    pub async fn run_category(&self, category: &Category) -> Result<CategorySummary> {
        let mut documents = 0;

        for page in 1..=category.pages {
            let results = self.client.fetch_page(category.endpoint, page).await?;
            let fetched = results.len();
            let inserted = self.store.insert_many(category.collection, results).await?;

            debug!(
                endpoint = category.endpoint,
                page,
                collection = category.collection,
                fetched,
                inserted,
                "Stored page"
            );
            documents += inserted;
        }

        Ok(CategorySummary {
            collection: category.collection,
            pages: category.pages,
            documents,
        })
    }

    /// Ingest all of [`CATEGORIES`].
    pub async fn run(&self, policy: FailurePolicy) -> Result<IngestReport> {
        self.run_categories(&CATEGORIES, policy).await
    }

    /// Ingest `categories` in order under `policy`.
    ///
    /// With [`FailurePolicy::Abort`] the first category error is returned and
    /// the remaining categories are never started.
    pub async fn run_categories(
        &self,
        categories: &[Category],
        policy: FailurePolicy,
    ) -> Result<IngestReport> {
        info!(backend = self.store.backend(), "Started fetching");

        let mut report = IngestReport::default();
        for category in categories {
            match self.run_category(category).await {
                Ok(summary) => report.completed.push(summary),
                Err(e) => match policy {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::Continue => {
                        warn!(
                            category = category.name,
                            remote = e.is_remote(),
                            "Skipping category: {}",
                            e
                        );
                        report.failures.push((category.name, e));
                    }
                },
            }
        }

        if report.is_success() {
            info!(
                documents = report.documents(),
                "Successfully fetched movie database"
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_table() {
        let table: Vec<_> = CATEGORIES
            .iter()
            .map(|c| (c.endpoint, c.pages, c.collection))
            .collect();
        assert_eq!(
            table,
            vec![
                ("movie/popular", 5, "movies"),
                ("tv/top_rated", 5, "tv_shows"),
                ("movie/upcoming", 1, "premiere"),
                ("movie/top_rated", 1, "top_rated_movies"),
            ]
        );
    }

    #[test]
    fn report_totals() {
        let mut report = IngestReport::default();
        report.completed.push(CategorySummary {
            collection: "movies",
            pages: 5,
            documents: 100,
        });
        report.completed.push(CategorySummary {
            collection: "premiere",
            pages: 1,
            documents: 20,
        });
        assert!(report.is_success());
        assert_eq!(report.documents(), 120);

        report
            .failures
            .push(("top-rated movies", Error::database("locked")));
        assert!(!report.is_success());
    }
}
