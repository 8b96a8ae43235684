//! The products workload: fixtures in, `GET /products` under load, fixtures out.
//!
//! None of the phases can fail. Every mutating call is checked against the status the
//! API documents and the outcome is recorded in a [`CheckSet`]; the harness carries on
//! regardless, since it is a measuring tool and not a correctness test.
use std::time::Instant;

use clap::ValueEnum;
use grf_bench_core::{CheckSet, Lifecycle};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{
    client::ApiClient,
    metrics::HttpMetric,
    model::{NewCategory, NewProduct, ProductSummary, ResourceId},
};

/// How many products setup guarantees before the measurement starts.
pub const FIXTURE_PRODUCTS: usize = 3;

pub const CHECK_LISTED: &str = "products are listed";
pub const CHECK_DELETED: &str = "product is deleted";
pub const CHECK_CREATED: &str = "product is created";
pub const CHECK_CATEGORY_CREATED: &str = "category is created";

/// Which fixture layout the service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Standalone products.
    Products,
    /// Products that must reference a category; setup creates one first.
    Categories,
}

pub struct ProductsHarness {
    client: ApiClient,
    variant: Variant,
}

impl ProductsHarness {
    pub fn new(client: ApiClient, variant: Variant) -> Self {
        Self { client, variant }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// List products; any failure counts as an empty listing.
    async fn list_products(&self, checks: &mut CheckSet) -> Vec<ProductSummary> {
        match self.client.list_products().await {
            Ok(products) => {
                checks.record(CHECK_LISTED, true);
                products
            }
            Err(e) => {
                checks.record(CHECK_LISTED, false);
                tracing::warn!("could not list products: {e}");
                vec![]
            }
        }
    }

    /// Delete every product the service lists, one by one.
    pub async fn clean_all_products(&self, checks: &mut CheckSet) {
        let products = self.list_products(checks).await;
        tracing::info!("deleting {} products", products.len());
        for product in products {
            let deleted = match self.client.delete_product(&product.id).await {
                Ok(status) => status == StatusCode::NO_CONTENT,
                Err(e) => {
                    tracing::warn!("{e}");
                    false
                }
            };
            if !checks.record(CHECK_DELETED, deleted) {
                tracing::warn!("product {} was not deleted", product.id);
            }
        }
    }

    async fn create_category(&self, checks: &mut CheckSet) -> Option<ResourceId> {
        let created = match self.client.create_category(&NewCategory::fixture()).await {
            Ok(response) => {
                checks.record(CHECK_CATEGORY_CREATED, response.status == StatusCode::CREATED);
                response.body.map(|category| category.id)
            }
            Err(e) => {
                checks.record(CHECK_CATEGORY_CREATED, false);
                tracing::warn!("{e}");
                None
            }
        };
        if created.is_none() {
            tracing::warn!("no category to attach fixture products to");
        }
        created
    }

    async fn create_product(&self, product: &NewProduct, checks: &mut CheckSet) {
        let created = match self.client.create_product(product).await {
            Ok(response) => response.status == StatusCode::CREATED,
            Err(e) => {
                tracing::warn!("{e}");
                false
            }
        };
        if !checks.record(CHECK_CREATED, created) {
            tracing::warn!("fixture {:?} was not created", product.name);
        }
    }
}

impl Lifecycle for ProductsHarness {
    type Metric = HttpMetric;

    async fn setup(&self) -> CheckSet {
        let mut checks = CheckSet::default();
        self.clean_all_products(&mut checks).await;

        let existing = self.list_products(&mut checks).await.len();
        if existing < FIXTURE_PRODUCTS {
            let category_id = match self.variant {
                Variant::Products => None,
                Variant::Categories => self.create_category(&mut checks).await,
            };
            for i in existing..FIXTURE_PRODUCTS {
                let product = NewProduct::fixture(i, category_id.clone());
                self.create_product(&product, &mut checks).await;
            }
        }
        checks
    }

    async fn iteration(&self) -> HttpMetric {
        let start = Instant::now();
        let result = self.client.probe_products().await;
        let latency = start.elapsed();
        match result {
            Ok((status, bytes)) => HttpMetric {
                latency,
                status: Some(status.as_u16()),
                bytes,
            },
            Err(e) => {
                tracing::debug!("{e}");
                HttpMetric {
                    latency,
                    status: None,
                    bytes: 0,
                }
            }
        }
    }

    async fn teardown(&self) -> CheckSet {
        let mut checks = CheckSet::default();
        self.clean_all_products(&mut checks).await;
        checks
    }
}
