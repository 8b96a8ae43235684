mod common;

use std::{sync::Arc, time::Duration};

use common::FakeService;
use grf_bench::{
    client::ApiClient,
    harness::{
        CHECK_CATEGORY_CREATED, CHECK_CREATED, CHECK_DELETED, CHECK_LISTED, FIXTURE_PRODUCTS,
        ProductsHarness, Variant,
    },
};
use grf_bench_core::Lifecycle;
use serde_json::Value;

fn harness(service: &FakeService, variant: Variant) -> ProductsHarness {
    ProductsHarness::new(service.client(), variant)
}

fn names(products: &[Value]) -> Vec<&str> {
    products
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn setup_on_an_empty_service_creates_the_fixtures() {
    let service = FakeService::start().await;

    let checks = harness(&service, Variant::Products).setup().await;

    assert_eq!(checks.fails(), 0);
    assert_eq!(checks.get(CHECK_CREATED).unwrap().passes, 3);
    assert!(checks.get(CHECK_DELETED).is_none());
    assert_eq!(service.deletes(), 0);
    assert_eq!(service.product_creates(), FIXTURE_PRODUCTS);
    assert_eq!(
        names(&service.products()),
        ["Product 0", "Product 1", "Product 2"]
    );
}

#[tokio::test]
async fn setup_deletes_existing_products_first() {
    let service = FakeService::start().await;
    service.seed(5);

    let checks = harness(&service, Variant::Products).setup().await;

    assert_eq!(checks.fails(), 0);
    assert_eq!(service.deletes(), 5);
    assert_eq!(checks.get(CHECK_DELETED).unwrap().passes, 5);
    assert_eq!(service.product_creates(), 3);
    assert_eq!(service.products().len(), FIXTURE_PRODUCTS);
    assert!(
        names(&service.products())
            .iter()
            .all(|n| n.starts_with("Product "))
    );
}

#[tokio::test]
async fn setup_tops_up_from_the_products_still_listed() {
    let service = FakeService::start().await;
    service.seed(1);
    service
        .store
        .fail_deletes
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let checks = harness(&service, Variant::Products).setup().await;

    assert_eq!(checks.get(CHECK_DELETED).unwrap().fails, 1);
    assert_eq!(checks.get(CHECK_CREATED).unwrap().passes, 2);
    assert_eq!(service.product_creates(), 2);
    assert_eq!(
        names(&service.products()),
        ["Existing 0", "Product 1", "Product 2"]
    );
}

#[tokio::test]
async fn setup_twice_still_leaves_three_products() {
    let service = FakeService::start().await;
    let harness = harness(&service, Variant::Products);

    harness.setup().await;
    let checks = harness.setup().await;

    assert_eq!(checks.fails(), 0);
    assert_eq!(service.products().len(), FIXTURE_PRODUCTS);
    assert_eq!(service.deletes(), 3);
}

#[tokio::test]
async fn categories_variant_links_fixtures_to_a_new_category() {
    let service = FakeService::start().await;
    service
        .store
        .require_category
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let checks = harness(&service, Variant::Categories).setup().await;

    assert_eq!(checks.fails(), 0);
    assert_eq!(checks.get(CHECK_CATEGORY_CREATED).unwrap().passes, 1);
    assert_eq!(service.category_creates(), 1);

    let categories = service.categories();
    assert_eq!(categories[0]["name"], "Category");
    let category_id = &categories[0]["id"];
    let products = service.products();
    assert_eq!(products.len(), FIXTURE_PRODUCTS);
    assert!(products.iter().all(|p| &p["category_id"] == category_id));
}

#[tokio::test]
async fn products_variant_rejected_by_a_categories_service_is_only_a_check() {
    let service = FakeService::start().await;
    service
        .store
        .require_category
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let checks = harness(&service, Variant::Products).setup().await;

    assert_eq!(checks.get(CHECK_CREATED).unwrap().fails, 3);
    assert!(service.products().is_empty());
}

#[tokio::test]
async fn iterations_only_read() {
    let service = FakeService::start().await;
    let harness = Arc::new(harness(&service, Variant::Products));
    harness.setup().await;
    service.reset_counters();

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..100 {
        let harness = harness.clone();
        tasks.spawn(async move { harness.iteration().await });
    }
    let metrics = tasks.join_all().await;

    assert_eq!(metrics.len(), 100);
    assert!(metrics.iter().all(|m| m.status == Some(200) && !m.failed()));
    assert!(metrics.iter().all(|m| m.bytes > 0));
    assert_eq!(service.lists(), 100);
    assert_eq!(service.deletes(), 0);
    assert_eq!(service.product_creates(), 0);
    assert_eq!(service.products().len(), FIXTURE_PRODUCTS);
}

#[tokio::test]
async fn teardown_deletes_everything_listed() {
    let service = FakeService::start().await;
    service.seed(4);

    let checks = harness(&service, Variant::Products).teardown().await;

    assert_eq!(service.deletes(), 4);
    assert_eq!(checks.get(CHECK_DELETED).unwrap().passes, 4);
    assert_eq!(checks.get(CHECK_LISTED).unwrap().passes, 1);
    assert!(service.products().is_empty());
}

#[tokio::test]
async fn failed_deletes_are_recorded_not_raised() {
    let service = FakeService::start().await;
    service.seed(2);
    service
        .store
        .fail_deletes
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let checks = harness(&service, Variant::Products).teardown().await;

    let deleted = checks.get(CHECK_DELETED).unwrap();
    assert_eq!((deleted.passes, deleted.fails), (0, 2));
    assert_eq!(service.products().len(), 2);
}

#[tokio::test]
async fn unreachable_service_completes_with_failed_checks() {
    let client = ApiClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let harness = ProductsHarness::new(client, Variant::Categories);

    let setup = harness.setup().await;
    let listed = setup.get(CHECK_LISTED).unwrap();
    assert_eq!((listed.passes, listed.fails), (0, 2));
    assert_eq!(setup.get(CHECK_CATEGORY_CREATED).unwrap().fails, 1);
    assert_eq!(setup.get(CHECK_CREATED).unwrap().fails, 3);
    assert_eq!(setup.passes(), 0);

    let metric = harness.iteration().await;
    assert_eq!(metric.status, None);
    assert!(metric.failed());

    let teardown = harness.teardown().await;
    assert_eq!(teardown.get(CHECK_LISTED).unwrap().fails, 1);
    assert!(teardown.get(CHECK_DELETED).is_none());
}
