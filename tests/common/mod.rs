//! In-memory stand-in for the products/categories API.
#![allow(dead_code)]

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
    time::Duration,
};

use grf_bench::client::ApiClient;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, Request, Respond, ResponseTemplate,
    matchers::{method, path, path_regex},
};

#[derive(Default)]
pub struct Store {
    products: Mutex<Vec<Value>>,
    categories: Mutex<Vec<Value>>,
    next_id: AtomicU64,
    pub lists: AtomicUsize,
    pub deletes: AtomicUsize,
    pub product_creates: AtomicUsize,
    pub category_creates: AtomicUsize,
    /// Every delete answers 500 and removes nothing.
    pub fail_deletes: AtomicBool,
    /// Products without a known `category_id` are rejected with 400.
    pub require_category: AtomicBool,
}

impl Store {
    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn insert_product(&self, name: &str, category_id: Option<Value>) -> Value {
        let product = json!({
            "id": format!("prod-{}", self.next_id()),
            "name": name,
            "description": "seeded",
            "price": "1.00",
            "category_id": category_id,
        });
        self.products.lock().unwrap().push(product.clone());
        product
    }
}

struct ListProducts(Arc<Store>);

impl Respond for ListProducts {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.0.lists.fetch_add(1, Ordering::SeqCst);
        let products = self.0.products.lock().unwrap().clone();
        ResponseTemplate::new(200).set_body_json(products)
    }
}

struct DeleteProduct(Arc<Store>);

impl Respond for DeleteProduct {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.0.deletes.fetch_add(1, Ordering::SeqCst);
        if self.0.fail_deletes.load(Ordering::SeqCst) {
            return ResponseTemplate::new(500);
        }
        let id = request.url.path().trim_start_matches("/products/");
        let mut products = self.0.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p["id"] != id);
        if products.len() < before {
            ResponseTemplate::new(204)
        } else {
            ResponseTemplate::new(404)
        }
    }
}

struct CreateProduct(Arc<Store>);

impl Respond for CreateProduct {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.0.product_creates.fetch_add(1, Ordering::SeqCst);
        let Ok(body) = request.body_json::<Value>() else {
            return ResponseTemplate::new(400);
        };
        let category_id = body.get("category_id").cloned();
        if self.0.require_category.load(Ordering::SeqCst) {
            let known = category_id.as_ref().is_some_and(|id| {
                self.0
                    .categories
                    .lock()
                    .unwrap()
                    .iter()
                    .any(|c| &c["id"] == id)
            });
            if !known {
                return ResponseTemplate::new(400).set_body_json(json!({"error": "category"}));
            }
        }
        let name = body["name"].as_str().unwrap_or_default().to_owned();
        let product = self.0.insert_product(&name, category_id);
        ResponseTemplate::new(201).set_body_json(product)
    }
}

struct CreateCategory(Arc<Store>);

impl Respond for CreateCategory {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.0.category_creates.fetch_add(1, Ordering::SeqCst);
        let Ok(body) = request.body_json::<Value>() else {
            return ResponseTemplate::new(400);
        };
        // numeric ids, unlike products
        let category = json!({
            "id": self.0.next_id(),
            "name": body["name"],
            "description": body["description"],
        });
        self.0.categories.lock().unwrap().push(category.clone());
        ResponseTemplate::new(201).set_body_json(category)
    }
}

pub struct FakeService {
    pub server: MockServer,
    pub store: Arc<Store>,
}

impl FakeService {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(Store::default());

        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ListProducts(store.clone()))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path_regex(r"^/products/[^/]+$"))
            .respond_with(DeleteProduct(store.clone()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/products"))
            .respond_with(CreateProduct(store.clone()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/categories"))
            .respond_with(CreateCategory(store.clone()))
            .mount(&server)
            .await;

        Self { server, store }
    }

    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.server.uri(), Duration::from_secs(5)).unwrap()
    }

    /// Pre-populate `count` products that the harness did not create.
    pub fn seed(&self, count: usize) {
        for i in 0..count {
            self.store.insert_product(&format!("Existing {i}"), None);
        }
    }

    pub fn products(&self) -> Vec<Value> {
        self.store.products.lock().unwrap().clone()
    }

    pub fn categories(&self) -> Vec<Value> {
        self.store.categories.lock().unwrap().clone()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        Self::count(&self.store.lists)
    }

    pub fn deletes(&self) -> usize {
        Self::count(&self.store.deletes)
    }

    pub fn product_creates(&self) -> usize {
        Self::count(&self.store.product_creates)
    }

    pub fn category_creates(&self) -> usize {
        Self::count(&self.store.category_creates)
    }

    /// Reset the request counters, keeping the stored data.
    pub fn reset_counters(&self) {
        for counter in [
            &self.store.lists,
            &self.store.deletes,
            &self.store.product_creates,
            &self.store.category_creates,
        ] {
            counter.store(0, Ordering::SeqCst);
        }
    }
}
