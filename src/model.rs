//! Typed bodies of the products/categories API.
//!
//! Only the fields the harness reads or writes are modelled; anything else the service
//! sends back is ignored on decode.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier.
///
/// The reference service hands out UUID strings, other deployments use integer keys;
/// either way the id is only ever echoed back in a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Text(String),
    Number(i64),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Text(id) => f.write_str(id),
            ResourceId::Number(id) => write!(f, "{id}"),
        }
    }
}

/// One entry of `GET /products`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductSummary {
    pub id: ResourceId,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /products`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    /// Decimal sent as a string so no precision is lost on the way.
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<ResourceId>,
}

impl NewProduct {
    /// The `index`-th fixture product.
    pub fn fixture(index: usize, category_id: Option<ResourceId>) -> Self {
        Self {
            name: format!("Product {index}"),
            description: format!("Description {index}"),
            price: "10.00".to_owned(),
            category_id,
        }
    }
}

/// Response of `POST /products`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub id: ResourceId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category_id: Option<ResourceId>,
}

/// Body of `POST /categories`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
}

impl NewCategory {
    pub fn fixture() -> Self {
        Self {
            name: "Category".to_owned(),
            description: "Fixture category".to_owned(),
        }
    }
}

/// Response of `POST /categories`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub id: ResourceId,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_decode_from_strings_and_numbers() {
        let listed: Vec<ProductSummary> = serde_json::from_value(json!([
            {"id": "5f0c6f4e-2b1d-4c7e-9a51-0d4a7c1e9b22", "name": "Product 0"},
            {"id": 42},
        ]))
        .unwrap();

        assert_eq!(
            listed[0].id.to_string(),
            "5f0c6f4e-2b1d-4c7e-9a51-0d4a7c1e9b22"
        );
        assert_eq!(listed[1].id, ResourceId::Number(42));
        assert_eq!(listed[1].id.to_string(), "42");
        assert_eq!(listed[1].name, None);
    }

    #[test]
    fn fixture_product_without_category_omits_the_field() {
        let body = serde_json::to_value(NewProduct::fixture(1, None)).unwrap();
        assert_eq!(
            body,
            json!({"name": "Product 1", "description": "Description 1", "price": "10.00"})
        );
    }

    #[test]
    fn fixture_product_references_its_category() {
        let category = ResourceId::Text("c-1".into());
        let body = serde_json::to_value(NewProduct::fixture(2, Some(category))).unwrap();
        assert_eq!(body["category_id"], json!("c-1"));
    }

    #[test]
    fn created_product_ignores_unknown_fields() {
        let product: Product = serde_json::from_value(json!({
            "id": "p-1",
            "name": "Product 0",
            "price": "10",
            "created_at": "2024-01-01T00:00:00Z",
            "category_id": "c-1",
        }))
        .unwrap();
        assert_eq!(product.category_id, Some(ResourceId::Text("c-1".into())));
    }
}
