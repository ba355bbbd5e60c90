//! Product catalog data model.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Draft,
    Archived,
}

impl ProductStatus {
    /// Wire representation, identical to the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Draft => "draft",
            ProductStatus::Archived => "archived",
        }
    }

    /// Human-readable label for dropdowns and badges.
    pub fn label(&self) -> &'static str {
        match self {
            ProductStatus::Active => "Active",
            ProductStatus::Draft => "Draft",
            ProductStatus::Archived => "Archived",
        }
    }

    /// All statuses, in display order.
    pub fn all() -> [ProductStatus; 3] {
        [
            ProductStatus::Active,
            ProductStatus::Draft,
            ProductStatus::Archived,
        ]
    }

    /// Parse the wire form back into a status.
    pub fn parse(s: &str) -> Option<ProductStatus> {
        match s {
            "active" => Some(ProductStatus::Active),
            "draft" => Some(ProductStatus::Draft),
            "archived" => Some(ProductStatus::Archived),
            _ => None,
        }
    }
}

/// A catalog product as stored by the backend.
///
/// Field names follow the backend's JSON: timestamps are camelCase and the
/// image URL is stored under `image` (older records used `image_origin_url`,
/// accepted as an alias).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
    pub status: ProductStatus,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "image", alias = "image_origin_url", default)]
    pub image_url: Option<String>,
    /// Asset id of the uploaded image, used for thumbnail proxying.
    #[serde(default)]
    pub image_id: i64,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: String,
}

impl Product {
    /// Case-insensitive match against name or description, used by the
    /// dashboard's text filter.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q) || self.description.to_lowercase().contains(&q)
    }
}

/// Editable product fields, as entered in the create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
    pub status: ProductStatus,
    pub category: String,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: 0.0,
            stock: 0,
            status: ProductStatus::Draft,
            category: String::new(),
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            description: p.description.clone(),
            price: p.price,
            stock: p.stock,
            status: p.status,
            category: p.category.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_form() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::from_str::<ProductStatus>("\"archived\"").unwrap(),
            ProductStatus::Archived
        );
        for status in ProductStatus::all() {
            assert_eq!(ProductStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ProductStatus::parse("deleted"), None);
    }

    #[test]
    fn test_product_from_backend_json() {
        let json = r#"{
            "id": "0b9c",
            "name": "Canvas Tote",
            "description": "Heavy cotton tote bag",
            "price": 19.5,
            "stock": 12,
            "status": "active",
            "category": "bags",
            "image": "http://localhost:8000/uploads/tote.jpg",
            "image_id": 42,
            "createdAt": "2024-11-03T10:15:00",
            "updatedAt": "2024-11-04T08:00:00"
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.name, "Canvas Tote");
        assert_eq!(p.status, ProductStatus::Active);
        assert_eq!(p.image_id, 42);
        assert_eq!(
            p.image_url.as_deref(),
            Some("http://localhost:8000/uploads/tote.jpg")
        );
        assert_eq!(p.created_at, "2024-11-03T10:15:00");
    }

    #[test]
    fn test_product_legacy_image_field() {
        let json = r#"{
            "id": "1",
            "name": "Mug",
            "description": "",
            "price": 4.0,
            "stock": 3,
            "status": "draft",
            "image_origin_url": "http://localhost:8000/uploads/mug.jpg"
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(
            p.image_url.as_deref(),
            Some("http://localhost:8000/uploads/mug.jpg")
        );
        // Absent optional fields fall back to defaults
        assert_eq!(p.image_id, 0);
        assert_eq!(p.category, "");
    }

    #[test]
    fn test_matches_query() {
        let p = Product {
            id: "1".into(),
            name: "Canvas Tote".into(),
            description: "Heavy cotton bag".into(),
            price: 19.5,
            stock: 12,
            status: ProductStatus::Active,
            category: "bags".into(),
            image_url: None,
            image_id: 0,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert!(p.matches_query(""));
        assert!(p.matches_query("canvas"));
        assert!(p.matches_query("COTTON"));
        assert!(!p.matches_query("mug"));
    }

    #[test]
    fn test_draft_from_product() {
        let p = Product {
            id: "1".into(),
            name: "Mug".into(),
            description: "Ceramic".into(),
            price: 4.0,
            stock: 3,
            status: ProductStatus::Draft,
            category: "kitchen".into(),
            image_url: None,
            image_id: 0,
            created_at: String::new(),
            updated_at: String::new(),
        };
        let d = ProductDraft::from(&p);
        assert_eq!(d.name, "Mug");
        assert_eq!(d.status, ProductStatus::Draft);
        assert_eq!(d.stock, 3);
    }
}
