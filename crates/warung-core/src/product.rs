//! # Menu Products
//!
//! Product rows and the in-memory menu catalog. The catalog stands in
//! for the hosted product table of the storefront backend: the API layer
//! owns one behind a lock, while the cart and checkout core only ever
//! see individual `Product` values handed to them by the caller.
//!
//! The seed menu is loaded from `config/menu.toml`.

use crate::error::{OrderError, OrderResult};
use crate::money::Rupiah;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product on the menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Opaque identifier (UUID for catalog-created rows)
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price in whole rupiah
    pub price: Rupiah,

    /// Optional image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Optional short description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether this product can currently be ordered
    #[serde(default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Create a product with an explicit id
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Rupiah) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image_url: None,
            description: None,
            available: true,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// Fields for creating a catalog row; the id is generated on insert
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Rupiah,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update for a catalog row; `None` fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Rupiah>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// The menu catalog (seeded from config, mutated by the admin panel)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuCatalog {
    pub products: Vec<Product>,
}

impl MenuCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add an existing row (used by the seed loader)
    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Create a row with a generated id and return it
    pub fn insert(&mut self, fields: NewProduct) -> OrderResult<Product> {
        validate_price(fields.price)?;

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: fields.name,
            price: fields.price,
            image_url: fields.image_url,
            description: fields.description,
            available: true,
        };
        self.products.push(product.clone());
        Ok(product)
    }

    /// Find a product by id
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Apply a partial update to an existing row
    pub fn update(&mut self, id: &str, patch: ProductPatch) -> OrderResult<Product> {
        if let Some(price) = patch.price {
            validate_price(price)?;
        }

        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| OrderError::ProductNotFound {
                product_id: id.to_string(),
            })?;

        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(image_url) = patch.image_url {
            product.image_url = Some(image_url);
        }
        if let Some(description) = patch.description {
            product.description = Some(description);
        }
        if let Some(available) = patch.available {
            product.available = available;
        }

        Ok(product.clone())
    }

    /// Delete a row, returning it
    pub fn remove(&mut self, id: &str) -> OrderResult<Product> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| OrderError::ProductNotFound {
                product_id: id.to_string(),
            })?;
        Ok(self.products.remove(index))
    }

    /// Get all orderable products
    pub fn available_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.available)
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Number of rows, available or not
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no rows
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn validate_price(price: Rupiah) -> OrderResult<()> {
    if price.is_negative() {
        return Err(OrderError::InvalidPrice {
            message: format!("price must be >= 0, got {}", price.amount()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> NewProduct {
        NewProduct {
            name: "Nasi Goreng Spesial".to_string(),
            price: Rupiah::new(25_000),
            image_url: None,
            description: Some("Dengan telur mata sapi".to_string()),
        }
    }

    #[test]
    fn test_insert_generates_unique_ids() {
        let mut catalog = MenuCatalog::new();
        let first = catalog.insert(sample_fields()).unwrap();
        let second = catalog.insert(sample_fields()).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(&first.id).is_some());
    }

    #[test]
    fn test_insert_rejects_negative_price() {
        let mut catalog = MenuCatalog::new();
        let result = catalog.insert(NewProduct {
            name: "Broken".to_string(),
            price: Rupiah::new(-1),
            image_url: None,
            description: None,
        });

        assert!(matches!(result, Err(OrderError::InvalidPrice { .. })));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_update_patches_only_provided_fields() {
        let mut catalog = MenuCatalog::new();
        let product = catalog.insert(sample_fields()).unwrap();

        let updated = catalog
            .update(
                &product.id,
                ProductPatch {
                    price: Some(Rupiah::new(27_000)),
                    ..ProductPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.price, Rupiah::new(27_000));
        assert_eq!(updated.name, "Nasi Goreng Spesial");
        assert_eq!(updated.description.as_deref(), Some("Dengan telur mata sapi"));
    }

    #[test]
    fn test_update_unknown_id() {
        let mut catalog = MenuCatalog::new();
        let result = catalog.update("missing", ProductPatch::default());
        assert!(matches!(result, Err(OrderError::ProductNotFound { .. })));
    }

    #[test]
    fn test_remove() {
        let mut catalog = MenuCatalog::new();
        let product = catalog.insert(sample_fields()).unwrap();

        let removed = catalog.remove(&product.id).unwrap();
        assert_eq!(removed.id, product.id);
        assert!(catalog.is_empty());
        assert!(matches!(
            catalog.remove(&product.id),
            Err(OrderError::ProductNotFound { .. })
        ));
    }

    #[test]
    fn test_available_products_filters() {
        let mut catalog = MenuCatalog::new();
        let product = catalog.insert(sample_fields()).unwrap();
        catalog.insert(sample_fields()).unwrap();

        catalog
            .update(
                &product.id,
                ProductPatch {
                    available: Some(false),
                    ..ProductPatch::default()
                },
            )
            .unwrap();

        assert_eq!(catalog.available_products().count(), 1);
    }

    #[test]
    fn test_from_toml() {
        let catalog = MenuCatalog::from_toml(
            r#"
            [[products]]
            id = "p1"
            name = "Es Teh Manis"
            price = 5000
            "#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 1);
        let product = catalog.get("p1").unwrap();
        assert_eq!(product.price, Rupiah::new(5_000));
        assert!(product.available);
    }
}
