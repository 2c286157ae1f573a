//! Editable product list backing the admin management screen.

use shared::{
    domain::{Product, ProductId},
    fixtures::{sample_products, PLACEHOLDER_IMAGE_URL},
};
use tokio::sync::watch;
use tracing::info;

use crate::{error::ValidationError, views::filter_products};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagementState {
    pub products: Vec<Product>,
    pub search_term: String,
}

impl ManagementState {
    pub fn filtered_products(&self) -> Vec<Product> {
        filter_products(&self.products, &self.search_term)
    }

    fn next_id(&self) -> Option<ProductId> {
        let max = self.products.iter().map(|p| p.id.0).max().unwrap_or(0);
        max.checked_add(1).map(ProductId)
    }
}

#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
}

impl ProductDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(ValidationError::InvalidPrice);
        }
        Ok(())
    }
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidPrice)
    }
}

pub struct ProductManager {
    state: watch::Sender<ManagementState>,
}

impl ProductManager {
    pub fn new(products: Vec<Product>) -> Self {
        let (state, _) = watch::channel(ManagementState {
            products,
            search_term: String::new(),
        });
        Self { state }
    }

    pub fn with_fixtures() -> Self {
        Self::new(sample_products())
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        self.state.send_modify(|state| state.search_term = term);
    }

    pub fn filtered_products(&self) -> Vec<Product> {
        self.state.borrow().filtered_products()
    }

    pub fn products(&self) -> Vec<Product> {
        self.state.borrow().products.clone()
    }

    pub fn snapshot(&self) -> ManagementState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ManagementState> {
        self.state.subscribe()
    }

    /// Appends a product with the next free id (highest id + 1). Fails with
    /// `IdsExhausted` once the highest id is `i64::MAX`.
    pub fn add_product(&self, draft: ProductDraft) -> Result<Product, ValidationError> {
        draft.validate()?;

        let mut product = Product {
            id: ProductId(0),
            name: draft.name.trim().to_string(),
            description: draft.description,
            price: draft.price,
            category: draft.category,
            image: PLACEHOLDER_IMAGE_URL.to_string(),
        };
        let mut assigned = Err(ValidationError::IdsExhausted);
        self.state.send_if_modified(|state| {
            let Some(id) = state.next_id() else {
                return false;
            };
            product.id = id;
            state.products.push(product.clone());
            assigned = Ok(());
            true
        });
        assigned?;

        info!(product_id = %product.id, "product added");
        Ok(product)
    }

    pub fn remove_product(&self, id: ProductId) -> bool {
        let removed = self.state.send_if_modified(|state| {
            let before = state.products.len();
            state.products.retain(|p| p.id != id);
            state.products.len() != before
        });
        if removed {
            info!(product_id = %id, "product removed");
        }
        removed
    }

    /// Replaces the product with the same id wholesale, keeping its position.
    /// Returns `Ok(false)` when no product has that id.
    pub fn update_product(&self, updated: Product) -> Result<bool, ValidationError> {
        validate_price(updated.price)?;
        let id = updated.id;
        let replaced = self.state.send_if_modified(|state| {
            match state.products.iter_mut().find(|p| p.id == id) {
                Some(slot) => {
                    *slot = updated;
                    true
                }
                None => false,
            }
        });
        if replaced {
            info!(product_id = %id, "product updated");
        }
        Ok(replaced)
    }
}

#[cfg(test)]
#[path = "tests/admin_tests.rs"]
mod tests;
