use shared::domain::{Product, ProductId};
use tokio::sync::watch;
use tracing::debug;

/// Insertion-ordered, id-keyed set of products the user marked as interesting.
///
/// Both mutations are total: adding a present id or removing an absent one
/// leaves the sequence untouched and does not wake subscribers.
pub struct FavoritesSet {
    state: watch::Sender<Vec<Product>>,
}

impl Default for FavoritesSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FavoritesSet {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Vec::new());
        Self { state }
    }

    /// Returns `true` when the product was appended.
    pub fn add(&self, product: &Product) -> bool {
        let inserted = self.state.send_if_modified(|favorites| {
            if favorites.iter().any(|p| p.id == product.id) {
                return false;
            }
            favorites.push(product.clone());
            true
        });
        debug!(product_id = %product.id, inserted, "favorites add");
        inserted
    }

    /// Returns `true` when an entry with the product's id was removed.
    pub fn remove(&self, product: &Product) -> bool {
        self.remove_id(product.id)
    }

    pub fn remove_id(&self, id: ProductId) -> bool {
        let removed = self.state.send_if_modified(|favorites| {
            match favorites.iter().position(|p| p.id == id) {
                Some(index) => {
                    favorites.remove(index);
                    true
                }
                None => false,
            }
        });
        debug!(product_id = %id, removed, "favorites remove");
        removed
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.state.borrow().iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    pub fn snapshot(&self) -> Vec<Product> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.state.subscribe()
    }
}
