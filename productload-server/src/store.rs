//! In-memory storage of products.

use std::collections::HashMap;
use std::sync::RwLock;

use productload_engine::Resource;

/// A concurrent map from product identifier to product.
#[derive(Debug, Default)]
pub struct ProductStore {
    products: RwLock<HashMap<String, Resource>>,
}

impl ProductStore {
    /// Creates a store pre-populated with `count` generated products.
    pub fn with_initial(count: usize) -> Self {
        let products = (0..count)
            .map(|_| {
                let product = Resource::generate();
                (product.id.clone(), product)
            })
            .collect();

        Self {
            products: RwLock::new(products),
        }
    }

    /// Returns all products in unspecified order.
    pub fn list(&self) -> Vec<Resource> {
        self.products.read().unwrap().values().cloned().collect()
    }

    /// Returns the product with the given identifier.
    pub fn get(&self, id: &str) -> Option<Resource> {
        self.products.read().unwrap().get(id).cloned()
    }

    /// Stores a product, replacing any previous product with the same identifier.
    pub fn insert(&self, product: Resource) {
        self.products
            .write()
            .unwrap()
            .insert(product.id.clone(), product);
    }

    /// Returns the number of stored products.
    pub fn len(&self) -> usize {
        self.products.read().unwrap().len()
    }

    /// Returns `true` if no products are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all products.
    pub fn clear(&self) {
        self.products.write().unwrap().clear();
    }
}
