//! Pure projections over a product list. Nothing here is stored; callers
//! recompute on every read.

use shared::domain::{Product, ProductId};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub category: String,
    pub products: Vec<Product>,
}

/// Partitions `products` by category, keeping first-seen category order and
/// the original relative order inside each group.
pub fn group_by_category(products: &[Product]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for product in products {
        match groups.iter_mut().find(|g| g.category == product.category) {
            Some(group) => group.products.push(product.clone()),
            None => groups.push(CategoryGroup {
                category: product.category.clone(),
                products: vec![product.clone()],
            }),
        }
    }
    groups
}

/// Case-insensitive substring match on name or description. A blank term
/// keeps everything.
pub fn filter_products(products: &[Product], term: &str) -> Vec<Product> {
    if term.trim().is_empty() {
        return products.to_vec();
    }
    let needle = term.to_lowercase();
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

pub fn find_by_id(products: &[Product], id: ProductId) -> Option<&Product> {
    products.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, description: &str, category: &str) -> Product {
        Product::new(id, name, description, 1_000.0, category, "")
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id.0).collect()
    }

    #[test]
    fn groups_keep_first_seen_category_order() {
        let products = vec![
            product(1, "one", "", "A"),
            product(2, "two", "", "B"),
            product(3, "three", "", "A"),
        ];
        let groups = group_by_category(&products);

        let categories: Vec<_> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(categories, ["A", "B"]);
        assert_eq!(ids(&groups[0].products), [1, 3]);
        assert_eq!(ids(&groups[1].products), [2]);
    }

    #[test]
    fn grouping_an_empty_list_yields_no_groups() {
        assert!(group_by_category(&[]).is_empty());
    }

    #[test]
    fn filter_is_case_insensitive_on_name() {
        let products = vec![
            product(1, "Casa Roja", "", "A"),
            product(2, "Depto Azul", "", "A"),
        ];
        let filtered = filter_products(&products, "casa");
        assert_eq!(ids(&filtered), [1]);
    }

    #[test]
    fn filter_matches_description() {
        let products = vec![
            product(1, "Loft", "close to the BEACH", "A"),
            product(2, "Cabin", "deep in the forest", "A"),
        ];
        assert_eq!(ids(&filter_products(&products, "beach")), [1]);
    }

    #[test]
    fn blank_term_returns_everything_in_order() {
        let products = vec![
            product(1, "Casa Roja", "", "A"),
            product(2, "Depto Azul", "", "A"),
        ];
        assert_eq!(filter_products(&products, ""), products);
        assert_eq!(filter_products(&products, "   "), products);
    }

    #[test]
    fn find_by_id_reports_missing() {
        let products = vec![product(4, "Mountain", "", "B")];
        assert_eq!(
            find_by_id(&products, ProductId(4)).map(|p| p.name.as_str()),
            Some("Mountain")
        );
        assert!(find_by_id(&products, ProductId(5)).is_none());
    }
}
