//! Multi-field catalog search
//!
//! A pure, stable filter over a catalog snapshot: results keep catalog order
//! and searching a result again with the same term returns it unchanged.

use crate::types::Product;

/// Filter products whose name, id, brand, category or code contains `term`
///
/// Matching ignores case. An empty or whitespace-only term returns every
/// product in its original order.
pub fn search<'a, I>(products: I, term: &str) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return products.into_iter().collect();
    }

    products
        .into_iter()
        .filter(|product| matches(product, &needle))
        .collect()
}

fn matches(product: &Product, needle: &str) -> bool {
    [
        product.name.as_str(),
        product.id.as_str(),
        product.brand.as_str(),
        product.category.as_str(),
        product.code.as_str(),
    ]
    .iter()
    .any(|field| !field.is_empty() && field.to_lowercase().contains(needle))
}
