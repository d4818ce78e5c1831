//! Price resolution and total computation.

use async_trait::async_trait;
use doc_store::DocumentStore;

use common::{Money, ProductId};

use super::{OrderError, OrderItem};
use crate::error::DomainError;
use crate::product::Product;

/// Resolves the current unit price of a product.
///
/// External interface of the catalog from the order subsystem's point of
/// view; `None` means the product does not exist.
#[async_trait]
pub trait PriceLookup: Send + Sync {
    async fn unit_price(&self, product_id: ProductId) -> Result<Option<Money>, DomainError>;
}

/// Price lookup backed by the live product catalog.
#[derive(Clone)]
pub struct CatalogPriceLookup<S> {
    store: S,
}

impl<S> CatalogPriceLookup<S> {
    /// Creates a lookup reading from the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: DocumentStore + Clone + 'static> PriceLookup for CatalogPriceLookup<S> {
    async fn unit_price(&self, product_id: ProductId) -> Result<Option<Money>, DomainError> {
        let product: Option<Product> = self.store.get(product_id.as_uuid()).await?;
        Ok(product.map(|p| p.price))
    }
}

/// Computes the order total: Σ quantity × current unit price.
///
/// Exact integer-cent arithmetic, overflow-checked. Any unresolvable product
/// id fails the whole computation, so no partially priced order can ever be
/// created.
pub async fn compute_total<P: PriceLookup + ?Sized>(
    items: &[OrderItem],
    prices: &P,
) -> Result<Money, DomainError> {
    let mut total = Money::zero();
    for item in items {
        let unit_price = prices.unit_price(item.product_id).await?.ok_or(
            OrderError::ProductNotFound {
                product_id: item.product_id,
            },
        )?;
        total = unit_price
            .checked_mul(item.quantity)
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| {
                DomainError::Validation("order total exceeds the representable range".to_string())
            })?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FixedPrices(HashMap<ProductId, Money>);

    #[async_trait]
    impl PriceLookup for FixedPrices {
        async fn unit_price(&self, product_id: ProductId) -> Result<Option<Money>, DomainError> {
            Ok(self.0.get(&product_id).copied())
        }
    }

    #[tokio::test]
    async fn total_is_sum_of_price_times_quantity() {
        let p1 = ProductId::new();
        let p2 = ProductId::new();
        let prices = FixedPrices(HashMap::from([
            (p1, Money::from_cents(1000)),
            (p2, Money::from_cents(250)),
        ]));

        let items = [OrderItem::new(p1, 2), OrderItem::new(p2, 3)];
        let total = compute_total(&items, &prices).await.unwrap();
        assert_eq!(total.cents(), 2750);
    }

    #[tokio::test]
    async fn missing_product_aborts_whole_computation() {
        let p1 = ProductId::new();
        let ghost = ProductId::new();
        let prices = FixedPrices(HashMap::from([(p1, Money::from_cents(1000))]));

        let items = [OrderItem::new(p1, 1), OrderItem::new(ghost, 1)];
        let err = compute_total(&items, &prices).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Order(OrderError::ProductNotFound { product_id }) if product_id == ghost
        ));
    }

    #[tokio::test]
    async fn overflowing_total_is_rejected_not_wrapped() {
        let p1 = ProductId::new();
        let prices = FixedPrices(HashMap::from([(p1, Money::from_cents(i64::MAX / 2))]));

        let items = [OrderItem::new(p1, u32::MAX)];
        let err = compute_total(&items, &prices).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // A sum that overflows across lines is caught too.
        let items = [OrderItem::new(p1, 1), OrderItem::new(p1, 1), OrderItem::new(p1, 1)];
        let err = compute_total(&items, &prices).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn exact_arithmetic_over_random_item_sets() {
        // Deterministic xorshift so the 1,000 combinations are reproducible.
        let mut seed: u64 = 0x9E3779B97F4A7C15;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };

        for _ in 0..1_000 {
            let item_count = (next() % 8 + 1) as usize;
            let mut price_map = HashMap::new();
            let mut items = Vec::new();
            let mut expected: i64 = 0;

            for _ in 0..item_count {
                let id = ProductId::new();
                // Prices like 19.99 that are inexact in binary floating point.
                let cents = (next() % 100_000) as i64 + 1;
                let quantity = (next() % 50 + 1) as u32;
                price_map.insert(id, Money::from_cents(cents));
                items.push(OrderItem::new(id, quantity));
                expected += cents * quantity as i64;
            }

            let prices = FixedPrices(price_map);
            let total = compute_total(&items, &prices).await.unwrap();
            assert_eq!(total.cents(), expected);
        }
    }
}
