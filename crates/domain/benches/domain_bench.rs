use common::{Money, ProductId, UserId};
use criterion::{Criterion, criterion_group, criterion_main};
use doc_store::InMemoryStore;
use domain::{
    CatalogPriceLookup, NewOrder, NewProduct, OrderItem, OrderService, OrderStatus,
    PaymentMethod, Principal, ProductService, Role, ShippingAddress, StatusUpdate,
};

fn address() -> ShippingAddress {
    ShippingAddress {
        street: "1 Market St".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: "62701".to_string(),
        country: "US".to_string(),
    }
}

async fn seed_products(
    products: &ProductService<InMemoryStore>,
    seller: &Principal,
    count: usize,
) -> Vec<ProductId> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let product = products
            .create_product(
                Some(seller),
                NewProduct {
                    name: format!("Bench Widget {i}"),
                    description: "benchmark product".to_string(),
                    price: Money::from_cents(999 + i as i64),
                    stock: 1000,
                    category: None,
                    brand: None,
                    images: vec![],
                    tags: vec![],
                },
            )
            .await
            .unwrap();
        ids.push(product.id);
    }
    ids
}

fn bench_create_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let store = InMemoryStore::new();
    let products = ProductService::new(store.clone());
    let orders = OrderService::new(store.clone(), CatalogPriceLookup::new(store));
    let seller = Principal::new(UserId::new(), Role::Seller);
    let customer = Principal::new(UserId::new(), Role::Customer);
    let ids = rt.block_on(seed_products(&products, &seller, 10));

    c.bench_function("domain/create_order_10_items", |b| {
        b.iter(|| {
            rt.block_on(async {
                let items: Vec<OrderItem> =
                    ids.iter().map(|id| OrderItem::new(*id, 2)).collect();
                orders
                    .create_order(
                        Some(&customer),
                        NewOrder {
                            items,
                            shipping_address: address(),
                            payment_method: PaymentMethod::CashOnDelivery,
                        },
                    )
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_status_transition(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let store = InMemoryStore::new();
    let products = ProductService::new(store.clone());
    let orders = OrderService::new(store.clone(), CatalogPriceLookup::new(store));
    let seller = Principal::new(UserId::new(), Role::Seller);
    let customer = Principal::new(UserId::new(), Role::Customer);
    let admin = Principal::new(UserId::new(), Role::Admin);
    let ids = rt.block_on(seed_products(&products, &seller, 1));

    c.bench_function("domain/ship_order", |b| {
        b.iter(|| {
            rt.block_on(async {
                let order = orders
                    .create_order(
                        Some(&customer),
                        NewOrder {
                            items: vec![OrderItem::new(ids[0], 1)],
                            shipping_address: address(),
                            payment_method: PaymentMethod::CashOnDelivery,
                        },
                    )
                    .await
                    .unwrap();
                orders
                    .update_status(
                        Some(&admin),
                        order.id,
                        StatusUpdate {
                            status: OrderStatus::Shipped,
                            tracking_number: None,
                            estimated_delivery: None,
                        },
                    )
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(benches, bench_create_order, bench_status_transition);
criterion_main!(benches);
