//! Benchmark suite for catalog lookup and movement processing
//!
//! Uses the divan benchmarking framework over in-memory storage so only the
//! engine's own work is measured.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use chrono::Local;
use inventory_ledger::core::{ids, SystemClock};
use inventory_ledger::storage::PRODUCTS_KEY;
use inventory_ledger::{InventoryEngine, MemoryStorage, MovementRequest, MovementType, Product};

fn main() {
    divan::main();
}

const CATALOG_SIZES: &[usize] = &[100, 1_000, 10_000];

/// Engine loaded from a pre-built catalog of `products` items
fn engine_with(products: usize) -> InventoryEngine<MemoryStorage> {
    let today = Local::now().date_naive();
    let catalog: Vec<Product> = (0..products)
        .map(|i| {
            let id = ids::product_id(i as i64);
            let name = format!("Product {}", i);
            Product {
                qr_code: ids::qr_code(&id, &name),
                id,
                name,
                brand: "Bench".to_string(),
                category: "Bench".to_string(),
                code: format!("B-{}", i),
                stock: 1_000_000,
                min_stock: 1,
                created_at: today,
            }
        })
        .collect();
    let json = serde_json::to_string(&catalog).expect("Failed to encode catalog");

    InventoryEngine::load(MemoryStorage::new().with_raw(PRODUCTS_KEY, json), SystemClock)
        .expect("Failed to load catalog")
}

/// Multi-field search across the whole catalog
#[divan::bench(args = CATALOG_SIZES)]
fn search_catalog(bencher: divan::Bencher, size: usize) {
    let engine = engine_with(size);

    bencher.bench_local(|| engine.search(divan::black_box("product 9")).len());
}

/// Resolve a scan code to a product
#[divan::bench(args = CATALOG_SIZES)]
fn resolve_scan_code(bencher: divan::Bencher, size: usize) {
    let engine = engine_with(size);
    let code = engine.catalog().products()[size - 1].qr_code.clone();

    bencher.bench_local(|| engine.resolve_code(divan::black_box(&code)).is_ok());
}

/// Validate, commit and save a saida
#[divan::bench(args = [100, 1_000])]
fn apply_saida(bencher: divan::Bencher, size: usize) {
    let mut engine = engine_with(size);
    let request = MovementRequest::new(
        &engine.catalog().products()[size / 2].id,
        MovementType::Saida,
        "1",
    );

    bencher.bench_local(|| engine.apply_movement(&request).is_ok());
}
