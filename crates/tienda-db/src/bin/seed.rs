//! # Seed Data Generator
//!
//! Populates an empty database with demo categories and products.
//!
//! ## Usage
//! ```bash
//! # Seed ./tienda.db
//! cargo run -p tienda-db --bin seed
//!
//! # Specify database path
//! cargo run -p tienda-db --bin seed -- --db ./data/tienda.db
//! ```
//!
//! Nothing is written if the database already holds products.

use std::env;

use tienda_core::{CategoryDraft, ProductDraft};
use tienda_db::{Database, DbConfig};

/// (name, tax rate in bps)
const CATEGORIES: &[(&str, u32)] = &[
    ("Papelería", 1600),
    ("Alimentos", 0),
    ("Limpieza", 1600),
    ("Bebidas", 800),
];

/// (name, category index, base price in cents, stock, reorder threshold)
const PRODUCTS: &[(&str, usize, i64, i64, i64)] = &[
    ("Cuaderno profesional", 0, 10_000, 25, 20),
    ("Lápiz HB", 0, 350, 120, 30),
    ("Bolígrafo azul", 0, 700, 80, 25),
    ("Arroz 1kg", 1, 3_290, 40, 10),
    ("Frijol negro 1kg", 1, 3_850, 35, 10),
    ("Detergente 1L", 2, 4_590, 18, 12),
    ("Cloro 1L", 2, 2_150, 22, 8),
    ("Agua natural 1.5L", 3, 1_600, 60, 24),
    ("Jugo de naranja 1L", 3, 2_800, 15, 10),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut db_path = String::from("./tienda.db");

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tienda Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>     Database path (default: ./tienda.db)");
                println!("  -h, --help          Show this help");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Tienda Seed Data Generator");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("Database already has {} products, skipping seed.", existing);
        return Ok(());
    }

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, tax_rate_bps) in CATEGORIES {
        let category = db
            .categories()
            .save(&CategoryDraft {
                id: None,
                name: name.to_string(),
                tax_rate_bps: *tax_rate_bps,
            })
            .await?;
        println!("  Category {} ({}%)", category.name, category.tax_rate().percentage());
        category_ids.push(category.id);
    }

    for (name, category_idx, base_price_cents, stock, min_reorder_stock) in PRODUCTS {
        let product = db
            .products()
            .save(&ProductDraft {
                id: None,
                name: name.to_string(),
                base_price_cents: *base_price_cents,
                stock: *stock,
                min_reorder_stock: *min_reorder_stock,
                category_id: category_ids.get(*category_idx).copied(),
            })
            .await?;
        println!("  Product {} (stock {})", product.name, product.stock);
    }

    println!();
    println!(
        "✓ Seeded {} categories and {} products",
        CATEGORIES.len(),
        PRODUCTS.len()
    );

    db.close().await;
    Ok(())
}
