//! # Seed Data Generator
//!
//! Populates the store with a demo catalog and sample orders.
//!
//! ## Usage
//! ```bash
//! # Seed the database from comanda.toml (or the platform default)
//! cargo run -p comanda-db --bin seed
//!
//! # Custom database path and order count
//! cargo run -p comanda-db --bin seed -- --db ./data/comanda.db --orders 20
//!
//! # Replace whatever is stored
//! cargo run -p comanda-db --bin seed -- --force
//! ```
//!
//! ## Generated Data
//! - One product per menu entry below, codes `{CATEGORY}-{INDEX}`
//! - Orders cycling through customers, payment methods, fulfillment modes
//!   and statuses

use chrono::NaiveTime;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

use comanda_core::{
    DeliveryAddress, FulfillmentMode, Money, OrderDraft, OrderStatus, PaymentMethod, Product,
};
use comanda_db::{init_tracing, ComandaConfig, Database, DbConfig};

/// Demo menu: (category, code prefix, [(name, price in cents)])
const MENU: &[(&str, &str, &[(&str, i64)])] = &[
    (
        "Lanches",
        "LAN",
        &[
            ("X-Burger", 1890),
            ("X-Salada", 2090),
            ("X-Bacon", 2390),
            ("X-Tudo", 2890),
            ("Misto Quente", 1200),
        ],
    ),
    (
        "Bebidas",
        "BEB",
        &[
            ("Refrigerante Lata", 600),
            ("Suco de Laranja", 900),
            ("Água com Gás", 450),
            ("Café Expresso", 500),
        ],
    ),
    (
        "Porções",
        "POR",
        &[
            ("Batata Frita", 2200),
            ("Calabresa Acebolada", 3400),
            ("Frango a Passarinho", 3600),
        ],
    ),
    (
        "Sobremesas",
        "SOB",
        &[("Pudim", 950), ("Brownie", 1100), ("Açaí 300ml", 1600)],
    ),
];

const CUSTOMERS: &[&str] = &["Ana", "Bruno", "Carla", "Diego", "Elisa", "Fábio", "Gabi"];

const PAYMENTS: &[PaymentMethod] = &[PaymentMethod::Pix, PaymentMethod::Card, PaymentMethod::Cash];

const FULFILLMENT: &[FulfillmentMode] = &[
    FulfillmentMode::DineIn,
    FulfillmentMode::Pickup,
    FulfillmentMode::Delivery,
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut order_count: usize = 12;
    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--orders" | "-o" => {
                if i + 1 < args.len() {
                    order_count = args[i + 1].parse().unwrap_or(12);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Comanda Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -o, --orders <N>     Number of orders to generate (default: 12)");
                println!("  -d, --db <PATH>      Database file path (default: from comanda.toml)");
                println!("  -c, --config <PATH>  Config file path");
                println!("  -f, --force          Clear the store before seeding");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let config = ComandaConfig::load_or_default(config_path);
    let db_config = match db_path {
        Some(path) => DbConfig::new(path).max_connections(config.storage.max_connections),
        None => DbConfig::from(&config.storage),
    };

    info!(path = %db_config.database_path.display(), "Seeding store");
    let db = Database::new(db_config).await?;

    let products = db.products();
    let orders = db.orders();

    if force {
        products.try_clear_all().await?;
    } else if !products.try_load().await?.is_empty() {
        warn!("Store already has products; pass --force to replace them");
        return Ok(());
    }

    // Catalog
    let mut catalog = Vec::new();
    for (category, prefix, items) in MENU {
        for (index, (name, cents)) in items.iter().enumerate() {
            let product = products
                .upsert(Product {
                    name: name.to_string(),
                    code: format!("{}-{:02}", prefix, index + 1),
                    price: Money::from_cents(*cents),
                    category: Some(category.to_string()),
                    ..Product::default()
                })
                .await?;
            catalog.push(product);
        }
    }
    // One product with no category so "Sem Categoria" shows up
    catalog.push(
        products
            .upsert(Product {
                name: "Item Avulso".to_string(),
                code: "AVULSO".to_string(),
                price: Money::from_cents(500),
                note: Some("Preço livre".to_string()),
                ..Product::default()
            })
            .await?,
    );

    info!(
        count = catalog.len(),
        categories = ?products.load_categories().await,
        "Catalog seeded"
    );

    // Orders
    let mut revenue = Money::zero();
    for n in 0..order_count {
        let mut draft = OrderDraft::new(CUSTOMERS[n % CUSTOMERS.len()]);

        let lines = 1 + n % 3;
        for line in 0..lines {
            let product = catalog[(n * 5 + line * 3) % catalog.len()].clone();
            let quantity = 1 + ((n + line) % 3) as u32;
            let note = (line == 0 && n % 4 == 0).then(|| "sem cebola".to_string());
            draft.add_item(product, quantity, note)?;
        }

        draft.payment_method = PAYMENTS[n % PAYMENTS.len()];
        if draft.payment_method == PaymentMethod::Cash {
            // Round the tender up to the next 10.00
            let total = draft.total().cents();
            draft.change_for = Some(Money::from_cents((total / 1000 + 1) * 1000));
        }

        draft.fulfillment = FULFILLMENT[n % FULFILLMENT.len()];
        if draft.fulfillment == FulfillmentMode::Delivery {
            draft.delivery_address = Some(DeliveryAddress {
                cep: "01310-100".to_string(),
                street: "Avenida Paulista".to_string(),
                district: "Bela Vista".to_string(),
                number: format!("{}", 100 + n * 7),
                complement: String::new(),
                reference: "Próximo ao metrô".to_string(),
            });
        }

        let minutes = (11 * 60 + n * 9) as u32;
        let placed = NaiveTime::from_hms_opt(minutes / 60 % 24, minutes % 60, 0)
            .ok_or("order time out of range")?;

        let order = orders.confirm(draft.build(placed)?).await?;
        revenue += order.total();

        let status = OrderStatus::ALL[n % OrderStatus::ALL.len()];
        if status != OrderStatus::InProgress {
            orders.set_status(&order.id, status).await?;
        }
    }

    info!(
        count = order_count,
        revenue = %config.display.format_currency(revenue),
        "Orders seeded"
    );

    db.close().await;
    info!("Seed complete");
    Ok(())
}
