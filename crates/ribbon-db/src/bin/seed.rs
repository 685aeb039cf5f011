//! # Seed Data Generator
//!
//! Populates a development database with a ribbon catalog and one admin.
//!
//! ## Usage
//! ```bash
//! cargo run -p ribbon-db --bin seed
//!
//! # Specify database path and admin credentials
//! cargo run -p ribbon-db --bin seed -- --db ./data/ribbon.db \
//!     --admin-email owner@ribbon.shop --admin-password 'long passphrase'
//! ```
//!
//! ## Generated Catalog
//! Every style below in every listed width and colour:
//! - SKU: `{STYLE}-{WIDTH}-{COLOR}`, e.g. `VEL-25-RED`
//! - Price: style base price plus a width add-on
//! - Stock: 0 - 60 (some SKUs start sold out)

use anyhow::Context;
use ribbon_core::requests::ProductInput;
use ribbon_db::{Database, DbConfig, DbError, NewUser};
use std::env;
use tracing::{info, warn};

/// (code, name, category, base price cents, wired, brand)
const STYLES: &[(&str, &str, &str, i64, bool, &str)] = &[
    ("BUR", "Natural Burlap Ribbon", "burlap", 499, true, "Farrisilk"),
    ("VEL", "Velvet Ribbon", "velvet", 899, true, "Farrisilk"),
    ("PLD", "Buffalo Plaid Ribbon", "plaid", 799, true, "d.stevens"),
    ("GLT", "Glitter Mesh Ribbon", "mesh", 699, true, "RAZ Imports"),
    ("SAT", "Satin Ribbon", "satin", 399, false, "Offray"),
    ("LIN", "Linen Ribbon", "linen", 599, false, "Offray"),
];

/// (code, display width, price add-on cents)
const WIDTHS: &[(&str, &str, i64)] = &[
    ("15", "1.5\"", 0),
    ("25", "2.5\"", 150),
    ("40", "4\"", 300),
];

const COLORS: &[&str] = &["red", "gold", "green", "navy", "ivory"];

const DEFAULT_DB: &str = "./ribbon_dev.db";
const DEFAULT_ADMIN_EMAIL: &str = "admin@ribbon.shop";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info,ribbon_db=info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from(DEFAULT_DB);
    let mut admin_email = String::from(DEFAULT_ADMIN_EMAIL);
    let mut admin_password = env::var("RIBBON_ADMIN_PASSWORD").ok();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" if i + 1 < args.len() => {
                db_path = args[i + 1].clone();
                i += 1;
            }
            "--admin-email" if i + 1 < args.len() => {
                admin_email = args[i + 1].clone();
                i += 1;
            }
            "--admin-password" if i + 1 < args.len() => {
                admin_password = Some(args[i + 1].clone());
                i += 1;
            }
            "--help" | "-h" => {
                println!("Ribbon Storefront Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>            Database file (default: {DEFAULT_DB})");
                println!("      --admin-email <EMAIL>  Admin login (default: {DEFAULT_ADMIN_EMAIL})");
                println!("      --admin-password <PW>  Admin password (or RIBBON_ADMIN_PASSWORD)");
                println!("  -h, --help                 Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(db = %db_path, "Seeding database");

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {db_path}"))?;

    let existing = db.products().list(None).await?.len();
    if existing > 0 {
        warn!(existing, "Catalog already populated, skipping products");
    } else {
        let start = std::time::Instant::now();
        let mut generated = 0usize;

        for (seed, input) in catalog().iter().enumerate() {
            match db.products().insert(input).await {
                Ok(_) => generated += 1,
                Err(e) => warn!(sku = %input.sku, error = %e, seed, "Failed to insert product"),
            }
        }

        info!(generated, elapsed = ?start.elapsed(), "Catalog generated");
    }

    match admin_password {
        Some(password) => {
            ribbon_core::validation::validate_password(&password)
                .context("admin password rejected")?;

            let admin = NewUser {
                email: admin_email.clone(),
                password,
                first_name: "Store".to_string(),
                last_name: "Admin".to_string(),
                is_admin: true,
            };

            match db.users().insert(&admin).await {
                Ok(user) => info!(email = %user.email, "Admin account created"),
                Err(DbError::UniqueViolation { .. }) => {
                    warn!(email = %admin_email, "Admin account already exists")
                }
                Err(e) => return Err(e.into()),
            }
        }
        None => warn!("No admin password given (--admin-password / RIBBON_ADMIN_PASSWORD), skipping admin"),
    }

    db.close().await;
    info!("Seed complete");
    Ok(())
}

/// Builds the full development catalog.
fn catalog() -> Vec<ProductInput> {
    let mut products = Vec::with_capacity(STYLES.len() * WIDTHS.len() * COLORS.len());
    let mut seed = 0i64;

    for (code, name, category, base_price, is_wired, brand) in STYLES {
        for (width_code, width, add_on) in WIDTHS {
            for color in COLORS {
                seed += 1;

                products.push(ProductInput {
                    sku: format!("{code}-{width_code}-{}", color.to_uppercase()),
                    name: format!("{name} {width} {}", title_case(color)),
                    description: Some(format!(
                        "{width} x 10 yd {}{} roll.",
                        if *is_wired { "wired-edge " } else { "" },
                        category
                    )),
                    price_cents: base_price + add_on,
                    image_url: Some(format!("/images/{}/{}-{}.jpg", category, code.to_lowercase(), color)),
                    category: category.to_string(),
                    width: Some(width.to_string()),
                    length: Some("10 yd".to_string()),
                    is_wired: *is_wired,
                    // Every seventh SKU starts sold out.
                    quantity: if seed % 7 == 0 { 0 } else { (seed * 13) % 60 + 1 },
                    color: Some(color.to_string()),
                    brand: Some(brand.to_string()),
                });
            }
        }
    }

    products
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
