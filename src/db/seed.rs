//! Deterministic demo data so the tool has something to report on

use chrono::{Days, NaiveDate, NaiveTime};
use rusqlite::{Connection, params};
use tracing::info;

use crate::error::ReportResult;

const CATEGORIES: &[&str] = &["Electrónica", "Hogar", "Deportes", "Oficina"];

// name, price in cents, stock, category index, on sale price
const PRODUCTS: &[(&str, i64, i64, Option<usize>, Option<i64>)] = &[
    ("Laptop Pro 14", 899_900, 8, Some(0), None),
    ("Audífonos Inalámbricos", 45_000, 40, Some(0), Some(39_900)),
    ("Mouse Óptico", 6_500, 120, Some(0), None),
    ("Lámpara de Escritorio", 12_000, 35, Some(1), None),
    ("Juego de Sábanas", 28_000, 22, Some(1), Some(22_400)),
    ("Balón de Fútbol", 15_000, 60, Some(2), None),
    ("Bicicleta Urbana", 320_000, 5, Some(2), None),
    ("Silla Ergonómica", 150_000, 12, Some(3), Some(129_900)),
    ("Cuaderno A4", 1_800, 300, Some(3), None),
    ("Tarjeta de Regalo", 10_000, 999, None, None),
];

const CUSTOMERS: &[(&str, &str)] = &[
    ("María González", "maria.gonzalez@example.com"),
    ("Juan Pérez", "juan.perez@example.com"),
    ("Lucía Fernández", "lucia.fernandez@example.com"),
    ("Carlos Rojas", "carlos.rojas@example.com"),
    ("", "compras@empresa-demo.com"),
    ("Sofía Vargas", "sofia.vargas@example.com"),
];

const STATUSES: &[&str] = &["PAGADO", "ENTREGADO", "ENVIADO", "PAGADO", "PROCESANDO", "PENDIENTE", "ENTREGADO", "CANCELADO"];

const ORDER_COUNT: u64 = 120;
const HISTORY_DAYS: u64 = 180;

/// Populate an empty database. Returns the number of orders created, or 0 when
/// the catalogue already has products.
pub fn seed_demo_data(conn: &Connection, today: NaiveDate) -> ReportResult<usize> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
    if existing > 0 {
        return Ok(0);
    }

    let tx = conn.unchecked_transaction()?;
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
    let catalog_date = today.checked_sub_days(Days::new(HISTORY_DAYS + 30)).unwrap_or(today);

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        tx.execute("INSERT INTO categories (name) VALUES (?1)", params![name])?;
        category_ids.push(tx.last_insert_rowid());
    }

    let mut product_ids = Vec::with_capacity(PRODUCTS.len());
    for (index, (name, price, stock, category, sale_price)) in PRODUCTS.iter().enumerate() {
        let created_at = catalog_date
            .checked_add_days(Days::new(index as u64))
            .unwrap_or(catalog_date)
            .and_time(noon);
        tx.execute(
            "INSERT INTO products (name, price_cents, sale_price_cents, on_sale, stock, category_id, active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)",
            params![
                name,
                price,
                sale_price,
                sale_price.is_some(),
                stock,
                category.map(|c| category_ids[c]),
                created_at,
            ],
        )?;
        product_ids.push((tx.last_insert_rowid(), sale_price.unwrap_or(*price)));
    }

    let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
    for (name, email) in CUSTOMERS {
        tx.execute(
            "INSERT INTO customers (name, email, created_at) VALUES (?1, ?2, ?3)",
            params![name, email, catalog_date.and_time(noon)],
        )?;
        customer_ids.push(tx.last_insert_rowid());
    }

    for i in 0..ORDER_COUNT {
        let day = today.checked_sub_days(Days::new((i * 7 + i / 3) % HISTORY_DAYS)).unwrap_or(today);
        let hour = NaiveTime::from_hms_opt(9 + (i % 10) as u32, ((i * 13) % 60) as u32, 0).unwrap_or(noon);
        let customer = customer_ids[(i as usize * 5 + 1) % customer_ids.len()];
        let status = STATUSES[i as usize % STATUSES.len()];

        let items: Vec<(i64, i64, i64)> = (0..1 + i % 3)
            .map(|k| {
                let (product_id, unit_price) = product_ids[((i * 3 + k * 7) as usize) % product_ids.len()];
                (product_id, 1 + ((i + k) % 3) as i64, unit_price)
            })
            .collect();
        let total: i64 = items.iter().map(|(_, qty, price)| qty * price).sum();

        tx.execute(
            "INSERT INTO orders (customer_id, status, total_cents, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![customer, status, total, day.and_time(hour)],
        )?;
        let order_id = tx.last_insert_rowid();

        for (product_id, quantity, unit_price) in items {
            tx.execute(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price_cents) VALUES (?1, ?2, ?3, ?4)",
                params![order_id, product_id, quantity, unit_price],
            )?;
        }
    }

    tx.commit()?;
    info!(orders = ORDER_COUNT, products = PRODUCTS.len(), "seeded demo data");
    Ok(ORDER_COUNT as usize)
}
