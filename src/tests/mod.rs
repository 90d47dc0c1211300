//! Shared fixtures for unit tests

use chrono::NaiveDate;
use rusqlite::{Connection, params};
use tempfile::{TempDir, tempdir};

use crate::db::conn::connect;

/// Reference date all fixture-based tests resolve periods against
pub fn fixture_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// Empty database in a temporary directory. Keep the directory alive for the
/// duration of the test.
pub fn get_test_conn() -> (Connection, TempDir) {
    let dir = tempdir().unwrap();
    let conn = connect(&dir.path().join("reportly.db")).unwrap();
    (conn, dir)
}

/// Database with a small, hand-checked order history.
///
/// Completed September 2026 orders:
///
/// | order | customer | day   | items                  | total   |
/// |-------|----------|-------|------------------------|---------|
/// | 1     | Ana      | 09-05 | Laptop x1              | 1500.00 |
/// | 2     | Bruno    | 09-05 | Mouse x2               |   50.00 |
/// | 3     | Ana      | 09-12 | Lámpara x1, Mouse x1   |  105.00 |
/// | 4     | carla    | 09-20 | Silla x1               |  600.00 |
///
/// Order 5 (September) is cancelled, order 6 (October) is processing and
/// order 7 (October) is pending. Diego has no orders. Silla has no category
/// and "Teclado Viejo" is inactive.
pub fn get_seeded_conn() -> (Connection, TempDir) {
    let (conn, dir) = get_test_conn();

    for (id, name) in [(1, "Electrónica"), (2, "Hogar")] {
        conn.execute("INSERT INTO categories (id, name) VALUES (?1, ?2)", params![id, name])
            .unwrap();
    }

    let products: [(i64, &str, i64, Option<i64>, bool, i64, Option<i64>, bool, &str); 5] = [
        (1, "Laptop", 150_000, None, false, 5, Some(1), true, "2026-01-10 10:00:00"),
        (2, "Mouse", 2_500, Some(2_000), true, 50, Some(1), true, "2026-02-10 10:00:00"),
        (3, "Lámpara", 8_000, None, false, 12, Some(2), true, "2026-03-10 10:00:00"),
        (4, "Silla", 60_000, None, false, 3, None, true, "2026-04-10 10:00:00"),
        (5, "Teclado Viejo", 3_000, None, false, 0, Some(1), false, "2025-12-01 10:00:00"),
    ];
    for (id, name, price, sale_price, on_sale, stock, category, active, created_at) in products {
        conn.execute(
            "INSERT INTO products (id, name, price_cents, sale_price_cents, on_sale, stock, category_id, active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![id, name, price, sale_price, on_sale, stock, category, active, created_at],
        )
        .unwrap();
    }

    let customers = [
        (1, "Ana Pérez", "ana@example.com"),
        (2, "Bruno Díaz", "bruno@example.com"),
        (3, "", "carla@example.com"),
        (4, "Diego Luna", "diego@example.com"),
    ];
    for (id, name, email) in customers {
        conn.execute(
            "INSERT INTO customers (id, name, email, created_at) VALUES (?1, ?2, ?3, '2026-01-01 00:00:00')",
            params![id, name, email],
        )
        .unwrap();
    }

    let orders = [
        (1, 1, "PAGADO", 150_000, "2026-09-05 10:00:00"),
        (2, 2, "ENTREGADO", 5_000, "2026-09-05 18:30:00"),
        (3, 1, "ENVIADO", 10_500, "2026-09-12 09:15:00"),
        (4, 3, "PAGADO", 60_000, "2026-09-20 16:45:00"),
        (5, 2, "CANCELADO", 150_000, "2026-09-21 11:00:00"),
        (6, 3, "PROCESANDO", 10_000, "2026-10-02 12:00:00"),
        (7, 2, "PENDIENTE", 8_000, "2026-10-03 08:00:00"),
    ];
    for (id, customer, status, total, created_at) in orders {
        conn.execute(
            "INSERT INTO orders (id, customer_id, status, total_cents, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, customer, status, total, created_at],
        )
        .unwrap();
    }

    // order, product, quantity, unit price
    let items = [
        (1, 1, 1, 150_000),
        (2, 2, 2, 2_500),
        (3, 3, 1, 8_000),
        (3, 2, 1, 2_500),
        (4, 4, 1, 60_000),
        (5, 1, 1, 150_000),
        (6, 2, 4, 2_500),
        (7, 3, 1, 8_000),
    ];
    for (order, product, quantity, unit_price) in items {
        conn.execute(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price_cents) VALUES (?1, ?2, ?3, ?4)",
            params![order, product, quantity, unit_price],
        )
        .unwrap();
    }

    (conn, dir)
}
