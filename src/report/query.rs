//! Aggregation query construction
//!
//! A [`ReportSpecification`] is first turned into a [`QueryPlan`] (SQL text,
//! positional parameters, title and display columns) without touching the
//! database, then executed into a [`TabularResult`]. Money is summed as integer
//! cents and only converted to `Decimal` when rows are read.

use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use super::types::{CellValue, Row, TabularResult};
use crate::error::ReportResult;
use crate::nlp::{Grouping, PriceTier, ReportSpecification, ReportType, SortMetric, SortOrder, TemporalResolver};

/// Order statuses that count as a completed sale
const COMPLETED: &str = "('PAGADO', 'PROCESANDO', 'ENVIADO', 'ENTREGADO')";

const UNCATEGORIZED: &str = "Sin categoría";

/// Price bounds for the catalogue price filters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceTiers {
    /// Highest price still considered cheap
    pub cheap_max: Decimal,
    /// Lowest price considered premium
    pub premium_min: Decimal,
}

impl Default for PriceTiers {
    fn default() -> Self {
        Self {
            cheap_max: Decimal::new(10_000, 2),
            premium_min: Decimal::new(50_000, 2),
        }
    }
}

/// Which aggregation a plan runs, and so how its rows are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    SalesSummary,
    SalesByDate,
    SalesByCustomer,
    SalesByProduct,
    SalesByCategory,
    Catalog,
    Customers,
    Revenue,
}

impl QueryShape {
    fn for_spec(spec: &ReportSpecification) -> Self {
        match spec.report_type {
            ReportType::Sales => match spec.grouping {
                Grouping::None => QueryShape::SalesSummary,
                Grouping::Date => QueryShape::SalesByDate,
                Grouping::Customer => QueryShape::SalesByCustomer,
                Grouping::Product => QueryShape::SalesByProduct,
                Grouping::Category => QueryShape::SalesByCategory,
            },
            ReportType::Products => QueryShape::Catalog,
            ReportType::Customers => QueryShape::Customers,
            // Revenue is a single aggregate whatever the grouping says
            ReportType::Revenue => QueryShape::Revenue,
        }
    }

    fn columns(&self) -> &'static [&'static str] {
        match self {
            QueryShape::SalesSummary => &["Total Vendido", "Cantidad de Ventas", "Ticket Promedio"],
            QueryShape::SalesByDate => &["Fecha", "Cantidad de Pedidos", "Total Vendido", "Ticket Promedio"],
            QueryShape::SalesByCustomer => {
                &["Cliente", "Email", "Cantidad de Compras", "Total Gastado", "Ticket Promedio"]
            }
            QueryShape::SalesByProduct => &["Producto", "Cantidad Vendida", "Total Ventas", "Precio Promedio"],
            QueryShape::SalesByCategory => &["Categoría", "Cantidad Vendida", "Total Ventas", "Precio Promedio"],
            QueryShape::Catalog => {
                &["Producto", "Precio", "Precio Final", "Stock", "Categoría", "Activo", "Unidades Vendidas"]
            }
            QueryShape::Customers => &["Cliente", "Email", "Total Gastado", "Cantidad de Compras"],
            QueryShape::Revenue => &["Total Ingresos", "Cantidad de Transacciones", "Ticket Promedio"],
        }
    }

    fn is_grouped(&self) -> bool {
        !matches!(self, QueryShape::SalesSummary | QueryShape::Revenue)
    }

    /// Read one SQL row into cells, in column order
    fn read_row(&self, row: &rusqlite::Row) -> rusqlite::Result<Vec<CellValue>> {
        let cells = match self {
            QueryShape::SalesSummary | QueryShape::Revenue => {
                let total: i64 = row.get(0)?;
                let count: i64 = row.get(1)?;
                vec![money(total).into(), count.into(), average(total, count).into()]
            }
            QueryShape::SalesByDate => {
                let day: NaiveDate = row.get(0)?;
                let count: i64 = row.get(1)?;
                let total: i64 = row.get(2)?;
                vec![day.into(), count.into(), money(total).into(), average(total, count).into()]
            }
            QueryShape::SalesByCustomer => {
                let name: String = row.get(0)?;
                let email: String = row.get(1)?;
                let count: i64 = row.get(2)?;
                let total: i64 = row.get(3)?;
                vec![
                    name.into(),
                    email.into(),
                    count.into(),
                    money(total).into(),
                    average(total, count).into(),
                ]
            }
            QueryShape::SalesByProduct | QueryShape::SalesByCategory => {
                let name: String = row.get(0)?;
                let units: i64 = row.get(1)?;
                let revenue: i64 = row.get(2)?;
                let unit_price_sum: i64 = row.get(3)?;
                let lines: i64 = row.get(4)?;
                vec![
                    name.into(),
                    units.into(),
                    money(revenue).into(),
                    average(unit_price_sum, lines).into(),
                ]
            }
            QueryShape::Catalog => {
                let name: String = row.get(0)?;
                let price: i64 = row.get(1)?;
                let final_price: i64 = row.get(2)?;
                let stock: i64 = row.get(3)?;
                let category: String = row.get(4)?;
                let active: bool = row.get(5)?;
                let units: i64 = row.get(6)?;
                vec![
                    name.into(),
                    money(price).into(),
                    money(final_price).into(),
                    stock.into(),
                    category.into(),
                    active.into(),
                    units.into(),
                ]
            }
            QueryShape::Customers => {
                let name: String = row.get(0)?;
                let email: String = row.get(1)?;
                let total: i64 = row.get(2)?;
                let count: i64 = row.get(3)?;
                vec![name.into(), email.into(), money(total).into(), count.into()]
            }
        };
        Ok(cells)
    }
}

/// Cents to a two-digit decimal
fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Mean of a cents sum over a count, 0.00 for an empty group
fn average(total_cents: i64, count: i64) -> Decimal {
    if count == 0 {
        return money(0);
    }
    let mut avg = (money(total_cents) / Decimal::from(count)).round_dp(2);
    avg.rescale(2);
    avg
}

fn to_cents(amount: Decimal) -> i64 {
    (amount * Decimal::ONE_HUNDRED).round().to_i64().unwrap_or(i64::MAX)
}

fn direction(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Ascending => "ASC",
        SortOrder::Descending => "DESC",
    }
}

/// Everything needed to run one aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub shape: QueryShape,
    pub sql: String,
    pub params: Vec<Value>,
    pub title: String,
    pub subtitle: String,
    pub columns: Vec<String>,
}

/// Translates specifications into aggregations over the order history
pub struct QueryBuilder<'a> {
    conn: &'a Connection,
    resolver: TemporalResolver,
    price_tiers: PriceTiers,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(conn: &'a Connection, resolver: TemporalResolver) -> Self {
        Self {
            conn,
            resolver,
            price_tiers: PriceTiers::default(),
        }
    }

    pub fn with_price_tiers(mut self, price_tiers: PriceTiers) -> Self {
        self.price_tiers = price_tiers;
        self
    }

    /// Run the aggregation for a specification
    pub fn build(&self, spec: &ReportSpecification) -> ReportResult<TabularResult> {
        let plan = self.plan(spec);
        debug!(shape = ?plan.shape, sql = %plan.sql, params = ?plan.params, "executing query plan");

        let mut stmt = self.conn.prepare(&plan.sql)?;
        let columns = plan.shape.columns();
        let rows = stmt
            .query_map(params_from_iter(plan.params.iter()), |row| {
                plan.shape.read_row(row).map(|cells| Row::from_columns(columns, cells))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        TabularResult::new(plan.title, plan.subtitle, plan.columns, rows)
    }

    /// Build the query plan without executing it
    pub fn plan(&self, spec: &ReportSpecification) -> QueryPlan {
        let shape = QueryShape::for_spec(spec);
        let (start, end, description) = match (spec.period.start, spec.period.end) {
            (Some(start), Some(end)) => (start, end, spec.period.description.clone()),
            _ => {
                let fallback = self.resolver.default_period();
                let start = fallback.start.unwrap_or(self.resolver.today());
                let end = fallback.end.unwrap_or(self.resolver.today());
                (start, end, fallback.description)
            }
        };

        let mut params = vec![
            Value::Text(start.format("%Y-%m-%d").to_string()),
            Value::Text(end.format("%Y-%m-%d").to_string()),
        ];
        let in_period = "date(o.created_at) BETWEEN ?1 AND ?2";
        let sort = spec.filters.sort_order;
        let metric = spec.filters.sort_by.unwrap_or(SortMetric::Units);

        let (title, mut sql) = match shape {
            QueryShape::SalesSummary => (
                "Reporte General de Ventas".to_string(),
                format!(
                    "SELECT COALESCE(SUM(o.total_cents), 0), COUNT(o.id)
                     FROM orders o
                     WHERE o.status IN {COMPLETED} AND {in_period}"
                ),
            ),
            QueryShape::SalesByDate => (
                "Reporte de Ventas Diarias".to_string(),
                format!(
                    "SELECT date(o.created_at) AS day, COUNT(o.id), SUM(o.total_cents)
                     FROM orders o
                     WHERE o.status IN {COMPLETED} AND {in_period}
                     GROUP BY day
                     ORDER BY day {}",
                    direction(sort.unwrap_or(SortOrder::Descending))
                ),
            ),
            QueryShape::SalesByCustomer => (
                "Reporte de Ventas por Cliente".to_string(),
                format!(
                    "SELECT COALESCE(NULLIF(TRIM(c.name), ''), c.email), c.email, COUNT(o.id), SUM(o.total_cents) AS spent
                     FROM orders o
                     JOIN customers c ON c.id = o.customer_id
                     WHERE o.status IN {COMPLETED} AND {in_period}
                     GROUP BY c.id
                     ORDER BY spent {}, c.email ASC",
                    direction(sort.unwrap_or(SortOrder::Descending))
                ),
            ),
            QueryShape::SalesByProduct | QueryShape::SalesByCategory => {
                let (title, label, join, group) = if shape == QueryShape::SalesByProduct {
                    ("Reporte de Ventas por Producto", "p.name".to_string(), "", "p.id")
                } else {
                    (
                        "Reporte de Ventas por Categoría",
                        format!("COALESCE(cat.name, '{UNCATEGORIZED}')"),
                        "LEFT JOIN categories cat ON cat.id = p.category_id",
                        "cat.id",
                    )
                };
                // Rankings order by the metric they name, everything else by revenue
                let order = match (sort, metric) {
                    (Some(order), SortMetric::Units) => format!("units {}", direction(order)),
                    (Some(order), SortMetric::Amount) => format!("revenue {}", direction(order)),
                    (None, _) => "revenue DESC".to_string(),
                };
                (
                    title.to_string(),
                    format!(
                        "SELECT {label} AS label, SUM(i.quantity) AS units,
                                SUM(i.quantity * i.unit_price_cents) AS revenue,
                                SUM(i.unit_price_cents), COUNT(i.id)
                         FROM order_items i
                         JOIN orders o ON o.id = i.order_id
                         JOIN products p ON p.id = i.product_id
                         {join}
                         WHERE o.status IN {COMPLETED} AND {in_period}
                         GROUP BY {group}
                         ORDER BY {order}, label ASC"
                    ),
                )
            }
            QueryShape::Catalog => {
                // The catalogue is a snapshot, the period does not apply
                params.clear();
                let mut conditions = vec!["p.active = 1".to_string()];
                match spec.filters.price_tier {
                    Some(PriceTier::Cheap) => {
                        params.push(Value::Integer(to_cents(self.price_tiers.cheap_max)));
                        conditions.push(format!("p.price_cents <= ?{}", params.len()));
                    }
                    Some(PriceTier::Premium) => {
                        params.push(Value::Integer(to_cents(self.price_tiers.premium_min)));
                        conditions.push(format!("p.price_cents >= ?{}", params.len()));
                    }
                    None => {}
                }
                if spec.filters.on_sale == Some(true) {
                    conditions.push("p.on_sale = 1".to_string());
                }

                let (title, order) = match (sort, metric) {
                    (Some(SortOrder::Descending), SortMetric::Units) => ("Productos Más Vendidos", "units DESC, p.name ASC"),
                    (Some(SortOrder::Ascending), SortMetric::Units) => ("Productos Menos Vendidos", "units ASC, p.name ASC"),
                    (Some(SortOrder::Descending), SortMetric::Amount) => {
                        ("Productos con Mayores Ingresos", "revenue DESC, p.name ASC")
                    }
                    (Some(SortOrder::Ascending), SortMetric::Amount) => {
                        ("Productos con Menores Ingresos", "revenue ASC, p.name ASC")
                    }
                    (None, _) => ("Reporte de Productos", "p.created_at DESC, p.id DESC"),
                };
                (
                    title.to_string(),
                    format!(
                        "SELECT p.name, p.price_cents,
                                CASE WHEN p.on_sale = 1 AND p.sale_price_cents IS NOT NULL
                                     THEN p.sale_price_cents ELSE p.price_cents END,
                                p.stock, COALESCE(cat.name, '{UNCATEGORIZED}'), p.active,
                                (SELECT COALESCE(SUM(i.quantity), 0)
                                 FROM order_items i
                                 JOIN orders o ON o.id = i.order_id
                                 WHERE i.product_id = p.id AND o.status IN {COMPLETED}) AS units,
                                (SELECT COALESCE(SUM(i.quantity * i.unit_price_cents), 0)
                                 FROM order_items i
                                 JOIN orders o ON o.id = i.order_id
                                 WHERE i.product_id = p.id AND o.status IN {COMPLETED}) AS revenue
                         FROM products p
                         LEFT JOIN categories cat ON cat.id = p.category_id
                         WHERE {}
                         ORDER BY {order}",
                        conditions.join(" AND ")
                    ),
                )
            }
            QueryShape::Customers => (
                "Reporte de Clientes".to_string(),
                format!(
                    "SELECT COALESCE(NULLIF(TRIM(c.name), ''), c.email), c.email, SUM(o.total_cents) AS spent, COUNT(o.id)
                     FROM customers c
                     JOIN orders o ON o.customer_id = c.id
                     WHERE o.status IN {COMPLETED} AND {in_period}
                     GROUP BY c.id
                     ORDER BY spent {}, c.email ASC",
                    direction(sort.unwrap_or(SortOrder::Descending))
                ),
            ),
            QueryShape::Revenue => (
                "Reporte de Ingresos".to_string(),
                format!(
                    "SELECT COALESCE(SUM(o.total_cents), 0), COUNT(o.id)
                     FROM orders o
                     WHERE o.status IN {COMPLETED} AND {in_period}"
                ),
            ),
        };

        if let Some(limit) = spec.filters.limit.filter(|_| shape.is_grouped()) {
            params.push(Value::Integer(limit as i64));
            sql.push_str(&format!(" LIMIT ?{}", params.len()));
        }

        let subtitle = match shape {
            QueryShape::Catalog => catalog_subtitle(spec),
            _ => {
                let mut subtitle = format!(
                    "Periodo: {} - {} ({})",
                    start.format("%d/%m/%Y"),
                    end.format("%d/%m/%Y"),
                    description
                );
                if spec.report_type == ReportType::Sales && spec.grouping != Grouping::None {
                    subtitle.push_str(&format!(" | Agrupado por: {}", spec.grouping.label()));
                }
                subtitle
            }
        };

        QueryPlan {
            shape,
            sql,
            params,
            title,
            subtitle,
            columns: shape.columns().iter().map(|c| c.to_string()).collect(),
        }
    }
}

fn catalog_subtitle(spec: &ReportSpecification) -> String {
    let mut parts = vec!["Catálogo de productos activos".to_string()];
    match spec.filters.price_tier {
        Some(PriceTier::Cheap) => parts.push("Precio económico".to_string()),
        Some(PriceTier::Premium) => parts.push("Precio premium".to_string()),
        None => {}
    }
    if spec.filters.on_sale == Some(true) {
        parts.push("En oferta".to_string());
    }
    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{OutputFormat, Period, ReportFilters};
    use crate::tests::{fixture_today, get_seeded_conn};

    fn spec(report_type: ReportType, grouping: Grouping, filters: ReportFilters) -> ReportSpecification {
        ReportSpecification {
            report_type,
            period: Period::new(
                NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
                "Mes de Septiembre 2026",
            ),
            grouping,
            output_format: OutputFormat::Onscreen,
            filters,
            raw_text: String::new(),
        }
    }

    fn dec(cents: i64) -> CellValue {
        CellValue::Decimal(Decimal::new(cents, 2))
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    fn column(result: &TabularResult, name: &str) -> Vec<CellValue> {
        result.rows().iter().map(|row| row.cell(name).unwrap().clone()).collect()
    }

    fn resolver() -> TemporalResolver {
        TemporalResolver::with_today(fixture_today())
    }

    #[test]
    fn test_sales_summary() {
        let (conn, _dir) = get_seeded_conn();
        let builder = QueryBuilder::new(&conn, resolver());
        let result = builder.build(&spec(ReportType::Sales, Grouping::None, Default::default())).unwrap();

        assert_eq!(result.title(), "Reporte General de Ventas");
        assert_eq!(result.total_records(), 1);
        let row = &result.rows()[0];
        assert_eq!(row.get("total_vendido"), Some(&dec(225_500)));
        assert_eq!(row.get("cantidad_ventas"), Some(&CellValue::Integer(4)));
        assert_eq!(row.get("ticket_promedio"), Some(&dec(56_375)));
    }

    #[test]
    fn test_empty_period_yields_zero_row() {
        let (conn, _dir) = get_seeded_conn();
        let builder = QueryBuilder::new(&conn, resolver());
        let mut empty = spec(ReportType::Sales, Grouping::None, Default::default());
        empty.period = Period::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
            "Mes de Enero 2020",
        );

        let result = builder.build(&empty).unwrap();
        assert_eq!(result.total_records(), 1);
        let row = &result.rows()[0];
        assert_eq!(row.get("total_vendido"), Some(&dec(0)));
        assert_eq!(row.get("cantidad_ventas"), Some(&CellValue::Integer(0)));
        assert_eq!(row.get("ticket_promedio"), Some(&dec(0)));

        empty.report_type = ReportType::Revenue;
        let result = builder.build(&empty).unwrap();
        assert_eq!(result.rows()[0].get("total_ingresos"), Some(&dec(0)));
    }

    #[test]
    fn test_sales_by_date() {
        let (conn, _dir) = get_seeded_conn();
        let builder = QueryBuilder::new(&conn, resolver());
        let result = builder.build(&spec(ReportType::Sales, Grouping::Date, Default::default())).unwrap();

        assert_eq!(result.title(), "Reporte de Ventas Diarias");
        assert_eq!(
            column(&result, "Fecha"),
            vec![
                CellValue::Date(NaiveDate::from_ymd_opt(2026, 9, 20).unwrap()),
                CellValue::Date(NaiveDate::from_ymd_opt(2026, 9, 12).unwrap()),
                CellValue::Date(NaiveDate::from_ymd_opt(2026, 9, 5).unwrap()),
            ]
        );
        assert_eq!(column(&result, "Total Vendido"), vec![dec(60_000), dec(10_500), dec(155_000)]);
        assert_eq!(column(&result, "Cantidad de Pedidos")[2], CellValue::Integer(2));
        assert_eq!(column(&result, "Ticket Promedio")[2], dec(77_500));
        assert!(result.subtitle().contains("Agrupado por: fecha"));
    }

    #[test]
    fn test_sales_by_customer_uses_email_for_blank_names() {
        let (conn, _dir) = get_seeded_conn();
        let builder = QueryBuilder::new(&conn, resolver());
        let result = builder.build(&spec(ReportType::Sales, Grouping::Customer, Default::default())).unwrap();

        assert_eq!(
            column(&result, "Cliente"),
            vec![text("Ana Pérez"), text("carla@example.com"), text("Bruno Díaz")]
        );
        assert_eq!(column(&result, "Total Gastado"), vec![dec(160_500), dec(60_000), dec(5_000)]);
        assert_eq!(column(&result, "Ticket Promedio")[0], dec(80_250));

        let ascending = ReportFilters { sort_order: Some(SortOrder::Ascending), ..Default::default() };
        let result = builder.build(&spec(ReportType::Sales, Grouping::Customer, ascending)).unwrap();
        assert_eq!(column(&result, "Cliente")[0], text("Bruno Díaz"));
    }

    #[test]
    fn test_sales_by_product() {
        let (conn, _dir) = get_seeded_conn();
        let builder = QueryBuilder::new(&conn, resolver());
        let result = builder.build(&spec(ReportType::Sales, Grouping::Product, Default::default())).unwrap();

        assert_eq!(result.title(), "Reporte de Ventas por Producto");
        assert_eq!(
            column(&result, "Producto"),
            vec![text("Laptop"), text("Silla"), text("Lámpara"), text("Mouse")]
        );
        let mouse = &result.rows()[3];
        assert_eq!(mouse.get("cantidad_vendida"), Some(&CellValue::Integer(3)));
        assert_eq!(mouse.get("total_ventas"), Some(&dec(7_500)));
        assert_eq!(mouse.get("precio_promedio"), Some(&dec(2_500)));

        let most_sold = ReportFilters { sort_order: Some(SortOrder::Descending), ..Default::default() };
        let result = builder.build(&spec(ReportType::Sales, Grouping::Product, most_sold)).unwrap();
        assert_eq!(column(&result, "Producto")[0], text("Mouse"));

        let top_revenue = ReportFilters {
            sort_order: Some(SortOrder::Descending),
            sort_by: Some(SortMetric::Amount),
            ..Default::default()
        };
        let result = builder.build(&spec(ReportType::Sales, Grouping::Product, top_revenue)).unwrap();
        assert_eq!(
            column(&result, "Producto"),
            vec![text("Laptop"), text("Silla"), text("Lámpara"), text("Mouse")]
        );

        let lowest_revenue = ReportFilters {
            sort_order: Some(SortOrder::Ascending),
            sort_by: Some(SortMetric::Amount),
            ..Default::default()
        };
        let result = builder.build(&spec(ReportType::Sales, Grouping::Product, lowest_revenue)).unwrap();
        assert_eq!(column(&result, "Producto")[0], text("Mouse"));
    }

    #[test]
    fn test_sales_by_category() {
        let (conn, _dir) = get_seeded_conn();
        let builder = QueryBuilder::new(&conn, resolver());
        let result = builder.build(&spec(ReportType::Sales, Grouping::Category, Default::default())).unwrap();

        assert_eq!(
            column(&result, "Categoría"),
            vec![text("Electrónica"), text("Sin categoría"), text("Hogar")]
        );
        let electronics = &result.rows()[0];
        assert_eq!(electronics.get("cantidad_vendida"), Some(&CellValue::Integer(4)));
        assert_eq!(electronics.get("total_ventas"), Some(&dec(157_500)));
        assert_eq!(electronics.get("precio_promedio"), Some(&dec(51_667)));
    }

    #[test]
    fn test_limit_truncates_after_ordering() {
        let (conn, _dir) = get_seeded_conn();
        let builder = QueryBuilder::new(&conn, resolver());
        let top_two = ReportFilters { limit: Some(2), ..Default::default() };
        let result = builder.build(&spec(ReportType::Sales, Grouping::Product, top_two)).unwrap();

        assert_eq!(result.total_records(), 2);
        assert_eq!(column(&result, "Producto"), vec![text("Laptop"), text("Silla")]);
    }

    #[test]
    fn test_customers_exclude_zero_transactions() {
        let (conn, _dir) = get_seeded_conn();
        let builder = QueryBuilder::new(&conn, resolver());
        let top_five = ReportFilters { limit: Some(5), ..Default::default() };
        let result = builder.build(&spec(ReportType::Customers, Grouping::None, top_five)).unwrap();

        assert_eq!(result.title(), "Reporte de Clientes");
        assert_eq!(result.total_records(), 3);
        assert_eq!(column(&result, "Total Gastado"), vec![dec(160_500), dec(60_000), dec(5_000)]);
        assert!(!column(&result, "Cliente").contains(&text("Diego Luna")));
    }

    #[test]
    fn test_catalog_ignores_period() {
        let (conn, _dir) = get_seeded_conn();
        let builder = QueryBuilder::new(&conn, resolver());
        let plan = builder.plan(&spec(ReportType::Products, Grouping::None, Default::default()));
        assert!(plan.params.is_empty());

        let result = builder.build(&spec(ReportType::Products, Grouping::None, Default::default())).unwrap();
        assert_eq!(result.title(), "Reporte de Productos");
        assert_eq!(
            column(&result, "Producto"),
            vec![text("Silla"), text("Lámpara"), text("Mouse"), text("Laptop")]
        );
        assert_eq!(column(&result, "Categoría")[0], text("Sin categoría"));
        assert_eq!(column(&result, "Activo")[0], CellValue::Bool(true));
        // only Mouse is on sale
        assert_eq!(column(&result, "Precio"), vec![dec(60_000), dec(8_000), dec(2_500), dec(150_000)]);
        assert_eq!(column(&result, "Precio Final"), vec![dec(60_000), dec(8_000), dec(2_000), dec(150_000)]);
    }

    #[test]
    fn test_most_sold_products() {
        let (conn, _dir) = get_seeded_conn();
        let builder = QueryBuilder::new(&conn, resolver());
        let most_sold = ReportFilters { sort_order: Some(SortOrder::Descending), ..Default::default() };
        let result = builder.build(&spec(ReportType::Products, Grouping::None, most_sold)).unwrap();

        assert_eq!(result.title(), "Productos Más Vendidos");
        assert_eq!(column(&result, "Producto")[0], text("Mouse"));
        assert_eq!(column(&result, "Unidades Vendidas")[0], CellValue::Integer(7));
    }

    #[test]
    fn test_products_with_highest_revenue() {
        let (conn, _dir) = get_seeded_conn();
        let builder = QueryBuilder::new(&conn, resolver());
        let top_revenue = ReportFilters {
            sort_order: Some(SortOrder::Descending),
            sort_by: Some(SortMetric::Amount),
            ..Default::default()
        };
        let result = builder.build(&spec(ReportType::Products, Grouping::None, top_revenue)).unwrap();

        assert_eq!(result.title(), "Productos con Mayores Ingresos");
        // Laptop 1500.00, Silla 600.00, Mouse 175.00 (incl. processing order), Lámpara 80.00
        assert_eq!(
            column(&result, "Producto"),
            vec![text("Laptop"), text("Silla"), text("Mouse"), text("Lámpara")]
        );
    }

    #[test]
    fn test_catalog_price_and_sale_filters() {
        let (conn, _dir) = get_seeded_conn();
        let builder = QueryBuilder::new(&conn, resolver());

        let cheap = ReportFilters { price_tier: Some(PriceTier::Cheap), ..Default::default() };
        let result = builder.build(&spec(ReportType::Products, Grouping::None, cheap)).unwrap();
        assert_eq!(column(&result, "Producto"), vec![text("Lámpara"), text("Mouse")]);

        let premium = ReportFilters { price_tier: Some(PriceTier::Premium), ..Default::default() };
        let result = builder.build(&spec(ReportType::Products, Grouping::None, premium)).unwrap();
        assert_eq!(column(&result, "Producto"), vec![text("Silla"), text("Laptop")]);

        let on_sale = ReportFilters { on_sale: Some(true), ..Default::default() };
        let result = builder.build(&spec(ReportType::Products, Grouping::None, on_sale)).unwrap();
        assert_eq!(column(&result, "Producto"), vec![text("Mouse")]);

        let tiers = PriceTiers { cheap_max: Decimal::new(3_000, 2), premium_min: Decimal::new(100_000, 2) };
        let builder = QueryBuilder::new(&conn, resolver()).with_price_tiers(tiers);
        let cheap = ReportFilters { price_tier: Some(PriceTier::Cheap), ..Default::default() };
        let result = builder.build(&spec(ReportType::Products, Grouping::None, cheap)).unwrap();
        assert_eq!(column(&result, "Producto"), vec![text("Mouse")]);
    }

    #[test]
    fn test_revenue_ignores_grouping() {
        let (conn, _dir) = get_seeded_conn();
        let builder = QueryBuilder::new(&conn, resolver());
        let result = builder.build(&spec(ReportType::Revenue, Grouping::Product, Default::default())).unwrap();

        assert_eq!(result.title(), "Reporte de Ingresos");
        assert_eq!(result.columns(), ["Total Ingresos", "Cantidad de Transacciones", "Ticket Promedio"]);
        assert_eq!(result.rows()[0].get("total_ingresos"), Some(&dec(225_500)));
        assert!(!result.subtitle().contains("Agrupado"));
    }

    #[test]
    fn test_unresolved_period_uses_previous_month() {
        let (conn, _dir) = get_seeded_conn();
        let builder = QueryBuilder::new(&conn, resolver());
        let mut open = spec(ReportType::Sales, Grouping::None, Default::default());
        open.period = Period::unresolved();

        let plan = builder.plan(&open);
        assert_eq!(plan.params[0], Value::Text("2026-09-01".to_string()));
        assert_eq!(plan.params[1], Value::Text("2026-09-30".to_string()));
        assert!(plan.subtitle.contains("Último mes (por defecto)"));

        let result = builder.build(&open).unwrap();
        assert_eq!(result.rows()[0].get("total_vendido"), Some(&dec(225_500)));
    }

    #[test]
    fn test_identical_calls_are_identical() {
        let (conn, _dir) = get_seeded_conn();
        let builder = QueryBuilder::new(&conn, resolver());
        let spec = spec(ReportType::Sales, Grouping::Category, Default::default());
        assert_eq!(builder.build(&spec).unwrap(), builder.build(&spec).unwrap());
    }
}
