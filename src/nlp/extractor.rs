//! Intent extraction
//!
//! Keyword tables map a normalized command onto each dimension of a
//! [`ReportSpecification`]. Every dimension has a default, so extraction is
//! total: arbitrary text always yields a specification.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::temporal::TemporalResolver;
use super::text::{keyword_regex, normalize_command};
use super::types::{
    Grouping, OutputFormat, Period, PriceTier, ReportFilters, ReportSpecification, ReportType,
    SortMetric, SortOrder,
};

// === Report Type Tables ===
// Checked in this order, first hit wins
static SALES_RE: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&["venta", "ventas", "pedido", "pedidos", "orden", "ordenes", "sales", "orders"])
});

static CUSTOMERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&[
        "cliente",
        "clientes",
        "comprador",
        "compradores",
        "customer",
        "customers",
        "clients",
        "buyers",
    ])
});

static PRODUCTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&[
        "producto",
        "productos",
        "inventario",
        "stock",
        "existencias",
        "catalogo",
        "articulos",
        "product",
        "products",
        "inventory",
        "catalog",
    ])
});

static REVENUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&["ingreso", "ingresos", "ganancia", "ganancias", "facturacion", "revenue", "income", "earnings"])
});

// "agrupado por categoria", "por el cliente", "grouped by each product"
static GROUPING_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:agrupad[oa]s?\s+|agrupar\s+|grouped\s+)?(?:por|by)\s+(?:el\s+|la\s+|los\s+|las\s+|cada\s+|the\s+|each\s+)?([a-z]+)",
    )
    .unwrap()
});

const GROUPING_WORDS: &[(&str, Grouping)] = &[
    ("producto", Grouping::Product),
    ("productos", Grouping::Product),
    ("articulo", Grouping::Product),
    ("articulos", Grouping::Product),
    ("item", Grouping::Product),
    ("items", Grouping::Product),
    ("product", Grouping::Product),
    ("products", Grouping::Product),
    ("cliente", Grouping::Customer),
    ("clientes", Grouping::Customer),
    ("usuario", Grouping::Customer),
    ("usuarios", Grouping::Customer),
    ("comprador", Grouping::Customer),
    ("compradores", Grouping::Customer),
    ("customer", Grouping::Customer),
    ("customers", Grouping::Customer),
    ("client", Grouping::Customer),
    ("buyer", Grouping::Customer),
    ("categoria", Grouping::Category),
    ("categorias", Grouping::Category),
    ("tipo", Grouping::Category),
    ("tipos", Grouping::Category),
    ("clase", Grouping::Category),
    ("category", Grouping::Category),
    ("categories", Grouping::Category),
    ("fecha", Grouping::Date),
    ("fechas", Grouping::Date),
    ("dia", Grouping::Date),
    ("dias", Grouping::Date),
    ("date", Grouping::Date),
    ("day", Grouping::Date),
    ("days", Grouping::Date),
];

// === Output Format Tables ===
static PDF_RE: LazyLock<Regex> = LazyLock::new(|| keyword_regex(&["pdf", "documento", "imprimible", "document", "printable"]));

static SPREADSHEET_RE: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&[
        "excel",
        "xls",
        "xlsx",
        "hoja de calculo",
        "hojas de calculo",
        "planilla",
        "spreadsheet",
        "hoja",
        "workbook",
    ])
});

static STRUCTURED_RE: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&["json", "datos estructurados", "structured data", "api", "raw"])
});

// === Filters ===
static LIMIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:top|primer[oa]s?|first|mejores|best)\s+(\d{1,5})\b").unwrap()
});

// "5 productos mas vendidos", "10 menos vendidos"
static RANKED_LIMIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,5})\s+(?:[a-z]+\s+)?(?:mas|menos|most|least)\s+(?:vendid[oa]s?|sold)\b").unwrap()
});

// Rankings by units sold
static MOST_SOLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:mas\s+vendid[oa]s?|mejores|best[\s-]selling|top[\s-]selling|most\s+sold)\b").unwrap()
});

static LEAST_SOLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:menos\s+vendid[oa]s?|peores|worst[\s-]selling|least\s+sold)\b").unwrap()
});

// Rankings by money
static HIGHEST_AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:mayor(?:es)?\s+(?:ingresos?|ventas?|gastos?)|highest(?:\s+(?:revenue|sales|spend(?:ing)?))?)\b").unwrap()
});

static LOWEST_AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:menor(?:es)?\s+(?:ingresos?|ventas?|gastos?)|lowest(?:\s+(?:revenue|sales|spend(?:ing)?))?)\b").unwrap()
});

static CHEAP_RE: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&["barato", "baratos", "barata", "baratas", "economico", "economicos", "economica", "economicas", "cheap", "cheapest", "budget"])
});

static PREMIUM_RE: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&["caro", "caros", "cara", "caras", "premium", "lujo", "luxury", "expensive"])
});

static ON_SALE_RE: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&["oferta", "ofertas", "descuento", "descuentos", "rebajado", "rebajados", "on sale", "discounted"])
});

/// Grouping named after "por"/"by", if any
pub(crate) fn detect_grouping(normalized: &str) -> Option<Grouping> {
    GROUPING_PHRASE_RE.captures_iter(normalized).find_map(|caps| {
        let word = caps.get(1)?.as_str();
        GROUPING_WORDS.iter().find(|(w, _)| *w == word).map(|(_, g)| *g)
    })
}

/// Report type, ignoring words that only appear in a grouping phrase so
/// "ventas por producto" stays a sales report
fn detect_report_type(normalized: &str) -> ReportType {
    let subject = GROUPING_PHRASE_RE.replace_all(normalized, " ");

    if SALES_RE.is_match(&subject) {
        ReportType::Sales
    } else if CUSTOMERS_RE.is_match(&subject) {
        ReportType::Customers
    } else if PRODUCTS_RE.is_match(&subject) {
        ReportType::Products
    } else if REVENUE_RE.is_match(&subject) {
        ReportType::Revenue
    } else {
        ReportType::Sales
    }
}

fn detect_format(normalized: &str) -> OutputFormat {
    if PDF_RE.is_match(normalized) {
        OutputFormat::Pdf
    } else if SPREADSHEET_RE.is_match(normalized) {
        OutputFormat::Spreadsheet
    } else if STRUCTURED_RE.is_match(normalized) {
        OutputFormat::StructuredData
    } else {
        OutputFormat::Onscreen
    }
}

fn detect_filters(normalized: &str) -> ReportFilters {
    let limit = LIMIT_RE
        .captures(normalized)
        .or_else(|| RANKED_LIMIT_RE.captures(normalized))
        .and_then(|caps| caps[1].parse::<usize>().ok())
        .filter(|n| *n > 0);

    let ranking = if MOST_SOLD_RE.is_match(normalized) {
        Some((SortOrder::Descending, SortMetric::Units))
    } else if HIGHEST_AMOUNT_RE.is_match(normalized) {
        Some((SortOrder::Descending, SortMetric::Amount))
    } else if LEAST_SOLD_RE.is_match(normalized) {
        Some((SortOrder::Ascending, SortMetric::Units))
    } else if LOWEST_AMOUNT_RE.is_match(normalized) {
        Some((SortOrder::Ascending, SortMetric::Amount))
    } else {
        None
    };
    let (sort_order, sort_by) = ranking.unzip();

    let price_tier = if CHEAP_RE.is_match(normalized) {
        Some(PriceTier::Cheap)
    } else if PREMIUM_RE.is_match(normalized) {
        Some(PriceTier::Premium)
    } else {
        None
    };

    let on_sale = ON_SALE_RE.is_match(normalized).then_some(true);

    ReportFilters {
        limit,
        sort_order,
        sort_by,
        price_tier,
        on_sale,
    }
}

/// Derives a [`ReportSpecification`] from one request segment
#[derive(Debug, Clone, Copy)]
pub struct IntentExtractor {
    resolver: TemporalResolver,
}

impl IntentExtractor {
    pub fn new(resolver: TemporalResolver) -> Self {
        Self { resolver }
    }

    pub fn extract(&self, text: &str) -> ReportSpecification {
        let normalized = normalize_command(text);

        let report_type = detect_report_type(&normalized);
        let grouping = detect_grouping(&normalized).unwrap_or_else(|| Grouping::default_for(report_type));
        let spec = ReportSpecification {
            report_type,
            period: self.resolver.find(&normalized).unwrap_or_else(Period::unresolved),
            grouping,
            output_format: detect_format(&normalized),
            filters: detect_filters(&normalized),
            raw_text: text.trim().to_string(),
        };

        debug!(
            report_type = %spec.report_type,
            grouping = %spec.grouping,
            format = %spec.output_format,
            period = %spec.period.description,
            "extracted report specification"
        );
        spec
    }
}
