pub mod pipeline;
pub mod query;
pub mod render;
pub mod types;

pub use pipeline::{PipelineSettings, ReportOutcome, ReportPipeline, ReportRequest};
pub use query::{PriceTiers, QueryBuilder};
pub use render::{Artifact, Renderer, ResultPayload};
pub use types::{CellValue, Row, TabularResult, column_key};
