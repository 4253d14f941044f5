pub mod analytics;
pub mod config;
pub mod dataset;
pub mod error;
pub mod render;
pub mod report;
pub mod resolver;
pub mod service;
pub mod telemetry;

pub use analytics::{analyze, AnalyticsResult, EsgObservation, EsgSeries};
pub use dataset::{normalize, NormalizedDataset, RawTable, Record, SchemaConfig, Table};
pub use error::AppError;
pub use render::{FontFace, FontResolver, PaginatedDocument, RenderLayer, ReportRenderer};
pub use report::{synthesize, Block, BlockKind, Report};
pub use resolver::{resolve, search, NO_MATCH};
pub use service::{CompanyReport, EsgReportService, PdfExport};
