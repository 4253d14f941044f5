use crate::analytics::{analyze, AnalyticsResult, EsgSeries};
use crate::config::EsgConfig;
use crate::dataset::{normalize, DatasetSource, LoadError, NormalizedDataset, Record};
use crate::render::{FontResolver, PaginatedDocument, RenderLayer, ReportRenderer};
use crate::report::{synthesize, Block, Report};
use crate::resolver::{resolve, search};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct ObservationView {
    pub year: i32,
    pub rating: String,
    pub rating_value: u8,
    pub score: i64,
    pub band_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsLabels {
    pub tier: &'static str,
    pub trend: &'static str,
    pub comparison: &'static str,
    pub rating_stability: &'static str,
}

/// JSON-friendly view of one company's analytics and narrative.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyReport {
    pub company: Record,
    pub series: Vec<ObservationView>,
    pub analytics: AnalyticsResult,
    pub labels: AnalyticsLabels,
    pub expected_uplift: f64,
    pub title: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone)]
pub struct PdfExport {
    pub file_name: String,
    pub document: PaginatedDocument,
}

impl PdfExport {
    pub fn layer(&self) -> RenderLayer {
        self.document.layer
    }
}

/// Dataset plus renderer: everything a front end needs to answer queries.
#[derive(Debug)]
pub struct EsgReportService {
    dataset: NormalizedDataset,
    renderer: ReportRenderer,
    source: DatasetSource,
}

impl EsgReportService {
    pub fn new(
        dataset: NormalizedDataset,
        renderer: ReportRenderer,
        source: DatasetSource,
    ) -> Result<Self, LoadError> {
        if dataset.table.is_empty() {
            return Err(LoadError::NoCompanies);
        }
        Ok(Self {
            dataset,
            renderer,
            source,
        })
    }

    /// Loads, normalizes and probes fonts in one go.
    pub fn from_config(config: &EsgConfig) -> Result<Self, LoadError> {
        let schema = config.schema();
        let (raw, source) = DatasetSource::discover(config.data_path.as_deref(), &schema)?;
        let dataset = normalize(&raw, &schema);
        let face = FontResolver::probe(&config.font_candidates());
        info!(
            source = %source.label(),
            companies = dataset.table.len(),
            font = face.name(),
            "ESG report service ready"
        );
        Self::new(dataset, ReportRenderer::new(face), source)
    }

    pub fn dataset(&self) -> &NormalizedDataset {
        &self.dataset
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// Display keys in listing order.
    pub fn display_keys(&self) -> Vec<String> {
        self.dataset.table.sorted_display_keys()
    }

    pub fn search(&self, query: &str) -> Vec<String> {
        search(query, &self.display_keys())
    }

    fn record(&self, selection: &str) -> Result<&Record, LoadError> {
        resolve(selection, &self.dataset.table).ok_or(LoadError::NoCompanies)
    }

    fn build(&self, selection: &str) -> Result<(&Record, EsgSeries, AnalyticsResult, Report), LoadError> {
        let record = self.record(selection)?;
        let (series, analytics) = analyze(record, &self.dataset);
        let report = synthesize(record, &analytics, &series);
        Ok((record, series, analytics, report))
    }

    pub fn company_report(&self, selection: &str) -> Result<CompanyReport, LoadError> {
        let (record, series, analytics, report) = self.build(selection)?;

        let series = series
            .observations()
            .iter()
            .map(|observation| ObservationView {
                year: observation.year,
                rating: observation.rating.clone(),
                rating_value: observation.rating_value(),
                score: observation.score,
                band_label: observation.band().label(),
            })
            .collect();
        let labels = AnalyticsLabels {
            tier: analytics.tier.label(),
            trend: analytics.trend.direction.label(),
            comparison: analytics.comparison().label(),
            rating_stability: analytics.ratings.stability.label(),
        };

        Ok(CompanyReport {
            company: record.clone(),
            series,
            expected_uplift: analytics.expected_uplift(),
            analytics,
            labels,
            title: report.title.clone(),
            blocks: report.blocks().to_vec(),
        })
    }

    pub fn export_pdf(&self, selection: &str) -> Result<PdfExport, LoadError> {
        let (record, _, _, report) = self.build(selection)?;
        let document = self.renderer.render(&report);
        info!(
            code = %record.code,
            layer = document.layer.label(),
            pages = document.page_count,
            "report exported"
        );
        Ok(PdfExport {
            file_name: format!("{}_ESG_report.pdf", record.code),
            document,
        })
    }
}
