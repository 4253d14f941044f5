use esg_insight::dataset::{sample_table, NormalizedDataset, Table};
use esg_insight::render::{
    MinimalLayout, PaginatedDocument, RenderError, RenderLayer, RenderStrategy, StyledLayout,
};
use esg_insight::{
    analyze, normalize, synthesize, FontFace, Record, Report, ReportRenderer, SchemaConfig,
};
use lopdf::Document;

struct AlwaysFails;

impl RenderStrategy for AlwaysFails {
    fn layer(&self) -> RenderLayer {
        RenderLayer::Styled
    }

    fn render(&self, _: &Report, _: &FontFace) -> Result<PaginatedDocument, RenderError> {
        Err(RenderError::Pdf("forced".to_string()))
    }
}

struct AlwaysPanics(RenderLayer);

impl RenderStrategy for AlwaysPanics {
    fn layer(&self) -> RenderLayer {
        self.0
    }

    fn render(&self, _: &Report, _: &FontFace) -> Result<PaginatedDocument, RenderError> {
        panic!("forced panic in {} layer", self.0.label())
    }
}

fn page_count(document: &PaginatedDocument) -> usize {
    assert!(!document.bytes.is_empty());
    let reloaded = Document::load_mem(&document.bytes).expect("rendered bytes are a valid pdf");
    reloaded.get_pages().len()
}

fn sample_report(selection_code: &str) -> Report {
    let schema = SchemaConfig::default();
    let dataset = normalize(&sample_table(&schema), &schema);
    let record = dataset
        .table
        .records()
        .iter()
        .find(|record| record.code == selection_code)
        .expect("sample company")
        .clone();
    let (series, analytics) = analyze(&record, &dataset);
    synthesize(&record, &analytics, &series)
}

fn empty_report() -> Report {
    let dataset = NormalizedDataset {
        table: Table::new(Vec::new(), Vec::new()),
        years: (2015..=2020).collect(),
        rating_columns: Vec::new(),
        score_columns: Vec::new(),
    };
    let record = Record::new("", "", "", "");
    let (series, analytics) = analyze(&record, &dataset);
    assert!(analytics.placeholder_series);
    synthesize(&record, &analytics, &series)
}

#[test]
fn styled_report_is_valid_multi_page_pdf() {
    let renderer = ReportRenderer::new(FontFace::Builtin);
    let document = renderer.render(&sample_report("000001"));

    assert_eq!(document.layer, RenderLayer::Styled);
    assert!(document.page_count >= 2);
    assert_eq!(page_count(&document), document.page_count);
}

#[test]
fn empty_record_still_renders() {
    let document = ReportRenderer::new(FontFace::Builtin).render(&empty_report());
    assert_eq!(document.layer, RenderLayer::Styled);
    assert_eq!(page_count(&document), document.page_count);
}

#[test]
fn styled_failure_degrades_to_minimal_page() {
    let renderer = ReportRenderer::with_strategies(
        FontFace::Builtin,
        vec![Box::new(AlwaysFails), Box::new(MinimalLayout)],
    );
    let document = renderer.render(&sample_report("000003"));

    assert_eq!(document.layer, RenderLayer::Minimal);
    assert_eq!(page_count(&document), 1);
}

#[test]
fn panicking_layers_end_in_blank_page() {
    let renderer = ReportRenderer::with_strategies(
        FontFace::Builtin,
        vec![
            Box::new(AlwaysPanics(RenderLayer::Styled)),
            Box::new(AlwaysPanics(RenderLayer::Minimal)),
        ],
    );
    let document = renderer.render(&empty_report());

    assert_eq!(document.layer, RenderLayer::Blank);
    assert_eq!(page_count(&document), 1);
}

#[test]
fn empty_cascade_returns_blank_page() {
    let renderer = ReportRenderer::with_strategies(FontFace::Builtin, Vec::new());
    let document = renderer.render(&sample_report("000002"));
    assert_eq!(document.layer, RenderLayer::Blank);
    assert_eq!(page_count(&document), 1);
}

#[test]
fn unshapeable_text_is_dropped_before_layout() {
    let mut report = Report::new("★ Alpha(000009) 📊", "Alpha", "000009");
    report.section("1. Company Profile").body("Industry: テスト 金融");

    let renderer = ReportRenderer::with_strategies(FontFace::Builtin, vec![Box::new(StyledLayout)]);
    let document = renderer.render(&report);
    assert_eq!(document.layer, RenderLayer::Styled);
    assert_eq!(page_count(&document), 2);
}
