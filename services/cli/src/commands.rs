use clap::Args;
use esg_insight::config::AppConfig;
use esg_insight::error::AppError;
use esg_insight::telemetry;
use esg_insight::{CompanyReport, EsgReportService};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Case-insensitive fragment of a company name, code or industry
    #[arg(default_value = "")]
    pub(crate) query: String,
    /// ESG export to load instead of the configured or probed one
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Display key, company name or anything containing "(code)"
    pub(crate) selection: String,
    /// ESG export to load instead of the configured or probed one
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Where to write the PDF (defaults to <code>_ESG_report.pdf)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Print the analytics as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

fn load_service(data: Option<PathBuf>) -> Result<EsgReportService, AppError> {
    let mut config = AppConfig::load()?;
    if data.is_some() {
        config.esg.data_path = data;
    }
    telemetry::init(&config.telemetry)?;
    Ok(EsgReportService::from_config(&config.esg)?)
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let service = load_service(args.data)?;
    for key in service.search(&args.query) {
        println!("{key}");
    }
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        selection,
        data,
        output,
        json,
    } = args;

    let service = load_service(data)?;
    let report = service.company_report(&selection)?;
    if json {
        let body = serde_json::to_string_pretty(&report)?;
        println!("{body}");
    } else {
        write_summary(&mut io::stdout().lock(), &report)?;
    }

    let export = service.export_pdf(&selection)?;
    let path = output.unwrap_or_else(|| PathBuf::from(&export.file_name));
    std::fs::write(&path, &export.document.bytes)?;
    eprintln!(
        "PDF written to {} ({} layer, {} pages)",
        path.display(),
        export.layer().label(),
        export.document.page_count
    );
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, report: &CompanyReport) -> io::Result<()> {
    let company = &report.company;
    let analytics = &report.analytics;
    let summary = &analytics.summary;
    let benchmark = &analytics.benchmark;

    writeln!(out, "{}", report.title)?;
    writeln!(
        out,
        "Company: {} ({}) | {} | listed {}",
        company.name, company.code, company.industry, company.listing_date
    )?;
    if analytics.placeholder_series {
        writeln!(out, "No usable yearly data; showing reference series")?;
    }
    writeln!(out, "Yearly ratings:")?;
    for observation in &report.series {
        writeln!(
            out,
            "  {}  {:<4} score {}  {}",
            observation.year, observation.rating, observation.score, observation.band_label
        )?;
    }
    writeln!(
        out,
        "Average {:.2} | tier {} | trend {} (slope {:.2})",
        summary.average, report.labels.tier, report.labels.trend, analytics.trend.slope
    )?;
    writeln!(
        out,
        "Industry {} average {:.2} in {} | company is {} it",
        company.industry, benchmark.mean, benchmark.year, report.labels.comparison
    )?;
    writeln!(
        out,
        "Dominant rating {} ({}x) | latest {} | {}",
        analytics.ratings.dominant,
        analytics.ratings.dominant_count,
        analytics.ratings.latest,
        report.labels.rating_stability
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use esg_insight::dataset::{sample_table, DatasetSource};
    use esg_insight::{normalize, FontFace, ReportRenderer, SchemaConfig};

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sample_service() -> EsgReportService {
        let schema = SchemaConfig::default();
        EsgReportService::new(
            normalize(&sample_table(&schema), &schema),
            ReportRenderer::new(FontFace::Builtin),
            DatasetSource::Sample,
        )
        .expect("service")
    }

    #[test]
    fn summary_lists_every_year() {
        let service = sample_service();
        let report = service.company_report("贵州茅台").expect("report");
        let mut buffer = Vec::new();
        write_summary(&mut buffer, &report).expect("summary writes");
        let text = String::from_utf8(buffer).expect("utf-8 summary");

        assert!(text.starts_with("贵州茅台(000003)"));
        for year in 2015..=2020 {
            assert!(text.contains(&format!("  {year}  ")));
        }
        assert!(text.contains(report.labels.tier));
    }

    #[test]
    fn summary_write_errors_propagate() {
        let report = sample_service().company_report("(000001)").expect("report");
        let error = write_summary(&mut ClosedPipe, &report).expect_err("pipe is closed");
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
    }
}
