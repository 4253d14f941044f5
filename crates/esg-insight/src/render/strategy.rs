use super::font::FontFace;
use super::layout::{style_for, PageGeometry, PageLayout, TextStyle};
use super::pdf::write_pdf;
use super::{PaginatedDocument, RenderError, RenderLayer};
use crate::report::{BlockKind, Report, ADVISORY_LINES};
use chrono::Local;

/// One rung of the rendering cascade.
pub trait RenderStrategy: Send + Sync {
    fn layer(&self) -> RenderLayer;

    fn render(&self, report: &Report, face: &FontFace) -> Result<PaginatedDocument, RenderError>;
}

/// Full report: styled blocks on landscape A4 plus a trailing timestamp page.
#[derive(Debug, Default, Clone, Copy)]
pub struct StyledLayout;

impl StyledLayout {
    fn lay_out(report: &Report, generated_at: &str) -> PageLayout {
        let mut layout = PageLayout::new(PageGeometry::landscape_a4());
        for block in report.blocks() {
            let style = style_for(block.kind);
            match block.kind {
                BlockKind::Spacer => layout.skip(style.leading),
                BlockKind::ListItem => layout.push_text(style, &format!("- {}", block.text)),
                _ => layout.push_text(style, &block.text),
            }
        }

        layout.start_page();
        layout.push_text(
            style_for(BlockKind::Body),
            &format!("Report generated at {generated_at}"),
        );
        layout
    }
}

impl RenderStrategy for StyledLayout {
    fn layer(&self) -> RenderLayer {
        RenderLayer::Styled
    }

    fn render(&self, report: &Report, face: &FontFace) -> Result<PaginatedDocument, RenderError> {
        let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let layout = Self::lay_out(report, &generated_at);
        let geometry = layout.geometry();
        let pages = layout.finish();
        let bytes = write_pdf(&pages, geometry, face)?;
        Ok(PaginatedDocument {
            bytes,
            layer: self.layer(),
            page_count: pages.len(),
        })
    }
}

/// Degraded single page: identity lines and fixed advice in one plain style.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinimalLayout;

impl MinimalLayout {
    fn lay_out(report: &Report) -> PageLayout {
        let style = TextStyle::minimal();
        let mut layout = PageLayout::new(PageGeometry::portrait_a4());
        layout.push_text(style, &report.title);
        layout.push_text(style, &format!("Stock code: {}", report.company_code));
        layout.skip(style.leading);
        for line in ADVISORY_LINES {
            layout.push_text(style, line);
        }
        layout
    }
}

impl RenderStrategy for MinimalLayout {
    fn layer(&self) -> RenderLayer {
        RenderLayer::Minimal
    }

    fn render(&self, report: &Report, _face: &FontFace) -> Result<PaginatedDocument, RenderError> {
        let layout = Self::lay_out(report);
        let geometry = layout.geometry();
        let pages = layout.finish();
        // builtin face only: the embedded program is the likeliest thing to
        // have broken the styled layer
        let bytes = write_pdf(&pages, geometry, &FontFace::Builtin)?;
        Ok(PaginatedDocument {
            bytes,
            layer: self.layer(),
            page_count: pages.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::text_width;

    fn report() -> Report {
        let mut report = Report::new("Alpha(000001) Report", "Alpha", "000001");
        report
            .section("1. Company Profile")
            .item("Industry: 金融")
            .spacer()
            .section("2. Comprehensive ESG Assessment")
            .body("Average score 4.7");
        report
    }

    #[test]
    fn styled_layout_appends_timestamp_page() {
        let pages = StyledLayout::lay_out(&report(), "2024-01-01 00:00:00").finish();
        assert_eq!(pages.len(), 2);
        let last = &pages[pages.len() - 1];
        assert_eq!(last.lines.len(), 1);
        assert!(last.lines[0].text.ends_with("2024-01-01 00:00:00"));
        assert!(pages[0]
            .lines
            .iter()
            .any(|line| line.text == "- Industry: 金融"));
    }

    #[test]
    fn minimal_layout_is_one_portrait_page() {
        let layout = MinimalLayout::lay_out(&report());
        assert_eq!(layout.geometry(), PageGeometry::portrait_a4());
        let pages = layout.finish();
        assert_eq!(pages.len(), 1);
        let texts: Vec<&str> = pages[0].lines.iter().map(|line| line.text.as_str()).collect();
        assert_eq!(texts[0], "Alpha(000001) Report");
        assert_eq!(texts[1], "Stock code: 000001");
        // long advisory sentences wrap onto several lines
        let joined = texts.join(" ");
        for line in ADVISORY_LINES {
            assert!(joined.contains(line), "missing advisory line: {line}");
        }
        let max_width = PageGeometry::portrait_a4().text_width() as f64;
        for line in &pages[0].lines {
            assert_eq!(line.size, 12);
            assert!(text_width(&line.text, 12) <= max_width + 1e-6, "overflows: {}", line.text);
        }
    }

    #[test]
    fn strategies_tag_their_layer() {
        let document = MinimalLayout
            .render(&report(), &FontFace::Builtin)
            .expect("minimal render");
        assert_eq!(document.layer, RenderLayer::Minimal);
        assert_eq!(document.page_count, 1);
    }
}
