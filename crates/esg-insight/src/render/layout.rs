use crate::report::BlockKind;

/// A4 in PDF points, rounded.
pub const A4_SHORT: i64 = 595;
pub const A4_LONG: i64 = 842;
pub const MARGIN: i64 = 36;

const LATIN_ADVANCE: f64 = 0.6;
const WIDE_ADVANCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub width: i64,
    pub height: i64,
    pub margin: i64,
}

impl PageGeometry {
    pub const fn landscape_a4() -> Self {
        Self {
            width: A4_LONG,
            height: A4_SHORT,
            margin: MARGIN,
        }
    }

    pub const fn portrait_a4() -> Self {
        Self {
            width: A4_SHORT,
            height: A4_LONG,
            margin: MARGIN,
        }
    }

    pub const fn text_width(&self) -> i64 {
        self.width - 2 * self.margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub size: i64,
    pub leading: i64,
    pub indent: i64,
    pub space_before: i64,
    pub centered: bool,
}

impl TextStyle {
    const fn plain(size: i64, leading: i64) -> Self {
        Self {
            size,
            leading,
            indent: 0,
            space_before: 0,
            centered: false,
        }
    }

    /// Default style of the minimal fallback document.
    pub const fn minimal() -> Self {
        Self::plain(12, 18)
    }
}

pub const fn style_for(kind: BlockKind) -> TextStyle {
    match kind {
        BlockKind::Title => TextStyle {
            centered: true,
            space_before: 0,
            ..TextStyle::plain(20, 28)
        },
        BlockKind::Section => TextStyle {
            space_before: 10,
            ..TextStyle::plain(16, 22)
        },
        BlockKind::SubHeading => TextStyle {
            space_before: 6,
            ..TextStyle::plain(14, 19)
        },
        BlockKind::Body => TextStyle::plain(10, 14),
        BlockKind::ListItem => TextStyle {
            indent: 18,
            ..TextStyle::plain(10, 14)
        },
        BlockKind::Spacer => TextStyle::plain(10, 10),
    }
}

fn is_wide(ch: char) -> bool {
    !ch.is_ascii()
}

fn char_width(ch: char, size: i64) -> f64 {
    let advance = if is_wide(ch) {
        WIDE_ADVANCE
    } else {
        LATIN_ADVANCE
    };
    advance * size as f64
}

/// Approximate rendered width. Overestimates Latin text slightly so wrapped
/// lines never run into the margin.
pub fn text_width(text: &str, size: i64) -> f64 {
    text.chars().map(|ch| char_width(ch, size)).sum()
}

/// Greedy line breaking. Latin words break at whitespace; CJK text and
/// over-long words break between characters.
pub fn wrap(text: &str, size: i64, max_width: i64) -> Vec<String> {
    let max_width = max_width.max(size) as f64;
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0.0;

    for word in text.split_whitespace() {
        let word_width = text_width(word, size);
        let gap = if line.is_empty() {
            0.0
        } else {
            char_width(' ', size)
        };

        if line_width + gap + word_width <= max_width {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
            line_width += gap + word_width;
            continue;
        }

        let breakable = word.chars().any(is_wide) || word_width > max_width;
        if !breakable {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            line.push_str(word);
            line_width = word_width;
            continue;
        }

        if !line.is_empty() {
            line.push(' ');
            line_width += gap;
        }
        for ch in word.chars() {
            let width = char_width(ch, size);
            if line_width + width > max_width && !line.trim().is_empty() {
                lines.push(line.trim_end().to_string());
                line.clear();
                line_width = 0.0;
            }
            line.push(ch);
            line_width += width;
        }
    }

    if !line.trim().is_empty() {
        lines.push(line.trim_end().to_string());
    }
    lines
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    pub x: i64,
    pub y: i64,
    pub size: i64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaidOutPage {
    pub lines: Vec<PlacedLine>,
}

/// Top-down cursor over a sequence of pages.
#[derive(Debug)]
pub struct PageLayout {
    geometry: PageGeometry,
    pages: Vec<LaidOutPage>,
    cursor: i64,
}

impl PageLayout {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![LaidOutPage::default()],
            cursor: geometry.height - geometry.margin,
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    fn at_page_top(&self) -> bool {
        self.cursor == self.geometry.height - self.geometry.margin
    }

    pub fn start_page(&mut self) {
        let current_is_blank = self
            .pages
            .last()
            .map_or(false, |page| page.lines.is_empty());
        if !current_is_blank {
            self.pages.push(LaidOutPage::default());
        }
        self.cursor = self.geometry.height - self.geometry.margin;
    }

    /// Vertical gap; dropped at the top of a page.
    pub fn skip(&mut self, amount: i64) {
        if self.at_page_top() {
            return;
        }
        if self.cursor - amount < self.geometry.margin {
            self.start_page();
        } else {
            self.cursor -= amount;
        }
    }

    pub fn push_text(&mut self, style: TextStyle, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.skip(style.space_before);

        let available = self.geometry.text_width() - style.indent;
        for line in wrap(text, style.size, available) {
            if self.cursor - style.leading < self.geometry.margin {
                self.start_page();
            }
            let x = if style.centered {
                let width = text_width(&line, style.size).ceil() as i64;
                self.geometry.margin + ((self.geometry.text_width() - width) / 2).max(0)
            } else {
                self.geometry.margin + style.indent
            };
            let y = self.cursor - style.size;
            self.current_page().lines.push(PlacedLine {
                x,
                y,
                size: style.size,
                text: line,
            });
            self.cursor -= style.leading;
        }
    }

    fn current_page(&mut self) -> &mut LaidOutPage {
        if self.pages.is_empty() {
            self.pages.push(LaidOutPage::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn finish(mut self) -> Vec<LaidOutPage> {
        if self.pages.len() > 1 && self.pages.last().map_or(false, |page| page.lines.is_empty()) {
            self.pages.pop();
        }
        self.pages
    }
}
