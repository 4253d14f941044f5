use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Title,
    Section,
    SubHeading,
    Body,
    ListItem,
    Spacer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

impl Block {
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn spacer() -> Self {
        Self::new(BlockKind::Spacer, "")
    }
}

/// Block-tagged narrative document handed from synthesis to rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub title: String,
    /// Identity lines kept apart from the body so degraded renderers can
    /// still print who the report is about.
    pub company_name: String,
    pub company_code: String,
    blocks: Vec<Block>,
}

impl Report {
    pub fn new(
        title: impl Into<String>,
        company_name: impl Into<String>,
        company_code: impl Into<String>,
    ) -> Self {
        let title = title.into();
        Self {
            blocks: vec![Block::new(BlockKind::Title, title.clone())],
            title,
            company_name: company_name.into(),
            company_code: company_code.into(),
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn push(&mut self, kind: BlockKind, text: impl Into<String>) -> &mut Self {
        self.blocks.push(Block::new(kind, text));
        self
    }

    pub fn section(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(BlockKind::Section, text)
    }

    pub fn sub_heading(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(BlockKind::SubHeading, text)
    }

    pub fn body(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(BlockKind::Body, text)
    }

    pub fn item(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(BlockKind::ListItem, text)
    }

    pub fn spacer(&mut self) -> &mut Self {
        self.blocks.push(Block::spacer());
        self
    }

    /// Blocks from the section whose heading starts with `prefix` up to the
    /// next section.
    pub fn section_blocks(&self, prefix: &str) -> &[Block] {
        let Some(start) = self
            .blocks
            .iter()
            .position(|block| block.kind == BlockKind::Section && block.text.starts_with(prefix))
        else {
            return &[];
        };
        let end = self.blocks[start + 1..]
            .iter()
            .position(|block| block.kind == BlockKind::Section)
            .map_or(self.blocks.len(), |offset| start + 1 + offset);
        &self.blocks[start..end]
    }

    pub fn section_text(&self, prefix: &str) -> String {
        self.section_blocks(prefix)
            .iter()
            .map(|block| block.text.as_str())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Applies `clean` to every piece of text in the report.
    pub fn map_text<F>(mut self, clean: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        self.title = clean(&self.title);
        self.company_name = clean(&self.company_name);
        self.company_code = clean(&self.company_code);
        for block in &mut self.blocks {
            block.text = clean(&block.text);
        }
        self
    }
}
