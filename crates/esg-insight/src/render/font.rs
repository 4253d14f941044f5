use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_FONT_CANDIDATES: [&str; 3] = [
    "C:/Windows/Fonts/simhei.ttf",
    "/System/Library/Fonts/PingFang.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];

const TRUETYPE_MAGIC: [[u8; 4]; 2] = [[0x00, 0x01, 0x00, 0x00], *b"true"];

/// Latin face used by the styled renderer. CJK runs always go through the
/// predefined CID font and never depend on this choice.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum FontFace {
    Embedded { name: String, bytes: Arc<Vec<u8>> },
    #[default]
    Builtin,
}

impl FontFace {
    pub const BUILTIN_NAME: &'static str = "Helvetica";

    pub fn name(&self) -> &str {
        match self {
            Self::Embedded { name, .. } => name,
            Self::Builtin => Self::BUILTIN_NAME,
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded { .. })
    }
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded { name, bytes } => f
                .debug_struct("Embedded")
                .field("name", name)
                .field("bytes", &bytes.len())
                .finish(),
            Self::Builtin => f.write_str("Builtin"),
        }
    }
}

pub struct FontResolver;

impl FontResolver {
    pub fn default_candidates() -> Vec<PathBuf> {
        DEFAULT_FONT_CANDIDATES.iter().map(PathBuf::from).collect()
    }

    /// Returns the first candidate that reads as a single TrueType font.
    /// Collections (`.ttc`) and CFF-flavoured OpenType files are skipped since
    /// they cannot be embedded as a plain TrueType program.
    pub fn probe(candidates: &[PathBuf]) -> FontFace {
        for path in candidates {
            match load_truetype(path) {
                Some(bytes) => {
                    let name = font_name(path);
                    info!(font = %name, path = %path.display(), "embedding font");
                    return FontFace::Embedded {
                        name,
                        bytes: Arc::new(bytes),
                    };
                }
                None => debug!(path = %path.display(), "font candidate unusable"),
            }
        }
        info!("no usable font file found; using builtin Helvetica");
        FontFace::Builtin
    }
}

fn load_truetype(path: &Path) -> Option<Vec<u8>> {
    let bytes = fs::read(path).ok()?;
    let magic = bytes.get(..4)?;
    TRUETYPE_MAGIC
        .iter()
        .any(|candidate| candidate.as_slice() == magic)
        .then_some(bytes)
}

/// PDF name derived from the file stem, restricted to ASCII alphanumerics.
fn font_name(path: &Path) -> String {
    let stem: String = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    if stem.is_empty() {
        "EmbeddedFont".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn font_file(header: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(header).expect("write header");
        file.write_all(&[0; 64]).expect("write body");
        file
    }

    #[test]
    fn missing_candidates_fall_back_to_builtin() {
        let face = FontResolver::probe(&[PathBuf::from("/nonexistent/font.ttf")]);
        assert_eq!(face, FontFace::Builtin);
        assert_eq!(face.name(), "Helvetica");
    }

    #[test]
    fn first_truetype_candidate_wins() {
        let collection = font_file(b"ttcf");
        let truetype = font_file(&[0x00, 0x01, 0x00, 0x00]);
        let face = FontResolver::probe(&[
            PathBuf::from("/nonexistent/font.ttf"),
            collection.path().to_path_buf(),
            truetype.path().to_path_buf(),
        ]);

        assert!(face.is_embedded());
        assert!(face.name().chars().all(|ch| ch.is_ascii_alphanumeric()));
    }

    #[test]
    fn font_names_are_pdf_safe() {
        assert_eq!(font_name(Path::new("/fonts/Deja Vu-Sans.ttf")), "DejaVuSans");
        assert_eq!(font_name(Path::new("/fonts/黑体.ttf")), "EmbeddedFont");
    }
}
