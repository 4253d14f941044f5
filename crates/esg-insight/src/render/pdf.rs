use super::font::FontFace;
use super::layout::{LaidOutPage, PageGeometry, PlacedLine};
use super::RenderError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

const LATIN_RESOURCE: &str = "F1";
const CJK_RESOURCE: &str = "F2";
const CJK_FONT: &str = "STSong-Light";
const EMBEDDED_GLYPH_WIDTH: i64 = 556;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Latin,
    Wide,
}

fn script_of(ch: char) -> Script {
    if ch.is_ascii() {
        Script::Latin
    } else {
        Script::Wide
    }
}

/// Splits a line into maximal single-script runs.
fn runs(text: &str) -> Vec<(Script, String)> {
    let mut runs: Vec<(Script, String)> = Vec::new();
    for ch in text.chars() {
        let script = script_of(ch);
        match runs.last_mut() {
            Some((current, run)) if *current == script => run.push(ch),
            _ => runs.push((script, ch.to_string())),
        }
    }
    runs
}

fn encode_run(script: Script, run: &str) -> Object {
    match script {
        Script::Latin => Object::string_literal(run.as_bytes().to_vec()),
        Script::Wide => {
            let bytes = run
                .encode_utf16()
                .flat_map(|unit| unit.to_be_bytes())
                .collect();
            Object::String(bytes, StringFormat::Hexadecimal)
        }
    }
}

fn line_operations(line: &PlacedLine, operations: &mut Vec<Operation>) {
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new("Td", vec![line.x.into(), line.y.into()]));
    for (script, run) in runs(&line.text) {
        let resource = match script {
            Script::Latin => LATIN_RESOURCE,
            Script::Wide => CJK_RESOURCE,
        };
        operations.push(Operation::new("Tf", vec![resource.into(), line.size.into()]));
        operations.push(Operation::new("Tj", vec![encode_run(script, &run)]));
    }
    operations.push(Operation::new("ET", vec![]));
}

fn latin_font(document: &mut Document, face: &FontFace) -> ObjectId {
    match face {
        FontFace::Builtin => document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => FontFace::BUILTIN_NAME,
            "Encoding" => "WinAnsiEncoding",
        }),
        FontFace::Embedded { name, bytes } => {
            let program = document.add_object(Stream::new(
                dictionary! { "Length1" => bytes.len() as i64 },
                bytes.to_vec(),
            ));
            let base_font = Object::Name(name.as_bytes().to_vec());
            let bbox: Vec<Object> = vec![(-550).into(), (-300).into(), 2000.into(), 1000.into()];
            let descriptor = document.add_object(dictionary! {
                "Type" => "FontDescriptor",
                "FontName" => base_font.clone(),
                "Flags" => 32,
                "FontBBox" => bbox,
                "ItalicAngle" => 0,
                "Ascent" => 900,
                "Descent" => -200,
                "CapHeight" => 700,
                "StemV" => 80,
                "FontFile2" => program,
            });
            let widths: Vec<Object> = (32..=255).map(|_| EMBEDDED_GLYPH_WIDTH.into()).collect();
            document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "TrueType",
                "BaseFont" => base_font,
                "FirstChar" => 32,
                "LastChar" => 255,
                "Widths" => widths,
                "FontDescriptor" => descriptor,
                "Encoding" => "WinAnsiEncoding",
            })
        }
    }
}

/// Predefined Adobe-GB1 font; readers supply the glyphs, nothing is embedded.
fn cjk_font(document: &mut Document) -> ObjectId {
    let bbox: Vec<Object> = vec![(-25).into(), (-254).into(), 1000.into(), 880.into()];
    let descriptor = document.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => CJK_FONT,
        "Flags" => 6,
        "FontBBox" => bbox,
        "ItalicAngle" => 0,
        "Ascent" => 880,
        "Descent" => -120,
        "CapHeight" => 880,
        "StemV" => 93,
    });
    let descendant = document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType0",
        "BaseFont" => CJK_FONT,
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("GB1"),
            "Supplement" => 2,
        },
        "FontDescriptor" => descriptor,
        "DW" => 1000,
    });
    document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => CJK_FONT,
        "Encoding" => "UniGB-UCS2-H",
        "DescendantFonts" => vec![Object::Reference(descendant)],
    })
}

/// Serializes laid-out pages into PDF bytes.
pub(crate) fn write_pdf(
    pages: &[LaidOutPage],
    geometry: PageGeometry,
    face: &FontFace,
) -> Result<Vec<u8>, RenderError> {
    if pages.is_empty() {
        return Err(RenderError::NoPages);
    }

    let mut document = Document::with_version("1.5");
    let pages_id = document.new_object_id();
    let latin = latin_font(&mut document, face);
    let cjk = cjk_font(&mut document);
    let resources = document.add_object(dictionary! {
        "Font" => dictionary! {
            LATIN_RESOURCE => latin,
            CJK_RESOURCE => cjk,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let mut operations = Vec::new();
        for line in &page.lines {
            line_operations(line, &mut operations);
        }
        let encoded = Content { operations }
            .encode()
            .map_err(|err| RenderError::Pdf(err.to_string()))?;
        let contents = document.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => contents,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let media_box: Vec<Object> = vec![0.into(), 0.into(), geometry.width.into(), geometry.height.into()];
    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources,
            "MediaBox" => media_box,
        }),
    );
    let catalog = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog);
    document.compress();

    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|err| RenderError::Pdf(err.to_string()))?;
    Ok(bytes)
}
