use std::collections::BTreeMap;

use engine_logging::{engine_debug, engine_warn};
use lopdf::{Document, Encoding, Object, ObjectId};

/// Horizontal adjustment inside a `TJ` array (thousandths of an em) wide
/// enough to read as a word gap.
const WORD_GAP: f32 = -100.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("document could not be parsed: {0}")]
    Corrupt(String),
    #[error("document has no pages")]
    NoPages,
    #[error("failed to read text on page {page}: {message}")]
    Page { page: u32, message: String },
    #[error("extraction aborted: {0}")]
    Aborted(String),
}

pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Page-walking PDF text extractor.
///
/// Pages are visited in order. Every text-showing operation (`Tj`, `TJ`, `'`,
/// `"`) is one run; a page's runs are joined by a single space and pages are
/// concatenated without a separator.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let document =
            Document::load_mem(bytes).map_err(|err| ExtractError::Corrupt(err.to_string()))?;
        let pages = document.get_pages();
        if pages.is_empty() {
            return Err(ExtractError::NoPages);
        }

        let mut text = String::new();
        for (&page, &page_id) in &pages {
            let runs = page_runs(&document, page_id).map_err(|err| ExtractError::Page {
                page,
                message: err.to_string(),
            })?;
            engine_debug!("Page {} yielded {} text runs", page, runs.len());
            text.push_str(&join_runs(&runs));
        }
        Ok(text)
    }
}

fn page_runs(document: &Document, page_id: ObjectId) -> lopdf::Result<Vec<String>> {
    let encodings: BTreeMap<Vec<u8>, Encoding> = document
        .get_page_fonts(page_id)?
        .into_iter()
        .filter_map(|(name, font)| match font.get_font_encoding(document) {
            Ok(encoding) => Some((name, encoding)),
            Err(err) => {
                engine_warn!(
                    "Skipping font {} with unsupported encoding: {}",
                    String::from_utf8_lossy(&name),
                    err
                );
                None
            }
        })
        .collect();

    let content = document.get_and_decode_page_content(page_id)?;
    let mut current: Option<&Encoding> = None;
    let mut runs = Vec::new();
    for operation in &content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                current = operation
                    .operands
                    .first()
                    .and_then(|font| font.as_name().ok())
                    .and_then(|font| encodings.get(font));
            }
            "Tj" | "'" | "\"" | "TJ" => {
                let Some(encoding) = current else {
                    engine_warn!("Text shown without a decodable font; run skipped");
                    continue;
                };
                // `'` and `"` carry spacing operands ahead of the string.
                if let Some(operand) = operation.operands.last() {
                    let mut run = String::new();
                    decode_operand(&mut run, encoding, operand)?;
                    runs.push(run);
                }
            }
            _ => {}
        }
    }
    Ok(runs)
}

fn decode_operand(run: &mut String, encoding: &Encoding, operand: &Object) -> lopdf::Result<()> {
    match operand {
        Object::String(bytes, _) => run.push_str(&Document::decode_text(encoding, bytes)?),
        Object::Array(items) => {
            for item in items {
                match item {
                    Object::Integer(_) | Object::Real(_) => {
                        if item.as_float().is_ok_and(|gap| gap < WORD_GAP) {
                            run.push(' ');
                        }
                    }
                    other => decode_operand(run, encoding, other)?,
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn join_runs(runs: &[String]) -> String {
    runs.iter()
        .map(|run| run.trim())
        .filter(|run| !run.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
