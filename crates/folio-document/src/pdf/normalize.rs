// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Post-save fixups applied with `lopdf` to the bytes printpdf produces.
//
// printpdf writes built-in font text as UTF-8 although the fonts are declared
// WinAnsiEncoding, and stamps the trailer with a random /ID. Both are rewritten
// here: show-text operands become one byte per character, and the /ID becomes
// a SHA-256 digest of the title and the page content streams.

use folio_core::error::{FolioError, Result};
use lopdf::content::Content;
use lopdf::{Document, Object, StringFormat};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Byte written for characters outside Latin-1.
const UNMAPPED: u8 = b'?';

fn pdf_error(err: impl std::fmt::Display) -> FolioError {
    FolioError::PdfError(format!("failed to normalise rendered PDF: {err}"))
}

/// Re-encode text strings and replace the document ID in `bytes`.
pub(crate) fn normalize(bytes: &[u8], title: &str) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(bytes).map_err(pdf_error)?;

    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    let mut rewritten = 0usize;
    for page_id in doc.get_pages().into_values() {
        let raw = doc.get_page_content(page_id).map_err(pdf_error)?;
        let mut content = Content::decode(&raw).map_err(pdf_error)?;
        let changed = encode_text_operands(&mut content);
        if changed == 0 {
            hasher.update(&raw);
            continue;
        }
        let encoded = content.encode().map_err(pdf_error)?;
        hasher.update(&encoded);
        doc.change_page_content(page_id, encoded).map_err(pdf_error)?;
        rewritten += changed;
    }

    set_info_title(&mut doc, title);
    let digest = hasher.finalize();
    let id = Object::String(digest[..16].to_vec(), StringFormat::Hexadecimal);
    doc.trailer.set("ID", Object::Array(vec![id.clone(), id]));

    let mut out = Vec::with_capacity(bytes.len());
    doc.save_to(&mut out).map_err(pdf_error)?;
    debug!(rewritten, bytes = out.len(), "PDF normalised");
    Ok(out)
}

/// Rewrite the string operands of every show-text operator; returns how many
/// strings changed.
fn encode_text_operands(content: &mut Content) -> usize {
    let mut changed = 0;
    for op in &mut content.operations {
        match op.operator.as_str() {
            "Tj" | "'" => {
                if let Some(text) = op.operands.first_mut() {
                    changed += usize::from(to_single_byte(text));
                }
            }
            "\"" => {
                if let Some(text) = op.operands.last_mut() {
                    changed += usize::from(to_single_byte(text));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first_mut() {
                    for item in items {
                        changed += usize::from(to_single_byte(item));
                    }
                }
            }
            _ => {}
        }
    }
    changed
}

/// Turn a UTF-8 string object into one byte per character. ASCII and
/// non-UTF-8 strings are left alone.
fn to_single_byte(obj: &mut Object) -> bool {
    let Object::String(bytes, _) = obj else {
        return false;
    };
    if bytes.is_ascii() {
        return false;
    }
    let Ok(text) = std::str::from_utf8(bytes) else {
        return false;
    };
    let single: Vec<u8> = text
        .chars()
        .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(UNMAPPED))
        .collect();
    *bytes = single;
    true
}

/// Store the title as a PDF text string so non-ASCII titles survive.
fn set_info_title(doc: &mut Document, title: &str) {
    let Ok(info_id) = doc.trailer.get(b"Info").and_then(Object::as_reference) else {
        return;
    };
    if let Ok(info) = doc.get_object_mut(info_id).and_then(Object::as_dict_mut) {
        info.set("Title", lopdf::text_string(title));
    }
}
