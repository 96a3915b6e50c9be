#![allow(dead_code)]

use lopdf::Document as LopdfDocument;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object};

/// Extract all text content from a PDF document
pub fn extract_text(doc: &LopdfDocument) -> String {
    let mut text = String::new();
    let pages = doc.get_pages();
    for page_num in 1..=pages.len() {
        if let Ok(page_text) = doc.extract_text(&[page_num as u32]) {
            text.push_str(&page_text);
            text.push('\n');
        }
    }
    text
}

/// Decoded content stream operations of one page (1-based)
pub fn page_operations(doc: &LopdfDocument, page_num: u32) -> Vec<Operation> {
    let pages = doc.get_pages();
    let Some(page_id) = pages.get(&page_num) else {
        return Vec::new();
    };
    doc.get_page_content(*page_id)
        .ok()
        .and_then(|bytes| Content::decode(&bytes).ok())
        .map(|content| content.operations)
        .unwrap_or_default()
}

/// Rectangles drawn with a stroke (`re` followed by `S`)
pub fn count_stroked_rects(doc: &LopdfDocument, page_num: u32) -> usize {
    page_operations(doc, page_num)
        .windows(2)
        .filter(|pair| pair[0].operator == "re" && pair[1].operator == "S")
        .count()
}

/// Number of image XObjects painted on a page
pub fn count_images(doc: &LopdfDocument, page_num: u32) -> usize {
    page_operations(doc, page_num)
        .iter()
        .filter(|op| op.operator == "Do")
        .count()
}

/// Resolves an object that may be stored inline or behind a reference
fn resolve_dict<'a>(doc: &'a LopdfDocument, object: &'a Object) -> Option<&'a Dictionary> {
    match object.as_reference() {
        Ok(id) => doc.get_dictionary(id).ok(),
        Err(_) => object.as_dict().ok(),
    }
}

/// Font `BaseFont` names reachable from page resources
pub fn extract_font_names(doc: &LopdfDocument) -> Vec<String> {
    let mut fonts = std::collections::BTreeSet::new();
    for (_page_num, page_id) in doc.get_pages() {
        let Ok(page) = doc.get_dictionary(page_id) else {
            continue;
        };
        let font_dict = page
            .get(b"Resources")
            .ok()
            .and_then(|r| resolve_dict(doc, r))
            .and_then(|r| r.get(b"Font").ok())
            .and_then(|f| resolve_dict(doc, f));
        let Some(font_dict) = font_dict else {
            continue;
        };
        for (_name, font_ref) in font_dict.iter() {
            if let Some(base) = resolve_dict(doc, font_ref)
                .and_then(|f| f.get(b"BaseFont").ok())
                .and_then(|b| b.as_name().ok())
            {
                fonts.insert(String::from_utf8_lossy(base).to_string());
            }
        }
    }
    fonts.into_iter().collect()
}

/// Composite fonts on page 1 that carry a ToUnicode map and an embedded TrueType
/// program, by `BaseFont`
pub fn embedded_unicode_fonts(doc: &LopdfDocument) -> Vec<String> {
    let Some(page_id) = doc.get_pages().get(&1).copied() else {
        return Vec::new();
    };
    let font_dict = doc
        .get_dictionary(page_id)
        .ok()
        .and_then(|page| page.get(b"Resources").ok())
        .and_then(|r| resolve_dict(doc, r))
        .and_then(|r| r.get(b"Font").ok())
        .and_then(|f| resolve_dict(doc, f));
    let Some(font_dict) = font_dict else {
        return Vec::new();
    };

    let mut fonts = Vec::new();
    for (_name, font_ref) in font_dict.iter() {
        let Some(font) = resolve_dict(doc, font_ref) else {
            continue;
        };
        let is_type0 = font.get(b"Subtype").and_then(|s| s.as_name()).ok() == Some(b"Type0".as_slice());
        let has_cmap = font.get(b"ToUnicode").is_ok();
        let has_program = font
            .get(b"DescendantFonts")
            .and_then(|d| d.as_array())
            .ok()
            .and_then(|d| d.first())
            .and_then(|cid| resolve_dict(doc, cid))
            .and_then(|cid| cid.get(b"FontDescriptor").ok())
            .and_then(|fd| resolve_dict(doc, fd))
            .is_some_and(|fd| fd.get(b"FontFile2").is_ok());
        if let (true, true, true, Ok(base)) =
            (is_type0, has_cmap, has_program, font.get(b"BaseFont").and_then(|b| b.as_name()))
        {
            fonts.push(String::from_utf8_lossy(base).to_string());
        }
    }
    fonts
}

/// Page dimensions (width, height) in points
pub fn get_page_dimensions(doc: &LopdfDocument, page_num: u32) -> Option<(f32, f32)> {
    let page_id = *doc.get_pages().get(&page_num)?;
    let media_box = doc.get_dictionary(page_id).ok()?.get(b"MediaBox").ok()?.as_array().ok()?;
    let value = |i: usize| media_box.get(i).and_then(|o| o.as_f32().ok());
    Some((value(2)?, value(3)?))
}

/// Assert that PDF contains specific text
#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            extracted.contains($text),
            "PDF should contain '{}', but extracted text was:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert that PDF does NOT contain specific text
#[macro_export]
macro_rules! assert_pdf_not_contains_text {
    ($pdf:expr, $text:expr) => {
        let extracted = $crate::common::pdf_assertions::extract_text(&$pdf.doc);
        assert!(
            !extracted.contains($text),
            "PDF should NOT contain '{}', but it was found in:\n{}",
            $text,
            extracted
        );
    };
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

/// Assert that PDF references a font matching a pattern
#[macro_export]
macro_rules! assert_pdf_has_font {
    ($pdf:expr, $pattern:expr) => {
        let fonts = $crate::common::pdf_assertions::extract_font_names(&$pdf.doc);
        assert!(
            fonts.iter().any(|f| f.contains($pattern)),
            "PDF should reference a font matching '{}', found: {:?}",
            $pattern,
            fonts
        );
    };
}
