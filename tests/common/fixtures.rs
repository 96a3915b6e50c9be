#![allow(dead_code)]

use chrono::NaiveDate;
use quotegrid::{Customer, DocumentKind, DocumentNumber, LineItem, QuotationDocument, QuotationJob};

pub fn issue_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

pub fn quotation_number(run: u64) -> DocumentNumber {
    DocumentNumber::new("QT", issue_date(), run)
}

pub fn customer() -> Customer {
    Customer::new("ACME Trading Co.", "99 Sukhumvit Road\nKhlong Toei\nBangkok 10110")
}

/// `count` distinct items: "Item 1" .. "Item n", quantity 1, unit price 100 * i
pub fn numbered_items(count: usize) -> Vec<LineItem> {
    (1..=count)
        .map(|i| LineItem::new(format!("Item {}", i), 1.0, 100.0 * i as f64))
        .collect()
}

pub fn quotation(items: Vec<LineItem>) -> QuotationDocument {
    QuotationDocument::new(quotation_number(1), customer(), items, true)
}

pub fn job(items: Vec<LineItem>) -> QuotationJob {
    QuotationJob::new(DocumentKind::Quotation, customer(), items).with_date(issue_date())
}

/// Montserrat Regular (SIL OFL 1.1), covering Latin, Greek and Cyrillic
pub fn unicode_font() -> Vec<u8> {
    include_bytes!("../fonts/Montserrat-Regular.ttf").to_vec()
}

/// A 2x2 PNG with one transparent pixel
pub fn logo_png() -> Vec<u8> {
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
    let img = ImageBuffer::from_fn(2, 2, |x, y| Rgba([20, 40, 200, if x == 0 && y == 0 { 0 } else { 255 }]));
    let mut out = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
