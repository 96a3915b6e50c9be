mod common;

use common::fixtures::*;
use common::pdf_assertions::{count_images, count_stroked_rects, get_page_dimensions};
use common::{TestResult, render_default, render_with};
use quotegrid::{
    Customer, FixedGridRenderer, LineItem, OverflowPolicy, QuotationDocument, RenderWarning,
};
use std::sync::Arc;

/// Header cells plus 20 body rows of 4 cells each.
const STROKED_CELLS_PER_PAGE: usize = 4 + 20 * 4;

#[test]
fn test_empty_quotation_still_draws_full_grid() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let pdf = render_default(&quotation(vec![]))?;
    assert_pdf_page_count!(pdf, 1);
    assert_eq!(count_stroked_rects(&pdf.doc, 1), STROKED_CELLS_PER_PAGE);
    assert_eq!(pdf.rendered.rows_rendered, 20);

    let (width, height) = get_page_dimensions(&pdf.doc, 1).unwrap();
    assert!((width - 595.28).abs() < 0.01);
    assert!((height - 841.89).abs() < 0.01);

    assert_pdf_contains_text!(pdf, "QUOTATION");
    assert_pdf_contains_text!(pdf, "No. QT-20240115-001");
    assert_pdf_contains_text!(pdf, "Date 15/01/2024");
    assert_pdf_contains_text!(pdf, "Grand Total");
    assert_pdf_not_contains_text!(pdf, "Page 1/");
    Ok(())
}

#[test]
fn test_grid_size_is_independent_of_item_count() -> TestResult {
    for count in [1, 7, 19, 20] {
        let pdf = render_default(&quotation(numbered_items(count)))?;
        assert_pdf_page_count!(pdf, 1);
        assert_eq!(count_stroked_rects(&pdf.doc, 1), STROKED_CELLS_PER_PAGE, "{} items", count);
    }
    Ok(())
}

#[test]
fn test_truncate_drops_items_past_the_grid() -> TestResult {
    let pdf = render_default(&quotation(numbered_items(25)))?;

    assert_pdf_page_count!(pdf, 1);
    assert_pdf_contains_text!(pdf, "Item 20");
    assert_pdf_not_contains_text!(pdf, "Item 21");
    assert_pdf_not_contains_text!(pdf, "Item 25");
    assert_eq!(pdf.rendered.dropped_items, 5);
    assert!(
        pdf.rendered
            .warnings
            .contains(&RenderWarning::ItemsTruncated { shown: 20, dropped: 5 })
    );
    Ok(())
}

#[test]
fn test_truncated_items_still_count_towards_totals() -> TestResult {
    // 100 + 200 + ... + 2500 = 32,500; VAT 2,275
    let pdf = render_default(&quotation(numbered_items(25)))?;
    assert_pdf_contains_text!(pdf, "32,500");
    assert_pdf_contains_text!(pdf, "2,275");
    assert_pdf_contains_text!(pdf, "34,775");
    Ok(())
}

#[test]
fn test_paginate_spreads_items_over_pages() -> TestResult {
    let renderer = FixedGridRenderer::builder()
        .with_overflow(OverflowPolicy::Paginate)
        .build()?;
    let pdf = render_with(&renderer, &quotation(numbered_items(25)))?;

    assert_pdf_page_count!(pdf, 2);
    assert_eq!(pdf.rendered.rows_rendered, 40);
    assert_eq!(pdf.rendered.dropped_items, 0);

    for page in 1..=2 {
        assert_eq!(count_stroked_rects(&pdf.doc, page), STROKED_CELLS_PER_PAGE);
    }

    let first = pdf.page_text(1);
    let second = pdf.page_text(2);
    assert!(first.contains("Page 1/2"));
    assert!(first.contains("Item 20"));
    assert!(!first.contains("Grand Total"));
    assert!(second.contains("Page 2/2"));
    assert!(second.contains("Item 25"));
    assert!(second.contains("Grand Total"));
    assert!(second.contains("Approver"));
    Ok(())
}

#[test]
fn test_tax_label_is_static_and_totals_always_print() -> TestResult {
    let doc = QuotationDocument::new(quotation_number(3), Customer::default(), vec![], false);
    let pdf = render_default(&doc)?;

    assert_pdf_contains_text!(pdf, "VAT 7%");
    assert_pdf_contains_text!(pdf, "Subtotal");
    assert_eq!(doc.totals.grand_total, 0);
    Ok(())
}

#[test]
fn test_zero_amounts_leave_cells_blank() -> TestResult {
    let items = vec![
        LineItem::new("Site visit (free)", 0.0, 0.0),
        LineItem::new("Cabling", 3.0, 1250.0),
    ];
    let pdf = render_default(&quotation(items))?;

    assert_pdf_contains_text!(pdf, "Site visit (free)");
    assert_pdf_contains_text!(pdf, "1,250");
    assert_pdf_contains_text!(pdf, "3,750");
    Ok(())
}

#[test]
fn test_customer_address_is_capped() -> TestResult {
    let customer = Customer::new("ACME", "Line A\nLine B\nLine C\nLine D");
    let doc = QuotationDocument::new(quotation_number(1), customer, vec![], true);
    let pdf = render_default(&doc)?;

    assert_pdf_contains_text!(pdf, "Line C");
    assert_pdf_not_contains_text!(pdf, "Line D");
    assert!(
        pdf.rendered
            .warnings
            .contains(&RenderWarning::AddressTruncated { shown: 3, dropped: 1 })
    );

    let fits = QuotationDocument::new(quotation_number(2), common::fixtures::customer(), vec![], true);
    let pdf = render_default(&fits)?;
    assert!(
        !pdf.rendered
            .warnings
            .iter()
            .any(|w| matches!(w, RenderWarning::AddressTruncated { .. }))
    );
    Ok(())
}

#[test]
fn test_logo_is_painted_once_per_page() -> TestResult {
    let renderer = FixedGridRenderer::builder()
        .with_overflow(OverflowPolicy::Paginate)
        .build()?;
    let doc = quotation(numbered_items(21)).with_logo(Arc::new(logo_png()));
    let pdf = render_with(&renderer, &doc)?;

    assert_pdf_page_count!(pdf, 2);
    assert_eq!(count_images(&pdf.doc, 1), 1);
    assert_eq!(count_images(&pdf.doc, 2), 1);

    let plain = render_default(&quotation(vec![]))?;
    assert_eq!(count_images(&plain.doc, 1), 0);
    Ok(())
}

#[test]
fn test_invoice_prefix_changes_title() -> TestResult {
    let number = quotegrid::DocumentNumber::new("IV", issue_date(), 12);
    let doc = QuotationDocument::new(number, customer(), vec![], true);
    let pdf = render_default(&doc)?;
    assert_pdf_contains_text!(pdf, "INVOICE");
    assert_pdf_contains_text!(pdf, "IV-20240115-012");
    Ok(())
}

#[test]
fn test_fallback_font_is_reported() -> TestResult {
    let pdf = render_default(&quotation(numbered_items(2)))?;
    assert_pdf_has_font!(pdf, "Helvetica");
    assert!(pdf.rendered.used_fallback_font());
    Ok(())
}

#[test]
fn test_rendering_is_deterministic() -> TestResult {
    let doc = quotation(numbered_items(5)).with_logo(Arc::new(logo_png()));
    let a = render_default(&doc)?;
    let b = render_default(&doc)?;
    assert_eq!(a.bytes, b.bytes);
    Ok(())
}
