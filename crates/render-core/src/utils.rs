/// Convert layout Y coordinate to PDF Y coordinate (flip origin)
pub fn flip_y(y: f32, page_height: f32) -> f32 {
    page_height - y
}

/// Baseline of a single text line whose box starts at `top`.
pub fn baseline_y(top: f32, font_size: f32) -> f32 {
    top + font_size * 0.8
}

/// Formats a grid cell value: blank unless strictly positive.
pub fn cell_amount(value: f64) -> String {
    if value > 0.0 {
        quotegrid_types::format_amount(value)
    } else {
        String::new()
    }
}
