pub mod color;
pub mod document;
pub mod geometry;
pub mod line_item;
pub mod money;
pub mod number;

pub use color::Color;
pub use document::{Customer, DocumentKind};
pub use geometry::{Rect, Size};
pub use line_item::{LineItem, coerce_number};
pub use money::{DocumentTotals, TAX_RATE, format_amount, format_units, round_half_even};
pub use number::{DocumentNumber, DocumentNumberError, RUN_SEPARATOR, scope_key};
