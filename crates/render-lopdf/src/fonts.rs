//! Font resolution, measurement and shaping.
//!
//! A TrueType font supplied as bytes is embedded as a composite (Type0) font. When no
//! usable font is available the renderer falls back to the base-14 Helvetica faces,
//! which every PDF reader provides but which only cover Latin text.

use quotegrid_render_core::{FontRole, RenderError, RenderWarning, TextMeasurer};
use quotegrid_traits::{ResourceProvider, SharedResourceData};
use rustybuzz::{Feature, UnicodeBuffer};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use ttf_parser::Tag;

/// Font bytes as found by the caller. A face that is `None` is reported through
/// `missing_reason` when the set is resolved.
#[derive(Debug, Clone, Default)]
pub struct FontAssets {
    pub regular: Option<SharedResourceData>,
    pub bold: Option<SharedResourceData>,
    pub missing_reason: Option<String>,
}

impl FontAssets {
    /// No font at all; text is rendered with Helvetica.
    pub fn none() -> Self {
        Self {
            missing_reason: Some("no font configured".to_string()),
            ..Self::default()
        }
    }

    pub fn from_bytes(regular: Vec<u8>, bold: Option<Vec<u8>>) -> Self {
        Self {
            regular: Some(Arc::new(regular)),
            bold: bold.map(Arc::new),
            missing_reason: None,
        }
    }

    /// Loads the regular and optional bold face through `provider`.
    ///
    /// Load failures never fail the call: a face that cannot be read is left out and
    /// the reason kept for the fallback warning.
    pub fn from_provider(provider: &dyn ResourceProvider, regular: &str, bold: Option<&str>) -> Self {
        let load = |path: &str| match provider.load(path) {
            Ok(data) => Ok(data),
            Err(e) => {
                log::debug!("Font '{}' unavailable from {}: {}", path, provider.name(), e);
                Err(e.to_string())
            }
        };

        let (regular, missing_reason) = match load(regular) {
            Ok(data) => (Some(data), None),
            Err(reason) => (None, Some(reason)),
        };
        let bold = bold.and_then(|path| load(path).ok());
        Self {
            regular,
            bold,
            missing_reason,
        }
    }

    /// Looks up a font family installed on the host.
    #[cfg(feature = "system-fonts")]
    pub fn from_system(family: &str) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let face = |weight: fontdb::Weight| {
            let query = fontdb::Query {
                families: &[fontdb::Family::Name(family)],
                weight,
                stretch: fontdb::Stretch::Normal,
                style: fontdb::Style::Normal,
            };
            let id = db.query(&query)?;
            db.with_face_data(id, |data, index| (index == 0).then(|| Arc::new(data.to_vec())))
                .flatten()
        };

        let regular = face(fontdb::Weight::NORMAL);
        let bold = face(fontdb::Weight::BOLD);
        let missing_reason = regular
            .is_none()
            .then(|| format!("system font family '{}' not found", family));
        Self {
            regular,
            bold,
            missing_reason,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_none()
    }
}

/// One glyph of shaped text, in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    pub id: u16,
    pub x_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,
    /// Byte offset of the source cluster in the shaped text.
    pub cluster: u32,
}

/// A parsed TrueType face ready for embedding.
pub struct EmbeddedFont {
    data: SharedResourceData,
    postscript_name: String,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    cap_height: i16,
    bbox: [i16; 4],
    italic_angle: f32,
}

impl std::fmt::Debug for EmbeddedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedFont")
            .field("postscript_name", &self.postscript_name)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl EmbeddedFont {
    pub fn parse(data: SharedResourceData) -> Result<Self, RenderError> {
        if ttf_parser::fonts_in_collection(&data).is_some() {
            return Err(RenderError::Font("font collections cannot be embedded".into()));
        }
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| RenderError::Font(format!("unreadable TrueType data: {}", e)))?;
        if rustybuzz::Face::from_slice(&data, 0).is_none() {
            return Err(RenderError::Font("font cannot be shaped".into()));
        }

        let postscript_name = face
            .names()
            .into_iter()
            .filter(|name| name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
            .find_map(|name| name.to_string())
            .map(|name| sanitize_font_name(&name))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "EmbeddedFont".to_string());

        let bbox = face.global_bounding_box();
        let font = Self {
            postscript_name,
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            cap_height: face.capital_height().unwrap_or_else(|| face.ascender()),
            bbox: [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
            italic_angle: face.italic_angle(),
            data: Arc::clone(&data),
        };
        Ok(font)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn italic_angle(&self) -> f32 {
        self.italic_angle
    }

    /// Converts font units to the 1/1000 text-space units used in font dictionaries.
    pub fn to_pdf_units(&self, value: i32) -> f32 {
        value as f32 * 1000.0 / self.units_per_em as f32
    }

    pub fn ascent(&self) -> f32 {
        self.to_pdf_units(self.ascender as i32)
    }

    pub fn descent(&self) -> f32 {
        self.to_pdf_units(self.descender as i32)
    }

    pub fn cap_height(&self) -> f32 {
        self.to_pdf_units(self.cap_height as i32)
    }

    pub fn bbox(&self) -> [f32; 4] {
        self.bbox.map(|v| self.to_pdf_units(v as i32))
    }

    /// Nominal horizontal advance of a glyph in font units.
    pub fn glyph_advances(&self, glyphs: impl Iterator<Item = u16>) -> Vec<(u16, u16)> {
        match ttf_parser::Face::parse(&self.data, 0) {
            Ok(face) => glyphs
                .map(|id| (id, face.glyph_hor_advance(ttf_parser::GlyphId(id)).unwrap_or(0)))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn shape(&self, text: &str) -> Vec<ShapedGlyph> {
        static FEATURES: OnceLock<Vec<Feature>> = OnceLock::new();
        let features = FEATURES.get_or_init(|| {
            vec![
                Feature::new(Tag::from_bytes(b"liga"), 1, ..),
                Feature::new(Tag::from_bytes(b"kern"), 1, ..),
            ]
        });

        let Some(face) = rustybuzz::Face::from_slice(&self.data, 0) else {
            return Vec::new();
        };
        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();
        let output = rustybuzz::shape(&face, features, buffer);

        output
            .glyph_infos()
            .iter()
            .zip(output.glyph_positions())
            .map(|(info, pos)| ShapedGlyph {
                id: u16::try_from(info.glyph_id).unwrap_or(0),
                x_advance: pos.x_advance,
                x_offset: pos.x_offset,
                y_offset: pos.y_offset,
                cluster: info.cluster,
            })
            .collect()
    }

    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: i32 = self.shape(text).iter().map(|g| g.x_advance).sum();
        units as f32 * font_size / self.units_per_em as f32
    }
}

fn sanitize_font_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_graphic() && !"[](){}<>/%#".contains(*c))
        .collect()
}

/// The base-14 faces used when no TrueType font is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

// Advance widths for the printable ASCII range, from the Adobe core font metrics.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const DEFAULT_STANDARD_WIDTH: u16 = 556;

impl StandardFont {
    pub fn for_role(role: FontRole) -> Self {
        match role {
            FontRole::Regular => StandardFont::Helvetica,
            FontRole::Bold => StandardFont::HelveticaBold,
        }
    }

    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Width of an encoded byte in 1/1000 em.
    pub fn byte_width(self, byte: u8) -> u16 {
        let table = match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        match byte {
            32..=126 => table[(byte - 32) as usize],
            _ => DEFAULT_STANDARD_WIDTH,
        }
    }

    pub fn text_width(self, text: &str, font_size: f32) -> f32 {
        let units: u32 = to_win_ansi(text)
            .into_iter()
            .map(|b| self.byte_width(b) as u32)
            .sum();
        units as f32 * font_size / 1000.0
    }
}

/// Single-byte encoding for the standard fonts. Characters outside Latin-1 become `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| if c as u32 <= 255 { c as u8 } else { b'?' })
        .collect()
}

/// The face a role resolves to.
#[derive(Debug, Clone)]
pub enum PdfFont {
    Embedded(Arc<EmbeddedFont>),
    Standard(StandardFont),
}

impl PdfFont {
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        match self {
            PdfFont::Embedded(font) => font.text_width(text, font_size),
            PdfFont::Standard(font) => font.text_width(text, font_size),
        }
    }
}

/// Regular and bold faces for one renderer, with the warnings raised resolving them.
#[derive(Debug, Clone)]
pub struct FontSet {
    regular: PdfFont,
    bold: PdfFont,
    bold_shares_regular: bool,
    warnings: Vec<RenderWarning>,
}

impl FontSet {
    /// Helvetica for both roles.
    pub fn standard(reason: impl Into<String>) -> Self {
        Self {
            regular: PdfFont::Standard(StandardFont::Helvetica),
            bold: PdfFont::Standard(StandardFont::HelveticaBold),
            bold_shares_regular: false,
            warnings: vec![RenderWarning::FontFallback { reason: reason.into() }],
        }
    }

    /// Parses the supplied faces, degrading instead of failing.
    pub fn resolve(assets: &FontAssets) -> Self {
        let regular = match &assets.regular {
            Some(data) => EmbeddedFont::parse(Arc::clone(data)).map_err(|e| e.to_string()),
            None => Err(assets
                .missing_reason
                .clone()
                .unwrap_or_else(|| "no font configured".to_string())),
        };

        let regular = match regular {
            Ok(font) => Arc::new(font),
            Err(reason) => {
                log::warn!("Falling back to Helvetica: {}", reason);
                return Self::standard(reason);
            }
        };

        let bold = assets.bold.as_ref().map(|data| EmbeddedFont::parse(Arc::clone(data)));
        match bold {
            Some(Ok(bold)) => {
                log::debug!(
                    "Embedding fonts '{}' and '{}'",
                    regular.postscript_name(),
                    bold.postscript_name()
                );
                Self {
                    regular: PdfFont::Embedded(regular),
                    bold: PdfFont::Embedded(Arc::new(bold)),
                    bold_shares_regular: false,
                    warnings: Vec::new(),
                }
            }
            other => {
                if let Some(Err(e)) = other {
                    log::warn!("Bold font unusable, using regular face: {}", e);
                } else {
                    log::warn!("No bold font supplied, using regular face for emphasis");
                }
                Self {
                    regular: PdfFont::Embedded(Arc::clone(&regular)),
                    bold: PdfFont::Embedded(regular),
                    bold_shares_regular: true,
                    warnings: vec![RenderWarning::BoldFontMissing],
                }
            }
        }
    }

    pub fn face(&self, role: FontRole) -> &PdfFont {
        match role {
            FontRole::Regular => &self.regular,
            FontRole::Bold => &self.bold,
        }
    }

    /// Name of the font in the page resource dictionary.
    pub fn resource_name(&self, role: FontRole) -> &'static str {
        match role {
            FontRole::Bold if !self.bold_shares_regular => "F2",
            _ => "F1",
        }
    }

    /// Distinct fonts to write into the document, by resource name.
    pub fn resources(&self) -> Vec<(&'static str, &PdfFont)> {
        let mut fonts = vec![(self.resource_name(FontRole::Regular), &self.regular)];
        if !self.bold_shares_regular {
            fonts.push((self.resource_name(FontRole::Bold), &self.bold));
        }
        fonts
    }

    pub fn warnings(&self) -> &[RenderWarning] {
        &self.warnings
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.regular, PdfFont::Standard(_))
    }
}

impl TextMeasurer for FontSet {
    fn text_width(&self, text: &str, font: FontRole, font_size: f32) -> f32 {
        self.face(font).text_width(text, font_size)
    }
}

/// Glyphs drawn with each embedded font, with the text they stand for.
#[derive(Debug, Default)]
pub struct GlyphUsage {
    fonts: BTreeMap<&'static str, BTreeMap<u16, String>>,
}

impl GlyphUsage {
    pub fn record(&mut self, font: &'static str, glyph: u16, text: &str) {
        let mapped = self.fonts.entry(font).or_default().entry(glyph).or_default();
        if mapped.is_empty() {
            *mapped = text.to_string();
        }
    }

    pub fn glyphs(&self, font: &str) -> Option<&BTreeMap<u16, String>> {
        self.fonts.get(font)
    }
}
