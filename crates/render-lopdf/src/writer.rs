//! In-memory PDF object graph.
//!
//! Pages are added as they are drawn; the shared resource dictionary is written last,
//! once every glyph used by the embedded fonts is known.

use crate::fonts::{EmbeddedFont, FontSet, GlyphUsage, PdfFont, StandardFont};
use crate::image::{ImageXObject, compress};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use quotegrid_render_core::RenderError;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Maximum entries per `beginbfchar` block.
const BFCHAR_BLOCK: usize = 100;

pub struct PdfWriter {
    document: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    xobjects: Dictionary,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();
        Self {
            document,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            xobjects: Dictionary::new(),
        }
    }

    /// Adds an image XObject under `name` in the shared resources.
    pub fn add_image(&mut self, name: &str, image: ImageXObject) {
        let mut stream = image.image;
        if let Some(mask) = image.soft_mask {
            let mask_id = self.document.add_object(mask);
            stream.dict.set("SMask", mask_id);
        }
        let image_id = self.document.add_object(stream);
        self.xobjects.set(name, image_id);
    }

    pub fn add_page(&mut self, content: Content, width: f32, height: f32) -> Result<ObjectId, RenderError> {
        let compressed = compress(&content.encode()?)?;
        let content_stream = Stream::new(dictionary! {"Filter" => "FlateDecode"}, compressed);
        let content_id = self.document.add_object(content_stream);

        let page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        };
        let page_id = self.document.add_object(page_dict);
        self.page_ids.push(page_id);
        Ok(page_id)
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Writes fonts, resources and the page tree, then serializes the document.
    pub fn finish(mut self, fonts: &FontSet, usage: &GlyphUsage) -> Result<Vec<u8>, RenderError> {
        let mut font_dict = Dictionary::new();
        for (name, font) in fonts.resources() {
            let font_id = match font {
                PdfFont::Standard(standard) => self.write_standard_font(*standard),
                PdfFont::Embedded(embedded) => {
                    let empty = BTreeMap::new();
                    let glyphs = usage.glyphs(name).unwrap_or(&empty);
                    self.write_embedded_font(embedded, glyphs)?
                }
            };
            font_dict.set(name, font_id);
        }

        let mut resources = dictionary! { "Font" => font_dict };
        if !self.xobjects.is_empty() {
            resources.set("XObject", std::mem::replace(&mut self.xobjects, Dictionary::new()));
        }
        self.document
            .objects
            .insert(self.resources_id, Object::Dictionary(resources));

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        self.document.save_to(&mut bytes)?;
        Ok(bytes)
    }

    fn write_standard_font(&mut self, font: StandardFont) -> ObjectId {
        self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        })
    }

    fn write_embedded_font(
        &mut self,
        font: &EmbeddedFont,
        glyphs: &BTreeMap<u16, String>,
    ) -> Result<ObjectId, RenderError> {
        let base_font = Object::Name(font.postscript_name().as_bytes().to_vec());

        let data = font.data();
        let mut file_stream = Stream::new(
            dictionary! {
                "Length1" => data.len() as i64,
                "Filter" => "FlateDecode",
            },
            compress(data)?,
        );
        file_stream.allows_compression = false;
        let file_id = self.document.add_object(file_stream);

        let bbox: Vec<Object> = font.bbox().iter().map(|v| Object::Real(*v)).collect();
        let descriptor_id = self.document.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => base_font.clone(),
            "Flags" => 32,
            "FontBBox" => bbox,
            "ItalicAngle" => font.italic_angle(),
            "Ascent" => font.ascent(),
            "Descent" => font.descent(),
            "CapHeight" => font.cap_height(),
            "StemV" => 80,
            "FontFile2" => file_id,
        });

        let mut widths = Vec::with_capacity(glyphs.len() * 2);
        for (glyph, advance) in font.glyph_advances(glyphs.keys().copied()) {
            widths.push(Object::Integer(glyph as i64));
            widths.push(Object::Array(vec![Object::Real(font.to_pdf_units(advance as i32))]));
        }

        let cid_font_id = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => base_font.clone(),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::String(b"Adobe".to_vec(), StringFormat::Literal),
                "Ordering" => Object::String(b"Identity".to_vec(), StringFormat::Literal),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor_id,
            "DW" => 1000,
            "W" => widths,
            "CIDToGIDMap" => "Identity",
        });

        let cmap = Stream::new(Dictionary::new(), to_unicode_cmap(glyphs).into_bytes());
        let cmap_id = self.document.add_object(cmap);

        Ok(self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => base_font,
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(cid_font_id)],
            "ToUnicode" => cmap_id,
        }))
    }
}

fn utf16_hex(text: &str) -> String {
    text.encode_utf16().fold(String::new(), |mut out, unit| {
        let _ = write!(out, "{:04X}", unit);
        out
    })
}

/// Builds a ToUnicode CMap mapping glyph ids back to the text they were shaped from.
pub fn to_unicode_cmap(glyphs: &BTreeMap<u16, String>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    let mapped: Vec<(&u16, &String)> = glyphs.iter().filter(|(_, text)| !text.is_empty()).collect();
    for block in mapped.chunks(BFCHAR_BLOCK) {
        let _ = writeln!(cmap, "{} beginbfchar", block.len());
        for (glyph, text) in block {
            let _ = writeln!(cmap, "<{:04X}> <{}>", glyph, utf16_hex(text));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}
