//! Logo images as PDF image XObjects.

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{DynamicImage, ImageFormat};
use lopdf::{Stream, dictionary};
use quotegrid_render_core::RenderError;
use std::io::Write;

/// A decoded logo, ready to be added to the document.
#[derive(Debug)]
pub struct ImageXObject {
    pub width: u32,
    pub height: u32,
    pub image: Stream,
    /// Alpha channel as a separate greyscale image.
    pub soft_mask: Option<Stream>,
}

pub(crate) fn compress(data: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn image_dict(width: u32, height: u32, color_space: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8,
    }
}

/// Decodes PNG, JPEG or GIF bytes into an image XObject.
///
/// Baseline RGB and greyscale JPEGs are embedded unchanged; everything else is
/// re-encoded as Flate-compressed RGB.
pub fn decode_logo(bytes: &[u8]) -> Result<ImageXObject, RenderError> {
    let format = image::guess_format(bytes)
        .map_err(|e| RenderError::Image(format!("unrecognised image format: {}", e)))?;
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| RenderError::Image(e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(RenderError::Image("image has no pixels".into()));
    }

    if format == ImageFormat::Jpeg {
        let color_space = match &decoded {
            DynamicImage::ImageRgb8(_) => Some("DeviceRGB"),
            DynamicImage::ImageLuma8(_) => Some("DeviceGray"),
            _ => None,
        };
        if let Some(color_space) = color_space {
            let mut dict = image_dict(width, height, color_space);
            dict.set("Filter", "DCTDecode");
            return Ok(ImageXObject {
                width,
                height,
                image: Stream::new(dict, bytes.to_vec()),
                soft_mask: None,
            });
        }
    }

    let rgba = decoded.to_rgba8();
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }

    let soft_mask = if alpha.iter().any(|a| *a < u8::MAX) {
        let mut dict = image_dict(width, height, "DeviceGray");
        dict.set("Filter", "FlateDecode");
        Some(Stream::new(dict, compress(&alpha)?))
    } else {
        None
    };

    let mut dict = image_dict(width, height, "DeviceRGB");
    dict.set("Filter", "FlateDecode");
    Ok(ImageXObject {
        width,
        height,
        image: Stream::new(dict, compress(&rgb)?),
        soft_mask,
    })
}
