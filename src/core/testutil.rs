//! Shared test fixtures: deterministic JPEG payloads, minimal PDFs with
//! embedded image XObjects, and hand-built photo records.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

use crate::core::hash::Fingerprint;
use crate::core::store::PhotoRecord;

/// Encode a synthetic photo as JPEG. The seed varies the pixel pattern,
/// so equal (dimensions, seed) pairs give byte-identical payloads and
/// different seeds give different ones.
pub(crate) fn jpeg_photo(width: u32, height: u32, seed: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            seed.wrapping_add(x as u8),
            seed.wrapping_mul(31).wrapping_add(y as u8),
            seed ^ (x.wrapping_add(y) as u8),
        ])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Jpeg)
        .expect("encode jpeg");
    buf.into_inner()
}

/// Build a PDF with one entry per page, each page embedding the given
/// JPEG payloads as image XObjects, and return the serialized bytes.
pub(crate) fn pdf_with_photos(pages: &[Vec<Vec<u8>>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::new();

    for page_photos in pages {
        let mut xobjects = Dictionary::new();
        let mut ops = Vec::new();
        for (i, jpeg) in page_photos.iter().enumerate() {
            let (width, height) = image::ImageReader::new(Cursor::new(jpeg))
                .with_guessed_format()
                .expect("guess format")
                .into_dimensions()
                .expect("read jpeg dimensions");
            let image_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width as i64,
                    "Height" => height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                jpeg.clone(),
            ));
            let name = format!("Im{i}");
            xobjects.set(name.clone(), Object::Reference(image_id));
            ops.push(Operation::new("q", vec![]));
            ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
            ops.push(Operation::new("Q", vec![]));
        }
        let resources_id = doc.add_object(dictionary! {
            "XObject" => Object::Dictionary(xobjects),
        });
        let content = Content { operations: ops };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("serialize pdf");
    buf
}

/// Hand-build a photo record without going through extraction.
pub(crate) fn record(source: &str, page_index: u32, payload: &[u8]) -> PhotoRecord {
    PhotoRecord {
        source: source.to_string(),
        page_index,
        width: 700,
        height: 500,
        fingerprint: Fingerprint::of(payload),
        bytes: payload.to_vec(),
    }
}
