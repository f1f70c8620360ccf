use std::collections::HashSet;
use std::io::Cursor;

use image::ImageReader;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("not a parseable PDF: {0}")]
    Parse(#[from] lopdf::Error),
}

/// One embedded raster image pulled out of a report, in its raw encoded
/// form as stored in the PDF. Dimensions are pixel dimensions of the
/// image itself, not the size it is drawn at on the page.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    /// 0-based page the image was found on.
    pub page_index: u32,
    pub width: u32,
    pub height: u32,
    /// First entry of the stream's /Filter, e.g. "DCTDecode" for JPEG.
    pub filter: Option<String>,
    /// Raw encoded stream content. This is what gets fingerprinted.
    pub bytes: Vec<u8>,
}

/// Walk every page of the document and return its embedded raster images
/// in page order, then in-page discovery order. Form XObjects are
/// recursed into so nested images are found too. Stencil masks and
/// soft masks are not photos and are not reported.
pub fn extract_images(pdf_bytes: &[u8]) -> Result<Vec<ExtractedImage>, ExtractError> {
    let doc = Document::load_mem(pdf_bytes)?;
    let mut images = Vec::new();

    for (page_number, page_id) in doc.get_pages() {
        let page_index = page_number.saturating_sub(1);
        let Ok(page_dict) = doc.get_dictionary(page_id) else {
            continue;
        };
        let Some(resources) = page_resources(&doc, page_dict) else {
            continue;
        };
        let mut visited = HashSet::new();
        collect_from_resources(&doc, resources, page_index, &mut visited, &mut images);
    }

    Ok(images)
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    if let Object::Reference(id) = obj {
        doc.get_object(*id).unwrap_or(obj)
    } else {
        obj
    }
}

/// Resources may live on the page itself or be inherited through the
/// /Parent chain. The chain walk is depth-bounded to survive malformed
/// documents with Parent cycles.
fn page_resources<'a>(doc: &'a Document, page_dict: &'a Dictionary) -> Option<&'a Dictionary> {
    let mut dict = page_dict;
    for _ in 0..32 {
        if let Ok(resources) = dict.get(b"Resources") {
            return resolve(doc, resources).as_dict().ok();
        }
        match dict.get(b"Parent").ok().map(|p| resolve(doc, p)) {
            Some(Object::Dictionary(parent)) => dict = parent,
            _ => return None,
        }
    }
    None
}

fn collect_from_resources(
    doc: &Document,
    resources: &Dictionary,
    page_index: u32,
    visited: &mut HashSet<ObjectId>,
    out: &mut Vec<ExtractedImage>,
) {
    let Ok(xobjects) = resources.get(b"XObject") else {
        return;
    };
    let Object::Dictionary(xobjects) = resolve(doc, xobjects) else {
        return;
    };

    for (_name, entry) in xobjects.iter() {
        let Object::Reference(obj_id) = entry else {
            continue;
        };
        if !visited.insert(*obj_id) {
            continue;
        }
        let Ok(Object::Stream(stream)) = doc.get_object(*obj_id) else {
            continue;
        };
        match subtype(&stream.dict) {
            Some(name) if name == b"Image".as_slice() => {
                if let Some(image) = image_from_stream(stream, page_index) {
                    out.push(image);
                }
            }
            Some(name) if name == b"Form".as_slice() => {
                if let Ok(form_resources) = stream.dict.get(b"Resources") {
                    if let Object::Dictionary(form_resources) = resolve(doc, form_resources) {
                        collect_from_resources(doc, form_resources, page_index, visited, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn subtype(dict: &Dictionary) -> Option<&[u8]> {
    match dict.get(b"Subtype") {
        Ok(Object::Name(name)) => Some(name.as_slice()),
        _ => None,
    }
}

fn image_from_stream(stream: &Stream, page_index: u32) -> Option<ExtractedImage> {
    let dict = &stream.dict;
    // Stencil masks carry no photographic content.
    if matches!(dict.get(b"ImageMask"), Ok(Object::Boolean(true))) {
        return None;
    }
    let dict_width = int_entry(dict, b"Width")?;
    let dict_height = int_entry(dict, b"Height")?;

    let bytes = stream.content.clone();
    // When the payload is in a format the raster decoder understands,
    // its header is the authority on dimensions; otherwise trust the
    // image dictionary.
    let (width, height) = probe_dimensions(&bytes).unwrap_or((dict_width, dict_height));

    Some(ExtractedImage {
        page_index,
        width,
        height,
        filter: filter_name(dict),
        bytes,
    })
}

fn int_entry(dict: &Dictionary, key: &[u8]) -> Option<u32> {
    match dict.get(key) {
        Ok(Object::Integer(n)) if *n > 0 => u32::try_from(*n).ok(),
        _ => None,
    }
}

/// Read pixel dimensions from the payload header without a full decode.
fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

fn filter_name(dict: &Dictionary) -> Option<String> {
    match dict.get(b"Filter").ok()? {
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        Object::Array(filters) => filters.first().and_then(|f| match f {
            Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testutil::{jpeg_photo, pdf_with_photos};

    #[test]
    fn extracts_images_in_page_order_with_indices() {
        let first = jpeg_photo(700, 500, 1);
        let third = jpeg_photo(700, 500, 2);
        let pdf = pdf_with_photos(&[vec![first.clone()], vec![], vec![third.clone()]]);

        let images = extract_images(&pdf).unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].page_index, 0);
        assert_eq!(images[0].bytes, first);
        assert_eq!(images[1].page_index, 2);
        assert_eq!(images[1].bytes, third);
    }

    #[test]
    fn reports_decoded_dimensions_and_filter() {
        let pdf = pdf_with_photos(&[vec![jpeg_photo(660, 460, 7)]]);

        let images = extract_images(&pdf).unwrap();

        assert_eq!((images[0].width, images[0].height), (660, 460));
        assert_eq!(images[0].filter.as_deref(), Some("DCTDecode"));
    }

    #[test]
    fn multiple_images_on_one_page() {
        let a = jpeg_photo(700, 500, 3);
        let b = jpeg_photo(700, 500, 4);
        let pdf = pdf_with_photos(&[vec![a, b]]);

        let images = extract_images(&pdf).unwrap();

        assert_eq!(images.len(), 2);
        assert!(images.iter().all(|i| i.page_index == 0));
    }

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        assert!(extract_images(b"definitely not a pdf").is_err());
    }

    #[test]
    fn page_without_images_yields_nothing() {
        let pdf = pdf_with_photos(&[vec![]]);
        assert!(extract_images(&pdf).unwrap().is_empty());
    }
}
