//! Image XObject embedding and page placement

use crate::error::PdfError;
use crate::parser::{PdfDocument, MAX_TREE_DEPTH};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbaImage;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use shared_types::NativeRect;
use std::io::Write;

/// An image embedded in a document, ready to be drawn on any of its pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHandle {
    pub(crate) id: ObjectId,
    pub width: u32,
    pub height: u32,
}

impl PdfDocument {
    /// Embed an RGBA raster as a Flate-compressed image XObject. Any
    /// transparency is carried in a soft mask.
    pub fn embed_image(&mut self, image: &RgbaImage) -> Result<ImageHandle, PdfError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PdfError::EmbedError("image has no pixels".to_string()));
        }

        let pixel_count = (width as usize) * (height as usize);
        let mut rgb = Vec::with_capacity(pixel_count * 3);
        let mut alpha = Vec::with_capacity(pixel_count);
        for pixel in image.pixels() {
            let [r, g, b, a] = pixel.0;
            rgb.extend_from_slice(&[r, g, b]);
            alpha.push(a);
        }

        let mut image_dict = image_dictionary(width, height, "DeviceRGB");

        if alpha.iter().any(|&a| a != u8::MAX) {
            let mask = Stream::new(image_dictionary(width, height, "DeviceGray"), deflate(&alpha)?);
            let mask_id = self.doc.add_object(mask);
            image_dict.set("SMask", Object::Reference(mask_id));
        }

        let id = self.doc.add_object(Stream::new(image_dict, deflate(&rgb)?));
        tracing::debug!(?id, width, height, "embedded image XObject");

        Ok(ImageHandle { id, width, height })
    }

    /// Paint an embedded image into `rect` (PDF user space, bottom-left
    /// origin) on the given page
    pub fn draw_image(
        &mut self,
        page_index: usize,
        handle: ImageHandle,
        rect: NativeRect,
    ) -> Result<(), PdfError> {
        let page_id = self.require_page(page_index)?;

        if !self.doc.objects.contains_key(&handle.id) {
            return Err(PdfError::EmbedError(format!(
                "image {:?} does not belong to this document",
                handle.id
            )));
        }

        let name = register_xobject(&mut self.doc, page_id, handle.id)?;

        let content = format!(
            "q\n\
{w:.4} 0 0 {h:.4} {x:.4} {y:.4} cm\n\
/{name} Do\n\
Q\n",
            w = rect.width,
            h = rect.height,
            x = rect.x,
            y = rect.y,
            name = name,
        );
        append_content(&mut self.doc, page_id, content.into_bytes())?;

        tracing::debug!(page_index, %name, ?rect, "drew image on page");
        Ok(())
    }
}

fn image_dictionary(width: u32, height: u32, color_space: &str) -> Dictionary {
    dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => Object::Integer(i64::from(width)),
        "Height" => Object::Integer(i64::from(height)),
        "ColorSpace" => color_space,
        "BitsPerComponent" => Object::Integer(8),
        "Filter" => "FlateDecode",
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, PdfError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| PdfError::EmbedError(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| PdfError::EmbedError(e.to_string()))
}

fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary, PdfError> {
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfError::MalformedPage(e.to_string()))
}

/// The resources in effect for a page. The second value is the object that
/// holds them when the page refers to them indirectly; inherited resources
/// come back with `None` so they get copied onto the page instead of
/// modifying a shared ancestor.
fn resolve_resources(
    doc: &Document,
    page_id: ObjectId,
) -> Result<(Dictionary, Option<ObjectId>), PdfError> {
    let mut node_id = page_id;

    for depth in 0..MAX_TREE_DEPTH {
        let node = doc
            .get_object(node_id)
            .and_then(Object::as_dict)
            .map_err(|e| PdfError::MalformedPage(e.to_string()))?;

        match node.get(b"Resources") {
            Ok(Object::Dictionary(resources)) => return Ok((resources.clone(), None)),
            Ok(Object::Reference(id)) => {
                let resources = doc
                    .get_object(*id)
                    .and_then(Object::as_dict)
                    .map_err(|e| PdfError::MalformedPage(format!("Resources: {}", e)))?;
                let holder = if depth == 0 { Some(*id) } else { None };
                return Ok((resources.clone(), holder));
            }
            _ => {}
        }

        match node.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent_id) => node_id = parent_id,
            Err(_) => break,
        }
    }

    Ok((Dictionary::new(), None))
}

/// Add the image to the page's XObject resources under a fresh name
fn register_xobject(
    doc: &mut Document,
    page_id: ObjectId,
    image_id: ObjectId,
) -> Result<String, PdfError> {
    let (mut resources, holder) = resolve_resources(doc, page_id)?;

    let mut xobjects = match resources.get(b"XObject") {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(id)) => doc
            .get_object(*id)
            .and_then(Object::as_dict)
            .map(Clone::clone)
            .map_err(|e| PdfError::MalformedPage(format!("XObject resources: {}", e)))?,
        _ => Dictionary::new(),
    };

    let name = (0u32..)
        .map(|n| format!("SigIm{}", n))
        .find(|candidate| !xobjects.has(candidate.as_bytes()))
        .unwrap_or_else(|| "SigIm".to_string());

    xobjects.set(name.as_bytes().to_vec(), Object::Reference(image_id));
    resources.set("XObject", Object::Dictionary(xobjects));

    match holder {
        Some(id) => {
            doc.objects.insert(id, Object::Dictionary(resources));
        }
        None => {
            page_dict_mut(doc, page_id)?.set("Resources", Object::Dictionary(resources));
        }
    }

    Ok(name)
}

/// Append a content stream to the page. Existing content is wrapped in its
/// own save/restore pair so graphics state it leaves behind cannot leak into
/// the appended drawing.
fn append_content(doc: &mut Document, page_id: ObjectId, content: Vec<u8>) -> Result<(), PdfError> {
    let existing: Vec<Object> = {
        let page = doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|e| PdfError::MalformedPage(e.to_string()))?;

        match page.get(b"Contents") {
            Ok(Object::Reference(id)) => match doc.get_object(*id) {
                Ok(Object::Array(items)) => items.clone(),
                _ => vec![Object::Reference(*id)],
            },
            Ok(Object::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    };

    let mut contents = Vec::with_capacity(existing.len() + 2);
    let mut appended = Vec::with_capacity(content.len() + 2);

    if !existing.is_empty() {
        let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        contents.push(Object::Reference(save_id));
        contents.extend(existing);
        appended.extend_from_slice(b"Q\n");
    }
    appended.extend_from_slice(&content);

    let appended_id = doc.add_object(Stream::new(Dictionary::new(), appended));
    contents.push(Object::Reference(appended_id));

    page_dict_mut(doc, page_id)?.set("Contents", Object::Array(contents));
    Ok(())
}
