//! Writes the placed signature into a PDF page

use crate::capability::PdfCapability;
use crate::coords::{CoordinateMapper, Placement};
use crate::error::ExportFailure;
use crate::signature::SignatureAsset;
use shared_pdf::{PdfDocument, PdfError};

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExportAdapter;

impl PdfExportAdapter {
    /// Load `source`, stamp the signature onto `page_index` and return the
    /// saved bytes. `source` itself is never modified, so a failed export can
    /// simply be retried.
    pub fn export(
        &self,
        source: &[u8],
        signature: &SignatureAsset,
        placement: Placement,
        page_index: usize,
    ) -> Result<Vec<u8>, ExportFailure> {
        let mut doc = PdfDocument::from_bytes(source)
            .map_err(|e| ExportFailure::SourceDecode(e.to_string()))?;
        self.export_into(&mut doc, signature, placement, page_index)
    }

    /// Stamp the signature into an already opened document. On error the
    /// document may hold a partially applied change and should be dropped.
    pub fn export_into<D: PdfCapability>(
        &self,
        doc: &mut D,
        signature: &SignatureAsset,
        placement: Placement,
        page_index: usize,
    ) -> Result<Vec<u8>, ExportFailure> {
        let count = doc.page_count();
        if page_index >= count {
            return Err(ExportFailure::PageOutOfRange {
                index: page_index,
                count,
            });
        }

        let media_box = doc.page_media_box(page_index).map_err(page_error)?;
        let native = CoordinateMapper::pdf_page(&media_box)
            .to_native(placement.rect, placement.viewport, media_box.frame())
            .ok_or(ExportFailure::UnmeasuredViewport)?;

        let raster = signature.decode()?;
        let handle = doc.embed_image(&raster).map_err(page_error)?;
        doc.draw_image(page_index, handle, native)
            .map_err(page_error)?;

        let bytes = doc
            .serialize()
            .map_err(|e| ExportFailure::Save(e.to_string()))?;

        tracing::info!(
            page_index,
            x = native.x,
            y = native.y,
            width = native.width,
            height = native.height,
            size = bytes.len(),
            "signed PDF page"
        );
        Ok(bytes)
    }
}

fn page_error(err: PdfError) -> ExportFailure {
    match err {
        PdfError::PageNotFound { index, count } => ExportFailure::PageOutOfRange { index, count },
        PdfError::SaveError(msg) => ExportFailure::Save(msg),
        other => ExportFailure::Embed(other.to_string()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::signature::tests::signature_png;
    use image::RgbaImage;
    use lopdf::{dictionary, Document, Object};
    use pretty_assertions::assert_eq;
    use shared_pdf::{ImageHandle, MediaBox};
    use shared_types::{NativeRect, OverlayRect, ViewportBounds};

    /// One page per media box, each declared on the page itself
    pub(crate) fn create_test_pdf(media_boxes: &[[i64; 4]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let kids: Vec<Object> = media_boxes
            .iter()
            .map(|media_box| {
                let media_box: Vec<Object> =
                    media_box.iter().map(|v| Object::Integer(*v)).collect();
                let page_id = doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => Object::Reference(pages_id),
                    "MediaBox" => media_box,
                });
                Object::Reference(page_id)
            })
            .collect();

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => Object::Integer(kids.len() as i64),
                "Kids" => kids,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    fn placement() -> Placement {
        Placement {
            rect: OverlayRect::new(100.0, 100.0, 200.0, 80.0),
            viewport: ViewportBounds::new(800.0, 600.0),
        }
    }

    /// Records what the adapter asks of the document
    #[derive(Default)]
    struct RecordingPdf {
        media_box: Option<MediaBox>,
        embedded: Vec<(u32, u32)>,
        drawn: Vec<(usize, NativeRect)>,
        fail_save: bool,
    }

    impl PdfCapability for RecordingPdf {
        fn page_count(&self) -> usize {
            2
        }

        fn page_media_box(&self, _page_index: usize) -> Result<MediaBox, PdfError> {
            Ok(self.media_box.unwrap_or(MediaBox {
                x: 0.0,
                y: 0.0,
                width: 1600.0,
                height: 1200.0,
            }))
        }

        fn embed_image(&mut self, image: &RgbaImage) -> Result<ImageHandle, PdfError> {
            self.embedded.push(image.dimensions());
            let mut scratch = PdfDocument::from_bytes(&create_test_pdf(&[[0, 0, 10, 10]]))?;
            scratch.embed_image(image)
        }

        fn draw_image(
            &mut self,
            page_index: usize,
            _handle: ImageHandle,
            rect: NativeRect,
        ) -> Result<(), PdfError> {
            self.drawn.push((page_index, rect));
            Ok(())
        }

        fn serialize(&mut self) -> Result<Vec<u8>, PdfError> {
            if self.fail_save {
                return Err(PdfError::SaveError("disk full".to_string()));
            }
            Ok(b"%PDF-stub".to_vec())
        }
    }

    #[test]
    fn test_maps_with_vertical_flip() {
        let mut doc = RecordingPdf::default();
        let signature = SignatureAsset::from_bytes(signature_png());

        let bytes = PdfExportAdapter
            .export_into(&mut doc, &signature, placement(), 1)
            .unwrap();

        assert_eq!(bytes, b"%PDF-stub".to_vec());
        assert_eq!(doc.embedded, vec![(20, 8)]);
        assert_eq!(doc.drawn, vec![(1, NativeRect::new(200.0, 840.0, 400.0, 160.0))]);
    }

    #[test]
    fn test_page_out_of_range() {
        let mut doc = RecordingPdf::default();
        let signature = SignatureAsset::from_bytes(signature_png());

        let result = PdfExportAdapter.export_into(&mut doc, &signature, placement(), 2);
        assert!(matches!(
            result,
            Err(ExportFailure::PageOutOfRange { index: 2, count: 2 })
        ));
        assert!(doc.embedded.is_empty());
    }

    #[test]
    fn test_save_failure_is_reported() {
        let mut doc = RecordingPdf {
            fail_save: true,
            ..RecordingPdf::default()
        };
        let signature = SignatureAsset::from_bytes(signature_png());

        let result = PdfExportAdapter.export_into(&mut doc, &signature, placement(), 0);
        assert!(matches!(result, Err(ExportFailure::Save(_))));
    }

    #[test]
    fn test_unmeasured_viewport() {
        let mut doc = RecordingPdf::default();
        let signature = SignatureAsset::from_bytes(signature_png());
        let placement = Placement {
            viewport: ViewportBounds::new(0.0, 0.0),
            ..placement()
        };

        let result = PdfExportAdapter.export_into(&mut doc, &signature, placement, 0);
        assert!(matches!(result, Err(ExportFailure::UnmeasuredViewport)));
    }

    #[test]
    fn test_export_writes_signature_to_page() {
        let source = create_test_pdf(&[[0, 0, 612, 792], [0, 0, 1600, 1200]]);
        let signature = SignatureAsset::from_bytes(signature_png());

        let signed = PdfExportAdapter
            .export(&source, &signature, placement(), 1)
            .unwrap();

        let reloaded = Document::load_mem(&signed).unwrap();
        let pages = reloaded.get_pages();
        let first = reloaded.get_page_content(pages[&1]).unwrap();
        let second = reloaded.get_page_content(pages[&2]).unwrap();

        assert!(first.is_empty());
        let ops = String::from_utf8(second).unwrap();
        assert!(
            ops.contains("400.0000 0 0 160.0000 200.0000 840.0000 cm"),
            "unexpected content: {}",
            ops
        );
    }

    #[test]
    fn test_failed_export_can_be_retried() {
        let source = create_test_pdf(&[[0, 0, 612, 792]]);
        let broken = SignatureAsset::from_bytes(b"not an image".to_vec());

        let result = PdfExportAdapter.export(&source, &broken, placement(), 0);
        assert!(matches!(result, Err(ExportFailure::SignatureDecode(_))));

        let signature = SignatureAsset::from_bytes(signature_png());
        assert!(PdfExportAdapter
            .export(&source, &signature, placement(), 0)
            .is_ok());
    }

    #[test]
    fn test_malformed_source() {
        let signature = SignatureAsset::from_bytes(signature_png());
        let result = PdfExportAdapter.export(b"%PDF-1.7 garbage", &signature, placement(), 0);
        assert!(matches!(result, Err(ExportFailure::SourceDecode(_))));
    }
}
