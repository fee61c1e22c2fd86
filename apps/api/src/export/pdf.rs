//! PDF assembly: one page per encoded image, drawn inside the page margins.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::export::encode::EncodedImage;
use crate::export::error::ExportError;
use crate::export::options::ExportOptions;

const IMAGE_NAME: &str = "Im0";

/// Builds the PDF and returns its bytes.
pub fn assemble(pages: Vec<EncodedImage>, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let (page_w, page_h) = options.page.dimensions_pt();
    let (content_w, content_h) = options.content_box_pt();
    let edges = options.margin.edges();

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for page in pages {
        let image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(page.width),
            "Height" => i64::from(page.height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => page.filter.pdf_name(),
        };
        // The data is already filtered; lopdf must not compress it again.
        let image_id = doc.add_object(Stream::new(image_dict, page.data).with_compression(false));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        content_w.into(),
                        0.0_f32.into(),
                        0.0_f32.into(),
                        content_h.into(),
                        edges.left.into(),
                        edges.bottom.into(),
                    ],
                ),
                Operation::new("Do", vec![IMAGE_NAME.into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.0_f32.into(), 0.0_f32.into(), page_w.into(), page_h.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { IMAGE_NAME => image_id },
            },
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
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(options.filename.trim_end_matches(".pdf")),
        "Producer" => Object::string_literal(concat!("folio ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::encode::ImageFilter;
    use crate::export::options::QualityTier;

    fn blank_page(width: u32, height: u32) -> EncodedImage {
        EncodedImage {
            width,
            height,
            filter: ImageFilter::Flate,
            data: vec![0x78, 0x9C, 0x03, 0x00, 0x00, 0x00, 0x00, 0x01],
        }
    }

    #[test]
    fn test_output_is_a_pdf_with_one_page_per_image() {
        let options = ExportOptions::for_tier(QualityTier::Improved);
        let bytes = assemble(vec![blank_page(10, 10), blank_page(10, 10)], &options).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let parsed = Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 2);
    }

    #[test]
    fn test_page_media_box_follows_page_format() {
        let options = ExportOptions::for_tier(QualityTier::Standard);
        let bytes = assemble(vec![blank_page(4, 4)], &options).unwrap();
        let parsed = Document::load_mem(&bytes).unwrap();
        let (_, page_id) = parsed.get_pages().into_iter().next().unwrap();
        let page = parsed.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        let height = media_box[3].as_float().unwrap();
        assert!((height - 792.0).abs() < 0.01);
    }
}
