//! Exporter: the opaque "HTML to canvas to PDF" collaborator.
//!
//! `AppState` holds an `Arc<dyn PdfExporter>`; handlers only see PDF bytes or
//! an `ExportError`. `RasterPdfExporter` is the in-process implementation.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::export::encode::encode_page;
use crate::export::error::ExportError;
use crate::export::options::ExportOptions;
use crate::export::pdf::assemble;
use crate::export::raster::render_canvas;
use crate::layout::PreviewDocument;

#[async_trait]
pub trait PdfExporter: Send + Sync {
    async fn export(
        &self,
        preview: PreviewDocument,
        options: ExportOptions,
    ) -> Result<Vec<u8>, ExportError>;
}

/// Rasterizes the preview, encodes each page image, and assembles the PDF.
pub struct RasterPdfExporter;

#[async_trait]
impl PdfExporter for RasterPdfExporter {
    async fn export(
        &self,
        preview: PreviewDocument,
        options: ExportOptions,
    ) -> Result<Vec<u8>, ExportError> {
        validate(&options)?;
        tokio::task::spawn_blocking(move || render_pdf(&preview, &options))
            .await
            .map_err(|e| ExportError::Task(e.to_string()))?
    }
}

/// The checks the pipeline enforces; the options record itself accepts anything.
pub fn validate(options: &ExportOptions) -> Result<(), ExportError> {
    let quality = options.image.quality;
    if !(quality > 0.0 && quality <= 1.0) {
        return Err(ExportError::InvalidOptions(format!(
            "image quality must be in (0, 1], got {quality}"
        )));
    }
    let scale = options.canvas.scale;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(ExportError::InvalidOptions(format!(
            "canvas scale must be a positive number, got {scale}"
        )));
    }
    let edges = options.margin.edges();
    if [edges.top, edges.left, edges.bottom, edges.right]
        .iter()
        .any(|m| !m.is_finite() || *m < 0.0)
    {
        return Err(ExportError::InvalidOptions(
            "margins must be non-negative numbers".to_string(),
        ));
    }
    let (w, h) = options.content_box_pt();
    if w < 1.0 || h < 1.0 {
        return Err(ExportError::InvalidOptions(format!(
            "margins leave no printable area ({w:.1}pt x {h:.1}pt)"
        )));
    }
    Ok(())
}

/// Synchronous pipeline body; runs inside `spawn_blocking`.
pub fn render_pdf(preview: &PreviewDocument, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    let canvas = render_canvas(preview, options)?;
    let pages = canvas
        .pages()
        .map(|page| encode_page(&page, &options.image))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        "Encoded {} page images ({} bytes)",
        pages.len(),
        pages.iter().map(|p| p.data.len()).sum::<usize>()
    );

    let bytes = assemble(pages, options)?;
    info!(
        "Exported '{}' ({:?}, quality {}, scale {}): {} bytes",
        options.filename, options.image.format, options.image.quality, options.canvas.scale,
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::options::{Margin, QualityTier};
    use crate::layout::{build_preview, FontFamily};
    use crate::models::{CvDocument, FieldId};

    fn sample_preview(options: &ExportOptions) -> PreviewDocument {
        let mut doc = CvDocument::new(FontFamily::EbGaramond);
        doc.set_field(FieldId::FullName, "Dorothy Vaughan".into());
        doc.set_field(FieldId::Headline, "FORTRAN programmer".into());
        doc.set_field(FieldId::Skills, "FORTRAN, numerical analysis, team leadership".into());
        build_preview(&doc, options.content_box_pt().0)
    }

    #[tokio::test]
    async fn test_export_produces_pdf_for_both_tiers() {
        for tier in [QualityTier::Standard, QualityTier::Improved] {
            let options = ExportOptions::for_tier(tier);
            let bytes = RasterPdfExporter
                .export(sample_preview(&options), options)
                .await
                .unwrap();
            assert!(bytes.starts_with(b"%PDF-"), "{tier} export is not a PDF");
        }
    }

    #[tokio::test]
    async fn test_invalid_quality_is_rejected() {
        let mut options = ExportOptions::for_tier(QualityTier::Standard);
        options.image.quality = 1.5;
        let err = RasterPdfExporter
            .export(sample_preview(&options), options)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::InvalidOptions(_)));
    }

    #[test]
    fn test_validate_rejects_bad_scale_and_margins() {
        let mut options = ExportOptions::for_tier(QualityTier::Standard);
        options.canvas.scale = 0.0;
        assert!(validate(&options).is_err());

        options.canvas.scale = f32::NAN;
        assert!(validate(&options).is_err());

        let mut options = ExportOptions::for_tier(QualityTier::Standard);
        options.margin = Margin::Uniform(400.0);
        assert!(validate(&options).is_err());

        let mut options = ExportOptions::for_tier(QualityTier::Standard);
        options.margin = Margin::Axes([-5.0, 10.0]);
        assert!(validate(&options).is_err());
    }

    #[tokio::test]
    async fn test_oversized_scale_is_invalid_options() {
        let mut options = ExportOptions::for_tier(QualityTier::Standard);
        options.canvas.scale = 1e10;
        let mut doc = CvDocument::new(FontFamily::Inter);
        let body = (0..60)
            .map(|i| format!("Paragraph {i} about mission planning and flight software."))
            .collect::<Vec<_>>()
            .join("\n\n");
        doc.set_field(FieldId::Experience, body);
        let preview = build_preview(&doc, options.content_box_pt().0);

        let err = RasterPdfExporter.export(preview, options).await.unwrap_err();
        assert!(matches!(err, ExportError::InvalidOptions(_)), "got {err:?}");
    }

    #[test]
    fn test_validate_accepts_tier_presets() {
        assert!(validate(&ExportOptions::for_tier(QualityTier::Standard)).is_ok());
        assert!(validate(&ExportOptions::for_tier(QualityTier::Improved)).is_ok());
    }
}
