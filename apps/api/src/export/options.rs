//! Export configuration: the immutable options record handed to a `PdfExporter`.
//!
//! Only the image encoding, encoding quality and canvas scale vary with
//! `QualityTier`. Everything that positions content on the page (margins,
//! page format, page-break mode) and the output shape are tier-independent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Image encoding used for each rasterized page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Lossy; honours `ImageOptions::quality`.
    Jpeg,
    /// Lossless; embedded as Flate-compressed RGB.
    Png,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageOptions {
    pub format: ImageFormat,
    /// Fraction in (0, 1]. Ignored by lossless formats.
    pub quality: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasOptions {
    /// Canvas pixels per PDF point.
    pub scale: f32,
}

/// Page margin in points, CSS-style: one value, `[vertical, horizontal]`, or
/// `[top, left, bottom, right]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Margin {
    Uniform(f32),
    Axes([f32; 2]),
    Sides([f32; 4]),
}

/// Resolved margin edges in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edges {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl Margin {
    pub fn edges(&self) -> Edges {
        match *self {
            Margin::Uniform(m) => Edges { top: m, left: m, bottom: m, right: m },
            Margin::Axes([v, h]) => Edges { top: v, left: h, bottom: v, right: h },
            Margin::Sides([top, left, bottom, right]) => Edges { top, left, bottom, right },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    Letter,
    A4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFormat {
    pub size: PageSize,
    pub orientation: Orientation,
}

impl PageFormat {
    /// `(width, height)` in points.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        let (w, h) = match self.size {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.28, 841.89),
        };
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// How the rendered canvas is split into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageBreakMode {
    /// Cut the canvas every printable-page height, even through a line of text.
    Slice,
    /// Move any block that would straddle a page boundary onto the next page.
    AvoidBlocks,
}

/// What the exporter hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    /// Raw PDF bytes, served as a download.
    Bytes,
    /// `data:application/pdf;base64,...` string.
    DataUri,
    /// Written to the configured export directory.
    Save,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub margin: Margin,
    pub filename: String,
    pub image: ImageOptions,
    pub canvas: CanvasOptions,
    pub page: PageFormat,
    pub pagebreak: PageBreakMode,
    pub output: OutputType,
}

impl ExportOptions {
    /// Printable area `(width, height)` in points. May be non-positive when the
    /// margins are larger than the page; the exporter rejects that.
    pub fn content_box_pt(&self) -> (f32, f32) {
        let (w, h) = self.page.dimensions_pt();
        let e = self.margin.edges();
        (w - e.left - e.right, h - e.top - e.bottom)
    }

    pub fn for_tier(tier: QualityTier) -> Self {
        let (image, canvas) = tier.image_settings();
        ExportOptions {
            margin: Margin::Uniform(36.0),
            filename: "resume.pdf".to_string(),
            image,
            canvas,
            page: PageFormat {
                size: PageSize::Letter,
                orientation: Orientation::Portrait,
            },
            pagebreak: PageBreakMode::AvoidBlocks,
            output: OutputType::Bytes,
        }
    }

    /// Same layout, different fidelity.
    pub fn with_tier(mut self, tier: QualityTier) -> Self {
        let (image, canvas) = tier.image_settings();
        self.image = image;
        self.canvas = canvas;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions::for_tier(QualityTier::Improved)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Quality tiers
// ────────────────────────────────────────────────────────────────────────────

/// Fidelity presets, ordered lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// Lossy JPEG at 0.98, canvas scale 1.5.
    Standard,
    /// Lossless, quality 1.0, canvas scale 2.5.
    Improved,
}

impl QualityTier {
    fn image_settings(self) -> (ImageOptions, CanvasOptions) {
        match self {
            QualityTier::Standard => (
                ImageOptions {
                    format: ImageFormat::Jpeg,
                    quality: 0.98,
                },
                CanvasOptions { scale: 1.5 },
            ),
            QualityTier::Improved => (
                ImageOptions {
                    format: ImageFormat::Png,
                    quality: 1.0,
                },
                CanvasOptions { scale: 2.5 },
            ),
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QualityTier::Standard => "standard",
            QualityTier::Improved => "improved",
        })
    }
}

impl FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(QualityTier::Standard),
            "improved" => Ok(QualityTier::Improved),
            other => Err(format!("unknown quality tier '{other}'")),
        }
    }
}
