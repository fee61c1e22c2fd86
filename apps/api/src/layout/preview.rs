//! Preview layout: wraps a résumé into styled blocks at a given content width.

use serde::Serialize;

use crate::layout::font_metrics::FontFamily;
use crate::models::{CvDocument, FieldId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Name,
    Headline,
    Contact,
    SectionHeading,
    Paragraph,
}

impl BlockKind {
    pub fn font_size_pt(self) -> f32 {
        match self {
            BlockKind::Name => 22.0,
            BlockKind::Headline => 13.0,
            BlockKind::Contact => 9.5,
            BlockKind::SectionHeading => 12.0,
            BlockKind::Paragraph => 10.5,
        }
    }

    pub fn line_height_pt(self) -> f32 {
        self.font_size_pt() * 1.3
    }

    /// Vertical gap above the block.
    pub fn space_before_pt(self) -> f32 {
        match self {
            BlockKind::Name => 0.0,
            BlockKind::Headline | BlockKind::Contact => 2.0,
            BlockKind::SectionHeading => 14.0,
            BlockKind::Paragraph => 5.0,
        }
    }

    /// CSS class used by the HTML preview.
    pub fn css_class(self) -> &'static str {
        match self {
            BlockKind::Name => "cv-name",
            BlockKind::Headline => "cv-headline",
            BlockKind::Contact => "cv-contact",
            BlockKind::SectionHeading => "cv-section",
            BlockKind::Paragraph => "cv-paragraph",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewBlock {
    pub kind: BlockKind,
    /// The field the text came from; headings carry the field they introduce.
    pub source: FieldId,
    pub lines: Vec<String>,
}

impl PreviewBlock {
    /// Height of the text itself, excluding `space_before_pt`.
    pub fn text_height_pt(&self) -> f32 {
        self.lines.len() as f32 * self.kind.line_height_pt()
    }

    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewDocument {
    pub theme: FontFamily,
    pub content_width_pt: f32,
    pub blocks: Vec<PreviewBlock>,
}

impl PreviewDocument {
    pub fn line_count(&self) -> usize {
        self.blocks.iter().map(|b| b.lines.len()).sum()
    }

    /// All visible text, one block per line. Used for quick assertions and search.
    pub fn plain_text(&self) -> String {
        self.blocks.iter().map(|b| b.text()).collect::<Vec<_>>().join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Sections below the header, in display order, with their heading text.
const SECTIONS: [(FieldId, &str); 5] = [
    (FieldId::Summary, "Summary"),
    (FieldId::Experience, "Experience"),
    (FieldId::Education, "Education"),
    (FieldId::Skills, "Skills"),
    (FieldId::Message, "Message"),
];

/// Lays out the document at `content_width_pt`. Empty fields produce no blocks.
pub fn build_preview(doc: &CvDocument, content_width_pt: f32) -> PreviewDocument {
    let metrics = doc.theme.metrics();
    let mut blocks = Vec::new();

    let mut push = |kind: BlockKind, source: FieldId, text: &str| {
        let width_em = content_width_pt / kind.font_size_pt();
        let lines = metrics.wrap(text, width_em);
        if !lines.is_empty() {
            blocks.push(PreviewBlock { kind, source, lines });
        }
    };

    push(BlockKind::Name, FieldId::FullName, &doc.full_name);
    push(BlockKind::Headline, FieldId::Headline, &doc.headline);

    let contact = [FieldId::Email, FieldId::Phone, FieldId::Location]
        .into_iter()
        .map(|f| doc.field(f).trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");
    push(BlockKind::Contact, FieldId::Email, &contact);

    for (field, heading) in SECTIONS {
        let paragraphs = paragraphs(doc.field(field));
        if paragraphs.is_empty() {
            continue;
        }
        push(BlockKind::SectionHeading, field, &heading.to_uppercase());
        for paragraph in paragraphs {
            push(BlockKind::Paragraph, field, &paragraph);
        }
    }

    PreviewDocument {
        theme: doc.theme,
        content_width_pt,
        blocks,
    }
}

/// Splits free text on blank lines; single newlines stay inside a paragraph.
fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line.trim());
        }
    }
    if !current.is_empty() {
        out.push(current.join(" "));
    }
    out
}
