//! Static font-metric tables for the résumé themes.
//!
//! Character widths are in em units (relative to font size). Each theme is
//! expressed as a horizontal scale over one humanist sans-serif base table; the
//! approximation is only used to decide where preview lines wrap, and the
//! rasterizer draws every glyph into exactly the advance measured here, so the
//! preview and the exported PDF always break lines in the same places.
//!
//! The base table covers ASCII 0x20..=0x7E. Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

/// The résumé themes. Each maps to a CSS font stack for the HTML preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    /// Clean humanist sans-serif.
    #[default]
    Inter,
    /// Old-style serif.
    EbGaramond,
    /// Geometric humanist sans-serif.
    Lato,
    /// Condensed display sans-serif.
    Oswald,
    /// Traditional TeX face.
    ComputerModern,
}

impl FontFamily {
    /// Horizontal scale relative to the base table.
    fn width_scale(self) -> f32 {
        match self {
            FontFamily::Inter => 1.0,
            FontFamily::EbGaramond => 0.85,
            FontFamily::Lato => 1.05,
            FontFamily::Oswald => 0.68,
            FontFamily::ComputerModern => 0.90,
        }
    }

    pub fn css_stack(self) -> &'static str {
        match self {
            FontFamily::Inter => "'Inter', 'Helvetica Neue', Arial, sans-serif",
            FontFamily::EbGaramond => "'EB Garamond', Garamond, Georgia, serif",
            FontFamily::Lato => "'Lato', 'Segoe UI', sans-serif",
            FontFamily::Oswald => "'Oswald', 'Arial Narrow', sans-serif",
            FontFamily::ComputerModern => "'CMU Serif', 'Latin Modern Roman', serif",
        }
    }

    pub fn metrics(self) -> FontMetrics {
        FontMetrics {
            scale: self.width_scale(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Metrics
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    scale: f32,
}

impl FontMetrics {
    /// Advance width of one character in em units.
    ///
    /// Non-ASCII characters fall back to the average character width.
    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        let base = if (32..=126).contains(&code) {
            BASE_WIDTHS[code - 32]
        } else {
            BASE_AVERAGE_WIDTH
        };
        base * self.scale
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    pub fn space_width(&self) -> f32 {
        self.char_width(' ')
    }

    /// Greedy word-wrap of `text` into lines no wider than `max_width_em`.
    ///
    /// Whitespace runs collapse to a single space. A word wider than the line
    /// sits alone on its own line. Empty or blank input yields no lines.
    pub fn wrap(&self, text: &str, max_width_em: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in text.split_whitespace() {
            let word_w = self.measure_str(word);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_w;
            } else if current_width + self.space_width() + word_w > max_width_em {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_w;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += self.space_width() + word_w;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Base width table (95 ASCII printable characters)
// ────────────────────────────────────────────────────────────────────────────

const BASE_AVERAGE_WIDTH: f32 = 0.52;

#[rustfmt::skip]
const BASE_WIDTHS: [f32; 95] = [
    // sp ! " # $ % & ' ( ) * + , - . /
    0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22,
    0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
    // digits
    0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
    // : ; < = > ? @
    0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
    // A-Z
    0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
    0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
    // [ \ ] ^ _ `
    0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
    // a-z
    0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
    0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
    // { | } ~
    0.33, 0.26, 0.33, 0.59,
];
