//! Decorative background. Purely cosmetic: takes no input at all, so it can
//! never see document data.

use std::fmt::Write;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PALETTE: [&str; 4] = ["#dbeafe", "#e0e7ff", "#fce7f3", "#dcfce7"];
const BLOB_COUNT: usize = 6;

// Fixed so every page load draws the same backdrop.
const BACKDROP_SEED: u64 = 0x0F01_10CA;

/// Soft drifting circles behind the editor, as an absolutely positioned SVG.
pub fn background_markup() -> String {
    let mut rng = StdRng::seed_from_u64(BACKDROP_SEED);
    let mut svg = String::from(
        "<div class=\"backdrop\" aria-hidden=\"true\" \
         style=\"position:fixed;inset:0;z-index:0;pointer-events:none\">\
         <svg width=\"100%\" height=\"100%\" viewBox=\"0 0 100 100\" preserveAspectRatio=\"none\">",
    );
    for i in 0..BLOB_COUNT {
        let cx: u32 = rng.random_range(0..100);
        let cy: u32 = rng.random_range(0..100);
        let r: u32 = rng.random_range(8..26);
        let drift: u32 = rng.random_range(12..32);
        let fill = PALETTE[i % PALETTE.len()];
        let _ = write!(
            svg,
            "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\" fill=\"{fill}\" opacity=\"0.6\">\
             <animate attributeName=\"cy\" values=\"{cy};{};{cy}\" dur=\"{drift}s\" \
             repeatCount=\"indefinite\"/></circle>",
            (cy + 6) % 100,
        );
    }
    svg.push_str("</svg></div>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_is_stable_across_calls() {
        assert_eq!(background_markup(), background_markup());
    }

    #[test]
    fn test_markup_is_well_formed() {
        let svg = background_markup();
        assert_eq!(svg.matches("<circle").count(), BLOB_COUNT);
        assert_eq!(svg.matches("</circle>").count(), BLOB_COUNT);
        assert!(svg.starts_with("<div class=\"backdrop\""));
        assert!(svg.ends_with("</svg></div>"));
    }
}
