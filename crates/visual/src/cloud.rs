use crate::error::{backend_error, RenderResult};
use chatlens_core::RenderConfig;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::Serialize;
use std::path::Path;

/// Spiral step in radians.
const SPIRAL_STEP: f64 = 0.1;

/// Pixels the spiral radius grows per radian.
const SPIRAL_GROWTH: f64 = 2.0;

/// Padding kept between two placed words.
const WORD_PADDING: f64 = 2.0;

/// A word positioned on the canvas. `x`/`y` are the box centre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedWord {
    /// Term text.
    pub text: String,
    /// Centre x in pixels.
    pub x: f64,
    /// Centre y in pixels.
    pub y: f64,
    /// Font size in pixels.
    pub font_size: f64,
    /// Estimated box width.
    pub width: f64,
    /// Estimated box height.
    pub height: f64,
}

impl PlacedWord {
    fn overlaps(&self, other: &PlacedWord) -> bool {
        (self.x - other.x).abs() * 2.0 < self.width + other.width + WORD_PADDING
            && (self.y - other.y).abs() * 2.0 < self.height + other.height + WORD_PADDING
    }
}

/// Greedy spiral layout: heaviest words first, each walked outward along an
/// Archimedean spiral from the canvas centre until it fits.
#[derive(Debug, Clone)]
pub struct WordCloudLayout {
    width: f64,
    height: f64,
    min_font: f64,
    max_font: f64,
}

/// Estimated rendered width of `text`. Wide (CJK) glyphs take a full em.
pub fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars()
        .map(|c| if c.is_ascii() { 0.6 } else { 1.0 })
        .sum::<f64>()
        * font_size
}

impl WordCloudLayout {
    /// Layout for a `width` x `height` canvas.
    pub fn new(width: u32, height: u32, min_font: f64, max_font: f64) -> Self {
        let min_font = min_font.max(1.0);
        Self {
            width: f64::from(width),
            height: f64::from(height),
            min_font,
            max_font: max_font.max(min_font),
        }
    }

    /// Font size for `weight` relative to the heaviest word.
    pub fn font_size(&self, weight: f64, max_weight: f64) -> f64 {
        if max_weight <= 0.0 {
            return self.min_font;
        }
        self.min_font + (self.max_font - self.min_font) * (weight / max_weight).clamp(0.0, 1.0)
    }

    fn fits(&self, word: &PlacedWord) -> bool {
        word.x - word.width / 2.0 >= 0.0
            && word.x + word.width / 2.0 <= self.width
            && word.y - word.height / 2.0 >= 0.0
            && word.y + word.height / 2.0 <= self.height
    }

    /// Place `words` (term, weight). Non-positive weights and blank terms
    /// are dropped, as are words that find no free spot.
    pub fn place(&self, words: &[(String, f64)]) -> Vec<PlacedWord> {
        let mut ordered: Vec<&(String, f64)> = words
            .iter()
            .filter(|(text, weight)| *weight > 0.0 && !text.trim().is_empty())
            .collect();
        // Stable sort keeps input order among equal weights.
        ordered.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let max_weight = ordered.first().map(|w| w.1).unwrap_or(0.0);
        let max_radius = (self.width.powi(2) + self.height.powi(2)).sqrt() / 2.0;
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        let mut placed: Vec<PlacedWord> = Vec::with_capacity(ordered.len());

        for (text, weight) in ordered {
            let font_size = self.font_size(*weight, max_weight);
            let mut candidate = PlacedWord {
                text: text.clone(),
                x: cx,
                y: cy,
                font_size,
                width: text_width(text, font_size),
                height: font_size,
            };

            let mut t = 0.0;
            loop {
                let r = SPIRAL_GROWTH * t;
                if r > max_radius {
                    break;
                }
                candidate.x = cx + r * t.cos();
                candidate.y = cy + r * t.sin();
                if self.fits(&candidate) && !placed.iter().any(|p| p.overlaps(&candidate)) {
                    placed.push(candidate);
                    break;
                }
                t += SPIRAL_STEP;
            }
        }

        placed
    }
}

pub(crate) fn draw_cloud(
    config: &RenderConfig,
    palette: &[RGBColor],
    words: &[PlacedWord],
    path: &Path,
) -> RenderResult<()> {
    let root = SVGBackend::new(path, (config.cloud_width, config.cloud_height)).into_drawing_area();
    root.fill(&WHITE).map_err(backend_error)?;

    for (word, color) in words.iter().zip(palette.iter().cycle()) {
        let style = (config.font_family.as_str(), word.font_size)
            .into_font()
            .color(color)
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(
            word.text.clone(),
            (word.x.round() as i32, word.y.round() as i32),
            style,
        ))
        .map_err(backend_error)?;
    }

    root.present().map_err(backend_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[(&str, f64)]) -> Vec<(String, f64)> {
        items.iter().map(|(t, w)| (t.to_string(), *w)).collect()
    }

    #[test]
    fn heaviest_word_sits_in_the_centre_at_max_size() {
        let layout = WordCloudLayout::new(400, 300, 10.0, 60.0);
        let placed = layout.place(&words(&[("八卦", 1.0), ("红包", 4.0)]));

        assert_eq!(placed[0].text, "红包");
        assert_eq!(placed[0].font_size, 60.0);
        assert_eq!((placed[0].x, placed[0].y), (200.0, 150.0));
        assert!(placed[1].font_size < placed[0].font_size);
    }

    #[test]
    fn placed_words_never_overlap() {
        let layout = WordCloudLayout::new(400, 300, 10.0, 40.0);
        let input: Vec<(String, f64)> = (0..30).map(|i| (format!("word{}", i), 30.0 - i as f64)).collect();
        let placed = layout.place(&input);

        assert!(!placed.is_empty());
        for (i, a) in placed.iter().enumerate() {
            assert!(layout.fits(a));
            for b in &placed[i + 1..] {
                assert!(!a.overlaps(b), "{} overlaps {}", a.text, b.text);
            }
        }
    }

    #[test]
    fn zero_weights_and_blank_terms_are_dropped() {
        let layout = WordCloudLayout::new(200, 200, 8.0, 20.0);
        let placed = layout.place(&words(&[("gone", 0.0), (" ", 3.0), ("kept", 1.0)]));
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].text, "kept");
    }

    #[test]
    fn oversized_word_is_skipped() {
        let layout = WordCloudLayout::new(50, 20, 30.0, 30.0);
        assert!(layout.place(&words(&[("muchtoolongforthiscanvas", 1.0)])).is_empty());
    }

    #[test]
    fn cjk_glyphs_are_wider() {
        assert!(text_width("男神", 10.0) > text_width("ab", 10.0));
        assert_eq!(text_width("男神", 10.0), 20.0);
    }
}
