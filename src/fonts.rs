//! Font metrics and text measurement using `ttf-parser`.
//!
//! The canvas needs text widths to wrap and align cells. When a real TTF/OTF
//! face is loaded we sum glyph advances; otherwise a Helvetica-like average
//! character width keeps measurement deterministic with the builtin PDF
//! fonts.

use std::collections::HashMap;

/// A loaded font face with metrics.
#[derive(Clone)]
struct FontData {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API).
    bytes: Vec<u8>,
    units_per_em: f32,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct FontKey {
    family: String,
    bold: bool,
}

/// Manages loaded fonts and answers measurement queries.
pub struct FontManager {
    fonts: HashMap<FontKey, FontData>,
}

impl FontManager {
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
        }
    }

    /// Load a TTF/OTF font for more accurate wrapping. Optional; without it
    /// the heuristic metrics below apply.
    pub fn load_font(&mut self, family: &str, bold: bool, bytes: Vec<u8>) -> Result<(), String> {
        let face = ttf_parser::Face::parse(&bytes, 0)
            .map_err(|e| format!("failed to parse font: {e}"))?;
        let data = FontData {
            units_per_em: face.units_per_em() as f32,
            bytes,
        };
        self.fonts.insert(
            FontKey {
                family: family.to_string(),
                bold,
            },
            data,
        );
        Ok(())
    }

    /// Measure the width of a string at a given font size (points).
    pub fn measure_text_width(&self, text: &str, font_size: f32, bold: bool, family: &str) -> f32 {
        let key = FontKey {
            family: family.to_string(),
            bold,
        };

        let Some(data) = self.fonts.get(&key) else {
            // Average char width ≈ 0.5 × font size for proportional fonts;
            // bold runs ~10 % wider.
            let avg = if bold { 0.55 } else { 0.5 };
            return text.chars().count() as f32 * font_size * avg;
        };

        if let Ok(face) = ttf_parser::Face::parse(&data.bytes, 0) {
            let scale = font_size / data.units_per_em;
            let mut width = 0.0f32;
            for ch in text.chars() {
                if let Some(gid) = face.glyph_index(ch) {
                    width += face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale;
                } else {
                    width += font_size * 0.5;
                }
            }
            width
        } else {
            text.chars().count() as f32 * font_size * 0.5
        }
    }

    /// Word-wrap text to fit within `max_width` points. Existing newlines
    /// are respected; a word longer than the width gets its own line.
    pub fn wrap_text(
        &self,
        text: &str,
        font_size: f32,
        bold: bool,
        family: &str,
        max_width: f32,
    ) -> Vec<String> {
        if max_width <= 0.0 || text.is_empty() {
            return vec![text.to_string()];
        }

        let mut lines: Vec<String> = Vec::new();
        for paragraph in text.split('\n') {
            let words: Vec<&str> = paragraph.split_whitespace().collect();
            if words.is_empty() {
                lines.push(String::new());
                continue;
            }

            let mut current = String::new();
            for word in &words {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", current, word)
                };
                let w = self.measure_text_width(&candidate, font_size, bold, family);
                if w > max_width && !current.is_empty() {
                    lines.push(current);
                    current = word.to_string();
                } else {
                    current = candidate;
                }
            }
            if !current.is_empty() {
                lines.push(current);
            }
        }

        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}
