use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Advance width of `text` in pixels. Uses a system font matching
/// `font_family` when one is installed, otherwise per-character width
/// factors calibrated on a generic sans-serif face.
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> f32 {
    if text.is_empty() || font_size <= 0.0 {
        return 0.0;
    }
    TEXT_MEASURER
        .lock()
        .ok()
        .and_then(|mut guard| guard.measure(text, font_size, font_family))
        .unwrap_or_else(|| fallback_text_width(text, font_size))
}

pub fn fallback_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

pub(crate) fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.278,
        '.' | ',' | ':' | ';' | '!' | '|' | '\'' => 0.278,
        'i' | 'j' | 'l' => 0.222,
        'f' | 't' | 'I' | '(' | ')' | '[' | ']' => 0.333,
        'r' => 0.333,
        'm' | 'M' => 0.833,
        'w' => 0.722,
        'W' => 0.944,
        '@' => 1.015,
        'A'..='Z' => 0.667,
        'a'..='z' => 0.556,
        '0'..='9' => 0.556,
        // CJK ideographs, kana and full-width forms occupy a full em.
        '\u{2E80}'..='\u{9FFF}' | '\u{AC00}'..='\u{D7AF}' | '\u{FF00}'..='\u{FFEF}' => 1.0,
        _ => 0.584,
    }
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<LoadedFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = font_family.trim().to_ascii_lowercase();
        if !self.faces.contains_key(&key) {
            let face = self.load_face(font_family);
            self.faces.insert(key.clone(), face);
        }
        let face = self.faces.get(&key)?.as_ref()?;
        face.measure(text, font_size)
    }

    fn load_face(&mut self, font_family: &str) -> Option<LoadedFace> {
        let families: Vec<Family<'_>> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\''))
            .filter(|part| !part.is_empty())
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" => Family::SansSerif,
                "monospace" => Family::Monospace,
                "cursive" => Family::Cursive,
                "fantasy" => Family::Fantasy,
                _ => Family::Name(name),
            })
            .chain(std::iter::once(Family::SansSerif))
            .collect();

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let id = self.db.query(&Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        })?;
        let mut loaded = None;
        self.db.with_face_data(id, |data, index| {
            loaded = LoadedFace::parse(data, index);
        });
        loaded
    }
}

/// Horizontal advances pulled out of a parsed face, so the font bytes do not
/// have to outlive the lookup.
struct LoadedFace {
    units_per_em: f32,
    advances: HashMap<char, u16>,
    ascii: [Option<u16>; 128],
}

impl LoadedFace {
    fn parse(data: &[u8], index: u32) -> Option<Self> {
        let face = Face::parse(data, index).ok()?;
        let mut ascii = [None; 128];
        for byte in 0u8..=127 {
            ascii[byte as usize] = face
                .glyph_index(byte as char)
                .and_then(|glyph| face.glyph_hor_advance(glyph));
        }
        let mut advances = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables.into_iter().filter(|s| s.is_unicode()) {
                subtable.codepoints(|code| {
                    if code < 128 {
                        return;
                    }
                    let Some(ch) = char::from_u32(code) else {
                        return;
                    };
                    if let Some(advance) = subtable
                        .glyph_index(code)
                        .and_then(|glyph| face.glyph_hor_advance(glyph))
                    {
                        advances.insert(ch, advance);
                    }
                });
            }
        }
        Some(Self {
            units_per_em: face.units_per_em().max(1) as f32,
            advances,
            ascii,
        })
    }

    fn measure(&self, text: &str, font_size: f32) -> Option<f32> {
        let scale = font_size / self.units_per_em;
        let width = text
            .chars()
            .filter(|ch| *ch != '\n')
            .map(|ch| {
                let advance = if ch.is_ascii() {
                    self.ascii[ch as usize]
                } else {
                    self.advances.get(&ch).copied()
                };
                match advance {
                    Some(units) => units as f32 * scale,
                    None => char_width_factor(ch) * font_size,
                }
            })
            .sum::<f32>();
        Some(width.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_zero_width() {
        assert_eq!(measure_text_width("", 14.0, "sans-serif"), 0.0);
    }

    #[test]
    fn fallback_scales_with_font_size() {
        let w14 = fallback_text_width("Hello", 14.0);
        let w28 = fallback_text_width("Hello", 28.0);
        assert!((w28 - w14 * 2.0).abs() < 0.01);
    }

    #[test]
    fn wide_glyphs_get_full_em() {
        assert_eq!(char_width_factor('中'), 1.0);
        assert!(char_width_factor('i') < char_width_factor('m'));
    }

    #[test]
    fn measured_width_grows_with_text() {
        let short = measure_text_width("ab", 14.0, "sans-serif");
        let long = measure_text_width("abcdef", 14.0, "sans-serif");
        assert!(long > short);
    }
}
