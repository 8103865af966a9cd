//! Glyph widths of the built-in Helvetica faces and word wrapping.

/// Points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

fn glyph_width(c: char, style: FontStyle) -> u16 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        let idx = (code - 32) as usize;
        return match style {
            FontStyle::Regular => HELVETICA_WIDTHS[idx],
            FontStyle::Bold => HELVETICA_BOLD_WIDTHS[idx],
        };
    }
    match (c, style) {
        ('Ä', _) => 667,
        ('Ö', _) => 778,
        ('Ü', _) => 722,
        ('ä', FontStyle::Regular) | ('ö', FontStyle::Regular) | ('ü', FontStyle::Regular) => 556,
        ('ä', FontStyle::Bold) => 556,
        ('ö', FontStyle::Bold) | ('ü', FontStyle::Bold) => 611,
        ('ß', _) => 611,
        ('€', _) => 556,
        ('§', _) => 556,
        ('²', _) | ('³', _) => 333,
        _ => 556,
    }
}

/// Width of `text` in millimetres at `size_pt`.
pub fn text_width_mm(text: &str, style: FontStyle, size_pt: f32) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_width(c, style) as u32).sum();
    units as f32 / 1000.0 * size_pt / PT_PER_MM
}

/// Greedy word wrap to `max_width_mm`.
///
/// Explicit newlines always break. A word wider than the column is split
/// between characters. Always returns at least one line.
pub fn wrap_text(text: &str, max_width_mm: f32, style: FontStyle, size_pt: f32) -> Vec<String> {
    let fits = |s: &str| text_width_mm(s, style, size_pt) <= max_width_mm;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if fits(&candidate) {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if fits(word) {
                current = word.to_string();
                continue;
            }

            // Split an overlong word.
            for c in word.chars() {
                current.push(c);
                if !fits(&current) && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_scales_with_size() {
        let small = text_width_mm("Fliesen", FontStyle::Regular, 10.0);
        let large = text_width_mm("Fliesen", FontStyle::Regular, 20.0);
        assert!((large - 2.0 * small).abs() < 1e-4);
    }

    #[test]
    fn test_known_width() {
        // 'm' is 833 units: 0.833 * 10pt = 8.33pt = 2.9386mm
        let w = text_width_mm("m", FontStyle::Regular, 10.0);
        assert!((w - 2.9386).abs() < 1e-3, "got {}", w);
        assert!(text_width_mm("Summe", FontStyle::Bold, 10.0) > text_width_mm("Summe", FontStyle::Regular, 10.0));
    }

    #[test]
    fn test_short_text_stays_on_one_line() {
        let lines = wrap_text("Fliesen verlegen", 70.0, FontStyle::Regular, 10.0);
        assert_eq!(lines, vec!["Fliesen verlegen"]);
    }

    #[test]
    fn test_long_text_wraps_within_width() {
        let text = "Wandfliesen im Badezimmer inklusive Grundierung, Abdichtung, \
                    Verfugung und Silikonarbeiten an allen Anschlussfugen verlegen";
        let lines = wrap_text(text, 70.0, FontStyle::Regular, 10.0);

        assert!(lines.len() >= 3, "expected several lines, got {:?}", lines);
        for line in &lines {
            assert!(text_width_mm(line, FontStyle::Regular, 10.0) <= 70.0, "{line:?} too wide");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_newlines_force_breaks() {
        let lines = wrap_text("Zeile eins\nZeile zwei", 70.0, FontStyle::Regular, 10.0);
        assert_eq!(lines, vec!["Zeile eins", "Zeile zwei"]);
    }

    #[test]
    fn test_overlong_word_is_split() {
        let word = "W".repeat(40);
        let lines = wrap_text(&word, 20.0, FontStyle::Regular, 10.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_empty_text_yields_one_line() {
        assert_eq!(wrap_text("", 70.0, FontStyle::Regular, 10.0), vec![String::new()]);
    }
}
