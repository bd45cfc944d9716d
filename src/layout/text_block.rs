use super::{LINE_SPACING_FACTOR, TextMeasure};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockSize {
    pub width: f32,
    pub height: f32,
}

pub fn line_height(font_size: f32) -> f32 {
    font_size + font_size * LINE_SPACING_FACTOR
}

/// Greedy word wrap. Words are never split, so a word wider than `max_width`
/// sits alone on its own line. Blank text yields a single empty line.
pub fn wrap_text(measure: &dyn TextMeasure, text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if measure.text_width(&candidate, font_size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_owned()));
        }
    }

    lines.push(current);
    lines
}

pub fn measure_block(measure: &dyn TextMeasure, lines: &[String], font_size: f32) -> BlockSize {
    let width = lines
        .iter()
        .map(|line| measure.text_width(line, font_size))
        .fold(0.0_f32, f32::max);

    BlockSize {
        width,
        height: lines.len().max(1) as f32 * line_height(font_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixedWidthMeasure;

    #[test]
    fn words_fill_lines_greedily() {
        let measure = FixedWidthMeasure::new(1.0);
        let lines = wrap_text(&measure, "aa bb cc dd", 5.0, 10.0);
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn candidate_exactly_at_max_width_fits() {
        let measure = FixedWidthMeasure::new(1.0);
        assert_eq!(wrap_text(&measure, "abc de", 6.0, 10.0), vec!["abc de"]);
        assert_eq!(wrap_text(&measure, "abc def", 6.0, 10.0), vec!["abc", "def"]);
    }

    #[test]
    fn oversized_word_is_not_split() {
        let measure = FixedWidthMeasure::new(1.0);
        let lines = wrap_text(&measure, "a enormousword b", 4.0, 10.0);
        assert_eq!(lines, vec!["a", "enormousword", "b"]);
    }

    #[test]
    fn blank_text_is_one_empty_line_with_height() {
        let measure = FixedWidthMeasure::new(1.0);
        let lines = wrap_text(&measure, "   ", 10.0, 10.0);
        assert_eq!(lines, vec![String::new()]);

        let size = measure_block(&measure, &lines, 20.0);
        assert_eq!(size.width, 0.0);
        assert_eq!(size.height, line_height(20.0));
        assert!(size.height > 0.0);
    }

    #[test]
    fn block_width_is_widest_line() {
        let measure = FixedWidthMeasure::new(2.0);
        let lines = vec!["abc".to_owned(), "abcdef".to_owned(), "a".to_owned()];
        let size = measure_block(&measure, &lines, 16.0);
        assert_eq!(size.width, 12.0);
        assert_eq!(size.height, 3.0 * (16.0 + 16.0 * LINE_SPACING_FACTOR));
    }
}
