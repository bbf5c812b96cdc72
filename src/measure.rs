use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone)]
pub struct TextMetrics {
    pub char_width: f64,
    /// Horizontal offset of a label from its node tick.
    pub label_offset: f64,
    /// Free space kept between a label and the next level's lanes.
    pub label_gap: f64,
    pub min_node_width: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 6.0,
            label_offset: 4.0,
            label_gap: 24.0,
            min_node_width: 70.0,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    /// Level pitch wide enough for the longest label.
    pub fn node_width<'a>(&self, labels: impl IntoIterator<Item = &'a str>) -> f64 {
        let widest = labels
            .into_iter()
            .map(|label| self.text_width(label))
            .fold(0.0, f64::max);

        (widest + self.label_offset + self.label_gap).max(self.min_node_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        let m = TextMetrics::default();
        assert_eq!(m.text_width("ITSC"), 4.0 * 6.0);
    }

    #[test]
    fn test_unicode_width() {
        let m = TextMetrics::default();
        // full-width characters count double
        assert_eq!(m.text_width("情報"), 4.0 * 6.0);
    }

    #[test]
    fn test_node_width_follows_longest_label() {
        let m = TextMetrics::default();
        let long = "ITCS 3155 - Software Engineering";
        let w = m.node_width(["ITSC 1212", long]);
        assert_eq!(w, m.text_width(long) + 4.0 + 24.0);
    }

    #[test]
    fn test_node_width_minimum() {
        let m = TextMetrics::default();
        assert_eq!(m.node_width(["A"]), 70.0);
        assert_eq!(m.node_width(std::iter::empty()), 70.0);
    }
}
