//! Visual defaults for rendered markdown.

use livemark_core::{Color, FontSpec, TextStyle};

/// Glyph shown in place of a list marker while the cursor is elsewhere.
pub const BULLET: char = '\u{2022}';

/// The colors and fonts the engine styles tokens with.
///
/// Hosts that want different visuals construct one of these and hand it to
/// the engine; everything here is plain data.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    /// Font for unstyled text; headers scale up from its size.
    pub base_font: FontSpec,
    /// Default foreground.
    pub text_color: Color,
    /// Foreground for inline and fenced code spans.
    pub code_foreground: Color,
    /// Background for inline and fenced code spans.
    pub code_background: Color,
    /// Dimmed foreground for half-typed markers.
    pub incomplete_foreground: Color,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            base_font: FontSpec::default(),
            text_color: Color::rgb(20, 20, 20),
            code_foreground: Color::rgb(199, 37, 78),
            code_background: Color::rgb(244, 244, 244),
            incomplete_foreground: Color::rgb(160, 160, 160),
        }
    }
}

impl StyleSheet {
    /// The style every formatting pass resets to before styling tokens.
    pub fn base_style(&self) -> TextStyle {
        TextStyle::new(self.base_font, self.text_color)
    }

    /// Font size for a header of `level`, never below the base size.
    ///
    /// Size grows two points per level of prominence: `###### h6` renders
    /// at the base size and `# h1` ten points larger. Out-of-range levels
    /// clamp.
    pub fn header_size(&self, level: u8) -> f32 {
        let level = level.clamp(1, 6) as f32;
        let size = self.base_font.size + (6.0 - level) * 2.0;
        size.max(self.base_font.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_size_scales_down_to_base() {
        let styles = StyleSheet::default();
        let base = styles.base_font.size;
        assert_eq!(styles.header_size(1), base + 10.0);
        assert_eq!(styles.header_size(5), base + 2.0);
        assert_eq!(styles.header_size(6), base);
        // Clamped rather than shrinking below base.
        assert_eq!(styles.header_size(0), base + 10.0);
        assert_eq!(styles.header_size(9), base);
    }

    #[test]
    fn test_base_style_carries_font_and_color() {
        let styles = StyleSheet::default();
        let style = styles.base_style();
        assert_eq!(style.font, styles.base_font);
        assert_eq!(style.foreground, styles.text_color);
        assert_eq!(style.background, None);
    }
}
