//! Renderer-neutral text attributes.
//!
//! The document model never touches platform font or color types. Styles are
//! plain data (`family`/`weight`/`slant`/`size` plus colors); the host maps
//! them to whatever its rendering stack uses. "Hidden" text is encoded as a
//! fully transparent foreground with the size collapsed to
//! [`HIDDEN_FONT_SIZE`]; the characters stay in the buffer so offsets and
//! cursor motion are unaffected.

/// Point size used when no other size has been configured.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Collapsed point size for visually hidden characters.
pub const HIDDEN_FONT_SIZE: f32 = 0.01;

/// Font family selector; hosts map these to concrete fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    /// The host's proportional body font.
    #[default]
    Proportional,
    /// The host's fixed-width font (code spans).
    Monospace,
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Regular,
    /// Bold weight.
    Bold,
}

/// Font slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontSlant {
    /// Upright glyphs.
    #[default]
    Upright,
    /// Italic glyphs.
    Italic,
}

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; `0` is fully transparent.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// The same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Whether the color is fully transparent.
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }
}

/// A complete font description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    /// Family selector.
    pub family: FontFamily,
    /// Weight.
    pub weight: FontWeight,
    /// Slant.
    pub slant: FontSlant,
    /// Point size as the host understands it.
    pub size: f32,
}

impl FontSpec {
    /// A proportional, regular, upright font at `size` points.
    pub fn new(size: f32) -> Self {
        Self {
            family: FontFamily::default(),
            weight: FontWeight::default(),
            slant: FontSlant::default(),
            size,
        }
    }

    /// Replace the family.
    pub fn with_family(mut self, family: FontFamily) -> Self {
        self.family = family;
        self
    }

    /// Replace the weight.
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Replace the slant.
    pub fn with_slant(mut self, slant: FontSlant) -> Self {
        self.slant = slant;
        self
    }

    /// Replace the size.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_SIZE)
    }
}

/// The full set of attributes carried by one style run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font description.
    pub font: FontSpec,
    /// Foreground color.
    pub foreground: Color,
    /// Optional background fill.
    pub background: Option<Color>,
}

impl TextStyle {
    /// A style with no background.
    pub fn new(font: FontSpec, foreground: Color) -> Self {
        Self {
            font,
            foreground,
            background: None,
        }
    }

    /// The same style with a background fill.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = Some(background);
        self
    }

    /// The visually absent form of this style: transparent foreground and
    /// collapsed size. The underlying characters remain in the buffer.
    pub fn hidden(mut self) -> Self {
        self.foreground = self.foreground.with_alpha(0);
        self.font.size = HIDDEN_FONT_SIZE;
        self
    }

    /// Whether this style renders its text invisible.
    pub fn is_hidden(&self) -> bool {
        self.foreground.is_transparent() && self.font.size <= HIDDEN_FONT_SIZE
    }
}

/// A partial attribute change merged over existing styles.
///
/// `None` fields leave the current value in place. The background field is
/// doubled so `Some(None)` can clear an existing fill.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StylePatch {
    /// Replacement font family.
    pub family: Option<FontFamily>,
    /// Replacement font weight.
    pub weight: Option<FontWeight>,
    /// Replacement font slant.
    pub slant: Option<FontSlant>,
    /// Replacement font size.
    pub size: Option<f32>,
    /// Replacement foreground color.
    pub foreground: Option<Color>,
    /// Replacement background; `Some(None)` removes an existing fill.
    pub background: Option<Option<Color>>,
}

impl StylePatch {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font family.
    pub fn family(mut self, family: FontFamily) -> Self {
        self.family = Some(family);
        self
    }

    /// Set the font weight.
    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Set the font slant.
    pub fn slant(mut self, slant: FontSlant) -> Self {
        self.slant = Some(slant);
        self
    }

    /// Set the font size.
    pub fn size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the foreground color.
    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    /// Set the background fill.
    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(Some(color));
        self
    }

    /// Remove any background fill.
    pub fn clear_background(mut self) -> Self {
        self.background = Some(None);
        self
    }

    /// Merge this patch into `style`.
    pub fn apply_to(&self, style: &mut TextStyle) {
        if let Some(family) = self.family {
            style.font.family = family;
        }
        if let Some(weight) = self.weight {
            style.font.weight = weight;
        }
        if let Some(slant) = self.slant {
            style.font.slant = slant;
        }
        if let Some(size) = self.size {
            style.font.size = size;
        }
        if let Some(foreground) = self.foreground {
            style.foreground = foreground;
        }
        if let Some(background) = self.background {
            style.background = background;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_style_is_detectable() {
        let style = TextStyle::new(FontSpec::default(), Color::rgb(20, 20, 20));
        assert!(!style.is_hidden());

        let hidden = style.hidden();
        assert!(hidden.is_hidden());
        assert!(hidden.foreground.is_transparent());
        assert_eq!(hidden.font.size, HIDDEN_FONT_SIZE);
    }

    #[test]
    fn test_patch_merges_only_set_fields() {
        let mut style = TextStyle::new(FontSpec::default(), Color::rgb(1, 2, 3))
            .with_background(Color::rgb(200, 200, 200));

        StylePatch::new()
            .weight(FontWeight::Bold)
            .size(20.0)
            .apply_to(&mut style);

        assert_eq!(style.font.weight, FontWeight::Bold);
        assert_eq!(style.font.size, 20.0);
        assert_eq!(style.font.slant, FontSlant::Upright);
        assert_eq!(style.foreground, Color::rgb(1, 2, 3));
        assert_eq!(style.background, Some(Color::rgb(200, 200, 200)));
    }

    #[test]
    fn test_patch_can_clear_background() {
        let mut style = TextStyle::new(FontSpec::default(), Color::rgb(1, 2, 3))
            .with_background(Color::rgb(200, 200, 200));

        StylePatch::new().clear_background().apply_to(&mut style);
        assert_eq!(style.background, None);
    }

    #[test]
    fn test_font_spec_builders() {
        let font = FontSpec::new(14.0)
            .with_family(FontFamily::Monospace)
            .with_weight(FontWeight::Bold)
            .with_slant(FontSlant::Italic);

        assert_eq!(font.family, FontFamily::Monospace);
        assert_eq!(font.weight, FontWeight::Bold);
        assert_eq!(font.slant, FontSlant::Italic);
        assert_eq!(font.size, 14.0);
    }
}
