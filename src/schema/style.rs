use serde::{Deserialize, Serialize};
use std::fmt;

/// Illustration style. Purely cosmetic: it is interpolated into image
/// prompts and picks a placeholder palette, but never changes the plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Cartoon,
    Watercolor,
    Flat,
    Painterly,
    Realistic,
}

/// An RGB colour.
pub type Rgb = (u8, u8, u8);

/// Colours used for placeholder illustrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub accent: Rgb,
    pub text: Rgb,
    pub secondary: Rgb,
}

impl Style {
    pub const ALL: [Style; 5] = [
        Style::Cartoon,
        Style::Watercolor,
        Style::Flat,
        Style::Painterly,
        Style::Realistic,
    ];

    /// Lowercase label, as used in prompts: "cartoon", "watercolor", ...
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cartoon => "cartoon",
            Self::Watercolor => "watercolor",
            Self::Flat => "flat",
            Self::Painterly => "painterly",
            Self::Realistic => "realistic",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn parse(label: &str) -> Option<Style> {
        let label = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Like [`Style::parse`] but falls back to [`Style::Cartoon`].
    pub fn parse_or_default(label: &str) -> Style {
        Self::parse(label).unwrap_or_default()
    }

    /// Keywords appended to image prompts to keep every page in the same look.
    pub fn consistency_clause(&self) -> &'static str {
        match self {
            Self::Cartoon => "cartoon style, bright colors, simple shapes, child-friendly",
            Self::Watercolor => {
                "watercolor painting style, soft brushstrokes, gentle colors, artistic"
            }
            Self::Flat => "flat design style, clean lines, minimal shading, modern illustration",
            Self::Painterly => "painterly style, artistic brushwork, rich colors, traditional art",
            Self::Realistic => {
                "realistic illustration style, detailed, lifelike, photographic quality"
            }
        }
    }

    pub fn palette(&self) -> Palette {
        let secondary = (108, 117, 125);
        match self {
            Self::Cartoon => Palette {
                background: (255, 255, 255),
                accent: (255, 193, 7),
                text: (33, 37, 41),
                secondary,
            },
            Self::Watercolor => Palette {
                background: (248, 249, 250),
                accent: (220, 53, 69),
                text: (52, 58, 64),
                secondary,
            },
            Self::Flat => Palette {
                background: (255, 255, 255),
                accent: (0, 123, 255),
                text: (33, 37, 41),
                secondary,
            },
            Self::Painterly => Palette {
                background: (245, 245, 245),
                accent: (40, 167, 69),
                text: (33, 37, 41),
                secondary,
            },
            Self::Realistic => Palette {
                background: (248, 249, 250),
                accent: (102, 16, 242),
                text: (33, 37, 41),
                secondary,
            },
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Requested illustration size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    /// Sizes offered to users.
    pub const PRESETS: [ImageSize; 3] = [
        ImageSize::new(1024, 1024),
        ImageSize::new(1200, 1600),
        ImageSize::new(1024, 1536),
    ];

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Parse `WIDTHxHEIGHT`. Anything unparseable (or a zero dimension)
    /// degrades to 1024x1024.
    pub fn parse(input: &str) -> ImageSize {
        let parsed = input.trim().split_once(['x', 'X']).and_then(|(w, h)| {
            let w = w.trim().parse::<u32>().ok()?;
            let h = h.trim().parse::<u32>().ok()?;
            (w > 0 && h > 0).then_some(ImageSize::new(w, h))
        });
        parsed.unwrap_or_default()
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::new(1024, 1024)
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<String> for ImageSize {
    fn from(value: String) -> Self {
        ImageSize::parse(&value)
    }
}

impl From<ImageSize> for String {
    fn from(value: ImageSize) -> Self {
        value.to_string()
    }
}
