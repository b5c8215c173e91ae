/// Theme templates — field templates, RON loading, and rendering.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::schema::story::PAGE_COUNT;
use crate::schema::theme::Theme;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template parse error: {0}")]
    TemplateParse(String),
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),
    #[error("theme '{theme}' has {found} pages, expected 5")]
    PageCount { theme: String, found: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A value that can be interpolated into a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Name,
    Species,
    Description,
    Style,
}

impl Field {
    fn parse(name: &str) -> Option<Field> {
        match name {
            "name" => Some(Field::Name),
            "species" => Some(Field::Species),
            "description" => Some(Field::Description),
            "style" => Some(Field::Style),
            _ => None,
        }
    }
}

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateSegment {
    /// Literal text, emitted as-is.
    Literal(String),
    /// Interpolated value: `{name}`, `{species}`, `{description}`, `{style}`.
    Field(Field),
}

/// A parsed template — a sequence of segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub segments: Vec<TemplateSegment>,
}

/// Values substituted into templates.
#[derive(Debug, Clone, Copy)]
pub struct Bindings<'a> {
    pub name: &'a str,
    pub species: &'a str,
    pub description: &'a str,
    pub style: &'a str,
}

impl Bindings<'_> {
    fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => self.name,
            Field::Species => self.species,
            Field::Description => self.description,
            Field::Style => self.style,
        }
    }
}

impl Template {
    /// Parse a template string into a sequence of segments.
    ///
    /// Syntax:
    /// - `{name}`, `{species}`, `{description}`, `{style}` → `Field`
    /// - `{{` → literal `{`, `}}` → literal `}`
    /// - Everything else → `Literal`
    pub fn parse(input: &str) -> Result<Template, TemplateError> {
        let mut segments = Vec::new();
        let mut literal_buf = String::new();
        let chars: Vec<char> = input.chars().collect();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            if chars[i] == '{' {
                // Escaped brace
                if i + 1 < len && chars[i + 1] == '{' {
                    literal_buf.push('{');
                    i += 2;
                    continue;
                }

                if !literal_buf.is_empty() {
                    segments.push(TemplateSegment::Literal(std::mem::take(&mut literal_buf)));
                }

                let start = i + 1;
                let mut end = start;
                while end < len && chars[end] != '}' {
                    if chars[end] == '{' {
                        return Err(TemplateError::TemplateParse(
                            "nested braces are not allowed".to_string(),
                        ));
                    }
                    end += 1;
                }
                if end == len {
                    return Err(TemplateError::TemplateParse("unclosed brace".to_string()));
                }

                let content: String = chars[start..end].iter().collect();
                if content.is_empty() {
                    return Err(TemplateError::TemplateParse("empty braces".to_string()));
                }
                let field = Field::parse(&content).ok_or_else(|| {
                    TemplateError::TemplateParse(format!("unknown field '{content}'"))
                })?;
                segments.push(TemplateSegment::Field(field));
                i = end + 1;
            } else if chars[i] == '}' {
                if i + 1 < len && chars[i + 1] == '}' {
                    literal_buf.push('}');
                    i += 2;
                    continue;
                }
                return Err(TemplateError::TemplateParse(
                    "unmatched closing brace".to_string(),
                ));
            } else {
                literal_buf.push(chars[i]);
                i += 1;
            }
        }

        if !literal_buf.is_empty() {
            segments.push(TemplateSegment::Literal(literal_buf));
        }

        Ok(Template { segments })
    }

    pub fn render(&self, bindings: &Bindings<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                TemplateSegment::Literal(text) => out.push_str(text),
                TemplateSegment::Field(field) => out.push_str(bindings.get(*field)),
            }
        }
        out
    }

    pub fn uses(&self, field: Field) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, TemplateSegment::Field(f) if *f == field))
    }
}

/// One page of a theme: narrative text and the scene clause that
/// finishes its image prompt.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    pub text: Template,
    pub scene: Template,
}

impl PageTemplate {
    /// The image prompt is always `"{style} illustration: {description} {scene}"`.
    pub fn image_prompt(&self, bindings: &Bindings<'_>) -> String {
        format!(
            "{} illustration: {} {}",
            bindings.style,
            bindings.description,
            self.scene.render(bindings)
        )
    }
}

/// A canned five-page story for one theme.
#[derive(Debug, Clone)]
pub struct ThemeTemplate {
    pub theme: Theme,
    pub pages: Vec<PageTemplate>,
}

/// The set of theme templates available to the generator.
#[derive(Debug, Clone, Default)]
pub struct ThemeBook {
    pub themes: HashMap<Theme, ThemeTemplate>,
}

// RON deserialization helpers — the file keys themes by name and keeps
// template text as plain strings.

#[derive(Debug, Deserialize)]
struct RonPage {
    text: String,
    scene: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "Theme")]
struct RonTheme {
    pages: Vec<RonPage>,
}

impl ThemeBook {
    /// Load a theme book from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<ThemeBook, TemplateError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a theme book from a RON string.
    pub fn parse_ron(input: &str) -> Result<ThemeBook, TemplateError> {
        let raw: HashMap<String, RonTheme> = ron::from_str(input)?;
        let mut themes = HashMap::new();

        for (name, ron_theme) in raw {
            let theme =
                Theme::from_name(&name).ok_or_else(|| TemplateError::UnknownTheme(name.clone()))?;
            if ron_theme.pages.len() != PAGE_COUNT {
                return Err(TemplateError::PageCount {
                    theme: name,
                    found: ron_theme.pages.len(),
                });
            }

            let mut pages = Vec::with_capacity(PAGE_COUNT);
            for page in ron_theme.pages {
                pages.push(PageTemplate {
                    text: Template::parse(&page.text)?,
                    scene: Template::parse(&page.scene)?,
                });
            }
            themes.insert(theme, ThemeTemplate { theme, pages });
        }

        Ok(ThemeBook { themes })
    }

    /// Merge another theme book into this one. Themes from `other`
    /// replace themes in `self`.
    pub fn merge(&mut self, other: ThemeBook) {
        for (theme, template) in other.themes {
            self.themes.insert(theme, template);
        }
    }

    pub fn get(&self, theme: Theme) -> Option<&ThemeTemplate> {
        self.themes.get(&theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings() -> Bindings<'static> {
        Bindings {
            name: "Poppy",
            species: "fox",
            description: "fox, shy and adventurous",
            style: "watercolor",
        }
    }

    fn five_pages(text: &str) -> String {
        let page = format!("(text: \"{text}\", scene: \"in a garden\"),");
        page.repeat(5)
    }

    #[test]
    fn parse_literal_only() {
        let t = Template::parse("Once upon a time.").unwrap();
        assert_eq!(
            t.segments,
            vec![TemplateSegment::Literal("Once upon a time.".to_string())]
        );
    }

    #[test]
    fn parse_fields() {
        let t = Template::parse("{name} the {species} wore {style}.").unwrap();
        assert_eq!(t.segments.len(), 6);
        assert_eq!(t.segments[0], TemplateSegment::Field(Field::Name));
        assert_eq!(t.segments[2], TemplateSegment::Field(Field::Species));
        assert_eq!(t.segments[4], TemplateSegment::Field(Field::Style));
        assert!(t.uses(Field::Name));
        assert!(!t.uses(Field::Description));
    }

    #[test]
    fn parse_escaped_braces() {
        let t = Template::parse("Use {{braces}} here.").unwrap();
        assert_eq!(
            t.segments,
            vec![TemplateSegment::Literal("Use {braces} here.".to_string())]
        );
    }

    #[test]
    fn parse_errors() {
        assert!(Template::parse("Bad {} here").is_err());
        assert!(Template::parse("Bad {outer{name}} here").is_err());
        assert!(Template::parse("Bad {name here").is_err());
        assert!(Template::parse("Bad } here").is_err());
        assert!(Template::parse("Hello {villain}").is_err());
    }

    #[test]
    fn render_substitutes_every_field() {
        let t = Template::parse("{name} is a {species} ({description}) in {style}.").unwrap();
        assert_eq!(
            t.render(&bindings()),
            "Poppy is a fox (fox, shy and adventurous) in watercolor."
        );
    }

    #[test]
    fn image_prompt_shape() {
        let page = PageTemplate {
            text: Template::parse("{name} waved.").unwrap(),
            scene: Template::parse("waving at {name}'s friends").unwrap(),
        };
        assert_eq!(
            page.image_prompt(&bindings()),
            "watercolor illustration: fox, shy and adventurous waving at Poppy's friends"
        );
    }

    #[test]
    fn parse_theme_book() {
        let input = format!(
            "{{ \"magic\": Theme(pages: [{}]) }}",
            five_pages("{name} sparkled.")
        );
        let book = ThemeBook::parse_ron(&input).unwrap();
        let magic = book.get(Theme::Magic).unwrap();
        assert_eq!(magic.pages.len(), 5);
        assert_eq!(magic.pages[0].text.render(&bindings()), "Poppy sparkled.");
        assert!(book.get(Theme::Sharing).is_none());
    }

    #[test]
    fn theme_book_rejects_short_theme() {
        let input = "{ \"magic\": Theme(pages: [(text: \"one\", scene: \"two\")]) }";
        assert!(matches!(
            ThemeBook::parse_ron(input),
            Err(TemplateError::PageCount { found: 1, .. })
        ));
    }

    #[test]
    fn theme_book_rejects_unknown_theme() {
        let input = format!("{{ \"horror\": Theme(pages: [{}]) }}", five_pages("Boo."));
        assert!(matches!(
            ThemeBook::parse_ron(&input),
            Err(TemplateError::UnknownTheme(name)) if name == "horror"
        ));
    }

    #[test]
    fn theme_book_rejects_bad_template() {
        let input = format!("{{ \"magic\": Theme(pages: [{}]) }}", five_pages("{wizard}"));
        assert!(matches!(
            ThemeBook::parse_ron(&input),
            Err(TemplateError::TemplateParse(_))
        ));
    }

    #[test]
    fn merge_precedence() {
        let base = format!(
            "{{ \"magic\": Theme(pages: [{}]), \"sharing\": Theme(pages: [{}]) }}",
            five_pages("base magic"),
            five_pages("base sharing")
        );
        let over = format!("{{ \"magic\": Theme(pages: [{}]) }}", five_pages("override magic"));

        let mut book = ThemeBook::parse_ron(&base).unwrap();
        book.merge(ThemeBook::parse_ron(&over).unwrap());

        let magic = &book.get(Theme::Magic).unwrap().pages[0];
        assert_eq!(magic.text.render(&bindings()), "override magic");
        // Base-only theme still present
        assert!(book.get(Theme::Sharing).is_some());
    }

    #[test]
    fn load_fixture_from_ron() {
        let path = std::path::PathBuf::from("tests/fixtures/custom_themes.ron");
        let book = ThemeBook::load_from_ron(&path).unwrap();
        assert_eq!(book.themes.len(), 1);
        assert!(book.get(Theme::Kindness).is_some());
    }
}
