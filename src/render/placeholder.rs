/// Offline placeholder illustrations as SVG.
///
/// Each image gets the style's palette, a few seeded decorative shapes,
/// the page and style labels, a simple figure for the species named in
/// the prompt, and the opening words of the prompt.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ImageRequest, Provider, ProviderError};
use crate::schema::style::{Palette, Rgb, Style};

/// Number of prompt words printed under the figure.
const CAPTION_WORDS: usize = 10;
/// Caption lines kept after wrapping.
const CAPTION_LINES: usize = 3;
/// Rough advance of one caption glyph at 16px.
const GLYPH_WIDTH: i64 = 8;
const LINE_HEIGHT: i64 = 20;

/// Writes `page_{n}_{style}_{w}x{h}.svg` into `out_dir`.
#[derive(Debug, Clone)]
pub struct PlaceholderArt {
    pub out_dir: PathBuf,
    pub seed: u64,
}

impl PlaceholderArt {
    pub fn new(out_dir: impl AsRef<Path>, seed: u64) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
            seed,
        }
    }

    pub fn file_name(request: &ImageRequest) -> String {
        format!(
            "page_{}_{}_{}x{}.svg",
            request.page, request.style, request.size.width, request.size.height
        )
    }

    /// Render the SVG document. Same request and seed, same bytes.
    pub fn render(&self, request: &ImageRequest) -> String {
        let width = request.size.width as i64;
        let height = request.size.height as i64;
        let palette = request.style.palette();
        let mut rng = StdRng::seed_from_u64(self.seed ^ u64::from(request.page));

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        let _ = writeln!(
            svg,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            hex(palette.background)
        );

        decorate(&mut svg, &mut rng, width, height, request.style, &palette);

        let center = width / 2;
        text(&mut svg, center, 50, 24, palette.text, &format!("Page {}", request.page));
        text(
            &mut svg,
            center,
            100,
            16,
            palette.text,
            &format!("{} Style", title_case(request.style.label())),
        );

        Figure::for_prompt(&request.prompt).draw(&mut svg, center, height / 2, &palette);

        let words: Vec<&str> = request.prompt.split_whitespace().take(CAPTION_WORDS).collect();
        let caption = format!("{}...", words.join(" "));
        for (line, y) in wrap_caption(&caption, width - 40)
            .iter()
            .zip((height - 150..).step_by(LINE_HEIGHT as usize))
        {
            text(&mut svg, center, y, 16, palette.text, line);
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl Provider<ImageRequest, PathBuf> for PlaceholderArt {
    fn name(&self) -> &str {
        "placeholder"
    }

    fn provide(&self, request: &ImageRequest) -> Result<PathBuf, ProviderError> {
        std::fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(Self::file_name(request));
        std::fs::write(&path, self.render(request))?;
        debug!(path = %path.display(), "wrote placeholder image");
        Ok(path)
    }
}

/// Simple figure drawn in the middle of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Figure {
    Fox,
    Cat,
    Bear,
    Unicorn,
    Generic,
}

impl Figure {
    /// First species keyword in the prompt, checked fox, cat, bear, unicorn.
    pub fn for_prompt(prompt: &str) -> Figure {
        let lower = prompt.to_lowercase();
        [
            ("fox", Figure::Fox),
            ("cat", Figure::Cat),
            ("bear", Figure::Bear),
            ("unicorn", Figure::Unicorn),
        ]
        .into_iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, figure)| figure)
        .unwrap_or(Figure::Generic)
    }

    fn draw(self, svg: &mut String, x: i64, y: i64, palette: &Palette) {
        let accent = palette.accent;
        match self {
            Figure::Fox => {
                ellipse(svg, [x - 30, y - 20, x + 30, y + 20], accent);
                ellipse(svg, [x - 15, y - 35, x + 15, y - 5], accent);
                polygon(svg, &[(x - 10, y - 40), (x - 5, y - 50), (x, y - 40)], accent);
                polygon(svg, &[(x, y - 40), (x + 5, y - 50), (x + 10, y - 40)], accent);
                ellipse(svg, [x + 25, y - 10, x + 45, y + 10], accent);
            }
            Figure::Cat => {
                ellipse(svg, [x - 25, y - 15, x + 25, y + 15], accent);
                ellipse(svg, [x - 12, y - 30, x + 12, y - 5], accent);
                polygon(svg, &[(x - 8, y - 35), (x - 3, y - 45), (x + 2, y - 35)], accent);
                polygon(svg, &[(x - 2, y - 35), (x + 3, y - 45), (x + 8, y - 35)], accent);
                ellipse(svg, [x + 20, y - 8, x + 35, y + 8], accent);
            }
            Figure::Bear => {
                ellipse(svg, [x - 35, y - 20, x + 35, y + 20], accent);
                ellipse(svg, [x - 20, y - 40, x + 20, y - 5], accent);
                ellipse(svg, [x - 15, y - 45, x - 5, y - 35], accent);
                ellipse(svg, [x + 5, y - 45, x + 15, y - 35], accent);
            }
            Figure::Unicorn => {
                ellipse(svg, [x - 30, y - 20, x + 30, y + 20], accent);
                ellipse(svg, [x - 15, y - 35, x + 15, y - 5], accent);
                polygon(svg, &[(x - 3, y - 40), (x + 3, y - 40), (x, y - 55)], palette.text);
                polygon(svg, &[(x - 10, y - 40), (x - 5, y - 50), (x, y - 40)], accent);
                polygon(svg, &[(x, y - 40), (x + 5, y - 50), (x + 10, y - 40)], accent);
            }
            Figure::Generic => {
                ellipse(svg, [x - 20, y - 20, x + 20, y + 20], accent);
                ellipse(svg, [x - 8, y - 8, x - 4, y - 4], palette.text);
                ellipse(svg, [x + 4, y - 8, x + 8, y - 4], palette.text);
                let _ = writeln!(
                    svg,
                    r#"<path d="M {} {} A 10 5 0 0 0 {} {}" fill="none" stroke="{}" stroke-width="2"/>"#,
                    x - 10,
                    y,
                    x + 10,
                    y,
                    hex(palette.text)
                );
            }
        }
    }
}

/// Seeded background shapes, one look per style.
fn decorate(
    svg: &mut String,
    rng: &mut StdRng,
    width: i64,
    height: i64,
    style: Style,
    palette: &Palette,
) {
    match style {
        Style::Watercolor => {
            for _ in 0..5 {
                let (x, y) = spot(rng, width, height, 0);
                let size = rng.gen_range(50..=150);
                let _ = writeln!(
                    svg,
                    r#"<circle cx="{}" cy="{}" r="{}" fill="{}" fill-opacity="0.35"/>"#,
                    x + size / 2,
                    y + size / 2,
                    size / 2,
                    hex(palette.accent)
                );
            }
        }
        Style::Cartoon => {
            for _ in 0..3 {
                let (x, y) = spot(rng, width, height, 100);
                let size = rng.gen_range(30..=80);
                let _ = writeln!(
                    svg,
                    r#"<rect x="{x}" y="{y}" width="{size}" height="{size}" fill="{}" stroke="{}"/>"#,
                    hex(palette.accent),
                    hex(palette.text)
                );
            }
        }
        Style::Flat => {
            for _ in 0..4 {
                let (x, y) = spot(rng, width, height, 60);
                let _ = writeln!(
                    svg,
                    r#"<rect x="{x}" y="{y}" width="60" height="60" fill="{}"/>"#,
                    hex(palette.accent)
                );
            }
        }
        Style::Painterly | Style::Realistic => {
            for _ in 0..3 {
                let (x, y) = spot(rng, width, height, 50);
                let size = rng.gen_range(20..=50);
                let _ = writeln!(
                    svg,
                    r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                    x + size / 2,
                    y + size / 2,
                    size / 2,
                    hex(palette.accent)
                );
            }
        }
    }
}

/// Top-left corner for a shape kept `margin` away from the far edges.
fn spot(rng: &mut StdRng, width: i64, height: i64, margin: i64) -> (i64, i64) {
    (
        rng.gen_range(0..=(width - margin).max(0)),
        rng.gen_range(0..=(height - margin).max(0)),
    )
}

fn ellipse(svg: &mut String, [x0, y0, x1, y1]: [i64; 4], fill: Rgb) {
    let _ = writeln!(
        svg,
        r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" fill="{}"/>"#,
        (x0 + x1) / 2,
        (y0 + y1) / 2,
        (x1 - x0) / 2,
        (y1 - y0) / 2,
        hex(fill)
    );
}

fn polygon(svg: &mut String, points: &[(i64, i64)], fill: Rgb) {
    let points: Vec<String> = points.iter().map(|(x, y)| format!("{x},{y}")).collect();
    let _ = writeln!(
        svg,
        r#"<polygon points="{}" fill="{}"/>"#,
        points.join(" "),
        hex(fill)
    );
}

fn text(svg: &mut String, x: i64, y: i64, size: u32, fill: Rgb, content: &str) {
    let _ = writeln!(
        svg,
        r#"<text x="{x}" y="{y}" font-size="{size}" font-family="sans-serif" text-anchor="middle" fill="{}">{}</text>"#,
        hex(fill),
        escape_xml(content)
    );
}

/// Greedy word wrap against an estimated line width. A word wider than
/// the line still gets a line of its own.
fn wrap_caption(caption: &str, max_width: i64) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in caption.split_whitespace() {
        let candidate = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if candidate as i64 * GLYPH_WIDTH <= max_width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.truncate(CAPTION_LINES);
    lines
}

fn hex((r, g, b): Rgb) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
