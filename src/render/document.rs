/// Book assembly: the story and its illustrations as one document.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::placeholder::escape_xml;
use super::{DocumentRequest, Provider, ProviderError};
use crate::schema::story::Story;

/// Writes `storybook.html`: title page, character cards, then one
/// section per page with its illustration when one was rendered.
#[derive(Debug, Clone)]
pub struct HtmlAssembler {
    pub out_dir: PathBuf,
}

/// Writes `storybook.md`. Plain fallback when HTML cannot be produced.
#[derive(Debug, Clone)]
pub struct MarkdownAssembler {
    pub out_dir: PathBuf,
}

impl HtmlAssembler {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    pub fn render(&self, request: &DocumentRequest) -> String {
        let story = &request.story;
        let title = escape_xml(&story.title);
        let mut html = String::new();

        let _ = writeln!(html, "<!DOCTYPE html>");
        let _ = writeln!(html, "<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">");
        let _ = writeln!(html, "<title>{title}</title>");
        html.push_str(STYLESHEET);
        let _ = writeln!(html, "</head>\n<body>");

        let _ = writeln!(html, "<section class=\"title-page\">");
        let _ = writeln!(html, "<h1>{title}</h1>");
        let _ = writeln!(html, "<p class=\"subtitle\">A Children's Story</p>");
        let _ = writeln!(html, "</section>");

        if !story.characters.is_empty() {
            let _ = writeln!(html, "<section class=\"characters\">\n<h2>Characters</h2>");
            for character in &story.characters {
                let _ = writeln!(
                    html,
                    "<p><strong>{}</strong>: {}</p>",
                    escape_xml(&character.name),
                    escape_xml(&character.description)
                );
            }
            let _ = writeln!(html, "</section>");
        }

        for page in &story.pages {
            let _ = writeln!(html, "<section class=\"page\">");
            let _ = writeln!(html, "<h2>Page {}</h2>", page.page);
            match request.images.get(&page.page) {
                Some(image) => {
                    let _ = writeln!(
                        html,
                        "<img src=\"{}\" alt=\"Illustration for page {}\">",
                        escape_xml(&relative_to(&self.out_dir, image)),
                        page.page
                    );
                }
                None => {
                    let _ = writeln!(
                        html,
                        "<p class=\"missing\">[Image for Page {}]</p>",
                        page.page
                    );
                }
            }
            let _ = writeln!(html, "<p>{}</p>", escape_xml(&page.text));
            let _ = writeln!(html, "</section>");
        }

        let _ = writeln!(html, "</body>\n</html>");
        html
    }
}

const STYLESHEET: &str = "<style>
body { font-family: Georgia, serif; max-width: 48rem; margin: auto; }
.title-page { text-align: center; padding: 6rem 0; }
h1 { color: darkblue; }
.subtitle { color: gray; }
.page { page-break-before: always; text-align: center; }
.page img { max-width: 100%; }
.page p { font-size: 1.3rem; line-height: 1.6; }
</style>
";

impl Provider<DocumentRequest, PathBuf> for HtmlAssembler {
    fn name(&self) -> &str {
        "html"
    }

    fn provide(&self, request: &DocumentRequest) -> Result<PathBuf, ProviderError> {
        write_document(&self.out_dir, "storybook.html", &self.render(request))
    }
}

impl MarkdownAssembler {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    pub fn render(&self, request: &DocumentRequest) -> String {
        let story: &Story = &request.story;
        let mut md = String::new();

        let _ = writeln!(md, "# {}\n", story.title);
        if !story.characters.is_empty() {
            let _ = writeln!(md, "## Characters\n");
            for character in &story.characters {
                let _ = writeln!(md, "- **{}**: {}", character.name, character.description);
            }
            md.push('\n');
        }
        for page in &story.pages {
            let _ = writeln!(md, "## Page {}\n", page.page);
            if let Some(image) = request.images.get(&page.page) {
                let _ = writeln!(
                    md,
                    "![Illustration for page {}]({})\n",
                    page.page,
                    relative_to(&self.out_dir, image)
                );
            }
            let _ = writeln!(md, "{}\n", page.text);
        }
        md
    }
}

impl Provider<DocumentRequest, PathBuf> for MarkdownAssembler {
    fn name(&self) -> &str {
        "markdown"
    }

    fn provide(&self, request: &DocumentRequest) -> Result<PathBuf, ProviderError> {
        write_document(&self.out_dir, "storybook.md", &self.render(request))
    }
}

fn write_document(out_dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, ProviderError> {
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(file_name);
    std::fs::write(&path, contents)?;
    debug!(path = %path.display(), "wrote document");
    Ok(path)
}

/// Image links are relative when the image sits under the document's
/// directory.
fn relative_to(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::skeleton_story;
    use crate::schema::style::Style;
    use std::collections::BTreeMap;

    fn request(out_dir: &Path) -> DocumentRequest {
        let mut story = skeleton_story(Style::Cartoon);
        story.title = "Luna & the <Stars>".to_string();
        let mut images = BTreeMap::new();
        images.insert(1, out_dir.join("page_1_cartoon_1024x1024.svg"));
        DocumentRequest { story, images }
    }

    #[test]
    fn html_layout() {
        let dir = Path::new("out");
        let html = HtmlAssembler::new(dir).render(&request(dir));
        assert!(html.contains("<h1>Luna &amp; the &lt;Stars&gt;</h1>"));
        assert!(html.contains("<h2>Characters</h2>"));
        assert!(html.contains("<strong>Luna</strong>: friendly creature"));
        assert!(html.contains("<img src=\"page_1_cartoon_1024x1024.svg\""));
        assert!(html.contains("[Image for Page 2]"));
        assert_eq!(html.matches("<section class=\"page\">").count(), 5);
    }

    #[test]
    fn markdown_layout() {
        let dir = Path::new("out");
        let md = MarkdownAssembler::new(dir).render(&request(dir));
        assert!(md.starts_with("# Luna & the <Stars>\n"));
        assert!(md.contains("- **Luna**: friendly creature"));
        assert!(md.contains("![Illustration for page 1](page_1_cartoon_1024x1024.svg)"));
        assert_eq!(md.matches("## Page ").count(), 5);
    }

    #[test]
    fn provide_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path());

        let html = HtmlAssembler::new(dir.path()).provide(&req).unwrap();
        assert_eq!(html.file_name().unwrap(), "storybook.html");
        assert!(html.exists());

        let md = MarkdownAssembler::new(dir.path()).provide(&req).unwrap();
        assert!(std::fs::read_to_string(md).unwrap().contains("## Page 5"));
    }

    #[test]
    fn relative_paths() {
        let base = Path::new("/tmp/book");
        assert_eq!(relative_to(base, Path::new("/tmp/book/a.svg")), "a.svg");
        assert_eq!(relative_to(base, Path::new("/elsewhere/b.svg")), "/elsewhere/b.svg");
    }
}
