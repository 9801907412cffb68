//! Markdown rendering with syntax highlighting and math typesetting

use katex::{OptsBuilder, OutputType};
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::error::{BuildError, BuildResult, RenderStage};

/// Class prefix for highlighted tokens, shared with the generated stylesheet
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Markdown renderer with syntax highlighting.
///
/// Holds only read-only state once built, so one instance is shared across
/// indexing threads. Rendering the same markdown twice yields byte-identical
/// HTML. Errors carry an empty path; the indexer fills in the document.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
    math: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("InspiredGitHub", false, true)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool, math: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
            math,
        }
    }

    fn options(&self) -> Options {
        // Front-matter is split off before rendering, so no metadata blocks
        let mut options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;
        if self.math {
            options |= Options::ENABLE_MATH;
        }
        options
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> BuildResult<String> {
        let parser = Parser::new_ext(markdown, self.options());

        let mut events: Vec<Event> = Vec::new();
        // Some(lang) while inside a code block
        let mut code_block: Option<Option<String>> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(lang);
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let lang = code_block.take().flatten();
                    let highlighted = self.highlight_code(&code_block_content, lang.as_deref())?;
                    events.push(Event::Html(CowStr::from(highlighted)));
                }
                Event::Text(text) if code_block.is_some() => {
                    code_block_content.push_str(&text);
                }
                Event::InlineMath(tex) => {
                    events.push(Event::InlineHtml(CowStr::from(render_math(&tex, false)?)));
                }
                Event::DisplayMath(tex) => {
                    events.push(Event::Html(CowStr::from(render_math(&tex, true)?)));
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a code block into classed spans inside `<pre><code>`
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> BuildResult<String> {
        // The tag lands in a class attribute, so keep only token characters
        let lang: String = lang
            .unwrap_or("text")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '_' | '#' | '.'))
            .collect::<String>()
            .to_ascii_lowercase();
        let syntax = self
            .find_syntax(&lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| {
                    BuildError::render(
                        "",
                        RenderStage::Highlight,
                        format!("failed to highlight `{}` block: {}", lang, e),
                    )
                })?;
        }
        let highlighted = generator.finalize();

        let block = format!(
            r#"<pre class="highlight"><code class="language-{}">{}</code></pre>"#,
            lang, highlighted
        );

        if self.line_numbers {
            Ok(add_line_numbers(&block, &lang, code.lines().count()))
        } else {
            Ok(block)
        }
    }

    fn find_syntax(&self, token: &str) -> Option<&SyntaxReference> {
        self.syntax_set
            .find_syntax_by_token(token)
            .or_else(|| self.syntax_set.find_syntax_by_extension(token))
    }

    /// Stylesheet matching the classes emitted for highlighted code
    pub fn stylesheet(&self) -> BuildResult<String> {
        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .ok_or_else(|| {
                BuildError::render(
                    "",
                    RenderStage::Highlight,
                    format!("unknown highlight theme `{}`", self.theme_name),
                )
            })?;
        css_for_theme_with_class_style(theme, CLASS_STYLE)
            .map_err(|e| BuildError::render("", RenderStage::Highlight, e.to_string()))
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Typeset a TeX expression; inline (`<span>`) or display (block) output
fn render_math(tex: &str, display_mode: bool) -> BuildResult<String> {
    let mut builder = OptsBuilder::default();
    builder.display_mode(display_mode);
    builder.output_type(OutputType::Html);

    let opts = builder.build().map_err(|e| {
        BuildError::render(
            "",
            RenderStage::Math,
            format!("failed to build KaTeX options: {}", e),
        )
    })?;

    katex::render_with_opts(tex, opts).map_err(|e| {
        BuildError::render(
            "",
            RenderStage::Math,
            format!("KaTeX rendering failed for `{}`: {}", tex, e),
        )
    })
}

/// Wrap a highlighted block in a table with a line-number gutter
fn add_line_numbers(block: &str, lang: &str, line_count: usize) -> String {
    let gutter = (1..=line_count.max(1))
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        lang, gutter, block
    )
}
