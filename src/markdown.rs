//! Markdown → ratatui `Text` renderer.
//!
//! Converts `pulldown_cmark` events into styled `Line`/`Span` values using a
//! named theme. Headings, bold, italic, strikethrough, inline code, fenced
//! code blocks (with syntect highlighting), lists, task lists, blockquotes,
//! rules and links are supported; HTML, tables and images fall through as
//! plain text or are skipped.
//!
//! Rendering is fallible: an unknown theme or a highlighter failure returns a
//! `RenderError` instead of silently producing partial output.

use std::fmt;
use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::theme::Palette;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const TAB: &str = "    ";
const RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// No palette is registered under this theme name.
    UnknownTheme(String),
    /// The palette names a syntect theme that isn't bundled.
    MissingSyntaxTheme(String),
    /// syntect failed while highlighting a code block.
    Highlight(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnknownTheme(name) => write!(
                f,
                "unknown theme '{name}' (expected one of: {})",
                Palette::names().join(", ")
            ),
            RenderError::MissingSyntaxTheme(name) => {
                write!(f, "syntax theme '{name}' is not available")
            }
            RenderError::Highlight(msg) => write!(f, "syntax highlighting failed: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}

/// Render markdown for terminal display using the named theme.
///
/// Leading and trailing blank lines are stripped from the result.
pub fn render(content: &str, theme: &str) -> Result<Text<'static>, RenderError> {
    let palette =
        Palette::for_theme(theme).ok_or_else(|| RenderError::UnknownTheme(theme.to_string()))?;

    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut w = Writer::new(palette);
    for event in Parser::new_ext(content, opts) {
        w.handle(event)?;
    }

    let mut text = w.text;
    trim_blank_lines(&mut text);
    Ok(text)
}

fn is_blank(line: &Line<'_>) -> bool {
    line.spans.iter().all(|s| s.content.trim().is_empty())
}

fn trim_blank_lines(text: &mut Text<'static>) {
    while text.lines.last().is_some_and(is_blank) {
        text.lines.pop();
    }
    let leading = text.lines.iter().take_while(|l| is_blank(l)).count();
    text.lines.drain(..leading);
}

// ── Writer ──────────────────────────────────────────────────────────────────

struct Writer {
    text: Text<'static>,
    palette: Palette,
    /// Inline style stack. Styles compose via `patch` so nested bold+italic works.
    styles: Vec<Style>,
    /// Per-line prefix spans (blockquote and code block `│`).
    line_prefixes: Vec<Span<'static>>,
    /// List nesting: None = unordered, Some(n) = ordered at index n.
    list_indices: Vec<Option<u64>>,
    highlighter: Option<HighlightLines<'static>>,
    in_plain_code: bool,
    /// Link URL, appended after the link text closes.
    link_url: Option<String>,
    /// Whether the next block element should be preceded by a blank line.
    needs_newline: bool,
}

impl Writer {
    fn new(palette: Palette) -> Self {
        Self {
            text: Text::default(),
            palette,
            styles: vec![],
            line_prefixes: vec![],
            list_indices: vec![],
            highlighter: None,
            in_plain_code: false,
            link_url: None,
            needs_newline: false,
        }
    }

    fn base_style(&self) -> Style {
        Style::default().fg(self.palette.text)
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_else(|| self.base_style())
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn push_line(&mut self, line: Line<'static>) {
        let mut out = line;
        for pfx in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, pfx);
        }
        self.text.lines.push(out);
    }

    fn push_span(&mut self, span: Span<'static>) {
        if let Some(line) = self.text.lines.last_mut() {
            line.push_span(span);
        } else {
            self.push_line(Line::from(vec![span]));
        }
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_newline {
            self.push_line(Line::default());
            self.needs_newline = false;
        }
    }

    fn handle(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        match event {
            Event::Start(tag) => self.open(tag)?,
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t)?,
            Event::Code(c) => self.inline_code(c),
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.push_line(Line::default()),
            Event::Rule => {
                self.blank_line_if_needed();
                self.push_line(Line::from(Span::styled(
                    "─".repeat(RULE_WIDTH),
                    self.palette.muted_style(),
                )));
                self.needs_newline = true;
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_span(Span::styled(marker, self.palette.muted_style()));
            }
            Event::Html(raw) | Event::InlineHtml(raw) => {
                let style = self.palette.muted_style();
                self.push_span(Span::styled(raw.trim_end().to_string(), style));
            }
            _ => {}
        }
        Ok(())
    }

    fn open(&mut self, tag: Tag<'_>) -> Result<(), RenderError> {
        match tag {
            Tag::Paragraph => {
                self.blank_line_if_needed();
                self.push_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.blank_line_if_needed();
                let hs = heading_style(&self.palette, level);
                self.push_line(Line::from(Span::styled(
                    format!("{} ", "#".repeat(heading_depth(level))),
                    hs,
                )));
                self.push_style(hs);
            }
            Tag::BlockQuote(_) => {
                self.blank_line_if_needed();
                self.line_prefixes
                    .push(Span::styled("│ ", self.palette.muted_style()));
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => self.open_code_block(kind)?,
            Tag::List(start) => {
                if self.list_indices.is_empty() {
                    self.blank_line_if_needed();
                }
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.push_line(Line::default());
                let indent = "  ".repeat(self.list_indices.len().saturating_sub(1));
                if let Some(idx) = self.list_indices.last_mut() {
                    let marker = match idx {
                        None => format!("{indent}• "),
                        Some(n) => {
                            let s = format!("{indent}{n}. ");
                            *n += 1;
                            s
                        }
                    };
                    let style = self.palette.muted_style();
                    self.push_span(Span::styled(marker, style));
                }
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(
                    Style::default()
                        .fg(self.palette.link)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            _ => {}
        }
        Ok(())
    }

    fn open_code_block(&mut self, kind: CodeBlockKind<'_>) -> Result<(), RenderError> {
        if !self.text.lines.is_empty() {
            self.push_line(Line::default());
        }
        self.needs_newline = false;
        let lang = match &kind {
            CodeBlockKind::Fenced(l) => l.split_whitespace().next().unwrap_or(""),
            CodeBlockKind::Indented => "",
        };

        let bs = self.palette.muted_style();
        let top = if lang.is_empty() {
            Line::from(Span::styled("╭──", bs))
        } else {
            Line::from(vec![
                Span::styled("╭── ", bs),
                Span::styled(lang.to_owned(), bs.add_modifier(Modifier::BOLD)),
                Span::styled(" ──", bs),
            ])
        };
        self.push_line(top);
        self.line_prefixes.push(Span::styled("│ ", bs));

        if let Some(theme_name) = self.palette.syntax_theme
            && !lang.is_empty()
            && let Some(syntax) = SYNTAX_SET.find_syntax_by_token(lang)
        {
            let theme = THEME_SET
                .themes
                .get(theme_name)
                .ok_or_else(|| RenderError::MissingSyntaxTheme(theme_name.to_string()))?;
            self.highlighter = Some(HighlightLines::new(syntax, theme));
        }
        if self.highlighter.is_none() {
            self.in_plain_code = true;
        }
        Ok(())
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.needs_newline = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::BlockQuote(_) => {
                self.line_prefixes.pop();
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::CodeBlock => {
                self.highlighter = None;
                self.in_plain_code = false;
                self.line_prefixes.pop();
                self.push_line(Line::from(Span::styled("╰──", self.palette.muted_style())));
                self.needs_newline = true;
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                self.needs_newline = true;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take() {
                    let style = Style::default().fg(self.palette.link);
                    self.push_span(Span::styled(format!(" ({url})"), style));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, cow: CowStr<'_>) -> Result<(), RenderError> {
        // ratatui renders \t as zero-width
        let text = cow.replace('\t', TAB);

        if let Some(mut hl) = self.highlighter.take() {
            for line in LinesWithEndings::from(text.as_str()) {
                let ranges = hl
                    .highlight_line(line, &SYNTAX_SET)
                    .map_err(|e| RenderError::Highlight(e.to_string()))?;
                let spans: Vec<Span<'static>> = ranges
                    .into_iter()
                    .filter_map(|(hl_style, frag)| {
                        let content = frag.trim_end_matches('\n');
                        if content.is_empty() {
                            return None;
                        }
                        let fg = ratatui::style::Color::Rgb(
                            hl_style.foreground.r,
                            hl_style.foreground.g,
                            hl_style.foreground.b,
                        );
                        Some(Span::styled(content.to_owned(), Style::default().fg(fg)))
                    })
                    .collect();
                self.push_line(Line::from(spans));
            }
            self.highlighter = Some(hl);
            return Ok(());
        }

        if self.in_plain_code {
            let code_style = Style::default().fg(self.palette.code_fg);
            for line in text.lines() {
                self.push_line(Line::from(Span::styled(line.to_owned(), code_style)));
            }
            return Ok(());
        }

        let style = self.style();
        self.push_span(Span::styled(text, style));
        Ok(())
    }

    fn inline_code(&mut self, cow: CowStr<'_>) {
        let style = Style::default()
            .fg(self.palette.code_fg)
            .bg(self.palette.code_bg);
        self.push_span(Span::styled(cow.to_string(), style));
    }
}

fn heading_style(palette: &Palette, level: HeadingLevel) -> Style {
    let style = Style::default().fg(palette.accent);
    match level {
        HeadingLevel::H1 => style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => style.add_modifier(Modifier::BOLD),
        _ => style.add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_lines(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn bold_text_is_bold() {
        let text = render("Some **bold** text", "dark").unwrap();
        let bold = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "bold")
            .unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn bold_only_renders_one_line() {
        let text = render("**bold**", "dark").unwrap();
        assert_eq!(plain_lines(&text), vec!["bold"]);
    }

    #[test]
    fn heading_text_inherits_heading_style() {
        let text = render("## Hello", "dark").unwrap();
        let line = &text.lines[0];
        assert!(line.spans.len() >= 2, "expected >= 2 spans, got {line:?}");
        assert!(line.spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line.spans[1].style.fg, Some(Palette::DARK.accent));
    }

    #[test]
    fn inline_code_uses_palette() {
        let text = render("Use `foo()` here", "dark").unwrap();
        let code = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "foo()")
            .unwrap();
        assert_eq!(code.style.fg, Some(Palette::DARK.code_fg));
        assert_eq!(code.style.bg, Some(Palette::DARK.code_bg));
    }

    #[test]
    fn code_block_has_border_structure() {
        let text = render("```\nline1\nline2\n```", "dark").unwrap();
        let lines = plain_lines(&text);
        assert!(lines[0].starts_with('╭'), "expected top border, got {:?}", lines[0]);
        assert_eq!(lines[1], "│ line1");
        assert_eq!(lines[2], "│ line2");
        assert!(lines.last().unwrap().starts_with('╰'));
    }

    #[test]
    fn highlighted_code_block_keeps_language_label() {
        let text = render("```rust\nfn main() {}\n```", "dark").unwrap();
        let lines = plain_lines(&text);
        assert!(lines[0].contains("rust"));
        assert!(lines[1].starts_with("│ "));
        assert!(lines[1].contains("fn main"));
    }

    #[test]
    fn tabs_expanded_to_spaces() {
        let text = render("```\n\tindented\n```", "dark").unwrap();
        let lines = plain_lines(&text);
        assert!(lines.iter().any(|l| l.contains("    indented")));
        assert!(lines.iter().all(|l| !l.contains('\t')));
    }

    #[test]
    fn lists_get_markers() {
        let text = render("- one\n- two\n\n1. first\n2. second", "dark").unwrap();
        let lines = plain_lines(&text);
        assert!(lines.contains(&"• one".to_string()));
        assert!(lines.contains(&"• two".to_string()));
        assert!(lines.contains(&"1. first".to_string()));
        assert!(lines.contains(&"2. second".to_string()));
    }

    #[test]
    fn link_url_follows_text() {
        let text = render("[docs](https://example.com)", "dark").unwrap();
        assert_eq!(plain_lines(&text), vec!["docs (https://example.com)"]);
    }

    #[test]
    fn surrounding_blank_lines_are_trimmed() {
        let text = render("\n\nhello\n\n", "dark").unwrap();
        assert_eq!(plain_lines(&text), vec!["hello"]);
    }

    #[test]
    fn notty_theme_has_no_colors_or_highlighting() {
        let text = render("```rust\nlet x = 1;\n```", "notty").unwrap();
        for line in &text.lines {
            for span in &line.spans {
                assert!(
                    matches!(span.style.fg, None | Some(ratatui::style::Color::Reset)),
                    "unexpected color in {span:?}"
                );
            }
        }
    }

    #[test]
    fn unknown_theme_is_an_error() {
        let err = render("hi", "neon").unwrap_err();
        assert_eq!(err, RenderError::UnknownTheme("neon".to_string()));
        assert!(err.to_string().contains("dark, light, notty"));
    }
}
