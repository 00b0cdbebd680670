//! Named color themes.
//!
//! A theme decides every color schat draws: the transcript, the editor, the
//! markdown renderer and the syntax highlighter for fenced code.

use ratatui::style::{Color, Modifier, Style};

pub const DEFAULT_THEME: &str = "dark";

/// The muted slate used for chrome (borders, spinner, footer).
const SLATE: Color = Color::Rgb(0x83, 0x8b, 0xa7);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Body text of assistant responses.
    pub text: Color,
    /// Headings and emphasis accents.
    pub accent: Color,
    /// Borders, prompt bar, spinner, footer.
    pub muted: Color,
    /// Error entries.
    pub error: Color,
    /// Inline code.
    pub code_fg: Color,
    pub code_bg: Color,
    /// Links.
    pub link: Color,
    /// syntect theme for fenced code blocks; `None` disables highlighting.
    pub syntax_theme: Option<&'static str>,
}

impl Palette {
    pub const DARK: Palette = Palette {
        text: Color::Reset,
        accent: Color::Rgb(0xca, 0x9e, 0xe6),
        muted: SLATE,
        error: Color::Rgb(0xe7, 0x82, 0x84),
        code_fg: Color::Rgb(0xef, 0x9f, 0x76),
        code_bg: Color::Rgb(0x41, 0x45, 0x59),
        link: Color::Rgb(0x8c, 0xaa, 0xee),
        syntax_theme: Some("base16-ocean.dark"),
    };

    pub const LIGHT: Palette = Palette {
        text: Color::Reset,
        accent: Color::Rgb(0x88, 0x39, 0xef),
        muted: Color::Rgb(0x6c, 0x6f, 0x85),
        error: Color::Rgb(0xd2, 0x0f, 0x39),
        code_fg: Color::Rgb(0xfe, 0x64, 0x0b),
        code_bg: Color::Rgb(0xe6, 0xe9, 0xef),
        link: Color::Rgb(0x1e, 0x66, 0xf5),
        syntax_theme: Some("InspiredGitHub"),
    };

    /// No colors at all, for terminals that can't or shouldn't show them.
    pub const NOTTY: Palette = Palette {
        text: Color::Reset,
        accent: Color::Reset,
        muted: Color::Reset,
        error: Color::Reset,
        code_fg: Color::Reset,
        code_bg: Color::Reset,
        link: Color::Reset,
        syntax_theme: None,
    };

    /// Looks up a theme by name. Names are case-insensitive.
    pub fn for_theme(name: &str) -> Option<Palette> {
        match name.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::DARK),
            "light" => Some(Self::LIGHT),
            "notty" | "ascii" => Some(Self::NOTTY),
            _ => None,
        }
    }

    pub fn names() -> &'static [&'static str] {
        &["dark", "light", "notty"]
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::DARK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Palette::for_theme("Dark"), Some(Palette::DARK));
        assert_eq!(Palette::for_theme("LIGHT"), Some(Palette::LIGHT));
    }

    #[test]
    fn ascii_is_an_alias_for_notty() {
        assert_eq!(Palette::for_theme("ascii"), Some(Palette::NOTTY));
    }

    #[test]
    fn unknown_theme_has_no_palette() {
        assert_eq!(Palette::for_theme("solarized"), None);
    }

    #[test]
    fn every_listed_name_resolves() {
        for name in Palette::names() {
            assert!(Palette::for_theme(name).is_some(), "{name} should resolve");
        }
        assert!(Palette::for_theme(DEFAULT_THEME).is_some());
    }
}
