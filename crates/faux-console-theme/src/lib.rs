use ratatui::{prelude::*, style::palette::tailwind};

/// Console theme - colors and styles for the render surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Name the theme is stored under in the settings
    pub name: &'static str,

    // Background colors
    pub bg_panel: Color,

    // Text colors
    pub text_primary: Color,
    pub text_muted: Color,

    // Accent colors
    pub accent_primary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::standard()
    }
}

impl Theme {
    /// Names accepted by [`Theme::by_name`]
    pub const NAMES: [&'static str; 3] = ["default", "dark", "light"];

    /// Resolve a stored theme name, falling back to the default theme
    pub fn by_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            "light" => Self::light(),
            _ => Self::standard(),
        }
    }

    /// Default theme: terminal colors, nothing forced
    pub fn standard() -> Self {
        Self {
            name: "default",
            bg_panel: Color::Reset,
            text_primary: Color::Reset,
            text_muted: Color::DarkGray,
            accent_primary: Color::Cyan,
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            bg_panel: tailwind::SLATE.c900,
            text_primary: tailwind::SLATE.c100,
            text_muted: tailwind::SLATE.c400,
            accent_primary: tailwind::CYAN.c400,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            bg_panel: tailwind::SLATE.c50,
            text_primary: tailwind::SLATE.c900,
            text_muted: tailwind::SLATE.c500,
            accent_primary: tailwind::BLUE.c700,
        }
    }

    // Prebuilt styles

    /// Style for the console panel background
    pub fn panel_background(&self) -> Style {
        Style::default().bg(self.bg_panel)
    }

    /// Style for the console panel border
    pub fn panel_border(&self) -> Style {
        Style::default()
            .fg(self.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the console panel title
    pub fn panel_title(&self) -> Style {
        Style::default()
            .fg(self.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the `HH:MM:SS` prefix of each entry
    pub fn timestamp(&self) -> Style {
        Style::default().fg(self.text_muted).bg(self.bg_panel)
    }

    /// Style for entry text
    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }
}
