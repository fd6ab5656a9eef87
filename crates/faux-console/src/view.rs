//! Terminal rendering of the console surface

use faux_console_theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

use crate::lock;
use crate::surface::{LogEntry, RenderSurface, SurfaceHandle};

/// Draws the visible window of a render surface as a bordered panel
pub struct ConsoleView<'a> {
    surface: &'a RenderSurface,
    theme: &'a Theme,
}

impl<'a> ConsoleView<'a> {
    pub fn new(surface: &'a RenderSurface, theme: &'a Theme) -> Self {
        Self { surface, theme }
    }
}

impl Widget for ConsoleView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.surface.is_visible() {
            return;
        }

        Clear.render(area, buf);

        let block = Block::default()
            .title(format!(" Console ({}) ", self.surface.len()))
            .borders(Borders::ALL)
            .border_style(self.theme.panel_border())
            .title_style(self.theme.panel_title());

        let available_height = block.inner(area).height as usize;

        let lines: Vec<Line> = self
            .surface
            .entries()
            .iter()
            .skip(self.surface.scroll_top())
            .flat_map(|entry| entry_lines(entry, self.theme))
            .take(available_height)
            .collect();

        Paragraph::new(lines)
            .block(block)
            .style(self.theme.panel_background())
            .render(area, buf);
    }
}

const TAB: &str = "    ";

/// One line per row of the entry's text, the timestamp on the first
fn entry_lines<'a>(entry: &'a LogEntry, theme: &Theme) -> Vec<Line<'a>> {
    let indent = " ".repeat(entry.timestamp.chars().count() + 1);

    entry
        .text
        .split('\n')
        .enumerate()
        .map(|(row, text)| {
            let lead = if row == 0 {
                Span::styled(format!("{} ", entry.timestamp), theme.timestamp())
            } else {
                Span::raw(indent.clone())
            };
            Line::from(vec![
                lead,
                Span::styled(text.replace('\t', TAB), theme.text()),
            ])
        })
        .collect()
}

/// Top `height_percent` of `area` (Quake-style drop-down)
pub fn console_area(area: Rect, height_percent: u16) -> Rect {
    let console_height = (area.height as u32 * height_percent.min(100) as u32 / 100) as u16;
    Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: console_height.min(area.height),
    }
}

/// Render the console into the top of `area`
///
/// The surface's viewport height follows the drawn panel; a surface that was
/// scrolled to the bottom stays at the bottom across resizes.
pub fn render(
    surface: &SurfaceHandle,
    theme: &Theme,
    height_percent: u16,
    area: Rect,
    f: &mut Frame,
) {
    let console_area = console_area(area, height_percent);
    let mut surface = lock(surface);

    let at_bottom = surface.scroll_top() == surface.scroll_top_max();
    surface.set_viewport_height(console_area.height.saturating_sub(2) as usize); // -2 for borders
    if at_bottom {
        let bottom = surface.scroll_top_max();
        surface.scroll_to(bottom);
    }

    f.render_widget(ConsoleView::new(&surface, theme), console_area);
}
