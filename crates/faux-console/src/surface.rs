//! Render surface and the document it is attached to
//!
//! The surface is an outer scrollable container holding an inner list of
//! entries. It is created once, attached to the document body, and shown or
//! hidden afterwards instead of being destroyed.

use std::sync::{Arc, Mutex};

use crate::lock;

/// Element id (and class) of the outer container
pub const CONTAINER_ID: &str = "Console";
/// Element id (and class) of the inner entry list
pub const LIST_ID: &str = "ConsoleLog";

/// Display state of the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Block,
    None,
}

/// One rendered line. `text` is already HTML-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub text: String,
}

impl LogEntry {
    /// Block-level markup for this entry
    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"log\"><span class=\"timestamp\">{}</span> {}</div>",
            self.timestamp, self.text
        )
    }
}

/// Inner list holding the rendered entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogList {
    entries: Vec<LogEntry>,
}

/// The visible output region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSurface {
    display: Display,
    scroll_top: usize,
    viewport_height: usize,
    list: LogList,
}

pub type SurfaceHandle = Arc<Mutex<RenderSurface>>;

impl RenderSurface {
    pub fn new(viewport_height: usize) -> Self {
        Self {
            display: Display::Block,
            scroll_top: 0,
            viewport_height,
            list: LogList::default(),
        }
    }

    pub fn into_handle(self) -> SurfaceHandle {
        Arc::new(Mutex::new(self))
    }

    pub fn id(&self) -> &'static str {
        CONTAINER_ID
    }

    pub fn list_id(&self) -> &'static str {
        LIST_ID
    }

    pub fn display(&self) -> Display {
        self.display
    }

    pub fn is_visible(&self) -> bool {
        self.display == Display::Block
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.display = if visible {
            Display::Block
        } else {
            Display::None
        };
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.list.entries
    }

    pub fn len(&self) -> usize {
        self.list.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.entries.is_empty()
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Resize the visible window, keeping the scroll offset in range
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
        self.scroll_top = self.scroll_top.min(self.scroll_top_max());
    }

    /// Index of the first visible entry
    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Largest valid scroll offset
    pub fn scroll_top_max(&self) -> usize {
        self.len().saturating_sub(self.viewport_height)
    }

    pub fn scroll_to(&mut self, offset: usize) {
        self.scroll_top = offset.min(self.scroll_top_max());
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_to(self.scroll_top.saturating_sub(rows));
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_to(self.scroll_top.saturating_add(rows));
    }

    /// Add an entry after all existing ones
    pub fn append(&mut self, entry: LogEntry) {
        self.list.entries.push(entry);
    }

    /// Markup of the inner list
    pub fn inner_html(&self) -> String {
        self.list.entries.iter().map(LogEntry::to_html).collect()
    }
}

/// Body-equivalent root that surfaces attach to
#[derive(Debug, Default)]
pub struct Document {
    body: Mutex<Vec<SurfaceHandle>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find an attached container by element id
    pub fn element_by_id(&self, id: &str) -> Option<SurfaceHandle> {
        lock(&self.body)
            .iter()
            .find(|surface| lock(surface).id() == id)
            .cloned()
    }

    pub fn append_child(&self, surface: SurfaceHandle) {
        lock(&self.body).push(surface);
    }

    pub fn child_count(&self) -> usize {
        lock(&self.body).len()
    }
}
