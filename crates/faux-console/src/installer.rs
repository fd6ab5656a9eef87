//! Swapping the console in and out of the environment slots

use std::sync::Arc;

use crate::environment::{Environment, ErrorHook, Facility};
use crate::lock;
use crate::surface::{RenderSurface, SurfaceHandle, CONTAINER_ID};

/// Attach/detach state plus whatever occupied the slots before attaching
#[derive(Default)]
pub struct Installer {
    attached: bool,
    previous_console: Option<Arc<dyn Facility>>,
    previous_onerror: Option<Arc<dyn ErrorHook>>,
}

impl Installer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Install `facility` and `hook` into the environment slots
    ///
    /// The previous occupants are captured only on the first attach; attaching
    /// again re-installs the handlers but keeps the original captures.
    pub fn attach(
        &mut self,
        env: &Environment,
        facility: Arc<dyn Facility>,
        hook: Arc<dyn ErrorHook>,
    ) {
        if !self.attached {
            self.previous_console = env.console();
            self.previous_onerror = env.onerror();
            self.attached = true;
        } else {
            log::debug!("Console already attached, keeping captured handlers");
        }

        env.set_console(Some(facility));
        env.set_onerror(Some(hook));
    }

    /// Put the captured occupants back. No-op when not attached.
    pub fn detach(&mut self, env: &Environment) {
        if !self.attached {
            return;
        }

        env.set_console(self.previous_console.take());
        env.set_onerror(self.previous_onerror.take());
        self.attached = false;
    }
}

/// Make the render surface agree with `enabled`
///
/// An existing surface is only shown or hidden. Otherwise a new one is built
/// and attached to the document body, but only when enabled. Headless
/// environments never get a surface.
pub fn ensure_surface_matches_state(
    env: &Environment,
    enabled: bool,
    surface: &mut Option<SurfaceHandle>,
    viewport_height: usize,
) {
    let Some(document) = env.document() else {
        return;
    };

    let existing = surface
        .clone()
        .or_else(|| document.element_by_id(CONTAINER_ID));
    if let Some(existing) = existing {
        lock(&existing).set_visible(enabled);
        *surface = Some(existing);
        return;
    }

    if !enabled {
        return;
    }

    let created = RenderSurface::new(viewport_height).into_handle();
    document.append_child(Arc::clone(&created));
    *surface = Some(created);
}
