//! The console facade
//!
//! [`FauxConsole`] is a cheap, clonable handle to the console state. The
//! environment slots never hold the console itself, only weak adapters, so
//! dropping the last handle makes the installed facility inert.

use std::cell::Cell;
use std::sync::{Arc, Mutex, OnceLock, Weak};

use chrono::Local;
use faux_console_config::{ConsoleConfig, CookieJar, FileStore, KeyValueStore};
use faux_console_theme::Theme;

use crate::environment::{Environment, ErrorHook, ErrorReport, Facility};
use crate::error::ConsoleError;
use crate::installer::{ensure_surface_matches_state, Installer};
use crate::lock;
use crate::message::Message;
use crate::render;
use crate::settings::{Settings, SettingsStore};
use crate::surface::SurfaceHandle;

/// Callback receiving the final text of every message
pub type MessageDelegate = Arc<dyn Fn(&str) + Send + Sync>;

const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

static SHARED: OnceLock<FauxConsole> = OnceLock::new();

thread_local! {
    static CONSTRUCTING: Cell<bool> = const { Cell::new(false) };
    static EMITTING: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as being inside `flag` until dropped
struct ThreadFlag(&'static std::thread::LocalKey<Cell<bool>>);

impl ThreadFlag {
    fn enter(flag: &'static std::thread::LocalKey<Cell<bool>>) -> Option<Self> {
        if flag.with(Cell::get) {
            return None;
        }
        flag.with(|f| f.set(true));
        Some(Self(flag))
    }
}

impl Drop for ThreadFlag {
    fn drop(&mut self) {
        self.0.with(|f| f.set(false));
    }
}

struct ConsoleState {
    settings: Settings,
    store: SettingsStore,
    installer: Installer,
    surface: Option<SurfaceHandle>,
    on_message: Option<MessageDelegate>,
    messages: Option<Vec<String>>,
    viewport_height: usize,
}

impl ConsoleState {
    fn persist(&mut self) {
        let settings = self.settings.clone();
        self.store.save(&settings);
    }

    fn ensure_surface(&mut self, env: &Environment) {
        ensure_surface_matches_state(
            env,
            self.settings.enabled,
            &mut self.surface,
            self.viewport_height,
        );
    }

    fn sync_retention(&mut self) {
        if !self.settings.save_messages {
            self.messages = None;
        } else if self.messages.is_none() {
            self.messages = Some(Vec::new());
        }
    }
}

/// Handle to a console instance
#[derive(Clone)]
pub struct FauxConsole {
    state: Arc<Mutex<ConsoleState>>,
    env: Arc<Environment>,
}

/// Adapter installed into the environment's logging slot
struct ConsoleFacility {
    state: Weak<Mutex<ConsoleState>>,
}

impl Facility for ConsoleFacility {
    fn log(&self, message: Message) {
        if let Some(state) = self.state.upgrade() {
            emit(&state, message);
        }
    }

    fn warn(&self, message: Message) {
        self.log(message);
    }

    fn error(&self, message: Message) {
        self.log(message);
    }
}

/// Adapter installed into the environment's uncaught-error slot
struct ConsoleErrorHook {
    state: Weak<Mutex<ConsoleState>>,
}

impl ErrorHook for ConsoleErrorHook {
    fn report(&self, report: &ErrorReport) -> bool {
        // Unhandled when nothing could take the report, so the host's own
        // error reporting still gets to see it
        match self.state.upgrade() {
            Some(state) => emit(&state, Message::Text(report.to_string())),
            None => false,
        }
    }
}

/// The single rendering path behind `log`, `warn` and `error`
///
/// Returns `false` only when the message was dropped because this thread is
/// already inside `emit`; a disabled console swallows messages on purpose.
fn emit(state: &Mutex<ConsoleState>, message: Message) -> bool {
    let Some(_emitting) = ThreadFlag::enter(&EMITTING) else {
        return false;
    };

    let (text, delegate) = {
        let state = lock(state);
        if !state.settings.enabled {
            return true;
        }
        (message.to_text(), state.on_message.clone())
    };

    // Called unlocked so the delegate may use the console itself
    if let Some(delegate) = delegate {
        delegate(&text);
    }

    let mut state = lock(state);

    if state.settings.save_messages {
        state
            .messages
            .get_or_insert_with(Vec::new)
            .push(text.clone());
    }

    if let Some(surface) = &state.surface {
        render::render_text(&mut lock(surface), &text, Local::now().time());
    }

    true
}

impl FauxConsole {
    /// Create a console on `env`, loading settings from `store`
    ///
    /// If the environment has no logging facility yet the console takes the
    /// slot right away, so logging calls always land somewhere. A console
    /// whose stored settings say enabled comes up enabled.
    pub fn new(env: Arc<Environment>, store: SettingsStore) -> Self {
        Self::with_viewport(env, store, DEFAULT_VIEWPORT_HEIGHT)
    }

    pub fn with_viewport(
        env: Arc<Environment>,
        store: SettingsStore,
        viewport_height: usize,
    ) -> Self {
        let settings = store.load();
        let enabled = settings.enabled;

        let mut state = ConsoleState {
            settings,
            store,
            installer: Installer::new(),
            surface: None,
            on_message: None,
            messages: None,
            viewport_height,
        };
        state.sync_retention();

        let console = Self {
            state: Arc::new(Mutex::new(state)),
            env,
        };

        if console.env.console().is_none() {
            console.env.set_console(Some(console.facility()));
        }

        lock(&console.state).ensure_surface(&console.env);

        if enabled {
            console.enable();
        }

        console
    }

    /// Create a console keyed, scoped and sized according to `config`
    pub fn with_config(
        env: Arc<Environment>,
        store: Box<dyn KeyValueStore>,
        config: &ConsoleConfig,
    ) -> Self {
        Self::with_viewport(
            env,
            SettingsStore::from_config(store, config),
            config.viewport_height,
        )
    }

    /// Create a console persisting to the file store named by `config`
    pub fn from_config(
        env: Arc<Environment>,
        config: &ConsoleConfig,
    ) -> Result<Self, ConsoleError> {
        let store = match &config.storage_file {
            Some(path) => FileStore::open(path.clone())?,
            None => FileStore::open_default()?,
        };
        Ok(Self::with_config(env, Box::new(store), config))
    }

    /// The process-wide console, built on first use
    ///
    /// Uses the global environment and the configured file store; if the
    /// store cannot be opened, settings live in memory for this process.
    ///
    /// # Panics
    ///
    /// When called again on the same thread while the shared console is
    /// still being constructed.
    pub fn shared() -> &'static FauxConsole {
        if let Some(console) = SHARED.get() {
            return console;
        }

        // OnceLock would deadlock on re-entry, fail loudly instead
        if CONSTRUCTING.with(Cell::get) {
            panic!("FauxConsole::shared() re-entered while constructing the shared console");
        }

        SHARED.get_or_init(|| {
            let _constructing = ThreadFlag::enter(&CONSTRUCTING);
            Self::build_shared()
        })
    }

    /// Make `console` the process-wide console
    ///
    /// Fails when the shared console exists already, whether seeded or built
    /// by [`FauxConsole::shared`]; `console` is dropped in that case.
    ///
    /// # Panics
    ///
    /// When called while the shared console is being constructed on this
    /// thread.
    pub fn init_shared(console: FauxConsole) -> Result<&'static FauxConsole, ConsoleError> {
        if CONSTRUCTING.with(Cell::get) {
            panic!("FauxConsole::init_shared() called while constructing the shared console");
        }

        let mut seed = Some(console);
        let shared = SHARED.get_or_init(|| seed.take().unwrap_or_else(Self::build_shared));

        match seed {
            Some(_) => Err(ConsoleError::AlreadyInitialized),
            None => Ok(shared),
        }
    }

    /// The process-wide console if it has been built already
    pub fn try_shared() -> Option<&'static FauxConsole> {
        SHARED.get()
    }

    fn build_shared() -> FauxConsole {
        let config = ConsoleConfig::load();
        let env = Environment::global();

        match Self::from_config(Arc::clone(&env), &config) {
            Ok(console) => console,
            Err(e) => {
                log::warn!(
                    "Settings store unavailable, settings will not persist: {:#}",
                    e
                );
                Self::with_config(env, Box::new(CookieJar::new()), &config)
            }
        }
    }

    fn facility(&self) -> Arc<dyn Facility> {
        Arc::new(ConsoleFacility {
            state: Arc::downgrade(&self.state),
        })
    }

    fn error_hook(&self) -> Arc<dyn ErrorHook> {
        Arc::new(ConsoleErrorHook {
            state: Arc::downgrade(&self.state),
        })
    }

    pub fn log(&self, message: impl Into<Message>) {
        emit(&self.state, message.into());
    }

    pub fn warn(&self, message: impl Into<Message>) {
        emit(&self.state, message.into());
    }

    pub fn error(&self, message: impl Into<Message>) {
        emit(&self.state, message.into());
    }

    /// Show the console and take over the environment slots
    pub fn enable(&self) {
        {
            let mut state = lock(&self.state);
            state.settings.enabled = true;
            state.persist();
            state
                .installer
                .attach(&self.env, self.facility(), self.error_hook());
            state.ensure_surface(&self.env);
        }
        log::debug!("Console enabled");
    }

    /// Hide the console and hand the environment slots back
    pub fn disable(&self) {
        {
            let mut state = lock(&self.state);
            state.settings.enabled = false;
            state.persist();
            state.installer.detach(&self.env);
            state.ensure_surface(&self.env);
        }
        log::debug!("Console disabled");
    }

    pub fn toggle(&self) {
        if self.enabled() {
            self.disable();
        } else {
            self.enable();
        }
    }

    pub fn enabled(&self) -> bool {
        lock(&self.state).settings.enabled
    }

    /// Whether the console currently occupies the environment slots
    pub fn is_attached(&self) -> bool {
        lock(&self.state).installer.is_attached()
    }

    pub fn settings(&self) -> Settings {
        lock(&self.state).settings.clone()
    }

    /// Select a theme by name and persist the choice
    pub fn set_theme(&self, name: impl Into<String>) {
        let mut state = lock(&self.state);
        state.settings.theme = name.into();
        state.persist();
    }

    /// The theme named by the current settings
    pub fn theme(&self) -> Theme {
        Theme::by_name(&lock(&self.state).settings.theme)
    }

    /// Turn message retention on or off and persist the choice
    ///
    /// Turning it off discards the retained messages.
    pub fn set_save_messages(&self, save: bool) {
        let mut state = lock(&self.state);
        state.settings.save_messages = save;
        state.sync_retention();
        state.persist();
    }

    /// Texts of all messages rendered while retention was on
    pub fn messages(&self) -> Option<Vec<String>> {
        lock(&self.state).messages.clone()
    }

    pub fn set_on_message<F>(&self, delegate: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        lock(&self.state).on_message = Some(Arc::new(delegate));
    }

    pub fn clear_on_message(&self) {
        lock(&self.state).on_message = None;
    }

    /// The render surface, once one has been built
    pub fn surface(&self) -> Option<SurfaceHandle> {
        lock(&self.state).surface.clone()
    }

    pub fn environment(&self) -> &Arc<Environment> {
        &self.env
    }
}
