// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The backend manager: the active logging configuration and its runtime reconfiguration.

use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use arc_swap::ArcSwap;

use crate::Error;
use crate::Layout;
use crate::Level;
use crate::Trap;
use crate::append::Console;
use crate::append::LogFile;
use crate::append::Sink;
use crate::config::ConfigSource;
use crate::config::LogConfig;
use crate::layout::TextLayout;
use crate::record::Record;
use crate::retire::DEFAULT_GRACE_PERIOD;
use crate::retire::RetirementEntry;
use crate::retire::RetirementQueue;
use crate::trap::DefaultTrap;

mod state;

pub use self::state::BackendState;

/// Owns the active [`BackendState`] and switches it at runtime.
///
/// Emitting is lock-free: every call loads the current state snapshot and writes through it.
/// [`reconfigure`](Backend::reconfigure) builds a complete new state, publishes it atomically, and
/// hands superseded log files to a [`RetirementQueue`] which closes them after a grace period. At
/// most two log files are open across one handoff: the fresh one and its predecessor.
///
/// # Examples
///
/// ```
/// use logswitch::Backend;
/// use logswitch::Level;
///
/// let backend = Backend::new();
/// assert_eq!(backend.current_level(), Level::Info);
///
/// backend.reconfigure("", "DEBUG").unwrap();
/// assert_eq!(backend.current_level(), Level::Debug);
/// assert_eq!(backend.generation(), 2);
/// ```
pub struct Backend {
    state: ArcSwap<BackendState>,
    reconfigure_lock: Mutex<()>,
    retirement: RetirementQueue,
    console: Console,
    open_files: Arc<AtomicUsize>,
    trap: Arc<dyn Trap>,
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("state", &self.state.load())
            .field("retirement", &self.retirement)
            .field("open_files", &self.open_files)
            .finish_non_exhaustive()
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend {
    /// Create a backend writing to stdout at [`Level::Info`].
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new [`BackendBuilder`].
    pub fn builder() -> BackendBuilder {
        BackendBuilder::default()
    }

    /// Switch the sink and the level.
    ///
    /// An empty `path` selects the console; otherwise the file at `path` is opened for append
    /// and created if missing. An unknown `level_name` falls back to [`Level::Info`].
    ///
    /// The previous state stays active if the file cannot be opened.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::Io`](crate::ErrorKind::Io) error if the log file cannot be opened.
    pub fn reconfigure(&self, path: &str, level_name: &str) -> Result<(), Error> {
        self.publish(path, level_name, None)
    }

    /// Like [`reconfigure`](Backend::reconfigure), formatting with `layout` instead of the
    /// default [`TextLayout`].
    pub fn reconfigure_with_layout(
        &self,
        path: &str,
        level_name: &str,
        layout: impl Into<Box<dyn Layout>>,
    ) -> Result<(), Error> {
        let layout: Box<dyn Layout> = layout.into();
        self.publish(path, level_name, Some(Arc::from(layout)))
    }

    /// Reconfigure from a [`LogConfig`].
    pub fn reconfigure_from(&self, config: &LogConfig) -> Result<(), Error> {
        self.reconfigure(&config.path, &config.level)
    }

    /// Read a fresh [`LogConfig`] from `source` and reconfigure with it.
    pub fn reload(&self, source: &dyn ConfigSource) -> Result<(), Error> {
        self.reconfigure_from(&source.log_config())
    }

    fn publish(
        &self,
        path: &str,
        level_name: &str,
        layout: Option<Arc<dyn Layout>>,
    ) -> Result<(), Error> {
        let level = Level::parse_or_info(level_name);

        let _guard = self
            .reconfigure_lock
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let generation = self.state.load().generation() + 1;

        let sink = if path.is_empty() {
            Sink::Console(self.console.clone())
        } else {
            let file = Arc::new(LogFile::open(path, self.open_files.clone())?);
            self.retirement
                .enqueue(RetirementEntry::new(file.clone(), generation));
            Sink::File(file)
        };

        let layout = layout.unwrap_or_else(|| default_layout(&sink));
        let allowed_outstanding = if sink.is_file() { 1 } else { 0 };

        self.state
            .store(Arc::new(BackendState::new(sink, layout, level, generation)));
        self.retirement.retire(allowed_outstanding);
        Ok(())
    }

    /// Write `message` at `level` through the active state.
    ///
    /// Does nothing if `level` is below the active level. Never fails: write errors go to the
    /// backend's [`Trap`].
    #[track_caller]
    pub fn emit(&self, level: Level, message: impl fmt::Display) {
        let location = Location::caller();
        self.emit_record(
            &Record::builder()
                .level(level)
                .file(Some(location.file()))
                .line(Some(location.line()))
                .args(format_args!("{message}"))
                .build(),
        );
    }

    /// Write a prepared record through the active state.
    pub fn emit_record(&self, record: &Record) {
        let state = self.state.load();
        if let Err(err) = state.emit(record) {
            self.trap.trap(&err);
        }
    }

    /// Emit at [`Level::Debug`].
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.emit(Level::Debug, message);
    }

    /// Emit at [`Level::Info`].
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.emit(Level::Info, message);
    }

    /// Emit at [`Level::Notice`].
    #[track_caller]
    pub fn notice(&self, message: impl fmt::Display) {
        self.emit(Level::Notice, message);
    }

    /// Emit at [`Level::Warning`].
    #[track_caller]
    pub fn warning(&self, message: impl fmt::Display) {
        self.emit(Level::Warning, message);
    }

    /// Emit at [`Level::Error`].
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.emit(Level::Error, message);
    }

    /// Emit at [`Level::Critical`].
    #[track_caller]
    pub fn critical(&self, message: impl fmt::Display) {
        self.emit(Level::Critical, message);
    }

    /// The level of the active state.
    pub fn current_level(&self) -> Level {
        self.state.load().level()
    }

    /// The generation of the active state.
    pub fn generation(&self) -> u64 {
        self.state.load().generation()
    }

    /// A snapshot of the active state.
    pub fn state(&self) -> Arc<BackendState> {
        self.state.load_full()
    }

    /// The number of log files this backend opened that are not closed yet.
    pub fn open_files(&self) -> usize {
        self.open_files.load(Ordering::Acquire)
    }

    /// Flush the console if it is the active sink. Files are written unbuffered.
    pub fn flush(&self) {
        match self.state.load().sink() {
            Sink::Console(Console::Stdout) => {
                let _ = std::io::stdout().flush();
            }
            Sink::Console(Console::Stderr) => {
                let _ = std::io::stderr().flush();
            }
            Sink::Console(Console::Testing(_)) | Sink::File(_) => {}
        }
    }

    /// Stop the retirement worker and close every log file immediately, including the active
    /// one. Lines emitted to a file sink afterwards are dropped.
    pub fn shutdown(&self) {
        self.retirement.shutdown();
    }
}

fn default_layout(sink: &Sink) -> Arc<dyn Layout> {
    match sink {
        Sink::Console(_) => Arc::new(TextLayout::default()),
        Sink::File(_) => Arc::new(TextLayout::default().no_color()),
    }
}

/// A builder for configuring a [`Backend`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use logswitch::Backend;
/// use logswitch::append::Console;
///
/// let backend = Backend::builder()
///     .console(Console::Stderr)
///     .grace_period(Duration::from_secs(1))
///     .build();
/// ```
#[derive(Debug)]
pub struct BackendBuilder {
    console: Console,
    grace_period: Duration,
    thread_name: String,
    trap: Box<dyn Trap>,
}

impl Default for BackendBuilder {
    fn default() -> Self {
        Self {
            console: Console::Stdout,
            grace_period: DEFAULT_GRACE_PERIOD,
            thread_name: "logswitch-retire".to_string(),
            trap: Box::new(DefaultTrap::default()),
        }
    }
}

impl BackendBuilder {
    /// Set the console stream used whenever no log path is configured.
    ///
    /// Default to [`Console::Stdout`].
    pub fn console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    /// Set the delay between retiring a log file and closing it.
    ///
    /// Default to five seconds.
    pub fn grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Set the thread name of the retirement worker.
    pub fn thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Set the trap receiving write and close failures.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Build the backend. Its first state writes to the console at [`Level::Info`].
    pub fn build(self) -> Backend {
        let Self {
            console,
            grace_period,
            thread_name,
            trap,
        } = self;

        let trap: Arc<dyn Trap> = Arc::from(trap);
        let sink = Sink::Console(console.clone());
        let state = BackendState::new(sink, Arc::new(TextLayout::default()), Level::Info, 1);

        Backend {
            state: ArcSwap::from_pointee(state),
            reconfigure_lock: Mutex::new(()),
            retirement: RetirementQueue::new(thread_name, grace_period, trap.clone()),
            console,
            open_files: Arc::new(AtomicUsize::new(0)),
            trap,
        }
    }
}
