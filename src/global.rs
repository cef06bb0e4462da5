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

//! The process-wide backend.

use std::fmt;
use std::sync::LazyLock;
use std::sync::Mutex;

use crate::Backend;
use crate::BufferRecord;
use crate::ConfigSource;
use crate::Error;
use crate::ErrorKind;
use crate::Level;

static BACKEND: LazyLock<Backend> = LazyLock::new(Backend::new);
static SOURCE: Mutex<Option<Box<dyn ConfigSource>>> = Mutex::new(None);

/// The process-wide backend. It starts on stdout at [`Level::Info`].
pub fn backend() -> &'static Backend {
    &BACKEND
}

/// Register `source` and configure the process-wide backend from it.
///
/// Later calls to [`reload`] read `source` again. Registering a new source replaces the previous
/// one. Whether a failure here should end the process is up to the caller.
///
/// # Errors
///
/// Returns an error if the configured log file cannot be opened; the backend keeps its previous
/// state and `source` stays registered.
///
/// # Examples
///
/// ```
/// use logswitch::LogConfig;
///
/// logswitch::init(LogConfig::new("", "notice")).unwrap();
/// assert_eq!(logswitch::current_level(), logswitch::Level::Notice);
/// ```
pub fn init(source: impl ConfigSource) -> Result<(), Error> {
    let config = source.log_config();
    *SOURCE.lock().unwrap_or_else(|e| e.into_inner()) = Some(Box::new(source));
    backend().reconfigure_from(&config)
}

/// Read the registered source again and reconfigure the process-wide backend.
///
/// Typically called from a reload signal handler.
///
/// # Errors
///
/// Returns an error if [`init`] was never called, or if the log file cannot be opened.
pub fn reload() -> Result<(), Error> {
    let config = match SOURCE.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
        Some(source) => source.log_config(),
        None => {
            return Err(Error::new(
                ErrorKind::NotInitialized,
                "no config source registered, call logswitch::init first",
            ));
        }
    };
    backend().reconfigure_from(&config)
}

/// See [`Backend::reconfigure`].
pub fn reconfigure(path: &str, level_name: &str) -> Result<(), Error> {
    backend().reconfigure(path, level_name)
}

/// See [`Backend::emit`].
#[track_caller]
pub fn emit(level: Level, message: impl fmt::Display) {
    backend().emit(level, message);
}

/// See [`Backend::current_level`].
pub fn current_level() -> Level {
    backend().current_level()
}

/// Start a [`BufferRecord`] flushing to the process-wide backend.
pub fn buffer() -> BufferRecord<'static> {
    BufferRecord::new(backend())
}

/// See [`Backend::shutdown`].
pub fn shutdown() {
    backend().shutdown();
}
