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

//! Bridge the [`log`] crate macros into logswitch.

use crate::Backend;
use crate::Level;
use crate::record::Record;

struct LogCrateLogger(());

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        log::Log::enabled(crate::backend(), metadata)
    }

    fn log(&self, record: &log::Record) {
        log::Log::log(crate::backend(), record);
    }

    fn flush(&self) {
        log::Log::flush(crate::backend());
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to set up a `LogCrateLogger` and all logs from the
/// log crate will be forwarded to the process-wide [`backend`](crate::backend). Reconfiguring
/// that backend takes effect for the log macros immediately.
///
/// This function will set the global maximum log level to `Trace`; filtering happens against the
/// active backend state. To override this, call [`log::set_max_level`] after this function.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// logswitch::bridge::try_setup_log_crate().unwrap();
/// log::info!("routed through logswitch");
/// ```
pub fn try_setup_log_crate() -> Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// See [`try_setup_log_crate`].
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "logswitch::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}

impl log::Log for Backend {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.state().enabled(Level::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        self.emit_record(
            &Record::builder()
                .args(*record.args())
                .level(record.level().into())
                .file(record.file())
                .line(record.line())
                .build(),
        );
    }

    fn flush(&self) {
        Backend::flush(self);
    }
}
