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

//! Inputs for (re)configuring a backend.
//!
//! Loading configuration files is left to the host application; it fills a [`LogConfig`] or
//! implements [`ConfigSource`] and hands it over.

/// The log path and level a backend is configured with.
///
/// An empty `path` selects the console. `level` is one of `DEBUG`, `INFO`, `NOTICE`, `WARNING`,
/// `ERROR` or `CRITICAL`, case-insensitively; unknown names mean `INFO`.
///
/// With the `serde` feature, both fields are optional when deserializing:
///
/// ```yaml
/// path: /var/log/app.log
/// level: notice
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LogConfig {
    /// The log file, or empty for the console.
    pub path: String,
    /// The minimum level name.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            level: "INFO".to_string(),
        }
    }
}

impl LogConfig {
    /// Create a config for `path` at `level`.
    pub fn new(path: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            level: level.into(),
        }
    }
}

/// Supplies the current [`LogConfig`] every time the backend is reloaded.
///
/// Implemented for `LogConfig` itself and for closures returning one.
///
/// # Examples
///
/// ```
/// use logswitch::Backend;
/// use logswitch::LogConfig;
///
/// let backend = Backend::new();
/// let source = || LogConfig::new("", "warning");
/// backend.reload(&source).unwrap();
/// assert_eq!(backend.current_level(), logswitch::Level::Warning);
/// ```
pub trait ConfigSource: Send + Sync + 'static {
    /// Read the current configuration.
    fn log_config(&self) -> LogConfig;
}

impl ConfigSource for LogConfig {
    fn log_config(&self) -> LogConfig {
        self.clone()
    }
}

impl<F> ConfigSource for F
where
    F: Fn() -> LogConfig + Send + Sync + 'static,
{
    fn log_config(&self) -> LogConfig {
        self()
    }
}
