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

//! Logswitch is a logging backend whose sink and verbosity can be switched at runtime.
//!
//! # Overview
//!
//! A [`Backend`] owns one immutable [`BackendState`] (sink, layout, level, generation) at a time.
//! [`Backend::reconfigure`] opens the new sink, publishes a new state atomically, and hands the
//! superseded log file to a [`RetirementQueue`] that closes it after a grace period, so writers
//! that loaded the old state just before the swap can finish. Emitting never blocks on a
//! reconfiguration and never fails.
//!
//! [`BufferRecord`] collects annotations and timings of one operation into a single line.
//!
//! # Examples
//!
//! Configure the process-wide backend and log:
//!
//! ```
//! use logswitch::Level;
//!
//! logswitch::reconfigure("", "DEBUG").unwrap();
//! logswitch::emit(Level::Debug, "connected");
//!
//! let mut record = logswitch::buffer();
//! record.append_pair("user", "alice");
//! record.start_timer("load");
//! record.stop_timer("load");
//! record.flush();
//! ```
//!
//! Switch to a file and back, e.g. from a reload signal handler:
//!
//! ```no_run
//! use logswitch::LogConfig;
//!
//! logswitch::init(|| LogConfig::new("/var/log/app.log", "notice")).unwrap();
//! logswitch::bridge::setup_log_crate();
//! log::warn!("written to /var/log/app.log");
//!
//! logswitch::reload().unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod bridge;
pub mod color;
pub mod layout;
pub mod record;
pub mod retire;
pub mod trap;

mod backend;
mod buffer;
mod config;
mod error;
mod global;

pub use self::append::Sink;
pub use self::backend::Backend;
pub use self::backend::BackendBuilder;
pub use self::backend::BackendState;
pub use self::buffer::BufferRecord;
pub use self::config::ConfigSource;
pub use self::config::LogConfig;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::global::backend;
pub use self::global::buffer;
pub use self::global::current_level;
pub use self::global::emit;
pub use self::global::init;
pub use self::global::reconfigure;
pub use self::global::reload;
pub use self::global::shutdown;
pub use self::layout::Layout;
pub use self::record::Level;
pub use self::record::Record;
pub use self::retire::RetirementEntry;
pub use self::retire::RetirementQueue;
pub use self::trap::Trap;
