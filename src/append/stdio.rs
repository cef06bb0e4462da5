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

use std::io;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;

/// A console stream the backend writes to when no log path is configured.
#[derive(Debug, Clone, Default)]
pub enum Console {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
    /// An in-memory buffer that tests can read back.
    Testing(Capture),
}

impl Console {
    pub(crate) fn write_all(&self, bytes: &[u8]) -> Result<(), Error> {
        let result = match self {
            Console::Stdout => io::stdout().lock().write_all(bytes),
            Console::Stderr => io::stderr().lock().write_all(bytes),
            Console::Testing(capture) => {
                capture.buffer().extend_from_slice(bytes);
                Ok(())
            }
        };
        result.map_err(Error::from_io_error)
    }
}

/// A shared in-memory buffer collecting console output.
///
/// # Examples
///
/// ```
/// use logswitch::Backend;
/// use logswitch::Level;
/// use logswitch::append::Capture;
/// use logswitch::append::Console;
///
/// let capture = Capture::default();
/// let backend = Backend::builder()
///     .console(Console::Testing(capture.clone()))
///     .build();
/// backend.emit(Level::Info, "hello");
/// assert!(capture.contents().ends_with(" - hello\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Capture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Capture {
    fn buffer(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer()).into_owned()
    }

    /// The written lines, without trailing newlines.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    /// Discard everything written so far.
    pub fn clear(&self) {
        self.buffer().clear();
    }
}
