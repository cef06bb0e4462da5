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

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::Error;
use crate::ErrorKind;

/// A log file opened for append.
///
/// Writers share the handle through a read lock; [`LogFile::close`] takes the write lock, so a
/// close waits for every write already in flight. Writes after the close are dropped.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    file: RwLock<Option<File>>,
    open_files: Arc<AtomicUsize>,
}

impl LogFile {
    /// Open `path` for append, creating it with mode 0666 (before umask) if missing.
    ///
    /// `open_files` counts the handles that are open; it is incremented here and decremented on
    /// close.
    pub(crate) fn open(
        path: impl Into<PathBuf>,
        open_files: Arc<AtomicUsize>,
    ) -> Result<Self, Error> {
        let path = path.into();

        let mut options = OpenOptions::new();
        options.read(true).append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o666);
        }

        let file = options.open(&path).map_err(|err| {
            Error::new(ErrorKind::Io, "failed to open log file")
                .with_context("path", path.display())
                .with_source(err)
        })?;
        open_files.fetch_add(1, Ordering::AcqRel);

        Ok(Self {
            path,
            file: RwLock::new(Some(file)),
            open_files,
        })
    }

    /// The path this file was opened with.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the handle has been closed.
    pub fn is_closed(&self) -> bool {
        self.file
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }

    pub(crate) fn write_all(&self, bytes: &[u8]) -> Result<(), Error> {
        let guard = self.file.read().unwrap_or_else(|e| e.into_inner());
        let Some(mut file) = guard.as_ref() else {
            // closed by the retirement worker; the line belongs to a superseded backend
            return Ok(());
        };
        file.write_all(bytes).map_err(|err| {
            Error::new(ErrorKind::Io, "failed to write log file")
                .with_context("path", self.path.display())
                .with_source(err)
        })
    }

    /// Close the handle. Closing an already closed file is a no-op.
    pub fn close(&self) -> Result<(), Error> {
        let file = self.file.write().unwrap_or_else(|e| e.into_inner()).take();
        let Some(file) = file else {
            return Ok(());
        };

        self.open_files.fetch_sub(1, Ordering::AcqRel);
        close_file(file).map_err(|err| {
            Error::new(ErrorKind::Io, "failed to close log file")
                .with_context("path", self.path.display())
                .with_source(err)
        })
    }
}

#[cfg(unix)]
fn close_file(file: File) -> io::Result<()> {
    use std::os::fd::IntoRawFd;

    let fd = file.into_raw_fd();
    // SAFETY: `fd` was just released by `into_raw_fd` and is owned by nobody else.
    if unsafe { libc::close(fd) } < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

#[cfg(not(unix))]
fn close_file(file: File) -> io::Result<()> {
    file.sync_all()
}
