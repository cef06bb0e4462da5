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

// Closes a raw descriptor behind the backend's back, so this binary holds a single test and no
// other thread can be handed the freed descriptor number.
#![cfg(target_os = "linux")]

use std::fs;
use std::os::fd::RawFd;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use logswitch::Backend;
use logswitch::Error;
use logswitch::ErrorKind;
use logswitch::Trap;
use logswitch::append::Capture;
use logswitch::append::Console;
use tempfile::TempDir;

#[derive(Debug, Clone, Default)]
struct CollectingTrap(Arc<Mutex<Vec<(ErrorKind, String)>>>);

impl Trap for CollectingTrap {
    fn trap(&self, err: &Error) {
        self.0.lock().unwrap().push((err.kind(), err.to_string()));
    }
}

#[derive(Debug, Clone, Default)]
struct PanickingTrap(Arc<Mutex<Vec<ErrorKind>>>);

impl Trap for PanickingTrap {
    fn trap(&self, err: &Error) {
        self.0.lock().unwrap().push(err.kind());
        if err.kind() == ErrorKind::Io {
            panic!("{err}");
        }
    }
}

fn find_fd(path: &Path) -> RawFd {
    fs::read_dir("/proc/self/fd")
        .unwrap()
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let target = fs::read_link(entry.path()).ok()?;
            let fd = entry.file_name().to_str()?.parse::<RawFd>().ok()?;
            (target == path).then_some(fd)
        })
        .next()
        .expect("log file descriptor not found")
}

#[test]
fn test_close_failures_reach_trap() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let path = dir.path().join("app.log");
    let trap = CollectingTrap::default();
    let backend = Backend::builder()
        .console(Console::Testing(Capture::default()))
        .grace_period(Duration::from_millis(20))
        .trap(trap.clone())
        .build();

    backend.reconfigure(path.to_str().unwrap(), "INFO").unwrap();
    let path = fs::canonicalize(&path).unwrap();
    let fd = find_fd(&path);
    // SAFETY: the descriptor is not used again before the backend closes it.
    assert_eq!(unsafe { libc::close(fd) }, 0);

    backend.reconfigure("", "INFO").unwrap();

    let start = Instant::now();
    while trap.0.lock().unwrap().is_empty() && start.elapsed() < Duration::from_secs(5) {
        thread::sleep(Duration::from_millis(5));
    }

    let errors = trap.0.lock().unwrap().clone();
    assert_eq!(errors.len(), 1, "{errors:?}");
    let (kind, message) = &errors[0];
    assert_eq!(*kind, ErrorKind::Io);
    assert!(message.contains("failed to close log file"), "{message}");
    assert!(message.contains("generation: 2"), "{message}");
    assert_eq!(backend.open_files(), 0);

    // a worker that dies while closing is reported when the queue shuts down
    let path = dir.path().join("other.log");
    let trap = PanickingTrap::default();
    let backend = Backend::builder()
        .console(Console::Testing(Capture::default()))
        .trap(trap.clone())
        .build();

    backend.reconfigure(path.to_str().unwrap(), "INFO").unwrap();
    let fd = find_fd(&fs::canonicalize(&path).unwrap());
    // SAFETY: the descriptor is not used again before the backend closes it.
    assert_eq!(unsafe { libc::close(fd) }, 0);

    backend.shutdown();
    assert_eq!(
        *trap.0.lock().unwrap(),
        vec![ErrorKind::Io, ErrorKind::Unexpected]
    );
    assert_eq!(backend.open_files(), 0);
}
