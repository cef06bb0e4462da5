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

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use logswitch::Backend;
use logswitch::Error;
use logswitch::ErrorKind;
use logswitch::Level;
use logswitch::Sink;
use logswitch::Trap;
use logswitch::append::Capture;
use logswitch::append::Console;
use logswitch::layout::AuditLayout;
use tempfile::TempDir;

fn capturing_backend() -> (Backend, Capture) {
    let capture = Capture::default();
    let backend = Backend::builder()
        .console(Console::Testing(capture.clone()))
        .build();
    (backend, capture)
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn test_initial_state() {
    let (backend, _) = capturing_backend();
    assert_eq!(backend.generation(), 1);
    assert_eq!(backend.current_level(), Level::Info);
    assert!(matches!(backend.state().sink(), Sink::Console(_)));
    assert_eq!(backend.open_files(), 0);
}

#[test]
fn test_emit_filters_by_level() {
    let levels = [
        Level::Debug,
        Level::Info,
        Level::Notice,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    for active in levels {
        let (backend, capture) = capturing_backend();
        backend.reconfigure("", active.as_str()).unwrap();

        for level in levels {
            capture.clear();
            backend.emit(level, "probe");
            assert_eq!(
                capture.lines().len(),
                usize::from(level >= active),
                "active={active} level={level}"
            );
        }
    }
}

#[test]
fn test_console_debug_after_reconfigure() {
    let (backend, capture) = capturing_backend();
    backend.emit(Level::Debug, "hidden");
    assert!(capture.contents().is_empty());

    backend.reconfigure("", "DEBUG").unwrap();
    backend.emit(Level::Debug, "x");

    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(" - x"), "{}", lines[0]);
    assert!(lines[0].contains("reconfigure.rs:"), "{}", lines[0]);
}

#[test]
fn test_notice_warning_boundary_in_file() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let path = dir.path().join("app.log");
    let (backend, _) = capturing_backend();

    backend
        .reconfigure(path.to_str().unwrap(), "WARNING")
        .unwrap();
    backend.notice("below threshold");
    backend.warning("at threshold");
    backend.critical("above threshold");

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 2, "{lines:?}");
    assert!(lines[0].ends_with(">WARNI - at threshold"), "{}", lines[0]);
    assert!(lines[1].ends_with(">CRITI - above threshold"), "{}", lines[1]);
    // file lines never carry color escapes
    assert!(lines.iter().all(|line| !line.contains('\x1b')));
}

#[test]
fn test_unknown_level_falls_back_to_info() {
    let (backend, capture) = capturing_backend();
    backend.reconfigure("", "DEBUG").unwrap();

    backend.reconfigure("", "BOGUS").unwrap();
    assert_eq!(backend.current_level(), Level::Info);
    assert_eq!(backend.generation(), 3);

    backend.debug("dropped");
    backend.info("kept");
    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with(" - kept"));
}

#[test]
fn test_failed_open_keeps_previous_state() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let path = dir.path().join("app.log");
    let missing = dir.path().join("missing").join("app.log");
    let (backend, _) = capturing_backend();

    backend
        .reconfigure(path.to_str().unwrap(), "ERROR")
        .unwrap();
    let before = backend.state();

    let err = backend
        .reconfigure(missing.to_str().unwrap(), "DEBUG")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);

    let after = backend.state();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(backend.current_level(), Level::Error);
    assert_eq!(backend.generation(), 2);
    assert_eq!(backend.open_files(), 1);

    backend.error("still here");
    assert_eq!(read_lines(&path).len(), 1);
}

#[test]
fn test_reconfigure_with_audit_layout() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let path = dir.path().join("audit.log");
    let (backend, _) = capturing_backend();

    backend
        .reconfigure_with_layout(path.to_str().unwrap(), "info", AuditLayout::default())
        .unwrap();
    backend.info("user alice logged in");

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 1);
    let (time, message) = lines[0].split_once(" - ").unwrap();
    assert_eq!(time.len(), "00:00:00.000".len());
    assert_eq!(message, "user alice logged in");
}

#[derive(Debug, Clone, Default)]
struct CollectingTrap(Arc<Mutex<Vec<String>>>);

impl Trap for CollectingTrap {
    fn trap(&self, err: &Error) {
        self.0.lock().unwrap().push(err.to_string());
    }
}

#[test]
fn test_shutdown_drops_file_writes_silently() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let path = dir.path().join("app.log");
    let trap = CollectingTrap::default();
    let backend = Backend::builder()
        .console(Console::Testing(Capture::default()))
        .trap(trap.clone())
        .build();

    backend
        .reconfigure(path.to_str().unwrap(), "INFO")
        .unwrap();
    backend.info("before shutdown");
    backend.shutdown();
    assert_eq!(backend.open_files(), 0);

    backend.info("after shutdown");
    assert_eq!(read_lines(&path).len(), 1);
    assert!(trap.0.lock().unwrap().is_empty());
}
