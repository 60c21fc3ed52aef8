#![allow(dead_code)]

use datestamp_renamer::{FileMover, FsMover, MoveError};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// What a scripted rename should do instead of touching the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scripted {
    Succeed,
    Lock,
    Deny,
    Vanish,
}

/// A `FileMover` that answers from a per-source script and records every call.
/// Sources without a script (or whose script ran out) go to the real filesystem.
#[derive(Default)]
pub struct ScriptedMover {
    scripts: Mutex<HashMap<PathBuf, VecDeque<Scripted>>>,
    calls: Mutex<Vec<(PathBuf, PathBuf)>>,
    on_rename: Mutex<Option<Box<dyn FnMut(&Path) + Send>>>,
}

impl ScriptedMover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, source: impl Into<PathBuf>, steps: &[Scripted]) {
        self.scripts
            .lock()
            .unwrap()
            .entry(source.into())
            .or_default()
            .extend(steps.iter().copied());
    }

    /// Run `hook` on every rename attempt before it is answered.
    pub fn on_rename(&self, hook: impl FnMut(&Path) + Send + 'static) {
        *self.on_rename.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, source: &Path) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(from, _)| from == source)
            .count()
    }
}

impl FileMover for ScriptedMover {
    fn rename_file(&self, from: &Path, to: &Path) -> Result<(), MoveError> {
        self.calls
            .lock()
            .unwrap()
            .push((from.to_path_buf(), to.to_path_buf()));

        if let Some(hook) = self.on_rename.lock().unwrap().as_mut() {
            hook(from);
        }

        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(from)
            .and_then(VecDeque::pop_front);

        match step {
            Some(Scripted::Succeed) => Ok(()),
            Some(Scripted::Lock) => Err(MoveError::ShareViolation),
            Some(Scripted::Deny) => Err(MoveError::AccessDenied),
            Some(Scripted::Vanish) => Err(MoveError::FileNotFound),
            None => FsMover.rename_file(from, to),
        }
    }
}

pub fn touch(path: &Path) {
    std::fs::write(path, b"png").unwrap();
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// In-memory log sink for asserting on what a piece of code logged.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .filter(|line| line.contains(level))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with logs from the current thread going to a fresh buffer.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, LogBuffer) {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs)
}

/// Poll `check` until it holds or `timeout` passes.
pub fn wait_until(timeout: std::time::Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = std::time::Instant::now() + timeout;
    while std::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(std::time::Duration::from_millis(20));
    }
    check()
}
