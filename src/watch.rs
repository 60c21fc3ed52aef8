//! Live creation notifications, one `notify` watcher per watched directory.
//!
//! Watchers are created disabled by [`WatchSet::establish`] and only start
//! delivering once [`WatchSet::enable`] registers their directory, which the
//! service does after the startup sweep. Each backend runs its callback on its
//! own thread, so handlers for different directories run concurrently with each
//! other and with the retry sweep.
//!
//! A watcher that reports an error is logged and left as it is. That includes a
//! backend queue overflow, which `notify` reports as a rescan event rather than
//! an error. Nothing resubscribes the watcher; a restart does.

use crate::error::Error;
use crate::rename::{FileMover, RenameCandidate, RenameExecutor, RenameOutcome};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, trace};

struct DirectoryWatch {
    directory: PathBuf,
    watcher: RecommendedWatcher,
    enabled: bool,
}

/// Registry of live subscriptions, owned by the service for the process lifetime.
pub struct WatchSet {
    watches: Vec<DirectoryWatch>,
}

impl WatchSet {
    /// Create one watcher per directory without registering anything yet. A directory
    /// whose watcher can't be created is logged and left out.
    pub fn establish<F>(dirs: &[PathBuf], on_created: F) -> Self
    where
        F: Fn(&Path) + Send + Sync + 'static,
    {
        let on_created: Arc<dyn Fn(&Path) + Send + Sync> = Arc::new(on_created);
        let mut watches = Vec::with_capacity(dirs.len());

        for dir in dirs {
            match subscribe(dir, Arc::clone(&on_created)) {
                Ok(watch) => watches.push(watch),
                Err(err) => error!("Error creating watcher for {}: {}", dir.display(), err),
            }
        }

        Self { watches }
    }

    /// Start delivering events. Returns how many directories are now live.
    pub fn enable(&mut self) -> usize {
        for watch in self.watches.iter_mut().filter(|watch| !watch.enabled) {
            match watch
                .watcher
                .watch(&watch.directory, RecursiveMode::NonRecursive)
            {
                Ok(()) => {
                    info!("Watching {}", watch.directory.display());
                    watch.enabled = true;
                }
                Err(err) => error!("Error watching {}: {}", watch.directory.display(), err),
            }
        }
        self.active_count()
    }

    /// Unregister and drop every watcher.
    pub fn teardown(&mut self) {
        for mut watch in self.watches.drain(..) {
            if watch.enabled {
                if let Err(err) = watch.watcher.unwatch(&watch.directory) {
                    debug!("Error unwatching {}: {}", watch.directory.display(), err);
                }
            }
            debug!("Stopped watching {}", watch.directory.display());
        }
    }

    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.watches.iter().filter(|watch| watch.enabled).count()
    }
}

impl Drop for WatchSet {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn subscribe(
    dir: &Path,
    on_created: Arc<dyn Fn(&Path) + Send + Sync>,
) -> Result<DirectoryWatch, Error> {
    let directory = dir.to_path_buf();
    let watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            dispatch(&directory, res, &*on_created);
        },
        Config::default(),
    )?;

    Ok(DirectoryWatch {
        directory: dir.to_path_buf(),
        watcher,
        enabled: false,
    })
}

/// Forward the paths of a creation event to `on_created` and return how many went
/// through. Overflow and delivery errors are logged; everything else is ignored.
fn dispatch(directory: &Path, res: notify::Result<Event>, on_created: &dyn Fn(&Path)) -> usize {
    let event = match res {
        Ok(event) => event,
        Err(err) => {
            error!("Watch error for {}: {}", directory.display(), err);
            return 0;
        }
    };

    if event.need_rescan() {
        error!(
            "Watch error for {}: event queue overflowed, creation events were lost",
            directory.display()
        );
    }
    if !matches!(event.kind, EventKind::Create(_)) {
        return 0;
    }

    for path in &event.paths {
        on_created(path);
    }
    event.paths.len()
}

/// React to a created path: directories and odd names are ignored, files go through
/// the same path as sweep entries.
pub fn handle_created<M: FileMover>(
    executor: &RenameExecutor<M>,
    path: &Path,
) -> Option<RenameOutcome> {
    if !path.is_file() {
        trace!("Ignoring created non-file {}", path.display());
        return None;
    }
    let candidate = RenameCandidate::from_path(path)?;
    executor.process_candidate(&candidate)
}
