use log::debug;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Identifies the handle that performed a write
pub type Origin = u64;

const EVENT_CAPACITY: usize = 64;

/// Published after every write to a storage slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub origin: Origin,
}

/// Durable string slots addressed by key.
///
/// Writers tag each write with their [`Origin`] so that listeners can tell
/// their own writes apart from writes made by another handle.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> io::Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str, origin: Origin) -> io::Result<()>;

    fn remove_item(&self, key: &str, origin: Origin) -> io::Result<()>;

    /// Register for change notifications; drop the receiver to deregister
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}

struct ChangeNotifier {
    sender: broadcast::Sender<StorageEvent>,
}

impl ChangeNotifier {
    fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    fn notify(&self, key: &str, origin: Origin) {
        // No receivers is not an error
        let _ = self.sender.send(StorageEvent {
            key: key.to_string(),
            origin,
        });
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.sender.subscribe()
    }
}

/// Storage kept in memory for the lifetime of the process
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    notifier: ChangeNotifier,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            notifier: ChangeNotifier::new(),
        }
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory storage lock poisoned"))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str, origin: Origin) -> io::Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        self.notifier.notify(key, origin);
        Ok(())
    }

    fn remove_item(&self, key: &str, origin: Origin) -> io::Result<()> {
        self.lock()?.remove(key);
        self.notifier.notify(key, origin);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.notifier.subscribe()
    }
}

/// Storage with one file per key inside a data directory
pub struct FileStorage {
    dir: PathBuf,
    notifier: ChangeNotifier,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            notifier: ChangeNotifier::new(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set_item(&self, key: &str, value: &str, origin: Origin) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Write then rename so readers never see a half-written slot
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        self.notifier.notify(key, origin);
        Ok(())
    }

    fn remove_item(&self, key: &str, origin: Origin) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        self.notifier.notify(key, origin);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.notifier.subscribe()
    }
}
