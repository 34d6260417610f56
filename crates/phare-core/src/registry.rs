//! Ordered, process-wide collection of class loaders consulted on every
//! lookup, plus the hook protocol that ties it into a host runtime.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, RwLock};

use crate::loader::ClassLoader;

/// The host runtime's side of autoloading. `install`/`uninstall` wire
/// the registry into the host's symbol-resolution chain; `load`
/// performs the actual include step for a resolved file.
pub trait LoadHook: Send + Sync {
    /// Called when the registry gains its first loader.
    fn install(&self);
    /// Called when the registry loses its last loader.
    fn uninstall(&self);
    /// Includes the file; returns whether the load succeeded.
    fn load(&self, path: &Path) -> bool;
}

/// Insertion-ordered registry of loader instances. Membership is by
/// identity: registering the same instance twice is a no-op, on the
/// list and on the hook.
pub struct LoaderRegistry {
    loaders: Vec<Arc<ClassLoader>>,
    hook: Option<Arc<dyn LoadHook>>,
    hook_installed: bool,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self { loaders: Vec::new(), hook: None, hook_installed: false }
    }

    pub fn with_hook(hook: Arc<dyn LoadHook>) -> Self {
        Self { hook: Some(hook), ..Self::new() }
    }

    /// Set the hook before registering loaders; installation happens on
    /// the first registration.
    pub fn set_hook(&mut self, hook: Arc<dyn LoadHook>) {
        self.hook = Some(hook);
    }

    pub fn register(&mut self, loader: &Arc<ClassLoader>) {
        if !self.hook_installed {
            if let Some(hook) = &self.hook {
                hook.install();
                self.hook_installed = true;
            }
        }
        if !self.loaders.iter().any(|known| Arc::ptr_eq(known, loader)) {
            self.loaders.push(Arc::clone(loader));
        }
    }

    /// Removing an instance that was never registered is a no-op.
    pub fn unregister(&mut self, loader: &Arc<ClassLoader>) {
        if let Some(idx) = self.loaders.iter().position(|known| Arc::ptr_eq(known, loader)) {
            self.loaders.remove(idx);
        }
        if self.loaders.is_empty() && self.hook_installed {
            if let Some(hook) = &self.hook {
                hook.uninstall();
            }
            self.hook_installed = false;
        }
    }

    /// Pure query: loaders in registration order, first existing file
    /// wins. Leading separators on the queried name are ignored.
    pub fn find_file(&self, class: &str) -> Option<PathBuf> {
        let class = class.trim_start_matches('\\');
        self.loaders.iter().find_map(|loader| loader.find_file(class))
    }

    /// Resolves and includes. `false` signals a local miss so later
    /// members of the host's resolution chain get a chance.
    pub fn load_class(&self, class: &str) -> bool {
        match self.find_file(class) {
            Some(path) => match &self.hook {
                Some(hook) => hook.load(&path),
                None => true,
            },
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    pub fn hook_installed(&self) -> bool {
        self.hook_installed
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Process-wide registry ───────────────────────────────────────────────────

// Read-mostly after start-up: registration and unregistration are the
// only writers, resolution is a pure read.
static REGISTRY: LazyLock<RwLock<LoaderRegistry>> =
    LazyLock::new(|| RwLock::new(LoaderRegistry::new()));

pub fn set_hook(hook: Arc<dyn LoadHook>) {
    REGISTRY.write().unwrap().set_hook(hook);
}

pub fn register(loader: &Arc<ClassLoader>) {
    REGISTRY.write().unwrap().register(loader);
}

pub fn unregister(loader: &Arc<ClassLoader>) {
    REGISTRY.write().unwrap().unregister(loader);
}

pub fn find_file(class: &str) -> Option<PathBuf> {
    REGISTRY.read().unwrap().find_file(class)
}

pub fn load_class(class: &str) -> bool {
    REGISTRY.read().unwrap().load_class(class)
}
