use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::store::{
    backend::MobStore,
    memory::{ContainerSnapshot, MemoryStore},
    model::{Component, EssenceDescriptor, Locator, MobId, MobKind, MobSlotRef, SlotSpec},
};

/// File-backed container persisted as a JSON snapshot.
///
/// All edits stay in memory until [`MobStore::commit`], which rewrites the whole file.
#[derive(Debug)]
pub struct JsonContainer {
    path: PathBuf,
    store: MemoryStore,
}

impl JsonContainer {
    /// Start an empty container that will be written to `path`.
    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            store: MemoryStore::new(),
        }
    }

    /// Load an existing container for in-place editing.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let bytes =
            std::fs::read(&path).with_context(|| format!("read container '{}'", path.display()))?;
        let snapshot: ContainerSnapshot = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse container '{}'", path.display()))?;
        let store = MemoryStore::from_snapshot(snapshot)
            .with_context(|| format!("load container '{}'", path.display()))?;
        Ok(Self { path, store })
    }

    /// Open `path` when it exists, otherwise start empty.
    pub fn open_or_create(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        if path.exists() {
            Self::open(path)
        } else {
            Ok(Self::create(path))
        }
    }

    /// Output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// In-memory content.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

impl MobStore for JsonContainer {
    fn create_master(&mut self, name: &str) -> anyhow::Result<MobId> {
        self.store.create_master(name)
    }

    fn create_source(&mut self, name: &str) -> anyhow::Result<MobId> {
        self.store.create_source(name)
    }

    fn create_locator(&mut self, url: &str) -> anyhow::Result<Locator> {
        self.store.create_locator(url)
    }

    fn set_essence_descriptor(
        &mut self,
        source: MobId,
        descriptor: EssenceDescriptor,
    ) -> anyhow::Result<()> {
        self.store.set_essence_descriptor(source, descriptor)
    }

    fn create_composition(&mut self, name: &str) -> anyhow::Result<MobId> {
        self.store.create_composition(name)
    }

    fn create_timeline_slot(&mut self, mob: MobId, spec: SlotSpec) -> anyhow::Result<MobSlotRef> {
        self.store.create_timeline_slot(mob, spec)
    }

    fn append_component(&mut self, slot: MobSlotRef, component: Component) -> anyhow::Result<()> {
        self.store.append_component(slot, component)
    }

    fn find_mob(&self, kind: MobKind, name: &str) -> Option<MobId> {
        self.store.find_mob(kind, name)
    }

    fn compositions(&self) -> Vec<MobId> {
        self.store.compositions()
    }

    fn remove_mob(&mut self, mob: MobId) -> anyhow::Result<()> {
        self.store.remove_mob(mob)
    }

    fn commit(&mut self) -> anyhow::Result<u64> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let bytes = self.store.to_json_bytes()?;
        std::fs::write(&self.path, &bytes)
            .with_context(|| format!("write container '{}'", self.path.display()))?;
        let size = std::fs::metadata(&self.path)
            .with_context(|| format!("stat container '{}'", self.path.display()))?
            .len();
        tracing::info!(path = %self.path.display(), bytes = size, "container committed");
        Ok(size)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/json.rs"]
mod tests;
