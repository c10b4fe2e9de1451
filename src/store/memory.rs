use anyhow::{Context as _, anyhow, bail};

use crate::store::{
    backend::MobStore,
    model::{Component, EssenceDescriptor, Mob, MobId, MobKind, MobSlotRef, SlotSpec},
};

/// Format tag written at the top of every container snapshot.
pub const CONTAINER_FORMAT: &str = "mobweave-container";
/// Snapshot schema version.
pub const CONTAINER_VERSION: u32 = 1;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Serializable image of a container.
pub struct ContainerSnapshot {
    /// Always [`CONTAINER_FORMAT`].
    pub format: String,
    /// Schema version.
    pub version: u32,
    /// Mobs in creation order.
    pub mobs: Vec<Mob>,
}

/// In-memory store for tests, dry runs and as the body of file-backed containers.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    mobs: Vec<Mob>,
    calls: usize,
    committed_bytes: Option<u64>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot.
    pub fn from_snapshot(snapshot: ContainerSnapshot) -> anyhow::Result<Self> {
        if snapshot.format != CONTAINER_FORMAT {
            bail!("unexpected container format '{}'", snapshot.format);
        }
        if snapshot.version != CONTAINER_VERSION {
            bail!("unsupported container version {}", snapshot.version);
        }
        Ok(Self {
            mobs: snapshot.mobs,
            calls: 0,
            committed_bytes: None,
        })
    }

    /// Copy the current state into a snapshot.
    pub fn snapshot(&self) -> ContainerSnapshot {
        ContainerSnapshot {
            format: CONTAINER_FORMAT.to_string(),
            version: CONTAINER_VERSION,
            mobs: self.mobs.clone(),
        }
    }

    /// Pretty JSON encoding of the snapshot.
    pub fn to_json_bytes(&self) -> anyhow::Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.snapshot()).context("serialize container snapshot")
    }

    /// All mobs in creation order.
    pub fn mobs(&self) -> &[Mob] {
        &self.mobs
    }

    /// Mobs of one role.
    pub fn mobs_of_kind(&self, kind: MobKind) -> impl Iterator<Item = &Mob> {
        self.mobs.iter().filter(move |m| m.kind == kind)
    }

    /// Lookup by handle.
    pub fn mob(&self, id: MobId) -> Option<&Mob> {
        self.mobs.iter().find(|m| m.id == id)
    }

    /// Number of mutating calls issued against this store.
    pub fn call_count(&self) -> usize {
        self.calls
    }

    /// Byte size reported by the last commit.
    pub fn committed_bytes(&self) -> Option<u64> {
        self.committed_bytes
    }

    fn mob_mut(&mut self, id: MobId) -> anyhow::Result<&mut Mob> {
        self.mobs
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| anyhow!("unknown mob {id}"))
    }

    fn push_mob(&mut self, kind: MobKind, name: &str) -> MobId {
        self.calls += 1;
        let id = MobId::generate();
        self.mobs.push(Mob {
            id,
            kind,
            name: name.to_string(),
            slots: Vec::new(),
            descriptor: None,
        });
        id
    }
}

impl MobStore for MemoryStore {
    fn create_master(&mut self, name: &str) -> anyhow::Result<MobId> {
        Ok(self.push_mob(MobKind::Master, name))
    }

    fn create_source(&mut self, name: &str) -> anyhow::Result<MobId> {
        Ok(self.push_mob(MobKind::Source, name))
    }

    fn set_essence_descriptor(
        &mut self,
        source: MobId,
        descriptor: EssenceDescriptor,
    ) -> anyhow::Result<()> {
        self.calls += 1;
        let mob = self.mob_mut(source)?;
        if mob.kind != MobKind::Source {
            bail!("essence descriptors belong on source mobs, {source} is {:?}", mob.kind);
        }
        mob.descriptor = Some(descriptor);
        Ok(())
    }

    fn create_composition(&mut self, name: &str) -> anyhow::Result<MobId> {
        Ok(self.push_mob(MobKind::Composition, name))
    }

    fn create_timeline_slot(&mut self, mob: MobId, spec: SlotSpec) -> anyhow::Result<MobSlotRef> {
        self.calls += 1;
        let owner = self.mob_mut(mob)?;
        if owner.slot(spec.slot_id).is_some() {
            bail!("mob {mob} already has slot {}", spec.slot_id);
        }
        let slot = spec.slot_id;
        owner.slots.push(spec.into());
        Ok(MobSlotRef { mob, slot })
    }

    fn append_component(&mut self, slot: MobSlotRef, component: Component) -> anyhow::Result<()> {
        self.calls += 1;
        let owner = self.mob_mut(slot.mob)?;
        let target = owner
            .slots
            .iter_mut()
            .find(|s| s.slot_id == slot.slot)
            .ok_or_else(|| anyhow!("mob {} has no slot {}", slot.mob, slot.slot))?;
        if target.media_kind != component.media_kind() {
            bail!(
                "{} component on {} slot {} of mob {}",
                component.media_kind(),
                target.media_kind,
                slot.slot,
                slot.mob
            );
        }
        target.components.push(component);
        Ok(())
    }

    fn find_mob(&self, kind: MobKind, name: &str) -> Option<MobId> {
        self.mobs_of_kind(kind).find(|m| m.name == name).map(|m| m.id)
    }

    fn compositions(&self) -> Vec<MobId> {
        self.mobs_of_kind(MobKind::Composition).map(|m| m.id).collect()
    }

    fn remove_mob(&mut self, mob: MobId) -> anyhow::Result<()> {
        self.calls += 1;
        let before = self.mobs.len();
        self.mobs.retain(|m| m.id != mob);
        if self.mobs.len() == before {
            bail!("unknown mob {mob}");
        }
        Ok(())
    }

    fn commit(&mut self) -> anyhow::Result<u64> {
        self.calls += 1;
        let bytes = self.to_json_bytes()?.len() as u64;
        self.committed_bytes = Some(bytes);
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/memory.rs"]
mod tests;
