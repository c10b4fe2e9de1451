use crate::store::model::{
    Component, EssenceDescriptor, Locator, MobId, MobKind, MobSlotRef, SlotSpec,
};

/// Object-model contract of the interchange container.
///
/// The graph builder only creates and links entities through this trait and never inspects
/// container internals. Nothing is durable until [`MobStore::commit`] returns; a failed build
/// never commits.
pub trait MobStore {
    /// Create an empty master mob.
    fn create_master(&mut self, name: &str) -> anyhow::Result<MobId>;
    /// Create an empty source mob.
    fn create_source(&mut self, name: &str) -> anyhow::Result<MobId>;
    /// Create an external-file locator.
    fn create_locator(&mut self, url: &str) -> anyhow::Result<Locator> {
        Ok(Locator::network(url))
    }
    /// Attach the essence descriptor of a source mob.
    fn set_essence_descriptor(
        &mut self,
        source: MobId,
        descriptor: EssenceDescriptor,
    ) -> anyhow::Result<()>;
    /// Create an empty composition mob.
    fn create_composition(&mut self, name: &str) -> anyhow::Result<MobId>;
    /// Add a timeline slot with an empty sequence to `mob`.
    fn create_timeline_slot(&mut self, mob: MobId, spec: SlotSpec) -> anyhow::Result<MobSlotRef>;
    /// Append a component to a slot's sequence.
    fn append_component(&mut self, slot: MobSlotRef, component: Component) -> anyhow::Result<()>;
    /// First mob of `kind` named `name`, if the container holds one.
    fn find_mob(&self, kind: MobKind, name: &str) -> Option<MobId>;
    /// Composition mobs currently in the container.
    fn compositions(&self) -> Vec<MobId>;
    /// Delete a mob.
    fn remove_mob(&mut self, mob: MobId) -> anyhow::Result<()>;
    /// Persist the container and return its size in bytes.
    fn commit(&mut self) -> anyhow::Result<u64>;
}
