//! Reuse of finished machine instances.

use crate::builder::BuildError;
use crate::runtime::{Machine, MachineInstance, MachineType, RuntimeError};
use std::sync::Arc;

/// Free list of parked instances for sequential reuse.
///
/// An instance is parked when it has reached a terminal state. Releasing it
/// resets its data and rewinds it to the start state; the next `acquire`
/// hands it out again instead of allocating. Single owner, not shared.
pub struct InstancePool<D> {
    machine: Arc<MachineType<D>>,
    factory: Box<dyn Fn() -> D>,
    parked: Vec<MachineInstance<D>>,
    created: usize,
}

impl<M: Machine> InstancePool<M> {
    /// Pool over the cached machine type for `M`.
    pub fn for_machine<F>(factory: F) -> Result<Self, BuildError>
    where
        F: Fn() -> M + 'static,
    {
        Ok(Self::new(M::machine_type()?, factory))
    }
}

impl<D> InstancePool<D> {
    pub fn new<F>(machine: Arc<MachineType<D>>, factory: F) -> Self
    where
        F: Fn() -> D + 'static,
    {
        Self {
            machine,
            factory: Box::new(factory),
            parked: Vec::new(),
            created: 0,
        }
    }

    /// A ready instance at the start state, reused when one is parked.
    pub fn acquire(&mut self) -> MachineInstance<D> {
        match self.parked.pop() {
            Some(instance) => instance,
            None => {
                self.created += 1;
                tracing::debug!(
                    machine = %self.machine.name(),
                    created = self.created,
                    "allocating pooled instance"
                );
                MachineInstance::with_type(Arc::clone(&self.machine), (self.factory)())
            }
        }
    }

    /// Park a finished instance, resetting its data with `reset`.
    ///
    /// Instances that have not reached a terminal state, or that belong to a
    /// different machine type, are dropped and reported as `NotParked`.
    pub fn release<F>(
        &mut self,
        mut instance: MachineInstance<D>,
        reset: F,
    ) -> Result<(), RuntimeError>
    where
        F: FnOnce(&mut D),
    {
        if !instance.is_complete() || !Arc::ptr_eq(instance.machine(), &self.machine) {
            return Err(RuntimeError::NotParked {
                machine: instance.machine().name().to_string(),
                state: instance.state_name().to_string(),
            });
        }

        reset(instance.data_mut());
        instance.restart();
        self.parked.push(instance);
        Ok(())
    }

    /// Instances waiting to be reused.
    pub fn parked(&self) -> usize {
        self.parked.len()
    }

    /// Instances allocated over the life of the pool.
    pub fn created(&self) -> usize {
        self.created
    }
}
