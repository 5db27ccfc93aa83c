//! Process-wide cache of compiled machine types.

use crate::builder::{BuildError, MachineTypeBuilder};
use crate::runtime::{Machine, MachineType};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

type Cache = Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>;

static MACHINE_TYPES: OnceLock<Cache> = OnceLock::new();

fn cache() -> &'static Cache {
    MACHINE_TYPES.get_or_init(Default::default)
}

fn cached<M: Machine>() -> Option<Arc<MachineType<M>>> {
    let guard = cache().lock().unwrap_or_else(PoisonError::into_inner);
    guard
        .get(&TypeId::of::<M>())
        .cloned()
        .and_then(|entry| entry.downcast::<MachineType<M>>().ok())
}

/// Compiled type for `M`, building and caching it on first use.
///
/// The type is built outside the lock; when two threads race, the first
/// insert wins and both receive it. Failed builds are never cached.
pub fn machine_type<M: Machine>() -> Result<Arc<MachineType<M>>, BuildError> {
    if let Some(found) = cached::<M>() {
        return Ok(found);
    }

    let builder = M::define(MachineTypeBuilder::new().config(M::config()));
    let built = Arc::new(builder.build()?);

    let mut guard = cache().lock().unwrap_or_else(PoisonError::into_inner);
    let entry = guard
        .entry(TypeId::of::<M>())
        .or_insert_with(|| built.clone() as Arc<dyn Any + Send + Sync>)
        .clone();
    drop(guard);

    tracing::info!(machine = %built.name(), "cached machine type");
    Ok(entry.downcast::<MachineType<M>>().unwrap_or(built))
}

/// Whether `M` has already been compiled in this process.
pub fn is_cached<M: Machine>() -> bool {
    cached::<M>().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Cached {
        value: u8,
    }

    impl Machine for Cached {
        fn define(builder: MachineTypeBuilder<Self>) -> MachineTypeBuilder<Self> {
            builder
                .state("Bump", "")
                .state("BumpComplete", "0")
                .action("Bump", |c: &mut Cached| c.value += 1)
        }
    }

    struct Broken;

    impl Machine for Broken {
        fn define(builder: MachineTypeBuilder<Self>) -> MachineTypeBuilder<Self> {
            builder.state("Orphaned", "").state("Finished", "0")
        }
    }

    #[test]
    fn second_lookup_returns_same_type() {
        let first = machine_type::<Cached>().unwrap();
        let second = machine_type::<Cached>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(is_cached::<Cached>());
        assert_eq!(first.name(), "Cached");
    }

    #[test]
    fn failed_builds_are_not_cached() {
        let err = machine_type::<Broken>().unwrap_err();

        assert_eq!(err.problems().len(), 2);
        assert!(!is_cached::<Broken>());
        assert!(machine_type::<Broken>().is_err());
    }
}
