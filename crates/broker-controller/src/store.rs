//! Instance store
//!
//! The only mutable state shared between request threads. A single
//! reader/writer lock guards the whole map: any number of lookups may run
//! together, a write excludes every reader and writer.

use crate::error::{BrokerError, Result};
use broker_types::{Credential, InstanceId, ServiceInstance};
use std::collections::HashMap;
use std::sync::RwLock;

/// Concurrency-safe map from instance id to instance record
#[derive(Debug, Default)]
pub struct InstanceStore {
    instances: RwLock<HashMap<InstanceId, ServiceInstance>>,
}

impl InstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an instance record; a miss is `NoSuchInstance`
    pub fn get(&self, id: &InstanceId) -> Result<ServiceInstance> {
        let instances = self.instances.read().map_err(|_| BrokerError::Lock)?;
        instances
            .get(id)
            .cloned()
            .ok_or_else(|| BrokerError::NoSuchInstance(id.clone()))
    }

    /// Credential stored for an instance
    pub fn credential(&self, id: &InstanceId) -> Result<Credential> {
        let instances = self.instances.read().map_err(|_| BrokerError::Lock)?;
        instances
            .get(id)
            .map(|i| i.credential.clone())
            .ok_or_else(|| BrokerError::NoSuchInstance(id.clone()))
    }

    /// Insert or replace a record, returning the previous one
    pub fn put(&self, instance: ServiceInstance) -> Result<Option<ServiceInstance>> {
        let mut instances = self.instances.write().map_err(|_| BrokerError::Lock)?;
        Ok(instances.insert(instance.id.clone(), instance))
    }

    /// Remove a record, returning it if it existed
    pub fn delete(&self, id: &InstanceId) -> Result<Option<ServiceInstance>> {
        let mut instances = self.instances.write().map_err(|_| BrokerError::Lock)?;
        Ok(instances.remove(id))
    }

    pub fn contains(&self, id: &InstanceId) -> Result<bool> {
        let instances = self.instances.read().map_err(|_| BrokerError::Lock)?;
        Ok(instances.contains_key(id))
    }

    pub fn len(&self) -> Result<usize> {
        let instances = self.instances.read().map_err(|_| BrokerError::Lock)?;
        Ok(instances.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|n| n == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, token: &str) -> ServiceInstance {
        ServiceInstance::new(
            InstanceId::new(id),
            "fuse",
            Credential::new().with("token", token),
        )
    }

    #[test]
    fn test_put_get_delete() {
        let store = InstanceStore::new();
        assert!(store.is_empty().unwrap());

        assert!(store.put(record("i-1", "t1")).unwrap().is_none());
        let fetched = store.get(&InstanceId::new("i-1")).unwrap();
        assert_eq!(fetched.name, "fuse");
        assert!(store.contains(&InstanceId::new("i-1")).unwrap());

        let previous = store.put(record("i-1", "t2")).unwrap().unwrap();
        assert_eq!(previous.credential.get("token").unwrap(), "t1");
        assert_eq!(store.len().unwrap(), 1);

        assert!(store.delete(&InstanceId::new("i-1")).unwrap().is_some());
        assert!(store.delete(&InstanceId::new("i-1")).unwrap().is_none());
    }

    #[test]
    fn test_miss_is_no_such_instance() {
        let store = InstanceStore::new();
        let err = store.credential(&InstanceId::new("ghost")).unwrap_err();
        assert!(matches!(err, BrokerError::NoSuchInstance(id) if id.as_str() == "ghost"));
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = std::sync::Arc::new(InstanceStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.instances.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(
            store.get(&InstanceId::new("i-1")),
            Err(BrokerError::Lock)
        ));
    }
}
