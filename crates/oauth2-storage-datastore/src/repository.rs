use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

use oauth2_ports::{DynDatastore, Key};

use crate::codec::{decode, encode};
use crate::StoreError;

/// A record stored as one entity of a fixed kind, named by one of its fields.
///
/// The naming field is not written as a property; [`Repository::get`] copies
/// the requested name back onto the decoded record.
pub(crate) trait NamedEntity: Serialize + DeserializeOwned + Send + Sync {
    const KIND: &'static str;

    fn key_name(&self) -> &str;

    fn set_key_name(&mut self, name: String);
}

/// Point put/get/delete for one entity kind.
pub(crate) struct Repository<E> {
    datastore: DynDatastore,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            datastore: self.datastore.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: NamedEntity> Repository<E> {
    pub(crate) fn new(datastore: DynDatastore) -> Self {
        Self {
            datastore,
            _entity: PhantomData,
        }
    }

    pub(crate) fn key(name: &str) -> Key {
        Key::name_key(E::KIND, name)
    }

    pub(crate) async fn put(&self, record: &E) -> Result<(), StoreError> {
        let key = Self::key(record.key_name());
        let entity = encode(record)?;
        self.datastore.put(&key, entity).await?;
        Ok(())
    }

    pub(crate) async fn put_multi(&self, records: &[E]) -> Result<(), StoreError> {
        let keys: Vec<Key> = records.iter().map(|r| Self::key(r.key_name())).collect();
        let entities = records.iter().map(encode).collect::<Result<Vec<_>, _>>()?;
        self.datastore.put_multi(&keys, entities).await?;
        Ok(())
    }

    pub(crate) async fn get(&self, name: &str) -> Result<E, StoreError> {
        let entity = self.datastore.get(&Self::key(name)).await?;
        let mut record: E = decode(entity)?;
        record.set_key_name(name.to_string());
        Ok(record)
    }

    pub(crate) async fn get_multi(&self, names: &[&str]) -> Result<Vec<E>, StoreError> {
        let keys: Vec<Key> = names.iter().map(|name| Self::key(name)).collect();
        let entities = self.datastore.get_multi(&keys).await?;

        let mut records = Vec::with_capacity(entities.len());
        for (entity, name) in entities.into_iter().zip(names) {
            let mut record: E = decode(entity)?;
            record.set_key_name(name.to_string());
            records.push(record);
        }
        Ok(records)
    }

    pub(crate) async fn delete(&self, name: &str) -> Result<(), StoreError> {
        self.datastore.delete(&Self::key(name)).await?;
        Ok(())
    }

    pub(crate) async fn delete_multi(&self, names: &[&str]) -> Result<(), StoreError> {
        let keys: Vec<Key> = names.iter().map(|name| Self::key(name)).collect();
        self.datastore.delete_multi(&keys).await?;
        Ok(())
    }
}
