//! In-process document collections.
//!
//! Each entity lives in its own [`Collection`], mirroring one collection per
//! document type. Callers query with explicit parameters at their own store
//! boundary; the collection itself only offers predicate-level access plus an
//! atomic admit-and-insert used to serialize contended writes.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document rejected by admission check")]
    Rejected,
}

/// A concurrent, insertion-ordered document collection.
#[derive(Debug)]
pub struct Collection<T> {
    docs: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            docs: Arc::clone(&self.docs),
        }
    }
}

impl<T: Clone + Send + Sync> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync> Collection<T> {
    pub fn new() -> Self {
        Self {
            docs: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn insert(&self, doc: T) {
        self.docs.write().await.push(doc);
    }

    /// Insert `doc` only if `admit` approves it against the current contents.
    /// The write lock is held across the check and the insert, so two racing
    /// inserts for the same resource cannot both be admitted.
    pub async fn insert_if<F>(&self, doc: T, admit: F) -> Result<T, StoreError>
    where
        F: FnOnce(&[T]) -> bool,
    {
        let mut docs = self.docs.write().await;
        if !admit(&docs) {
            debug!("Insert rejected by admission check");
            return Err(StoreError::Rejected);
        }
        docs.push(doc.clone());
        Ok(doc)
    }

    pub async fn find_one<P>(&self, pred: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.docs.read().await.iter().find(|doc| pred(doc)).cloned()
    }

    pub async fn filter<P>(&self, pred: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.docs
            .read()
            .await
            .iter()
            .filter(|doc| pred(doc))
            .cloned()
            .collect()
    }

    pub async fn all(&self) -> Vec<T> {
        self.docs.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.docs.read().await.len()
    }

    /// Apply `mutate` to the first matching document, returning the updated
    /// copy. The write lock covers the lookup and the mutation.
    pub async fn update_one<P, M>(&self, pred: P, mutate: M) -> Option<T>
    where
        P: Fn(&T) -> bool,
        M: FnOnce(&mut T),
    {
        let mut docs = self.docs.write().await;
        let doc = docs.iter_mut().find(|doc| pred(doc))?;
        mutate(doc);
        Some(doc.clone())
    }

    /// Remove the first matching document if `allow` approves it. The write
    /// lock covers the check and the removal.
    pub async fn remove_one_if<P, F>(&self, pred: P, allow: F) -> Result<Option<T>, StoreError>
    where
        P: Fn(&T) -> bool,
        F: FnOnce(&T) -> bool,
    {
        let mut docs = self.docs.write().await;
        let Some(idx) = docs.iter().position(|doc| pred(doc)) else {
            return Ok(None);
        };
        if !allow(&docs[idx]) {
            return Err(StoreError::Rejected);
        }
        Ok(Some(docs.remove(idx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn insert_if_admits_only_the_first_of_a_race() {
        let coll: Collection<u32> = Collection::new();
        let mut handles = Vec::new();
        for n in 0..8u32 {
            let coll = coll.clone();
            handles.push(tokio::spawn(async move {
                coll.insert_if(n, |docs| docs.is_empty()).await
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(coll.count().await, 1);
    }

    #[tokio::test]
    async fn update_one_only_touches_first_match() {
        let coll = Collection::new();
        coll.insert(1u32).await;
        coll.insert(1u32).await;
        let updated = coll.update_one(|d| *d == 1, |d| *d = 9).await;
        assert_eq!(updated, Some(9));
        assert_eq!(coll.filter(|d| *d == 1).await.len(), 1);
    }

    #[tokio::test]
    async fn remove_one_if_respects_the_guard() {
        let coll = Collection::new();
        coll.insert(5u32).await;
        let res = coll.remove_one_if(|d| *d == 5, |_| false).await;
        assert_matches!(res, Err(StoreError::Rejected));
        assert_eq!(coll.count().await, 1);

        let res = coll.remove_one_if(|d| *d == 5, |_| true).await;
        assert_matches!(res, Ok(Some(5)));
        assert_eq!(coll.count().await, 0);
    }
}
