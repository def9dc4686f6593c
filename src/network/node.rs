use crate::error::{LedgerError, Result};
use log::info;
use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock};

/// The set of peers this node knows about. Registration is idempotent and
/// peers are never evicted.
pub struct NodeRegistry {
    inner: RwLock<BTreeSet<String>>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistry {
    pub fn new() -> NodeRegistry {
        NodeRegistry {
            inner: RwLock::new(BTreeSet::new()),
        }
    }

    // "http://a:1/" and " http://a:1" name the same peer
    fn normalize(addr: &str) -> Result<String> {
        let addr = addr.trim().trim_end_matches('/');
        if addr.is_empty() {
            return Err(LedgerError::InvalidRequest(
                "Peer address must not be empty".to_string(),
            ));
        }
        Ok(addr.to_string())
    }

    /// Add a peer. Returns whether it was new.
    pub fn register(&self, addr: &str) -> Result<bool> {
        let addr = Self::normalize(addr)?;
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let added = inner.insert(addr.clone());
        if added {
            info!("Registered peer {addr}");
        }
        Ok(added)
    }

    /// Add a batch of peers under one write lock. Every address is checked
    /// first, so a bad entry leaves the registry untouched. Returns how many
    /// were new.
    pub fn register_all<S: AsRef<str>>(&self, addrs: &[S]) -> Result<usize> {
        let addrs = addrs
            .iter()
            .map(|addr| Self::normalize(addr.as_ref()))
            .collect::<Result<Vec<String>>>()?;

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let mut added = 0;
        for addr in addrs {
            if inner.insert(addr.clone()) {
                info!("Registered peer {addr}");
                added += 1;
            }
        }
        Ok(added)
    }

    /// Snapshot of the known peers, sorted
    pub fn list(&self) -> Vec<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    pub fn contains(&self, addr: &str) -> bool {
        match Self::normalize(addr) {
            Ok(addr) => self
                .inner
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .contains(&addr),
            Err(_) => false,
        }
    }
}
