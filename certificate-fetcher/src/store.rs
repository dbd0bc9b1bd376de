//! Certificate Store
//!
//! Serial number to decrypted PEM text, shared by handle between the
//! injector (writer), the verifier and the recorder (readers). One run owns
//! one store; nothing survives the process.

use crate::error::{FetchError, Result};
use signed_http::CertificateSource;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Serial reserved before the first response is processed
pub const PLACEHOLDER_SERIAL: &str = "any";

/// Cloneable handle to one run's certificates
///
/// Clones share the same map. The pipeline is single-threaded, so the
/// handle is `Rc<RefCell<_>>` and borrows never outlive a method call.
#[derive(Clone)]
pub struct CertificateStore {
    inner: Rc<RefCell<BTreeMap<String, Option<String>>>>,
}

impl CertificateStore {
    /// A store holding only the placeholder entry
    pub fn new() -> Self {
        let mut certs = BTreeMap::new();
        certs.insert(PLACEHOLDER_SERIAL.to_string(), None);
        Self {
            inner: Rc::new(RefCell::new(certs)),
        }
    }

    /// Record decrypted PEM text for `serial`
    ///
    /// Returns `Ok(true)` for a new certificate and `Ok(false)` when the same
    /// content was already present. Different content for a loaded serial is
    /// a [`FetchError::StoreConflict`].
    pub fn insert(&self, serial: &str, pem: String) -> Result<bool> {
        let mut certs = self.inner.borrow_mut();
        match certs.get(serial) {
            Some(Some(existing)) if *existing == pem => Ok(false),
            Some(Some(_)) => Err(FetchError::StoreConflict(serial.to_string())),
            _ => {
                certs.insert(serial.to_string(), Some(pem));
                Ok(true)
            }
        }
    }

    /// PEM text for `serial`; `None` when unknown or only reserved
    pub fn get(&self, serial: &str) -> Option<String> {
        self.inner.borrow().get(serial).cloned().flatten()
    }

    pub fn contains(&self, serial: &str) -> bool {
        self.inner.borrow().contains_key(serial)
    }

    /// Number of entries, placeholder included
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Number of entries holding real certificate text
    pub fn loaded(&self) -> usize {
        self.inner.borrow().values().filter(|pem| pem.is_some()).count()
    }

    /// All serials in ascending order
    pub fn serials(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }
}

impl Default for CertificateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificateSource for CertificateStore {
    fn certificate(&self, serial: &str) -> Option<String> {
        self.get(serial)
    }
}

impl std::fmt::Debug for CertificateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateStore")
            .field("serials", &self.serials())
            .field("loaded", &self.loaded())
            .finish()
    }
}
