//! Request parameters and method signatures

use std::collections::BTreeMap;

/// Parameters that never take part in the method signature
const UNSIGNED_KEYS: [&str; 3] = ["format", "callback", "api_sig"];

/// Parameters of a single API call, kept sorted by key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    inner: BTreeMap<String, String>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.inner.insert(key.into(), value.into());
        self
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.inner.remove(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Compute `api_sig`: md5 of every `key + value` in key order, then the secret
    pub fn signature(&self, secret: &str) -> String {
        let mut base = String::new();
        for (key, value) in self.iter() {
            if UNSIGNED_KEYS.contains(&key) {
                continue;
            }
            base.push_str(key);
            base.push_str(value);
        }
        base.push_str(secret);

        format!("{:x}", md5::compute(base.as_bytes()))
    }

    /// Add `api_sig` for the current parameter set
    pub fn sign(&mut self, secret: &str) {
        let signature = self.signature(secret);
        self.insert("api_sig", signature);
    }
}

impl<K, V> Extend<(K, V)> for RequestParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}
