//! String-keyed store of arbitrary values shared by a scene's entities.
//!
//! Typical contents are scores, flags, or handles to entities other
//! entities need to reach. Values of any `Send + Sync` type can be stored;
//! callers keep the type used for each key consistent themselves.

use std::any::{Any, type_name};

use rustc_hash::FxHashMap;

#[derive(Default)]
pub struct ResourceMap {
    values: FxHashMap<String, Box<dyn Any + Send + Sync>>,
}

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    /// Clone the value stored under `key`.
    ///
    /// # Panics
    ///
    /// When the stored value is not a `T`. Reading a key with a different
    /// type than it was stored with is a caller contract violation.
    pub fn get<T: Any + Clone>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        match value.downcast_ref::<T>() {
            Some(v) => Some(v.clone()),
            None => panic!(
                "caller contract violation: resource '{key}' is not a {}",
                type_name::<T>()
            ),
        }
    }

    /// Borrow the value under `key` if it exists and is a `T`.
    pub fn try_get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key)?.downcast_ref::<T>()
    }

    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key)?.downcast_mut::<T>()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns whether a value was stored under `key`.
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for ResourceMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_and_overwrite() {
        let mut res = ResourceMap::new();
        res.set("score", 3_u32);
        assert_eq!(res.get::<u32>("score"), Some(3));
        res.set("score", 4_u32);
        assert_eq!(res.get::<u32>("score"), Some(4));
        assert_eq!(res.len(), 1);
    }

    #[test]
    fn test_absent_is_none() {
        let res = ResourceMap::new();
        assert_eq!(res.get::<u32>("missing"), None);
        assert!(res.try_get::<u32>("missing").is_none());
    }

    #[test]
    #[should_panic(expected = "caller contract violation")]
    fn test_wrong_type_panics() {
        let mut res = ResourceMap::new();
        res.set("name", String::from("pong"));
        let _ = res.get::<u32>("name");
    }

    #[test]
    fn test_try_get_wrong_type_is_none() {
        let mut res = ResourceMap::new();
        res.set("name", String::from("pong"));
        assert!(res.try_get::<u32>("name").is_none());
        assert_eq!(res.try_get::<String>("name").map(String::as_str), Some("pong"));
    }

    #[test]
    fn test_get_mut_remove_clear() {
        let mut res = ResourceMap::new();
        res.set("hits", vec![1, 2]);
        res.get_mut::<Vec<i32>>("hits").unwrap().push(3);
        assert_eq!(res.get::<Vec<i32>>("hits"), Some(vec![1, 2, 3]));
        assert!(res.remove("hits"));
        assert!(!res.remove("hits"));
        res.set("a", 1_i32);
        res.clear();
        assert!(res.is_empty());
    }
}
