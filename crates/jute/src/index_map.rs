//! Insertion-ordered object map with duplicate-key detection.
//!
//! Object members keep their document order in a `SmallVec`; a hashed index
//! over the keys is only built once the map grows past the point where
//! linear probing stops being the faster option. `try_insert` reports
//! whether the key was already present, which is what drives the
//! `end_object -> false` duplicate handshake.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::slice::Iter as SliceIter;

use ahash::AHashMap;
use smallvec::SmallVec;

// below this size scanning the vec beats hashing the key
const LINEAR_SCAN_MAX: usize = 8;

#[derive(Clone, Default)]
pub struct JsonMap<K, V> {
    vec: SmallVec<[(K, V); 8]>,
    index: Option<AHashMap<K, usize>>,
}

impl<K, V> fmt::Debug for JsonMap<K, V>
where
    K: Clone + fmt::Debug + Eq + Hash,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter().map(|(k, v)| (k, v))).finish()
    }
}

impl<K, V> JsonMap<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            vec: SmallVec::new(),
            index: None,
        }
    }

    /// Append `key -> value`, keeping insertion order.
    ///
    /// Returns false (and drops the value) if the key is already present.
    pub fn try_insert(&mut self, key: K, value: V) -> bool {
        if let Some(index) = &mut self.index {
            if index.contains_key(&key) {
                return false;
            }
            index.insert(key.clone(), self.vec.len());
            self.vec.push((key, value));
            return true;
        }
        if self.vec.iter().any(|(k, _)| *k == key) {
            return false;
        }
        self.vec.push((key, value));
        if self.vec.len() > LINEAR_SCAN_MAX {
            self.index = Some(
                self.vec
                    .iter()
                    .enumerate()
                    .map(|(i, (k, _))| (k.clone(), i))
                    .collect(),
            );
        }
        true
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        if let Some(index) = &self.index {
            index.get(key).map(|&i| &self.vec[i].1)
        } else {
            self.vec
                .iter()
                .find(|(k, _)| k.borrow() == key)
                .map(|(_, v)| v)
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.vec.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> SliceIter<'_, (K, V)> {
        self.vec.iter()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for JsonMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.vec == other.vec
    }
}

impl<'a, K, V> IntoIterator for &'a JsonMap<K, V> {
    type Item = &'a (K, V);
    type IntoIter = SliceIter<'a, (K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.vec.iter()
    }
}
