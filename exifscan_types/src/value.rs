//! The decoded value model shared by every decoder.
//!
//! Decoders don't keep the on-disk layout around. Instead, each one produces
//! a [`TagMap`] whose keys are humanized names (when a dictionary knows the
//! tag) or raw numeric IDs, and whose values are [`Value`]s.

use std::borrow::Cow;

/// One decoded value.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub enum Value {
    /// Any unsigned integer: `BYTE`, `SHORT`, `LONG`, and the `IFD` alias.
    Unsigned(u32),

    /// Any signed integer: `SBYTE`, `SSHORT`, `SLONG`.
    Signed(i32),

    /// Rationals (already divided) and IEEE floats.
    Float(f64),

    /// Text, including translated labels and revived dates.
    Text(String),

    /// Opaque bytes that weren't decoded any further.
    Bytes(Vec<u8>),

    /// An ordered list of values.
    List(Vec<Value>),
}

impl Value {
    /// Returns the value as a float, if it's any kind of number.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Unsigned(u) => Some(u as f64),
            Value::Signed(i) => Some(i as f64),
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the value as an unsigned integer, if it's one.
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Value::Unsigned(u) => Some(u),
            _ => None,
        }
    }

    /// Returns the contained text, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }

    /// Returns the contained list, if any.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l.as_slice()),
            _ => None,
        }
    }

    /// Grabs the raw bytes behind a byte-ish value.
    ///
    /// Opaque buffers return themselves. Lists of unsigned values that fit in
    /// a byte are also accepted, since some writers store byte strings as
    /// `BYTE` lists instead of `UNDEFINED`.
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Value::Bytes(b) => Some(b.clone()),
            Value::Unsigned(u) => u8::try_from(*u).ok().map(|b| vec![b]),
            Value::List(l) => l
                .iter()
                .map(|v| v.as_u32().and_then(|u| u8::try_from(u).ok()))
                .collect(),
            _ => None,
        }
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Unsigned(u) => write!(f, "{u}"),
            Value::Signed(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(t) => f.write_str(t),
            Value::Bytes(b) => write!(f, "{b:?}"),
            Value::List(l) => {
                for (i, v) in l.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{v}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// The key of one entry in a [`TagMap`].
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum TagKey {
    /// A humanized name, either from a dictionary or from the document.
    Name(Cow<'static, str>),

    /// A raw numeric ID that no dictionary knew about.
    Id(u16),
}

impl TagKey {
    /// Returns the name, if this key has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            TagKey::Name(n) => Some(n.as_ref()),
            TagKey::Id(_) => None,
        }
    }
}

impl core::fmt::Display for TagKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TagKey::Name(n) => f.write_str(n),
            TagKey::Id(id) => write!(f, "{id}"),
        }
    }
}

impl From<&'static str> for TagKey {
    fn from(value: &'static str) -> Self {
        TagKey::Name(Cow::Borrowed(value))
    }
}

impl From<String> for TagKey {
    fn from(value: String) -> Self {
        TagKey::Name(Cow::Owned(value))
    }
}

impl From<u16> for TagKey {
    fn from(value: u16) -> Self {
        TagKey::Id(value)
    }
}

/// An insertion-ordered map of tags.
///
/// Keys are unique. Inserting a key that's already present replaces its
/// value, but the key keeps its original position.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub struct TagMap<V = Value> {
    entries: Vec<(TagKey, V)>,
}

impl<V> Default for TagMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> TagMap<V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the one it replaced (if any).
    pub fn insert(&mut self, key: impl Into<TagKey>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Looks up a value by name.
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k.name() == Some(name))
            .map(|(_, v)| v)
    }

    /// Looks up a value stored under a raw numeric ID.
    pub fn get_id(&self, id: u16) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| *k == TagKey::Id(id))
            .map(|(_, v)| v)
    }

    /// Removes a value by name.
    pub fn remove(&mut self, name: &str) -> Option<V> {
        let index = self
            .entries
            .iter()
            .position(|(k, _)| k.name() == Some(name))?;
        Some(self.entries.remove(index).1)
    }

    /// Checks whether a name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&TagKey, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterates over entries mutably, in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&TagKey, &mut V)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &TagKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Moves every entry of `other` into `self`, overwriting on collision.
    pub fn merge(&mut self, other: TagMap<V>) {
        for (k, v) in other.entries {
            self.insert(k, v);
        }
    }
}

impl<V> IntoIterator for TagMap<V> {
    type Item = (TagKey, V);
    type IntoIter = std::vec::IntoIter<(TagKey, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<TagKey>, V> FromIterator<(K, V)> for TagMap<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = TagMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
