//! Document values produced by the parser and consumed by the encoder.

/// A parsed ArchieML value. Every leaf is text; structure comes from
/// arrays and ordered objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocValue {
    String(String),
    Array(Vec<DocValue>),
    /// Entries in insertion order. Re-assigning a key keeps its position.
    Object(Vec<(String, DocValue)>),
}

impl Default for DocValue {
    fn default() -> Self {
        DocValue::Object(Vec::new())
    }
}

impl From<&str> for DocValue {
    fn from(s: &str) -> Self {
        DocValue::String(s.to_string())
    }
}

impl From<String> for DocValue {
    fn from(s: String) -> Self {
        DocValue::String(s)
    }
}

impl From<Vec<DocValue>> for DocValue {
    fn from(items: Vec<DocValue>) -> Self {
        DocValue::Array(items)
    }
}

impl DocValue {
    pub fn new_object() -> Self {
        DocValue::Object(Vec::new())
    }

    pub fn is_object(&self) -> bool {
        matches!(self, DocValue::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DocValue]> {
        match self {
            DocValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, DocValue)]> {
        match self {
            DocValue::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a direct child of an object.
    pub fn get(&self, key: &str) -> Option<&DocValue> {
        self.as_object()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Follows a dotted path. Segments address object keys, or array
    /// indices when the current value is an array (`items.0.type`).
    pub fn get_path(&self, path: &str) -> Option<&DocValue> {
        let mut cur = self;
        for seg in path.split('.') {
            cur = match cur {
                DocValue::Object(_) => cur.get(seg)?,
                DocValue::Array(items) => items.get(seg.parse::<usize>().ok()?)?,
                DocValue::String(_) => return None,
            };
        }
        Some(cur)
    }

    pub fn get_path_mut(&mut self, path: &str) -> Option<&mut DocValue> {
        let mut cur = self;
        for seg in path.split('.') {
            cur = match cur {
                DocValue::Object(entries) => entries
                    .iter_mut()
                    .find(|(k, _)| k == seg)
                    .map(|(_, v)| v)?,
                DocValue::Array(items) => items.get_mut(seg.parse::<usize>().ok()?)?,
                DocValue::String(_) => return None,
            };
        }
        Some(cur)
    }

    /// Sets `key` on an object, keeping the position of an existing entry.
    /// Returns the previous value. Non-objects are left untouched and get
    /// the value handed back.
    pub fn insert(&mut self, key: &str, value: DocValue) -> Option<DocValue> {
        let DocValue::Object(entries) = self else {
            return Some(value);
        };
        insert_entry(entries, key, value)
    }

    /// Sets a dotted path, creating intermediate objects as needed.
    ///
    /// The whole path is checked first: when an array sits on it, nothing is
    /// written and `false` comes back. See [`object_step`] for the policy.
    pub fn insert_path(&mut self, path: &str, value: DocValue) -> bool {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(last) = segments.pop() else {
            return false;
        };
        if self.path_refused(&segments) {
            return false;
        }
        let mut cur = self;
        for seg in segments {
            let Some(entries) = coerce_to_object(cur) else {
                return false;
            };
            let idx = match entries.iter().position(|(k, _)| k == seg) {
                Some(idx) => idx,
                None => {
                    entries.push((seg.to_string(), DocValue::new_object()));
                    entries.len() - 1
                }
            };
            cur = &mut entries[idx].1;
        }
        match coerce_to_object(cur) {
            Some(entries) => {
                insert_entry(entries, last, value);
                true
            }
            None => false,
        }
    }

    /// True when writing through `segments` would have to overwrite an array.
    fn path_refused(&self, segments: &[&str]) -> bool {
        let mut cur = self;
        for seg in segments {
            match object_step(cur.occupant(), true) {
                ObjectStep::Refuse => return true,
                ObjectStep::Create => return false,
                ObjectStep::Reuse => match cur.get(seg) {
                    Some(next) => cur = next,
                    None => return false,
                },
            }
        }
        object_step(cur.occupant(), true) == ObjectStep::Refuse
    }

    fn occupant(&self) -> Occupant {
        match self {
            DocValue::String(s) => Occupant::Text { empty: s.is_empty() },
            DocValue::Array(_) => Occupant::Array,
            DocValue::Object(_) => Occupant::Object,
        }
    }
}

/// What a write finds at a path step where it needs an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Missing,
    Text { empty: bool },
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectStep {
    /// Descend into the existing object.
    Reuse,
    /// Put a fresh object in place of whatever is there.
    Create,
    /// Leave the occupant alone.
    Refuse,
}

/// Auto-create policy for every path write, in the parser and on
/// [`DocValue`]: objects are reused, missing keys and empty text get a new
/// object, other text only when `replace_text` allows it, and an array is
/// never overwritten.
pub fn object_step(occupant: Occupant, replace_text: bool) -> ObjectStep {
    match occupant {
        Occupant::Object => ObjectStep::Reuse,
        Occupant::Missing => ObjectStep::Create,
        Occupant::Text { empty } if empty || replace_text => ObjectStep::Create,
        Occupant::Text { .. } | Occupant::Array => ObjectStep::Refuse,
    }
}

/// Object view of `value`, replacing text with an empty object first.
/// Arrays give `None`.
pub fn coerce_to_object(value: &mut DocValue) -> Option<&mut Vec<(String, DocValue)>> {
    match object_step(value.occupant(), true) {
        ObjectStep::Create => *value = DocValue::new_object(),
        ObjectStep::Reuse | ObjectStep::Refuse => {}
    }
    match value {
        DocValue::Object(entries) => Some(entries),
        _ => None,
    }
}

fn insert_entry(entries: &mut Vec<(String, DocValue)>, key: &str, value: DocValue) -> Option<DocValue> {
    match entries.iter_mut().find(|(k, _)| k == key) {
        Some((_, slot)) => Some(core::mem::replace(slot, value)),
        None => {
            entries.push((key.to_string(), value));
            None
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DocValue {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::{SerializeMap, SerializeSeq};
        match self {
            DocValue::String(s) => serializer.serialize_str(s),
            DocValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DocValue::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(feature = "json")]
impl DocValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            DocValue::String(s) => serde_json::Value::String(s.clone()),
            DocValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(DocValue::to_json).collect())
            }
            DocValue::Object(entries) => {
                let mut m = serde_json::Map::new();
                for (k, v) in entries {
                    m.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(m)
            }
        }
    }
}

/// ArchieML has no scalar types, so booleans and numbers become their text.
#[cfg(feature = "json")]
impl TryFrom<serde_json::Value> for DocValue {
    type Error = crate::error::Error;

    fn try_from(v: serde_json::Value) -> crate::Result<Self> {
        Ok(match v {
            serde_json::Value::Null => {
                return Err(crate::error::Error::message("null has no ArchieML representation"));
            }
            serde_json::Value::Bool(b) => DocValue::String(b.to_string()),
            serde_json::Value::Number(n) => DocValue::String(n.to_string()),
            serde_json::Value::String(s) => DocValue::String(s),
            serde_json::Value::Array(items) => DocValue::Array(
                items
                    .into_iter()
                    .map(DocValue::try_from)
                    .collect::<crate::Result<Vec<_>>>()?,
            ),
            serde_json::Value::Object(m) => {
                let mut entries = Vec::with_capacity(m.len());
                for (k, vv) in m {
                    entries.push((k, DocValue::try_from(vv)?));
                }
                DocValue::Object(entries)
            }
        })
    }
}
