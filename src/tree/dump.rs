//! Structural `serde` dump of a tree: `name`, `kind`, `value`,
//! `attributes` and `children`, with byte strings rendered lossily.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::{Attributes, Children, NodeKind, NodeRef};

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(name) = self.name() {
            map.serialize_entry("name", &String::from_utf8_lossy(name))?;
        }
        let kind = self.kind();
        map.serialize_entry("kind", kind.as_str())?;
        if let Some(value) = self.value() {
            map.serialize_entry("value", &String::from_utf8_lossy(value))?;
        }
        if self.attributes().next().is_some() {
            map.serialize_entry("attributes", &AttributeDump(self.attributes()))?;
        }
        if matches!(kind, NodeKind::Object | NodeKind::Array) {
            map.serialize_entry("children", &ChildDump(self.children()))?;
        }
        map.end()
    }
}

struct AttributeDump<'a>(Attributes<'a>);

impl Serialize for AttributeDump<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for attr in self.0.clone() {
            map.serialize_entry(
                &String::from_utf8_lossy(attr.name()),
                &String::from_utf8_lossy(attr.value()),
            )?;
        }
        map.end()
    }
}

pub(crate) struct ChildDump<'a>(pub(crate) Children<'a>);

impl Serialize for ChildDump<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(None)?;
        for child in self.0.clone() {
            seq.serialize_element(&child)?;
        }
        seq.end()
    }
}
