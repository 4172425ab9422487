//! Order-preserving views of JSON objects.
//!
//! `serde_json::Map` sorts its keys unless the `preserve_order` feature is on,
//! but field sets must keep the order they were written in. Deserializing
//! through `MapAccess` sees the keys in document order, so collect them there.

use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;

/// Key/value pairs of a JSON object, in document order.
#[derive(Debug, Clone, Default)]
pub(crate) struct OrderedEntries(pub(crate) Vec<(String, Value)>);

impl<'de> Deserialize<'de> for OrderedEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = OrderedEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    entries.push((key, value));
                }
                Ok(OrderedEntries(entries))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(OrderedEntries::default())
            }
        }

        deserializer.deserialize_any(EntriesVisitor)
    }
}

/// Render a JSON value for error messages.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}
