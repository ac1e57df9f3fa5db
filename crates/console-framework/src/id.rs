//! Opaque entity identifiers.
//!
//! The wire format is loose: a GraphQL `ID` may arrive as `"7"` or `7`. The
//! [`entity_id!`](crate::entity_id) macro generates a `u32` newtype that
//! serializes as a string and accepts either form.

use serde::Deserialize;

/// Either wire representation of an id.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    pub fn into_u32(self) -> Result<u32, String> {
        match self {
            RawId::Number(n) => u32::try_from(n).map_err(|_| format!("id out of range: {n}")),
            RawId::Text(s) => s.trim().parse().map_err(|_| format!("invalid id: {s:?}")),
        }
    }
}

/// Declares `<Entity>Id`, a type-safe identifier for one collection.
///
/// ```rust
/// console_framework::entity_id!(Post);
///
/// let id: PostId = "42".parse().unwrap();
/// assert_eq!(id, PostId(42));
/// assert_eq!(id.to_string(), "42");
/// ```
#[macro_export]
macro_rules! entity_id {
    ($entity:ident) => {
        $crate::paste::paste! {
            /// Type-safe entity identifier.
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct [<$entity Id>](pub u32);

            impl From<u32> for [<$entity Id>] {
                fn from(id: u32) -> Self {
                    Self(id)
                }
            }

            impl From<[<$entity Id>]> for u32 {
                fn from(id: [<$entity Id>]) -> Self {
                    id.0
                }
            }

            impl ::std::fmt::Display for [<$entity Id>] {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl ::std::str::FromStr for [<$entity Id>] {
                type Err = ::std::num::ParseIntError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    s.trim().parse().map(Self)
                }
            }

            impl $crate::serde::Serialize for [<$entity Id>] {
                fn serialize<S: $crate::serde::Serializer>(
                    &self,
                    serializer: S,
                ) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(&self.0)
                }
            }

            impl<'de> $crate::serde::Deserialize<'de> for [<$entity Id>] {
                fn deserialize<D: $crate::serde::Deserializer<'de>>(
                    deserializer: D,
                ) -> Result<Self, D::Error> {
                    let raw = <$crate::id::RawId as $crate::serde::Deserialize>::deserialize(
                        deserializer,
                    )?;
                    raw.into_u32()
                        .map(Self)
                        .map_err(<D::Error as $crate::serde::de::Error>::custom)
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::entity_id!(Sample);

    #[test]
    fn decodes_string_and_number_ids() {
        let from_text: SampleId = serde_json::from_str("\"12\"").unwrap();
        let from_number: SampleId = serde_json::from_str("12").unwrap();
        assert_eq!(from_text, SampleId(12));
        assert_eq!(from_number, SampleId(12));
    }

    #[test]
    fn encodes_as_string() {
        assert_eq!(serde_json::to_string(&SampleId(5)).unwrap(), "\"5\"");
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<SampleId>("\"abc\"").is_err());
        assert!("abc".parse::<SampleId>().is_err());
    }
}
