use serde::{Deserialize, Deserializer, Serialize};

/// A customer record.
///
/// `id` doubles as the store key. Every field may be omitted from an incoming
/// payload and then takes its zero value; an empty `id` asks the store to
/// allocate one.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Customer {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub contacted: bool,
}

/// An explicit `null` leaves the field at its zero value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Customer {
    /// Copy of this record carrying `id`.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self { id: id.into(), ..self }
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}
