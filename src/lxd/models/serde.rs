use serde::{Deserialize, Deserializer};

/// LXD sends `null` instead of `{}` / `[]` for unset collections (e.g. a
/// container's `config` or an image's `aliases`).
pub fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
