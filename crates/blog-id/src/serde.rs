//! Field adapters for `#[serde(with = "...")]`.
//!
//! Both adapters reject values that set bits outside the ID layout, so a
//! corrupted or foreign integer never round-trips into a typed ID.
//!
//! ```
//! use blog_id::BlogId;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct ArticleRow {
//!     #[serde(with = "blog_id::serde::as_string")]
//!     id: BlogId,
//!     title: String,
//! }
//! ```

use crate::{Error, SnowflakeId};

fn checked<ID: SnowflakeId>(raw: u64) -> Result<ID, Error> {
    let id = ID::from_raw(raw);
    if id.is_valid() {
        Ok(id)
    } else {
        Err(Error::ReservedBitsSet { raw })
    }
}

/// Serializes an ID as its native integer.
pub mod as_native {
    use ::serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::SnowflakeId;

    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<ID, S>(id: &ID, s: S) -> Result<S::Ok, S::Error>
    where
        ID: SnowflakeId,
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// # Errors
    ///
    /// Returns an error if the input is not a `u64` or sets reserved bits.
    pub fn deserialize<'de, ID, D>(d: D) -> Result<ID, D::Error>
    where
        ID: SnowflakeId,
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(d)?;
        super::checked(raw).map_err(::serde::de::Error::custom)
    }
}

/// Serializes an ID as a decimal string.
///
/// JavaScript clients parse JSON numbers as `f64` and silently lose precision
/// above 2^53, which every ID minted after the first few milliseconds exceeds.
pub mod as_string {
    use ::serde::{Deserialize, Deserializer, Serializer};

    use crate::SnowflakeId;

    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<ID, S>(id: &ID, s: S) -> Result<S::Ok, S::Error>
    where
        ID: SnowflakeId,
        S: Serializer,
    {
        s.collect_str(&id.to_raw())
    }

    /// # Errors
    ///
    /// Returns an error if the input is not a decimal `u64` string or sets
    /// reserved bits.
    pub fn deserialize<'de, ID, D>(d: D) -> Result<ID, D::Error>
    where
        ID: SnowflakeId,
        D: Deserializer<'de>,
    {
        let s = <std::borrow::Cow<'de, str>>::deserialize(d)?;
        let raw = s.parse::<u64>().map_err(::serde::de::Error::custom)?;
        super::checked(raw).map_err(::serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use ::serde::{Deserialize, Serialize};

    use crate::{BlogId, SnowflakeId};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        #[serde(with = "crate::serde::as_native")]
        native: BlogId,
        #[serde(with = "crate::serde::as_string")]
        text: BlogId,
    }

    #[test]
    fn native_and_string_forms() {
        let id = BlogId::from_components(5_000, 1, 0);
        let row = Row { native: id, text: id };

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"native":20971524096,"text":"20971524096"}"#);
        assert_eq!(serde_json::from_str::<Row>(&json).unwrap(), row);
    }

    #[test]
    fn reserved_bits_are_rejected() {
        let json = format!(r#"{{"native":{},"text":"1"}}"#, u64::MAX);
        let err = serde_json::from_str::<Row>(&json).unwrap_err();
        assert!(err.to_string().contains("reserved bits"));

        let json = format!(r#"{{"native":1,"text":"{}"}}"#, u64::MAX);
        assert!(serde_json::from_str::<Row>(&json).is_err());
    }

    #[test]
    fn non_numeric_strings_are_rejected() {
        let json = r#"{"native":1,"text":"abc"}"#;
        assert!(serde_json::from_str::<Row>(json).is_err());
    }
}
