use std::time::SystemTime;

use crate::{BlogId, Epoch, Result, SnowflakeGenerator, SnowflakeId, TimeSource};

/// The identity every persisted blog record carries: its primary key and the
/// moment it was created.
///
/// `created_at` is never stored on its own. It is derived from the ID's
/// timestamp field plus the generator's epoch, so a stamp loaded from
/// storage is rebuilt with [`EntityStamp::from_id`] and always agrees with
/// the key.
///
/// # Example
///
/// ```
/// use std::time::{Duration, SystemTime};
/// use blog_id::{
///     BlogId, EntityStamp, Epoch, LockSnowflakeGenerator, ManualClock, SnowflakeGenerator,
/// };
///
/// let clock = ManualClock::at(Epoch::BLOG, 5_000);
/// let generator: LockSnowflakeGenerator<BlogId, _> =
///     LockSnowflakeGenerator::new(1, Epoch::BLOG, clock).unwrap();
///
/// let stamp = EntityStamp::mint(&generator).unwrap();
/// assert_eq!(
///     stamp.created_at(),
///     SystemTime::from(Epoch::BLOG) + Duration::from_secs(5)
/// );
///
/// let reloaded = EntityStamp::from_id(stamp.id(), Epoch::BLOG);
/// assert_eq!(reloaded, stamp);
/// ```
///
/// With the `serde` feature a stamp serializes as `{ "id": "<decimal>" }`
/// only. Deserializing needs the epoch, so it goes through
/// [`EntityStampSeed`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(bound = "ID: SnowflakeId"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityStamp<ID: SnowflakeId = BlogId> {
    #[cfg_attr(feature = "serde", serde(with = "crate::serde::as_string"))]
    id: ID,
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    created_at: SystemTime,
}

impl<ID: SnowflakeId> EntityStamp<ID> {
    /// Mints a fresh ID and derives its creation time.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`SnowflakeGenerator::next_id`]. No ID is
    /// consumed when minting fails.
    pub fn mint<G, T>(generator: &G) -> Result<Self>
    where
        G: SnowflakeGenerator<ID, T>,
        T: TimeSource,
    {
        let id = generator.next_id()?;
        Ok(Self::from_id(id, generator.epoch()))
    }

    /// Rebuilds the stamp of an entity loaded from storage.
    pub fn from_id(id: ID, epoch: Epoch) -> Self {
        Self {
            id,
            created_at: epoch.to_system_time(id.timestamp()),
        }
    }

    pub fn id(&self) -> ID {
        self.id
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }
}

/// Deserializes an [`EntityStamp`] and derives `created_at` from `epoch`.
///
/// Only the `id` field is read. A `created_at` in the input is ignored, so
/// the loaded stamp always agrees with its key.
///
/// ```
/// use blog_id::{BlogId, EntityStamp, EntityStampSeed, Epoch};
/// use serde::de::DeserializeSeed;
///
/// let json = serde_json::json!({ "id": "20971524096" });
/// let stamp: EntityStamp<BlogId> = EntityStampSeed::new(Epoch::BLOG)
///     .deserialize(json)
///     .unwrap();
/// assert_eq!(stamp.id().to_raw(), 20_971_524_096);
/// ```
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Copy)]
pub struct EntityStampSeed<ID: SnowflakeId = BlogId> {
    epoch: Epoch,
    _id: core::marker::PhantomData<ID>,
}

#[cfg(feature = "serde")]
impl<ID: SnowflakeId> EntityStampSeed<ID> {
    pub fn new(epoch: Epoch) -> Self {
        Self {
            epoch,
            _id: core::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, ID: SnowflakeId> ::serde::de::DeserializeSeed<'de> for EntityStampSeed<ID> {
    type Value = EntityStamp<ID>;

    fn deserialize<D>(self, d: D) -> core::result::Result<Self::Value, D::Error>
    where
        D: ::serde::Deserializer<'de>,
    {
        #[derive(::serde::Deserialize)]
        #[serde(bound = "I: SnowflakeId")]
        struct Stored<I: SnowflakeId> {
            #[serde(with = "crate::serde::as_string")]
            id: I,
        }

        let stored = <Stored<ID> as ::serde::Deserialize>::deserialize(d)?;
        Ok(EntityStamp::from_id(stored.id, self.epoch))
    }
}

/// Implemented by every record keyed by a Snowflake ID.
///
/// ```
/// use blog_id::{EntityStamp, SnowflakeEntity};
///
/// struct Category {
///     stamp: EntityStamp,
///     name: String,
/// }
///
/// impl SnowflakeEntity for Category {
///     fn stamp(&self) -> &EntityStamp {
///         &self.stamp
///     }
/// }
/// ```
pub trait SnowflakeEntity<ID: SnowflakeId = BlogId> {
    fn stamp(&self) -> &EntityStamp<ID>;

    fn id(&self) -> ID {
        self.stamp().id()
    }

    fn created_at(&self) -> SystemTime {
        self.stamp().created_at()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    #[cfg(feature = "serde")]
    use ::serde::de::DeserializeSeed;

    use super::*;
    use crate::{AtomicSnowflakeGenerator, Error, ManualClock};

    struct Article {
        stamp: EntityStamp,
        title: &'static str,
    }

    impl SnowflakeEntity for Article {
        fn stamp(&self) -> &EntityStamp {
            &self.stamp
        }
    }

    fn generator(clock: ManualClock) -> AtomicSnowflakeGenerator<BlogId, ManualClock> {
        AtomicSnowflakeGenerator::new(1, Epoch::BLOG, clock).unwrap()
    }

    #[test]
    fn created_at_is_derived_from_the_id() {
        let clock = ManualClock::at(Epoch::BLOG, 86_400_000);
        let generator = generator(clock.clone());

        let article = Article {
            stamp: EntityStamp::mint(&generator).unwrap(),
            title: "Hello",
        };

        assert_eq!(article.title, "Hello");
        assert_eq!(article.id().timestamp(), 86_400_000);
        assert_eq!(
            article.created_at(),
            SystemTime::from(Epoch::BLOG) + Duration::from_secs(86_400)
        );
    }

    #[test]
    fn later_entities_sort_after_earlier_ones() {
        let clock = ManualClock::at(Epoch::BLOG, 10);
        let generator = generator(clock.clone());

        let first = EntityStamp::mint(&generator).unwrap();
        let same_ms = EntityStamp::mint(&generator).unwrap();
        clock.advance(3);
        let later = EntityStamp::mint(&generator).unwrap();

        assert!(first.id() < same_ms.id() && same_ms.id() < later.id());
        assert_eq!(first.created_at(), same_ms.created_at());
        assert!(later.created_at() > first.created_at());
    }

    #[test]
    fn minting_fails_on_regression() {
        let clock = ManualClock::at(Epoch::BLOG, 10);
        let generator = generator(clock.clone());

        EntityStamp::<BlogId>::mint(&generator).unwrap();
        clock.rewind(5);
        assert!(matches!(
            EntityStamp::<BlogId>::mint(&generator),
            Err(Error::ClockRegression { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn stamp_serializes_id_as_string() {
        let stamp = EntityStamp::from_id(BlogId::from_components(5_000, 1, 0), Epoch::BLOG);
        let json = serde_json::to_value(stamp).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "20971524096" }));

        let back: EntityStamp = EntityStampSeed::new(Epoch::BLOG).deserialize(json).unwrap();
        assert_eq!(back, stamp);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn stored_created_at_is_ignored_on_load() {
        let json = serde_json::json!({
            "id": "20971524096",
            "created_at": { "secs_since_epoch": 0, "nanos_since_epoch": 0 },
        });
        let stamp: EntityStamp = EntityStampSeed::new(Epoch::BLOG).deserialize(json).unwrap();

        assert_eq!(
            stamp,
            EntityStamp::from_id(BlogId::from_components(5_000, 1, 0), Epoch::BLOG)
        );
        assert_eq!(
            stamp.created_at(),
            SystemTime::from(Epoch::BLOG) + Duration::from_secs(5)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn load_rejects_reserved_bits() {
        let json = serde_json::json!({ "id": u64::MAX.to_string() });
        let loaded: core::result::Result<EntityStamp, _> =
            EntityStampSeed::new(Epoch::BLOG).deserialize(json);
        assert!(loaded.is_err());
    }
}
