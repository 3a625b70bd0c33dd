//! Typed UUID wrappers for compile-time type safety.
//!
//! `Id<T>` wraps a `uuid::Uuid` (v7, time-ordered) and carries the entity it
//! belongs to as a phantom parameter, so a `UserId` can never be passed where
//! an `ExchangeId` was expected.
//!
//! # Example
//!
//! ```rust
//! use santa_core::common::id::Id;
//!
//! pub struct Gift;
//! pub type GiftId = Id<Gift>;
//!
//! let id = GiftId::new();
//! assert!(!id.is_nil());
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;
use uuid::Uuid;

/// A typed wrapper around `Uuid`.
///
/// IDs with different `T` parameters are incompatible at compile time:
///
/// ```compile_fail
/// use santa_core::common::{ExchangeId, UserId};
///
/// let user_id = UserId::new();
/// let exchange_id: ExchangeId = user_id; // Compile error!
/// ```
#[repr(transparent)]
pub struct Id<T>(Uuid, PhantomData<fn() -> T>);

impl<T> Id<T> {
    /// Creates a new time-ordered (v7) id.
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::now_v7(), PhantomData)
    }

    #[inline]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, PhantomData)
    }

    #[inline]
    pub fn into_uuid(self) -> Uuid {
        self.0
    }

    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parses an `Id` from its hyphenated string form.
    #[inline]
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?, PhantomData))
    }

    /// Creates a nil (all zeros) ID. Useful as a sentinel in tests.
    #[inline]
    pub fn nil() -> Self {
        Self(Uuid::nil(), PhantomData)
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Standard trait implementations
// ============================================================================
//
// Written by hand so that `T` (a bare marker type) does not need to implement
// any of these traits itself.

impl<T> Clone for Id<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_name = std::any::type_name::<T>();
        let short = type_name.rsplit("::").next().unwrap_or(type_name);
        write!(f, "{}Id({})", short, self.0)
    }
}

impl<T> Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for Id<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> Hash for Id<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> From<Uuid> for Id<T> {
    #[inline]
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl<T> FromStr for Id<T> {
    type Err = uuid::Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Serde support
// ============================================================================

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Uuid::deserialize(deserializer).map(Self::from_uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gift;

    type GiftId = Id<Gift>;

    #[test]
    fn test_new_creates_unique_ids() {
        assert_ne!(GiftId::new(), GiftId::new());
    }

    #[test]
    fn test_parse_and_display_roundtrip() {
        let id = GiftId::new();
        let parsed: GiftId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_serializes_as_plain_uuid() {
        let uuid = Uuid::now_v7();
        let json = serde_json::to_string(&GiftId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }

    #[test]
    fn test_usable_as_btree_key() {
        use std::collections::BTreeSet;
        let a = GiftId::new();
        let b = GiftId::new();
        let set: BTreeSet<GiftId> = [b, a, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_debug_includes_short_type_name() {
        let debug = format!("{:?}", GiftId::nil());
        assert!(debug.starts_with("GiftId("));
    }
}
