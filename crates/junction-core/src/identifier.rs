//! Identifier management using string interning for efficient storage and comparison
//!
//! This module provides the [`Id`] type used for node ids, edge endpoints,
//! and issue locations throughout the diagram IR. Interning makes ids
//! `Copy` and cheap to hash, which the analyzer and layout engines rely on
//! for their id-keyed maps.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner shared by all identifiers.
///
/// Guarded by a `Mutex` so ids can be created from any thread.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> &'static Mutex<DefaultStringInterner> {
    INTERNER.get_or_init(|| Mutex::new(DefaultStringInterner::new()))
}

/// An interned diagram identifier.
///
/// Two ids created from the same string compare equal; identity of a node
/// across diagram versions is id equality and nothing else.
///
/// # Examples
///
/// ```
/// use junction_core::identifier::Id;
///
/// let a = Id::new("checkout");
/// let b = Id::new("checkout");
/// assert_eq!(a, b);
/// assert!(a == "checkout");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string, interning it if necessary.
    pub fn new(name: &str) -> Self {
        let mut interner = interner().lock().expect("identifier interner poisoned");
        Self(interner.get_or_intern(name))
    }

    /// Resolves the id back to an owned string.
    pub fn resolve(&self) -> String {
        let interner = interner().lock().expect("identifier interner poisoned");
        interner
            .resolve(self.0)
            .expect("interned symbol should resolve")
            .to_string()
    }

    /// Applies `f` to the underlying string without allocating.
    pub fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        let interner = interner().lock().expect("identifier interner poisoned");
        f(interner
            .resolve(self.0)
            .expect("interned symbol should resolve"))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| write!(f, "{}", s))
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::str::FromStr for Id {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.with_str(|s| s == other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.with_str(|s| serializer.serialize_str(s))
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Id::new(&name))
    }
}
