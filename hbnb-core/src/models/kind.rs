use std::fmt;

use super::{Amenity, Attributes, City, Place, Review, State, User};

/// Type tag of a record variant.
///
/// The tag is the first component of a registry key and the value of the
/// `__class__` field in serialized records. Matching is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelKind {
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

impl ModelKind {
    pub const ALL: [ModelKind; 6] = [
        Self::User,
        Self::State,
        Self::City,
        Self::Amenity,
        Self::Place,
        Self::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::State => "State",
            Self::City => "City",
            Self::Amenity => "Amenity",
            Self::Place => "Place",
            Self::Review => "Review",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "User" => Some(Self::User),
            "State" => Some(Self::State),
            "City" => Some(Self::City),
            "Amenity" => Some(Self::Amenity),
            "Place" => Some(Self::Place),
            "Review" => Some(Self::Review),
            _ => None,
        }
    }

    /// Declared field names of this variant.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::User => User::FIELDS,
            Self::State => State::FIELDS,
            Self::City => City::FIELDS,
            Self::Amenity => Amenity::FIELDS,
            Self::Place => Place::FIELDS,
            Self::Review => Review::FIELDS,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
