use std::fmt;

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use super::{
    format_timestamp, parse_timestamp, Amenity, Attributes, BaseModel, City, ModelKind, Place,
    Review, State, User,
};
use crate::error::ModelError;

/// Serialized field carrying the variant's type tag.
pub const CLASS_FIELD: &str = "__class__";

/// Separates the type tag from the id in a registry key.
pub const KEY_SEPARATOR: char = '.';

/// Fields no caller may assign through [`Record::set_attribute`].
pub const READ_ONLY_FIELDS: &[&str] = &[CLASS_FIELD, "id", "created_at", "updated_at"];

/// Builds the registry key `"<TypeName>.<id>"`.
pub fn composite_key(kind: ModelKind, id: &str) -> String {
    format!("{}{}{}", kind.as_str(), KEY_SEPARATOR, id)
}

/// Variant-specific declared fields of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    User(User),
    State(State),
    City(City),
    Amenity(Amenity),
    Place(Place),
    Review(Review),
}

impl Body {
    /// A body of the given kind with every declared field empty.
    pub fn empty(kind: ModelKind) -> Self {
        match kind {
            ModelKind::User => Self::User(User::default()),
            ModelKind::State => Self::State(State::default()),
            ModelKind::City => Self::City(City::default()),
            ModelKind::Amenity => Self::Amenity(Amenity::default()),
            ModelKind::Place => Self::Place(Place::default()),
            ModelKind::Review => Self::Review(Review::default()),
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Self::User(_) => ModelKind::User,
            Self::State(_) => ModelKind::State,
            Self::City(_) => ModelKind::City,
            Self::Amenity(_) => ModelKind::Amenity,
            Self::Place(_) => ModelKind::Place,
            Self::Review(_) => ModelKind::Review,
        }
    }

    pub fn field(&self, name: &str) -> Option<&String> {
        match self {
            Self::User(body) => body.field(name),
            Self::State(body) => body.field(name),
            Self::City(body) => body.field(name),
            Self::Amenity(body) => body.field(name),
            Self::Place(body) => body.field(name),
            Self::Review(body) => body.field(name),
        }
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match self {
            Self::User(body) => body.field_mut(name),
            Self::State(body) => body.field_mut(name),
            Self::City(body) => body.field_mut(name),
            Self::Amenity(body) => body.field_mut(name),
            Self::Place(body) => body.field_mut(name),
            Self::Review(body) => body.field_mut(name),
        }
    }
}

/// A live domain object.
///
/// Records are created either fresh ([`Record::new`]) or rehydrated from a
/// field mapping produced by [`Record::to_dict`] ([`Record::from_fields`]).
/// The two are inverse: `from_fields(r.to_dict())` serializes back to the
/// same mapping, including any fields in `extra`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub base: BaseModel,
    pub body: Body,
    /// Fields outside the variant's declared schema, kept verbatim.
    pub extra: Map<String, Value>,
}

impl Record {
    /// A fresh record with a new id, equal timestamps and empty fields.
    pub fn new(kind: ModelKind) -> Self {
        Self {
            base: BaseModel::new(),
            body: Body::empty(kind),
            extra: Map::new(),
        }
    }

    /// Rehydrates a record from its serialized fields.
    ///
    /// `id`, `created_at` and `updated_at` are required; timestamps must be in
    /// the serialized timestamp format. The `__class__` tag is ignored in
    /// favour of `kind`. Declared fields must be strings; every other field
    /// lands in `extra` unchanged.
    pub fn from_fields(kind: ModelKind, mut fields: Map<String, Value>) -> Result<Self, ModelError> {
        fields.remove(CLASS_FIELD);
        let id = take_string(&mut fields, "id")?;
        let created_at = take_timestamp(&mut fields, "created_at")?;
        let updated_at = take_timestamp(&mut fields, "updated_at")?;

        let mut body = Body::empty(kind);
        let mut extra = Map::new();
        for (name, value) in fields {
            match body.field_mut(&name) {
                Some(slot) => match value {
                    Value::String(s) => *slot = s,
                    _ => return Err(ModelError::InvalidField { field: name }),
                },
                None => {
                    extra.insert(name, value);
                }
            }
        }

        Ok(Self {
            base: BaseModel {
                id,
                created_at,
                updated_at,
            },
            body,
            extra,
        })
    }

    /// Like [`Record::from_fields`], for an arbitrary JSON value.
    pub fn from_value(kind: ModelKind, value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Object(fields) => Self::from_fields(kind, fields),
            _ => Err(ModelError::NotAnObject),
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.body.kind()
    }

    pub fn id(&self) -> &str {
        &self.base.id
    }

    pub fn key(&self) -> String {
        composite_key(self.kind(), &self.base.id)
    }

    /// Sets `updated_at` to now. Persisting is the storage engine's job.
    pub fn touch(&mut self) {
        self.base.touch();
    }

    /// Current value of any attribute, rendered as it would be serialized.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            CLASS_FIELD => Some(Value::String(self.kind().as_str().to_string())),
            "id" => Some(Value::String(self.base.id.clone())),
            "created_at" => Some(timestamp_value(&self.base.created_at)),
            "updated_at" => Some(timestamp_value(&self.base.updated_at)),
            _ => self
                .body
                .field(name)
                .map(|value| Value::String(value.clone()))
                .or_else(|| self.extra.get(name).cloned()),
        }
    }

    /// Assigns a string value to a declared field, or to `extra` otherwise.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) -> Result<(), ModelError> {
        if READ_ONLY_FIELDS.contains(&name) {
            return Err(ModelError::ReadOnlyAttribute(name.to_string()));
        }

        let value = value.into();
        match self.body.field_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.extra.insert(name.to_string(), Value::String(value));
            }
        }
        Ok(())
    }

    /// Serializes every field plus the `__class__` tag.
    pub fn to_dict(&self) -> Map<String, Value> {
        let mut dict = self.extra.clone();
        for name in self.kind().fields() {
            if let Some(value) = self.body.field(name) {
                dict.insert((*name).to_string(), Value::String(value.clone()));
            }
        }
        dict.insert("id".to_string(), Value::String(self.base.id.clone()));
        dict.insert(
            "created_at".to_string(),
            timestamp_value(&self.base.created_at),
        );
        dict.insert(
            "updated_at".to_string(),
            timestamp_value(&self.base.updated_at),
        );
        dict.insert(
            CLASS_FIELD.to_string(),
            Value::String(self.kind().as_str().to_string()),
        );
        dict
    }
}

/// `[<TypeName>] (<id>) {<fields>}`
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = self.to_dict();
        fields.remove(CLASS_FIELD);
        write!(
            f,
            "[{}] ({}) {}",
            self.kind(),
            self.base.id,
            Value::Object(fields)
        )
    }
}

fn timestamp_value(timestamp: &NaiveDateTime) -> Value {
    Value::String(format_timestamp(timestamp))
}

fn take_string(fields: &mut Map<String, Value>, name: &'static str) -> Result<String, ModelError> {
    match fields.remove(name) {
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(ModelError::InvalidField {
            field: name.to_string(),
        }),
        None => Err(ModelError::MissingField(name)),
    }
}

fn take_timestamp(
    fields: &mut Map<String, Value>,
    name: &'static str,
) -> Result<NaiveDateTime, ModelError> {
    let value = take_string(fields, name)?;
    parse_timestamp(&value).map_err(|source| ModelError::InvalidTimestamp {
        field: name,
        value,
        source,
    })
}
