use super::Attributes;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Amenity {
    pub name: String,
}

impl Attributes for Amenity {
    const FIELDS: &'static [&'static str] = &["name"];

    fn field(&self, name: &str) -> Option<&String> {
        match name {
            "name" => Some(&self.name),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "name" => Some(&mut self.name),
            _ => None,
        }
    }
}
