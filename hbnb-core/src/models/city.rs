use super::Attributes;

/// A city, linked to its [`State`](super::State) by `state_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct City {
    pub state_id: String,
    pub name: String,
}

impl Attributes for City {
    const FIELDS: &'static [&'static str] = &["state_id", "name"];

    fn field(&self, name: &str) -> Option<&String> {
        match name {
            "state_id" => Some(&self.state_id),
            "name" => Some(&self.name),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "state_id" => Some(&mut self.state_id),
            "name" => Some(&mut self.name),
            _ => None,
        }
    }
}
