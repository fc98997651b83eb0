use super::Attributes;

/// A review left by a [`User`](super::User) on a [`Place`](super::Place).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Review {
    pub place_id: String,
    pub user_id: String,
    pub text: String,
}

impl Attributes for Review {
    const FIELDS: &'static [&'static str] = &["place_id", "user_id", "text"];

    fn field(&self, name: &str) -> Option<&String> {
        match name {
            "place_id" => Some(&self.place_id),
            "user_id" => Some(&self.user_id),
            "text" => Some(&self.text),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "place_id" => Some(&mut self.place_id),
            "user_id" => Some(&mut self.user_id),
            "text" => Some(&mut self.text),
            _ => None,
        }
    }
}
