use super::Attributes;

/// A registered account.
///
/// `password` is stored as given; hashing is the caller's concern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl Attributes for User {
    const FIELDS: &'static [&'static str] = &["email", "password", "first_name", "last_name"];

    fn field(&self, name: &str) -> Option<&String> {
        match name {
            "email" => Some(&self.email),
            "password" => Some(&self.password),
            "first_name" => Some(&self.first_name),
            "last_name" => Some(&self.last_name),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "email" => Some(&mut self.email),
            "password" => Some(&mut self.password),
            "first_name" => Some(&mut self.first_name),
            "last_name" => Some(&mut self.last_name),
            _ => None,
        }
    }
}
