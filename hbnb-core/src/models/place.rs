use super::Attributes;

/// A rentable place.
///
/// Numeric-looking fields (`number_rooms`, `price_by_night`, `latitude`, ...)
/// are kept as strings exactly as entered; no coercion happens on update or
/// reload. `amenity_ids` is likewise an opaque string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Place {
    /// Owning [`City`](super::City).
    pub city_id: String,
    /// Host [`User`](super::User).
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub number_rooms: String,
    pub number_bathrooms: String,
    pub max_guest: String,
    pub price_by_night: String,
    pub latitude: String,
    pub longitude: String,
    pub amenity_ids: String,
}

impl Attributes for Place {
    const FIELDS: &'static [&'static str] = &[
        "city_id",
        "user_id",
        "name",
        "description",
        "number_rooms",
        "number_bathrooms",
        "max_guest",
        "price_by_night",
        "latitude",
        "longitude",
        "amenity_ids",
    ];

    fn field(&self, name: &str) -> Option<&String> {
        match name {
            "city_id" => Some(&self.city_id),
            "user_id" => Some(&self.user_id),
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            "number_rooms" => Some(&self.number_rooms),
            "number_bathrooms" => Some(&self.number_bathrooms),
            "max_guest" => Some(&self.max_guest),
            "price_by_night" => Some(&self.price_by_night),
            "latitude" => Some(&self.latitude),
            "longitude" => Some(&self.longitude),
            "amenity_ids" => Some(&self.amenity_ids),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "city_id" => Some(&mut self.city_id),
            "user_id" => Some(&mut self.user_id),
            "name" => Some(&mut self.name),
            "description" => Some(&mut self.description),
            "number_rooms" => Some(&mut self.number_rooms),
            "number_bathrooms" => Some(&mut self.number_bathrooms),
            "max_guest" => Some(&mut self.max_guest),
            "price_by_night" => Some(&mut self.price_by_night),
            "latitude" => Some(&mut self.latitude),
            "longitude" => Some(&mut self.longitude),
            "amenity_ids" => Some(&mut self.amenity_ids),
            _ => None,
        }
    }
}
