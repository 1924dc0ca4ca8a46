/// Queryable entities and their fixed column allow-lists. Any column not
/// listed here is rejected, both for projection and inside filter leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Users,
    Locations,
}

const USER_COLUMNS: &[&str] = &["id", "username", "email", "permissions"];

const LOCATION_COLUMNS: &[&str] = &[
    "id",
    "name",
    "country",
    "city",
    "street",
    "longitude",
    "latitude",
    "price_min",
    "price_max",
    "description",
    "rating",
    "vote_nr",
    "date_added",
    "validated",
];

impl Entity {
    pub fn table(self) -> &'static str {
        match self {
            Entity::Users => "users",
            Entity::Locations => "locations",
        }
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Entity::Users => USER_COLUMNS,
            Entity::Locations => LOCATION_COLUMNS,
        }
    }

    pub fn allows(self, column: &str) -> bool {
        self.columns().iter().any(|c| *c == column)
    }
}
