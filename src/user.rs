use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// User id, the logical primary key of the record store
pub type UserId = String;

/// User record as persisted in the JSON array of the record file
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct User {
    /// Unique only by convention, checked when a record is added
    pub(crate) id: UserId,
    pub(crate) email: String,
    pub(crate) age: i64,
}

impl User {
    #[cfg(test)]
    pub(crate) fn new(id: &str, email: &str, age: i64) -> Self {
        Self {
            id: id.to_string(),
            email: email.to_string(),
            age,
        }
    }

    /// Structural check applied before insertion, no format checks on email or age
    pub(crate) fn is_valid(&self) -> bool {
        self.age != 0 && !self.email.is_empty() && !self.id.is_empty()
    }
}

/// Field names match regardless of case, unknown ones are skipped
enum Field {
    Id,
    Email,
    Age,
    Other,
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(match name.to_lowercase().as_str() {
            "id" => Field::Id,
            "email" => Field::Email,
            "age" => Field::Age,
            _ => Field::Other,
        })
    }
}

struct UserVisitor;

impl<'de> Visitor<'de> for UserVisitor {
    type Value = User;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a user object")
    }

    // `null` leaves every field at its zero value
    fn visit_unit<E>(self) -> Result<User, E>
    where
        E: de::Error,
    {
        Ok(User::default())
    }

    fn visit_map<A>(self, mut map: A) -> Result<User, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut user = User::default();

        // missing or null fields keep their zero value, a repeated field keeps the last one
        while let Some(field) = map.next_key::<Field>()? {
            match field {
                Field::Id => {
                    if let Some(id) = map.next_value()? {
                        user.id = id;
                    }
                }
                Field::Email => {
                    if let Some(email) = map.next_value()? {
                        user.email = email;
                    }
                }
                Field::Age => {
                    if let Some(age) = map.next_value()? {
                        user.age = age;
                    }
                }
                Field::Other => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(user)
    }
}

impl<'de> Deserialize<'de> for User {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(UserVisitor)
    }
}
