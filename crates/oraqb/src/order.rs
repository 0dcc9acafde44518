//! ORDER BY entries.

use crate::error::{QbError, QbResult};

/// One ORDER BY entry with an optional direction.
///
/// The direction is kept as given and checked at render time: `ASC` or
/// `DESC` in any letter case, anything else is an operator error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    field: String,
    direction: Option<String>,
}

impl Order {
    pub fn new(field: impl Into<String>, direction: Option<&str>) -> Self {
        Self {
            field: field.into(),
            direction: direction.map(str::to_string),
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, Some("ASC"))
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, Some("DESC"))
    }

    pub fn build(&self) -> QbResult<String> {
        let Some(direction) = &self.direction else {
            return Ok(self.field.clone());
        };
        let upper = direction.to_ascii_uppercase();
        match upper.as_str() {
            "ASC" | "DESC" => Ok(format!("{} {upper}", self.field)),
            _ => Err(QbError::operator(format!("Invalid order value: {direction}"))),
        }
    }
}
