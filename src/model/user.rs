use crate::framework::Resource;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents a registered user.
///
/// Users are stored under caller-chosen identifiers (their login), so they do not
/// implement [`Resource::create_id`] and collection-level POST is not available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Payload for creating a user.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
}

/// Payload for updating a user. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Errors that can occur while building or editing a user.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User validation error: {0}")]
    Validation(String),

    #[error("Malformed user payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

fn check_email(email: &str) -> Result<(), UserError> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(UserError::Validation(format!("invalid email: {email}")))
    }
}

impl Resource for User {
    type Error = UserError;

    fn instantiate(id: Option<&str>, payload: &Value) -> Result<Self, UserError> {
        let params: UserCreate = serde_json::from_value(payload.clone())?;
        check_email(&params.email)?;
        Ok(Self::new(id.unwrap_or_default(), params.name, params.email))
    }

    fn edit(&mut self, payload: &Value) -> Result<(), UserError> {
        let update: UserUpdate = serde_json::from_value(payload.clone())?;
        if let Some(email) = &update.email {
            check_email(email)?;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        Ok(())
    }
}
