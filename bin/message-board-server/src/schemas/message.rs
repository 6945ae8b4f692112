use crate::entities::MessageRecord;
use crate::validation::FieldErrors;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Wire format for `created_at`: UTC, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Body of `POST /api/messages`.
///
/// Both fields are optional at the type level so that a missing key surfaces
/// as a validation error instead of a deserialization failure. Empty and
/// whitespace-only values are treated the same as missing ones.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateMessageRequest {
    #[validate(
        required(message = "This field is required."),
        custom(function = "crate::validation::not_blank"),
        length(min = 1, max = 10, message = "Name must be between 1 and 10 characters long.")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "crate::validation::not_blank"),
        length(min = 10, max = 1000, message = "Text must be between 10 and 1000 characters long.")
    )]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub name: String,
    pub text: String,
    /// `YYYY-MM-DDTHH:MM:SSZ`
    pub created_at: String,
}

/// Body of a 422 response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub ok: bool,
    #[schema(value_type = Object)]
    pub errors: FieldErrors,
}

impl MessageRecord {
    pub fn to_response(&self) -> MessageResponse {
        MessageResponse {
            name: self.name.clone(),
            text: self.text.clone(),
            created_at: self.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
