//! Validated JSON extractor.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use common::AppError;

/// JSON extractor that automatically validates the payload.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        value
            .validate()
            .map_err(|e| AppError::invalid_argument(first_message(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Message of the first failing field, fields taken in name order.
fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .find_map(|(field, errors)| {
            errors.first().map(|error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for field '{}'", field),
            })
        })
        .unwrap_or_else(|| "Validation failed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(range(min = 1))]
        size: i32,
    }

    #[test]
    fn test_first_message_prefers_custom_message() {
        let probe = Probe {
            name: String::new(),
            size: 3,
        };
        let errors = probe.validate().unwrap_err();

        assert_eq!(first_message(&errors), "name is required");
    }

    #[test]
    fn test_first_message_falls_back_to_field_name() {
        let probe = Probe {
            name: "ok".to_string(),
            size: 0,
        };
        let errors = probe.validate().unwrap_err();

        assert_eq!(first_message(&errors), "Invalid value for field 'size'");
    }
}
