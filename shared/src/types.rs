//! API request and response types
//!
//! All bodies use camelCase field names on the wire.

use crate::validation::{
    validate_content, validate_email, validate_name, validate_password, validate_price,
    validate_required, FieldError, ValidationReport,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Plain message body, used for errors and delete confirmations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// Field-level validation failure body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldError>,
}

// ============================================================================
// Authentication Types
// ============================================================================

/// Registration request
///
/// Missing fields deserialize as empty strings so they surface as
/// field errors rather than body rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut report = ValidationReport::default();
        report
            .check("name", validate_name(&self.name))
            .check("email", validate_email(self.email.trim()))
            .check("password", validate_password(&self.password));
        report.finish()
    }
}

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// The authenticated user, never carrying the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile image reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImageResponse {
    pub profile_image_url: Option<String>,
}

// ============================================================================
// Hotel Types
// ============================================================================

/// Raw hotel fields as submitted in a multipart form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HotelForm {
    pub name: String,
    pub email: String,
    pub address: String,
    pub price: String,
    pub phone_number: String,
    pub currency: String,
}

impl HotelForm {
    /// Check every field and produce a typed draft
    pub fn validate(&self) -> Result<HotelDraft, Vec<FieldError>> {
        let mut report = ValidationReport::default();
        report
            .check("name", validate_required(&self.name, "hotel name is required"))
            .check("email", validate_email(self.email.trim()))
            .check("address", validate_required(&self.address, "address is required"))
            .check(
                "phoneNumber",
                validate_required(&self.phone_number, "phone number is required"),
            )
            .check("currency", validate_required(&self.currency, "currency is required"));

        let price = report.parse("price", validate_price(&self.price));
        report.finish()?;

        Ok(HotelDraft {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            // finish() rejects a failed price parse above
            price: price.unwrap_or_default(),
            phone_number: self.phone_number.trim().to_string(),
            currency: self.currency.trim().to_uppercase(),
        })
    }
}

/// Validated hotel content, ready for persistence
#[derive(Debug, Clone, PartialEq)]
pub struct HotelDraft {
    pub name: String,
    pub email: String,
    pub address: String,
    pub price: Decimal,
    pub phone_number: String,
    pub currency: String,
}

/// Hotel listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub price: Decimal,
    pub phone_number: String,
    pub currency: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Text Note Types
// ============================================================================

/// Create or replace a text note
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteRequest {
    pub content: String,
}

impl NoteRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut report = ValidationReport::default();
        report.check("content", validate_content(&self.content));
        report.finish()
    }
}

/// Text note response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: String,
    pub owner_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn hotel_form() -> HotelForm {
        HotelForm {
            name: " Seaside Inn ".to_string(),
            email: "desk@seaside.example".to_string(),
            address: "1 Harbour Road".to_string(),
            price: "120.50".to_string(),
            phone_number: "+33 1 23 45 67 89".to_string(),
            currency: "eur".to_string(),
        }
    }

    #[test]
    fn test_register_request_missing_fields_default_to_empty() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert_eq!(req.name, "");
        assert_eq!(req.password, "");

        let errors = req.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "password"]);
    }

    #[test]
    fn test_register_request_valid() {
        let req = RegisterRequest {
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            password: "secret123".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_hotel_form_produces_trimmed_draft() {
        let draft = hotel_form().validate().unwrap();
        assert_eq!(draft.name, "Seaside Inn");
        assert_eq!(draft.price, Decimal::from_str("120.50").unwrap());
        assert_eq!(draft.currency, "EUR");
    }

    #[test]
    fn test_hotel_form_reports_every_bad_field() {
        let form = HotelForm {
            email: "not-an-email".to_string(),
            price: "cheap".to_string(),
            ..HotelForm::default()
        };

        let errors = form.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["name", "email", "address", "phoneNumber", "currency", "price"]
        );
    }

    #[test]
    fn test_user_response_uses_camel_case() {
        let body = serde_json::to_value(UserResponse {
            id: "1".to_string(),
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            profile_image_url: None,
            created_at: Utc::now(),
        })
        .unwrap();

        assert!(body.get("profileImageUrl").is_some());
        assert!(body.get("createdAt").is_some());
        assert!(body.get("password").is_none());
    }

    #[test]
    fn test_note_request_rejects_blank_content() {
        let req = NoteRequest {
            content: "   ".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
