//! Input validation utilities
//!
//! Every request body is turned into a typed, validated value here before
//! any store or blob call is made. A failure short-circuits with no side
//! effects.

use base64::{Engine, engine::general_purpose::STANDARD};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CreateOrderRequest, LineItem, LoginRequest, NewOrder, RegisterRequest, UploadRequest};

/// Largest accepted decoded profile picture
pub const PROFILE_PICTURE_MAX_BYTES: usize = 1024 * 1024;

/// Largest accepted decoded product image
pub const PRODUCT_IMAGE_MAX_BYTES: usize = 5 * 1024 * 1024;

const PROFILE_PICTURE_SUBTYPES: [&str; 3] = ["jpeg", "jpg", "png"];

/// Validation failure
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Malformed, missing or out-of-range input
    #[error("{0}")]
    Invalid(String),

    /// Decoded payload over the size limit
    #[error("{0}")]
    TooLarge(String),
}

fn invalid(message: &str) -> ValidationError {
    ValidationError::Invalid(message.to_string())
}

/// Image payload decoded from a data URI
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Lower-cased media subtype, e.g. `png`
    pub subtype: String,
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    pub fn content_type(&self) -> String {
        format!("image/{}", self.subtype)
    }

    /// File extension used for the blob key
    pub fn extension(&self) -> &str {
        &self.subtype
    }
}

fn data_uri_regex() -> &'static Regex {
    static DATA_URI_REGEX: OnceLock<Regex> = OnceLock::new();
    DATA_URI_REGEX.get_or_init(|| {
        Regex::new(r"^data:image/([A-Za-z0-9.+-]+);base64,").expect("Failed to compile data URI regex")
    })
}

/// Split an `data:image/<subtype>;base64,<payload>` string and decode it
pub fn decode_data_uri(input: &str) -> Result<DecodedImage, ValidationError> {
    let captures = data_uri_regex()
        .captures(input)
        .ok_or_else(|| invalid("Invalid image format"))?;

    let (Some(prefix), Some(subtype)) = (captures.get(0), captures.get(1)) else {
        return Err(invalid("Invalid image format"));
    };

    // Wrapped payloads carry line breaks between base64 groups
    let payload: String = input[prefix.end()..]
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = STANDARD
        .decode(payload)
        .map_err(|_| invalid("Invalid base64 image data"))?;

    Ok(DecodedImage {
        subtype: subtype.as_str().to_ascii_lowercase(),
        bytes,
    })
}

/// Validate an optional profile picture: JPEG/JPG/PNG, at most 1 MiB decoded
pub fn validate_profile_picture(input: &str) -> Result<DecodedImage, ValidationError> {
    let decoded = decode_data_uri(input).map_err(|e| match e {
        ValidationError::Invalid(msg) if msg == "Invalid image format" => {
            invalid("Invalid image format. Only JPEG, JPG, and PNG are allowed")
        }
        other => other,
    })?;

    if !PROFILE_PICTURE_SUBTYPES.contains(&decoded.subtype.as_str()) {
        return Err(invalid(
            "Invalid image format. Only JPEG, JPG, and PNG are allowed",
        ));
    }

    if decoded.bytes.len() > PROFILE_PICTURE_MAX_BYTES {
        return Err(ValidationError::TooLarge(
            "Profile picture must be less than 1MB".to_string(),
        ));
    }

    Ok(decoded)
}

/// Validate a product image: any image subtype, at most 5 MiB decoded
pub fn validate_product_image(input: &str) -> Result<DecodedImage, ValidationError> {
    let decoded = decode_data_uri(input)?;

    if decoded.bytes.len() > PRODUCT_IMAGE_MAX_BYTES {
        return Err(ValidationError::TooLarge(
            "Image size must be less than 5MB".to_string(),
        ));
    }

    Ok(decoded)
}

/// Trimmed, non-empty text or `None`
fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Accept a JSON number or numeric string that is finite and `>= 0`
pub fn parse_non_negative_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    (number.is_finite() && number >= 0.0).then_some(number)
}

/// Accept a JSON number with no fractional part that is `>= 1`; `2.0` counts
pub fn parse_positive_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return (n >= 1).then_some(n);
    }

    let n = value.as_f64()?;
    (n.is_finite() && n.fract() == 0.0 && n >= 1.0 && n <= i64::MAX as f64).then_some(n as i64)
}

/// Parse a record identifier
pub fn parse_id(raw: &str, message: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw.trim()).map_err(|_| invalid(message))
}

/// Validated registration payload
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRegistration {
    pub first_name: String,
    pub second_name: String,
    pub email: String,
    pub password: String,
    pub profile_picture: String,
}

/// Validate a user or admin registration
pub fn validate_registration(
    request: &RegisterRequest,
) -> Result<ValidRegistration, ValidationError> {
    let (Some(first_name), Some(second_name), Some(email), Some(password)) = (
        present(&request.first_name),
        present(&request.second_name),
        present(&request.email),
        request.password.clone().filter(|p| !p.is_empty()),
    ) else {
        return Err(invalid("All fields are required"));
    };

    let profile_picture = match present(&request.profile_picture) {
        Some(picture) => {
            validate_profile_picture(&picture)?;
            picture
        }
        None => String::new(),
    };

    Ok(ValidRegistration {
        first_name,
        second_name,
        email,
        password,
        profile_picture,
    })
}

/// Validated login payload
#[derive(Debug, Clone, PartialEq)]
pub struct ValidLogin {
    pub email: String,
    pub password: String,
}

/// Validate a login request
pub fn validate_login(request: &LoginRequest) -> Result<ValidLogin, ValidationError> {
    match (
        present(&request.email),
        request.password.clone().filter(|p| !p.is_empty()),
    ) {
        (Some(email), Some(password)) => Ok(ValidLogin { email, password }),
        _ => Err(invalid("Email and password are required")),
    }
}

/// Validated image upload
#[derive(Debug, Clone, PartialEq)]
pub struct ValidUpload {
    pub image: DecodedImage,
    pub name: String,
    pub price: f64,
    pub description: String,
}

/// Validate an image upload request
pub fn validate_upload(request: &UploadRequest) -> Result<ValidUpload, ValidationError> {
    let price_given = request
        .price
        .as_ref()
        .filter(|v| !v.is_null() && v.as_str().is_none_or(|s| !s.trim().is_empty()));

    let (Some(image), Some(name), Some(price)) =
        (present(&request.image), present(&request.name), price_given)
    else {
        return Err(invalid("Image, name, and price are required"));
    };

    let price = parse_non_negative_number(price)
        .ok_or_else(|| invalid("Price must be a non-negative number"))?;

    let image = validate_product_image(&image)?;

    Ok(ValidUpload {
        image,
        name,
        price,
        description: present(&request.description).unwrap_or_default(),
    })
}

/// Shape-validate an order: required fields, id syntax, quantities, amount
pub fn validate_order(request: &CreateOrderRequest) -> Result<NewOrder, ValidationError> {
    let (Some(user_id), Some(products), Some(name), Some(address), Some(payment_type), Some(amount)) = (
        present(&request.user_id),
        request.products.as_ref(),
        present(&request.name),
        present(&request.address),
        present(&request.payment_type),
        request.amount.as_ref().filter(|v| !v.is_null()),
    ) else {
        return Err(invalid("All fields are required"));
    };

    if products.is_empty() {
        return Err(invalid("Products must be a non-empty array"));
    }

    let user_id = parse_id(&user_id, "Invalid user id")?;

    let products = products
        .iter()
        .map(|item| {
            let product_id = item
                .product_id
                .as_deref()
                .ok_or_else(|| invalid("Invalid product id"))
                .and_then(|raw| parse_id(raw, "Invalid product id"))?;

            let quantity = item
                .quantity
                .as_ref()
                .and_then(parse_positive_integer)
                .ok_or_else(|| invalid("Quantity must be a positive integer"))?;

            Ok(LineItem {
                product_id,
                quantity,
            })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    let amount = parse_non_negative_number(amount)
        .ok_or_else(|| invalid("Amount must be a non-negative number"))?;

    Ok(NewOrder {
        user_id,
        products,
        name,
        address,
        payment_type,
        amount,
    })
}
