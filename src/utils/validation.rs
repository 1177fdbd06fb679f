use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

pub const PHONE_MESSAGE: &str =
    "Phone number should only contain digits and +, -, (, ) characters.";
pub const PRICE_MESSAGE: &str = "Price must be greater than 0.";
pub const QUANTITY_MESSAGE: &str = "Quantity must be at least 1.";
pub const EMPTY_ORDER_MESSAGE: &str = "Order must have at least one item.";

const MAX_PRICE_INTEGER_DIGITS: u32 = 8;

fn invalid(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// A payload referenced a row by id that does not exist.
pub fn missing_reference(id: i64) -> ValidationError {
    invalid(
        "does_not_exist",
        format!("Invalid pk \"{}\" - object does not exist.", id),
    )
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Separators (space, `-`, `(`, `)`, `+`) are allowed anywhere; what remains
/// must be digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() {
        return Ok(());
    }
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '+'))
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("phone", PHONE_MESSAGE));
    }
    Ok(())
}

/// Fits `NUMERIC(10, 2)` and is strictly positive.
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(invalid("price", PRICE_MESSAGE));
    }
    let normalized = price.normalize();
    if normalized.scale() > 2 {
        return Err(invalid(
            "max_decimal_places",
            "Ensure that there are no more than 2 decimal places.",
        ));
    }
    if normalized.trunc() >= Decimal::from(10_i64.pow(MAX_PRICE_INTEGER_DIGITS)) {
        return Err(invalid(
            "max_whole_digits",
            "Ensure that there are no more than 8 digits before the decimal point.",
        ));
    }
    Ok(())
}
