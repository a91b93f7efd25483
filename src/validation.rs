use crate::error::{AppError, AppResult};

/// Trimmed, non-empty text field.
pub fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{field} is required")));
    }
    Ok(value.to_string())
}

pub fn non_negative(field: &str, value: i64) -> AppResult<()> {
    if value < 0 {
        return Err(AppError::bad_request(format!("{field} cannot be negative")));
    }
    Ok(())
}

pub fn positive(field: &str, value: i32) -> AppResult<()> {
    if value <= 0 {
        return Err(AppError::bad_request(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(())
}

pub fn percent(field: &str, value: i32) -> AppResult<()> {
    if !(1..=100).contains(&value) {
        return Err(AppError::bad_request(format!(
            "{field} must be between 1 and 100"
        )));
    }
    Ok(())
}

pub fn rating(value: i16) -> AppResult<()> {
    if !(1..=5).contains(&value) {
        return Err(AppError::bad_request("rating must be between 1 and 5"));
    }
    Ok(())
}

pub fn email(value: &str) -> AppResult<String> {
    let value = required("email", value)?.to_lowercase();
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(value),
        _ => Err(AppError::bad_request("email is invalid")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("name", "  Shoes ").unwrap(), "Shoes");
        assert!(required("name", "   ").is_err());
    }

    #[test]
    fn ranges_are_inclusive() {
        assert!(percent("discount_percent", 1).is_ok());
        assert!(percent("discount_percent", 100).is_ok());
        assert!(percent("discount_percent", 0).is_err());
        assert!(rating(5).is_ok());
        assert!(rating(6).is_err());
        assert!(positive("quantity", 0).is_err());
        assert!(non_negative("price", 0).is_ok());
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(email(" Ada@Example.COM ").unwrap(), "ada@example.com");
        assert!(email("not-an-email").is_err());
        assert!(email("@example.com").is_err());
    }
}
