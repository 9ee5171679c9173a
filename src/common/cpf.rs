// src/common/cpf.rs

use validator::ValidationError;

/// Mantém só os dígitos: "123.456.789-09" -> "12345678909".
pub fn normalize_cpf(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

// Usado via `#[validate(custom(function = "validate_cpf"))]`.
// Aceita o CPF formatado ou não, desde que tenha 11 dígitos.
pub fn validate_cpf(raw: &str) -> Result<(), ValidationError> {
    let digits = normalize_cpf(raw);
    let only_allowed_chars = raw
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | ' '));

    if digits.len() == 11 && only_allowed_chars {
        Ok(())
    } else {
        let mut err = ValidationError::new("cpf");
        err.message = Some("O CPF deve conter 11 dígitos.".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_and_plain_cpf_normalize_to_same_digits() {
        assert_eq!(normalize_cpf("123.456.789-09"), "12345678909");
        assert_eq!(normalize_cpf("12345678909"), "12345678909");
    }

    #[test]
    fn rejects_short_or_lettered_cpf() {
        assert!(validate_cpf("123.456.789-09").is_ok());
        assert!(validate_cpf("1234567890").is_err());
        assert!(validate_cpf("1234567890a9").is_err());
    }
}
