//! Client-side form validation errors.

use thiserror::Error;

/// A form failed validation before any request was sent.
///
/// `field` names the offending wire field; the message is ready to show
/// inline next to the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Parse a non-negative integer typed into a form field.
///
/// Blank input yields `None` so the caller can apply its own default.
pub fn parse_non_negative(
    field: &'static str,
    label: &str,
    raw: &str,
) -> Result<Option<u32>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<i64>() {
        Ok(n) if n < 0 => Err(ValidationError::new(
            field,
            format!("{} no puede ser negativo.", label),
        )),
        Ok(n) => u32::try_from(n)
            .map(Some)
            .map_err(|_| ValidationError::new(field, format!("{} es demasiado grande.", label))),
        Err(_) => Err(ValidationError::new(
            field,
            format!("{} debe ser un número.", label),
        )),
    }
}

/// Parse a strictly positive integer typed into a form field.
pub fn parse_positive(field: &'static str, message: &str, raw: &str) -> Result<u32, ValidationError> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => {
            u32::try_from(n).map_err(|_| ValidationError::new(field, message.to_string()))
        }
        _ => Err(ValidationError::new(field, message.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_message() {
        let err = ValidationError::new("descripcion", "La descripción es obligatoria.");
        assert_eq!(err.to_string(), "La descripción es obligatoria.");
        assert_eq!(err.field, "descripcion");
    }

    #[test]
    fn test_parse_non_negative() {
        assert_eq!(parse_non_negative("cantidad", "La cantidad", "5").unwrap(), Some(5));
        assert_eq!(parse_non_negative("cantidad", "La cantidad", " 0 ").unwrap(), Some(0));
        assert_eq!(parse_non_negative("cantidad", "La cantidad", "  ").unwrap(), None);

        let err = parse_non_negative("cantidad", "La cantidad", "-1").unwrap_err();
        assert_eq!(err.field, "cantidad");
        assert!(err.message.contains("negativo"));

        let err = parse_non_negative("minimo", "El mínimo", "abc").unwrap_err();
        assert_eq!(err.field, "minimo");
        assert!(err.message.contains("número"));
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("prestado", "mal", "3").unwrap(), 3);
        assert!(parse_positive("prestado", "mal", "0").is_err());
        assert!(parse_positive("prestado", "mal", "-2").is_err());
        assert!(parse_positive("prestado", "mal", "").is_err());
        assert!(parse_positive("prestado", "mal", "x").is_err());
    }
}
