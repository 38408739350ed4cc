use crate::utils::error::{ListingError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ListingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ListingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ListingError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ListingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 類別標籤必須非空且不重複；"all" 保留給「不篩選」
pub fn validate_category_labels(field_name: &str, labels: &[String]) -> Result<()> {
    if labels.is_empty() {
        return Err(ListingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: "[]".to_string(),
            reason: "At least one category is required".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for label in labels {
        validate_non_empty_string(field_name, label)?;
        if label.eq_ignore_ascii_case(crate::domain::model::ALL_CATEGORIES) {
            return Err(ListingError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: label.clone(),
                reason: "'all' is reserved for the no-filter option".to_string(),
            });
        }
        if !seen.insert(label.as_str()) {
            return Err(ListingError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: label.clone(),
                reason: "Duplicate category label".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ListingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("catalog.path", "./services.json").is_ok());
        assert!(validate_path("catalog.path", "").is_err());
        assert!(validate_path("catalog.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("listing.debounce_ms", 300u64, 0, 5_000).is_ok());
        assert!(validate_range("listing.debounce_ms", 10_000u64, 0, 5_000).is_err());
    }

    #[test]
    fn test_validate_category_labels() {
        let labels = vec!["Desain Grafis".to_string(), "Bisnis".to_string()];
        assert!(validate_category_labels("categories", &labels).is_ok());

        let duplicated = vec!["Bisnis".to_string(), "Bisnis".to_string()];
        assert!(validate_category_labels("categories", &duplicated).is_err());

        let reserved = vec!["All".to_string()];
        assert!(validate_category_labels("categories", &reserved).is_err());

        assert!(validate_category_labels("categories", &[]).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(5);
        assert_eq!(*validate_required_field("x", &present).unwrap(), 5);
        let missing: Option<u32> = None;
        assert!(validate_required_field("x", &missing).is_err());
    }
}
