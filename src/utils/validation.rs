use crate::utils::error::{ContactError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 檢查聯絡人欄位是否存在，回傳借用的值
pub fn validate_present_field<'a>(field_name: &str, value: Option<&'a str>) -> Result<&'a str> {
    value.ok_or_else(|| ContactError::InvalidContactInput {
        field: field_name.to_string(),
        reason: "cannot be null".to_string(),
    })
}

pub fn validate_non_blank_field(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ContactError::InvalidContactInput {
            field: field_name.to_string(),
            reason: "cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
