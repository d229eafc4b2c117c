//! Receipt file validation.
//!
//! Runs before any upload work starts: only image files are accepted, and
//! the original must fit under the pre-compression size ceiling.

use std::path::Path;

/// Validation errors for receipt files. The Display text is surfaced to
/// the user verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File is too large ({size_mb:.1} MB). Receipts are limited to {max_mb} MB.")]
    FileTooLarge { size_mb: f64, max_mb: usize },

    #[error("Unsupported file type: .{extension}. Please upload an image (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Not an image: {content_type}. Please upload a photo of your receipt.")]
    InvalidContentType { content_type: String },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("The selected file is empty.")]
    EmptyFile,
}

/// Receipt file validator.
///
/// Holds the limits from configuration so callers do not re-derive them
/// at each selection.
pub struct ReceiptValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl ReceiptValidator {
    pub fn new(
        max_file_size: usize,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
            allowed_content_types,
        }
    }

    pub fn from_config(config: &forkbill_core::Config) -> Self {
        Self::new(
            config.max_file_size_bytes,
            config.allowed_extensions.clone(),
            config.allowed_content_types.clone(),
        )
    }

    /// Validate file size against the pre-compression ceiling.
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size_mb: size as f64 / (1024.0 * 1024.0),
                max_mb: self.max_file_size / (1024 * 1024),
            });
        }

        Ok(())
    }

    /// Validate file extension.
    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    /// Validate content type. Anything outside `image/*` (and the allowed
    /// list) is rejected.
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.to_lowercase();

        if !normalized.starts_with("image/")
            || !self
                .allowed_content_types
                .iter()
                .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }

    /// Validate that the content type agrees with the file extension, so a
    /// renamed non-image cannot slip through with a legitimate type.
    pub fn validate_extension_content_type_match(
        &self,
        filename: &str,
        content_type: &str,
    ) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        let normalized = content_type.to_lowercase();

        let expected: &[&str] = match extension.as_str() {
            "jpg" | "jpeg" => &["image/jpeg"],
            "png" => &["image/png"],
            "webp" => &["image/webp"],
            "heic" => &["image/heic", "image/heif"],
            "gif" => &["image/gif"],
            _ => {
                // Unknown extensions were already rejected individually;
                // skip cross-validation for anything else.
                tracing::debug!(
                    extension = %extension,
                    content_type = %content_type,
                    "Unknown extension, skipping content-type cross-validation"
                );
                return Ok(());
            }
        };

        if !expected.iter().any(|ct| *ct == normalized) {
            return Err(ValidationError::InvalidContentType {
                content_type: format!(
                    "{} (does not match extension '{}')",
                    content_type, extension
                ),
            });
        }

        Ok(())
    }

    /// Validate all aspects of a receipt file.
    pub fn validate_all(
        &self,
        filename: &str,
        content_type: &str,
        file_size: usize,
    ) -> Result<(), ValidationError> {
        self.validate_file_size(file_size)?;
        self.validate_extension(filename)?;
        self.validate_content_type(content_type)?;
        self.validate_extension_content_type_match(filename, content_type)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> ReceiptValidator {
        ReceiptValidator::new(
            10 * 1024 * 1024,
            vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            vec!["image/jpeg".to_string(), "image/png".to_string()],
        )
    }

    #[test]
    fn test_validate_file_size_ok() {
        let validator = test_validator();
        assert!(validator.validate_file_size(4 * 1024 * 1024).is_ok());
    }

    #[test]
    fn test_validate_file_size_too_large() {
        let validator = test_validator();
        let err = validator.validate_file_size(12 * 1024 * 1024).unwrap_err();
        assert!(err.to_string().contains("10 MB"));
    }

    #[test]
    fn test_validate_file_size_empty() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate_file_size(0),
            Err(ValidationError::EmptyFile)
        ));
    }

    #[test]
    fn test_validate_extension() {
        let validator = test_validator();
        assert!(validator.validate_extension("receipt.jpg").is_ok());
        assert!(validator.validate_extension("receipt.PNG").is_ok()); // case insensitive
        assert!(validator.validate_extension("receipt.pdf").is_err());
        assert!(validator.validate_extension("noextension").is_err());
    }

    #[test]
    fn test_validate_content_type() {
        let validator = test_validator();
        assert!(validator.validate_content_type("image/jpeg").is_ok());
        assert!(validator.validate_content_type("IMAGE/PNG").is_ok()); // case insensitive
        assert!(validator.validate_content_type("application/pdf").is_err());
        // image/* but outside the allowed list
        assert!(validator.validate_content_type("image/tiff").is_err());
    }

    #[test]
    fn test_validate_extension_content_type_match() {
        let validator = test_validator();
        assert!(validator
            .validate_extension_content_type_match("receipt.jpg", "image/jpeg")
            .is_ok());
        assert!(validator
            .validate_extension_content_type_match("receipt.jpeg", "image/jpeg")
            .is_ok());
        assert!(validator
            .validate_extension_content_type_match("receipt.jpg", "image/png")
            .is_err());
        assert!(validator
            .validate_extension_content_type_match("receipt.PNG", "IMAGE/PNG")
            .is_ok());
    }

    #[test]
    fn test_validate_all() {
        let validator = test_validator();
        assert!(validator
            .validate_all("receipt.jpg", "image/jpeg", 512 * 1024)
            .is_ok());
        assert!(validator
            .validate_all("receipt.jpg", "image/jpeg", 11 * 1024 * 1024)
            .is_err());
        assert!(validator
            .validate_all("receipt.pdf", "application/pdf", 512 * 1024)
            .is_err());
    }
}
