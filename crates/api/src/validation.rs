//! Field-level validation helpers layered on top of `validator`.
//!
//! Derived `Validate` impls cover the declarative rules (length, email,
//! url). [`FieldErrors`] collects the rest (required fields, enum
//! membership, typed values arriving as multipart text) into the same
//! [`ValidationErrors`] so the client gets one combined list.

use std::borrow::Cow;
use std::str::FromStr;

use haosenyi_core::error::CoreError;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;

/// Accumulates field errors until [`FieldErrors::finish`] is called.
#[derive(Debug)]
pub struct FieldErrors {
    errors: ValidationErrors,
}

impl Default for FieldErrors {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldErrors {
    pub fn new() -> Self {
        Self {
            errors: ValidationErrors::new(),
        }
    }

    /// Start from the derived rules of `input`.
    pub fn validate<T: Validate>(input: &T) -> Self {
        Self {
            errors: input.validate().err().unwrap_or_else(ValidationErrors::new),
        }
    }

    /// Record a failure for `field`.
    pub fn add(
        &mut self,
        field: &'static str,
        code: &'static str,
        message: impl Into<Cow<'static, str>>,
    ) {
        let mut error = ValidationError::new(code);
        error.message = Some(message.into());
        self.errors.add(field, error);
    }

    /// Record "`field` is required" when `value` is missing.
    pub fn require<T>(&mut self, field: &'static str, value: &Option<T>, message: &'static str) {
        if value.is_none() {
            self.add(field, "required", message);
        }
    }

    /// Trimmed text of `field`.
    ///
    /// A blank value is always an error. A missing one is an error only when
    /// `required` is set (creates), and is skipped otherwise (partial updates).
    pub fn text(
        &mut self,
        field: &'static str,
        raw: Option<&str>,
        required: bool,
        message: &'static str,
    ) -> Option<String> {
        match raw.map(str::trim) {
            Some(value) if !value.is_empty() => Some(value.to_string()),
            Some(_) => {
                self.add(field, "required", message);
                None
            }
            None => {
                if required {
                    self.add(field, "required", message);
                }
                None
            }
        }
    }

    /// Parse an optional closed-enum value, recording the parse failure message.
    pub fn parse<T>(&mut self, field: &'static str, raw: Option<&str>) -> Option<T>
    where
        T: FromStr<Err = CoreError>,
    {
        match raw?.parse::<T>() {
            Ok(value) => Some(value),
            Err(CoreError::Validation(message)) => {
                self.add(field, "invalid", message);
                None
            }
            Err(other) => {
                self.add(field, "invalid", other.to_string());
                None
            }
        }
    }

    /// Parse an optional boolean sent as `true`/`false`.
    pub fn parse_bool(
        &mut self,
        field: &'static str,
        raw: Option<&str>,
        message: &'static str,
    ) -> Option<bool> {
        match raw? {
            "true" => Some(true),
            "false" => Some(false),
            _ => {
                self.add(field, "boolean", message);
                None
            }
        }
    }

    /// Parse an optional integer.
    pub fn parse_int<T: FromStr>(
        &mut self,
        field: &'static str,
        raw: Option<&str>,
        message: &'static str,
    ) -> Option<T> {
        match raw?.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.add(field, "integer", message);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.errors().is_empty()
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation [`AppError`].
    pub fn finish(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

/// Trim `value`, mapping blank strings to `None`.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
