//! Request validation
//!
//! Query and path DTOs with their validation rules, and the extractors that
//! reject a request before the handler runs.

use std::borrow::Cow;
use std::sync::LazyLock;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::error::ApiError;
use crate::models::SearchCriteria;

/// Two or three ASCII letters.
static COUNTRY_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2,3}$").unwrap());

pub const INVALID_CODE_MESSAGE: &str = "Invalid country code format.";
pub const CODES_REQUIRED_MESSAGE: &str = "Codes parameter is required.";
pub const COMPARE_COUNT_MESSAGE: &str =
    "Please provide exactly two country codes separated by a comma.";
pub const COMPARE_CODE_MESSAGE: &str = "Each country code must be 2 or 3 alphabetic characters.";

// == Extractors ==

/// Path parameters that passed validation.
#[derive(Debug)]
pub struct ValidatedPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query parameters that passed validation.
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

// == Country Code ==

/// `/api/countries/:code`
#[derive(Debug, Deserialize, Validate)]
pub struct CountryCodePath {
    #[validate(custom(function = "validate_country_code"))]
    pub code: String,
}

fn validate_country_code(value: &str) -> Result<(), ValidationError> {
    if COUNTRY_CODE_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(field_error("regex", INVALID_CODE_MESSAGE))
    }
}

// == Search ==

/// `/api/countries/search` query string.
///
/// Numbers arrive as strings so that a bad value becomes a field error
/// instead of an opaque deserialization failure.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SearchParams {
    pub name: Option<String>,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub timezone: Option<String>,
    #[validate(custom(function = "validate_page"))]
    pub page: Option<String>,
    #[validate(custom(function = "validate_limit"))]
    pub limit: Option<String>,
}

impl SearchParams {
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria::new(
            self.name.as_deref(),
            self.capital.as_deref(),
            self.region.as_deref(),
            self.timezone.as_deref(),
            parse_positive(self.page.as_deref()),
            parse_positive(self.limit.as_deref()),
        )
    }
}

fn parse_positive(value: Option<&str>) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n >= 1)
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn positive_integer(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_positive(Some(value)).is_some() {
        Ok(())
    } else {
        Err(field_error("positive_integer", message))
    }
}

fn validate_page(value: &str) -> Result<(), ValidationError> {
    positive_integer(value, "Page must be a positive integer.")
}

fn validate_limit(value: &str) -> Result<(), ValidationError> {
    positive_integer(value, "Limit must be a positive integer.")
}

// == Compare ==

/// `/api/countries/compare` query string.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CompareParams {
    #[serde(default)]
    #[validate(custom(function = "validate_compare_codes"))]
    pub codes: String,
}

impl CompareParams {
    /// The two requested codes, upper-cased, in request order.
    pub fn code_pair(&self) -> Option<(String, String)> {
        let mut codes = self.codes.split(',').map(str::to_uppercase);
        match (codes.next(), codes.next(), codes.next()) {
            (Some(first), Some(second), None) => Some((first, second)),
            _ => None,
        }
    }
}

fn validate_compare_codes(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(field_error("required", CODES_REQUIRED_MESSAGE));
    }
    let codes: Vec<&str> = value.split(',').collect();
    if codes.len() != 2 {
        return Err(field_error("code_count", COMPARE_COUNT_MESSAGE));
    }
    if !codes.iter().all(|code| COUNTRY_CODE_REGEX.is_match(code)) {
        return Err(field_error("code_format", COMPARE_CODE_MESSAGE));
    }
    Ok(())
}
