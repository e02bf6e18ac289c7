//! Request body validation.
//!
//! Validators run every rule and return all violations at once; nothing is
//! persisted unless the whole input is valid.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::{NewBeer, NewBrewery};
use crate::error::{ApiError, FieldError};

/// Every rule an input broke
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::unprocessable_entity("Validation failed", errors.0)
    }
}

/// Body of `POST /users` and `PUT /users/:username`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserInput {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<String>,
}

/// User fields that passed validation; the password is still plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
}

pub fn validate_user(input: UserInput, min_username_length: usize) -> Result<ValidUser, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let username = input.username.unwrap_or_default().trim().to_string();
    if username.chars().count() < min_username_length {
        errors.push(
            "username",
            format!("username is required and must be at least {min_username_length} characters"),
        );
    }
    if !username.is_empty() && !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push("username", "username contains non alphanumeric characters - not allowed");
    }

    let password = input.password.unwrap_or_default();
    if password.is_empty() {
        errors.push("password", "password is required");
    }

    let email = input.email.unwrap_or_default().trim().to_string();
    if !is_valid_email(&email) {
        errors.push("email", "email does not appear to be valid");
    }

    let birthday = match input.birthday.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match parse_date(raw) {
            Some(date) => Some(date),
            None => {
                errors.push("birthday", "birthday must be a date formatted YYYY-MM-DD");
                None
            }
        },
    };

    errors.into_result(|| ValidUser {
        username,
        password,
        email,
        birthday,
    })
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (date part kept).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.date_naive())
    })
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    });
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic));

    labels_ok && tld_ok
}

/// Body of `POST /beers`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BeerInput {
    pub name: Option<String>,
    pub style: Option<String>,
    pub abv: Option<f64>,
    pub categories: Vec<String>,
    pub malts: Vec<String>,
    pub hops: Vec<String>,
    pub flavor_notes: Vec<String>,
}

pub fn validate_beer(input: BeerInput) -> Result<NewBeer, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = input.name.unwrap_or_default().trim().to_string();
    if name.is_empty() {
        errors.push("name", "name is required");
    }
    if let Some(abv) = input.abv {
        if !abv.is_finite() || !(0.0..=100.0).contains(&abv) {
            errors.push("abv", "abv must be a percentage between 0 and 100");
        }
    }

    errors.into_result(|| NewBeer {
        name,
        style: input.style,
        abv: input.abv,
        categories: input.categories,
        malts: input.malts,
        hops: input.hops,
        flavor_notes: input.flavor_notes,
    })
}

/// Body of `POST /breweries`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BreweryInput {
    pub company_name: Option<String>,
    pub owner: Option<String>,
    pub admins: Vec<Uuid>,
    pub staff: Vec<Uuid>,
    pub beers: Vec<Uuid>,
    pub categories: Vec<String>,
}

pub fn validate_brewery(input: BreweryInput) -> Result<NewBrewery, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let company_name = input.company_name.unwrap_or_default().trim().to_string();
    if company_name.is_empty() {
        errors.push("company_name", "company_name is required");
    }

    errors.into_result(|| NewBrewery {
        company_name,
        owner: input.owner,
        admins: input.admins,
        staff: input.staff,
        beers: input.beers,
        categories: input.categories,
    })
}
