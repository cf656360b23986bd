//! Authentication primitives: login credentials and registration requests.
//!
//! Inbound adapters build these from raw strings so handlers only ever pass
//! validated values to the login port.

use std::fmt;

use zeroize::Zeroizing;

use super::NewUser;

/// Maximum username length accepted at registration.
pub const USERNAME_MAX: usize = 150;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty; surrounding whitespace is preserved.
///
/// # Examples
/// ```
/// use taskboard::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "s3cret").expect("valid credentials");
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for lookups.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Reasons a registration request is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Username blank once trimmed.
    EmptyUsername,
    /// Username longer than [`USERNAME_MAX`] characters.
    UsernameTooLong { max: usize },
    /// Email lacks a single `@` separating non-empty parts.
    InvalidEmail,
    /// The first password was blank.
    EmptyPassword,
    /// `password1` and `password2` differ.
    PasswordMismatch,
}

impl RegistrationError {
    /// Payload field the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::UsernameTooLong { .. } => "username",
            Self::InvalidEmail => "email",
            Self::EmptyPassword => "password1",
            Self::PasswordMismatch => "password2",
        }
    }

    /// Machine-readable code for the error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::EmptyPassword => "blank",
            Self::UsernameTooLong { .. } => "too_long",
            Self::InvalidEmail => "invalid_email",
            Self::PasswordMismatch => "password_mismatch",
        }
    }
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::InvalidEmail => write!(f, "Enter a valid email address."),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordMismatch => write!(f, "The two password fields didn't match."),
        }
    }
}

impl std::error::Error for RegistrationError {}

/// Raw registration fields as received from a client.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationInput<'a> {
    /// Requested username.
    pub username: &'a str,
    /// Contact address; may be empty.
    pub email: &'a str,
    /// Given name.
    pub first_name: &'a str,
    /// Family name.
    pub last_name: &'a str,
    /// Chosen password.
    pub password1: &'a str,
    /// Confirmation of the chosen password.
    pub password2: &'a str,
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    user: NewUser,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration fields.
    ///
    /// # Examples
    /// ```
    /// use taskboard::domain::{Registration, RegistrationError, RegistrationInput};
    ///
    /// let input = RegistrationInput {
    ///     username: "ada",
    ///     email: "ada@example.com",
    ///     first_name: "",
    ///     last_name: "",
    ///     password1: "pw-one",
    ///     password2: "pw-two",
    /// };
    /// assert_eq!(Registration::try_new(input), Err(RegistrationError::PasswordMismatch));
    /// ```
    pub fn try_new(input: RegistrationInput<'_>) -> Result<Self, RegistrationError> {
        let username = input.username.trim();
        if username.is_empty() {
            return Err(RegistrationError::EmptyUsername);
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(RegistrationError::UsernameTooLong { max: USERNAME_MAX });
        }
        let email = input.email.trim();
        if !email.is_empty() && !is_plausible_email(email) {
            return Err(RegistrationError::InvalidEmail);
        }
        if input.password1.is_empty() {
            return Err(RegistrationError::EmptyPassword);
        }
        if input.password1 != input.password2 {
            return Err(RegistrationError::PasswordMismatch);
        }

        Ok(Self {
            user: NewUser {
                username: username.to_owned(),
                email: email.to_owned(),
                first_name: input.first_name.trim().to_owned(),
                last_name: input.last_name.trim().to_owned(),
            },
            password: Zeroizing::new(input.password1.to_owned()),
        })
    }

    /// Identity fields for the new user row.
    pub fn user(&self) -> &NewUser {
        &self.user
    }

    /// Username requested by the caller.
    pub fn username(&self) -> &str {
        &self.user.username
    }

    /// Confirmed password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        _ => false,
    }
}
