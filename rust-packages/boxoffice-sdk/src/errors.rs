use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Cannot begin checkout for event {event_id}: no tickets selected")]
    InvalidState { event_id: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Session storage unavailable")]
    Unavailable,
    #[error("Session storage quota exceeded ({used} of {quota} bytes)")]
    QuotaExceeded { used: usize, quota: usize },
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session storage payload error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unrecognized catalog response shape")]
    UnrecognizedShape,
    #[error("Missing field `{0}`")]
    MissingField(&'static str),
    #[error("Invalid price for ticket tier {tier_id}")]
    InvalidPrice { tier_id: String },
    #[error("Event not found: {0}")]
    EventNotFound(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Fee basis points too high: {0} (max 10000 = 100%)")]
    FeeTooHigh(u32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("Emails do not match")]
    EmailMismatch,
    #[error("Invalid contact details: {}", describe_fields(.0))]
    InvalidFields(Vec<FieldError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    FullNameRequired,
    EmailRequired,
    EmailInvalid,
    PhoneRequired,
}

impl FieldError {
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::FullNameRequired => "fullName",
            FieldError::EmailRequired | FieldError::EmailInvalid => "email",
            FieldError::PhoneRequired => "phone",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FieldError::FullNameRequired => "Full name is required",
            FieldError::EmailRequired => "Email is required",
            FieldError::EmailInvalid => "Invalid email format",
            FieldError::PhoneRequired => "Phone number is required",
        }
    }
}

fn describe_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(FieldError::message)
        .collect::<Vec<_>>()
        .join(", ")
}
