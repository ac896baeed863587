use validator::Validate;

use crate::{ServiceError, ServiceResult};

#[derive(Validate)]
struct EmailValidator {
    #[validate(email)]
    email: String,
}

pub fn validate_email(email: &str) -> ServiceResult<String> {
    let validator = EmailValidator {
        email: email.trim().to_string(),
    };
    if validator.validate().is_err() {
        return ServiceError::validation(format!("Invalid email address: {}", validator.email));
    }
    Ok(validator.email)
}
