/*
 * Responsibility
 * - register / login の request/response DTO
 */
use serde::{Deserialize, Serialize};

const PASSWORD_MIN: usize = 3;
const PASSWORD_MAX: usize = 130;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.first_name.trim().is_empty() {
            return Err("first_name is required");
        }
        if self.last_name.trim().is_empty() {
            return Err("last_name is required");
        }
        if !is_email(&self.email) {
            return Err("email is invalid");
        }
        let len = self.password.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
            return Err("password must be 3..=130 chars");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !is_email(&self.email) {
            return Err("email is invalid");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

fn is_email(s: &str) -> bool {
    let s = s.trim();
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn register_validation() {
        assert!(register("ada@example.com", "secret").validate().is_ok());
        assert!(register("ada.example.com", "secret").validate().is_err());
        assert!(register("ada@example.com", "ab").validate().is_err());
        assert!(register("ada@example.com", &"x".repeat(131)).validate().is_err());

        let mut blank = register("ada@example.com", "secret");
        blank.first_name = "  ".into();
        assert_eq!(blank.validate(), Err("first_name is required"));
    }

    #[test]
    fn login_validation() {
        let ok = LoginRequest {
            email: "ada@example.com".into(),
            password: "pw".into(),
        };
        assert!(ok.validate().is_ok());

        let empty = LoginRequest {
            email: "ada@example.com".into(),
            password: String::new(),
        };
        assert_eq!(empty.validate(), Err("password is required"));
    }
}
