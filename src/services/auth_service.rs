use crate::dto::auth_dto::LoginPayload;
use crate::error::{Error, Result};
use crate::models::user::{Role, User};
use crate::utils::validation::validate;
use url::Url;

const AVATAR_SERVICE: &str = "https://ui-avatars.com/api/";

/// Email sign-in. The only decision it makes is the role.
#[derive(Clone)]
pub struct AuthService {
    admin_email: String,
}

impl AuthService {
    pub fn new(admin_email: String) -> Self {
        Self { admin_email }
    }

    pub fn role_for(&self, email: &str) -> Role {
        Role::for_email(email, &self.admin_email)
    }

    pub fn sign_in(&self, payload: LoginPayload) -> Result<User> {
        validate(&payload)?;
        let email = payload.email.trim().to_string();
        let name = payload
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());
        let picture = match payload.picture {
            Some(picture) => picture,
            None => avatar_url(&email)?,
        };

        Ok(User {
            role: self.role_for(&email),
            name,
            email,
            picture,
        })
    }
}

fn avatar_url(email: &str) -> Result<String> {
    let url = Url::parse_with_params(
        AVATAR_SERVICE,
        &[("name", email), ("background", "facc15"), ("color", "422006")],
    )
    .map_err(|e| Error::Internal(format!("Cannot build avatar url: {}", e)))?;
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(email: &str) -> LoginPayload {
        LoginPayload {
            email: email.to_string(),
            name: None,
            picture: None,
        }
    }

    #[test]
    fn admin_role_ignores_case() {
        let auth = AuthService::new("Admin@Vault.edu".to_string());
        assert_eq!(auth.role_for("admin@vault.edu"), Role::Admin);
        assert_eq!(auth.role_for("ADMIN@VAULT.EDU"), Role::Admin);
        assert_eq!(auth.role_for("student@vault.edu"), Role::Student);
        assert_eq!(auth.role_for("admin@vault.edu.evil"), Role::Student);
    }

    #[test]
    fn sign_in_fills_defaults() {
        let auth = AuthService::new("admin@vault.edu".to_string());
        let user = auth.sign_in(login("grace.hopper@vault.edu")).unwrap();
        assert_eq!(user.name, "grace.hopper");
        assert_eq!(user.role, Role::Student);
        assert!(user.picture.starts_with(AVATAR_SERVICE));
        assert!(user.picture.contains("grace.hopper%40vault.edu"));
    }

    #[test]
    fn sign_in_rejects_bad_email() {
        let auth = AuthService::new("admin@vault.edu".to_string());
        assert!(matches!(auth.sign_in(login("not-an-email")), Err(Error::Validation(_))));
    }
}
