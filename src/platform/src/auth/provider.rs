use std::sync::Arc;

use chrono::Duration;
use chrono::Utc;
use common::rbac::Role;
use common::types::OptionalProperty;
use metadata::accounts::Accounts;
use metadata::accounts::CreateAccountRequest;
use metadata::accounts::UpdateAccountRequest;
use metadata::error::MetadataError;
use password_hash::PasswordHash;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;
use validator::validate_email;

use super::password::make_password_hash;
use super::password::verify_password;
use super::token::make_access_token;
use super::token::make_refresh_token;
use super::token::parse_refresh_token;
use crate::accounts::Account;
use crate::error::AuthError;
use crate::error::ValidationError;
use crate::Context;
use crate::PlatformError;
use crate::Result;

fn reset_token_duration() -> Duration {
    Duration::hours(1)
}

#[derive(Clone)]
pub struct Auth {
    accounts: Arc<Accounts>,
    access_token_duration: Duration,
    access_token_key: String,
    refresh_token_duration: Duration,
    refresh_token_key: String,
}

impl Auth {
    pub fn new(accounts: Arc<Accounts>, cfg: Config) -> Self {
        Self {
            accounts,
            access_token_duration: cfg.access_token_duration,
            access_token_key: cfg.access_token_key,
            refresh_token_duration: cfg.refresh_token_duration,
            refresh_token_key: cfg.refresh_token_key,
        }
    }

    fn make_tokens(&self, account_id: u64) -> Result<TokensResponse> {
        Ok(TokensResponse {
            access_token: make_access_token(
                account_id,
                self.access_token_duration,
                self.access_token_key.as_str(),
            )
            .map_err(|err| err.wrap_into(AuthError::CantMakeAccessToken))?,
            refresh_token: make_refresh_token(
                account_id,
                self.refresh_token_duration,
                self.refresh_token_key.as_str(),
            )
            .map_err(|err| err.wrap_into(AuthError::CantMakeRefreshToken))?,
        })
    }

    fn check_password_strength(password: &str, user_inputs: &[&str]) -> Result<()> {
        match zxcvbn::zxcvbn(password, user_inputs) {
            Ok(ent) if ent.score() < 3 => Err(PlatformError::invalid_field(
                "password",
                "password is too simple",
            )),
            Err(err) => Err(PlatformError::invalid_field("password", err.to_string())),
            _ => Ok(()),
        }
    }

    pub async fn sign_up(&self, req: SignUpRequest) -> Result<TokensResponse> {
        let mut validation = ValidationError::new();
        if req.username.is_empty() {
            validation.push("username", "empty username");
        }
        if !validate_email(&req.email) {
            validation.push("email", "invalid email");
        }
        if req.password != req.password_repeat {
            validation.push("passwordRepeat", "passwords don't match");
        }
        validation.result()?;
        Self::check_password_strength(&req.password, &[&req.username, &req.email])?;

        let password_hash = make_password_hash(req.password.as_str())
            .map_err(|err| err.wrap_into(AuthError::InvalidPasswordHashing))?;

        let maybe_account = self.accounts.create(CreateAccountRequest {
            created_by: None,
            username: req.username,
            email: req.email,
            password_hash,
            role: Role::User,
            profile_image: None,
        });

        let account = match maybe_account {
            Ok(account) => account,
            Err(MetadataError::AlreadyExists(_)) => {
                return Err(PlatformError::AlreadyExists(
                    "account already exists".to_string(),
                ));
            }
            Err(other) => return Err(other.into()),
        };

        let tokens = self.make_tokens(account.id)?;

        Ok(tokens)
    }

    pub async fn log_in(&self, req: LogInRequest) -> Result<TokensResponse> {
        let account = self
            .accounts
            .get_by_username(&req.username)
            .map_err(|_err| AuthError::InvalidCredentials)?;

        verify_password(
            req.password,
            PasswordHash::new(account.password_hash.as_str())?,
        )
        .map_err(|_err| AuthError::InvalidCredentials)?;
        let tokens = self.make_tokens(account.id)?;

        Ok(tokens)
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokensResponse> {
        let refresh_claims = parse_refresh_token(refresh_token, self.refresh_token_key.as_str())
            .map_err(|err| err.wrap_into(AuthError::InvalidRefreshToken))?;
        let tokens = self.make_tokens(refresh_claims.account_id)?;

        Ok(tokens)
    }

    pub async fn get_profile(&self, ctx: Context) -> Result<Account> {
        match self.accounts.get_by_id(ctx.account_id) {
            Ok(acc) => Ok(acc.into()),
            Err(MetadataError::NotFound(_)) => {
                Err(PlatformError::NotFound("account not found".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn update_profile(&self, ctx: Context, req: UpdateProfileRequest) -> Result<Account> {
        let mut md_req = UpdateAccountRequest {
            updated_by: ctx.account_id,
            ..Default::default()
        };
        if let OptionalProperty::Some(username) = req.username {
            if username.is_empty() {
                return Err(PlatformError::invalid_field("username", "empty username"));
            }
            md_req.username.insert(username);
        }
        if let OptionalProperty::Some(email) = req.email {
            if !validate_email(&email) {
                return Err(PlatformError::invalid_field("email", "invalid email"));
            }
            md_req.email.insert(email);
        }
        if let OptionalProperty::Some(profile_image) = req.profile_image {
            md_req.profile_image.insert(profile_image);
        }

        let account = match self.accounts.update(ctx.account_id, md_req) {
            Ok(account) => account,
            Err(MetadataError::AlreadyExists(_)) => {
                return Err(PlatformError::AlreadyExists(
                    "username or email already taken".to_string(),
                ));
            }
            Err(other) => return Err(other.into()),
        };

        Ok(account.into())
    }

    pub async fn update_password(
        &self,
        ctx: Context,
        req: UpdatePasswordRequest,
    ) -> Result<TokensResponse> {
        let account = self.accounts.get_by_id(ctx.account_id)?;

        if verify_password(
            &req.password,
            PasswordHash::new(account.password_hash.as_str())?,
        )
        .is_err()
        {
            return Err(PlatformError::invalid_field("password", "invalid password"));
        }

        Self::check_password_strength(&req.new_password, &[&account.username, &account.email])?;

        let password_hash = make_password_hash(req.new_password.as_str())
            .map_err(|err| err.wrap_into(AuthError::InvalidPasswordHashing))?;

        let md_req = UpdateAccountRequest {
            updated_by: ctx.account_id,
            password_hash: OptionalProperty::Some(password_hash),
            ..Default::default()
        };

        self.accounts.update(ctx.account_id, md_req)?;

        let tokens = self.make_tokens(account.id)?;

        Ok(tokens)
    }

    /// Issues a reset token for the account behind the email. The response is
    /// the same whether the email is known or not.
    pub async fn forgot_password(&self, req: ForgotPasswordRequest) -> Result<()> {
        if !validate_email(&req.email) {
            return Err(PlatformError::invalid_field("email", "invalid email"));
        }

        let account = match self.accounts.get_by_email(&req.email) {
            Ok(account) => account,
            Err(MetadataError::NotFound(_)) => return Ok(()),
            Err(err) => return Err(err.into()),
        };

        let reset_token = Uuid::new_v4().to_string();
        let md_req = UpdateAccountRequest {
            updated_by: account.id,
            reset_token: OptionalProperty::Some(Some(reset_token.clone())),
            reset_token_expires: OptionalProperty::Some(Some(Utc::now() + reset_token_duration())),
            ..Default::default()
        };
        self.accounts.update(account.id, md_req)?;

        // delivery is out of scope, operators pick the link up from the log
        tracing::info!(
            "password reset requested for account {}: /auth/reset-password?token={}",
            account.id,
            reset_token
        );

        Ok(())
    }

    pub async fn reset_password(&self, req: ResetPasswordRequest) -> Result<TokensResponse> {
        let account = self
            .accounts
            .get_by_reset_token(&req.token)
            .map_err(|_err| AuthError::InvalidResetToken)?;

        match account.reset_token_expires {
            Some(expires) if expires > Utc::now() => {}
            _ => return Err(AuthError::InvalidResetToken.into()),
        }

        Self::check_password_strength(&req.new_password, &[&account.username, &account.email])?;

        let password_hash = make_password_hash(req.new_password.as_str())
            .map_err(|err| err.wrap_into(AuthError::InvalidPasswordHashing))?;

        let md_req = UpdateAccountRequest {
            updated_by: account.id,
            password_hash: OptionalProperty::Some(password_hash),
            reset_token: OptionalProperty::Some(None),
            reset_token_expires: OptionalProperty::Some(None),
            ..Default::default()
        };
        self.accounts.update(account.id, md_req)?;

        let tokens = self.make_tokens(account.id)?;

        Ok(tokens)
    }
}

#[derive(Clone)]
pub struct Config {
    pub access_token_duration: Duration,
    pub access_token_key: String,
    pub refresh_token_duration: Duration,
    pub refresh_token_key: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_repeat: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LogInRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub username: OptionalProperty<String>,
    #[serde(default)]
    pub email: OptionalProperty<String>,
    #[serde(default)]
    pub profile_image: OptionalProperty<Option<String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub password: String,
    pub new_password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}
