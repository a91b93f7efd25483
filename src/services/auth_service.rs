use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::{
    config::jwt_secret,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    entity::users::{ActiveModel, Column, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::issue_token,
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
    validation,
};

const TOKEN_TTL_HOURS: i64 = 24;
const MIN_PASSWORD_LEN: usize = 8;

/// New accounts are always customers; admins are promoted by another admin.
pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let RegisterRequest {
        email,
        name,
        password,
    } = payload;
    let email = validation::email(&email)?;
    let name = validation::required("name", &name)?;
    check_password(&password)?;
    ensure_email_free(state.orm.as_ref(), &email, None).await?;

    let user = ActiveModel {
        email: Set(email),
        name: Set(name),
        password_hash: Set(hash_password(&password)?),
        is_admin: Set(false),
        ..Default::default()
    }
    .insert(state.orm.as_ref())
    .await?;

    tracing::info!(user_id = user.id, "user registered");
    Ok(ApiResponse::success("User created", user.into(), None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let email = email.trim().to_lowercase();

    let user = Users::find()
        .filter(Column::Email.eq(email.as_str()))
        .one(state.orm.as_ref())
        .await?;

    let user = match user {
        Some(u) if !u.archived => u,
        _ => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        is_admin: user.is_admin,
        exp: expiration.timestamp() as usize,
    };
    let token = issue_token(&claims, &jwt_secret()?)?;

    tracing::info!(user_id = user.id, "user logged in");
    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token,
            user: user.into(),
        },
        Some(Meta::empty()),
    ))
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub(crate) fn check_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub(crate) async fn ensure_email_free<C>(
    conn: &C,
    email: &str,
    except: Option<i32>,
) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let mut finder = Users::find().filter(Column::Email.eq(email));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.one(conn).await?.is_some() {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::users;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn user(email: &str, password: &str, archived: bool) -> users::Model {
        users::Model {
            id: 3,
            email: email.into(),
            name: "Ada".into(),
            password_hash: hash_password(password).unwrap(),
            is_admin: false,
            archived,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(check_password("short").is_err());
        assert!(check_password("long enough").is_ok());
    }

    #[tokio::test]
    async fn register_rejects_taken_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user("ada@example.com", "secret-pass", false)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = register_user(
            &state,
            RegisterRequest {
                email: "Ada@Example.com".into(),
                name: "Ada".into(),
                password: "secret-pass".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Email is already taken"));
    }

    #[tokio::test]
    async fn archived_user_cannot_log_in() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user("ada@example.com", "secret-pass", true)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = login_user(
            &state,
            LoginRequest {
                email: "ada@example.com".into(),
                password: "secret-pass".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user("ada@example.com", "secret-pass", false)]])
            .into_connection();
        let state = AppState::new(db, "Uncategorized");

        let err = login_user(
            &state,
            LoginRequest {
                email: "ada@example.com".into(),
                password: "not-the-pass".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
