use crate::{
    auth::{
        generate_token, hash_password, verify_password, AuthResponse, LoginRequest,
        RegisterRequest, RegisteredUser, TokenKeys,
    },
    error::AppError,
    models::User,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Register a new user.
///
/// Hashes the password and stores the account. Duplicate usernames surface as
/// 409 straight from the unique constraint; there is no racy pre-select.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let password_hash = hash_password(&register_data.password)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (user_name, password_hash) VALUES ($1, $2)
         RETURNING id, user_name, password_hash",
    )
    .bind(&register_data.user_name)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await
    .map_err(|e| match AppError::from(e) {
        AppError::Conflict(_) => AppError::Conflict("Username already taken".into()),
        other => other,
    })?;

    log::info!("registered user {}", user.user_name);

    Ok(HttpResponse::Created().json(RegisteredUser {
        id: user.id,
        user_name: user.user_name,
    }))
}

/// Login user.
///
/// Verifies the password against the stored hash and issues a signed token.
/// Unknown username and wrong password produce the same generic 401, so the
/// response never reveals whether the account exists.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    keys: web::Data<TokenKeys>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, user_name, password_hash FROM users WHERE user_name = $1",
    )
    .bind(&login_data.user_name)
    .fetch_optional(&**pool)
    .await?;

    match user {
        Some(user) => {
            if verify_password(&login_data.password, &user.password_hash)? {
                let token = generate_token(keys.get_ref(), user.id, &user.user_name)?;
                Ok(HttpResponse::Ok().json(AuthResponse { token }))
            } else {
                Err(AppError::Unauthorized("Invalid credentials".into()))
            }
        }
        None => Err(AppError::Unauthorized("Invalid credentials".into())),
    }
}
