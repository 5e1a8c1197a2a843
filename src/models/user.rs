use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account as stored in the `users` table.
///
/// The password hash rides along for credential checks but is never
/// serialized into a response.
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub user_name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}
