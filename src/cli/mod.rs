use sqlx::PgPool;

use crate::modules::auth::model::UserRole;
use crate::utils::password::hash_password;

/// Creates an admin account. Roles are never assignable through the HTTP
/// API, so admins have to come from the command line.
pub async fn create_admin(
    db: &PgPool,
    email: &str,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let profile_img = format!(
        "https://api.dicebear.com/9.x/big-ears-neutral/svg?seed={}",
        username
    );

    let result = sqlx::query(
        "INSERT INTO users (email, username, password, profile_img, role)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(email)
    .bind(username)
    .bind(hashed_password)
    .bind(profile_img)
    .bind(UserRole::Admin.as_str())
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("User with this email already exists".into());
    }

    Ok(())
}
