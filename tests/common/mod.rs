use bookden::config::jwt::JwtConfig;
use bookden::utils::jwt::create_access_token;
use bookden::utils::password::hash_password;
use sqlx::PgPool;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Create a test user with the given role ("user" or "admin") and a token
/// minted for it.
pub async fn create_test_user(pool: &PgPool, email: &str, password: &str, role: &str) -> TestUser {
    dotenvy::dotenv().ok();

    let username = generate_unique_username();
    let hashed = hash_password(password).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (username, email, password, profile_img, role)
         VALUES ($1, $2, $3, '', $4)
         RETURNING id",
    )
    .bind(&username)
    .bind(email)
    .bind(&hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    let token = create_access_token(id, &JwtConfig::from_env()).unwrap();

    TestUser {
        id,
        username,
        email: email.to_string(),
        password: password.to_string(),
        token,
    }
}

#[allow(dead_code)]
pub async fn create_test_book(pool: &PgPool, title: &str, author_id: Option<Uuid>) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO books (title, caption, rating, image_url, author_id)
         VALUES ($1, 'A test caption', 4, 'http://localhost:3000/uploads/test.png', $2)
         RETURNING id",
    )
    .bind(title)
    .bind(author_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub fn generate_unique_username() -> String {
    format!("reader-{}", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn generate_unique_title() -> String {
    format!("Book {}", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
