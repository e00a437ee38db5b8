pub mod auth;
pub mod books;

pub use self::auth::model::User;
pub use self::books::model::BookResponse;
