pub mod note;
pub mod question;
pub mod user;
