pub mod email;

pub use self::email::Email;
