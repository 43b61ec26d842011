use derive_more::Display;
use validator::validate_email;

/// A syntactically valid subscriber address.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
#[display(fmt = "{}", _0)]
pub struct Email(String);

impl TryFrom<String> for Email {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.is_empty() {
            return Err("email is empty".into());
        }

        if validate_email(value) {
            Ok(Self(value.to_owned()))
        } else {
            Err(format!("{} is not a valid email", value))
        }
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
