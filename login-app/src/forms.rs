use crate::FormBody;
use url::form_urlencoded;

pub fn parse_form(bytes: &[u8]) -> FormBody {
    let mut form = FormBody::new();
    for (key, value) in form_urlencoded::parse(bytes).into_owned() {
        form.entry(key).or_default().push(value);
    }
    form
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Both fields are required; the errors name every missing one.
    pub fn bind(body: &FormBody) -> Result<Self, Vec<String>> {
        let field = |name: &str| {
            body.get(name)
                .and_then(|values| values.first())
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(String::from)
        };

        match (field("email"), field("password")) {
            (Some(email), Some(password)) => Ok(Self { email, password }),
            (email, password) => {
                let mut errors = Vec::new();
                if email.is_none() {
                    errors.push(String::from("Email is required"));
                }
                if password.is_none() {
                    errors.push(String::from("Password is required"));
                }
                Err(errors)
            }
        }
    }
}
