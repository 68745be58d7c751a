use serde::Deserialize;

/// Form payloads are checked (and normalized) before any handler sees them.
pub trait Validate: Sized {
    fn validate(self) -> Result<Self, String>;
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

impl Validate for RegisterForm {
    fn validate(self) -> Result<Self, String> {
        let username = self.username.trim().to_string();
        let len = username.chars().count();
        if !(3..=32).contains(&len) {
            return Err("Username must be between 3 and 32 characters".into());
        }
        if username.chars().any(char::is_whitespace) {
            return Err("Username cannot contain spaces".into());
        }
        if self.password.chars().count() < 8 {
            return Err("Password must be at least 8 characters".into());
        }
        Ok(Self {
            username,
            password: self.password,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl Validate for LoginForm {
    fn validate(self) -> Result<Self, String> {
        let username = self.username.trim().to_string();
        if username.is_empty() || self.password.is_empty() {
            return Err("Missing credentials".into());
        }
        Ok(Self {
            username,
            password: self.password,
        })
    }
}

// -- Blogs --

/// Shared by create and update: the editable fields of a post.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlogForm {
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    pub body: String,
}

const MAX_TITLE_LEN: usize = 200;

impl Validate for BlogForm {
    fn validate(self) -> Result<Self, String> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err("Title can't be blank".into());
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(format!("Title must be at most {MAX_TITLE_LEN} characters"));
        }

        let image = self
            .image
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if let Some(url) = &image {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err("Image must be an http(s) URL".into());
            }
        }

        Ok(Self {
            title,
            image,
            body: self.body,
        })
    }
}
