use clap::ValueEnum;
use std::str::FromStr;

pub enum Auth {
    /// Use a personal access token via an Authorization Bearer header
    Token(String),
    /// Use username and password authentication via Basic Auth headers
    Basic(String, String),
    /// Don't use any authentication (subject to anonymous rate limits)
    None,
}

impl Auth {
    pub fn new(
        r#type: &AuthType,
        username: Option<String>,
        password: Option<String>,
        token: Option<String>,
    ) -> Self {
        match (r#type, username, password, token) {
            (AuthType::Token, _, _, Some(token)) => Self::Token(token),
            (AuthType::Basic, Some(username), Some(password), _) => Self::Basic(username, password),
            (AuthType::None, _, _, _) | _ => Self::None,
        }
    }
}

impl std::fmt::Display for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => write!(f, "Token"),
            Self::Basic(_, _) => write!(f, "Basic"),
            Self::None => write!(f, "None"),
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum AuthType {
    Token,
    Basic,
    None,
}

impl FromStr for AuthType {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "token" => Ok(Self::Token),
            "basic" => Ok(Self::Basic),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}
