//! Session state.

/// Whether the current visitor holds an API token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated { token: String },
}

impl AuthState {
    /// Blank tokens count as anonymous.
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.trim().is_empty() => AuthState::Authenticated {
                token: token.trim().to_string(),
            },
            _ => AuthState::Anonymous,
        }
    }

    /// Read the token from a `Cookie` request header.
    pub fn from_cookie_header(header: Option<&str>, cookie_name: &str) -> Self {
        Self::from_token(header.and_then(|h| cookie_value(h, cookie_name)))
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            AuthState::Anonymous => None,
            AuthState::Authenticated { token } => Some(token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }
}

/// Find a cookie in a `Cookie` header and percent-decode its value.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| {
            let value = value.trim().trim_matches('"');
            urlencoding::decode(value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_lookup() {
        let header = "theme=dark; token=abc.def; lang=en";
        assert_eq!(cookie_value(header, "token").as_deref(), Some("abc.def"));
        assert_eq!(cookie_value(header, "missing"), None);
        assert_eq!(cookie_value("token=a%20b", "token").as_deref(), Some("a b"));
    }

    #[test]
    fn test_similar_names_do_not_match() {
        let header = "refresh_token=zzz; xtoken=yyy";
        assert_eq!(cookie_value(header, "token"), None);
    }

    #[test]
    fn test_auth_from_cookie_header() {
        let auth = AuthState::from_cookie_header(Some("token=jwt"), "token");
        assert_eq!(auth.token(), Some("jwt"));
        assert!(auth.is_authenticated());

        assert_eq!(AuthState::from_cookie_header(None, "token"), AuthState::Anonymous);
        assert_eq!(
            AuthState::from_cookie_header(Some("token="), "token"),
            AuthState::Anonymous
        );
    }
}
