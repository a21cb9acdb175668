//! Redaction of sensitive data in trace dumps.
//!
//! # Responsibilities
//! - Hide credential headers (Authorization, auth tokens, cookies, API keys)
//! - Hide credential form fields and JSON members in bodies
//! - Hide bearer tokens wherever they appear
//!
//! # Design Decisions
//! - Rules are ordered regex substitutions applied to the whole dump
//! - Header rules keep the header name so the dump stays readable
//! - Policy is pluggable through the [`Redact`] trait; closures qualify

use regex::Regex;
use std::sync::OnceLock;

/// Text substituted for every piece of hidden data.
pub const PRIVATE_DATA_PLACEHOLDER: &str = "[PRIVATE DATA HIDDEN]";

/// A redaction policy applied to dumped requests and responses.
pub trait Redact: Send + Sync {
    fn redact(&self, text: &str) -> String;
}

impl<F> Redact for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn redact(&self, text: &str) -> String {
        self(text)
    }
}

/// One substitution. `replacement` follows `regex` expansion syntax (`$1`, `${name}`).
#[derive(Debug, Clone)]
pub struct RedactionRule {
    regex: Regex,
    replacement: String,
}

impl RedactionRule {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    /// Rule that replaces each whole match with the placeholder.
    pub fn hide(pattern: &str) -> Result<Self, regex::Error> {
        Self::new(pattern, PRIVATE_DATA_PLACEHOLDER)
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    fn apply(&self, text: &str) -> String {
        self.regex
            .replace_all(text, self.replacement.as_str())
            .into_owned()
    }
}

const HEADER_RULE: &str = r"(?im)^(authorization|proxy-authorization|x-auth-token|x-auth-refresh-token|x-auth-uaa-token|x-auth-user-token|x-api-key|cookie|set-cookie):[ \t]*[^\r\n]*";
const FORM_RULE: &str =
    r"(?i)\b(password|passcode|refresh_token|access_token|apikey|api_key|client_secret)=[^&\s]*";
const JSON_RULE: &str = r#"(?i)"([^"]*(?:token|password|secret|apikey|api_key|passcode)[^"]*)"\s*:\s*"(?:[^"\\]|\\.)*""#;
const BEARER_RULE: &str = r"(?i)\bbearer\s+[A-Za-z0-9\-._~+/]+=*";

fn builtin_rules() -> &'static [RedactionRule] {
    static RULES: OnceLock<Vec<RedactionRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (HEADER_RULE, format!("${{1}}: {PRIVATE_DATA_PLACEHOLDER}")),
            (FORM_RULE, format!("${{1}}={PRIVATE_DATA_PLACEHOLDER}")),
            (JSON_RULE, format!("\"${{1}}\":\"{PRIVATE_DATA_PLACEHOLDER}\"")),
            (BEARER_RULE, format!("Bearer {PRIVATE_DATA_PLACEHOLDER}")),
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            RedactionRule::new(pattern, replacement).expect("built-in redaction pattern")
        })
        .collect()
    })
}

/// Ordered set of [`RedactionRule`]s.
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    rules: Vec<RedactionRule>,
}

impl Redactor {
    /// Redactor that leaves text untouched.
    pub fn none() -> Self {
        Self::default()
    }

    /// Redactor carrying the built-in credential rules.
    pub fn builtin() -> Self {
        Self {
            rules: builtin_rules().to_vec(),
        }
    }

    /// Append a rule; it runs after every rule already present.
    pub fn with_rule(mut self, rule: RedactionRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[RedactionRule] {
        &self.rules
    }
}

impl Redact for Redactor {
    fn redact(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_header_hidden() {
        let dump = "GET / HTTP/1.1\r\nHost: example.com\r\nAuthorization: Bearer secret123\r\nAccept: */*\r\n\r\n";
        let out = Redactor::builtin().redact(dump);
        assert!(!out.contains("secret123"));
        assert!(out.contains("Authorization: [PRIVATE DATA HIDDEN]\r\n"));
        assert!(out.contains("Accept: */*\r\n"));
    }

    #[test]
    fn test_auth_token_headers_hidden() {
        let dump = "X-Auth-Token: t1\r\nX-Auth-Refresh-Token: t2\r\nx-auth-uaa-token: t3\r\nSet-Cookie: sid=abc\r\n";
        let out = Redactor::builtin().redact(dump);
        for secret in ["t1", "t2", "t3", "sid=abc"] {
            assert!(!out.contains(secret), "{secret} leaked: {out}");
        }
        assert_eq!(out.matches(PRIVATE_DATA_PLACEHOLDER).count(), 4);
    }

    #[test]
    fn test_form_fields_hidden() {
        let body = "grant_type=password&username=bob&password=hunter2&apikey=k-123";
        let out = Redactor::builtin().redact(body);
        assert_eq!(
            out,
            "grant_type=password&username=bob&password=[PRIVATE DATA HIDDEN]&apikey=[PRIVATE DATA HIDDEN]"
        );
    }

    #[test]
    fn test_json_members_hidden() {
        let body = r#"{"access_token":"abc.def","expires_in":3600,"refresh_token": "zzz","user":"bob"}"#;
        let out = Redactor::builtin().redact(body);
        assert!(!out.contains("abc.def"));
        assert!(!out.contains("zzz"));
        assert!(out.contains(r#""access_token":"[PRIVATE DATA HIDDEN]""#));
        assert!(out.contains(r#""user":"bob""#));
        assert!(out.contains(r#""expires_in":3600"#));
    }

    #[test]
    fn test_bearer_in_body_hidden() {
        let out = Redactor::builtin().redact("token was Bearer eyJhbGciOi.x-y_z");
        assert_eq!(out, "token was Bearer [PRIVATE DATA HIDDEN]");
    }

    #[test]
    fn test_plain_form_untouched() {
        assert_eq!(Redactor::builtin().redact("a=1&b=2"), "a=1&b=2");
    }

    #[test]
    fn test_none_and_custom_rules() {
        assert_eq!(Redactor::none().redact("Authorization: x"), "Authorization: x");

        let redactor = Redactor::none()
            .with_rule(RedactionRule::new(r"(?i)(x-session): [^\r\n]*", "$1: ***").unwrap())
            .with_rule(RedactionRule::hide(r"\d{4}-\d{4}").unwrap());
        assert_eq!(
            redactor.redact("X-Session: s1\ncard 1234-5678"),
            "X-Session: ***\ncard [PRIVATE DATA HIDDEN]"
        );
    }

    #[test]
    fn test_closure_is_a_policy() {
        let policy = |text: &str| text.replace("pw", "**");
        assert_eq!(Redact::redact(&policy, "pw=1"), "**=1");
    }
}
