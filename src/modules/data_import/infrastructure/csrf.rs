use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

pub const CSRF_HEADER: &str = "X-CSRFToken";

fn meta_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid meta tag regex"))
}

fn name_attr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)\bname\s*=\s*["']([^"']*)["']"#).expect("valid name attribute regex")
    })
}

fn content_attr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)\bcontent\s*=\s*["']([^"']*)["']"#)
            .expect("valid content attribute regex")
    })
}

/// Token sent in the `X-CSRFToken` header of every request
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();
        (!value.is_empty()).then_some(Self(value))
    }

    /// Extract the token from a page's `<meta name="csrf-token" content="...">` tag
    pub fn from_meta_tag(html: &str) -> Option<Self> {
        meta_tag_pattern().find_iter(html).find_map(|tag| {
            let tag = tag.as_str();
            let name = name_attr_pattern().captures(tag)?.get(1)?.as_str();
            if !name.eq_ignore_ascii_case("csrf-token") {
                return None;
            }
            let content = content_attr_pattern().captures(tag)?.get(1)?.as_str();
            Self::new(content)
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials; keep them out of logs
impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CsrfToken(***)")
    }
}
