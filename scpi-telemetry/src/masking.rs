//! Sensitive data masking for logs.
//!
//! Passwords, bearer tokens, JWTs and secrets are masked before a log line
//! leaves the process.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PATTERNS: LazyLock<Vec<SensitivePattern>> = LazyLock::new(|| {
    vec![
        SensitivePattern {
            regex: Regex::new(r#"(?i)(password|passwd|pwd)["\s:=]+["']?([^\s"',}]{4,})"#)
                .unwrap(),
            group: 2,
        },
        SensitivePattern {
            regex: Regex::new(r#"(?i)(jwt[_-]?secret|secret|token)["\s:=]+["']?([^\s"',}]{8,})"#)
                .unwrap(),
            group: 2,
        },
        SensitivePattern {
            regex: Regex::new(r"(?i)bearer\s+([a-zA-Z0-9._-]{20,})").unwrap(),
            group: 1,
        },
        SensitivePattern {
            regex: Regex::new(r"eyJ[a-zA-Z0-9_-]*\.eyJ[a-zA-Z0-9_-]*\.[a-zA-Z0-9_-]*").unwrap(),
            group: 0,
        },
    ]
});

struct SensitivePattern {
    regex: Regex,
    group: usize,
}

/// Masks sensitive data in strings.
#[derive(Debug, Clone)]
pub struct SensitiveDataMasker {
    min_length: usize,
    show_start: usize,
    show_end: usize,
}

impl Default for SensitiveDataMasker {
    fn default() -> Self {
        Self::new()
    }
}

impl SensitiveDataMasker {
    /// Create a new masker with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_length: 8,
            show_start: 3,
            show_end: 3,
        }
    }

    /// Mask a known sensitive value, keeping a few characters at each end of long values.
    ///
    /// # Example
    ///
    /// ```
    /// use scpi_telemetry::masking::SensitiveDataMasker;
    ///
    /// let masker = SensitiveDataMasker::new();
    /// assert_eq!(masker.mask_value("abcdefghijklmnop"), "abc***nop");
    /// assert_eq!(masker.mask_value("short"), "*****");
    /// ```
    #[must_use]
    pub fn mask_value(&self, value: &str) -> String {
        let len = value.chars().count();
        if len < self.min_length {
            return "*".repeat(len.max(3));
        }

        let start: String = value.chars().take(self.show_start).collect();
        let end: String = value.chars().skip(len - self.show_end).collect();
        format!("{start}***{end}")
    }

    /// Mask every sensitive value detected in `input`.
    ///
    /// # Example
    ///
    /// ```
    /// use scpi_telemetry::masking::SensitiveDataMasker;
    ///
    /// let masker = SensitiveDataMasker::new();
    /// let masked = masker.mask_string(r#"{"email":"a@b.fr","password":"hunter2hunter2"}"#);
    /// assert!(!masked.contains("hunter2hunter2"));
    /// ```
    #[must_use]
    pub fn mask_string<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let mut result = Cow::Borrowed(input);

        for pattern in PATTERNS.iter() {
            if !pattern.regex.is_match(&result) {
                continue;
            }
            let masked = pattern
                .regex
                .replace_all(&result, |caps: &Captures<'_>| self.mask_capture(caps, pattern.group))
                .into_owned();
            result = Cow::Owned(masked);
        }

        result
    }

    fn mask_capture(&self, caps: &Captures<'_>, group: usize) -> String {
        let Some(whole) = caps.get(0) else {
            return String::new();
        };
        let Some(secret) = caps.get(group) else {
            return whole.as_str().to_string();
        };

        let text = whole.as_str();
        let from = secret.start() - whole.start();
        let to = secret.end() - whole.start();
        format!(
            "{}{}{}",
            &text[..from],
            self.mask_value(secret.as_str()),
            &text[to..]
        )
    }

    /// Check if a string contains sensitive patterns.
    #[must_use]
    pub fn contains_sensitive(&self, input: &str) -> bool {
        PATTERNS.iter().any(|p| p.regex.is_match(input))
    }
}

/// Partially hides an e-mail address for log fields: `user@example.com` becomes `u***@example.com`.
#[must_use]
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        None => SensitiveDataMasker::new().mask_value(email),
    }
}

/// A wrapper for secrets that hides them in `Debug`, `Display` and `Serialize`.
///
/// Deserialization reads the inner value normally, so request bodies and
/// configuration files can use it directly.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a value as sensitive.
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    /// Get the inner value.
    pub const fn expose(&self) -> &T {
        &self.0
    }

    /// Consume and return the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> std::fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl<T> std::fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl<T> serde::Serialize for Sensitive<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Sensitive<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self)
    }
}
