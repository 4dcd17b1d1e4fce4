//! Configuration validation helpers.

use crate::error::ConfigError;

/// Result type for validation operations.
pub type ValidationResult = Result<(), ConfigError>;

/// Collects validation errors while walking nested configuration sections.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    path: Vec<String>,
    errors: Vec<ConfigError>,
}

impl ValidationContext {
    /// Creates a new validation context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a named section.
    pub fn enter(&mut self, section: impl Into<String>) {
        self.path.push(section.into());
    }

    /// Leaves the current section.
    pub fn exit(&mut self) {
        self.path.pop();
    }

    /// Runs `f` inside `section`.
    pub fn section<F>(&mut self, section: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.enter(section);
        f(self);
        self.exit();
    }

    /// Returns the current path as a dot-separated string.
    #[must_use]
    pub fn current_path(&self) -> String {
        self.path.join(".")
    }

    /// Qualifies `field` with the current path.
    #[must_use]
    pub fn qualify(&self, field: &str) -> String {
        if self.path.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.current_path())
        }
    }

    /// Records an error.
    pub fn add_error(&mut self, error: ConfigError) {
        self.errors.push(error);
    }

    /// Records the result of a nested [`Validatable`](super::Validatable) check.
    pub fn check(&mut self, result: ValidationResult) {
        if let Err(error) = result {
            self.add_error(error);
        }
    }

    /// Returns true if no errors were recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the recorded errors.
    #[must_use]
    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    /// Consumes the context.
    ///
    /// A single error is returned as is; several are folded into one
    /// [`ConfigError::ValidationFailed`].
    pub fn into_result(mut self) -> ValidationResult {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(ConfigError::validation_failed(
                self.errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )),
        }
    }
}

/// Fluent field checks recorded into a [`ValidationContext`].
#[derive(Debug)]
pub struct Validator<'a> {
    ctx: &'a mut ValidationContext,
}

impl<'a> Validator<'a> {
    /// Creates a validator writing into `ctx`.
    pub fn new(ctx: &'a mut ValidationContext) -> Self {
        Self { ctx }
    }

    /// Checks that a string is not blank.
    pub fn require_non_empty(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            let field = self.ctx.qualify(field);
            self.ctx.add_error(ConfigError::missing_field(field));
        }
        self
    }

    /// Checks that a value lies within `min..=max`.
    pub fn in_range<T: PartialOrd + std::fmt::Display>(
        &mut self,
        field: &str,
        value: &T,
        min: &T,
        max: &T,
    ) -> &mut Self {
        if value < min || value > max {
            self.fail(field, format!("Value {value} must be between {min} and {max}"));
        }
        self
    }

    /// Checks that a value is strictly positive.
    pub fn positive<T: PartialOrd + Default + std::fmt::Display>(
        &mut self,
        field: &str,
        value: &T,
    ) -> &mut Self {
        if *value <= T::default() {
            self.fail(field, format!("Value {value} must be positive"));
        }
        self
    }

    /// Checks that a string has at least `min` characters.
    pub fn min_length(&mut self, field: &str, value: &str, min: usize) -> &mut Self {
        if value.chars().count() < min {
            self.fail(field, format!("Must be at least {min} characters long"));
        }
        self
    }

    /// Checks an arbitrary predicate.
    pub fn custom(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.fail(field, message);
        }
        self
    }

    fn fail(&mut self, field: &str, reason: impl Into<String>) {
        let field = self.ctx.qualify(field);
        self.ctx.add_error(ConfigError::invalid_value(field, reason));
    }
}

/// Applies environment variable overrides onto configuration fields.
///
/// Unset variables leave the target untouched. A set variable that does not
/// parse is reported instead of being ignored.
///
/// # Example
///
/// ```rust
/// use scpi_core::config::EnvOverride;
///
/// let mut port: u16 = 8080;
/// EnvOverride::apply_parsed("SCPI_DOC_UNSET_PORT", &mut port).unwrap();
/// assert_eq!(port, 8080);
/// ```
pub struct EnvOverride;

impl EnvOverride {
    /// Overrides a string value.
    pub fn apply_string(var_name: &str, target: &mut String) {
        if let Ok(value) = std::env::var(var_name) {
            *target = value;
        }
    }

    /// Overrides a value parsed with [`FromStr`](std::str::FromStr).
    pub fn apply_parsed<T>(var_name: &str, target: &mut T) -> ValidationResult
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        if let Ok(value) = std::env::var(var_name) {
            *target = value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar {
                name: var_name.to_string(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Overrides a boolean value. Accepts true/false, 1/0, yes/no, on/off.
    pub fn apply_bool(var_name: &str, target: &mut bool) -> ValidationResult {
        if let Ok(value) = std::env::var(var_name) {
            *target = match value.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                other => {
                    return Err(ConfigError::InvalidEnvVar {
                        name: var_name.to_string(),
                        reason: format!("'{other}' is not a boolean"),
                    });
                }
            };
        }
        Ok(())
    }
}
