//! Bounds on the number of positional command line arguments.

/// Accepted number of positional arguments, and what they are called.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arity {
    pub minimum: usize,
    pub maximum: Option<usize>,
    pub label: Option<String>,
}

impl Arity {
    /// No positional arguments at all.
    pub fn none() -> Self {
        Self {
            minimum: 0,
            maximum: Some(0),
            label: None,
        }
    }

    pub fn between(minimum: usize, maximum: usize, label: impl Into<String>) -> Self {
        Self {
            minimum,
            maximum: Some(maximum),
            label: Some(label.into()),
        }
    }

    pub fn at_least(minimum: usize, label: impl Into<String>) -> Self {
        Self {
            minimum,
            maximum: None,
            label: Some(label.into()),
        }
    }

    pub fn accepts_arguments(&self) -> bool {
        self.maximum != Some(0)
    }

    /// The usage problem with `count` arguments, if any.
    pub fn violation(&self, count: usize) -> Option<String> {
        if !self.accepts_arguments() {
            return (count > 0).then(|| "Expects no command line file arguments".to_string());
        }
        let label = self.label.as_deref().unwrap_or("arguments");

        if count < self.minimum {
            return Some(format!("Expects at least {} {}", self.minimum, label));
        }

        match self.maximum {
            Some(maximum) if count > maximum => {
                Some(format!("Expects at most {maximum} {label}"))
            }
            _ => None,
        }
    }
}

impl Default for Arity {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rejects_any_argument() {
        let arity = Arity::default();
        assert_eq!(arity.violation(0), None);
        assert_eq!(
            arity.violation(1),
            Some("Expects no command line file arguments".to_string())
        );
        assert!(!arity.accepts_arguments());
    }

    #[test]
    fn test_unlabelled_bounds_still_checked() {
        let arity = Arity {
            minimum: 1,
            maximum: Some(5),
            label: None,
        };
        assert_eq!(arity.violation(3), None);
        assert_eq!(
            arity.violation(0),
            Some("Expects at least 1 arguments".to_string())
        );
        assert_eq!(
            arity.violation(6),
            Some("Expects at most 5 arguments".to_string())
        );
    }

    #[test]
    fn test_between_bounds() {
        let arity = Arity::between(2, 3, "fake arguments");
        assert_eq!(
            arity.violation(1),
            Some("Expects at least 2 fake arguments".to_string())
        );
        assert_eq!(arity.violation(2), None);
        assert_eq!(arity.violation(3), None);
        assert_eq!(
            arity.violation(4),
            Some("Expects at most 3 fake arguments".to_string())
        );
    }

    #[test]
    fn test_at_least_has_no_upper_bound() {
        let arity = Arity::at_least(1, "files");
        assert_eq!(arity.violation(0), Some("Expects at least 1 files".to_string()));
        assert_eq!(arity.violation(1000), None);
        assert!(arity.accepts_arguments());
    }
}
