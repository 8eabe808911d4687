use std::env;

#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

#[derive(Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
    /// Emit `file:line` of the event; operation failures rely on it to locate the error site.
    pub(crate) source_location: bool,
    pub(crate) ansi: bool,
    /// Warnings captured during config parsing so they can be logged after tracing is initialized.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        let component = component.trim().to_string();
        let mut warnings = Vec::new();

        let service_name = env_string("SERVICE_NAME")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| component.clone());

        let environment = env_string("STAGE")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let source_location = flag_or_default("LOG_SOURCE_LOCATION", true, &mut warnings);
        let ansi = flag_or_default("LOG_ANSI", true, &mut warnings);

        Self {
            service_context: ServiceContext {
                service_name,
                environment,
                component,
            },
            source_location,
            ansi,
            warnings,
        }
    }
}

fn flag_or_default(key: &str, default: bool, warnings: &mut Vec<String>) -> bool {
    match env_string(key) {
        Some(raw) if !raw.trim().is_empty() => parse_bool(&raw).unwrap_or_else(|| {
            warnings.push(format!("{key} is invalid (value: {raw}); defaulting to {default}"));
            default
        }),
        _ => default,
    }
}

/// Env-style flag: `1/true/t/yes/y/on` or `0/false/f/no/n/off`, case-insensitive.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bool_spellings() {
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn invalid_flag_falls_back_with_warning() {
        unsafe {
            env::set_var("OBSERVABILITY_TEST_FLAG", "sometimes");
        }
        let mut warnings = Vec::new();
        assert!(
            flag_or_default("OBSERVABILITY_TEST_FLAG", true, &mut warnings)
        );
        assert_eq!(warnings.len(), 1);
    }
}
