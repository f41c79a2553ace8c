/// Supplies the generation API key. `None` means the gateway runs offline.
pub trait CredentialSource: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

/// A key fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(pub Option<String>);

impl CredentialSource for StaticCredential {
    fn api_key(&self) -> Option<String> {
        self.0.clone().filter(|k| !k.trim().is_empty())
    }
}

/// Reads the key from the process environment on every call, first variable wins.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    vars: Vec<String>,
}

impl EnvCredential {
    pub fn new<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(Into::into).collect(),
        }
    }
}

impl CredentialSource for EnvCredential {
    fn api_key(&self) -> Option<String> {
        self.vars
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_credential_treats_blank_as_missing() {
        assert_eq!(StaticCredential(None).api_key(), None);
        assert_eq!(StaticCredential(Some("  ".to_string())).api_key(), None);
        assert_eq!(
            StaticCredential(Some("k".to_string())).api_key().as_deref(),
            Some("k")
        );
    }

    #[test]
    fn test_env_credential_prefers_first_set_variable() {
        std::env::set_var("PORTFOLIO_TEST_CRED_B", "second");
        let source = EnvCredential::new(["PORTFOLIO_TEST_CRED_A", "PORTFOLIO_TEST_CRED_B"]);
        assert_eq!(source.api_key().as_deref(), Some("second"));

        std::env::set_var("PORTFOLIO_TEST_CRED_A", "first");
        assert_eq!(source.api_key().as_deref(), Some("first"));
    }
}
