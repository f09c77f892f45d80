//! Environment diagnostics
//!
//! Proxy settings and `AWS_` variables are the usual suspects when a bucket
//! is reachable from one host but not another, so the report lists them.
//! Values are shown as-is.

/// Prefix of the AWS SDK's standard environment variables
pub const AWS_ENV_PREFIX: &str = "AWS_";

/// Environment variables relevant to connectivity and credentials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvDiagnostics {
    /// Variables whose name contains "proxy", case-insensitively
    pub proxy: Vec<(String, String)>,

    /// Variables whose name starts with `AWS_`
    pub aws: Vec<(String, String)>,
}

impl EnvDiagnostics {
    /// Partition the given variables, sorted by name
    pub fn collect<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut diagnostics = Self::default();

        for (name, value) in vars {
            let name = name.into();
            let value = value.into();
            if name.to_ascii_lowercase().contains("proxy") {
                diagnostics.proxy.push((name.clone(), value.clone()));
            }
            if name.starts_with(AWS_ENV_PREFIX) {
                diagnostics.aws.push((name, value));
            }
        }

        diagnostics.proxy.sort();
        diagnostics.aws.sort();
        diagnostics
    }

    /// Snapshot of the current process environment
    pub fn from_process() -> Self {
        Self::collect(std::env::vars_os().map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_partitions_variables() {
        let diagnostics = EnvDiagnostics::collect([
            ("HTTPS_PROXY", "http://proxy:3128"),
            ("no_proxy", "localhost"),
            ("AWS_REGION", "us-west-2"),
            ("AWS_PROFILE", "backup"),
            ("HOME", "/root"),
            ("MY_AWS_THING", "x"),
        ]);

        assert_eq!(
            diagnostics.proxy,
            vec![
                ("HTTPS_PROXY".to_string(), "http://proxy:3128".to_string()),
                ("no_proxy".to_string(), "localhost".to_string()),
            ]
        );
        assert_eq!(
            diagnostics.aws,
            vec![
                ("AWS_PROFILE".to_string(), "backup".to_string()),
                ("AWS_REGION".to_string(), "us-west-2".to_string()),
            ]
        );
    }

    #[test]
    fn test_collect_variable_in_both_groups() {
        let diagnostics = EnvDiagnostics::collect([("AWS_PROXY_HOST", "proxy.internal")]);
        assert_eq!(diagnostics.proxy.len(), 1);
        assert_eq!(diagnostics.aws.len(), 1);
    }

    #[test]
    fn test_collect_prefix_is_case_sensitive() {
        let diagnostics = EnvDiagnostics::collect([("aws_region", "us-east-1")]);
        assert!(diagnostics.aws.is_empty());
    }

    #[test]
    fn test_collect_empty() {
        let diagnostics = EnvDiagnostics::collect(Vec::<(String, String)>::new());
        assert!(diagnostics.proxy.is_empty());
        assert!(diagnostics.aws.is_empty());
    }
}
