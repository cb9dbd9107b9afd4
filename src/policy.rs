//! Path policy: which credentials a request path needs.
//!
//! Plain prefix matching against two independent lists. A path may need both
//! credentials, one, or neither.

use crate::config::AuthConfig;

/// Checks a path requires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathPolicy {
    pub requires_master: bool,
    pub requires_access: bool,
}

impl PathPolicy {
    pub fn is_open(&self) -> bool {
        !self.requires_master && !self.requires_access
    }
}

#[derive(Debug, Clone, Default)]
pub struct PolicyMatcher {
    master_paths: Vec<String>,
    access_paths: Vec<String>,
}

impl PolicyMatcher {
    pub fn new(master_paths: Vec<String>, access_paths: Vec<String>) -> Self {
        Self {
            master_paths,
            access_paths,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.effective_master_paths(),
            config.access_token_paths.clone(),
        )
    }

    pub fn classify(&self, path: &str) -> PathPolicy {
        PathPolicy {
            requires_master: matches_any(&self.master_paths, path),
            requires_access: matches_any(&self.access_paths, path),
        }
    }

    pub fn master_paths(&self) -> &[String] {
        &self.master_paths
    }

    pub fn access_paths(&self) -> &[String] {
        &self.access_paths
    }
}

fn matches_any(prefixes: &[String], path: &str) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> PolicyMatcher {
        PolicyMatcher::new(
            vec!["/auth/token/new".to_string(), "/master".to_string(), "/both".to_string()],
            vec!["/access".to_string(), "/both".to_string(), "/ws".to_string()],
        )
    }

    #[test]
    fn test_open_path() {
        let policy = matcher().classify("/health");
        assert!(policy.is_open());
        assert_eq!(policy, PathPolicy::default());
    }

    #[test]
    fn test_master_only() {
        let policy = matcher().classify("/master/health");
        assert!(policy.requires_master);
        assert!(!policy.requires_access);
    }

    #[test]
    fn test_access_only() {
        let policy = matcher().classify("/access/health");
        assert!(!policy.requires_master);
        assert!(policy.requires_access);
    }

    #[test]
    fn test_both_lists_match() {
        let policy = matcher().classify("/both/x");
        assert!(policy.requires_master);
        assert!(policy.requires_access);
    }

    #[test]
    fn test_prefix_not_wildcard() {
        let m = matcher();
        // Plain string prefix: "/accessible" starts with "/access"
        assert!(m.classify("/accessible").requires_access);
        // Match is anchored at the start of the path
        assert!(m.classify("/v1/access").is_open());
        // No glob semantics
        let globbed = PolicyMatcher::new(vec!["/admin/*".to_string()], vec![]);
        assert!(!globbed.classify("/admin/users").requires_master);
    }

    #[test]
    fn test_classify_is_pure() {
        let m = matcher();
        let first = m.classify("/both/x");
        for _ in 0..10 {
            assert_eq!(m.classify("/both/x"), first);
        }
    }

    #[test]
    fn test_from_config_includes_mint_route() {
        let config = AuthConfig {
            master_token_paths: vec!["/admin".to_string()],
            access_token_paths: vec!["/api".to_string()],
            ..Default::default()
        };
        let m = PolicyMatcher::from_config(&config);
        assert!(m.classify("/auth/token/new").requires_master);
        assert!(!m.classify("/auth/token/refresh").requires_master);
        assert!(m.classify("/admin/x").requires_master);
        assert!(m.classify("/api/x").requires_access);
    }
}
