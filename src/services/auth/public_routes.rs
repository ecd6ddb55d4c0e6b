//! Public route classification.
//!
//! Specifiers come from configuration (`PUBLIC_ROUTES`) and are compiled once at
//! startup. Classification is a union test over the compiled matchers: a path is
//! public iff at least one matcher accepts it.

/// A compiled public route specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatcher {
    /// `/`: the root path only.
    Root,
    /// `R`: `R` itself and anything below it (`R/...`), bounded at a segment.
    Prefix(String),
}

impl RouteMatcher {
    /// Compile one specifier. Returns `None` for blank specifiers.
    pub fn compile(specifier: &str) -> Option<Self> {
        let specifier = specifier.trim();
        if specifier.is_empty() {
            return None;
        }

        // "/docs/" and "/docs" are the same route
        let normalized = specifier.trim_end_matches('/');
        if normalized.is_empty() {
            return Some(Self::Root);
        }

        Some(Self::Prefix(normalized.to_string()))
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Root => path.is_empty() || path == "/",
            Self::Prefix(prefix) => match path.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

/// Immutable set of public route matchers.
#[derive(Debug, Clone, Default)]
pub struct PublicRoutes {
    matchers: Vec<RouteMatcher>,
}

impl PublicRoutes {
    pub fn compile<I, S>(specifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let matchers = specifiers
            .into_iter()
            .filter_map(|s| RouteMatcher::compile(s.as_ref()))
            .collect();

        Self { matchers }
    }

    /// `path` is the URL path only (no query string).
    pub fn is_public(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }

    pub fn matchers(&self) -> &[RouteMatcher] {
        &self.matchers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> PublicRoutes {
        PublicRoutes::compile(["/", "/docs", "/auth/login"])
    }

    #[test]
    fn compiles_one_matcher_per_specifier() {
        assert_eq!(
            routes().matchers(),
            &[
                RouteMatcher::Root,
                RouteMatcher::Prefix("/docs".to_string()),
                RouteMatcher::Prefix("/auth/login".to_string()),
            ]
        );
    }

    #[test]
    fn blank_specifiers_are_ignored_and_trailing_slash_normalized() {
        let routes = PublicRoutes::compile(["", "  ", "/docs/", "//"]);
        assert_eq!(
            routes.matchers(),
            &[RouteMatcher::Prefix("/docs".to_string()), RouteMatcher::Root]
        );
    }

    #[test]
    fn root_matches_only_root() {
        let routes = PublicRoutes::compile(["/"]);
        assert!(routes.is_public("/"));
        assert!(routes.is_public(""));
        assert!(!routes.is_public("/users"));
        assert!(!routes.is_public("//"));
    }

    #[test]
    fn prefix_matches_itself_and_sub_paths() {
        let routes = routes();
        assert!(routes.is_public("/docs"));
        assert!(routes.is_public("/docs/"));
        assert!(routes.is_public("/docs/v2"));
        assert!(routes.is_public("/docs/v2/index.html"));
        assert!(routes.is_public("/auth/login"));
    }

    #[test]
    fn prefix_is_bounded_at_segment() {
        let routes = routes();
        assert!(!routes.is_public("/docsx"));
        assert!(!routes.is_public("/docs-internal/x"));
        assert!(!routes.is_public("/auth/loginx"));
        assert!(!routes.is_public("/auth"));
        assert!(!routes.is_public("/api/docs"));
    }

    #[test]
    fn unmatched_paths_are_protected() {
        let routes = routes();
        assert!(!routes.is_public("/users/1"));
        assert!(!PublicRoutes::default().is_public("/"));
    }

    #[test]
    fn order_does_not_change_the_outcome() {
        let forward = PublicRoutes::compile(["/", "/docs", "/health"]);
        let reverse = PublicRoutes::compile(["/health", "/docs", "/"]);

        for path in ["/", "/docs/a", "/health", "/healthz", "/users", ""] {
            assert_eq!(forward.is_public(path), reverse.is_public(path), "{path}");
            // classifying twice is stable
            assert_eq!(forward.is_public(path), forward.is_public(path));
        }
    }
}
