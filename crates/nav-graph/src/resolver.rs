//! Graph resolution: from route strings and URIs to typed instances
//!
//! Resolution is a pure function of (schema, request): no locks, no
//! I/O. The resolver matches a route string against every registered
//! pattern, picks the most specific match, and decodes arguments
//! against the declared specs with strict coercion.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::args::{ArgValue, ResolvedArgs, SuppliedArgs};
use crate::error::{ResolutionError, ResolveResult};
use crate::schema::{DestinationDef, RouteSchema};

/// A live occurrence of a destination, pushed onto the back stack
///
/// References its definition weakly, by id; a definition may appear
/// any number of times in a stack, so each instance carries a unique
/// entry key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationInstance {
    /// Id of the defining [`DestinationDef`]
    pub definition_id: String,
    /// Decoded argument values, all required arguments present
    pub args: ResolvedArgs,
    /// Opaque key distinguishing this occurrence from any other
    pub entry_key: String,
}

impl DestinationInstance {
    /// Create an instance with a fresh entry key
    pub fn new(definition_id: impl Into<String>, args: ResolvedArgs) -> Self {
        Self {
            definition_id: definition_id.into(),
            args,
            entry_key: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Look up a resolved argument by name
    pub fn arg(&self, name: &str) -> Option<&ArgValue> {
        self.args.get(name)
    }
}

/// Target of a navigation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NavTarget {
    /// A route string to match against registered patterns
    Route(String),
    /// A destination id, resolved from supplied args and defaults only
    Definition(String),
}

/// Accepted schemes and hosts for deep-link resolution
///
/// A URI carrying a scheme is only resolved if the scheme is listed
/// here; if any hosts are listed, the URI's host must be among them.
/// Scheme-less inputs are always treated as plain route strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeepLinkConfig {
    schemes: HashSet<String>,
    hosts: HashSet<String>,
}

impl DeepLinkConfig {
    /// Create an empty config accepting no schemes
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a scheme, e.g. `myapp` or `https`
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.schemes.insert(scheme.into());
        self
    }

    /// Accept a host; listing any host restricts URIs to the listed set
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.hosts.insert(host.into());
        self
    }

    fn accepts_scheme(&self, scheme: &str) -> bool {
        self.schemes.contains(scheme)
    }

    fn accepts_host(&self, host: &str) -> bool {
        self.hosts.is_empty() || self.hosts.contains(host)
    }
}

/// Resolves navigation requests against an immutable [`RouteSchema`]
#[derive(Debug, Clone)]
pub struct GraphResolver {
    schema: Arc<RouteSchema>,
    deep_links: DeepLinkConfig,
}

impl GraphResolver {
    /// Create a resolver over a finalized schema
    pub fn new(schema: Arc<RouteSchema>) -> Self {
        Self {
            schema,
            deep_links: DeepLinkConfig::default(),
        }
    }

    /// Attach a deep-link config
    pub fn with_deep_links(mut self, config: DeepLinkConfig) -> Self {
        self.deep_links = config;
        self
    }

    /// The schema this resolver reads from
    pub fn schema(&self) -> &Arc<RouteSchema> {
        &self.schema
    }

    /// Resolve a route string into a typed destination instance
    ///
    /// Argument precedence: values extracted from the path, then query
    /// `key=value` pairs, then `supplied` overlays, then declared
    /// defaults. Unknown query and supplied keys are ignored.
    pub fn resolve(
        &self,
        route: &str,
        supplied: &SuppliedArgs,
    ) -> ResolveResult<DestinationInstance> {
        let (path, query) = split_route(route);
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let mut best: Option<(&DestinationDef, HashMap<String, String>)> = None;
        for def in self.schema.definitions() {
            if let Some(values) = def.pattern().match_path(&path_segments) {
                let better = match &best {
                    Some((current, _)) => {
                        def.pattern().specificity() > current.pattern().specificity()
                    }
                    None => true,
                };
                if better {
                    best = Some((def, values));
                }
            }
        }

        let (def, path_values) =
            best.ok_or_else(|| ResolutionError::NoMatchingRoute(route.to_string()))?;
        let query_values = parse_query(query);
        self.decode_args(def, &path_values, &query_values, supplied)
            .map(|args| DestinationInstance::new(def.id(), args))
    }

    /// Resolve a navigation target, by route string or by id
    pub fn resolve_target(
        &self,
        target: &NavTarget,
        supplied: &SuppliedArgs,
    ) -> ResolveResult<DestinationInstance> {
        match target {
            NavTarget::Route(route) => self.resolve(route, supplied),
            NavTarget::Definition(id) => {
                let def = self.schema.lookup(id)?;
                self.decode_args(def, &HashMap::new(), &HashMap::new(), supplied)
                    .map(|args| DestinationInstance::new(def.id(), args))
            }
        }
    }

    /// Resolve an external URI into a destination instance
    ///
    /// Scheme and host are optional; a present scheme or host that is
    /// not accepted by the deep-link config, or a path matching no
    /// pattern, is the recoverable [`ResolutionError::UnresolvedDeepLink`].
    /// Argument failures on a matched pattern keep their own variants.
    pub fn resolve_deep_link(&self, uri: &str) -> ResolveResult<DestinationInstance> {
        let unresolved = |reason: String| ResolutionError::UnresolvedDeepLink {
            uri: uri.to_string(),
            reason,
        };

        let route = match uri.split_once("://") {
            Some((scheme, rest)) => {
                if !self.deep_links.accepts_scheme(scheme) {
                    return Err(unresolved(format!("unmapped scheme `{}`", scheme)));
                }
                let (host, path) = match rest.split_once('/') {
                    Some((host, path)) => (host, path),
                    None => (rest, ""),
                };
                if !self.deep_links.accepts_host(host) {
                    return Err(unresolved(format!("unmapped host `{}`", host)));
                }
                path
            }
            None => uri,
        };

        match self.resolve(route, &SuppliedArgs::new()) {
            Ok(instance) => Ok(instance),
            Err(ResolutionError::NoMatchingRoute(_)) => {
                Err(unresolved("no destination matches the path".to_string()))
            }
            Err(other) => Err(other),
        }
    }

    /// Decode one destination's arguments from the available sources
    fn decode_args(
        &self,
        def: &DestinationDef,
        path_values: &HashMap<String, String>,
        query_values: &HashMap<String, String>,
        supplied: &SuppliedArgs,
    ) -> ResolveResult<ResolvedArgs> {
        let mut args = ResolvedArgs::new();
        for (name, spec) in def.args() {
            let value = if let Some(raw) = path_values.get(name) {
                spec.ty.coerce(name, raw)?
            } else if let Some(raw) = query_values.get(name) {
                spec.ty.coerce(name, raw)?
            } else if let Some(value) = supplied.get(name) {
                if value.type_of() != spec.ty {
                    return Err(ResolutionError::ArgumentTypeMismatch {
                        name: name.clone(),
                        expected: spec.ty,
                        got: value.to_string(),
                    });
                }
                value.clone()
            } else if let Some(default) = &spec.default {
                default.clone()
            } else {
                return Err(ResolutionError::MissingRequiredArgument {
                    destination: def.id().to_string(),
                    name: name.clone(),
                });
            };
            args.insert(name.clone(), value);
        }
        Ok(args)
    }
}

/// Split a route string into path and optional query
fn split_route(route: &str) -> (&str, Option<&str>) {
    match route.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (route, None),
    }
}

/// Parse query `key=value` pairs, percent-decoding values
fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    let mut values = HashMap::new();
    if let Some(query) = query {
        for pair in query.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                if let Ok(decoded) = urlencoding::decode(value) {
                    values.insert(key.to_string(), decoded.into_owned());
                }
            }
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ArgType;
    use crate::schema::DestinationDef;

    fn sample_resolver() -> GraphResolver {
        let mut builder = RouteSchema::builder();
        builder
            .register(DestinationDef::new("home", "home").unwrap())
            .unwrap();
        builder
            .register(
                DestinationDef::new("details", "details/{itemId}")
                    .unwrap()
                    .arg("itemId", ArgType::Integer),
            )
            .unwrap();
        builder
            .register(DestinationDef::new("details_new", "details/new").unwrap())
            .unwrap();
        builder
            .register(
                DestinationDef::new("search", "search/{query}?")
                    .unwrap()
                    .arg_with_default("query", ""),
            )
            .unwrap();
        GraphResolver::new(Arc::new(builder.build()))
            .with_deep_links(DeepLinkConfig::new().scheme("myapp"))
    }

    #[test]
    fn test_resolve_decodes_typed_argument() {
        let resolver = sample_resolver();
        let instance = resolver.resolve("details/42", &SuppliedArgs::new()).unwrap();
        assert_eq!(instance.definition_id, "details");
        assert_eq!(instance.arg("itemId"), Some(&ArgValue::Integer(42)));
    }

    #[test]
    fn test_resolve_type_mismatch_is_typed_failure() {
        let resolver = sample_resolver();
        let err = resolver
            .resolve("details/abc", &SuppliedArgs::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::ArgumentTypeMismatch { .. }
        ));
    }

    #[test]
    fn test_resolve_no_matching_route() {
        let resolver = sample_resolver();
        assert_eq!(
            resolver
                .resolve("nowhere/at/all", &SuppliedArgs::new())
                .unwrap_err(),
            ResolutionError::NoMatchingRoute("nowhere/at/all".to_string())
        );
    }

    #[test]
    fn test_literal_pattern_beats_placeholder() {
        let resolver = sample_resolver();
        let instance = resolver.resolve("details/new", &SuppliedArgs::new()).unwrap();
        assert_eq!(instance.definition_id, "details_new");
    }

    #[test]
    fn test_optional_argument_defaults() {
        let resolver = sample_resolver();
        let instance = resolver.resolve("search", &SuppliedArgs::new()).unwrap();
        assert_eq!(instance.arg("query"), Some(&ArgValue::String(String::new())));
    }

    #[test]
    fn test_query_value_fills_omitted_placeholder() {
        let resolver = sample_resolver();
        let instance = resolver
            .resolve("search?query=rust%20lang", &SuppliedArgs::new())
            .unwrap();
        assert_eq!(
            instance.arg("query"),
            Some(&ArgValue::String("rust lang".to_string()))
        );
    }

    #[test]
    fn test_supplied_args_overlay() {
        let resolver = sample_resolver();
        let mut supplied = SuppliedArgs::new();
        supplied.insert("query".to_string(), ArgValue::String("x".to_string()));
        let instance = resolver.resolve("search", &supplied).unwrap();
        assert_eq!(instance.arg("query"), Some(&ArgValue::String("x".to_string())));
    }

    #[test]
    fn test_path_value_wins_over_supplied() {
        let resolver = sample_resolver();
        let mut supplied = SuppliedArgs::new();
        supplied.insert("itemId".to_string(), ArgValue::Integer(7));
        let instance = resolver.resolve("details/42", &supplied).unwrap();
        assert_eq!(instance.arg("itemId"), Some(&ArgValue::Integer(42)));
    }

    #[test]
    fn test_resolve_target_by_definition_id() {
        let resolver = sample_resolver();
        let mut supplied = SuppliedArgs::new();
        supplied.insert("itemId".to_string(), ArgValue::Integer(9));
        let instance = resolver
            .resolve_target(&NavTarget::Definition("details".to_string()), &supplied)
            .unwrap();
        assert_eq!(instance.arg("itemId"), Some(&ArgValue::Integer(9)));

        let err = resolver
            .resolve_target(
                &NavTarget::Definition("details".to_string()),
                &SuppliedArgs::new(),
            )
            .unwrap_err();
        assert!(matches!(err, ResolutionError::MissingRequiredArgument { .. }));
    }

    #[test]
    fn test_deep_link_with_accepted_scheme() {
        let resolver = sample_resolver();
        let instance = resolver
            .resolve_deep_link("myapp://nav/details/42")
            .unwrap();
        assert_eq!(instance.definition_id, "details");
        assert_eq!(instance.arg("itemId"), Some(&ArgValue::Integer(42)));
    }

    #[test]
    fn test_deep_link_unmapped_scheme_rejected() {
        let resolver = sample_resolver();
        let err = resolver
            .resolve_deep_link("https://example.com/details/42")
            .unwrap_err();
        assert!(matches!(err, ResolutionError::UnresolvedDeepLink { .. }));
    }

    #[test]
    fn test_deep_link_unmapped_host_rejected() {
        let mut builder = RouteSchema::builder();
        builder
            .register(DestinationDef::new("home", "home").unwrap())
            .unwrap();
        let resolver = GraphResolver::new(Arc::new(builder.build()))
            .with_deep_links(DeepLinkConfig::new().scheme("myapp").host("nav"));
        assert!(resolver.resolve_deep_link("myapp://nav/home").is_ok());
        assert!(matches!(
            resolver.resolve_deep_link("myapp://elsewhere/home").unwrap_err(),
            ResolutionError::UnresolvedDeepLink { .. }
        ));
    }

    #[test]
    fn test_deep_link_without_scheme_is_plain_route() {
        let resolver = sample_resolver();
        let instance = resolver.resolve_deep_link("details/42").unwrap();
        assert_eq!(instance.definition_id, "details");
    }

    #[test]
    fn test_deep_link_unmatched_path_is_unresolved() {
        let resolver = sample_resolver();
        assert!(matches!(
            resolver.resolve_deep_link("myapp://nav/unknown").unwrap_err(),
            ResolutionError::UnresolvedDeepLink { .. }
        ));
    }

    #[test]
    fn test_entry_keys_are_unique_per_instance() {
        let resolver = sample_resolver();
        let a = resolver.resolve("home", &SuppliedArgs::new()).unwrap();
        let b = resolver.resolve("home", &SuppliedArgs::new()).unwrap();
        assert_ne!(a.entry_key, b.entry_key);
    }
}
