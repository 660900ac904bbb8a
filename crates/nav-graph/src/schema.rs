//! Route schema: the static catalog of navigable destinations
//!
//! Destinations form an implicit graph, represented as a flat keyed
//! collection plus pattern matching rather than parent/child pointers.
//! The schema is assembled through [`SchemaBuilder`] before the
//! session starts and is immutable afterwards, which is what lets the
//! resolver type-check arguments without locking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::args::{ArgSpec, ArgType, ArgValue, SuppliedArgs};
use crate::error::{ResolutionError, SchemaError, SchemaResult};
use crate::pattern::RoutePattern;

/// Static, immutable description of one destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationDef {
    id: String,
    pattern: RoutePattern,
    args: HashMap<String, ArgSpec>,
}

impl DestinationDef {
    /// Start defining a destination from its id and route pattern
    pub fn new(id: impl Into<String>, pattern: &str) -> SchemaResult<Self> {
        Ok(Self {
            id: id.into(),
            pattern: RoutePattern::parse(pattern)?,
            args: HashMap::new(),
        })
    }

    /// Declare a required argument
    pub fn arg(mut self, name: impl Into<String>, ty: ArgType) -> Self {
        self.args.insert(name.into(), ArgSpec::required(ty));
        self
    }

    /// Declare an argument with a default, inferring its type
    pub fn arg_with_default(
        mut self,
        name: impl Into<String>,
        default: impl Into<ArgValue>,
    ) -> Self {
        self.args.insert(name.into(), ArgSpec::with_default(default));
        self
    }

    /// Unique destination id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The route pattern this destination answers to
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Declared argument specs, keyed by placeholder name
    pub fn args(&self) -> &HashMap<String, ArgSpec> {
        &self.args
    }

    /// Check pattern/arg-spec consistency
    ///
    /// Placeholder names must exactly equal the declared arg names,
    /// optional placeholders must carry defaults, and defaults must
    /// match their declared type.
    fn validate(&self) -> SchemaResult<()> {
        let malformed = |reason: String| SchemaError::MalformedPattern {
            pattern: self.pattern.as_str().to_string(),
            reason,
        };

        let mut placeholder_names = Vec::new();
        for (name, optional) in self.pattern.placeholders() {
            placeholder_names.push(name);
            let spec = self
                .args
                .get(name)
                .ok_or_else(|| malformed(format!("placeholder `{{{}}}` has no argument spec", name)))?;
            if optional && spec.default.is_none() {
                return Err(malformed(format!(
                    "optional placeholder `{{{}}}?` requires a default",
                    name
                )));
            }
        }
        for name in self.args.keys() {
            if !placeholder_names.contains(&name.as_str()) {
                return Err(malformed(format!(
                    "argument spec `{}` has no placeholder in the pattern",
                    name
                )));
            }
        }
        for (name, spec) in &self.args {
            if let Some(default) = &spec.default {
                if default.type_of() != spec.ty {
                    return Err(malformed(format!(
                        "default for `{}` is {}, declared type is {}",
                        name,
                        default.type_of(),
                        spec.ty
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Builder for [`RouteSchema`]
///
/// Consumed by [`SchemaBuilder::build`], so a schema can never be
/// mutated once the navigation session holds it.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    defs: HashMap<String, DestinationDef>,
    order: Vec<String>,
}

impl SchemaBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a destination definition
    pub fn register(&mut self, def: DestinationDef) -> SchemaResult<()> {
        def.validate()?;
        if self.defs.contains_key(def.id()) {
            return Err(SchemaError::DuplicateId(def.id().to_string()));
        }
        self.order.push(def.id().to_string());
        self.defs.insert(def.id().to_string(), def);
        Ok(())
    }

    /// Chainable variant of [`SchemaBuilder::register`]
    pub fn with(mut self, def: DestinationDef) -> SchemaResult<Self> {
        self.register(def)?;
        Ok(self)
    }

    /// Finalize into an immutable schema
    pub fn build(self) -> RouteSchema {
        RouteSchema {
            defs: self.defs,
            order: self.order,
        }
    }
}

/// Immutable catalog of destination definitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSchema {
    defs: HashMap<String, DestinationDef>,
    order: Vec<String>,
}

impl RouteSchema {
    /// Start building a schema
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Look up a definition by id
    pub fn lookup(&self, id: &str) -> Result<&DestinationDef, ResolutionError> {
        self.defs
            .get(id)
            .ok_or_else(|| ResolutionError::UnknownDestination(id.to_string()))
    }

    /// Registered ids, in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Definitions in registration order
    pub(crate) fn definitions(&self) -> impl Iterator<Item = &DestinationDef> {
        self.order.iter().filter_map(|id| self.defs.get(id))
    }

    /// Number of registered destinations
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the schema has no destinations
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Instantiate a destination's pattern with concrete arguments
    ///
    /// Inverse of resolution: fills each placeholder from `args` or
    /// its declared default and percent-encodes the result.
    pub fn format_route(&self, id: &str, args: &SuppliedArgs) -> Result<String, ResolutionError> {
        let def = self.lookup(id)?;
        let mut values: HashMap<String, ArgValue> = HashMap::new();
        for (name, spec) in def.args() {
            let value = match args.get(name) {
                Some(value) => {
                    if value.type_of() != spec.ty {
                        return Err(ResolutionError::ArgumentTypeMismatch {
                            name: name.clone(),
                            expected: spec.ty,
                            got: value.to_string(),
                        });
                    }
                    value.clone()
                }
                None => spec.default.clone().ok_or_else(|| {
                    ResolutionError::MissingRequiredArgument {
                        destination: id.to_string(),
                        name: name.clone(),
                    }
                })?,
            };
            values.insert(name.clone(), value);
        }
        def.pattern().instantiate(id, &values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> RouteSchema {
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
        builder.build()
    }

    #[test]
    fn test_register_then_lookup() {
        let schema = sample_schema();
        let def = schema.lookup("details").unwrap();
        assert_eq!(def.id(), "details");
        assert_eq!(def.pattern().as_str(), "details/{itemId}");
    }

    #[test]
    fn test_lookup_unknown_destination() {
        let schema = sample_schema();
        assert_eq!(
            schema.lookup("missing").unwrap_err(),
            ResolutionError::UnknownDestination("missing".to_string())
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut builder = RouteSchema::builder();
        builder
            .register(DestinationDef::new("home", "home").unwrap())
            .unwrap();
        let err = builder
            .register(DestinationDef::new("home", "start").unwrap())
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateId("home".to_string()));
    }

    #[test]
    fn test_placeholder_without_spec_rejected() {
        let mut builder = RouteSchema::builder();
        let err = builder
            .register(DestinationDef::new("details", "details/{itemId}").unwrap())
            .unwrap_err();
        assert!(matches!(err, SchemaError::MalformedPattern { .. }));
    }

    #[test]
    fn test_spec_without_placeholder_rejected() {
        let mut builder = RouteSchema::builder();
        let err = builder
            .register(
                DestinationDef::new("home", "home")
                    .unwrap()
                    .arg("stray", ArgType::String),
            )
            .unwrap_err();
        assert!(matches!(err, SchemaError::MalformedPattern { .. }));
    }

    #[test]
    fn test_optional_placeholder_requires_default() {
        let mut builder = RouteSchema::builder();
        let err = builder
            .register(
                DestinationDef::new("search", "search/{query}?")
                    .unwrap()
                    .arg("query", ArgType::String),
            )
            .unwrap_err();
        assert!(matches!(err, SchemaError::MalformedPattern { .. }));

        let mut builder = RouteSchema::builder();
        builder
            .register(
                DestinationDef::new("search", "search/{query}?")
                    .unwrap()
                    .arg_with_default("query", ""),
            )
            .unwrap();
    }

    #[test]
    fn test_format_route_with_args_and_defaults() {
        let schema = sample_schema();
        let mut args = SuppliedArgs::new();
        args.insert("itemId".to_string(), ArgValue::Integer(42));
        assert_eq!(schema.format_route("details", &args).unwrap(), "details/42");
        assert_eq!(
            schema.format_route("home", &SuppliedArgs::new()).unwrap(),
            "home"
        );
    }

    #[test]
    fn test_format_route_missing_argument() {
        let schema = sample_schema();
        assert_eq!(
            schema
                .format_route("details", &SuppliedArgs::new())
                .unwrap_err(),
            ResolutionError::MissingRequiredArgument {
                destination: "details".to_string(),
                name: "itemId".to_string(),
            }
        );
    }

    #[test]
    fn test_schema_serialization_round_trip() {
        let schema = sample_schema();
        let json = serde_json::to_string(&schema).unwrap();
        let parsed: RouteSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, parsed);
    }
}
