//! Read-only view handed to resolvers

use serde_json::{Map, Value};

/// What a resolver may see while computing a dependent property: the
/// values resolved so far (including virtual properties) and the raw input
/// of the current call.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    property: &'a str,
    depends_on: &'a [String],
    resolved: &'a Map<String, Value>,
    input: &'a Map<String, Value>,
}

impl<'a> ResolveContext<'a> {
    pub(crate) fn new(
        property: &'a str,
        depends_on: &'a [String],
        resolved: &'a Map<String, Value>,
        input: &'a Map<String, Value>,
    ) -> Self {
        Self {
            property,
            depends_on,
            resolved,
            input,
        }
    }

    /// Name of the property being resolved
    pub fn property(&self) -> &'a str {
        self.property
    }

    /// Resolved value of any property resolved so far
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.resolved.get(name)
    }

    /// Value of the first declared dependency
    pub fn dependency(&self) -> Option<&'a Value> {
        self.depends_on.first().and_then(|name| self.get(name))
    }

    /// Declared dependency names, in order
    pub fn dependency_names(&self) -> &'a [String] {
        self.depends_on
    }

    /// Dependency names paired with their resolved values, in order
    pub fn dependencies(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        let resolved = self.resolved;
        self.depends_on
            .iter()
            .filter_map(move |name| resolved.get(name).map(|v| (name.as_str(), v)))
    }

    /// Raw input of the current call (the changes, for an update)
    pub fn input(&self) -> &'a Map<String, Value> {
        self.input
    }
}
