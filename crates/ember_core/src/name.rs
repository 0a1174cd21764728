use std::fmt;

use flecs_ecs::prelude::*;

/// Human readable entity label.
///
/// Kept as a plain component instead of a flecs identifier: imported nodes
/// routinely share names under the same parent, which flecs paths reject.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}
