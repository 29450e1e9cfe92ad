//! Module dependency resolution
//!
//! Turns a module's declared dependencies into the argument list of its
//! factory. Dependencies are resolved eagerly, in declaration order; the first
//! failure aborts the registration before the factory runs.

use crate::module::registry::strategy::ResolutionStrategy;
use crate::module::traits::RegistrationError;
use crate::module::value::Value;

/// Reserved name of the resolution-function special
pub const REQUIRE: &str = "require";
/// Reserved name of the exports-record special
pub const EXPORTS: &str = "exports";
/// Reserved name of the module-handle special
pub const MODULE: &str = "module";

/// Specials, in the order factories receive them when no dependencies are declared
pub const SPECIAL_NAMES: [&str; 3] = [REQUIRE, EXPORTS, MODULE];

/// A declared dependency
#[derive(Debug, Clone, PartialEq)]
pub enum DependencyRef {
    /// Module or special, by name
    Named(String),
    /// Already-resolved value, passed through untouched
    Literal(Value),
    /// `[browser, package]` pair; the active mode picks one
    Disambiguated(String, String),
}

impl DependencyRef {
    pub fn named(name: impl Into<String>) -> Self {
        DependencyRef::Named(name.into())
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        DependencyRef::Literal(value.into())
    }

    pub fn pick(browser: impl Into<String>, package: impl Into<String>) -> Self {
        DependencyRef::Disambiguated(browser.into(), package.into())
    }

    /// Reduce a disambiguation pair to the name at `index`
    ///
    /// Index 0 selects the browser identifier, anything else the package one.
    pub fn disambiguate(&self, index: usize) -> DependencyRef {
        match self {
            DependencyRef::Disambiguated(browser, package) => {
                let picked = if index == 0 { browser } else { package };
                DependencyRef::Named(picked.clone())
            }
            other => other.clone(),
        }
    }

    /// Name of a plain named dependency
    pub fn as_name(&self) -> Option<&str> {
        match self {
            DependencyRef::Named(name) => Some(name),
            _ => None,
        }
    }
}

impl From<&str> for DependencyRef {
    fn from(name: &str) -> Self {
        DependencyRef::Named(name.to_string())
    }
}

impl From<String> for DependencyRef {
    fn from(name: String) -> Self {
        DependencyRef::Named(name)
    }
}

impl From<(&str, &str)> for DependencyRef {
    fn from((browser, package): (&str, &str)) -> Self {
        DependencyRef::pick(browser, package)
    }
}

/// Strings name a dependency; any other value is a literal.
impl From<Value> for DependencyRef {
    fn from(value: Value) -> Self {
        match value {
            Value::String(name) => DependencyRef::Named(name),
            other => DependencyRef::Literal(other),
        }
    }
}

/// `require`, `exports` and `module`
pub fn default_dependencies() -> Vec<DependencyRef> {
    SPECIAL_NAMES.iter().map(|name| DependencyRef::from(*name)).collect()
}

/// Per-registration values of the reserved dependency names
#[derive(Debug, Clone)]
pub struct Specials {
    /// Resolution function of the active mode
    pub require: Value,
    /// Exports record (fresh, or supplied by the host)
    pub exports: Value,
    /// Host module handle
    pub module: Value,
}

impl Specials {
    pub fn get(&self, name: &str) -> Option<&Value> {
        match name {
            REQUIRE => Some(&self.require),
            EXPORTS => Some(&self.exports),
            MODULE => Some(&self.module),
            _ => None,
        }
    }
}

/// Resolve one dependency
///
/// Literals are returned as-is, specials come from `specials`, and every
/// other name goes through `strategy`.
pub fn resolve(
    dependency: &DependencyRef,
    index: usize,
    specials: &Specials,
    strategy: &ResolutionStrategy,
) -> Result<Value, RegistrationError> {
    let name = match dependency {
        DependencyRef::Literal(value) => return Ok(value.clone()),
        DependencyRef::Named(name) => name.as_str(),
        DependencyRef::Disambiguated(browser, package) => {
            if index == 0 {
                browser.as_str()
            } else {
                package.as_str()
            }
        }
    };

    match specials.get(name) {
        Some(special) => Ok(special.clone()),
        None => strategy.resolve(name),
    }
}

/// Resolve a dependency list into factory arguments
///
/// `None` resolves the three specials.
pub fn resolve_all(
    dependencies: Option<&[DependencyRef]>,
    index: usize,
    specials: &Specials,
    strategy: &ResolutionStrategy,
) -> Result<Vec<Value>, RegistrationError> {
    match dependencies {
        Some(deps) => deps
            .iter()
            .map(|dep| resolve(dep, index, specials, strategy))
            .collect(),
        None => default_dependencies()
            .iter()
            .map(|dep| resolve(dep, index, specials, strategy))
            .collect(),
    }
}
