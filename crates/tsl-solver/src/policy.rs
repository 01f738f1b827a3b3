//! Readonlyness policy: method handling and the origin allowlist.

use globset::{Glob, GlobMatcher};

use crate::types::{OriginSource, TypeOrigin};

/// Matches declared types by name and declaring location.
#[derive(Clone, Debug)]
pub enum OriginMatcher {
    /// Any type with this name, wherever it is declared.
    Name(String),
    /// Types declared in the program's own files, optionally restricted to
    /// paths matching a glob.
    File {
        names: Vec<String>,
        path: Option<GlobMatcher>,
    },
    /// Types declared in the default library files.
    Lib { names: Vec<String> },
    /// Types declared by an installed package.
    Package { names: Vec<String>, package: String },
}

impl OriginMatcher {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// File matcher; `path` is a glob over the declaring file's path.
    pub fn file(names: Vec<String>, path: Option<&str>) -> Result<Self, globset::Error> {
        let path = match path {
            Some(pattern) => Some(Glob::new(pattern)?.compile_matcher()),
            None => None,
        };
        Ok(Self::File { names, path })
    }

    pub fn lib(names: Vec<String>) -> Self {
        Self::Lib { names }
    }

    pub fn package(names: Vec<String>, package: impl Into<String>) -> Self {
        Self::Package {
            names,
            package: package.into(),
        }
    }

    pub fn matches(&self, origin: &TypeOrigin) -> bool {
        let named = |names: &[String]| names.iter().any(|name| *name == origin.name);
        match (self, &origin.source) {
            (Self::Name(name), _) => *name == origin.name,
            (Self::File { names, path }, OriginSource::File { path: declared }) => {
                named(names)
                    && path
                        .as_ref()
                        .is_none_or(|glob| glob.is_match(declared.trim_start_matches("./")))
            }
            (Self::Lib { names }, OriginSource::Lib { .. }) => named(names),
            (Self::Package { names, package }, OriginSource::Package { package: declared }) => {
                named(names) && package == declared
            }
            _ => false,
        }
    }
}

/// Configuration consumed by the readonlyness classifier.
#[derive(Clone, Debug, Default)]
pub struct Policy {
    /// Exempt methods from the `readonly` marking requirement.
    pub treat_methods_as_immutable: bool,
    /// Types that are trusted as immutable without inspection.
    pub allowlist: Vec<OriginMatcher>,
}

impl Policy {
    #[must_use]
    pub fn with_methods_as_immutable(mut self, enabled: bool) -> Self {
        self.treat_methods_as_immutable = enabled;
        self
    }

    #[must_use]
    pub fn allow(mut self, matcher: OriginMatcher) -> Self {
        self.allowlist.push(matcher);
        self
    }

    pub fn is_allowlisted(&self, origin: &TypeOrigin) -> bool {
        self.allowlist.iter().any(|matcher| matcher.matches(origin))
    }
}

#[cfg(test)]
#[path = "../tests/policy_tests.rs"]
mod policy_tests;
