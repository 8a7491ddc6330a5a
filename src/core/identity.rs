//! Identity of a binary inside one build snapshot and its canonical string key.
//!
//! A key has the shape `<module>:<component>:<variant>`. The root module is
//! written as `:`, so a root binary reads `::main:debug` while a binary of
//! module `:lib` reads `:lib:main:debug`. Component and variant names escape
//! `\` and `:` with a backslash; the module path escapes `\` only. The last two
//! unescaped separators therefore always delimit component and variant, which
//! keeps the mapping injective.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::KeyParseError;

pub const PATH_SEPARATOR: char = ':';
pub const ROOT_MODULE_PATH: &str = ":";

const ESCAPE: char = '\\';

/// (module path, component name, variant name). Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ArtifactIdentity {
    module_path: String,
    component: String,
    variant: String,
}

/// Canonical lookup key derived from an [`ArtifactIdentity`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactKey(String);

impl ArtifactIdentity {
    /// An empty module path denotes the root module and is stored as `:`.
    pub fn new(
        module_path: impl Into<String>,
        component: impl Into<String>,
        variant: impl Into<String>,
    ) -> Self {
        let module_path = module_path.into();
        Self {
            module_path: if module_path.is_empty() {
                ROOT_MODULE_PATH.to_string()
            } else {
                module_path
            },
            component: component.into(),
            variant: variant.into(),
        }
    }

    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn is_root_module(&self) -> bool {
        self.module_path == ROOT_MODULE_PATH
    }

    pub fn key(&self) -> ArtifactKey {
        let mut key = String::with_capacity(
            self.module_path.len() + self.component.len() + self.variant.len() + 2,
        );
        escape_into(&mut key, &self.module_path, false);
        key.push(PATH_SEPARATOR);
        escape_into(&mut key, &self.component, true);
        key.push(PATH_SEPARATOR);
        escape_into(&mut key, &self.variant, true);
        ArtifactKey(key)
    }
}

impl ArtifactKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn escape_into(out: &mut String, value: &str, escape_separator: bool) {
    for ch in value.chars() {
        if ch == ESCAPE || (escape_separator && ch == PATH_SEPARATOR) {
            out.push(ESCAPE);
        }
        out.push(ch);
    }
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == ESCAPE {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

impl FromStr for ArtifactIdentity {
    type Err = KeyParseError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        // Byte offsets of separators that are not escaped
        let mut separators = Vec::new();
        let mut escaped = false;
        for (offset, ch) in key.char_indices() {
            if escaped {
                escaped = false;
            } else if ch == ESCAPE {
                escaped = true;
            } else if ch == PATH_SEPARATOR {
                separators.push(offset);
            }
        }
        if escaped {
            return Err(KeyParseError::DanglingEscape(key.to_string()));
        }

        let (component_sep, variant_sep) = match separators.as_slice() {
            [.., a, b] => (*a, *b),
            _ => return Err(KeyParseError::MissingSeparators(key.to_string())),
        };

        let module_path = &key[..component_sep];
        if module_path.is_empty() {
            return Err(KeyParseError::EmptyModulePath(key.to_string()));
        }

        Ok(Self {
            module_path: unescape(module_path),
            component: unescape(&key[component_sep + 1..variant_sep]),
            variant: unescape(&key[variant_sep + 1..]),
        })
    }
}

impl TryFrom<String> for ArtifactIdentity {
    type Error = KeyParseError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        key.parse()
    }
}

impl From<ArtifactIdentity> for String {
    fn from(id: ArtifactIdentity) -> Self {
        id.key().into_string()
    }
}

impl fmt::Display for ArtifactIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key().as_str())
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
