//! Declarative template definitions and groups

use super::content::ContentSource;
use super::value::{Predicate, Value};
use crate::context::Context;
use std::fmt;

/// A proposed package.json entry, optionally gated on the context
#[derive(Clone)]
pub struct Proposal<T> {
    pub key: String,
    pub value: Value<T>,
    pub when: Option<Predicate>,
}

impl<T> Proposal<T> {
    /// Whether this proposal applies to the context (default: always)
    pub fn applies(&self, ctx: &Context) -> bool {
        self.when.map_or(true, |when| when(ctx))
    }
}

impl<T: fmt::Debug> fmt::Debug for Proposal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proposal")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("conditional", &self.when.is_some())
            .finish()
    }
}

/// Additive package.json changes proposed by a definition
#[derive(Debug, Clone, Default)]
pub struct ManifestMods {
    /// Entries under `scripts`, in declaration order
    pub scripts: Vec<Proposal<String>>,
    /// Top-level keys such as `lint-staged`, in declaration order
    pub config: Vec<Proposal<serde_json::Value>>,
}

/// One potential output file
#[derive(Clone)]
pub struct TemplateDefinition {
    /// Project-relative, forward-slash target path
    pub target_path: Value<String>,

    /// Human-readable label
    pub label: &'static str,

    pub content: ContentSource,

    /// Inclusion predicate; `None` means always included
    pub when: Option<Predicate>,

    /// Dev dependencies required when this file is written
    pub dev_dependencies: Vec<String>,

    pub manifest_mods: ManifestMods,
}

impl TemplateDefinition {
    pub fn new(
        target_path: impl Into<Value<String>>,
        label: &'static str,
        content: ContentSource,
    ) -> Self {
        Self {
            target_path: target_path.into(),
            label,
            content,
            when: None,
            dev_dependencies: Vec::new(),
            manifest_mods: ManifestMods::default(),
        }
    }

    /// Only include this file when the predicate holds
    pub fn when(mut self, predicate: Predicate) -> Self {
        self.when = Some(predicate);
        self
    }

    pub fn dev_dependencies(mut self, deps: &[&str]) -> Self {
        self.dev_dependencies
            .extend(deps.iter().map(|d| d.to_string()));
        self
    }

    pub fn script(mut self, name: &str, value: impl Into<Value<String>>) -> Self {
        self.manifest_mods.scripts.push(Proposal {
            key: name.to_string(),
            value: value.into(),
            when: None,
        });
        self
    }

    pub fn computed_script(mut self, name: &str, compute: fn(&Context) -> String) -> Self {
        self.manifest_mods.scripts.push(Proposal {
            key: name.to_string(),
            value: Value::Computed(compute),
            when: None,
        });
        self
    }

    /// A script proposal that only applies when the predicate holds
    pub fn script_when(
        mut self,
        name: &str,
        value: impl Into<Value<String>>,
        when: Predicate,
    ) -> Self {
        self.manifest_mods.scripts.push(Proposal {
            key: name.to_string(),
            value: value.into(),
            when: Some(when),
        });
        self
    }

    pub fn config(mut self, key: &str, value: impl Into<Value<serde_json::Value>>) -> Self {
        self.manifest_mods.config.push(Proposal {
            key: key.to_string(),
            value: value.into(),
            when: None,
        });
        self
    }

    pub fn computed_config(
        mut self,
        key: &str,
        compute: fn(&Context) -> serde_json::Value,
    ) -> Self {
        self.manifest_mods.config.push(Proposal {
            key: key.to_string(),
            value: Value::Computed(compute),
            when: None,
        });
        self
    }

    /// Whether this definition applies to the context
    pub fn is_included(&self, ctx: &Context) -> bool {
        self.when.map_or(true, |when| when(ctx))
    }
}

impl fmt::Debug for TemplateDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateDefinition")
            .field("target_path", &self.target_path)
            .field("label", &self.label)
            .field("content", &self.content)
            .field("conditional", &self.when.is_some())
            .field("dev_dependencies", &self.dev_dependencies)
            .field("manifest_mods", &self.manifest_mods)
            .finish()
    }
}

/// A named, user-selectable bundle of definitions
#[derive(Debug, Clone)]
pub struct TemplateGroup {
    /// Stable identifier used on the command line
    pub id: &'static str,
    pub label: &'static str,
    pub definitions: Vec<TemplateDefinition>,
}

impl TemplateGroup {
    pub fn new(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            definitions: Vec::new(),
        }
    }

    pub fn with(mut self, definition: TemplateDefinition) -> Self {
        self.definitions.push(definition);
        self
    }
}
