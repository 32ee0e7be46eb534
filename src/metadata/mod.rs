//! metadata
//!
//! Module metadata model and the declaration merge policy.
//!
//! # Overview
//!
//! A plugin archive carries its metadata as a *pack descriptor*: a JSON entry
//! attached to the designated pack type, holding an ordered list of
//! declarations. Declarations are applied in order over a metadata struct
//! seeded from configuration, so later declarations win over earlier ones and
//! over configured defaults.
//!
//! # Merge Policy
//!
//! - Single-value fields (name, version, author, description, permalink)
//!   overwrite unconditionally - last one wins.
//! - Screenshot/video lists are replaced wholesale, never merged; a singular
//!   form replaces the whole list with one entry.
//! - Constraints accumulate into a map keyed by constraint type; a later
//!   duplicate key overwrites.
//! - Changelog entries are kept only when their declared version matches the
//!   currently-known module version (case-insensitive); unmatched entries are
//!   discarded silently.

pub mod extract;

pub use extract::{extract_metadata, ExtractError, Extraction};

use std::collections::BTreeMap;

use serde::Deserialize;

/// Capability a pack descriptor must declare to qualify as a plugin pack.
pub const PLUGIN_PACK_CAPABILITY: &str = "plugin-pack";

/// Metadata for a module release, assembled once per invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleMetadata {
    /// Module name; required before any registry call is made.
    pub name: Option<String>,
    /// Release version.
    pub version: Option<String>,
    /// Module author.
    pub author: Option<String>,
    /// Short description.
    pub description: Option<String>,
    /// Permalink slug for the module page.
    pub permalink: Option<String>,
    /// Screenshot URLs, in declaration order.
    pub screenshots: Vec<String>,
    /// Video URLs, in declaration order.
    pub videos: Vec<String>,
    /// Compatibility constraints, keyed by constraint type name.
    pub constraints: BTreeMap<String, String>,
    /// Changelog text for the current version.
    pub changes: Option<String>,
}

impl ModuleMetadata {
    /// Apply a single declaration, following the merge policy.
    pub fn apply(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Name { value } => self.name = Some(value.clone()),
            Declaration::Version { value } => self.version = Some(value.clone()),
            Declaration::Author { value } => self.author = Some(value.clone()),
            Declaration::Description { value } => self.description = Some(value.clone()),
            Declaration::Permalink { value } => self.permalink = Some(value.clone()),
            Declaration::Screenshot { value } => self.screenshots = vec![value.clone()],
            Declaration::Screenshots { values } => self.screenshots = values.clone(),
            Declaration::Video { value } => self.videos = vec![value.clone()],
            Declaration::Videos { values } => self.videos = values.clone(),
            Declaration::Constraint { kind, value } => {
                self.constraints.insert(kind.clone(), value.clone());
            }
            Declaration::Constraints { entries } => {
                for entry in entries {
                    self.constraints.insert(entry.kind.clone(), entry.value.clone());
                }
            }
            Declaration::Changelog { version, value } => {
                if self.version_matches(version) {
                    self.changes = Some(value.clone());
                }
            }
            Declaration::Changelogs { entries } => {
                for entry in entries {
                    if self.version_matches(&entry.version) {
                        self.changes = Some(entry.value.clone());
                    }
                }
            }
        }
    }

    /// Apply declarations in order.
    pub fn apply_all<'a>(&mut self, declarations: impl IntoIterator<Item = &'a Declaration>) {
        for declaration in declarations {
            self.apply(declaration);
        }
    }

    /// Whether a changelog version matches the currently-known module version.
    ///
    /// Matching is case-insensitive. A changelog declared before any version
    /// is known never matches.
    fn version_matches(&self, version: &str) -> bool {
        self.version
            .as_deref()
            .is_some_and(|current| current.eq_ignore_ascii_case(version))
    }
}

/// A pack descriptor: the metadata entry attached to a designated pack type.
///
/// Stored inside the plugin archive as a `*.pack.json` entry. Only
/// descriptors declaring the [`PLUGIN_PACK_CAPABILITY`] qualify.
#[derive(Debug, Clone, Deserialize)]
pub struct PackDescriptor {
    /// Fully-qualified name of the type the metadata is attached to.
    pub pack: String,
    /// Declared capability; must be `plugin-pack` to qualify.
    pub capability: String,
    /// Ordered metadata declarations.
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl PackDescriptor {
    /// Whether this descriptor declares the plugin pack capability.
    pub fn is_plugin_pack(&self) -> bool {
        self.capability == PLUGIN_PACK_CAPABILITY
    }
}

/// A single metadata declaration, tagged by kind.
///
/// Singular and plural forms mirror the upstream annotation set; both forms
/// of a multi-value field replace the field wholesale.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Name { value: String },
    Version { value: String },
    Author { value: String },
    Description { value: String },
    Permalink { value: String },
    Screenshot { value: String },
    Screenshots { values: Vec<String> },
    Video { value: String },
    Videos { values: Vec<String> },
    Constraint {
        #[serde(rename = "type")]
        kind: String,
        value: String,
    },
    Constraints { entries: Vec<ConstraintEntry> },
    Changelog { version: String, value: String },
    Changelogs { entries: Vec<ChangelogEntry> },
}

/// One constraint entry inside a plural `constraints` declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConstraintEntry {
    /// Constraint type name (e.g., a minimum host version requirement).
    #[serde(rename = "type")]
    pub kind: String,
    /// Constraint value.
    pub value: String,
}

/// One changelog entry inside a plural `changelogs` declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChangelogEntry {
    /// Version this entry describes.
    pub version: String,
    /// Changelog text.
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(value: &str) -> Declaration {
        Declaration::Name {
            value: value.to_string(),
        }
    }

    #[test]
    fn single_value_last_wins() {
        let mut meta = ModuleMetadata::default();
        meta.apply_all(&[named("First"), named("Second"), named("Third")]);
        assert_eq!(meta.name.as_deref(), Some("Third"));
    }

    #[test]
    fn declarations_overwrite_configured_seed() {
        let mut meta = ModuleMetadata {
            author: Some("configured".to_string()),
            ..Default::default()
        };
        meta.apply(&Declaration::Author {
            value: "declared".to_string(),
        });
        assert_eq!(meta.author.as_deref(), Some("declared"));
    }

    #[test]
    fn plural_list_replaces_wholesale() {
        let mut meta = ModuleMetadata::default();
        meta.apply(&Declaration::Screenshots {
            values: vec!["a".into(), "b".into()],
        });
        meta.apply(&Declaration::Screenshots {
            values: vec!["c".into()],
        });
        assert_eq!(meta.screenshots, vec!["c".to_string()]);
    }

    #[test]
    fn singular_form_replaces_plural_list() {
        let mut meta = ModuleMetadata::default();
        meta.apply(&Declaration::Videos {
            values: vec!["a".into(), "b".into()],
        });
        meta.apply(&Declaration::Video { value: "c".into() });
        assert_eq!(meta.videos, vec!["c".to_string()]);
    }

    #[test]
    fn constraints_accumulate_and_overwrite_same_key() {
        let mut meta = ModuleMetadata::default();
        meta.apply(&Declaration::Constraint {
            kind: "ServerVersion".into(),
            value: ">=1.8".into(),
        });
        meta.apply(&Declaration::Constraints {
            entries: vec![
                ConstraintEntry {
                    kind: "ApiVersion".into(),
                    value: "3".into(),
                },
                ConstraintEntry {
                    kind: "ServerVersion".into(),
                    value: ">=1.9".into(),
                },
            ],
        });
        assert_eq!(meta.constraints.len(), 2);
        assert_eq!(meta.constraints["ServerVersion"], ">=1.9");
        assert_eq!(meta.constraints["ApiVersion"], "3");
    }

    #[test]
    fn changelog_selects_matching_version() {
        let mut meta = ModuleMetadata {
            version: Some("1.1".to_string()),
            ..Default::default()
        };
        meta.apply(&Declaration::Changelogs {
            entries: vec![
                ChangelogEntry {
                    version: "1.0".into(),
                    value: "a".into(),
                },
                ChangelogEntry {
                    version: "1.1".into(),
                    value: "b".into(),
                },
            ],
        });
        assert_eq!(meta.changes.as_deref(), Some("b"));
    }

    #[test]
    fn changelog_discards_unmatched_version() {
        let mut meta = ModuleMetadata {
            version: Some("2.0".to_string()),
            ..Default::default()
        };
        meta.apply(&Declaration::Changelog {
            version: "1.0".into(),
            value: "a".into(),
        });
        assert!(meta.changes.is_none());
    }

    #[test]
    fn changelog_version_match_is_case_insensitive() {
        let mut meta = ModuleMetadata {
            version: Some("1.0-SNAPSHOT".to_string()),
            ..Default::default()
        };
        meta.apply(&Declaration::Changelog {
            version: "1.0-snapshot".into(),
            value: "snap".into(),
        });
        assert_eq!(meta.changes.as_deref(), Some("snap"));
    }

    #[test]
    fn changelog_matches_version_declared_earlier_in_sequence() {
        let mut meta = ModuleMetadata::default();
        meta.apply_all(&[
            Declaration::Version {
                value: "1.1".into(),
            },
            Declaration::Changelog {
                version: "1.1".into(),
                value: "b".into(),
            },
        ]);
        assert_eq!(meta.changes.as_deref(), Some("b"));
    }

    #[test]
    fn changelog_before_any_version_never_matches() {
        let mut meta = ModuleMetadata::default();
        meta.apply(&Declaration::Changelog {
            version: "1.0".into(),
            value: "a".into(),
        });
        assert!(meta.changes.is_none());
    }

    #[test]
    fn descriptor_parses_from_json() {
        let descriptor: PackDescriptor = serde_json::from_str(
            r#"{
                "pack": "com.example.ChatPack",
                "capability": "plugin-pack",
                "declarations": [
                    {"kind": "name", "value": "Chat"},
                    {"kind": "version", "value": "1.1"},
                    {"kind": "screenshots", "values": ["u1", "u2"]},
                    {"kind": "constraint", "type": "ServerVersion", "value": ">=1.8"},
                    {"kind": "changelog", "version": "1.1", "value": "b"}
                ]
            }"#,
        )
        .unwrap();

        assert!(descriptor.is_plugin_pack());
        assert_eq!(descriptor.pack, "com.example.ChatPack");
        assert_eq!(descriptor.declarations.len(), 5);

        let mut meta = ModuleMetadata::default();
        meta.apply_all(&descriptor.declarations);
        assert_eq!(meta.name.as_deref(), Some("Chat"));
        assert_eq!(meta.screenshots, vec!["u1".to_string(), "u2".to_string()]);
        assert_eq!(meta.constraints["ServerVersion"], ">=1.8");
        assert_eq!(meta.changes.as_deref(), Some("b"));
    }

    #[test]
    fn descriptor_without_capability_does_not_qualify() {
        let descriptor: PackDescriptor = serde_json::from_str(
            r#"{"pack": "com.example.Other", "capability": "theme-pack"}"#,
        )
        .unwrap();
        assert!(!descriptor.is_plugin_pack());
    }
}
