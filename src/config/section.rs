//! `[policy]`, `[repository]` and `[render]` sections.
//!
//! Every field is optional: what a file leaves out keeps the Packagist
//! value.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::markdown::MarkdownOptions;
use crate::resolve::RepositoryCoordinate;
use crate::sanitize::{PolicyBuilder, SanitizationPolicy};

use super::ConfigError;

// ============================================================================
// [policy]
// ============================================================================

/// Overrides for the sanitization allowlist.
///
/// ```toml
/// [policy]
/// link_schemes = ["https"]
/// max_input_length = 1_000_000
///
/// [policy.extra_elements]
/// div = ["align"]
///
/// [policy.forced_attributes.a]
/// rel = "nofollow"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicySection {
    /// Replaces the element table (tag -> allowed attributes).
    pub elements: Option<BTreeMap<String, Vec<String>>>,
    /// Added on top of the element table.
    pub extra_elements: BTreeMap<String, Vec<String>>,
    pub global_attributes: Option<Vec<String>>,
    /// tag -> attribute -> fixed value. Replaces the forced set.
    pub forced_attributes: Option<BTreeMap<String, BTreeMap<String, String>>>,
    pub link_schemes: Option<Vec<String>>,
    pub media_schemes: Option<Vec<String>>,
    pub allow_relative_links: Option<bool>,
    pub allow_relative_media: Option<bool>,
    pub max_input_length: Option<usize>,
    pub removed_with_content: Option<Vec<String>>,
}

impl PolicySection {
    /// Validate and build the policy.
    pub fn to_policy(&self) -> Result<SanitizationPolicy, ConfigError> {
        self.validate()?;

        let mut builder = SanitizationPolicy::packagist().to_builder();

        if let Some(elements) = &self.elements {
            builder = allow_elements(builder.clear_elements(), elements);
        }
        builder = allow_elements(builder, &self.extra_elements);

        if let Some(attrs) = &self.global_attributes {
            builder = attrs
                .iter()
                .fold(builder.clear_global_attributes(), |b, attr| {
                    b.allow_global_attribute(attr)
                });
        }
        if let Some(forced) = &self.forced_attributes {
            builder = builder.clear_forced_attributes();
            for (tag, attrs) in forced {
                for (attr, value) in attrs {
                    builder = builder.force_attribute(tag, attr, value);
                }
            }
        }
        if let Some(schemes) = &self.link_schemes {
            builder = builder.allow_link_schemes(&as_strs(schemes));
        }
        if let Some(schemes) = &self.media_schemes {
            builder = builder.allow_media_schemes(&as_strs(schemes));
        }
        if let Some(allow) = self.allow_relative_links {
            builder = builder.allow_relative_links(allow);
        }
        if let Some(allow) = self.allow_relative_media {
            builder = builder.allow_relative_media(allow);
        }
        if let Some(max) = self.max_input_length {
            builder = builder.max_input_length(max);
        }
        if let Some(tags) = &self.removed_with_content {
            builder = builder.removed_with_content(&as_strs(tags));
        }

        let policy = builder.build();

        if let Some(forced) = &self.forced_attributes
            && let Some(tag) = forced.keys().find(|tag| !policy.allows_element(tag))
        {
            return Err(ConfigError::Validation(format!(
                "policy.forced_attributes.{tag}: `{tag}` is not an allowed element"
            )));
        }

        Ok(policy)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, table) in [
            ("policy.elements", self.elements.as_ref()),
            ("policy.extra_elements", Some(&self.extra_elements)),
        ] {
            for (tag, attrs) in table.into_iter().flatten() {
                check_name(field, tag)?;
                attrs.iter().try_for_each(|attr| check_name(field, attr))?;
            }
        }

        for attr in self.global_attributes.iter().flatten() {
            check_name("policy.global_attributes", attr)?;
        }
        for (tag, attrs) in self.forced_attributes.iter().flatten() {
            check_name("policy.forced_attributes", tag)?;
            attrs
                .keys()
                .try_for_each(|attr| check_name("policy.forced_attributes", attr))?;
        }
        for tag in self.removed_with_content.iter().flatten() {
            check_name("policy.removed_with_content", tag)?;
        }

        for (field, schemes) in [
            ("policy.link_schemes", &self.link_schemes),
            ("policy.media_schemes", &self.media_schemes),
        ] {
            for scheme in schemes.iter().flatten() {
                check_scheme(field, scheme)?;
            }
        }

        if self.max_input_length == Some(0) {
            return Err(ConfigError::Validation(
                "policy.max_input_length: must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn allow_elements(builder: PolicyBuilder, table: &BTreeMap<String, Vec<String>>) -> PolicyBuilder {
    table
        .iter()
        .fold(builder, |b, (tag, attrs)| b.allow_element(tag, &as_strs(attrs)))
}

fn as_strs(items: &[String]) -> Vec<&str> {
    items.iter().map(String::as_str).collect()
}

/// Tag and attribute names: a letter, then letters, digits or `-`.
fn check_name(field: &str, name: &str) -> Result<(), ConfigError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{field}: invalid name `{name}`")))
    }
}

fn check_scheme(field: &str, scheme: &str) -> Result<(), ConfigError> {
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{field}: invalid scheme `{scheme}` (write `https`, not `https:`)"
        )))
    }
}

// ============================================================================
// [repository]
// ============================================================================

/// Repository relative URLs are resolved against.
///
/// ```toml
/// [repository]
/// host = "github.com"
/// owner_repo = "mondeja/leptos-fluent"
/// base_path = "docs/"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositorySection {
    pub host: String,
    pub owner_repo: String,
    #[serde(default)]
    pub base_path: String,
}

impl RepositorySection {
    pub fn to_coordinate(&self) -> Result<RepositoryCoordinate, ConfigError> {
        RepositoryCoordinate::new(&self.host, &self.owner_repo, &self.base_path)
            .map_err(|e| ConfigError::Validation(format!("repository: {e}")))
    }
}

// ============================================================================
// [render]
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderSection {
    /// Strip the leading title and move raw GitHub images to the CDN.
    pub post_process: bool,
    /// GitHub-flavored markdown extensions; `false` for plain CommonMark.
    pub gfm: bool,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            post_process: true,
            gfm: true,
        }
    }
}

impl RenderSection {
    pub fn markdown_options(&self) -> MarkdownOptions {
        if self.gfm {
            MarkdownOptions::gfm()
        } else {
            MarkdownOptions::commonmark()
        }
    }
}
