//! Sanitization policy: the element/attribute/scheme allowlist.
//!
//! A policy is an immutable value. Build it once, share it by reference
//! across any number of documents and threads.

use rustc_hash::{FxHashMap, FxHashSet};

use super::rules::UrlClass;

/// Elements of the Packagist table allowed without attributes.
#[rustfmt::skip]
const PACKAGIST_PLAIN_ELEMENTS: &[&str] = &[
    "p", "br", "small",
    "strong", "b", "em", "i", "strike",
    "sub", "sup", "ins", "del",
    "ol", "ul", "li",
    "h1", "h2", "h3", "h4", "h5", "h6",
    "dl", "dd", "dt",
    "pre", "code", "samp", "kbd",
    "q", "blockquote", "abbr", "cite",
    "table", "thead", "tbody", "tr",
    "span", "summary",
];

/// Forced on every surviving link.
pub const PACKAGIST_LINK_REL: &str = "nofollow noindex noopener external ugc";

/// Inputs above this many bytes are refused.
pub const PACKAGIST_MAX_INPUT_LENGTH: usize = 10_000_000;

/// Elements whose content is never readable prose: dropped whole.
const DEFAULT_REMOVED_WITH_CONTENT: &[&str] = &[
    "script", "style", "template", "noscript", "iframe", "object", "embed", "textarea", "title",
    "xmp", "plaintext", "noembed", "noframes",
];

const DEFAULT_MEDIA_SCHEMES: &[&str] = &["http", "https", "data"];

// ============================================================================
// SanitizationPolicy
// ============================================================================

/// Immutable allowlist consulted by the sanitizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationPolicy {
    elements: FxHashMap<String, FxHashSet<String>>,
    global_attributes: FxHashSet<String>,
    forced: FxHashMap<String, Vec<(String, String)>>,
    link_schemes: FxHashSet<String>,
    media_schemes: FxHashSet<String>,
    allow_relative_links: bool,
    allow_relative_media: bool,
    max_input_length: usize,
    removed_with_content: FxHashSet<String>,
}

impl SanitizationPolicy {
    /// Start an empty policy (nothing allowed).
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::new()
    }

    /// The table Packagist renders READMEs with, reproduced verbatim.
    pub fn packagist() -> Self {
        PACKAGIST_PLAIN_ELEMENTS
            .iter()
            .fold(PolicyBuilder::new(), |builder, el| builder.allow_element(el, &[]))
            .allow_element("img", &["src", "title", "alt", "width", "height"])
            .allow_element("a", &["href", "target", "id"])
            .allow_element("td", &["colspan", "rowspan"])
            .allow_element("th", &["colspan", "rowspan"])
            .allow_element("details", &["open"])
            .allow_attribute("align", &["th", "td", "p", "h1", "h2", "h3", "h4", "h5", "h6"])
            .allow_global_attribute("class")
            .allow_link_schemes(&["https", "http", "mailto"])
            .force_attribute("a", "rel", PACKAGIST_LINK_REL)
            .allow_relative_links(true)
            .allow_relative_media(true)
            .max_input_length(PACKAGIST_MAX_INPUT_LENGTH)
            .build()
    }

    #[inline]
    pub fn allows_element(&self, tag: &str) -> bool {
        self.elements.contains_key(tag)
    }

    /// Whether `attr` may appear on `tag` (per-element or global).
    #[inline]
    pub fn allows_attribute(&self, tag: &str, attr: &str) -> bool {
        self.elements
            .get(tag)
            .is_some_and(|attrs| attrs.contains(attr) || self.global_attributes.contains(attr))
    }

    /// Attributes always set on `tag`, in declaration order.
    #[inline]
    pub fn forced_attributes(&self, tag: &str) -> &[(String, String)] {
        self.forced.get(tag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether a lowercased scheme is allowed for this kind of URL.
    #[inline]
    pub fn allows_scheme(&self, class: UrlClass, scheme: &str) -> bool {
        match class {
            UrlClass::Link => self.link_schemes.contains(scheme),
            UrlClass::Media => self.media_schemes.contains(scheme),
        }
    }

    #[inline]
    pub fn allows_relative(&self, class: UrlClass) -> bool {
        match class {
            UrlClass::Link => self.allow_relative_links,
            UrlClass::Media => self.allow_relative_media,
        }
    }

    #[inline]
    pub fn removes_with_content(&self, tag: &str) -> bool {
        self.removed_with_content.contains(tag)
    }

    #[inline]
    pub fn max_input_length(&self) -> usize {
        self.max_input_length
    }

    /// A builder preloaded with this policy, for deriving a variant.
    pub fn to_builder(&self) -> PolicyBuilder {
        PolicyBuilder {
            elements: self.elements.clone(),
            extra_attributes: FxHashMap::default(),
            global_attributes: self.global_attributes.clone(),
            forced: self.forced.clone(),
            link_schemes: self.link_schemes.clone(),
            media_schemes: self.media_schemes.clone(),
            allow_relative_links: self.allow_relative_links,
            allow_relative_media: self.allow_relative_media,
            max_input_length: self.max_input_length,
            removed_with_content: self.removed_with_content.clone(),
        }
    }

    /// Allowed element names, sorted.
    pub fn allowed_elements(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.elements.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl Default for SanitizationPolicy {
    fn default() -> Self {
        Self::packagist()
    }
}

// ============================================================================
// PolicyBuilder
// ============================================================================

/// Fluent builder for [`SanitizationPolicy`].
///
/// Attribute grants made with [`allow_attribute`](Self::allow_attribute)
/// only take effect on elements that are themselves allowed, whatever the
/// call order.
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    elements: FxHashMap<String, FxHashSet<String>>,
    extra_attributes: FxHashMap<String, FxHashSet<String>>,
    global_attributes: FxHashSet<String>,
    forced: FxHashMap<String, Vec<(String, String)>>,
    link_schemes: FxHashSet<String>,
    media_schemes: FxHashSet<String>,
    allow_relative_links: bool,
    allow_relative_media: bool,
    max_input_length: usize,
    removed_with_content: FxHashSet<String>,
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyBuilder {
    pub fn new() -> Self {
        Self {
            elements: FxHashMap::default(),
            extra_attributes: FxHashMap::default(),
            global_attributes: FxHashSet::default(),
            forced: FxHashMap::default(),
            link_schemes: FxHashSet::default(),
            media_schemes: lowercase_set(DEFAULT_MEDIA_SCHEMES),
            allow_relative_links: false,
            allow_relative_media: false,
            max_input_length: PACKAGIST_MAX_INPUT_LENGTH,
            removed_with_content: lowercase_set(DEFAULT_REMOVED_WITH_CONTENT),
        }
    }

    /// Allow `tag` with the given attributes (empty = no attributes).
    pub fn allow_element(mut self, tag: &str, attrs: &[&str]) -> Self {
        let entry = self.elements.entry(tag.to_ascii_lowercase()).or_default();
        entry.extend(attrs.iter().map(|a| a.to_ascii_lowercase()));
        self
    }

    /// Allow `attr` on each of `tags`.
    pub fn allow_attribute(mut self, attr: &str, tags: &[&str]) -> Self {
        for tag in tags {
            self.extra_attributes
                .entry(tag.to_ascii_lowercase())
                .or_default()
                .insert(attr.to_ascii_lowercase());
        }
        self
    }

    /// Forget every element and per-element attribute granted so far.
    pub fn clear_elements(mut self) -> Self {
        self.elements.clear();
        self.extra_attributes.clear();
        self
    }

    pub fn clear_global_attributes(mut self) -> Self {
        self.global_attributes.clear();
        self
    }

    pub fn clear_forced_attributes(mut self) -> Self {
        self.forced.clear();
        self
    }

    /// Allow `attr` on every allowed element.
    pub fn allow_global_attribute(mut self, attr: &str) -> Self {
        self.global_attributes.insert(attr.to_ascii_lowercase());
        self
    }

    /// Always set `attr="value"` on `tag`, overriding the source.
    pub fn force_attribute(mut self, tag: &str, attr: &str, value: &str) -> Self {
        let attr = attr.to_ascii_lowercase();
        let forced = self.forced.entry(tag.to_ascii_lowercase()).or_default();
        forced.retain(|(name, _)| *name != attr);
        forced.push((attr, value.to_string()));
        self
    }

    /// Replace the schemes allowed in link attributes (`href`, `cite`).
    pub fn allow_link_schemes(mut self, schemes: &[&str]) -> Self {
        self.link_schemes = lowercase_set(schemes);
        self
    }

    /// Replace the schemes allowed in media attributes (`src`, `poster`).
    pub fn allow_media_schemes(mut self, schemes: &[&str]) -> Self {
        self.media_schemes = lowercase_set(schemes);
        self
    }

    pub fn allow_relative_links(mut self, allow: bool) -> Self {
        self.allow_relative_links = allow;
        self
    }

    pub fn allow_relative_media(mut self, allow: bool) -> Self {
        self.allow_relative_media = allow;
        self
    }

    pub fn max_input_length(mut self, max: usize) -> Self {
        self.max_input_length = max;
        self
    }

    /// Drop `tag` together with everything inside it.
    pub fn remove_with_content(mut self, tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        self.elements.remove(&tag);
        self.removed_with_content.insert(tag);
        self
    }

    /// Replace the set of elements dropped together with their content.
    pub fn removed_with_content(mut self, tags: &[&str]) -> Self {
        self.removed_with_content = lowercase_set(tags);
        self
    }

    pub fn build(self) -> SanitizationPolicy {
        let Self {
            mut elements,
            extra_attributes,
            global_attributes,
            forced,
            link_schemes,
            media_schemes,
            allow_relative_links,
            allow_relative_media,
            max_input_length,
            removed_with_content,
        } = self;

        for (tag, attrs) in extra_attributes {
            if let Some(allowed) = elements.get_mut(&tag) {
                allowed.extend(attrs);
            }
        }
        // an element cannot be both unwrapped-and-kept and removed
        elements.retain(|tag, _| !removed_with_content.contains(tag));

        SanitizationPolicy {
            elements,
            global_attributes,
            forced,
            link_schemes,
            media_schemes,
            allow_relative_links,
            allow_relative_media,
            max_input_length,
            removed_with_content,
        }
    }
}

fn lowercase_set(items: &[&str]) -> FxHashSet<String> {
    items.iter().map(|s| s.to_ascii_lowercase()).collect()
}
