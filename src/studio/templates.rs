// Atelier Template Dispatcher
//
// Maps a (category, operation key, parameters) triple onto a finished
// natural-language instruction ready to hand to a generative backend.
// Unknown operation keys degrade to a synthesized best-effort instruction;
// the only hard failure is an unknown category.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::studio::table;

/// Named placeholder slots look like `{color}` or `{room_type}`.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z][a-z0-9_]*)\}").expect("placeholder pattern"));

/// The fixed set of editing/generation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Perspective,
    Style,
    Environment,
    ObjectAttribute,
    Avatar,
    Removal,
    Redraw,
    Scene,
    Outfit,
    TextDesign,
    Poster,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Perspective,
        Category::Style,
        Category::Environment,
        Category::ObjectAttribute,
        Category::Avatar,
        Category::Removal,
        Category::Redraw,
        Category::Scene,
        Category::Outfit,
        Category::TextDesign,
        Category::Poster,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Perspective => "perspective",
            Category::Style => "style",
            Category::Environment => "environment",
            Category::ObjectAttribute => "object-attribute",
            Category::Avatar => "avatar",
            Category::Removal => "removal",
            Category::Redraw => "redraw",
            Category::Scene => "scene",
            Category::Outfit => "outfit",
            Category::TextDesign => "text-design",
            Category::Poster => "poster",
        }
    }

    /// Synthesize a best-effort instruction for an operation key that has no
    /// entry in the table. The downstream diffusion/LLM backends accept
    /// free-form language, so returning *something* beats refusing the call.
    fn synthesize(&self, key: &str, value: Option<&str>) -> String {
        let value = value.unwrap_or(key);
        match self {
            Category::Perspective => {
                format!("Change the perspective view to {key}, clear and detailed")
            }
            Category::Style => format!("Convert the image to {key} style"),
            Category::Environment => format!("Change the environment to {key}"),
            Category::ObjectAttribute => format!("Change the {key} to {value}"),
            Category::Avatar => format!("Generate {key} avatar"),
            Category::Removal => format!("Remove {key} from the image"),
            Category::Redraw => format!("Redraw {key} as {value}"),
            Category::Scene => format!("Transform into {key} scene"),
            Category::Outfit => format!("Change {key} to {value}"),
            Category::TextDesign => format!("Add {key} text '{value}' with modern style"),
            Category::Poster => format!("Design {key} poster"),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.label() == s)
            .ok_or_else(|| DispatchError::UnknownCategory(s.to_string()))
    }
}

/// The dispatcher's complete failure taxonomy. Everything else degrades to
/// fallback synthesis.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// Caller passed a category label outside the enumerated set. This is a
    /// programming error on the caller's side, not a runtime condition.
    #[error("unknown template category '{0}'")]
    UnknownCategory(String),

    /// A matched template names a placeholder the caller supplied no value
    /// for. Surfaced instead of silently substituting an empty string.
    #[error("operation '{operation}' needs a value for placeholder '{{{placeholder}}}'")]
    MissingPlaceholderValue {
        operation: String,
        placeholder: String,
    },
}

/// One operation inside a category: a human-readable key and its
/// instruction template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateEntry {
    pub key: &'static str,
    pub template: &'static str,
}

/// Immutable process-wide template table plus the substitution logic.
/// Pure and reentrant: safe to share across tasks without locking.
pub struct Dispatcher {
    table: Vec<(Category, Vec<TemplateEntry>)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            table: table::build(),
        }
    }

    /// Resolve a category label and operation key into an instruction.
    /// The only hard failure apart from `MissingPlaceholderValue` is an
    /// unrecognized category label.
    pub fn resolve(
        &self,
        category: &str,
        key: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<String, DispatchError> {
        let category = Category::from_str(category)?;
        self.resolve_in(category, key, parameters)
    }

    /// Typed variant for callers that already hold a `Category`.
    pub fn resolve_in(
        &self,
        category: Category,
        key: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<String, DispatchError> {
        let Some(entry) = self.entry(category, key) else {
            return Ok(category.synthesize(key, free_value(parameters)));
        };

        if PLACEHOLDER_RE.is_match(entry.template) {
            return substitute(entry.template, key, parameters);
        }

        // Template has no slots; an explicit free-text value still rides along.
        match free_value(parameters) {
            Some(value) => Ok(format!("{}, with {}", entry.template, value)),
            None => Ok(entry.template.to_string()),
        }
    }

    /// All known operation keys for a category, insertion order preserved.
    pub fn list_operations(&self, category: Category) -> Vec<&'static str> {
        self.entries(category).iter().map(|e| e.key).collect()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.table.iter().map(|(c, _)| *c)
    }

    fn entries(&self, category: Category) -> &[TemplateEntry] {
        self.table
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, entries)| entries.as_slice())
            .unwrap_or(&[])
    }

    fn entry(&self, category: Category, key: &str) -> Option<&TemplateEntry> {
        self.entries(category).iter().find(|e| e.key == key)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Single generic substitution pass over every `{name}` slot in a template.
/// A value is looked up first under the placeholder's own name, then under
/// the generic `value` key supplied by single-parameter callers.
fn substitute(
    template: &str,
    operation: &str,
    parameters: &HashMap<String, String>,
) -> Result<String, DispatchError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let whole = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
        let name = &caps[1];

        let value = parameters
            .get(name)
            .or_else(|| parameters.get("value"))
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DispatchError::MissingPlaceholderValue {
                operation: operation.to_string(),
                placeholder: name.to_string(),
            })?;

        out.push_str(&template[last..whole.0]);
        out.push_str(value);
        last = whole.1;
    }
    out.push_str(&template[last..]);
    Ok(out)
}

/// The single free-text value callers attach when the template has no
/// placeholder of its own. Empty strings count as absent.
fn free_value(parameters: &HashMap<String, String>) -> Option<&str> {
    parameters
        .get("value")
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn direct_match_without_placeholders() {
        let d = Dispatcher::new();
        let out = d.resolve("perspective", "从正面看", &HashMap::new()).unwrap();
        assert_eq!(out, "Change the view to front view, clear and detailed");
    }

    #[test]
    fn generic_value_key_fills_named_placeholder() {
        let d = Dispatcher::new();
        let out = d
            .resolve("object-attribute", "改变颜色", &params(&[("value", "purple")]))
            .unwrap();
        assert_eq!(out, "Change the color to purple");
    }

    #[test]
    fn missing_placeholder_is_an_error_not_a_blank() {
        let d = Dispatcher::new();
        let err = d
            .resolve("object-attribute", "改变颜色", &HashMap::new())
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::MissingPlaceholderValue {
                operation: "改变颜色".to_string(),
                placeholder: "color".to_string(),
            }
        );
    }

    #[test]
    fn unknown_key_synthesizes_instead_of_failing() {
        let d = Dispatcher::new();
        let out = d
            .resolve("perspective", "从左上方45度俯视", &HashMap::new())
            .unwrap();
        assert!(out.contains("从左上方45度俯视"));
    }

    #[test]
    fn unknown_category_is_the_one_hard_failure() {
        let d = Dispatcher::new();
        let err = d.resolve("bogus-category", "x", &HashMap::new()).unwrap_err();
        assert_eq!(err, DispatchError::UnknownCategory("bogus-category".to_string()));
    }

    #[test]
    fn category_labels_round_trip() {
        for cat in Category::ALL {
            assert_eq!(cat.label().parse::<Category>().unwrap(), cat);
        }
    }
}
