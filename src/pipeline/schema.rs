//! Parameter schema descriptors and their fluent builders.
//!
//! A schema is pure data: it drives both config-form generation (in the UI
//! layer) and input validation (here). No validation logic runs while a
//! schema is being built.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::params::{ParamBag, ParamValue};
use super::registry::OperatorMetadata;

/// The closed set of parameter input kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Single-line text input.
    Text,
    /// Multi-line text input.
    Textarea,
    /// Single image upload.
    Image,
    /// Single choice from a fixed option list.
    Select,
    /// Multiple choices from a fixed option list.
    Multiselect,
    /// Bounded number.
    Number,
    /// Bounded `[from, to]` pair.
    Range,
}

/// One selectable option: stored value plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Visibility rule: show this parameter only while a sibling parameter
/// holds one of the listed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowWhen {
    pub param: String,
    pub values: Vec<String>,
}

/// Full descriptor for one operator parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub kind: ParamKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ParamValue>,
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shown_when: Option<ShowWhen>,
}

/// An operator's parameter set, keyed by parameter name, in form order.
pub type OperatorSchema = IndexMap<String, ParamSpec>;

impl ParamSpec {
    fn display_name(&self, name: &str) -> String {
        self.label.clone().unwrap_or_else(|| name.to_string())
    }
}

// ── Builders ────────────────────────────────────────────────

/// Fluent builder for one parameter descriptor.
pub struct ParamBuilder {
    spec: ParamSpec,
}

impl ParamBuilder {
    fn new(kind: ParamKind) -> Self {
        Self {
            spec: ParamSpec {
                kind,
                label: None,
                description: None,
                default: None,
                required: false,
                min: None,
                max: None,
                options: Vec::new(),
                shown_when: None,
            },
        }
    }

    pub fn text() -> Self {
        Self::new(ParamKind::Text)
    }

    pub fn textarea() -> Self {
        Self::new(ParamKind::Textarea)
    }

    pub fn image() -> Self {
        Self::new(ParamKind::Image)
    }

    pub fn select() -> Self {
        Self::new(ParamKind::Select)
    }

    pub fn multiselect() -> Self {
        Self::new(ParamKind::Multiselect)
    }

    pub fn number() -> Self {
        Self::new(ParamKind::Number)
    }

    pub fn range() -> Self {
        Self::new(ParamKind::Range)
    }

    pub fn label(mut self, text: &str) -> Self {
        self.spec.label = Some(text.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.spec.description = Some(text.to_string());
        self
    }

    pub fn default(mut self, value: ParamValue) -> Self {
        self.spec.default = Some(value);
        self
    }

    pub fn required(mut self) -> Self {
        self.spec.required = true;
        self
    }

    /// Add one option with a display label distinct from its value.
    pub fn option(mut self, value: &str, label: &str) -> Self {
        self.spec.options.push(SelectOption {
            value: value.to_string(),
            label: label.to_string(),
        });
        self
    }

    /// Add plain options whose labels equal their values.
    pub fn choices<'a>(mut self, values: impl IntoIterator<Item = &'a str>) -> Self {
        for value in values {
            self = self.option(value, value);
        }
        self
    }

    pub fn min_value(mut self, value: f64) -> Self {
        self.spec.min = Some(value);
        self
    }

    pub fn max_value(mut self, value: f64) -> Self {
        self.spec.max = Some(value);
        self
    }

    /// Show this parameter only while `param` holds one of `values`.
    pub fn shown_when<'a>(
        mut self,
        param: &str,
        values: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.spec.shown_when = Some(ShowWhen {
            param: param.to_string(),
            values: values.into_iter().map(str::to_string).collect(),
        });
        self
    }

    pub fn build(self) -> ParamSpec {
        self.spec
    }
}

/// Fluent builder for a full operator definition (metadata + schema).
pub struct OperatorBuilder {
    name: String,
    icon: String,
    description: String,
    params: OperatorSchema,
}

impl OperatorBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: String::new(),
            description: String::new(),
            params: OperatorSchema::new(),
        }
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = text.to_string();
        self
    }

    pub fn param(mut self, name: &str, builder: ParamBuilder) -> Self {
        self.params.insert(name.to_string(), builder.build());
        self
    }

    pub fn build(self) -> (String, OperatorMetadata) {
        (
            self.name,
            OperatorMetadata {
                icon: self.icon,
                description: self.description,
                params: self.params,
            },
        )
    }
}

// ── Validation ──────────────────────────────────────────────

/// Whether a parameter is currently visible in the config form, given the
/// values in the bag. The controlling sibling falls back to its schema
/// default when unset.
pub fn is_visible(schema: &OperatorSchema, spec: &ParamSpec, bag: &ParamBag) -> bool {
    let Some(rule) = &spec.shown_when else {
        return true;
    };
    let current = bag
        .get(&rule.param)
        .and_then(ParamValue::as_str)
        .map(str::to_string)
        .or_else(|| {
            schema
                .get(&rule.param)
                .and_then(|controlling| controlling.default.as_ref())
                .and_then(ParamValue::as_str)
                .map(str::to_string)
        });
    match current {
        Some(value) => rule.values.iter().any(|v| *v == value),
        None => false,
    }
}

/// Validate a parameter bag against a schema. Returns human-readable
/// problems; an empty list means the bag is acceptable. Hidden conditional
/// parameters are not validated.
pub fn validate_params(schema: &OperatorSchema, bag: &ParamBag) -> Vec<String> {
    let mut problems = Vec::new();

    for (name, spec) in schema {
        if !is_visible(schema, spec, bag) {
            continue;
        }

        // An unset parameter falls back to its schema default, exactly as
        // the config form seeds it.
        let value = bag.get(name).or(spec.default.as_ref());
        if spec.required && value.map(ParamValue::is_blank).unwrap_or(true) {
            problems.push(format!("{} is required", spec.display_name(name)));
            continue;
        }
        let Some(value) = value else { continue };

        match (spec.kind, value) {
            (ParamKind::Text | ParamKind::Textarea, ParamValue::Text(_)) => {}
            (ParamKind::Image, ParamValue::Image(_)) => {}
            (ParamKind::Select, ParamValue::Text(chosen)) => {
                if !spec.options.is_empty() && !spec.options.iter().any(|o| o.value == *chosen) {
                    problems.push(format!(
                        "{} has no option '{chosen}'",
                        spec.display_name(name)
                    ));
                }
            }
            (ParamKind::Multiselect, ParamValue::List(chosen)) => {
                if !spec.options.is_empty() {
                    for item in chosen {
                        if !spec.options.iter().any(|o| o.value == *item) {
                            problems.push(format!(
                                "{} has no option '{item}'",
                                spec.display_name(name)
                            ));
                        }
                    }
                }
            }
            (ParamKind::Number, ParamValue::Integer(_) | ParamValue::Float(_)) => {
                let n = value.as_f64().unwrap_or_default();
                if spec.min.is_some_and(|min| n < min) || spec.max.is_some_and(|max| n > max) {
                    problems.push(format!(
                        "{} must be between {} and {}",
                        spec.display_name(name),
                        spec.min.unwrap_or(f64::NEG_INFINITY),
                        spec.max.unwrap_or(f64::INFINITY)
                    ));
                }
            }
            (ParamKind::Range, ParamValue::Range(from, to)) => {
                if let (Some(from), Some(to)) = (from, to) {
                    if from > to {
                        problems.push(format!(
                            "{} start must not be after its end",
                            spec.display_name(name)
                        ));
                    }
                }
                for bound in [from, to].into_iter().flatten() {
                    let b = *bound as f64;
                    if spec.min.is_some_and(|min| b < min) || spec.max.is_some_and(|max| b > max) {
                        problems.push(format!(
                            "{} bounds must lie between {} and {}",
                            spec.display_name(name),
                            spec.min.unwrap_or(f64::NEG_INFINITY),
                            spec.max.unwrap_or(f64::INFINITY)
                        ));
                        break;
                    }
                }
            }
            _ => problems.push(format!(
                "{} has the wrong value shape",
                spec.display_name(name)
            )),
        }
    }

    problems
}
