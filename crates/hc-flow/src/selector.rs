//! Selectors
//!
//! A selector describes the input widget the frontend renders for a form
//! field and validates the value that comes back. On the wire a selector is
//! a single-key object: `{"number": {"min": 0, "max": 4, "step": 1}}`.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Input widget specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    Text(TextSelectorConfig),
    Number(NumberSelectorConfig),
    Template(TemplateSelectorConfig),
}

impl Selector {
    /// Validate and normalize a submitted value.
    ///
    /// The error string is the human-readable reason, without the field path.
    pub fn validate(&self, value: &Value) -> Result<Value, String> {
        match self {
            Selector::Text(_) | Selector::Template(_) => match value {
                Value::String(_) => Ok(value.clone()),
                _ => Err("expected str".to_string()),
            },
            Selector::Number(config) => config.validate(value),
        }
    }
}

/// Text field flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextSelectorType {
    #[default]
    Text,
    Email,
    Password,
    Url,
    Search,
    Tel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextSelectorConfig {
    #[serde(rename = "type", default)]
    pub text_type: TextSelectorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
    #[serde(default)]
    pub multiline: bool,
}

impl TextSelectorConfig {
    pub fn new(text_type: TextSelectorType) -> Self {
        Self {
            text_type,
            ..Self::default()
        }
    }

    pub fn autocomplete(mut self, autocomplete: impl Into<String>) -> Self {
        self.autocomplete = Some(autocomplete.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NumberSelectorMode {
    #[default]
    Slider,
    Box,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberSelectorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default = "default_step")]
    pub step: f64,
    #[serde(default)]
    pub mode: NumberSelectorMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<String>,
}

fn default_step() -> f64 {
    1.0
}

impl Default for NumberSelectorConfig {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            step: default_step(),
            mode: NumberSelectorMode::default(),
            unit_of_measurement: None,
        }
    }
}

impl NumberSelectorConfig {
    /// Slider over `[min, max]` moving in `step` increments
    pub fn range(min: f64, max: f64, step: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            step,
            ..Self::default()
        }
    }

    pub fn mode(mut self, mode: NumberSelectorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Coerce to a number and check the bounds.
    ///
    /// An integral `step` makes the field integer-valued: fractional input
    /// is rejected and the value is returned as an integer. A fractional
    /// `step` only drives the widget.
    fn validate(&self, value: &Value) -> Result<Value, String> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|n| n.is_finite())
        .ok_or_else(|| "expected float".to_string())?;

        if let Some(min) = self.min {
            if number < min {
                return Err(format!("value must be at least {}", min));
            }
        }
        if let Some(max) = self.max {
            if number > max {
                return Err(format!("value must be at most {}", max));
            }
        }

        if self.step.fract() == 0.0 {
            if number.fract() != 0.0 {
                return Err("expected int".to_string());
            }
            return Ok(Value::from(number as i64));
        }
        Number::from_f64(number)
            .map(Value::Number)
            .ok_or_else(|| "expected float".to_string())
    }
}

/// Template editor; accepts any string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TemplateSelectorConfig {}
