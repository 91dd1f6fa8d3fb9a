//! Tool input schemas
//!
//! A schema is an ordered list of fields. `validate` checks raw arguments
//! against it and returns a clean object holding only declared fields, with
//! defaults filled in, ready to be deserialized into the tool's argument type.

use crate::error::{ToolError, ValidationError};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub ty: FieldType,
    pub required: bool,
    pub default: Option<Value>,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub description: Option<String>,
}

impl FieldSpec {
    fn of(ty: FieldType) -> Self {
        Self {
            ty,
            required: false,
            default: None,
            minimum: None,
            maximum: None,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::of(FieldType::String)
    }

    pub fn integer() -> Self {
        Self::of(FieldType::Integer)
    }

    pub fn number() -> Self {
        Self::of(FieldType::Number)
    }

    pub fn boolean() -> Self {
        Self::of(FieldType::Boolean)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn min(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn max(mut self, maximum: i64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn check_range(&self, name: &str, value: &Value, errors: &mut ValidationError) {
        let Some(n) = value.as_i64() else {
            // u64 beyond i64 can only exceed a maximum
            if let Some(max) = self.maximum {
                errors.push(name, format!("must be at most {max}"));
            }
            return;
        };
        if let Some(min) = self.minimum {
            if n < min {
                errors.push(name, format!("must be at least {min}"));
            }
        }
        if let Some(max) = self.maximum {
            if n > max {
                errors.push(name, format!("must be at most {max}"));
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSchema {
    fields: Vec<(String, FieldSpec)>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.push((name.into(), spec));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Checks `raw` and returns only the declared fields, defaults applied.
    ///
    /// `null` arguments count as `{}`; `null` fields count as absent.
    /// Undeclared fields are dropped silently.
    pub fn validate(&self, raw: &Value) -> Result<Value, ToolError> {
        let empty = Map::new();
        let args = match raw {
            Value::Null => &empty,
            Value::Object(map) => map,
            other => {
                return Err(ToolError::validation(
                    "arguments",
                    format!("must be an object, got {}", kind_of(other)),
                ))
            }
        };

        let mut errors = ValidationError::default();
        let mut clean = Map::new();

        for (name, spec) in &self.fields {
            match args.get(name).filter(|v| !v.is_null()) {
                Some(value) if !spec.ty.accepts(value) => errors.push(
                    name,
                    format!("must be of type {}, got {}", spec.ty.as_str(), kind_of(value)),
                ),
                Some(value) => {
                    if spec.ty == FieldType::Integer {
                        spec.check_range(name, value, &mut errors);
                    }
                    clean.insert(name.clone(), value.clone());
                }
                None if spec.required => errors.push(name, "is required"),
                None => {
                    if let Some(default) = &spec.default {
                        clean.insert(name.clone(), default.clone());
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(clean))
        } else {
            Err(ToolError::Validation(errors))
        }
    }

    /// JSON Schema rendering for `tools/list`
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for (name, spec) in &self.fields {
            let mut prop = json!({ "type": spec.ty.as_str() });
            if let Some(description) = &spec.description {
                prop["description"] = json!(description);
            }
            if let Some(default) = &spec.default {
                prop["default"] = default.clone();
            }
            if let Some(min) = spec.minimum {
                prop["minimum"] = json!(min);
            }
            if let Some(max) = spec.maximum {
                prop["maximum"] = json!(max);
            }
            if spec.required {
                required.push(json!(name));
            }
            properties.insert(name.clone(), prop);
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
