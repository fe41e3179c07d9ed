//! Introspection of tool input schemas.
//!
//! Two views are derived from a feature descriptor's `inputSchema`:
//!
//! - [`ArgumentTemplate`]: the required top-level arguments, in `required`
//!   order, each replaced by a placeholder token, ready to paste into
//!   `mcpt call --arguments`.
//! - [`annotate_properties`]: every property, depth first, with its dotted
//!   path, type, required flag and array item details.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{McpError, Result};

/// A JSON-Schema node, reduced to the keywords the introspector reads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// `type`, either a single name or a list of names.
    #[serde(rename = "type", default)]
    pub schema_type: Option<Value>,
    /// Child properties of an object node.
    #[serde(default)]
    pub properties: Option<BTreeMap<String, SchemaNode>>,
    /// Names of required child properties.
    #[serde(default)]
    pub required: Option<Vec<String>>,
    /// Allowed values.
    #[serde(rename = "enum", default)]
    pub enum_values: Option<Vec<Value>>,
    /// Element schema of an array node.
    #[serde(default)]
    pub items: Option<Box<SchemaNode>>,
    /// Whether array elements must be unique.
    #[serde(default)]
    pub unique_items: Option<bool>,
}

impl SchemaNode {
    /// The declared type. Type lists are joined with `|`.
    pub fn type_name(&self) -> Option<String> {
        match self.schema_type.as_ref()? {
            Value::String(name) => Some(name.clone()),
            Value::Array(names) => {
                let names: Vec<&str> = names.iter().filter_map(Value::as_str).collect();
                (!names.is_empty()).then(|| names.join("|"))
            }
            _ => None,
        }
    }

    /// The type as listed: `enum("A","B")` when an `enum` is present,
    /// otherwise the declared type.
    pub fn type_label(&self) -> Option<String> {
        match &self.enum_values {
            Some(values) => {
                let values: Vec<String> = values.iter().map(Value::to_string).collect();
                Some(format!("enum({})", values.join(",")))
            }
            None => self.type_name(),
        }
    }

    /// Whether `name` is in this node's `required` list.
    pub fn requires(&self, name: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|required| required.iter().any(|r| r.trim() == name))
    }
}

/// A listed feature, reduced to what the introspector needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDescriptor {
    /// Feature name.
    pub name: String,
    /// Input schema (tools only).
    #[serde(default)]
    pub input_schema: Option<SchemaNode>,
}

impl FeatureDescriptor {
    /// Parse a descriptor from a raw list entry.
    pub fn from_value(value: &Value) -> Result<Self> {
        let mut descriptor = Self::deserialize(value)
            .map_err(|e| McpError::schema(format!("invalid feature descriptor: {}", e)))?;
        descriptor.name = descriptor.name.trim().to_string();
        Ok(descriptor)
    }

    /// The input schema, or `SchemaMalformed` if the descriptor has none.
    pub fn schema(&self) -> Result<&SchemaNode> {
        self.input_schema
            .as_ref()
            .ok_or_else(|| McpError::schema(format!("'{}' has no inputSchema", self.name)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Template mode
// ─────────────────────────────────────────────────────────────────────────────

/// Placeholder standing in for a required argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// Scalar field; carries the declared type, e.g. `<<string>>`.
    Scalar(String),
    /// Object field; carries the field name, e.g. `<<filterObject>>`.
    Object(String),
    /// Enum field; carries the field name, e.g. `<<modeEnum>>`.
    Enum(String),
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(type_name) => write!(f, "<<{}>>", type_name),
            Self::Object(name) => write!(f, "<<{}Object>>", name),
            Self::Enum(name) => write!(f, "<<{}Enum>>", name),
        }
    }
}

/// One required argument in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateField {
    /// Argument name.
    pub name: String,
    /// Value placeholder.
    pub placeholder: Placeholder,
}

/// A ready-to-edit invocation of one tool with its required arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentTemplate {
    /// Tool name.
    pub tool: String,
    /// Required arguments in `required` order.
    pub fields: Vec<TemplateField>,
}

impl ArgumentTemplate {
    /// Build the template from a descriptor's top-level `required` list.
    ///
    /// Fails if the schema, its `required` list, its `properties`, a
    /// required property or that property's `type` is missing.
    pub fn from_descriptor(descriptor: &FeatureDescriptor) -> Result<Self> {
        let schema = descriptor.schema()?;
        let tool = &descriptor.name;

        let required = schema
            .required
            .as_ref()
            .ok_or_else(|| McpError::schema(format!("'{}' has no required list", tool)))?;
        let properties = schema
            .properties
            .as_ref()
            .ok_or_else(|| McpError::schema(format!("'{}' has no properties", tool)))?;

        let fields = required
            .iter()
            .map(|name| {
                let name = name.trim();
                let property = properties.get(name).ok_or_else(|| {
                    McpError::schema(format!(
                        "'{}' requires '{}' but does not define it",
                        tool, name
                    ))
                })?;
                let type_name = property.type_name().ok_or_else(|| {
                    McpError::schema(format!("'{}' property '{}' has no type", tool, name))
                })?;

                let placeholder = if type_name == "object" {
                    Placeholder::Object(name.to_string())
                } else if type_name == "enum" {
                    Placeholder::Enum(name.to_string())
                } else {
                    Placeholder::Scalar(type_name)
                };

                Ok(TemplateField {
                    name: name.to_string(),
                    placeholder,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            tool: tool.clone(),
            fields,
        })
    }

    /// Render the arguments object, drawing each placeholder with `paint`.
    pub fn arguments_with(&self, paint: impl Fn(&Placeholder) -> String) -> String {
        let body: Vec<String> = self
            .fields
            .iter()
            .map(|field| {
                format!(
                    "{}:{}",
                    Value::String(field.name.clone()),
                    paint(&field.placeholder)
                )
            })
            .collect();
        format!("{{{}}}", body.join(","))
    }

    /// Render the arguments object with plain placeholders.
    pub fn arguments(&self) -> String {
        self.arguments_with(Placeholder::to_string)
    }

    /// Render the full `mcpt call` command line, drawing placeholders with `paint`.
    pub fn command_line_with(
        &self,
        host: &str,
        paint: impl Fn(&Placeholder) -> String,
    ) -> String {
        format!(
            "mcpt call --host '{}' --tool '{}' --arguments '{}'",
            host,
            self.tool,
            self.arguments_with(paint)
        )
    }

    /// Render the full `mcpt call` command line.
    pub fn command_line(&self, host: &str) -> String {
        self.command_line_with(host, Placeholder::to_string)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Annotated listing
// ─────────────────────────────────────────────────────────────────────────────

/// Element details of an array property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayItems {
    /// Element type, if declared.
    pub item_type: Option<String>,
    /// Whether `uniqueItems` is true.
    pub unique: bool,
}

/// One line of the annotated property listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAnnotation {
    /// Dotted key path from the schema root.
    pub path: String,
    /// Type label, see [`SchemaNode::type_label`].
    pub type_label: String,
    /// Whether the enclosing object lists this property as required.
    pub required: bool,
    /// Present when the property declares `items`.
    pub items: Option<ArrayItems>,
}

impl PropertyAnnotation {
    /// The annotation text after the required marker.
    pub fn describe(&self) -> String {
        let mut line = format!("{} -> type: {}", self.path, self.type_label);
        if let Some(items) = &self.items {
            if let Some(item_type) = &items.item_type {
                line.push_str(&format!("[ArrayItems -> type: {}]", item_type));
            }
            if items.unique {
                line.push_str("[UNIQUE]");
            }
        }
        line
    }
}

impl fmt::Display for PropertyAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.required { "[REQUIRED] " } else { "           " };
        write!(f, "{}{}", marker, self.describe())
    }
}

/// Walk every property of `schema` depth first.
///
/// A property is listed when it has a `type` or an `enum`; untyped
/// properties are skipped but their children are still visited. Siblings
/// come in key order.
pub fn annotate_properties(schema: &SchemaNode) -> Vec<PropertyAnnotation> {
    let mut out = Vec::new();
    walk(schema, "", &mut out);
    out
}

fn walk(node: &SchemaNode, prefix: &str, out: &mut Vec<PropertyAnnotation>) {
    let Some(properties) = &node.properties else {
        return;
    };

    for (key, child) in properties {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        if let Some(type_label) = child.type_label() {
            out.push(PropertyAnnotation {
                path: path.clone(),
                type_label,
                required: node.requires(key),
                items: child.items.as_ref().map(|items| ArrayItems {
                    item_type: items.type_name(),
                    unique: child.unique_items == Some(true),
                }),
            });
        }

        walk(child, &path, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(value: Value) -> FeatureDescriptor {
        FeatureDescriptor::from_value(&value).unwrap()
    }

    fn schema(value: Value) -> SchemaNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_template_follows_required_order() {
        let tool = descriptor(json!({
            "name": "search",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "a": {"type": "string"},
                    "b": {"type": "object"},
                    "c": {"type": "integer"}
                },
                "required": ["b", "a"]
            }
        }));

        let template = ArgumentTemplate::from_descriptor(&tool).unwrap();
        let names: Vec<&str> = template.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(template.arguments(), r#"{"b":<<bObject>>,"a":<<string>>}"#);
    }

    #[test]
    fn test_template_placeholders() {
        let tool = descriptor(json!({
            "name": " query ",
            "inputSchema": {
                "properties": {
                    "a": {"type": "string"},
                    "b": {"type": "object"},
                    "mode": {"type": "enum"}
                },
                "required": ["a", "b", "mode"]
            }
        }));

        let template = ArgumentTemplate::from_descriptor(&tool).unwrap();
        assert_eq!(template.tool, "query");
        assert_eq!(
            template.fields[0].placeholder,
            Placeholder::Scalar("string".to_string())
        );
        assert_eq!(template.fields[1].placeholder, Placeholder::Object("b".to_string()));
        assert_ne!(template.fields[0].placeholder, template.fields[1].placeholder);
        assert_eq!(template.fields[2].placeholder.to_string(), "<<modeEnum>>");
        assert_eq!(
            template.command_line("http://localhost:8080/mcp"),
            r#"mcpt call --host 'http://localhost:8080/mcp' --tool 'query' --arguments '{"a":<<string>>,"b":<<bObject>>,"mode":<<modeEnum>>}'"#
        );
    }

    #[test]
    fn test_template_with_custom_paint() {
        let tool = descriptor(json!({
            "name": "echo",
            "inputSchema": {"properties": {"msg": {"type": "string"}}, "required": ["msg"]}
        }));
        let template = ArgumentTemplate::from_descriptor(&tool).unwrap();
        assert_eq!(
            template.arguments_with(|p| format!("[{}]", p)),
            r#"{"msg":[<<string>>]}"#
        );
    }

    #[test]
    fn test_template_with_empty_required() {
        let tool = descriptor(json!({
            "name": "now",
            "inputSchema": {"type": "object", "properties": {}, "required": []}
        }));
        let template = ArgumentTemplate::from_descriptor(&tool).unwrap();
        assert!(template.fields.is_empty());
        assert_eq!(template.arguments(), "{}");
    }

    #[test]
    fn test_template_missing_required_list() {
        let tool = descriptor(json!({
            "name": "t",
            "inputSchema": {"properties": {"a": {"type": "string"}}}
        }));
        let err = ArgumentTemplate::from_descriptor(&tool).unwrap_err();
        assert!(matches!(err, McpError::SchemaMalformed(_)));
    }

    #[test]
    fn test_template_missing_required_property() {
        let tool = descriptor(json!({
            "name": "t",
            "inputSchema": {"properties": {"a": {"type": "string"}}, "required": ["a", "b"]}
        }));
        match ArgumentTemplate::from_descriptor(&tool) {
            Err(McpError::SchemaMalformed(msg)) => assert!(msg.contains("'b'")),
            other => panic!("expected SchemaMalformed, got {:?}", other),
        }
    }

    #[test]
    fn test_template_missing_type() {
        let tool = descriptor(json!({
            "name": "t",
            "inputSchema": {"properties": {"a": {}}, "required": ["a"]}
        }));
        assert!(matches!(
            ArgumentTemplate::from_descriptor(&tool),
            Err(McpError::SchemaMalformed(_))
        ));
    }

    #[test]
    fn test_template_without_input_schema() {
        let prompt = descriptor(json!({"name": "greeting", "arguments": []}));
        assert!(matches!(
            ArgumentTemplate::from_descriptor(&prompt),
            Err(McpError::SchemaMalformed(_))
        ));
    }

    #[test]
    fn test_descriptor_requires_name() {
        let result = FeatureDescriptor::from_value(&json!({"inputSchema": {}}));
        assert!(matches!(result, Err(McpError::SchemaMalformed(_))));
    }

    #[test]
    fn test_enum_takes_precedence_over_type() {
        let node = schema(json!({
            "properties": {"x": {"type": "string", "enum": ["A", "B"]}}
        }));
        let lines = annotate_properties(&node);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].type_label, r#"enum("A","B")"#);
        assert_eq!(lines[0].describe(), r#"x -> type: enum("A","B")"#);
    }

    #[test]
    fn test_type_list_is_joined() {
        let node = schema(json!({"type": ["string", "null"]}));
        assert_eq!(node.type_name().as_deref(), Some("string|null"));
    }

    #[test]
    fn test_nested_paths_and_required() {
        let node = schema(json!({
            "type": "object",
            "properties": {
                "filter": {
                    "type": "object",
                    "properties": {
                        "field": {"type": "string"},
                        "value": {"type": "string"}
                    },
                    "required": ["field"]
                },
                "limit": {"type": "integer"}
            },
            "required": ["filter"]
        }));

        let lines = annotate_properties(&node);
        let rendered: Vec<(String, bool)> =
            lines.iter().map(|l| (l.path.clone(), l.required)).collect();
        assert_eq!(
            rendered,
            vec![
                ("filter".to_string(), true),
                ("filter.field".to_string(), true),
                ("filter.value".to_string(), false),
                ("limit".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_array_items_annotation() {
        let node = schema(json!({
            "properties": {
                "tags": {"type": "array", "items": {"type": "string"}, "uniqueItems": true},
                "ids": {"type": "array", "items": {"type": "integer"}, "uniqueItems": false}
            },
            "required": ["tags"]
        }));

        let lines = annotate_properties(&node);
        assert_eq!(
            lines[0].to_string(),
            "           ids -> type: array[ArrayItems -> type: integer]"
        );
        assert_eq!(
            lines[1].to_string(),
            "[REQUIRED] tags -> type: array[ArrayItems -> type: string][UNIQUE]"
        );
    }

    #[test]
    fn test_untyped_property_is_skipped_but_walked() {
        let node = schema(json!({
            "properties": {
                "wrapper": {"properties": {"inner": {"type": "boolean"}}}
            }
        }));
        let lines = annotate_properties(&node);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].path, "wrapper.inner");
    }
}
