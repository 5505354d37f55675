//! Schema nodes: the typed description of one configuration key.

use crate::resolver::merge::apply_overlay;
use serde_json::{Map, Value};
use std::fmt;

/// Value kind of a schema node
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Boolean,
    Integer,
    /// Any JSON number; integers are accepted and kept as written
    Float,
    /// String restricted to the listed variants (case-sensitive)
    Enum(Vec<String>),
    String,
    /// Homogeneous list; the element kind is always a scalar kind
    ScalarList(Box<Kind>),
    /// List of records whose fields are the node's children
    RecordList,
    /// Open key set, merged key by key
    Mapping,
    /// Closed group with statically declared children
    Group,
}

impl Kind {
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Kind::Boolean | Kind::Integer | Kind::Float | Kind::Enum(_) | Kind::String
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Kind::ScalarList(_) | Kind::RecordList)
    }

    /// Check a scalar value against this kind. Non-scalar kinds never match.
    pub fn accepts_scalar(&self, value: &Value) -> bool {
        match (self, value) {
            (Kind::Boolean, Value::Bool(_)) => true,
            (Kind::Integer, Value::Number(n)) => n.is_i64(),
            (Kind::Float, Value::Number(_)) => true,
            (Kind::String, Value::String(_)) => true,
            (Kind::Enum(variants), Value::String(s)) => variants.iter().any(|v| v == s),
            _ => false,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Boolean => write!(f, "boolean"),
            Kind::Integer => write!(f, "integer"),
            Kind::Float => write!(f, "float"),
            Kind::Enum(variants) => write!(f, "enum[{}]", variants.join("|")),
            Kind::String => write!(f, "string"),
            Kind::ScalarList(element) => write!(f, "list<{}>", element),
            Kind::RecordList => write!(f, "list<record>"),
            Kind::Mapping => write!(f, "mapping"),
            Kind::Group => write!(f, "group"),
        }
    }
}

/// Human-readable shape of a runtime value, used in validation errors
pub fn value_shape(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) if n.is_f64() => format!("float {}", n),
        Value::Number(n) => format!("integer {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(items) => format!("list of {} item(s)", items.len()),
        Value::Object(map) => format!("object with {} key(s)", map.len()),
    }
}

/// Typed description of one configuration key
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub name: String,
    pub kind: Kind,
    /// Factory default. For groups this is the object of the children's defaults.
    pub default_value: Value,
    /// Declared children, in order. Only groups and record lists have any.
    pub children: Vec<SchemaNode>,
    /// Shape shared by every value of a mapping, when the mapping is typed
    pub entry: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    fn leaf(name: &str, kind: Kind, default_value: Value) -> Self {
        Self {
            name: name.to_string(),
            kind,
            default_value,
            children: Vec::new(),
            entry: None,
        }
    }

    pub fn boolean(name: &str, default: bool) -> Self {
        Self::leaf(name, Kind::Boolean, Value::Bool(default))
    }

    pub fn integer(name: &str, default: i64) -> Self {
        Self::leaf(name, Kind::Integer, Value::from(default))
    }

    pub fn float(name: &str, default: f64) -> Self {
        Self::leaf(name, Kind::Float, Value::from(default))
    }

    pub fn string(name: &str, default: &str) -> Self {
        Self::leaf(name, Kind::String, Value::from(default))
    }

    pub fn enumeration(name: &str, variants: &[&str], default: &str) -> Self {
        let variants = variants.iter().map(|v| v.to_string()).collect();
        Self::leaf(name, Kind::Enum(variants), Value::from(default))
    }

    /// List of scalars of `element` kind
    pub fn scalar_list(name: &str, element: Kind, default: Vec<Value>) -> Self {
        Self::leaf(name, Kind::ScalarList(Box::new(element)), Value::Array(default))
    }

    /// List of records; `fields` describes one record
    pub fn record_list(name: &str, fields: Vec<SchemaNode>, default: Vec<Value>) -> Self {
        Self {
            name: name.to_string(),
            kind: Kind::RecordList,
            default_value: Value::Array(default),
            children: fields,
            entry: None,
        }
    }

    /// Open mapping whose values are free-form documents
    pub fn free_mapping(name: &str, default: Map<String, Value>) -> Self {
        Self::leaf(name, Kind::Mapping, Value::Object(default))
    }

    /// Open mapping whose values all follow `entry`.
    ///
    /// Each default entry is given as a partial document and materialised on
    /// top of the template default, the same way an override adds a new key.
    pub fn mapping(name: &str, entry: SchemaNode, entries: Vec<(&str, Value)>) -> Self {
        let mut default = Map::new();
        for (key, partial) in entries {
            let mut value = entry.default_value.clone();
            apply_overlay(&entry, &mut value, &partial);
            default.insert(key.to_string(), value);
        }
        Self {
            name: name.to_string(),
            kind: Kind::Mapping,
            default_value: Value::Object(default),
            children: Vec::new(),
            entry: Some(Box::new(entry)),
        }
    }

    /// Closed group; the default is assembled from the children
    pub fn group(name: &str, children: Vec<SchemaNode>) -> Self {
        let default_value = Value::Object(
            children
                .iter()
                .map(|c| (c.name.clone(), c.default_value.clone()))
                .collect(),
        );
        Self {
            name: name.to_string(),
            kind: Kind::Group,
            default_value,
            children,
            entry: None,
        }
    }

    /// Look up a declared child by name
    pub fn child(&self, name: &str) -> Option<&SchemaNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Leaves are every node that is not a closed group
    pub fn is_leaf(&self) -> bool {
        self.kind != Kind::Group
    }
}
