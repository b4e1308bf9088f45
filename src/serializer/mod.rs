//! Safe serializer: runtime values to bounded trees.
//!
//! [`serialize`] turns an arbitrary, possibly cyclic, possibly huge [`Value`]
//! graph into a [`SerializedValue`] whose size is bounded by a
//! [`SerializeConfig`]. It is total: every failure inside the graph (a getter
//! that errors or panics, a container that cannot be borrowed) is replaced by
//! a sentinel leaf and the call still returns.
//!
//! Limits:
//! - depth: containers at `max_depth` become `[Max Depth Reached]`
//! - arrays: at most `max_array_length` elements
//! - objects: at most `max_object_keys` own keys, insertion order
//! - strings: at most `max_string_length` chars, plus a length suffix

use crate::model::{ArrayRef, FunctionValue, ObjectFields, ObjectRef, SerializedValue, Value};
use std::collections::HashSet;
use std::rc::Rc;

/// Sentinel for a reference back into the container currently being visited.
pub const CIRCULAR: &str = "[Circular]";
/// Sentinel for a container beyond the depth limit.
pub const MAX_DEPTH_REACHED: &str = "[Max Depth Reached]";
/// Sentinel for a property (or container) that could not be read.
pub const ACCESS_ERROR: &str = "[Error accessing property]";

/// Hard ceiling on `max_depth`; keeps the recursion far from the native stack limit.
pub const MAX_DEPTH_LIMIT: usize = 64;

/// Function sources longer than this are reduced to their signature.
const FUNCTION_SOURCE_LIMIT: usize = 100;

/// Serializer limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeConfig {
    /// Nesting depth at which containers become `[Max Depth Reached]`.
    pub max_depth: usize,
    /// Longest string kept, in chars.
    pub max_string_length: usize,
    /// Most array elements kept.
    pub max_array_length: usize,
    /// Most object keys kept.
    pub max_object_keys: usize,
}

impl Default for SerializeConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_string_length: 1000,
            max_array_length: 100,
            max_object_keys: 50,
        }
    }
}

impl SerializeConfig {
    /// Same limits with `max_depth` clamped to [`MAX_DEPTH_LIMIT`].
    pub fn validated(self) -> Self {
        Self {
            max_depth: self.max_depth.min(MAX_DEPTH_LIMIT),
            ..self
        }
    }
}

/// Serialize one value.
///
/// Never panics on account of the input, including self-referential graphs.
pub fn serialize(value: &Value, config: &SerializeConfig) -> SerializedValue {
    let mut walker = Walker {
        config: config.validated(),
        visiting: HashSet::new(),
    };
    walker.value(value, 0)
}

/// Serialize each argument of a call independently.
pub fn serialize_args(values: &[Value], config: &SerializeConfig) -> Vec<SerializedValue> {
    values.iter().map(|value| serialize(value, config)).collect()
}

/// State of one top-level `serialize` call.
struct Walker {
    config: SerializeConfig,
    /// Identities of containers on the current path from the root.
    visiting: HashSet<usize>,
}

impl Walker {
    fn value(&mut self, value: &Value, depth: usize) -> SerializedValue {
        match value {
            Value::Null => SerializedValue::Null,
            Value::Undefined => SerializedValue::Undefined,
            Value::Bool(b) => SerializedValue::Boolean { value: *b },
            Value::Number(n) => SerializedValue::number(*n),
            Value::String(s) | Value::Other(s) => truncate_string(s, self.config.max_string_length),
            Value::Function(func) => SerializedValue::Function {
                value: function_signature(func),
            },
            Value::Error(err) => SerializedValue::Error {
                message: err.message().to_string(),
                stack: err.stack().map(str::to_string),
            },
            Value::Array(rc) => {
                let id = Rc::as_ptr(rc) as *const () as usize;
                self.container(id, depth, |walker| walker.array(rc, depth))
            }
            Value::Object(rc) => {
                let id = Rc::as_ptr(rc) as *const () as usize;
                self.container(id, depth, |walker| walker.object(rc, depth))
            }
        }
    }

    /// Cycle check, then depth check, then descend with `id` marked visited.
    fn container<F>(&mut self, id: usize, depth: usize, descend: F) -> SerializedValue
    where
        F: FnOnce(&mut Self) -> SerializedValue,
    {
        if self.visiting.contains(&id) {
            return SerializedValue::string(CIRCULAR);
        }
        if depth >= self.config.max_depth {
            return SerializedValue::string(MAX_DEPTH_REACHED);
        }
        self.visiting.insert(id);
        let node = descend(self);
        self.visiting.remove(&id);
        node
    }

    fn array(&mut self, rc: &ArrayRef, depth: usize) -> SerializedValue {
        let Ok(items) = rc.try_borrow() else {
            return SerializedValue::string(ACCESS_ERROR);
        };
        let total = items.len();
        let limit = total.min(self.config.max_array_length);

        let value = items[..limit]
            .iter()
            .map(|item| self.value(item, depth + 1))
            .collect();

        let mut preview = format!("Array({total})");
        if total > limit {
            preview.push_str(&format!(" [showing first {limit} items]"));
        }

        SerializedValue::Array { value, preview }
    }

    fn object(&mut self, rc: &ObjectRef, depth: usize) -> SerializedValue {
        let Ok(object) = rc.try_borrow() else {
            return SerializedValue::string(ACCESS_ERROR);
        };
        let total = object.len();
        let limit = total.min(self.config.max_object_keys);

        let mut value = ObjectFields::with_capacity(limit);
        for (key, property) in object.properties().iter().take(limit) {
            // A failing accessor only costs its own key.
            let node = match property.read() {
                Ok(inner) => self.value(&inner, depth + 1),
                Err(_) => SerializedValue::string(ACCESS_ERROR),
            };
            value.push(key.as_str(), node);
        }

        let preview_keys = object.keys().take(3).collect::<Vec<_>>().join(", ");
        let preview = if total > limit {
            format!("Object {{{preview_keys}... [{total} keys, showing first {limit}]}}")
        } else if total > 3 {
            format!("Object {{{preview_keys}...}}")
        } else {
            format!("Object {{{preview_keys}}}")
        };

        SerializedValue::Object { value, preview }
    }
}

/// Cut a string to `max` chars, recording the original length.
fn truncate_string(s: &str, max: usize) -> SerializedValue {
    match s.char_indices().nth(max) {
        None => SerializedValue::string(s),
        Some((cut, _)) => {
            let total = s.chars().count();
            SerializedValue::string(format!(
                "{}... [truncated, total length: {total}]",
                &s[..cut]
            ))
        }
    }
}

/// Short textual form of a function.
fn function_signature(func: &FunctionValue) -> String {
    let source = func.source();
    if source.chars().count() <= FUNCTION_SOURCE_LIMIT {
        return source.to_string();
    }
    match signature_head(source) {
        Some(head) => format!("{head} {{...}}"),
        None => {
            let prefix: String = source.chars().take(FUNCTION_SOURCE_LIMIT).collect();
            format!("{prefix} {{...}}")
        }
    }
}

/// `function name(args)` or `args =>` at the start of `source`.
fn signature_head(source: &str) -> Option<&str> {
    let trimmed = source.trim_start();

    if let Some(rest) = trimmed.strip_prefix("function") {
        let open = rest.find('(')?;
        let close = rest.find(')')?;
        let name = rest[..open].trim();
        let name_ok = name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$');
        if open > close || !name_ok {
            return None;
        }
        return Some(&trimmed[.."function".len() + close + 1]);
    }

    let arrow = trimmed.find("=>")?;
    if arrow == 0 || trimmed[..arrow].contains('=') {
        return None;
    }
    Some(&trimmed[..arrow + 2])
}

#[cfg(test)]
#[path = "serializer_tests.rs"]
mod tests;
