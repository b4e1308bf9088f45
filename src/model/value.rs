//! Runtime value graph handed to the serializer.
//!
//! A [`Value`] models whatever a producer wants to log: primitives, functions,
//! errors, and shared containers. Arrays and objects are reference-counted
//! handles with interior mutability, so a graph can contain shared subtrees
//! and cycles (`arr.push(arr)`), exactly the shapes the serializer must
//! survive. Identity of a container is the address of its shared allocation.

use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Shared handle to an array.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// Shared handle to an object.
pub type ObjectRef = Rc<RefCell<Object>>;

/// Fallible property accessor. `Err` means "the getter threw".
pub type Getter = Rc<dyn Fn() -> Result<Value, String>>;

/// A dynamically typed runtime value.
#[derive(Clone)]
pub enum Value {
    /// `null`.
    Null,
    /// `undefined`.
    Undefined,
    /// Boolean.
    Bool(bool),
    /// Any float, including NaN and the infinities.
    Number(f64),
    /// String.
    String(String),
    /// Function, known by its source text.
    Function(FunctionValue),
    /// Error object.
    Error(ErrorValue),
    /// Host values without structure (symbols, big integers, ...), carried
    /// as their display text.
    Other(String),
    /// Shared array; may be part of a cycle.
    Array(ArrayRef),
    /// Shared object; may be part of a cycle.
    Object(ObjectRef),
}

impl Value {
    /// Wrap items in a fresh shared array.
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    /// Wrap an object in a fresh shared handle.
    pub fn object(object: Object) -> Self {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    /// Build an object from `(key, value)` pairs, keeping their order.
    pub fn object_from<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut object = Object::new();
        for (key, value) in pairs {
            object.insert(key, value);
        }
        Value::object(object)
    }

    /// Build a function value from its source text.
    pub fn function(source: impl Into<String>) -> Self {
        Value::Function(FunctionValue::new(source))
    }

    /// Build an error value.
    pub fn error(message: impl Into<String>, stack: Option<String>) -> Self {
        Value::Error(ErrorValue::new(message, stack))
    }

    /// Identity of the shared allocation behind a container, if any.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Array(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
            Value::Object(rc) => Some(Rc::as_ptr(rc) as *const () as usize),
            _ => None,
        }
    }

    /// Short type name, as a script runtime would report it.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Error(_) => "error",
            Value::Other(_) => "other",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

// Containers print shallowly; a derived impl would loop forever on cycles.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Undefined => write!(f, "Undefined"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Function(func) => write!(f, "Function({:?})", func.source()),
            Value::Error(err) => write!(f, "Error({:?})", err.message()),
            Value::Other(text) => write!(f, "Other({text:?})"),
            Value::Array(rc) => match rc.try_borrow() {
                Ok(items) => write!(f, "Array(len={})", items.len()),
                Err(_) => write!(f, "Array(<borrowed>)"),
            },
            Value::Object(rc) => match rc.try_borrow() {
                Ok(object) => f.debug_list().entries(object.keys()).finish(),
                Err(_) => write!(f, "Object(<borrowed>)"),
            },
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::object_from(map),
        }
    }
}

/// A function, known only by its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionValue {
    source: String,
}

impl FunctionValue {
    /// Function with the given source text.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Full source text.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// An error object: message plus optional stack text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    message: String,
    stack: Option<String>,
}

impl ErrorValue {
    /// Error with a message and optional stack.
    pub fn new(message: impl Into<String>, stack: Option<String>) -> Self {
        Self {
            message: message.into(),
            stack,
        }
    }

    /// Error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Stack text, if any.
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

/// One own property of an object.
#[derive(Clone)]
pub enum Property {
    /// Plain stored value.
    Data(Value),
    /// Computed on access; may fail.
    Getter(Getter),
}

impl Property {
    /// Read the property.
    ///
    /// A getter that returns `Err` or panics yields `Err` with a reason; the
    /// failure never escapes this call.
    pub fn read(&self) -> Result<Value, String> {
        match self {
            Property::Data(value) => Ok(value.clone()),
            Property::Getter(getter) => panic::catch_unwind(AssertUnwindSafe(|| getter()))
                .unwrap_or_else(|_| Err("getter panicked".to_string())),
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Data(value) => f.debug_tuple("Data").field(value).finish(),
            Property::Getter(_) => write!(f, "Getter(..)"),
        }
    }
}

/// Ordered collection of own properties (insertion order).
#[derive(Debug, Clone, Default)]
pub struct Object {
    properties: Vec<(String, Property)>,
}

impl Object {
    /// Object without properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a data property. Re-inserting a key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.set(key.into(), Property::Data(value.into()));
    }

    /// Define a getter property.
    pub fn define_getter<F>(&mut self, key: impl Into<String>, getter: F)
    where
        F: Fn() -> Result<Value, String> + 'static,
    {
        self.set(key.into(), Property::Getter(Rc::new(getter)));
    }

    fn set(&mut self, key: String, property: Property) {
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = property,
            None => self.properties.push((key, property)),
        }
    }

    /// Property named `key`, without invoking getters.
    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, property)| property)
    }

    /// Own keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(k, _)| k.as_str())
    }

    /// Own properties in insertion order.
    pub fn properties(&self) -> &[(String, Property)] {
        &self.properties
    }

    /// Number of own properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the object has no own properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
