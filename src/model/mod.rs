//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod key_action;
pub mod log_entry;
pub mod message;
pub mod serialized;
pub mod value;

// Re-export for convenience
pub use error::{InputError, ParseError};
pub use key_action::KeyAction;
pub use log_entry::{LogEntry, LogLevel, EXPANDABLE_STRING_LENGTH};
pub use message::{MessageKind, TransportMessage, LOG_MESSAGE_TYPE};
pub use serialized::{number_to_text, ObjectFields, SerializedValue};
pub use value::{ArrayRef, ErrorValue, FunctionValue, Object, ObjectRef, Property, Value};
