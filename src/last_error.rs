//! Last-error slot for callers that check a flag and then ask for a message.
//!
//! Bindings to languages without `Result` often follow the convention "return
//! null or `false`, then query the last error message". This module offers
//! that convention on top of the regular [`Result`](crate::Result) API. It
//! is a compatibility layer, not a replacement for it.
//!
//! The slot is thread-local: a failing parse on one thread never overwrites
//! the message another thread is about to read. A message stays in place
//! until the next failure on the same thread or [`clear_last_error`].
//!
//! ```rust
//! use gbln::last_error;
//!
//! assert!(last_error::parse("age<i8>(999)").is_none());
//! let message = last_error::last_error_message().unwrap();
//! assert!(message.contains("does not fit in i8"));
//!
//! let doc = last_error::parse("age<i8>(25)").unwrap();
//! assert_eq!(doc.get("age").and_then(|v| v.as_i8()), Some(25));
//! ```

use crate::{Result, Value};
use std::cell::RefCell;
use std::io;

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Message of the most recent failure recorded on this thread.
#[must_use]
pub fn last_error_message() -> Option<String> {
    LAST_ERROR.with(|slot| slot.borrow().clone())
}

/// Empties this thread's last-error slot.
pub fn clear_last_error() {
    LAST_ERROR.with(|slot| slot.borrow_mut().take());
}

/// Converts a result into an option, recording the error message on failure.
pub fn capture<T>(result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            let message = err.to_string();
            LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
            None
        }
    }
}

/// [`crate::from_str`], recording failures in the last-error slot.
pub fn parse(input: &str) -> Option<Value> {
    capture(crate::from_str(input))
}

/// [`crate::from_reader`], recording failures in the last-error slot.
pub fn parse_reader<R: io::Read>(reader: R) -> Option<Value> {
    capture(crate::from_reader(reader))
}

/// [`crate::to_writer`], recording failures in the last-error slot.
///
/// Returns `true` on success.
pub fn write<W: io::Write>(value: &Value, writer: W) -> bool {
    capture(crate::to_writer(writer, value)).is_some()
}
