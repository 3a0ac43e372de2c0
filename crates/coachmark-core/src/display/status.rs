//! Status and confirmation message types for operation feedback.

use std::fmt;

/// Wrapper type for displaying the outcome of a state-changing operation.
///
/// Commands that reset a tour, set or clear the pending slot report through
/// this type so every confirmation reads the same way.
///
/// # Format
///
/// A single line, `Success: <message>` or `Error: <message>`, followed by a
/// newline.
pub struct OperationStatus {
    /// Human-readable description of what happened
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    /// Create a new success status.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    /// Create a new failure status.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {}",
            if self.success { "Success:" } else { "Error:" },
            self.message
        )
    }
}
