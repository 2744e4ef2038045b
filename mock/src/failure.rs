//! Server error payloads for failure rows.
//!
//! A failure row raises whatever error it was built with, but consumers of a
//! result set usually expect a database server error. [`SqlException`] carries
//! the same fields such an error has (number, state, class, server, message,
//! procedure, line) so tests can assert on them after the failure surfaces.

use std::fmt;

use uuid::Uuid;

/// Severity assigned when none is given; the lowest class that aborts a batch.
pub const DEFAULT_CLASS: u8 = 17;

/// One error reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlError {
    number: i32,
    state: u8,
    class: u8,
    server: String,
    message: String,
    procedure: String,
    line_number: i32,
    win32_error_code: u32,
}

impl SqlError {
    pub fn new(number: i32, state: u8) -> Self {
        Self {
            number,
            state,
            class: DEFAULT_CLASS,
            server: "Unspecified server".to_string(),
            message: "Unspecified error".to_string(),
            procedure: "Unspecified procedure".to_string(),
            line_number: 0,
            win32_error_code: 0,
        }
    }

    pub fn with_class(mut self, class: u8) -> Self {
        self.class = class;
        self
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_procedure(mut self, procedure: impl Into<String>) -> Self {
        self.procedure = procedure.into();
        self
    }

    pub fn with_line_number(mut self, line_number: i32) -> Self {
        self.line_number = line_number;
        self
    }

    pub fn with_win32_error_code(mut self, code: u32) -> Self {
        self.win32_error_code = code;
        self
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn state(&self) -> u8 {
        self.state
    }

    pub fn class(&self) -> u8 {
        self.class
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    pub fn line_number(&self) -> i32 {
        self.line_number
    }

    pub fn win32_error_code(&self) -> u32 {
        self.win32_error_code
    }
}

impl fmt::Display for SqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors attached to one exception, in the order the server sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlErrorCollection {
    errors: Vec<SqlError>,
}

impl SqlErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: SqlError) {
        self.errors.push(error);
    }

    pub fn get(&self, index: usize) -> Option<&SqlError> {
        self.errors.get(index)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SqlError> {
        self.errors.iter()
    }
}

impl FromIterator<SqlError> for SqlErrorCollection {
    fn from_iter<I: IntoIterator<Item = SqlError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SqlErrorCollection {
    type Item = &'a SqlError;
    type IntoIter = std::slice::Iter<'a, SqlError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// A server exception: a non-empty error collection plus connection details.
///
/// The scalar accessors report the first error, matching what client libraries
/// expose for multi-error exceptions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", joined_messages(.errors))]
pub struct SqlException {
    errors: SqlErrorCollection,
    server_version: Option<String>,
    connection_id: Uuid,
}

impl SqlException {
    pub fn new(error: SqlError) -> Self {
        Self {
            errors: std::iter::once(error).collect(),
            server_version: None,
            connection_id: Uuid::nil(),
        }
    }

    /// Returns `None` if the collection is empty.
    pub fn from_errors(errors: SqlErrorCollection) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }
        Some(Self {
            errors,
            server_version: None,
            connection_id: Uuid::nil(),
        })
    }

    pub fn with_error(mut self, error: SqlError) -> Self {
        self.errors.add(error);
        self
    }

    pub fn with_server_version(mut self, version: impl Into<String>) -> Self {
        self.server_version = Some(version.into());
        self
    }

    pub fn with_connection_id(mut self, id: Uuid) -> Self {
        self.connection_id = id;
        self
    }

    pub fn errors(&self) -> &SqlErrorCollection {
        &self.errors
    }

    pub fn server_version(&self) -> Option<&str> {
        self.server_version.as_deref()
    }

    pub fn connection_id(&self) -> Uuid {
        self.connection_id
    }

    fn first(&self) -> &SqlError {
        // non-empty by construction
        &self.errors.errors[0]
    }

    pub fn number(&self) -> i32 {
        self.first().number()
    }

    pub fn state(&self) -> u8 {
        self.first().state()
    }

    pub fn class(&self) -> u8 {
        self.first().class()
    }

    pub fn server(&self) -> &str {
        self.first().server()
    }

    pub fn procedure(&self) -> &str {
        self.first().procedure()
    }

    pub fn line_number(&self) -> i32 {
        self.first().line_number()
    }
}

fn joined_messages(errors: &SqlErrorCollection) -> String {
    errors
        .iter()
        .map(SqlError::message)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let err = SqlError::new(1000, 80);
        assert_eq!(err.class(), DEFAULT_CLASS);
        assert_eq!(err.server(), "Unspecified server");
        assert_eq!(err.message(), "Unspecified error");
        assert_eq!(err.procedure(), "Unspecified procedure");
        assert_eq!(err.line_number(), 0);
        assert_eq!(err.win32_error_code(), 0);
    }

    #[test]
    fn test_exception_reports_first_error() {
        let exception = SqlException::new(
            SqlError::new(1000, 80)
                .with_server("MyFakeServer")
                .with_message("Connection Timeout.")
                .with_procedure("spMySproc")
                .with_line_number(54),
        )
        .with_error(SqlError::new(2000, 1).with_message("Second."))
        .with_server_version("9.0.0.0");

        assert_eq!(exception.number(), 1000);
        assert_eq!(exception.state(), 80);
        assert_eq!(exception.class(), 17);
        assert_eq!(exception.server(), "MyFakeServer");
        assert_eq!(exception.procedure(), "spMySproc");
        assert_eq!(exception.line_number(), 54);
        assert_eq!(exception.errors().len(), 2);
        assert_eq!(exception.server_version(), Some("9.0.0.0"));
        assert_eq!(exception.to_string(), "Connection Timeout.\nSecond.");
    }

    #[test]
    fn test_empty_collection_is_rejected() {
        assert!(SqlException::from_errors(SqlErrorCollection::new()).is_none());
        let errors: SqlErrorCollection = vec![SqlError::new(1, 1)].into_iter().collect();
        assert!(SqlException::from_errors(errors).is_some());
    }
}
