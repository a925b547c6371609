use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The query core (member filtering, reference resolution and handle memoization) never fails:
/// absence is reported through `Option` and empty collections. Errors originate only at the
/// boundary of the reflection surface the static metadata model cannot serve, and while
/// constructing or loading metadata definitions.
///
/// # Error Categories
///
/// ## Reflection Surface
/// - [`Error::NotSupported`] - Will never be answered by a static metadata model
/// - [`Error::NotImplemented`] - Part of the surface, but without logic behind it yet
///
/// ## Definition Construction and Loading
/// - [`Error::Malformed`] - Invalid input handed to a definition builder
/// - [`Error::TypeInsert`] - A definition token is already registered in its module
/// - [`Error::DuplicateAssembly`] - An assembly name is already loaded into the universe
/// - [`Error::RecursionLimit`] - Nested types exceed the configured depth
///
/// # Examples
///
/// ```rust
/// use dotreflect::{Error, metadata::typesystem::TypeBuilder};
///
/// match TypeBuilder::new("Contoso", "Widget").build() {
///     Ok(_) => {}
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed definition: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The operation can not be answered from static metadata, and never will be.
    ///
    /// Runtime-only facets of a type, such as its GUID, the fully loaded underlying system
    /// type, custom attribute instances or COM classification, require a loaded runtime.
    /// The payload names the operation that was requested.
    #[error("Not supported by a static metadata model - {0}")]
    NotSupported(&'static str),

    /// The operation is part of the reflection surface, but has no implementation yet.
    ///
    /// Distinct from [`Error::NotSupported`]: this marks a gap rather than a permanent
    /// limitation. The payload names the operation that was requested.
    #[error("Not implemented - {0}")]
    NotImplemented(&'static str),

    /// A definition handed to a builder is invalid.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Failed to insert a definition into its module.
    ///
    /// The associated [`Token`] is already taken by another definition of the module.
    #[error("Failed to insert definition into module - {0}")]
    TypeInsert(Token),

    /// An assembly with the same simple name is already part of the universe.
    #[error("Assembly is already loaded - {0}")]
    DuplicateAssembly(String),

    /// Recursion limit reached.
    ///
    /// Nested types are validated against [`crate::UniverseConfig::max_nesting_depth`] while
    /// an assembly is loaded. The associated value shows the limit that was exceeded.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}
