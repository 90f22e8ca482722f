//! Result type alias for CareLink
//!
//! This module provides a convenient Result type alias that uses CareLinkError
//! as the error type.

use super::errors::CareLinkError;

/// Result type alias for CareLink operations
///
/// # Examples
///
/// ```
/// use carelink::domain::result::Result;
/// use carelink::domain::errors::CareLinkError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CareLinkError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CareLinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(CareLinkError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
