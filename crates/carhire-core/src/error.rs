//! # Error Types
//!
//! Domain-specific error types for carhire-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  carhire-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  carhire-db errors     └── DbError     - Database failures             │
//! │  carhire-store errors  └── StoreError  - Persistence failures          │
//! │  apps/api errors       └── ApiError    - What HTTP clients see         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Role string is neither `renter` nor `owner`.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Category string is not one of the known categories.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Booking status string is not a known status.
    #[error("Unknown booking status: {0}")]
    UnknownBookingStatus(String),

    /// Car cannot be booked for the requested dates.
    ///
    /// ## When This Occurs
    /// - Listing is flagged unavailable
    /// - One of the requested days is in the car's unavailable dates
    #[error("Car {car_id} is not available on {date}")]
    CarUnavailable { car_id: String, date: String },

    /// Daily rate times rental days does not fit in the money type.
    #[error("Total for car {car_id} over {rental_days} days is out of range")]
    PriceOverflow { car_id: String, rental_days: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid email, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Start date falls after end date.
    #[error("start date {start} is after end date {end}")]
    DateOrder { start: String, end: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CarUnavailable {
            car_id: "car-1".to_string(),
            date: "2024-06-01".to_string(),
        };
        assert_eq!(err.to_string(), "Car car-1 is not available on 2024-06-01");

        let err = ValidationError::DateOrder {
            start: "2024-06-05".to_string(),
            end: "2024-06-01".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "start date 2024-06-05 is after end date 2024-06-01"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "make".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
