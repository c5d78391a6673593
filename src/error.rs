//! Error types for the aggregation engine and loader.

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the engine and by table construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An aggregate that needs at least one record was asked of an empty table.
    #[error("no sales data available for '{operation}'")]
    EmptyInput { operation: &'static str },

    /// A column value falls outside its declared domain.
    #[error("row {row}: invalid value '{value}' in column '{column}': {reason}")]
    Schema {
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },
}

/// Non-fatal, advisory finding about the input data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataQualityWarning {
    /// 1-based data row the warning refers to.
    pub row: usize,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let empty = EngineError::EmptyInput {
            operation: "average_order_value",
        };
        assert!(empty.to_string().contains("average_order_value"));

        let schema = EngineError::Schema {
            row: 3,
            column: "hour",
            value: "25".to_string(),
            reason: "hour must be between 0 and 23, got 25".to_string(),
        };
        let msg = schema.to_string();
        assert!(msg.starts_with("row 3"));
        assert!(msg.contains("'hour'"));
    }
}
