//! Function set of the layout expression language.
//!
//! Expressions are JSON arrays whose head names a function:
//! `["equals", ["dataModel", "person.age"], 18]`. Evaluating them is left to
//! the expression layer; this module fixes the closed function set and checks
//! raw expressions (as found in `hidden` / `required`) against it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpressionFunction {
    /// Lookup in the data model, filling missing indexes from the current context
    DataModel,
    /// Lookup the `simpleBinding` value of the component with this id
    Component,
    /// Lookup a property of the instance
    InstanceContext,
    #[serde(rename = "if")]
    If,
    /// Lookup a key of the frontend settings
    FrontendSettings,
    Concat,
    Equals,
    NotEquals,
    GreaterThanEq,
    LessThan,
    LessThanEq,
    GreaterThan,
    And,
    Or,
    Not,
    /// Action performed in the task before the current gateway
    GatewayAction,
    /// Any name not in the set
    #[serde(other, rename = "INVALID")]
    Invalid,
}

impl ExpressionFunction {
    pub const ALL: [ExpressionFunction; 16] = [
        ExpressionFunction::DataModel,
        ExpressionFunction::Component,
        ExpressionFunction::InstanceContext,
        ExpressionFunction::If,
        ExpressionFunction::FrontendSettings,
        ExpressionFunction::Concat,
        ExpressionFunction::Equals,
        ExpressionFunction::NotEquals,
        ExpressionFunction::GreaterThanEq,
        ExpressionFunction::LessThan,
        ExpressionFunction::LessThanEq,
        ExpressionFunction::GreaterThan,
        ExpressionFunction::And,
        ExpressionFunction::Or,
        ExpressionFunction::Not,
        ExpressionFunction::GatewayAction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExpressionFunction::DataModel => "dataModel",
            ExpressionFunction::Component => "component",
            ExpressionFunction::InstanceContext => "instanceContext",
            ExpressionFunction::If => "if",
            ExpressionFunction::FrontendSettings => "frontendSettings",
            ExpressionFunction::Concat => "concat",
            ExpressionFunction::Equals => "equals",
            ExpressionFunction::NotEquals => "notEquals",
            ExpressionFunction::GreaterThanEq => "greaterThanEq",
            ExpressionFunction::LessThan => "lessThan",
            ExpressionFunction::LessThanEq => "lessThanEq",
            ExpressionFunction::GreaterThan => "greaterThan",
            ExpressionFunction::And => "and",
            ExpressionFunction::Or => "or",
            ExpressionFunction::Not => "not",
            ExpressionFunction::GatewayAction => "gatewayAction",
            ExpressionFunction::Invalid => "INVALID",
        }
    }

    /// Whether `count` arguments are acceptable
    pub fn accepts_arguments(self, count: usize) -> bool {
        match self {
            ExpressionFunction::DataModel => (1..=2).contains(&count),
            ExpressionFunction::Component
            | ExpressionFunction::InstanceContext
            | ExpressionFunction::FrontendSettings
            | ExpressionFunction::Not => count == 1,
            // ["if", cond, then] or ["if", cond, then, "else", otherwise]
            ExpressionFunction::If => count == 2 || count == 4,
            ExpressionFunction::Concat => true,
            ExpressionFunction::Equals
            | ExpressionFunction::NotEquals
            | ExpressionFunction::GreaterThanEq
            | ExpressionFunction::LessThan
            | ExpressionFunction::LessThanEq
            | ExpressionFunction::GreaterThan => count == 2,
            ExpressionFunction::And | ExpressionFunction::Or => count >= 1,
            ExpressionFunction::GatewayAction => count == 0,
            ExpressionFunction::Invalid => false,
        }
    }
}

impl fmt::Display for ExpressionFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpressionFunction {
    type Err = std::convert::Infallible;

    /// Unknown names parse to [`ExpressionFunction::Invalid`]
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(ExpressionFunction::ALL
            .into_iter()
            .find(|function| function.as_str() == name)
            .unwrap_or(ExpressionFunction::Invalid))
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ExpressionError {
    #[error("Unknown expression function '{name}'")]
    UnknownFunction { name: String },

    #[error("Function '{function}' does not accept {count} argument(s)")]
    WrongArgumentCount {
        function: ExpressionFunction,
        count: usize,
    },

    #[error("Expression arrays must start with a function name")]
    MissingFunctionName,
}

/// Check a raw expression and collect the functions it calls, outermost first.
///
/// Literals (strings, numbers, booleans, null) are valid expressions that call
/// nothing.
pub fn referenced_functions(expression: &Value) -> Result<Vec<ExpressionFunction>, ExpressionError> {
    let mut found = Vec::new();
    collect_functions(expression, &mut found)?;
    Ok(found)
}

fn collect_functions(expression: &Value, found: &mut Vec<ExpressionFunction>) -> Result<(), ExpressionError> {
    let Value::Array(items) = expression else {
        return Ok(());
    };
    let (head, arguments) = items.split_first().ok_or(ExpressionError::MissingFunctionName)?;
    let name = head.as_str().ok_or(ExpressionError::MissingFunctionName)?;

    let function: ExpressionFunction = name.parse().unwrap_or(ExpressionFunction::Invalid);
    if function == ExpressionFunction::Invalid {
        return Err(ExpressionError::UnknownFunction {
            name: name.to_string(),
        });
    }
    if !function.accepts_arguments(arguments.len()) {
        return Err(ExpressionError::WrongArgumentCount {
            function,
            count: arguments.len(),
        });
    }

    found.push(function);
    for argument in arguments {
        collect_functions(argument, found)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_names_round_trip() {
        for function in ExpressionFunction::ALL {
            let parsed: ExpressionFunction = function.as_str().parse().unwrap();
            assert_eq!(parsed, function);

            let json = serde_json::to_string(&function).unwrap();
            assert_eq!(json, format!("\"{}\"", function));
        }
    }

    #[test]
    fn test_unknown_names_are_invalid() {
        assert_eq!("lookup".parse::<ExpressionFunction>().unwrap(), ExpressionFunction::Invalid);
        let from_json: ExpressionFunction = serde_json::from_str("\"round\"").unwrap();
        assert_eq!(from_json, ExpressionFunction::Invalid);
        let keyword: ExpressionFunction = serde_json::from_str("\"if\"").unwrap();
        assert_eq!(keyword, ExpressionFunction::If);
    }

    #[test]
    fn test_referenced_functions() {
        let expression = json!(["and", ["equals", ["dataModel", "person.age"], 18], ["not", ["component", "consent"]]]);
        assert_eq!(
            referenced_functions(&expression).unwrap(),
            vec![
                ExpressionFunction::And,
                ExpressionFunction::Equals,
                ExpressionFunction::DataModel,
                ExpressionFunction::Not,
                ExpressionFunction::Component,
            ]
        );
        assert!(referenced_functions(&json!(true)).unwrap().is_empty());
    }

    #[test]
    fn test_if_with_else() {
        let expression = json!(["if", ["gatewayAction"], "a", "else", "b"]);
        assert_eq!(
            referenced_functions(&expression).unwrap(),
            vec![ExpressionFunction::If, ExpressionFunction::GatewayAction]
        );
    }

    #[test]
    fn test_invalid_expressions() {
        assert_eq!(
            referenced_functions(&json!(["round", 1.5])),
            Err(ExpressionError::UnknownFunction { name: "round".to_string() })
        );
        assert_eq!(
            referenced_functions(&json!(["equals", 1])),
            Err(ExpressionError::WrongArgumentCount {
                function: ExpressionFunction::Equals,
                count: 1
            })
        );
        assert_eq!(referenced_functions(&json!([])), Err(ExpressionError::MissingFunctionName));
        assert_eq!(referenced_functions(&json!([1, 2])), Err(ExpressionError::MissingFunctionName));
    }
}
