use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::model::{ParameterDefinition, ParameterType, Value};
use crate::result::Arguments;

/// Argument binding failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    /// A required parameter has neither an argument nor a default
    #[error("missing required argument '{name}'")]
    MissingArgument {
        /// Parameter name
        name: String,
    },

    /// An argument or default does not parse as the parameter's type
    #[error("argument '{name}' = '{value}' is not a valid {expected:?}: {message}")]
    InvalidArgument {
        /// Parameter name
        name: String,
        /// Offending text
        value: String,
        /// Declared type
        expected: ParameterType,
        /// Parse failure
        message: String,
    },
}

/// Bind supplied arguments to declared parameters
///
/// Parameters are matched by name, falling back to identifier, and bound
/// under their name. Textual arguments for non-text parameters are parsed
/// into the declared type and defaults are applied for missing arguments.
/// Supplied arguments no parameter consumed are passed through unchanged.
pub fn bind_arguments(
    parameters: &[ParameterDefinition],
    supplied: &Arguments,
) -> Result<Arguments, BindError> {
    let mut bound = Arguments::new();
    let mut consumed = FxHashSet::default();
    for parameter in parameters {
        let name = parameter.header.name_or_id();
        let parameter_type = parameter.parameter_type;
        let argument = [name, parameter.header.id.as_str()]
            .into_iter()
            .find_map(|key| supplied.get(key).map(|value| (key, value)));
        if let Some((key, _)) = argument {
            consumed.insert(key);
        }
        match argument.map(|(_, value)| value) {
            Some(Value::String(text)) if parameter_type != ParameterType::String => {
                bound.insert(name, parse(name, parameter_type, text)?);
            }
            Some(value) => {
                bound.insert(name, value.clone());
            }
            None => match &parameter.default_value {
                Some(default) => {
                    bound.insert(name, parse(name, parameter_type, default)?);
                }
                None if parameter.required => {
                    return Err(BindError::MissingArgument {
                        name: name.to_string(),
                    });
                }
                None => {}
            },
        }
    }

    for (name, value) in supplied.iter() {
        if !consumed.contains(name) && !bound.contains(name) {
            bound.insert(name, value.clone());
        }
    }
    Ok(bound)
}

fn parse(name: &str, parameter_type: ParameterType, text: &str) -> Result<Value, BindError> {
    parameter_type
        .parse(text)
        .map_err(|message| BindError::InvalidArgument {
            name: name.to_string(),
            value: text.to_string(),
            expected: parameter_type,
            message,
        })
}
