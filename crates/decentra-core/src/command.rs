//! Slash-command definition types.
//!
//! These are the externally-advertised shapes pushed to the server via
//! `POST /api/bot/commands` once per successful connection. The handler side
//! (registry, invocation context) lives in `decentra-client`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A typed parameter of a slash command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlashCommandParam {
    pub name: String,
    pub description: String,
    /// Parameter type: `string`, `integer`, `boolean`, `user` or `channel`.
    #[serde(rename = "type")]
    pub param_type: String,
    pub required: bool,
    /// Fixed choice set, omitted from the wire when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Value>,
}

impl SlashCommandParam {
    /// Creates a string parameter with no choices.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type: "string".to_string(),
            required: false,
            choices: Vec::new(),
        }
    }

    /// Sets the parameter type.
    pub fn param_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }

    /// Marks the parameter as required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the fixed choice set.
    pub fn choices(mut self, choices: Vec<Value>) -> Self {
        self.choices = choices;
        self
    }
}

/// An externally-advertised slash command: name, description and ordered
/// typed parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<SlashCommandParam>,
}

impl CommandDefinition {
    /// Creates a definition with no parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Appends a parameter.
    pub fn param(mut self, param: SlashCommandParam) -> Self {
        self.parameters.push(param);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn definition_serializes_to_wire_shape() {
        let def = CommandDefinition::new("hello", "Say hello to someone!")
            .param(SlashCommandParam::new("name", "Who to greet"));

        let wire = serde_json::to_value(&def).unwrap();
        assert_eq!(
            wire,
            json!({
                "name": "hello",
                "description": "Say hello to someone!",
                "parameters": [{
                    "name": "name",
                    "description": "Who to greet",
                    "type": "string",
                    "required": false,
                }],
            })
        );
    }

    #[test]
    fn choices_are_included_when_present() {
        let param = SlashCommandParam::new("color", "Pick one")
            .required(true)
            .choices(vec![json!({"name": "Red", "value": "red"})]);

        let wire = serde_json::to_value(&param).unwrap();
        assert_eq!(wire["required"], json!(true));
        assert_eq!(wire["choices"][0]["value"], json!("red"));
    }
}
