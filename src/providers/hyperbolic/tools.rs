//! Tool preparation for chat requests.

use serde::Serialize;

use crate::types::{CallWarning, FunctionTool, Tool, ToolChoice};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HyperbolicTool {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    pub function: HyperbolicFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HyperbolicFunction {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: serde_json::Value,
}

impl From<&FunctionTool> for HyperbolicTool {
    fn from(tool: &FunctionTool) -> Self {
        Self {
            tool_type: "function",
            function: HyperbolicFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            },
        }
    }
}

/// `"auto"`, `"none"`, `"any"`, or a forced function.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HyperbolicToolChoice {
    Mode(&'static str),
    Function {
        #[serde(rename = "type")]
        choice_type: &'static str,
        function: NamedFunction,
    },
}

impl HyperbolicToolChoice {
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function {
            choice_type: "function",
            function: NamedFunction { name: name.into() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedFunction {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedTools {
    pub tools: Option<Vec<HyperbolicTool>>,
    pub tool_choice: Option<HyperbolicToolChoice>,
    pub warnings: Vec<CallWarning>,
}

/// Map canonical tools and tool choice onto the request fields.
///
/// Never fails: provider-defined tools are dropped with a warning.
pub fn prepare_tools(tools: &[Tool], tool_choice: Option<&ToolChoice>) -> PreparedTools {
    if tools.is_empty() {
        return PreparedTools::default();
    }

    let mut warnings = Vec::new();
    let mut wire_tools = Vec::with_capacity(tools.len());
    for tool in tools {
        match tool {
            Tool::Function(function) => wire_tools.push(HyperbolicTool::from(function)),
            Tool::ProviderDefined(_) => {
                tracing::warn!(tool = tool.name(), "dropping provider-defined tool");
                warnings.push(CallWarning::UnsupportedTool {
                    tool: tool.clone(),
                    details: None,
                });
            }
        }
    }

    let tool_choice = match tool_choice {
        None => None,
        Some(ToolChoice::Auto) => Some(HyperbolicToolChoice::Mode("auto")),
        Some(ToolChoice::None) => Some(HyperbolicToolChoice::Mode("none")),
        Some(ToolChoice::Required) => Some(HyperbolicToolChoice::Mode("any")),
        Some(ToolChoice::Tool { tool_name }) => {
            wire_tools.retain(|tool| &tool.function.name == tool_name);
            Some(HyperbolicToolChoice::function(tool_name.clone()))
        }
    };

    PreparedTools {
        tools: Some(wire_tools),
        tool_choice,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderDefinedTool;
    use serde_json::json;

    fn weather() -> Tool {
        Tool::function("weather", "Get weather", json!({"type": "object"}))
    }

    fn search() -> Tool {
        Tool::Function(FunctionTool::new("search", json!({"type": "object"})))
    }

    #[test]
    fn empty_tools_yield_nothing() {
        let prepared = prepare_tools(&[], Some(&ToolChoice::Auto));
        assert_eq!(prepared, PreparedTools::default());
    }

    #[test]
    fn provider_defined_tools_become_warnings() {
        let provider_tool = Tool::ProviderDefined(ProviderDefinedTool {
            id: "openai.web_search".into(),
            name: "web_search".into(),
            args: json!({}),
        });
        let prepared = prepare_tools(&[weather(), provider_tool.clone()], None);
        assert_eq!(prepared.tools.as_ref().map(Vec::len), Some(1));
        assert_eq!(prepared.tool_choice, None);
        assert_eq!(
            prepared.warnings,
            vec![CallWarning::UnsupportedTool {
                tool: provider_tool,
                details: None
            }]
        );
    }

    #[test]
    fn tool_choice_mapping() {
        let tools = [weather(), search()];
        let required = prepare_tools(&tools, Some(&ToolChoice::Required));
        assert_eq!(
            serde_json::to_value(required.tool_choice).unwrap(),
            json!("any")
        );
        let none = prepare_tools(&tools, Some(&ToolChoice::None));
        assert_eq!(serde_json::to_value(none.tool_choice).unwrap(), json!("none"));
    }

    #[test]
    fn named_tool_choice_filters_and_forces() {
        let prepared = prepare_tools(
            &[weather(), search()],
            Some(&ToolChoice::Tool {
                tool_name: "search".into(),
            }),
        );
        assert_eq!(
            serde_json::to_value(&prepared.tools).unwrap(),
            json!([{"type": "function", "function": {"name": "search", "parameters": {"type": "object"}}}])
        );
        assert_eq!(
            serde_json::to_value(&prepared.tool_choice).unwrap(),
            json!({"type": "function", "function": {"name": "search"}})
        );
    }
}
