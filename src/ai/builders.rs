//! Prompt builder functions
//!
//! Deterministic pure functions mapping a stack and optional context to the
//! final prompt string. No I/O; fixture in, string out.

use crate::models::ToolRef;

use super::personas::Persona;
use super::prompts::{BUDGET_PROMPT, MISSING_TOOLS_PROMPT, REPLACEMENT_PROMPT, ROAST_PROMPT};

/// User context for the budget-alternatives feature
#[derive(Debug, Clone)]
pub struct BudgetContext {
    pub expected_users: u32,
    pub budget: String,
    pub use_case: String,
}

impl Default for BudgetContext {
    fn default() -> Self {
        Self {
            expected_users: 1000,
            budget: "medium".to_string(),
            use_case: "startup".to_string(),
        }
    }
}

/// Enumerate tools as `"Name (Category)"` joined by commas
fn format_tools(tools: &[ToolRef]) -> String {
    tools
        .iter()
        .map(ToolRef::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the roast prompt for a persona
pub fn roast_prompt(stack_name: &str, tools: &[ToolRef], persona: &Persona) -> String {
    ROAST_PROMPT
        .replace("{{PERSONA_NAME}}", persona.name)
        .replace("{{PERSONA_STYLE}}", persona.style)
        .replace("{{STACK_NAME}}", stack_name)
        .replace("{{TOOLS}}", &format_tools(tools))
}

/// Build the replacement-suggestions prompt
pub fn replacement_prompt(stack_name: &str, tools: &[ToolRef]) -> String {
    REPLACEMENT_PROMPT
        .replace("{{STACK_NAME}}", stack_name)
        .replace("{{TOOLS}}", &format_tools(tools))
}

/// Build the missing-tools prompt
pub fn missing_tools_prompt(stack_name: &str, tools: &[ToolRef]) -> String {
    MISSING_TOOLS_PROMPT
        .replace("{{STACK_NAME}}", stack_name)
        .replace("{{TOOLS}}", &format_tools(tools))
}

/// Build the budget-alternatives prompt
///
/// Default context is injected when the caller supplies none; the template
/// carries the explicit "when may you say no alternatives exist" rule
/// because the model otherwise skips paid stacks too eagerly.
pub fn budget_prompt(
    stack_name: &str,
    tools: &[ToolRef],
    monthly_cost: Option<f64>,
    context: Option<&BudgetContext>,
) -> String {
    let default_context = BudgetContext::default();
    let context = context.unwrap_or(&default_context);

    let cost = monthly_cost
        .map(|c| format!("${c:.2}/month"))
        .unwrap_or_else(|| "unknown".to_string());

    BUDGET_PROMPT
        .replace("{{STACK_NAME}}", stack_name)
        .replace("{{TOOLS}}", &format_tools(tools))
        .replace("{{MONTHLY_COST}}", &cost)
        .replace("{{EXPECTED_USERS}}", &context.expected_users.to_string())
        .replace("{{BUDGET}}", &context.budget)
        .replace("{{USE_CASE}}", &context.use_case)
}
