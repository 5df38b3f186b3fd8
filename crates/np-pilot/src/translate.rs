//! Natural language to NX-OS command translation.

use np_protocol::{CommandPlan, PlannedCommand};
use np_provider::{Prompt, ProviderError, ReasoningProvider};

use crate::context::RollingContext;

/// System prompt for the translation call. The model must answer with bare
/// command lines; anything conversational breaks the parser downstream.
const TRANSLATE_SYSTEM_PROMPT: &str = "\
You are an expert Cisco NX-OS network engineer operating a Nexus switch.
Translate the operator's request into the exact NX-OS CLI commands that
fulfil it.

Rules:
- Respond ONLY with the commands, one per line, in execution order.
- No explanations, no numbering, no markdown fences, no prose.
- Use NX-OS syntax, never IOS syntax (e.g. 'show bgp l2vpn evpn summary',
  not 'show ip bgp summary'; 'show system resources', not 'show processes
  cpu').
- For configuration requests, include 'configure terminal' first and
  'copy running-config startup-config' only when asked to save.
- If the request is ambiguous or cannot be satisfied with CLI commands,
  respond with a single line starting with 'CLARIFY:' followed by one
  short question.";

/// Result of a translation call.
#[derive(Debug)]
pub enum Translation {
    /// Parsed, corrected and classified plan.
    Plan(CommandPlan),
    /// The model needs more information; the question to relay.
    Clarification(String),
}

/// Ask `provider` to translate `request`, folding in session history.
pub async fn translate(
    provider: &dyn ReasoningProvider,
    request: &str,
    context: &RollingContext,
) -> Result<Translation, ProviderError> {
    let history = context.render_for_prompt();
    let user = if history.is_empty() {
        format!("Request: {request}")
    } else {
        format!("{history}\nRequest: {request}")
    };

    let response = provider
        .generate(&Prompt::with_system(TRANSLATE_SYSTEM_PROMPT, user))
        .await?;

    tracing::debug!(chars = response.len(), "translation response received");
    Ok(parse_response(&response))
}

/// Parse a model response into a classified plan.
///
/// Commands run as the model wrote them; known-syntax correction is
/// applied reactively, only after the device rejects a command.
fn parse_response(response: &str) -> Translation {
    let trimmed = response.trim();
    if let Some(question) = trimmed.strip_prefix("CLARIFY:") {
        return Translation::Clarification(question.trim().to_string());
    }

    let mut commands = Vec::new();
    for line in trimmed.lines() {
        let line = line.trim().trim_start_matches("- ").trim();
        if line.is_empty() || line.starts_with("```") || line.starts_with('#') {
            continue;
        }
        commands.push(PlannedCommand {
            text: line.to_string(),
            category: np_knowledge::classify(line),
        });
    }
    Translation::Plan(CommandPlan::new(commands))
}

#[cfg(test)]
mod tests {
    use super::*;
    use np_protocol::CommandCategory;
    use np_provider::MockProvider;

    fn plan_of(translation: Translation) -> CommandPlan {
        match translation {
            Translation::Plan(plan) => plan,
            Translation::Clarification(q) => panic!("unexpected clarification: {q}"),
        }
    }

    #[test]
    fn parses_command_lines_and_classifies() {
        let plan = plan_of(parse_response(
            "show interface status\nconfigure terminal\ninterface ethernet1/1\nshutdown",
        ));
        assert_eq!(plan.len(), 4);
        assert_eq!(plan.commands[0].category, CommandCategory::ReadOnly);
        assert_eq!(plan.commands[1].category, CommandCategory::ConfigChanging);
        assert!(plan.has_config_changes());
    }

    #[test]
    fn strips_fences_blanks_and_bullets() {
        let plan = plan_of(parse_response("```\n- show version\n\nshow clock\n```"));
        assert_eq!(plan.command_texts(), vec!["show version", "show clock"]);
    }

    #[test]
    fn clarify_prefix_becomes_clarification() {
        match parse_response("CLARIFY: which VLAN do you mean?") {
            Translation::Clarification(q) => assert_eq!(q, "which VLAN do you mean?"),
            Translation::Plan(_) => panic!("expected clarification"),
        }
    }

    #[test]
    fn empty_response_yields_empty_plan() {
        assert!(plan_of(parse_response("   \n\n")).is_empty());
    }

    #[tokio::test]
    async fn translate_includes_history_in_prompt() {
        let provider = MockProvider::new("mock", 0, true).with_reply("show clock");
        let mut context = RollingContext::new(3);
        context.push_turn(
            "check vlans",
            &CommandPlan::new(vec![PlannedCommand {
                text: "show vlan brief".into(),
                category: CommandCategory::ReadOnly,
            }]),
            &[],
        );

        let translation = translate(&provider, "what time is it", &context)
            .await
            .unwrap();
        assert_eq!(plan_of(translation).command_texts(), vec!["show clock"]);

        let prompts = provider.recorded_prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].user.contains("check vlans"));
        assert!(prompts[0].user.contains("Request: what time is it"));
    }
}
