use tenderlens_core::AnalysisFlow;

/// Placeholder in each template that gets replaced with the combined rules.
const RULES_PLACEHOLDER: &str = "<<<rules>>>";

const BOOK_TEMPLATE: &str = "\
You are a bilingual (Arabic/English) construction project assistant.
Analyze the project book text provided by the user and extract the following:
- Project Location (mention region, neighborhood or any address details)
- Project Title (inferred from heading or keywords)
- CD Availability (does it mention a CD or drawings?)

Explain how you found each item.

Follow these rules:
<<<rules>>>";

const COST_TEMPLATE: &str = "\
You are a construction cost-analysis assistant.
Analyze the project document text provided by the user and extract the following:
- Project Location (region, city, site or address details)
- Project Type (building, infrastructure, fit-out, maintenance, ...)
- Required Materials and Services
- Warnings (risks, missing information, conflicting requirements)

Follow these rules:
<<<rules>>>";

const NO_RULES: &str = "No additional rules.";

fn template(flow: AnalysisFlow) -> &'static str {
    match flow {
        AnalysisFlow::Book => BOOK_TEMPLATE,
        AnalysisFlow::Cost => COST_TEMPLATE,
    }
}

/// Build the system prompt for `flow`.
///
/// Static rules, saved constraints and session constraints are joined in that
/// order, trimmed, and placed inside the flow's fixed instructions.
pub fn build_prompt(flow: AnalysisFlow, static_rules: &str, persisted: &str, session: &str) -> String {
    let rules = [static_rules, persisted, session].join("\n");
    let rules = rules.trim();
    let rules = if rules.is_empty() { NO_RULES } else { rules };
    template(flow).replace(RULES_PLACEHOLDER, rules)
}
