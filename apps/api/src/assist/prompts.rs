use crate::models::FieldId;

pub const REWRITE_SYSTEM: &str = "You are an editor for résumés. \
    You MUST respond with a single JSON object of the form {\"suggestion\": \"...\"}. \
    Do NOT include any text outside the JSON object. \
    Do NOT invent employers, dates, numbers or credentials that are not in the input.";

/// Per-field guidance appended to the rewrite prompt.
fn field_guidance(field: FieldId) -> &'static str {
    match field {
        FieldId::Summary => "Two or three sentences, first person implied, no buzzwords.",
        FieldId::Experience => {
            "Keep one paragraph per role, separated by blank lines. Lead with outcomes."
        }
        FieldId::Skills => "A comma-separated list, most relevant first, no duplicates.",
        FieldId::Headline => "At most eight words.",
        _ => "Fix spelling, grammar and tone only.",
    }
}

pub fn build_rewrite_prompt(field: FieldId, text: &str) -> String {
    format!(
        "Rewrite the \"{label}\" section of a résumé.\n{guidance}\n\n<text>\n{text}\n</text>",
        label = field.label(),
        guidance = field_guidance(field),
    )
}
