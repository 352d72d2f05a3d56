//! Extraction prompt construction

/// Builds the extraction prompt around a candidate text.
///
/// The instruction block is fixed: the model is confined to the provided
/// text, forbidden from inventing URLs, and required to emit strict JSON
/// with a populated `asset_type` per record.
pub struct PromptBuilder {
    candidate_text: String,
}

impl PromptBuilder {
    /// Create a builder for the given candidate text
    pub fn new(candidate_text: impl Into<String>) -> Self {
        Self {
            candidate_text: candidate_text.into(),
        }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(EXTRACTION_INSTRUCTIONS.len() + self.candidate_text.len() + 16);
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\nTEXT:\n");
        prompt.push_str(&self.candidate_text);
        prompt.push('\n');
        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are a strict Industrial Energy Auditor.
Your task: Extract physical assets from the provided TEXT only.

RULES:

1. DO NOT use outside knowledge.
2. DO NOT provide URLs, links, or image paths.
3. If no assets are found, return an empty list [].
4. If no asset_type is found, do not include the entry.
5. Return ONLY valid JSON.

Fields:
- asset_type
- capacity_value
- capacity_unit
- count_of_units"#;
