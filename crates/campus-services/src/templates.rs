//! Prompt templates for the generation service.
//!
//! Each dispatch branch fills one of these templates with the raw query and
//! its context block. Placeholders use `{name}` syntax and are substituted
//! from the variable map; a placeholder without a matching variable is left
//! in place, which shows up clearly in generated output during development.

use std::collections::HashMap;

/// Named prompt template understood by the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateName {
    /// Data-backed answer over the caller's formatted records
    Conversational,
    /// Institution questions grounded in retrieved documents
    CollegeInfo,
    /// Open-domain answer grounded in web search output
    GeneralSearch,
}

impl TemplateName {
    /// Stable name for logging and the wire protocol.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateName::Conversational => "conversational",
            TemplateName::CollegeInfo => "college_info",
            TemplateName::GeneralSearch => "general_search",
        }
    }

    /// Template body with `{placeholder}` markers.
    pub fn body(&self) -> &'static str {
        match self {
            TemplateName::Conversational => CONVERSATIONAL_TEMPLATE,
            TemplateName::CollegeInfo => COLLEGE_INFO_TEMPLATE,
            TemplateName::GeneralSearch => GENERAL_SEARCH_TEMPLATE,
        }
    }
}

impl std::fmt::Display for TemplateName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const CONVERSATIONAL_TEMPLATE: &str = r#"You are a friendly and helpful college student assistant chatbot.
Your tone should be warm, professional, and encouraging - like a helpful friend.
Keep responses concise and natural.

User Query: {query}

Student Information:
{user_data}

Please provide a helpful response based on the student's information.
Be warm, supportive, and conversational."#;

const COLLEGE_INFO_TEMPLATE: &str = r#"You are a knowledgeable and friendly college information assistant.

Context Information:
{context}

Student's Question: {query}

Instructions:
- Provide accurate information based on the context
- Be warm, professional, and encouraging
- If information is not in the context, acknowledge this honestly
- Use bullet points for lists when appropriate
- Keep responses concise but comprehensive

Response:"#;

const GENERAL_SEARCH_TEMPLATE: &str = r#"You are a friendly and helpful assistant.
Help answer questions with a warm, conversational tone.

User Question: {query}

Search Results: {search_results}

Please provide a helpful and friendly response."#;

/// Fill a template's placeholders from the variable map.
pub fn render(template: TemplateName, variables: &HashMap<String, String>) -> String {
    let mut text = template.body().to_string();
    for (key, value) in variables {
        text = text.replace(&format!("{{{}}}", key), value);
    }
    text
}

/// Convenience constructor for the variable map.
pub fn variables<const N: usize>(pairs: [(&str, &str); N]) -> HashMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_conversational() {
        let vars = variables([
            ("query", "What is my attendance?"),
            ("user_data", "Your Attendance Records:\n- Ashoj: 27%"),
        ]);
        let prompt = render(TemplateName::Conversational, &vars);

        assert!(prompt.contains("What is my attendance?"));
        assert!(prompt.contains("Ashoj: 27%"));
        assert!(!prompt.contains("{query}"));
        assert!(!prompt.contains("{user_data}"));
    }

    #[test]
    fn test_render_college_info() {
        let vars = variables([("query", "Which programs are offered?"), ("context", "Document 1:\nPrograms: BSc CSIT")]);
        let prompt = render(TemplateName::CollegeInfo, &vars);

        assert!(prompt.contains("BSc CSIT"));
        assert!(prompt.contains("Which programs are offered?"));
    }

    #[test]
    fn test_missing_variable_left_in_place() {
        let vars = variables([("query", "hello")]);
        let prompt = render(TemplateName::GeneralSearch, &vars);

        assert!(prompt.contains("hello"));
        assert!(prompt.contains("{search_results}"));
    }

    #[test]
    fn test_template_names() {
        assert_eq!(TemplateName::Conversational.as_str(), "conversational");
        assert_eq!(TemplateName::CollegeInfo.as_str(), "college_info");
        assert_eq!(TemplateName::GeneralSearch.as_str(), "general_search");
    }
}
