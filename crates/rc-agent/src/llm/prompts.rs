//! Prompt text for the three Gemini exchanges.

use super::NO_ENDPOINT_SENTINEL;

const SELECTION_INSTRUCTIONS: &str = r#"You are an expert on Apache Ozone Recon, the service that provides insight into Ozone cluster data.

Classify the user's query and respond accordingly:

1. DATA queries ask for current cluster information. Choose the single most appropriate API endpoint.
2. DOCUMENTATION queries ask what an API is for, when to use it, or what it can do. Answer them directly from the documentation.

You have the full Recon API specification and, when available, a guide describing the purpose of each API.

For DATA queries respond with this JSON:
{
    "endpoint": "/api/v1/endpoint/path",
    "method": "GET",
    "parameters": {
        "param_name": "param_value"
    },
    "reasoning": "Why this endpoint answers the query"
}

For DOCUMENTATION queries respond with this JSON:
{
    "type": "DOCUMENTATION_QUERY",
    "answer": "Direct answer based on the API guide",
    "reasoning": "Which part of the documentation was used"
}
"#;

const GUIDE_REMINDER: &str = "Remember: answer documentation questions directly from the API Guide, and use the API Specification to select endpoints for data queries.";

const SUMMARY_INSTRUCTIONS: &str = r#"You are an expert on Apache Ozone Recon data analysis.

Analyze the API response data and write a clear, concise answer to the user's question.

Guidelines:
- Focus on the information that answers the specific question
- Prefer plain, non-technical language
- Include the relevant numbers, counts and statistics
- Call out problems such as unhealthy or missing containers
- Keep the answer short but informative
- If the response is empty or has nothing relevant, say so plainly

Reply with a direct answer to the user's question."#;

/// Prompt for the endpoint-selection exchange.
pub fn selection(query: &str, schema: &str, guide: &str) -> String {
    let mut prompt = String::with_capacity(
        SELECTION_INSTRUCTIONS.len() + schema.len() + guide.len() + query.len() + 512,
    );
    prompt.push_str(SELECTION_INSTRUCTIONS);
    prompt.push_str(&format!(
        "\nIf neither an API endpoint nor the documentation can answer the query, respond with \"{NO_ENDPOINT_SENTINEL}\".\n\nAPI Specification:\n"
    ));
    prompt.push_str(schema);

    if !guide.is_empty() {
        prompt.push_str("\n\nDetailed API Guide:\n");
        prompt.push_str(guide);
        prompt.push_str("\n\n");
        prompt.push_str(GUIDE_REMINDER);
    }

    prompt.push_str("\n\nUser Query: ");
    prompt.push_str(query);
    prompt
}

/// Prompt for the summarization exchange.
pub fn summary(query: &str, response: &serde_json::Value, endpoint: &str) -> String {
    let data = serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string());
    format!(
        "{SUMMARY_INSTRUCTIONS}\n\nUser asked: \"{query}\"\n\nAPI endpoint called: {endpoint}\n\nAPI response data:\n{data}\n\nPlease provide a clear summary that answers the user's question."
    )
}

/// Prompt for the out-of-scope fallback exchange.
pub fn fallback(query: &str) -> String {
    format!(
        r#"The user asked: "{query}"

This question cannot be answered using the available Ozone Recon API endpoints.

Write a helpful reply that:
1. Politely explains that you can only answer questions about Ozone Recon cluster data
2. Briefly lists the kinds of information you can provide (containers, keys, datanodes, pipelines, etc.)
3. Suggests how to rephrase the question if it is related to Ozone

Keep it friendly and concise."#
    )
}
