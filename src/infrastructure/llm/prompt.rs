//! Onboarding prompt construction

use serde_json::{Value, json};

use crate::domain::ProjectRecord;

/// Cap on the readme excerpt embedded into the prompt.
const README_EXCERPT_CHARS: usize = 8_000;

/// Render the onboarding prompt around a JSON-serialized project context.
pub fn onboarding_prompt(project_info: &Value) -> String {
    format!(
        "\nAs an AI assistant, generate a project onboarding overview\n\
         for a new engineer joining the team.\n\n\
         Include:\n\n\
         * What the project is\n\
         * Key technologies\n\
         * Overall scope\n\
         * Where to start\n\
         * Important files\n\n\
         Project info:\n{}\n",
        serde_json::to_string_pretty(project_info).unwrap_or_else(|_| project_info.to_string())
    )
}

/// Build the context document for a full project record.
pub fn project_context(record: &ProjectRecord) -> Value {
    let commit_messages: Vec<&str> = record
        .commits
        .iter()
        .map(|c| c.message.as_str())
        .collect();

    let readme_excerpt = record
        .readme
        .as_deref()
        .map(|readme| truncate_chars(readme, README_EXCERPT_CHARS));

    json!({
        "name": record.name,
        "fullName": record.full_name,
        "description": record.description,
        "url": record.url,
        "language": record.language,
        "languages": record.languages,
        "dependencies": record.dependencies,
        "totalCommits": record.total_commits,
        "recentCommits": commit_messages,
        "readme": readme_excerpt,
    })
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_context() {
        let prompt = onboarding_prompt(&json!({"name": "traceback"}));
        assert!(prompt.contains("onboarding overview"));
        assert!(prompt.contains("Important files"));
        assert!(prompt.contains("\"name\": \"traceback\""));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
