//! Prompt construction for the generation backend

/// Build the generation prompt from the query and its retrieved context.
///
/// Passages are joined with newlines; `empty_placeholder` stands in when
/// retrieval found nothing.
pub fn build_prompt(query: &str, context: &[String], empty_placeholder: &str) -> String {
    let context_block = if context.is_empty() {
        empty_placeholder.to_string()
    } else {
        context.join("\n")
    };

    format!(
        "Instructions: Answer the question using the context below.\n\
         If the context is insufficient or does not contain the answer, answer directly from general knowledge.\n\
         \n\
         IMPORTANT: Do not add disclaimers such as \"The provided context does not contain...\" or \"According to the context...\".\n\
         Begin the response with the answer itself.\n\
         \n\
         Context:\n\
         {}\n\
         \n\
         User Question: {}\n",
        context_block, query
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_context_and_query() {
        let context = vec!["first passage".to_string(), "second passage".to_string()];
        let prompt = build_prompt("What is LRU?", &context, "nothing found");

        assert!(prompt.contains("Context:\nfirst passage\nsecond passage\n"));
        assert!(prompt.ends_with("User Question: What is LRU?\n"));
        assert!(!prompt.contains("nothing found"));
    }

    #[test]
    fn test_prompt_uses_placeholder_for_empty_context() {
        let prompt = build_prompt("anything", &[], "No specific documents found in vault.");
        assert!(prompt.contains("Context:\nNo specific documents found in vault.\n"));
    }
}
