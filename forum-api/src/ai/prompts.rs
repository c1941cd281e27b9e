//! Prompt builders for the text generator.

/// Prompt for the initial answer posted by the AI assistant.
pub fn initial_answer(title: &str, body: &str) -> String {
    format!(
        "You are an experienced teaching assistant answering a student's question on a \
         community forum. Give a clear, encouraging first answer. Answer directly when the \
         question is simple, otherwise outline how to approach it, point to concepts or \
         resources worth looking up, and ask clarifying questions that would help others \
         answer. Use Markdown.\n\n\
         Question Title: {title}\n\n\
         Question Body:\n{body}\n"
    )
}

/// Prompt for the one-paragraph summary shown in the question feed.
pub fn summary(body: &str) -> String {
    format!("Summarize the following question concisely and in plain language:\n\nQuestion: {body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_question() {
        let prompt = initial_answer("Lifetimes?", "Why does 'a outlive 'b?");
        assert!(prompt.contains("Question Title: Lifetimes?"));
        assert!(prompt.ends_with("Why does 'a outlive 'b?\n"));
        assert!(summary("body text").ends_with("Question: body text"));
    }
}
