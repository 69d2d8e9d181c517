//! Prompt templates for answer generation.

/// Collection of prompts used by the workbench.
pub struct Prompts;

impl Prompts {
    /// Prompt for answering a question from retrieved context only.
    ///
    /// Placeholders: `{context}`, `{question}`.
    pub fn rag_answer() -> &'static str {
        r#"Answer the question based only on the following context:

{context}

---

Answer the question based on the above context: {question}"#
    }

    /// Fill the RAG answer template.
    pub fn fill_rag_answer(context: &str, question: &str) -> String {
        Self::rag_answer()
            .replace("{context}", context)
            .replace("{question}", question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rag_answer() {
        let prompt = Prompts::fill_rag_answer("Some context.", "What is X?");
        assert!(prompt.contains("Some context."));
        assert!(prompt.contains("What is X?"));
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{question}"));
    }
}
