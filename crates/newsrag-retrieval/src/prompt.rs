//! Prompt assembly for the two answer branches
//!
//! The grounded prompt carries the retrieved snippets; the general prompt
//! carries the bare question and nothing else. No retrieved text may leak
//! into the general branch.

use newsrag_core::models::SimilarityResult;

/// Separator between context snippets
const SNIPPET_SEPARATOR: &str = "\n\n---\n\n";

/// Build the grounded prompt
///
/// Each snippet is truncated to `snippet_limit` characters to bound prompt
/// size and labeled with its source URL. The model is instructed to answer
/// only from the context and to state insufficiency rather than fabricate.
pub fn grounded(question: &str, supporting: &[SimilarityResult], snippet_limit: usize) -> String {
    let context = supporting
        .iter()
        .map(|result| {
            format!("SOURCE: {}\n{}", result.source.url, truncate_chars(&result.text, snippet_limit))
        })
        .collect::<Vec<_>>()
        .join(SNIPPET_SEPARATOR);

    format!(
        "You are an assistant that answers questions about news. Use ONLY the \
         information provided in CONTEXT to answer precisely. If the answer \
         cannot be determined from the context, say there is not enough \
         information and offer to summarize what is there.\n\n\
         CONTEXT:\n{context}\n\nQUESTION: {question}\n\nANSWER:"
    )
}

/// Build the general-knowledge prompt, with no retrieved context
pub fn general(question: &str) -> String {
    format!(
        "You are an assistant that answers questions about news and general \
         topics. Answer the following question clearly and concisely:\n\n\
         QUESTION: {question}"
    )
}

/// Truncate to a maximum number of characters, on a character boundary
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsrag_core::models::{ChunkSource, RecordId};

    fn result(text: &str, url: &str) -> SimilarityResult {
        SimilarityResult {
            id: RecordId(0),
            score: 0.9,
            text: text.to_string(),
            source: ChunkSource { url: url.to_string(), offset: 0 },
        }
    }

    #[test]
    fn test_grounded_prompt_labels_each_snippet_with_its_source() {
        let supporting = vec![
            result("Markets rallied on Tuesday.", "https://news.example.com/markets"),
            result("Rates held steady.", "https://news.example.com/rates"),
        ];

        let prompt = grounded("What happened to markets?", &supporting, 2000);

        assert!(prompt.contains("SOURCE: https://news.example.com/markets"));
        assert!(prompt.contains("Markets rallied on Tuesday."));
        assert!(prompt.contains("SOURCE: https://news.example.com/rates"));
        assert!(prompt.contains("QUESTION: What happened to markets?"));
    }

    #[test]
    fn test_grounded_prompt_truncates_long_snippets() {
        let long_text = "x".repeat(5000);
        let supporting = vec![result(&long_text, "https://news.example.com/long")];

        let prompt = grounded("q", &supporting, 2000);

        assert!(prompt.contains(&"x".repeat(2000)));
        assert!(!prompt.contains(&"x".repeat(2001)));
    }

    #[test]
    fn test_general_prompt_contains_only_the_question() {
        let prompt = general("Explain inflation.");

        assert!(prompt.contains("QUESTION: Explain inflation."));
        assert!(!prompt.contains("CONTEXT"));
        assert!(!prompt.contains("SOURCE:"));
    }

    #[test]
    fn test_truncate_chars_respects_multibyte_boundaries() {
        let text = "ñññññ";
        assert_eq!(truncate_chars(text, 3), "ñññ");
        assert_eq!(truncate_chars(text, 10), text);
    }
}
