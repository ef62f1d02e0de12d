use crate::domain::Language;

/// Builds the system/user prompt pairs for the two generative stages. The
/// templates are plain text; nothing downstream parses them back.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Prompt pair for summarizing one transcript (or one chunk of it).
    pub fn summary_prompt(
        &self,
        transcript: &str,
        topic: Option<&str>,
        language: &Language,
    ) -> (String, String) {
        let system = format!(
            "You are an expert meeting assistant. Summarize meeting transcripts \
             into clear, structured minutes: key discussion points, decisions \
             made, and action items with owners where stated. Preserve technical \
             terms and proper names exactly. Write the summary in {}.",
            language.display_name()
        );
        let mut user = String::new();
        if let Some(topic) = topic {
            user.push_str(&format!("Meeting topic: {topic}\n\n"));
        }
        user.push_str("Transcript:\n");
        user.push_str(transcript);
        (system, user)
    }

    /// Prompt pair for merging per-section summaries into one document.
    pub fn combine_prompt(
        &self,
        sections: &str,
        topic: Option<&str>,
        language: &Language,
    ) -> (String, String) {
        let system = format!(
            "You are an expert meeting assistant. You will receive summaries of \
             consecutive sections of one meeting. Merge them into a single \
             coherent summary, removing repetition between sections while \
             keeping every distinct point, decision, and action item. Preserve \
             technical terms and proper names exactly. Write the summary in {}.",
            language.display_name()
        );
        let mut user = String::new();
        if let Some(topic) = topic {
            user.push_str(&format!("Meeting topic: {topic}\n\n"));
        }
        user.push_str("Section summaries:\n\n");
        user.push_str(sections);
        (system, user)
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
