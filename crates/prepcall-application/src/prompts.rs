//! Prompt construction for the generation pipeline.

use prepcall_core::call::TranscriptTurn;

/// Renders a transcript as one `[role]: content` line per turn.
pub fn render_transcript(turns: &[TranscriptTurn]) -> String {
    turns
        .iter()
        .map(|turn| format!("[{}]: {}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking the model to extract interview parameters as JSON.
pub fn extraction_prompt(turns: &[TranscriptTurn]) -> String {
    format!(
        "{transcript}\n\
        Extract the following fields from the conversation above and return a JSON object in this format:\n\
        {{\n  \
        \"type\": \"\",\n  \
        \"role\": \"\",\n  \
        \"level\": \"\",\n  \
        \"techstack\": \"\",\n  \
        \"amount\": \"\"\n\
        }}\n\
        Return only the JSON object.",
        transcript = render_transcript(turns)
    )
}

/// Prompt asking the model for the interview question list.
///
/// The questions are read out by speech synthesis downstream, so the
/// prompt forbids characters that can corrupt it.
pub fn question_prompt(
    role: &str,
    level: &str,
    techstack: &str,
    interview_type: &str,
    amount: &str,
) -> String {
    format!(
        "Prepare questions for a job interview.\n\
        The job role is {role}.\n\
        The job experience level is {level}.\n\
        The tech stack used in the job is: {techstack}.\n\
        The focus between behavioural and technical questions should lean towards: {interview_type}.\n\
        The amount of questions required is: {amount}.\n\
        Please return only the questions, without any additional text.\n\
        The questions are going to be read by a voice assistant so do not use \"/\" or \"*\" \
        or any other special characters which might break the voice assistant.\n\
        Return the questions formatted like this:\n\
        [\"Question 1\", \"Question 2\", \"Question 3\"]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use prepcall_core::call::MessageRole;

    #[test]
    fn transcript_renders_one_bracketed_line_per_turn() {
        let turns = vec![
            TranscriptTurn::new(MessageRole::Assistant, "What role?"),
            TranscriptTurn::new(MessageRole::User, "Backend Engineer"),
        ];

        assert_eq!(
            render_transcript(&turns),
            "[assistant]: What role?\n[user]: Backend Engineer"
        );
    }

    #[test]
    fn extraction_prompt_lists_all_five_fields() {
        let turns = vec![TranscriptTurn::new(MessageRole::User, "hi")];
        let prompt = extraction_prompt(&turns);

        for field in ["\"type\"", "\"role\"", "\"level\"", "\"techstack\"", "\"amount\""] {
            assert!(prompt.contains(field), "prompt is missing {field}");
        }
        assert!(prompt.starts_with("[user]: hi\n"));
    }

    #[test]
    fn question_prompt_carries_the_speech_safety_constraint() {
        let prompt = question_prompt("SRE", "Senior", "rust,go", "technical", "5");

        assert!(prompt.contains("do not use \"/\" or \"*\""));
        assert!(prompt.contains("The job role is SRE."));
        assert!(prompt.contains("The amount of questions required is: 5."));
    }
}
