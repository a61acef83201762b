use crate::models::Category;

/// System prompt shared by all three category evaluations.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that categorizes transcript messages based on guidelines. Always respond with valid JSON.";

const SENTIMENT_TRANSCRIPT_PROMPT: &str = r#"Analyze the sentiment of each message in the conversation transcript.

Transcript to analyze:
{transcript}

For each message in the transcript, classify the sentiment as positive, negative, or neutral, and provide a brief explanation.

Format your response as JSON with the following structure:
{
  "messages": [
    {
      "speaker": "Speaker A",
      "text": "message text",
      "sentiment": {
        "label": "positive|negative|neutral",
        "explanation": "brief explanation"
      }
    }
  ]
}

Provide your analysis in valid JSON format only, no additional text before or after."#;

const DEAR_MAN_TRANSCRIPT_PROMPT: &str = r#"You are an expert behavioral therapist evaluating a conversation transcript. Evaluate how well each message adheres to the DEAR MAN skills.

DEAR MAN Skills:
D - Describe: Did the speaker use factual statements without "I feel"?
E - Express: Did the speaker express feelings using "I feel", "I felt", or emotional words?
A - Assert: Did the speaker assert needs using "I want", "I need", "I'd like"?
R - Reinforce: Did the speaker reinforce their request with "because", "this would", "it helps"?
M - Mindful: Did the speaker stay on topic without tangents?
A - Appear confident: Did the speaker avoid hedging words like "maybe", "just", "sorry"?
N - Negotiate: Did the speaker negotiate using "what if", "would you", "can we"?

Transcript to analyze:
{transcript}

For each message in the transcript, determine adherence for each skill (true/false) with a brief explanation, and calculate the total DEAR MAN score (0-7, one point per skill).

Format your response as JSON with the following structure:
{
  "messages": [
    {
      "speaker": "Speaker A",
      "text": "message text",
      "dear_man": {
        "score": 0-7,
        "breakdown": {
          "describe": {"adhered": true/false, "explanation": "..."},
          "express": {"adhered": true/false, "explanation": "..."},
          "assert": {"adhered": true/false, "explanation": "..."},
          "reinforce": {"adhered": true/false, "explanation": "..."},
          "mindful": {"adhered": true/false, "explanation": "..."},
          "appear_confident": {"adhered": true/false, "explanation": "..."},
          "negotiate": {"adhered": true/false, "explanation": "..."}
        }
      }
    }
  ]
}

Provide your analysis in valid JSON format only, no additional text before or after."#;

const FAST_TRANSCRIPT_PROMPT: &str = r#"You are an expert behavioral therapist evaluating a conversation transcript. Evaluate how well each message adheres to the FAST skills.

FAST Skills:
F - Fair: Was the speaker fair to themselves and others?
A - Apologies: Did the speaker avoid over-apologizing or apologizing for things that aren't their fault?
S - Stick to values: Did the speaker stick to their values and principles?
T - Truthful: Was the speaker truthful and authentic?

Transcript to analyze:
{transcript}

For each message in the transcript, determine adherence for each skill (true/false) with a brief explanation, and calculate the total FAST score (0-4, one point per skill).

Format your response as JSON with the following structure:
{
  "messages": [
    {
      "speaker": "Speaker A",
      "text": "message text",
      "fast": {
        "score": 0-4,
        "breakdown": {
          "fair": {"adhered": true/false, "explanation": "..."},
          "apologies": {"adhered": true/false, "explanation": "..."},
          "stick_to_values": {"adhered": true/false, "explanation": "..."},
          "truthful": {"adhered": true/false, "explanation": "..."}
        }
      }
    }
  ]
}

Provide your analysis in valid JSON format only, no additional text before or after."#;

fn template_for(category: Category) -> &'static str {
    match category {
        Category::Sentiment => SENTIMENT_TRANSCRIPT_PROMPT,
        Category::DearMan => DEAR_MAN_TRANSCRIPT_PROMPT,
        Category::Fast => FAST_TRANSCRIPT_PROMPT,
    }
}

/// Build the user prompt for one category over the full formatted transcript.
///
/// The evaluator is invoked once per category per transcript, not once per
/// message.
pub fn build_category_prompt(category: Category, transcript: &str) -> String {
    template_for(category).replace("{transcript}", transcript)
}
