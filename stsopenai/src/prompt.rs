//! Prompts and structured answers
//!
//! The model is always asked for a JSON object, and answers are read by
//! field name. Anything else is rejected with [`Error::InvalidShape`].

use crate::error::{Error, Result};
use crate::models::ChatMessage;
use serde::Deserialize;
use stswatcher::SuggestionRequest;

/// Number of suggestions expected from the model
pub const SUGGESTION_COUNT: usize = 3;

const SUGGESTIONS_SYSTEM: &str = "You are a music expert and DJ. You recommend songs that mix well \
with the one currently playing. Answer with a JSON object of the form \
{\"suggestions\": [\"Title - Artist\", \"Title - Artist\", \"Title - Artist\"]} \
and nothing else.";

pub fn suggestion_messages(request: &SuggestionRequest) -> Vec<ChatMessage> {
    let mut user = format!(
        "Suggest exactly {} songs similar to \"{}\" by {}",
        SUGGESTION_COUNT,
        request.track_name,
        request.artists.join(", ")
    );
    match (&request.key, &request.bpm) {
        (Some(key), Some(bpm)) => user.push_str(&format!(", in or near {} at about {} BPM.", key, bpm)),
        (Some(key), None) => user.push_str(&format!(", in or near {}.", key)),
        (None, Some(bpm)) => user.push_str(&format!(", at about {} BPM.", bpm)),
        (None, None) => user.push('.'),
    }

    vec![ChatMessage::system(SUGGESTIONS_SYSTEM), ChatMessage::user(user)]
}

#[derive(Debug, Deserialize)]
struct SuggestionsPayload {
    suggestions: Vec<String>,
}

/// Reads `{"suggestions": [..]}`, exactly three non-empty entries
pub fn parse_suggestions(content: &str) -> Result<Vec<String>> {
    let payload: SuggestionsPayload = serde_json::from_str(content.trim())
        .map_err(|e| Error::invalid_shape(format!("expected a suggestions object: {}", e)))?;

    let suggestions: Vec<String> = payload
        .suggestions
        .into_iter()
        .map(|s| s.trim().to_string())
        .collect();

    if suggestions.len() != SUGGESTION_COUNT {
        return Err(Error::invalid_shape(format!(
            "expected {} suggestions, got {}",
            SUGGESTION_COUNT,
            suggestions.len()
        )));
    }
    if suggestions.iter().any(String::is_empty) {
        return Err(Error::invalid_shape("empty suggestion"));
    }

    Ok(suggestions)
}
