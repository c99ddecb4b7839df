//! Instruction prompt sent along with the scoreboard photo.
//!
//! The extractor tolerates fences and prose around the reply, but the reply
//! shape requested here is the contract it validates against. Changing the
//! requested fields means changing the extractor too.

/// Prompt asking for the `{"score": N, "tableName": T}` reply shape.
pub const SCOREBOARD_PROMPT: &str = "\
This is a photo of a pinball machine's scoreboard display.

Read the score shown on the display and, if you can identify it from the \
display, backglass or playfield, the name of the pinball table.

If several player scores are shown, report the highest one. Report the score \
as a plain integer without separators.

Respond with ONLY a JSON object of exactly this shape and nothing else:
{\"score\": <number>, \"tableName\": \"<string or null>\"}

Use null for tableName when the table cannot be identified.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_requests_reply_shape() {
        assert!(SCOREBOARD_PROMPT.contains(r#"{"score": <number>, "tableName": "<string or null>"}"#));
    }
}
