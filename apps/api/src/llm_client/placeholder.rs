//! Offline provider returning a fixed roster. Used for demos and UI work without an API key.

use async_trait::async_trait;
use serde_json::json;

use super::{GenerationRequest, LlmError, LlmProvider};

const PLACEHOLDER_REASONING: &str = "**Reasoning for Roster Decisions (placeholder):**

1. **ATH-001 in 100m Dash:** Fastest sprinter on the team by season best, projected to win for 10 points.
2. **ATH-002 in Javelin Throw:** Consistent marks put a second-place finish well within reach.
3. **ATH-001 in 4x100m Relay:** Anchoring with the top sprinter maximises the chance of a top-three relay finish.
4. **ATH-003 in 1500m Run:** Not the top seed, but strong endurance should secure a 4th place finish.";

pub struct PlaceholderProvider;

#[async_trait]
impl LlmProvider for PlaceholderProvider {
    fn name(&self) -> &str {
        "placeholder"
    }

    fn model(&self) -> &str {
        "none"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<String, LlmError> {
        let reply = json!({
            "reasoning": PLACEHOLDER_REASONING,
            "roster": [
                {"Athlete Name": "ATH-001", "Event(s)": "100m Dash", "Notes": "Top seed, expected 10 points."},
                {"Athlete Name": "ATH-002", "Event(s)": "Javelin Throw", "Notes": "Projected 2nd, 8 points."},
                {"Athlete Name": "ATH-001", "Event(s)": "4x100m Relay", "Notes": "Anchor leg."},
                {"Athlete Name": "ATH-003", "Event(s)": "1500m Run", "Notes": "Projected 4th, 5 points."}
            ]
        });
        Ok(reply.to_string())
    }
}
