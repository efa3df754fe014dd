use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event name → ordered list of performance records, in the order the coach supplied them.
/// Records are opaque and passed through unexamined.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AthleteDataset(Map<String, Value>);

impl AthleteDataset {
    /// Wraps an already-validated object. Only `validation::validate` should call this.
    pub(crate) fn new(events: Map<String, Value>) -> Self {
        Self(events)
    }

    pub fn events(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Indented rendering embedded in the prompt.
    pub fn to_pretty_json(&self) -> String {
        // A map of JSON values always serializes.
        serde_json::to_string_pretty(&self.0).unwrap_or_default()
    }
}

/// Free-text strategic description of the meet. Non-blank; otherwise kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetContext(String);

impl MeetContext {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One suggested athlete/event assignment. The model is asked for `Athlete Name`,
/// `Event(s)` and `Notes`, but entries are relayed exactly as it returned them.
pub type RosterEntry = Value;

/// Body of a successful `POST /generate_roster`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterResponse {
    pub roster: Vec<RosterEntry>,
    pub reasoning: String,
}
