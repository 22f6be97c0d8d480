use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One relationship of the focal artist as returned by the "artist-network" query.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    #[serde(rename = "connected_entity_name", alias = "name")]
    pub name: String,
    #[serde(default, rename = "relationship_summary")]
    pub summary: Option<String>,
    #[serde(default, rename = "relationship_duration")]
    pub duration: Option<String>,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(
        default,
        rename = "connection_score",
        alias = "score",
        deserialize_with = "deserialize_score"
    )]
    pub score: Option<f32>,
}

impl ConnectionRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

/// Connection data for one focal artist, as handed over by the search layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetworkPayload {
    pub artist: Option<String>,
    pub connections: Vec<ConnectionRecord>,
}

// Model output is not always well typed: "7", 7 and 7.0 all mean the same score.
fn deserialize_score<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Number(number) => number.as_f64().map(|score| score as f32),
        Value::String(text) => text.trim().parse::<f32>().ok(),
        _ => None,
    }))
}
