use serde::{Deserialize, Serialize};

use crate::chart::ChartSpec;
use crate::data::export::OrderedRows;
use crate::data::filter::FilterSet;

// ---------------------------------------------------------------------------
// Persistence service bodies
//
//   POST /save-configuration         UserConfiguration   -> MessageResponse
//   GET  /load-configuration/{user}  -                   -> Configuration | 404
//   POST /submit                     SubmitRequest       -> MessageResponse
// ---------------------------------------------------------------------------

/// The persisted filter + chart configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub filters: FilterSet,
    #[serde(default)]
    pub charts: Vec<ChartSpec>,
}

/// Body of a save request: one user's whole configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfiguration {
    pub user_id: String,
    #[serde(flatten)]
    pub configuration: Configuration,
}

impl UserConfiguration {
    pub fn new(user_id: &str, filters: FilterSet, charts: Vec<ChartSpec>) -> Self {
        UserConfiguration {
            user_id: user_id.to_string(),
            configuration: Configuration { filters, charts },
        }
    }
}

/// Body of a submit request: the currently filtered rows.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest<'a> {
    pub filtered_data: OrderedRows<'a>,
}

/// Acknowledgement returned by save and submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
