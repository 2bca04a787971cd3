//! Request types for the meal voucher engine API.

use serde::{Deserialize, Serialize};

use crate::models::SourceBundle;

/// Request body for the `/runs` endpoint.
///
/// # Example
///
/// ```
/// use meal_voucher_engine::api::RunRequest;
/// use meal_voucher_engine::models::SourceKind;
///
/// let json = r#"{
///     "competence": "2025-05",
///     "sources": {
///         "active_employees": {
///             "columns": ["MATRICULA", "Sindicato"],
///             "rows": [[1001, "SINDPD SP"]]
///         }
///     }
/// }"#;
///
/// let request: RunRequest = serde_json::from_str(json).unwrap();
/// let roster = request.sources.get(SourceKind::ActiveEmployees).unwrap();
/// assert_eq!(roster.rows[0][0], "1001");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    /// Competence month, `YYYY-MM`. Kept as text so a bad value is
    /// reported as an invalid competence rather than malformed JSON.
    pub competence: String,
    /// Source tables keyed by source kind.
    #[serde(default)]
    pub sources: SourceBundle,
}
