//! Request and response types for the cohort API.
//!
//! Raw types mirror the server's wire contract; [`FormattedResponse`] is the
//! reshaped output most callers want.

use std::fmt;

use serde::{Deserialize, Serialize};

/// SQL dialect requested for generated queries.
pub const SQL_SYNTAX_BIGQUERY: &str = "bigquery";

// ─────────────────────────────────────────────────────────────────────────────
// Credentials
// ─────────────────────────────────────────────────────────────────────────────

/// Long-lived API credentials, exchanged for a bearer token on every call.
#[derive(Clone)]
pub struct Credentials {
    /// Client identifier.
    pub identity: String,
    /// Client secret.
    pub secret: String,
}

impl Credentials {
    /// Create credentials from an identity and secret pair.
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"[redacted]")
            .finish()
    }
}

/// Short-lived bearer token returned by the authentication endpoint.
///
/// Valid for a single extraction call; never cached across calls.
#[derive(Debug, Clone)]
pub struct AuthToken(String);

impl AuthToken {
    pub(crate) fn new(token: String) -> Self {
        Self(token)
    }

    /// The raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration block sent with a cohort request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortConfig {
    /// Include the model's rationale for each query.
    pub include_rationale: bool,
    /// Include detailed code-extraction results on each query.
    pub include_extract_results: bool,
    /// Exclude deceased patients from the cohort.
    pub exclude_deceased: bool,
    /// Target SQL dialect for the generated query.
    pub sql_syntax: String,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            include_rationale: false,
            include_extract_results: false,
            // Server-side default; kept explicit so the wire body is stable.
            exclude_deceased: true,
            sql_syntax: SQL_SYNTAX_BIGQUERY.to_string(),
        }
    }
}

/// Request to extract a cohort from a free-text clinical description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortRequest {
    /// Request configuration.
    pub config: CohortConfig,
    /// Free-text search query, e.g. "diabetic patients over 60".
    pub text: String,
}

impl CohortRequest {
    /// Create a request with the default configuration.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            config: CohortConfig::default(),
            text: text.into(),
        }
    }

    /// Replace the request configuration.
    pub fn with_config(mut self, config: CohortConfig) -> Self {
        self.config = config;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw responses
// ─────────────────────────────────────────────────────────────────────────────

/// Raw cohort response as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortResponse {
    /// Generated SQL for the full cohort.
    pub sql: String,
    /// Per-resource sub-queries, in server order.
    pub queries: Vec<CohortQuery>,
    /// Human-readable description of the cohort.
    #[serde(
        rename = "cohortDescription",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cohort_description: Option<String>,
}

/// A single sub-query targeting one resource type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortQuery {
    /// Resource type the query targets (e.g. a FHIR resource type).
    pub resource: String,
    /// Whether matching patients are excluded from the cohort.
    pub exclude: bool,
    /// Search parameters, e.g. `"gender=female&birthdate=lt2000"`.
    #[serde(rename = "searchParams")]
    pub search_params: String,
    /// Model rationale, present when `include_rationale` was set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    /// Code-extraction results, present when `include_extract_results` was set
    /// and codes were extracted for this query.
    #[serde(
        rename = "codeExtractResults",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub code_extract_results: Option<Vec<CodeExtractResult>>,
}

/// Codes extracted from the query text for one coding system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeExtractResult {
    /// Coding system name (e.g. "ICD10").
    #[serde(rename = "systemName")]
    pub system_name: String,
    /// Extracted codes, in extraction order.
    pub codes: Vec<ExtractedCode>,
}

/// A single extracted code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedCode {
    /// The code itself (e.g. "E11").
    pub code: String,
    /// Human-readable description.
    pub description: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatted output
// ─────────────────────────────────────────────────────────────────────────────

/// Reshaped cohort response.
///
/// `code_extracts` is `Some` if and only if at least one code was extracted
/// across all queries; callers should treat its presence as the signal, not
/// expect a fixed schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedResponse {
    /// Generated SQL for the full cohort.
    pub sql: String,
    /// Simplified sub-queries, preserving server order.
    pub queries: Vec<QuerySummary>,
    /// Flattened code extractions across all queries, in nested order
    /// (query, then result, then code).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_extracts: Option<Vec<CodeExtract>>,
}

/// Simplified view of one sub-query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySummary {
    /// Resource type the query targets.
    pub resource: String,
    /// Whether matching patients are excluded.
    pub exclude: bool,
    /// Search parameters, copied as-is.
    #[serde(rename = "searchParams")]
    pub search_params: String,
}

/// One flattened code extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeExtract {
    /// Resource type of the enclosing query.
    pub resource: String,
    /// Coding system name.
    pub system: String,
    /// The extracted code.
    pub code: String,
    /// Human-readable description.
    pub description: String,
}

impl From<CohortResponse> for FormattedResponse {
    fn from(response: CohortResponse) -> Self {
        let mut queries = Vec::with_capacity(response.queries.len());
        let mut code_extracts = Vec::new();

        for query in response.queries {
            queries.push(QuerySummary {
                resource: query.resource.clone(),
                exclude: query.exclude,
                search_params: query.search_params,
            });

            for result in query.code_extract_results.into_iter().flatten() {
                for code in result.codes {
                    code_extracts.push(CodeExtract {
                        resource: query.resource.clone(),
                        system: result.system_name.clone(),
                        code: code.code,
                        description: code.description,
                    });
                }
            }
        }

        Self {
            sql: response.sql,
            queries,
            code_extracts: (!code_extracts.is_empty()).then_some(code_extracts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(resource: &str, params: &str) -> CohortQuery {
        CohortQuery {
            resource: resource.to_string(),
            exclude: false,
            search_params: params.to_string(),
            rationale: None,
            code_extract_results: None,
        }
    }

    #[test]
    fn test_format_without_extracts() {
        let raw = CohortResponse {
            sql: "SELECT 1".to_string(),
            queries: vec![query("Patient", "birthdate=lt1966"), query("Condition", "code=E11")],
            cohort_description: None,
        };

        let formatted = FormattedResponse::from(raw);
        assert_eq!(formatted.sql, "SELECT 1");
        assert_eq!(formatted.queries.len(), 2);
        assert_eq!(formatted.queries[0].resource, "Patient");
        assert_eq!(formatted.queries[1].search_params, "code=E11");
        assert!(formatted.code_extracts.is_none());
    }

    #[test]
    fn test_format_flattens_extracts_in_order() {
        let mut first = query("Condition", "code=E11");
        first.code_extract_results = Some(vec![
            CodeExtractResult {
                system_name: "ICD10".to_string(),
                codes: vec![
                    ExtractedCode {
                        code: "E11".to_string(),
                        description: "Type 2 diabetes".to_string(),
                    },
                    ExtractedCode {
                        code: "E11.9".to_string(),
                        description: "Type 2 diabetes without complications".to_string(),
                    },
                ],
            },
            CodeExtractResult {
                system_name: "SNOMED".to_string(),
                codes: vec![ExtractedCode {
                    code: "44054006".to_string(),
                    description: "Diabetes mellitus type 2".to_string(),
                }],
            },
        ]);

        let mut second = query("Observation", "code=loinc");
        second.code_extract_results = Some(vec![CodeExtractResult {
            system_name: "LOINC".to_string(),
            codes: vec![ExtractedCode {
                code: "4548-4".to_string(),
                description: "Hemoglobin A1c".to_string(),
            }],
        }]);

        let raw = CohortResponse {
            sql: "SELECT 1".to_string(),
            queries: vec![first, second],
            cohort_description: Some("diabetics".to_string()),
        };

        let formatted = FormattedResponse::from(raw);
        let extracts = formatted.code_extracts.expect("extracts present");
        assert_eq!(extracts.len(), 4);

        // Outer query order, then result order, then code order.
        assert_eq!(extracts[0].resource, "Condition");
        assert_eq!(extracts[0].system, "ICD10");
        assert_eq!(extracts[0].code, "E11");
        assert_eq!(extracts[1].code, "E11.9");
        assert_eq!(extracts[2].system, "SNOMED");
        assert_eq!(extracts[3].resource, "Observation");
        assert_eq!(extracts[3].system, "LOINC");
    }

    #[test]
    fn test_empty_extract_results_stay_absent() {
        let mut q = query("Patient", "gender=female");
        q.code_extract_results = Some(vec![CodeExtractResult {
            system_name: "ICD10".to_string(),
            codes: vec![],
        }]);

        let raw = CohortResponse {
            sql: "SELECT 1".to_string(),
            queries: vec![q],
            cohort_description: None,
        };

        let formatted = FormattedResponse::from(raw);
        assert!(formatted.code_extracts.is_none());
    }

    #[test]
    fn test_code_extracts_skipped_when_serialized() {
        let formatted = FormattedResponse {
            sql: "SELECT 1".to_string(),
            queries: vec![],
            code_extracts: None,
        };

        let json = serde_json::to_value(&formatted).unwrap();
        assert!(json.get("code_extracts").is_none());
    }

    #[test]
    fn test_default_config() {
        let config = CohortConfig::default();
        assert!(!config.include_rationale);
        assert!(!config.include_extract_results);
        assert!(config.exclude_deceased);
        assert_eq!(config.sql_syntax, "bigquery");
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("client-id", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("client-id"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_cohort_query_wire_names() {
        let body = serde_json::json!({
            "resource": "Condition",
            "exclude": false,
            "searchParams": "code=E11",
            "codeExtractResults": [
                { "systemName": "ICD10", "codes": [{ "code": "E11", "description": "Type 2 diabetes" }] }
            ]
        });

        let query: CohortQuery = serde_json::from_value(body).unwrap();
        assert_eq!(query.search_params, "code=E11");
        let results = query.code_extract_results.unwrap();
        assert_eq!(results[0].system_name, "ICD10");
    }
}
