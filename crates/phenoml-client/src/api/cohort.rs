//! Cohort extraction API.

use crate::client::CohortClient;
use crate::error::{Error, Result};
use crate::types::{CohortConfig, CohortRequest, CohortResponse, FormattedResponse};

/// Cohort extraction endpoint.
const COHORT_PATH: &str = "construe/cohort";

/// Cohort API client.
pub struct CohortApi {
    client: CohortClient,
}

impl CohortApi {
    pub(crate) fn new(client: CohortClient) -> Self {
        Self { client }
    }

    /// Submit a cohort request and return the reshaped response.
    pub async fn extract(&self, request: CohortRequest) -> Result<FormattedResponse> {
        Ok(self.extract_raw(request).await?.into())
    }

    /// Submit a cohort request and return the server payload as-is.
    ///
    /// Unlike [`extract`](Self::extract), this keeps per-query `rationale`
    /// and the cohort description when the server provides them.
    pub async fn extract_raw(&self, request: CohortRequest) -> Result<CohortResponse> {
        let token = self.client.auth().authenticate().await?;

        let url = self.client.url(COHORT_PATH)?;
        tracing::debug!(text = %request.text, "submitting cohort request");
        let response = self.client.post_json(url, &request, Some(&token)).await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = self.client.failure_message(response).await;
            return Err(Error::Request { status, message });
        }

        self.client.decode(response).await
    }

    /// Extract a cohort from a free-text query (convenience method).
    ///
    /// `verbose` mirrors onto both `include_rationale` and
    /// `include_extract_results`; the SQL dialect is fixed to BigQuery.
    pub async fn get_cohort_response(
        &self,
        text: impl Into<String>,
        exclude_deceased: bool,
        verbose: bool,
    ) -> Result<FormattedResponse> {
        let config = CohortConfig {
            include_rationale: verbose,
            include_extract_results: verbose,
            exclude_deceased,
            ..Default::default()
        };

        self.extract(CohortRequest::new(text).with_config(config)).await
    }
}
