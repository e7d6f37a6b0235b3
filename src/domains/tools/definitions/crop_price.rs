//! Crop price lookup tool.
//!
//! Queries the government commodity price resource (data.gov.in) for current
//! mandi prices, filtered by state, district, and commodity. Filters are only
//! forwarded upstream when the caller actually provided them; `limit` and
//! `offset` are always sent.

use rmcp::{handler::server::tool::cached_schema_for_type, model::Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::Config;
use crate::domains::tools::ToolError;
use crate::upstream::UpstreamClient;

/// Parameters for the crop price tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CropPriceParams {
    /// State to filter by (e.g. "Punjab").
    #[schemars(description = "State to filter by (e.g. 'Punjab')")]
    pub state: Option<String>,

    /// District to filter by (e.g. "Amritsar").
    #[schemars(description = "District to filter by (e.g. 'Amritsar')")]
    pub district: Option<String>,

    /// Commodity to filter by (e.g. "Wheat").
    #[schemars(description = "Commodity to filter by (e.g. 'Wheat')")]
    pub commodity: Option<String>,

    /// Maximum number of records to return (default: 50).
    #[schemars(description = "Maximum number of records to return (default: 50)")]
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Number of records to skip (default: 0).
    #[schemars(description = "Number of records to skip (default: 0)")]
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    50
}

/// Upstream response envelope. Both fields are optional on the wire.
#[derive(Debug, Deserialize)]
struct PriceEnvelope {
    #[serde(default)]
    records: Vec<serde_json::Value>,
    total: Option<u64>,
}

/// Structured payload returned to the caller.
#[derive(Debug, Serialize)]
struct CropPriceData {
    records: Vec<serde_json::Value>,
    total: u64,
    limit: u32,
    offset: u32,
    query: PriceFilters,
}

/// Echo of the filters the caller asked for; absent filters are omitted.
#[derive(Debug, Serialize)]
struct PriceFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commodity: Option<String>,
}

/// Crop price tool implementation.
#[derive(Debug, Clone)]
pub struct CropPriceTool;

impl CropPriceTool {
    /// Tool name as registered in the gateway.
    pub const NAME: &'static str = "crop-price";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Fetch current mandi (wholesale market) prices for agricultural commodities from the Indian government's open data platform. Supports filtering by state, district, and commodity, with limit/offset pagination.";

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<CropPriceParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Validate arguments and execute.
    pub async fn run(
        arguments: serde_json::Value,
        config: &Config,
        client: &UpstreamClient,
    ) -> Result<serde_json::Value, ToolError> {
        let params: CropPriceParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
        Self::execute(&params, config, client).await
    }

    /// Execute the tool logic: one upstream GET, reshaped into the payload.
    async fn execute(
        params: &CropPriceParams,
        config: &Config,
        client: &UpstreamClient,
    ) -> Result<serde_json::Value, ToolError> {
        let api_key = config
            .credentials
            .data_gov_api_key
            .as_deref()
            .ok_or_else(|| ToolError::config("DATA_GOV_API_KEY is not configured"))?;

        let url = format!(
            "{}/resource/{}",
            config.upstream.data_gov_base_url, config.upstream.data_gov_resource_id
        );
        let query = Self::build_query(params, api_key);

        info!(
            "Fetching crop prices (limit {}, offset {})",
            params.limit, params.offset
        );
        let response = client.get(&url, &query).await?;

        if !response.is_success() {
            return Err(ToolError::upstream_http(response.status, response.body));
        }

        let envelope: PriceEnvelope = serde_json::from_str(&response.body)
            .map_err(|_| ToolError::upstream_format(response.body.clone()))?;

        let total = envelope.total.unwrap_or(envelope.records.len() as u64);
        let data = CropPriceData {
            records: envelope.records,
            total,
            limit: params.limit,
            offset: params.offset,
            query: PriceFilters {
                state: params.state.clone(),
                district: params.district.clone(),
                commodity: params.commodity.clone(),
            },
        };

        serde_json::to_value(data).map_err(|e| ToolError::internal(e.to_string()))
    }

    /// Build the outbound query string pairs.
    ///
    /// A filter is included iff the corresponding input is present; an
    /// explicitly provided empty string still counts as present. `limit` and
    /// `offset` are always included.
    fn build_query(params: &CropPriceParams, api_key: &str) -> Vec<(String, String)> {
        let mut query = vec![
            ("api-key".to_string(), api_key.to_string()),
            ("format".to_string(), "json".to_string()),
        ];

        if let Some(state) = &params.state {
            query.push(("filters[State]".to_string(), state.clone()));
        }
        if let Some(district) = &params.district {
            query.push(("filters[District]".to_string(), district.clone()));
        }
        if let Some(commodity) = &params.commodity {
            query.push(("filters[Commodity]".to_string(), commodity.clone()));
        }

        query.push(("limit".to_string(), params.limit.to_string()));
        query.push(("offset".to_string(), params.offset.to_string()));
        query
    }
}
