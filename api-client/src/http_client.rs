// HTTP client for the Flapjack API

use crate::config::{BaseUrl, ClientConfig};
use crate::errors::ApiError;
use flapjack_diner_core::{
    AcknowledgeOptions, Constraint, Param, ParamValue, PreparedParams, ScheduledMaintenance,
    TimeRange, ValidationError,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Client for the Flapjack monitoring API
///
/// Every method validates its arguments, issues exactly one request, and
/// returns the parsed JSON body, or `None` when the body is empty.
#[derive(Debug, Clone)]
pub struct DinerClient {
    client: reqwest::Client,
    base_url: BaseUrl,
}

impl DinerClient {
    /// Create a client from explicit configuration
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let base_url = BaseUrl::parse(&config.base_url)?;

        let mut builder = reqwest::Client::builder().timeout(config.timeout());
        if config.no_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    /// Create a client from `FLAPJACK_API_URL` / `FLAPJACK_API_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, ApiError> {
        let config = ClientConfig::from_env()?;
        Self::new(&config)
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// GET /entities
    pub async fn entities(&self) -> Result<Option<Value>, ApiError> {
        self.get("/entities", None).await
    }

    /// GET /checks/:entity
    pub async fn checks(&self, entity: &str) -> Result<Option<Value>, ApiError> {
        let path = resource_path("checks", entity, None, false)?;
        self.get(&path, None).await
    }

    /// GET /status/:entity[/:check]
    pub async fn status(
        &self,
        entity: &str,
        check: Option<&str>,
    ) -> Result<Option<Value>, ApiError> {
        let path = resource_path("status", entity, check, false)?;
        self.get(&path, None).await
    }

    /// POST /acknowledgments/:entity/:check
    pub async fn acknowledge(
        &self,
        entity: &str,
        check: &str,
        options: &AcknowledgeOptions,
    ) -> Result<Option<Value>, ApiError> {
        let path = resource_path("acknowledgments", entity, Some(check), true)?;
        let form = PreparedParams::prepare([Param::text("summary", options.summary.as_deref())])?;

        self.post_form(&path, form.to_form()).await
    }

    /// POST /scheduled_maintenances/:entity/:check
    ///
    /// # Arguments
    /// * `entity` - Entity name
    /// * `check` - Check name
    /// * `maintenance` - Start time (timestamp), duration (integer seconds) and summary
    pub async fn create_scheduled_maintenance(
        &self,
        entity: &str,
        check: &str,
        maintenance: &ScheduledMaintenance,
    ) -> Result<Option<Value>, ApiError> {
        let path = resource_path("scheduled_maintenances", entity, Some(check), true)?;
        let form = PreparedParams::prepare([
            Param::new("start_time", Some(maintenance.start_time.clone()))
                .required()
                .constrained(Constraint::Time),
            Param::new("duration", Some(maintenance.duration.clone()))
                .required()
                .constrained(Constraint::Integer),
            Param::text("summary", maintenance.summary.as_deref()),
        ])?;

        self.post_form(&path, form.to_form()).await
    }

    /// GET /scheduled_maintenances/:entity[/:check]
    pub async fn scheduled_maintenances(
        &self,
        entity: &str,
        check: Option<&str>,
        range: &TimeRange,
    ) -> Result<Option<Value>, ApiError> {
        self.list_in_range("scheduled_maintenances", entity, check, range)
            .await
    }

    /// GET /unscheduled_maintenances/:entity[/:check]
    pub async fn unscheduled_maintenances(
        &self,
        entity: &str,
        check: Option<&str>,
        range: &TimeRange,
    ) -> Result<Option<Value>, ApiError> {
        self.list_in_range("unscheduled_maintenances", entity, check, range)
            .await
    }

    /// GET /outages/:entity[/:check]
    pub async fn outages(
        &self,
        entity: &str,
        check: Option<&str>,
        range: &TimeRange,
    ) -> Result<Option<Value>, ApiError> {
        self.list_in_range("outages", entity, check, range).await
    }

    /// GET /downtime/:entity[/:check]
    pub async fn downtime(
        &self,
        entity: &str,
        check: Option<&str>,
        range: &TimeRange,
    ) -> Result<Option<Value>, ApiError> {
        self.list_in_range("downtime", entity, check, range).await
    }

    async fn list_in_range(
        &self,
        resource: &str,
        entity: &str,
        check: Option<&str>,
        range: &TimeRange,
    ) -> Result<Option<Value>, ApiError> {
        let path = resource_path(resource, entity, check, false)?;
        let query = PreparedParams::prepare([
            Param::new("start_time", range.start_time.map(ParamValue::Time))
                .constrained(Constraint::Time),
            Param::new("end_time", range.end_time.map(ParamValue::Time))
                .constrained(Constraint::Time),
        ])?;

        self.get(&path, query.to_query()).await
    }

    async fn get(&self, path: &str, query: Option<String>) -> Result<Option<Value>, ApiError> {
        let uri = self.base_url.request_uri(path, query.as_deref());
        tracing::debug!(method = "GET", %uri, "sending request");

        let response = self
            .client
            .get(&uri)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .send()
            .await?;

        jsonify(response).await
    }

    async fn post_form(&self, path: &str, form: String) -> Result<Option<Value>, ApiError> {
        let uri = self.base_url.request_uri(path, None);
        tracing::debug!(method = "POST", %uri, body_len = form.len(), "sending request");

        let response = self
            .client
            .post(&uri)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(form)
            .send()
            .await?;

        jsonify(response).await
    }
}

/// Build `/{resource}/{entity}[/{check}]` from validated, escaped segments
fn resource_path(
    resource: &str,
    entity: &str,
    check: Option<&str>,
    check_required: bool,
) -> Result<String, ValidationError> {
    let segments = PreparedParams::prepare([
        Param::segment("entity", Some(entity)).required(),
        Param::segment("check", check).required_if(check_required),
    ])?;

    Ok(segments
        .values()
        .fold(format!("/{}", resource), |mut path, segment| {
            path.push('/');
            path.push_str(segment);
            path
        }))
}

/// Parse a response body as JSON; an empty body yields `None`
async fn jsonify(response: reqwest::Response) -> Result<Option<Value>, ApiError> {
    tracing::debug!(status = %response.status(), url = %response.url(), "received response");

    let response = response.error_for_status()?;
    let body = response.bytes().await?;

    if body.is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_slice(&body)?))
}
