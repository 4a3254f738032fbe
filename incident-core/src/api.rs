use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::model::{Incident, NewIncident, Page};
use crate::store::{Action, Effect, Operation, SubmitOutcome};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Backend operations the incident view depends on.
///
/// Futures are not `Send`: in the browser they run on the single UI thread.
#[async_trait(?Send)]
pub trait IncidentApi {
    async fn list_page(&self, page: usize, size: usize) -> ClientResult<Page>;
    async fn create(&self, incident: &NewIncident) -> ClientResult<Incident>;
    async fn update(&self, incident: &Incident) -> ClientResult<Incident>;
    async fn delete(&self, id: i64) -> ClientResult<()>;
}

/// [`IncidentApi`] over the JSON REST backend.
#[derive(Clone, Debug)]
pub struct HttpIncidentApi {
    client: Client,
    config: ClientConfig,
}

impl HttpIncidentApi {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn check(
        method: &str,
        url: &str,
        sent: Result<Response, reqwest::Error>,
    ) -> ClientResult<Response> {
        let response = sent.map_err(|e| {
            warn!(method, url, error = %e, "transport error");
            ClientError::from(e)
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(method, url, %status, "backend rejected request");
            return Err(ClientError::request_failed(format!(
                "{method} {url} returned {status}: {body}"
            )));
        }
        debug!(method, url, %status, "request ok");
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        response.json::<T>().await.map_err(ClientError::from)
    }
}

#[async_trait(?Send)]
impl IncidentApi for HttpIncidentApi {
    async fn list_page(&self, page: usize, size: usize) -> ClientResult<Page> {
        let url = self.config.endpoint("incidents");
        let sent = self
            .client
            .get(&url)
            .query(&[("page", page), ("size", size)])
            .send()
            .await;
        Self::decode(Self::check("GET", &url, sent).await?).await
    }

    async fn create(&self, incident: &NewIncident) -> ClientResult<Incident> {
        let url = self.config.endpoint("incidents");
        let sent = self.client.post(&url).json(incident).send().await;
        Self::decode(Self::check("POST", &url, sent).await?).await
    }

    async fn update(&self, incident: &Incident) -> ClientResult<Incident> {
        let url = self.config.endpoint(&format!("incidents/{}", incident.id));
        let sent = self.client.put(&url).json(incident).send().await;
        Self::decode(Self::check("PUT", &url, sent).await?).await
    }

    async fn delete(&self, id: i64) -> ClientResult<()> {
        let url = self.config.endpoint(&format!("incidents/{id}"));
        let sent = self.client.delete(&url).send().await;
        Self::check("DELETE", &url, sent).await.map(|_| ())
    }
}

/// Runs one effect against the backend and returns the action that
/// reports its completion.
pub async fn perform<A>(api: &A, effect: Effect) -> Action
where
    A: IncidentApi + ?Sized,
{
    match effect {
        Effect::FetchPage {
            generation,
            page,
            size,
        } => match api.list_page(page, size).await {
            Ok(page) => Action::PageLoaded { generation, page },
            Err(e) => Action::FetchFailed {
                generation,
                message: e.message().to_string(),
            },
        },
        Effect::Create { ticket, body } => match api.create(&body).await {
            Ok(created) => Action::SubmitSucceeded {
                ticket,
                outcome: SubmitOutcome::Created(created),
            },
            Err(e) => Action::SubmitFailed {
                ticket,
                operation: Operation::Create,
                message: e.message().to_string(),
            },
        },
        Effect::Update { ticket, body } => match api.update(&body).await {
            Ok(updated) => Action::SubmitSucceeded {
                ticket,
                outcome: SubmitOutcome::Updated(updated),
            },
            Err(e) => Action::SubmitFailed {
                ticket,
                operation: Operation::Update,
                message: e.message().to_string(),
            },
        },
        Effect::Delete(id) => match api.delete(id).await {
            Ok(()) => Action::DeleteSucceeded(id),
            Err(e) => Action::DeleteFailed {
                message: e.message().to_string(),
            },
        },
    }
}
