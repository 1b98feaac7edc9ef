//! Browser transport for the cloud leaderboard

use std::rc::Rc;

use gloo::net::http::{Request, RequestBuilder};

use super::records::{
    CloudError, Credentials, LeaderboardFilter, RoundReport, ScoreRecord, ScoreReporter,
};
use super::requests::{self, CloudConfig, CloudRequest, Method};
use super::session::SessionHandle;
use crate::persistence::KeyValueStore;

/// Executes backend requests and keeps the shared session current
pub struct CloudClient {
    config: CloudConfig,
    session: SessionHandle,
    store: Rc<dyn KeyValueStore>,
}

impl CloudClient {
    pub fn new(config: CloudConfig, session: SessionHandle, store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            config,
            session,
            store,
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    async fn send(&self, request: CloudRequest) -> Result<String, CloudError> {
        log::debug!("{:?} {}", request.method, request.url);

        let mut builder: RequestBuilder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let request = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| CloudError::Network(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| CloudError::Network(e.to_string()))?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !response.ok() {
            return Err(requests::parse_error(status, &text));
        }
        Ok(text)
    }

    /// Re-read a persisted session and refresh its profile
    pub async fn restore(&self) {
        if !self.session.restore(self.store.as_ref()) {
            return;
        }
        if let Err(e) = self.refresh_profile().await {
            log::warn!("Stored session rejected: {e}");
            self.session.sign_out();
            self.session.save(self.store.as_ref());
        }
    }

    pub async fn sign_up(&self, credentials: &Credentials) -> Result<String, CloudError> {
        let request = requests::sign_up(&self.config, credentials)?;
        self.send(request).await?;
        log::info!("Sign-up submitted for {}", credentials.email);
        Ok("Check your email to confirm your account!".to_string())
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<String, CloudError> {
        let request = requests::sign_in(&self.config, credentials)?;
        let body = self.send(request).await?;
        let auth = requests::parse_auth_response(&body)?;
        self.session.sign_in(auth);
        if let Err(e) = self.refresh_profile().await {
            log::warn!("Profile lookup failed: {e}");
        }
        self.session.save(self.store.as_ref());
        Ok("Logged in successfully!".to_string())
    }

    pub async fn sign_out(&self) -> Result<String, CloudError> {
        let snapshot = self.session.snapshot();
        // Local state is cleared even if the server call fails
        self.session.sign_out();
        self.session.save(self.store.as_ref());
        if let Some(auth) = snapshot.auth {
            self.send(requests::sign_out(&self.config, &auth.access_token))
                .await?;
        }
        Ok("Logged out successfully!".to_string())
    }

    async fn refresh_profile(&self) -> Result<(), CloudError> {
        let auth = self.session.snapshot().auth.ok_or(CloudError::NotAuthenticated)?;
        let body = self
            .send(requests::load_profile(&self.config, &auth.access_token, &auth.user_id))
            .await?;
        if let Some(profile) = requests::parse_profile(&body)? {
            self.session.set_profile(profile);
            self.session.save(self.store.as_ref());
        }
        Ok(())
    }

    pub async fn submit_score(&self, report: RoundReport) -> Result<(), CloudError> {
        let session = self.session.snapshot();
        let (token, row) = session.score_row(&report)?;
        let request = requests::insert_score(&self.config, token, &row)?;
        self.send(request).await?;
        Ok(())
    }

    pub async fn top_scores(
        &self,
        filter: LeaderboardFilter,
    ) -> Result<Vec<ScoreRecord>, CloudError> {
        let token = self.session.snapshot().auth.map(|a| a.access_token);
        let request = requests::top_scores(
            &self.config,
            filter,
            requests::TOP_SCORES_LIMIT,
            token.as_deref(),
        );
        requests::parse_records(&self.send(request).await?)
    }

    pub async fn personal_best(
        &self,
        filter: LeaderboardFilter,
    ) -> Result<Option<ScoreRecord>, CloudError> {
        let auth = self.session.snapshot().auth.ok_or(CloudError::NotAuthenticated)?;
        let request =
            requests::personal_best(&self.config, &auth.access_token, &auth.user_id, filter);
        let records = requests::parse_records(&self.send(request).await?)?;
        Ok(records.into_iter().next())
    }

    pub async fn score_history(&self) -> Result<Vec<ScoreRecord>, CloudError> {
        let auth = self.session.snapshot().auth.ok_or(CloudError::NotAuthenticated)?;
        let request = requests::score_history(
            &self.config,
            &auth.access_token,
            &auth.user_id,
            requests::HISTORY_LIMIT,
        );
        requests::parse_records(&self.send(request).await?)
    }
}

/// Submits finished rounds on the browser executor
pub struct CloudReporter {
    client: Rc<CloudClient>,
}

impl CloudReporter {
    pub fn new(client: Rc<CloudClient>) -> Self {
        Self { client }
    }
}

impl ScoreReporter for CloudReporter {
    fn report(&self, report: RoundReport) {
        let client = self.client.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match client.submit_score(report).await {
                Ok(()) => log::info!("Score {} submitted", report.score),
                Err(e) => log::warn!("Score submission failed: {e}"),
            }
        });
    }
}
