use async_trait::async_trait;
use std::future::Future;
use std::time::Instant;
use tracing::{field, Instrument, Span};

use oauth2_core::{AccessData, AuthorizeData, Client, DynClient, OAuth2Error};
use oauth2_ports::{DynStorage, Storage};

use crate::metrics::{outcome, Metrics};
use crate::telemetry::annotate_span_with_trace_ids;

/// A thin wrapper around a `DynStorage` that creates a tracing span for each
/// storage call and, when given [`Metrics`], counts and times it.
pub struct ObservedStorage {
    inner: DynStorage,
    db_system: String,
    metrics: Option<Metrics>,
}

impl ObservedStorage {
    pub fn new(inner: DynStorage, db_system: String) -> Self {
        Self {
            inner,
            db_system,
            metrics: None,
        }
    }

    pub fn with_metrics(inner: DynStorage, db_system: String, metrics: Metrics) -> Self {
        Self {
            inner,
            db_system,
            metrics: Some(metrics),
        }
    }

    fn span(&self, operation: &'static str) -> Span {
        let span = tracing::info_span!(
            "db",
            trace_id = field::Empty,
            span_id = field::Empty,
            outcome = field::Empty,
            db_system = %self.db_system,
            db_operation = operation
        );
        annotate_span_with_trace_ids(&span);
        span
    }

    /// Span for a call keyed by a secret value (code or token). Never log
    /// full secrets.
    fn secret_span(&self, operation: &'static str, secret: &str) -> Span {
        let span = tracing::info_span!(
            "db",
            trace_id = field::Empty,
            span_id = field::Empty,
            outcome = field::Empty,
            db_system = %self.db_system,
            db_operation = operation,
            key_prefix = %Self::secret_prefix(secret),
            key_len = secret.len()
        );
        annotate_span_with_trace_ids(&span);
        span
    }

    fn secret_prefix(secret: &str) -> String {
        secret.chars().take(12).collect::<String>()
    }

    async fn observe<T, F>(&self, operation: &'static str, span: Span, call: F) -> Result<T, OAuth2Error>
    where
        T: Send,
        F: Future<Output = Result<T, OAuth2Error>> + Send,
    {
        let started = Instant::now();
        let result = call.instrument(span.clone()).await;
        let outcome = outcome(&result);
        span.record("outcome", outcome);
        if let Err(err) = &result {
            if !err.is_not_found() {
                tracing::warn!(parent: &span, error = %err, "storage operation failed");
            }
        }
        if let Some(metrics) = &self.metrics {
            metrics.observe(operation, outcome, started.elapsed());
        }
        result
    }
}

#[async_trait]
impl Storage for ObservedStorage {
    async fn get_client(&self, id: &str) -> Result<DynClient, OAuth2Error> {
        let span = tracing::info_span!(
            "db",
            trace_id = field::Empty,
            span_id = field::Empty,
            outcome = field::Empty,
            db_system = %self.db_system,
            db_operation = "get_client",
            client_id = %id
        );
        annotate_span_with_trace_ids(&span);
        self.observe("get_client", span, self.inner.get_client(id))
            .await
    }

    async fn save_authorize(&self, data: &AuthorizeData) -> Result<(), OAuth2Error> {
        let span = tracing::info_span!(
            "db",
            trace_id = field::Empty,
            span_id = field::Empty,
            outcome = field::Empty,
            db_system = %self.db_system,
            db_operation = "save_authorize",
            client_id = %data.client.id(),
            code_prefix = %Self::secret_prefix(&data.code),
            expires_in = data.expires_in
        );
        annotate_span_with_trace_ids(&span);
        self.observe("save_authorize", span, self.inner.save_authorize(data))
            .await
    }

    async fn load_authorize(&self, code: &str) -> Result<AuthorizeData, OAuth2Error> {
        let span = self.secret_span("load_authorize", code);
        self.observe("load_authorize", span, self.inner.load_authorize(code))
            .await
    }

    async fn remove_authorize(&self, code: &str) -> Result<(), OAuth2Error> {
        let span = self.secret_span("remove_authorize", code);
        self.observe("remove_authorize", span, self.inner.remove_authorize(code))
            .await
    }

    async fn save_access(&self, data: &AccessData) -> Result<(), OAuth2Error> {
        let span = tracing::info_span!(
            "db",
            trace_id = field::Empty,
            span_id = field::Empty,
            outcome = field::Empty,
            db_system = %self.db_system,
            db_operation = "save_access",
            client_id = %data.client.id(),
            token_prefix = %Self::secret_prefix(&data.access_token),
            has_refresh_token = !data.refresh_token.is_empty(),
            expires_in = data.expires_in
        );
        annotate_span_with_trace_ids(&span);
        self.observe("save_access", span, self.inner.save_access(data))
            .await
    }

    async fn load_access(&self, token: &str) -> Result<AccessData, OAuth2Error> {
        let span = self.secret_span("load_access", token);
        self.observe("load_access", span, self.inner.load_access(token))
            .await
    }

    async fn remove_access(&self, token: &str) -> Result<(), OAuth2Error> {
        let span = self.secret_span("remove_access", token);
        self.observe("remove_access", span, self.inner.remove_access(token))
            .await
    }

    async fn load_refresh(&self, token: &str) -> Result<AccessData, OAuth2Error> {
        let span = self.secret_span("load_refresh", token);
        self.observe("load_refresh", span, self.inner.load_refresh(token))
            .await
    }

    async fn remove_refresh(&self, token: &str) -> Result<(), OAuth2Error> {
        let span = self.secret_span("remove_refresh", token);
        self.observe("remove_refresh", span, self.inner.remove_refresh(token))
            .await
    }

    async fn close(&self) -> Result<(), OAuth2Error> {
        let span = self.span("close");
        self.observe("close", span, self.inner.close()).await
    }

    async fn healthcheck(&self) -> Result<(), OAuth2Error> {
        let span = self.span("healthcheck");
        self.observe("healthcheck", span, self.inner.healthcheck())
            .await
    }
}
