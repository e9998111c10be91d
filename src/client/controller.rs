//! Drives the blog state through the API

use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;

use super::api::{BlogApi, ClientError};
use super::selectors;
use super::state::{BlogState, FilterUpdate, Mutation, MutationKind, Notification};
use crate::config::ClientConfig;
use crate::content::{BlogPost, PostDraft, PostId, PostPatch};

/// Owns a [`BlogState`] and applies API outcomes to it.
///
/// The lock is only held while a settled outcome is applied, never
/// across a request, so fetches and mutations may overlap.
pub struct BlogController<A> {
    api: A,
    state: RwLock<BlogState>,
    request_timeout: Option<Duration>,
}

impl<A: BlogApi> BlogController<A> {
    /// Controller with the default client settings
    pub fn new(api: A) -> Self {
        Self::from_config(api, &ClientConfig::default())
    }

    pub fn from_config(api: A, config: &ClientConfig) -> Self {
        Self {
            api,
            state: RwLock::new(BlogState::new()),
            request_timeout: config.request_timeout(),
        }
    }

    /// Fail requests that take longer than `timeout`; `None` waits forever
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> BlogState {
        self.state.read().await.clone()
    }

    /// Posts passing the current filter
    pub async fn visible_posts(&self) -> Vec<BlogPost> {
        let state = self.state.read().await;
        selectors::visible_posts(&state).into_iter().cloned().collect()
    }

    /// Reload the whole collection.
    ///
    /// Returns `Ok(false)` when the response arrived after a newer fetch
    /// had already been applied and was dropped.
    pub async fn fetch_posts(&self) -> Result<bool, ClientError> {
        let ticket = self.state.write().await.begin_fetch();
        tracing::debug!(seq = ticket.seq(), "Fetching posts");

        match self.bounded(self.api.list()).await {
            Ok(posts) => Ok(self.state.write().await.finish_fetch(ticket, Ok(posts))),
            Err(err) => {
                tracing::warn!(seq = ticket.seq(), "Fetching posts failed: {}", err);
                self.state
                    .write()
                    .await
                    .finish_fetch(ticket, Err(err.to_string()));
                Err(err)
            }
        }
    }

    pub async fn create_post(&self, draft: PostDraft) -> Result<BlogPost, ClientError> {
        self.mutate(MutationKind::Create, async {
            let post = self.api.create(&draft).await?;
            Ok::<_, ClientError>((Mutation::Created(post.clone()), post))
        })
        .await
    }

    pub async fn update_post(&self, id: &PostId, patch: PostPatch) -> Result<BlogPost, ClientError> {
        self.mutate(MutationKind::Update, async {
            let post = self.api.update(id, &patch).await?;
            Ok::<_, ClientError>((Mutation::Updated(post.clone()), post))
        })
        .await
    }

    pub async fn delete_post(&self, id: &PostId) -> Result<(), ClientError> {
        self.mutate(MutationKind::Delete, async {
            self.api.delete(id).await?;
            Ok::<_, ClientError>((Mutation::Deleted(id.clone()), ()))
        })
        .await
    }

    pub async fn set_filter(&self, update: FilterUpdate) {
        self.state.write().await.set_filter(update);
    }

    pub async fn clear_filter(&self) {
        self.state.write().await.clear_filter();
    }

    /// Select a cached post by id; clears the selection if it is unknown
    pub async fn select_post(&self, id: Option<&PostId>) {
        let mut state = self.state.write().await;
        let post = id.and_then(|id| selectors::find_post(&state, id).cloned());
        state.set_selected_post(post);
    }

    pub async fn take_notifications(&self) -> Vec<Notification> {
        self.state.write().await.take_notifications()
    }

    async fn mutate<T, F>(&self, kind: MutationKind, request: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<(Mutation, T), ClientError>>,
    {
        self.state.write().await.begin_mutation();

        match self.bounded(request).await {
            Ok((mutation, value)) => {
                self.state.write().await.finish_mutation(kind, Ok(mutation));
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(?kind, "Blog mutation failed: {}", err);
                self.state
                    .write()
                    .await
                    .finish_mutation(kind, Err(err.to_string()));
                Err(err)
            }
        }
    }

    async fn bounded<T, F>(&self, request: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| ClientError::Timeout)?,
            None => request.await,
        }
    }
}
