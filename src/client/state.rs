//! Client blog state container
//!
//! `BlogState` is a plain value: every transition is a method taking
//! `&mut self`, and nothing in here performs I/O. The controller owns
//! one behind a lock and feeds it settled request outcomes.

use serde::{Deserialize, Serialize};

use crate::content::{BlogPost, PostId};

/// Progress of the collection fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Search and category criteria applied to the cache for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub search_term: String,
    pub category: String,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty() && self.category.is_empty()
    }
}

/// Partial filter; absent fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub search_term: Option<String>,
    pub category: Option<String>,
}

impl FilterUpdate {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
            category: None,
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            search_term: None,
            category: Some(category.into()),
        }
    }
}

/// Sequence number of one collection fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// Transient user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    fn past_tense(&self) -> &'static str {
        match self {
            MutationKind::Create => "created",
            MutationKind::Update => "updated",
            MutationKind::Delete => "deleted",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }
}

/// A settled, successful mutation as returned by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Created(BlogPost),
    Updated(BlogPost),
    Deleted(PostId),
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Created(_) => MutationKind::Create,
            Mutation::Updated(_) => MutationKind::Update,
            Mutation::Deleted(_) => MutationKind::Delete,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlogState {
    posts: Vec<BlogPost>,
    status: FetchStatus,
    error: Option<String>,
    filter: Filter,
    selected_post: Option<BlogPost>,
    notifications: Vec<Notification>,
    /// Highest ticket handed out
    issued_seq: u64,
    /// Ticket of the last fetch response that was applied
    applied_seq: u64,
    pending_mutations: usize,
}

impl BlogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached posts, in server order with local patches applied
    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    /// True while a fetch or a mutation is in flight
    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading || self.pending_mutations > 0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn selected_post(&self) -> Option<&BlogPost> {
        self.selected_post.as_ref()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Enter `Loading` and hand out the next ticket. Any previous error
    /// is cleared while the request is in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued_seq += 1;
        self.status = FetchStatus::Loading;
        self.error = None;
        FetchTicket(self.issued_seq)
    }

    /// Apply a fetch outcome.
    ///
    /// Responses older than the last applied one are dropped and `false`
    /// is returned. A failure keeps the cached posts. The state stays in
    /// `Loading` while a newer fetch is still outstanding.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<BlogPost>, String>,
    ) -> bool {
        if ticket.0 <= self.applied_seq {
            tracing::debug!(
                seq = ticket.0,
                applied = self.applied_seq,
                "Dropping stale fetch response"
            );
            return false;
        }
        self.applied_seq = ticket.0;
        let outstanding = self.issued_seq > self.applied_seq;

        match result {
            Ok(posts) => {
                self.posts = posts;
                self.error = None;
                self.refresh_selected();
                self.status = if outstanding {
                    FetchStatus::Loading
                } else {
                    FetchStatus::Loaded
                };
            }
            Err(message) => {
                self.notifications
                    .push(Notification::Error(format!("Failed to load posts: {}", message)));
                self.error = Some(message);
                self.status = if outstanding {
                    FetchStatus::Loading
                } else {
                    FetchStatus::Failed
                };
            }
        }
        true
    }

    pub fn begin_mutation(&mut self) {
        self.pending_mutations += 1;
        self.error = None;
    }

    /// Patch the cache from a settled mutation.
    ///
    /// Create prepends, update replaces by identity, delete removes by
    /// identity. A failure records the error and leaves the cache alone.
    pub fn finish_mutation(&mut self, kind: MutationKind, result: Result<Mutation, String>) {
        self.pending_mutations = self.pending_mutations.saturating_sub(1);

        match result {
            Ok(mutation) => {
                self.error = None;
                match mutation {
                    Mutation::Created(post) => {
                        self.posts.retain(|p| p.id != post.id);
                        self.posts.insert(0, post);
                    }
                    Mutation::Updated(post) => {
                        if let Some(slot) = self.posts.iter_mut().find(|p| p.id == post.id) {
                            *slot = post.clone();
                        }
                        if let Some(selected) = &mut self.selected_post {
                            if selected.id == post.id {
                                *selected = post;
                            }
                        }
                    }
                    Mutation::Deleted(id) => {
                        self.posts.retain(|p| p.id != id);
                        if self.selected_post.as_ref().is_some_and(|p| p.id == id) {
                            self.selected_post = None;
                        }
                    }
                }
                self.notifications
                    .push(Notification::Success(format!("Post {}", kind.past_tense())));
            }
            Err(message) => {
                self.notifications.push(Notification::Error(format!(
                    "Failed to {} post: {}",
                    kind.verb(),
                    message
                )));
                self.error = Some(message);
            }
        }
    }

    /// Merge a partial filter into the current one
    pub fn set_filter(&mut self, update: FilterUpdate) {
        if let Some(term) = update.search_term {
            self.filter.search_term = term;
        }
        if let Some(category) = update.category {
            self.filter.category = category;
        }
    }

    pub fn clear_filter(&mut self) {
        self.filter = Filter::default();
    }

    pub fn set_selected_post(&mut self, post: Option<BlogPost>) {
        self.selected_post = post;
    }

    /// Drain pending notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Keep the selected post in sync with a freshly loaded list
    fn refresh_selected(&mut self) {
        if let Some(selected) = &self.selected_post {
            self.selected_post = self.posts.iter().find(|p| p.id == selected.id).cloned();
        }
    }
}
