//! Client blog state - cached posts, filter projection and the
//! controller that keeps them in sync with the Blog API

mod api;
mod controller;
pub mod selectors;
mod state;

pub use api::{BlogApi, ClientError, HttpBlogApi};
pub use controller::BlogController;
pub use state::{
    BlogState, FetchStatus, FetchTicket, Filter, FilterUpdate, Mutation, MutationKind,
    Notification,
};
