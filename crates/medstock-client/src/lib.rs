//! # medstock-client: API Client & Billing Session
//!
//! Connects the pure cart engine in `medstock-core` to the pharmacy REST API.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         medstock-client                                 │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  BillingSession<C, S>                            │  │
//! │  │   Cart (medstock-core) + catalog snapshot + session id           │  │
//! │  └───────────────┬──────────────────────────────┬───────────────────┘  │
//! │                  │ CatalogProvider              │ CheckoutService      │
//! │                  ▼                              ▼                      │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │          AuthorizedApi (owns Session, reqwest Client)            │  │
//! │  │     GET /medicines               POST /medicines/sell            │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                  ▲ login / register / adopt_token                      │
//! │  ┌───────────────┴──────────────────────────────────────────────────┐  │
//! │  │            ApiClient (anonymous) ◄── ClientConfig                │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST binding of the service traits, session acquisition
//! - [`billing`] - Billing session orchestration and checkout
//! - [`config`] - Client configuration (file + environment)
//! - [`error`] - Client error types
//! - [`service`] - `CatalogProvider` / `CheckoutService` traits
//! - [`session`] - Bearer token session and credentials

pub mod api;
pub mod billing;
pub mod config;
pub mod error;
pub mod service;
pub mod session;

pub use api::{ApiClient, AuthorizedApi};
pub use billing::{BillingSession, CheckoutReceipt};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use service::{CatalogProvider, CheckoutService};
pub use session::{Credentials, Session, UserProfile};
