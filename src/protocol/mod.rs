//! Typed client for the relationship-graph protocol service.
//!
//! Every resource client wraps one shared [`ProtocolClient`], which owns the
//! request contract: header injection, bearer tokens, paging normalization,
//! and the single [`ProtocolError`] shape callers handle. Nothing here retries.

mod agents;
mod channels;
pub(crate) mod client;
mod config;
mod context_tags;
mod contract;
mod custom_attributes;
mod error;
mod organizations;
pub mod pagination;
mod people;
mod processes;
mod relationships;
mod transport;
pub mod types;

pub use agents::AgentsClient;
pub use channels::{ChannelsClient, ChannelsQuery};
pub use client::{
	APP_ID_HEADER, ApiRequest, ApiResponse, CONTRACT_VERSION_HEADER, ProtocolClient,
	REQUEST_ID_HEADER, ResponseBody, StaticToken, TokenSupplier,
};
pub use config::ProtocolConfig;
pub use context_tags::{ContextTagsClient, ContextTagsQuery};
pub use contract::ContractClient;
pub use custom_attributes::{CustomAttributeSearch, CustomAttributesClient, CustomAttributesQuery};
pub use error::{ApiError, ProtocolError, TransportError};
pub use organizations::{OrganizationsClient, OrganizationsQuery};
pub use pagination::{Paginated, Pagination, QueryParams, collect_pages};
pub use people::{AttendeeRecord, PeopleClient, PeopleQuery, SyncOutcome};
pub use processes::{ProcessesClient, ProcessesQuery};
pub use relationships::{RelationshipsClient, RelationshipsQuery};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
