use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info, warn};

use crate::components::orbit_graph::{
	AttendeeNode, GraphConfig, NetworkData, OrbitGraphCanvas, RelationshipEdge,
};
use crate::protocol::pagination::DEFAULT_PAGE_SIZE;
use crate::protocol::types::InteractionCreate;
use crate::protocol::{
	PeopleClient, PeopleQuery, Pagination, ProtocolClient, ProtocolConfig, ProtocolError,
	RelationshipsClient, RelationshipsQuery, ReqwestTransport, StaticToken, collect_pages,
};
use crate::rate_limit::RateLimiter;

/// Manual reloads allowed per window.
const RETRY_LIMIT: u32 = 10;
const RELATIONSHIP_PAGE_SIZE: u32 = 100;

#[derive(Clone, Debug, Default, PartialEq)]
struct LoadedNetwork {
	data: NetworkData,
	/// People in the whole network, not just the ones fetched.
	total_people: u64,
}

fn protocol_config() -> ProtocolConfig {
	let config = match option_env!("ORBIT_API_URL") {
		Some(url) => ProtocolConfig::new(url),
		None => ProtocolConfig::default(),
	};
	config.with_owner(option_env!("ORBIT_OWNER_ID").unwrap_or_default())
}

fn protocol_client() -> ProtocolClient {
	let token = option_env!("ORBIT_API_TOKEN").map(str::to_string);
	ProtocolClient::new(protocol_config(), Rc::new(ReqwestTransport::new()))
		.with_token_supplier(Rc::new(StaticToken(token)))
}

/// People stop at what the widest layout can place; relationships are
/// swept in full so every shown person gets its strength.
async fn load_network(
	people: &PeopleClient,
	relationships: &RelationshipsClient,
	owner_id: &str,
) -> Result<LoadedNetwork, ProtocolError> {
	let max_people = GraphConfig::default().desktop.max_nodes;
	let people_query = PeopleQuery::owner(owner_id);
	let (persons, total_people) = collect_pages(
		Pagination::page(1, u32::try_from(max_people).unwrap_or(DEFAULT_PAGE_SIZE)),
		Some(max_people),
		|pagination| {
			let query = PeopleQuery {
				pagination: Some(pagination),
				..people_query.clone()
			};
			async move { people.list_people(&query).await }
		},
	)
	.await?;

	let edge_query = RelationshipsQuery::owner(owner_id);
	let (edges, _) = collect_pages(Pagination::page(1, RELATIONSHIP_PAGE_SIZE), None, |pagination| {
		let query = RelationshipsQuery {
			pagination: Some(pagination),
			..edge_query.clone()
		};
		async move { relationships.list_relationships(&query).await }
	})
	.await?;

	info!(
		"loaded {} of {total_people} people and {} relationships",
		persons.len(),
		edges.len()
	);
	Ok(LoadedNetwork {
		data: NetworkData {
			attendees: persons.iter().map(AttendeeNode::from).collect(),
			relationships: edges.iter().map(RelationshipEdge::from).collect(),
			opportunities: Vec::new(),
		},
		total_people,
	})
}

fn now_iso() -> String {
	String::from(js_sys::Date::new_0().to_iso_string())
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let client = protocol_client();
	let owner_id = client.config().owner_id.clone();
	let people = StoredValue::new_local(PeopleClient::new(client.clone()));
	let relationships = StoredValue::new_local(RelationshipsClient::new(client));
	let owner = StoredValue::new(owner_id);
	let limiter = StoredValue::new(RateLimiter::default());

	let network = LocalResource::new(move || {
		let (people, relationships, owner_id) =
			(people.get_value(), relationships.get_value(), owner.get_value());
		async move {
			load_network(&people, &relationships, &owner_id)
				.await
				.map_err(|err| err.to_string())
		}
	});
	let loaded = Memo::new(move |_| {
		network
			.get()
			.and_then(|result| result.ok())
			.unwrap_or_default()
	});
	let data = Memo::new(move |_| loaded.get().data);
	let total_count = Signal::derive(move || {
		network
			.get()
			.and_then(|result| result.ok())
			.map(|loaded| usize::try_from(loaded.total_people).unwrap_or(usize::MAX))
	});
	let is_loading = Signal::derive(move || network.get().is_none());
	let error = Signal::derive(move || {
		network
			.get()
			.and_then(|result| result.err())
			.map(|err| format!("Failed to load network graph: {err}"))
	});

	let on_retry = Callback::new(move |_: ()| {
		let decision = limiter.with_value(|l| l.check_limit("graph-retry", RETRY_LIMIT));
		if decision.allowed {
			network.refetch();
		} else {
			warn!("graph reload limit reached");
		}
	});

	// One logged interaction per person per window.
	let on_node_click = Callback::new(move |attendee: AttendeeNode| {
		let key = format!("interaction:{}", attendee.person_id);
		if !limiter.with_value(|l| l.check_limit(&key, 1)).allowed {
			debug!("interaction with {} already logged", attendee.person_id);
			return;
		}
		let interaction = InteractionCreate {
			owner_id: owner.get_value(),
			partner_person_id: Some(attendee.person_id.clone()),
			timestamp: now_iso(),
			summary: Some(format!("Viewed {} in the network graph", attendee.display_name)),
			..InteractionCreate::default()
		};
		let client = relationships.get_value();
		spawn_local(async move {
			match client.ingest_event(&interaction).await {
				Ok(_) => debug!("logged interaction with {}", attendee.person_id),
				Err(err) => warn!("failed to log interaction: {err}"),
			}
		});
	});

	view! {
		<div class="fullscreen-graph">
			<OrbitGraphCanvas
				attendees=Signal::derive(move || data.get().attendees)
				relationships=Signal::derive(move || data.get().relationships)
				opportunities=Signal::derive(move || data.get().opportunities)
				total_count=total_count
				is_loading=is_loading
				error=error
				on_retry=on_retry
				on_node_click=on_node_click
			/>
			<div class="graph-overlay">
				<h1>"Your Network"</h1>
				<p class="subtitle">"Closest connections orbit nearest. Click someone to log an interaction."</p>
			</div>
		</div>
	}
}
