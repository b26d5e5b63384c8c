//! Wire shapes of the relationship-graph service.
//!
//! Optional fields default so sparse payloads still decode; required fields
//! make a malformed payload fail at the client boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::pagination::paginated;

// People

/// New person record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonCreate {
	/// Graph owner.
	pub owner_id: String,
	/// Full legal name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub legal_name: Option<String>,
	/// Name the person goes by; shown first.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub preferred_name: Option<String>,
	/// Email addresses, primary first.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub emails: Vec<String>,
	/// Phone numbers.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub phones: Vec<String>,
	/// Handle per network, e.g. `linkedin`.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub social_handles: BTreeMap<String, String>,
	/// Job title or role.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub primary_role: Option<String>,
	/// One-line summary such as `CTO at Acme`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub headline: Option<String>,
	/// Short bio.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bio_summary: Option<String>,
	/// Free-form tags.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub tags: Vec<String>,
}

/// Partial update; only set fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonUpdate {
	/// Full legal name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub legal_name: Option<String>,
	/// Name the person goes by; shown first.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub preferred_name: Option<String>,
	/// Replaces the whole list when set.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub emails: Option<Vec<String>>,
	/// Job title or role.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub primary_role: Option<String>,
	/// One-line summary such as `CTO at Acme`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub headline: Option<String>,
	/// Short bio.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bio_summary: Option<String>,
	/// Replaces the whole list when set.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tags: Option<Vec<String>>,
}

/// A person as the service stores it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonRead {
	/// Stable id.
	pub person_id: String,
	/// Graph owner.
	pub owner_id: String,
	/// Full legal name.
	#[serde(default)]
	pub legal_name: Option<String>,
	/// Name the person goes by; shown first.
	#[serde(default)]
	pub preferred_name: Option<String>,
	/// Email addresses, primary first.
	#[serde(default)]
	pub emails: Vec<String>,
	/// Job title or role.
	#[serde(default)]
	pub primary_role: Option<String>,
	/// One-line summary such as `CTO at Acme`.
	#[serde(default)]
	pub headline: Option<String>,
	/// Short bio.
	#[serde(default)]
	pub bio_summary: Option<String>,
	/// Free-form tags.
	#[serde(default)]
	pub tags: Vec<String>,
	/// Avatar URL.
	#[serde(default)]
	pub image_url: Option<String>,
	/// ISO-8601 creation time.
	#[serde(default)]
	pub created_at: Option<String>,
	/// ISO-8601 time of the last change.
	#[serde(default)]
	pub updated_at: Option<String>,
}

impl PersonRead {
	/// Preferred name, then legal name, then "Anonymous".
	pub fn display_name(&self) -> &str {
		self.preferred_name
			.as_deref()
			.filter(|s| !s.is_empty())
			.or(self.legal_name.as_deref().filter(|s| !s.is_empty()))
			.unwrap_or("Anonymous")
	}
}

/// One page of people.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonListResponse {
	/// People on this page.
	#[serde(default)]
	pub people: Vec<PersonRead>,
	/// Rows across all pages.
	pub total: u64,
	/// Page size the server applied.
	pub limit: u64,
	/// Offset of the first row on this page.
	pub offset: u64,
}
paginated!(PersonListResponse, PersonRead, people);

// Interactions, relationships, trust

/// An interaction to record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionCreate {
	/// Graph owner.
	pub owner_id: String,
	/// Who initiated it; the owner when unset.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub actor_person_id: Option<String>,
	/// The other party.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub partner_person_id: Option<String>,
	/// Channel the interaction went through.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub channel_id: Option<String>,
	/// ISO-8601 timestamp.
	pub timestamp: String,
	/// `inbound`, `outbound` or `mutual`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub direction: Option<String>,
	/// Free-text summary.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub summary: Option<String>,
	/// Context tag ids.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub context_tags: Vec<String>,
	/// How the interaction went.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub outcome_tag: Option<String>,
	/// Length of the interaction.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub duration_minutes: Option<u32>,
	/// Tone label, e.g. `positive`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub emotion_tone: Option<String>,
}

/// A recorded interaction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionRead {
	/// Stable id.
	pub interaction_id: String,
	/// Graph owner.
	pub owner_id: String,
	/// Who initiated it.
	#[serde(default)]
	pub actor_person_id: Option<String>,
	/// The other party.
	#[serde(default)]
	pub partner_person_id: Option<String>,
	/// Channel the interaction went through.
	#[serde(default)]
	pub channel_id: Option<String>,
	/// ISO-8601 time it happened.
	pub timestamp: String,
	/// Free-text summary.
	#[serde(default)]
	pub summary: Option<String>,
	/// Context tag ids.
	#[serde(default)]
	pub context_tags: Vec<String>,
	/// How the interaction went.
	#[serde(default)]
	pub outcome_tag: Option<String>,
	/// ISO-8601 creation time.
	#[serde(default)]
	pub created_at: Option<String>,
}

/// A directed relationship between two people.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRead {
	/// Stable id.
	pub relationship_id: String,
	/// Graph owner.
	pub owner_id: String,
	/// Where the relationship starts.
	pub source_person_id: String,
	/// Where it points.
	pub target_person_id: String,
	/// `outbound`, `inbound` or `mutual`.
	#[serde(default)]
	pub direction: Option<String>,
	/// E.g. `colleague`.
	#[serde(default)]
	pub relationship_type: Option<String>,
	/// 0..1 overall strength.
	#[serde(default)]
	pub strength_score: f64,
	/// 0..1, decays without contact.
	#[serde(default)]
	pub recency_score: f64,
	/// 0..1, grows with contact.
	#[serde(default)]
	pub frequency_score: f64,
	/// ISO-8601 time of the latest interaction.
	#[serde(default)]
	pub last_interaction_at: Option<String>,
	/// E.g. `active` or `dormant`.
	#[serde(default)]
	pub relationship_state: Option<String>,
	/// Summary of the owner's notes.
	#[serde(default)]
	pub notes_summary: Option<String>,
}

/// A relationship with interaction counts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipDetail {
	/// The relationship itself.
	#[serde(flatten)]
	pub relationship: RelationshipRead,
	/// Interactions recorded.
	#[serde(default)]
	pub interaction_count: u64,
	/// ISO-8601 time of the latest interaction.
	#[serde(default)]
	pub latest_interaction_at: Option<String>,
}

/// A change in trust caused by an interaction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrustEventRead {
	/// Stable id.
	pub trust_event_id: String,
	/// Relationship whose trust moved.
	pub relationship_id: String,
	/// Interaction that moved it.
	#[serde(default)]
	pub interaction_id: Option<String>,
	/// Score before the event.
	#[serde(default)]
	pub previous_trust_score: Option<f64>,
	/// Score after the event.
	#[serde(default)]
	pub new_trust_score: Option<f64>,
	/// `new - previous`.
	#[serde(default)]
	pub trust_delta: Option<f64>,
	/// Why the score moved.
	#[serde(default)]
	pub explanation: Option<String>,
	/// ISO-8601 creation time.
	#[serde(default)]
	pub created_at: Option<String>,
}

/// Everything an ingested interaction touched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionResponse {
	/// The stored interaction.
	pub interaction: InteractionRead,
	/// The relationship after the update.
	pub relationship: RelationshipRead,
	/// The resulting trust change.
	pub trust_event: TrustEventRead,
}

/// Relationship with its latest activity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSummary {
	/// `None` when the two people are not linked.
	#[serde(default)]
	pub relationship: Option<RelationshipRead>,
	/// Newest first.
	#[serde(default)]
	pub recent_interactions: Vec<InteractionRead>,
	/// Newest first.
	#[serde(default)]
	pub recent_trust_events: Vec<TrustEventRead>,
}

/// One page of relationships.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipListResponse {
	/// Relationships on this page.
	#[serde(default)]
	pub relationships: Vec<RelationshipDetail>,
	/// Rows across all pages.
	pub total: u64,
	/// Page size the server applied.
	pub limit: u64,
	/// Offset of the first row on this page.
	pub offset: u64,
}
paginated!(RelationshipListResponse, RelationshipDetail, relationships);

/// One page of interactions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionListResponse {
	/// Interactions on this page.
	#[serde(default)]
	pub interactions: Vec<InteractionRead>,
	/// Rows across all pages.
	pub total: u64,
	/// Page size the server applied.
	pub limit: u64,
	/// Offset of the first row on this page.
	pub offset: u64,
}
paginated!(InteractionListResponse, InteractionRead, interactions);

/// One page of trust events.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrustEventListResponse {
	/// Trust events on this page.
	#[serde(default)]
	pub trust_events: Vec<TrustEventRead>,
	/// Rows across all pages.
	pub total: u64,
	/// Page size the server applied.
	pub limit: u64,
	/// Offset of the first row on this page.
	pub offset: u64,
}
paginated!(TrustEventListResponse, TrustEventRead, trust_events);

// Matchmaking

/// Why a candidate was suggested.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSuggestion {
	/// 0..1 confidence.
	#[serde(default)]
	pub match_score: Option<f64>,
	/// Human-readable reasons, strongest first.
	#[serde(default)]
	pub reasons: Vec<String>,
}

/// An AI-suggested connection. The candidate may be missing on sparse payloads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OpportunityRecord {
	/// Suggested person.
	#[serde(default)]
	pub candidate: Option<PersonRead>,
	/// Score and reasons.
	#[serde(default)]
	pub suggestion: MatchSuggestion,
}

// Organizations

/// New organization record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationCreate {
	/// Graph owner.
	pub owner_id: String,
	/// Organization name.
	pub name: String,
	/// E.g. `company` or `nonprofit`.
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	/// Homepage URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub website: Option<String>,
	/// Free text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Industry tags.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub sector_tags: Vec<String>,
	/// City or region.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	/// Headcount band such as `11-50`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub size_range: Option<String>,
}

/// Partial update; only set fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationUpdate {
	/// Organization name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Homepage URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub website: Option<String>,
	/// Free text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Replaces the whole list when set.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sector_tags: Option<Vec<String>>,
	/// City or region.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
}

/// An organization as the service stores it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRead {
	/// Stable id.
	pub organization_id: String,
	/// Graph owner.
	pub owner_id: String,
	/// Organization name.
	pub name: String,
	/// E.g. `company` or `nonprofit`.
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	/// Homepage URL.
	#[serde(default)]
	pub website: Option<String>,
	/// Free text.
	#[serde(default)]
	pub description: Option<String>,
	/// Industry tags.
	#[serde(default)]
	pub sector_tags: Vec<String>,
	/// City or region.
	#[serde(default)]
	pub location: Option<String>,
	/// Headcount band such as `11-50`.
	#[serde(default)]
	pub size_range: Option<String>,
	/// ISO-8601 creation time.
	#[serde(default)]
	pub created_at: Option<String>,
	/// ISO-8601 time of the last change.
	#[serde(default)]
	pub updated_at: Option<String>,
}

/// One page of organizations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizationListResponse {
	/// Organizations on this page.
	#[serde(default)]
	pub organizations: Vec<OrganizationRead>,
	/// Rows across all pages.
	pub total: u64,
	/// Page size the server applied.
	pub limit: u64,
	/// Offset of the first row on this page.
	pub offset: u64,
}
paginated!(OrganizationListResponse, OrganizationRead, organizations);

// Context tags

/// New context tag.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextTagCreate {
	/// Graph owner.
	pub owner_id: String,
	/// Tag text.
	pub label: String,
	/// Free text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Grouping for the tag.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
}

/// Partial update; only set fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextTagUpdate {
	/// Tag text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	/// Free text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Grouping for the tag.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
}

/// A context tag as the service stores it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextTagRead {
	/// Stable id.
	pub context_tag_id: String,
	/// Graph owner.
	pub owner_id: String,
	/// Tag text.
	pub label: String,
	/// Free text.
	#[serde(default)]
	pub description: Option<String>,
	/// Grouping for the tag.
	#[serde(default)]
	pub category: Option<String>,
	/// ISO-8601 creation time.
	#[serde(default)]
	pub created_at: Option<String>,
	/// ISO-8601 time of the last change.
	#[serde(default)]
	pub updated_at: Option<String>,
}

/// One page of context tags.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextTagListResponse {
	/// Tags on this page.
	#[serde(default)]
	pub context_tags: Vec<ContextTagRead>,
	/// Rows across all pages.
	pub total: u64,
	/// Page size the server applied.
	pub limit: u64,
	/// Offset of the first row on this page.
	pub offset: u64,
}
paginated!(ContextTagListResponse, ContextTagRead, context_tags);

// Contract v1 identity and account

/// Identity the service resolved for the current token.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolIdentity {
	/// Graph owner the token acts for.
	#[serde(default)]
	pub owner_id: Option<String>,
	/// The caller's own person record.
	#[serde(default)]
	pub person_id: Option<String>,
	/// Name to greet the caller with.
	#[serde(default)]
	pub display_name: Option<String>,
	/// App the token was issued to.
	#[serde(default)]
	pub app_id: Option<String>,
	/// Fields this client does not model.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Counts across the caller's graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
	/// People on file.
	#[serde(default)]
	pub people_count: u64,
	/// Relationships on file.
	#[serde(default)]
	pub relationship_count: u64,
	/// Interactions on file.
	#[serde(default)]
	pub interaction_count: u64,
	/// Mean relationship strength.
	#[serde(default)]
	pub average_strength: Option<f64>,
	/// Fields this client does not model.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The caller's subscription.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
	/// Plan id.
	#[serde(default)]
	pub plan_id: Option<String>,
	/// Plan name.
	#[serde(default)]
	pub name: Option<String>,
	/// E.g. `free` or `pro`.
	#[serde(default)]
	pub tier: Option<String>,
	/// E.g. `active` or `past_due`.
	#[serde(default)]
	pub status: Option<String>,
	/// Fields this client does not model.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Capabilities granted by the plan.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
	/// Capability names.
	#[serde(default)]
	pub capabilities: Vec<String>,
	/// Fields this client does not model.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Capabilities {
	/// Whether the plan grants `capability`.
	pub fn has(&self, capability: &str) -> bool {
		self.capabilities.iter().any(|c| c == capability)
	}
}

/// An installed module.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryModule {
	/// Module id.
	pub module_id: String,
	/// Module name.
	#[serde(default)]
	pub name: Option<String>,
	/// Installed version.
	#[serde(default)]
	pub version: Option<String>,
	/// Whether it is switched on.
	#[serde(default)]
	pub enabled: bool,
}

/// Installed modules.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryModuleList {
	/// Modules in install order.
	#[serde(default)]
	pub modules: Vec<RegistryModule>,
}

// Channels

/// New communication channel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelCreate {
	/// Graph owner.
	pub owner_id: String,
	/// Channel name.
	pub name: String,
	/// E.g. `email` or `in_person`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub channel_type: Option<String>,
	/// Free text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// Partial update; only set fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelUpdate {
	/// Channel name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// E.g. `email` or `in_person`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub channel_type: Option<String>,
	/// Free text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// A channel as the service stores it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelRead {
	/// Stable id.
	pub channel_id: String,
	/// Graph owner.
	pub owner_id: String,
	/// Channel name.
	pub name: String,
	/// E.g. `email` or `in_person`.
	#[serde(default)]
	pub channel_type: Option<String>,
	/// Free text.
	#[serde(default)]
	pub description: Option<String>,
	/// ISO-8601 creation time.
	#[serde(default)]
	pub created_at: Option<String>,
	/// ISO-8601 time of the last change.
	#[serde(default)]
	pub updated_at: Option<String>,
}

/// One page of channels.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelListResponse {
	/// Channels on this page.
	#[serde(default)]
	pub channels: Vec<ChannelRead>,
	/// Rows across all pages.
	pub total: u64,
	/// Page size the server applied.
	pub limit: u64,
	/// Offset of the first row on this page.
	pub offset: u64,
}
paginated!(ChannelListResponse, ChannelRead, channels);

/// How well a channel builds relationships.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelEffectiveness {
	/// Channel measured.
	pub channel_id: String,
	/// Set when scoped to one relationship.
	#[serde(default)]
	pub relationship_id: Option<String>,
	/// 0..1 score.
	#[serde(default)]
	pub effectiveness_score: f64,
	/// Interactions measured.
	#[serde(default)]
	pub interaction_count: u64,
	/// Mean strength change per interaction.
	#[serde(default)]
	pub average_strength_delta: Option<f64>,
}

/// Return on the interactions spent through a channel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelRoi {
	/// Channel measured.
	pub channel_id: String,
	/// Outcome per interaction.
	#[serde(default)]
	pub roi_score: f64,
	/// Interactions measured.
	#[serde(default)]
	pub total_interactions: u64,
	/// Interactions with a positive outcome.
	#[serde(default)]
	pub positive_outcomes: u64,
}

/// When a channel works best.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimalTiming {
	/// Channel measured.
	pub channel_id: String,
	/// Weekday names, best first.
	#[serde(default)]
	pub best_days: Vec<String>,
	/// Hours of the day, 0..=23.
	#[serde(default)]
	pub best_hours: Vec<u8>,
	/// 0..1 confidence in the recommendation.
	#[serde(default)]
	pub confidence: Option<f64>,
}

/// Effectiveness across every channel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelsAnalytics {
	/// Per-channel figures.
	#[serde(default)]
	pub channels: Vec<ChannelEffectiveness>,
	/// Interactions across all channels.
	#[serde(default)]
	pub total_interactions: u64,
	/// Best channel, when there is data.
	#[serde(default)]
	pub most_effective_channel_id: Option<String>,
}

// Custom attributes

/// New attribute on an entity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomAttributeCreate {
	/// Graph owner.
	pub owner_id: String,
	/// Kind of entity, e.g. `person`.
	pub entity_type: String,
	/// Entity the attribute belongs to.
	pub entity_id: String,
	/// Attribute name, unique per entity.
	pub attribute_key: String,
	/// Any JSON value.
	pub attribute_value: serde_json::Value,
	/// Declared type of the value, e.g. `string`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value_type: Option<String>,
}

/// Partial update; only set fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomAttributeUpdate {
	/// New value.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub attribute_value: Option<serde_json::Value>,
	/// Declared type of the value, e.g. `string`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value_type: Option<String>,
}

/// An attribute as the service stores it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomAttributeRead {
	/// Stable id.
	pub attribute_id: String,
	/// Graph owner.
	pub owner_id: String,
	/// Kind of entity, e.g. `person`.
	pub entity_type: String,
	/// Entity the attribute belongs to.
	pub entity_id: String,
	/// Attribute name, unique per entity.
	pub attribute_key: String,
	/// Any JSON value.
	#[serde(default)]
	pub attribute_value: serde_json::Value,
	/// Declared type of the value, e.g. `string`.
	#[serde(default)]
	pub value_type: Option<String>,
	/// ISO-8601 creation time.
	#[serde(default)]
	pub created_at: Option<String>,
	/// ISO-8601 time of the last change.
	#[serde(default)]
	pub updated_at: Option<String>,
}

/// One page of custom attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomAttributeListResponse {
	/// Attributes on this page.
	#[serde(default)]
	pub custom_attributes: Vec<CustomAttributeRead>,
	/// Rows across all pages.
	pub total: u64,
	/// Page size the server applied.
	pub limit: u64,
	/// Offset of the first row on this page.
	pub offset: u64,
}
paginated!(CustomAttributeListResponse, CustomAttributeRead, custom_attributes);

// Processes (internal)

/// New process.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessCreate {
	/// Person who owns the process.
	pub owner_person_id: String,
	/// Process name.
	pub name: String,
	/// Free text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Goal the process serves.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub goal_id: Option<String>,
	/// Process kind.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub process_type: Option<String>,
}

/// Partial update; only set fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessUpdate {
	/// Process name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Free text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// E.g. `active` or `paused`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
}

/// A process without its steps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessView {
	/// Process id.
	pub process_id: String,
	/// Person who owns the process.
	pub owner_person_id: String,
	/// Process name.
	pub name: String,
	/// Free text.
	#[serde(default)]
	pub description: Option<String>,
	/// Goal the process serves.
	#[serde(default)]
	pub goal_id: Option<String>,
	/// Process kind.
	#[serde(default)]
	pub process_type: Option<String>,
	/// Lifecycle state.
	#[serde(default)]
	pub status: Option<String>,
	/// ISO-8601 creation time.
	#[serde(default)]
	pub created_at: Option<String>,
	/// ISO-8601 time of the last change.
	#[serde(default)]
	pub updated_at: Option<String>,
}

/// New step appended to a process.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessStepCreate {
	/// Step name.
	pub name: String,
	/// Position within the process, from 1.
	pub step_order: u32,
	/// What the step does.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action_type: Option<String>,
	/// Action parameters; omitted when null.
	#[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
	pub config: serde_json::Value,
}

/// A process step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessStepView {
	/// Step id.
	pub step_id: String,
	/// Owning process.
	pub process_id: String,
	/// Step name.
	pub name: String,
	/// Position within the process, from 1.
	#[serde(default)]
	pub step_order: u32,
	/// What the step does.
	#[serde(default)]
	pub action_type: Option<String>,
	/// Lifecycle state.
	#[serde(default)]
	pub status: Option<String>,
}

/// A process with its steps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessDetailResponse {
	/// Flattened process fields.
	#[serde(flatten)]
	pub process: ProcessView,
	/// Steps in order.
	#[serde(default)]
	pub steps: Vec<ProcessStepView>,
}

/// Inputs for one step run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessExecutionRequest {
	/// Step inputs as JSON.
	#[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
	pub inputs: serde_json::Value,
}

/// Result of one step run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessExecutionResponse {
	/// Step that ran.
	pub step_id: String,
	/// E.g. `completed` or `failed`.
	pub status: String,
	/// Step output as JSON.
	#[serde(default)]
	pub output: serde_json::Value,
	/// Failure message, when the run failed.
	#[serde(default)]
	pub error: Option<String>,
}

/// One page of processes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessListResponse {
	/// Processes on this page.
	#[serde(default)]
	pub processes: Vec<ProcessView>,
	/// Rows across all pages.
	pub total: u64,
	/// Page size the server applied.
	pub limit: u64,
	/// Offset of the first row on this page.
	pub offset: u64,
}
paginated!(ProcessListResponse, ProcessView, processes);

// Agents (internal)

/// An agent identified by a DID.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DidAgentProfile {
	/// Decentralized identifier.
	pub did: String,
	/// Agent name.
	#[serde(default)]
	pub display_name: Option<String>,
	/// What the agent does.
	#[serde(default)]
	pub description: Option<String>,
	/// Capabilities the agent advertises.
	#[serde(default)]
	pub capabilities: Vec<String>,
}

/// One message to an agent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentChatRequest {
	/// Message text.
	pub message: String,
	/// Continues an earlier conversation when set.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub conversation_id: Option<String>,
}

/// An agent's reply.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentChatResponse {
	/// Reply text.
	pub reply: String,
	/// Continues an earlier conversation when set.
	#[serde(default)]
	pub conversation_id: Option<String>,
}

/// A planned task toward a goal.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalTaskResponse {
	/// Goal planned for.
	pub goal_id: String,
	/// Task id, once one is created.
	#[serde(default)]
	pub task_id: Option<String>,
	/// Plan summary.
	#[serde(default)]
	pub summary: Option<String>,
	/// Planned steps in order.
	#[serde(default)]
	pub steps: Vec<String>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::protocol::pagination::Paginated;

	#[test]
	fn relationship_detail_flattens_base_fields() {
		let json = r#"{
			"relationships": [{
				"relationship_id": "r1",
				"owner_id": "o",
				"source_person_id": "me",
				"target_person_id": "p1",
				"strength_score": 0.7,
				"interaction_count": 3
			}],
			"total": 1, "limit": 50, "offset": 0
		}"#;
		let page: RelationshipListResponse = serde_json::from_str(json).unwrap();
		let detail = &page.items()[0];
		assert_eq!(detail.relationship.target_person_id, "p1");
		assert_eq!(detail.relationship.strength_score, 0.7);
		assert_eq!(detail.interaction_count, 3);
		assert!(!page.has_more());
	}

	#[test]
	fn missing_required_field_fails_decode() {
		let json = r#"{"people":[{"owner_id":"o"}],"total":1,"limit":1,"offset":0}"#;
		assert!(serde_json::from_str::<PersonListResponse>(json).is_err());
	}

	#[test]
	fn display_name_falls_back() {
		let mut person = PersonRead {
			person_id: "p".into(),
			owner_id: "o".into(),
			..PersonRead::default()
		};
		assert_eq!(person.display_name(), "Anonymous");
		person.legal_name = Some("Ada Lovelace".into());
		assert_eq!(person.display_name(), "Ada Lovelace");
		person.preferred_name = Some("Ada".into());
		assert_eq!(person.display_name(), "Ada");
	}

	#[test]
	fn unknown_identity_fields_are_kept() {
		let me: ProtocolIdentity =
			serde_json::from_str(r#"{"owner_id":"o","person_id":"p","region":"eu"}"#).unwrap();
		assert_eq!(me.owner_id.as_deref(), Some("o"));
		assert_eq!(me.extra.get("region"), Some(&serde_json::json!("eu")));
	}

	#[test]
	fn process_detail_flattens_process() {
		let json = r#"{
			"process_id": "pr1", "owner_person_id": "me", "name": "Intro",
			"steps": [{"step_id": "s1", "process_id": "pr1", "name": "Draft", "step_order": 1}]
		}"#;
		let detail: ProcessDetailResponse = serde_json::from_str(json).unwrap();
		assert_eq!(detail.process.name, "Intro");
		assert_eq!(detail.steps[0].step_order, 1);
	}

	#[test]
	fn create_payload_omits_unset_fields() {
		let body = PersonCreate {
			owner_id: "o".into(),
			preferred_name: Some("Grace".into()),
			..PersonCreate::default()
		};
		assert_eq!(
			serde_json::to_value(&body).unwrap(),
			serde_json::json!({"owner_id":"o","preferred_name":"Grace"})
		);
	}
}
