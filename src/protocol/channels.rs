use super::client::{ApiRequest, ProtocolClient};
use super::error::Result;
use super::pagination::{Paginated, Pagination, QueryParams};
use super::types::{
	ChannelCreate, ChannelEffectiveness, ChannelListResponse, ChannelRead, ChannelRoi,
	ChannelUpdate, ChannelsAnalytics, OptimalTiming,
};

const CHANNEL: &str = "/v1/protocol/channel";
const CHANNELS: &str = "/v1/protocol/channels";

/// Filters for [`ChannelsClient::list_channels`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelsQuery {
	/// Free-text match on the channel name.
	pub search: Option<String>,
	/// Defaults to the first page of 50.
	pub pagination: Option<Pagination>,
}

/// Communication channels and their effectiveness analytics.
#[derive(Clone)]
pub struct ChannelsClient {
	client: ProtocolClient,
}

impl ChannelsClient {
	/// Client sharing `client`'s contract.
	pub fn new(client: ProtocolClient) -> Self {
		Self { client }
	}

	/// Files a new channel.
	pub async fn create_channel(&self, channel: &ChannelCreate) -> Result<ChannelRead> {
		self.client.send(ApiRequest::post(CHANNEL).json(channel)?).await
	}

	/// One channel.
	pub async fn get_channel(&self, channel_id: &str) -> Result<ChannelRead> {
		self.client
			.send(ApiRequest::get(CHANNEL).segment(channel_id))
			.await
	}

	/// Partial update.
	pub async fn update_channel(
		&self,
		channel_id: &str,
		updates: &ChannelUpdate,
	) -> Result<ChannelRead> {
		let request = ApiRequest::patch(CHANNEL).segment(channel_id).json(updates)?;
		self.client.send(request).await
	}

	/// Accepts `204`.
	pub async fn delete_channel(&self, channel_id: &str) -> Result<()> {
		self.client
			.send_empty(ApiRequest::delete(CHANNEL).segment(channel_id))
			.await
	}

	/// One page of channels; the envelope is validated.
	pub async fn list_channels(&self, params: &ChannelsQuery) -> Result<ChannelListResponse> {
		let mut query = QueryParams::with_pagination(params.pagination.as_ref());
		query.push_opt("search", params.search.as_deref());
		let page: ChannelListResponse = self
			.client
			.send(ApiRequest::get(CHANNELS).query(query))
			.await?;
		page.validate()?;
		Ok(page)
	}

	/// Scoped to one relationship when `relationship_id` is given.
	pub async fn channel_effectiveness(
		&self,
		channel_id: &str,
		relationship_id: Option<&str>,
	) -> Result<ChannelEffectiveness> {
		let mut query = QueryParams::new();
		query.push_opt("relationship_id", relationship_id);
		self.client
			.send(
				ApiRequest::get(CHANNEL)
					.segment(channel_id)
					.segment("effectiveness")
					.query(query),
			)
			.await
	}

	/// Return on the interactions spent through a channel.
	pub async fn channel_roi(&self, channel_id: &str) -> Result<ChannelRoi> {
		self.client
			.send(ApiRequest::get(CHANNEL).segment(channel_id).segment("roi"))
			.await
	}

	/// Best days and hours to reach out on a channel.
	pub async fn optimal_timing(&self, channel_id: &str) -> Result<OptimalTiming> {
		self.client
			.send(ApiRequest::get(CHANNEL).segment(channel_id).segment("timing"))
			.await
	}

	/// Effectiveness across every channel.
	pub async fn channels_analytics(&self) -> Result<ChannelsAnalytics> {
		self.client
			.send(ApiRequest::get(CHANNELS).segment("analytics"))
			.await
	}
}
