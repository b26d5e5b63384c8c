use super::client::{ApiRequest, ProtocolClient};
use super::error::Result;
use super::pagination::{Paginated, Pagination, QueryParams};
use super::types::{ContextTagCreate, ContextTagListResponse, ContextTagRead, ContextTagUpdate};

const CONTEXT_TAGS: &str = "/v1/protocol/context-tags";
const AUTOCOMPLETE_LIMIT: u32 = 10;

/// Filters for [`ContextTagsClient::list_context_tags`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContextTagsQuery {
	/// Tag category.
	pub category: Option<String>,
	/// Free-text match on the tag name.
	pub search: Option<String>,
	/// Defaults to the first page of 50.
	pub pagination: Option<Pagination>,
}

/// Context tag endpoints.
#[derive(Clone)]
pub struct ContextTagsClient {
	client: ProtocolClient,
}

impl ContextTagsClient {
	/// Client sharing `client`'s contract.
	pub fn new(client: ProtocolClient) -> Self {
		Self { client }
	}

	/// Files a new tag.
	pub async fn create_context_tag(&self, tag: &ContextTagCreate) -> Result<ContextTagRead> {
		self.client.send(ApiRequest::post(CONTEXT_TAGS).json(tag)?).await
	}

	/// One tag.
	pub async fn get_context_tag(&self, tag_id: &str) -> Result<ContextTagRead> {
		self.client
			.send(ApiRequest::get(CONTEXT_TAGS).segment(tag_id))
			.await
	}

	/// Partial update.
	pub async fn update_context_tag(
		&self,
		tag_id: &str,
		updates: &ContextTagUpdate,
	) -> Result<ContextTagRead> {
		self.client
			.send(ApiRequest::patch(CONTEXT_TAGS).segment(tag_id).json(updates)?)
			.await
	}

	/// Accepts `204`.
	pub async fn delete_context_tag(&self, tag_id: &str) -> Result<()> {
		self.client
			.send_empty(ApiRequest::delete(CONTEXT_TAGS).segment(tag_id))
			.await
	}

	/// One page of tags.
	pub async fn list_context_tags(&self, params: &ContextTagsQuery) -> Result<ContextTagListResponse> {
		let mut query = QueryParams::with_pagination(params.pagination.as_ref());
		query
			.push_opt("category", params.category.as_deref())
			.push_opt("search", params.search.as_deref());
		let page: ContextTagListResponse = self
			.client
			.send(ApiRequest::get(CONTEXT_TAGS).query(query))
			.await?;
		page.validate()?;
		Ok(page)
	}

	/// Prefix search; `limit` defaults to 10.
	pub async fn autocomplete(&self, prefix: &str, limit: Option<u32>) -> Result<Vec<ContextTagRead>> {
		let mut query = QueryParams::new();
		query
			.push("q", prefix)
			.push("limit", limit.unwrap_or(AUTOCOMPLETE_LIMIT));
		self.client
			.send(ApiRequest::get(CONTEXT_TAGS).segment("autocomplete").query(query))
			.await
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::*;
	use crate::protocol::client::testing::{FakeTransport, client};

	#[test]
	fn list_puts_paging_first() {
		let transport = FakeTransport::new();
		transport.reply(200, r#"{"context_tags":[],"total":0,"limit":20,"offset":0}"#);
		let tags = ContextTagsClient::new(client(&transport));
		let params = ContextTagsQuery {
			category: Some("industry".into()),
			search: None,
			pagination: Some(Pagination {
				limit: Some(20),
				..Pagination::default()
			}),
		};
		block_on(tags.list_context_tags(&params)).unwrap();
		assert_eq!(
			transport.last_request().url.query(),
			Some("page=1&page_size=20&category=industry")
		);
	}

	#[test]
	fn autocomplete_defaults_limit() {
		let transport = FakeTransport::new();
		transport.reply(
			200,
			r#"[{"context_tag_id":"t1","owner_id":"owner-1","label":"rust"}]"#,
		);
		let tags = ContextTagsClient::new(client(&transport));
		let found = block_on(tags.autocomplete("ru st", None)).unwrap();
		assert_eq!(found[0].label, "rust");
		let request = transport.last_request();
		assert_eq!(request.url.path(), "/v1/protocol/context-tags/autocomplete");
		assert_eq!(request.url.query(), Some("q=ru+st&limit=10"));
	}
}
