//! Paging requests, query strings and list envelopes.

use std::future::Future;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::error::ProtocolError;

/// Pages are numbered from one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Paging request accepted by every list endpoint.
///
/// Either `page`/`page_size` or the legacy `limit`/`offset` pair may be set.
/// Zero values count as unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
	/// One-based page number.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page: Option<u32>,
	/// Rows per page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page_size: Option<u32>,
	/// Legacy page size.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub limit: Option<u32>,
	/// Legacy row offset, rounded down to its page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub offset: Option<u32>,
}

impl Pagination {
	/// Page-number paging.
	pub fn page(page: u32, page_size: u32) -> Self {
		Self {
			page: Some(page),
			page_size: Some(page_size),
			..Self::default()
		}
	}

	/// `limit`/`offset` paging.
	pub fn legacy(limit: u32, offset: u32) -> Self {
		Self {
			limit: Some(limit),
			offset: Some(offset),
			..Self::default()
		}
	}

	/// Resolves to the `(page, page_size)` pair sent on the wire.
	pub fn normalize(&self) -> (u32, u32) {
		let page_size = nonzero(self.page_size)
			.or(nonzero(self.limit))
			.unwrap_or(DEFAULT_PAGE_SIZE);
		let page = nonzero(self.page)
			.or_else(|| self.offset.map(|offset| offset / page_size + 1))
			.unwrap_or(DEFAULT_PAGE);
		(page, page_size)
	}
}

fn nonzero(value: Option<u32>) -> Option<u32> {
	value.filter(|v| *v > 0)
}

/// Query string under construction. Keeps insertion order and allows repeats.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
	pairs: Vec<(String, String)>,
}

impl QueryParams {
	/// Empty query.
	pub fn new() -> Self {
		Self::default()
	}

	/// Query holding only the paging pair.
	pub fn with_pagination(pagination: Option<&Pagination>) -> Self {
		let mut query = Self::new();
		query.paginate(pagination);
		query
	}

	/// Appends `page` and `page_size`, defaults included.
	pub fn paginate(&mut self, pagination: Option<&Pagination>) -> &mut Self {
		let (page, page_size) = pagination.copied().unwrap_or_default().normalize();
		self.push("page", page);
		self.push("page_size", page_size)
	}

	/// Appends unconditionally.
	pub fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
		self.pairs.push((key.to_string(), value.to_string()));
		self
	}

	/// Appends only when present and non-empty.
	pub fn push_opt<S: AsRef<str>>(&mut self, key: &str, value: Option<S>) -> &mut Self {
		if let Some(value) = value {
			let value = value.as_ref();
			if !value.is_empty() {
				self.push(key, value);
			}
		}
		self
	}

	/// Appends a number when present.
	pub fn push_num<N: ToString>(&mut self, key: &str, value: Option<N>) -> &mut Self {
		if let Some(value) = value {
			self.push(key, value);
		}
		self
	}

	/// Arrays go out as repeated `key=a&key=b`, never comma-joined.
	pub fn push_all<S: AsRef<str>>(&mut self, key: &str, values: &[S]) -> &mut Self {
		for value in values {
			self.push_opt(key, Some(value));
		}
		self
	}

	/// True when nothing was pushed.
	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}

	/// Pairs in insertion order.
	pub fn pairs(&self) -> &[(String, String)] {
		&self.pairs
	}

	/// Encoded form, e.g. `page=2&page_size=10`.
	pub fn encode(&self) -> String {
		url::form_urlencoded::Serializer::new(String::new())
			.extend_pairs(self.pairs.iter())
			.finish()
	}
}

/// List responses: `{ <items>: [...], total, limit, offset }`.
pub trait Paginated {
	/// Row type.
	type Item;

	/// Rows on this page.
	fn items(&self) -> &[Self::Item];
	/// Rows across all pages.
	fn total(&self) -> u64;
	/// Page size the server applied.
	fn limit(&self) -> u64;
	/// Offset of the first row on this page.
	fn offset(&self) -> u64;

	/// Whether rows remain after this page.
	fn has_more(&self) -> bool {
		self.offset() + (self.items().len() as u64) < self.total()
	}

	/// The page that follows this one, in the same page size.
	fn next_page(&self) -> Option<Pagination> {
		if !self.has_more() || self.limit() == 0 {
			return None;
		}
		let next_offset = self.offset() + self.items().len() as u64;
		let limit = u32::try_from(self.limit()).ok()?;
		Some(Pagination::legacy(limit, u32::try_from(next_offset).ok()?))
	}

	/// Rejects envelopes that break the paging invariants callers rely on.
	fn validate(&self) -> Result<(), ProtocolError> {
		let len = self.items().len() as u64;
		if len > self.limit() {
			return Err(ProtocolError::InvalidEnvelope(format!(
				"{len} items exceeds limit {}",
				self.limit()
			)));
		}
		if self.offset() + len > self.total() {
			return Err(ProtocolError::InvalidEnvelope(format!(
				"offset {} + {len} items exceeds total {}",
				self.offset(),
				self.total()
			)));
		}
		Ok(())
	}
}

/// Implements [`Paginated`] for a list response whose items live under `$field`.
macro_rules! paginated {
	($ty:ty, $item:ty, $field:ident) => {
		impl $crate::protocol::pagination::Paginated for $ty {
			type Item = $item;

			fn items(&self) -> &[$item] {
				&self.$field
			}

			fn total(&self) -> u64 {
				self.total
			}

			fn limit(&self) -> u64 {
				self.limit
			}

			fn offset(&self) -> u64 {
				self.offset
			}
		}
	};
}
pub(crate) use paginated;

/// Follows [`Paginated::next_page`] from `first` until the server runs out of
/// rows or `cap` items are held. Returns the items with the last reported total.
pub async fn collect_pages<P, F, Fut>(
	first: Pagination,
	cap: Option<usize>,
	mut fetch: F,
) -> Result<(Vec<P::Item>, u64), ProtocolError>
where
	P: Paginated,
	P::Item: Clone,
	F: FnMut(Pagination) -> Fut,
	Fut: Future<Output = Result<P, ProtocolError>>,
{
	let mut items = Vec::new();
	let mut current = first;
	loop {
		let page = fetch(current).await?;
		let total = page.total();
		items.extend_from_slice(page.items());
		if let Some(cap) = cap.filter(|cap| items.len() >= *cap) {
			items.truncate(cap);
			return Ok((items, total));
		}
		let next = match page.next_page() {
			Some(next) if !page.items().is_empty() => next,
			_ => return Ok((items, total)),
		};
		// A short page mid-list maps back onto the page just read.
		if next.normalize() == current.normalize() {
			warn!("short page at offset {}, stopping after {} items", page.offset(), items.len());
			return Ok((items, total));
		}
		debug!("fetched {} of {total}, requesting {:?}", items.len(), next.normalize());
		current = next;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Page {
		items: Vec<u8>,
		total: u64,
		limit: u64,
		offset: u64,
	}
	paginated!(Page, u8, items);

	#[test]
	fn page_pair_passes_through() {
		let query = QueryParams::with_pagination(Some(&Pagination::page(2, 10)));
		assert_eq!(query.encode(), "page=2&page_size=10");
	}

	#[test]
	fn legacy_pair_maps_to_page() {
		let query = QueryParams::with_pagination(Some(&Pagination::legacy(10, 20)));
		assert_eq!(query.encode(), "page=3&page_size=10");
	}

	#[test]
	fn defaults_to_first_page_of_fifty() {
		assert_eq!(QueryParams::with_pagination(None).encode(), "page=1&page_size=50");
		assert_eq!(Pagination::default().normalize(), (1, 50));
	}

	#[test]
	fn limit_alone_sets_page_size() {
		let pagination = Pagination {
			limit: Some(25),
			..Pagination::default()
		};
		assert_eq!(pagination.normalize(), (1, 25));
	}

	#[test]
	fn zero_values_are_ignored() {
		let pagination = Pagination {
			page: Some(0),
			page_size: Some(0),
			limit: Some(0),
			offset: Some(0),
		};
		assert_eq!(pagination.normalize(), (1, 50));
	}

	#[test]
	fn offset_inside_a_page_rounds_down() {
		assert_eq!(Pagination::legacy(10, 25).normalize(), (3, 10));
	}

	#[test]
	fn arrays_are_repeated_and_empty_filters_skipped() {
		let mut query = QueryParams::new();
		query
			.push_opt("name", Some(""))
			.push_opt("email", None::<&str>)
			.push_all("tags", &["rust", "", "wasm"]);
		assert_eq!(query.encode(), "tags=rust&tags=wasm");
	}

	#[test]
	fn has_more_and_next_page() {
		let page = Page {
			items: vec![1; 10],
			total: 25,
			limit: 10,
			offset: 10,
		};
		assert!(page.has_more());
		assert_eq!(page.next_page().map(|p| p.normalize()), Some((3, 10)));

		let last = Page {
			items: vec![1; 5],
			total: 25,
			limit: 10,
			offset: 20,
		};
		assert!(!last.has_more());
		assert!(last.next_page().is_none());
	}

	fn serve(total: u64, calls: &std::cell::RefCell<Vec<(u32, u32)>>, page: Pagination) -> Page {
		let (number, size) = page.normalize();
		calls.borrow_mut().push((number, size));
		let offset = u64::from((number - 1) * size);
		let len = u64::from(size).min(total.saturating_sub(offset));
		Page {
			items: vec![0; len as usize],
			total,
			limit: u64::from(size),
			offset,
		}
	}

	#[test]
	fn collect_follows_every_page() {
		let calls = std::cell::RefCell::new(Vec::new());
		let (items, total) = futures::executor::block_on(collect_pages(
			Pagination::page(1, 10),
			None,
			|page| std::future::ready(Ok::<_, ProtocolError>(serve(25, &calls, page))),
		))
		.unwrap();
		assert_eq!((items.len(), total), (25, 25));
		assert_eq!(calls.into_inner(), vec![(1, 10), (2, 10), (3, 10)]);
	}

	#[test]
	fn collect_stops_at_cap() {
		let calls = std::cell::RefCell::new(Vec::new());
		let (items, total) = futures::executor::block_on(collect_pages(
			Pagination::page(1, 20),
			Some(30),
			|page| std::future::ready(Ok::<_, ProtocolError>(serve(100, &calls, page))),
		))
		.unwrap();
		assert_eq!((items.len(), total), (30, 100));
		assert_eq!(calls.borrow().len(), 2);
	}

	#[test]
	fn collect_stops_on_short_page() {
		let mut calls = 0;
		let (items, _) = futures::executor::block_on(collect_pages(Pagination::page(1, 10), None, |_| {
			calls += 1;
			std::future::ready(Ok::<_, ProtocolError>(Page {
				items: vec![0; 4],
				total: 30,
				limit: 10,
				offset: 0,
			}))
		}))
		.unwrap();
		assert_eq!((items.len(), calls), (4, 1));
	}

	#[test]
	fn collect_propagates_errors() {
		let result = futures::executor::block_on(collect_pages(Pagination::default(), None, |_| {
			std::future::ready(Err::<Page, _>(ProtocolError::InvalidEnvelope("bad".into())))
		}));
		assert!(matches!(result, Err(ProtocolError::InvalidEnvelope(_))));
	}

	#[test]
	fn envelope_invariants_are_checked() {
		let oversized = Page {
			items: vec![1; 11],
			total: 100,
			limit: 10,
			offset: 0,
		};
		assert!(matches!(oversized.validate(), Err(ProtocolError::InvalidEnvelope(_))));

		let past_total = Page {
			items: vec![1; 5],
			total: 3,
			limit: 10,
			offset: 0,
		};
		assert!(past_total.validate().is_err());

		let empty = Page {
			items: vec![],
			total: 0,
			limit: 50,
			offset: 0,
		};
		assert!(empty.validate().is_ok());
	}
}
