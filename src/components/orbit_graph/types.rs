use crate::protocol::types::{OpportunityRecord, PersonRead, RelationshipDetail, RelationshipRead};

/// A person the graph can place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttendeeNode {
	/// Protocol person id; also the node key.
	pub person_id: String,
	/// Name shown in labels and read to screen readers.
	pub display_name: String,
	/// Avatar, when the record has one.
	pub image_url: Option<String>,
	/// Free-form tags from the person record.
	pub tags: Vec<String>,
}

impl AttendeeNode {
	/// Up to two uppercase initials for the avatar fallback.
	pub fn initials(&self) -> String {
		self.display_name
			.split_whitespace()
			.filter_map(|word| word.chars().next())
			.take(2)
			.flat_map(char::to_uppercase)
			.collect()
	}
}

impl From<&PersonRead> for AttendeeNode {
	fn from(person: &PersonRead) -> Self {
		Self {
			person_id: person.person_id.clone(),
			display_name: person.display_name().to_string(),
			image_url: person.image_url.clone(),
			tags: person.tags.clone(),
		}
	}
}

/// A weighted link from the current user to an attendee.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelationshipEdge {
	/// Usually the current user.
	pub source_person_id: String,
	/// Attendee the strength applies to.
	pub target_person_id: String,
	/// 0..1; drives edge alpha and the pulse.
	pub strength: f64,
}

impl From<&RelationshipRead> for RelationshipEdge {
	fn from(relationship: &RelationshipRead) -> Self {
		Self {
			source_person_id: relationship.source_person_id.clone(),
			target_person_id: relationship.target_person_id.clone(),
			strength: relationship.strength_score,
		}
	}
}

impl From<&RelationshipDetail> for RelationshipEdge {
	fn from(detail: &RelationshipDetail) -> Self {
		Self::from(&detail.relationship)
	}
}

/// Score shown when a suggestion arrives without one.
const DEFAULT_MATCH_SCORE: f64 = 0.95;
const DEFAULT_MATCH_REASON: &str = "High affinity match";

/// A suggested connection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OpportunityMatch {
	/// The suggested attendee.
	pub candidate_person_id: String,
	/// Candidate name for the match card.
	pub display_name: String,
	/// 0..1 match score.
	pub score: f64,
	/// First reason given for the match.
	pub reason: String,
}

impl OpportunityMatch {
	/// `None` when the record carries no candidate.
	pub fn from_record(record: &OpportunityRecord) -> Option<Self> {
		let candidate = record.candidate.as_ref().filter(|c| !c.person_id.is_empty())?;
		Some(Self {
			candidate_person_id: candidate.person_id.clone(),
			display_name: candidate.display_name().to_string(),
			score: record.suggestion.match_score.unwrap_or(DEFAULT_MATCH_SCORE),
			reason: record
				.suggestion
				.reasons
				.first()
				.cloned()
				.unwrap_or_else(|| DEFAULT_MATCH_REASON.to_string()),
		})
	}

	/// The candidate as a graph attendee, preferring the loaded record.
	pub fn candidate_in(&self, attendees: &[AttendeeNode]) -> AttendeeNode {
		attendees
			.iter()
			.find(|a| a.person_id == self.candidate_person_id)
			.cloned()
			.unwrap_or_else(|| AttendeeNode {
				person_id: self.candidate_person_id.clone(),
				display_name: self.display_name.clone(),
				..AttendeeNode::default()
			})
	}

	/// Score as a whole percentage for the callout.
	pub fn score_percent(&self) -> u32 {
		(self.score.clamp(0.0, 1.0) * 100.0).round() as u32
	}
}

/// Everything the canvas renders from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetworkData {
	/// In priority order; the first ones land on the inner ring.
	pub attendees: Vec<AttendeeNode>,
	/// Strengths by target attendee.
	pub relationships: Vec<RelationshipEdge>,
	/// Candidates to highlight.
	pub opportunities: Vec<OpportunityMatch>,
}

/// A positioned slot on a ring. `attendee == None` is a placeholder.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitNode {
	/// `None` for placeholders.
	pub attendee: Option<AttendeeNode>,
	/// Offset from the centre before ring rotation.
	pub x: f64,
	/// See `x`.
	pub y: f64,
	/// Strength of the edge to this node, 0 when unknown.
	pub strength: f64,
	/// Set when the attendee is a suggested match.
	pub is_opportunity: bool,
	/// Person id, or `placeholder-{index}`.
	pub key: String,
}

impl OrbitNode {
	/// True for padding slots.
	pub fn is_placeholder(&self) -> bool {
		self.attendee.is_none()
	}
}

/// Device class picked from the viewport width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewportClass {
	/// Below the breakpoint.
	Mobile,
	/// At or above the breakpoint.
	Desktop,
}

impl ViewportClass {
	/// Strictly narrower than the breakpoint is mobile.
	pub fn from_width(width: f64, mobile_breakpoint: u32) -> Self {
		if width < f64::from(mobile_breakpoint) {
			Self::Mobile
		} else {
			Self::Desktop
		}
	}
}

/// One orbit and its nodes, evenly spaced.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
	/// Pixels from the centre.
	pub radius: f64,
	/// Nodes at even angles, starting at 0 degrees.
	pub nodes: Vec<OrbitNode>,
}

/// Output of one layout pass: inner, middle and outer rings.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitLayout {
	/// Class the layout was computed for.
	pub viewport: ViewportClass,
	/// Avatar diameter in pixels.
	pub node_size: u32,
	/// Inner, middle, outer.
	pub rings: [Ring; 3],
}

impl OrbitLayout {
	/// Closest connections.
	pub fn inner(&self) -> &[OrbitNode] {
		&self.rings[0].nodes
	}

	/// Second ring.
	pub fn middle(&self) -> &[OrbitNode] {
		&self.rings[1].nodes
	}

	/// Everyone else that fits.
	pub fn outer(&self) -> &[OrbitNode] {
		&self.rings[2].nodes
	}

	/// All nodes, inner ring first.
	pub fn nodes(&self) -> impl Iterator<Item = &OrbitNode> {
		self.rings.iter().flat_map(|ring| ring.nodes.iter())
	}

	/// Node count per ring.
	pub fn ring_sizes(&self) -> [usize; 3] {
		[
			self.rings[0].nodes.len(),
			self.rings[1].nodes.len(),
			self.rings[2].nodes.len(),
		]
	}

	/// Nodes backed by a real attendee.
	pub fn attendee_count(&self) -> usize {
		self.nodes().filter(|n| !n.is_placeholder()).count()
	}

	/// Padding slots.
	pub fn placeholder_count(&self) -> usize {
		self.nodes().filter(|n| n.is_placeholder()).count()
	}

	/// Node by key.
	pub fn find(&self, key: &str) -> Option<&OrbitNode> {
		self.nodes().find(|n| n.key == key)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::protocol::types::MatchSuggestion;

	#[test]
	fn opportunity_fills_card_defaults() {
		let record = OpportunityRecord {
			candidate: Some(PersonRead {
				person_id: "p9".into(),
				preferred_name: Some("Grace".into()),
				..PersonRead::default()
			}),
			suggestion: MatchSuggestion::default(),
		};
		let top = OpportunityMatch::from_record(&record).unwrap();
		assert_eq!(top.display_name, "Grace");
		assert_eq!(top.score_percent(), 95);
		assert_eq!(top.reason, "High affinity match");
		assert!(OpportunityMatch::from_record(&OpportunityRecord::default()).is_none());
	}

	#[test]
	fn candidate_prefers_loaded_attendee() {
		let top = OpportunityMatch {
			candidate_person_id: "p1".into(),
			display_name: "Grace".into(),
			..OpportunityMatch::default()
		};
		let loaded = AttendeeNode {
			person_id: "p1".into(),
			display_name: "Grace Hopper".into(),
			tags: vec!["navy".into()],
			..AttendeeNode::default()
		};
		assert_eq!(top.candidate_in(&[loaded.clone()]), loaded);
		assert_eq!(top.candidate_in(&[]).display_name, "Grace");
	}
}
