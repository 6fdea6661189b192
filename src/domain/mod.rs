use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The platform a remote artifact originates from. Determines which
/// resolver grammar, fetcher, and upsert mutation apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    YouTubeLive,
    YouTubeVideo,
    NiconicoVideo,
    TwitterPost,
}

impl PlatformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::YouTubeLive => "youtube_live",
            PlatformKind::YouTubeVideo => "youtube_video",
            PlatformKind::NiconicoVideo => "niconico_video",
            PlatformKind::TwitterPost => "twitter_post",
        }
    }
}

/// A canonical platform-specific identifier. Never carries the original URL;
/// `canonical_id` always matches the platform's ID grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteIdentifier {
    pub platform: PlatformKind,
    pub canonical_id: String,
}

/// Raw authoritative metadata as fetched from the originating platform,
/// before derived fields are computed. Absent sub-fields are meaningful
/// (e.g. a plain video has no live-streaming details), not errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FetchedMetadata {
    YouTube(YouTubeVideoMetadata),
    Niconico(NiconicoVideoMetadata),
    Twitter(TwitterPostMetadata),
}

/// One item from the YouTube videos endpoint. `snippet` and
/// `liveStreamingDetails` are independently nullable upstream, so every
/// field here is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeVideoMetadata {
    pub remote_video_id: String,
    pub title: Option<String>,
    pub channel_id: Option<String>,
    pub channel_name: Option<String>,
    pub published_at: Option<DateTime<FixedOffset>>,
    pub live_broadcast_content: Option<String>,
    pub actual_start_time: Option<DateTime<FixedOffset>>,
    pub actual_end_time: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NiconicoVideoMetadata {
    pub remote_content_id: String,
    pub title: String,
    pub registered_at: DateTime<FixedOffset>,
    pub thumbnail_url: String,
    pub owner_id: i64,
    pub owner_name: String,
}

/// The oEmbed response for a tweet. `post_url` is the canonical URL after
/// redirects; its last path segment is the authoritative remote tweet ID,
/// which may differ from the caller-supplied one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterPostMetadata {
    pub author_url: String,
    pub author_name: String,
    pub post_url: String,
    pub html: String,
}

/// A remote channel/account attached to an artifact: the platform-side ID
/// plus its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAccount {
    pub remote_id: String,
    pub name: String,
}

/// Fetched + derived metadata reshaped into the fields the datastore
/// mutations expect. All timestamps are JST-referenced, timezone-aware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NormalizedArtifact {
    YouTubeLive(YouTubeLiveArtifact),
    YouTubeVideo(YouTubeVideoArtifact),
    NiconicoVideo(NiconicoVideoArtifact),
    TwitterPost(TwitterPostArtifact),
}

impl NormalizedArtifact {
    pub fn platform(&self) -> PlatformKind {
        match self {
            NormalizedArtifact::YouTubeLive(_) => PlatformKind::YouTubeLive,
            NormalizedArtifact::YouTubeVideo(_) => PlatformKind::YouTubeVideo,
            NormalizedArtifact::NiconicoVideo(_) => PlatformKind::NiconicoVideo,
            NormalizedArtifact::TwitterPost(_) => PlatformKind::TwitterPost,
        }
    }

    pub fn remote_id(&self) -> &str {
        match self {
            NormalizedArtifact::YouTubeLive(a) => &a.remote_video_id,
            NormalizedArtifact::YouTubeVideo(a) => &a.remote_video_id,
            NormalizedArtifact::NiconicoVideo(a) => &a.remote_content_id,
            NormalizedArtifact::TwitterPost(a) => &a.remote_tweet_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeLiveArtifact {
    pub remote_video_id: String,
    pub title: String,
    pub channel: RemoteAccount,
    pub start_time: Option<DateTime<FixedOffset>>,
    pub end_time: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeVideoArtifact {
    pub remote_video_id: String,
    pub title: String,
    pub channel: RemoteAccount,
    pub post_time: Option<DateTime<FixedOffset>>,
    pub is_premiere: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NiconicoVideoArtifact {
    pub remote_content_id: String,
    pub title: String,
    pub account: RemoteAccount,
    pub start_time: DateTime<FixedOffset>,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterPostArtifact {
    pub remote_tweet_id: String,
    pub tweet_time: DateTime<FixedOffset>,
    pub embed_html: String,
    pub screen_name: String,
    pub author_name: String,
}

/// An ordered tweet image: zero-based index + URL. At most one per
/// announcement in the current schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetImage {
    pub index: i32,
    pub url: String,
}

/// Operator-chosen foreign keys for the upsert. Which fields are required
/// depends on the platform: Niconico needs a project, Twitter needs a
/// pre-registered account (resolved by screen name when not given).
#[derive(Debug, Clone, Default)]
pub struct AssociationSelection {
    pub project_id: Option<Uuid>,
    pub program_id: Option<Uuid>,
    pub person_id: Option<Uuid>,
    pub twitter_account_id: Option<Uuid>,
    pub tweet_image: Option<TweetImage>,
}

/// The datastore-assigned ID of the created-or-merged artifact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertResult {
    pub database_id: String,
}

/// A selectable project/person/account row for the operator-facing dropdowns.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRow {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwitterAccountRow {
    pub id: Uuid,
    pub twitter_screen_name: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgramRow {
    pub id: Uuid,
    pub title: String,
}

/// Dropdown seed data for the operator UI layer.
#[derive(Debug, Clone, Default)]
pub struct InitialData {
    pub projects: Vec<NamedRow>,
    pub persons: Vec<NamedRow>,
    pub twitter_accounts: Vec<TwitterAccountRow>,
}
