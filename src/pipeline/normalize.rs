use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use url::Url;

use crate::common::constants::{TWITTER_SNOWFLAKE_EPOCH_MS, TWITTER_WIDGET_SCRIPT_TAG};
use crate::common::error::{IngestError, Result};
use crate::domain::{
    FetchedMetadata, NiconicoVideoArtifact, NormalizedArtifact, PlatformKind, RemoteAccount,
    TwitterPostArtifact, YouTubeLiveArtifact, YouTubeVideoArtifact,
};
use crate::pipeline::resolve::last_path_segment;

/// All stored/displayed instants are referenced to JST (+09:00), regardless
/// of the platform's source zone. Instants stay timezone-aware.
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("JST offset is valid")
}

pub fn to_jst(instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    instant.with_timezone(&jst())
}

/// Decodes the creation instant a snowflake ID encodes in its high-order
/// bits: milliseconds = (id >> 22) + platform epoch offset. The arithmetic
/// is the platform's documented encoding and must stay bit-exact.
pub fn decode_snowflake_time(remote_tweet_id: &str) -> Result<DateTime<FixedOffset>> {
    let numeric_id: u64 = remote_tweet_id.parse().map_err(|_| {
        IngestError::MalformedUpstreamResponse(format!(
            "tweet ID is not numeric: {remote_tweet_id}"
        ))
    })?;
    let unix_millis = (numeric_id >> 22) + TWITTER_SNOWFLAKE_EPOCH_MS;
    let instant = Utc
        .timestamp_millis_opt(unix_millis as i64)
        .single()
        .ok_or_else(|| {
            IngestError::MalformedUpstreamResponse(format!(
                "tweet ID timestamp out of range: {remote_tweet_id}"
            ))
        })?;
    Ok(instant.with_timezone(&jst()))
}

/// Strips the well-known widget-loader tag from raw oEmbed markup and
/// rejects anything that still carries script content. Rejection is final;
/// markup is never silently stripped further.
pub fn sanitize_embed_html(raw_html: &str) -> Result<String> {
    let mut sanitized = raw_html.trim();
    if let Some(stripped) = sanitized.strip_suffix(TWITTER_WIDGET_SCRIPT_TAG) {
        sanitized = stripped;
    }
    if sanitized.contains("<script") {
        return Err(IngestError::UnsafeEmbedMarkup(format!(
            "embed markup contains script content: {sanitized}"
        )));
    }
    Ok(sanitized.trim().to_string())
}

/// The account screen name is the last path segment of the oEmbed author
/// URL, e.g. `https://twitter.com/someone` -> `someone`.
pub fn screen_name_from_author_url(author_url: &str) -> Result<String> {
    last_segment_of(author_url).ok_or_else(|| {
        IngestError::MalformedUpstreamResponse(format!("bad author URL: {author_url}"))
    })
}

/// The authoritative remote tweet ID comes from the canonical post URL the
/// oEmbed response reports, which may differ from the caller-supplied ID
/// after redirects.
pub fn tweet_id_from_post_url(post_url: &str) -> Result<String> {
    last_segment_of(post_url).ok_or_else(|| {
        IngestError::MalformedUpstreamResponse(format!("bad post URL: {post_url}"))
    })
}

fn last_segment_of(raw_url: &str) -> Option<String> {
    let parsed = Url::parse(raw_url).ok()?;
    last_path_segment(&parsed)
}

/// Reshapes fetched metadata into the artifact the upsert mutations expect,
/// computing every derived field. Pure; no I/O.
pub fn normalize(platform: PlatformKind, fetched: FetchedMetadata) -> Result<NormalizedArtifact> {
    match (platform, fetched) {
        (PlatformKind::YouTubeLive, FetchedMetadata::YouTube(meta)) => {
            Ok(NormalizedArtifact::YouTubeLive(YouTubeLiveArtifact {
                remote_video_id: meta.remote_video_id,
                title: meta.title.unwrap_or_default(),
                channel: RemoteAccount {
                    remote_id: meta.channel_id.unwrap_or_default(),
                    name: meta.channel_name.unwrap_or_default(),
                },
                start_time: meta.actual_start_time.map(to_jst),
                end_time: meta.actual_end_time.map(to_jst),
            }))
        }
        (PlatformKind::YouTubeVideo, FetchedMetadata::YouTube(meta)) => {
            Ok(NormalizedArtifact::YouTubeVideo(YouTubeVideoArtifact {
                remote_video_id: meta.remote_video_id,
                title: meta.title.unwrap_or_default(),
                channel: RemoteAccount {
                    remote_id: meta.channel_id.unwrap_or_default(),
                    name: meta.channel_name.unwrap_or_default(),
                },
                post_time: meta.published_at.map(to_jst),
                // The premiere flag is operator-confirmed at submission; the
                // platform response does not state it reliably.
                is_premiere: false,
            }))
        }
        (PlatformKind::NiconicoVideo, FetchedMetadata::Niconico(meta)) => {
            Ok(NormalizedArtifact::NiconicoVideo(NiconicoVideoArtifact {
                remote_content_id: meta.remote_content_id,
                title: meta.title,
                account: RemoteAccount {
                    remote_id: meta.owner_id.to_string(),
                    name: meta.owner_name,
                },
                start_time: to_jst(meta.registered_at),
                thumbnail_url: meta.thumbnail_url,
            }))
        }
        (PlatformKind::TwitterPost, FetchedMetadata::Twitter(meta)) => {
            let remote_tweet_id = tweet_id_from_post_url(&meta.post_url)?;
            let tweet_time = decode_snowflake_time(&remote_tweet_id)?;
            let embed_html = sanitize_embed_html(&meta.html)?;
            let screen_name = screen_name_from_author_url(&meta.author_url)?;
            Ok(NormalizedArtifact::TwitterPost(TwitterPostArtifact {
                remote_tweet_id,
                tweet_time,
                embed_html,
                screen_name,
                author_name: meta.author_name,
            }))
        }
        (platform, _) => Err(IngestError::MalformedUpstreamResponse(format!(
            "fetched metadata does not match platform {}",
            platform.as_str()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::TWITTER_WIDGET_SCRIPT_TAG;
    use crate::domain::TwitterPostMetadata;

    #[test]
    fn snowflake_zero_decodes_to_platform_epoch_origin() {
        // Identity/boundary case: an ID with zero timestamp bits decodes to
        // the epoch origin itself, second 1288834974.
        let decoded = decode_snowflake_time("0").unwrap();
        assert_eq!(decoded.timestamp(), 1_288_834_974);
        assert_eq!(decoded.timestamp_millis(), 1_288_834_974_657);
    }

    #[test]
    fn snowflake_timestamp_bits_shift_exactly() {
        // The ID whose timestamp bits equal the epoch offset itself; the
        // decoded instant is exactly twice the offset in milliseconds.
        let id = (1_288_834_974_657u64 << 22).to_string();
        let decoded = decode_snowflake_time(&id).unwrap();
        assert_eq!(decoded.timestamp_millis(), 2 * 1_288_834_974_657);
    }

    #[test]
    fn snowflake_decoding_is_jst_referenced() {
        let decoded = decode_snowflake_time("0").unwrap();
        assert_eq!(decoded.offset().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn non_numeric_tweet_id_is_rejected() {
        assert!(decode_snowflake_time("12a").is_err());
    }

    #[test]
    fn widget_loader_suffix_is_stripped() {
        let raw = format!(
            "<blockquote class=\"twitter-tweet\"><p>hello</p></blockquote>\n{}",
            TWITTER_WIDGET_SCRIPT_TAG
        );
        let sanitized = sanitize_embed_html(&raw).unwrap();
        assert!(!sanitized.ends_with(TWITTER_WIDGET_SCRIPT_TAG));
        assert!(!sanitized.contains("<script"));
        assert!(sanitized.ends_with("</blockquote>"));
    }

    #[test]
    fn unrelated_script_tag_is_rejected() {
        let raw = format!(
            "<blockquote><script>alert(1)</script></blockquote>{}",
            TWITTER_WIDGET_SCRIPT_TAG
        );
        let err = sanitize_embed_html(&raw).unwrap_err();
        assert!(matches!(err, IngestError::UnsafeEmbedMarkup(_)));
    }

    #[test]
    fn markup_without_loader_suffix_passes_when_scriptless() {
        let sanitized = sanitize_embed_html("  <blockquote>plain</blockquote>  ").unwrap();
        assert_eq!(sanitized, "<blockquote>plain</blockquote>");
    }

    #[test]
    fn screen_name_is_last_author_url_segment() {
        assert_eq!(
            screen_name_from_author_url("https://twitter.com/someone").unwrap(),
            "someone"
        );
    }

    #[test]
    fn tweet_id_comes_from_canonical_post_url() {
        assert_eq!(
            tweet_id_from_post_url("https://twitter.com/someone/status/1234567890").unwrap(),
            "1234567890"
        );
    }

    #[test]
    fn twitter_metadata_normalizes_end_to_end() {
        let fetched = FetchedMetadata::Twitter(TwitterPostMetadata {
            author_url: "https://twitter.com/someone".to_string(),
            author_name: "Someone".to_string(),
            post_url: "https://twitter.com/someone/status/1585929509934252033".to_string(),
            html: format!("<blockquote>tweet</blockquote>{TWITTER_WIDGET_SCRIPT_TAG}"),
        });
        let artifact = normalize(PlatformKind::TwitterPost, fetched).unwrap();
        match artifact {
            NormalizedArtifact::TwitterPost(post) => {
                assert_eq!(post.remote_tweet_id, "1585929509934252033");
                assert_eq!(post.screen_name, "someone");
                assert_eq!(post.author_name, "Someone");
                assert_eq!(post.embed_html, "<blockquote>tweet</blockquote>");
                assert_eq!(post.tweet_time.offset().local_minus_utc(), 9 * 3600);
            }
            other => panic!("unexpected artifact: {other:?}"),
        }
    }
}
