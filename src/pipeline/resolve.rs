use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::common::constants::{NICONICO_HOST, TWITTER_HOST, YOUTUBE_HOST};
use crate::common::error::{IngestError, Result};
use crate::domain::{PlatformKind, RemoteIdentifier};

static NICONICO_CONTENT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:sm|so)\d+$").unwrap());
static TWITTER_TWEET_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

/// Parses a raw operator-supplied string (URL or bare platform ID) into a
/// canonical remote identifier. Input is trimmed first; a `https://` prefix
/// selects the URL grammar, anything else the bare-ID grammar.
pub fn resolve(platform: PlatformKind, raw_input: &str) -> Result<RemoteIdentifier> {
    let input = raw_input.trim();
    if input.is_empty() {
        return Err(IngestError::InvalidIdentifier(
            "empty input".to_string(),
        ));
    }

    let canonical_id = match platform {
        PlatformKind::YouTubeLive | PlatformKind::YouTubeVideo => resolve_youtube(input)?,
        PlatformKind::NiconicoVideo => resolve_niconico(input)?,
        PlatformKind::TwitterPost => resolve_twitter(input)?,
    };

    Ok(RemoteIdentifier {
        platform,
        canonical_id,
    })
}

fn resolve_youtube(input: &str) -> Result<String> {
    if input.starts_with("https://") {
        let parsed = parse_url(input)?;
        if parsed.host_str() != Some(YOUTUBE_HOST) {
            return Err(invalid_url(input));
        }
        let video_id = parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| invalid_url(input))?;
        Ok(video_id)
    } else {
        // A comma indicates an accidental multi-ID paste.
        if input.contains(',') {
            return Err(IngestError::InvalidIdentifier(format!(
                "invalid YouTube video ID: {input}"
            )));
        }
        Ok(input.to_string())
    }
}

fn resolve_niconico(input: &str) -> Result<String> {
    if input.starts_with("https://") {
        let parsed = parse_url(input)?;
        if parsed.host_str() != Some(NICONICO_HOST) {
            return Err(invalid_url(input));
        }
        last_path_segment(&parsed).ok_or_else(|| invalid_url(input))
    } else {
        if !NICONICO_CONTENT_ID.is_match(input) {
            return Err(IngestError::InvalidIdentifier(format!(
                "invalid Niconico video ID: {input}"
            )));
        }
        Ok(input.to_string())
    }
}

fn resolve_twitter(input: &str) -> Result<String> {
    if input.starts_with("https://") {
        let parsed = parse_url(input)?;
        if parsed.host_str() != Some(TWITTER_HOST) {
            return Err(invalid_url(input));
        }
        last_path_segment(&parsed).ok_or_else(|| invalid_url(input))
    } else {
        if !TWITTER_TWEET_ID.is_match(input) {
            return Err(IngestError::InvalidIdentifier(format!(
                "invalid Twitter tweet ID: {input}"
            )));
        }
        Ok(input.to_string())
    }
}

fn parse_url(input: &str) -> Result<Url> {
    Url::parse(input).map_err(|_| invalid_url(input))
}

/// Last non-empty path segment, e.g. the tweet ID in
/// `https://twitter.com/user/status/123`.
pub fn last_path_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(|segment| segment.to_string())
}

fn invalid_url(input: &str) -> IngestError {
    IngestError::InvalidIdentifier(format!("invalid URL: {input}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_watch_url_yields_video_id() {
        let ident = resolve(
            PlatformKind::YouTubeLive,
            "https://www.youtube.com/watch?v=abc123XYZ",
        )
        .unwrap();
        assert_eq!(ident.canonical_id, "abc123XYZ");
        assert_eq!(ident.platform, PlatformKind::YouTubeLive);
    }

    #[test]
    fn youtube_url_with_extra_params_uses_first_v_value() {
        let ident = resolve(
            PlatformKind::YouTubeVideo,
            "https://www.youtube.com/watch?t=42&v=abc123XYZ",
        )
        .unwrap();
        assert_eq!(ident.canonical_id, "abc123XYZ");
    }

    #[test]
    fn youtube_url_wrong_host_is_rejected() {
        let err = resolve(
            PlatformKind::YouTubeLive,
            "https://youtu.be/watch?v=abc123XYZ",
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::InvalidIdentifier(_)));
    }

    #[test]
    fn youtube_url_without_v_param_is_rejected() {
        assert!(resolve(
            PlatformKind::YouTubeLive,
            "https://www.youtube.com/watch?x=abc"
        )
        .is_err());
    }

    #[test]
    fn youtube_bare_id_passes_through_trimmed() {
        let ident = resolve(PlatformKind::YouTubeVideo, "  abc123XYZ  ").unwrap();
        assert_eq!(ident.canonical_id, "abc123XYZ");
    }

    #[test]
    fn youtube_bare_id_with_comma_is_rejected() {
        assert!(resolve(PlatformKind::YouTubeVideo, "abc,def").is_err());
    }

    #[test]
    fn niconico_sm_and_so_ids_are_accepted() {
        assert_eq!(
            resolve(PlatformKind::NiconicoVideo, "sm12345")
                .unwrap()
                .canonical_id,
            "sm12345"
        );
        assert_eq!(
            resolve(PlatformKind::NiconicoVideo, "so67890")
                .unwrap()
                .canonical_id,
            "so67890"
        );
    }

    #[test]
    fn niconico_unknown_prefix_is_rejected() {
        let err = resolve(PlatformKind::NiconicoVideo, "xx12345").unwrap_err();
        assert!(matches!(err, IngestError::InvalidIdentifier(_)));
    }

    #[test]
    fn niconico_watch_url_yields_content_id() {
        let ident = resolve(
            PlatformKind::NiconicoVideo,
            "https://www.nicovideo.jp/watch/sm12345",
        )
        .unwrap();
        assert_eq!(ident.canonical_id, "sm12345");
    }

    #[test]
    fn twitter_numeric_id_is_accepted() {
        let ident = resolve(PlatformKind::TwitterPost, "1234567890123456789").unwrap();
        assert_eq!(ident.canonical_id, "1234567890123456789");
    }

    #[test]
    fn twitter_non_numeric_id_is_rejected() {
        assert!(resolve(PlatformKind::TwitterPost, "12a").is_err());
    }

    #[test]
    fn twitter_status_url_yields_tweet_id() {
        let ident = resolve(
            PlatformKind::TwitterPost,
            "https://twitter.com/someone/status/1234567890123456789",
        )
        .unwrap();
        assert_eq!(ident.canonical_id, "1234567890123456789");
    }

    #[test]
    fn twitter_url_wrong_host_is_rejected() {
        assert!(resolve(
            PlatformKind::TwitterPost,
            "https://x.com/someone/status/123"
        )
        .is_err());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(resolve(PlatformKind::YouTubeLive, "   ").is_err());
    }
}
