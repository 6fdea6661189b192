use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::app::ports::{GraphqlEnvelope, GraphqlPort, GraphqlRequest};
use crate::common::error::{IngestError, Result};
use crate::domain::{
    AssociationSelection, InitialData, NiconicoVideoArtifact, NormalizedArtifact, ProgramRow,
    TwitterAccountRow, TwitterPostArtifact, UpsertResult, YouTubeLiveArtifact,
    YouTubeVideoArtifact,
};

pub mod documents;

use self::documents::{
    ADD_PROGRAM_LIVE_ARCHIVE_MUTATION, ADD_PROGRAM_NICONICO_VIDEO_MUTATION,
    ADD_PROGRAM_TWITTER_ANNOUNCEMENT_MUTATION, ADD_PROGRAM_TWITTER_ANNOUNCEMENT_NO_IMAGE_MUTATION,
    ADD_PROGRAM_YOUTUBE_VIDEO_LIVE_ARCHIVE_MUTATION, INITIAL_DATA_QUERY,
    PROGRAMS_BY_PROJECT_QUERY, TWITTER_ACCOUNT_BY_SCREEN_NAME_QUERY,
};

/// Maps normalized artifacts into idempotent composite upserts against the
/// datastore, and serves the read-only queries the operator UI refreshes
/// its dropdowns from.
pub struct Catalogger {
    graphql: Arc<dyn GraphqlPort>,
}

impl Catalogger {
    pub fn new(graphql: Arc<dyn GraphqlPort>) -> Self {
        Self { graphql }
    }

    /// Issues the platform's composite upsert. Each mutation is a single
    /// nested write: either the whole structure commits or nothing does.
    #[instrument(skip(self, artifact, selection), fields(platform = artifact.platform().as_str(), remote_id = artifact.remote_id()))]
    pub async fn upsert(
        &self,
        artifact: &NormalizedArtifact,
        selection: &AssociationSelection,
    ) -> Result<UpsertResult> {
        let result = match artifact {
            NormalizedArtifact::YouTubeLive(live) => {
                self.upsert_youtube_live(live, selection).await?
            }
            NormalizedArtifact::YouTubeVideo(video) => {
                self.upsert_youtube_video(video, selection).await?
            }
            NormalizedArtifact::NiconicoVideo(video) => {
                self.upsert_niconico_video(video, selection).await?
            }
            NormalizedArtifact::TwitterPost(post) => {
                self.upsert_twitter_post(post, selection).await?
            }
        };
        info!(database_id = %result.database_id, "artifact upserted");
        Ok(result)
    }

    async fn upsert_youtube_live(
        &self,
        live: &YouTubeLiveArtifact,
        selection: &AssociationSelection,
    ) -> Result<UpsertResult> {
        let program_id = require(selection.program_id, "program")?;
        let person_id = require(selection.person_id, "person")?;
        let variables = json!({
            "programId": program_id,
            "personId": person_id,
            "startTime": live.start_time.map(|t| t.to_rfc3339()),
            "endTime": live.end_time.map(|t| t.to_rfc3339()),
            "remoteYoutubeVideoId": live.remote_video_id,
            "title": live.title,
            "remoteYoutubeChannelId": live.channel.remote_id,
            "youtubeChannelName": live.channel.name,
        });
        self.mutate_for_id(ADD_PROGRAM_LIVE_ARCHIVE_MUTATION, variables, "program_live_archive")
            .await
    }

    async fn upsert_youtube_video(
        &self,
        video: &YouTubeVideoArtifact,
        selection: &AssociationSelection,
    ) -> Result<UpsertResult> {
        let program_id = require(selection.program_id, "program")?;
        let person_id = require(selection.person_id, "person")?;
        let variables = json!({
            "programId": program_id,
            "personId": person_id,
            "postTime": video.post_time.map(|t| t.to_rfc3339()),
            "startTime": Value::Null,
            "endTime": Value::Null,
            "remoteYoutubeVideoId": video.remote_video_id,
            "title": video.title,
            "isPremiere": video.is_premiere,
            "remoteYoutubeChannelId": video.channel.remote_id,
            "youtubeChannelName": video.channel.name,
        });
        self.mutate_for_id(
            ADD_PROGRAM_YOUTUBE_VIDEO_LIVE_ARCHIVE_MUTATION,
            variables,
            "program_live_archive",
        )
        .await
    }

    async fn upsert_niconico_video(
        &self,
        video: &NiconicoVideoArtifact,
        selection: &AssociationSelection,
    ) -> Result<UpsertResult> {
        let project_id = require(selection.project_id, "project")?;
        let program_id = require(selection.program_id, "program")?;
        let person_id = require(selection.person_id, "person")?;
        let variables = json!({
            "projectId": project_id,
            "programId": program_id,
            "personId": person_id,
            "remoteNiconicoContentId": video.remote_content_id,
            "title": video.title,
            "startTime": video.start_time.to_rfc3339(),
            "thumbnailUrl": video.thumbnail_url,
            "remoteNiconicoAccountId": video.account.remote_id,
            "niconicoAccountName": video.account.name,
        });
        self.mutate_for_id(
            ADD_PROGRAM_NICONICO_VIDEO_MUTATION,
            variables,
            "program_niconico_video",
        )
        .await
    }

    async fn upsert_twitter_post(
        &self,
        post: &TwitterPostArtifact,
        selection: &AssociationSelection,
    ) -> Result<UpsertResult> {
        let program_id = require(selection.program_id, "program")?;
        let person_id = require(selection.person_id, "person")?;
        let twitter_account_id = require(selection.twitter_account_id, "twitter account")?;
        let mut variables = json!({
            "programId": program_id,
            "personId": person_id,
            "remoteTweetId": post.remote_tweet_id,
            "twitterAccountId": twitter_account_id,
            "tweetTime": post.tweet_time.to_rfc3339(),
            "tweetEmbedHtml": post.embed_html,
        });
        let document = match &selection.tweet_image {
            Some(image) => {
                variables["twitterTweetImageIndex"] = json!(image.index);
                variables["twitterTweetImageUrl"] = json!(image.url);
                ADD_PROGRAM_TWITTER_ANNOUNCEMENT_MUTATION
            }
            None => ADD_PROGRAM_TWITTER_ANNOUNCEMENT_NO_IMAGE_MUTATION,
        };
        self.mutate_for_id(document, variables, "program_twitter_announcement")
            .await
    }

    async fn mutate_for_id(
        &self,
        document: &str,
        variables: Value,
        alias: &str,
    ) -> Result<UpsertResult> {
        let envelope = self
            .graphql
            .mutate(GraphqlRequest::new(document, variables))
            .await?;
        let entity = entity_from(envelope, alias)?;
        let database_id = entity
            .get("id")
            .and_then(|id| id.as_str())
            .ok_or_else(|| {
                IngestError::ConflictResolutionFailed(format!(
                    "mutation response for {alias} has no id"
                ))
            })?
            .to_string();
        Ok(UpsertResult { database_id })
    }

    /// Dropdown seed data; read-only, no write credential attached.
    pub async fn fetch_initial_data(&self) -> Result<InitialData> {
        let envelope = self
            .graphql
            .query(GraphqlRequest::new(INITIAL_DATA_QUERY, Value::Null))
            .await?;
        let data = data_from(envelope)?;
        Ok(InitialData {
            projects: list_from(&data, "project_list")?,
            persons: list_from(&data, "person_list")?,
            twitter_accounts: list_from(&data, "twitter_account_list")?,
        })
    }

    /// Programs for one project, newest start time first. A missing project
    /// is an association failure, not a transport error.
    pub async fn fetch_programs_by_project(&self, project_id: Uuid) -> Result<Vec<ProgramRow>> {
        let envelope = self
            .graphql
            .query(GraphqlRequest::new(
                PROGRAMS_BY_PROJECT_QUERY,
                json!({ "projectId": project_id }),
            ))
            .await?;
        let project = entity_from(envelope, "project")?;
        let entries = project
            .get("program_project_list")
            .and_then(|list| list.as_array())
            .cloned()
            .unwrap_or_default();
        entries
            .into_iter()
            .map(|entry| {
                let program = entry.get("program").cloned().ok_or_else(|| {
                    IngestError::ConflictResolutionFailed(
                        "program_project entry has no program".to_string(),
                    )
                })?;
                serde_json::from_value(program).map_err(IngestError::from)
            })
            .collect()
    }

    /// Looks up an existing twitter account by screen name. Accounts are
    /// never auto-created; an empty result is `UnknownAccount`.
    pub async fn lookup_twitter_account(&self, screen_name: &str) -> Result<TwitterAccountRow> {
        let envelope = self
            .graphql
            .query(GraphqlRequest::new(
                TWITTER_ACCOUNT_BY_SCREEN_NAME_QUERY,
                json!({ "twitterScreenName": screen_name }),
            ))
            .await?;
        let data = data_from(envelope)?;
        let accounts: Vec<TwitterAccountRow> = list_from(&data, "twitter_account_list")?;
        accounts.into_iter().next().ok_or_else(|| {
            IngestError::UnknownAccount(format!(
                "no registered twitter account for screen name {screen_name}"
            ))
        })
    }
}

fn require(id: Option<Uuid>, what: &str) -> Result<Uuid> {
    id.ok_or_else(|| IngestError::AssociationNotFound(format!("no {what} selected")))
}

fn data_from(envelope: GraphqlEnvelope) -> Result<Value> {
    if let Some(errors) = &envelope.errors {
        if !errors.is_empty() {
            let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
            return Err(classify_errors(&messages.join("; ")));
        }
    }
    envelope.data.ok_or_else(|| {
        IngestError::ConflictResolutionFailed("response envelope has no data".to_string())
    })
}

/// Pulls one aliased top-level entity out of the envelope. A `null` entity
/// means a referenced row does not exist, distinct from a transport error.
fn entity_from(envelope: GraphqlEnvelope, alias: &str) -> Result<Value> {
    let data = data_from(envelope)?;
    match data.get(alias) {
        Some(Value::Null) | None => Err(IngestError::AssociationNotFound(format!(
            "{alias} does not exist"
        ))),
        Some(entity) => Ok(entity.clone()),
    }
}

fn list_from<T: serde::de::DeserializeOwned>(data: &Value, alias: &str) -> Result<Vec<T>> {
    let list = data.get(alias).cloned().ok_or_else(|| {
        IngestError::ConflictResolutionFailed(format!("response has no {alias}"))
    })?;
    serde_json::from_value(list).map_err(IngestError::from)
}

/// Hasura reports constraint failures in the error message text; classify
/// them into the pipeline's taxonomy.
fn classify_errors(message: &str) -> IngestError {
    let lowered = message.to_lowercase();
    if lowered.contains("foreign key violation") {
        IngestError::AssociationNotFound(message.to_string())
    } else if lowered.contains("access denied")
        || lowered.contains("admin secret")
        || lowered.contains("not authori")
    {
        IngestError::Unauthorized(message.to_string())
    } else {
        IngestError::ConflictResolutionFailed(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_key_violation_classifies_as_association_not_found() {
        let err = classify_errors("Foreign key violation. insert or update on table \"program_live_archives\" violates foreign key constraint");
        assert!(matches!(err, IngestError::AssociationNotFound(_)));
    }

    #[test]
    fn access_denied_classifies_as_unauthorized() {
        let err = classify_errors("x-hasura-admin-secret/x-hasura-access-key required, but not found: access denied");
        assert!(matches!(err, IngestError::Unauthorized(_)));
    }

    #[test]
    fn other_datastore_errors_classify_as_conflict_resolution_failed() {
        let err = classify_errors("Uniqueness violation. duplicate key value");
        assert!(matches!(err, IngestError::ConflictResolutionFailed(_)));
    }

    #[test]
    fn null_top_level_entity_is_association_not_found() {
        let envelope = GraphqlEnvelope {
            data: Some(serde_json::json!({ "project": null })),
            errors: None,
        };
        let err = entity_from(envelope, "project").unwrap_err();
        assert!(matches!(err, IngestError::AssociationNotFound(_)));
    }

    #[test]
    fn conflict_update_columns_are_part_of_the_contract() {
        // The merge policy is which columns a resubmission may touch; the
        // channel/account rows only ever take a new display name.
        let live = documents::ADD_PROGRAM_LIVE_ARCHIVE_MUTATION;
        assert!(live.contains("youtube_lives_remote_youtube_video_id_key"));
        assert!(live.contains("youtube_channels_youtube_channel_id_key"));

        let video = documents::ADD_PROGRAM_YOUTUBE_VIDEO_LIVE_ARCHIVE_MUTATION;
        assert!(video.contains("youtube_videos_remote_youtube_video_id_key"));
        assert!(video.contains("is_premiere"));

        let niconico = documents::ADD_PROGRAM_NICONICO_VIDEO_MUTATION;
        assert!(niconico.contains("niconico_videos_remote_niconico_content_id_key"));
        assert!(niconico.contains("niconico_accounts_remote_niconico_account_id_key"));
        assert!(niconico.contains("project_niconico_videos_project_id_niconico_video_id_key"));

        let twitter = documents::ADD_PROGRAM_TWITTER_ANNOUNCEMENT_MUTATION;
        assert!(twitter.contains("twitter_tweets_remote_tweet_id_key"));
        assert!(twitter.contains("twitter_tweet_images_tweet_id_index_key"));
        let no_image = documents::ADD_PROGRAM_TWITTER_ANNOUNCEMENT_NO_IMAGE_MUTATION;
        assert!(!no_image.contains("twitter_tweet_images"));
    }
}
