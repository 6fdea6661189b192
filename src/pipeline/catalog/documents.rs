// GraphQL documents issued against the Hasura datastore. The on_conflict
// constraint names and update-column sets are the idempotency contract:
// resubmitting the same remote artifact merges into the existing rows, and
// which columns a merge touches is deliberate, not incidental.

pub const INITIAL_DATA_QUERY: &str = "
query {
    project_list: projects {
        id
        name
    }

    person_list: persons {
        id
        name
    }

    twitter_account_list: twitter_accounts {
        id
        twitter_screen_name
        name
    }
}
";

pub const PROGRAMS_BY_PROJECT_QUERY: &str = "
query A(
    $projectId: uuid!
) {
    project: projects_by_pk(
        id: $projectId
    ) {
        program_project_list: program_projects(
            order_by: {
                program: {
                    start_time: desc
                }
            }
        ) {
            program {
                id
                title
            }
        }
    }
}
";

pub const TWITTER_ACCOUNT_BY_SCREEN_NAME_QUERY: &str = "
query A(
    $twitterScreenName: String!
) {
    twitter_account_list: twitter_accounts(
        where: {
            twitter_screen_name: {
                _eq: $twitterScreenName
            }
        }
        order_by: {
            name: asc
        }
        limit: 1
    ) {
        id
        twitter_screen_name
        name
    }
}
";

/// YouTube live archive: the live row merges on its remote video ID, the
/// channel row merges on its remote channel ID updating the name only.
pub const ADD_PROGRAM_LIVE_ARCHIVE_MUTATION: &str = "
mutation A(
  $programId: uuid!
  $personId: uuid!
  $startTime: timestamptz
  $endTime: timestamptz
  $remoteYoutubeVideoId: String!
  $title: String!
  $remoteYoutubeChannelId: String!
  $youtubeChannelName: String!
) {
    program_live_archive: insert_program_live_archives_one(
        object: {
            program_id: $programId
            person_id: $personId
            start_time: $startTime
            end_time: $endTime
            youtube_live: {
                data: {
                    remote_youtube_video_id: $remoteYoutubeVideoId
                    title: $title
                    start_time: $startTime
                    end_time: $endTime
                    youtube_channel: {
                        data: {
                            remote_youtube_channel_id: $remoteYoutubeChannelId
                            name: $youtubeChannelName
                        }
                        on_conflict: {
                            constraint: youtube_channels_youtube_channel_id_key
                            update_columns: [
                                name
                            ]
                        }
                    }
                }
                on_conflict: {
                    constraint: youtube_lives_remote_youtube_video_id_key
                    update_columns: [
                        title
                        start_time
                        end_time
                    ]
                }
            }
        }
    ) {
        id
    }
}
";

/// YouTube video posted as a live archive: same outer row, but the nested
/// entity carries post time + premiere flag instead of start/end.
pub const ADD_PROGRAM_YOUTUBE_VIDEO_LIVE_ARCHIVE_MUTATION: &str = "
mutation A(
  $programId: uuid!
  $personId: uuid!
  $postTime: timestamptz!
  $startTime: timestamptz
  $endTime: timestamptz
  $remoteYoutubeVideoId: String!
  $title: String!
  $isPremiere: Boolean!
  $remoteYoutubeChannelId: String!
  $youtubeChannelName: String!
) {
    program_live_archive: insert_program_live_archives_one(
        object: {
            program_id: $programId
            person_id: $personId
            start_time: $startTime
            end_time: $endTime
            youtube_video: {
                data: {
                    remote_youtube_video_id: $remoteYoutubeVideoId
                    title: $title
                    post_time: $postTime
                    is_premiere: $isPremiere
                    youtube_channel: {
                        data: {
                            remote_youtube_channel_id: $remoteYoutubeChannelId
                            name: $youtubeChannelName
                        }
                        on_conflict: {
                            constraint: youtube_channels_youtube_channel_id_key
                            update_columns: [
                                name
                            ]
                        }
                    }
                }
                on_conflict: {
                    constraint: youtube_videos_remote_youtube_video_id_key
                    update_columns: [
                        title
                        post_time
                        is_premiere
                    ]
                }
            }
        }
    ) {
        id
    }
}
";

/// Niconico video: merges the video on its remote content ID, the uploader
/// account on its remote account ID (name only), and re-associates the
/// (project, video) pair.
pub const ADD_PROGRAM_NICONICO_VIDEO_MUTATION: &str = "
mutation A(
  $projectId: uuid!
  $programId: uuid!
  $personId: uuid!
  $remoteNiconicoContentId: String!
  $title: String!
  $startTime: timestamptz!
  $thumbnailUrl: String!
  $remoteNiconicoAccountId: String!
  $niconicoAccountName: String!
) {
    program_niconico_video: insert_program_niconico_videos_one(
        object: {
            program_id: $programId
            person_id: $personId
            niconico_video: {
                data: {
                    remote_niconico_content_id: $remoteNiconicoContentId
                    title: $title
                    start_time: $startTime
                    thumbnail_url: $thumbnailUrl
                    niconico_account: {
                        data: {
                            remote_niconico_account_id: $remoteNiconicoAccountId
                            name: $niconicoAccountName
                        }
                        on_conflict: {
                            constraint: niconico_accounts_remote_niconico_account_id_key
                            update_columns: [
                                name
                            ]
                        }
                    }
                    project_niconico_videos: {
                        data: {
                            project_id: $projectId
                        }
                        on_conflict: {
                            constraint: project_niconico_videos_project_id_niconico_video_id_key
                            update_columns: [
                                project_id
                                niconico_video_id
                            ]
                        }
                    }
                }
                on_conflict: {
                    constraint: niconico_videos_remote_niconico_content_id_key
                    update_columns: [
                        title
                        start_time
                        thumbnail_url
                    ]
                }
            }
        }
    ) {
        id
    }
}
";

/// Twitter announcement with one attached image. The tweet merges on its
/// remote tweet ID; the referenced twitter_account must already exist (it is
/// resolved by screen name beforehand, never auto-created).
pub const ADD_PROGRAM_TWITTER_ANNOUNCEMENT_MUTATION: &str = "
mutation A(
    $programId: uuid!
    $personId: uuid!
    $remoteTweetId: String!
    $twitterAccountId: uuid!
    $tweetTime: timestamptz!
    $tweetEmbedHtml: String!
    $twitterTweetImageIndex: Int!
    $twitterTweetImageUrl: String!
) {
    program_twitter_announcement: insert_program_twitter_announcements_one(
        object: {
            program_id: $programId
            person_id: $personId
            twitter_tweet: {
                data: {
                    remote_tweet_id: $remoteTweetId
                    tweet_time: $tweetTime
                    tweet_embed_html: $tweetEmbedHtml
                    twitter_account_id: $twitterAccountId
                    twitter_tweet_images: {
                        data: {
                            index: $twitterTweetImageIndex
                            url: $twitterTweetImageUrl
                        }
                        on_conflict: {
                            constraint: twitter_tweet_images_tweet_id_index_key
                            update_columns: [
                                index
                                url
                            ]
                        }
                    }
                }
                on_conflict: {
                    constraint: twitter_tweets_remote_tweet_id_key
                    update_columns: [
                        tweet_time
                        tweet_embed_html
                    ]
                }
            }
        }
    ) {
        id
    }
}
";

/// Same announcement without the nested image rows, for tweets where the
/// operator attaches no image.
pub const ADD_PROGRAM_TWITTER_ANNOUNCEMENT_NO_IMAGE_MUTATION: &str = "
mutation A(
    $programId: uuid!
    $personId: uuid!
    $remoteTweetId: String!
    $twitterAccountId: uuid!
    $tweetTime: timestamptz!
    $tweetEmbedHtml: String!
) {
    program_twitter_announcement: insert_program_twitter_announcements_one(
        object: {
            program_id: $programId
            person_id: $personId
            twitter_tweet: {
                data: {
                    remote_tweet_id: $remoteTweetId
                    tweet_time: $tweetTime
                    tweet_embed_html: $tweetEmbedHtml
                    twitter_account_id: $twitterAccountId
                }
                on_conflict: {
                    constraint: twitter_tweets_remote_tweet_id_key
                    update_columns: [
                        tweet_time
                        tweet_embed_html
                    ]
                }
            }
        }
    ) {
        id
    }
}
";
