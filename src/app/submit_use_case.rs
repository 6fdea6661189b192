use std::sync::Arc;

use tracing::instrument;

use crate::app::ports::GraphqlPort;
use crate::common::error::Result;
use crate::domain::{AssociationSelection, NormalizedArtifact, UpsertResult};
use crate::pipeline::catalog::Catalogger;

/// The operator's "submit" action: one idempotent composite upsert of a
/// reviewed artifact plus the chosen associations. For Twitter artifacts the
/// account is resolved from the derived screen name when not pre-selected;
/// accounts are looked up only, never created here.
pub struct SubmitUseCase {
    catalog: Catalogger,
}

impl SubmitUseCase {
    pub fn new(graphql: Arc<dyn GraphqlPort>) -> Self {
        Self {
            catalog: Catalogger::new(graphql),
        }
    }

    pub fn catalog(&self) -> &Catalogger {
        &self.catalog
    }

    #[instrument(skip(self, artifact, selection))]
    pub async fn run(
        &self,
        artifact: &NormalizedArtifact,
        selection: &AssociationSelection,
    ) -> Result<UpsertResult> {
        let mut selection = selection.clone();
        if let NormalizedArtifact::TwitterPost(post) = artifact {
            if selection.twitter_account_id.is_none() {
                let account = self.catalog.lookup_twitter_account(&post.screen_name).await?;
                selection.twitter_account_id = Some(account.id);
            }
        }
        self.catalog.upsert(artifact, &selection).await
    }
}
