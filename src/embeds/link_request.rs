//! Link name requests as admin-channel embeds.

use super::EmbedError;
use super::request::{RequestOrigin, request_embed};
use crate::effects::{Embed, EmbedAuthor, EmbedField};
use crate::types::UserId;

pub const LINK_REQUEST_TITLE: &str = "Link name request";

pub const FIELD_USER_ID: &str = "User ID";
pub const FIELD_DISPLAY_NAME: &str = "Record display name";
pub const FIELD_PROOF: &str = "Proof";

/// A request to link `user_id` to a leaderboard display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    pub origin: RequestOrigin,
    pub user_id: UserId,
    pub display_name: String,
    pub proof: Option<String>,
}

impl LinkRequest {
    /// Renders the request for the admin channel.
    ///
    /// `description` tells admins whether the name is on the leaderboard.
    pub fn to_embed(&self, author: EmbedAuthor, description: Option<String>) -> Embed {
        let mut fields = vec![
            EmbedField::new(FIELD_USER_ID, self.user_id.mention(), true),
            EmbedField::new(FIELD_DISPLAY_NAME, self.display_name.clone(), true),
        ];
        if let Some(proof) = self.proof.as_deref().filter(|p| !p.is_empty()) {
            fields.push(EmbedField::new(FIELD_PROOF, proof, false));
        }
        request_embed(self.origin, author, LINK_REQUEST_TITLE, description, fields)
    }

    /// Recovers the request from an embed built by [`LinkRequest::to_embed`].
    pub fn from_embed(embed: &Embed) -> Result<Self, EmbedError> {
        let origin = RequestOrigin::from_embed(embed)?;

        let mention = embed
            .field(FIELD_USER_ID)
            .ok_or(EmbedError::MissingField(FIELD_USER_ID))?;
        let user_id =
            UserId::parse_mention(mention).ok_or_else(|| EmbedError::MalformedField {
                field: FIELD_USER_ID,
                value: mention.to_string(),
            })?;

        let display_name = embed
            .field(FIELD_DISPLAY_NAME)
            .ok_or(EmbedError::MissingField(FIELD_DISPLAY_NAME))?
            .to_string();

        Ok(LinkRequest {
            origin,
            user_id,
            display_name,
            proof: embed.field(FIELD_PROOF).map(str::to_string),
        })
    }
}
