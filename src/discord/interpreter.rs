//! Effect interpreter over the chat platform REST API.
//!
//! Key implementation details:
//! - Member listing is paginated with an `after` cursor until a short page
//! - Missing or null `roles` on a member means "no roles"
//! - Every call is attempted once; failures are categorized, never retried

use std::future::Future;

use reqwest::{Method, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::effects::{
    Component, DiscordEffect, DiscordInterpreter, DiscordResponse, Embed, MemberData,
    MessageRef, OutgoingMessage,
};
use crate::types::{ChannelId, MessageId, RoleId, UserId, WebhookId};

use super::client::DiscordClient;
use super::error::DiscordApiError;

/// Largest page the member list endpoint accepts.
pub const MAX_MEMBER_PAGE: u32 = 1000;

// ─── Wire Types ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawUser {
    id: UserId,
    #[serde(default)]
    username: String,
}

#[derive(Debug, Deserialize)]
struct RawMember {
    user: RawUser,
    #[serde(default)]
    roles: Option<Vec<RoleId>>,
}

impl From<RawMember> for MemberData {
    fn from(raw: RawMember) -> Self {
        MemberData {
            user_id: raw.user.id,
            username: raw.user.username,
            roles: raw.roles.unwrap_or_default(),
        }
    }
}

/// PATCH body for `@original`. `None` fields are left out and keep their
/// current value.
#[derive(Debug, Default, Serialize)]
struct OriginalEdit<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    embeds: Option<&'a [Embed]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<&'a [Component]>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    id: MessageId,
    channel_id: ChannelId,
}

// ─── Interpreter Implementation ───────────────────────────────────────────────

impl DiscordInterpreter for DiscordClient {
    async fn interpret(&self, effect: DiscordEffect) -> Result<DiscordResponse, DiscordApiError> {
        interpret_discord_effect(self, effect).await
    }
}

/// Executes a single effect against the REST API.
pub async fn interpret_discord_effect(
    client: &DiscordClient,
    effect: DiscordEffect,
) -> Result<DiscordResponse, DiscordApiError> {
    trace!(?effect, "Interpreting effect");
    match effect {
        DiscordEffect::AddMemberRole { user, role } => {
            set_member_role(client, Method::PUT, user, role).await
        }
        DiscordEffect::RemoveMemberRole { user, role } => {
            set_member_role(client, Method::DELETE, user, role).await
        }
        DiscordEffect::GetMember { user } => get_member(client, user).await,
        DiscordEffect::ListMembers { page_size } => list_members(client, page_size).await,
        DiscordEffect::SendMessage { channel, message } => {
            send_message(client, channel, &message).await
        }
        DiscordEffect::EditOriginalResponse {
            interaction_token,
            content,
        } => {
            let body = OriginalEdit {
                content: Some(content.as_str()),
                ..Default::default()
            };
            edit_original(client, &interaction_token, &body).await
        }
        DiscordEffect::UpdateOriginalEmbeds {
            interaction_token,
            embeds,
        } => {
            let body = OriginalEdit {
                embeds: Some(embeds.as_slice()),
                components: Some(&[]),
                ..Default::default()
            };
            edit_original(client, &interaction_token, &body).await
        }
        DiscordEffect::EditWebhookMessage {
            webhook,
            token,
            message,
            embeds,
        } => edit_webhook_message(client, webhook, &token, message, embeds).await,
    }
}

/// Turns a non-success response into a categorized error.
async fn check_status(response: Response) -> Result<Response, DiscordApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DiscordApiError::from_status(status.as_u16(), body))
}

// ─── Role Operations ──────────────────────────────────────────────────────────

async fn set_member_role(
    client: &DiscordClient,
    method: Method,
    user: UserId,
    role: RoleId,
) -> Result<DiscordResponse, DiscordApiError> {
    let path = format!("{}/{}/roles/{}", client.members_path(), user, role);
    let response = client
        .request(method, &path)
        .send()
        .await
        .map_err(DiscordApiError::from_reqwest)?;
    check_status(response).await?;
    Ok(DiscordResponse::Ok)
}

// ─── Member Operations ────────────────────────────────────────────────────────

async fn get_member(
    client: &DiscordClient,
    user: UserId,
) -> Result<DiscordResponse, DiscordApiError> {
    let path = format!("{}/{}", client.members_path(), user);
    let response = client
        .request(Method::GET, &path)
        .send()
        .await
        .map_err(DiscordApiError::from_reqwest)?;
    let member: RawMember = check_status(response)
        .await?
        .json()
        .await
        .map_err(DiscordApiError::from_reqwest)?;
    Ok(DiscordResponse::Member(member.into()))
}

async fn list_members(
    client: &DiscordClient,
    page_size: u32,
) -> Result<DiscordResponse, DiscordApiError> {
    let page_size = page_size.clamp(1, MAX_MEMBER_PAGE);
    let members = collect_member_pages(page_size, |after| {
        fetch_member_page(client, page_size, after)
    })
    .await?;

    debug!(members = members.len(), "Listed guild members");
    Ok(DiscordResponse::Members(members))
}

async fn fetch_member_page(
    client: &DiscordClient,
    page_size: u32,
    after: UserId,
) -> Result<Vec<RawMember>, DiscordApiError> {
    let response = client
        .request(Method::GET, &client.members_path())
        .query(&[("limit", page_size.to_string()), ("after", after.to_string())])
        .send()
        .await
        .map_err(DiscordApiError::from_reqwest)?;

    check_status(response)
        .await?
        .json()
        .await
        .map_err(DiscordApiError::from_reqwest)
}

/// Walks the member list with an `after` cursor, starting at zero.
///
/// Stops after the first page shorter than `page_size`, so an exactly full
/// final page costs one extra, empty fetch. Any page error aborts the walk.
async fn collect_member_pages<P, Fut>(
    page_size: u32,
    mut fetch_page: P,
) -> Result<Vec<MemberData>, DiscordApiError>
where
    P: FnMut(UserId) -> Fut,
    Fut: Future<Output = Result<Vec<RawMember>, DiscordApiError>>,
{
    let mut after = UserId(0);
    let mut all_members = Vec::new();

    loop {
        let page = fetch_page(after).await?;

        let is_last_page = page.len() < page_size as usize;
        if let Some(last) = page.last() {
            after = last.user.id;
        }
        all_members.extend(page.into_iter().map(MemberData::from));

        if is_last_page {
            return Ok(all_members);
        }
    }
}

// ─── Message Operations ───────────────────────────────────────────────────────

async fn send_message(
    client: &DiscordClient,
    channel: ChannelId,
    message: &OutgoingMessage,
) -> Result<DiscordResponse, DiscordApiError> {
    let path = format!("/channels/{}/messages", channel);
    let response = client
        .request(Method::POST, &path)
        .json(message)
        .send()
        .await
        .map_err(DiscordApiError::from_reqwest)?;
    let created: RawMessage = check_status(response)
        .await?
        .json()
        .await
        .map_err(DiscordApiError::from_reqwest)?;
    Ok(DiscordResponse::Message(MessageRef {
        id: created.id,
        channel_id: created.channel_id,
    }))
}

async fn edit_original(
    client: &DiscordClient,
    interaction_token: &str,
    body: &OriginalEdit<'_>,
) -> Result<DiscordResponse, DiscordApiError> {
    let path = format!(
        "/webhooks/{}/{}/messages/@original",
        client.application(),
        interaction_token
    );
    let response = client
        .webhook_request(Method::PATCH, &path)
        .json(body)
        .send()
        .await
        .map_err(DiscordApiError::from_reqwest)?;
    let message: RawMessage = check_status(response)
        .await?
        .json()
        .await
        .map_err(DiscordApiError::from_reqwest)?;
    Ok(DiscordResponse::Message(MessageRef {
        id: message.id,
        channel_id: message.channel_id,
    }))
}

async fn edit_webhook_message(
    client: &DiscordClient,
    webhook: WebhookId,
    token: &str,
    message: MessageId,
    embeds: Vec<Embed>,
) -> Result<DiscordResponse, DiscordApiError> {
    let path = format!("/webhooks/{}/{}/messages/{}", webhook, token, message);
    let body = OutgoingMessage {
        embeds,
        ..Default::default()
    };
    let response = client
        .webhook_request(Method::PATCH, &path)
        .json(&body)
        .send()
        .await
        .map_err(DiscordApiError::from_reqwest)?;
    check_status(response).await?;
    Ok(DiscordResponse::Ok)
}
