//! Command types for the bot's slash commands, buttons and modals.

use crate::effects::Embed;
use crate::webhooks::TargetMessage;

/// Slash command: open the link request modal.
pub const LINK_NAME: &str = "link_name";
/// Slash command: unlink the caller.
pub const UNLINK_NAME: &str = "unlink_name";
/// Slash command: refresh the leaderboard and run a full sweep (admins).
pub const REFRESH_HISCORES_ROLES: &str = "refresh_hiscores_roles";
/// Message command: repost a new-record webhook message.
pub const RESEND_NEW_RECORD: &str = "resend_new_record";

pub const LINK_REQUEST_MODAL: &str = "link_request_modal";
pub const INPUT_DISPLAY_NAME: &str = "display_name";
pub const INPUT_PROOF: &str = "proof";

pub const APPROVE_BUTTON: &str = "approve_button";
pub const DECLINE_BUTTON: &str = "decline_button";

/// A parsed bot command.
///
/// The interaction context (caller, channel, token) travels alongside the
/// command rather than inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/link_name`: answer with the link request modal.
    LinkName,

    /// Link request modal submitted.
    SubmitLinkRequest {
        display_name: String,
        proof: Option<String>,
    },

    /// Approve button pressed on a link request embed.
    ApproveLink { request: Embed },

    /// Decline button pressed on a link request embed.
    DeclineLink { request: Embed },

    /// `/unlink_name`.
    UnlinkName,

    /// `/refresh_hiscores_roles`.
    RefreshRoles,

    /// `resend_new_record` on a message.
    ResendNewRecord { message: TargetMessage },
}

impl Command {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::LinkName => LINK_NAME,
            Command::SubmitLinkRequest { .. } => LINK_REQUEST_MODAL,
            Command::ApproveLink { .. } => APPROVE_BUTTON,
            Command::DeclineLink { .. } => DECLINE_BUTTON,
            Command::UnlinkName => UNLINK_NAME,
            Command::RefreshRoles => REFRESH_HISCORES_ROLES,
            Command::ResendNewRecord { .. } => RESEND_NEW_RECORD,
        }
    }
}
