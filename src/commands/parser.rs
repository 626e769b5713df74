//! Maps typed interactions to bot commands.
//!
//! This is a pure function over [`Interaction`]; it does no I/O and never
//! fails. Interactions that name no known command map to `None` and are
//! answered with a generic ephemeral reply by the caller.

use super::types::{
    APPROVE_BUTTON, Command, DECLINE_BUTTON, INPUT_DISPLAY_NAME, INPUT_PROOF, LINK_NAME,
    LINK_REQUEST_MODAL, REFRESH_HISCORES_ROLES, RESEND_NEW_RECORD, UNLINK_NAME,
};
use crate::webhooks::Interaction;

/// Parses the command carried by `interaction`.
///
/// # Parsing Rules
///
/// - Command names and custom ids match exactly
/// - Display names are trimmed; an empty name is not a valid submission
/// - An empty proof counts as no proof
/// - Buttons on a message without embeds are ignored
pub fn parse_command(interaction: &Interaction) -> Option<Command> {
    match interaction {
        Interaction::Ping => None,

        Interaction::Command { name, target, .. } => match (name.as_str(), target) {
            (LINK_NAME, None) => Some(Command::LinkName),
            (UNLINK_NAME, None) => Some(Command::UnlinkName),
            (REFRESH_HISCORES_ROLES, None) => Some(Command::RefreshRoles),
            (RESEND_NEW_RECORD, Some(message)) => Some(Command::ResendNewRecord {
                message: message.clone(),
            }),
            _ => None,
        },

        Interaction::Component {
            custom_id, message, ..
        } => {
            let request = message.embeds.first()?.clone();
            match custom_id.as_str() {
                APPROVE_BUTTON => Some(Command::ApproveLink { request }),
                DECLINE_BUTTON => Some(Command::DeclineLink { request }),
                _ => None,
            }
        }

        Interaction::ModalSubmit {
            custom_id, values, ..
        } if custom_id == LINK_REQUEST_MODAL => {
            let display_name = values.get(INPUT_DISPLAY_NAME)?.trim();
            if display_name.is_empty() {
                return None;
            }
            let proof = values
                .get(INPUT_PROOF)
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(str::to_string);
            Some(Command::SubmitLinkRequest {
                display_name: display_name.to_string(),
                proof,
            })
        }

        Interaction::ModalSubmit { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Embed;
    use crate::types::{ChannelId, MessageId, UserId};
    use crate::webhooks::{InteractionContext, InteractionMember, TargetMessage};
    use std::collections::BTreeMap;

    fn ctx() -> InteractionContext {
        InteractionContext {
            id: "1".to_string(),
            token: "tok".to_string(),
            channel_id: Some(ChannelId(5)),
            member: InteractionMember {
                user_id: UserId(100),
                username: "zed".to_string(),
                avatar_url: None,
                roles: vec![],
            },
        }
    }

    fn message(embeds: Vec<Embed>) -> TargetMessage {
        TargetMessage {
            id: MessageId(9),
            channel_id: ChannelId(5),
            webhook_id: None,
            embeds,
        }
    }

    fn slash(name: &str) -> Interaction {
        Interaction::Command {
            ctx: ctx(),
            name: name.to_string(),
            target: None,
        }
    }

    fn modal(values: &[(&str, &str)]) -> Interaction {
        Interaction::ModalSubmit {
            ctx: ctx(),
            custom_id: LINK_REQUEST_MODAL.to_string(),
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse_command(&slash("link_name")), Some(Command::LinkName));
        assert_eq!(parse_command(&slash("unlink_name")), Some(Command::UnlinkName));
        assert_eq!(
            parse_command(&slash("refresh_hiscores_roles")),
            Some(Command::RefreshRoles)
        );
        assert_eq!(parse_command(&slash("Link_Name")), None);
        assert_eq!(parse_command(&Interaction::Ping), None);
    }

    #[test]
    fn resend_requires_a_target() {
        assert_eq!(parse_command(&slash(RESEND_NEW_RECORD)), None);

        let target = message(vec![]);
        let interaction = Interaction::Command {
            ctx: ctx(),
            name: RESEND_NEW_RECORD.to_string(),
            target: Some(target.clone()),
        };
        assert_eq!(
            parse_command(&interaction),
            Some(Command::ResendNewRecord { message: target })
        );
    }

    #[test]
    fn buttons_carry_the_request_embed() {
        let embed = Embed {
            title: Some("Link name request".to_string()),
            ..Default::default()
        };
        let press = |custom_id: &str, embeds: Vec<Embed>| Interaction::Component {
            ctx: ctx(),
            custom_id: custom_id.to_string(),
            message: message(embeds),
        };

        assert_eq!(
            parse_command(&press(APPROVE_BUTTON, vec![embed.clone()])),
            Some(Command::ApproveLink {
                request: embed.clone()
            })
        );
        assert_eq!(
            parse_command(&press(DECLINE_BUTTON, vec![embed.clone()])),
            Some(Command::DeclineLink { request: embed })
        );
        assert_eq!(parse_command(&press(APPROVE_BUTTON, vec![])), None);
        assert_eq!(parse_command(&press("other", vec![Embed::default()])), None);
    }

    #[test]
    fn modal_submission() {
        assert_eq!(
            parse_command(&modal(&[("display_name", "  Zed "), ("proof", "")])),
            Some(Command::SubmitLinkRequest {
                display_name: "Zed".to_string(),
                proof: None
            })
        );
        assert_eq!(
            parse_command(&modal(&[("display_name", "Zed"), ("proof", "https://x")])),
            Some(Command::SubmitLinkRequest {
                display_name: "Zed".to_string(),
                proof: Some("https://x".to_string())
            })
        );
        assert_eq!(parse_command(&modal(&[("display_name", "  ")])), None);
        assert_eq!(parse_command(&modal(&[("proof", "x")])), None);
    }
}
