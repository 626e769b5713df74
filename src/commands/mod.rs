//! Bot commands carried by interactions.
//!
//! # Supported Commands
//!
//! | Trigger | Command |
//! |---------|---------|
//! | `/link_name` | [`Command::LinkName`] (opens the link request modal) |
//! | link request modal submitted | [`Command::SubmitLinkRequest`] |
//! | Approve / Decline buttons | [`Command::ApproveLink`] / [`Command::DeclineLink`] |
//! | `/unlink_name` | [`Command::UnlinkName`] |
//! | `/refresh_hiscores_roles` | [`Command::RefreshRoles`] (admin role only) |
//! | `resend_new_record` message command | [`Command::ResendNewRecord`] |

mod parser;
mod types;

pub use parser::parse_command;
pub use types::{
    APPROVE_BUTTON, Command, DECLINE_BUTTON, INPUT_DISPLAY_NAME, INPUT_PROOF, LINK_NAME,
    LINK_REQUEST_MODAL, REFRESH_HISCORES_ROLES, RESEND_NEW_RECORD, UNLINK_NAME,
};
