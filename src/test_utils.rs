//! Shared test utilities: generators, fixtures and recording mocks.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use crate::discord::DiscordApiError;
use crate::effects::{
    DiscordEffect, DiscordInterpreter, DiscordResponse, Embed, MemberData, MessageRef,
    OutgoingMessage,
};
use crate::config::{NewRecordSettings, Settings};
use crate::eligibility::{RolePolicy, ScoreThreshold};
use crate::hiscores::{FeedError, HiscoresFeed};
use crate::links::{LinkStore, LinkedUser, MemoryLinkStore, StoreError};
use crate::types::{ChannelId, Entry, GuildId, MessageId, RoleId, UserId, WebhookId};

// ─── Generators ───────────────────────────────────────────────────────────────

pub fn arb_entry() -> impl Strategy<Value = Entry> {
    (
        0u32..20,
        "[A-Za-z][A-Za-z0-9 ]{0,11}",
        0u64..2000,
        0u32..4,
        0u32..4,
        0u32..4,
    )
        .prop_map(|(rank, name, score, first, second, third)| Entry {
            id: u64::from(rank),
            rank,
            name,
            score,
            first_places: first,
            second_places: second,
            third_places: third,
        })
}

// ─── Fixtures ─────────────────────────────────────────────────────────────────

/// Leader 1, first 2, second 3, third 4; tiers 100 -> 10, 500 -> 11, 1000 -> 12.
pub fn test_policy() -> RolePolicy {
    RolePolicy::new(
        RoleId(1),
        RoleId(2),
        RoleId(3),
        RoleId(4),
        vec![
            ScoreThreshold {
                min_score: 100,
                role: RoleId(10),
            },
            ScoreThreshold {
                min_score: 500,
                role: RoleId(11),
            },
            ScoreThreshold {
                min_score: 1000,
                role: RoleId(12),
            },
        ],
    )
    .expect("test policy is valid")
}

/// Admin channel 2, admin role 900, new-record webhook 4 posting in channel 6.
pub fn test_settings() -> Settings {
    Settings {
        guild: GuildId(1),
        admin_channel: ChannelId(2),
        admin_role: RoleId(900),
        new_record: NewRecordSettings {
            webhook: WebhookId(4),
            channel: ChannelId(6),
        },
        hiscore_roles: test_policy(),
    }
}

/// An entry with no placements.
pub fn make_entry(name: &str, rank: u32, score: u64) -> Entry {
    Entry {
        id: u64::from(rank),
        rank,
        name: name.to_string(),
        score,
        first_places: 0,
        second_places: 0,
        third_places: 0,
    }
}

pub fn member(id: u64, roles: &[u64]) -> MemberData {
    MemberData {
        user_id: UserId(id),
        username: format!("user{id}"),
        roles: roles.iter().copied().map(RoleId).collect(),
    }
}

// ─── Mock feed ────────────────────────────────────────────────────────────────

/// A feed whose answer can be switched between success and an HTTP status.
#[derive(Debug)]
pub struct MockFeed {
    answer: Mutex<Result<Vec<Entry>, u16>>,
    fetches: AtomicU64,
}

impl MockFeed {
    pub fn ok(entries: Vec<Entry>) -> Self {
        MockFeed {
            answer: Mutex::new(Ok(entries)),
            fetches: AtomicU64::new(0),
        }
    }

    pub fn failing(status: u16) -> Self {
        MockFeed {
            answer: Mutex::new(Err(status)),
            fetches: AtomicU64::new(0),
        }
    }

    pub fn set_ok(&self, entries: Vec<Entry>) {
        *self.answer.lock().unwrap() = Ok(entries);
    }

    pub fn set_failing(&self, status: u16) {
        *self.answer.lock().unwrap() = Err(status);
    }

    pub fn fetches(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl HiscoresFeed for MockFeed {
    async fn fetch(&self) -> Result<Vec<Entry>, FeedError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match &*self.answer.lock().unwrap() {
            Ok(entries) if entries.is_empty() => Err(FeedError::Empty),
            Ok(entries) => Ok(entries.clone()),
            Err(status) => Err(FeedError::Status(*status)),
        }
    }
}

// ─── Flaky link store ─────────────────────────────────────────────────────────

/// An in-memory store whose writes fail while the returned switch is on.
/// Reads always succeed.
#[derive(Debug, Default)]
pub struct FlakyLinkStore {
    inner: MemoryLinkStore,
    fail_writes: Arc<AtomicBool>,
}

impl FlakyLinkStore {
    pub fn failing_writes() -> (Self, Arc<AtomicBool>) {
        let store = FlakyLinkStore::default();
        store.fail_writes.store(true, Ordering::SeqCst);
        let switch = Arc::clone(&store.fail_writes);
        (store, switch)
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }
}

impl LinkStore for FlakyLinkStore {
    fn upsert(&self, user: LinkedUser) -> Result<(), StoreError> {
        self.check_write()?;
        self.inner.upsert(user)
    }

    fn delete(&self, user_id: UserId) -> Result<Option<LinkedUser>, StoreError> {
        self.check_write()?;
        self.inner.delete(user_id)
    }

    fn get(&self, user_id: UserId) -> Result<Option<LinkedUser>, StoreError> {
        self.inner.get(user_id)
    }

    fn get_by_display_name(&self, name: &str) -> Result<Option<LinkedUser>, StoreError> {
        self.inner.get_by_display_name(name)
    }

    fn all(&self) -> Result<Vec<LinkedUser>, StoreError> {
        self.inner.all()
    }
}

// ─── Mock interpreter ─────────────────────────────────────────────────────────

/// Channel reported for every edited interaction response.
pub const RESPONSE_CHANNEL: ChannelId = ChannelId(555);

/// Records every effect and simulates a small guild.
///
/// Role changes mutate the simulated members, so a second sweep sees the
/// result of the first.
#[derive(Debug, Default)]
pub struct MockInterpreter {
    members: Mutex<BTreeMap<UserId, MemberData>>,
    effects: Mutex<Vec<DiscordEffect>>,
    failing_roles: Mutex<HashSet<RoleId>>,
    failing_channels: Mutex<HashSet<ChannelId>>,
    fail_listing: AtomicBool,
    next_message: AtomicU64,
}

impl MockInterpreter {
    pub fn new() -> Self {
        MockInterpreter {
            next_message: AtomicU64::new(9000),
            ..Default::default()
        }
    }

    pub fn add_member(&self, member: MemberData) {
        self.members
            .lock()
            .unwrap()
            .insert(member.user_id, member);
    }

    /// Makes every grant or revoke of `role` fail.
    pub fn fail_role(&self, role: RoleId) {
        self.failing_roles.lock().unwrap().insert(role);
    }

    /// Makes every `SendMessage` to `channel` fail.
    pub fn fail_sends_to(&self, channel: ChannelId) {
        self.failing_channels.lock().unwrap().insert(channel);
    }

    pub fn fail_member_listing(&self) {
        self.fail_listing.store(true, Ordering::SeqCst);
    }

    pub fn effects(&self) -> Vec<DiscordEffect> {
        self.effects.lock().unwrap().clone()
    }

    pub fn clear_effects(&self) {
        self.effects.lock().unwrap().clear();
    }

    pub fn has_role(&self, user: UserId, role: RoleId) -> bool {
        self.members
            .lock()
            .unwrap()
            .get(&user)
            .is_some_and(|m| m.roles.contains(&role))
    }

    /// Messages posted with `SendMessage`, in order.
    pub fn sent_messages(&self) -> Vec<(ChannelId, OutgoingMessage)> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                DiscordEffect::SendMessage { channel, message } => Some((channel, message)),
                _ => None,
            })
            .collect()
    }

    /// Contents written with `EditOriginalResponse`, in order.
    pub fn edited_responses(&self) -> Vec<String> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                DiscordEffect::EditOriginalResponse { content, .. } => Some(content),
                _ => None,
            })
            .collect()
    }

    /// Embed sets written with `UpdateOriginalEmbeds`, in order.
    pub fn updated_embeds(&self) -> Vec<Vec<Embed>> {
        self.effects()
            .into_iter()
            .filter_map(|e| match e {
                DiscordEffect::UpdateOriginalEmbeds { embeds, .. } => Some(embeds),
                _ => None,
            })
            .collect()
    }

    fn set_role(&self, user: UserId, role: RoleId, hold: bool) -> Result<(), DiscordApiError> {
        if self.failing_roles.lock().unwrap().contains(&role) {
            return Err(DiscordApiError::transient_without_source("injected failure"));
        }
        let mut members = self.members.lock().unwrap();
        let member = members
            .get_mut(&user)
            .ok_or_else(|| DiscordApiError::not_found("Unknown Member"))?;
        member.roles.retain(|r| *r != role);
        if hold {
            member.roles.push(role);
        }
        Ok(())
    }
}

impl DiscordInterpreter for MockInterpreter {
    async fn interpret(&self, effect: DiscordEffect) -> Result<DiscordResponse, DiscordApiError> {
        self.effects.lock().unwrap().push(effect.clone());

        match effect {
            DiscordEffect::AddMemberRole { user, role } => {
                self.set_role(user, role, true).map(|()| DiscordResponse::Ok)
            }
            DiscordEffect::RemoveMemberRole { user, role } => {
                self.set_role(user, role, false).map(|()| DiscordResponse::Ok)
            }
            DiscordEffect::GetMember { user } => self
                .members
                .lock()
                .unwrap()
                .get(&user)
                .cloned()
                .map(DiscordResponse::Member)
                .ok_or_else(|| DiscordApiError::not_found("Unknown Member")),
            DiscordEffect::ListMembers { .. } => {
                if self.fail_listing.load(Ordering::SeqCst) {
                    return Err(DiscordApiError::transient_without_source(
                        "injected listing failure",
                    ));
                }
                Ok(DiscordResponse::Members(
                    self.members.lock().unwrap().values().cloned().collect(),
                ))
            }
            DiscordEffect::SendMessage { channel, .. } => {
                if self.failing_channels.lock().unwrap().contains(&channel) {
                    return Err(DiscordApiError::permanent_without_source("Missing Access"));
                }
                let id = self.next_message.fetch_add(1, Ordering::SeqCst);
                Ok(DiscordResponse::Message(MessageRef {
                    id: MessageId(id),
                    channel_id: channel,
                }))
            }
            DiscordEffect::EditOriginalResponse { .. }
            | DiscordEffect::UpdateOriginalEmbeds { .. } => {
                let id = self.next_message.fetch_add(1, Ordering::SeqCst);
                Ok(DiscordResponse::Message(MessageRef {
                    id: MessageId(id),
                    channel_id: RESPONSE_CHANNEL,
                }))
            }
            DiscordEffect::EditWebhookMessage { .. } => Ok(DiscordResponse::Ok),
        }
    }
}
