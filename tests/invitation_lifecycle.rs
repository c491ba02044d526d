//! Integration tests for the invitation lifecycle.
//!
//! These tests drive the full flow through the public API:
//! 1. CreateInvitationHandler snapshots the invitee credential and stores the invitation
//! 2. InvitationStateMachine refreshes, cancels and accepts
//! 3. InMemoryEventBus delivers events to subscribed listeners
//! 4. HmacCredentialIssuer issues activation tokens that verify
//!
//! Uses in-memory adapters and a fixed clock; no external services.

use async_trait::async_trait;
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use referral_invitations::adapters::{
    HmacCredentialIssuer, InMemoryEventBus, InMemoryInvitationRepository,
};
use referral_invitations::application::{
    CreateInvitationCommand, CreateInvitationHandler, InvitationQueries, InvitationStateMachine,
};
use referral_invitations::config::{CredentialConfig, InvitationConfig};
use referral_invitations::domain::foundation::{
    DomainError, EventEnvelope, TeamId, Timestamp, UserId,
};
use referral_invitations::domain::invitation::{
    CredentialFingerprint, Invitation, InvitationEventPayload, InvitationStatus,
};
use referral_invitations::ports::{
    EventHandler, EventSubscriber, FixedClock, InvitationRepository, InviteeCredentials,
};
use secrecy::SecretString;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// User store stand-in: invitee id to current password hash.
#[derive(Default)]
struct UserDirectory {
    hashes: Mutex<HashMap<String, String>>,
}

impl UserDirectory {
    fn set_password(&self, user: &str, hash: &str) {
        self.hashes
            .lock()
            .unwrap()
            .insert(user.to_string(), hash.to_string());
    }
}

#[async_trait]
impl InviteeCredentials for UserDirectory {
    async fn current_fingerprint(
        &self,
        invitee_id: &UserId,
    ) -> Result<Option<CredentialFingerprint>, DomainError> {
        Ok(CredentialFingerprint::from_stored(
            self.hashes.lock().unwrap().get(invitee_id.as_str()).cloned(),
        ))
    }
}

/// Listener that records which referrers earned credit.
#[derive(Default)]
struct ReferralCredit {
    credited: Mutex<Vec<String>>,
}

#[async_trait]
impl EventHandler for ReferralCredit {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let payload: InvitationEventPayload = event
            .payload_as()
            .map_err(|e| DomainError::validation("payload", e.to_string()))?;
        if let Some(user) = payload.invitation.referral_user_id {
            self.credited.lock().unwrap().push(user.to_string());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ReferralCredit"
    }
}

struct World {
    repo: Arc<InMemoryInvitationRepository>,
    bus: Arc<InMemoryEventBus>,
    users: Arc<UserDirectory>,
    clock: Arc<FixedClock>,
    issuer: Arc<HmacCredentialIssuer>,
    creator: CreateInvitationHandler,
    machine: InvitationStateMachine,
    queries: InvitationQueries,
}

fn start() -> Timestamp {
    Timestamp::from_unix_secs(1_705_276_800)
}

fn world_with(config: InvitationConfig) -> World {
    let repo = Arc::new(InMemoryInvitationRepository::new());
    let bus = Arc::new(InMemoryEventBus::new());
    let users = Arc::new(UserDirectory::default());
    let clock = Arc::new(FixedClock::new(start()));
    let issuer = Arc::new(HmacCredentialIssuer::new(
        &CredentialConfig {
            activation_secret: SecretString::new("k".repeat(32)),
            activation_ttl_minutes: 60,
        },
        clock.clone(),
    ));

    let creator = CreateInvitationHandler::new(repo.clone(), users.clone(), clock.clone());
    let machine = InvitationStateMachine::new(
        repo.clone(),
        bus.clone(),
        issuer.clone(),
        users.clone(),
        config,
    )
    .with_clock(clock.clone());
    let queries = InvitationQueries::new(repo.clone());

    World {
        repo,
        bus,
        users,
        clock,
        issuer,
        creator,
        machine,
        queries,
    }
}

fn world() -> World {
    world_with(InvitationConfig::default())
}

async fn invite(world: &World, invitee: &str) -> Invitation {
    world.users.set_password(invitee, "$2y$10$temporary");
    world
        .creator
        .handle(CreateInvitationCommand {
            referral_team_id: Some(TeamId::new("team-7").unwrap()),
            referral_user_id: Some(UserId::new("referrer").unwrap()),
            invitee_id: UserId::new(invitee).unwrap(),
        })
        .await
        .unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn invitee_signs_up_through_activation_token() {
    let world = world();
    let credit = Arc::new(ReferralCredit::default());
    world.bus.subscribe("invitation.successful", credit.clone());

    let created = invite(&world, "alice").await;
    let token = created.token.clone().unwrap();

    // Invitee follows the link.
    let mut invitation = world.queries.get_by_token(token.as_str()).await.unwrap();
    let activation = world
        .machine
        .accept(&mut invitation)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        world.issuer.verify(activation.as_str()).unwrap().as_str(),
        "alice"
    );

    // Invitee sets a password an hour later.
    world.clock.advance_hours(1);
    world.users.set_password("alice", "$2y$10$chosen-by-alice");

    assert!(world.machine.is_successful(&mut invitation).await.unwrap());
    assert_eq!(*credit.credited.lock().unwrap(), vec!["referrer".to_string()]);

    let types: Vec<_> = world
        .bus
        .published_events()
        .into_iter()
        .map(|e| e.event_type)
        .collect();
    assert_eq!(types, vec!["invitation.accepted", "invitation.successful"]);

    // Token no longer resolves.
    assert!(world.queries.get_by_token(token.as_str()).await.is_err());
}

#[tokio::test]
async fn invitation_expires_lazily_and_cannot_be_cancelled() {
    let world = world();
    let mut invitation = invite(&world, "bob").await;

    world.clock.advance_hours(47);
    assert!(world.machine.is_pending(&mut invitation).await.unwrap());
    assert_eq!(world.bus.event_count(), 0);

    world.clock.advance_hours(2);
    assert!(!world.machine.cancel(&mut invitation).await.unwrap());

    assert_eq!(invitation.status, InvitationStatus::Expired);
    assert_eq!(world.bus.events_of_type("invitation.expired").len(), 1);
    assert!(!world.bus.has_event("invitation.cancelled"));

    let stored = world.repo.find_by_id(&invitation.id).await.unwrap().unwrap();
    assert_eq!(stored.status, InvitationStatus::Expired);
    assert!(stored.token.is_none());
}

#[tokio::test]
async fn cancelled_invitation_is_listed_under_its_status() {
    let world = world();
    let mut first = invite(&world, "carol").await;
    world.clock.advance_hours(1);
    let _second = invite(&world, "dave").await;

    assert!(world.machine.cancel(&mut first).await.unwrap());

    let team = TeamId::new("team-7").unwrap();
    let cancelled = world
        .queries
        .get_by_referral_team(&team, Some(InvitationStatus::Cancelled))
        .await
        .unwrap();
    let all = world.queries.get_by_referral_team(&team, None).await.unwrap();

    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].id, first.id);
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].id, first.id);

    // Cancel keeps the lookup token.
    let token = first.token.clone().unwrap();
    let found = world.queries.get_by_token(token.as_str()).await.unwrap();
    assert_eq!(found.status, InvitationStatus::Cancelled);
}

#[tokio::test]
async fn two_readers_of_a_stale_copy_announce_expiry_once() {
    let world = world();
    let original = invite(&world, "erin").await;
    world.clock.advance_hours(48);

    let mut a = original.clone();
    let mut b = original;
    assert!(world.machine.is_expired(&mut a).await.unwrap());
    assert!(world.machine.is_expired(&mut b).await.unwrap());

    assert_eq!(world.bus.event_count(), 1);
    assert_eq!(a, b);
}

#[tokio::test]
async fn failing_listener_does_not_block_transition() {
    struct Broken;

    #[async_trait]
    impl EventHandler for Broken {
        async fn handle(&self, _event: EventEnvelope) -> Result<(), DomainError> {
            Err(DomainError::validation("mail", "smtp unavailable"))
        }
        fn name(&self) -> &'static str {
            "Broken"
        }
    }

    let world = world();
    world.bus.subscribe("invitation.cancelled", Arc::new(Broken));
    let mut invitation = invite(&world, "frank").await;

    assert!(world.machine.cancel(&mut invitation).await.unwrap());
    assert!(world.machine.is_cancelled(&mut invitation).await.unwrap());
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn expires_exactly_at_threshold(threshold in 1u32..200, elapsed_minutes in 0i64..20_000) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        let expired = runtime.block_on(async {
            let world = world_with(InvitationConfig::new(threshold, "invitation"));
            let mut invitation = invite(&world, "grace").await;
            world.clock.set(start().plus_minutes(elapsed_minutes));
            world.machine.is_expired(&mut invitation).await.unwrap()
        });

        prop_assert_eq!(expired, elapsed_minutes / 60 >= i64::from(threshold));
    }

    #[test]
    fn terminal_status_never_changes(extra_hours in 0i64..500, change_password in any::<bool>()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        runtime.block_on(async {
            let world = world();
            let mut invitation = invite(&world, "heidi").await;
            world.machine.cancel(&mut invitation).await.unwrap();

            world.clock.advance_hours(extra_hours);
            if change_password {
                world.users.set_password("heidi", "$2y$10$new");
            }

            assert!(world.machine.is_cancelled(&mut invitation).await.unwrap());
            assert_eq!(world.bus.event_count(), 1);
        });
    }
}
