// File: chanbot-core/tests/dispatch_tests.rs

mod test_utils;

use std::time::Duration;
use chanbot_common::models::{CallerContext, ChannelKey, PlatformEvent, UserLevel};
use chanbot_core::services::CommandOutcome;
use chanbot_core::{ChatService, Error};
use test_utils::*;
use tokio_test::{assert_err, assert_ok};

fn vip() -> CallerContext {
    CallerContext::new("11", "VipViewer", "vip/1")
}

fn moderator() -> CallerContext {
    CallerContext::new("12", "ModViewer", "moderator/1,subscriber/6")
}

fn viewer() -> CallerContext {
    CallerContext::new("13", "Viewer", "")
}

#[tokio::test]
async fn subscriber_command_rejects_vip_and_accepts_moderator() {
    let h = harness(Duration::ZERO);
    h.repo.set_commands(
        STREAMER_ID,
        vec![command("perk", "{{sender}} used a perk", 30, UserLevel::Subscriber)],
    );
    let chat = ChatService::new(h.registry.clone());

    let out = chat.on_chat_message(&streamer(), &vip(), "!perk").await.unwrap();
    assert_eq!(out, CommandOutcome::InsufficientLevel("perk".into()));

    // The rejection did not start the cooldown.
    let out = chat.on_chat_message(&streamer(), &moderator(), "!perk now").await.unwrap();
    assert_eq!(out, CommandOutcome::Executed("ModViewer used a perk".into()));
    assert_eq!(h.transport.sent(), vec![(streamer(), "ModViewer used a perk".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn cooldown_is_shared_across_callers() {
    let h = harness(Duration::ZERO);
    h.repo.set_commands(STREAMER_ID, vec![command("hug", "hug!", 10, UserLevel::User)]);
    let chat = ChatService::new(h.registry.clone());

    let out = chat.on_chat_message(&streamer(), &viewer(), "!hug").await.unwrap();
    assert!(matches!(out, CommandOutcome::Executed(_)));

    tokio::time::advance(Duration::from_secs(5)).await;
    settle().await;
    let out = chat.on_chat_message(&streamer(), &moderator(), "!hug").await.unwrap();
    assert_eq!(out, CommandOutcome::OnCooldown("hug".into()));

    tokio::time::advance(Duration::from_millis(4_999)).await;
    settle().await;
    let out = chat.on_chat_message(&streamer(), &vip(), "!hug").await.unwrap();
    assert_eq!(out, CommandOutcome::OnCooldown("hug".into()));

    tokio::time::advance(Duration::from_millis(1)).await;
    settle().await;
    let out = chat.on_chat_message(&streamer(), &vip(), "!hug").await.unwrap();
    assert!(matches!(out, CommandOutcome::Executed(_)));
    assert_eq!(h.transport.count(), 2);
}

#[tokio::test]
async fn cooldowns_are_per_channel() {
    let h = harness(Duration::ZERO);
    h.identity.add("other", 2002);
    h.repo.set_commands(STREAMER_ID, vec![command("hug", "hug!", 60, UserLevel::User)]);
    h.repo.set_commands(
        chanbot_common::models::ChannelId(2002),
        vec![command("hug", "hug!", 60, UserLevel::User)],
    );
    let chat = ChatService::new(h.registry.clone());

    let a = chat.on_chat_message(&streamer(), &viewer(), "!hug").await.unwrap();
    let b = chat.on_chat_message(&ChannelKey::new("other"), &viewer(), "!hug").await.unwrap();
    assert!(matches!(a, CommandOutcome::Executed(_)));
    assert!(matches!(b, CommandOutcome::Executed(_)));
}

#[tokio::test]
async fn aliases_are_case_sensitive() {
    let h = harness(Duration::ZERO);
    h.repo.set_commands(STREAMER_ID, vec![command("lurk", "bye", 0, UserLevel::User)]);
    let chat = ChatService::new(h.registry.clone());

    let out = chat.on_chat_message(&streamer(), &viewer(), "!LURK").await.unwrap();
    assert_eq!(out, CommandOutcome::Unknown("LURK".into()));
    let out = chat.on_chat_message(&streamer(), &viewer(), "hello chat").await.unwrap();
    assert_eq!(out, CommandOutcome::NotACommand);
    assert_eq!(h.transport.count(), 0);
}

#[tokio::test]
async fn failing_dynamic_tag_falls_back_without_blocking_others() {
    let h = harness(Duration::ZERO);
    h.repo.set_commands(
        STREAMER_ID,
        vec![command(
            "info",
            "Hi {{sender}}, uptime: {{uptime}}, followers: {{followcount}}",
            0,
            UserLevel::User,
        )],
    );
    let chat = ChatService::new(h.registry.clone());

    let out = chat.on_chat_message(&streamer(), &viewer(), "!info").await.unwrap();
    assert_eq!(
        out,
        CommandOutcome::Executed(
            "Hi Viewer, uptime: error fetching uptime data, followers: 42".into()
        )
    );
}

#[tokio::test]
async fn builtin_tags_render_in_commands() {
    let h = harness(Duration::ZERO);
    h.repo.set_commands(
        STREAMER_ID,
        vec![
            command("commands", "{{channel}} has: {{commands}}", 0, UserLevel::User),
            command("discord", "discord.gg/x", 0, UserLevel::User),
            command("ban", "no", 0, UserLevel::Moderator),
            command("follow", "{{followage}}", 0, UserLevel::User),
        ],
    );
    let chat = ChatService::new(h.registry.clone());

    let out = chat.on_chat_message(&streamer(), &viewer(), "!commands").await.unwrap();
    assert_eq!(
        out,
        CommandOutcome::Executed("streamer has: !commands, !discord, !follow".into())
    );

    let out = chat.on_chat_message(&streamer(), &viewer(), "!follow").await.unwrap();
    assert_eq!(out, CommandOutcome::Executed("Viewer does not follow streamer".into()));
}

#[tokio::test]
async fn bot_messages_are_ignored() {
    let h = harness(Duration::ZERO);
    h.repo.set_commands(STREAMER_ID, vec![command("lurk", "bye", 0, UserLevel::User)]);
    let chat = ChatService::new(h.registry.clone());

    let bot = CallerContext::new("1", "ChanBot", "moderator/1");
    let out = chat.on_chat_message(&streamer(), &bot, "!lurk").await.unwrap();
    assert_eq!(out, CommandOutcome::NotACommand);
    assert_eq!(h.repo.hydrations(), 0);
}

#[tokio::test]
async fn unknown_channel_drops_the_message() {
    let h = harness(Duration::ZERO);
    let chat = ChatService::new(h.registry.clone());

    let err = assert_err!(
        chat.on_chat_message(&ChannelKey::new("nobody"), &viewer(), "!lurk").await
    );
    assert!(matches!(err, Error::Hydration { .. }));
    assert_eq!(h.transport.count(), 0);
}

#[tokio::test]
async fn platform_events_use_their_own_tags() {
    let h = harness(Duration::ZERO);
    h.repo.set_events(
        STREAMER_ID,
        vec![
            event("raid", "{{user}} raided {{channel}} with {{viewers}}!", true),
            event("follow", "thanks {{user}}", false),
            event("host", "{{user}} hosted", true),
        ],
    );
    let chat = ChatService::new(h.registry.clone());

    let raid = PlatformEvent::Raid { user: "Friend".into(), viewers: 12 };
    let out = chat.on_platform_event(&streamer(), &raid).await.unwrap();
    assert_eq!(out.as_deref(), Some("Friend raided streamer with 12!"));

    let follow = PlatformEvent::Follow { user: "New".into() };
    assert_eq!(chat.on_platform_event(&streamer(), &follow).await.unwrap(), None);

    let autohost = PlatformEvent::Host { user: "Auto".into(), viewers: 0, autohost: true };
    assert_eq!(chat.on_platform_event(&streamer(), &autohost).await.unwrap(), None);

    let cheer = PlatformEvent::Cheer { user: "Bits".into(), amount: 100 };
    assert_eq!(chat.on_platform_event(&streamer(), &cheer).await.unwrap(), None);

    assert_eq!(h.transport.count(), 1);
}

#[tokio::test]
async fn channel_disabled_evicts_session() {
    let h = harness(Duration::ZERO);
    let chat = ChatService::new(h.registry.clone());
    chat.on_chat_message(&streamer(), &viewer(), "hi").await.unwrap();
    assert_eq!(h.registry.len(), 1);

    assert_eq!(chat.on_channel_disabled(STREAMER_ID), Some(streamer()));
    assert!(h.registry.is_empty());
    assert_eq!(chat.on_channel_disabled(STREAMER_ID), None);
}

#[tokio::test]
async fn configuration_changed_reloads_commands() {
    let h = harness(Duration::ZERO);
    let chat = ChatService::new(h.registry.clone());
    chat.on_chat_message(&streamer(), &viewer(), "hi").await.unwrap();

    h.repo.set_commands(STREAMER_ID, vec![command("new", "fresh", 0, UserLevel::User)]);
    let out = chat.on_chat_message(&streamer(), &viewer(), "!new").await.unwrap();
    assert_eq!(out, CommandOutcome::Unknown("new".into()));

    assert_ok!(chat.on_configuration_changed(STREAMER_ID).await);
    let out = chat.on_chat_message(&streamer(), &viewer(), "!new").await.unwrap();
    assert_eq!(out, CommandOutcome::Executed("fresh".into()));
}

#[tokio::test(start_paused = true)]
async fn command_survives_reload_during_hydration() {
    let h = harness(Duration::from_secs(1));
    h.repo.set_commands(STREAMER_ID, vec![command("lurk", "bye {{sender}}", 0, UserLevel::User)]);
    let chat = ChatService::new(h.registry.clone());

    let pending =
        tokio::spawn(async move { chat.on_chat_message(&streamer(), &viewer(), "!lurk").await });
    settle().await;
    assert_ok!(h.registry.invalidate(&streamer()).await);

    let out = pending.await.unwrap().unwrap();
    assert_eq!(out, CommandOutcome::Executed("bye Viewer".into()));
    assert_eq!(h.transport.sent(), vec![(streamer(), "bye Viewer".to_string())]);
    assert_eq!(h.registry.len(), 1);
}

#[tokio::test]
async fn leading_whitespace_before_prefix_is_ignored() {
    let h = harness(Duration::ZERO);
    h.repo.set_commands(STREAMER_ID, vec![command("lurk", "bye", 0, UserLevel::User)]);
    let chat = ChatService::new(h.registry.clone());

    let out = chat.on_chat_message(&streamer(), &viewer(), "  !lurk").await.unwrap();
    assert_eq!(out, CommandOutcome::Executed("bye".into()));
}
