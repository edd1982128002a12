// File: chanbot-core/src/repositories/postgres/channel_config.rs

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use chanbot_common::error::Error;
use chanbot_common::models::{ChannelId, Command, EventConfig, TimerConfig, UserLevel};
use chanbot_common::traits::ChannelConfigRepository;

pub struct PostgresChannelConfigRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresChannelConfigRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn non_negative(row: &PgRow, column: &str) -> Result<u32, Error> {
    let value: i32 = row.try_get(column)?;
    Ok(u32::try_from(value)?)
}

fn command_from_row(row: &PgRow) -> Result<Command, Error> {
    let level: i32 = row.try_get("user_level")?;
    Ok(Command {
        alias: row.try_get("alias")?,
        message: row.try_get("message")?,
        cooldown_seconds: non_negative(row, "cooldown")?,
        min_user_level: UserLevel::try_from(level)?,
    })
}

fn timer_from_row(row: &PgRow) -> Result<TimerConfig, Error> {
    Ok(TimerConfig {
        name: row.try_get("name")?,
        message: row.try_get("message")?,
        interval_seconds: non_negative(row, "interval")?,
        message_threshold: non_negative(row, "message_threshold")?,
        enabled: row.try_get("enabled")?,
    })
}

#[async_trait]
impl ChannelConfigRepository for PostgresChannelConfigRepository {
    async fn fetch_commands(&self, channel_id: ChannelId) -> Result<Vec<Command>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT alias, message, cooldown, user_level
            FROM commands
            WHERE channel_id = $1
            ORDER BY alias
            "#,
        )
            .bind(channel_id.0)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(command_from_row).collect()
    }

    async fn fetch_events(&self, channel_id: ChannelId) -> Result<Vec<EventConfig>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT name, message, enabled
            FROM events
            WHERE channel_id = $1
            "#,
        )
            .bind(channel_id.0)
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(EventConfig {
                name: row.try_get("name")?,
                message: row.try_get("message")?,
                enabled: row.try_get("enabled")?,
            });
        }
        Ok(out)
    }

    async fn fetch_timers(&self, channel_id: ChannelId) -> Result<Vec<TimerConfig>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT name, message, enabled, "interval", message_threshold
            FROM timers
            WHERE channel_id = $1
            ORDER BY name
            "#,
        )
            .bind(channel_id.0)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(timer_from_row).collect()
    }
}
