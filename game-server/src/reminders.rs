use async_trait::async_trait;
use tracing::info;

use game_persistence::repositories::{GameRepository, UserRepository};

pub const REMINDER_SUBJECT: &str = "Time to Make Your Move in Guard Boost Hit!";

/// Outbound mail seam. Delivery itself is an external concern; the
/// shipped implementation just logs.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str);
}

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) {
        info!(to, subject, body, "reminder email queued");
    }
}

/// One reminder sweep: every user with an email address and at least one
/// open game gets a nudge. Returns how many reminders went out.
pub async fn send_move_reminders(
    user_repository: &UserRepository,
    game_repository: &GameRepository,
    mailer: &dyn Mailer,
) -> anyhow::Result<usize> {
    let users = user_repository.list_with_email().await?;
    let mut sent = 0;

    for user in users {
        let open_games = game_repository.list_open_for_user(user.id).await?;
        if open_games.is_empty() {
            continue;
        }

        let body = format!(
            "Hello {}, it looks like you have some incomplete games of \
             Guard Boost Hit waiting for you.",
            user.username
        );
        mailer.send(&user.email, REMINDER_SUBJECT, &body).await;
        sent += 1;
    }

    Ok(sent)
}
