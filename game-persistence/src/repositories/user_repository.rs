use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::{prelude::*, users};
use game_types::User;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_user(model: users::Model) -> User {
        User {
            id: model.id,
            username: model.username,
            email: model.email,
            total_games: model.total_games,
            wins: model.wins,
            win_streak: model.win_streak,
            win_ratio: model.win_ratio,
            created_at: model.created_at.to_rfc3339(),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user_model = Users::find_by_id(id).one(&self.db).await?;
        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user_model = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn create_user(&self, user: User) -> Result<User> {
        let now = chrono::Utc::now().into();
        let created_at = chrono::DateTime::parse_from_rfc3339(&user.created_at)
            .unwrap_or_else(|_| chrono::Utc::now().into());

        let user_model = users::ActiveModel {
            id: sea_orm::ActiveValue::Set(user.id),
            username: sea_orm::ActiveValue::Set(user.username),
            email: sea_orm::ActiveValue::Set(user.email),
            total_games: sea_orm::ActiveValue::Set(user.total_games),
            wins: sea_orm::ActiveValue::Set(user.wins),
            win_streak: sea_orm::ActiveValue::Set(user.win_streak),
            win_ratio: sea_orm::ActiveValue::Set(user.win_ratio),
            created_at: sea_orm::ActiveValue::Set(created_at),
            updated_at: sea_orm::ActiveValue::Set(now),
        };

        let saved_model = Users::insert(user_model).exec(&self.db).await?;

        // Fetch the created user
        let created_user = Users::find_by_id(saved_model.last_insert_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created user"))?;

        Ok(Self::model_to_user(created_user))
    }

    pub async fn list_by_username(&self) -> Result<Vec<User>> {
        let users = Users::find()
            .order_by_asc(users::Column::Username)
            .all(&self.db)
            .await?;

        Ok(users.into_iter().map(Self::model_to_user).collect())
    }

    pub async fn list_by_win_streak_desc(&self) -> Result<Vec<User>> {
        let users = Users::find()
            .order_by_desc(users::Column::WinStreak)
            .all(&self.db)
            .await?;

        Ok(users.into_iter().map(Self::model_to_user).collect())
    }

    pub async fn list_by_win_ratio_desc(&self) -> Result<Vec<User>> {
        let users = Users::find()
            .order_by_desc(users::Column::WinRatio)
            .all(&self.db)
            .await?;

        Ok(users.into_iter().map(Self::model_to_user).collect())
    }

    /// Users the reminder sweep may contact.
    pub async fn list_with_email(&self) -> Result<Vec<User>> {
        let users = Users::find()
            .filter(users::Column::Email.ne(""))
            .all(&self.db)
            .await?;

        Ok(users.into_iter().map(Self::model_to_user).collect())
    }

    pub async fn save_streak(&self, user_id: Uuid, win_streak: i32) -> Result<()> {
        let user = Users::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found"))?;

        let updated_user = users::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(user.id),
            username: sea_orm::ActiveValue::Unchanged(user.username),
            email: sea_orm::ActiveValue::Unchanged(user.email),
            total_games: sea_orm::ActiveValue::Unchanged(user.total_games),
            wins: sea_orm::ActiveValue::Unchanged(user.wins),
            win_streak: sea_orm::ActiveValue::Set(win_streak),
            win_ratio: sea_orm::ActiveValue::Unchanged(user.win_ratio),
            created_at: sea_orm::ActiveValue::Unchanged(user.created_at),
            updated_at: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
        };

        Users::update(updated_user).exec(&self.db).await?;
        Ok(())
    }

    pub async fn save_ranking(
        &self,
        user_id: Uuid,
        total_games: i32,
        wins: i32,
        win_ratio: f64,
    ) -> Result<()> {
        let user = Users::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found"))?;

        let updated_user = users::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(user.id),
            username: sea_orm::ActiveValue::Unchanged(user.username),
            email: sea_orm::ActiveValue::Unchanged(user.email),
            total_games: sea_orm::ActiveValue::Set(total_games),
            wins: sea_orm::ActiveValue::Set(wins),
            win_streak: sea_orm::ActiveValue::Unchanged(user.win_streak),
            win_ratio: sea_orm::ActiveValue::Set(win_ratio),
            created_at: sea_orm::ActiveValue::Unchanged(user.created_at),
            updated_at: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
        };

        Users::update(updated_user).exec(&self.db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};
    use uuid::Uuid;

    async fn setup_test_db() -> UserRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        UserRepository::new(db)
    }

    fn test_user(username: &str, email: &str) -> User {
        User::new(
            Uuid::new_v4(),
            username.to_string(),
            email.to_string(),
            chrono::Utc::now().to_rfc3339(),
        )
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = setup_test_db().await;

        let user = test_user("alice", "alice@example.com");
        let user_id = user.id;

        let created_user = repo.create_user(user.clone()).await.unwrap();
        assert_eq!(created_user.username, "alice");
        assert_eq!(created_user.total_games, 0);
        assert_eq!(created_user.win_ratio, 0.0);

        let found_user = repo.find_by_id(user_id).await.unwrap().unwrap();
        assert_eq!(found_user.email, user.email);

        let found_by_username = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found_by_username.id, user_id);

        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let repo = setup_test_db().await;

        repo.create_user(test_user("bob", "bob@example.com"))
            .await
            .unwrap();

        // Unique index on username backstops the handler-level check
        let result = repo.create_user(test_user("bob", "other@example.com")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_by_username_is_sorted() {
        let repo = setup_test_db().await;

        for name in ["carol", "alice", "bob"] {
            repo.create_user(test_user(name, "x@example.com"))
                .await
                .unwrap();
        }

        let users = repo.list_by_username().await.unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_save_streak_and_ordering() {
        let repo = setup_test_db().await;

        let alice = repo
            .create_user(test_user("alice", "a@example.com"))
            .await
            .unwrap();
        let bob = repo
            .create_user(test_user("bob", "b@example.com"))
            .await
            .unwrap();

        repo.save_streak(alice.id, 2).await.unwrap();
        repo.save_streak(bob.id, 5).await.unwrap();

        let users = repo.list_by_win_streak_desc().await.unwrap();
        assert_eq!(users[0].username, "bob");
        assert_eq!(users[0].win_streak, 5);
        assert_eq!(users[1].username, "alice");
        assert_eq!(users[1].win_streak, 2);
    }

    #[tokio::test]
    async fn test_save_ranking_and_ordering() {
        let repo = setup_test_db().await;

        let alice = repo
            .create_user(test_user("alice", "a@example.com"))
            .await
            .unwrap();
        let bob = repo
            .create_user(test_user("bob", "b@example.com"))
            .await
            .unwrap();

        repo.save_ranking(alice.id, 4, 3, 0.75).await.unwrap();
        repo.save_ranking(bob.id, 2, 1, 0.5).await.unwrap();

        let users = repo.list_by_win_ratio_desc().await.unwrap();
        assert_eq!(users[0].username, "alice");
        assert_eq!(users[0].total_games, 4);
        assert_eq!(users[0].wins, 3);
        assert_eq!(users[0].win_ratio, 0.75);
        assert_eq!(users[1].username, "bob");
    }

    #[tokio::test]
    async fn test_list_with_email_skips_blank_addresses() {
        let repo = setup_test_db().await;

        repo.create_user(test_user("alice", "a@example.com"))
            .await
            .unwrap();
        repo.create_user(test_user("ghost", "")).await.unwrap();

        let users = repo.list_with_email().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "alice");
    }
}
