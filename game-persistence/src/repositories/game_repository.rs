use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::{games, prelude::*};
use game_types::{Game, MoveRecord};

pub struct GameRepository {
    db: DatabaseConnection,
}

impl GameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_game(model: games::Model) -> Game {
        let moves: Vec<MoveRecord> =
            serde_json::from_value(model.moves).unwrap_or_default();

        Game {
            id: model.id,
            user_id: model.user_id,
            game_over: model.game_over,
            cancelled: model.cancelled,
            won: model.won,
            match_date: model.match_date.to_rfc3339(),
            message: model.message,
            last_user_move: model.last_user_move,
            last_ai_move: model.last_ai_move,
            moves,
        }
    }

    fn game_to_active_model(game: &Game) -> Result<games::ActiveModel> {
        let match_date = chrono::DateTime::parse_from_rfc3339(&game.match_date)
            .unwrap_or_else(|_| chrono::Utc::now().into());
        let moves = serde_json::to_value(&game.moves)?;

        Ok(games::ActiveModel {
            id: sea_orm::ActiveValue::Set(game.id),
            user_id: sea_orm::ActiveValue::Set(game.user_id),
            game_over: sea_orm::ActiveValue::Set(game.game_over),
            cancelled: sea_orm::ActiveValue::Set(game.cancelled),
            won: sea_orm::ActiveValue::Set(game.won),
            match_date: sea_orm::ActiveValue::Set(match_date),
            message: sea_orm::ActiveValue::Set(game.message.clone()),
            last_user_move: sea_orm::ActiveValue::Set(game.last_user_move.clone()),
            last_ai_move: sea_orm::ActiveValue::Set(game.last_ai_move.clone()),
            moves: sea_orm::ActiveValue::Set(moves),
        })
    }

    pub async fn create_game(&self, game: Game) -> Result<Game> {
        let game_model = Self::game_to_active_model(&game)?;
        let saved_model = Games::insert(game_model).exec(&self.db).await?;

        let created_game = Games::find_by_id(saved_model.last_insert_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created game"))?;

        Ok(Self::model_to_game(created_game))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Game>> {
        let game_model = Games::find_by_id(id).one(&self.db).await?;
        Ok(game_model.map(Self::model_to_game))
    }

    /// Full-entity write-back after a state transition. Idempotent for
    /// an unchanged record.
    pub async fn save(&self, game: &Game) -> Result<()> {
        let game_model = Self::game_to_active_model(game)?;
        Games::update(game_model).exec(&self.db).await?;
        Ok(())
    }

    pub async fn list_by_date_desc(&self) -> Result<Vec<Game>> {
        let games = Games::find()
            .order_by_desc(games::Column::MatchDate)
            .all(&self.db)
            .await?;

        Ok(games.into_iter().map(Self::model_to_game).collect())
    }

    /// Games still awaiting a decisive move, for one user. Feeds both
    /// the user-games listing and the reminder sweep.
    pub async fn list_open_for_user(&self, user_id: Uuid) -> Result<Vec<Game>> {
        let games = Games::find()
            .filter(games::Column::GameOver.eq(false))
            .filter(games::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;

        Ok(games.into_iter().map(Self::model_to_game).collect())
    }

    /// Completed non-cancelled games for one user, most recent first.
    /// This is the exact slice both statistics passes consume.
    pub async fn list_completed_for_user(&self, user_id: Uuid) -> Result<Vec<Game>> {
        let games = Games::find()
            .filter(games::Column::GameOver.eq(true))
            .filter(games::Column::Cancelled.eq(false))
            .filter(games::Column::UserId.eq(user_id))
            .order_by_desc(games::Column::MatchDate)
            .all(&self.db)
            .await?;

        Ok(games.into_iter().map(Self::model_to_game).collect())
    }
}
