use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_over: bool,
    pub cancelled: bool,
    pub won: bool,
    pub match_date: DateTimeWithTimeZone,
    pub message: String,
    pub last_user_move: String,
    pub last_ai_move: String,
    /// Ordered move log, stored as a JSON array of MoveRecord objects.
    pub moves: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
