use sea_orm::entity::prelude::*;

/// One-time code proving control of a user's email address or phone number.
/// Only the SHA-256 of the code is stored; one row per (user_id, target_type).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "verification_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    /// `email` or `phone`.
    pub target_type: String,
    /// Normalized destination captured at issuance.
    pub target_value: String,
    pub code_hash: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub attempts: i32,
    pub consumed_at: Option<chrono::DateTime<chrono::Utc>>,
    /// `email` or `sms`.
    pub channel: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
