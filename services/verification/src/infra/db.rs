use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use starshield_verification_schema::verification_codes;

use crate::domain::repository::VerificationCodeRepository;
use crate::domain::types::{Channel, TargetType, VerificationCode};
use crate::error::VerificationServiceError;

#[derive(Clone)]
pub struct DbVerificationCodeRepository {
    pub db: DatabaseConnection,
}

impl VerificationCodeRepository for DbVerificationCodeRepository {
    async fn find_latest(
        &self,
        user_id: &str,
        target_type: TargetType,
    ) -> Result<Option<VerificationCode>, VerificationServiceError> {
        let model = verification_codes::Entity::find()
            .filter(verification_codes::Column::UserId.eq(user_id))
            .filter(verification_codes::Column::TargetType.eq(target_type.as_str()))
            .order_by_desc(verification_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find latest verification code")?;
        model.map(code_from_model).transpose()
    }

    async fn replace_for_target(
        &self,
        code: &VerificationCode,
    ) -> Result<(), VerificationServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let code = code.clone();
                Box::pin(async move {
                    delete_for_target(txn, &code.user_id, code.target_type).await?;
                    insert_code(txn, &code).await?;
                    Ok(())
                })
            })
            .await
            .context("replace verification code")?;
        Ok(())
    }

    async fn increment_attempts(
        &self,
        id: Uuid,
        expected: i32,
    ) -> Result<bool, VerificationServiceError> {
        let result = verification_codes::Entity::update_many()
            .col_expr(
                verification_codes::Column::Attempts,
                Expr::col(verification_codes::Column::Attempts).add(1),
            )
            .filter(verification_codes::Column::Id.eq(id))
            .filter(verification_codes::Column::Attempts.eq(expected))
            .filter(verification_codes::Column::ConsumedAt.is_null())
            .exec(&self.db)
            .await
            .context("increment verification attempts")?;
        Ok(result.rows_affected == 1)
    }

    async fn mark_consumed(
        &self,
        id: Uuid,
        expected: i32,
        consumed_at: DateTime<Utc>,
    ) -> Result<bool, VerificationServiceError> {
        let result = verification_codes::Entity::update_many()
            .col_expr(
                verification_codes::Column::ConsumedAt,
                Expr::value(consumed_at),
            )
            .filter(verification_codes::Column::Id.eq(id))
            .filter(verification_codes::Column::Attempts.eq(expected))
            .filter(verification_codes::Column::ConsumedAt.is_null())
            .exec(&self.db)
            .await
            .context("mark verification code consumed")?;
        Ok(result.rows_affected == 1)
    }

    async fn delete(&self, id: Uuid) -> Result<(), VerificationServiceError> {
        verification_codes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete verification code")?;
        Ok(())
    }
}

async fn delete_for_target(
    txn: &DatabaseTransaction,
    user_id: &str,
    target_type: TargetType,
) -> Result<u64, sea_orm::DbErr> {
    let result = verification_codes::Entity::delete_many()
        .filter(verification_codes::Column::UserId.eq(user_id))
        .filter(verification_codes::Column::TargetType.eq(target_type.as_str()))
        .exec(txn)
        .await?;
    Ok(result.rows_affected)
}

async fn insert_code(
    txn: &DatabaseTransaction,
    code: &VerificationCode,
) -> Result<(), sea_orm::DbErr> {
    verification_codes::ActiveModel {
        id: Set(code.id),
        user_id: Set(code.user_id.clone()),
        target_type: Set(code.target_type.as_str().to_owned()),
        target_value: Set(code.target_value.clone()),
        code_hash: Set(code.code_hash.clone()),
        expires_at: Set(code.expires_at),
        attempts: Set(code.attempts),
        consumed_at: Set(code.consumed_at),
        channel: Set(code.channel.as_str().to_owned()),
        created_at: Set(code.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn code_from_model(
    model: verification_codes::Model,
) -> Result<VerificationCode, VerificationServiceError> {
    let target_type = model.target_type.parse::<TargetType>().map_err(|_| {
        anyhow::anyhow!("unknown target_type {:?} in row {}", model.target_type, model.id)
    })?;
    let channel = model.channel.parse::<Channel>().map_err(|_| {
        anyhow::anyhow!("unknown channel {:?} in row {}", model.channel, model.id)
    })?;
    Ok(VerificationCode {
        id: model.id,
        user_id: model.user_id,
        target_type,
        target_value: model.target_value,
        code_hash: model.code_hash,
        expires_at: model.expires_at,
        attempts: model.attempts,
        consumed_at: model.consumed_at,
        channel,
        created_at: model.created_at,
    })
}
