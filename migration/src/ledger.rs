use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseConnection, SqlErr};

use crate::MigrateError;

/// 版本账本
///
/// `migrations` 表中一行的存在即是"该步骤已执行"的唯一事实来源。
/// 行只增不改不删。
pub struct VersionLedger<'c> {
    db: &'c DatabaseConnection,
}

impl<'c> VersionLedger<'c> {
    /// 创建账本表（若不存在）并返回账本句柄
    ///
    /// 每次启动都无条件执行，表已存在时不得报错。
    pub async fn prepare(db: &'c DatabaseConnection) -> Result<Self, MigrateError> {
        let manager = SchemaManager::new(db);

        manager
            .create_table(
                Table::create()
                    .table(Migrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Migrations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Migrations::Version).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Migrations::AppliedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
            .map_err(MigrateError::Bootstrap)?;

        Ok(Self { db })
    }

    /// 该版本是否已执行过；未知版本返回 false
    pub async fn has_applied(&self, version: &str) -> Result<bool, MigrateError> {
        let stmt = Query::select()
            .column(Migrations::Version)
            .from(Migrations::Table)
            .and_where(Expr::col(Migrations::Version).eq(version))
            .to_owned();

        let row = self.db.query_one(&stmt).await?;
        Ok(row.is_some())
    }

    /// 记录一个版本为已执行
    ///
    /// 唯一约束冲突被归类为 `DuplicateVersion`，调用方可按无害空操作处理。
    pub async fn record_applied(&self, version: &str) -> Result<(), MigrateError> {
        let stmt = Query::insert()
            .into_table(Migrations::Table)
            .columns([Migrations::Version, Migrations::AppliedAt])
            .values_panic([
                version.into(),
                SimpleExpr::Custom("CURRENT_TIMESTAMP".into()),
            ])
            .to_owned();

        match self.db.execute(&stmt).await {
            Ok(_) => Ok(()),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(MigrateError::DuplicateVersion(version.to_string()))
                }
                _ => Err(MigrateError::Database(err)),
            },
        }
    }

    /// 账本中已记录的全部版本，按记录顺序返回
    pub async fn applied_versions(&self) -> Result<Vec<String>, MigrateError> {
        let stmt = Query::select()
            .column(Migrations::Version)
            .from(Migrations::Table)
            .order_by(Migrations::Id, Order::Asc)
            .to_owned();

        let rows = self.db.query_all(&stmt).await?;

        let mut versions = Vec::with_capacity(rows.len());
        for row in rows {
            versions.push(row.try_get::<String>("", "version")?);
        }
        Ok(versions)
    }
}

#[derive(DeriveIden)]
enum Migrations {
    Table,
    Id,
    Version,
    AppliedAt,
}
