use sea_orm_migration::{prelude::*, schema::*};

use crate::MigrationStep;

pub struct Migration;

#[async_trait::async_trait]
impl MigrationStep for Migration {
    fn version(&self) -> &'static str {
        "v0_create_base_tables"
    }

    async fn apply(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        // 创建 users 表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_uniq(Users::Username))
                    .col(string(Users::Password))
                    .col(
                        timestamp_with_time_zone(Users::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 characters 表
        manager
            .create_table(
                Table::create()
                    .table(Characters::Table)
                    .if_not_exists()
                    .col(pk_auto(Characters::Id))
                    .col(integer_null(Characters::UserId))
                    .col(string(Characters::Name))
                    .col(string_null(Characters::Title))
                    .col(string_null(Characters::Age))
                    .col(string_null(Characters::Occupation))
                    .col(string_null(Characters::Team))
                    .col(text_null(Characters::Personality))
                    .col(text_null(Characters::Background))
                    .col(text_null(Characters::Abilities)) // JSON array
                    .col(text_null(Characters::Relationships)) // JSON array
                    .col(string_null(Characters::ImageUrl))
                    .col(
                        timestamp_with_time_zone(Characters::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Characters::Table, Characters::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 settings 表，title 带唯一约束
        manager
            .create_table(
                Table::create()
                    .table(Settings::Table)
                    .if_not_exists()
                    .col(pk_auto(Settings::Id))
                    .col(integer_null(Settings::UserId))
                    .col(string_uniq(Settings::Title))
                    .col(text_null(Settings::Description))
                    .col(text_null(Settings::Details)) // JSON array
                    .col(string(Settings::Icon).default("fas fa-cog"))
                    .col(
                        timestamp_with_time_zone(Settings::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Settings::Table, Settings::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Password,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Characters {
    Table,
    Id,
    UserId,
    Name,
    Title,
    Age,
    Occupation,
    Team,
    Personality,
    Background,
    Abilities,
    Relationships,
    ImageUrl,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Settings {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Details,
    Icon,
    CreatedAt,
}
