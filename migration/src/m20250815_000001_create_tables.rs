use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表（后台管理员账号）
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建学员表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(
                        ColumnDef::new(Students::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Birthdate).date().not_null())
                    .col(ColumnDef::new(Students::Weight).double().not_null())
                    .col(ColumnDef::new(Students::Height).double().not_null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建套餐表
        manager
            .create_table(
                Table::create()
                    .table(Plans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Plans::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Plans::Title)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Plans::Duration).integer().not_null())
                    .col(ColumnDef::new(Plans::Price).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(Plans::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Plans::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建报名表
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Enrollments::PlanId).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::StartDate).date().not_null())
                    .col(ColumnDef::new(Enrollments::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Enrollments::Price)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建打卡表
        manager
            .create_table(
                Table::create()
                    .table(Checkins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Checkins::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Checkins::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Checkins::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Checkins::Table, Checkins::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建求助工单表
        manager
            .create_table(
                Table::create()
                    .table(HelpOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpOrders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HelpOrders::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HelpOrders::Question).text().not_null())
                    .col(ColumnDef::new(HelpOrders::Answer).text().null())
                    .col(ColumnDef::new(HelpOrders::AnswerAt).big_integer().null())
                    .col(
                        ColumnDef::new(HelpOrders::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HelpOrders::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(HelpOrders::Table, HelpOrders::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        // 学员表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_email")
                    .table(Students::Table)
                    .col(Students::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_name")
                    .table(Students::Table)
                    .col(Students::Name)
                    .to_owned(),
            )
            .await?;

        // 报名表索引（重叠检查按 student_id + end_date 查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_student_end")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::EndDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_start_date")
                    .table(Enrollments::Table)
                    .col(Enrollments::StartDate)
                    .to_owned(),
            )
            .await?;

        // 打卡表索引（滚动窗口按 student_id + created_at 统计）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_checkins_student_created")
                    .table(Checkins::Table)
                    .col(Checkins::StudentId)
                    .col(Checkins::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 求助工单表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_help_orders_student_id")
                    .table(HelpOrders::Table)
                    .col(HelpOrders::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_help_orders_answer_at")
                    .table(HelpOrders::Table)
                    .col(HelpOrders::AnswerAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(HelpOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Checkins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Plans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    IsAdmin,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    Name,
    Email,
    Birthdate,
    Weight,
    Height,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Plans {
    #[sea_orm(iden = "plans")]
    Table,
    Id,
    Title,
    Duration,
    Price,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
    StudentId,
    PlanId,
    StartDate,
    EndDate,
    Price,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Checkins {
    #[sea_orm(iden = "checkins")]
    Table,
    Id,
    StudentId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum HelpOrders {
    #[sea_orm(iden = "help_orders")]
    Table,
    Id,
    StudentId,
    Question,
    Answer,
    AnswerAt,
    CreatedAt,
    UpdatedAt,
}
