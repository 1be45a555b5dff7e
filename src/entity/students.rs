//! 学员实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub birthdate: Date,
    pub weight: f64,
    pub height: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::checkins::Entity")]
    Checkins,
    #[sea_orm(has_many = "super::help_orders::Entity")]
    HelpOrders,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::checkins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Checkins.def()
    }
}

impl Related<super::help_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HelpOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 数据库模型转业务模型
impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::models::students::entities::Student;
        use chrono::{DateTime, Utc};

        Student {
            id: self.id,
            name: self.name,
            email: self.email,
            birthdate: self.birthdate,
            weight: self.weight,
            height: self.height,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
