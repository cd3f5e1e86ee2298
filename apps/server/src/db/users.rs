//! Database operations for users and their role sets.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entity::user::{self, ActiveModel as UserActiveModel, Entity as UserEntity};
use crate::entity::user_role::{self, ActiveModel as UserRoleActiveModel, Entity as UserRole};
use crate::error::{AppError, AppResult};
use crate::models::User;

use super::DbPool;

/// Represents a user to be inserted.
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
    pub enabled: bool,
}

impl DbPool {
    /// Insert a user together with its initial roles.
    pub async fn insert_user(&self, new_user: NewUser) -> AppResult<User> {
        let txn = self.connection().begin().await?;

        let model = UserActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            enabled: Set(new_user.enabled),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert user: {}", e)))?;

        let roles: BTreeSet<String> = new_user.roles.into_iter().collect();
        for role in &roles {
            UserRoleActiveModel {
                user_id: Set(model.id),
                role: Set(role.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        Ok(model_to_user(model, roles))
    }

    /// Find a user by ID.
    pub async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let Some(model) = UserEntity::find_by_id(id).one(self.connection()).await? else {
            return Ok(None);
        };
        let roles = self.roles_of(model.id).await?;
        Ok(Some(model_to_user(model, roles)))
    }

    /// Find a user by login name.
    pub async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let Some(model) = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.connection())
            .await?
        else {
            return Ok(None);
        };
        let roles = self.roles_of(model.id).await?;
        Ok(Some(model_to_user(model, roles)))
    }

    /// List every user ordered by ID, roles included.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(self.connection())
            .await?;

        let mut roles_by_user: HashMap<i64, BTreeSet<String>> = HashMap::new();
        for row in UserRole::find().all(self.connection()).await? {
            roles_by_user.entry(row.user_id).or_default().insert(row.role);
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let roles = roles_by_user.remove(&m.id).unwrap_or_default();
                model_to_user(m, roles)
            })
            .collect())
    }

    /// Grant `role` to the user, leaving other roles untouched.
    ///
    /// Granting a role the user already holds is a no-op, including when two
    /// grants race on separate connections.
    pub async fn add_user_role(&self, user_id: i64, role: &str) -> AppResult<()> {
        let model = UserRoleActiveModel {
            user_id: Set(user_id),
            role: Set(role.to_string()),
            ..Default::default()
        };

        UserRole::insert(model)
            .on_conflict(
                OnConflict::columns([user_role::Column::UserId, user_role::Column::Role])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to grant role: {}", e)))?;

        Ok(())
    }

    /// Overwrite the user's role set with exactly `roles`.
    pub async fn replace_user_roles(&self, user_id: i64, roles: &BTreeSet<String>) -> AppResult<()> {
        let txn = self.connection().begin().await?;

        UserRole::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        for role in roles {
            UserRoleActiveModel {
                user_id: Set(user_id),
                role: Set(role.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn roles_of(&self, user_id: i64) -> AppResult<BTreeSet<String>> {
        let rows = UserRole::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .all(self.connection())
            .await?;
        Ok(rows.into_iter().map(|r| r.role).collect())
    }
}

fn model_to_user(m: user::Model, roles: BTreeSet<String>) -> User {
    User {
        id: m.id,
        username: m.username,
        email: m.email,
        roles,
        enabled: m.enabled,
        created_at: m.created_at,
    }
}
