use crate::error::IdentityError;
use chrono::{DateTime, Utc};
use mcq_database::entities::{Role, User, user};
use mcq_database::sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
};
use mcq_database::{Database, DatabaseError};

/// Fields of a new account; the password is already hashed.
#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub role: Role,
}

#[derive(Debug)]
pub struct Profile {
    pub full_name: String,
    pub phone_number: String,
    pub date_of_birth: DateTime<Utc>,
}

/// Outcome of a write that can collide with a unique index.
#[derive(Debug)]
pub enum Write<T> {
    Done(T),
    Duplicate,
}

/// `users` table access.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: Database,
}

fn storage(err: DbErr, context: &'static str) -> IdentityError {
    DatabaseError::from_orm(err, context).into()
}

fn is_duplicate(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

impl UserRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    fn conn(&self) -> Result<&DatabaseConnection, IdentityError> {
        Ok(self.db.connection()?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, IdentityError> {
        User::find_by_id(id).one(self.conn()?).await.map_err(|e| storage(e, "Loading user"))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, IdentityError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.conn()?)
            .await
            .map_err(|e| storage(e, "Loading user by email"))
    }

    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<user::Model>, IdentityError> {
        User::find()
            .filter(user::Column::PhoneNumber.eq(phone))
            .one(self.conn()?)
            .await
            .map_err(|e| storage(e, "Loading user by phone number"))
    }

    /// Inserts the account; a concurrent registration of the same email yields [`Write::Duplicate`].
    pub async fn insert(&self, new: NewUser) -> Result<Write<user::Model>, IdentityError> {
        let now = Utc::now();
        let model = user::ActiveModel {
            email: Set(new.email),
            hashed_password: Set(new.hashed_password),
            full_name: Set(new.full_name),
            role: Set(new.role),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };

        match model.insert(self.conn()?).await {
            Ok(user) => Ok(Write::Done(user)),
            Err(e) if is_duplicate(&e) => Ok(Write::Duplicate),
            Err(e) => Err(storage(e, "Creating user")),
        }
    }

    /// Overwrites the profile fields of an existing user.
    pub async fn update_profile(
        &self,
        existing: user::Model,
        profile: Profile,
    ) -> Result<Write<user::Model>, IdentityError> {
        let mut model: user::ActiveModel = existing.into();
        model.full_name = Set(Some(profile.full_name));
        model.phone_number = Set(Some(profile.phone_number));
        model.date_of_birth = Set(Some(profile.date_of_birth));
        model.updated_at = Set(Some(Utc::now()));

        match model.update(self.conn()?).await {
            Ok(user) => Ok(Write::Done(user)),
            Err(e) if is_duplicate(&e) => Ok(Write::Duplicate),
            Err(e) => Err(storage(e, "Updating user")),
        }
    }
}
