//! Tenant Service - admin onboarding, login and principal resolution

use sea_orm::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{clean, now};
use crate::domain::amount::not_blank;
use crate::domain::{DomainError, FarmId, FieldErrors, Principal, Role, UserId};
use crate::infrastructure::auth::{hash_password, verify_password, TokenKeys};
use crate::infrastructure::seed::DefaultData;
use crate::models::farm::{self, Entity as Farm, FarmStatus};
use crate::models::user::{self, Entity as User};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterAdminInput {
    #[validate(
        length(min = 1, max = 255, message = "name is required"),
        custom(function = "not_blank")
    )]
    pub name: String,
    #[validate(email(message = "email must be a valid address"), length(max = 255))]
    pub email: String,
    #[validate(
        length(min = 1, max = 255, message = "phone is required"),
        custom(function = "not_blank")
    )]
    pub phone: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "password confirmation does not match"))]
    pub password_confirmation: String,
    #[validate(
        length(min = 1, max = 255, message = "farm_name is required"),
        custom(function = "not_blank")
    )]
    pub farm_name: String,
    #[validate(
        length(min = 1, max = 255, message = "farm_address is required"),
        custom(function = "not_blank")
    )]
    pub farm_address: String,
    #[validate(
        length(min = 1, max = 255, message = "farm_phone is required"),
        custom(function = "not_blank")
    )]
    pub farm_phone: String,
    pub farm_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(
        length(min = 1, message = "phone is required"),
        custom(function = "not_blank")
    )]
    pub phone: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

/// Account fields for a user row, password still in clear
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
    pub farm_id: Option<FarmId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registered {
    pub user: user::Model,
    pub farm: farm::Model,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoggedIn {
    pub user: user::Model,
    pub farm: Option<farm::Model>,
    pub token: String,
}

fn taken(field: &str) -> String {
    format!("{field} has already been taken")
}

/// Reject phone/email already taken, naming every conflicting field
async fn ensure_unique<C: ConnectionTrait>(conn: &C, phone: &str, email: &str) -> Result<(), DomainError> {
    let mut errors = FieldErrors::new();

    let phone_taken = User::find()
        .filter(user::Column::Phone.eq(phone))
        .count(conn)
        .await?
        > 0;
    if phone_taken {
        errors.insert("phone".to_string(), vec![taken("phone")]);
    }

    let email_taken = User::find()
        .filter(user::Column::Email.eq(email))
        .count(conn)
        .await?
        > 0;
    if email_taken {
        errors.insert("email".to_string(), vec![taken("email")]);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(errors))
    }
}

/// Insert a user row after checking phone/email uniqueness
pub async fn create_user<C: ConnectionTrait>(conn: &C, new_user: NewUser) -> Result<user::Model, DomainError> {
    let phone = new_user.phone.trim().to_string();
    let email = new_user.email.trim().to_lowercase();
    ensure_unique(conn, &phone, &email).await?;

    let now = now();
    let active = user::ActiveModel {
        name: Set(new_user.name.trim().to_string()),
        phone: Set(phone),
        email: Set(email),
        password_hash: Set(hash_password(&new_user.password)?),
        role: Set(new_user.role.as_str().to_string()),
        farm_id: Set(new_user.farm_id),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    insert_user(conn, active).await
}

/// Two registrations racing past `ensure_unique` meet the UNIQUE index here;
/// the loser gets the same field error as a sequential duplicate.
async fn insert_user<C: ConnectionTrait>(
    conn: &C,
    active: user::ActiveModel,
) -> Result<user::Model, DomainError> {
    active.insert(conn).await.map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            let field = if detail.contains("email") { "email" } else { "phone" };
            DomainError::invalid(field, taken(field))
        }
        _ => err.into(),
    })
}

/// Create an admin, its farm and the farm's default catalog in one transaction.
///
/// Any failure drops the transaction before commit, so no user, farm or seed
/// row from this call survives.
pub async fn register_admin(
    db: &DatabaseConnection,
    input: RegisterAdminInput,
    defaults: &DefaultData,
) -> Result<Registered, DomainError> {
    input.validate()?;

    let txn = db.begin().await?;

    let admin = create_user(
        &txn,
        NewUser {
            name: input.name,
            email: input.email,
            phone: input.phone,
            password: input.password,
            role: Role::Admin,
            farm_id: None,
        },
    )
    .await?;

    let now = now();
    let farm = farm::ActiveModel {
        name: Set(input.farm_name.trim().to_string()),
        address: Set(Some(input.farm_address.trim().to_string())),
        phone: Set(Some(input.farm_phone.trim().to_string())),
        description: Set(clean(input.farm_description)),
        status: Set(FarmStatus::Active.as_str().to_string()),
        owner_id: Set(admin.id),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut linked: user::ActiveModel = admin.into();
    linked.farm_id = Set(Some(farm.id));
    linked.updated_at = Set(now);
    let admin = linked.update(&txn).await?;

    defaults.seed_farm(&txn, farm.id).await?;

    txn.commit().await?;

    tracing::info!(user_id = admin.id, farm_id = farm.id, "admin registered");
    Ok(Registered { user: admin, farm })
}

/// First farm owned by `user_id`, lowest id first
async fn owned_farm<C: ConnectionTrait>(conn: &C, user_id: UserId) -> Result<Option<farm::Model>, DomainError> {
    Ok(Farm::find()
        .filter(farm::Column::OwnerId.eq(user_id))
        .order_by_asc(farm::Column::Id)
        .one(conn)
        .await?)
}

/// Check credentials and issue a token.
///
/// An admin whose farm link is empty is re-linked to the farm it owns, and the
/// link is saved.
pub async fn login(
    db: &DatabaseConnection,
    tokens: &TokenKeys,
    input: LoginInput,
) -> Result<LoggedIn, DomainError> {
    input.validate()?;

    let Some(found) = User::find()
        .filter(user::Column::Phone.eq(input.phone.trim()))
        .one(db)
        .await?
    else {
        return Err(DomainError::Authentication);
    };
    if !verify_password(&input.password, &found.password_hash)? {
        tracing::warn!(user_id = found.id, "login rejected");
        return Err(DomainError::Authentication);
    }

    let role = parse_role(&found)?;
    let (user, farm) = match found.farm_id {
        Some(farm_id) => {
            let farm = Farm::find_by_id(farm_id).one(db).await?;
            (found, farm)
        }
        None if role == Role::Admin => match owned_farm(db, found.id).await? {
            Some(farm) => {
                let mut active: user::ActiveModel = found.into();
                active.farm_id = Set(Some(farm.id));
                active.updated_at = Set(now());
                let user = active.update(db).await?;
                tracing::info!(user_id = user.id, farm_id = farm.id, "farm link repaired");
                (user, Some(farm))
            }
            None => (found, None),
        },
        None => (found, None),
    };

    let token = tokens.create_jwt(user.id, role)?;
    tracing::info!(user_id = user.id, "user logged in");
    Ok(LoggedIn { user, farm, token })
}

fn parse_role(user: &user::Model) -> Result<Role, DomainError> {
    Role::parse(&user.role)
        .ok_or_else(|| DomainError::Internal(format!("corrupt role {:?} for user {}", user.role, user.id)))
}

/// Current user row for a principal
pub async fn current_user(db: &DatabaseConnection, principal: &Principal) -> Result<user::Model, DomainError> {
    User::find_by_id(principal.id)
        .one(db)
        .await?
        .ok_or(DomainError::Authentication)
}

/// Build the principal for an authenticated user id from the live user row.
///
/// The stored farm_id is what the access guard compares. An admin with no
/// farm_id acts within the farm it owns; nothing is written here. A stored
/// farm_id that disagrees with the farms an admin owns is only logged.
pub async fn resolve_principal(db: &DatabaseConnection, user_id: UserId) -> Result<Principal, DomainError> {
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(DomainError::Authentication)?;
    let role = parse_role(&user)?;

    let farm_id = match (role, user.farm_id) {
        (Role::Admin, None) => owned_farm(db, user.id).await?.map(|f| f.id),
        (Role::Admin, Some(farm_id)) => {
            let owned: Vec<FarmId> = Farm::find()
                .select_only()
                .column(farm::Column::Id)
                .filter(farm::Column::OwnerId.eq(user.id))
                .into_tuple()
                .all(db)
                .await?;
            if !owned.is_empty() && !owned.contains(&farm_id) {
                tracing::warn!(user_id, farm_id, ?owned, "admin farm link differs from ownership");
            }
            Some(farm_id)
        }
        (_, farm_id) => farm_id,
    };

    Ok(Principal {
        id: user.id,
        role,
        farm_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::init_db;

    fn row(phone: &str, email: &str) -> user::ActiveModel {
        user::ActiveModel {
            name: Set("Racer".to_string()),
            phone: Set(phone.to_string()),
            email: Set(email.to_string()),
            password_hash: Set("not-a-real-hash".to_string()),
            role: Set(Role::Admin.as_str().to_string()),
            farm_id: Set(None),
            created_at: Set(now()),
            updated_at: Set(now()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn unique_index_conflicts_become_field_errors() {
        let db = init_db("sqlite::memory:").await.unwrap();
        insert_user(&db, row("0900000001", "a@example.com")).await.unwrap();

        match insert_user(&db, row("0900000001", "b@example.com")).await {
            Err(DomainError::Validation(errors)) => {
                assert_eq!(errors["phone"], vec!["phone has already been taken"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        match insert_user(&db, row("0900000002", "a@example.com")).await {
            Err(DomainError::Validation(errors)) => assert!(errors.contains_key("email")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
