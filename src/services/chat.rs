use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

use super::{
    load_users, require_caller, review, Caller, ServiceError, ServiceResult, UserSummary,
};
use crate::entities::{message, user};

pub async fn send_message<C: ConnectionTrait>(
    db: &C,
    caller: Option<&Caller>,
    receiver_id: Uuid,
    content: &str,
) -> ServiceResult<message::Model> {
    let caller = require_caller(caller)?;

    if caller.id == receiver_id {
        return Err(ServiceError::Validation(
            "Cannot send message to yourself".to_string(),
        ));
    }
    if content.trim().is_empty() {
        return Err(ServiceError::Validation(
            "Message cannot be empty".to_string(),
        ));
    }

    user::Entity::find_by_id(receiver_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("User"))?;

    let message = message::ActiveModel {
        id: Set(Uuid::new_v4()),
        sender_id: Set(caller.id),
        receiver_id: Set(receiver_id),
        content: Set(content.to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await?;

    tracing::debug!(message_id = %message.id, sender_id = %caller.id, %receiver_id, "Message sent");
    Ok(message)
}

#[derive(Debug, Serialize)]
pub struct Conversation {
    pub user: UserSummary,
    pub last_message: String,
    pub timestamp: DateTime<Utc>,
}

/// One entry per counterpart, most recently active first.
pub async fn conversations<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> ServiceResult<Vec<Conversation>> {
    let messages = message::Entity::find()
        .filter(
            Condition::any()
                .add(message::Column::SenderId.eq(user_id))
                .add(message::Column::ReceiverId.eq(user_id)),
        )
        .order_by_desc(message::Column::CreatedAt)
        .all(db)
        .await?;

    let counterpart = |m: &message::Model| {
        if m.sender_id == user_id {
            m.receiver_id
        } else {
            m.sender_id
        }
    };

    let users = load_users(db, messages.iter().map(counterpart)).await?;

    let mut seen = HashSet::new();
    let mut conversations = Vec::new();
    for m in &messages {
        let other = counterpart(m);
        if !seen.insert(other) {
            continue;
        }
        if let Some(u) = users.get(&other) {
            conversations.push(Conversation {
                user: UserSummary::from(u),
                last_message: m.content.clone(),
                timestamp: m.created_at.with_timezone(&Utc),
            });
        }
    }

    Ok(conversations)
}

/// Messages exchanged between two users in either direction, oldest first.
pub async fn messages_between<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    other_id: Uuid,
) -> ServiceResult<Vec<message::Model>> {
    let messages = message::Entity::find()
        .filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(message::Column::SenderId.eq(user_id))
                        .add(message::Column::ReceiverId.eq(other_id)),
                )
                .add(
                    Condition::all()
                        .add(message::Column::SenderId.eq(other_id))
                        .add(message::Column::ReceiverId.eq(user_id)),
                ),
        )
        .order_by_asc(message::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(messages)
}

#[derive(Debug, Serialize)]
pub struct ChatView {
    pub other_user: UserSummary,
    pub messages: Vec<message::Model>,
    /// Booking the caller may review the counterpart on, if any.
    pub reviewable_booking_id: Option<Uuid>,
}

pub async fn chat_view<C: ConnectionTrait>(
    db: &C,
    caller: Option<&Caller>,
    other_id: Uuid,
) -> ServiceResult<ChatView> {
    let caller = require_caller(caller)?;

    let other = user::Entity::find_by_id(other_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("User"))?;

    let messages = messages_between(db, caller.id, other.id).await?;
    let reviewable_booking_id = review::reviewable_booking(db, caller.id, other.id).await?;

    Ok(ChatView {
        other_user: UserSummary::from(&other),
        messages,
        reviewable_booking_id,
    })
}
