use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{load_users, require_caller, Caller, ServiceError, ServiceResult};
use crate::entities::event::{self, EventPhotos};
use crate::entities::user;

fn default_auto_approve() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub details: String,
    pub capacity: i32,
    pub price: f64,
    pub location: String,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default = "default_auto_approve")]
    pub auto_approve: bool,
    pub date: DateTime<Utc>,
}

impl NewEvent {
    pub fn validate(&self) -> ServiceResult<()> {
        let invalid =
            |msg: &str| -> ServiceResult<()> { Err(ServiceError::Validation(msg.to_string())) };

        if self.name.trim().chars().count() < 3 {
            return invalid("Event name must be at least 3 characters");
        }
        if self.details.trim().chars().count() < 10 {
            return invalid("Details must be at least 10 characters");
        }
        if self.capacity < 1 {
            return invalid("Capacity must be at least 1");
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return invalid("Price must be 0 or more");
        }
        if self.location.trim().chars().count() < 3 {
            return invalid("Location is required");
        }
        Ok(())
    }
}

pub async fn create_event<C: ConnectionTrait>(
    db: &C,
    caller: Option<&Caller>,
    new_event: NewEvent,
) -> ServiceResult<event::Model> {
    let caller = require_caller(caller)?;
    new_event.validate()?;

    let event = event::ActiveModel {
        id: Set(Uuid::new_v4()),
        host_id: Set(caller.id),
        name: Set(new_event.name.trim().to_string()),
        details: Set(new_event.details.trim().to_string()),
        capacity: Set(new_event.capacity),
        price: Set(new_event.price),
        location: Set(new_event.location.trim().to_string()),
        photos: Set(EventPhotos(new_event.photos)),
        auto_approve: Set(new_event.auto_approve),
        date: Set(new_event.date.into()),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await?;

    tracing::info!(event_id = %event.id, host_id = %caller.id, "Event created");
    Ok(event)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    #[serde(alias = "q")]
    pub query: Option<String>,
    #[serde(alias = "loc")]
    pub location: Option<String>,
    pub max_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostInfo {
    pub id: Uuid,
    pub name: Option<String>,
    pub profile_pic: Option<String>,
    pub is_verified: bool,
}

impl From<&user::Model> for HostInfo {
    fn from(user: &user::Model) -> Self {
        HostInfo {
            id: user.id,
            name: user.name.clone(),
            profile_pic: user.profile_pic.clone(),
            is_verified: user.is_verified,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventWithHost {
    #[serde(flatten)]
    pub event: event::Model,
    pub host: HostInfo,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Searches events, newest first. All filters are optional and combine with AND.
pub async fn search_events<C: ConnectionTrait>(
    db: &C,
    filter: &EventFilter,
) -> ServiceResult<Vec<EventWithHost>> {
    let mut condition = Condition::all();

    if let Some(q) = non_blank(filter.query.as_deref()) {
        condition = condition.add(
            Condition::any()
                .add(event::Column::Name.contains(q))
                .add(event::Column::Details.contains(q)),
        );
    }
    if let Some(location) = non_blank(filter.location.as_deref()) {
        condition = condition.add(event::Column::Location.contains(location));
    }
    if let Some(max_price) = filter.max_price {
        condition = condition.add(event::Column::Price.lte(max_price));
    }

    let events = event::Entity::find()
        .filter(condition)
        .order_by_desc(event::Column::CreatedAt)
        .all(db)
        .await?;

    let hosts = load_users(db, events.iter().map(|e| e.host_id)).await?;

    Ok(events
        .into_iter()
        .filter_map(|e| {
            let host = HostInfo::from(hosts.get(&e.host_id)?);
            Some(EventWithHost { event: e, host })
        })
        .collect())
}

pub async fn get_event<C: ConnectionTrait>(db: &C, event_id: Uuid) -> ServiceResult<EventWithHost> {
    let (event, host) = event::Entity::find_by_id(event_id)
        .find_also_related(user::Entity)
        .one(db)
        .await?
        .and_then(|(e, h)| h.map(|h| (e, h)))
        .ok_or(ServiceError::NotFound("Event"))?;

    Ok(EventWithHost {
        host: HostInfo::from(&host),
        event,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewEvent {
        NewEvent {
            name: "Rooftop jazz".into(),
            details: "Live trio and snacks on the roof".into(),
            capacity: 20,
            price: 15.0,
            location: "Lisbon".into(),
            photos: vec![],
            auto_approve: true,
            date: Utc::now(),
        }
    }

    #[test]
    fn accepts_a_well_formed_event() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn rejects_short_fields_and_bad_numbers() {
        let cases: Vec<Box<dyn Fn(&mut NewEvent)>> = vec![
            Box::new(|e: &mut NewEvent| e.name = "ab".into()),
            Box::new(|e: &mut NewEvent| e.details = "too short".into()),
            Box::new(|e: &mut NewEvent| e.capacity = 0),
            Box::new(|e: &mut NewEvent| e.price = -1.0),
            Box::new(|e: &mut NewEvent| e.price = f64::NAN),
            Box::new(|e: &mut NewEvent| e.location = "  ".into()),
        ];

        for mutate in cases {
            let mut event = sample();
            mutate(&mut event);
            assert!(matches!(event.validate(), Err(ServiceError::Validation(_))));
        }
    }

    #[test]
    fn auto_approve_defaults_to_true() {
        let json = serde_json::json!({
            "name": "Board games",
            "details": "Bring your favourite game",
            "capacity": 6,
            "price": 0.0,
            "location": "Porto",
            "date": "2030-01-01T18:00:00Z"
        });
        let event: NewEvent = serde_json::from_value(json).unwrap();
        assert!(event.auto_approve);
        assert!(event.photos.is_empty());
    }
}
