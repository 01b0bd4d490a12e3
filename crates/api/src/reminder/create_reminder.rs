use super::subscribers::ScheduleAlertsOnReminderCreated;
use crate::error::MemoraError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use memora_api_structs::create_reminder::*;
use memora_domain::{is_valid_cron, Alert, Contact, Reminder, MIN_ALERT_OFFSET_MS};
use memora_infra::Context;

pub async fn create_reminder_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, MemoraError> {
    let body = body.0;
    let usecase = CreateReminderUseCase {
        title: body.title,
        description: body.description,
        date: body.date,
        location: body.location,
        contacts: body.contacts,
        alerts: body.alerts,
        is_recurring: body.is_recurring,
        recurrence: body.recurrence,
        start_date: body.start_date,
        end_date: body.end_date,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(MemoraError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub contacts: Vec<Contact>,
    pub alerts: Vec<Alert>,
    pub is_recurring: bool,
    pub recurrence: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyTitle,
    EmptyDescription,
    InvalidAlert(i64),
    InvalidRecurrence,
    StorageError,
}

impl From<UseCaseError> for MemoraError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyTitle => {
                Self::BadClientData("A reminder requires a non-empty title".into())
            }
            UseCaseError::EmptyDescription => {
                Self::BadClientData("A reminder requires a non-empty description".into())
            }
            UseCaseError::InvalidAlert(offset_ms) => Self::BadClientData(format!(
                "Invalid alert offset: {} ms, alerts must be at least {} ms before the event time",
                offset_ms, MIN_ALERT_OFFSET_MS
            )),
            UseCaseError::InvalidRecurrence => Self::BadClientData(
                "A recurring reminder requires a valid cron expression and a start date".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        if self.title.trim().is_empty() {
            return Err(UseCaseError::EmptyTitle);
        }
        if self.description.trim().is_empty() {
            return Err(UseCaseError::EmptyDescription);
        }
        for alert in &self.alerts {
            if !alert.is_valid() {
                return Err(UseCaseError::InvalidAlert(alert.offset_ms));
            }
        }
        if self.is_recurring {
            let valid_cron = matches!(&self.recurrence, Some(expr) if is_valid_cron(expr));
            if !valid_cron || self.start_date.is_none() {
                return Err(UseCaseError::InvalidRecurrence);
            }
        }

        let mut reminder = Reminder {
            id: Default::default(),
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date,
            location: self.location.clone(),
            contacts: self.contacts.clone(),
            alerts: self.alerts.clone(),
            is_recurring: self.is_recurring,
            recurrence: self.recurrence.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            last_alert_time: None,
            is_active: true,
        };

        reminder.id = ctx
            .repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ScheduleAlertsOnReminderCreated)]
    }
}
