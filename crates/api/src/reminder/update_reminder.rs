use super::subscribers::ScheduleAlertsOnReminderUpdated;
use crate::error::MemoraError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use memora_api_structs::update_reminder::*;
use memora_domain::{is_valid_cron, Alert, Contact, Reminder, ID, MIN_ALERT_OFFSET_MS};
use memora_infra::Context;

pub async fn update_reminder_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, MemoraError> {
    let body = body.0;
    let usecase = UpdateReminderUseCase {
        reminder_id: path_params.reminder_id,
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
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(MemoraError::from)
}

/// Partial replacement: fields left out of the request keep their stored
/// value. The engine-owned fields (`last_alert_time`, `is_active`) are
/// never touched here.
#[derive(Debug)]
pub struct UpdateReminderUseCase {
    pub reminder_id: ID,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub contacts: Option<Vec<Contact>>,
    pub alerts: Option<Vec<Alert>>,
    pub is_recurring: Option<bool>,
    pub recurrence: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    EmptyTitle,
    EmptyDescription,
    InvalidAlert(i64),
    InvalidRecurrence,
    StorageError,
}

impl From<UseCaseError> for MemoraError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
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
impl UseCase for UpdateReminderUseCase {
    type Response = Reminder;
    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let mut reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or(UseCaseError::NotFound(self.reminder_id))?;

        if let Some(title) = &self.title {
            reminder.title = title.clone();
        }
        if let Some(description) = &self.description {
            reminder.description = description.clone();
        }
        if let Some(date) = self.date {
            reminder.date = date;
        }
        if let Some(location) = &self.location {
            reminder.location = Some(location.clone());
        }
        if let Some(contacts) = &self.contacts {
            reminder.contacts = contacts.clone();
        }
        if let Some(alerts) = &self.alerts {
            reminder.alerts = alerts.clone();
        }
        if let Some(is_recurring) = self.is_recurring {
            reminder.is_recurring = is_recurring;
        }
        if let Some(recurrence) = &self.recurrence {
            reminder.recurrence = Some(recurrence.clone());
        }
        if let Some(start_date) = self.start_date {
            reminder.start_date = Some(start_date);
        }
        if let Some(end_date) = self.end_date {
            reminder.end_date = Some(end_date);
        }

        if reminder.title.trim().is_empty() {
            return Err(UseCaseError::EmptyTitle);
        }
        if reminder.description.trim().is_empty() {
            return Err(UseCaseError::EmptyDescription);
        }
        for alert in &reminder.alerts {
            if !alert.is_valid() {
                return Err(UseCaseError::InvalidAlert(alert.offset_ms));
            }
        }
        if reminder.is_recurring {
            let valid_cron = matches!(&reminder.recurrence, Some(expr) if is_valid_cron(expr));
            if !valid_cron || reminder.start_date.is_none() {
                return Err(UseCaseError::InvalidRecurrence);
            }
        }

        let existed = ctx
            .repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if !existed {
            return Err(UseCaseError::NotFound(self.reminder_id));
        }

        Ok(reminder)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ScheduleAlertsOnReminderUpdated)]
    }
}
