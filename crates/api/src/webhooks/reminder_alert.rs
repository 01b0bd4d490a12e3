use crate::alerting::fire_reminder;
use crate::error::MemoraError;
use crate::shared::auth::verify_webhook_signature;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use memora_api_structs::reminder_alert::*;
use memora_domain::ID;
use memora_infra::Context;
use tracing::{error, info};

pub async fn reminder_alert_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, MemoraError> {
    verify_webhook_signature(&http_req, &ctx)?;

    let body = body.0;
    let usecase = TriggerReminderAlertUseCase {
        reminder_id: body.reminder_id,
        is_recurring: body.is_recurring,
    };

    execute(usecase, &ctx)
        .await
        .map(|outcome| HttpResponse::Ok().json(APIResponse::from(outcome)))
        .map_err(MemoraError::from)
}

/// Externally-triggered fire of a single reminder. The delayed queue
/// already did the time-window evaluation when it scheduled the callback,
/// so this flow only checks that the reminder still exists and is active
/// before dispatching.
#[derive(Debug)]
pub struct TriggerReminderAlertUseCase {
    pub reminder_id: ID,
    pub is_recurring: Option<bool>,
}

#[derive(Debug, PartialEq)]
pub enum SkipReason {
    ReminderNotFound,
    Inactive,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReminderNotFound => "reminder_not_found",
            Self::Inactive => "inactive",
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum TriggerOutcome {
    Fired { reminder_title: String },
    Skipped { reason: SkipReason },
}

impl From<TriggerOutcome> for APIResponse {
    fn from(outcome: TriggerOutcome) -> Self {
        match outcome {
            TriggerOutcome::Fired { reminder_title } => APIResponse::ok(reminder_title),
            TriggerOutcome::Skipped { reason } => APIResponse::skipped(reason.as_str()),
        }
    }
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for MemoraError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for TriggerReminderAlertUseCase {
    type Response = TriggerOutcome;
    type Error = UseCaseError;

    const NAME: &'static str = "TriggerReminderAlert";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .map_err(|e| {
                error!("Unable to load reminder {}: {:?}", self.reminder_id, e);
                UseCaseError::StorageError
            })?;
        let reminder = match reminder {
            Some(reminder) => reminder,
            None => {
                info!(
                    "Alert callback for unknown reminder {}, skipping",
                    self.reminder_id
                );
                return Ok(TriggerOutcome::Skipped {
                    reason: SkipReason::ReminderNotFound,
                });
            }
        };
        if !reminder.is_active {
            return Ok(TriggerOutcome::Skipped {
                reason: SkipReason::Inactive,
            });
        }

        let now = ctx.sys.now();
        fire_reminder(&reminder, now, ctx).await.map_err(|e| {
            error!(
                "Unable to record acknowledgement for reminder {}: {:?}",
                reminder.id, e
            );
            UseCaseError::StorageError
        })?;

        // A one-shot callback for a one-time reminder ends the lifecycle
        // here, there is no later tick to retire it
        if !self.is_recurring.unwrap_or(false) && !reminder.is_recurring {
            ctx.repos
                .reminders
                .deactivate(&reminder.id)
                .await
                .map_err(|e| {
                    error!("Unable to deactivate reminder {}: {:?}", reminder.id, e);
                    UseCaseError::StorageError
                })?;
        }

        Ok(TriggerOutcome::Fired {
            reminder_title: reminder.title,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::auth::{SignatureClaims, SIGNATURE_HEADER};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use chrono::{DateTime, TimeZone, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use memora_domain::{Alert, Contact, ContactMode, Reminder};
    use memora_infra::{ISys, InMemoryMailSender};
    use std::sync::Arc;

    struct StaticTimeSys(DateTime<Utc>);
    impl ISys for StaticTimeSys {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn reminder_factory(is_recurring: bool) -> Reminder {
        Reminder {
            id: Default::default(),
            title: "Standup".into(),
            description: "Daily standup".into(),
            date: Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
            location: None,
            contacts: vec![Contact {
                id: 1,
                mode: ContactMode::Email,
                address: "ada@example.com".into(),
            }],
            alerts: vec![Alert {
                id: 1,
                offset_ms: 60_000,
            }],
            is_recurring,
            recurrence: is_recurring.then(|| "*/5 * * * *".into()),
            start_date: is_recurring
                .then(|| Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()),
            end_date: None,
            last_alert_time: None,
            is_active: true,
        }
    }

    struct TestContext {
        ctx: Context,
        mailer: Arc<InMemoryMailSender>,
        now: DateTime<Utc>,
    }

    fn setup() -> TestContext {
        let mut ctx = Context::create_inmemory();
        let mailer = Arc::new(InMemoryMailSender::new());
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 59, 0).unwrap();
        ctx.mailer = mailer.clone();
        ctx.sys = Arc::new(StaticTimeSys(now));
        TestContext { ctx, mailer, now }
    }

    #[actix_web::test]
    async fn skips_an_unknown_reminder() {
        let test = setup();
        let usecase = TriggerReminderAlertUseCase {
            reminder_id: ID::new(999),
            is_recurring: None,
        };
        let outcome = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(
            outcome,
            TriggerOutcome::Skipped {
                reason: SkipReason::ReminderNotFound,
            }
        );
        assert_eq!(test.mailer.sent_count(), 0);
    }

    #[actix_web::test]
    async fn skips_an_inactive_reminder() {
        let test = setup();
        let id = test
            .ctx
            .repos
            .reminders
            .insert(&reminder_factory(false))
            .await
            .unwrap();
        test.ctx.repos.reminders.deactivate(&id).await.unwrap();

        let usecase = TriggerReminderAlertUseCase {
            reminder_id: id,
            is_recurring: None,
        };
        let outcome = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(
            outcome,
            TriggerOutcome::Skipped {
                reason: SkipReason::Inactive,
            }
        );
        assert_eq!(test.mailer.sent_count(), 0);
        let stored = test.ctx.repos.reminders.find(&id).await.unwrap().unwrap();
        assert_eq!(stored.last_alert_time, None);
    }

    #[actix_web::test]
    async fn fires_and_retires_a_one_time_reminder() {
        let test = setup();
        let id = test
            .ctx
            .repos
            .reminders
            .insert(&reminder_factory(false))
            .await
            .unwrap();

        let usecase = TriggerReminderAlertUseCase {
            reminder_id: id,
            is_recurring: Some(false),
        };
        let outcome = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(
            outcome,
            TriggerOutcome::Fired {
                reminder_title: "Standup".into(),
            }
        );
        assert_eq!(test.mailer.sent_count(), 1);

        let stored = test.ctx.repos.reminders.find(&id).await.unwrap().unwrap();
        assert_eq!(stored.last_alert_time, Some(test.now));
        assert!(!stored.is_active);
    }

    #[actix_web::test]
    async fn fires_a_recurring_reminder_and_keeps_it_active() {
        let test = setup();
        let id = test
            .ctx
            .repos
            .reminders
            .insert(&reminder_factory(true))
            .await
            .unwrap();

        let usecase = TriggerReminderAlertUseCase {
            reminder_id: id,
            is_recurring: Some(true),
        };
        let outcome = execute(usecase, &test.ctx).await.unwrap();
        assert_eq!(
            outcome,
            TriggerOutcome::Fired {
                reminder_title: "Standup".into(),
            }
        );
        assert_eq!(test.mailer.sent_count(), 1);

        let stored = test.ctx.repos.reminders.find(&id).await.unwrap().unwrap();
        assert_eq!(stored.last_alert_time, Some(test.now));
        assert!(stored.is_active);
    }

    #[actix_web::test]
    async fn rejects_a_bad_signature_without_side_effects() {
        let test = setup();
        let id = test
            .ctx
            .repos
            .reminders
            .insert(&reminder_factory(false))
            .await
            .unwrap();

        let app = actix_web::test::init_service(
            App::new()
                .app_data(web::Data::new(test.ctx.clone()))
                .service(web::scope("/webhooks").configure(crate::webhooks::configure_routes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/webhooks/reminder-alert")
            .insert_header((SIGNATURE_HEADER, "not-a-signature"))
            .set_json(serde_json::json!({ "reminderId": id }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(test.mailer.sent_count(), 0);
        let stored = test.ctx.repos.reminders.find(&id).await.unwrap().unwrap();
        assert!(stored.is_active);
        assert_eq!(stored.last_alert_time, None);
    }

    #[actix_web::test]
    async fn accepts_a_signed_callback_end_to_end() {
        let test = setup();
        let id = test
            .ctx
            .repos
            .reminders
            .insert(&reminder_factory(false))
            .await
            .unwrap();

        let app = actix_web::test::init_service(
            App::new()
                .app_data(web::Data::new(test.ctx.clone()))
                .service(web::scope("/webhooks").configure(crate::webhooks::configure_routes)),
        )
        .await;

        // Signed with the rotated next key
        let now = Utc::now().timestamp() as usize;
        let claims = SignatureClaims {
            exp: now + 60,
            iat: now,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(test.ctx.config.signing_keys.next.as_bytes()),
        )
        .unwrap();

        let req = test::TestRequest::post()
            .uri("/webhooks/reminder-alert")
            .insert_header((SIGNATURE_HEADER, token))
            .set_json(serde_json::json!({ "reminderId": id, "isRecurring": false }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(
            body,
            serde_json::json!({ "status": "ok", "reminderTitle": "Standup" })
        );
        assert_eq!(test.mailer.sent_count(), 1);
    }
}
