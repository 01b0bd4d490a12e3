use crate::error::MemoraError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use memora_api_structs::get_reminders::*;
use memora_domain::Reminder;
use memora_infra::Context;

pub async fn get_reminders_controller(
    query_params: web::Query<QueryParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, MemoraError> {
    let usecase = GetRemindersUseCase {
        active_only: query_params.active.unwrap_or(false),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(MemoraError::from)
}

#[derive(Debug)]
pub struct GetRemindersUseCase {
    pub active_only: bool,
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
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;
    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let reminders = if self.active_only {
            ctx.repos.reminders.find_active().await
        } else {
            ctx.repos.reminders.find_all().await
        };
        reminders.map_err(|_| UseCaseError::StorageError)
    }
}
