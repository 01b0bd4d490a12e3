use crate::error::MemoraError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use memora_api_structs::delete_many_reminders::*;
use memora_domain::ID;
use memora_infra::Context;

pub async fn delete_many_reminders_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, MemoraError> {
    let usecase = DeleteManyRemindersUseCase {
        reminder_ids: body.0.reminder_ids,
    };

    execute(usecase, &ctx)
        .await
        .map(|deleted_count| HttpResponse::Ok().json(APIResponse { deleted_count }))
        .map_err(MemoraError::from)
}

/// Bulk delete. Unknown ids are ignored, the response carries the number
/// of rows that were actually removed.
#[derive(Debug)]
pub struct DeleteManyRemindersUseCase {
    pub reminder_ids: Vec<ID>,
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
impl UseCase for DeleteManyRemindersUseCase {
    type Response = i64;
    type Error = UseCaseError;

    const NAME: &'static str = "DeleteManyReminders";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let res = ctx
            .repos
            .reminders
            .delete_many(&self.reminder_ids)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        Ok(res.deleted_count)
    }
}
