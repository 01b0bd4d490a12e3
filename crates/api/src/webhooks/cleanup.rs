use crate::alerting::CleanupSweepUseCase;
use crate::error::MemoraError;
use crate::shared::auth::verify_webhook_signature;
use crate::shared::usecase::execute;
use actix_web::{web, HttpRequest, HttpResponse};
use memora_api_structs::cleanup::APIResponse;
use memora_infra::Context;

pub async fn cleanup_controller(
    http_req: HttpRequest,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, MemoraError> {
    verify_webhook_signature(&http_req, &ctx)?;

    execute(CleanupSweepUseCase, &ctx)
        .await
        .map(|report| {
            HttpResponse::Ok().json(APIResponse {
                checked: report.checked,
                deactivated: report.deactivated,
            })
        })
        .map_err(|_| MemoraError::InternalError)
}
