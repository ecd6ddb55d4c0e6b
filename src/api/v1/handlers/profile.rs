/*
 * Responsibility
 * - POST /api/v1/profile/validate
 * - Json を extractor で受け、DTO validation → 複数フィールドのエラーはまとめて 400
 * - 永続化はしない (検証結果を返すだけ)
 */
use axum::{Json, extract::rejection::JsonRejection};

use crate::{
    api::v1::{
        dto::profile::{ProfileRequest, ProfileResponse},
        extractors::AuthCtxExtractor,
    },
    error::AppError,
};

pub async fn validate_profile(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, AppError> {
    let Json(req) = payload?;

    if let Err(errors) = req.validate() {
        tracing::warn!(
            subject = %ctx.subject,
            fields = ?errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
            "profile validation failed"
        );
        return Err(AppError::validation(errors));
    }

    Ok(Json(ProfileResponse {
        subject: ctx.subject,
        user_name: req.user_name.trim().to_string(),
        image_url: req.image_url,
        bio: req.bio,
    }))
}
