/*
 * Responsibility
 * - Profile の request/response DTO
 * - validate() は最初の 1 件で止めず、全フィールドのエラーを集める
 */
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

const MAX_USER_NAME_LEN: usize = 64;
const MAX_IMAGE_URL_LEN: usize = 256;
const MAX_BIO_LEN: usize = 512;

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub user_name: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl ProfileRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self.user_name.trim();
        if name.is_empty() {
            errors.push(FieldError::new("user_name", "user_name is required"));
        } else if name.chars().count() > MAX_USER_NAME_LEN {
            errors.push(FieldError::new(
                "user_name",
                format!("user_name must be <= {MAX_USER_NAME_LEN} chars"),
            ));
        }

        if let Some(url) = &self.image_url {
            if url.chars().count() > MAX_IMAGE_URL_LEN {
                errors.push(FieldError::new(
                    "image_url",
                    format!("image_url must be <= {MAX_IMAGE_URL_LEN} chars"),
                ));
            } else if !(url.starts_with("https://") || url.starts_with("http://")) {
                errors.push(FieldError::new("image_url", "image_url must be an http(s) URL"));
            }
        }

        if let Some(bio) = &self.bio
            && bio.chars().count() > MAX_BIO_LEN
        {
            errors.push(FieldError::new(
                "bio",
                format!("bio must be <= {MAX_BIO_LEN} chars"),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub subject: String,
    pub user_name: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}
