pub mod get_user_id;
pub mod validate_token;
