use poem::Request;
use poem_openapi::{SecurityScheme, auth::ApiKey};
use uuid::Uuid;

/// The calling user, as forwarded by the upstream auth gateway after it has
/// verified the session token.
#[derive(SecurityScheme)]
#[oai(
    ty = "api_key",
    key_name = "X-User-Id",
    key_in = "header",
    checker = "user_id_checker"
)]
pub struct SessionUser(pub Uuid);

async fn user_id_checker(_req: &Request, api_key: ApiKey) -> Option<Uuid> {
    Uuid::parse_str(api_key.key.trim()).ok()
}
