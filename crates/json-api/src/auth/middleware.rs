//! Auth middleware.

use salvo::prelude::*;
use trolley::UserUuid;

use crate::{auth::USER_HEADER, extensions::*};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(user) = extract_user(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid x-user-id header"));
        ctrl.skip_rest();

        return;
    };

    depot.insert_user(user);

    ctrl.call_next(req, depot, res).await;
}

fn extract_user(req: &Request) -> Option<UserUuid> {
    let value = req.headers().get(USER_HEADER)?.to_str().ok()?.trim();

    if value.is_empty() {
        return None;
    }

    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    #[salvo::handler]
    async fn echo_user(depot: &mut Depot, res: &mut Response) {
        let user = depot
            .user_or_401()
            .ok()
            .map_or_else(|| "missing".to_string(), |user| user.to_string());

        res.render(user);
    }

    fn make_service() -> Service {
        Service::new(Router::new().hoop(handler).push(Router::new().get(echo_user)))
    }

    #[tokio::test]
    async fn test_missing_user_header_returns_401() {
        let res = TestClient::get("http://example.com")
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_malformed_user_header_returns_401() {
        let res = TestClient::get("http://example.com")
            .add_header(USER_HEADER, "not-a-uuid", true)
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_valid_user_header_injects_user() -> TestResult {
        let user = UserUuid::from_uuid(Uuid::now_v7());

        let mut res = TestClient::get("http://example.com")
            .add_header(USER_HEADER, user.to_string(), true)
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, user.to_string());

        Ok(())
    }
}
