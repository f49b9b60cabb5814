use egui_kittest::Harness;
use usuarios_ui::UsuariosApp;
use usuarios_ui::state::State;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestCtx<'a, T = UsuariosApp> {
    /// Mock server must be retained to keep HTTP endpoints alive during tests.
    _mock_server: MockServer,
    harness: Harness<'a, T>,
}

impl<'a, T> TestCtx<'a, T> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, T> {
        &mut self.harness
    }
}

impl TestCtx<'_, UsuariosApp> {
    /// Builds the app against `mock_server`. Mocks must be mounted before the first step.
    pub fn new_app(mock_server: MockServer) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let state = State::test(mock_server.uri()).expect("tests run inside a tokio runtime");
        let app = UsuariosApp::new(state);
        let harness = Harness::new_eframe(|_| app);

        Self {
            _mock_server: mock_server,
            harness,
        }
    }
}

pub fn users_page_json(first_id: i64, count: i64, total_pages: u32) -> serde_json::Value {
    let items: Vec<_> = (first_id..first_id + count)
        .map(|id| {
            serde_json::json!({
                "id": id,
                "name": format!("user{id}"),
                "email": format!("user{id}@x.com"),
            })
        })
        .collect();
    serde_json::json!({ "items": items, "totalPages": total_pages })
}

pub fn users_page_mock(page: u32, size: u32) -> wiremock::MockBuilder {
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", page.to_string()))
        .and(query_param("size", size.to_string()))
}

pub async fn mount_users_page(
    server: &MockServer,
    page: u32,
    size: u32,
    body: serde_json::Value,
) {
    users_page_mock(page, size)
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Runs a frame, lets pending fetches finish, then runs a few more frames to render them.
pub async fn settle<T>(harness: &mut Harness<'_, T>) {
    harness.step();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    for _ in 0..5 {
        harness.step();
    }
}
