use std::time::Duration;

use chatdock_engine::{
    AssistantClient, ChatController, ChatSurface, Config, HttpAssistant, Output, RequestFailure,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    Config {
        base_url: server.uri(),
        ..Config::default()
    }
}

/// Minimal surface that keeps the last markup and the visibility flags.
#[derive(Default)]
struct PanelSurface {
    markup: String,
    loading: bool,
    output_visible: bool,
}

impl ChatSurface for PanelSurface {
    fn clear_input(&mut self) {}

    fn hide_welcome(&mut self) {}

    fn show_loading(&mut self) {
        self.loading = true;
        self.output_visible = false;
    }

    fn show_output(&mut self, output: &Output) {
        self.markup = output.markup();
    }

    fn show_result(&mut self) {
        self.loading = false;
        self.output_visible = true;
    }
}

#[tokio::test]
async fn sends_input_as_query_parameter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/assistant"))
        .and(query_param("input", "how many employees & why?"))
        .respond_with(ResponseTemplate::new(200).set_body_string("eight"))
        .expect(1)
        .mount(&server)
        .await;

    let assistant = HttpAssistant::new(config_for(&server));
    let body = assistant
        .ask("how many employees & why?")
        .await
        .expect("request should succeed");

    assert_eq!(body, "eight");
}

#[tokio::test]
async fn non_success_body_is_still_returned() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/assistant"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("I'm sorry, but something went wrong."),
        )
        .mount(&server)
        .await;

    let assistant = HttpAssistant::new(config_for(&server));
    let body = assistant.ask("hello").await.expect("body should be returned");

    assert_eq!(body, "I'm sorry, but something went wrong.");
}

#[tokio::test]
async fn times_out_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/assistant"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let assistant = HttpAssistant::new(Config {
        request_timeout_secs: Some(1),
        ..config_for(&server)
    });
    let err = assistant.ask("hello").await.expect_err("should time out");

    assert!(matches!(err, RequestFailure::Timeout(_)));
}

#[tokio::test]
async fn connection_refused_is_transport_failure() {
    // Grab a free port and close it again so nothing is listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let assistant = HttpAssistant::new(Config {
        base_url: format!("http://127.0.0.1:{port}"),
        ..Config::default()
    });
    let err = assistant.ask("hello").await.expect_err("should fail");

    assert!(matches!(err, RequestFailure::Transport(_)));
}

#[tokio::test]
async fn controller_renders_image_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/assistant"))
        .and(query_param("input", "plot sales by genre"))
        .respond_with(ResponseTemplate::new(200).set_body_string("data:image/png;base64,AAAA"))
        .expect(1)
        .mount(&server)
        .await;

    let assistant = HttpAssistant::new(config_for(&server));
    let mut surface = PanelSurface::default();
    let mut controller = ChatController::new();

    assert!(
        controller
            .submit(&assistant, &mut surface, "  plot sales by genre ")
            .await
    );

    assert!(surface
        .markup
        .contains(r#"<img src="data:image/png;base64,AAAA""#));
    assert!(!surface.loading);
    assert!(surface.output_visible);
}

#[tokio::test]
async fn controller_renders_failure_message() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let assistant = HttpAssistant::new(Config {
        base_url: format!("http://127.0.0.1:{port}"),
        ..Config::default()
    });
    let mut surface = PanelSurface::default();
    let mut controller = ChatController::new();

    controller.submit(&assistant, &mut surface, "hello").await;

    assert!(surface
        .markup
        .starts_with("I'm sorry, but something went wrong ("));
    assert!(!surface.loading);
    assert!(surface.output_visible);
}
