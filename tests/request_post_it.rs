// crates.io
use httpmock::prelude::*;
// self
use oauth2_page_login::{
	_preludet::*,
	codec::FormData,
	error::TransportError,
	request::RequestService,
	store::{DurableStorage, MemoryStorage},
};

#[derive(Debug, Deserialize)]
struct UserInfo {
	nickname: String,
	level: u8,
}

#[tokio::test]
async fn post_sends_form_body_with_stored_token() {
	let server = MockServer::start_async().await;
	let (service, _store) = build_reqwest_test_service();
	let url = server.url("/user/info");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/user/info")
				.header("content-type", "application/x-www-form-urlencoded")
				.body("fields=nick%20name&accessToken=tok%2F1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"nickname\":\"ada\",\"level\":3}");
		})
		.await;

	service.remember_token(&url, "tok/1", None);

	let fields = FormData::new().with("fields", "nick name");
	let reply = service.post(&url, Some(&fields)).await.expect("Form post should succeed.");

	assert_eq!(reply["nickname"], "ada");

	mock.assert_async().await;
}

#[tokio::test]
async fn post_without_token_sends_empty_token_field() {
	let server = MockServer::start_async().await;
	let (service, _store) = build_reqwest_test_service();
	let url = server.url("/ping");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/ping").body("accessToken=");
			then.status(200).body("{}");
		})
		.await;

	service.post(&url, None).await.expect("Tokenless post should still succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn post_as_decodes_typed_replies() {
	let server = MockServer::start_async().await;
	let (service, store) = build_reqwest_test_service();
	let url = server.url("/user/info");

	store.set(&url, "typed-token", None);

	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/user/info").body("accessToken=typed-token");
			then.status(200).body("{\"nickname\":\"grace\",\"level\":7}");
		})
		.await;
	let info = service
		.post_as::<UserInfo>(&url, None)
		.await
		.expect("Typed post should decode the reply.");

	assert_eq!(info.nickname, "grace");
	assert_eq!(info.level, 7);

	mock.assert_async().await;
}

#[tokio::test]
async fn error_status_with_json_body_is_returned_as_data() {
	let server = MockServer::start_async().await;
	let (service, _store) = build_reqwest_test_service();
	let url = server.url("/user/info");

	server
		.mock_async(|when, then| {
			when.method(POST).path("/user/info");
			then.status(401).body("{\"errno\":110,\"errmsg\":\"token expired\"}");
		})
		.await;

	let reply = service.post(&url, None).await.expect("JSON error bodies should parse.");

	assert_eq!(reply["errno"], 110);
}

#[tokio::test]
async fn non_json_body_fails_with_parse_error() {
	let server = MockServer::start_async().await;
	let (service, _store) = build_reqwest_test_service();
	let url = server.url("/user/info");

	server
		.mock_async(|when, then| {
			when.method(POST).path("/user/info");
			then.status(500).body("<html>oops</html>");
		})
		.await;

	let err = service.post(&url, None).await.expect_err("HTML bodies should not parse as JSON.");

	match err {
		Error::ResponseParse { url: failed, status, .. } => {
			assert_eq!(failed, url);
			assert_eq!(status, Some(500));
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn unreachable_endpoint_fails_with_transport_error() {
	let (service, _store) = build_reqwest_test_service();
	let err = service
		.post("http://127.0.0.1:1/user/info", None)
		.await
		.expect_err("Posting to a closed port should fail.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
}

#[tokio::test]
async fn relative_endpoint_resolves_against_the_page() {
	let server = MockServer::start_async().await;
	let durable: Arc<dyn DurableStorage> = Arc::new(MemoryStorage::default());
	let (store, page) = build_test_store(durable, &server.url("/app/index.html"));
	let service = RequestService::with_transport(store, page, test_reqwest_transport());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/app/api/login").body("accessToken=relative-token");
			then.status(200).body("{\"ok\":true}");
		})
		.await;

	service.remember_token("api/login", "relative-token", None);

	let reply = service.post("api/login", None).await.expect("Relative endpoints should post.");

	assert_eq!(reply["ok"], true);

	mock.assert_async().await;
}
