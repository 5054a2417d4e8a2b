//! Integration tests for the gateway client against an in-process gateway.

mod support;

use std::sync::Arc;
use std::time::Duration;

use faasctl::auth::{BasicAuth, BearerAuth, NoAuth};
use faasctl::client::{Diagnostics, RedirectPolicy};
use faasctl::config::DebugOptions;
use faasctl::context::ContextError;
use faasctl::prelude::*;
use faasctl::proxy::DeployMethod;
use hyper::Method;
use serde_json::json;
use support::{closed_port_url, MockGateway, Route};
use tokio_test::{assert_err, assert_ok};

fn client_for(gateway: &MockGateway) -> GatewayClient {
    GatewayClient::new(Arc::new(NoAuth), &gateway.url(), None, None).unwrap()
}

fn figlet_json() -> serde_json::Value {
    json!({
        "name": "figlet",
        "image": "openfaas/figlet:latest",
        "invocationCount": 3,
        "replicas": 1,
        "availableReplicas": 1,
        "labels": {"team": "core"}
    })
}

#[tokio::test]
async fn test_list_functions_200() {
    let gateway = MockGateway::start(vec![
        Route::new(Method::GET, "/system/functions").json(json!([figlet_json()]))
    ])
    .await;
    let client = client_for(&gateway);

    let functions = assert_ok!(client.list_functions(&Context::background(), None).await);

    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].name, "figlet");
    assert_eq!(functions[0].replicas, 1);
    assert_eq!(functions[0].invocation_count, 3.0);

    let requests = gateway.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, None);
}

#[tokio::test]
async fn test_list_functions_400() {
    let gateway = MockGateway::start(vec![Route::new(Method::GET, "/system/functions")
        .status(400)
        .body("invalid namespace")])
    .await;
    let client = client_for(&gateway);

    let err = assert_err!(client.list_functions(&Context::background(), None).await);

    assert_eq!(err.status_code(), Some(400));
    assert!(err
        .to_string()
        .contains("server returned unexpected status code"));
}

#[tokio::test]
async fn test_list_functions_sends_namespace_query() {
    let gateway = MockGateway::start(vec![Route::new(Method::GET, "/system/functions")
        .query("namespace=dev")
        .json(json!([]))])
    .await;
    let client = client_for(&gateway);

    let functions = assert_ok!(
        client
            .list_functions(&Context::background(), Some("dev"))
            .await
    );

    assert!(functions.is_empty());
    assert_eq!(gateway.requests()[0].query.as_deref(), Some("namespace=dev"));
}

#[tokio::test]
async fn test_get_function_info_200() {
    let gateway = MockGateway::start(vec![Route::new(Method::GET, "/system/function/funct-test")
        .json(json!({"name": "funct-test", "image": "alpine", "replicas": 2}))])
    .await;
    let client = client_for(&gateway);

    let function = assert_ok!(
        client
            .get_function_info(&Context::background(), "funct-test", None)
            .await
    );

    assert_eq!(function.name, "funct-test");
    assert_eq!(function.replicas, 2);
    assert_eq!(function.readiness(), "Not Ready");
}

#[tokio::test]
async fn test_get_function_info_404() {
    let gateway = MockGateway::start(vec![
        Route::new(Method::GET, "/system/function/funct-test").status(404)
    ])
    .await;
    let client = client_for(&gateway);

    let err = assert_err!(
        client
            .get_function_info(&Context::background(), "funct-test", None)
            .await
    );

    assert_eq!(err.to_string(), "no such function: funct-test");
}

#[tokio::test]
async fn test_get_function_info_400() {
    let gateway = MockGateway::start(vec![Route::new(Method::GET, "/system/function/funct-test")
        .status(400)
        .body("bad request")])
    .await;
    let client = client_for(&gateway);

    let err = assert_err!(
        client
            .get_function_info(&Context::background(), "funct-test", None)
            .await
    );

    assert!(matches!(
        err,
        ClientError::UnexpectedStatus { status: 400, .. }
    ));
    assert!(err
        .to_string()
        .contains("server returned unexpected status code"));
}

#[tokio::test]
async fn test_get_function_info_with_namespace() {
    let gateway = MockGateway::start(vec![Route::new(Method::GET, "/system/function/figlet")
        .query("namespace=openfaas-fn")
        .json(figlet_json())])
    .await;
    let client = client_for(&gateway);

    let function = assert_ok!(
        client
            .get_function_info(&Context::background(), "figlet", Some("openfaas-fn"))
            .await
    );
    assert_eq!(function.labels.unwrap()["team"], "core");
}

#[tokio::test]
async fn test_deploy_function_sends_spec() {
    let gateway = MockGateway::start(vec![
        Route::new(Method::PUT, "/system/functions").status(202),
        Route::new(Method::POST, "/system/functions").status(200),
    ])
    .await;
    let client = client_for(&gateway);
    let deployment = FunctionDeployment::new("figlet", "openfaas/figlet:latest")
        .namespace("dev")
        .env("write_debug", "true")
        .secret("api-key");

    let updated = assert_ok!(
        client
            .deploy_function(&Context::background(), &deployment, DeployMethod::Update)
            .await
    );
    assert_eq!(updated.status_code(), 202);

    let created = assert_ok!(
        client
            .deploy_function(&Context::background(), &deployment, DeployMethod::Create)
            .await
    );
    assert_eq!(created.status_code(), 200);

    let requests = gateway.requests();
    assert_eq!(requests[0].method, Method::PUT);
    assert_eq!(requests[1].method, Method::POST);
    assert_eq!(requests[0].header("content-type"), Some("application/json"));

    let body = requests[0].json();
    assert_eq!(body["service"], "figlet");
    assert_eq!(body["namespace"], "dev");
    assert_eq!(body["envVars"]["write_debug"], "true");
    assert_eq!(body["secrets"], json!(["api-key"]));
}

#[tokio::test]
async fn test_deploy_function_returns_rejection_as_response() {
    let gateway = MockGateway::start(vec![Route::new(Method::PUT, "/system/functions")
        .status(400)
        .body("image is required")])
    .await;
    let client = client_for(&gateway);

    let response = assert_ok!(
        client
            .deploy_function(
                &Context::background(),
                &FunctionDeployment::new("figlet", ""),
                DeployMethod::Update,
            )
            .await
    );

    assert!(!response.is_success());
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.body, "image is required");
}

#[tokio::test]
async fn test_deployed_name_matches_reported_status() {
    let gateway = MockGateway::start(vec![
        Route::new(Method::PUT, "/system/functions").status(200),
        Route::new(Method::GET, "/system/function/nodeinfo")
            .json(json!({"name": "nodeinfo", "image": "functions/nodeinfo:latest"})),
    ])
    .await;
    let client = client_for(&gateway);
    let ctx = Context::background();
    let deployment = FunctionDeployment::new("nodeinfo", "functions/nodeinfo:latest");

    assert_ok!(
        client
            .deploy_function(&ctx, &deployment, DeployMethod::default())
            .await
    );
    let status = assert_ok!(client.get_function_info(&ctx, "nodeinfo", None).await);

    assert_eq!(status.name, deployment.service);
    assert_eq!(status.image, deployment.image);
}

#[tokio::test]
async fn test_delete_function() {
    let gateway = MockGateway::start(vec![
        Route::new(Method::DELETE, "/system/functions")
            .body_contains("\"functionName\":\"figlet\"")
            .status(202),
        Route::new(Method::DELETE, "/system/functions")
            .body_contains("\"functionName\":\"ghost\"")
            .status(404),
    ])
    .await;
    let client = client_for(&gateway);
    let ctx = Context::background();

    assert_ok!(client.delete_function(&ctx, "figlet", Some("dev")).await);
    let err = assert_err!(client.delete_function(&ctx, "ghost", None).await);
    assert!(matches!(err, ClientError::NoSuchFunction(ref name) if name == "ghost"));

    let requests = gateway.requests();
    assert_eq!(
        requests[0].json(),
        json!({"functionName": "figlet", "namespace": "dev"})
    );
    assert_eq!(requests[1].json(), json!({"functionName": "ghost"}));
}

#[tokio::test]
async fn test_list_namespaces() {
    let gateway = MockGateway::start(vec![Route::new(Method::GET, "/system/namespaces")
        .json(json!(["openfaas-fn", "dev"]))])
    .await;
    let client = client_for(&gateway);

    let namespaces = assert_ok!(client.list_namespaces(&Context::background()).await);
    assert_eq!(namespaces, vec!["openfaas-fn", "dev"]);
}

#[tokio::test]
async fn test_basic_auth_reaches_gateway() {
    let gateway = MockGateway::start(vec![
        Route::new(Method::GET, "/system/functions").json(json!([]))
    ])
    .await;
    let client = GatewayClient::new(
        Arc::new(BasicAuth::new("admin", "secret")),
        &gateway.url(),
        None,
        None,
    )
    .unwrap();

    assert_ok!(client.list_functions(&Context::background(), None).await);

    let request = &gateway.requests()[0];
    assert_eq!(request.header("authorization"), Some("Basic YWRtaW46c2VjcmV0"));
    assert!(request
        .header("user-agent")
        .is_some_and(|ua| ua.starts_with("faasctl/")));
}

#[tokio::test]
async fn test_bearer_auth_reaches_gateway() {
    let gateway = MockGateway::start(vec![
        Route::new(Method::GET, "/system/namespaces").json(json!([]))
    ])
    .await;
    let client =
        GatewayClient::new(Arc::new(BearerAuth::new("t0ken")), &gateway.url(), None, None)
            .unwrap();

    assert_ok!(client.list_namespaces(&Context::background()).await);
    assert_eq!(
        gateway.requests()[0].header("authorization"),
        Some("Bearer t0ken")
    );
}

#[tokio::test]
async fn test_trailing_slash_gateway() {
    let gateway = MockGateway::start(vec![
        Route::new(Method::GET, "/system/functions").json(json!([]))
    ])
    .await;
    let url = format!("{}///", gateway.url());
    let client = GatewayClient::new(Arc::new(NoAuth), &url, None, None).unwrap();

    assert_ok!(client.list_functions(&Context::background(), None).await);
    assert_eq!(gateway.requests()[0].path, "/system/functions");
}

#[tokio::test]
async fn test_follows_redirect() {
    let gateway = MockGateway::start(vec![
        Route::new(Method::GET, "/system/functions")
            .status(302)
            .header("location", "/v2/functions"),
        Route::new(Method::GET, "/v2/functions").json(json!([figlet_json()])),
    ])
    .await;
    let client = client_for(&gateway);

    let functions = assert_ok!(client.list_functions(&Context::background(), None).await);

    assert_eq!(functions[0].name, "figlet");
    let paths: Vec<_> = gateway.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/system/functions", "/v2/functions"]);
}

#[tokio::test]
async fn test_redirect_policy_none_returns_redirect() {
    let gateway = MockGateway::start(vec![Route::new(Method::GET, "/system/functions")
        .status(302)
        .header("location", "/v2/functions")])
    .await;
    let mut client = client_for(&gateway);
    client.set_redirect_policy(RedirectPolicy::None);

    let err = assert_err!(client.list_functions(&Context::background(), None).await);

    assert_eq!(err.status_code(), Some(302));
    assert_eq!(gateway.requests().len(), 1);
}

#[tokio::test]
async fn test_redirect_loop_stops_after_limit() {
    let gateway = MockGateway::start(vec![Route::new(Method::GET, "/system/functions")
        .status(302)
        .header("location", "/system/functions")])
    .await;
    let client = client_for(&gateway);

    let err = assert_err!(client.list_functions(&Context::background(), None).await);

    assert_eq!(err.to_string(), "stopped after 10 redirects");
    assert_eq!(gateway.requests().len(), 10);
}

#[tokio::test]
async fn test_cancel_in_flight_request() {
    let gateway = MockGateway::start(vec![Route::new(Method::GET, "/system/functions")
        .delay(Duration::from_secs(5))
        .json(json!([]))])
    .await;
    let client = client_for(&gateway);
    let (ctx, cancel) = Context::background().with_cancel();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let err = assert_err!(client.list_functions(&ctx, None).await);
    assert!(matches!(err, ClientError::Context(ContextError::Cancelled)));
    assert_eq!(err.to_string(), "context canceled");
}

#[tokio::test]
async fn test_context_deadline() {
    let gateway = MockGateway::start(vec![Route::new(Method::GET, "/system/namespaces")
        .delay(Duration::from_secs(5))
        .json(json!([]))])
    .await;
    let client = client_for(&gateway);
    let ctx = Context::background().with_timeout(Duration::from_millis(50));

    let err = assert_err!(client.list_namespaces(&ctx).await);
    assert!(matches!(
        err,
        ClientError::Context(ContextError::DeadlineExceeded)
    ));
}

#[tokio::test]
async fn test_client_timeout() {
    let gateway = MockGateway::start(vec![Route::new(Method::GET, "/system/namespaces")
        .delay(Duration::from_secs(5))
        .json(json!([]))])
    .await;
    let client = GatewayClient::new(
        Arc::new(NoAuth),
        &gateway.url(),
        None,
        Some(Duration::from_millis(50)),
    )
    .unwrap();

    let err = assert_err!(client.list_namespaces(&Context::background()).await);
    assert!(matches!(err, ClientError::Timeout(_)));
}

#[tokio::test]
async fn test_unreachable_gateway() {
    let url = closed_port_url().await;
    let client = GatewayClient::new(Arc::new(NoAuth), &url, None, None).unwrap();

    let err = assert_err!(client.list_functions(&Context::background(), None).await);

    assert!(matches!(err, ClientError::Transport { .. }));
    assert!(err
        .to_string()
        .starts_with("cannot connect to gateway on URL:"));
}

#[tokio::test]
async fn test_trace_redacts_credentials() {
    let gateway = MockGateway::start(vec![
        Route::new(Method::GET, "/system/functions").json(json!([]))
    ])
    .await;
    let (diagnostics, buffer) = Diagnostics::buffer();
    let client = GatewayClient::new(
        Arc::new(BasicAuth::new("admin", "secret")),
        &gateway.url(),
        None,
        None,
    )
    .unwrap()
    .with_debug(DebugOptions {
        trace_requests: true,
        dump_http: false,
    })
    .with_diagnostics(diagnostics);

    assert_ok!(client.list_functions(&Context::background(), None).await);

    let trace = buffer.contents();
    assert!(trace.starts_with(&format!("GET {}/system/functions", gateway.url())));
    assert!(trace.contains("authorization: Basic REDACTED"));
    assert!(!trace.contains("YWRtaW46c2VjcmV0"));

    // The gateway still sees the real credentials.
    assert_eq!(
        gateway.requests()[0].header("authorization"),
        Some("Basic YWRtaW46c2VjcmV0")
    );
}

#[tokio::test]
async fn test_dump_http_includes_body() {
    let gateway = MockGateway::start(vec![
        Route::new(Method::PUT, "/system/functions").status(200)
    ])
    .await;
    let (diagnostics, buffer) = Diagnostics::buffer();
    let client = client_for(&gateway)
        .with_debug(DebugOptions {
            trace_requests: false,
            dump_http: true,
        })
        .with_diagnostics(diagnostics);

    assert_ok!(
        client
            .deploy_function(
                &Context::background(),
                &FunctionDeployment::new("figlet", "openfaas/figlet"),
                DeployMethod::Update,
            )
            .await
    );

    let dump = buffer.contents();
    assert!(dump.starts_with("PUT /system/functions HTTP/1.1\r\n"));
    assert!(dump.contains("\"service\":\"figlet\""));
}

#[tokio::test]
async fn test_sub_second_config_timeout() {
    let gateway = MockGateway::start(vec![Route::new(Method::GET, "/system/functions")
        .delay(Duration::from_millis(5))
        .json(json!([]))])
    .await;
    let client = ClientConfig::new()
        .gateway(gateway.url())
        .timeout(Duration::from_millis(500))
        .build(Arc::new(NoAuth))
        .unwrap();

    assert_eq!(client.timeout(), Duration::from_millis(500));
    assert_ok!(client.list_functions(&Context::background(), None).await);
}

#[tokio::test]
async fn test_get_function_info_refuses_path_escape() {
    let gateway = MockGateway::start(vec![
        Route::new(Method::GET, "/system/functions").json(json!([]))
    ])
    .await;
    let client = client_for(&gateway);

    for name in ["../functions", "a/b", ".."] {
        let err = assert_err!(
            client
                .get_function_info(&Context::background(), name, None)
                .await
        );
        assert!(matches!(err, ClientError::InvalidFunctionName(_)), "{name}: {err}");
    }
    assert!(gateway.requests().is_empty());
}

#[tokio::test]
async fn test_get_function_info_encodes_name() {
    let gateway = MockGateway::start(vec![
        Route::new(Method::GET, "/system/function/my%20fn").json(json!({"name": "my fn"})),
        Route::new(Method::GET, "/system/function/100%25").json(json!({"name": "100%"})),
    ])
    .await;
    let client = client_for(&gateway);
    let ctx = Context::background();

    let spaced = assert_ok!(client.get_function_info(&ctx, "my fn", None).await);
    assert_eq!(spaced.name, "my fn");
    let percent = assert_ok!(client.get_function_info(&ctx, "100%", None).await);
    assert_eq!(percent.name, "100%");
}
