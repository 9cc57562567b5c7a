use mockito::{Matcher, Server};
use serde_json::json;

use rostrum_client::{
    ClientConfig, ClientError, DebateApi, HttpApi, JudgementSubmission, NewPlaygroundDebate,
    PlaygroundDebateType,
};

fn api_for(server: &Server) -> HttpApi {
    HttpApi::new(&ClientConfig {
        api_url: server.url(),
        ..ClientConfig::default()
    })
    .unwrap()
}

fn debate_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "The Door",
        "max_turns": 3,
        "min_turns": 1,
        "method": "debate",
        "config_path": "debaters/gpt4.yaml",
        "allow_judge_interaction": true,
        "user": {"id": 3, "user_name": "sam", "full_name": "Sam Lee", "admin": false},
        "transcript": {
            "question": "Who opened the door?",
            "answers": {"correct": "The butler", "incorrect": "The cook"},
            "names": {"correct": "Alice", "incorrect": "Bob", "judge": "Judge"},
            "swap": false,
            "rounds": [
                {"correct": "It was <v_quote>the butler</v_quote>", "incorrect": "The cook", "type": "sim"}
            ],
            "extra": {"judge_name": "gpt-4"}
        },
        "judgement": null,
        "experiment": null
    })
}

#[tokio::test]
async fn login_captures_session_cookie() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/api/users/login")
        .match_body(Matcher::Json(json!({"user_name": "sam"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("set-cookie", "user_id=3; Path=/; SameSite=lax")
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;
    let profile = server
        .mock("GET", "/api/users/3")
        .match_header("cookie", "user_id=3")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 3, "user_name": "sam", "full_name": "Sam Lee", "admin": false}"#)
        .create_async()
        .await;

    let api = api_for(&server);
    assert_eq!(api.session(), None);

    let user_id = api.login("sam").await.unwrap();
    assert_eq!(user_id, 3);
    assert_eq!(api.session(), Some(3));

    let user = api.get_user(user_id).await.unwrap();
    assert_eq!(user.display_name(), "Sam Lee");

    login.assert_async().await;
    profile.assert_async().await;
}

#[tokio::test]
async fn login_without_cookie_is_session_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/users/login")
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;

    let err = api_for(&server).login("sam").await.unwrap_err();
    assert!(matches!(err, ClientError::Session(_)));
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/users/login")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "User not found"}"#)
        .create_async()
        .await;

    let err = api_for(&server).login("nobody").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "HTTP Error: 404 - User not found");
}

#[tokio::test]
async fn get_debate_decodes_transcript_and_extras() {
    let mut server = Server::new_async().await;
    let mut body = debate_json(12);
    body["raw_transcript"] = json!("{\"question\": \"Who opened the door?\"}");
    body["next_debate_id"] = json!(13);
    body["debates_remaining"] = json!(4);
    server
        .mock("GET", "/api/debates/12")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let debate = api_for(&server).get_debate(12).await.unwrap();
    assert_eq!(debate.id, 12);
    assert_eq!(debate.transcript.round_count(), 1);
    assert_eq!(
        debate.transcript.extra_hint("judge_name"),
        Some(&json!("gpt-4"))
    );
    assert_eq!(debate.next_debate_id, Some(13));
    assert_eq!(debate.debates_remaining, Some(4));
}

#[tokio::test]
async fn failed_turn_reports_plain_text_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/debates/12/turn")
        .match_body(Matcher::Json(json!({"judge_message": "Why the butler?"})))
        .with_status(502)
        .with_header("content-type", "text/plain")
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let err = api_for(&server)
        .create_turn(12, Some("Why the butler?"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "HTTP Error: 502 - Bad Gateway");
    mock.assert_async().await;
}

#[tokio::test]
async fn undecodable_body_is_transport_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/debates/12")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{\"id\": ")
        .create_async()
        .await;

    let err = api_for(&server).get_debate(12).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

#[tokio::test]
async fn judgement_submission_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/debates/12/judgements")
        .match_body(Matcher::Json(json!({
            "confidence_correct": 70,
            "user_name": "sam",
            "explanation": "The quote was verified"
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    api_for(&server)
        .submit_judgement(
            12,
            &JudgementSubmission {
                confidence_correct: 70,
                user_name: "sam".to_string(),
                explanation: "The quote was verified".to_string(),
            },
        )
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn playground_endpoints() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/playground/debates")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"debates": [debate_json(1), debate_json(2)]}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/api/playground/debater_configs")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"debater_configs": ["d.yaml"], "consultant_configs": ["c1.yaml", "c2.yaml"]}"#)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/api/playground/debates")
        .match_body(Matcher::Json(json!({
            "debate_type": "incorrect_consultancy",
            "config_path": "c1.yaml",
            "previous_debate_id": 2
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 77}"#)
        .create_async()
        .await;

    let api = api_for(&server);
    let debates = api.playground_debates().await.unwrap();
    assert_eq!(debates.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 2]);

    let configs = api.debater_configs().await.unwrap();
    assert_eq!(
        configs.for_type(PlaygroundDebateType::IncorrectConsultancy).len(),
        2
    );

    let id = api
        .create_playground_debate(&NewPlaygroundDebate {
            debate_type: PlaygroundDebateType::IncorrectConsultancy,
            config_path: "c1.yaml".to_string(),
            previous_debate_id: Some(2),
        })
        .await
        .unwrap();
    assert_eq!(id, 77);
    create.assert_async().await;
}

#[tokio::test]
async fn experiment_endpoints() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/debates/next")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("null")
        .create_async()
        .await;
    server
        .mock("GET", "/api/experiments/completed_debates")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"debates": [debate_json(5)]}).to_string())
        .create_async()
        .await;

    let api = api_for(&server);
    assert!(api.next_debate().await.unwrap().is_none());
    let completed = api.completed_debates().await.unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].transcript.names.correct.as_deref(), Some("Alice"));
}
