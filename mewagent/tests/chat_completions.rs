use std::time::Duration;

use mewagent::{
    AgentError, ChatCompletionsClient, ChatSession, Completion, ConversationalAgent, Message,
};
use mockito::Matcher;

fn client(server: &mockito::ServerGuard) -> ChatCompletionsClient {
    ChatCompletionsClient::new(&server.url(), "sk-test", "qwen-max", Duration::from_secs(2))
}

#[test]
fn completion_sends_model_and_history() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJsonString(
            r#"{"model": "qwen-max", "messages": [{"role": "system", "content": "猫"}, {"role": "user", "content": "Alice：你好"}]}"#
                .to_string(),
        ))
        .with_status(200)
        .with_body(
            r#"{"id": "x", "choices": [{"index": 0, "message": {"role": "assistant", "content": "你好呀喵~"}}]}"#,
        )
        .create();

    let reply = client(&server)
        .complete(&[Message::system("猫"), Message::user("Alice：你好")])
        .unwrap();
    mock.assert();
    assert_eq!(reply, "你好呀喵~");
}

#[test]
fn empty_choices_is_an_error() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices": []}"#)
        .create();

    assert!(matches!(
        client(&server).complete(&[Message::user("hi")]),
        Err(AgentError::EmptyCompletion)
    ));
}

#[test]
fn http_error_keeps_session_consistent() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error": {"message": "invalid api key"}}"#)
        .create();

    let mut session = ChatSession::new(Box::new(client(&server)), "猫");
    let err = session.send("Bob：在吗").unwrap_err();
    assert!(matches!(err, AgentError::Api { code: 401, .. }));
    assert_eq!(session.history().len(), 1);
}
