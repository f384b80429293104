use std::time::Duration;

use mewsource::{CatalogBackend, CatalogError, HttpCatalog};
use mockito::Matcher;

const SEARCH_BODY: &str = r#"{
    "code": 200,
    "data": {
        "total": 2,
        "data": [
            {"ID": "1", "title": "爱情转移", "singers": [{"ID": "2116", "name": "陈奕迅"}],
             "album": {"ID": "65536", "name": "认了吧"}},
            {"ID": "2", "title": "富士山下", "singers": [{"ID": "2116", "name": "陈奕迅"}],
             "album": {"ID": "0", "name": ""}}
        ]
    }
}"#;

fn catalog(server: &mockito::ServerGuard) -> HttpCatalog {
    HttpCatalog::new(&server.url(), "netease", Duration::from_secs(2))
}

#[test]
fn search_parses_songs() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/music/netease/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".into(), "爱情转移".into()),
            Matcher::UrlEncoded("pageIndex".into(), "1".into()),
            Matcher::UrlEncoded("pageSize".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SEARCH_BODY)
        .create();

    let tracks = catalog(&server).search("爱情转移", 2).unwrap();
    mock.assert();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].name, "爱情转移");
    assert_eq!(tracks[0].album.as_ref().unwrap().name, "认了吧");
    assert!(tracks[1].album.is_none());
}

#[test]
fn search_without_data_is_empty() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/music/netease/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"code": 200, "data": {}}"#)
        .create();

    assert!(catalog(&server).search("nothing", 20).unwrap().is_empty());
}

#[test]
fn suggest_and_tracks() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/music/netease/searchsuggest")
        .match_query(Matcher::UrlEncoded("key".into(), "lem".into()))
        .with_status(200)
        .with_body(r#"{"data": {"search": ["Lemon", "Lemon Tree"]}}"#)
        .create();
    server
        .mock("GET", "/api/music/netease/song")
        .match_query(Matcher::UrlEncoded("ID".into(), "1,2".into()))
        .with_status(200)
        .with_body(
            r#"{"data": [
                {"ID": 1, "title": "a", "singers": [], "album": {"ID": "0", "name": ""}},
                {"ID": 2, "title": "b", "singers": [], "album": {"ID": "0", "name": ""}}
            ]}"#,
        )
        .create();

    let catalog = catalog(&server);
    assert_eq!(catalog.suggest("lem").unwrap(), vec!["Lemon", "Lemon Tree"]);

    let tracks = catalog
        .tracks(&["1".to_string(), "2".to_string()])
        .unwrap();
    assert_eq!(tracks.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["1", "2"]);
}

#[test]
fn missing_track_is_not_found() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/music/netease/song")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"data": []}"#)
        .create();

    let err = catalog(&server).track("404").unwrap_err();
    assert!(matches!(err, CatalogError::TrackNotFound(_)));
    assert!(err.is_not_found());
}

#[test]
fn availability_probe() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/music/netease/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(SEARCH_BODY)
        .create();
    assert!(catalog(&server).available());

    let mut down = mockito::Server::new();
    down.mock("GET", "/api/music/netease/search")
        .match_query(Matcher::Any)
        .with_status(500)
        .create();
    assert!(!catalog(&down).available());

    let mut empty = mockito::Server::new();
    empty
        .mock("GET", "/api/music/netease/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"data": {"data": []}}"#)
        .create();
    assert!(!catalog(&empty).available());
}

#[test]
fn server_error_is_transport() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/music/netease/searchsuggest")
        .match_query(Matcher::Any)
        .with_status(503)
        .create();

    let err = catalog(&server).suggest("x").unwrap_err();
    assert!(matches!(err, CatalogError::Api { code: 503, .. }));
    assert!(err.is_transport());
}
